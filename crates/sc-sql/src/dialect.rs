//! SQL dialect abstraction

use sqlparser::ast::Statement;
use sqlparser::dialect::{Dialect, MsSqlDialect as SqlParserMsSql};
use sqlparser::parser::Parser;
use sqlparser::tokenizer::{TokenWithSpan, Tokenizer};

use crate::error::{SqlError, SqlResult};

/// Trait for SQL dialect implementations
pub trait SqlDialect: Send + Sync {
    /// Get the underlying sqlparser dialect
    fn parser_dialect(&self) -> &dyn Dialect;

    /// Parse SQL into AST statements
    fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        Parser::parse_sql(self.parser_dialect(), sql).map_err(|e| to_parse_error(e.to_string()))
    }

    /// Split SQL into located tokens without parsing
    fn tokenize(&self, sql: &str) -> SqlResult<Vec<TokenWithSpan>> {
        Tokenizer::new(self.parser_dialect(), sql)
            .tokenize_with_location()
            .map_err(|e| to_parse_error(e.to_string()))
    }

    /// Parse an already tokenized statement list
    fn parse_tokens(&self, tokens: Vec<TokenWithSpan>) -> SqlResult<Vec<Statement>> {
        Parser::new(self.parser_dialect())
            .with_tokens_with_locations(tokens)
            .parse_statements()
            .map_err(|e| to_parse_error(e.to_string()))
    }
}

fn to_parse_error(message: String) -> SqlError {
    let (line, column) = parse_location_from_error(&message);
    SqlError::ParseError {
        message,
        line,
        column,
    }
}

/// Parse line and column from a sqlparser error message.
///
/// Parser and tokenizer errors carry no structured location, so
/// "Line: N, Column: M" is read back out of the message text.
fn parse_location_from_error(msg: &str) -> (usize, usize) {
    let Some(line_idx) = msg.find("Line: ") else {
        return (0, 0);
    };
    let line_start = line_idx + 6;
    let Some(comma_idx) = msg[line_start..].find(',') else {
        return (0, 0);
    };
    let Ok(line) = msg[line_start..line_start + comma_idx]
        .trim()
        .parse::<usize>()
    else {
        return (0, 0);
    };
    let Some(col_idx) = msg.find("Column: ") else {
        return (0, 0);
    };
    let col_start = col_idx + 8;
    let col_end = msg[col_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map(|i| col_start + i)
        .unwrap_or(msg.len());
    let Ok(column) = msg[col_start..col_end].trim().parse::<usize>() else {
        return (0, 0);
    };
    (line, column)
}

/// T-SQL (SQL Server) dialect
pub struct TsqlDialect {
    dialect: SqlParserMsSql,
}

impl TsqlDialect {
    /// Create a new T-SQL dialect
    pub fn new() -> Self {
        Self {
            dialect: SqlParserMsSql {},
        }
    }
}

impl Default for TsqlDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for TsqlDialect {
    fn parser_dialect(&self) -> &dyn Dialect {
        &self.dialect
    }
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
