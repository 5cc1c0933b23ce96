//! SQL parser wrapper

use crate::dialect::{SqlDialect, TsqlDialect};
use crate::error::{SqlError, SqlResult};
use sqlparser::ast::Statement;

/// SQL parser that wraps sqlparser-rs with dialect support
pub struct SqlParser {
    dialect: Box<dyn SqlDialect>,
}

impl SqlParser {
    /// Create a new parser with the T-SQL dialect
    pub fn tsql() -> Self {
        Self {
            dialect: Box::new(TsqlDialect::new()),
        }
    }

    /// Create a parser from dialect name
    pub fn from_dialect_name(name: &str) -> SqlResult<Self> {
        match name.to_lowercase().as_str() {
            "tsql" => Ok(Self::tsql()),
            _ => Err(SqlError::UnknownDialect(name.to_string())),
        }
    }

    /// Parse SQL into AST statements
    pub fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(SqlError::EmptySql);
        }

        self.dialect.parse(sql)
    }
}

impl Default for SqlParser {
    fn default() -> Self {
        Self::tsql()
    }
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
