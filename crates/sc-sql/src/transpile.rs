//! T-SQL to Snowflake transpilation
//!
//! The input is tokenized with the T-SQL dialect, bracket-quoted identifiers
//! are unquoted, and the parsed statements are rewritten in place before
//! being printed back out. Only constructs with a direct Snowflake
//! counterpart are rewritten; everything else is emitted as parsed.

use crate::dialect::{SqlDialect, TsqlDialect};
use crate::error::{SqlError, SqlResult};
use sqlparser::ast::{
    CastKind, Expr, Function, Ident, LimitClause, ObjectName, Query, SetExpr, TopQuantity, Value,
    VisitMut, VisitorMut,
};
use sqlparser::tokenizer::Token;
use std::ops::ControlFlow;

/// Converts SQL text from one dialect to another
pub trait Transpiler: Send + Sync {
    /// Transpile `sql`. Fails when the input cannot be parsed.
    fn transpile(&self, sql: &str) -> SqlResult<String>;
}

/// Look up the transpiler for a dialect pair
pub fn transpiler_for(read: &str, write: &str) -> SqlResult<Box<dyn Transpiler>> {
    match (read.to_lowercase().as_str(), write.to_lowercase().as_str()) {
        ("tsql", "snowflake") => Ok(Box::new(TsqlToSnowflake::new())),
        _ => Err(SqlError::UnsupportedDialectPair {
            read: read.to_string(),
            write: write.to_string(),
        }),
    }
}

/// T-SQL in, Snowflake out
pub struct TsqlToSnowflake {
    source: TsqlDialect,
}

impl TsqlToSnowflake {
    /// Create a new transpiler
    pub fn new() -> Self {
        Self {
            source: TsqlDialect::new(),
        }
    }
}

impl Default for TsqlToSnowflake {
    fn default() -> Self {
        Self::new()
    }
}

impl Transpiler for TsqlToSnowflake {
    fn transpile(&self, sql: &str) -> SqlResult<String> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(SqlError::EmptySql);
        }

        let mut tokens = self.source.tokenize(sql)?;
        for token in &mut tokens {
            unbracket(&mut token.token);
        }

        let mut statements = self.source.parse_tokens(tokens)?;
        if statements.is_empty() {
            return Err(SqlError::EmptySql);
        }

        let mut rewriter = SnowflakeRewriter;
        for stmt in &mut statements {
            let _ = stmt.visit(&mut rewriter);
        }

        Ok(statements
            .iter()
            .map(|stmt| format!("{stmt:#}"))
            .collect::<Vec<_>>()
            .join(";\n"))
    }
}

/// T-SQL function → Snowflake function, matched case-insensitively
const FUNCTION_RENAMES: &[(&str, &str)] = &[
    ("GETDATE", "CURRENT_TIMESTAMP"),
    ("GETUTCDATE", "SYSDATE"),
    ("ISNULL", "COALESCE"),
    ("LEN", "LENGTH"),
    ("NEWID", "UUID_STRING"),
    ("SYSDATETIME", "CURRENT_TIMESTAMP"),
];

/// Snowflake reserved words, sorted for binary search
const SNOWFLAKE_RESERVED: &[&str] = &[
    "ACCOUNT",
    "ALL",
    "ALTER",
    "AND",
    "ANY",
    "AS",
    "BETWEEN",
    "BY",
    "CASE",
    "CAST",
    "CHECK",
    "COLUMN",
    "CONNECT",
    "CONNECTION",
    "CONSTRAINT",
    "CREATE",
    "CROSS",
    "CURRENT",
    "CURRENT_DATE",
    "CURRENT_TIME",
    "CURRENT_TIMESTAMP",
    "CURRENT_USER",
    "DATABASE",
    "DELETE",
    "DISTINCT",
    "DROP",
    "ELSE",
    "EXISTS",
    "FALSE",
    "FOLLOWING",
    "FOR",
    "FROM",
    "FULL",
    "GRANT",
    "GROUP",
    "GSCLUSTER",
    "HAVING",
    "ILIKE",
    "IN",
    "INCREMENT",
    "INNER",
    "INSERT",
    "INTERSECT",
    "INTO",
    "IS",
    "ISSUE",
    "JOIN",
    "LATERAL",
    "LEFT",
    "LIKE",
    "LOCALTIME",
    "LOCALTIMESTAMP",
    "MINUS",
    "NATURAL",
    "NOT",
    "NULL",
    "OF",
    "ON",
    "OR",
    "ORDER",
    "ORGANIZATION",
    "QUALIFY",
    "REGEXP",
    "REVOKE",
    "RIGHT",
    "RLIKE",
    "ROW",
    "ROWS",
    "SAMPLE",
    "SCHEMA",
    "SELECT",
    "SET",
    "SOME",
    "START",
    "TABLE",
    "TABLESAMPLE",
    "THEN",
    "TO",
    "TRIGGER",
    "TRUE",
    "TRY_CAST",
    "UNION",
    "UNIQUE",
    "UPDATE",
    "USING",
    "VALUES",
    "VIEW",
    "WHEN",
    "WHENEVER",
    "WHERE",
    "WITH",
];

/// Drop `[...]` quoting. Names that are not plain identifiers in Snowflake
/// are double-quoted instead.
fn unbracket(token: &mut Token) {
    if let Token::Word(word) = token {
        if word.quote_style == Some('[') {
            word.quote_style = needs_quotes(&word.value).then_some('"');
        }
    }
}

fn needs_quotes(ident: &str) -> bool {
    let starts_plain = ident
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let all_plain = ident
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    !starts_plain || !all_plain || is_reserved(ident)
}

fn is_reserved(ident: &str) -> bool {
    SNOWFLAKE_RESERVED
        .binary_search(&ident.to_ascii_uppercase().as_str())
        .is_ok()
}

/// AST rewrites applied after parsing
struct SnowflakeRewriter;

impl VisitorMut for SnowflakeRewriter {
    type Break = ();

    fn post_visit_expr(&mut self, expr: &mut Expr) -> ControlFlow<Self::Break> {
        if let Expr::Function(func) = expr {
            rename_function(func);
        }
        if let Some(cast) = convert_to_cast(expr) {
            *expr = cast;
        }
        ControlFlow::Continue(())
    }

    fn post_visit_query(&mut self, query: &mut Query) -> ControlFlow<Self::Break> {
        top_to_limit(query);
        ControlFlow::Continue(())
    }
}

fn rename_function(func: &mut Function) {
    let [part] = func.name.0.as_slice() else {
        return;
    };
    let Some(ident) = part.as_ident() else {
        return;
    };
    let Some((_, target)) = FUNCTION_RENAMES
        .iter()
        .find(|(from, _)| ident.value.eq_ignore_ascii_case(from))
    else {
        return;
    };
    func.name = ObjectName::from(vec![Ident::new(*target)]);
}

/// `CONVERT(type, expr)` → `CAST(expr AS type)`. Style arguments have no
/// Snowflake equivalent, so those calls are left alone.
fn convert_to_cast(expr: &Expr) -> Option<Expr> {
    let Expr::Convert {
        is_try,
        expr: inner,
        data_type: Some(data_type),
        charset: None,
        styles,
        ..
    } = expr
    else {
        return None;
    };
    if !styles.is_empty() {
        return None;
    }

    let kind = if *is_try {
        CastKind::TryCast
    } else {
        CastKind::Cast
    };
    Some(Expr::Cast {
        kind,
        expr: inner.clone(),
        data_type: data_type.clone(),
        array: false,
        format: None,
    })
}

/// `SELECT TOP n ...` → `SELECT ... LIMIT n`
fn top_to_limit(query: &mut Query) {
    if query.limit_clause.is_some() || query.fetch.is_some() {
        return;
    }
    let SetExpr::Select(select) = query.body.as_mut() else {
        return;
    };
    let Some(top) = &select.top else {
        return;
    };
    if top.percent || top.with_ties {
        return;
    }
    let limit = match &top.quantity {
        Some(TopQuantity::Expr(expr)) => expr.clone(),
        Some(TopQuantity::Constant(n)) => Expr::value(Value::Number(n.to_string(), false)),
        None => return,
    };

    select.top = None;
    query.limit_clause = Some(LimitClause::LimitOffset {
        limit: Some(limit),
        offset: None,
        limit_by: vec![],
    });
}

#[cfg(test)]
#[path = "transpile_test.rs"]
mod tests;
