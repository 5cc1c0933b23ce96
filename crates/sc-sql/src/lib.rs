//! sc-sql - SQL layer for samconv
//!
//! T-SQL parsing with sqlparser-rs, table reference extraction over the AST,
//! and T-SQL to Snowflake transpilation.

pub mod dialect;
pub mod error;
pub mod extractor;
pub mod parser;
pub mod transpile;

pub use dialect::{SqlDialect, TsqlDialect};
pub use error::{SqlError, SqlResult};
pub use extractor::{extract_table_refs, extract_table_refs_from_sql};
pub use parser::SqlParser;
pub use transpile::{transpiler_for, Transpiler, TsqlToSnowflake};
