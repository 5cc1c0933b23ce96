use super::*;

fn transpile(sql: &str) -> String {
    TsqlToSnowflake::new().transpile(sql).unwrap()
}

/// Collapse pretty-printing whitespace so assertions don't depend on layout
fn flat(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[test]
fn test_isnull_to_coalesce() {
    let result = transpile("SELECT ISNULL(col, 'default') FROM t");
    assert!(result.contains("COALESCE"));
    assert!(!result.contains("ISNULL"));
}

#[test]
fn test_getdate_to_current_timestamp() {
    let result = transpile("SELECT GETDATE() AS now");
    assert!(result.contains("CURRENT_TIMESTAMP()"));
    assert!(!result.contains("GETDATE"));
}

#[test]
fn test_function_renames_ignore_case() {
    let result = transpile("SELECT len(name), getutcdate(), NewId() FROM t");
    assert!(result.contains("LENGTH(name)"));
    assert!(result.contains("SYSDATE()"));
    assert!(result.contains("UUID_STRING()"));
}

#[test]
fn test_other_functions_untouched() {
    let result = transpile("SELECT DATEADD(DAY, 1, col) FROM t");
    assert!(result.contains("DATEADD"));
}

#[test]
fn test_top_to_limit() {
    let result = flat(&transpile("SELECT TOP 10 * FROM t"));
    assert!(result.contains("LIMIT 10"), "{result}");
    assert!(!result.contains("TOP"));
}

#[test]
fn test_top_with_order_by() {
    let result = flat(&transpile("SELECT TOP (5) id FROM t ORDER BY id DESC"));
    assert!(result.contains("ORDER BY id DESC LIMIT 5"), "{result}");
}

#[test]
fn test_top_percent_kept() {
    let result = transpile("SELECT TOP 10 PERCENT * FROM t");
    assert!(result.contains("TOP"));
    assert!(!result.contains("LIMIT"));
}

#[test]
fn test_top_in_subquery() {
    let result = flat(&transpile(
        "SELECT * FROM (SELECT TOP 3 id FROM t ORDER BY id) sub",
    ));
    assert!(result.contains("LIMIT 3"), "{result}");
    assert!(!result.contains("TOP"));
}

#[test]
fn test_square_brackets_removed() {
    let result = transpile("SELECT [column_a] FROM [sch].[tbl]");
    assert!(!result.contains('['));
    assert!(!result.contains(']'));
    assert!(result.contains("sch.tbl"));
}

#[test]
fn test_bracketed_names_needing_quotes() {
    let result = transpile("SELECT [Patient Name], [Order] FROM [dbo].[Visits]");
    assert!(result.contains("\"Patient Name\""));
    assert!(result.contains("\"Order\""));
    assert!(result.contains("dbo.Visits"));
}

#[test]
fn test_convert_to_cast() {
    let result = transpile("SELECT CONVERT(VARCHAR(50), col) FROM t");
    assert!(result.contains("CAST(col AS VARCHAR(50))"), "{result}");
    assert!(!result.contains("CONVERT"));
}

#[test]
fn test_try_convert_to_try_cast() {
    let result = transpile("SELECT TRY_CONVERT(INT, col) FROM t");
    assert!(result.contains("TRY_CAST(col AS INT)"), "{result}");
}

#[test]
fn test_convert_with_style_kept() {
    let result = transpile("SELECT CONVERT(VARCHAR(10), created_at, 120) FROM t");
    assert!(result.contains("CONVERT"));
}

#[test]
fn test_qualified_names_survive() {
    let result = transpile("SELECT p.id FROM SAM.dbo.PatientBASE AS p");
    assert!(result.contains("SAM.dbo.PatientBASE"));
}

#[test]
fn test_multiple_statements_joined() {
    let result = transpile("SELECT 1; SELECT 2");
    assert_eq!(result.matches(";\n").count(), 1);
}

#[test]
fn test_empty_input() {
    let result = TsqlToSnowflake::new().transpile("   ");
    assert!(matches!(result, Err(SqlError::EmptySql)));
}

#[test]
fn test_parse_failure_propagates() {
    let result = TsqlToSnowflake::new().transpile("SELECT FROM WHERE (");
    assert!(matches!(result, Err(SqlError::ParseError { .. })));
}

#[test]
fn test_transpiler_for() {
    let transpiler = transpiler_for("tsql", "snowflake").unwrap();
    assert_eq!(
        transpiler.transpile("SELECT ISNULL(a, 0) FROM t").unwrap(),
        TsqlToSnowflake::new()
            .transpile("SELECT ISNULL(a, 0) FROM t")
            .unwrap()
    );

    assert!(transpiler_for("TSQL", "Snowflake").is_ok());
    assert!(matches!(
        transpiler_for("snowflake", "tsql"),
        Err(SqlError::UnsupportedDialectPair { .. })
    ));
}

#[test]
fn test_reserved_words_sorted() {
    assert!(SNOWFLAKE_RESERVED.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_needs_quotes() {
    assert!(!needs_quotes("PatientID"));
    assert!(!needs_quotes("_col$1"));
    assert!(needs_quotes("Patient Name"));
    assert!(needs_quotes("1stVisit"));
    assert!(needs_quotes("order"));
    assert!(needs_quotes(""));
}
