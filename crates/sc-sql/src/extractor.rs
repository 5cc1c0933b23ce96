//! Table reference extraction from SQL AST

use crate::error::SqlError;
use crate::parser::SqlParser;
use sc_core::TableRef;
use sqlparser::ast::{visit_relations, ObjectName, Query, Statement, Visit, Visitor};
use std::collections::HashSet;
use std::ops::ControlFlow;

/// Extract the table references of parsed statements.
///
/// References are returned in first-seen order without duplicates. Names
/// defined as CTEs inside a statement are excluded from that statement's
/// references, whatever qualification they are written with.
pub fn extract_table_refs(statements: &[Statement]) -> Vec<TableRef> {
    let mut refs: Vec<TableRef> = Vec::new();
    let mut seen: HashSet<TableRef> = HashSet::new();

    for stmt in statements {
        let cte_names = collect_cte_names(stmt);

        let _ = visit_relations(stmt, |relation| {
            let Some(table_ref) = table_ref_from_name(relation) else {
                return ControlFlow::<()>::Continue(());
            };
            if cte_names.contains(&table_ref.table.to_lowercase()) {
                return ControlFlow::Continue(());
            }
            if table_ref.is_incomplete() {
                log::warn!("Incomplete table reference: {}", table_ref);
            }
            if seen.insert(table_ref.clone()) {
                refs.push(table_ref);
            }
            ControlFlow::Continue(())
        });
    }

    refs
}

/// Parse `sql` and extract its table references.
///
/// Extraction never fails the caller: a parse failure is logged and yields
/// no references.
pub fn extract_table_refs_from_sql(parser: &SqlParser, sql: &str) -> Vec<TableRef> {
    match parser.parse(sql) {
        Ok(statements) => extract_table_refs(&statements),
        Err(SqlError::EmptySql) => Vec::new(),
        Err(e) => {
            log::error!("Failed to parse SQL for table extraction: {}", e);
            Vec::new()
        }
    }
}

/// Lowercased names of every CTE defined anywhere in `stmt`
pub fn collect_cte_names(stmt: &Statement) -> HashSet<String> {
    let mut collector = CteCollector::default();
    let _ = stmt.visit(&mut collector);
    collector.names
}

#[derive(Default)]
struct CteCollector {
    names: HashSet<String>,
}

impl Visitor for CteCollector {
    type Break = ();

    fn pre_visit_query(&mut self, query: &Query) -> ControlFlow<Self::Break> {
        if let Some(with) = &query.with {
            for cte in &with.cte_tables {
                self.names.insert(cte.alias.name.value.to_lowercase());
            }
        }
        ControlFlow::Continue(())
    }
}

/// Build a reference from the last three parts of `name`.
///
/// Four-part linked-server names keep `database.schema.table`.
fn table_ref_from_name(name: &ObjectName) -> Option<TableRef> {
    let parts: Vec<&str> = name
        .0
        .iter()
        .filter_map(|p| p.as_ident())
        .map(|ident| ident.value.as_str())
        .collect();

    match parts.as_slice() {
        [] => None,
        [.., table] if table.is_empty() => None,
        [table] => Some(TableRef::bare(*table)),
        [schema, table] => Some(TableRef::new("", *schema, *table)),
        [.., database, schema, table] => Some(TableRef::new(*database, *schema, *table)),
    }
}

#[cfg(test)]
#[path = "extractor_test.rs"]
mod tests;
