//! Rewrite converted SQL so table names become dbt `ref()` and `source()` calls.
//!
//! Rewriting works on the transpiled text, not on a re-parsed tree, so the
//! transpiler's formatting survives untouched. Matches must be whole
//! identifiers: a match touching an identifier character or a `.` on either
//! side is skipped, and nothing inside an existing `{{ ... }}` placeholder is
//! rewritten twice.
//!
//! Occurrences inside string literals and comments are not told apart from
//! real table references.

use crate::error::{InjectError, InjectResult};
use crate::macros::{ref_macro, source_macro};
use regex::{Regex, RegexBuilder};
use sc_core::naming::{emitted_table_name, LEGACY_SUFFIX};
use sc_core::{CanonicalNames, CategorizedRefs, TableRef};
use std::collections::HashSet;
use std::ops::Range;
use std::sync::OnceLock;

/// One qualifier part: a double-quoted or plain identifier
const QUALIFIER: &str = r#"(?:"[^"]+"|[A-Za-z_][A-Za-z0-9_$]*)"#;

/// Counts reported after a batch is injected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InjectSummary {
    /// Files read, rewritten, and written back
    pub files_rewritten: usize,
    /// Files skipped because they were not on disk
    pub files_missing: usize,
    /// `ref()` placeholders written
    pub ref_substitutions: usize,
    /// `source()` placeholders written
    pub source_substitutions: usize,
}

/// Rewritten text of one model plus what changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Injected {
    /// SQL with placeholders
    pub sql: String,
    /// `ref()` placeholders written
    pub ref_substitutions: usize,
    /// `source()` placeholders written
    pub source_substitutions: usize,
}

/// Rewrite every model's output file in place.
///
/// Canonical source names are resolved once over the whole batch before any
/// file is touched. A missing output file is logged and skipped; other I/O
/// failures abort.
pub fn inject_dbt_macros(categorized: &[CategorizedRefs]) -> InjectResult<InjectSummary> {
    let canonical = CanonicalNames::build(categorized);
    let mut summary = InjectSummary::default();

    for model in categorized {
        let path = &model.output_path;
        let sql = match std::fs::read_to_string(path) {
            Ok(sql) => sql,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!(
                    "Output file for model '{}' not found: {}",
                    model.model_name,
                    path.display()
                );
                summary.files_missing += 1;
                continue;
            }
            Err(e) => {
                return Err(InjectError::Read {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };

        let injected = inject_into_sql(&sql, model, &canonical)?;
        std::fs::write(path, &injected.sql).map_err(|e| InjectError::Write {
            path: path.display().to_string(),
            source: e,
        })?;

        log::debug!(
            "Injected {} ref(s) and {} source(s) into {}",
            injected.ref_substitutions,
            injected.source_substitutions,
            path.display()
        );
        summary.files_rewritten += 1;
        summary.ref_substitutions += injected.ref_substitutions;
        summary.source_substitutions += injected.source_substitutions;
    }

    Ok(summary)
}

/// Rewrite one model's SQL text. Refs are placed before sources.
pub fn inject_into_sql(
    sql: &str,
    model: &CategorizedRefs,
    canonical: &CanonicalNames,
) -> InjectResult<Injected> {
    let mut injected = Injected {
        sql: sql.to_string(),
        ref_substitutions: 0,
        source_substitutions: 0,
    };

    let mut seen_refs = HashSet::new();
    for ref_model in &model.refs {
        if !seen_refs.insert(ref_model.lowercased()) {
            continue;
        }
        let replacement = ref_macro(ref_model.as_str());
        let suffixed = format!("{}{}", ref_model, LEGACY_SUFFIX);
        let same_table_sources: Vec<&TableRef> = model
            .sources
            .iter()
            .filter(|s| s.is_qualified() && s.match_key() == ref_model.lowercased())
            .collect();

        for name in [ref_model.as_str(), suffixed.as_str()] {
            for pattern in ref_patterns(name) {
                let re = compile(&pattern, name)?;
                let (sql, count) = replace_standalone(&injected.sql, &re, &replacement, |found| {
                    !names_declared_source(found, &same_table_sources)
                });
                injected.sql = sql;
                injected.ref_substitutions += count;
            }
        }
    }

    let mut seen_sources = HashSet::new();
    for source in &model.sources {
        if !seen_sources.insert(source) {
            continue;
        }
        let table = emitted_table_name(canonical.resolve(source));
        let replacement = source_macro(&source.source_name(), &table);

        for pattern in source_patterns(source) {
            let re = compile(&pattern, &source.table)?;
            let (sql, count) = replace_standalone(&injected.sql, &re, &replacement, |_| true);
            if count > 0 {
                injected.sql = sql;
                injected.source_substitutions += count;
                break;
            }
        }
    }

    Ok(injected)
}

/// Three-part, two-part, then bare patterns for a model name
fn ref_patterns(name: &str) -> [String; 3] {
    let name = identifier(name);
    [
        format!(r"{QUALIFIER}\.{QUALIFIER}\.{name}"),
        format!(r"{QUALIFIER}\.{name}"),
        name,
    ]
}

/// Most specific first: `db.schema.table`, `schema.table`, `table`.
/// Forms the reference does not carry are left out.
fn source_patterns(source: &TableRef) -> Vec<String> {
    let table = identifier(&source.table);
    let mut patterns = Vec::with_capacity(3);
    if !source.database.is_empty() && !source.schema.is_empty() {
        patterns.push(format!(
            r"{}\.{}\.{table}",
            identifier(&source.database),
            identifier(&source.schema)
        ));
    }
    if !source.schema.is_empty() {
        patterns.push(format!(r"{}\.{table}", identifier(&source.schema)));
    }
    patterns.push(table);
    patterns
}

/// A literal name, bare or double-quoted
fn identifier(name: &str) -> String {
    let escaped = regex::escape(name);
    format!(r#"(?:"{escaped}"|{escaped})"#)
}

fn compile(pattern: &str, name: &str) -> InjectResult<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| InjectError::Pattern {
            name: name.to_string(),
            source: e,
        })
}

/// Whether a qualified ref occurrence carries the location of one of the
/// model's own sources for the same table. Those occurrences are left for the
/// source pass.
fn names_declared_source(found: &str, sources: &[&TableRef]) -> bool {
    let parts: Vec<String> = found
        .split('.')
        .map(|p| p.trim_matches('"').to_lowercase())
        .collect();
    let (database, schema) = match parts.as_slice() {
        [database, schema, _] => (database.as_str(), schema.as_str()),
        [schema, _] => ("", schema.as_str()),
        _ => return false,
    };
    sources.iter().any(|source| {
        let (source_database, source_schema) = source.qualification();
        source_schema == schema && (database.is_empty() || source_database == database)
    })
}

/// Replace every standalone match of `re` outside existing placeholders that
/// `accept` agrees to.
fn replace_standalone(
    text: &str,
    re: &Regex,
    replacement: &str,
    accept: impl Fn(&str) -> bool,
) -> (String, usize) {
    let protected = placeholder_spans(text);
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut pos = 0;
    let mut count = 0;

    while pos <= text.len() {
        let Some(m) = re.find_at(text, pos) else {
            break;
        };
        let inside_placeholder = protected
            .iter()
            .any(|span| m.start() < span.end && span.start < m.end());

        if inside_placeholder || !is_standalone(text, m.range()) || !accept(m.as_str()) {
            pos = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
            continue;
        }

        out.push_str(&text[copied..m.start()]);
        out.push_str(replacement);
        copied = m.end();
        pos = m.end();
        count += 1;
    }

    out.push_str(&text[copied..]);
    (out, count)
}

fn placeholder_spans(text: &str) -> Vec<Range<usize>> {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let re = PLACEHOLDER
        .get_or_init(|| Regex::new(r"(?s)\{\{.*?\}\}").expect("valid regex literal"));
    re.find_iter(text).map(|m| m.range()).collect()
}

fn is_standalone(text: &str, range: Range<usize>) -> bool {
    let before = text[..range.start].chars().next_back();
    let after = text[range.end..].chars().next();
    !before.is_some_and(joins_identifier) && !after.is_some_and(joins_identifier)
}

fn joins_identifier(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '$' | '#' | '@' | '.')
}

#[cfg(test)]
#[path = "inject_test.rs"]
mod tests;
