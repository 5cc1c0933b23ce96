//! Split each model's table references into model refs and external sources.
//!
//! A reference is a ref when its table name (legacy suffix stripped, case
//! ignored) names another model in the same batch and the batch agrees on
//! where that model lives. Qualified references that disagree with each other
//! about a model's `(database, schema)` are all treated as sources: ambiguous
//! evidence never turns into a ref.

use crate::conversion::{CategorizedRefs, ConversionResult};
use crate::model_name::ModelName;
use crate::naming::strip_legacy_suffix;
use crate::table_ref::TableRef;
use std::collections::{BTreeSet, HashMap};

/// Lowercased model name → originally-cased model name.
pub type ModelLookup = HashMap<String, ModelName>;

/// Match key → distinct lowercased `(database, schema)` pairs seen across the batch.
pub type QualificationMap = HashMap<String, BTreeSet<(String, String)>>;

/// Classify the references of every result.
///
/// Returns one [`CategorizedRefs`] per input, in input order. Reference order
/// is preserved in both `refs` and `sources`; `refs` is not de-duplicated.
pub fn categorize_refs(results: &[ConversionResult]) -> Vec<CategorizedRefs> {
    let models = build_model_lookup(results);
    let qualifications = build_qualification_map(results, &models);

    results
        .iter()
        .map(|result| categorize_result(result, &models, &qualifications))
        .collect()
}

/// Index model names case-insensitively. On a collision the last result wins.
pub fn build_model_lookup(results: &[ConversionResult]) -> ModelLookup {
    let mut models = ModelLookup::with_capacity(results.len());
    for result in results {
        let key = result.model_name.lowercased();
        if let Some(previous) = models.insert(key, result.model_name.clone()) {
            log::warn!(
                "Model name '{}' collides with '{}' after lowercasing; using '{}'",
                result.model_name,
                previous,
                result.model_name
            );
        }
    }
    models
}

/// Record, per model, every `(database, schema)` it was referenced under.
pub fn build_qualification_map(
    results: &[ConversionResult],
    models: &ModelLookup,
) -> QualificationMap {
    let mut map = QualificationMap::new();
    for table_ref in results.iter().flat_map(|r| &r.table_refs) {
        if !table_ref.is_qualified() {
            continue;
        }
        let key = table_ref.match_key();
        if models.contains_key(&key) {
            map.entry(key)
                .or_default()
                .insert(table_ref.qualification());
        }
    }
    map
}

/// How a single reference was classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefKind {
    /// Points at another model in the batch
    Model(ModelName),
    /// External table
    Source,
}

/// Classify one reference made from `current` (lowercased match key of the
/// referencing model).
pub fn classify_ref(
    table_ref: &TableRef,
    current: &str,
    models: &ModelLookup,
    qualifications: &QualificationMap,
) -> RefKind {
    let key = table_ref.match_key();
    let Some(model) = models.get(&key) else {
        return RefKind::Source;
    };
    if key == current {
        return RefKind::Source;
    }
    if !table_ref.is_qualified() {
        return RefKind::Model(model.clone());
    }

    match qualifications.get(&key) {
        None => RefKind::Model(model.clone()),
        Some(seen) if seen.is_empty() => RefKind::Model(model.clone()),
        Some(seen) if seen.len() == 1 && seen.contains(&table_ref.qualification()) => {
            RefKind::Model(model.clone())
        }
        Some(seen) => {
            log::debug!(
                "'{}' is qualified {} different ways; treating {} as a source",
                model,
                seen.len(),
                table_ref
            );
            RefKind::Source
        }
    }
}

fn categorize_result(
    result: &ConversionResult,
    models: &ModelLookup,
    qualifications: &QualificationMap,
) -> CategorizedRefs {
    let current = strip_legacy_suffix(result.model_name.as_str()).to_lowercase();
    let mut categorized =
        CategorizedRefs::new(result.model_name.clone(), result.output_path.clone());

    for table_ref in &result.table_refs {
        match classify_ref(table_ref, &current, models, qualifications) {
            RefKind::Model(model) => categorized.refs.push(model),
            RefKind::Source => categorized.sources.push(table_ref.clone()),
        }
    }

    categorized
}

#[cfg(test)]
#[path = "categorize_test.rs"]
mod tests;
