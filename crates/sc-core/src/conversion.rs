//! Per-file conversion results and their classified references.

use crate::model_name::ModelName;
use crate::table_ref::TableRef;
use std::path::PathBuf;

/// Outcome of converting one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    /// Canonical model name derived from the input filename
    pub model_name: ModelName,

    /// Where the converted SQL was written
    pub output_path: PathBuf,

    /// Table references in first-seen order, without structural duplicates
    pub table_refs: Vec<TableRef>,
}

impl ConversionResult {
    /// Create a result, dropping structural duplicates from `table_refs`
    /// while keeping first-seen order.
    pub fn new(model_name: ModelName, output_path: PathBuf, table_refs: Vec<TableRef>) -> Self {
        let mut unique: Vec<TableRef> = Vec::with_capacity(table_refs.len());
        for table_ref in table_refs {
            if !unique.contains(&table_ref) {
                unique.push(table_ref);
            }
        }
        Self {
            model_name,
            output_path,
            table_refs: unique,
        }
    }
}

/// References of one model split into model refs and external sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorizedRefs {
    /// Model these references belong to
    pub model_name: ModelName,

    /// Converted SQL file the injector rewrites
    pub output_path: PathBuf,

    /// Models this model depends on, in reference order (may repeat)
    pub refs: Vec<ModelName>,

    /// External tables, in reference order
    pub sources: Vec<TableRef>,
}

impl CategorizedRefs {
    /// Empty categorization for a model
    pub fn new(model_name: ModelName, output_path: PathBuf) -> Self {
        Self {
            model_name,
            output_path,
            refs: Vec::new(),
            sources: Vec::new(),
        }
    }
}
