//! dbt metadata documents: `sources.yml` and `model_refs.yml`.
//!
//! Sources are grouped by `(database, schema)`, compared case-insensitively,
//! and written in sorted order so repeated runs produce identical files.
//! Table entries use the same canonical, normalized names the macro injector
//! writes into `source()` placeholders.

use crate::canonical::CanonicalNames;
use crate::conversion::CategorizedRefs;
use crate::error::{CoreError, CoreResult};
use crate::model_name::{ModelName, SourceName};
use crate::naming::{emitted_table_name, source_name};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// dbt properties schema version written into every document
pub const DBT_SCHEMA_VERSION: u32 = 2;

/// Contents of `sources.yml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcesDocument {
    /// Schema version marker
    pub version: u32,

    /// Source groups sorted by location
    pub sources: Vec<SourceGroup>,
}

/// One dbt source group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceGroup {
    /// Group name, e.g. `healthcatalyst_raw`
    pub name: SourceName,

    /// Database, omitted when the references carried none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Schema, omitted when the references carried none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Tables sorted by name
    pub tables: Vec<SourceTable>,
}

/// A table within a source group
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceTable {
    /// Name used in `source()` calls
    pub name: String,

    /// Physical table name, present when it differs from `name`.
    ///
    /// A legacy-suffixed table with no unsuffixed sibling keeps its suffixed
    /// name here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

/// Contents of `model_refs.yml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRefsDocument {
    /// Schema version marker
    pub version: u32,

    /// Models with at least one dependency, in batch order
    pub model_refs: Vec<ModelRefEntry>,
}

/// Dependencies of one model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRefEntry {
    /// Dependent model
    pub model: ModelName,

    /// Models it depends on, sorted and de-duplicated
    pub depends_on: Vec<ModelName>,
}

/// Location accumulator used while grouping sources
#[derive(Default)]
struct GroupBuilder {
    database: String,
    schema: String,
    tables: BTreeSet<SourceTable>,
}

impl SourcesDocument {
    /// Group every source of the batch.
    pub fn from_categorized(categorized: &[CategorizedRefs], canonical: &CanonicalNames) -> Self {
        let mut groups: BTreeMap<(String, String), GroupBuilder> = BTreeMap::new();

        for source in categorized.iter().flat_map(|c| &c.sources) {
            let group = groups
                .entry(source.qualification())
                .or_insert_with(|| GroupBuilder {
                    database: source.database.clone(),
                    schema: source.schema.clone(),
                    tables: BTreeSet::new(),
                });

            let name = emitted_table_name(canonical.resolve(source));
            let physical = canonical.physical(source);
            let identifier = (name != physical).then(|| physical.to_string());
            group.tables.insert(SourceTable { name, identifier });
        }

        let sources = groups
            .into_values()
            .map(|group| SourceGroup {
                name: SourceName::new(source_name(&group.database, &group.schema)),
                database: non_empty(group.database),
                schema: non_empty(group.schema),
                tables: dedup_by_name(group.tables),
            })
            .collect();

        Self {
            version: DBT_SCHEMA_VERSION,
            sources,
        }
    }

    /// Groups missing a database or a schema
    pub fn incomplete_groups(&self) -> impl Iterator<Item = &SourceGroup> {
        self.sources
            .iter()
            .filter(|g| g.database.is_none() || g.schema.is_none())
    }

    /// Serialize and write the document atomically.
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        write_yaml(self, path)
    }
}

impl ModelRefsDocument {
    /// Collect model dependencies; `None` when no model has any refs.
    pub fn from_categorized(categorized: &[CategorizedRefs]) -> Option<Self> {
        let model_refs: Vec<ModelRefEntry> = categorized
            .iter()
            .filter(|c| !c.refs.is_empty())
            .map(|c| {
                let depends_on: BTreeSet<ModelName> = c.refs.iter().cloned().collect();
                ModelRefEntry {
                    model: c.model_name.clone(),
                    depends_on: depends_on.into_iter().collect(),
                }
            })
            .collect();

        if model_refs.is_empty() {
            None
        } else {
            Some(Self {
                version: DBT_SCHEMA_VERSION,
                model_refs,
            })
        }
    }

    /// Serialize and write the document atomically.
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        write_yaml(self, path)
    }
}

/// Build and write the sources document to `path`.
pub fn write_sources(
    categorized: &[CategorizedRefs],
    canonical: &CanonicalNames,
    path: &Path,
) -> CoreResult<SourcesDocument> {
    let document = SourcesDocument::from_categorized(categorized, canonical);
    document.save(path)?;
    log::info!("Wrote sources to {}", path.display());

    for group in document.incomplete_groups() {
        let tables: Vec<&str> = group.tables.iter().map(|t| t.name.as_str()).collect();
        log::warn!(
            "Incomplete source reference ({}.{}): {:?}",
            group.database.as_deref().unwrap_or("?"),
            group.schema.as_deref().unwrap_or("?"),
            tables
        );
    }

    Ok(document)
}

/// Build and write the refs document to `path`.
///
/// Nothing is written, and `None` returned, when no model has refs.
pub fn write_model_refs(
    categorized: &[CategorizedRefs],
    path: &Path,
) -> CoreResult<Option<ModelRefsDocument>> {
    let Some(document) = ModelRefsDocument::from_categorized(categorized) else {
        log::debug!("No model refs found; skipping {}", path.display());
        return Ok(None);
    };
    document.save(path)?;
    log::info!("Wrote model refs to {}", path.display());
    Ok(Some(document))
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Keep one entry per table name. Two physical casings that normalize to the
/// same name collapse onto the first in sort order.
fn dedup_by_name(tables: BTreeSet<SourceTable>) -> Vec<SourceTable> {
    let mut out: Vec<SourceTable> = Vec::with_capacity(tables.len());
    for table in tables {
        if out.last().is_some_and(|last| last.name == table.name) {
            log::warn!(
                "Source table '{}' appears under several identifiers; keeping {:?}",
                table.name,
                out.last().and_then(|last| last.identifier.as_deref())
            );
            continue;
        }
        out.push(table);
    }
    out
}

fn write_yaml<T: Serialize>(value: &T, path: &Path) -> CoreResult<()> {
    let yaml = serde_yaml::to_string(value)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CoreError::IoWithPath {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension(format!("yml.{}.tmp", std::process::id()));
    std::fs::write(&temp_path, &yaml).map_err(|e| CoreError::IoWithPath {
        path: temp_path.display().to_string(),
        source: e,
    })?;
    std::fs::rename(&temp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        }
    })?;
    Ok(())
}

#[cfg(test)]
#[path = "metadata_test.rs"]
mod tests;
