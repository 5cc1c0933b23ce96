//! Canonical source table names.
//!
//! Legacy pipelines often expose both `PatientBASE` and `Patient` in the same
//! schema. When both show up as sources they collapse onto the unsuffixed
//! table, whose casing wins. The map is built once per batch, before any file
//! is rewritten, so a suffixed table seen in one file and its unsuffixed
//! sibling seen only in another still resolve to the same name.

use crate::conversion::CategorizedRefs;
use crate::naming::{has_legacy_suffix, strip_legacy_suffix};
use crate::table_ref::TableRef;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Lowercased `(database, schema)` used to group sources by location.
type Location = (String, String);

/// Where one raw table name resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
struct Resolved {
    /// Name placeholders and `sources.yml` are derived from
    name: String,
    /// Table actually observed in the batch that the name stands for
    physical: String,
}

/// Raw table name → canonical table name, per location.
#[derive(Debug, Clone, Default)]
pub struct CanonicalNames {
    locations: HashMap<Location, HashMap<String, Resolved>>,
}

impl CanonicalNames {
    /// Resolve canonical names for every source in the batch.
    pub fn build(categorized: &[CategorizedRefs]) -> Self {
        Self::from_sources(categorized.iter().flat_map(|c| &c.sources))
    }

    /// Resolve canonical names for an arbitrary set of sources.
    pub fn from_sources<'a>(sources: impl IntoIterator<Item = &'a TableRef>) -> Self {
        let mut grouped: BTreeMap<Location, BTreeSet<&'a str>> = BTreeMap::new();
        for source in sources {
            grouped
                .entry(source.qualification())
                .or_default()
                .insert(source.table.as_str());
        }

        let locations = grouped
            .into_iter()
            .map(|(location, tables)| (location, resolve_location(&tables)))
            .collect();

        Self { locations }
    }

    /// Canonical table name for `source`.
    ///
    /// Falls back to the source's own table with the legacy suffix stripped
    /// when the source was not part of the batch the map was built from.
    pub fn resolve<'a>(&'a self, source: &'a TableRef) -> &'a str {
        self.lookup(source)
            .map(|r| r.name.as_str())
            .unwrap_or_else(|| strip_legacy_suffix(&source.table))
    }

    /// Physical table behind the canonical name of `source`.
    ///
    /// This is the unsuffixed sibling when one was observed in the same
    /// location, otherwise the source's own table. A suffixed table with no
    /// sibling therefore keeps its suffixed physical name even though its
    /// canonical name is stripped.
    pub fn physical<'a>(&'a self, source: &'a TableRef) -> &'a str {
        self.lookup(source)
            .map(|r| r.physical.as_str())
            .unwrap_or(&source.table)
    }

    fn lookup(&self, source: &TableRef) -> Option<&Resolved> {
        self.locations
            .get(&source.qualification())
            .and_then(|tables| tables.get(&source.table))
    }

    /// Number of locations in the map
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// True when no sources were seen
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

/// Map every table in one location to its canonical name.
///
/// Unsuffixed tables map to themselves. A suffixed table maps to an
/// unsuffixed sibling that matches it case-insensitively after stripping
/// (the lexicographically first one if several casings exist), otherwise to
/// its own stripped form.
fn resolve_location(tables: &BTreeSet<&str>) -> HashMap<String, Resolved> {
    let mut real_tables: HashMap<String, &str> = HashMap::new();
    for &table in tables.iter().filter(|t| !has_legacy_suffix(t)) {
        real_tables.entry(table.to_lowercase()).or_insert(table);
    }

    tables
        .iter()
        .map(|&table| {
            let resolved = if !has_legacy_suffix(table) {
                Resolved {
                    name: table.to_string(),
                    physical: table.to_string(),
                }
            } else {
                let stripped = strip_legacy_suffix(table);
                match real_tables.get(&stripped.to_lowercase()) {
                    Some(&real) => Resolved {
                        name: real.to_string(),
                        physical: real.to_string(),
                    },
                    None => Resolved {
                        name: stripped.to_string(),
                        physical: table.to_string(),
                    },
                }
            };
            (table.to_string(), resolved)
        })
        .collect()
}
