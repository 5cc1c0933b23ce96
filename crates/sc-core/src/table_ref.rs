//! Three-part table references extracted from SQL.

use crate::naming::{source_name, strip_legacy_suffix};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A table reference as written in the source SQL: `database.schema.table`.
///
/// An empty string means the reference was unqualified at that level.
/// Equality is structural and case-sensitive; algorithms that need
/// case-insensitive matching lowercase explicitly through
/// [`match_key`](TableRef::match_key) and
/// [`qualification`](TableRef::qualification).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableRef {
    /// Database (catalog) name, empty when absent
    #[serde(default)]
    pub database: String,

    /// Schema name, empty when absent
    #[serde(default)]
    pub schema: String,

    /// Table name
    pub table: String,
}

impl TableRef {
    /// Create a reference from its three parts
    pub fn new(
        database: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            database: database.into(),
            schema: schema.into(),
            table: table.into(),
        }
    }

    /// Create a bare (unqualified) reference
    pub fn bare(table: impl Into<String>) -> Self {
        Self::new("", "", table)
    }

    /// True when a database or a schema is present
    pub fn is_qualified(&self) -> bool {
        !self.database.is_empty() || !self.schema.is_empty()
    }

    /// True when either the database or the schema is missing
    pub fn is_incomplete(&self) -> bool {
        self.database.is_empty() || self.schema.is_empty()
    }

    /// Key used to match this reference against model names: the table with
    /// the legacy suffix stripped, lowercased.
    pub fn match_key(&self) -> String {
        strip_legacy_suffix(&self.table).to_lowercase()
    }

    /// Lowercased `(database, schema)` pair.
    pub fn qualification(&self) -> (String, String) {
        (self.database.to_lowercase(), self.schema.to_lowercase())
    }

    /// dbt source group name for this reference's location.
    pub fn source_name(&self) -> String {
        source_name(&self.database, &self.schema)
    }
}

impl fmt::Display for TableRef {
    /// Dotted form with missing parts shown as `?`, e.g. `?.raw.orders`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let or_unknown = |s: &str| if s.is_empty() { "?".to_string() } else { s.to_string() };
        write!(
            f,
            "{}.{}.{}",
            or_unknown(&self.database),
            or_unknown(&self.schema),
            self.table
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_structural_equality_is_case_sensitive() {
        let a = TableRef::new("db", "raw", "Patients");
        let b = TableRef::new("db", "raw", "Patients");
        let c = TableRef::new("DB", "raw", "Patients");
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<TableRef> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_match_key_strips_suffix_and_lowercases() {
        assert_eq!(TableRef::bare("PatientBASE").match_key(), "patient");
        assert_eq!(TableRef::bare("Patientbase").match_key(), "patientbase");
        assert_eq!(TableRef::new("SAM", "dbo", "Model_B").match_key(), "model_b");
    }

    #[test]
    fn test_qualification() {
        let r = TableRef::new("SAM", "Dbo", "x");
        assert_eq!(r.qualification(), ("sam".to_string(), "dbo".to_string()));
        assert!(r.is_qualified());
        assert!(!r.is_incomplete());

        let schema_only = TableRef::new("", "raw", "x");
        assert!(schema_only.is_qualified());
        assert!(schema_only.is_incomplete());

        assert!(!TableRef::bare("x").is_qualified());
    }

    #[test]
    fn test_display() {
        assert_eq!(TableRef::new("db", "raw", "t").to_string(), "db.raw.t");
        assert_eq!(TableRef::new("", "raw", "t").to_string(), "?.raw.t");
        assert_eq!(TableRef::bare("t").to_string(), "?.?.t");
    }

    #[test]
    fn test_source_name() {
        assert_eq!(
            TableRef::new("HealthCatalyst", "raw", "Patients").source_name(),
            "healthcatalyst_raw"
        );
        assert_eq!(TableRef::bare("t").source_name(), "unknown_source");
    }
}
