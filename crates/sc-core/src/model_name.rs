//! Strongly-typed model and source group names.

use crate::newtype_string::define_newtype_string;

define_newtype_string! {
    /// Canonical name of a generated dbt model.
    ///
    /// Derived from the input filename stem (see
    /// [`derive_model_name`](crate::naming::derive_model_name)) and kept in its
    /// original casing; comparisons that must ignore case go through
    /// [`lowercased`](ModelName::lowercased).
    pub struct ModelName;
}

define_newtype_string! {
    /// Name of a dbt source group, e.g. `healthcatalyst_raw`.
    pub struct SourceName;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_model_name_try_new_rejects_empty() {
        assert!(ModelName::try_new("").is_none());
        assert_eq!(ModelName::try_new("PatientSpell").unwrap(), "PatientSpell");
    }

    #[test]
    fn test_model_name_lowercased_keeps_original() {
        let name = ModelName::new("PatientSpell");
        assert_eq!(name.lowercased(), "patientspell");
        assert_eq!(name.as_str(), "PatientSpell");
    }

    #[test]
    fn test_model_name_borrow_lookup() {
        let mut map: HashMap<ModelName, usize> = HashMap::new();
        map.insert(ModelName::new("stg_orders"), 1);
        assert_eq!(map.get("stg_orders"), Some(&1));
    }

    #[test]
    fn test_model_name_serde_rejects_empty() {
        let ok: ModelName = serde_yaml::from_str("model_a").unwrap();
        assert_eq!(ok, "model_a");
        let err = serde_yaml::from_str::<ModelName>("''");
        assert!(err.is_err());
    }

    #[test]
    fn test_source_name_display() {
        let name = SourceName::new("healthcatalyst_raw");
        assert_eq!(format!("{}", name), "healthcatalyst_raw");
    }
}
