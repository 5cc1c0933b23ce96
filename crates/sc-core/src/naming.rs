//! Naming rules shared by the converter, the classifier, and the injector.
//!
//! Legacy SAM Designer output appends an all-caps `BASE` marker to some table
//! and file names. These helpers strip that marker, derive model names from
//! filename stems, and convert mixed-case identifiers to the lowercase,
//! underscore-separated form used in dbt.

/// Marker appended to legacy "base" table names.
pub const LEGACY_SUFFIX: &str = "BASE";

/// Source group name used when a table carries no database or schema.
pub const UNKNOWN_SOURCE_NAME: &str = "unknown_source";

/// Strip a trailing [`LEGACY_SUFFIX`] from `name`.
///
/// Only the exact uppercase marker at the very end of the name is removed, and
/// only when something remains in front of it:
///
/// ```
/// use sc_core::naming::strip_legacy_suffix;
/// assert_eq!(strip_legacy_suffix("PopulationSpellBASE"), "PopulationSpell");
/// assert_eq!(strip_legacy_suffix("PopulationSpellbase"), "PopulationSpellbase");
/// assert_eq!(strip_legacy_suffix("BASEPopulation"), "BASEPopulation");
/// assert_eq!(strip_legacy_suffix("BASE"), "BASE");
/// ```
pub fn strip_legacy_suffix(name: &str) -> &str {
    match name.strip_suffix(LEGACY_SUFFIX) {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => name,
    }
}

/// Whether `name` ends with the legacy marker (and has a name in front of it).
pub fn has_legacy_suffix(name: &str) -> bool {
    strip_legacy_suffix(name).len() != name.len()
}

/// Convert a PascalCase / camelCase / acronym-mixed identifier to
/// lowercase-with-underscores.
///
/// A separator goes before an uppercase letter that starts a lowercase run
/// (`PatientData` → `patient_data`, `HTTPServer` → `http_server`) and between
/// a lowercase letter or digit and a following uppercase letter
/// (`Patient2Data` → `patient2_data`). Existing underscores are never doubled.
/// The function is idempotent.
///
/// ```
/// use sc_core::naming::to_identifier_case;
/// assert_eq!(to_identifier_case("HTTPServer"), "http_server");
/// assert_eq!(to_identifier_case("already_snake"), "already_snake");
/// ```
pub fn to_identifier_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            let prev = chars[i - 1];
            let starts_word = chars
                .get(i + 1)
                .is_some_and(|next| next.is_ascii_lowercase())
                && prev != '_';
            let after_lower_or_digit = prev.is_ascii_lowercase() || prev.is_ascii_digit();
            if starts_word || after_lower_or_digit {
                out.push('_');
            }
        }
        out.push(c);
    }

    out.to_lowercase()
}

/// Whether `name` mixes upper- and lower-case letters.
///
/// `MyTable` and `My_Table` are mixed; `mytable` and `MY_TABLE` are not.
pub fn is_mixed_case(name: &str) -> bool {
    name.chars().any(char::is_uppercase) && name.chars().any(char::is_lowercase)
}

/// Derive the canonical model name from a filename stem.
///
/// Stems may encode a fully qualified source path (`db.schema.TableName`);
/// only the last dot-separated segment is kept, then the legacy suffix is
/// stripped. Casing is preserved.
///
/// ```
/// use sc_core::naming::derive_model_name;
/// assert_eq!(derive_model_name("SAM.dbo.PatientSpellBASE"), "PatientSpell");
/// assert_eq!(derive_model_name("stg_orders"), "stg_orders");
/// ```
pub fn derive_model_name(filename_stem: &str) -> &str {
    let last = filename_stem.rsplit('.').next().unwrap_or(filename_stem);
    strip_legacy_suffix(last)
}

/// Build a dbt source group name from a database and schema.
///
/// Non-empty parts are joined with `_` and lowercased; with neither part
/// present the result is [`UNKNOWN_SOURCE_NAME`].
pub fn source_name(database: &str, schema: &str) -> String {
    let parts: Vec<&str> = [database, schema]
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        UNKNOWN_SOURCE_NAME.to_string()
    } else {
        parts.join("_").to_lowercase()
    }
}

/// Table name as emitted into `source()` placeholders and `sources.yml`.
///
/// Mixed-case names are lowercased (`PatientData` → `patientdata`); all-lower
/// and all-upper names are kept as they are.
pub fn emitted_table_name(canonical: &str) -> String {
    if is_mixed_case(canonical) {
        canonical.to_lowercase()
    } else {
        canonical.to_string()
    }
}

#[cfg(test)]
#[path = "naming_test.rs"]
mod tests;
