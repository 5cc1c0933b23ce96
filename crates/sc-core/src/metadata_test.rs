use super::*;
use crate::table_ref::TableRef;
use std::path::PathBuf;
use tempfile::TempDir;

fn categorized(model: &str, refs: &[&str], sources: Vec<TableRef>) -> CategorizedRefs {
    CategorizedRefs {
        model_name: ModelName::new(model),
        output_path: PathBuf::from(format!("{model}.sql")),
        refs: refs.iter().map(|r| ModelName::new(*r)).collect(),
        sources,
    }
}

fn sources_doc(batch: &[CategorizedRefs]) -> SourcesDocument {
    SourcesDocument::from_categorized(batch, &CanonicalNames::build(batch))
}

fn load_yaml(path: &Path) -> serde_yaml::Value {
    let content = std::fs::read_to_string(path).unwrap();
    serde_yaml::from_str(&content).unwrap()
}

#[test]
fn test_creates_sources_yml() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sources.yml");
    let batch = vec![categorized(
        "test",
        &[],
        vec![TableRef::new("db1", "schema1", "table1")],
    )];

    write_sources(&batch, &CanonicalNames::build(&batch), &path).unwrap();
    assert!(path.exists());

    let yaml = load_yaml(&path);
    assert_eq!(yaml["version"].as_u64(), Some(2));
    assert_eq!(yaml["sources"][0]["name"].as_str(), Some("db1_schema1"));
}

#[test]
fn test_groups_tables_by_source() {
    let batch = vec![
        categorized(
            "model1",
            &[],
            vec![
                TableRef::new("db1", "schema1", "table1"),
                TableRef::new("db1", "schema1", "table2"),
            ],
        ),
        categorized("model2", &[], vec![TableRef::new("db1", "schema1", "table3")]),
    ];

    let doc = sources_doc(&batch);
    assert_eq!(doc.version, 2);
    assert_eq!(doc.sources.len(), 1);

    let source = &doc.sources[0];
    assert_eq!(source.name, "db1_schema1");
    assert_eq!(source.database.as_deref(), Some("db1"));
    assert_eq!(source.schema.as_deref(), Some("schema1"));

    let names: Vec<&str> = source.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["table1", "table2", "table3"]);
}

#[test]
fn test_multiple_sources_sorted_by_location() {
    let batch = vec![categorized(
        "test",
        &[],
        vec![
            TableRef::new("db2", "schema2", "table2"),
            TableRef::new("db1", "schema1", "table1"),
        ],
    )];

    let doc = sources_doc(&batch);
    let names: Vec<&str> = doc.sources.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["db1_schema1", "db2_schema2"]);
}

#[test]
fn test_locations_differing_in_case_share_a_group() {
    let batch = vec![categorized(
        "test",
        &[],
        vec![
            TableRef::new("SAM", "dbo", "a"),
            TableRef::new("sam", "DBO", "b"),
        ],
    )];

    let doc = sources_doc(&batch);
    assert_eq!(doc.sources.len(), 1);
    assert_eq!(doc.sources[0].name, "sam_dbo");
    assert_eq!(doc.sources[0].database.as_deref(), Some("SAM"));
    assert_eq!(doc.sources[0].tables.len(), 2);
}

#[test]
fn test_incomplete_references() {
    let batch = vec![categorized(
        "test",
        &[],
        vec![
            TableRef::new("", "schema_only", "table1"),
            TableRef::bare("unqualified"),
        ],
    )];

    let doc = sources_doc(&batch);
    let names: Vec<&str> = doc.sources.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["unknown_source", "schema_only"]);
    assert_eq!(doc.incomplete_groups().count(), 2);
}

#[test]
fn test_no_database_or_schema_keys_when_empty() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sources.yml");
    let batch = vec![categorized("test", &[], vec![TableRef::bare("table1")])];

    write_sources(&batch, &CanonicalNames::build(&batch), &path).unwrap();

    let yaml = load_yaml(&path);
    let source = &yaml["sources"][0];
    assert!(source.get("database").is_none());
    assert!(source.get("schema").is_none());
}

#[test]
fn test_empty_sources() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sources.yml");
    let batch = vec![categorized("test", &[], vec![])];

    write_sources(&batch, &CanonicalNames::build(&batch), &path).unwrap();

    let doc: SourcesDocument = serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(doc.sources.is_empty());
}

#[test]
fn test_tables_sorted_and_deduplicated() {
    let batch = vec![
        categorized(
            "a",
            &[],
            vec![
                TableRef::new("db", "schema", "zebra"),
                TableRef::new("db", "schema", "alpha"),
            ],
        ),
        categorized(
            "b",
            &[],
            vec![
                TableRef::new("db", "schema", "middle"),
                TableRef::new("db", "schema", "alpha"),
            ],
        ),
    ];

    let doc = sources_doc(&batch);
    let names: Vec<&str> = doc.sources[0].tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "middle", "zebra"]);
}

#[test]
fn test_mixed_case_tables_get_identifier() {
    let batch = vec![categorized(
        "test",
        &[],
        vec![
            TableRef::new("db", "schema", "PatientData"),
            TableRef::new("db", "schema", "lowercase"),
            TableRef::new("db", "schema", "UPPERCASE"),
        ],
    )];

    let doc = sources_doc(&batch);
    let tables = &doc.sources[0].tables;

    let find = |name: &str| tables.iter().find(|t| t.name == name).unwrap();
    assert_eq!(find("patientdata").identifier.as_deref(), Some("PatientData"));
    assert_eq!(find("lowercase").identifier, None);
    assert_eq!(find("UPPERCASE").identifier, None);
}

#[test]
fn test_legacy_suffix_sources_collapse() {
    let batch = vec![
        categorized("a", &[], vec![TableRef::new("SAM", "dbo", "PatientBASE")]),
        categorized("b", &[], vec![TableRef::new("SAM", "dbo", "Patient")]),
    ];

    let doc = sources_doc(&batch);
    assert_eq!(
        doc.sources[0].tables,
        vec![SourceTable {
            name: "patient".to_string(),
            identifier: Some("Patient".to_string()),
        }]
    );
}

#[test]
fn test_suffixed_table_without_sibling_keeps_physical_identifier() {
    let batch = vec![categorized(
        "a",
        &[],
        vec![
            TableRef::new("SAM", "dbo", "PatientBASE"),
            TableRef::new("SAM", "dbo", "ENCOUNTERBASE"),
        ],
    )];

    let doc = sources_doc(&batch);
    assert_eq!(
        doc.sources[0].tables,
        vec![
            SourceTable {
                name: "ENCOUNTER".to_string(),
                identifier: Some("ENCOUNTERBASE".to_string()),
            },
            SourceTable {
                name: "patient".to_string(),
                identifier: Some("PatientBASE".to_string()),
            },
        ]
    );
}

#[test]
fn test_identifier_omitted_from_yaml_when_absent() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sources.yml");
    let batch = vec![categorized(
        "test",
        &[],
        vec![
            TableRef::new("db", "schema", "PatientData"),
            TableRef::new("db", "schema", "lowercase"),
        ],
    )];

    write_sources(&batch, &CanonicalNames::build(&batch), &path).unwrap();

    let yaml = load_yaml(&path);
    let tables = yaml["sources"][0]["tables"].as_sequence().unwrap();
    let lowercase = tables
        .iter()
        .find(|t| t["name"].as_str() == Some("lowercase"))
        .unwrap();
    assert!(lowercase.get("identifier").is_none());
}

#[test]
fn test_creates_refs_yml_when_refs_exist() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("model_refs.yml");
    let batch = vec![categorized("model_a", &["model_b", "model_c"], vec![])];

    let written = write_model_refs(&batch, &path).unwrap();
    assert!(written.is_some());
    assert!(path.exists());

    let doc: ModelRefsDocument =
        serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc.version, 2);
    assert_eq!(doc.model_refs.len(), 1);
    assert_eq!(doc.model_refs[0].model, "model_a");
    assert_eq!(
        doc.model_refs[0].depends_on,
        vec![ModelName::new("model_b"), ModelName::new("model_c")]
    );
}

#[test]
fn test_no_refs_file_when_no_refs() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("model_refs.yml");
    let batch = vec![categorized("model_a", &[], vec![])];

    let written = write_model_refs(&batch, &path).unwrap();
    assert!(written.is_none());
    assert!(!path.exists());
}

#[test]
fn test_multiple_models_with_refs() {
    let batch = vec![
        categorized("model_a", &["model_c"], vec![]),
        categorized("model_b", &["model_c"], vec![]),
        categorized("model_c", &[], vec![]),
    ];

    let doc = ModelRefsDocument::from_categorized(&batch).unwrap();
    let models: Vec<&str> = doc.model_refs.iter().map(|r| r.model.as_str()).collect();
    assert_eq!(models, vec!["model_a", "model_b"]);
}

#[test]
fn test_refs_sorted_and_deduplicated() {
    let batch = vec![categorized(
        "model_a",
        &["zebra", "alpha", "middle", "alpha"],
        vec![],
    )];

    let doc = ModelRefsDocument::from_categorized(&batch).unwrap();
    let deps: Vec<&str> = doc.model_refs[0].depends_on.iter().map(|d| d.as_str()).collect();
    assert_eq!(deps, vec!["alpha", "middle", "zebra"]);
}

#[test]
fn test_save_creates_parent_directories() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("dir").join("sources.yml");
    let doc = SourcesDocument {
        version: DBT_SCHEMA_VERSION,
        sources: vec![],
    };

    doc.save(&path).unwrap();
    assert!(path.exists());
}
