use super::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_default_config_targets() {
    let config = Config::default();
    assert_eq!(
        config.target_names(),
        vec!["development", "unit-test", "functional-test"]
    );
    assert_eq!(config.scripts_path, "scripts/migrations");
    assert_eq!(config.state_table, "migration");
    assert_eq!(config.commit_mode, CommitMode::Batch);
    config.validate().unwrap();
}

#[test]
fn test_parse_minimal_config_uses_defaults() {
    let config = Config::from_yaml("commit_mode: batch").unwrap();
    assert_eq!(config.targets.len(), 3);
    assert_eq!(
        config.get_target("unit-test").unwrap().path,
        "target/unit-test.duckdb"
    );
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
scripts_path: db/migrations
state_table: ops.migration
commit_mode: per_script
targets:
  - name: staging
    path: ./staging.duckdb
  - name: scratch
    path: ":memory:"
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.scripts_path, "db/migrations");
    assert_eq!(config.state_table, "ops.migration");
    assert_eq!(config.commit_mode, CommitMode::PerScript);
    assert_eq!(config.target_names(), vec!["staging", "scratch"]);
}

#[test]
fn test_target_order_is_preserved() {
    let yaml = r#"
targets:
  - { name: c, path: c.duckdb }
  - { name: a, path: a.duckdb }
  - { name: b, path: b.duckdb }
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.target_names(), vec!["c", "a", "b"]);
}

#[test]
fn test_unknown_field_rejected() {
    let result = Config::from_yaml("scripts_dir: db");
    assert!(matches!(result, Err(CoreError::YamlParse(_))));
}

#[test]
fn test_invalid_commit_mode_rejected() {
    assert!(Config::from_yaml("commit_mode: sometimes").is_err());
}

#[test]
fn test_empty_target_list_rejected() {
    let result = Config::from_yaml("targets: []");
    assert!(matches!(result, Err(CoreError::ConfigInvalid { .. })));
}

#[test]
fn test_duplicate_target_names_rejected() {
    let yaml = r#"
targets:
  - { name: dev, path: a.duckdb }
  - { name: dev, path: b.duckdb }
"#;
    let err = Config::from_yaml(yaml).unwrap_err();
    assert!(err.to_string().contains("Duplicate target name 'dev'"));
}

#[test]
fn test_state_table_must_be_identifier() {
    let err = Config::from_yaml("state_table: \"migration; DROP TABLE x\"").unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}

#[test]
fn test_is_plain_identifier() {
    assert!(is_plain_identifier("migration"));
    assert!(is_plain_identifier("_state"));
    assert!(is_plain_identifier("ops.migration_state"));
    assert!(!is_plain_identifier(""));
    assert!(!is_plain_identifier("1migration"));
    assert!(!is_plain_identifier("a.b.c"));
    assert!(!is_plain_identifier("ops."));
    assert!(!is_plain_identifier("mig ration"));
}

#[test]
fn test_load_from_dir_without_file_uses_defaults() {
    let dir = tempdir().unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.targets, Config::default().targets);
}

#[test]
fn test_load_from_dir_reads_yaml_variant() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("tidemark.yaml"),
        "targets:\n  - { name: only, path: only.duckdb }\n",
    )
    .unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.target_names(), vec!["only"]);
}

#[test]
fn test_load_missing_explicit_file() {
    let dir = tempdir().unwrap();
    let result = Config::load(&dir.path().join("nope.yml"));
    assert!(matches!(result, Err(CoreError::ConfigNotFound { .. })));
}

#[test]
fn test_resolve_target_path() {
    let root = Path::new("/srv/app");
    let relative = TargetConfig {
        name: "dev".to_string(),
        path: "target/dev.duckdb".to_string(),
    };
    let memory = TargetConfig {
        name: "mem".to_string(),
        path: ":memory:".to_string(),
    };
    assert_eq!(relative.resolve_path(root), "/srv/app/target/dev.duckdb");
    assert_eq!(memory.resolve_path(root), ":memory:");
}

#[test]
fn test_scripts_path_absolute() {
    let config = Config::default();
    let root = Path::new("/srv/app");
    assert_eq!(
        config.scripts_path_absolute(root),
        PathBuf::from("/srv/app/scripts/migrations")
    );
}
