//! End-to-end runs against file-backed DuckDB targets built from config.

use std::fs;
use std::path::Path;
use tm_core::{CommitMode, Config};
use tm_db::{Database, DuckDbBackend};
use tm_migrate::{targets_from_config, NoopReporter, Orchestrator, RunPhase, RunReport};

// ── Helpers ────────────────────────────────────────────────────────────

fn write_project(root: &Path, config_yaml: &str, scripts: &[(&str, &str)]) -> Config {
    fs::write(root.join("tidemark.yml"), config_yaml).unwrap();
    let scripts_dir = root.join("scripts").join("migrations");
    fs::create_dir_all(&scripts_dir).unwrap();
    for (name, sql) in scripts {
        fs::write(scripts_dir.join(name), sql).unwrap();
    }
    Config::load_from_dir(root).unwrap()
}

async fn run(root: &Path, config: &Config) -> Vec<RunReport> {
    let orchestrator = Orchestrator::from_config(config, root).unwrap();
    let targets = targets_from_config(config, root);
    orchestrator.run_all(&targets, &mut NoopReporter).await
}

async fn stored_version(db_path: &Path) -> Option<String> {
    let db = DuckDbBackend::from_path(db_path).unwrap();
    db.query_optional_string("SELECT last_run_migration FROM migration")
        .await
        .unwrap()
}

const THREE_TARGETS: &str = r#"
targets:
  - { name: development, path: target/development.duckdb }
  - { name: unit-test, path: target/unit-test.duckdb }
  - { name: functional-test, path: target/functional-test.duckdb }
"#;

// ── Tests ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_every_target_migrated_in_config_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_project(
        dir.path(),
        THREE_TARGETS,
        &[
            ("20230101000000_init.sql", "CREATE TABLE company (company_id INTEGER, name VARCHAR);"),
            ("20230201000000_add_col.sql", "ALTER TABLE company ADD COLUMN url_image_logo VARCHAR;"),
        ],
    );

    let reports = run(dir.path(), &config).await;

    let names: Vec<&str> = reports.iter().map(|r| r.target.as_str()).collect();
    assert_eq!(names, vec!["development", "unit-test", "functional-test"]);
    for report in &reports {
        assert!(report.is_success(), "{}: {:?}", report.target, report.error);
        assert_eq!(report.applied.len(), 2);
    }
    for name in ["development", "unit-test", "functional-test"] {
        let path = dir.path().join("target").join(format!("{name}.duckdb"));
        assert_eq!(stored_version(&path).await.as_deref(), Some("20230201000000"));
    }
}

#[tokio::test]
async fn test_rerun_with_new_script_applies_only_the_new_one() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_project(
        dir.path(),
        "targets:\n  - { name: development, path: target/development.duckdb }\n",
        &[("20230101000000_init.sql", "CREATE TABLE client (client_id INTEGER);")],
    );

    let first = run(dir.path(), &config).await;
    assert_eq!(first[0].applied, vec!["20230101000000_init.sql"]);

    let second = run(dir.path(), &config).await;
    assert!(second[0].is_success());
    assert!(second[0].selected.is_empty());

    fs::write(
        dir.path().join("scripts/migrations/20230201000000_points.sql"),
        "CREATE TABLE points_configuration (points_to_earn DOUBLE);",
    )
    .unwrap();
    let third = run(dir.path(), &config).await;
    assert_eq!(third[0].applied, vec!["20230201000000_points.sql"]);

    let db_path = dir.path().join("target/development.duckdb");
    assert_eq!(stored_version(&db_path).await.as_deref(), Some("20230201000000"));
}

#[tokio::test]
async fn test_target_with_diverging_state_is_independent() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_project(
        dir.path(),
        THREE_TARGETS,
        &[
            ("20230101000000_init.sql", "CREATE TABLE client (client_id INTEGER);"),
            ("20230201000000_add_col.sql", "ALTER TABLE client ADD COLUMN phone VARCHAR;"),
        ],
    );

    // unit-test already has the first script applied
    {
        fs::create_dir_all(dir.path().join("target")).unwrap();
        let db = DuckDbBackend::from_path(&dir.path().join("target/unit-test.duckdb")).unwrap();
        db.execute_batch(
            "CREATE TABLE client (client_id INTEGER);
             CREATE TABLE migration (last_run_migration VARCHAR);
             INSERT INTO migration VALUES ('20230101000000');",
        )
        .await
        .unwrap();
    }

    let reports = run(dir.path(), &config).await;

    assert_eq!(reports[0].applied.len(), 2);
    assert_eq!(reports[1].applied, vec!["20230201000000_add_col.sql"]);
    assert_eq!(reports[2].applied.len(), 2);
    assert!(reports.iter().all(|r| r.is_success()));
}

#[tokio::test]
async fn test_broken_script_fails_each_target_independently() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_project(
        dir.path(),
        THREE_TARGETS,
        &[
            ("20230101000000_init.sql", "CREATE TABLE client (client_id INTEGER);"),
            ("20230102000000_broken.sql", "ALTER TABLE missing_table ADD COLUMN x INTEGER;"),
            ("20230103000000_more.sql", "CREATE TABLE company (company_id INTEGER);"),
        ],
    );

    let reports = run(dir.path(), &config).await;

    assert_eq!(reports.len(), 3);
    for report in &reports {
        assert_eq!(report.phase, RunPhase::Failed);
        assert_eq!(report.failed_in, Some(RunPhase::Executing));
        assert_eq!(report.applied, vec!["20230101000000_init.sql"]);
    }
    let dev = dir.path().join("target/development.duckdb");
    assert_eq!(stored_version(&dev).await, None);
}

#[tokio::test]
async fn test_per_script_commit_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_project(
        dir.path(),
        "commit_mode: per_script\ntargets:\n  - { name: development, path: target/dev.duckdb }\n",
        &[
            ("20230101000000_init.sql", "CREATE TABLE client (client_id INTEGER);"),
            ("20230102000000_broken.sql", "ALTER TABLE missing_table ADD COLUMN x INTEGER;"),
        ],
    );
    assert_eq!(config.commit_mode, CommitMode::PerScript);

    let reports = run(dir.path(), &config).await;

    assert_eq!(reports[0].phase, RunPhase::Failed);
    let dev = dir.path().join("target/dev.duckdb");
    assert_eq!(stored_version(&dev).await.as_deref(), Some("20230101000000"));
}
