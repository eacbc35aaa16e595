use super::*;

#[tokio::test]
async fn test_duckdb_provider_memory() {
    let provider = DuckDbProvider::new(":memory:");
    let db = provider.connect().await.unwrap();
    assert_eq!(db.db_type(), "duckdb");
    assert_eq!(provider.describe(), "duckdb::memory:");
}

#[tokio::test]
async fn test_duckdb_provider_provisions_state_table() {
    let provider = DuckDbProvider::new(":memory:").with_state_table("migration");
    let db = provider.connect().await.unwrap();
    assert!(db.relation_exists("migration").await.unwrap());
    let value = db
        .query_optional_string("SELECT last_run_migration FROM migration")
        .await
        .unwrap();
    assert_eq!(value, None);
}

#[tokio::test]
async fn test_duckdb_provider_provisions_schema_qualified_table() {
    let provider = DuckDbProvider::new(":memory:").with_state_table("ops.migration");
    let db = provider.connect().await.unwrap();
    assert!(db.relation_exists("ops.migration").await.unwrap());
}

#[tokio::test]
async fn test_duckdb_provider_creates_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("target").join("development.duckdb");
    let provider = DuckDbProvider::new(path.display().to_string());

    let db = provider.connect().await.unwrap();
    db.execute_batch("CREATE TABLE t (id INTEGER)").await.unwrap();
    drop(db);

    assert!(path.exists());
}

#[tokio::test]
async fn test_duckdb_provider_keeps_existing_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.duckdb").display().to_string();
    let provider = DuckDbProvider::new(path).with_state_table("migration");

    {
        let db = provider.connect().await.unwrap();
        db.execute("INSERT INTO migration VALUES ('20230101000000')")
            .await
            .unwrap();
    }

    let db = provider.connect().await.unwrap();
    let value = db
        .query_optional_string("SELECT last_run_migration FROM migration")
        .await
        .unwrap();
    assert_eq!(value.as_deref(), Some("20230101000000"));
}

#[tokio::test]
async fn test_read_only_connect_missing_file_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("target").join("development.duckdb");
    let provider = DuckDbProvider::new(path.display().to_string()).with_state_table("migration");

    assert!(provider.connect_read_only().await.unwrap().is_none());
    assert!(!path.exists());
    assert!(!dir.path().join("target").exists());
}

#[tokio::test]
async fn test_read_only_connect_skips_provisioning() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.duckdb");
    {
        let db = DuckDbBackend::from_path(&path).unwrap();
        db.execute_batch("CREATE TABLE t (id INTEGER)").await.unwrap();
    }
    let provider = DuckDbProvider::new(path.display().to_string()).with_state_table("migration");

    let db = provider.connect_read_only().await.unwrap().unwrap();
    assert!(db.relation_exists("t").await.unwrap());
    assert!(!db.relation_exists("migration").await.unwrap());
    assert!(db.execute_batch("CREATE TABLE u (id INTEGER)").await.is_err());
}

#[tokio::test]
async fn test_read_only_connect_memory_is_unprovisioned() {
    let provider = DuckDbProvider::new(":memory:").with_state_table("migration");
    let db = provider.connect_read_only().await.unwrap().unwrap();
    assert!(!db.relation_exists("migration").await.unwrap());
}

#[tokio::test]
async fn test_existing_connection_read_only_shares_handle() {
    let db: Arc<dyn Database> = Arc::new(DuckDbBackend::in_memory().unwrap());
    db.execute_batch("CREATE TABLE shared (id INTEGER)").await.unwrap();
    let provider = ExistingConnection::new(db);

    let inspected = provider.connect_read_only().await.unwrap().unwrap();
    assert!(inspected.relation_exists("shared").await.unwrap());
}

#[tokio::test]
async fn test_existing_connection_shares_handle() {
    let db: Arc<dyn Database> = Arc::new(DuckDbBackend::in_memory().unwrap());
    let provider = ExistingConnection::new(Arc::clone(&db));

    let first = provider.connect().await.unwrap();
    first.execute_batch("CREATE TABLE shared (id INTEGER)").await.unwrap();

    let second = provider.connect().await.unwrap();
    assert!(second.relation_exists("shared").await.unwrap());
}
