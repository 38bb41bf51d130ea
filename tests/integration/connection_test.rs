//! Bootstrap, connection manager and query façade over a real HTTP engine.

use std::sync::Arc;

use super::common::{games_database, spawn_file_server};
use futures::future::join_all;
use rangeview::connection::{ConnectionManager, ConnectionPhase, FailurePolicy};
use rangeview::db::{EngineBootstrap, EngineConfig, HttpSqliteBootstrap, Value};
use rangeview::query::QueryFacade;
use tempfile::TempDir;

async fn served_games() -> (super::common::FileServer, TempDir) {
    let fixture_dir = TempDir::new().unwrap();
    let data = games_database(fixture_dir.path()).await;
    let server = spawn_file_server(data, true).await;
    (server, TempDir::new().unwrap())
}

#[tokio::test]
async fn test_bootstrap_opens_remote_database() {
    let (server, cache) = served_games().await;
    let config = EngineConfig::new(server.url.clone(), cache.path().to_path_buf());

    let engine = HttpSqliteBootstrap::new().create(&config).await.unwrap();
    let rows = engine
        .query("SELECT COUNT(*) AS n FROM games;", &[])
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("n"), Some(&Value::Integer(3)));
    assert!(cache.path().join("games.db").exists());
}

#[tokio::test]
async fn test_small_chunks_produce_same_database() {
    let (server, cache) = served_games().await;
    let mut config = EngineConfig::new(server.url.clone(), cache.path().to_path_buf());
    config.request_chunk_size = 512;

    let engine = HttpSqliteBootstrap::new().create(&config).await.unwrap();
    let rows = engine
        .query("SELECT title FROM games WHERE year IS NULL", &[])
        .await
        .unwrap();

    assert!(server.requests() > 1);
    assert_eq!(rows[0].get("title"), Some(&Value::from("Myst")));
}

#[tokio::test]
async fn test_concurrent_queries_share_one_download() {
    let (server, cache) = served_games().await;
    let config = EngineConfig::new(server.url.clone(), cache.path().to_path_buf());
    let facade = QueryFacade::new(
        ConnectionManager::builder(Arc::new(HttpSqliteBootstrap::new()), config).build(),
    );

    let queries = (0..8).map(|_| facade.run_query("SELECT COUNT(*) AS n FROM games;", &[]));
    let results = join_all(queries).await;

    for rows in results {
        assert_eq!(rows.unwrap()[0].get("n"), Some(&Value::Integer(3)));
    }
    assert_eq!(facade.connections().attempts(), 1);
    assert_eq!(facade.connections().phase(), ConnectionPhase::Ready);

    let after_first = server.requests();
    facade
        .run_query("SELECT id FROM games WHERE id = ?", &[Value::Integer(2)])
        .await
        .unwrap();
    assert_eq!(server.requests(), after_first);
}

#[tokio::test]
async fn test_query_error_keeps_connection() {
    let (server, cache) = served_games().await;
    let config = EngineConfig::new(server.url.clone(), cache.path().to_path_buf());
    let facade = QueryFacade::new(
        ConnectionManager::builder(Arc::new(HttpSqliteBootstrap::new()), config).build(),
    );

    let err = facade.run_query_unbound("SELECT * FROM gamez").await.unwrap_err();
    assert!(err.message().contains("no such table: gamez"));
    assert!(facade.connections().is_connected());

    let rows = facade.run_query_unbound("SELECT * FROM games").await.unwrap();
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn test_failed_bootstrap_is_cached() {
    let server = spawn_file_server(b"not a database".to_vec(), false).await;
    let cache = TempDir::new().unwrap();
    let config = EngineConfig::new(server.url.clone(), cache.path().to_path_buf());
    let facade = QueryFacade::new(
        ConnectionManager::builder(Arc::new(HttpSqliteBootstrap::new()), config)
            .failure_policy(FailurePolicy::Cache)
            .build(),
    );

    let first = facade.run_query_unbound("SELECT 1").await.unwrap_err();
    let second = facade.run_query_unbound("SELECT 1").await.unwrap_err();

    assert_eq!(first, second);
    assert!(first.message().contains("ignored the Range header"));
    assert!(matches!(
        facade.connections().phase(),
        ConnectionPhase::Failed(_)
    ));
    assert_eq!(server.requests(), 1);
}

#[tokio::test]
async fn test_failed_bootstrap_retried() {
    let server = spawn_file_server(b"not a database".to_vec(), false).await;
    let cache = TempDir::new().unwrap();
    let config = EngineConfig::new(server.url.clone(), cache.path().to_path_buf());
    let facade = QueryFacade::new(
        ConnectionManager::builder(Arc::new(HttpSqliteBootstrap::new()), config)
            .failure_policy(FailurePolicy::Retry)
            .build(),
    );

    facade.run_query_unbound("SELECT 1").await.unwrap_err();
    facade.run_query_unbound("SELECT 1").await.unwrap_err();

    assert_eq!(facade.connections().attempts(), 2);
    assert_eq!(server.requests(), 2);
}
