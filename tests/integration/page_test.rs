//! The query page driven against a database fetched over HTTP.

use std::sync::Arc;

use super::common::{games_database, spawn_file_server};
use pretty_assertions::assert_eq;
use rangeview::connection::ConnectionManager;
use rangeview::db::{EngineConfig, HttpSqliteBootstrap};
use rangeview::page::Page;
use rangeview::query::QueryFacade;
use rangeview::status::Status;
use tempfile::TempDir;

async fn page_over(data: Vec<u8>, honor_range: bool) -> (Page, QueryFacade, TempDir) {
    let server = spawn_file_server(data, honor_range).await;
    let cache = TempDir::new().unwrap();
    let config = EngineConfig::new(server.url.clone(), cache.path().to_path_buf());

    let page = Page::new();
    let facade = QueryFacade::new(
        ConnectionManager::builder(Arc::new(HttpSqliteBootstrap::new()), config)
            .status_sink(Arc::new(page.clone()))
            .build(),
    );
    (page, facade, cache)
}

#[tokio::test]
async fn test_run_renders_pretty_json() {
    let fixture = TempDir::new().unwrap();
    let (page, facade, _cache) = page_over(games_database(fixture.path()).await, true).await;

    page.set_input("  SELECT id, title, year FROM games ORDER BY id LIMIT 2;\n");
    page.run(&facade).await;

    let expected = r#"[
  {
    "id": 1,
    "title": "Zork",
    "year": 1980
  },
  {
    "id": 2,
    "title": "Tetris",
    "year": 1984
  }
]"#;
    assert_eq!(page.output(), expected);
    assert_eq!(page.status(), Status::Done(2));
    assert!(page.is_run_enabled());
}

#[tokio::test]
async fn test_null_rendered_as_json_null() {
    let fixture = TempDir::new().unwrap();
    let (page, facade, _cache) = page_over(games_database(fixture.path()).await, true).await;

    page.set_input("SELECT title, year FROM games WHERE id = 3");
    page.run(&facade).await;

    assert_eq!(
        page.output(),
        "[\n  {\n    \"title\": \"Myst\",\n    \"year\": null\n  }\n]"
    );
}

#[tokio::test]
async fn test_empty_result_shows_no_rows() {
    let fixture = TempDir::new().unwrap();
    let (page, facade, _cache) = page_over(games_database(fixture.path()).await, true).await;

    page.set_input("SELECT * FROM games WHERE id = 42");
    page.run(&facade).await;

    assert_eq!(page.output(), "No rows.");
    assert_eq!(page.status(), Status::Done(0));
}

#[tokio::test]
async fn test_sql_error_shown_on_page() {
    let fixture = TempDir::new().unwrap();
    let (page, facade, _cache) = page_over(games_database(fixture.path()).await, true).await;

    page.set_input("SELECT * FROM gamez");
    page.run(&facade).await;

    assert_eq!(page.output(), "Error: no such table: gamez");
    assert_eq!(page.status(), Status::QueryFailed);
    assert!(page.is_run_enabled());
}

#[tokio::test]
async fn test_connection_failure_shown_on_page() {
    let (page, facade, _cache) = page_over(b"whatever".to_vec(), false).await;

    page.set_input("SELECT 1");
    page.run(&facade).await;

    assert!(page.output().starts_with("Error: "));
    assert!(page.output().contains("ignored the Range header"));
    assert_eq!(page.status(), Status::QueryFailed);
    assert!(page.is_run_enabled());
}
