//! Shared fixtures: a range-capable file server and a small `games` database.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use url::Url;

#[derive(Clone)]
struct FileState {
    data: Arc<Vec<u8>>,
    honor_range: bool,
    requests: Arc<AtomicUsize>,
}

/// A running file server.
pub struct FileServer {
    /// URL of the served file.
    pub url: Url,
    requests: Arc<AtomicUsize>,
}

impl FileServer {
    /// Number of requests served for the file so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

fn parse_range(value: &str) -> Option<(u64, u64)> {
    let (start, end) = value.strip_prefix("bytes=")?.split_once('-')?;
    Some((start.parse().ok()?, end.parse().ok()?))
}

async fn serve_file(State(state): State<FileState>, headers: HeaderMap) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    let total = state.data.len() as u64;

    let range = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_range);

    match range {
        Some((start, end)) if state.honor_range => {
            if start >= total {
                return (
                    StatusCode::RANGE_NOT_SATISFIABLE,
                    [(header::CONTENT_RANGE, format!("bytes */{total}"))],
                )
                    .into_response();
            }
            let end = end.min(total - 1);
            let body = state.data[start as usize..=end as usize].to_vec();
            (
                StatusCode::PARTIAL_CONTENT,
                [(header::CONTENT_RANGE, format!("bytes {start}-{end}/{total}"))],
                body,
            )
                .into_response()
        }
        _ => (StatusCode::OK, state.data.to_vec()).into_response(),
    }
}

/// Serves `data` at `/games.db` on an ephemeral port.
///
/// With `honor_range` false the server ignores `Range` and always answers
/// `200 OK` with the whole body.
pub async fn spawn_file_server(data: Vec<u8>, honor_range: bool) -> FileServer {
    let requests = Arc::new(AtomicUsize::new(0));
    let state = FileState {
        data: Arc::new(data),
        honor_range,
        requests: Arc::clone(&requests),
    };

    let app = Router::new()
        .route("/games.db", get(serve_file))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FileServer {
        url: Url::parse(&format!("http://{addr}/games.db")).unwrap(),
        requests,
    }
}

/// Builds a rollback-journal SQLite file with three games and returns its bytes.
pub async fn games_database(dir: &Path) -> Vec<u8> {
    let path = dir.join("fixture.db");
    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Delete);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();

    sqlx::query("CREATE TABLE games (id INTEGER PRIMARY KEY, title TEXT NOT NULL, year INTEGER)")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO games (id, title, year) VALUES
            (1, 'Zork', 1980),
            (2, 'Tetris', 1984),
            (3, 'Myst', NULL)",
    )
    .execute(&pool)
    .await
    .unwrap();
    pool.close().await;

    std::fs::read(&path).unwrap()
}
