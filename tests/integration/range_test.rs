//! Range fetching against a live server.

use super::common::spawn_file_server;
use rangeview::db::RangeFetcher;
use tempfile::TempDir;

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

#[tokio::test]
async fn test_download_in_chunks() {
    let data = pattern(10_000);
    let server = spawn_file_server(data.clone(), true).await;
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("games.db");

    let fetcher = RangeFetcher::new(server.url.clone(), 4096).unwrap();
    let written = fetcher.download_to(&target).await.unwrap();

    assert_eq!(written, 10_000);
    assert_eq!(server.requests(), 3);
    assert_eq!(std::fs::read(&target).unwrap(), data);
    assert!(!target.with_extension("part").exists());
}

#[tokio::test]
async fn test_exact_multiple_of_chunk_size() {
    let data = pattern(8192);
    let server = spawn_file_server(data.clone(), true).await;
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("games.db");

    let fetcher = RangeFetcher::new(server.url.clone(), 4096).unwrap();
    fetcher.download_to(&target).await.unwrap();

    assert_eq!(server.requests(), 2);
    assert_eq!(std::fs::read(&target).unwrap(), data);
}

#[tokio::test]
async fn test_empty_file() {
    let server = spawn_file_server(Vec::new(), true).await;
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("games.db");

    let fetcher = RangeFetcher::new(server.url.clone(), 4096).unwrap();
    let written = fetcher.download_to(&target).await.unwrap();

    assert_eq!(written, 0);
    assert!(std::fs::read(&target).unwrap().is_empty());
}

#[tokio::test]
async fn test_server_ignoring_range_is_rejected() {
    let server = spawn_file_server(pattern(10_000), false).await;
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("games.db");

    let fetcher = RangeFetcher::new(server.url.clone(), 4096).unwrap();
    let err = fetcher.download_to(&target).await.unwrap_err();

    assert_eq!(err.category(), "Connection Error");
    assert!(err.message().contains("ignored the Range header"));
    assert!(!target.exists());
    assert!(!target.with_extension("part").exists());
}

#[tokio::test]
async fn test_failed_download_keeps_previous_copy() {
    let server = spawn_file_server(pattern(10_000), false).await;
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("games.db");
    std::fs::write(&target, b"previous").unwrap();

    let fetcher = RangeFetcher::new(server.url.clone(), 4096).unwrap();
    fetcher.download_to(&target).await.unwrap_err();

    assert_eq!(std::fs::read(&target).unwrap(), b"previous");
    assert!(!target.with_extension("part").exists());
}

#[tokio::test]
async fn test_huge_chunk_size_at_nonzero_offset() {
    let data = pattern(10);
    let server = spawn_file_server(data.clone(), true).await;
    let fetcher = RangeFetcher::new(server.url.clone(), u64::MAX).unwrap();

    let chunk = fetcher.fetch_chunk(4).await.unwrap().unwrap();
    assert_eq!(chunk.offset, 4);
    assert_eq!(chunk.bytes, data[4..]);
    assert_eq!(chunk.total, 10);
}

#[tokio::test]
async fn test_missing_file_reports_status() {
    let server = spawn_file_server(pattern(100), true).await;
    let dir = TempDir::new().unwrap();
    let url = server.url.join("/missing.db").unwrap();

    let fetcher = RangeFetcher::new(url, 4096).unwrap();
    let err = fetcher
        .download_to(&dir.path().join("missing.db"))
        .await
        .unwrap_err();

    assert!(err.message().contains("404"));
}

#[tokio::test]
async fn test_single_chunk_reports_total() {
    let server = spawn_file_server(pattern(10_000), true).await;
    let fetcher = RangeFetcher::new(server.url.clone(), 4096).unwrap();

    let chunk = fetcher.fetch_chunk(8192).await.unwrap().unwrap();
    assert_eq!(chunk.offset, 8192);
    assert_eq!(chunk.bytes.len(), 10_000 - 8192);
    assert_eq!(chunk.total, 10_000);
}
