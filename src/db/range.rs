//! HTTP range fetching for the remote database file.
//!
//! The file is read in fixed-size pieces with `Range: bytes=start-end`
//! requests. The total size comes from the `Content-Range` header of the
//! first response.

use crate::error::{RangeviewError, Result};
use reqwest::header::{CONTENT_RANGE, RANGE};
use reqwest::{Client, StatusCode};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use url::Url;

/// A parsed `Content-Range` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRange {
    /// Inclusive byte range, absent for `bytes */total`.
    pub range: Option<(u64, u64)>,
    /// Total size of the resource.
    pub total: u64,
}

/// Parses `bytes start-end/total` or `bytes */total`.
///
/// An unknown total (`/*`) is rejected since the file size is required.
pub fn parse_content_range(header: &str) -> Option<ContentRange> {
    let rest = header.trim().strip_prefix("bytes")?.trim_start();
    let (range, total) = rest.split_once('/')?;
    let total = total.trim().parse::<u64>().ok()?;

    let range = match range.trim() {
        "*" => None,
        range => {
            let (start, end) = range.split_once('-')?;
            let start = start.trim().parse::<u64>().ok()?;
            let end = end.trim().parse::<u64>().ok()?;
            if end < start || end >= total {
                return None;
            }
            Some((start, end))
        }
    };

    Some(ContentRange { range, total })
}

/// One fetched piece of the remote file.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Absolute offset of the first byte.
    pub offset: u64,
    pub bytes: Vec<u8>,
    /// Total size of the remote file.
    pub total: u64,
}

/// Reads a remote file with fixed-size HTTP range requests.
#[derive(Debug, Clone)]
pub struct RangeFetcher {
    client: Client,
    url: Url,
    chunk_size: u64,
}

impl RangeFetcher {
    /// Creates a fetcher for `url` reading `chunk_size` bytes per request.
    pub fn new(url: Url, chunk_size: u64) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RangeviewError::config(
                "request_chunk_size must be greater than zero",
            ));
        }
        let client = Client::builder()
            .user_agent(concat!("rangeview/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RangeviewError::connection(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url,
            chunk_size,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Fetches the chunk starting at `offset`.
    ///
    /// Returns `None` when the resource is empty (the server answers
    /// `416 Range Not Satisfiable` with `bytes */0`).
    pub async fn fetch_chunk(&self, offset: u64) -> Result<Option<Chunk>> {
        let requested_end = offset.saturating_add(self.chunk_size - 1);
        debug!("GET {} bytes={}-{}", self.url, offset, requested_end);

        let response = self
            .client
            .get(self.url.clone())
            .header(RANGE, format!("bytes={offset}-{requested_end}"))
            .send()
            .await
            .map_err(|e| RangeviewError::connection(format!("Request to {} failed: {e}", self.url)))?;

        let status = response.status();
        let content_range = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_range);

        match status {
            StatusCode::PARTIAL_CONTENT => {}
            StatusCode::RANGE_NOT_SATISFIABLE
                if content_range.is_some_and(|cr| cr.total == 0) =>
            {
                return Ok(None);
            }
            StatusCode::OK => {
                return Err(RangeviewError::connection(format!(
                    "Server for {} ignored the Range header (got 200 OK); range requests are required",
                    self.url
                )));
            }
            other => {
                return Err(RangeviewError::connection(format!(
                    "GET {} returned {other}",
                    self.url
                )));
            }
        }

        let content_range = content_range.ok_or_else(|| {
            RangeviewError::connection(format!(
                "Missing or malformed Content-Range in response from {}",
                self.url
            ))
        })?;
        let (start, end) = content_range.range.ok_or_else(|| {
            RangeviewError::connection(format!("Content-Range from {} has no byte range", self.url))
        })?;

        if start != offset {
            return Err(RangeviewError::connection(format!(
                "Requested bytes starting at {offset}, server sent bytes {start}-{end}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RangeviewError::connection(format!("Failed to read response body: {e}")))?;

        let expected = end - start + 1;
        if bytes.len() as u64 != expected {
            return Err(RangeviewError::connection(format!(
                "Expected {expected} bytes for range {start}-{end}, received {}",
                bytes.len()
            )));
        }

        Ok(Some(Chunk {
            offset,
            bytes: bytes.to_vec(),
            total: content_range.total,
        }))
    }

    /// Downloads the whole file to `path`, one chunk at a time.
    ///
    /// The data is written to a sibling temp file and renamed into place once
    /// complete, so a failed download never leaves a truncated database behind.
    /// Returns the number of bytes written.
    pub async fn download_to(&self, path: &Path) -> Result<u64> {
        let partial = path.with_extension("part");
        let written = match self.download_part(&partial).await {
            Ok(written) => written,
            Err(e) => {
                if let Err(remove_err) = tokio::fs::remove_file(&partial).await {
                    if remove_err.kind() != std::io::ErrorKind::NotFound {
                        warn!("Failed to remove {}: {}", partial.display(), remove_err);
                    }
                }
                return Err(e);
            }
        };

        tokio::fs::rename(&partial, path).await.map_err(|e| {
            RangeviewError::connection(format!("Failed to move database into place: {e}"))
        })?;
        Ok(written)
    }

    /// Writes every chunk to `partial` and returns the byte count.
    async fn download_part(&self, partial: &Path) -> Result<u64> {
        let mut file = tokio::fs::File::create(partial).await.map_err(|e| {
            RangeviewError::connection(format!("Failed to create {}: {e}", partial.display()))
        })?;

        let mut offset = 0u64;
        let mut requests = 0u64;
        let mut total = None;

        loop {
            let Some(chunk) = self.fetch_chunk(offset).await? else {
                break;
            };
            requests += 1;

            match total {
                None => total = Some(chunk.total),
                Some(expected) if expected != chunk.total => {
                    return Err(RangeviewError::connection(format!(
                        "Remote file size changed during download ({expected} -> {})",
                        chunk.total
                    )));
                }
                Some(_) => {}
            }

            file.write_all(&chunk.bytes).await.map_err(|e| {
                RangeviewError::connection(format!("Failed to write {}: {e}", partial.display()))
            })?;

            offset = chunk.offset + chunk.bytes.len() as u64;
            if offset >= chunk.total {
                break;
            }
        }

        file.flush().await.map_err(|e| {
            RangeviewError::connection(format!("Failed to write {}: {e}", partial.display()))
        })?;
        drop(file);

        info!(
            "Fetched {} bytes from {} in {} range request(s)",
            offset, self.url, requests
        );
        Ok(offset)
    }
}
