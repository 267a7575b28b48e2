//! Comment source with a one-shot fallback to synthetic data.

use serde::Serialize;
use std::fmt;
use std::time::Instant;
use tracing::{info, warn};

use crate::error::FetchError;
use crate::fetch::{HttpClient, fetch_bytes};
use crate::mock;
use crate::model::RawComment;
use crate::parser::parse_comments;

pub const DEFAULT_URL: &str = "https://jsonplaceholder.typicode.com/comments";

/// Where a batch of comments came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Live,
    Synthetic,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Live => f.write_str("live"),
            Origin::Synthetic => f.write_str("synthetic"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchedComments {
    pub comments: Vec<RawComment>,
    pub origin: Origin,
}

impl FetchedComments {
    /// `count` seeded mock records.
    pub fn synthetic(count: usize, seed: u64) -> Self {
        let comments = mock::generate(count, seed);
        info!(records = comments.len(), seed, "Synthetic comments generated");
        FetchedComments {
            comments,
            origin: Origin::Synthetic,
        }
    }
}

/// Fetches comments from `url`, or generates `mock_count` seeded records
/// when the live request fails.
pub struct CommentSource<C> {
    client: C,
    url: String,
    mock_count: usize,
    mock_seed: u64,
}

impl<C: HttpClient> CommentSource<C> {
    pub fn new(client: C, url: impl Into<String>, mock_count: usize, mock_seed: u64) -> Self {
        Self {
            client,
            url: url.into(),
            mock_count,
            mock_seed,
        }
    }

    /// Retrieves and decodes the live payload. No fallback.
    pub async fn fetch_live(&self) -> Result<Vec<RawComment>, FetchError> {
        let bytes = fetch_bytes(&self.client, &self.url).await?;
        parse_comments(&bytes)
    }

    /// Live data when available, synthetic data otherwise. Never fails.
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch(&self) -> FetchedComments {
        let started = Instant::now();

        match self.fetch_live().await {
            Ok(comments) => {
                info!(
                    records = comments.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Comments fetched from API"
                );
                FetchedComments {
                    comments,
                    origin: Origin::Live,
                }
            }
            Err(e) => {
                warn!(error = %e, "Live fetch failed, falling back to synthetic comments");
                FetchedComments::synthetic(self.mock_count, self.mock_seed)
            }
        }
    }
}
