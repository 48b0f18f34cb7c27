use std::time::Duration;

use anyhow::Result;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};

mod issues;
mod types;

pub use types::*;

const API_BASE: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";

/// Maximum page size the issue listing endpoint accepts.
pub const PER_PAGE: usize = 100;

/// Unauthenticated client for the GitHub REST API.
pub struct GitHubClient {
    client: reqwest::Client,
}

impl GitHubClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("issueboard"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(API_VERSION),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}
