//! Marquee API Client

use anyhow::{bail, Context, Result};
use reqwest::{Client, Response, Url};
use serde::Deserialize;

/// API Client for Marquee
pub struct MarqueeClient {
    client: Client,
    base_url: String,
}

// ============================================
// API Response Types
// ============================================

#[derive(Debug, Deserialize)]
pub struct SearchMatch {
    pub id: String,
    pub title: String,
    pub genres: Vec<String>,
    pub summary: String,
    pub cast: Vec<String>,
    pub vector_distance: f32,
}

#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub total: u64,
    pub embedded: u64,
    pub pending: u64,
}

/// Search parameters forwarded as query string
#[derive(Debug)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    pub distance: &'a str,
    pub limit: usize,
    pub threshold: Option<f32>,
}

impl MarqueeClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    /// Import the server-side catalog source; returns items written
    pub async fn import(&self) -> Result<usize> {
        let url = format!("{}/import", self.base_url);
        let resp = self
            .client
            .post(&url)
            .send()
            .await
            .context("Failed to connect to Marquee API")?;

        parse_count(&check(resp).await?.text().await?)
    }

    /// Run one backfill page; returns items updated
    pub async fn recompute(&self) -> Result<usize> {
        let url = format!("{}/recompute", self.base_url);
        let resp = self
            .client
            .post(&url)
            .send()
            .await
            .context("Failed to connect to Marquee API")?;

        parse_count(&check(resp).await?.text().await?)
    }

    /// Embed one item by id
    pub async fn recompute_item(&self, id: &str) -> Result<usize> {
        let url = self.item_url(id)?;
        let resp = self
            .client
            .post(url)
            .send()
            .await
            .context("Failed to connect to Marquee API")?;

        parse_count(&check(resp).await?.text().await?)
    }

    /// Nearest-neighbor search
    pub async fn search(&self, request: &SearchRequest<'_>) -> Result<Vec<SearchMatch>> {
        let url = format!("{}/search", self.base_url);

        let mut params = vec![
            ("query", request.query.to_string()),
            ("distance", request.distance.to_string()),
            ("limit", request.limit.to_string()),
        ];
        if let Some(threshold) = request.threshold {
            params.push(("threshold", threshold.to_string()));
        }

        let resp = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .context("Failed to connect to Marquee API")?;

        let matches: Vec<SearchMatch> = check(resp)
            .await?
            .json()
            .await
            .context("Failed to parse response")?;

        Ok(matches)
    }

    /// `/recompute/{id}` with the id encoded as a single path segment
    fn item_url(&self, id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid base URL: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Base URL cannot carry a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(["recompute", id]);
        Ok(url)
    }

    /// Embedding progress
    pub async fn status(&self) -> Result<StatusResponse> {
        let url = format!("{}/status", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to connect to Marquee API")?;

        check(resp)
            .await?
            .json()
            .await
            .context("Failed to parse response")
    }
}

async fn check(resp: Response) -> Result<Response> {
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        bail!("API error ({}): {}", status, body);
    }
    Ok(resp)
}

/// Extract `n` from "Imported n items" / "Updated n items"
fn parse_count(body: &str) -> Result<usize> {
    body.split_whitespace()
        .nth(1)
        .and_then(|n| n.parse().ok())
        .with_context(|| format!("Unexpected response: {}", body))
}
