use super::VerseLookup;
use crate::error::{LecternError, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://bolls.life";

#[derive(Debug, Deserialize)]
struct VerseResponse {
    #[serde(default)]
    text: Option<String>,
}

/// Blocking client for the `get-verse` endpoint:
/// `GET {base}/get-verse/{version}/{book id}/{chapter}/{verse}/` → `{"text": "…"}`.
pub struct HttpLookup {
    client: Client,
    base_url: String,
}

impl HttpLookup {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LecternError::Lookup(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn verse_url(&self, version: &str, book_id: u8, chapter: u32, verse: u32) -> String {
        format!(
            "{}/get-verse/{}/{}/{}/{}/",
            self.base_url, version, book_id, chapter, verse
        )
    }
}

impl VerseLookup for HttpLookup {
    fn fetch(
        &self,
        version: &str,
        book_id: u8,
        chapter: u32,
        verse: u32,
    ) -> Result<Option<String>> {
        let url = self.verse_url(version, book_id, chapter, verse);
        tracing::debug!(%url, "fetching verse");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| LecternError::Lookup(e.to_string()))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body: VerseResponse = response
            .error_for_status()
            .map_err(|e| LecternError::Lookup(e.to_string()))?
            .json()
            .map_err(|e| LecternError::Lookup(format!("unexpected response: {}", e)))?;

        Ok(body.text.filter(|t| !t.trim().is_empty()))
    }
}
