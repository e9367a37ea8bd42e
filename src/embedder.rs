//! HTTP client for Ollama-style embedding endpoints.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Produces an embedding for one prepared text. A `None` result means the
/// request failed and the row should be skipped.
pub trait Embedder {
    fn embed(&self, text: &str) -> Option<Vec<f64>>;
}

#[derive(Clone)]
pub struct OllamaEmbedder {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(endpoint: String, model: String, timeout: Duration) -> Result<Self> {
        anyhow::ensure!(!endpoint.trim().is_empty(), "missing embedding endpoint");
        anyhow::ensure!(!model.trim().is_empty(), "missing embedding model name");

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("failed to build embedding HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.trim().to_string(),
            model: model.trim().to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_embedding(&self, text: &str) -> Result<Vec<f64>> {
        let request = EmbeddingRequest {
            model: &self.model,
            prompt: text,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .with_context(|| format!("embedding request to {} failed", self.endpoint))?;

        let status = response.status();
        let body = response
            .text()
            .context("failed to read embedding response body")?;
        if !status.is_success() {
            bail!("embedding endpoint returned {status}: {body}");
        }

        parse_embedding_response(&body)
    }
}

impl Embedder for OllamaEmbedder {
    fn embed(&self, text: &str) -> Option<Vec<f64>> {
        match self.request_embedding(text) {
            Ok(vector) => Some(vector),
            Err(err) => {
                warn!(endpoint = %self.endpoint, error = %format!("{err:#}"), "embedding request failed");
                None
            }
        }
    }
}

pub fn parse_embedding_response(body: &str) -> Result<Vec<f64>> {
    let parsed: EmbeddingResponse =
        serde_json::from_str(body).context("failed to parse embedding response")?;

    parsed
        .embedding
        .context("embedding response has no `embedding` field")
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Option<Vec<f64>>,
}
