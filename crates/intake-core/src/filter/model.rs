//! Generative model client.
//!
//! Uses the curl crate (libcurl) to call a Gemini-style `generateContent`
//! endpoint. Requests run on tokio's blocking pool so the async caller is
//! never blocked.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use url::Url;

use super::error::FilterError;
use crate::config::ModelConfig;

/// Longest error body kept in [`FilterError::Http`].
const MAX_ERROR_BODY: usize = 512;

/// Text generation seam used by the question filter.
pub trait ModelClient: Send + Sync {
    /// Generate a text completion for `prompt`.
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, FilterError>> + Send;
}

/// Client for the Gemini `generateContent` API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    url: Url,
    api_key: Option<String>,
    api_key_env: String,
    connect_timeout: Duration,
    request_timeout: Duration,
    temperature: f64,
}

impl GeminiClient {
    /// Build a client from config, reading the API key from `cfg.api_key_env`.
    ///
    /// A missing key is not an error here; see [`GeminiClient::check`].
    pub fn from_config(cfg: &ModelConfig) -> Result<Self> {
        let api_key = std::env::var(&cfg.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        Self::new(cfg, api_key)
    }

    pub fn new(cfg: &ModelConfig, api_key: Option<String>) -> Result<Self> {
        let url = generate_url(&cfg.endpoint, &cfg.model)?;
        Ok(Self {
            url,
            api_key,
            api_key_env: cfg.api_key_env.clone(),
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            request_timeout: Duration::from_secs(cfg.request_timeout_secs),
            temperature: cfg.temperature,
        })
    }

    /// Fails with [`FilterError::MissingApiKey`] when no key is configured.
    pub fn check(&self) -> Result<(), FilterError> {
        self.api_key().map(|_| ())
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn api_key(&self) -> Result<&str, FilterError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| FilterError::MissingApiKey {
                var: self.api_key_env.clone(),
            })
    }

    fn request_body(&self, prompt: &str) -> String {
        serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": self.temperature },
        })
        .to_string()
    }
}

impl ModelClient for GeminiClient {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, FilterError>> + Send {
        let prepared = self.api_key().map(|key| Request {
            url: self.url.to_string(),
            api_key: key.to_string(),
            body: self.request_body(prompt),
            connect_timeout: self.connect_timeout,
            request_timeout: self.request_timeout,
        });
        async move {
            let request = prepared?;
            tracing::debug!("POST {} ({} bytes)", request.url, request.body.len());
            let (status, body) = tokio::task::spawn_blocking(move || request.perform())
                .await
                .map_err(|e| FilterError::Join(e.to_string()))?
                .map_err(transport_error)?;
            if !(200..300).contains(&status) {
                let text = String::from_utf8_lossy(&body);
                let mut snippet: String = text.chars().take(MAX_ERROR_BODY).collect();
                if snippet.len() < text.len() {
                    snippet.push('…');
                }
                tracing::debug!("model endpoint returned HTTP {}", status);
                return Err(FilterError::Http {
                    status: u16::try_from(status).unwrap_or(u16::MAX),
                    body: snippet,
                });
            }
            parse_generate_response(&body)
        }
    }
}

/// Owned request data moved onto the blocking pool.
struct Request {
    url: String,
    api_key: String,
    body: String,
    connect_timeout: Duration,
    request_timeout: Duration,
}

impl Request {
    /// Performs the POST on the current thread and returns (status, body).
    fn perform(self) -> Result<(u32, Vec<u8>), curl::Error> {
        let mut response = Vec::new();
        let mut easy = curl::easy::Easy::new();
        easy.url(&self.url)?;
        easy.post(true)?;
        easy.post_fields_copy(self.body.as_bytes())?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.request_timeout)?;

        let mut headers = curl::easy::List::new();
        headers.append("Content-Type: application/json")?;
        headers.append(&format!("x-goog-api-key: {}", self.api_key))?;
        // Send the body immediately instead of waiting for 100-continue.
        headers.append("Expect:")?;
        easy.http_headers(headers)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                response.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        Ok((code, response))
    }
}

/// `{endpoint}/models/{model}:generateContent`, validated.
fn generate_url(endpoint: &str, model: &str) -> Result<Url> {
    let raw = format!(
        "{}/models/{}:generateContent",
        endpoint.trim_end_matches('/'),
        model
    );
    Url::parse(&raw).with_context(|| format!("invalid model endpoint {}", raw))
}

/// Map a curl failure to a transport error with a short code.
fn transport_error(e: curl::Error) -> FilterError {
    let code = if e.is_operation_timedout() {
        "timed_out".to_string()
    } else if e.is_couldnt_connect() {
        "couldnt_connect".to_string()
    } else if e.is_couldnt_resolve_host() || e.is_couldnt_resolve_proxy() {
        "couldnt_resolve_host".to_string()
    } else if e.is_read_error() || e.is_recv_error() || e.is_send_error() || e.is_got_nothing() {
        "connection_reset".to_string()
    } else {
        format!("curl_{}", e.code())
    };
    FilterError::Transport {
        code: Some(code),
        message: e.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

/// Concatenated text parts of the first candidate.
fn parse_generate_response(body: &[u8]) -> Result<String, FilterError> {
    let parsed: GenerateResponse = serde_json::from_slice(body)
        .map_err(|e| FilterError::MalformedResponse(format!("invalid response JSON: {}", e)))?;
    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect()
        })
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(FilterError::MalformedResponse(
            "model returned no text".into(),
        ));
    }
    Ok(text)
}
