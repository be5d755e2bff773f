use crate::settings::{is_falsy, GenerationConfig};
use anyhow::{bail, Context, Result};
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use url::Url;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// HTTP client for the chat backend's `/chat`, `/config` and `/clear` endpoints.
///
/// No timeout is set on any request. The HTTP status of a reply is logged
/// but never treated as a failure.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base: Url,
}

impl ChatClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base =
            Url::parse(base_url).with_context(|| format!("Invalid server URL: {}", base_url))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .with_context(|| format!("Failed to build URL for {}", path))
    }

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    /// POST the user's message and return the raw `response` field.
    ///
    /// See `reply_text` for which bodies count as malformed.
    pub async fn chat(&self, message: &str) -> Result<String> {
        let url = self.endpoint("chat")?;
        debug!("Sending chat message to {} ({} chars)", url, message.len());

        let response = self
            .http
            .post(url)
            .headers(Self::json_headers())
            .json(&ChatRequest { message })
            .send()
            .await
            .context("Chat request failed")?;

        debug!("Chat endpoint answered with status {}", response.status());

        let body: Value = response
            .json()
            .await
            .context("Failed to parse chat response")?;

        reply_text(&body)
    }

    /// Fetch the backend's current generation config as untyped JSON.
    pub async fn fetch_config(&self) -> Result<Value> {
        let url = self.endpoint("config")?;
        debug!("Loading config from {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .context("Config request failed")?;

        let body: Value = response
            .json()
            .await
            .context("Failed to parse config response")?;
        if !body.is_object() {
            bail!("Config response is not a JSON object: {}", body);
        }
        Ok(body)
    }

    pub async fn save_config(&self, config: &GenerationConfig) -> Result<()> {
        let url = self.endpoint("config")?;
        debug!("Saving config to {}: {:?}", url, config);

        let response = self
            .http
            .post(url)
            .headers(Self::json_headers())
            .json(config)
            .send()
            .await
            .context("Config save request failed")?;

        debug!("Config endpoint answered with status {}", response.status());
        Ok(())
    }

    pub async fn clear_history(&self) -> Result<()> {
        let url = self.endpoint("clear")?;
        debug!("Clearing server history at {}", url);

        let response = self
            .http
            .post(url)
            .send()
            .await
            .context("Clear history request failed")?;

        debug!("Clear endpoint answered with status {}", response.status());
        Ok(())
    }

    pub async fn health(&self) -> Result<StatusCode> {
        let url = self.endpoint("health")?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .context("Health check failed")?;
        Ok(response.status())
    }
}

/// Pull the reply out of a `/chat` body.
///
/// The body must be an object. A missing or falsy `response` is an empty
/// reply; any other non-string `response` is malformed.
pub fn reply_text(body: &Value) -> Result<String> {
    let Some(fields) = body.as_object() else {
        bail!("Chat response is not a JSON object: {}", body);
    };
    match fields.get("response") {
        Some(Value::String(text)) => Ok(text.clone()),
        None => Ok(String::new()),
        Some(value) if is_falsy(value) => Ok(String::new()),
        Some(value) => bail!("Chat response field is not text: {}", value),
    }
}

/// Drop a leading `Assistant:` label plus the whitespace after it, then trim.
pub fn strip_assistant_prefix(reply: &str) -> String {
    reply
        .strip_prefix("Assistant:")
        .unwrap_or(reply)
        .trim()
        .to_string()
}
