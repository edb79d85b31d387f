//! Web translation provider.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use super::Translator;
use crate::error::{Error, Result};

/// Public endpoint used when none is configured.
pub const DEFAULT_REMOTE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Translator backed by the public web translation endpoint.
///
/// One blocking GET per call; the client's connection pool is shared by all
/// page tasks.
#[derive(Debug, Clone)]
pub struct RemoteTranslator {
    client: Client,
    endpoint: String,
}

impl RemoteTranslator {
    /// Create a translator for the default endpoint.
    pub fn new() -> Result<Self> {
        Self::with_endpoint(DEFAULT_REMOTE_ENDPOINT)
    }

    /// Create a translator for a custom endpoint speaking the same protocol.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("transpdf/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::ProviderUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// The configured endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Translator for RemoteTranslator {
    fn name(&self) -> &str {
        "remote"
    }

    fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let body: Value = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", source_lang),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ])
            .send()?
            .error_for_status()?
            .json()?;

        parse_response(&body)
    }
}

/// Concatenate the translated segments of a response.
///
/// The payload is a nested array whose first element lists segments as
/// `[translated, original, ...]`.
fn parse_response(body: &Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| Error::Translation("unexpected response shape".to_string()))?;

    Ok(segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect())
}
