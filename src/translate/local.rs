//! Locally hosted model provider.
//!
//! The model server is loaded once per process and shared by every page
//! task. [`init_local_model`] must run before the first translation;
//! [`shutdown_local_model`] releases the shared client. Translating with
//! no model loaded fails with [`Error::ProviderUnavailable`].

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::Translator;
use crate::error::{Error, Result};

/// Endpoint of a model server on the default local port.
pub const DEFAULT_LOCAL_ENDPOINT: &str = "http://127.0.0.1:5000/translate";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

static LOCAL_MODEL: RwLock<Option<Arc<LocalModel>>> = RwLock::new(None);

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: String,
}

/// Client for a model server speaking the LibreTranslate JSON protocol.
#[derive(Debug)]
pub struct LocalModel {
    client: Client,
    endpoint: String,
}

impl LocalModel {
    fn connect(endpoint: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::ProviderUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    /// Endpoint this model answers on.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Translate line by line. Blank lines are dropped from the output.
    pub fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String> {
        let mut translated = Vec::new();

        for chunk in text.split('\n').filter(|c| !c.trim().is_empty()) {
            let response: TranslateResponse = self
                .client
                .post(&self.endpoint)
                .json(&TranslateRequest {
                    q: chunk,
                    source: source_lang,
                    target: target_lang,
                    format: "html",
                })
                .send()?
                .error_for_status()?
                .json()?;
            translated.push(response.translated_text);
        }

        Ok(translated.join("\n"))
    }
}

/// Load the shared model client for `endpoint`.
///
/// Calling again with the same endpoint returns the loaded model; a
/// different endpoint replaces it.
pub fn init_local_model(endpoint: &str) -> Result<Arc<LocalModel>> {
    let mut slot = LOCAL_MODEL
        .write()
        .map_err(|_| Error::ProviderUnavailable("local model lock poisoned".to_string()))?;

    if let Some(model) = slot.as_ref().filter(|m| m.endpoint == endpoint) {
        return Ok(Arc::clone(model));
    }

    log::info!("Loading local translation model at {}", endpoint);
    let model = Arc::new(LocalModel::connect(endpoint)?);
    *slot = Some(Arc::clone(&model));
    Ok(model)
}

/// The loaded model, if any.
pub fn local_model() -> Option<Arc<LocalModel>> {
    LOCAL_MODEL.read().ok().and_then(|slot| slot.clone())
}

/// Release the shared model. Translators created earlier start failing.
pub fn shutdown_local_model() {
    if let Ok(mut slot) = LOCAL_MODEL.write() {
        if slot.take().is_some() {
            log::info!("Local translation model unloaded");
        }
    }
}

/// Translator that forwards to the process-wide local model.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTranslator;

impl LocalTranslator {
    /// Create a handle to the shared model.
    pub fn new() -> Self {
        Self
    }
}

impl Translator for LocalTranslator {
    fn name(&self) -> &str {
        "local"
    }

    fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String> {
        let model = local_model().ok_or_else(|| {
            Error::ProviderUnavailable("local translation model is not initialized".to_string())
        })?;
        model.translate(text, source_lang, target_lang)
    }
}
