//! Translation providers and link-preserving paragraph translation.
//!
//! A [`Translator`] turns one string from a source language into a target
//! language. Providers are interchangeable behind `Arc<dyn Translator>`,
//! selected by [`TranslatorKind`] at configuration time.

mod links;
mod local;
mod remote;

pub use links::{
    link_href, protect_links, restore_links, translate_paragraph, ProtectedText,
    TranslatedParagraph, LINK_CLOSE, LINK_OPEN,
};
pub use local::{
    init_local_model, local_model, shutdown_local_model, LocalModel, LocalTranslator,
    DEFAULT_LOCAL_ENDPOINT,
};
pub use remote::{RemoteTranslator, DEFAULT_REMOTE_ENDPOINT};

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Error, Result};

/// A text translation provider.
///
/// Implementations must be safe to call concurrently from page tasks.
pub trait Translator: Send + Sync {
    /// Short provider name, for logs.
    fn name(&self) -> &str;

    /// Translate `text` from `source_lang` to `target_lang`.
    ///
    /// The input may contain `<x-link>` sentinel tags and HTML entities,
    /// which should be carried through unchanged.
    fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String>;
}

/// Available translation providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranslatorKind {
    /// Public web translation endpoint
    #[default]
    Remote,
    /// Locally hosted model server
    Local,
}

impl fmt::Display for TranslatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslatorKind::Remote => write!(f, "remote"),
            TranslatorKind::Local => write!(f, "local"),
        }
    }
}

impl FromStr for TranslatorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" | "google" => Ok(TranslatorKind::Remote),
            "local" => Ok(TranslatorKind::Local),
            other => Err(Error::Config(format!(
                "unknown translator '{}', expected 'remote' or 'local'",
                other
            ))),
        }
    }
}

/// Build the provider for `kind`.
///
/// `endpoint` overrides the provider's default URL. For the local provider
/// this initializes the shared model client on first use.
pub fn create_translator(
    kind: TranslatorKind,
    endpoint: Option<&str>,
) -> Result<Arc<dyn Translator>> {
    match kind {
        TranslatorKind::Remote => {
            let translator = match endpoint {
                Some(url) => RemoteTranslator::with_endpoint(url)?,
                None => RemoteTranslator::new()?,
            };
            Ok(Arc::new(translator))
        }
        TranslatorKind::Local => {
            let endpoint = endpoint.unwrap_or(DEFAULT_LOCAL_ENDPOINT);
            init_local_model(endpoint)?;
            Ok(Arc::new(LocalTranslator::new()))
        }
    }
}

/// Build the provider for `kind`, degrading to [`UnavailableTranslator`]
/// when it cannot be initialized.
///
/// The document is still processed: pages, images and anchors render, and
/// every paragraph shows its original text in a failure block.
pub fn create_translator_or_unavailable(
    kind: TranslatorKind,
    endpoint: Option<&str>,
) -> Arc<dyn Translator> {
    match create_translator(kind, endpoint) {
        Ok(translator) => translator,
        Err(e) => {
            log::error!("Could not initialize the {} translator: {}", kind, e);
            Arc::new(UnavailableTranslator::new(kind, e.to_string()))
        }
    }
}

/// A provider that failed to initialize. Every request fails.
#[derive(Debug, Clone)]
pub struct UnavailableTranslator {
    kind: TranslatorKind,
    reason: String,
}

impl UnavailableTranslator {
    /// Create a stand-in for `kind`, remembering why it is unavailable.
    pub fn new(kind: TranslatorKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

impl Translator for UnavailableTranslator {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn translate(&self, _text: &str, _source_lang: &str, _target_lang: &str) -> Result<String> {
        Err(Error::ProviderUnavailable(format!(
            "{} translator: {}",
            self.kind, self.reason
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translator_kind_parse() {
        assert_eq!("remote".parse::<TranslatorKind>().unwrap(), TranslatorKind::Remote);
        assert_eq!("LOCAL".parse::<TranslatorKind>().unwrap(), TranslatorKind::Local);
        assert_eq!(" Local ".parse::<TranslatorKind>().unwrap(), TranslatorKind::Local);
        assert!(matches!(
            "deepl".parse::<TranslatorKind>(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_translator_kind_display_round_trip() {
        for kind in [TranslatorKind::Remote, TranslatorKind::Local] {
            assert_eq!(kind.to_string().parse::<TranslatorKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unavailable_translator_fails_every_request() {
        let translator = UnavailableTranslator::new(TranslatorKind::Local, "lock poisoned");
        match translator.translate("Hello", "en", "it") {
            Err(Error::ProviderUnavailable(msg)) => {
                assert_eq!(msg, "local translator: lock poisoned")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_create_remote_translator() {
        let translator = create_translator(TranslatorKind::Remote, None).unwrap();
        assert_eq!(translator.name(), "remote");
    }
}
