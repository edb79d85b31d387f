//! Translation run options.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};
use crate::layout::LayoutOptions;
use crate::translate::TranslatorKind;

/// Options for translating a document.
#[derive(Debug, Clone)]
pub struct TranslateOptions {
    /// Language of the source document
    pub source_lang: String,

    /// Language to translate into
    pub target_lang: String,

    /// Translation provider
    pub translator: TranslatorKind,

    /// Provider endpoint override
    pub endpoint: Option<String>,

    /// Worker threads for page tasks (`None` = rayon default)
    pub threads: Option<usize>,

    /// Pages to translate (1-indexed)
    pub pages: PageSelection,

    /// Layout reconstruction thresholds
    pub layout: LayoutOptions,
}

impl TranslateOptions {
    /// Create new translate options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source language.
    pub fn with_source_lang(mut self, lang: impl Into<String>) -> Self {
        self.source_lang = lang.into();
        self
    }

    /// Set the target language.
    pub fn with_target_lang(mut self, lang: impl Into<String>) -> Self {
        self.target_lang = lang.into();
        self
    }

    /// Set the translation provider.
    pub fn with_translator(mut self, kind: TranslatorKind) -> Self {
        self.translator = kind;
        self
    }

    /// Set the provider endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the number of worker threads.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Process pages one at a time.
    pub fn sequential(self) -> Self {
        self.with_threads(1)
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Set layout options.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            source_lang: "en".to_string(),
            target_lang: "it".to_string(),
            translator: TranslatorKind::default(),
            endpoint: None,
            threads: None,
            pages: PageSelection::All,
            layout: LayoutOptions::default(),
        }
    }
}

/// Page selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Every page
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a 1-indexed page number is selected.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Selected 0-based page indices of a document with `page_count` pages.
    pub fn indices(&self, page_count: u32) -> Vec<u32> {
        (0..page_count).filter(|i| self.includes(i + 1)).collect()
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        let invalid = || Error::InvalidPageRange(s.to_string());
        let number = |part: &str| -> Result<u32> {
            match part.trim().parse::<u32>() {
                Ok(n) if n >= 1 => Ok(n),
                _ => Err(invalid()),
            }
        };

        if let Some((start, end)) = s.split_once('-') {
            if !s.contains(',') {
                let (start, end) = (number(start)?, number(end)?);
                if start > end {
                    return Err(invalid());
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            match part.split_once('-') {
                Some((start, end)) => {
                    let (start, end) = (number(start)?, number(end)?);
                    if start > end {
                        return Err(invalid());
                    }
                    pages.extend(start..=end);
                }
                None => pages.push(number(part)?),
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

impl std::str::FromStr for PageSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
