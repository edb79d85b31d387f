//! Document-level types.

use super::{PageFragment, TranslationStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A translated document: page fragments in page order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Source document information
    pub info: DocumentInfo,

    /// Fragments, ordered by page index
    pub pages: Vec<PageFragment>,

    /// Statistics merged over all pages
    pub stats: TranslationStats,
}

impl Document {
    /// Create a document from fragments that are already in page order.
    pub fn new(info: DocumentInfo, pages: Vec<PageFragment>) -> Self {
        let mut stats = TranslationStats::new();
        for page in &pages {
            stats.merge(&page.stats);
        }
        Self { info, pages, stats }
    }

    /// Number of rendered pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Concatenate the page fragments in index order.
    pub fn body(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.html.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Source document information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Title from the document metadata
    pub title: Option<String>,

    /// File name of the input, when read from disk
    pub file_name: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Creator application
    pub creator: Option<String>,

    /// PDF producer
    pub producer: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,

    /// PDF version (e.g., "1.7")
    pub pdf_version: String,

    /// Total number of pages in the source
    pub page_count: u32,

    /// Whether the document is encrypted
    pub encrypted: bool,
}

impl DocumentInfo {
    /// Create info with a page count only.
    pub fn with_page_count(page_count: u32) -> Self {
        Self {
            page_count,
            ..Default::default()
        }
    }

    /// Set the metadata title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the input file name.
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Name shown in the translated document: the input file name, then
    /// the metadata title.
    pub fn display_name(&self) -> Option<&str> {
        self.file_name.as_deref().or(self.title.as_deref())
    }
}
