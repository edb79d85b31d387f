//! Statistics collected while translating a document.

use serde::{Deserialize, Serialize};

/// Counters for one page or, once merged, the whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationStats {
    /// Pages processed (including failed ones)
    pub page_count: u32,

    /// Paragraph groups rendered
    pub paragraph_count: u32,

    /// Images embedded
    pub image_count: u32,

    /// Link anchors spliced back into translated text
    pub link_count: u32,

    /// Paragraphs whose translation failed
    pub failed_paragraphs: u32,

    /// Links whose placeholder did not survive translation
    pub unresolved_links: u32,

    /// Images dropped because they could not be placed or extracted
    pub dropped_images: u32,

    /// Pages replaced by an error block
    pub failed_pages: u32,
}

impl TranslationStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &TranslationStats) {
        self.page_count += other.page_count;
        self.paragraph_count += other.paragraph_count;
        self.image_count += other.image_count;
        self.link_count += other.link_count;
        self.failed_paragraphs += other.failed_paragraphs;
        self.unresolved_links += other.unresolved_links;
        self.dropped_images += other.dropped_images;
        self.failed_pages += other.failed_pages;
    }

    /// Whether any region of the output is degraded.
    pub fn has_failures(&self) -> bool {
        self.failed_paragraphs > 0
            || self.unresolved_links > 0
            || self.dropped_images > 0
            || self.failed_pages > 0
    }
}
