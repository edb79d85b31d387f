//! Page fragments.

use serde::{Deserialize, Serialize};

use super::TranslationStats;

/// Rendered markup for one page.
///
/// A fragment is produced once by a page task and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageFragment {
    /// 0-based page index
    pub index: u32,

    /// Rendered HTML: anchor, block groups, footer
    pub html: String,

    /// Counters for this page
    pub stats: TranslationStats,

    /// Whether the page was replaced by an error block
    pub failed: bool,
}

impl PageFragment {
    /// Create a fragment for a successfully processed page.
    pub fn new(index: u32, html: String, mut stats: TranslationStats) -> Self {
        stats.page_count = 1;
        Self {
            index,
            html,
            stats,
            failed: false,
        }
    }

    /// Create a fragment standing in for a page that failed.
    pub fn failed(index: u32, html: String) -> Self {
        Self {
            index,
            html,
            stats: TranslationStats {
                page_count: 1,
                failed_pages: 1,
                ..Default::default()
            },
            failed: true,
        }
    }

    /// 1-based page number, as shown to readers.
    pub fn number(&self) -> u32 {
        self.index + 1
    }
}
