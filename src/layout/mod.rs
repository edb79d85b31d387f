//! Page layout reconstruction.
//!
//! Turns the raw listings of a [`PdfSource`] into ordered [`BlockGroup`]s:
//!
//! 1. [`extract_items`] filters noise, normalizes text and promotes spans
//!    lying on link regions to links.
//! 2. [`sort_reading_order`] orders items top-to-bottom, left-to-right.
//! 3. [`group_items`] merges consecutive lines into paragraphs.
//! 4. [`summarize_style`] derives each paragraph's dominant style.
//!
//! [`PdfSource`]: crate::source::PdfSource

mod extract;
mod grouping;
mod options;
mod reading_order;
mod style;

pub use extract::{classify_links, extract_items, Extraction};
pub use grouping::{continues_paragraph, group_items};
pub use options::LayoutOptions;
pub use reading_order::sort_reading_order;
pub use style::summarize_style;

use crate::model::{BlockGroup, ContentItem};

/// Sort, group and style the content items of one page.
pub fn analyze_page(mut items: Vec<ContentItem>, options: &LayoutOptions) -> Vec<BlockGroup> {
    sort_reading_order(&mut items);

    group_items(items, options)
        .into_iter()
        .map(|group| match group {
            BlockGroup::Paragraph(p) => {
                let style = summarize_style(&p.items);
                BlockGroup::Paragraph(p.with_style(style))
            }
            image => image,
        })
        .collect()
}
