//! Paragraph grouping.
//!
//! A single pass over reading-ordered items. The only state is the open
//! paragraph buffer: a text or link item either continues it or closes it
//! and opens a new one, and an image always closes it.

use super::LayoutOptions;
use crate::model::{BlockGroup, ContentItem, ParagraphGroup};

/// Group reading-ordered items into paragraphs and images.
///
/// Paragraphs carry the default style; see [`super::summarize_style`].
pub fn group_items(items: Vec<ContentItem>, options: &LayoutOptions) -> Vec<BlockGroup> {
    let mut groups = Vec::new();
    let mut buffer: Vec<ContentItem> = Vec::new();

    for item in items {
        if item.is_image() {
            flush(&mut buffer, &mut groups);
            groups.push(BlockGroup::Image(item));
            continue;
        }

        if let Some(prev) = buffer.last() {
            if !continues_paragraph(prev, &item, options) {
                flush(&mut buffer, &mut groups);
            }
        }
        buffer.push(item);
    }

    flush(&mut buffer, &mut groups);
    groups
}

/// Whether `item` belongs to the same paragraph as `prev`.
///
/// A degenerate previous line (zero, negative or NaN height) always breaks.
pub fn continues_paragraph(prev: &ContentItem, item: &ContentItem, options: &LayoutOptions) -> bool {
    let line_height = prev.bbox.height();
    if !line_height.is_finite() || line_height <= 0.0 {
        return false;
    }

    let vertical_gap = item.bbox.y0 - prev.bbox.y1;
    let is_indented = item.bbox.x0 - prev.bbox.x0 > options.indent_threshold;

    vertical_gap < options.gap_ratio * line_height && !is_indented
}

fn flush(buffer: &mut Vec<ContentItem>, groups: &mut Vec<BlockGroup>) {
    if !buffer.is_empty() {
        groups.push(BlockGroup::Paragraph(ParagraphGroup::new(std::mem::take(
            buffer,
        ))));
    }
}
