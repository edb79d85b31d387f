//! Dominant paragraph style.

use std::collections::BTreeMap;

use crate::model::{ContentItem, ParagraphStyle, StyleFlags, DEFAULT_FONT_SIZE};

/// Summarize the dominant size and weight/slant of a run of items.
///
/// The size is the mode of the text-bearing items' sizes bucketed to 0.1pt;
/// flags are the mode of the whole flag bitset. Ties go to the smaller
/// value. Without text-bearing items the default style is returned.
pub fn summarize_style(items: &[ContentItem]) -> ParagraphStyle {
    let mut sizes: BTreeMap<i64, usize> = BTreeMap::new();
    let mut flags: BTreeMap<u32, usize> = BTreeMap::new();

    for span in items.iter().filter_map(ContentItem::span) {
        if span.size.is_finite() {
            *sizes.entry(bucket(span.size)).or_default() += 1;
        }
        *flags.entry(span.flags.bits()).or_default() += 1;
    }

    let size = mode(&sizes)
        .map(|b| b as f32 / 10.0)
        .unwrap_or(DEFAULT_FONT_SIZE);
    let flags = StyleFlags(mode(&flags).unwrap_or(0));

    ParagraphStyle {
        size,
        bold: flags.is_bold(),
        italic: flags.is_italic(),
    }
}

fn bucket(size: f32) -> i64 {
    (size * 10.0).round() as i64
}

/// Most frequent key; keys iterate ascending so the first maximum is the smallest.
fn mode<K: Copy + Ord>(counts: &BTreeMap<K, usize>) -> Option<K> {
    let mut best: Option<(K, usize)> = None;
    for (&key, &count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((key, count));
        }
    }
    best.map(|(k, _)| k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, ImageHandle, TextSpan};

    fn sized(size: f32, flags: u32) -> ContentItem {
        ContentItem::text(
            BBox::new(0.0, 0.0, 10.0, 10.0),
            TextSpan::new("x", size, StyleFlags(flags)),
        )
    }

    #[test]
    fn test_mode_size() {
        let items = vec![sized(10.0, 0), sized(10.0, 0), sized(12.0, 0)];
        assert_eq!(summarize_style(&items).size, 10.0);
    }

    #[test]
    fn test_size_tie_prefers_smallest() {
        let items = vec![sized(12.0, 0), sized(10.0, 0)];
        assert_eq!(summarize_style(&items).size, 10.0);
    }

    #[test]
    fn test_sizes_bucket_to_tenths() {
        let items = vec![sized(11.02, 0), sized(10.98, 0), sized(9.0, 0)];
        assert_eq!(summarize_style(&items).size, 11.0);
    }

    #[test]
    fn test_default_without_text() {
        let image = ContentItem::image(BBox::new(0.0, 0.0, 5.0, 5.0), ImageHandle::new(1, "Im1"));
        assert_eq!(summarize_style(&[image]), ParagraphStyle::default());
        assert_eq!(summarize_style(&[]).size, 12.0);
    }

    #[test]
    fn test_flags_mode() {
        let bold_italic = StyleFlags::BOLD | StyleFlags::ITALIC;
        let items = vec![sized(10.0, bold_italic), sized(10.0, bold_italic), sized(10.0, 0)];
        let style = summarize_style(&items);
        assert!(style.bold);
        assert!(style.italic);

        // Tie between plain and bold resolves to plain
        let items = vec![sized(10.0, StyleFlags::BOLD), sized(10.0, 0)];
        assert!(!summarize_style(&items).bold);
    }
}
