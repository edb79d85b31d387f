//! Block groups: paragraphs and images formed from adjacent content items.

use serde::{Deserialize, Serialize};

use super::{BBox, ContentItem, ImageHandle, ItemKind};

/// Font size used when a paragraph carries no text-bearing item.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Dominant style of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParagraphStyle {
    /// Font size in points
    pub size: f32,
    /// Bold weight
    pub bold: bool,
    /// Italic style
    pub italic: bool,
}

impl Default for ParagraphStyle {
    fn default() -> Self {
        Self {
            size: DEFAULT_FONT_SIZE,
            bold: false,
            italic: false,
        }
    }
}

/// An ordered run of text/link items that form one paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphGroup {
    /// Items in reading order
    pub items: Vec<ContentItem>,
    /// Derived dominant style
    pub style: ParagraphStyle,
}

impl ParagraphGroup {
    /// Create a paragraph with the default style.
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self {
            items,
            style: ParagraphStyle::default(),
        }
    }

    /// Set the style.
    pub fn with_style(mut self, style: ParagraphStyle) -> Self {
        self.style = style;
        self
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the paragraph has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of link items.
    pub fn link_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_link()).count()
    }

    /// Untranslated text, items joined by a single space.
    pub fn plain_text(&self) -> String {
        self.items
            .iter()
            .filter_map(ContentItem::text_content)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Bounding box covering all items.
    pub fn bbox(&self) -> Option<BBox> {
        self.items
            .iter()
            .map(|i| i.bbox)
            .reduce(|acc, b| acc.union(&b))
    }
}

/// A paragraph or image unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockGroup {
    /// Exactly one image item
    Image(ContentItem),
    /// A paragraph of text/link items
    Paragraph(ParagraphGroup),
}

impl BlockGroup {
    /// The image handle, for image groups.
    pub fn image_handle(&self) -> Option<&ImageHandle> {
        match self {
            BlockGroup::Image(ContentItem {
                kind: ItemKind::Image(handle),
                ..
            }) => Some(handle),
            _ => None,
        }
    }

    /// The paragraph, for paragraph groups.
    pub fn as_paragraph(&self) -> Option<&ParagraphGroup> {
        match self {
            BlockGroup::Paragraph(p) => Some(p),
            BlockGroup::Image(_) => None,
        }
    }

    /// Number of content items in this group.
    pub fn item_count(&self) -> usize {
        match self {
            BlockGroup::Image(_) => 1,
            BlockGroup::Paragraph(p) => p.len(),
        }
    }

    /// Check if this group is an image.
    pub fn is_image(&self) -> bool {
        matches!(self, BlockGroup::Image(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LinkDest, StyleFlags, TextSpan};

    fn span_item(text: &str, x0: f32, y0: f32) -> ContentItem {
        ContentItem::text(
            BBox::new(x0, y0, x0 + 40.0, y0 + 10.0),
            TextSpan::new(text, 10.0, StyleFlags::empty()),
        )
    }

    #[test]
    fn test_paragraph_plain_text_and_links() {
        let link = span_item("here", 50.0, 0.0).into_link(LinkDest::Uri("example.com".into()));
        let para = ParagraphGroup::new(vec![span_item("Click", 0.0, 0.0), link]);
        assert_eq!(para.plain_text(), "Click here");
        assert_eq!(para.link_count(), 1);
        assert_eq!(para.bbox(), Some(BBox::new(0.0, 0.0, 90.0, 10.0)));
    }

    #[test]
    fn test_default_style() {
        let para = ParagraphGroup::new(vec![]);
        assert_eq!(para.style.size, DEFAULT_FONT_SIZE);
        assert!(para.is_empty());
        assert!(para.bbox().is_none());
    }

    #[test]
    fn test_block_group_accessors() {
        let image = BlockGroup::Image(ContentItem::image(
            BBox::new(0.0, 0.0, 5.0, 5.0),
            ImageHandle::new(7, "Im0"),
        ));
        assert!(image.is_image());
        assert_eq!(image.image_handle().map(|h| h.id), Some(7));
        assert_eq!(image.item_count(), 1);
        assert!(image.as_paragraph().is_none());
    }
}
