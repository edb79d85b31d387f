//! Content items: the atomic elements extracted from a page.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::BBox;

/// Style flag bits as encoded by the parsing provider.
///
/// The bit positions are an external format and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct StyleFlags(pub u32);

impl StyleFlags {
    /// Superscript glyphs
    pub const SUPERSCRIPT: u32 = 1 << 0;
    /// Italic font
    pub const ITALIC: u32 = 1 << 1;
    /// Serifed font
    pub const SERIFED: u32 = 1 << 2;
    /// Monospaced font
    pub const MONOSPACED: u32 = 1 << 3;
    /// Bold font
    pub const BOLD: u32 = 1 << 4;

    /// No flags set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Raw bit value.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Check whether every bit of `mask` is set.
    pub const fn contains(self, mask: u32) -> bool {
        self.0 & mask == mask
    }

    /// Return a copy with `mask` set.
    pub const fn with(self, mask: u32) -> Self {
        Self(self.0 | mask)
    }

    /// Bold bit (bit 4).
    pub fn is_bold(self) -> bool {
        self.contains(Self::BOLD)
    }

    /// Italic bit (bit 1).
    pub fn is_italic(self) -> bool {
        self.contains(Self::ITALIC)
    }

    /// Derive flags from a PostScript base font name such as `Times-BoldItalic`.
    pub fn from_font_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        let mut flags = Self::empty();
        if lower.contains("bold") || lower.contains("black") || lower.contains("heavy") {
            flags = flags.with(Self::BOLD);
        }
        if lower.contains("italic") || lower.contains("oblique") {
            flags = flags.with(Self::ITALIC);
        }
        if lower.contains("courier") || lower.contains("mono") {
            flags = flags.with(Self::MONOSPACED);
        }
        if lower.contains("times") || (lower.contains("serif") && !lower.contains("sans")) {
            flags = flags.with(Self::SERIFED);
        }
        flags
    }
}

/// Where a hyperlink points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum LinkDest {
    /// External destination, possibly without a scheme (e.g. `example.com`)
    Uri(String),
    /// Internal jump to a 0-based page index
    Page(u32),
}

impl fmt::Display for LinkDest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkDest::Uri(uri) => write!(f, "{}", uri),
            LinkDest::Page(page) => write!(f, "page {}", page),
        }
    }
}

/// Opaque reference to an image, resolvable by the parsing provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHandle {
    /// Provider-specific key
    pub id: u64,
    /// Resource name, for diagnostics
    pub name: String,
}

impl ImageHandle {
    /// Create a new handle.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Text payload shared by plain spans and links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// Font size in points
    pub size: f32,
    /// Provider style flags
    pub flags: StyleFlags,
}

impl TextSpan {
    /// Create a new text span.
    pub fn new(text: impl Into<String>, size: f32, flags: StyleFlags) -> Self {
        Self {
            text: text.into(),
            size,
            flags,
        }
    }
}

/// The variant part of a [`ContentItem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemKind {
    /// Plain text span
    Text(TextSpan),
    /// Text span that lies on a hyperlink region
    Link {
        /// The text payload
        span: TextSpan,
        /// Link destination
        dest: LinkDest,
    },
    /// Image placement
    Image(ImageHandle),
}

/// One atomic extracted element with its bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Position on the page
    pub bbox: BBox,
    /// What the item is
    pub kind: ItemKind,
}

impl ContentItem {
    /// Create a text item.
    pub fn text(bbox: BBox, span: TextSpan) -> Self {
        Self {
            bbox,
            kind: ItemKind::Text(span),
        }
    }

    /// Create a link item.
    pub fn link(bbox: BBox, span: TextSpan, dest: LinkDest) -> Self {
        Self {
            bbox,
            kind: ItemKind::Link { span, dest },
        }
    }

    /// Create an image item.
    pub fn image(bbox: BBox, handle: ImageHandle) -> Self {
        Self {
            bbox,
            kind: ItemKind::Image(handle),
        }
    }

    /// The text payload for text and link items.
    pub fn span(&self) -> Option<&TextSpan> {
        match &self.kind {
            ItemKind::Text(span) | ItemKind::Link { span, .. } => Some(span),
            ItemKind::Image(_) => None,
        }
    }

    /// The text for text and link items.
    pub fn text_content(&self) -> Option<&str> {
        self.span().map(|s| s.text.as_str())
    }

    /// The link destination, if this is a link.
    pub fn link_dest(&self) -> Option<&LinkDest> {
        match &self.kind {
            ItemKind::Link { dest, .. } => Some(dest),
            _ => None,
        }
    }

    /// Whether the item carries text (plain span or link).
    pub fn is_text_bearing(&self) -> bool {
        self.span().is_some()
    }

    /// Whether the item is a link.
    pub fn is_link(&self) -> bool {
        matches!(self.kind, ItemKind::Link { .. })
    }

    /// Whether the item is an image.
    pub fn is_image(&self) -> bool {
        matches!(self.kind, ItemKind::Image(_))
    }

    /// Promote a plain text item to a link. Other items are returned unchanged.
    pub fn into_link(self, dest: LinkDest) -> Self {
        match self.kind {
            ItemKind::Text(span) => Self::link(self.bbox, span, dest),
            kind => Self {
                bbox: self.bbox,
                kind,
            },
        }
    }
}
