//! Document-parsing provider abstraction.
//!
//! The pipeline never touches a concrete PDF library. It consumes a
//! [`PdfSource`] that lists positioned text spans, images and link regions
//! per page, and a [`SourceOpener`] that hands every page task its own
//! source handle. PDF libraries are generally not safe to share across
//! threads, so handles are acquired and dropped inside each task.
//!
//! [`LopdfOpener`] is the bundled implementation backed by `lopdf`.

mod content;
mod lopdf_source;
mod text;

pub use lopdf_source::{LopdfOpener, LopdfSource};
pub use text::{decode_text_simple, is_spaceless_script_char, parse_pdf_date};

use crate::error::Result;
use crate::model::{BBox, DocumentInfo, ImageHandle, LinkDest, StyleFlags};

/// A positioned text span as reported by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTextItem {
    /// Bounding box in top-left page coordinates
    pub bbox: BBox,
    /// Text content
    pub text: String,
    /// Font size in points
    pub size: f32,
    /// Style flag bits
    pub flags: StyleFlags,
}

impl RawTextItem {
    /// Create a new raw text item.
    pub fn new(bbox: BBox, text: impl Into<String>, size: f32, flags: StyleFlags) -> Self {
        Self {
            bbox,
            text: text.into(),
            size,
            flags,
        }
    }
}

/// An image reference. `bbox` is `None` when the provider cannot place it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawImage {
    /// Opaque handle for [`PdfSource::extract_image`]
    pub handle: ImageHandle,
    /// Placement on the page, if known
    pub bbox: Option<BBox>,
}

/// A hyperlink region.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLink {
    /// Active area of the link
    pub bbox: BBox,
    /// Destination
    pub dest: LinkDest,
}

/// Raw encoded image bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    /// Encoded bytes, ready to embed
    pub bytes: Vec<u8>,
    /// Format name used in the data URI, e.g. `jpeg` or `png`
    pub format: String,
}

impl ImageData {
    /// Create new image data.
    pub fn new(bytes: Vec<u8>, format: impl Into<String>) -> Self {
        Self {
            bytes,
            format: format.into(),
        }
    }
}

/// Per-page access to a parsed document. Page indices are 0-based.
pub trait PdfSource {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Text spans of a page, in provider order.
    fn text_items(&self, page: u32) -> Result<Vec<RawTextItem>>;

    /// Image references of a page, in provider order.
    fn images(&self, page: u32) -> Result<Vec<RawImage>>;

    /// Hyperlink regions of a page, in provider order.
    fn links(&self, page: u32) -> Result<Vec<RawLink>>;

    /// Resolve an image handle into encoded bytes.
    fn extract_image(&self, handle: &ImageHandle) -> Result<ImageData>;
}

/// Factory for per-task [`PdfSource`] handles.
pub trait SourceOpener: Send + Sync {
    /// The source type handed to each task.
    type Source: PdfSource;

    /// Acquire a fresh, task-private source handle.
    fn open(&self) -> Result<Self::Source>;

    /// Document information. The default only reports the page count.
    fn info(&self) -> Result<DocumentInfo> {
        let source = self.open()?;
        Ok(DocumentInfo::with_page_count(source.page_count()))
    }
}
