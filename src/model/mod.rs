//! Document model types.
//!
//! This module defines the intermediate representation that flows through
//! the pipeline: content items extracted from a page, the block groups they
//! are merged into, and the rendered page fragments that make up a
//! translated document.

mod document;
mod geometry;
mod group;
mod item;
mod page;
mod stats;

pub use document::{Document, DocumentInfo};
pub use geometry::BBox;
pub use group::{BlockGroup, ParagraphGroup, ParagraphStyle, DEFAULT_FONT_SIZE};
pub use item::{ContentItem, ImageHandle, ItemKind, LinkDest, StyleFlags, TextSpan};
pub use page::PageFragment;
pub use stats::TranslationStats;
