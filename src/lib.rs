//! # transpdf
//!
//! Layout-aware PDF translation to self-contained, linkable HTML.
//!
//! Each page is reconstructed into paragraphs and images from positioned
//! text spans, every paragraph is translated in a single provider call with
//! its hyperlinks protected, and the translated pages are assembled in order
//! into one HTML document with inline images and page anchors.
//!
//! ## Quick Start
//!
//! ```no_run
//! use transpdf::{translate_file, TranslateOptions};
//!
//! fn main() -> transpdf::Result<()> {
//!     let options = TranslateOptions::new()
//!         .with_source_lang("en")
//!         .with_target_lang("it");
//!
//!     let document = translate_file("paper.pdf", "paper.it.html", &options)?;
//!     println!("{} pages translated", document.page_count());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Layout reconstruction**: reading order and paragraph grouping from span geometry
//! - **Link preservation**: internal and external links survive translation
//! - **Inline images**: embedded as `data:` URIs
//! - **Parallel pages**: one task per page on a rayon pool, output always in page order
//! - **Pluggable providers**: web endpoint or a locally hosted model

pub mod detect;
pub mod error;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod source;
pub mod translate;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf_bytes, PdfFormat};
pub use error::{Error, Result};
pub use layout::LayoutOptions;
pub use model::{
    BBox, BlockGroup, ContentItem, Document, DocumentInfo, ImageHandle, ItemKind, LinkDest,
    PageFragment, ParagraphGroup, ParagraphStyle, StyleFlags, TextSpan, TranslationStats,
};
pub use pipeline::{
    translate_document, translate_document_with_progress, write_output_atomic, PageSelection,
    TranslateOptions,
};
pub use render::html_document;
pub use source::{LopdfOpener, LopdfSource, PdfSource, SourceOpener};
pub use translate::{
    create_translator, create_translator_or_unavailable, Translator, TranslatorKind,
    UnavailableTranslator,
};

use std::path::Path;
use std::sync::Arc;

/// Translate a PDF file and write the HTML document to `output`.
///
/// # Example
///
/// ```no_run
/// use transpdf::{translate_file, TranslateOptions, TranslatorKind};
///
/// let options = TranslateOptions::new()
///     .with_target_lang("de")
///     .with_translator(TranslatorKind::Local);
/// let document = translate_file("manual.pdf", "manual.de.html", &options).unwrap();
/// assert!(!document.stats.has_failures());
/// ```
pub fn translate_file<P, Q>(input: P, output: Q, options: &TranslateOptions) -> Result<Document>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let result = Transpdf::new()
        .with_options(options.clone())
        .translate_file(input)?;
    result.write_html(output)?;
    Ok(result.document)
}

/// Translate a PDF held in memory and return the HTML document.
pub fn translate_bytes(data: &[u8], options: &TranslateOptions) -> Result<String> {
    let result = Transpdf::new()
        .with_options(options.clone())
        .translate_bytes(data)?;
    Ok(result.to_html())
}

/// Read document information without translating.
pub fn document_info<P: AsRef<Path>>(path: P) -> Result<DocumentInfo> {
    LopdfOpener::from_path(path)?.info()
}

type ProgressFn = Box<dyn FnMut(u32, u32)>;

/// Builder for translating PDF documents.
///
/// # Example
///
/// ```no_run
/// use transpdf::{PageSelection, Transpdf};
///
/// Transpdf::new()
///     .with_source_lang("en")
///     .with_target_lang("fr")
///     .with_pages(PageSelection::Range(1..=3))
///     .with_threads(4)
///     .translate_file("report.pdf")?
///     .write_html("report.fr.html")?;
/// # Ok::<(), transpdf::Error>(())
/// ```
pub struct Transpdf {
    options: TranslateOptions,
    translator: Option<Arc<dyn Translator>>,
    progress: Option<ProgressFn>,
}

impl Transpdf {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: TranslateOptions::default(),
            translator: None,
            progress: None,
        }
    }

    /// Replace all options.
    pub fn with_options(mut self, options: TranslateOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the source language.
    pub fn with_source_lang(mut self, lang: impl Into<String>) -> Self {
        self.options = self.options.with_source_lang(lang);
        self
    }

    /// Set the target language.
    pub fn with_target_lang(mut self, lang: impl Into<String>) -> Self {
        self.options = self.options.with_target_lang(lang);
        self
    }

    /// Select a bundled translation provider.
    pub fn with_translator_kind(mut self, kind: TranslatorKind) -> Self {
        self.options = self.options.with_translator(kind);
        self
    }

    /// Use a custom translation provider.
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Set the provider endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.options = self.options.with_endpoint(endpoint);
        self
    }

    /// Set the number of worker threads.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.options = self.options.with_threads(threads);
        self
    }

    /// Process pages one at a time.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// Set layout options.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.options = self.options.with_layout(layout);
        self
    }

    /// Report `(done, total)` after each completed page.
    pub fn with_progress(mut self, progress: impl FnMut(u32, u32) + 'static) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Translate a PDF file.
    pub fn translate_file<P: AsRef<Path>>(self, path: P) -> Result<TranslationResult> {
        let opener = LopdfOpener::from_path(path)?;
        self.translate_with(&opener)
    }

    /// Translate a PDF from bytes.
    pub fn translate_bytes(self, data: &[u8]) -> Result<TranslationResult> {
        let opener = LopdfOpener::from_bytes(data)?;
        self.translate_with(&opener)
    }

    /// Translate a document from any source.
    pub fn translate_with<O: SourceOpener>(self, opener: &O) -> Result<TranslationResult> {
        let translator = match self.translator {
            Some(t) => t,
            None => create_translator_or_unavailable(
                self.options.translator,
                self.options.endpoint.as_deref(),
            ),
        };

        let document = match self.progress {
            Some(mut progress) => translate_document_with_progress(
                opener,
                translator.as_ref(),
                &self.options,
                |done, total| progress(done, total),
            )?,
            None => translate_document(opener, translator.as_ref(), &self.options)?,
        };

        Ok(TranslationResult {
            document,
            target_lang: self.options.target_lang,
        })
    }
}

impl Default for Transpdf {
    fn default() -> Self {
        Self::new()
    }
}

/// A translated document ready to be written.
#[derive(Debug, Clone)]
pub struct TranslationResult {
    /// The translated document
    pub document: Document,
    target_lang: String,
}

impl TranslationResult {
    /// Render the complete HTML document, titled after the input file name.
    ///
    /// Input without a file name falls back to the metadata title, then to
    /// `"document"`.
    pub fn to_html(&self) -> String {
        let title = self.document.info.display_name().unwrap_or("document");
        html_document(&self.document.body(), title, &self.target_lang)
    }

    /// Write the HTML document atomically.
    pub fn write_html<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_output_atomic(path, &self.to_html())
    }

    /// Statistics merged over all pages.
    pub fn stats(&self) -> &TranslationStats {
        &self.document.stats
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transpdf_builder() {
        let builder = Transpdf::new()
            .with_source_lang("en")
            .with_target_lang("es")
            .with_translator_kind(TranslatorKind::Local)
            .with_pages(PageSelection::Pages(vec![2]))
            .sequential();

        assert_eq!(builder.options.target_lang, "es");
        assert_eq!(builder.options.translator, TranslatorKind::Local);
        assert_eq!(builder.options.threads, Some(1));
        assert!(builder.translator.is_none());
    }

    #[test]
    fn test_translate_bytes_rejects_non_pdf() {
        let result = translate_bytes(b"not a pdf", &TranslateOptions::default());
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_translate_bytes_rejects_empty_input() {
        let result = Transpdf::new().translate_bytes(&[]);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_translation_result_html() {
        let page = PageFragment::new(0, "<p>Ciao</p>".into(), TranslationStats::default());
        let result = TranslationResult {
            document: Document::new(
                DocumentInfo::with_page_count(1)
                    .with_title("Greetings")
                    .with_file_name("hello.pdf"),
                vec![page],
            ),
            target_lang: "it".into(),
        };

        let html = result.to_html();
        assert!(html.contains("<title>Translation of hello.pdf</title>"));
        assert!(html.contains("<p>Ciao</p>"));
        assert_eq!(result.stats().page_count, 1);
    }
}
