//! Page fragment assembly.

use super::html::escape_html;
use super::image::image_block;
use crate::model::{PageFragment, ParagraphStyle, TranslationStats};
use crate::source::ImageData;

/// Anchor that internal links target, keyed by 0-based page index.
pub fn page_anchor(index: u32) -> String {
    format!(r#"<a id="page-{}"></a>"#, index)
}

/// Footer closing every page.
pub fn page_footer(index: u32) -> String {
    format!(
        r#"<div><hr><p style="text-align:center; color: #888;">--- Page {} ---</p></div>"#,
        index + 1
    )
}

fn style_attr(style: &ParagraphStyle) -> String {
    let mut css = format!("font-size: {}px;", style.size);
    if style.bold {
        css.push_str(" font-weight: bold;");
    }
    if style.italic {
        css.push_str(" font-style: italic;");
    }
    css
}

/// Fragment that replaces a page whose processing failed.
pub fn page_error_fragment(index: u32, message: &str) -> PageFragment {
    let html = format!(
        "{}\n<p class=\"page-error\" style=\"color:red;\"><strong>Error processing page {}: {}</strong></p>",
        page_anchor(index),
        index + 1,
        escape_html(message)
    );
    PageFragment::failed(index, html)
}

/// Accumulates the HTML blocks and counters of one page.
#[derive(Debug)]
pub struct PageBuilder {
    index: u32,
    parts: Vec<String>,
    stats: TranslationStats,
}

impl PageBuilder {
    /// Start a page; the anchor is emitted immediately.
    pub fn new(index: u32) -> Self {
        Self {
            index,
            parts: vec![page_anchor(index)],
            stats: TranslationStats::new(),
        }
    }

    /// Append an embedded image.
    pub fn image(&mut self, image: &ImageData) {
        self.parts.push(image_block(image));
        self.stats.image_count += 1;
    }

    /// Record images that could not be placed or embedded.
    pub fn dropped_images(&mut self, count: u32) {
        self.stats.dropped_images += count;
    }

    /// Append a translated paragraph. `html` is already escaped and link-spliced.
    pub fn paragraph(&mut self, style: &ParagraphStyle, html: &str, links: u32, unresolved: u32) {
        self.parts
            .push(format!(r#"<p style="{}">{}</p>"#, style_attr(style), html));
        self.stats.paragraph_count += 1;
        self.stats.link_count += links;
        self.stats.unresolved_links += unresolved;
    }

    /// Append a paragraph whose translation failed, showing its original text.
    pub fn failed_paragraph(&mut self, style: &ParagraphStyle, original: &str) {
        self.parts.push(format!(
            r#"<p class="translation-failed" style="{}"><em>[Translation Failed]</em> {}</p>"#,
            style_attr(style),
            escape_html(original)
        ));
        self.stats.paragraph_count += 1;
        self.stats.failed_paragraphs += 1;
    }

    /// Close the page with its footer.
    pub fn finish(mut self) -> PageFragment {
        self.parts.push(page_footer(self.index));
        PageFragment::new(self.index, self.parts.join("\n"), self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_page_is_anchor_and_footer() {
        let fragment = PageBuilder::new(2).finish();
        assert_eq!(
            fragment.html,
            "<a id=\"page-2\"></a>\n<div><hr><p style=\"text-align:center; color: #888;\">--- Page 3 ---</p></div>"
        );
        assert_eq!(fragment.stats.page_count, 1);
        assert!(!fragment.failed);
    }

    #[test]
    fn test_paragraph_style_attributes() {
        let mut page = PageBuilder::new(0);
        let style = ParagraphStyle {
            size: 14.5,
            bold: true,
            italic: true,
        };
        page.paragraph(&style, "Ciao", 0, 0);
        page.paragraph(&ParagraphStyle::default(), "Mondo", 1, 0);
        let fragment = page.finish();

        assert!(fragment.html.contains(
            r#"<p style="font-size: 14.5px; font-weight: bold; font-style: italic;">Ciao</p>"#
        ));
        assert!(fragment
            .html
            .contains(r#"<p style="font-size: 12px;">Mondo</p>"#));
        assert_eq!(fragment.stats.paragraph_count, 2);
        assert_eq!(fragment.stats.link_count, 1);
    }

    #[test]
    fn test_failed_paragraph_escapes_original() {
        let mut page = PageBuilder::new(0);
        page.failed_paragraph(&ParagraphStyle::default(), "a < b");
        let fragment = page.finish();

        assert!(fragment.html.contains(
            r#"<p class="translation-failed" style="font-size: 12px;"><em>[Translation Failed]</em> a &lt; b</p>"#
        ));
        assert_eq!(fragment.stats.failed_paragraphs, 1);
    }

    #[test]
    fn test_page_error_fragment() {
        let fragment = page_error_fragment(4, "boom <here>");
        assert!(fragment.failed);
        assert_eq!(fragment.index, 4);
        assert!(fragment.html.starts_with(r#"<a id="page-4"></a>"#));
        assert!(fragment.html.contains(
            r#"<p class="page-error" style="color:red;"><strong>Error processing page 5: boom &lt;here&gt;</strong></p>"#
        ));
        assert_eq!(fragment.stats.failed_pages, 1);
    }
}
