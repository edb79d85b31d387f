//! Single-page processing.

use crate::error::Result;
use crate::layout::{analyze_page, extract_items, LayoutOptions};
use crate::model::{BlockGroup, PageFragment};
use crate::render::PageBuilder;
use crate::source::PdfSource;
use crate::translate::{translate_paragraph, Translator};

/// What a page task needs besides its source handle.
#[derive(Clone, Copy)]
pub struct PageContext<'a> {
    /// Translation provider
    pub translator: &'a dyn Translator,
    /// Source language code
    pub source_lang: &'a str,
    /// Target language code
    pub target_lang: &'a str,
    /// Layout thresholds
    pub layout: &'a LayoutOptions,
}

/// Extract, group, translate and render one page.
///
/// Image and paragraph failures are contained here. Errors from listing
/// the page content are returned for the caller to isolate.
pub fn process_page<S>(source: &S, index: u32, ctx: &PageContext<'_>) -> Result<PageFragment>
where
    S: PdfSource + ?Sized,
{
    let extraction = extract_items(source, index, ctx.layout)?;
    let groups = analyze_page(extraction.items, ctx.layout);
    log::debug!("Page {}: {} block groups", index + 1, groups.len());

    let mut page = PageBuilder::new(index);
    page.dropped_images(extraction.unplaced_images as u32);

    for group in &groups {
        match group {
            BlockGroup::Image(_) => {
                let Some(handle) = group.image_handle() else {
                    continue;
                };
                match source.extract_image(handle) {
                    Ok(image) => page.image(&image),
                    Err(e) => {
                        log::warn!(
                            "Page {}: could not extract image {}: {}",
                            index + 1,
                            handle.name,
                            e
                        );
                        page.dropped_images(1);
                    }
                }
            }
            BlockGroup::Paragraph(paragraph) => {
                match translate_paragraph(ctx.translator, paragraph, ctx.source_lang, ctx.target_lang) {
                    Ok(translated) => page.paragraph(
                        &paragraph.style,
                        &translated.html,
                        translated.links,
                        translated.unresolved,
                    ),
                    Err(e) => {
                        log::warn!(
                            "Page {}: could not translate a paragraph: {}",
                            index + 1,
                            e
                        );
                        page.failed_paragraph(&paragraph.style, &paragraph.plain_text());
                    }
                }
            }
        }
    }

    Ok(page.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{BBox, ImageHandle, LinkDest, StyleFlags};
    use crate::source::{ImageData, RawImage, RawLink, RawTextItem};

    struct Echo;

    impl Translator for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn translate(&self, text: &str, _source: &str, _target: &str) -> Result<String> {
            Ok(text.to_string())
        }
    }

    #[derive(Default)]
    struct OnePage {
        texts: Vec<RawTextItem>,
        images: Vec<RawImage>,
        links: Vec<RawLink>,
    }

    impl PdfSource for OnePage {
        fn page_count(&self) -> u32 {
            1
        }

        fn text_items(&self, _page: u32) -> Result<Vec<RawTextItem>> {
            Ok(self.texts.clone())
        }

        fn images(&self, _page: u32) -> Result<Vec<RawImage>> {
            Ok(self.images.clone())
        }

        fn links(&self, _page: u32) -> Result<Vec<RawLink>> {
            Ok(self.links.clone())
        }

        fn extract_image(&self, handle: &ImageHandle) -> Result<ImageData> {
            if handle.id == 1 {
                Ok(ImageData::new(b"abc".to_vec(), "png"))
            } else {
                Err(Error::ImageExtract("unsupported filter".into()))
            }
        }
    }

    fn context<'a>(layout: &'a LayoutOptions) -> PageContext<'a> {
        PageContext {
            translator: &Echo,
            source_lang: "en",
            target_lang: "it",
            layout,
        }
    }

    #[test]
    fn test_empty_page() {
        let layout = LayoutOptions::default();
        let fragment = process_page(&OnePage::default(), 0, &context(&layout)).unwrap();
        assert_eq!(
            fragment.html,
            "<a id=\"page-0\"></a>\n<div><hr><p style=\"text-align:center; color: #888;\">--- Page 1 ---</p></div>"
        );
    }

    #[test]
    fn test_page_with_text_link_and_images() {
        let source = OnePage {
            texts: vec![
                RawTextItem::new(
                    BBox::new(0.0, 0.0, 80.0, 10.0),
                    "Read the",
                    10.0,
                    StyleFlags::empty(),
                ),
                RawTextItem::new(
                    BBox::new(0.0, 10.0, 80.0, 20.0),
                    "manual",
                    10.0,
                    StyleFlags::empty(),
                ),
            ],
            images: vec![
                RawImage {
                    handle: ImageHandle::new(1, "Im1"),
                    bbox: Some(BBox::new(0.0, 100.0, 50.0, 150.0)),
                },
                RawImage {
                    handle: ImageHandle::new(2, "Im2"),
                    bbox: Some(BBox::new(0.0, 200.0, 50.0, 250.0)),
                },
                RawImage {
                    handle: ImageHandle::new(3, "Im3"),
                    bbox: None,
                },
            ],
            links: vec![RawLink {
                bbox: BBox::new(0.0, 11.0, 80.0, 19.0),
                dest: LinkDest::Page(4),
            }],
        };

        let layout = LayoutOptions::default();
        let fragment = process_page(&source, 0, &context(&layout)).unwrap();

        assert!(fragment.html.contains(
            r##"<p style="font-size: 10px;">Read the <a href="#page-4">manual</a></p>"##
        ));
        assert!(fragment.html.contains("data:image/png;base64,YWJj"));
        assert_eq!(fragment.stats.paragraph_count, 1);
        assert_eq!(fragment.stats.link_count, 1);
        assert_eq!(fragment.stats.image_count, 1);
        assert_eq!(fragment.stats.dropped_images, 2);
    }
}
