//! Content extraction and link classification.

use unicode_normalization::UnicodeNormalization;

use super::LayoutOptions;
use crate::error::Result;
use crate::model::{ContentItem, TextSpan};
use crate::source::{PdfSource, RawLink, RawTextItem};

/// Items extracted from one page, in provider order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Text, link and image items
    pub items: Vec<ContentItem>,
    /// Images the provider could not place, omitted from `items`
    pub unplaced_images: usize,
}

/// Collect the content items of a page.
///
/// Spans shorter than `options.min_span_height` are noise. Text is trimmed
/// and NFC-normalized, and spans left empty are dropped. Each surviving span
/// that intersects a link region becomes a link. Listing errors from the
/// provider propagate; an image without a placement is only logged.
pub fn extract_items<S>(source: &S, page: u32, options: &LayoutOptions) -> Result<Extraction>
where
    S: PdfSource + ?Sized,
{
    let links = source.links(page)?;

    let texts: Vec<ContentItem> = source
        .text_items(page)?
        .into_iter()
        .filter_map(|raw| text_item(raw, options.min_span_height))
        .collect();

    let mut items = classify_links(texts, &links);
    let mut unplaced_images = 0;

    for image in source.images(page)? {
        match image.bbox {
            Some(bbox) => items.push(ContentItem::image(bbox, image.handle)),
            None => {
                log::warn!(
                    "Page {}: image {} has no placement, omitting",
                    page + 1,
                    image.handle.name
                );
                unplaced_images += 1;
            }
        }
    }

    Ok(Extraction {
        items,
        unplaced_images,
    })
}

fn text_item(raw: RawTextItem, min_height: f32) -> Option<ContentItem> {
    let height = raw.bbox.height();
    if height.is_nan() || height < min_height {
        return None;
    }

    let text: String = raw.text.trim().nfc().collect();
    if text.is_empty() {
        return None;
    }

    Some(ContentItem::text(
        raw.bbox,
        TextSpan::new(text, raw.size, raw.flags),
    ))
}

/// Promote text items that intersect a link region into links.
///
/// The first intersecting region in provider order wins.
pub fn classify_links(items: Vec<ContentItem>, links: &[RawLink]) -> Vec<ContentItem> {
    if links.is_empty() {
        return items;
    }

    items
        .into_iter()
        .map(|item| {
            if item.is_link() || item.is_image() {
                return item;
            }
            match links.iter().find(|l| l.bbox.intersects(&item.bbox)) {
                Some(link) => item.into_link(link.dest.clone()),
                None => item,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{BBox, ImageHandle, LinkDest, StyleFlags};
    use crate::source::{ImageData, RawImage};

    #[derive(Default)]
    struct MockSource {
        texts: Vec<RawTextItem>,
        images: Vec<RawImage>,
        links: Vec<RawLink>,
    }

    impl PdfSource for MockSource {
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
            Err(Error::ImageExtract(handle.name.clone()))
        }
    }

    fn raw(text: &str, bbox: BBox) -> RawTextItem {
        RawTextItem::new(bbox, text, 10.0, StyleFlags::empty())
    }

    #[test]
    fn test_drops_short_and_empty_spans() {
        let source = MockSource {
            texts: vec![
                raw("tiny", BBox::new(0.0, 0.0, 10.0, 4.0)),
                raw("   ", BBox::new(0.0, 10.0, 10.0, 20.0)),
                raw("  kept  ", BBox::new(0.0, 30.0, 10.0, 40.0)),
                raw("exact", BBox::new(0.0, 50.0, 10.0, 55.0)),
            ],
            ..Default::default()
        };

        let extraction = extract_items(&source, 0, &LayoutOptions::default()).unwrap();
        let texts: Vec<_> = extraction
            .items
            .iter()
            .filter_map(ContentItem::text_content)
            .collect();
        assert_eq!(texts, vec!["kept", "exact"]);
    }

    #[test]
    fn test_text_is_nfc_normalized() {
        let source = MockSource {
            texts: vec![raw("cafe\u{0301}", BBox::new(0.0, 0.0, 30.0, 10.0))],
            ..Default::default()
        };
        let extraction = extract_items(&source, 0, &LayoutOptions::default()).unwrap();
        assert_eq!(extraction.items[0].text_content(), Some("caf\u{e9}"));
    }

    #[test]
    fn test_first_intersecting_link_wins() {
        let items = vec![
            ContentItem::text(
                BBox::new(10.0, 10.0, 60.0, 20.0),
                TextSpan::new("click here", 10.0, StyleFlags::empty()),
            ),
            ContentItem::text(
                BBox::new(10.0, 100.0, 60.0, 110.0),
                TextSpan::new("plain", 10.0, StyleFlags::empty()),
            ),
        ];
        let links = vec![
            RawLink {
                bbox: BBox::new(0.0, 0.0, 30.0, 30.0),
                dest: LinkDest::Uri("example.com".into()),
            },
            RawLink {
                bbox: BBox::new(0.0, 0.0, 100.0, 30.0),
                dest: LinkDest::Page(3),
            },
        ];

        let classified = classify_links(items, &links);
        assert_eq!(
            classified[0].link_dest(),
            Some(&LinkDest::Uri("example.com".into()))
        );
        assert!(!classified[1].is_link());
    }

    #[test]
    fn test_span_touching_link_region_stays_plain() {
        // Lines set solid: the second line's top edge is the link's bottom edge
        let items = vec![
            ContentItem::text(
                BBox::new(0.0, 0.0, 80.0, 10.0),
                TextSpan::new("see chapter 2", 10.0, StyleFlags::empty()),
            ),
            ContentItem::text(
                BBox::new(0.0, 10.0, 80.0, 20.0),
                TextSpan::new("for details", 10.0, StyleFlags::empty()),
            ),
        ];
        let links = vec![RawLink {
            bbox: BBox::new(0.0, 0.0, 80.0, 10.0),
            dest: LinkDest::Page(1),
        }];

        let classified = classify_links(items, &links);
        assert_eq!(classified[0].link_dest(), Some(&LinkDest::Page(1)));
        assert!(!classified[1].is_link());
    }

    #[test]
    fn test_unplaced_images_are_omitted() {
        let source = MockSource {
            images: vec![
                RawImage {
                    handle: ImageHandle::new(1, "Im1"),
                    bbox: Some(BBox::new(0.0, 0.0, 50.0, 50.0)),
                },
                RawImage {
                    handle: ImageHandle::new(2, "Im2"),
                    bbox: None,
                },
            ],
            ..Default::default()
        };

        let extraction = extract_items(&source, 0, &LayoutOptions::default()).unwrap();
        assert_eq!(extraction.items.len(), 1);
        assert!(extraction.items[0].is_image());
        assert_eq!(extraction.unplaced_images, 1);
    }
}
