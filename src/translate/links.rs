//! Link-preserving paragraph translation.
//!
//! A paragraph is translated in one provider call. Link texts are wrapped in
//! `<x-link>` sentinels before translation and swapped for real anchors
//! afterwards, so the destinations never pass through the provider.

use super::Translator;
use crate::error::{Error, Result};
use crate::model::{ContentItem, LinkDest, ParagraphGroup};
use crate::render::escape_html;

/// Opening sentinel wrapped around link text.
pub const LINK_OPEN: &str = "<x-link>";
/// Closing sentinel wrapped around link text.
pub const LINK_CLOSE: &str = "</x-link>";

const SAFE_SCHEMES: &[&str] = &["http://", "https://", "mailto:", "ftp://", "tel:", "file:", "#"];

/// Escaped paragraph text with link sentinels, ready for translation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtectedText {
    /// Text sent to the provider
    pub text: String,
    /// Escaped link text and href, in item order
    pub links: Vec<(String, String)>,
}

/// A translated paragraph with anchors restored.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedParagraph {
    /// HTML content of the paragraph
    pub html: String,
    /// Links spliced back in
    pub links: u32,
    /// Links whose sentinel was not found in the translation
    pub unresolved: u32,
}

/// The `href` for a link destination.
///
/// Internal pages target their `#page-{n}` anchor. External URIs without a
/// recognized scheme are assumed to be web addresses.
pub fn link_href(dest: &LinkDest) -> String {
    match dest {
        LinkDest::Page(page) => format!("#page-{}", page),
        LinkDest::Uri(uri) => {
            let lower = uri.to_ascii_lowercase();
            if SAFE_SCHEMES.iter().any(|s| lower.starts_with(s)) {
                uri.clone()
            } else {
                format!("http://{}", uri)
            }
        }
    }
}

/// Join item texts with single spaces, escaping them and wrapping links.
pub fn protect_links(items: &[ContentItem]) -> ProtectedText {
    let mut parts = Vec::with_capacity(items.len());
    let mut links = Vec::new();

    for item in items {
        let Some(text) = item.text_content() else {
            continue;
        };
        let escaped = escape_html(text);

        match item.link_dest() {
            Some(dest) => {
                parts.push(format!("{}{}{}", LINK_OPEN, escaped, LINK_CLOSE));
                links.push((escaped, link_href(dest)));
            }
            None => parts.push(escaped),
        }
    }

    ProtectedText {
        text: parts.join(" "),
        links,
    }
}

/// Replace sentinels in `translated` with anchors.
///
/// Each link replaces the first remaining occurrence of its own sentinel.
/// Missing sentinels are counted; leftover sentinel tags are then stripped
/// so their text stays readable.
pub fn restore_links(translated: &str, protected: &ProtectedText) -> TranslatedParagraph {
    let mut html = translated.to_string();
    let mut restored = 0;
    let mut unresolved = 0;

    for (text, href) in &protected.links {
        let marker = format!("{}{}{}", LINK_OPEN, text, LINK_CLOSE);
        match html.find(&marker) {
            Some(pos) => {
                let anchor = format!(r#"<a href="{}">{}</a>"#, escape_html(href), text);
                html.replace_range(pos..pos + marker.len(), &anchor);
                restored += 1;
            }
            None => {
                log::warn!("Link placeholder for '{}' lost in translation", text);
                unresolved += 1;
            }
        }
    }

    if html.contains(LINK_OPEN) || html.contains(LINK_CLOSE) {
        html = html.replace(LINK_OPEN, "").replace(LINK_CLOSE, "");
    }

    TranslatedParagraph {
        html,
        links: restored,
        unresolved,
    }
}

/// Translate one paragraph, keeping its links clickable.
///
/// Fails with [`Error::Translation`] when the provider errors or returns
/// nothing for non-empty input.
pub fn translate_paragraph(
    translator: &dyn Translator,
    paragraph: &ParagraphGroup,
    source_lang: &str,
    target_lang: &str,
) -> Result<TranslatedParagraph> {
    let protected = protect_links(&paragraph.items);
    if protected.text.trim().is_empty() {
        return Ok(TranslatedParagraph {
            html: String::new(),
            links: 0,
            unresolved: 0,
        });
    }

    let translated = translator
        .translate(&protected.text, source_lang, target_lang)
        .map_err(|e| match e {
            Error::Translation(_) => e,
            other => Error::Translation(other.to_string()),
        })?;

    if translated.trim().is_empty() {
        return Err(Error::Translation(format!(
            "{} returned an empty translation",
            translator.name()
        )));
    }

    Ok(restore_links(&translated, &protected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, StyleFlags, TextSpan};

    struct Identity;

    impl Translator for Identity {
        fn name(&self) -> &str {
            "identity"
        }

        fn translate(&self, text: &str, _source: &str, _target: &str) -> Result<String> {
            Ok(text.to_string())
        }
    }

    struct Fixed(&'static str);

    impl Translator for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn translate(&self, _text: &str, _source: &str, _target: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn span(text: &str) -> TextSpan {
        TextSpan::new(text, 10.0, StyleFlags::empty())
    }

    fn text(t: &str) -> ContentItem {
        ContentItem::text(BBox::new(0.0, 0.0, 10.0, 10.0), span(t))
    }

    fn link(t: &str, dest: LinkDest) -> ContentItem {
        ContentItem::link(BBox::new(0.0, 0.0, 10.0, 10.0), span(t), dest)
    }

    #[test]
    fn test_link_href() {
        assert_eq!(link_href(&LinkDest::Page(3)), "#page-3");
        assert_eq!(
            link_href(&LinkDest::Uri("example.com".into())),
            "http://example.com"
        );
        assert_eq!(
            link_href(&LinkDest::Uri("https://example.com/a".into())),
            "https://example.com/a"
        );
        assert_eq!(
            link_href(&LinkDest::Uri("mailto:me@example.com".into())),
            "mailto:me@example.com"
        );
        assert_eq!(link_href(&LinkDest::Uri("#top".into())), "#top");
    }

    #[test]
    fn test_protect_links_escapes_and_wraps() {
        let items = vec![
            text("See"),
            link("A & B", LinkDest::Page(1)),
            text("<now>"),
        ];
        let protected = protect_links(&items);
        assert_eq!(
            protected.text,
            "See <x-link>A &amp; B</x-link> &lt;now&gt;"
        );
        assert_eq!(
            protected.links,
            vec![("A &amp; B".to_string(), "#page-1".to_string())]
        );
    }

    #[test]
    fn test_identity_round_trip() {
        let paragraph = ParagraphGroup::new(vec![link(
            "click here",
            LinkDest::Uri("example.com".into()),
        )]);
        let result = translate_paragraph(&Identity, &paragraph, "en", "it").unwrap();
        assert_eq!(result.html, r#"<a href="http://example.com">click here</a>"#);
        assert_eq!(result.links, 1);
        assert_eq!(result.unresolved, 0);
    }

    #[test]
    fn test_internal_link_targets_page_anchor() {
        let paragraph = ParagraphGroup::new(vec![
            text("Go to"),
            link("chapter two", LinkDest::Page(3)),
        ]);
        let result = translate_paragraph(&Identity, &paragraph, "en", "it").unwrap();
        assert_eq!(
            result.html,
            r##"Go to <a href="#page-3">chapter two</a>"##
        );
    }

    #[test]
    fn test_repeated_link_text_replaces_in_order() {
        let paragraph = ParagraphGroup::new(vec![
            link("here", LinkDest::Page(0)),
            link("here", LinkDest::Page(5)),
        ]);
        let result = translate_paragraph(&Identity, &paragraph, "en", "it").unwrap();
        assert_eq!(
            result.html,
            r##"<a href="#page-0">here</a> <a href="#page-5">here</a>"##
        );
    }

    #[test]
    fn test_lost_marker_is_counted_and_stripped() {
        let paragraph = ParagraphGroup::new(vec![
            text("Visit"),
            link("our site", LinkDest::Uri("example.com".into())),
        ]);
        let translator = Fixed("Visita <x-link>il nostro sito</x-link>");
        let result = translate_paragraph(&translator, &paragraph, "en", "it").unwrap();
        assert_eq!(result.html, "Visita il nostro sito");
        assert_eq!(result.links, 0);
        assert_eq!(result.unresolved, 1);
    }

    #[test]
    fn test_empty_translation_fails() {
        let paragraph = ParagraphGroup::new(vec![text("Hello")]);
        assert!(matches!(
            translate_paragraph(&Fixed("  "), &paragraph, "en", "it"),
            Err(Error::Translation(_))
        ));
    }

    #[test]
    fn test_provider_error_becomes_translation_error() {
        struct Unavailable;

        impl Translator for Unavailable {
            fn name(&self) -> &str {
                "unavailable"
            }

            fn translate(&self, _text: &str, _source: &str, _target: &str) -> Result<String> {
                Err(Error::ProviderUnavailable("offline".into()))
            }
        }

        let paragraph = ParagraphGroup::new(vec![text("Hello")]);
        assert!(matches!(
            translate_paragraph(&Unavailable, &paragraph, "en", "it"),
            Err(Error::Translation(_))
        ));
    }
}
