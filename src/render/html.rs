//! HTML escaping and the document shell.

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLESHEET: &str = r#"        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
            line-height: 1.6;
            max-width: 800px;
            margin: 20px auto;
            padding: 0 20px;
            background-color: #f8f9fa;
            color: #212529;
        }
        p {
            text-align: justify;
            margin: 0 0 1em 0;
        }
        h1 {
            color: #343a40;
        }
        hr {
            border: 0;
            height: 1px;
            background: #dee2e6;
            margin: 2em 0;
        }
        .translation-failed {
            color: #6c757d;
        }"#;

/// Wrap an assembled body in a standalone HTML document.
pub fn html_document(body: &str, title: &str, lang: &str) -> String {
    let title = escape_html(title);
    let lang = escape_html(lang);

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Translation of {title}</title>
    <style>
{STYLESHEET}
    </style>
</head>
<body>
    <h1>Translation of {title}</h1>
{body}
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"a & b < c > "d""#),
            "a &amp; b &lt; c &gt; &quot;d&quot;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_html_document_shell() {
        let html = html_document("<p>Ciao</p>", "report <draft>.pdf", "it");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<html lang="it">"#));
        assert!(html.contains("<h1>Translation of report &lt;draft&gt;.pdf</h1>"));
        assert!(html.contains("<p>Ciao</p>"));
        assert!(html.contains(r#"<meta charset="UTF-8">"#));
    }
}
