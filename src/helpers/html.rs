//! HTML helper functions

use quick_xml::escape::{resolve_html5_entity, unescape_with};

use super::url::url_for;
use crate::config::SiteConfig;

/// Longest HTML5 entity name (`CounterClockwiseContourIntegral`) plus slack
const MAX_REFERENCE_LEN: usize = 32;

/// Generate a CSS link tag
///
/// # Examples
/// ```ignore
/// css(&config, "highlight") // -> <link rel="stylesheet" href="/css/highlight.css">
/// ```
pub fn css(config: &SiteConfig, path: &str) -> String {
    let path =
        if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//") {
            path.to_string()
        } else {
            let path = if path.ends_with(".css") {
                path.to_string()
            } else {
                format!("{}.css", path)
            };
            url_for(config, &format!("css/{}", path.trim_start_matches('/')))
        };

    format!(r#"<link rel="stylesheet" href="{}">"#, html_escape(&path))
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Quote a value as a JavaScript string literal safe inside `<script>`
pub fn js_string(s: &str) -> String {
    let quoted = serde_json::Value::String(s.to_string()).to_string();
    quoted.replace("</", "<\\/").replace('\'', "\\u0027")
}

/// Strip HTML tags from a string
///
/// A `<` only opens a tag when followed by a letter, `/`, `!` or `?`,
/// so stray comparison operators in code survive.
pub fn strip_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if in_tag {
            if c == '>' {
                in_tag = false;
            }
            continue;
        }
        match c {
            '<' if chars
                .peek()
                .is_some_and(|n| n.is_ascii_alphabetic() || matches!(n, '/' | '!' | '?')) =>
            {
                in_tag = true
            }
            _ => result.push(c),
        }
    }

    result
}

/// Decode character references (`&lt;`, `&copy;`, `&#60;`, `&#x3C;`, ...)
///
/// Named references resolve against the full HTML5 table. Unknown or
/// malformed references are kept verbatim.
pub fn decode_entities(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        result.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];

        let decoded = after
            .find(';')
            .filter(|&end| end > 0 && end <= MAX_REFERENCE_LEN)
            .and_then(|end| {
                let reference = &rest[amp..amp + end + 2];
                unescape_with(reference, resolve_html5_entity)
                    .ok()
                    .map(|text| (text.into_owned(), end))
            });

        match decoded {
            Some((text, end)) => {
                result.push_str(&text);
                rest = &after[end + 1..];
            }
            None => {
                result.push('&');
                rest = after;
            }
        }
    }
    result.push_str(rest);

    result
}

/// Text content of an HTML fragment
pub fn text_content(html: &str) -> String {
    decode_entities(&strip_html(html))
}
