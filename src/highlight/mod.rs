//! Code block highlighting for post bodies
//!
//! Post bodies arrive as HTML fragments. Every `pre code` block is re-rendered
//! with syntect's classed output and tagged with a marker class; everything
//! else in the fragment is copied through untouched.

mod detect;

pub use detect::{detect_syntax, guess_token};

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::Serialize;
use std::fmt;
use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::config::HighlightConfig;
use crate::error::BuildError;
use crate::helpers::text_content;

/// Prefix of every class emitted inside highlighted blocks
pub const CLASS_PREFIX: &str = "hljs-";

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed {
    prefix: CLASS_PREFIX,
};

lazy_static! {
    static ref PRE_RE: Regex =
        Regex::new(r#"(?is)<pre\b(?:"[^"]*"|'[^']*'|[^'">])*>(.*?)</pre\s*>"#).unwrap();
    static ref CODE_RE: Regex = Regex::new(
        r#"(?is)<code\b((?:"[^"]*"|'[^']*'|[^'">])*)>(.*?)(</code\s*>)"#
    )
    .unwrap();
    static ref CLASS_RE: Regex =
        Regex::new(r#"(?i)(^|\s)(class\s*=\s*)(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#).unwrap();
}

/// HTML produced by the highlighter
///
/// The only way to obtain one is [`CodeHighlighter::highlight_body`], so a
/// value of this type is markup the build itself produced and may be written
/// into a page without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SafeHtml(String);

impl SafeHtml {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SafeHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Highlighter with syntect syntaxes loaded once and shared across posts
pub struct CodeHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    marker_class: String,
    auto_detect: bool,
}

impl CodeHighlighter {
    /// Create a highlighter with default settings
    pub fn new() -> Self {
        Self::from_config(&HighlightConfig::default())
    }

    /// Create with custom settings
    pub fn from_config(config: &HighlightConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: config.theme.clone(),
            marker_class: config.class_name.clone(),
            auto_detect: config.auto_detect,
        }
    }

    /// Highlight every `pre code` block of an HTML fragment
    pub fn highlight_body(&self, body: &str) -> Result<SafeHtml, BuildError> {
        let mut out = String::with_capacity(body.len() + body.len() / 2);
        let mut last = 0;
        let mut index = 0;

        for pre in PRE_RE.captures_iter(body) {
            let Some(inner) = pre.get(1) else { continue };
            out.push_str(&body[last..inner.start()]);
            self.rewrite_pre(inner.as_str(), &mut index, &mut out)?;
            last = inner.end();
        }
        out.push_str(&body[last..]);

        tracing::debug!("Highlighted {} code block(s)", index);
        Ok(SafeHtml(out))
    }

    /// Rewrite the `code` elements inside one `pre`
    fn rewrite_pre(
        &self,
        inner: &str,
        index: &mut usize,
        out: &mut String,
    ) -> Result<(), BuildError> {
        let mut last = 0;

        for code in CODE_RE.captures_iter(inner) {
            let (Some(whole), Some(content), Some(close)) = (code.get(0), code.get(2), code.get(3))
            else {
                continue;
            };
            let attrs = code.get(1).map_or("", |m| m.as_str());

            let text = text_content(content.as_str());
            let syntax = self.syntax_for(&text, attrs);
            tracing::debug!("Code block #{} detected as {}", index, syntax.name);

            let highlighted = self
                .highlight_code(&text, syntax)
                .map_err(|source| BuildError::Highlight {
                    index: *index,
                    source,
                })?;

            out.push_str(&inner[last..whole.start()]);
            out.push_str("<code");
            out.push_str(&add_class(attrs, &self.marker_class));
            out.push('>');
            out.push_str(&highlighted);
            out.push_str(close.as_str());

            last = whole.end();
            *index += 1;
        }
        out.push_str(&inner[last..]);

        Ok(())
    }

    fn syntax_for(&self, code: &str, attrs: &str) -> &SyntaxReference {
        let explicit = declared_language(attrs);
        detect_syntax(&self.syntax_set, code, explicit.as_deref(), self.auto_detect)
    }

    /// Highlight plain code text into classed spans
    pub fn highlight_code(
        &self,
        code: &str,
        syntax: &SyntaxReference,
    ) -> Result<String, syntect::Error> {
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        Ok(generator.finalize())
    }

    /// CSS for the configured theme, matching the emitted classes
    pub fn stylesheet(&self) -> Result<String, BuildError> {
        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .ok_or_else(|| BuildError::Stylesheet(format!("unknown theme {}", self.theme_name)))?;

        let css = css_for_theme_with_class_style(theme, CLASS_STYLE)
            .map_err(|e| BuildError::Stylesheet(e.to_string()))?;

        Ok(format!(
            "code.{} {{\n display: block;\n overflow-x: auto;\n}}\n{}",
            self.marker_class, css
        ))
    }
}

impl Default for CodeHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

/// Language named by a `language-*` or `lang-*` class
fn declared_language(attrs: &str) -> Option<String> {
    let caps = CLASS_RE.captures(attrs)?;
    let classes = class_value(&caps)?;
    classes.split_whitespace().find_map(|class| {
        class
            .strip_prefix("language-")
            .or_else(|| class.strip_prefix("lang-"))
            .filter(|lang| !lang.is_empty())
            .map(str::to_lowercase)
    })
}

fn class_value<'a>(caps: &Captures<'a>) -> Option<&'a str> {
    caps.get(3)
        .or_else(|| caps.get(4))
        .or_else(|| caps.get(5))
        .map(|m| m.as_str())
}

/// Append a class to an attribute list, keeping everything else as is
fn add_class(attrs: &str, class: &str) -> String {
    let Some(caps) = CLASS_RE.captures(attrs) else {
        return format!(r#"{} class="{}""#, attrs, class);
    };

    let existing = class_value(&caps).unwrap_or("");
    if existing.split_whitespace().any(|c| c == class) {
        return attrs.to_string();
    }

    CLASS_RE
        .replacen(attrs, 1, |caps: &Captures| {
            let value = class_value(caps).unwrap_or("");
            let joined = if value.trim().is_empty() {
                class.to_string()
            } else {
                format!("{} {}", value, class)
            };
            let quote = if caps.get(4).is_some() { '\'' } else { '"' };
            format!("{}{}{q}{}{q}", &caps[1], &caps[2], joined, q = quote)
        })
        .into_owned()
}
