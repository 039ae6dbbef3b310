//! Language auto-detection for unlabeled code blocks
//!
//! syntect only detects by first line, so unlabeled blocks are scored
//! against a small table of per-language markers and the best match wins.

use syntect::parsing::{SyntaxReference, SyntaxSet};

/// Markers that make a block look like one language
struct Signature {
    /// syntect lookup token
    token: &'static str,
    markers: &'static [&'static str],
}

const SIGNATURES: &[Signature] = &[
    Signature {
        token: "rs",
        markers: &[
            "fn ", "let mut ", "impl ", "pub fn", "println!", "use std::", "&mut ", "::new(",
            "#[derive",
        ],
    },
    Signature {
        token: "py",
        markers: &[
            "def ", "print(", "elif ", "self.", "import ", "__init__", "lambda ", "None", "True:",
        ],
    },
    Signature {
        token: "go",
        markers: &["package ", "func ", ":= ", "fmt.", "go func", "chan ", "defer ", "err != nil"],
    },
    Signature {
        token: "js",
        markers: &[
            "const ", "function ", "=> ", "console.log", "require(", "export ", "document.", "===",
            "undefined",
        ],
    },
    Signature {
        token: "java",
        markers: &[
            "public class",
            "public static void",
            "System.out",
            "import java.",
            "@Override",
            "private final",
        ],
    },
    Signature {
        token: "c",
        markers: &["#include <stdio", "int main(", "printf(", "malloc(", "sizeof(", "NULL"],
    },
    Signature {
        token: "cpp",
        markers: &["std::", "#include <iostream>", "cout <<", "template<", "nullptr", "namespace "],
    },
    Signature {
        token: "rb",
        markers: &["puts ", "require '", ".each do", "attr_accessor", "elsif ", "do |"],
    },
    Signature {
        token: "php",
        markers: &["<?php", "$this->", "echo $", "namespace App"],
    },
    Signature {
        token: "sh",
        markers: &[
            "#!/bin/", "$ ", "sudo ", "apt-get ", "npm ", "brew ", "echo \"", "fi\n", "export PATH",
        ],
    },
    Signature {
        token: "sql",
        markers: &[
            "SELECT ", "FROM ", "WHERE ", "INSERT INTO", "CREATE TABLE", "JOIN ", "select ",
            "from ",
        ],
    },
    Signature {
        token: "html",
        markers: &["<!DOCTYPE", "<html", "<div", "</div>", "<a href", "<span"],
    },
    Signature {
        token: "css",
        markers: &["color:", "margin:", "padding:", "px;", "display:", "font-size:"],
    },
    Signature {
        token: "yaml",
        markers: &["---\n", "- name:", "version:", "image:", "steps:"],
    },
];

/// Best matching language token for a block of code, if any scores at all
pub fn guess_token(code: &str) -> Option<&'static str> {
    let trimmed = code.trim_start();
    if (trimmed.starts_with('{') || trimmed.starts_with('['))
        && serde_json::from_str::<serde_json::Value>(code).is_ok()
    {
        return Some("json");
    }

    let mut best: Option<(&'static str, usize)> = None;
    for signature in SIGNATURES {
        let score: usize = signature
            .markers
            .iter()
            .map(|marker| code.matches(marker).count())
            .sum();
        if score > 0 && best.map_or(true, |(_, s)| score > s) {
            best = Some((signature.token, score));
        }
    }

    best.map(|(token, _)| token)
}

/// Resolve the syntax for a code block
///
/// An explicit language wins; auto-detection then tries syntect's first-line
/// rules and the marker table; anything else is plain text.
pub fn detect_syntax<'a>(
    syntax_set: &'a SyntaxSet,
    code: &str,
    explicit: Option<&str>,
    auto_detect: bool,
) -> &'a SyntaxReference {
    if let Some(syntax) = explicit.and_then(|lang| syntax_set.find_syntax_by_token(lang)) {
        return syntax;
    }

    if auto_detect {
        if let Some(syntax) = syntax_set.find_syntax_by_first_line(code) {
            return syntax;
        }
        if let Some(syntax) = guess_token(code).and_then(|t| syntax_set.find_syntax_by_token(t)) {
            return syntax;
        }
    }

    syntax_set.find_syntax_plain_text()
}
