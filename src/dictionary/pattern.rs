// SPDX-License-Identifier: PMPL-1.0-or-later

//! Template normalization and placeholder-tolerant match patterns.
//!
//! Localized templates carry runtime placeholders (`%@` for an object,
//! `%d` for an integer). The text on screen has them substituted, so a
//! template is turned into a whole-string regex with one wildcard group
//! per placeholder. `%%` is the format escape for a literal percent sign
//! and is never a placeholder.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static FORMAT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("%[%@d]").expect("format token regex is valid"));

/// NFKC-normalize text. Applied to both templates and candidate text.
pub fn normalize(text: &str) -> String {
    text.nfkc().collect()
}

/// How literal template text is carried into the match pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternMode {
    /// Literal text is inserted as-is, so regex metacharacters in a
    /// template act as operators. Matches what existing locators expect.
    #[default]
    Verbatim,
    /// Literal text is escaped, with `%%` read as `%`; only placeholders
    /// become wildcards.
    Escaped,
}

/// Literal segments around the placeholders: `n` placeholders give `n + 1` segments.
pub fn split_template(template: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    for token in FORMAT_TOKEN.find_iter(template) {
        if token.as_str() == "%%" {
            continue;
        }
        segments.push(&template[start..token.start()]);
        start = token.end();
    }
    segments.push(&template[start..]);
    segments
}

pub fn placeholder_count(template: &str) -> usize {
    split_template(template).len() - 1
}

/// Literal segment as displayed: `%%` becomes `%`.
pub fn render_literal(segment: &str) -> String {
    segment.replace("%%", "%")
}

#[derive(Debug, Clone)]
pub struct TemplatePattern {
    regex: Regex,
    placeholders: usize,
}

impl TemplatePattern {
    /// Compile a template. `None` when the resulting expression is malformed.
    ///
    /// In verbatim mode the template body must also compile on its own, so
    /// an unbalanced `)` cannot close the anchoring group early.
    pub fn compile(template: &str, mode: PatternMode) -> Option<Self> {
        Self::try_compile(template, mode).ok()
    }

    pub fn try_compile(template: &str, mode: PatternMode) -> Result<Self, regex::Error> {
        let segments = split_template(template);
        let placeholders = segments.len() - 1;

        let mut body = String::with_capacity(template.len() + placeholders * 12);
        for (idx, segment) in segments.iter().enumerate() {
            if idx > 0 {
                body.push_str(&format!("(?P<p{}>.*)", idx - 1));
            }
            match mode {
                PatternMode::Verbatim => body.push_str(segment),
                PatternMode::Escaped => body.push_str(&regex::escape(&render_literal(segment))),
            }
        }

        if mode == PatternMode::Verbatim {
            Regex::new(&body)?;
        }
        let regex = Regex::new(&format!("^(?:{})$", body))?;
        Ok(Self {
            regex,
            placeholders,
        })
    }

    /// Whole-string match.
    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }

    /// The text each placeholder consumed, in template order.
    pub fn captures(&self, candidate: &str) -> Option<Vec<String>> {
        let caps = self.regex.captures(candidate)?;
        (0..self.placeholders)
            .map(|idx| {
                caps.name(&format!("p{}", idx))
                    .map(|m| m.as_str().to_string())
            })
            .collect()
    }

    pub fn placeholders(&self) -> usize {
        self.placeholders
    }
}
