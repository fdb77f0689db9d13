//! Product-name shape matchers.
//!
//! OCR renders product names on these invoices as upper-case word runs,
//! alphanumeric codes and hyphenated pack suffixes, often with spacing and
//! case garbled. Each recognized shape is an independent [`ProductShape`];
//! a [`ShapeSet`] searches them together with leftmost-first semantics: the
//! match starting earliest in the token wins, and shapes listed earlier win
//! ties at the same offset. That is exactly how a single alternation of the
//! same patterns would behave.

use regex::Regex;

use crate::error::{BillscanError, Result};
use crate::models::config::ShapeConfig;

/// Built-in shapes, in priority order.
pub const DEFAULT_SHAPES: [(&str, &str); 6] = [
    (
        "spaced_code_suffix",
        r"\s[A-Z]+\s[A-Z0-9]+\s[A-Z]+-\d[a-zA-Z]+",
    ),
    (
        "spaced_words_suffix",
        r"\s[A-Z]+\s[A-Z]+\s[A-Z]+-\d[a-zA-Z]+",
    ),
    // The bracket class holds `]`, whitespace, digits, the range `+`..`[`
    // and ASCII letters.
    (
        "word_run_digit_suffix",
        r"[a-zA-Z]+[\]\s\d\x2B-\x5Ba-zA-Z]+\d[a-z]+",
    ),
    (
        "three_words_number",
        r"[a-aA-Z]+\s[a-zA-z]+\s+[a-zA-z]+\s\d+[a-zA-z]",
    ),
    ("code_number_letter", r"[A-Z]+-\d+[a-zA-Z]"),
    ("word_caps_hyphen_word", r"[A-z]+\s[A-Z]+-[a-zA-Z]+"),
];

/// A single named product shape.
#[derive(Debug, Clone)]
pub struct ProductShape {
    name: String,
    regex: Regex,
}

/// A product match inside a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMatch<'t> {
    /// Index of the winning shape in its set.
    pub shape_index: usize,
    /// Byte offsets of the match in the token.
    pub start: usize,
    pub end: usize,
    /// Matched text.
    pub text: &'t str,
}

impl ProductShape {
    /// Compile a shape. Invalid patterns are configuration errors.
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self> {
        let name = name.into();
        let regex = Regex::new(pattern).map_err(|e| {
            BillscanError::Config(format!("invalid product shape {:?}: {}", name, e))
        })?;
        Ok(Self { name, regex })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Leftmost match of this shape alone.
    pub fn find<'t>(&self, token: &'t str) -> Option<regex::Match<'t>> {
        self.regex.find(token)
    }
}

/// Ordered collection of product shapes.
#[derive(Debug, Clone)]
pub struct ShapeSet {
    shapes: Vec<ProductShape>,
}

impl ShapeSet {
    pub fn new(shapes: Vec<ProductShape>) -> Self {
        Self { shapes }
    }

    /// Build from configuration entries, failing on the first invalid pattern.
    pub fn from_config(shapes: &[ShapeConfig]) -> Result<Self> {
        shapes
            .iter()
            .map(|s| ProductShape::new(s.name.clone(), &s.pattern))
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    pub fn shapes(&self) -> &[ProductShape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Find the product match in a token.
    pub fn find<'t>(&self, token: &'t str) -> Option<ShapeMatch<'t>> {
        let mut best: Option<ShapeMatch<'t>> = None;

        for (shape_index, shape) in self.shapes.iter().enumerate() {
            let Some(m) = shape.find(token) else {
                continue;
            };
            // Strict comparison keeps the earlier shape on equal offsets.
            if best.as_ref().is_none_or(|b| m.start() < b.start) {
                best = Some(ShapeMatch {
                    shape_index,
                    start: m.start(),
                    end: m.end(),
                    text: m.as_str(),
                });
            }
        }

        best
    }
}

impl Default for ShapeSet {
    fn default() -> Self {
        let shapes = DEFAULT_SHAPES
            .iter()
            .map(|(name, pattern)| ProductShape::new(*name, pattern))
            .collect::<Result<Vec<_>>>()
            .expect("built-in product shapes must compile");
        Self::new(shapes)
    }
}
