//! Heading heuristic for paragraphs of extracted text.
//!
//! PDF text carries no structure, so a paragraph is promoted to a heading when
//! it "looks like" one: short and all upper case, numbered like
//! `1. Introduction`, or containing one of a configurable set of keywords.
//! False positives and negatives are expected.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Keywords common in Chinese technical datasheets: specification, parameter,
/// technical, dimension, description, requirement, standard, model, name.
pub const DEFAULT_KEYWORDS: [&str; 9] = [
    "规格", "参数", "技术", "尺寸", "说明", "要求", "标准", "型号", "名称",
];

/// Default upper bound (exclusive, in characters) for the all-caps rule.
pub const DEFAULT_MAX_CAPS_LEN: usize = 50;

/// Configuration of the heading heuristic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingRules {
    /// Text shorter than this many characters that equals its upper-cased
    /// form is a heading (0 disables the rule)
    pub max_caps_len: usize,

    /// Text shorter than this many characters is never a heading
    pub min_len: usize,

    /// Whether `<number>[.] <Capital>` openings mark a heading
    pub numbered: bool,

    /// Substrings that mark a heading wherever they occur
    pub keywords: Vec<String>,
}

impl HeadingRules {
    /// Create the default rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the all-caps rule, with the given length bound.
    pub fn caps_only(max_caps_len: usize) -> Self {
        Self {
            max_caps_len,
            numbered: false,
            keywords: Vec::new(),
            ..Self::default()
        }
    }

    /// Set the all-caps length bound.
    pub fn with_max_caps_len(mut self, len: usize) -> Self {
        self.max_caps_len = len;
        self
    }

    /// Replace the keyword set.
    pub fn with_keywords<S: Into<String>>(mut self, keywords: impl IntoIterator<Item = S>) -> Self {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable the numbered-heading rule.
    pub fn with_numbered(mut self, numbered: bool) -> Self {
        self.numbered = numbered;
        self
    }

    /// Decide whether `text` should render as a heading.
    pub fn is_heading(&self, text: &str) -> bool {
        let trimmed = text.trim();
        let len = trimmed.chars().count();
        if len < self.min_len {
            return false;
        }

        if len < self.max_caps_len && trimmed.to_uppercase() == trimmed {
            return true;
        }

        if self.numbered && numbered_heading().is_match(trimmed) {
            return true;
        }

        self.keywords
            .iter()
            .any(|k| !k.is_empty() && trimmed.contains(k.as_str()))
    }
}

impl Default for HeadingRules {
    fn default() -> Self {
        Self {
            max_caps_len: DEFAULT_MAX_CAPS_LEN,
            min_len: 2,
            numbered: true,
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

fn numbered_heading() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+\.?\s+[A-Z]").expect("valid regex"))
}
