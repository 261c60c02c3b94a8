use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::segmenter::{HeadingMatcher, PatternError};

/// Built-in heading patterns, in match order: arabic-numbered chapters,
/// Chinese-numeral chapters, and the prologue marker.
pub const DEFAULT_PATTERNS: [&str; 3] = [
    r"(\d)+[章卷話]",
    "第[一二三四五六七八九十千百零兩]+[章卷話]",
    "序章",
];

/// Longest line (in chars) still considered a chapter heading
pub const DEFAULT_MAX_TITLE_LENGTH: usize = 35;

/// Fallback book/chapter title when the source provides none ("Preface")
pub const DEFAULT_TITLE: &str = "前言";

/// Settings for one segmentation pass
///
/// A config is created from user input (CLI flags or a JSON file), then
/// treated as an immutable snapshot for the duration of the pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// Heading patterns, tested in order
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,
    /// Lines longer than this are body text even when a pattern matches
    #[serde(default = "default_max_title_length")]
    pub max_title_length: usize,
    /// Literal keywords stripped from every detected title
    #[serde(default)]
    pub cleanup_keywords: Vec<String>,
}

fn default_patterns() -> Vec<String> {
    DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect()
}

fn default_max_title_length() -> usize {
    DEFAULT_MAX_TITLE_LENGTH
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
            max_title_length: DEFAULT_MAX_TITLE_LENGTH,
            cleanup_keywords: Vec::new(),
        }
    }
}

impl SegmentationConfig {
    /// Load a config from a JSON file; missing fields fall back to defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Compile the configured heading patterns
    ///
    /// A malformed pattern is a configuration error surfaced here, before any
    /// document is read.
    pub fn compile_matcher(&self) -> Result<HeadingMatcher, PatternError> {
        HeadingMatcher::compile(&self.patterns)
    }
}
