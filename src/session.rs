use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::{SegmentationConfig, DEFAULT_TITLE};
use crate::decoder;
use crate::segmenter::{segment, Chapter, PatternError};

/// Per-document segmentation session
///
/// Owns one config snapshot, the decoded text, and the resulting chapter
/// list. Sessions share no state: a batch of N documents is N independent
/// sessions, and the chapter list is filled atomically by `segment` — either
/// the full list or nothing.
pub struct DocumentSession {
    source: Option<PathBuf>,
    default_title: String,
    config: SegmentationConfig,
    encoding: &'static str,
    text: String,
    chapters: Vec<Chapter>,
}

impl DocumentSession {
    /// Read and trial-decode a document from disk
    ///
    /// The source file's base name doubles as the default title for the
    /// no-heading fallback.
    pub fn load(
        path: &Path,
        config: SegmentationConfig,
        encodings: &[String],
    ) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?;
        let decoded = decoder::decode_with_candidates(&bytes, encodings)
            .with_context(|| format!("Failed to decode input file: {}", path.display()))?;
        let default_title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(DEFAULT_TITLE)
            .to_string();

        Ok(Self {
            source: Some(path.to_path_buf()),
            default_title,
            config,
            encoding: decoded.encoding,
            text: decoded.text,
            chapters: Vec::new(),
        })
    }

    /// Build a session over text that is already decoded
    pub fn from_text(
        default_title: impl Into<String>,
        text: impl Into<String>,
        config: SegmentationConfig,
    ) -> Self {
        Self {
            source: None,
            default_title: default_title.into(),
            config,
            encoding: "UTF-8",
            text: text.into(),
            chapters: Vec::new(),
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn default_title(&self) -> &str {
        &self.default_title
    }

    /// Encoding that decoded the source bytes
    pub fn encoding(&self) -> &'static str {
        self.encoding
    }

    /// Apply a pure text transform (e.g. script conversion) ahead of
    /// segmentation; segmentation itself is agnostic to it
    pub fn apply_transform<F: Fn(&str) -> String>(&mut self, transform: F) {
        self.text = transform(&self.text);
    }

    /// Run the segmentation pass over the session's text
    pub fn segment(&mut self) -> Result<&[Chapter], PatternError> {
        let matcher = self.config.compile_matcher()?;
        self.chapters = segment(
            &self.text,
            &matcher,
            self.config.max_title_length,
            &self.config.cleanup_keywords,
            &self.default_title,
        );
        Ok(&self.chapters)
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Consume the session, keeping only its chapter list (merge support)
    pub fn into_chapters(self) -> Vec<Chapter> {
        self.chapters
    }

    /// Indices of chapters whose title contains `query`, case-insensitively
    pub fn search(&self, query: &str) -> Vec<usize> {
        let needle = query.trim().to_lowercase();
        self.chapters
            .iter()
            .enumerate()
            .filter(|(_, chapter)| chapter.title.to_lowercase().contains(&needle))
            .map(|(index, _)| index)
            .collect()
    }
}
