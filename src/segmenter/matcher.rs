use regex::Regex;

use super::PatternError;

/// Compiled set of heading patterns
///
/// Decides whether a trimmed line is a chapter heading and, if so, which part
/// of it is the canonical heading text. An empty pattern set is valid and
/// never matches anything (explicit "no auto-segmentation" mode).
#[derive(Debug)]
pub struct HeadingMatcher {
    patterns: Vec<Regex>,
}

impl HeadingMatcher {
    /// Compile user-supplied pattern strings, in order
    ///
    /// Fails on the first pattern that is not a valid regular expression; the
    /// error carries the offending pattern so the user can fix it.
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self, PatternError> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let regex = Regex::new(pattern).map_err(|source| PatternError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
            compiled.push(regex);
        }
        Ok(Self { patterns: compiled })
    }

    /// Number of compiled patterns
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// True iff any pattern matches `line` and the line is short enough to be
    /// a title (`max_title_len` counted in chars)
    pub fn is_heading(&self, line: &str, max_title_len: usize) -> bool {
        if line.chars().count() > max_title_len {
            return false;
        }
        self.patterns.iter().any(|re| re.is_match(line))
    }

    /// Canonical heading text for a line already accepted by `is_heading`
    ///
    /// Returns the substring matched by the last pattern in configured order
    /// that matches; this lets a pattern act as an extractor (structural
    /// prefix only), not just a detector. Falls back to the full trimmed line
    /// when nothing matches, which cannot happen when the same pattern set was
    /// used for detection.
    pub fn extract_heading_text<'a>(&self, line: &'a str) -> &'a str {
        let mut extracted = None;
        for re in &self.patterns {
            if let Some(m) = re.find(line) {
                extracted = Some(m.as_str());
            }
        }
        extracted.unwrap_or(line)
    }
}
