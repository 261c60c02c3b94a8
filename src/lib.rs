// Public API exports
pub mod config;
pub mod decoder;
pub mod epub;
pub mod segmenter;
pub mod session;

// Re-export main types for convenience
pub use config::{SegmentationConfig, DEFAULT_MAX_TITLE_LENGTH, DEFAULT_PATTERNS, DEFAULT_TITLE};

pub use decoder::{decode_with_candidates, DecodeError, DecodedText, DEFAULT_ENCODINGS};

pub use segmenter::{segment, strip_keywords, Chapter, HeadingMatcher, PatternError};

pub use epub::{bundle_books, EpubBuilder};

pub use session::DocumentSession;
