mod cleanup;
mod error;
mod matcher;
mod scan;


pub use cleanup::strip_keywords;
pub use error::PatternError;
pub use matcher::HeadingMatcher;
pub use scan::{segment, Chapter};
