use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("Invalid heading pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
