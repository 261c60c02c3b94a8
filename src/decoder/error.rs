use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Unknown encoding label: {0}")]
    UnknownEncoding(String),

    #[error("Unable to decode input with any candidate encoding ({})", .attempted.join(", "))]
    AllEncodingsFailed { attempted: Vec<String> },
}
