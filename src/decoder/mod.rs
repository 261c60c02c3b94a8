mod error;


pub use error::DecodeError;

use encoding_rs::Encoding;

/// Candidate encodings tried in order when none are configured
pub const DEFAULT_ENCODINGS: [&str; 6] =
    ["utf-8", "gbk", "big5", "utf-16", "utf-16-le", "utf-16-be"];

/// Successfully decoded document text
#[derive(Debug, Clone)]
pub struct DecodedText {
    /// The full decoded document
    pub text: String,
    /// Canonical name of the encoding that actually decoded the bytes
    pub encoding: &'static str,
}

/// Decode raw bytes by trying each candidate encoding in order
///
/// Each label is trial-decoded fatally; the first encoding that accepts the
/// whole byte stream wins. No detection heuristics beyond this fixed
/// trial-and-error. An unknown label is a configuration error and is rejected
/// before any trial runs; if every candidate rejects the bytes, the error
/// lists all attempted labels.
pub fn decode_with_candidates(bytes: &[u8], labels: &[String]) -> Result<DecodedText, DecodeError> {
    let mut encodings: Vec<&'static Encoding> = Vec::with_capacity(labels.len());
    for label in labels {
        let encoding =
            resolve_label(label).ok_or_else(|| DecodeError::UnknownEncoding(label.clone()))?;
        encodings.push(encoding);
    }

    for encoding in encodings {
        let (text, used, had_errors) = encoding.decode(bytes);
        if !had_errors {
            return Ok(DecodedText {
                text: text.into_owned(),
                encoding: used.name(),
            });
        }
    }

    Err(DecodeError::AllEncodingsFailed {
        attempted: labels.to_vec(),
    })
}

/// Resolve one candidate label to an encoding
///
/// The hyphenated UTF-16 spellings are not in the WHATWG label registry but
/// appear in user-facing encoding lists, so they are aliased explicitly.
fn resolve_label(label: &str) -> Option<&'static Encoding> {
    match label.trim().to_ascii_lowercase().as_str() {
        "utf-16-le" => Some(encoding_rs::UTF_16LE),
        "utf-16-be" => Some(encoding_rs::UTF_16BE),
        other => Encoding::for_label(other.as_bytes()),
    }
}

/// Decode with the default candidate list
pub fn decode(bytes: &[u8]) -> Result<DecodedText, DecodeError> {
    let labels: Vec<String> = DEFAULT_ENCODINGS.iter().map(|l| l.to_string()).collect();
    decode_with_candidates(bytes, &labels)
}
