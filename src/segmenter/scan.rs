use super::cleanup::strip_keywords;
use super::matcher::HeadingMatcher;

/// One detected chapter: heading line (post-cleanup) plus the newline-joined
/// run of body lines up to the next heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub title: String,
    pub body: String,
}

/// Partition decoded text into an ordered chapter list
///
/// Single forward pass over the lines. A trimmed line accepted by the matcher
/// starts a new chapter unless its extracted heading text repeats the
/// previously accepted one, in which case it is demoted to body text (guards
/// against running-header artifacts and against body sentences that merely
/// mention the current chapter). The emitted title is the full trimmed
/// heading line after keyword cleanup; the extracted match only keys
/// deduplication. Body runs consisting only of blank lines are dropped; every
/// other line lands in exactly one chapter, in document order.
///
/// Never fails: any decoded string is legal input. When no line matches at
/// all, the whole document becomes a single chapter titled `default_title`.
pub fn segment(
    text: &str,
    matcher: &HeadingMatcher,
    max_title_len: usize,
    cleanup_keywords: &[String],
    default_title: &str,
) -> Vec<Chapter> {
    let mut chapters: Vec<Chapter> = Vec::new();
    let mut buffer: Vec<&str> = Vec::new();
    let mut last_heading = String::new();

    for raw_line in text.lines() {
        let line = raw_line.trim();

        if matcher.is_heading(line, max_title_len) {
            let candidate = matcher.extract_heading_text(line);

            // Dedup is keyed on the pre-cleanup heading text so that the
            // structural match decides, not the cosmetic result.
            if candidate == last_heading {
                buffer.push(line);
                continue;
            }

            match chapters.last_mut() {
                Some(previous) => {
                    if buffer.iter().any(|l| !l.is_empty()) {
                        previous.body = buffer.join("\n");
                    }
                    buffer.clear();
                }
                None => {
                    // Preface text ahead of the first heading stays buffered
                    // and opens the first chapter's body; a blank-only run is
                    // dropped here like any other.
                    if buffer.iter().all(|l| l.is_empty()) {
                        buffer.clear();
                    }
                }
            }

            last_heading = candidate.to_string();
            chapters.push(Chapter {
                title: strip_keywords(line, cleanup_keywords),
                body: String::new(),
            });
        } else {
            buffer.push(line);
        }
    }

    // No heading anywhere: the whole document is one chapter.
    if chapters.is_empty() {
        return vec![Chapter {
            title: default_title.to_string(),
            body: buffer.join("\n"),
        }];
    }

    // Terminal flush for the last started chapter.
    if buffer.iter().any(|l| !l.is_empty()) {
        if let Some(last) = chapters.last_mut() {
            last.body = buffer.join("\n");
        }
    }

    chapters
}
