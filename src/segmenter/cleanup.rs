/// Remove all occurrences of each keyword from a detected title
///
/// Keywords are literal text, not patterns; a keyword containing regex
/// metacharacters is stripped verbatim. Keywords are applied in supplied
/// order, and the result is stable under a second pass once every occurrence
/// is gone.
pub fn strip_keywords(title: &str, keywords: &[String]) -> String {
    let mut cleaned = title.to_string();
    for keyword in keywords {
        if keyword.is_empty() {
            continue;
        }
        cleaned = cleaned.replace(keyword.as_str(), "");
    }
    cleaned
}
