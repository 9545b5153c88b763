/// Lowercase `text`, strip ASCII punctuation, collapse whitespace runs to a
/// single space and trim both ends.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
