/// Collapse every run of whitespace to a single space and trim the ends.
/// Source exports pad some fields with stretches of spaces.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
