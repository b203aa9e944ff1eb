/// Lower-cases and trims text before matching. Both indexed fields and query
/// terms go through here so comparisons are case-insensitive.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Char offsets where a word starts: an alphanumeric char at the beginning of
/// the text or right after a non-alphanumeric one.
pub fn word_starts(chars: &[char]) -> Vec<usize> {
    chars
        .iter()
        .enumerate()
        .filter(|(i, c)| c.is_alphanumeric() && (*i == 0 || !chars[i - 1].is_alphanumeric()))
        .map(|(i, _)| i)
        .collect()
}
