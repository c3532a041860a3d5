//! Byte-index-safe string helpers shared by the mention resolver and composer.

/// Replaces the byte range `start..end` of `text` with `replacement`,
/// clamping both indices to the nearest char boundary at or before them.
///
/// Never panics: out-of-range or mid-codepoint indices are snapped to
/// valid boundaries instead of slicing through a multi-byte character.
pub fn safe_replace_by_byte_indices(
    text: &str,
    start: usize,
    end: usize,
    replacement: &str,
) -> String {
    let start = clamp_to_char_boundary(text, start);
    let end = clamp_to_char_boundary(text, end.max(start));
    let mut new_text = String::with_capacity(text.len() + replacement.len());
    new_text.push_str(&text[..start]);
    new_text.push_str(replacement);
    new_text.push_str(&text[end..]);
    new_text
}

/// Returns the substring covering the byte range `start..end`,
/// with both indices clamped to char boundaries.
pub fn safe_substring_by_byte_indices(text: &str, start: usize, end: usize) -> &str {
    let start = clamp_to_char_boundary(text, start);
    let end = clamp_to_char_boundary(text, end.max(start));
    &text[start..end]
}

/// Snaps `index` to the nearest char boundary at or before it,
/// capped at the end of the string.
fn clamp_to_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_within_ascii_text() {
        assert_eq!(
            safe_replace_by_byte_indices("hey @al how", 4, 7, "@alice "),
            "hey @alice  how",
        );
    }

    #[test]
    fn replace_clamps_out_of_range_indices() {
        assert_eq!(safe_replace_by_byte_indices("abc", 1, 99, "X"), "aX");
        assert_eq!(safe_replace_by_byte_indices("abc", 99, 100, "X"), "abcX");
    }

    #[test]
    fn replace_snaps_mid_codepoint_indices_to_boundaries() {
        // "é" is 2 bytes; index 1 falls inside it and must snap back to 0.
        let replaced = safe_replace_by_byte_indices("é!", 1, 1, "X");
        assert_eq!(replaced, "Xé!");
    }

    #[test]
    fn substring_clamps_and_slices() {
        assert_eq!(safe_substring_by_byte_indices("hello @wor", 7, 10), "wor");
        assert_eq!(safe_substring_by_byte_indices("abc", 2, 99), "c");
        assert_eq!(safe_substring_by_byte_indices("abc", 5, 2), "");
    }
}
