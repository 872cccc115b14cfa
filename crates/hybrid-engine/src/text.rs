//! Char-offset helpers. Carets are counted in chars, slicing needs bytes.

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the `chars`-th char boundary, `None` past the end.
pub(crate) fn byte_offset(text: &str, chars: usize) -> Option<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .nth(chars)
}

pub(crate) fn split_at_char(text: &str, chars: usize) -> (&str, &str) {
    text.split_at(byte_offset(text, chars).unwrap_or(text.len()))
}
