//! Word spans over flat text and the offset -> word lookup used while speaking.
//!
//! Every offset in this crate counts Unicode scalar values (`char`s), not
//! bytes. Use [`char_to_byte`] when slicing the underlying `str`.

mod resolve;
mod span;

pub use resolve::find_word_at;
pub use span::{WordIndex, WordSpan, build_word_index};

/// Number of chars in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte position of the `char_offset`-th char, clamped to `text.len()`.
pub fn char_to_byte(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// The tail of `text` starting at `char_offset`. Empty when out of range.
pub fn suffix_from(text: &str, char_offset: usize) -> &str {
    &text[char_to_byte(text, char_offset)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_to_byte_handles_multibyte() {
        let text = "héllo wörld";
        assert_eq!(char_to_byte(text, 0), 0);
        assert_eq!(char_to_byte(text, 2), 3);
        assert_eq!(char_to_byte(text, 100), text.len());
    }

    #[test]
    fn suffix_from_slices_by_char() {
        assert_eq!(suffix_from("über alles", 5), "alles");
        assert_eq!(suffix_from("short", 10), "");
        assert_eq!(char_len("über"), 4);
    }
}
