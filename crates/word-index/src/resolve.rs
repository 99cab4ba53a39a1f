use crate::WordSpan;

/// Word index for a char offset, or `None` when there are no words.
///
/// An offset inside `[start, end)` resolves to that span. Whitespace belongs
/// to the word before it, offsets before the first word resolve to the first
/// word, and offsets past the last word resolve to the last word.
pub fn find_word_at(offset: usize, spans: &[WordSpan]) -> Option<usize> {
    if spans.is_empty() {
        return None;
    }

    // Spans are sorted by `start`, so this counts every span starting at or
    // before `offset`. A span's own `start` counts, which keeps the boundary
    // with that span rather than the one before it.
    let started = spans.partition_point(|span| span.start <= offset);
    Some(started.saturating_sub(1))
}
