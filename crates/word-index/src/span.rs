use crate::find_word_at;

/// One maximal run of non-whitespace chars. `end` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct WordSpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl WordSpan {
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// Ordered, non-overlapping word spans for one text snapshot.
///
/// Always re-derivable from the text it was built from, so it is never
/// persisted. Build a fresh one whenever the text changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(transparent)]
pub struct WordIndex {
    spans: Vec<WordSpan>,
}

impl WordIndex {
    pub fn build(text: &str) -> Self {
        build_word_index(text)
    }

    pub fn spans(&self) -> &[WordSpan] {
        &self.spans
    }

    pub fn get(&self, index: usize) -> Option<&WordSpan> {
        self.spans.get(index)
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn find_word_at(&self, offset: usize) -> Option<usize> {
        find_word_at(offset, &self.spans)
    }
}

impl<'a> IntoIterator for &'a WordIndex {
    type Item = &'a WordSpan;
    type IntoIter = std::slice::Iter<'a, WordSpan>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.iter()
    }
}

/// Scan `text` for `\S+` runs. Punctuation stays attached to its word.
pub fn build_word_index(text: &str) -> WordIndex {
    let mut spans = Vec::new();
    let mut current: Option<(usize, String)> = None;
    let mut consumed = 0;

    for (offset, ch) in text.chars().enumerate() {
        consumed = offset + 1;

        if ch.is_whitespace() {
            if let Some((start, word)) = current.take() {
                spans.push(WordSpan {
                    start,
                    end: offset,
                    text: word,
                });
            }
        } else {
            current
                .get_or_insert_with(|| (offset, String::new()))
                .1
                .push(ch);
        }
    }

    if let Some((start, word)) = current {
        spans.push(WordSpan {
            start,
            end: consumed,
            text: word,
        });
    }

    WordIndex { spans }
}
