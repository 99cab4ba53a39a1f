use hypr_word_index::char_len;

use crate::Node;

/// A text node located both in the document and in the extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLeaf {
    /// ProseMirror position of the leaf's first char.
    pub pos: usize,
    /// Plain-text offset of the leaf's first char.
    pub offset: usize,
    pub len: usize,
}

impl TextLeaf {
    fn text_end(&self) -> usize {
        self.offset + self.len
    }

    fn pos_end(&self) -> usize {
        self.pos + self.len
    }
}

/// Half-open range in document positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct DocRange {
    pub from: usize,
    pub to: usize,
}

impl DocRange {
    pub fn is_empty(&self) -> bool {
        self.from >= self.to
    }
}

/// Translates between plain-text offsets and positions of one document.
///
/// Build it from the *live* document. Offsets computed against an older
/// extraction may point past the end after an edit; those clamp to the end of
/// the last text leaf instead of failing.
#[derive(Debug, Clone, Default)]
pub struct TextMap {
    leaves: Vec<TextLeaf>,
    text_len: usize,
}

impl TextMap {
    pub fn new(doc: &Node) -> Self {
        let mut leaves = Vec::new();
        let mut offset = 0;

        doc.walk_text(0, &mut |pos, text| {
            let len = char_len(text);
            leaves.push(TextLeaf { pos, offset, len });
            offset += len;
        });

        Self {
            leaves,
            text_len: offset,
        }
    }

    pub fn leaves(&self) -> &[TextLeaf] {
        &self.leaves
    }

    pub fn text_len(&self) -> usize {
        self.text_len
    }

    /// Position of the char at `offset`. On a leaf boundary this binds to the
    /// start of the following leaf.
    pub fn start_pos(&self, offset: usize) -> Option<usize> {
        let idx = self.leaves.partition_point(|l| l.text_end() <= offset);
        match self.leaves.get(idx) {
            Some(leaf) => Some(leaf.pos + (offset - leaf.offset.min(offset))),
            None => self.leaves.last().map(TextLeaf::pos_end),
        }
    }

    /// Position just after the char before `offset`. On a leaf boundary this
    /// binds to the end of the preceding leaf.
    pub fn end_pos(&self, offset: usize) -> Option<usize> {
        let offset = offset.min(self.text_len);
        let idx = self.leaves.partition_point(|l| l.text_end() < offset);
        match self.leaves.get(idx) {
            Some(leaf) => Some(leaf.pos + offset.saturating_sub(leaf.offset)),
            None => self.leaves.last().map(TextLeaf::pos_end),
        }
    }

    /// Document range covering plain-text `[start, end)`, or `None` when the
    /// clamped range is empty.
    pub fn range(&self, start: usize, end: usize) -> Option<DocRange> {
        let from = self.start_pos(start.min(self.text_len))?;
        let to = self.end_pos(end)?;
        let range = DocRange { from, to };
        (!range.is_empty()).then_some(range)
    }

    /// Plain-text offset for a document position, e.g. a click.
    ///
    /// Positions between leaves (block boundaries, hard breaks) map to the
    /// start of the next leaf; positions after the last leaf map to the end
    /// of the text.
    pub fn text_offset(&self, pos: usize) -> usize {
        let idx = self.leaves.partition_point(|l| l.pos_end() < pos);
        match self.leaves.get(idx) {
            Some(leaf) if pos >= leaf.pos => leaf.offset + (pos - leaf.pos),
            Some(leaf) => leaf.offset,
            None => self.text_len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn two_paragraphs() -> Node {
        // <p>Hello</p><p>world</p>
        Node::from_plain_text("Hello\nworld")
    }

    fn split_by_marks() -> Node {
        serde_json::from_value(json!({
            "type": "doc",
            "content": [{
                "type": "paragraph",
                "content": [
                    { "type": "text", "text": "Sp" },
                    { "type": "text", "text": "eak", "marks": [{ "type": "italic" }] },
                    { "type": "hardBreak" },
                    { "type": "text", "text": " now" }
                ]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn leaves_track_positions_and_offsets() {
        let map = TextMap::new(&two_paragraphs());
        assert_eq!(
            map.leaves(),
            [
                TextLeaf { pos: 1, offset: 0, len: 5 },
                TextLeaf { pos: 8, offset: 5, len: 5 },
            ]
        );
        assert_eq!(map.text_len(), 10);
    }

    #[test]
    fn leaf_boundaries_bind_by_direction() {
        let map = TextMap::new(&two_paragraphs());
        assert_eq!(map.start_pos(5), Some(8));
        assert_eq!(map.end_pos(5), Some(6));
        assert_eq!(map.start_pos(0), Some(1));
        assert_eq!(map.end_pos(10), Some(13));
    }

    #[test]
    fn word_across_marks_is_one_range() {
        let map = TextMap::new(&split_by_marks());
        // "Speak" spans two text nodes: positions 1..6
        assert_eq!(map.range(0, 5), Some(DocRange { from: 1, to: 6 }));
        // "now" sits after the hard break (position 6) and a space
        assert_eq!(map.range(6, 9), Some(DocRange { from: 8, to: 11 }));
    }

    #[test]
    fn shrunken_document_clamps_to_end() {
        let map = TextMap::new(&Node::from_plain_text("short"));
        assert_eq!(map.range(3, 40), Some(DocRange { from: 4, to: 6 }));
        assert_eq!(map.range(20, 40), None);
    }

    #[test]
    fn empty_document_has_no_positions() {
        let map = TextMap::new(&Node::empty_doc());
        assert_eq!(map.start_pos(0), None);
        assert_eq!(map.range(0, 3), None);
        assert_eq!(map.text_offset(4), 0);
    }

    #[test]
    fn click_positions_map_back_to_offsets() {
        let map = TextMap::new(&two_paragraphs());
        assert_eq!(map.text_offset(1), 0);
        assert_eq!(map.text_offset(3), 2);
        assert_eq!(map.text_offset(6), 5);
        assert_eq!(map.text_offset(7), 5);
        assert_eq!(map.text_offset(9), 6);
        assert_eq!(map.text_offset(50), 10);
    }
}
