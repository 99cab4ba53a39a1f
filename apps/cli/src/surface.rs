use std::io::Write;

use hypr_highlight::{ElementRect, HighlightSurface, Viewport};
use hypr_tiptap::{DocRange, Node, TextMap};
use hypr_word_index::char_to_byte;

const CONTEXT_CHARS: usize = 32;
const VISIBLE_BLOCKS: f64 = 9.0;

/// Renders the highlighted word on one terminal line, with some context.
///
/// Every top-level block of the document counts as one row, so the scroll
/// policy sees a viewport of [`VISIBLE_BLOCKS`] rows.
pub struct TerminalSurface<W> {
    out: W,
    map: TextMap,
    text: String,
    blocks: Vec<usize>,
    viewport: Viewport,
    mark: Option<DocRange>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, doc: &Node) -> Self {
        let mut blocks = Vec::with_capacity(doc.content.len());
        let mut pos = 0;
        for block in &doc.content {
            blocks.push(pos);
            pos += block.node_size();
        }

        Self {
            out,
            map: TextMap::new(doc),
            text: hypr_tiptap::extract_plain_text(doc),
            blocks,
            viewport: Viewport {
                scroll_top: 0.0,
                height: VISIBLE_BLOCKS,
            },
            mark: None,
        }
    }

    pub fn mark(&self) -> Option<DocRange> {
        self.mark
    }

    fn block_of(&self, pos: usize) -> usize {
        self.blocks.partition_point(|start| *start <= pos).saturating_sub(1)
    }

    fn slice(&self, from: usize, to: usize) -> &str {
        let start = char_to_byte(&self.text, from);
        let end = char_to_byte(&self.text, to).max(start);
        &self.text[start..end]
    }

    fn render(&mut self, range: DocRange) -> std::io::Result<()> {
        let from = self.map.text_offset(range.from);
        let to = self.map.text_offset(range.to);
        let before = self.slice(from.saturating_sub(CONTEXT_CHARS), from).to_string();
        let word = self.slice(from, to).to_string();
        let after = self.slice(to, to + CONTEXT_CHARS).to_string();

        write!(
            self.out,
            "\r\x1b[2K{}\x1b[7m{}\x1b[0m{}",
            before.replace('\n', " "),
            word,
            after.replace('\n', " ")
        )?;
        self.out.flush()
    }
}

impl<W: Write> HighlightSurface for TerminalSurface<W> {
    fn apply_mark(&mut self, range: DocRange) {
        self.mark = Some(range);
        if let Err(error) = self.render(range) {
            tracing::warn!(%error, "terminal_render_failed");
        }
    }

    fn clear_mark(&mut self, range: DocRange) {
        if self.mark == Some(range) {
            self.mark = None;
        }
    }

    fn element_rect(&self, range: DocRange) -> Option<ElementRect> {
        if self.blocks.is_empty() {
            return None;
        }
        Some(ElementRect {
            top: self.block_of(range.from) as f64,
            height: 1.0,
        })
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn scroll_to(&mut self, scroll_top: f64) {
        self.viewport.scroll_top = scroll_top;
        if let Err(error) = writeln!(self.out) {
            tracing::warn!(%error, "terminal_render_failed");
        }
        tracing::debug!(scroll_top, "viewport_scrolled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_word_in_inverse_video() {
        let doc = Node::from_plain_text("Hello world");
        let mut surface = TerminalSurface::new(Vec::new(), &doc);

        surface.apply_mark(DocRange { from: 7, to: 12 });

        let out = String::from_utf8(surface.out.clone()).unwrap();
        assert_eq!(out, "\r\x1b[2KHello \x1b[7mworld\x1b[0m");
        assert_eq!(surface.mark(), Some(DocRange { from: 7, to: 12 }));

        surface.clear_mark(DocRange { from: 7, to: 12 });
        assert_eq!(surface.mark(), None);
    }

    #[test]
    fn blocks_are_rows() {
        let doc = Node::from_plain_text("one\ntwo\nthree");
        let surface = TerminalSurface::new(Vec::new(), &doc);

        // paragraphs start at 0, 5 and 10
        let row = |from| surface.element_rect(DocRange { from, to: from + 1 }).unwrap().top;
        assert_eq!(row(1), 0.0);
        assert_eq!(row(6), 1.0);
        assert_eq!(row(11), 2.0);
    }
}
