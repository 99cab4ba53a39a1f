use hypr_reader_core::PlaybackSnapshot;
use hypr_tiptap::{DocRange, Node, TextMap};
use hypr_word_index::WordSpan;

use crate::{ElementRect, Viewport, scroll_target};

/// The renderer holding the live rich-text document.
pub trait HighlightSurface {
    fn apply_mark(&mut self, range: DocRange);
    fn clear_mark(&mut self, range: DocRange);
    fn element_rect(&self, range: DocRange) -> Option<ElementRect>;
    fn viewport(&self) -> Viewport;
    /// Smoothly scroll the viewport so that its top lands at `scroll_top`.
    fn scroll_to(&mut self, scroll_top: f64);
}

/// Keeps at most one word marked on a [`HighlightSurface`].
#[derive(Debug, Default)]
pub struct HighlightProjector {
    current: Option<DocRange>,
    auto_scroll: bool,
}

impl HighlightProjector {
    pub fn new(auto_scroll: bool) -> Self {
        Self {
            current: None,
            auto_scroll,
        }
    }

    pub fn current(&self) -> Option<DocRange> {
        self.current
    }

    /// Marks the snapshot's current word in `doc`, or clears the mark when
    /// playback is idle or no word is active yet.
    pub fn project_snapshot(
        &mut self,
        snapshot: &PlaybackSnapshot,
        doc: &Node,
        surface: &mut impl HighlightSurface,
    ) -> Option<DocRange> {
        let span = snapshot
            .is_active()
            .then(|| snapshot.current_span())
            .flatten();
        self.project(span, doc, surface)
    }

    /// Marks `span` (plain-text offsets) in the live `doc`.
    ///
    /// Offsets past the end of an edited document clamp to its end; a range
    /// that clamps to nothing leaves the surface unmarked.
    pub fn project(
        &mut self,
        span: Option<&WordSpan>,
        doc: &Node,
        surface: &mut impl HighlightSurface,
    ) -> Option<DocRange> {
        let target = span.and_then(|s| TextMap::new(doc).range(s.start, s.end));
        if target == self.current {
            return target;
        }

        self.clear(surface);

        let range = target?;
        surface.apply_mark(range);
        self.current = Some(range);
        tracing::trace!(from = range.from, to = range.to, "highlight_applied");

        if self.auto_scroll
            && let Some(rect) = surface.element_rect(range)
            && let Some(scroll_top) = scroll_target(rect, surface.viewport())
        {
            surface.scroll_to(scroll_top);
        }
        Some(range)
    }

    pub fn clear(&mut self, surface: &mut impl HighlightSurface) {
        if let Some(previous) = self.current.take() {
            surface.clear_mark(previous);
        }
    }
}
