//! Projects the spoken word onto the live rich-text document.

mod projector;
mod scroll;

pub use projector::*;
pub use scroll::*;

use hypr_tiptap::{Node, TextMap};

/// Plain-text offset for a click at document position `pos`, suitable for
/// seeking the player.
pub fn click_offset(doc: &Node, pos: usize) -> usize {
    TextMap::new(doc).text_offset(pos)
}
