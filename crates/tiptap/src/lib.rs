mod error;
mod node;
mod position;

pub use error::*;
pub use node::{Mark, Node};
pub use position::{DocRange, TextLeaf, TextMap};

/// Flatten a document into the text the word index is built from.
///
/// Text leaves are concatenated in document order with nothing inserted
/// between blocks, so `<p>end.</p><p>Next</p>` reads as `end.Next`. Every
/// offset the reader stores is relative to exactly this string.
pub fn extract_plain_text(doc: &Node) -> String {
    let mut out = String::new();
    doc.walk_text(0, &mut |_, text| out.push_str(text));
    out
}
