//! Word-tracking speech playback.
//!
//! [`PlaybackMachine`] turns the boundary notifications of a
//! [`SpeechEngine`](hypr_speech_interface::SpeechEngine) into a word position
//! over the document's plain text. [`PlayerActor`] hosts it on a single
//! thread of control, [`DebouncedWriter`] persists progress off that thread.

mod actor;
mod engine;
mod error;
mod events;
mod machine;
mod progress;
mod runtime;

#[cfg(test)]
mod testing;

pub use actor::*;
pub use engine::*;
pub use error::*;
pub use events::*;
pub use machine::*;
pub use progress::*;
pub use runtime::*;
