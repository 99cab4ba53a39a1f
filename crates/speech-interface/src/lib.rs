//! Contract between the reader and a platform speech synthesizer.
//!
//! The synthesizer is a black box: it speaks an [`Utterance`] on its own
//! schedule and reports back through [`EngineEvent`]s sent on the channel it
//! was handed. Every event carries the [`Generation`] of the utterance that
//! produced it, so the receiver can tell a late event from a cancelled
//! utterance apart from one belonging to the current one.

mod event;
mod voice;

pub use event::*;
pub use voice::*;

pub const MIN_RATE: f32 = 0.1;
pub const MAX_RATE: f32 = 10.0;
pub const DEFAULT_RATE: f32 = 1.0;

/// Clamp a playback rate into the range synthesizers accept.
pub fn clamp_rate(rate: f32) -> f32 {
    if rate.is_nan() {
        return DEFAULT_RATE;
    }
    rate.clamp(MIN_RATE, MAX_RATE)
}

/// Token identifying one engine invocation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(transparent)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One request to speak. `text` is the slice to speak, not necessarily the
/// whole document; boundary offsets are relative to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub generation: Generation,
    pub text: String,
    pub voice: Option<String>,
    pub rate: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Support {
    Supported,
    Unsupported,
}

pub type EventSender = tokio::sync::mpsc::UnboundedSender<EngineEvent>;
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<EngineEvent>;

pub fn event_channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// A platform speech synthesizer.
///
/// `speak` must not block. Events for the utterance go to `events`, tagged
/// with `utterance.generation`. After `cancel` the engine may still deliver
/// events it had queued, including an `Error(Cancelled)` or
/// `Error(Interrupted)` for the utterance it dropped.
pub trait SpeechEngine: Send + 'static {
    fn probe(&self) -> Support;
    fn speak(&mut self, utterance: Utterance, events: EventSender);
    fn pause(&mut self);
    fn resume(&mut self);
    fn cancel(&mut self);
}

impl<E: SpeechEngine + ?Sized> SpeechEngine for Box<E> {
    fn probe(&self) -> Support {
        (**self).probe()
    }

    fn speak(&mut self, utterance: Utterance, events: EventSender) {
        (**self).speak(utterance, events)
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn resume(&mut self) {
        (**self).resume()
    }

    fn cancel(&mut self) {
        (**self).cancel()
    }
}
