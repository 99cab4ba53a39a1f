use crate::Generation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineEvent {
    pub generation: Generation,
    pub kind: EngineEventKind,
}

impl EngineEvent {
    pub fn boundary(generation: Generation, char_index: usize, char_length: usize) -> Self {
        Self {
            generation,
            kind: EngineEventKind::Boundary {
                char_index,
                char_length,
            },
        }
    }

    pub fn end(generation: Generation) -> Self {
        Self {
            generation,
            kind: EngineEventKind::End,
        }
    }

    pub fn error(generation: Generation, kind: EngineErrorKind) -> Self {
        Self {
            generation,
            kind: EngineEventKind::Error(kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEventKind {
    /// Speech reached the word starting at `char_index` of the utterance text.
    Boundary {
        char_index: usize,
        char_length: usize,
    },
    End,
    Error(EngineErrorKind),
}

/// Failure reported by the engine.
///
/// Parses the error codes of the Web Speech API (`"audio-busy"`,
/// `"not-allowed"`, ...); anything unrecognized becomes `Unknown`.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    strum::EnumString,
    serde::Serialize,
    serde::Deserialize,
)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(rename_all = "snake_case")]
pub enum EngineErrorKind {
    #[strum(serialize = "synthesis-unavailable", serialize = "unsupported")]
    Unsupported,
    #[strum(serialize = "audio-busy", serialize = "synthesis-failed", serialize = "busy")]
    Busy,
    #[strum(serialize = "network")]
    Network,
    #[strum(serialize = "not-allowed", serialize = "permission-denied")]
    PermissionDenied,
    #[strum(serialize = "canceled", serialize = "cancelled")]
    Cancelled,
    #[strum(serialize = "interrupted")]
    Interrupted,
    #[strum(default)]
    Unknown(String),
}

impl EngineErrorKind {
    /// Errors that are the echo of our own `cancel`, not real failures.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Interrupted)
    }
}
