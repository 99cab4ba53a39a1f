use hypr_speech_interface::EngineErrorKind;

/// User-visible playback failures. Every one of them leaves the player idle
/// and ready to retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Error {
    #[error("speech synthesis is not available on this platform")]
    Unsupported,
    #[error("nothing to read in this document")]
    NoContent,
    #[error("speech engine is busy")]
    EngineBusy,
    #[error("speech engine could not reach its voice service")]
    Network,
    #[error("permission to use speech synthesis was denied")]
    PermissionDenied,
    #[error("speech engine error: {0}")]
    UnknownEngine(String),
}

impl Error {
    /// `None` for the cancellation echoes that follow our own `cancel`.
    pub fn from_engine(kind: &EngineErrorKind) -> Option<Self> {
        match kind {
            EngineErrorKind::Cancelled | EngineErrorKind::Interrupted => None,
            EngineErrorKind::Unsupported => Some(Self::Unsupported),
            EngineErrorKind::Busy => Some(Self::EngineBusy),
            EngineErrorKind::Network => Some(Self::Network),
            EngineErrorKind::PermissionDenied => Some(Self::PermissionDenied),
            EngineErrorKind::Unknown(code) => Some(Self::UnknownEngine(code.clone())),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
