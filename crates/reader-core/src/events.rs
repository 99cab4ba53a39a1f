use crate::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Speaking,
    Paused,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(tag = "type")]
pub enum PlaybackEvent {
    #[serde(rename = "statusChanged")]
    StatusChanged {
        document_id: Option<String>,
        status: PlaybackStatus,
    },
    #[serde(rename = "positionChanged")]
    PositionChanged {
        document_id: Option<String>,
        char_offset: usize,
        word: Option<usize>,
    },
    #[serde(rename = "notice")]
    Notice {
        document_id: Option<String>,
        error: Error,
    },
    #[serde(rename = "rateChanged")]
    RateChanged { rate: f32 },
    #[serde(rename = "voiceChanged")]
    VoiceChanged { voice: String },
}
