use crate::PlaybackEvent;

/// Host side of the player.
///
/// Both methods are called from the player's own thread of control and must
/// return promptly; anything slow (rendering, disk) belongs on the host's
/// side of the channel.
pub trait PlaybackRuntime: Send + Sync + 'static {
    fn emit(&self, event: PlaybackEvent);

    /// Best-effort record of reading progress. Failures stay on the host side.
    fn persist_position(&self, document_id: &str, char_offset: usize);
}
