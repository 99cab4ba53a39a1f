use hypr_reader_core::{DebouncedWriter, PlaybackEvent, PlaybackRuntime};
use hypr_storage::DocumentPatch;
use tokio::sync::mpsc;

pub struct CliRuntime {
    tx: mpsc::UnboundedSender<PlaybackEvent>,
    writer: DebouncedWriter,
}

impl CliRuntime {
    pub fn new(tx: mpsc::UnboundedSender<PlaybackEvent>, writer: DebouncedWriter) -> Self {
        Self { tx, writer }
    }
}

impl PlaybackRuntime for CliRuntime {
    fn emit(&self, event: PlaybackEvent) {
        let _ = self.tx.send(event);
    }

    fn persist_position(&self, document_id: &str, char_offset: usize) {
        self.writer
            .schedule(document_id, DocumentPatch::last_read_position(char_offset));
    }
}
