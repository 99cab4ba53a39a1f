use std::sync::Arc;

use hypr_speech_interface::{
    EngineErrorKind, EngineEvent, EngineEventKind, EventSender, Generation, SpeechEngine,
    Utterance, clamp_rate,
};
use hypr_storage::{Document, ReaderSettings};
use hypr_tiptap::Node;
use hypr_word_index::{WordIndex, WordSpan, char_len, suffix_from};

use crate::{Error, OwnedEngine, PlaybackEvent, PlaybackRuntime, PlaybackStatus};

/// The parts of a stored document the player reads.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub id: String,
    pub content: Node,
    pub last_read_position: usize,
}

impl From<&Document> for DocumentSnapshot {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            content: doc.content.clone(),
            last_read_position: doc.last_read_position,
        }
    }
}

/// Read-only view handed to renderers.
#[derive(Debug, Clone)]
pub struct PlaybackSnapshot {
    pub status: PlaybackStatus,
    pub document_id: Option<String>,
    pub char_offset: usize,
    pub word: Option<usize>,
    pub words: Arc<WordIndex>,
    pub generation: Generation,
}

impl PlaybackSnapshot {
    pub fn current_span(&self) -> Option<&WordSpan> {
        self.word.and_then(|i| self.words.get(i))
    }

    pub fn is_active(&self) -> bool {
        self.status != PlaybackStatus::Idle
    }
}

struct Session {
    text: String,
    words: Arc<WordIndex>,
    start_offset: usize,
    voice: Option<String>,
    rate: f32,
}

pub struct PlaybackMachine {
    engine: OwnedEngine,
    events: EventSender,
    runtime: Arc<dyn PlaybackRuntime>,
    default_voice: Option<String>,
    default_rate: f32,
    voice_override: Option<String>,
    rate_override: Option<f32>,
    document: Option<DocumentSnapshot>,
    status: PlaybackStatus,
    session: Option<Session>,
    char_offset: usize,
    word: Option<usize>,
    generation: Generation,
    pending_seek: Option<usize>,
}

impl PlaybackMachine {
    /// Takes ownership of `engine` and probes it. Engine events must be fed
    /// back through [`handle_event`](Self::handle_event) from the receiving
    /// end of `events`.
    pub fn new(
        engine: Box<dyn SpeechEngine>,
        events: EventSender,
        runtime: Arc<dyn PlaybackRuntime>,
        settings: &ReaderSettings,
    ) -> Self {
        let mut machine = Self {
            engine: OwnedEngine::new(engine),
            events,
            runtime,
            default_voice: settings.default_voice.clone(),
            default_rate: clamp_rate(settings.default_rate),
            voice_override: None,
            rate_override: None,
            document: None,
            status: PlaybackStatus::Idle,
            session: None,
            char_offset: 0,
            word: None,
            generation: Generation::default(),
            pending_seek: None,
        };

        if let Err(error) = machine.engine.init() {
            machine.surface(error);
        }
        machine
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn document_id(&self) -> Option<&str> {
        self.document.as_ref().map(|d| d.id.as_str())
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            status: self.status,
            document_id: self.document_id().map(String::from),
            char_offset: self.char_offset,
            word: self.word,
            words: self
                .session
                .as_ref()
                .map(|s| s.words.clone())
                .unwrap_or_default(),
            generation: self.generation,
        }
    }

    /// Makes `document` current. A running session for the previous document
    /// is torn down.
    pub fn open_document(&mut self, document: DocumentSnapshot) {
        if self.status != PlaybackStatus::Idle {
            self.teardown();
        }
        self.pending_seek = None;
        tracing::info!(document_id = %document.id, "document_opened");
        self.document = Some(document);
    }

    pub fn play(&mut self) {
        match self.status {
            PlaybackStatus::Speaking => {}
            PlaybackStatus::Paused => match self.pending_seek.take() {
                Some(offset) => {
                    self.set_status(PlaybackStatus::Speaking);
                    self.jump_to(offset);
                }
                None => {
                    self.engine.resume();
                    self.set_status(PlaybackStatus::Speaking);
                }
            },
            PlaybackStatus::Idle => self.start(),
        }
    }

    pub fn pause(&mut self) {
        if self.status == PlaybackStatus::Speaking {
            self.engine.pause();
            self.set_status(PlaybackStatus::Paused);
        }
    }

    pub fn stop(&mut self) {
        self.teardown();
        self.pending_seek = None;
    }

    /// Move reading to `offset`, e.g. after a click in the document.
    ///
    /// While speaking this restarts in place. Otherwise the offset is held
    /// for the next [`play`](Self::play) and the displayed position stays
    /// where it is; a paused utterance is replaced by a fresh one from the
    /// held offset instead of being resumed.
    pub fn seek(&mut self, offset: usize) {
        match self.status {
            PlaybackStatus::Speaking => self.jump_to(offset),
            PlaybackStatus::Paused | PlaybackStatus::Idle => {
                tracing::debug!(offset, status = ?self.status, "seek_held");
                self.pending_seek = Some(offset);
            }
        }
    }

    pub fn change_rate(&mut self, rate: f32) {
        let rate = clamp_rate(rate);
        self.rate_override = Some(rate);
        self.runtime.emit(PlaybackEvent::RateChanged { rate });

        if self.status == PlaybackStatus::Speaking
            && self.session.as_ref().is_some_and(|s| s.rate != rate)
        {
            self.restart_in_place();
        }
    }

    pub fn change_voice(&mut self, voice: String) {
        self.voice_override = Some(voice.clone());
        self.runtime.emit(PlaybackEvent::VoiceChanged {
            voice: voice.clone(),
        });

        if self.status == PlaybackStatus::Speaking
            && self
                .session
                .as_ref()
                .is_some_and(|s| s.voice.as_deref() != Some(voice.as_str()))
        {
            self.restart_in_place();
        }
    }

    pub fn handle_event(&mut self, event: EngineEvent) {
        if let EngineEventKind::Error(kind) = &event.kind
            && kind.is_expected()
        {
            tracing::debug!(generation = %event.generation, ?kind, "engine_cancellation_ignored");
            return;
        }

        if event.generation != self.generation {
            tracing::debug!(
                generation = %event.generation,
                current = %self.generation,
                "stale_engine_event_discarded"
            );
            return;
        }

        match event.kind {
            EngineEventKind::Boundary { char_index, .. } => self.on_boundary(char_index),
            EngineEventKind::End => self.on_end(),
            EngineEventKind::Error(kind) => self.on_error(kind),
        }
    }

    /// Stops playback and releases the engine. Later calls reach nothing.
    pub fn dispose(&mut self) {
        self.stop();
        self.engine.dispose();
    }

    fn start(&mut self) {
        if !self.engine.is_available() {
            tracing::debug!("play_refused_engine_unavailable");
            return;
        }

        let (text, last_read) = match &self.document {
            Some(doc) => (
                hypr_tiptap::extract_plain_text(&doc.content),
                doc.last_read_position,
            ),
            None => (String::new(), 0),
        };
        if text.trim().is_empty() {
            self.surface(Error::NoContent);
            return;
        }

        let requested = self.pending_seek.take().unwrap_or(last_read);
        let start_offset = if requested >= char_len(&text) {
            0
        } else {
            requested
        };

        let words = Arc::new(WordIndex::build(&text));
        tracing::info!(words = words.len(), start_offset, "session_started");

        self.char_offset = start_offset;
        self.word = None;
        self.speak(Session {
            text,
            words,
            start_offset,
            voice: self.effective_voice(),
            rate: self.effective_rate(),
        });
        self.set_status(PlaybackStatus::Speaking);
        self.emit_position();
    }

    /// Restart the current session at `offset` and show its word right away.
    /// Offsets at or past the end of the text restart from 0.
    fn jump_to(&mut self, offset: usize) {
        let Some(session) = &self.session else {
            return;
        };
        let offset = if offset >= char_len(&session.text) {
            0
        } else {
            offset
        };
        let word = session.words.find_word_at(offset);

        tracing::info!(offset, "seek_applied");
        self.char_offset = offset;
        self.word = word;
        self.record_progress(offset);
        self.restart_in_place();
        self.emit_position();
    }

    /// New utterance on the same text from the displayed offset, with the
    /// current voice and rate. The displayed position is left as is.
    fn restart_in_place(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let session = Session {
            start_offset: self.char_offset,
            voice: self.effective_voice(),
            rate: self.effective_rate(),
            ..session
        };
        self.speak(session);
    }

    fn speak(&mut self, session: Session) {
        self.engine.cancel();
        self.generation = self.generation.next();

        let utterance = Utterance {
            generation: self.generation,
            text: suffix_from(&session.text, session.start_offset).to_string(),
            voice: session.voice.clone(),
            rate: session.rate,
        };
        tracing::info!(
            generation = %self.generation,
            start_offset = session.start_offset,
            rate = session.rate,
            voice = ?session.voice,
            "utterance_started"
        );

        self.engine.speak(utterance, self.events.clone());
        self.session = Some(session);
    }

    fn teardown(&mut self) {
        self.engine.cancel();
        self.generation = self.generation.next();
        self.session = None;

        let moved = self.char_offset != 0 || self.word.is_some();
        self.char_offset = 0;
        self.word = None;

        self.set_status(PlaybackStatus::Idle);
        if moved {
            self.emit_position();
        }
    }

    fn on_boundary(&mut self, relative: usize) {
        if self.status != PlaybackStatus::Speaking {
            tracing::debug!(relative, "boundary_while_not_speaking");
            return;
        }
        let Some(session) = &self.session else {
            return;
        };

        let char_offset = session.start_offset + relative;
        let word = session.words.find_word_at(char_offset);
        if char_offset == self.char_offset && word == self.word {
            return;
        }

        self.char_offset = char_offset;
        self.word = word;
        self.record_progress(char_offset);
        self.emit_position();
    }

    fn on_end(&mut self) {
        tracing::info!(generation = %self.generation, "utterance_finished");

        self.generation = self.generation.next();
        self.session = None;
        self.char_offset = 0;
        self.word = None;
        self.record_progress(0);

        self.set_status(PlaybackStatus::Idle);
        self.emit_position();
    }

    fn on_error(&mut self, kind: EngineErrorKind) {
        let Some(error) = Error::from_engine(&kind) else {
            return;
        };
        tracing::warn!(?kind, "engine_error");
        self.stop();
        self.surface(error);
    }

    /// Keeps the in-memory resume point current and hands it to the host.
    fn record_progress(&mut self, char_offset: usize) {
        if let Some(doc) = &mut self.document {
            doc.last_read_position = char_offset;
            self.runtime.persist_position(&doc.id, char_offset);
        }
    }

    fn effective_voice(&self) -> Option<String> {
        self.voice_override
            .clone()
            .or_else(|| self.default_voice.clone())
    }

    fn effective_rate(&self) -> f32 {
        self.rate_override.unwrap_or(self.default_rate)
    }

    fn set_status(&mut self, status: PlaybackStatus) {
        if self.status == status {
            return;
        }
        self.status = status;
        tracing::info!(?status, "playback_status_changed");
        self.runtime.emit(PlaybackEvent::StatusChanged {
            document_id: self.document_id().map(String::from),
            status,
        });
    }

    fn emit_position(&self) {
        self.runtime.emit(PlaybackEvent::PositionChanged {
            document_id: self.document_id().map(String::from),
            char_offset: self.char_offset,
            word: self.word,
        });
    }

    fn surface(&self, error: Error) {
        tracing::warn!(%error, "playback_notice");
        self.runtime.emit(PlaybackEvent::Notice {
            document_id: self.document_id().map(String::from),
            error,
        });
    }
}
