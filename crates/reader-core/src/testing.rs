use std::sync::{Arc, Mutex};

use hypr_speech_interface::{EngineEvent, EventSender, SpeechEngine, Support, Utterance};
use hypr_word_index::WordIndex;

use crate::{Error, PlaybackEvent, PlaybackRuntime};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Speak(Utterance),
    Pause,
    Resume,
    Cancel,
}

#[derive(Clone)]
pub struct RecordingEngine {
    calls: Arc<Mutex<Vec<EngineCall>>>,
    support: Support,
    narrate: bool,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self {
            calls: Default::default(),
            support: Support::Supported,
            narrate: false,
        }
    }

    pub fn unsupported() -> Self {
        Self {
            support: Support::Unsupported,
            ..Self::new()
        }
    }

    /// Emits a boundary for every word and then `End` as soon as it is asked
    /// to speak.
    pub fn narrating() -> Self {
        Self {
            narrate: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn utterances(&self) -> Vec<Utterance> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                EngineCall::Speak(u) => Some(u),
                _ => None,
            })
            .collect()
    }

    pub fn last_utterance(&self) -> Utterance {
        self.utterances().pop().expect("nothing was spoken")
    }
}

impl SpeechEngine for RecordingEngine {
    fn probe(&self) -> Support {
        self.support
    }

    fn speak(&mut self, utterance: Utterance, events: EventSender) {
        if self.narrate {
            for span in &WordIndex::build(&utterance.text) {
                let _ = events.send(EngineEvent::boundary(
                    utterance.generation,
                    span.start,
                    span.end - span.start,
                ));
            }
            let _ = events.send(EngineEvent::end(utterance.generation));
        }
        self.calls.lock().unwrap().push(EngineCall::Speak(utterance));
    }

    fn pause(&mut self) {
        self.calls.lock().unwrap().push(EngineCall::Pause);
    }

    fn resume(&mut self) {
        self.calls.lock().unwrap().push(EngineCall::Resume);
    }

    fn cancel(&mut self) {
        self.calls.lock().unwrap().push(EngineCall::Cancel);
    }
}

#[derive(Default)]
pub struct RecordingRuntime {
    events: Mutex<Vec<PlaybackEvent>>,
    persisted: Mutex<Vec<(String, usize)>>,
}

impl RecordingRuntime {
    pub fn events(&self) -> Vec<PlaybackEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<Error> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                PlaybackEvent::Notice { error, .. } => Some(error),
                _ => None,
            })
            .collect()
    }

    pub fn positions(&self) -> Vec<(usize, Option<usize>)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                PlaybackEvent::PositionChanged {
                    char_offset, word, ..
                } => Some((char_offset, word)),
                _ => None,
            })
            .collect()
    }

    pub fn persisted(&self) -> Vec<(String, usize)> {
        self.persisted.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
        self.persisted.lock().unwrap().clear();
    }
}

impl PlaybackRuntime for RecordingRuntime {
    fn emit(&self, event: PlaybackEvent) {
        self.events.lock().unwrap().push(event);
    }

    fn persist_position(&self, document_id: &str, char_offset: usize) {
        self.persisted
            .lock()
            .unwrap()
            .push((document_id.to_string(), char_offset));
    }
}
