use std::time::Duration;

use hypr_speech_interface::{
    EngineErrorKind, EngineEvent, EventSender, Generation, SpeechEngine, Support, Utterance, Voice,
    VoiceCatalog,
};
use hypr_word_index::WordIndex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

struct Running {
    generation: Generation,
    events: EventSender,
    paused: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Stand-in synthesizer that "speaks" at a fixed words-per-minute pace and
/// reports word boundaries the way a platform engine would.
pub struct SimulatedEngine {
    words_per_minute: f32,
    current: Option<Running>,
}

impl SimulatedEngine {
    /// Voices show up on `catalog` shortly after construction, like on
    /// platforms that enumerate them lazily.
    pub fn new(words_per_minute: f32, catalog: &VoiceCatalog) -> Self {
        tokio::spawn({
            let catalog = catalog.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                catalog.publish(Self::voices());
            }
        });

        Self {
            words_per_minute: words_per_minute.max(1.0),
            current: None,
        }
    }

    pub fn voices() -> Vec<Voice> {
        [("narrator", "Narrator", true), ("brisk", "Brisk", false)]
            .into_iter()
            .map(|(id, name, is_default)| Voice {
                id: id.to_string(),
                name: name.to_string(),
                lang: "en-US".to_string(),
                is_default,
                local: true,
            })
            .collect()
    }
}

impl SpeechEngine for SimulatedEngine {
    fn probe(&self) -> Support {
        Support::Supported
    }

    fn speak(&mut self, utterance: Utterance, events: EventSender) {
        self.cancel();

        let per_word = Duration::from_secs_f32(60.0 / (self.words_per_minute * utterance.rate));
        let (paused, paused_rx) = watch::channel(false);
        let generation = utterance.generation;
        let task = tokio::spawn(narrate(utterance, per_word, paused_rx, events.clone()));

        self.current = Some(Running {
            generation,
            events,
            paused,
            task,
        });
    }

    fn pause(&mut self) {
        if let Some(running) = &self.current {
            running.paused.send_replace(true);
        }
    }

    fn resume(&mut self) {
        if let Some(running) = &self.current {
            running.paused.send_replace(false);
        }
    }

    fn cancel(&mut self) {
        let Some(running) = self.current.take() else {
            return;
        };
        if !running.task.is_finished() {
            running.task.abort();
            let _ = running.events.send(EngineEvent::error(
                running.generation,
                EngineErrorKind::Cancelled,
            ));
        }
    }
}

async fn narrate(
    utterance: Utterance,
    per_word: Duration,
    mut paused: watch::Receiver<bool>,
    events: EventSender,
) {
    for span in &WordIndex::build(&utterance.text) {
        if paused.wait_for(|p| !*p).await.is_err() {
            return;
        }
        let boundary =
            EngineEvent::boundary(utterance.generation, span.start, span.end - span.start);
        if events.send(boundary).is_err() {
            return;
        }
        tokio::time::sleep(per_word).await;
    }
    let _ = events.send(EngineEvent::end(utterance.generation));
}

#[cfg(test)]
mod tests {
    use super::*;
    use hypr_speech_interface::{EngineEventKind, event_channel};

    fn utterance(text: &str) -> Utterance {
        Utterance {
            generation: Generation::default().next(),
            text: text.to_string(),
            voice: None,
            rate: 1.0,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn narrates_every_word_then_ends() {
        let catalog = VoiceCatalog::new();
        let mut engine = SimulatedEngine::new(600.0, &catalog);
        let (tx, mut rx) = event_channel();

        engine.speak(utterance("one  two three"), tx);

        let mut kinds = Vec::new();
        while let Some(event) = rx.recv().await {
            let done = event.kind == EngineEventKind::End;
            kinds.push(event.kind);
            if done {
                break;
            }
        }

        assert_eq!(
            kinds,
            vec![
                EngineEventKind::Boundary { char_index: 0, char_length: 3 },
                EngineEventKind::Boundary { char_index: 5, char_length: 3 },
                EngineEventKind::Boundary { char_index: 9, char_length: 5 },
                EngineEventKind::End,
            ]
        );
        assert_eq!(catalog.ready().await.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_reports_cancelled_for_the_dropped_utterance() {
        let catalog = VoiceCatalog::new();
        let mut engine = SimulatedEngine::new(60.0, &catalog);
        let (tx, mut rx) = event_channel();

        engine.speak(utterance("one two"), tx);
        assert!(matches!(
            rx.recv().await.unwrap().kind,
            EngineEventKind::Boundary { char_index: 0, .. }
        ));

        engine.cancel();
        let event = rx.recv().await.unwrap();
        assert_eq!(
            event.kind,
            EngineEventKind::Error(EngineErrorKind::Cancelled)
        );
        assert!(rx.recv().await.is_none());
    }
}
