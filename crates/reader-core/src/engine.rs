use hypr_speech_interface::{EventSender, SpeechEngine, Support, Utterance};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineLifecycle {
    Initializing,
    Ready(Support),
    Disposed,
}

/// A speech engine owned by one player.
///
/// Support is probed once in [`init`](Self::init). Afterwards every call is
/// forwarded only while the engine is ready and supported; calls on an
/// unsupported engine are dropped quietly, calls after
/// [`dispose`](Self::dispose) are dropped with a warning.
pub struct OwnedEngine {
    inner: Box<dyn SpeechEngine>,
    lifecycle: EngineLifecycle,
}

impl OwnedEngine {
    pub fn new(inner: Box<dyn SpeechEngine>) -> Self {
        Self {
            inner,
            lifecycle: EngineLifecycle::Initializing,
        }
    }

    pub fn lifecycle(&self) -> EngineLifecycle {
        self.lifecycle
    }

    /// Probes support on the first call only. Returns `Unsupported` once;
    /// later calls succeed without probing again.
    pub fn init(&mut self) -> crate::Result<()> {
        match self.lifecycle {
            EngineLifecycle::Initializing => {
                let support = self.inner.probe();
                self.lifecycle = EngineLifecycle::Ready(support);
                tracing::info!(?support, "speech_engine_ready");
                match support {
                    Support::Supported => Ok(()),
                    Support::Unsupported => Err(crate::Error::Unsupported),
                }
            }
            EngineLifecycle::Ready(_) => Ok(()),
            EngineLifecycle::Disposed => {
                tracing::warn!("speech_engine_init_after_dispose");
                Ok(())
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.lifecycle == EngineLifecycle::Ready(Support::Supported)
    }

    fn check(&self, op: &'static str) -> bool {
        match self.lifecycle {
            EngineLifecycle::Ready(Support::Supported) => true,
            EngineLifecycle::Disposed => {
                tracing::warn!(op, "speech_engine_call_after_dispose");
                false
            }
            _ => {
                tracing::debug!(op, lifecycle = ?self.lifecycle, "speech_engine_call_dropped");
                false
            }
        }
    }

    pub fn speak(&mut self, utterance: Utterance, events: EventSender) {
        if self.check("speak") {
            self.inner.speak(utterance, events);
        }
    }

    pub fn pause(&mut self) {
        if self.check("pause") {
            self.inner.pause();
        }
    }

    pub fn resume(&mut self) {
        if self.check("resume") {
            self.inner.resume();
        }
    }

    pub fn cancel(&mut self) {
        if self.check("cancel") {
            self.inner.cancel();
        }
    }

    pub fn dispose(&mut self) {
        if self.lifecycle == EngineLifecycle::Disposed {
            return;
        }
        if self.is_available() {
            self.inner.cancel();
        }
        self.lifecycle = EngineLifecycle::Disposed;
        tracing::info!("speech_engine_disposed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{EngineCall, RecordingEngine};
    use hypr_speech_interface::{Generation, event_channel};

    fn utterance() -> Utterance {
        Utterance {
            generation: Generation::default(),
            text: "hi".into(),
            voice: None,
            rate: 1.0,
        }
    }

    #[test]
    fn calls_before_init_are_dropped() {
        let recorder = RecordingEngine::new();
        let mut engine = OwnedEngine::new(Box::new(recorder.clone()));
        let (tx, _rx) = event_channel();

        engine.speak(utterance(), tx);
        assert!(recorder.calls().is_empty());
        assert_eq!(engine.lifecycle(), EngineLifecycle::Initializing);
    }

    #[test]
    fn unsupported_is_reported_once() {
        let mut engine = OwnedEngine::new(Box::new(RecordingEngine::unsupported()));
        assert_eq!(engine.init(), Err(crate::Error::Unsupported));
        assert_eq!(engine.init(), Ok(()));
        assert!(!engine.is_available());
    }

    #[test]
    fn dispose_cancels_and_ignores_later_calls() {
        let recorder = RecordingEngine::new();
        let mut engine = OwnedEngine::new(Box::new(recorder.clone()));
        engine.init().unwrap();
        engine.dispose();
        engine.dispose();

        let (tx, _rx) = event_channel();
        engine.speak(utterance(), tx);
        engine.resume();

        assert_eq!(recorder.calls(), vec![EngineCall::Cancel]);
        assert_eq!(engine.lifecycle(), EngineLifecycle::Disposed);
    }
}
