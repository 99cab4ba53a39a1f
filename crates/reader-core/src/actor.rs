use std::sync::Arc;

use hypr_speech_interface::{EngineEvent, SpeechEngine, event_channel};
use hypr_storage::ReaderSettings;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use tokio::task::JoinHandle;

use crate::{DocumentSnapshot, PlaybackMachine, PlaybackRuntime, PlaybackSnapshot};

pub enum PlayerMsg {
    Open(DocumentSnapshot),
    Play,
    Pause,
    Stop,
    Seek(usize),
    SetRate(f32),
    SetVoice(String),
    Engine(EngineEvent),
    GetSnapshot(RpcReplyPort<PlaybackSnapshot>),
}

pub struct PlayerArgs {
    pub engine: Box<dyn SpeechEngine>,
    pub runtime: Arc<dyn PlaybackRuntime>,
    pub settings: ReaderSettings,
}

pub struct PlayerState {
    machine: PlaybackMachine,
    forwarder: JoinHandle<()>,
}

/// Owns one [`PlaybackMachine`] and runs user commands and engine events
/// through it in arrival order.
pub struct PlayerActor;

impl PlayerActor {
    pub fn name() -> ractor::ActorName {
        "reader_player_actor".into()
    }
}

pub fn playback_span(document_id: Option<&str>) -> tracing::Span {
    tracing::info_span!("playback", document_id = document_id.unwrap_or_default())
}

#[ractor::async_trait]
impl Actor for PlayerActor {
    type Msg = PlayerMsg;
    type State = PlayerState;
    type Arguments = PlayerArgs;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let (tx, mut rx) = event_channel();

        let forwarder = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if myself.cast(PlayerMsg::Engine(event)).is_err() {
                    break;
                }
            }
        });

        let machine = PlaybackMachine::new(args.engine, tx, args.runtime, &args.settings);
        Ok(PlayerState { machine, forwarder })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        let span = playback_span(state.machine.document_id());
        let _guard = span.enter();

        let machine = &mut state.machine;
        match message {
            PlayerMsg::Open(document) => machine.open_document(document),
            PlayerMsg::Play => machine.play(),
            PlayerMsg::Pause => machine.pause(),
            PlayerMsg::Stop => machine.stop(),
            PlayerMsg::Seek(offset) => machine.seek(offset),
            PlayerMsg::SetRate(rate) => machine.change_rate(rate),
            PlayerMsg::SetVoice(voice) => machine.change_voice(voice),
            PlayerMsg::Engine(event) => machine.handle_event(event),
            PlayerMsg::GetSnapshot(reply) => {
                let _ = reply.send(machine.snapshot());
            }
        }
        Ok(())
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        state.machine.dispose();
        state.forwarder.abort();
        tracing::info!("player_stopped");
        Ok(())
    }
}
