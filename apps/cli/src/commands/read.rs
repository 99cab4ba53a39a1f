use std::path::PathBuf;
use std::sync::Arc;

use hypr_highlight::HighlightProjector;
use hypr_reader_core::{
    DebouncedWriter, DocumentSnapshot, PlaybackEvent, PlaybackStatus, PlayerActor, PlayerArgs,
    PlayerMsg,
};
use hypr_speech_interface::{VoiceCatalog, clamp_rate};
use hypr_storage::{Document, DocumentStore};
use ractor::{Actor, ActorRef};
use tokio::io::AsyncBufReadExt;

use super::Context;
use crate::{engine::SimulatedEngine, runtime::CliRuntime, surface::TerminalSurface};

const RATE_STEP: f32 = 0.25;

pub struct Args {
    pub doc: Option<String>,
    pub file: Option<PathBuf>,
    pub rate: Option<f32>,
    pub voice: Option<String>,
    pub from: Option<usize>,
    pub words_per_minute: f32,
}

fn send(player: &ActorRef<PlayerMsg>, msg: PlayerMsg) {
    if let Err(error) = player.cast(msg) {
        tracing::warn!(%error, "player_cast_failed");
    }
}

async fn resolve_document(ctx: &Context, args: &Args) -> anyhow::Result<Document> {
    match (&args.doc, &args.file) {
        (Some(id), _) => ctx
            .documents
            .get(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("no document with id {id}")),
        (None, Some(path)) => super::documents::import(ctx, path).await,
        (None, None) => anyhow::bail!("pass --doc <id> or --file <path>"),
    }
}

pub async fn run(ctx: &Context, args: Args) -> anyhow::Result<()> {
    let mut settings = ctx.settings.load().await?;
    let doc = resolve_document(ctx, &args).await?;

    let catalog = VoiceCatalog::new();
    let engine = SimulatedEngine::new(args.words_per_minute, &catalog);
    catalog.ready().await;
    settings.default_voice = catalog
        .resolve(settings.default_voice.as_deref())
        .map(|v| v.id);
    let voice_override = args.voice.as_deref().and_then(|requested| {
        let found = lookup_voice(&catalog, requested);
        if found.is_none() {
            eprintln!("unknown voice {requested:?}, using {:?}", settings.default_voice);
        }
        found
    });

    let store: Arc<dyn DocumentStore> = ctx.documents.clone();
    let writer = DebouncedWriter::new(store, settings.autosave_delay());
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let runtime = Arc::new(CliRuntime::new(tx, writer.clone()));

    let (player, handle) = Actor::spawn(
        Some(PlayerActor::name()),
        PlayerActor,
        PlayerArgs {
            engine: Box::new(engine),
            runtime,
            settings: settings.clone(),
        },
    )
    .await?;

    let mut rate = clamp_rate(args.rate.unwrap_or(settings.default_rate));
    send(&player, PlayerMsg::Open(DocumentSnapshot::from(&doc)));
    if args.rate.is_some() {
        send(&player, PlayerMsg::SetRate(rate));
    }
    if let Some(voice) = voice_override {
        send(&player, PlayerMsg::SetVoice(voice));
    }
    if let Some(from) = args.from {
        send(&player, PlayerMsg::Seek(from));
    }
    send(&player, PlayerMsg::Play);

    eprintln!("[read] {} (p pause/resume, + faster, - slower, v <voice>, g <offset>, s stop)", doc.name);

    let mut surface = TerminalSurface::new(std::io::stdout(), &doc.content);
    let mut projector = HighlightProjector::new(settings.auto_scroll);
    let mut commands = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut status = PlaybackStatus::Idle;
    let mut started = false;

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                match event {
                    PlaybackEvent::PositionChanged { .. } => {
                        match ractor::call!(player, PlayerMsg::GetSnapshot) {
                            Ok(snapshot) => {
                                projector.project_snapshot(&snapshot, &doc.content, &mut surface);
                            }
                            Err(error) => tracing::warn!(%error, "snapshot_unavailable"),
                        }
                    }
                    PlaybackEvent::StatusChanged { status: next, .. } => {
                        status = next;
                        match next {
                            PlaybackStatus::Speaking => started = true,
                            PlaybackStatus::Paused => eprint!(" [paused]"),
                            PlaybackStatus::Idle if started => break,
                            PlaybackStatus::Idle => {}
                        }
                    }
                    PlaybackEvent::Notice { error, .. } => {
                        eprintln!("\n[notice] {error}");
                        if !started {
                            break;
                        }
                    }
                    PlaybackEvent::RateChanged { rate } => tracing::debug!(rate, "rate_changed"),
                    PlaybackEvent::VoiceChanged { voice } => tracing::debug!(%voice, "voice_changed"),
                }
            }
            line = commands.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => {
                        handle_command(ctx, &player, &catalog, line.trim(), status, &mut rate).await;
                    }
                    Ok(None) => stdin_open = false,
                    Err(error) => {
                        tracing::warn!(%error, "stdin_read_failed");
                        stdin_open = false;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                send(&player, PlayerMsg::Stop);
                break;
            }
        }
    }

    player.stop(None);
    let _ = handle.await;
    while let Ok(event) = rx.try_recv() {
        if let PlaybackEvent::Notice { error, .. } = event {
            eprintln!("\n[notice] {error}");
        }
    }
    writer.flush().await;
    eprintln!();
    Ok(())
}

/// Voice id for `requested` when the catalog knows it by id or name.
fn lookup_voice(catalog: &VoiceCatalog, requested: &str) -> Option<String> {
    catalog
        .resolve(Some(requested))
        .filter(|voice| voice.id == requested || voice.name == requested)
        .map(|voice| voice.id)
}

async fn handle_command(
    ctx: &Context,
    player: &ActorRef<PlayerMsg>,
    catalog: &VoiceCatalog,
    line: &str,
    status: PlaybackStatus,
    rate: &mut f32,
) {
    let (cmd, arg) = line.split_once(' ').unwrap_or((line, ""));
    match cmd {
        "p" if status == PlaybackStatus::Speaking => send(player, PlayerMsg::Pause),
        "p" => send(player, PlayerMsg::Play),
        "s" => send(player, PlayerMsg::Stop),
        "+" | "-" => {
            let step = if cmd == "+" { RATE_STEP } else { -RATE_STEP };
            *rate = clamp_rate(*rate + step);
            send(player, PlayerMsg::SetRate(*rate));
            remember(ctx, serde_json::json!({ "default_rate": *rate })).await;
        }
        "v" if !arg.is_empty() => match lookup_voice(catalog, arg) {
            Some(voice) => {
                send(player, PlayerMsg::SetVoice(voice.clone()));
                remember(ctx, serde_json::json!({ "default_voice": voice })).await;
            }
            None => eprintln!("\n[read] unknown voice {arg:?}"),
        },
        "g" => match arg.parse::<usize>() {
            Ok(offset) => send(player, PlayerMsg::Seek(offset)),
            Err(_) => eprintln!("\n[read] g expects a character offset"),
        },
        "" => {}
        other => eprintln!("\n[read] unknown command {other:?}"),
    }
}

async fn remember(ctx: &Context, preference: serde_json::Value) {
    if let Err(error) = ctx.settings.save(preference).await {
        tracing::warn!(%error, "preference_save_failed");
    }
}
