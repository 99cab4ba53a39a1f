mod commands;
mod engine;
mod runtime;
mod surface;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::{Context, documents, read, settings};

const APP_ID: &str = "com.readaloud.cli";

#[derive(Parser)]
#[command(name = "read-aloud", about = "Read documents aloud with word tracking")]
struct Cli {
    #[arg(long, env = "READ_ALOUD_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a stored document, or import a file and read it
    Read {
        #[arg(long, required_unless_present = "file", conflicts_with = "file")]
        doc: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long, env = "READ_ALOUD_RATE")]
        rate: Option<f32>,
        #[arg(long, env = "READ_ALOUD_VOICE")]
        voice: Option<String>,
        /// Character offset to start from instead of the saved position
        #[arg(long)]
        from: Option<usize>,
        #[arg(long, default_value_t = 180.0)]
        wpm: f32,
    },
    /// List stored documents with their reading position
    List,
    /// Import a text or JSON document
    Add { path: PathBuf },
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    Show,
    Set {
        #[arg(long)]
        default_rate: Option<f32>,
        #[arg(long)]
        default_voice: Option<String>,
        #[arg(long)]
        auto_scroll: Option<bool>,
        #[arg(long)]
        autosave_delay_ms: Option<u64>,
    },
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let base = match cli.data_dir {
        Some(dir) => dir,
        None => hypr_storage::global::compute_default_base(APP_ID)?,
    };
    tracing::debug!(base = %base.display(), "data_dir_resolved");
    let ctx = Context::new(&base);

    match cli.command {
        Commands::Read {
            doc,
            file,
            rate,
            voice,
            from,
            wpm,
        } => {
            read::run(
                &ctx,
                read::Args {
                    doc,
                    file,
                    rate,
                    voice,
                    from,
                    words_per_minute: wpm,
                },
            )
            .await
        }
        Commands::List => documents::list(&ctx).await,
        Commands::Add { path } => documents::add(&ctx, &path).await,
        Commands::Settings { action } => match action.unwrap_or(SettingsAction::Show) {
            SettingsAction::Show => settings::show(&ctx).await,
            SettingsAction::Set {
                default_rate,
                default_voice,
                auto_scroll,
                autosave_delay_ms,
            } => {
                settings::set(
                    &ctx,
                    settings::SetArgs {
                        default_rate,
                        default_voice,
                        auto_scroll,
                        autosave_delay_ms,
                    },
                )
                .await
            }
            SettingsAction::Reset => settings::reset(&ctx),
        },
    }
}
