use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pet_trivia::client::{self, DEFAULT_ROUND_SECONDS, PlayOptions};
use pet_trivia::protocol::DEFAULT_PORT;
use pet_trivia::server::{self, ServerConfig};
use pet_trivia::{bundled_deck, load_deck_from_json};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the trivia generation backend
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Play trivia in the terminal
    Play {
        /// Base URL of the trivia backend
        #[arg(short, long, default_value_t = format!("http://localhost:{DEFAULT_PORT}"))]
        server: String,

        /// JSON deck to use when live questions are unavailable
        #[arg(short, long)]
        deck: Option<PathBuf>,

        /// Skip the backend and play the offline deck
        #[arg(long)]
        offline: bool,

        /// Length of a round in seconds
        #[arg(long, default_value_t = DEFAULT_ROUND_SECONDS)]
        seconds: u64,

        /// Where to write logs while the game owns the terminal
        #[arg(long, default_value = "pet-trivia.log")]
        log_file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Serve { port } => {
            init_tracing_stderr();

            let mut config = ServerConfig::from_env().context("invalid backend configuration")?;
            if let Some(port) = port {
                config.port = port;
            }

            actix_web::rt::System::new()
                .block_on(server::run(config))
                .context("trivia backend failed")?;
        }
        Command::Play {
            server: server_url,
            deck,
            offline,
            seconds,
            log_file,
        } => {
            init_tracing_file(&log_file)?;

            let fallback_deck = match deck {
                Some(path) => load_deck_from_json(&path)
                    .with_context(|| format!("failed to load deck {}", path.display()))?,
                None => bundled_deck(),
            };

            let options = PlayOptions {
                server_url,
                fallback_deck,
                round_duration: Duration::from_secs(seconds.max(1)),
                offline,
            };

            let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
            runtime
                .block_on(client::run(options))
                .context("error running trivia")?;
        }
    }

    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into())
}

fn init_tracing_stderr() {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();
}

fn init_tracing_file(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}
