use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tidal_browse_adapter as lib;
use lib::api::tidal::TidalCatalog;
use lib::config::Config;
use lib::playback::mpd::MpdBackend;
use lib::service::{LoggingHost, TidalService};
use tracing::subscriber as tracing_subscriber_global;
use tracing_appender::rolling::RollingFileAppender;
use tracing_log::LogTracer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "tidal-browse", version)]
struct Cli {
    /// Path to config TOML
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the browse tree for a URI (e.g. "tidal/myalbums") as JSON
    Browse {
        uri: String,
    },
    /// Search the catalog and print the result sections as JSON
    Search {
        query: String,
    },
    /// Resolve "<prefix>/tracks/<id>" to a playable stream and print it as JSON
    Explode {
        uri: String,
    },
    /// Resolve a track URI and start playing it on MPD
    Play {
        uri: String,
    },
    /// Pause playback
    Pause,
    /// Resume playback
    Resume,
    /// Stop playback
    Stop,
    /// Seek within the current track
    Seek {
        /// Position in milliseconds
        position_ms: u64,
    },
    /// Print the player state as JSON
    State,
    /// Validate config file and exit
    ConfigValidate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    // explicit --config wins; otherwise the system path, then a local file
    let resolved_config_path: PathBuf = match &cli.config {
        Some(p) => p.clone(),
        None => {
            let etc_path = Path::new("/etc/tidal-browse/config.toml");
            if etc_path.exists() {
                etc_path.to_path_buf()
            } else {
                PathBuf::from("config/example-config.toml")
            }
        }
    };

    if let Commands::ConfigValidate = cli.command {
        match Config::from_path(&resolved_config_path) {
            Ok(_) => println!("OK"),
            Err(e) => {
                eprintln!("Config validation failed: {}", e);
                std::process::exit(2);
            }
        }
        return Ok(());
    }

    let cfg = Config::from_path(&resolved_config_path)
        .with_context(|| format!("loading config from {}", resolved_config_path.display()))?;

    // Logs go to both stdout and a daily-rotated file in cfg.log_dir.
    let _ = LogTracer::init();
    let file_appender: RollingFileAppender =
        tracing_appender::rolling::daily(&cfg.log_dir, "tidal-browse.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Honor RUST_LOG if set, otherwise default to info.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer().with_writer(non_blocking);
    let stdout_layer = fmt::layer().with_writer(std::io::stderr);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer);

    tracing_subscriber_global::set_global_default(subscriber)
        .expect("failed to set global tracing subscriber");

    let catalog = Arc::new(TidalCatalog::new(&cfg));
    let backend = MpdBackend::new(cfg.mpd_address());
    let service = TidalService::new(cfg, catalog, backend, Arc::new(LoggingHost));

    let needs_session = matches!(
        cli.command,
        Commands::Browse { .. } | Commands::Search { .. } | Commands::Explode { .. } | Commands::Play { .. }
    );
    if needs_session {
        service.on_start().await?;
        if !service.is_logged_in().await {
            anyhow::bail!("not logged in; set username and password in the config");
        }
    }

    match cli.command {
        Commands::Browse { uri } => {
            let tree = service.browse(&uri).await?;
            println!("{}", serde_json::to_string_pretty(&tree)?);
        }
        Commands::Search { query } => {
            let sections = service.search(&query).await?;
            println!("{}", serde_json::to_string_pretty(&sections)?);
        }
        Commands::Explode { uri } => {
            let track = service.explode_uri(&uri).await?;
            println!("{}", serde_json::to_string_pretty(&track)?);
        }
        Commands::Play { uri } => {
            let track = service.explode_uri(&uri).await?;
            service
                .clear_add_play_track(&track)
                .await
                .with_context(|| format!("playing {}", uri))?;
            println!("Playing {} - {}", track.artist, track.name);
        }
        Commands::Pause => service.pause().await?,
        Commands::Resume => service.resume().await?,
        Commands::Stop => service.stop().await?,
        Commands::Seek { position_ms } => service.seek(position_ms).await?,
        Commands::State => {
            let state = service.get_state().await?;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Commands::ConfigValidate => {}
    }

    Ok(())
}
