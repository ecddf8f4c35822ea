//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glance_core::config::{self, RefreshVariant};
use glance_core::display::DisplaySurface;
use glance_core::logging;

mod commands;

#[derive(Parser)]
#[command(name = "glance")]
#[command(version = "0.1")]
#[command(about = "Heads-up display content scheduler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Read configuration from this file instead of $GLANCE_HOME/config.toml
    #[arg(long, global = true, value_name = "PATH", env = "GLANCE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Serve JSON-lines session events from stdin
    Run {
        /// Refresh behavior while visible (clock, scroll)
        #[arg(long)]
        variant: Option<RefreshVariant>,

        /// Refresh interval in milliseconds
        #[arg(long, value_name = "MS")]
        interval_ms: Option<u64>,

        /// POST pushes to this URL instead of printing them
        #[arg(long, value_name = "URL")]
        webhook: Option<String>,
    },

    /// Render one display block and print it
    Render {
        /// Surface to render (main, expanded)
        #[arg(short, long, default_value = "main")]
        surface: DisplaySurface,

        /// Notification source app
        #[arg(long)]
        app: Option<String>,

        /// Notification title
        #[arg(short, long)]
        title: Option<String>,

        /// Notification text
        #[arg(short, long)]
        content: Option<String>,

        /// Scroll offset in lines
        #[arg(short, long, default_value_t = 0)]
        offset: u64,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { command } = &cli.command {
        let config_override = cli.config.as_deref();
        return match command {
            ConfigCommands::Path => {
                commands::config::path(config_override);
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(config_override),
        };
    }

    let config = match cli.config.as_deref() {
        Some(path) => config::Config::load_from(path),
        None => config::Config::load(),
    }
    .context("load config")?;
    let _log_guard = logging::init(&config.log).context("init logging")?;

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    let result = rt.block_on(async move { dispatch(cli.command, config).await });
    // stdin reads park a blocking thread; don't wait for it.
    rt.shutdown_background();
    result
}

async fn dispatch(command: Commands, mut config: config::Config) -> Result<()> {
    match command {
        Commands::Run {
            variant,
            interval_ms,
            webhook,
        } => {
            if let Some(variant) = variant {
                config.refresh.variant = variant;
            }
            if let Some(interval_ms) = interval_ms {
                config.refresh.interval_ms = interval_ms;
            }
            if let Some(webhook) = webhook {
                config.sink.webhook_url = Some(webhook);
            }
            commands::run::run(config).await
        }
        Commands::Render {
            surface,
            app,
            title,
            content,
            offset,
        } => {
            commands::render::run(
                &config,
                &commands::render::RenderOptions {
                    surface,
                    app,
                    title,
                    content,
                    offset,
                },
            );
            Ok(())
        }
        // Handled in `run` before the config is loaded.
        Commands::Config { .. } => Ok(()),
    }
}
