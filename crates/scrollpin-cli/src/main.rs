use std::fs::{self, File};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scrollpin_core::{AppConfig, Choreography};

mod commands;

#[derive(Parser)]
#[command(name = "scrollpin")]
#[command(author, version, about = "Preview scroll-pinned card choreographies")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Choreography to play (overrides the config file)
    #[arg(short = 'c', long, global = true)]
    choreography: Option<ChoreographyArg>,

    /// Number of stacked cards (overrides the config file)
    #[arg(short = 'n', long, global = true)]
    cards: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ChoreographyArg {
    Stack,
    Spotlight,
}

impl From<ChoreographyArg> for Choreography {
    fn from(arg: ChoreographyArg) -> Self {
        match arg {
            ChoreographyArg::Stack => Choreography::Stack,
            ChoreographyArg::Spotlight => Choreography::Spotlight,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start the terminal preview
    Run,
    /// Scrub the section headlessly and print every frame
    Trace {
        /// Viewport width in pixels
        #[arg(long, default_value_t = 1280.0)]
        width: f64,
        /// Viewport height in pixels
        #[arg(long, default_value_t = 800.0)]
        height: f64,
        /// Number of evenly spaced scroll samples
        #[arg(short = 's', long, default_value_t = 24)]
        samples: usize,
        /// Emit one JSON object per frame
        #[arg(long)]
        json: bool,
    },
    /// Resolve a seek index and show where it lands
    Seek {
        /// Participant index; out-of-range values clamp
        #[arg(allow_hyphen_values = true)]
        index: i64,
        /// Viewport width in pixels
        #[arg(long, default_value_t = 1280.0)]
        width: f64,
        /// Viewport height in pixels
        #[arg(long, default_value_t = 800.0)]
        height: f64,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Log to stderr, or to a file while the TUI owns the terminal
fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.general.log_level.clone()));

    if to_file {
        let path = config.log_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&path)?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration, then apply command-line overrides
    let mut config = AppConfig::load()?;
    if let Some(choreography) = cli.choreography {
        config.ui.choreography = choreography.into();
    }
    if let Some(cards) = cli.cards {
        config.ui.cards = cards;
    }

    let interactive = matches!(cli.command, None | Some(Commands::Run));
    init_logging(&config, interactive)?;

    let config = Arc::new(config);
    match cli.command {
        Some(Commands::Run) | None => commands::run::run(config).await,
        Some(Commands::Trace {
            width,
            height,
            samples,
            json,
        }) => commands::trace::run(&config, width, height, samples, json),
        Some(Commands::Seek {
            index,
            width,
            height,
            json,
        }) => commands::seek::run(&config, index, width, height, json),
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Path => commands::config::path(),
            ConfigAction::Init { force } => commands::config::init(force),
        },
    }
}
