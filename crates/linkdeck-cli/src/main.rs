//! linkdeck CLI: a personal bookmark manager
//!
//! Commands: list, add, edit, rm, pin, unpin, tags, open, copy, shell, completions

mod commands;
mod config;
mod formatter;
mod shell;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::commands::{App, EditArgs};
use crate::config::Config;
use crate::formatter::OutputFormat;

#[derive(Parser)]
#[command(name = "linkdeck")]
#[command(version)]
#[command(about = "Personal bookmark manager with tags, pins and inline editing")]
struct Cli {
    /// Config file (defaults to $LINKDECK_CONFIG, then ./linkdeck.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format (overrides the config file)
    #[arg(long, short = 'f', global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List links, pinned first
    #[command(alias = "ls")]
    List {
        /// Case-insensitive match on title, url and tags
        #[arg(long, short)]
        query: Option<String>,
        /// Only links carrying this tag
        #[arg(long, short)]
        tag: Option<String>,
    },
    /// Save a new link
    Add { url: String, title: String },
    /// Change the title, url or tags of a link
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        url: Option<String>,
        /// Comma separated, replaces the current tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// Remove a link
    #[command(alias = "delete")]
    Rm { id: String },
    /// Pin a link to the top of the list
    Pin { id: String },
    /// Unpin a link
    Unpin { id: String },
    /// Show the tag selector with counts
    Tags,
    /// Print a link's destination and record the visit
    Open { id: String },
    /// Copy a link's url to the clipboard and print it
    Copy { id: String },
    /// Interactive list driven from stdin
    Shell,
    /// Generate shell completions
    Completions { shell: Shell },
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(
            shell,
            &mut Cli::command(),
            "linkdeck",
            &mut std::io::stdout(),
        );
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;
    let format = cli.format.unwrap_or(config.format);
    let color = format == OutputFormat::Table && std::io::stdout().is_terminal();
    let mut app = App::open(&config, format, color).await?;

    let result = run(&mut app, cli.command).await;
    app.flush_notifications();
    result
}

async fn run(app: &mut App, command: Commands) -> Result<()> {
    match command {
        Commands::List { query, tag } => commands::list(app, query, tag),
        Commands::Add { url, title } => commands::add(app, &url, &title).await,
        Commands::Edit {
            id,
            title,
            url,
            tags,
        } => {
            commands::edit(
                app,
                EditArgs {
                    id,
                    title,
                    url,
                    tags,
                },
            )
            .await
        }
        Commands::Rm { id } => commands::remove(app, &id).await,
        Commands::Pin { id } => commands::pin(app, &id).await,
        Commands::Unpin { id } => commands::unpin(app, &id).await,
        Commands::Tags => commands::tags(app),
        Commands::Open { id } => commands::open(app, &id).await,
        Commands::Copy { id } => commands::copy(app, &id),
        Commands::Shell => {
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            shell::run(app, input, &mut std::io::stdout()).await
        }
        Commands::Completions { .. } => Ok(()),
    }
}
