use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hbnb::config::ShellConfig;
use hbnb::console::{Console, RustylineEditor, ScriptEditor};

#[derive(Parser)]
#[command(name = "hbnb")]
#[command(about = "Interactive console for HBnB records")]
struct Cli {
    /// JSON file to load records from and save them to
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Prompt shown before each command
    #[arg(long)]
    prompt: Option<String>,
}

/// Initialize tracing on stderr so stdout carries only command output
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "hbnb=warn".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = ShellConfig::from_env();
    if let Some(file) = cli.file {
        config = config.with_storage_path(file);
    }
    if let Some(prompt) = cli.prompt {
        config = config.with_prompt(prompt);
    }

    let mut console = Console::open(&config).with_context(|| {
        format!("failed to load records from {}", config.storage_path.display())
    })?;

    if io::stdin().is_terminal() {
        let mut editor = RustylineEditor::new().context("failed to start line editor")?;
        console.run(&mut editor)?;
    } else {
        let mut editor = ScriptEditor::new(io::stdin().lock());
        console.run(&mut editor)?;
    }

    Ok(())
}
