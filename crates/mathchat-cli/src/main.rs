//! mathchat - chat in the terminal with Markdown and LaTeX rendering

mod commands;
mod logging;
mod tui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use mathchat_core::Config;

#[derive(Parser)]
#[command(name = "mathchat")]
#[command(version, about = "Chat with a language model, rendering Markdown and LaTeX as it streams")]
struct Cli {
    /// Config file to load instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Model name sent with every request
    #[arg(long, global = true)]
    model: Option<String>,

    /// Wait for whole replies instead of streaming
    #[arg(long, global = true)]
    no_stream: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one prompt and print the reply
    Ask {
        prompt: String,

        /// Print the rendered HTML/MathML instead of the reply text
        #[arg(long)]
        html: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Ask { ref prompt, html }) => {
            logging::init_stderr();
            let config = load_config(&cli)?;
            commands::ask::run(config, prompt, html).await
        }
        None => {
            let log_path = logging::init_file()?;
            info!("mathchat starting, logging to {}", log_path.display());
            let config = load_config(&cli)?;
            tui::run(config).await
        }
    }
}

/// Config file, then `XAI_API_KEY`, then command-line flags
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = Config::load_from(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.apply_env();
            config
        }
        None => Config::load().context("Failed to load config")?,
    };

    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    if cli.no_stream {
        config.stream = false;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = \"from-file\"\nstream = true\n").unwrap();

        let cli = Cli::parse_from([
            "mathchat",
            "--config",
            path.to_str().unwrap(),
            "--model",
            "from-flag",
            "--no-stream",
        ]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.model, "from-flag");
        assert!(!config.stream);
    }

    #[test]
    fn test_ask_subcommand_parses() {
        let cli = Cli::parse_from(["mathchat", "ask", "What is $E=mc^2$?", "--html"]);
        match cli.command {
            Some(Commands::Ask { prompt, html }) => {
                assert_eq!(prompt, "What is $E=mc^2$?");
                assert!(html);
            }
            None => panic!("expected ask subcommand"),
        }
    }
}
