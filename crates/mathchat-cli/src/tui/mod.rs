//! Interactive terminal chat

mod app;
mod handlers;
mod input;
mod markdown;
mod streaming;
mod themes;
mod utils;

use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use mathchat_core::{AiClient, Config};

use self::app::App;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Run the chat UI until the user quits
pub async fn run(config: Config) -> Result<()> {
    let client = AiClient::new(config).context("Failed to create API client")?;
    let mut app = App::new(client);

    let mut terminal = init()?;
    install_panic_hook();
    let result = app.run(&mut terminal).await;

    // Restore even when the loop failed
    restore()?;
    terminal.show_cursor()?;
    result
}

fn init() -> Result<Tui> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, EnableBracketedPaste)?;
    let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    Ok(terminal)
}

fn restore() -> Result<()> {
    execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));
}
