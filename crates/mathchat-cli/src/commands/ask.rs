//! `mathchat ask`: one prompt, one reply, printed to stdout

use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::{error, info};

use mathchat_core::render::{source_text, to_html};
use mathchat_core::{AiClient, ChatSession, Config, MessageContent};

pub async fn run(config: Config, prompt: &str, html: bool) -> Result<()> {
    let client = AiClient::new(config).context("Failed to create HTTP client")?;
    let mut session = ChatSession::new(client);
    info!("Asking {}", session.client().config().model);

    let mut stdout = io::stdout();
    let mut printed = 0usize;

    let result = session
        .send(prompt, |spans| {
            if html {
                return;
            }
            // The reply only ever grows, so print what is new since last time
            let text = source_text(spans);
            if let Some(tail) = text.get(printed..) {
                print!("{}", tail);
                let _ = stdout.flush();
            }
            printed = text.len();
        })
        .await;

    if html {
        if let Some(MessageContent::Rendered { spans, .. }) =
            session.last_reply().map(|m| &m.content)
        {
            println!("{}", to_html(spans));
        }
    } else if printed > 0 {
        println!();
    }

    if let Err(e) = result {
        error!("Request failed: {}", e);
        return Err(e).context("Completion request failed");
    }
    Ok(())
}
