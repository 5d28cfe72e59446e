//! A conversation bound to a client
//!
//! Drives one turn end to end: records the user message, requests the
//! reply (streamed or whole, per config), and writes each render into the
//! conversation as it arrives.

use super::conversation::{Conversation, Message};
use super::turn::TurnDriver;
use crate::ai::{AiClient, DecoderState};
use crate::error::Result;
use crate::render::RenderedSpan;

pub struct ChatSession {
    client: AiClient,
    turns: TurnDriver,
}

impl ChatSession {
    pub fn new(client: AiClient) -> Self {
        Self {
            client,
            turns: TurnDriver::new(),
        }
    }

    pub fn client(&self) -> &AiClient {
        &self.client
    }

    pub fn conversation(&self) -> &Conversation {
        self.turns.conversation()
    }

    /// The most recent assistant reply, if any
    pub fn last_reply(&self) -> Option<&Message> {
        self.conversation()
            .messages()
            .iter()
            .rev()
            .find(|m| m.role == super::ChatRole::Assistant)
    }

    /// Send `text` and wait for the full reply.
    ///
    /// `on_update` sees every intermediate render. On a transport failure
    /// the partial reply stays in the conversation and the error is
    /// returned.
    pub async fn send<F>(&mut self, text: &str, mut on_update: F) -> Result<()>
    where
        F: FnMut(&[RenderedSpan]),
    {
        let history = self.turns.begin(text)?;

        let result = if self.client.config().stream {
            let turns = &mut self.turns;
            self.client
                .stream_completion(&history, |spans| {
                    on_update(&spans);
                    turns.apply(spans);
                })
                .await
                .map(|summary| (summary.text.chars().count(), summary.state))
        } else {
            self.client.complete(&history).await.map(|completion| {
                on_update(&completion.spans);
                let chars = completion.text.chars().count();
                self.turns.apply(completion.spans);
                (chars, DecoderState::Done)
            })
        };

        match result {
            Ok((chars, state)) => {
                self.turns.complete(chars, state);
                Ok(())
            }
            Err(e) => {
                self.turns.fail(&e);
                Err(e)
            }
        }
    }

    pub fn clear(&mut self) -> Result<()> {
        self.turns.clear()
    }
}
