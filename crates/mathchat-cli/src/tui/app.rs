//! Application state and main loop

use std::time::Duration;

use anyhow::Result;
use crossterm::event::EventStream;
use futures::StreamExt;

use mathchat_core::{AiClient, TurnDriver};

use super::input::InputEditor;
use super::streaming::{StreamUpdate, StreamingManager};
use super::themes::Theme;
use super::Tui;

const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// What the status bar shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Idle,
    /// Request sent, nothing received yet
    Waiting,
    Streaming,
    Info(String),
    Error(String),
}

/// Scroll position of the message area, in wrapped lines
#[derive(Debug, Clone)]
pub struct ScrollState {
    pub offset: usize,
    pub max_offset: usize,
    pub viewport: usize,
    /// Stick to the bottom as new lines arrive
    pub auto_follow: bool,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            offset: 0,
            max_offset: 0,
            viewport: 0,
            auto_follow: true,
        }
    }
}

impl ScrollState {
    /// Record the content height after layout
    pub fn update_bounds(&mut self, total_lines: usize, viewport: usize) {
        self.viewport = viewport;
        self.max_offset = total_lines.saturating_sub(viewport);
        if self.auto_follow || self.offset > self.max_offset {
            self.offset = self.max_offset;
        }
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.offset = self.offset.saturating_sub(lines);
        self.auto_follow = false;
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.offset = (self.offset + lines).min(self.max_offset);
        self.auto_follow = self.offset == self.max_offset;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset;
        self.auto_follow = true;
    }

    pub fn page(&self) -> usize {
        (self.viewport / 2).max(1)
    }
}

pub struct App {
    pub client: AiClient,
    pub turns: TurnDriver,
    pub input: InputEditor,
    pub theme: Theme,
    pub streaming: StreamingManager,
    pub status: Status,
    pub scroll: ScrollState,
    pub should_quit: bool,
}

impl App {
    pub fn new(client: AiClient) -> Self {
        Self {
            client,
            turns: TurnDriver::new(),
            input: InputEditor::new(),
            theme: Theme::default(),
            streaming: StreamingManager::new(),
            status: Status::Idle,
            scroll: ScrollState::default(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut events = EventStream::new();
        let mut tick = tokio::time::interval(TICK_INTERVAL);

        while !self.should_quit {
            self.poll_stream();
            terminal.draw(|f| self.ui(f))?;

            tokio::select! {
                event = events.next() => {
                    match event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(e)) => return Err(e.into()),
                        None => break,
                    }
                }
                _ = tick.tick() => {}
            }
        }

        self.streaming.cancel();
        Ok(())
    }

    /// Start a turn for `text`
    pub fn send_message(&mut self, text: String) {
        if self.streaming.is_streaming() {
            self.status = Status::Info("A reply is still streaming".to_string());
            return;
        }
        let history = match self.turns.begin(text) {
            Ok(history) => history,
            Err(e) => {
                self.status = Status::Error(e.to_string());
                return;
            }
        };

        self.streaming.start(self.client.clone(), history);
        self.status = Status::Waiting;
        self.scroll.scroll_to_bottom();
    }

    /// Apply everything the reply task has sent since the last frame
    pub fn poll_stream(&mut self) {
        for update in self.streaming.drain() {
            match update {
                StreamUpdate::Rendered(spans) => {
                    self.turns.apply(spans);
                    self.status = Status::Streaming;
                }
                StreamUpdate::Finished { chars, state } => {
                    self.turns.complete(chars, state);
                    self.status = Status::Idle;
                }
                StreamUpdate::Failed(e) => {
                    self.turns.fail(&e);
                    self.status = Status::Error(e.to_string());
                }
            }
        }
    }
}
