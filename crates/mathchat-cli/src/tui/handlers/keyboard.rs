//! Keyboard and paste handling
//!
//! Global keys are checked first, everything else goes to the input box.
//! Lines starting with `/` are commands rather than messages.

use std::path::Path;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::info;

use mathchat_core::transcript;

use crate::tui::app::{App, Status};
use crate::tui::input::InputAction;

impl App {
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Paste(text) => {
                self.input.handle_paste(&text);
            }
            // Layout is recomputed every frame
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                self.should_quit = true;
                return;
            }
            KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::PageUp => {
                let page = self.scroll.page();
                self.scroll.scroll_up(page);
                return;
            }
            KeyCode::PageDown => {
                let page = self.scroll.page();
                self.scroll.scroll_down(page);
                return;
            }
            KeyCode::End if ctrl => {
                self.scroll.scroll_to_bottom();
                return;
            }
            // Keep the draft while a reply is streaming
            KeyCode::Enter if key.modifiers.is_empty() && self.streaming.is_streaming() => {
                self.status = Status::Info("Wait for the reply to finish".to_string());
                return;
            }
            _ => {}
        }

        if let InputAction::Submit(text) = self.input.handle_key(key.code, key.modifiers) {
            if text.starts_with('/') {
                self.run_command(text.trim());
            } else {
                self.send_message(text);
            }
        }
    }

    fn run_command(&mut self, line: &str) {
        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };

        self.status = match name {
            "/quit" => {
                self.should_quit = true;
                Status::Idle
            }
            "/clear" => match self.turns.clear() {
                Ok(()) => {
                    self.scroll.scroll_to_bottom();
                    Status::Info("Conversation cleared".to_string())
                }
                Err(e) => Status::Error(e.to_string()),
            },
            "/export" if arg.is_empty() => Status::Error("Usage: /export <file.html>".to_string()),
            "/export" => self.export(Path::new(arg)),
            _ => Status::Error(format!("Unknown command: {}", name)),
        };
    }

    fn export(&self, path: &Path) -> Status {
        let html = transcript::to_html_document_with(self.turns.conversation(), self.client.renderer());
        match std::fs::write(path, html) {
            Ok(()) => {
                info!("Exported transcript to {}", path.display());
                Status::Info(format!("Exported to {}", path.display()))
            }
            Err(e) => Status::Error(format!("Export failed: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathchat_core::{AiClient, ChatRole, Config, DecoderState};

    fn app() -> App {
        App::new(AiClient::new(Config::default()).unwrap())
    }

    fn type_line(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_export_writes_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.html");
        let mut app = app();
        app.turns.begin("What is $\\pi$?").unwrap();
        app.turns.complete(0, DecoderState::Done);

        type_line(&mut app, &format!("/export {}", path.display()));
        assert!(matches!(app.status, Status::Info(_)));
        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("<math"));
        assert_eq!(app.turns.conversation().messages()[0].role, ChatRole::User);
    }

    #[test]
    fn test_unknown_command_reported() {
        let mut app = app();
        type_line(&mut app, "/frobnicate");
        assert_eq!(
            app.status,
            Status::Error("Unknown command: /frobnicate".to_string())
        );
        assert!(app.turns.conversation().is_empty());
    }

    #[test]
    fn test_clear_empties_conversation() {
        let mut app = app();
        app.turns.begin("hi").unwrap();
        app.turns.complete(0, DecoderState::Done);
        type_line(&mut app, "/clear");
        assert!(app.turns.conversation().is_empty());
    }

    #[test]
    fn test_paste_goes_to_input() {
        let mut app = app();
        app.handle_event(Event::Paste("a\r\nb".to_string()));
        assert_eq!(app.input.content(), "a\nb");
    }
}
