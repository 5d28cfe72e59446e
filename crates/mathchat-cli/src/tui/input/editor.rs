//! Keyboard handling for the input box

use crossterm::event::{KeyCode, KeyModifiers};

use super::InputEditor;

#[derive(Debug)]
pub enum InputAction {
    Continue,
    Submit(String),
    ContentChanged,
}

impl InputEditor {
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> InputAction {
        match code {
            // Shift+Enter or Alt+Enter inserts newline
            KeyCode::Enter
                if modifiers.contains(KeyModifiers::SHIFT)
                    || modifiers.contains(KeyModifiers::ALT) =>
            {
                self.insert_char('\n');
                InputAction::ContentChanged
            }
            // Some terminals send Ctrl+J for Shift+Enter
            KeyCode::Char('j') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.insert_char('\n');
                InputAction::ContentChanged
            }
            KeyCode::Enter => {
                if self.content.trim().is_empty() {
                    return InputAction::Continue;
                }
                let content = std::mem::take(&mut self.content);
                self.cursor_position = 0;
                InputAction::Submit(content)
            }
            KeyCode::Char('w') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.delete_word_backwards();
                InputAction::ContentChanged
            }
            KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.clear();
                InputAction::ContentChanged
            }
            KeyCode::Char('a') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_cursor_line_start();
                InputAction::Continue
            }
            KeyCode::Char('e') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_cursor_line_end();
                InputAction::Continue
            }
            KeyCode::Char(_) if modifiers.contains(KeyModifiers::CONTROL) => InputAction::Continue,
            KeyCode::Char(ch) => {
                self.insert_char(ch);
                InputAction::ContentChanged
            }
            KeyCode::Backspace => match self.prev_boundary() {
                Some(start) => {
                    self.content.drain(start..self.cursor_position);
                    self.cursor_position = start;
                    InputAction::ContentChanged
                }
                None => InputAction::Continue,
            },
            KeyCode::Delete => match self.next_boundary() {
                Some(end) => {
                    self.content.drain(self.cursor_position..end);
                    InputAction::ContentChanged
                }
                None => InputAction::Continue,
            },
            KeyCode::Left => {
                if let Some(pos) = self.prev_boundary() {
                    self.cursor_position = pos;
                }
                InputAction::Continue
            }
            KeyCode::Right => {
                if let Some(pos) = self.next_boundary() {
                    self.cursor_position = pos;
                }
                InputAction::Continue
            }
            KeyCode::Home => {
                self.move_cursor_line_start();
                InputAction::Continue
            }
            KeyCode::End => {
                self.move_cursor_line_end();
                InputAction::Continue
            }
            _ => InputAction::Continue,
        }
    }

    /// Bracketed paste
    pub fn handle_paste(&mut self, text: &str) -> InputAction {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        if text.is_empty() {
            return InputAction::Continue;
        }
        self.insert_text(&text);
        InputAction::ContentChanged
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.content[..self.cursor_position]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.content[self.cursor_position..]
            .chars()
            .next()
            .map(|c| self.cursor_position + c.len_utf8())
    }

    fn move_cursor_line_start(&mut self) {
        self.cursor_position = self.content[..self.cursor_position]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
    }

    fn move_cursor_line_end(&mut self) {
        self.cursor_position = self.content[self.cursor_position..]
            .find('\n')
            .map(|i| self.cursor_position + i)
            .unwrap_or(self.content.len());
    }

    fn delete_word_backwards(&mut self) {
        let before = &self.content[..self.cursor_position];
        let trimmed = before.trim_end();
        let start = trimmed
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        self.content.drain(start..self.cursor_position);
        self.cursor_position = start;
    }
}
