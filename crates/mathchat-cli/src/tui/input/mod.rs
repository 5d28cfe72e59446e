//! Input box editing
//!
//! Content is a plain string with a byte cursor that always sits on a
//! char boundary. Long lines are not wrapped.

mod editor;

pub use editor::InputAction;

#[derive(Debug, Default)]
pub struct InputEditor {
    content: String,
    /// Byte offset into `content`
    cursor_position: usize,
}

impl InputEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Display column and line of the cursor
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let before = &self.content[..self.cursor_position];
        let line = before.matches('\n').count();
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let col = crate::tui::utils::text::display_width(&before[line_start..]);
        (line, col)
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor_position = 0;
    }

    fn insert_char(&mut self, ch: char) {
        self.content.insert(self.cursor_position, ch);
        self.cursor_position += ch.len_utf8();
    }

    fn insert_text(&mut self, text: &str) {
        self.content.insert_str(self.cursor_position, text);
        self.cursor_position += text.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn type_str(input: &mut InputEditor, text: &str) {
        for c in text.chars() {
            input.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    #[test]
    fn test_enter_submits_and_clears() {
        let mut input = InputEditor::new();
        type_str(&mut input, "What is $E=mc^2$?");
        match input.handle_key(KeyCode::Enter, KeyModifiers::NONE) {
            InputAction::Submit(text) => assert_eq!(text, "What is $E=mc^2$?"),
            other => panic!("expected submit, got {:?}", other),
        }
        assert!(input.is_empty());
    }

    #[test]
    fn test_blank_input_not_submitted() {
        let mut input = InputEditor::new();
        type_str(&mut input, "   ");
        assert!(matches!(
            input.handle_key(KeyCode::Enter, KeyModifiers::NONE),
            InputAction::Continue
        ));
        assert_eq!(input.content(), "   ");
    }

    #[test]
    fn test_alt_enter_inserts_newline() {
        let mut input = InputEditor::new();
        type_str(&mut input, "a");
        input.handle_key(KeyCode::Enter, KeyModifiers::ALT);
        type_str(&mut input, "b");
        assert_eq!(input.content(), "a\nb");
        assert_eq!(input.cursor_line_col(), (1, 1));
    }

    #[test]
    fn test_editing_multibyte() {
        let mut input = InputEditor::new();
        type_str(&mut input, "π≈3");
        input.handle_key(KeyCode::Left, KeyModifiers::NONE);
        input.handle_key(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(input.content(), "π3");
        input.handle_key(KeyCode::Home, KeyModifiers::NONE);
        input.handle_key(KeyCode::Delete, KeyModifiers::NONE);
        assert_eq!(input.content(), "3");
    }

    #[test]
    fn test_delete_word_backwards() {
        let mut input = InputEditor::new();
        type_str(&mut input, "solve for x  ");
        input.handle_key(KeyCode::Char('w'), KeyModifiers::CONTROL);
        assert_eq!(input.content(), "solve for ");
    }
}
