//! Inline element types for terminal projection

/// Inline content of one message, in reading order
#[derive(Debug, Clone, PartialEq)]
pub enum InlineContent {
    /// Plain text
    Text(String),
    /// Bold text
    Bold(Vec<InlineContent>),
    /// Italic text
    Italic(Vec<InlineContent>),
    /// Inline code
    Code(String),
    /// Hyperlink; only the text is shown
    Link { text: Vec<InlineContent> },
    /// Strikethrough text
    Strikethrough(Vec<InlineContent>),
    /// Math already converted to Unicode; `failed` marks LaTeX that did not render
    Math {
        text: String,
        failed: bool,
        block: bool,
    },
    /// Soft line break (space)
    SoftBreak,
    /// Hard line break (newline)
    HardBreak,
}
