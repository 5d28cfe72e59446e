//! LaTeX rendering using KaTeX
//!
//! Output is MathML only, so the markup needs no stylesheet to display.
//! Malformed formulas never fail the render: the span is replaced with
//! error markup showing the source, and the rest of the message renders.

use katex::{Opts, OutputType};
use pulldown_cmark_escape::escape_html;
use tracing::debug;

/// LaTeX-to-markup engine for math spans
#[derive(Debug, Clone)]
pub struct MathEngine {
    inline: Opts,
    display: Opts,
}

impl Default for MathEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MathEngine {
    pub fn new() -> Self {
        Self {
            inline: katex_opts(false),
            display: katex_opts(true),
        }
    }

    /// Render `latex` to MathML; `display` selects block layout
    pub fn render(&self, latex: &str, display: bool) -> String {
        let opts = if display { &self.display } else { &self.inline };

        match katex::render_with_opts(latex, opts) {
            Ok(markup) => markup,
            Err(e) => {
                debug!(error = %e, latex = %latex, "LaTeX render failed, using fallback");
                error_markup(latex, &error_message(&e))
            }
        }
    }
}

fn katex_opts(display: bool) -> Opts {
    let mut opts = Opts::default();
    opts.set_display_mode(display);
    opts.set_output_type(OutputType::Mathml);
    // Errors come back as `Err` so the fallback markup is ours
    opts.set_throw_on_error(true);
    opts
}

/// KaTeX's parse message without the JS engine wrapper
fn error_message(error: &katex::Error) -> String {
    match error {
        katex::Error::JsExecError(message) => message.clone(),
        other => other.to_string(),
    }
}

/// Fallback shown in place of a formula that could not be rendered
pub fn error_markup(latex: &str, message: &str) -> String {
    let mut markup = String::from("<span class=\"math-error\" title=\"");
    // Writes into a String never fail
    let _ = escape_html(&mut markup, message);
    markup.push_str("\" style=\"color:#cc0000\">");
    let _ = escape_html(&mut markup, latex);
    markup.push_str("</span>");
    markup
}
