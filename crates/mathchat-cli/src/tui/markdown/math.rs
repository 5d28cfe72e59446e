//! LaTeX to Unicode approximation for terminal display
//!
//! Terminals cannot show MathML, so formulas go through `unicodeit` for
//! symbols and scripts. Fractions and roots are flattened first since
//! unicodeit has no linear form for them.

/// Convert a LaTeX expression to a single-line Unicode approximation
pub fn latex_to_unicode(latex: &str) -> String {
    // Literal braces are masked so only grouping braces get stripped
    let mut result = latex.replace(r"\{", "\u{0}").replace(r"\}", "\u{1}");
    for frac in [r"\frac{", r"\dfrac{", r"\tfrac{"] {
        result = replace_fractions(&result, frac);
    }
    result = replace_roots(&result);

    let result = unicodeit::replace(&result);
    apply_latex_fallbacks(&result)
}

/// Spacing commands and leftover grouping braces
fn apply_latex_fallbacks(text: &str) -> String {
    let mut result = text.to_string();
    for (from, to) in [(r"\\", " "), (r"\,", " "), (r"\;", " "), (r"\:", " "), (r"\!", "")] {
        result = result.replace(from, to);
    }

    let result = result
        .chars()
        .filter(|c| *c != '{' && *c != '}')
        .map(|c| match c {
            '\u{0}' => '{',
            '\u{1}' => '}',
            other => other,
        })
        .collect::<String>();

    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `\frac{a}{b}` -> `a/b`, parenthesizing compound parts
fn replace_fractions(text: &str, command: &str) -> String {
    let mut result = text.to_string();
    while let Some(start) = result.find(command) {
        let num_start = start + command.len();
        let Some(num_len) = find_matching_brace(&result[num_start..]) else {
            break;
        };
        let num_end = num_start + num_len;
        if !result[num_end + 1..].starts_with('{') {
            break;
        }
        let den_start = num_end + 2;
        let Some(den_len) = find_matching_brace(&result[den_start..]) else {
            break;
        };
        let den_end = den_start + den_len;

        let replacement = format!(
            "{}/{}",
            group(&result[num_start..num_end]),
            group(&result[den_start..den_end])
        );
        result = format!("{}{}{}", &result[..start], replacement, &result[den_end + 1..]);
    }
    result
}

/// `\sqrt{x}` -> `√x`, `\sqrt{x+1}` -> `√(x+1)`
fn replace_roots(text: &str) -> String {
    let mut result = text.to_string();
    while let Some(start) = result.find(r"\sqrt{") {
        let arg_start = start + r"\sqrt{".len();
        let Some(arg_len) = find_matching_brace(&result[arg_start..]) else {
            break;
        };
        let arg_end = arg_start + arg_len;
        let replacement = format!("√{}", group(&result[arg_start..arg_end]));
        result = format!("{}{}{}", &result[..start], replacement, &result[arg_end + 1..]);
    }
    result
}

/// Wrap `part` in parentheses unless it reads as one unit
fn group(part: &str) -> String {
    let part = part.trim();
    if part.chars().any(|c| matches!(c, '+' | '-' | '*' | '/' | ' ' | '=')) {
        format!("({})", part)
    } else {
        part.to_string()
    }
}

/// Byte offset of the brace closing an already-opened group
fn find_matching_brace(s: &str) -> Option<usize> {
    let mut depth = 1;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
