//! CLI output formatting: highlighted JSON and table cell helpers.

use colored::Colorize;

use crate::geometry::{PhysicalRect, Rect};

/// Prints a serializable value as highlighted, pretty-printed JSON.
pub fn print_json<T: serde::Serialize>(value: &T) {
    let value = serde_json::to_value(value).unwrap_or(serde_json::Value::Null);
    println!("{}", highlight_json(&value));
}

/// Pretty-prints JSON with keys cyan, strings green, numbers yellow and
/// booleans/null magenta.
#[must_use]
pub fn highlight_json(value: &serde_json::Value) -> String {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    let mut out = String::with_capacity(json.len() * 2);
    let mut token = String::new();
    let mut in_string = false;
    let mut escape_next = false;
    let mut is_key = false;
    let mut after_colon = false;

    for ch in json.chars() {
        if in_string {
            token.push(ch);
            if escape_next {
                escape_next = false;
            } else if ch == '\\' {
                escape_next = true;
            } else if ch == '"' {
                let painted = if is_key { token.cyan() } else { token.green() };
                out.push_str(&painted.to_string());
                token.clear();
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => {
                flush_scalar(&mut out, &mut token);
                token.push(ch);
                in_string = true;
                is_key = !after_colon;
                after_colon = false;
            }
            ':' => {
                flush_scalar(&mut out, &mut token);
                out.push(':');
                after_colon = true;
            }
            ',' | '{' | '}' | '[' | ']' => {
                flush_scalar(&mut out, &mut token);
                out.push(ch);
                after_colon = false;
            }
            _ => token.push(ch),
        }
    }
    flush_scalar(&mut out, &mut token);
    out
}

/// Writes a pending non-string token, coloring it if it is a scalar.
fn flush_scalar(out: &mut String, token: &mut String) {
    let value = token.trim();
    if value.is_empty() {
        out.push_str(token);
    } else {
        let start = token.len() - token.trim_start().len();
        let end = start + value.len();
        let painted = if matches!(value, "true" | "false" | "null") {
            value.magenta().to_string()
        } else if value.parse::<f64>().is_ok() {
            value.yellow().to_string()
        } else {
            value.to_string()
        };
        out.push_str(&token[..start]);
        out.push_str(&painted);
        out.push_str(&token[end..]);
    }
    token.clear();
}

/// Formats a number with at most `precision` decimals and no trailing zeros.
#[must_use]
pub fn format_number(value: f64, precision: usize) -> String {
    let text = format!("{value:.precision$}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.');
        if trimmed == "-0" { "0".to_string() } else { trimmed.to_string() }
    } else {
        text
    }
}

/// `x, y  w×h` for a logical rect.
#[must_use]
pub fn format_rect(rect: &Rect) -> String {
    format!(
        "{}, {}  {}×{}",
        format_number(rect.x, 2),
        format_number(rect.y, 2),
        format_number(rect.width, 2),
        format_number(rect.height, 2)
    )
}

/// `left, top  w×h` for a physical rect.
#[must_use]
pub fn format_physical_rect(rect: &PhysicalRect) -> String {
    format!("{}, {}  {}×{}", rect.left, rect.top, rect.width(), rect.height())
}

/// Formats a boolean as a colored check mark.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value { "✓".green().to_string() } else { "✗".red().to_string() }
}
