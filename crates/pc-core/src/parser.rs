//! Text parsers: spreadsheet clipboard grids, CSS declaration strings,
//! CSS colors and the lenient number reading used by conditional formatting.
//!
//! Built on `winnow` 0.7 in the same streaming style as the rest of the
//! crate: each parser advances a `&mut &str`.

use crate::model::Color;
use winnow::combinator::{alt, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

// ─── Clipboard grids ─────────────────────────────────────────────────────

/// Parse clipboard text into rows of fields.
///
/// Line endings are normalized and trailing newlines dropped. The field
/// delimiter is a tab if the text contains one, otherwise `;` or `,`,
/// whichever occurs more often (`,` on a tie). Double-quoted fields may
/// contain delimiters, newlines and `""` escapes.
#[must_use]
pub fn parse_clipboard(text: &str) -> Vec<Vec<String>> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let body = normalized.trim_end_matches('\n');
    if body.is_empty() {
        return Vec::new();
    }
    let delim = detect_delimiter(body);

    let mut rest = body;
    let mut rows = Vec::new();
    let mut row = Vec::new();
    loop {
        let mut field = if rest.starts_with('"') {
            parse_quoted_field(&mut rest).unwrap_or_default()
        } else {
            String::new()
        };
        // Unquoted text, or stray text after a closing quote
        field.push_str(parse_plain_field(&mut rest, delim).unwrap_or_default());
        row.push(field);

        match rest.chars().next() {
            Some('\n') => {
                rows.push(std::mem::take(&mut row));
                rest = &rest[1..];
            }
            Some(c) if c == delim => rest = &rest[c.len_utf8()..],
            _ => {
                rows.push(row);
                break;
            }
        }
    }
    rows
}

fn detect_delimiter(text: &str) -> char {
    if text.contains('\t') {
        return '\t';
    }
    let semis = text.matches(';').count();
    let commas = text.matches(',').count();
    if semis > commas { ';' } else { ',' }
}

fn parse_plain_field<'a>(input: &mut &'a str, delim: char) -> ModalResult<&'a str> {
    take_till(0.., |c: char| c == delim || c == '\n').parse_next(input)
}

fn parse_quoted_field(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut out = String::new();
    loop {
        let chunk: &str = take_till(0.., '"').parse_next(input)?;
        out.push_str(chunk);
        if let Some(after) = input.strip_prefix("\"\"") {
            out.push('"');
            *input = after;
        } else if let Some(after) = input.strip_prefix('"') {
            *input = after;
            break;
        } else {
            // Unterminated quote: keep what was read
            break;
        }
    }
    Ok(out)
}

// ─── CSS declarations ────────────────────────────────────────────────────

/// Split `s` on `sep` characters that are not inside parentheses.
fn split_top_level(s: &str, sep: impl Fn(char) -> bool) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in s.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if depth == 0 && sep(c) => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

/// `backgroundColor` → `background-color`.
fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Parse `key: value; key: value` into pairs. Declarations may also be
/// separated by commas outside parentheses. Keys are returned kebab-cased,
/// entries without a key or value are skipped.
pub fn parse_css_declarations(css: &str) -> Vec<(String, String)> {
    split_top_level(css, |c| c == ';' || c == ',')
        .into_iter()
        .filter_map(|part| {
            let (key, value) = part.split_once(':')?;
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() || value.is_empty() {
                return None;
            }
            Some((kebab_case(key).to_ascii_lowercase(), value.to_string()))
        })
        .collect()
}

/// Width and colour of a `border` shorthand such as `2px solid #333`.
pub fn parse_border_shorthand(value: &str) -> (Option<f32>, Option<Color>) {
    let tokens: Vec<&str> = split_top_level(value.trim(), char::is_whitespace)
        .into_iter()
        .filter(|t| !t.is_empty())
        .collect();
    let width = tokens
        .iter()
        .find(|t| t.ends_with("px"))
        .and_then(|t| parse_loose_number(t))
        .map(|w| w as f32);
    let color = tokens.iter().rev().find_map(|t| parse_css_color(t));
    (width, color)
}

// ─── Numbers ─────────────────────────────────────────────────────────────

/// Read a number the way spreadsheet users type it: everything except
/// digits, signs and dots is dropped (`"$1,234.50"` → `1234.5`), then the
/// longest leading decimal is parsed.
pub fn parse_loose_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.'))
        .collect();
    let mut input = cleaned.as_str();
    parse_decimal(&mut input).ok()
}

fn parse_decimal(input: &mut &str) -> ModalResult<f64> {
    let start = *input;
    if input.starts_with(['+', '-']) {
        *input = &input[1..];
    }
    let int: &str = take_while(0.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    let mut frac = "";
    if input.starts_with('.') {
        *input = &input[1..];
        frac = take_while(0.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    }
    if int.is_empty() && frac.is_empty() {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    let matched = &start[..start.len() - input.len()];
    matched
        .parse::<f64>()
        .map_err(|_| ErrMode::Backtrack(ContextError::new()))
}

// ─── Colors ──────────────────────────────────────────────────────────────

/// Parse a CSS color: `#hex`, `rgb()`, `rgba()`, `transparent`, or one of
/// the basic named colors.
pub fn parse_css_color(value: &str) -> Option<Color> {
    let v = value.trim().to_ascii_lowercase();
    if v.starts_with('#') {
        return Color::from_hex(&v);
    }
    if v.starts_with("rgb") {
        let mut input = v.as_str();
        return parse_rgb_function(&mut input).ok();
    }
    named_color(&v)
}

fn skip_separators(input: &mut &str) {
    let _: Result<&str, ErrMode<ContextError>> =
        take_while(0.., |c: char| c.is_whitespace() || c == ',' || c == '/').parse_next(input);
}

fn parse_channel(input: &mut &str) -> ModalResult<f32> {
    skip_separators(input);
    let n = parse_decimal(input)? as f32;
    if let Some(rest) = input.strip_prefix('%') {
        *input = rest;
        return Ok((n / 100.0 * 255.0).clamp(0.0, 255.0));
    }
    Ok(n.clamp(0.0, 255.0))
}

fn parse_rgb_function(input: &mut &str) -> ModalResult<Color> {
    let _ = preceded(alt(("rgba", "rgb")), '(').parse_next(input)?;
    let r = parse_channel(input)?;
    let g = parse_channel(input)?;
    let b = parse_channel(input)?;
    skip_separators(input);
    let mut a = 1.0;
    if !input.starts_with(')') {
        let n = parse_decimal(input)? as f32;
        a = if let Some(rest) = input.strip_prefix('%') {
            *input = rest;
            n / 100.0
        } else {
            n
        };
        skip_separators(input);
    }
    let _ = ')'.parse_next(input)?;
    let mut color = Color::from_rgb8(r.round() as u8, g.round() as u8, b.round() as u8);
    color.a = a.clamp(0.0, 1.0);
    Ok(color)
}

fn named_color(name: &str) -> Option<Color> {
    let hex = match name {
        "transparent" => return Some(Color::TRANSPARENT),
        "black" => "#000000",
        "white" => "#ffffff",
        "red" => "#ff0000",
        "green" => "#008000",
        "lime" => "#00ff00",
        "blue" => "#0000ff",
        "yellow" => "#ffff00",
        "orange" => "#ffa500",
        "purple" => "#800080",
        "gray" | "grey" => "#808080",
        "silver" => "#c0c0c0",
        "navy" => "#000080",
        "teal" => "#008080",
        "maroon" => "#800000",
        _ => return None,
    };
    Color::from_hex(hex)
}
