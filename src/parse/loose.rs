use crate::errors::ShellError;
use serde_json::Value;

/// Parses one raw argument payload into its top-level values.
///
/// Strict JSON is attempted first (whole payload, then a top-level comma
/// split). On failure two repairs are tried in order: single quotes become
/// double quotes, then bare object keys are wrapped in double quotes. Both
/// repairs are quote-aware state machines, so content inside string literals
/// is never rewritten.
///
/// An empty or whitespace-only payload yields a single empty object (the
/// empty filter).
///
/// # Errors
/// `InvalidArguments` carrying the original payload when no repair produces
/// parseable JSON.
pub fn parse_args(raw: &str) -> Result<Vec<Value>, ShellError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(vec![Value::Object(serde_json::Map::new())]);
    }
    if let Some(vals) = try_parse(raw) {
        return Ok(vals);
    }
    let requoted = repair_quotes(raw);
    if let Some(vals) = try_parse(&requoted) {
        log::debug!("loose parse succeeded after quote repair");
        return Ok(vals);
    }
    let rekeyed = quote_bare_keys(&requoted);
    if let Some(vals) = try_parse(&rekeyed) {
        log::debug!("loose parse succeeded after key repair");
        return Ok(vals);
    }
    Err(ShellError::InvalidArguments { payload: raw.to_string() })
}

fn try_parse(s: &str) -> Option<Vec<Value>> {
    if let Ok(v) = serde_json::from_str::<Value>(s) {
        return Some(vec![v]);
    }
    let parts = split_top_level(s);
    if parts.len() <= 1 {
        return None;
    }
    let mut out = Vec::with_capacity(parts.len());
    for part in parts {
        out.push(serde_json::from_str::<Value>(part.trim()).ok()?);
    }
    Some(out)
}

/// Splits on commas at nesting depth zero. Depth covers `{}`, `[]` and `()`;
/// commas inside string literals never split.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut quote_char = '"';
    let mut escaped = false;
    let mut start = 0usize;
    for (i, c) in s.char_indices() {
        if in_quotes {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote_char {
                in_quotes = false;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                in_quotes = true;
                quote_char = c;
            }
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Rewrites single-quoted string literals as double-quoted ones. Embedded
/// double quotes gain a backslash; `\'` collapses to a bare quote. Double
/// quoted literals pass through untouched.
fn repair_quotes(s: &str) -> String {
    enum Mode {
        Normal,
        Double,
        Single,
    }
    let mut out = String::with_capacity(s.len());
    let mut mode = Mode::Normal;
    let mut escaped = false;
    for c in s.chars() {
        match mode {
            Mode::Normal => match c {
                '\'' => {
                    out.push('"');
                    mode = Mode::Single;
                }
                '"' => {
                    out.push(c);
                    mode = Mode::Double;
                }
                _ => out.push(c),
            },
            Mode::Double => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' {
                    mode = Mode::Normal;
                }
                out.push(c);
            }
            Mode::Single => {
                if escaped {
                    escaped = false;
                    if c == '\'' {
                        out.push('\'');
                    } else {
                        out.push('\\');
                        out.push(c);
                    }
                } else if c == '\\' {
                    escaped = true;
                } else if c == '\'' {
                    out.push('"');
                    mode = Mode::Normal;
                } else if c == '"' {
                    out.push('\\');
                    out.push('"');
                } else {
                    out.push(c);
                }
            }
        }
    }
    out
}

/// Wraps bare `identifier:` object keys in double quotes. A word outside any
/// string literal whose next significant character is `:` is a key; anything
/// else passes through verbatim.
fn quote_bare_keys(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 8);
    let mut i = 0usize;
    let mut in_quotes = false;
    let mut escaped = false;
    while i < chars.len() {
        let c = chars[i];
        if in_quotes {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_quotes = false;
            }
            out.push(c);
            i += 1;
            continue;
        }
        if c == '"' {
            in_quotes = true;
            out.push(c);
            i += 1;
            continue;
        }
        if c.is_ascii_alphabetic() || c == '_' || c == '$' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_' || chars[i] == '$') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            let mut j = i;
            while j < chars.len() && chars[j].is_ascii_whitespace() {
                j += 1;
            }
            if j < chars.len() && chars[j] == ':' {
                out.push('"');
                out.push_str(&word);
                out.push('"');
            } else {
                out.push_str(&word);
            }
            continue;
        }
        out.push(c);
        i += 1;
    }
    out
}
