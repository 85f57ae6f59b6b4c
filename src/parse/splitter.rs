use crate::errors::ShellError;
use once_cell::sync::Lazy;
use regex::Regex;

static COLLECTION_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("collection name pattern must compile"));

/// One `method(rawArgs)` segment of a chained operation string. The argument
/// payload is the verbatim substring between the outer parentheses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub method: String,
    pub raw_args: String,
}

/// Splits `collection.method(args).method(args)...` into the collection name
/// and the ordered call chain.
///
/// Parenthesis depth is tracked with a counter; quote state is tracked so a
/// parenthesis inside a string literal does not open or close a call. Anything
/// trailing the last matched call other than `.` stops the scan silently.
///
/// # Errors
/// `MalformedRequest` when there is no `.` separator, a call cannot be matched,
/// a parenthesis is left unbalanced, or the chain comes out empty.
/// `InvalidIdentifier` when the collection name is not `[A-Za-z0-9_]+`.
pub fn split(raw: &str) -> Result<(String, Vec<Call>), ShellError> {
    let raw = raw.trim();
    let Some(dot) = raw.find('.') else {
        return Err(ShellError::MalformedRequest(raw.to_string()));
    };
    let collection = raw[..dot].trim();
    if !COLLECTION_NAME.is_match(collection) {
        return Err(ShellError::InvalidIdentifier(collection.to_string()));
    }

    let chain = raw[dot + 1..].trim();
    let mut calls = Vec::new();
    let mut rest = chain;
    loop {
        let (call, after) = match_call(rest)
            .ok_or_else(|| ShellError::MalformedRequest(rest.to_string()))?;
        calls.push(call);
        match after.chars().next() {
            Some('.') => rest = &after[1..],
            // trailing garbage is ignored; the chain ends here
            _ => break,
        }
    }
    if calls.is_empty() {
        return Err(ShellError::MalformedRequest(chain.to_string()));
    }
    Ok((collection.to_string(), calls))
}

/// Matches one `identifier(...)` prefix, returning the call and the unparsed
/// remainder. `None` when no identifier or no balanced parens are found.
fn match_call(input: &str) -> Option<(Call, &str)> {
    let ident_len = input
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_alphanumeric() || *c == '_')
        .count();
    if ident_len == 0 {
        return None;
    }
    let method = &input[..ident_len];
    let rest = &input[ident_len..];
    if !rest.starts_with('(') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut quote_char = '"';
    let mut escaped = false;
    for (i, c) in rest.char_indices() {
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
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    let call = Call {
                        method: method.to_string(),
                        raw_args: rest[1..i].trim().to_string(),
                    };
                    return Some((call, &rest[i + 1..]));
                }
            }
            _ => {}
        }
    }
    None
}
