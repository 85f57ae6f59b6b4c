use crate::errors::ShellError;
use once_cell::sync::Lazy;
use regex::RegexSet;

/// Substrings associated with code/host execution primitives. The argument
/// payloads are parsed permissively downstream, so anything resembling an
/// interpreter escape hatch is rejected up front. Defense in depth, not a
/// sandbox.
const FORBIDDEN_PATTERNS: &[&str] = &[
    r"__import__",
    r"eval\(",
    r"exec\(",
    r"compile\(",
    r"open\(",
    r"__\w+__",
    r"os\.",
    r"sys\.",
    r"subprocess",
    r"requests\.",
];

static FORBIDDEN: Lazy<RegexSet> = Lazy::new(|| {
    let patterns: Vec<String> = FORBIDDEN_PATTERNS.iter().map(|p| format!("(?i){p}")).collect();
    RegexSet::new(&patterns).expect("forbidden pattern set must compile")
});

/// Rejects a raw operation string that matches the denylist. Runs before any
/// other parsing stage.
///
/// # Errors
/// Returns `ShellError::ForbiddenPattern` naming the first matched pattern.
pub fn check(raw: &str) -> Result<(), ShellError> {
    if let Some(idx) = FORBIDDEN.matches(raw).iter().next() {
        log::warn!("rejected query matching forbidden pattern {}", FORBIDDEN_PATTERNS[idx]);
        return Err(ShellError::ForbiddenPattern(FORBIDDEN_PATTERNS[idx].to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_eval_case_insensitive() {
        assert!(check("users.find({\"x\": \"EVAL(1)\"})").is_err());
    }

    #[test]
    fn accepts_plain_query() {
        assert!(check("users.find({\"status\": \"active\"})").is_ok());
    }
}
