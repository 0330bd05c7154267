use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Regex patterns used for redacting secrets before they reach log output.
/// All patterns are vetted literals that compile successfully.
pub struct PiiRegexRegistry;

impl PiiRegexRegistry {
    /// UUID pattern: matches the opaque bearer tokens this service issues.
    pub fn uuid_token() -> &'static Regex {
        static UUID_TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(
                r"\b[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}\b",
            )
            .unwrap()
        });
        &UUID_TOKEN_REGEX
    }

    /// Hex token pattern: matches bare hexadecimal tokens (≥16 chars).
    pub fn hex_token() -> &'static Regex {
        static HEX_TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Fa-f0-9]{16,}\b").unwrap()
        });
        &HEX_TOKEN_REGEX
    }
}

/// Redacts bearer tokens from a string. Raw store errors can echo SQL
/// parameters, so anything token-shaped is masked before logging.
pub fn redact(input: &str) -> String {
    let uuid_redacted = PiiRegexRegistry::uuid_token().replace_all(input, "[REDACTED_TOKEN]");
    PiiRegexRegistry::hex_token()
        .replace_all(&uuid_redacted, "[REDACTED_TOKEN]")
        .to_string()
}

/// A wrapper that automatically redacts sensitive strings when displayed.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::redact;

    #[test]
    fn uuid_tokens_are_masked() {
        let input = "duplicate key: token=8f14e45f-ceea-467f-a1d6-91b50da0fea1";
        assert_eq!(redact(input), "duplicate key: token=[REDACTED_TOKEN]");
    }

    #[test]
    fn short_values_pass_through() {
        assert_eq!(redact("room 42 not found"), "room 42 not found");
    }
}
