//! Environment variable handling.

use std::env;

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Interpret a flag value: `1`, `true`, `yes` and `on` are set.
pub fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Environment variable names read by credstash.
pub mod vars {
    /// Table name override.
    pub const CREDSTASH_TABLE: &str = "CREDSTASH_TABLE";

    /// Endpoint override for the backing table.
    pub const CREDSTASH_ENDPOINT_URL: &str = "CREDSTASH_ENDPOINT_URL";

    /// Home directory override (defaults to `~/.credstash`).
    pub const CREDSTASH_HOME: &str = "CREDSTASH_HOME";

    /// Config file override.
    pub const CREDSTASH_CONFIG: &str = "CREDSTASH_CONFIG";

    /// Emit JSON log lines when set.
    pub const CREDSTASH_LOG_JSON: &str = "CREDSTASH_LOG_JSON";

    /// Region consumed by both credstash and the AWS SDK.
    pub const AWS_REGION: &str = "AWS_REGION";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        for set in ["1", "true", "TRUE", "yes", " on "] {
            assert!(parse_bool(set), "{set:?} should be set");
        }
        for unset in ["0", "false", "no", "off", ""] {
            assert!(!parse_bool(unset), "{unset:?} should be unset");
        }
    }

    #[test]
    fn test_blank_is_unset() {
        env::set_var("CREDSTASH_TEST_BLANK", "   ");
        assert!(get_var("CREDSTASH_TEST_BLANK").is_none());
        assert!(get_var("CREDSTASH_TEST_NONEXISTENT").is_none());
    }
}
