//! Configuration module for environment variable parsing.
//!
//! All configuration is read once at startup; the resulting `Config` is
//! immutable and shared across requests.

use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Twilio account SID used to authenticate to the Messages API
    pub twilio_account_sid: String,

    /// Twilio auth token paired with the account SID
    pub twilio_auth_token: String,

    /// Origin address registered with Twilio (sandbox sender by default)
    pub from_whatsapp: String,

    /// Destination addresses, parsed from a comma-separated list
    pub to_whatsapp: Vec<String>,

    /// Shared secret expected in the X-Webhook-Token header.
    /// When unset the webhook accepts all callers.
    pub webhook_token: Option<String>,

    /// Port for the web server to listen on
    pub port: u16,

    /// HTTP request timeout in milliseconds for outbound sends
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            twilio_account_sid: env::var("TWILIO_ACCOUNT_SID").unwrap_or_default(),

            twilio_auth_token: env::var("TWILIO_AUTH_TOKEN").unwrap_or_default(),

            from_whatsapp: env::var("FROM_WHATSAPP")
                .unwrap_or_else(|_| "whatsapp:+14155238886".to_string()),

            to_whatsapp: parse_csv("TO_WHATSAPP")
                .unwrap_or_else(|| vec!["whatsapp:+910000000000".to_string()]),

            webhook_token: env::var("WEBHOOK_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            request_timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
        }
    }
}

/// Parse a comma-separated list of strings.
fn parse_csv(name: &str) -> Option<Vec<String>> {
    env::var(name).ok().map(|raw| {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_single() {
        env::set_var("RELAY_TEST_CSV_SINGLE", "whatsapp:+15550001111");
        let result = parse_csv("RELAY_TEST_CSV_SINGLE");
        assert_eq!(result, Some(vec!["whatsapp:+15550001111".to_string()]));
        env::remove_var("RELAY_TEST_CSV_SINGLE");
    }

    #[test]
    fn test_parse_csv_multiple_with_spaces() {
        env::set_var(
            "RELAY_TEST_CSV_MULTI",
            "whatsapp:+15550001111, whatsapp:+15550002222 ,",
        );
        let result = parse_csv("RELAY_TEST_CSV_MULTI");
        assert_eq!(
            result,
            Some(vec![
                "whatsapp:+15550001111".to_string(),
                "whatsapp:+15550002222".to_string(),
            ])
        );
        env::remove_var("RELAY_TEST_CSV_MULTI");
    }

    #[test]
    fn test_parse_csv_unset() {
        assert_eq!(parse_csv("RELAY_TEST_CSV_NONEXISTENT"), None);
    }
}
