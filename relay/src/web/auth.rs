//! Webhook shared-secret verification.

use tracing::warn;

/// Check a presented X-Webhook-Token value against the configured secret.
///
/// # Arguments
///
/// * `configured` - The secret from configuration; `None` means the
///   webhook is open (the original deployment treated the token as
///   optional)
/// * `provided` - The header value presented by the caller, if any
///
/// # Returns
///
/// `true` if the request is allowed through, `false` otherwise.
pub fn verify_webhook_token(configured: Option<&str>, provided: Option<&str>) -> bool {
    let Some(expected) = configured else {
        warn!("webhook_token_not_configured");
        return true;
    };

    match provided {
        Some(token) => constant_time_compare(expected, token),
        None => false,
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_token_not_configured_allows() {
        assert!(verify_webhook_token(None, None));
        assert!(verify_webhook_token(None, Some("anything")));
    }

    #[test]
    fn test_verify_token_missing_header_rejected() {
        assert!(!verify_webhook_token(Some("secret123"), None));
    }

    #[test]
    fn test_verify_token_mismatch_rejected() {
        assert!(!verify_webhook_token(Some("secret123"), Some("secret124")));
        assert!(!verify_webhook_token(Some("secret123"), Some("secret12")));
        assert!(!verify_webhook_token(Some("secret123"), Some("")));
    }

    #[test]
    fn test_verify_token_exact_match() {
        assert!(verify_webhook_token(Some("secret123"), Some("secret123")));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "abcd"));
    }
}
