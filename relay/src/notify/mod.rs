//! Outbound notification delivery.
//!
//! The `Notifier` trait is the seam between the web handlers and the
//! messaging provider: handlers hold an `Arc<dyn Notifier>`, so tests can
//! substitute a recording double and the Twilio client stays confined to
//! [`twilio`].

pub mod twilio;

use async_trait::async_trait;
use tracing::error;

pub use twilio::TwilioNotifier;

/// Hard per-message size ceiling imposed by the transport.
pub const MAX_MESSAGE_CHARS: usize = 1600;

/// A successfully delivered message.
#[derive(Debug, Clone)]
pub struct SentMessage {
    /// Provider-assigned message identifier
    pub sid: String,
    /// Provider-reported delivery status (e.g. "queued")
    pub status: String,
}

/// Failure to deliver a message.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The provider rejected the send; carries its error description.
    #[error("{0}")]
    Provider(String),

    /// The request never completed (connection failure, timeout).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// A single-attempt message sender. No retries, no backoff.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Attempt one send of `body` to `to`, reporting the provider's
    /// message identifier on success.
    async fn send(&self, to: &str, body: &str) -> Result<SentMessage, NotifyError>;
}

/// Clip a message to the first [`MAX_MESSAGE_CHARS`] characters.
///
/// Character-based, so a multi-byte character is never split.
pub fn clip(text: &str) -> &str {
    match text.char_indices().nth(MAX_MESSAGE_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Send `body` to every configured destination, one attempt each, in
/// configuration order.
///
/// Policy: fails fast on the first failing destination and surfaces that
/// provider error unchanged; when every destination succeeds, the returned
/// `SentMessage` is the first destination's.
pub async fn send_to_all(
    notifier: &dyn Notifier,
    destinations: &[String],
    body: &str,
) -> Result<SentMessage, NotifyError> {
    let mut first: Option<SentMessage> = None;
    for to in destinations {
        match notifier.send(to, body).await {
            Ok(sent) => {
                if first.is_none() {
                    first = Some(sent);
                }
            }
            Err(e) => {
                error!(to = %to, error = %e, "send_failed");
                return Err(e);
            }
        }
    }
    first.ok_or_else(|| NotifyError::Provider("no destinations configured".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Test double: records every call and fails on one chosen destination.
    struct ScriptedNotifier {
        calls: Mutex<Vec<(String, String)>>,
        fail_on: Option<String>,
    }

    impl ScriptedNotifier {
        fn new(fail_on: Option<&str>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on: fail_on.map(str::to_string),
            }
        }
    }

    #[async_trait]
    impl Notifier for ScriptedNotifier {
        async fn send(&self, to: &str, body: &str) -> Result<SentMessage, NotifyError> {
            self.calls
                .lock()
                .unwrap()
                .push((to.to_string(), body.to_string()));
            if self.fail_on.as_deref() == Some(to) {
                return Err(NotifyError::Provider("invalid number".to_string()));
            }
            Ok(SentMessage {
                sid: format!("SM-{}", to),
                status: "queued".to_string(),
            })
        }
    }

    fn destinations(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_send_to_all_returns_first_sid() {
        let notifier = ScriptedNotifier::new(None);
        let dests = destinations(&["whatsapp:+1", "whatsapp:+2"]);

        let sent = send_to_all(&notifier, &dests, "alert").await.unwrap();

        assert_eq!(sent.sid, "SM-whatsapp:+1");
        assert_eq!(notifier.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_send_to_all_fails_fast_on_first_error() {
        let notifier = ScriptedNotifier::new(Some("whatsapp:+2"));
        let dests = destinations(&["whatsapp:+1", "whatsapp:+2", "whatsapp:+3"]);

        let err = send_to_all(&notifier, &dests, "alert").await.unwrap_err();

        assert_eq!(err.to_string(), "invalid number");
        // the third destination was never attempted
        assert_eq!(notifier.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_send_to_all_empty_destinations() {
        let notifier = ScriptedNotifier::new(None);

        let err = send_to_all(&notifier, &[], "alert").await.unwrap_err();

        assert_eq!(err.to_string(), "no destinations configured");
    }

    #[test]
    fn test_clip_short_message_untouched() {
        assert_eq!(clip("hello"), "hello");
    }

    #[test]
    fn test_clip_at_ceiling() {
        let msg = "a".repeat(MAX_MESSAGE_CHARS);
        assert_eq!(clip(&msg).chars().count(), MAX_MESSAGE_CHARS);
        let msg = "a".repeat(MAX_MESSAGE_CHARS + 1);
        assert_eq!(clip(&msg).chars().count(), MAX_MESSAGE_CHARS);
    }

    #[test]
    fn test_clip_counts_characters_not_bytes() {
        // 3 bytes per char; clipping must not split a character
        let msg = "€".repeat(MAX_MESSAGE_CHARS + 10);
        let clipped = clip(&msg);
        assert_eq!(clipped.chars().count(), MAX_MESSAGE_CHARS);
        assert!(clipped.is_char_boundary(clipped.len()));
    }
}
