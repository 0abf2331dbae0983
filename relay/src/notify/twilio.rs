//! Twilio Messages API client.
//!
//! One shared `reqwest::Client` is built at startup; each send is a single
//! form-encoded POST to the account's Messages resource with HTTP basic
//! auth. Reference: https://www.twilio.com/docs/messaging/api/message-resource

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use super::{clip, Notifier, NotifyError, SentMessage};
use crate::config::Config;

const API_BASE: &str = "https://api.twilio.com";

/// Twilio-backed notifier. Credentials and origin address are fixed at
/// construction and shared read-only across requests.
pub struct TwilioNotifier {
    client: Client,
    account_sid: String,
    auth_token: String,
    from: String,
}

/// Successful Message resource response (fields we use).
#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
    #[serde(default)]
    status: String,
}

/// Twilio error response body.
#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

impl TwilioNotifier {
    /// Build the notifier from configuration, with a bounded request timeout.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            account_sid: config.twilio_account_sid.clone(),
            auth_token: config.twilio_auth_token.clone(),
            from: config.from_whatsapp.clone(),
        })
    }
}

#[async_trait]
impl Notifier for TwilioNotifier {
    async fn send(&self, to: &str, body: &str) -> Result<SentMessage, NotifyError> {
        // Callers already truncate; clip again to hold the transport ceiling.
        let body = clip(body);

        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            API_BASE, self.account_sid
        );
        let params = [("From", self.from.as_str()), ("To", to), ("Body", body)];

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await?;

        let http_status = response.status();
        if http_status.is_success() {
            let resource: MessageResource = response.json().await?;
            info!(sid = %resource.sid, status = %resource.status, to = %to, "twilio_send_ok");
            Ok(SentMessage {
                sid: resource.sid,
                status: resource.status,
            })
        } else {
            let raw = response.text().await.unwrap_or_default();
            Err(NotifyError::Provider(provider_error_detail(
                http_status.as_u16(),
                &raw,
            )))
        }
    }
}

/// Extract the human-readable message from a Twilio error body, falling
/// back to the bare HTTP status when the body is not the expected JSON.
fn provider_error_detail(http_status: u16, raw: &str) -> String {
    match serde_json::from_str::<ApiError>(raw) {
        Ok(err) if !err.message.is_empty() => err.message,
        _ => format!("HTTP {}", http_status),
    }
}
