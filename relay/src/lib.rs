//! Alert relay - forwards TradingView webhook alerts to WhatsApp.
//!
//! This library provides the modules behind the `alert-relay` binary:
//! a thin web server that authenticates inbound alert webhooks and a
//! Twilio-backed notifier that delivers the alert text as a WhatsApp
//! message.
//!
//! ## Architecture
//!
//! ```text
//! TradingView alert → Web Server (auth + normalize) → Notifier (Twilio) → WhatsApp
//! ```
//!
//! Each request is a single linear pass with no cross-request state.

pub mod config;
pub mod notify;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use notify::{
    send_to_all, Notifier, NotifyError, SentMessage, TwilioNotifier, MAX_MESSAGE_CHARS,
};
pub use web::AppState;
