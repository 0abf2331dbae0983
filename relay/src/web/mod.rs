//! Web server module for the inbound alert surface.
//!
//! This module provides a thin web server that:
//! - Receives alert webhooks from TradingView
//! - Verifies the shared-secret token
//! - Normalizes the body into a single alert text
//! - Forwards the text to the notifier and reports the outcome
//!
//! Every failure path ends in a structured JSON response.

pub mod auth;
pub mod handlers;

pub use auth::verify_webhook_token;
pub use handlers::{router, AppState, StatusResponse, WebhookResponse};
