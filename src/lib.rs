//! vsphere-admission library crate
//!
//! This module exports the Gardener resource views, provider config decoding
//! and validation, and the admission webhook server.

pub mod api;
pub mod cluster;
pub mod health;
pub mod validation;
pub mod webhooks;

pub use health::HealthState;
pub use webhooks::{
    WEBHOOK_CERT_PATH, WEBHOOK_KEY_PATH, WEBHOOK_PORT, WebhookError, run_webhook_server,
};
