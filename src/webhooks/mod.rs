//! Webhook module for validating admission requests.
//!
//! Provides the ValidatingAdmissionWebhook guarding shoots of the vSphere
//! provider: provider payloads are decoded and field-validated, and on
//! CREATE additionally checked against the referenced cloud profile. The
//! first failure denies the request with a reason tag and a field-qualified
//! message.

mod context;
mod error;
mod server;
mod shoot;

pub use context::ValidationContext;
pub use error::{Error, Result};
pub use server::{
    WEBHOOK_CERT_PATH, WEBHOOK_KEY_PATH, WEBHOOK_PORT, WebhookError, WebhookState,
    create_webhook_router, run_webhook_server,
};
pub use shoot::{CloudProfileStore, KubeProfileStore, ShootValidator};

// Re-export kube-rs admission types for contract testing
pub use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
