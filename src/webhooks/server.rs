//! Admission webhook server.
//!
//! Serves the validating admission endpoint for Gardener shoots.
//!
//! To register the webhook:
//! 1. Provision a TLS serving certificate for the webhook service
//! 2. Create a ValidatingWebhookConfiguration pointing at /validate-shoot
//! 3. Mount the certificate secret to the webhook pod at /etc/webhook/certs/
//!
//! The webhook server starts automatically when certificates are present.

use std::sync::Arc;
use std::time::Instant;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use kube::Client;
use kube::Resource;
use kube::core::DynamicObject;
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
use tracing::{debug, error, info, warn};

use crate::api::decoder::ConfigDecoder;
use crate::api::garden::Shoot;
use crate::health::HealthState;
use crate::webhooks::shoot::{CloudProfileStore, KubeProfileStore, ShootValidator};

/// Default path to webhook TLS certificate
pub const WEBHOOK_CERT_PATH: &str = "/etc/webhook/certs/tls.crt";
/// Default path to webhook TLS private key
pub const WEBHOOK_KEY_PATH: &str = "/etc/webhook/certs/tls.key";
/// Default webhook server port
pub const WEBHOOK_PORT: u16 = 9443;

/// Shared state for webhook handlers
pub struct WebhookState<S> {
    pub validator: ShootValidator<S>,
    pub health: Option<Arc<HealthState>>,
}

impl<S: CloudProfileStore> WebhookState<S> {
    pub fn new(validator: ShootValidator<S>, health: Option<Arc<HealthState>>) -> Self {
        Self { validator, health }
    }
}

/// Create a denial response with reason embedded in message.
/// kube-rs deny() only sets status.message, so we format as "[reason] message"
fn deny_with_reason<T: Resource<DynamicType = ()>>(
    request: &AdmissionRequest<T>,
    message: &str,
    reason: &str,
) -> AdmissionReview<DynamicObject> {
    let full_message = format!("[{}] {}", reason, message);
    AdmissionResponse::from(request)
        .deny(full_message)
        .into_review()
}

fn operation_label(operation: &Operation) -> &'static str {
    match operation {
        Operation::Create => "CREATE",
        Operation::Update => "UPDATE",
        Operation::Delete => "DELETE",
        Operation::Connect => "CONNECT",
    }
}

/// Create the webhook router
pub fn create_webhook_router<S: CloudProfileStore + 'static>(
    state: Arc<WebhookState<S>>,
) -> Router {
    Router::new()
        .route("/validate-shoot", post(validate_shoot::<S>))
        .with_state(state)
}

/// Validate a Shoot admission webhook handler
async fn validate_shoot<S: CloudProfileStore + 'static>(
    State(state): State<Arc<WebhookState<S>>>,
    Json(review): Json<AdmissionReview<Shoot>>,
) -> impl IntoResponse {
    let request: AdmissionRequest<Shoot> = match review.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(error = %e, "Failed to extract admission request");
            return (
                StatusCode::BAD_REQUEST,
                Json(
                    AdmissionResponse::invalid(format!("Invalid AdmissionReview: {}", e))
                        .into_review(),
                ),
            );
        }
    };

    (StatusCode::OK, Json(handle_admission(&state, request).await))
}

/// Decide a single admission request.
async fn handle_admission<S: CloudProfileStore>(
    state: &WebhookState<S>,
    request: AdmissionRequest<Shoot>,
) -> AdmissionReview<DynamicObject> {
    let started = Instant::now();
    let uid = &request.uid;
    debug!(
        uid = %uid,
        operation = ?request.operation,
        namespace = ?request.namespace,
        name = ?request.name,
        "Processing admission request"
    );

    // DELETE and CONNECT carry no provider config to validate
    if matches!(request.operation, Operation::Delete | Operation::Connect) {
        info!(uid = %uid, operation = ?request.operation, "Admission request allowed");
        record_admission(state, &request.operation, started, None);
        return AdmissionResponse::from(&request).into_review();
    }

    let Some(shoot) = request.object.as_ref() else {
        warn!(uid = %uid, "Missing object in request");
        record_admission(state, &request.operation, started, Some("InvalidRequest"));
        return deny_with_reason(&request, "Missing object in request", "InvalidRequest");
    };

    let result = if request.operation == Operation::Update {
        match request.old_object.as_ref() {
            Some(old_shoot) => state.validator.validate_update(old_shoot, shoot).await,
            None => {
                warn!(uid = %uid, "Missing old object in update request");
                record_admission(state, &request.operation, started, Some("InvalidRequest"));
                return deny_with_reason(
                    &request,
                    "Missing old object in update request",
                    "InvalidRequest",
                );
            }
        }
    } else {
        state.validator.validate_create(shoot).await
    };

    match result {
        Ok(()) => {
            info!(uid = %uid, "Admission request allowed");
            record_admission(state, &request.operation, started, None);
            AdmissionResponse::from(&request).into_review()
        }
        Err(e) => {
            let reason = e.reason();
            let message = e.to_string();
            warn!(uid = %uid, reason = %reason, message = %message, "Admission request denied");
            record_admission(state, &request.operation, started, Some(reason));
            deny_with_reason(&request, &message, reason)
        }
    }
}

fn record_admission<S>(
    state: &WebhookState<S>,
    operation: &Operation,
    started: Instant,
    denial: Option<&str>,
) {
    if let Some(health) = &state.health {
        health.metrics.record_admission(
            operation_label(operation),
            started.elapsed().as_secs_f64(),
        );
        if let Some(reason) = denial {
            health.metrics.record_denial(reason);
        }
    }
}

/// Errors that can occur when running the webhook server
#[derive(Debug)]
pub enum WebhookError {
    /// TLS configuration error
    TlsConfig(String),
    /// Server error
    Server(String),
}

impl std::fmt::Display for WebhookError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WebhookError::TlsConfig(msg) => write!(f, "TLS configuration error: {}", msg),
            WebhookError::Server(msg) => write!(f, "Webhook server error: {}", msg),
        }
    }
}

impl std::error::Error for WebhookError {}

/// Run the webhook server with TLS
///
/// Binds to 0.0.0.0:9443 and serves the /validate-shoot endpoint.
/// TLS certificates are loaded from the paths specified.
///
/// # Arguments
/// * `client` - Kubernetes client
/// * `health` - Health state for admission metrics, if running
/// * `cert_path` - Path to TLS certificate file (PEM format)
/// * `key_path` - Path to TLS private key file (PEM format)
pub async fn run_webhook_server(
    client: Client,
    health: Option<Arc<HealthState>>,
    cert_path: &str,
    key_path: &str,
) -> Result<(), WebhookError> {
    use axum_server::tls_rustls::RustlsConfig;
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let validator = ShootValidator::new(KubeProfileStore::new(client), ConfigDecoder::new());
    let state = Arc::new(WebhookState::new(validator, health));
    let app = create_webhook_router(state);

    let config = RustlsConfig::from_pem_file(PathBuf::from(cert_path), PathBuf::from(key_path))
        .await
        .map_err(|e| WebhookError::TlsConfig(e.to_string()))?;

    let addr = SocketAddr::from(([0, 0, 0, 0], WEBHOOK_PORT));
    info!(port = WEBHOOK_PORT, "Webhook server listening with TLS");

    axum_server::bind_rustls(addr, config)
        .serve(app.into_make_service())
        .await
        .map_err(|e| WebhookError::Server(e.to_string()))?;

    Ok(())
}
