//! Error types for shoot admission validation.
//!
//! Every rejected admission request maps onto one of these variants; the
//! webhook forwards the Display text to the API server verbatim, so the
//! renderings below are part of the user-facing contract.

use thiserror::Error;

use crate::api::decoder::DecodeError;
use crate::validation::{AggregatedError, FieldError, FieldPath};

/// Error type for admission validation
#[derive(Error, Debug)]
pub enum Error {
    /// Kubernetes API error while fetching referenced resources
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    /// A mandatory provider payload is absent from the shoot
    #[error("{0}")]
    Required(FieldError),

    /// A provider payload on the shoot failed to decode
    #[error("could not decode {path} of shoot {shoot:?}: {source}")]
    Decode {
        shoot: String,
        path: FieldPath,
        #[source]
        source: DecodeError,
    },

    /// Field validation produced at least one error
    #[error(transparent)]
    Validation(#[from] AggregatedError),

    /// The referenced cloud profile carries no provider config at all
    #[error("providerConfig is not given for cloud profile {0:?}")]
    MissingProviderConfig(String),

    /// The referenced cloud profile's provider config cannot be used
    #[error("an error occurred while reading the cloud profile {name:?}: {detail}")]
    CloudProfileConfig { name: String, detail: String },
}

impl Error {
    /// Check if this error indicates a not-found condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Kube(kube::Error::Api(e)) if e.code == 404)
    }

    /// Short tag surfaced as the admission denial reason
    pub fn reason(&self) -> &'static str {
        match self {
            Error::Kube(_) => "KubernetesError",
            Error::Required(_) => "RequiredField",
            Error::Decode { .. } => "InvalidProviderConfig",
            Error::Validation(_) => "ValidationFailed",
            Error::MissingProviderConfig(_) => "CloudProfileIncomplete",
            Error::CloudProfileConfig { .. } => "CloudProfileInvalid",
        }
    }
}

/// Result type alias for admission validation
pub type Result<T> = std::result::Result<T, Error>;
