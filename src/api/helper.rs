//! Accessors reading provider configs out of a decoded cluster.
//!
//! Provider controllers running in the seed see shoots only through the
//! mirrored `Cluster` resource. These helpers pull the typed provider
//! configuration out of such a cluster, preserving the long-standing
//! absent-payload semantics: shoot-side configs fall back to their zero
//! value, the profile config and the infrastructure status to `None`.

use k8s_openapi::apimachinery::pkg::runtime::RawExtension;
use thiserror::Error;

use crate::cluster::Cluster;
use crate::validation::FieldPath;
use crate::validation::cloud_profile::validate_cloud_profile_config;

use super::decoder::{ConfigDecoder, DecodeError};
use super::provider::{
    CloudProfileConfig, ControlPlaneConfig, InfrastructureConfig, InfrastructureStatus,
};
use crate::validation::AggregatedError;

/// Failures reading a provider config out of a cluster.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The profile payload could not be decoded.
    #[error("cloud profile {name}: {source}")]
    CloudProfileDecode {
        /// Name of the cloud profile.
        name: String,
        /// Underlying decode failure.
        #[source]
        source: DecodeError,
    },

    /// The profile payload decoded but failed structural validation.
    #[error("validation of providerConfig of cloud profile {name} failed: {source}")]
    CloudProfileInvalid {
        /// Name of the cloud profile.
        name: String,
        /// Aggregated field violations.
        #[source]
        source: AggregatedError,
    },

    /// The shoot's control plane payload could not be decoded.
    #[error("could not decode providerConfig of controlplane '{name}': {source}")]
    ControlPlaneDecode {
        /// Name of the shoot.
        name: String,
        /// Underlying decode failure.
        #[source]
        source: DecodeError,
    },

    /// An infrastructure status payload could not be decoded.
    #[error("could not decode infrastructureProviderStatus of controlplane '{name}': {source}")]
    InfrastructureStatusDecode {
        /// Name of the shoot.
        name: String,
        /// Underlying decode failure.
        #[source]
        source: DecodeError,
    },

    /// The shoot's infrastructure payload could not be decoded.
    #[error(transparent)]
    InfrastructureDecode(#[from] DecodeError),
}

/// Read and validate the profile config embedded in the cluster.
///
/// Returns `None` when the cluster carries no profile or the profile has no
/// `providerConfig`. A present payload must decode and pass structural
/// validation; both failures name the profile.
pub fn get_cloud_profile_config(
    decoder: &ConfigDecoder,
    cluster: &Cluster,
) -> Result<Option<CloudProfileConfig>, ConfigError> {
    let Some(profile) = &cluster.cloud_profile else {
        return Ok(None);
    };
    let raw = match &profile.spec.provider_config {
        None => return Ok(None),
        Some(raw) if raw.0.is_null() => return Ok(None),
        Some(raw) => raw,
    };
    let name = profile.metadata.name.clone().unwrap_or_default();

    let config: CloudProfileConfig = decoder
        .decode(Some(raw))
        .map_err(|source| ConfigError::CloudProfileDecode {
            name: name.clone(),
            source,
        })?;

    let path = FieldPath::new("cloudprofile").child("spec").child("providerConfig");
    if let Some(source) = validate_cloud_profile_config(&config, &path).to_aggregate() {
        return Err(ConfigError::CloudProfileInvalid { name, source });
    }

    Ok(Some(config))
}

/// Read the control plane config of the cluster's shoot.
///
/// An absent payload, like an absent shoot, yields the zero-value config.
pub fn get_control_plane_config(
    decoder: &ConfigDecoder,
    cluster: &Cluster,
) -> Result<ControlPlaneConfig, ConfigError> {
    let Some(shoot) = &cluster.shoot else {
        return Ok(ControlPlaneConfig::default());
    };
    decoder
        .decode(shoot.spec.provider.control_plane_config.as_ref())
        .map_err(|source| ConfigError::ControlPlaneDecode {
            name: shoot.metadata.name.clone().unwrap_or_default(),
            source,
        })
}

/// Read the infrastructure config of the cluster's shoot.
///
/// An absent payload, like an absent shoot, yields the zero-value config.
pub fn get_infrastructure_config(
    decoder: &ConfigDecoder,
    cluster: &Cluster,
) -> Result<InfrastructureConfig, ConfigError> {
    let Some(shoot) = &cluster.shoot else {
        return Ok(InfrastructureConfig::default());
    };
    Ok(decoder.decode(shoot.spec.provider.infrastructure_config.as_ref())?)
}

/// Decode an `infrastructureProviderStatus` payload.
///
/// `name` identifies the owning control plane in error messages. An absent
/// payload is not an error; it simply means the infrastructure controller
/// has not written a status yet.
pub fn get_infrastructure_status(
    decoder: &ConfigDecoder,
    name: &str,
    raw: Option<&RawExtension>,
) -> Result<Option<InfrastructureStatus>, ConfigError> {
    let raw = match raw {
        None => return Ok(None),
        Some(raw) if raw.0.is_null() => return Ok(None),
        Some(raw) => raw,
    };
    decoder
        .decode(Some(raw))
        .map(Some)
        .map_err(|source| ConfigError::InfrastructureStatusDecode {
            name: name.to_string(),
            source,
        })
}
