//! Decoded per-shoot validation state.

use kube::ResourceExt;

use crate::api::decoder::ConfigDecoder;
use crate::api::garden::Shoot;
use crate::api::provider::{ControlPlaneConfig, InfrastructureConfig};
use crate::validation::{FieldError, FieldPath};

use super::error::{Error, Result};

/// Field path of the infrastructure config payload within a shoot.
pub(crate) fn infra_config_path() -> FieldPath {
    FieldPath::new("spec")
        .child("provider")
        .child("infrastructureConfig")
}

/// Field path of the control plane config payload within a shoot.
pub(crate) fn cp_config_path() -> FieldPath {
    FieldPath::new("spec")
        .child("provider")
        .child("controlPlaneConfig")
}

/// A shoot together with its decoded provider payloads.
///
/// Building the context is the first step of every validation flow. It
/// fails fast when a mandatory payload is missing or undecodable, before
/// any field-level validation runs, and building it twice from the same
/// shoot yields the same decoded state.
#[derive(Clone, Debug)]
pub struct ValidationContext<'a> {
    pub shoot: &'a Shoot,
    pub infra_config: InfrastructureConfig,
    pub cp_config: ControlPlaneConfig,
}

impl<'a> ValidationContext<'a> {
    /// Decode both provider payloads of `shoot`. Both are mandatory.
    pub fn new(decoder: &ConfigDecoder, shoot: &'a Shoot) -> Result<Self> {
        let infra_raw = shoot
            .spec
            .provider
            .infrastructure_config
            .as_ref()
            .ok_or_else(|| {
                Error::Required(FieldError::required(
                    infra_config_path(),
                    "infrastructureConfig must be set for vSphere shoots",
                ))
            })?;
        let infra_config = decoder
            .decode::<InfrastructureConfig>(Some(infra_raw))
            .map_err(|source| Error::Decode {
                shoot: shoot.name_any(),
                path: infra_config_path(),
                source,
            })?;

        let cp_raw = shoot
            .spec
            .provider
            .control_plane_config
            .as_ref()
            .ok_or_else(|| {
                Error::Required(FieldError::required(
                    cp_config_path(),
                    "controlPlaneConfig must be set for vSphere shoots",
                ))
            })?;
        let cp_config = decoder
            .decode::<ControlPlaneConfig>(Some(cp_raw))
            .map_err(|source| Error::Decode {
                shoot: shoot.name_any(),
                path: cp_config_path(),
                source,
            })?;

        Ok(Self {
            shoot,
            infra_config,
            cp_config,
        })
    }
}
