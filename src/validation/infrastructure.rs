//! Validation of `InfrastructureConfig`.

use crate::api::provider::{CloudProfileConfig, InfrastructureConfig};

use super::{FieldErrorList, FieldPath};

/// Validate an infrastructure configuration.
///
/// The NSX-T infrastructure layout is derived server-side and the only
/// shoot-owner knob is a version pin, so no constraints are enforced. The
/// function exists so the admission flow treats infrastructure like every
/// other config and picks up constraints the moment one is added.
pub fn validate_infrastructure_config(
    _config: &InfrastructureConfig,
    _nodes_cidr: Option<&str>,
    _path: &FieldPath,
) -> FieldErrorList {
    FieldErrorList::new()
}

/// Validate a change to an infrastructure configuration.
///
/// No field is immutable; see [`validate_infrastructure_config`].
pub fn validate_infrastructure_config_update(
    _old: &InfrastructureConfig,
    _new: &InfrastructureConfig,
    _path: &FieldPath,
) -> FieldErrorList {
    FieldErrorList::new()
}

/// Validate an infrastructure configuration against the cloud profile.
///
/// No cross-profile constraints exist for infrastructure; see
/// [`validate_infrastructure_config`].
pub fn validate_infrastructure_config_against_cloud_profile(
    _config: &InfrastructureConfig,
    _shoot_region: &str,
    _profile_config: &CloudProfileConfig,
    _path: &FieldPath,
) -> FieldErrorList {
    FieldErrorList::new()
}
