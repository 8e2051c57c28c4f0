//! Validation of `ControlPlaneConfig`.

use std::collections::BTreeSet;

use crate::api::provider::{CloudProfileConfig, ControlPlaneConfig, LOAD_BALANCER_SIZES};

use super::{FieldError, FieldErrorList, FieldPath};

/// Validate a control plane configuration on its own.
///
/// Collects every violation: an unsupported load balancer size and several
/// broken classes all end up in the returned list.
pub fn validate_control_plane_config(
    config: &ControlPlaneConfig,
    path: &FieldPath,
) -> FieldErrorList {
    let mut errs = FieldErrorList::new();

    if let Some(size) = config.load_balancer_size.as_deref() {
        if !LOAD_BALANCER_SIZES.contains(&size) {
            errs.push(FieldError::not_supported(
                path.child("loadBalancerSize"),
                size,
                &LOAD_BALANCER_SIZES,
            ));
        }
    }

    let classes_path = path.child("loadBalancerClasses");
    let mut seen = BTreeSet::new();
    for (i, class) in config.load_balancer_classes.iter().enumerate() {
        let name_path = classes_path.index(i).child("name");
        if class.name.is_empty() {
            errs.push(FieldError::required(
                name_path,
                "load balancer class name must not be empty",
            ));
        } else if !seen.insert(class.name.as_str()) {
            errs.push(FieldError::duplicate(name_path, &class.name));
        }
    }

    errs
}

/// Validate a change to a control plane configuration.
///
/// Nothing in the control plane configuration is immutable: shoots may
/// switch load balancer classes, sizes and zones at any time.
pub fn validate_control_plane_config_update(
    _old: &ControlPlaneConfig,
    _new: &ControlPlaneConfig,
    _path: &FieldPath,
) -> FieldErrorList {
    FieldErrorList::new()
}

/// Validate a control plane configuration against the cloud profile.
///
/// The zone must be declared for the shoot's region and every selected
/// load balancer class must appear in the profile's class catalog. A
/// region the profile does not declare imposes no zone constraint, and an
/// empty catalog imposes no class constraint.
pub fn validate_control_plane_config_against_cloud_profile(
    config: &ControlPlaneConfig,
    shoot_region: &str,
    profile_config: &CloudProfileConfig,
    path: &FieldPath,
) -> FieldErrorList {
    let mut errs = FieldErrorList::new();

    if let Some(zone) = config.zone.as_deref() {
        let region = profile_config
            .regions
            .iter()
            .find(|region| region.name == shoot_region);
        if let Some(region) = region {
            if !region.zones.iter().any(|z| z.name == zone) {
                errs.push(FieldError::invalid(
                    path.child("zone"),
                    zone,
                    format!("not a declared zone of region {shoot_region:?} in the cloud profile"),
                ));
            }
        }
    }

    let declared = &profile_config.constraints.load_balancer_config.classes;
    if !declared.is_empty() {
        let classes_path = path.child("loadBalancerClasses");
        for (i, class) in config.load_balancer_classes.iter().enumerate() {
            if !declared.iter().any(|c| c.name == class.name) {
                errs.push(FieldError::invalid(
                    classes_path.index(i).child("name"),
                    &class.name,
                    "not a declared load balancer class in the cloud profile",
                ));
            }
        }
    }

    errs
}
