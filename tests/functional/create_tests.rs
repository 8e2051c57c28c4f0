//! Create flow tests for the shoot validator.
//!
//! Each test drives `validate_create` end to end: provider payloads are
//! decoded from the shoot, checked against the cloud profile, and finally
//! field-validated. The first failing stage decides the denial message.

use serde_json::json;

use vsphere_admission::api::decoder::ConfigDecoder;
use vsphere_admission::api::garden::CloudProfile;
use vsphere_admission::api::provider::provider_api_version;
use vsphere_admission::webhooks::ShootValidator;

use crate::common::fixtures::{
    CloudProfileBuilder, ShootBuilder, control_plane_config_payload, worker,
};
use crate::store::InMemoryProfileStore;

fn validator_with(
    profiles: Vec<CloudProfile>,
) -> ShootValidator<InMemoryProfileStore> {
    ShootValidator::new(InMemoryProfileStore::new(profiles), ConfigDecoder::new())
}

/// A validator backed by the default valid profile (`vsphere-profile`).
fn default_validator() -> ShootValidator<InMemoryProfileStore> {
    validator_with(vec![CloudProfileBuilder::default().build()])
}

// ============================================================================
// Accepted Shoots
// ============================================================================

/// The default fixture shoot passes every stage.
#[tokio::test]
async fn test_valid_shoot_is_accepted() {
    let validator = default_validator();
    let shoot = ShootBuilder::default().build();

    validator.validate_create(&shoot).await.unwrap();
}

/// A control plane zone declared for the shoot's region is accepted.
#[tokio::test]
async fn test_declared_zone_is_accepted() {
    let validator = default_validator();
    let shoot = ShootBuilder::default().zone("DC1/Cluster-B").build();

    validator.validate_create(&shoot).await.unwrap();
}

/// Worker zones are free-form pool placement hints; only the control plane
/// zone is checked against the profile.
#[tokio::test]
async fn test_worker_zones_are_not_checked_against_profile() {
    let validator = default_validator();
    let shoot = ShootBuilder::default()
        .workers(vec![worker("pool-1", 1, 3, &["DC9/Unknown"])])
        .build();

    validator.validate_create(&shoot).await.unwrap();
}

// ============================================================================
// Missing and Undecodable Provider Payloads
// ============================================================================

/// A shoot without an infrastructureConfig is denied before any profile
/// lookup happens.
#[tokio::test]
async fn test_create_without_infrastructure_config_is_rejected() {
    let validator = default_validator();
    let shoot = ShootBuilder::default().no_infrastructure_config().build();

    let err = validator.validate_create(&shoot).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "spec.provider.infrastructureConfig: Required value: \
         infrastructureConfig must be set for vSphere shoots"
    );
    assert_eq!(err.reason(), "RequiredField");
}

/// A shoot without a controlPlaneConfig is denied.
#[tokio::test]
async fn test_create_without_control_plane_config_is_rejected() {
    let validator = default_validator();
    let shoot = ShootBuilder::default().no_control_plane_config().build();

    let err = validator.validate_create(&shoot).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "spec.provider.controlPlaneConfig: Required value: \
         controlPlaneConfig must be set for vSphere shoots"
    );
}

/// A payload with a foreign apiVersion fails decoding with a message naming
/// the shoot and the offending field.
#[tokio::test]
async fn test_undecodable_control_plane_config_is_rejected() {
    let validator = default_validator();
    let shoot = ShootBuilder::new("broken-shoot")
        .control_plane_config(json!({
            "apiVersion": "openstack.provider.extensions.gardener.cloud/v1alpha1",
            "kind": "ControlPlaneConfig",
        }))
        .build();

    let err = validator.validate_create(&shoot).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "could not decode spec.provider.controlPlaneConfig of shoot \"broken-shoot\": \
         unregistered apiVersion \"openstack.provider.extensions.gardener.cloud/v1alpha1\" \
         for ControlPlaneConfig payload"
    );
    assert_eq!(err.reason(), "InvalidProviderConfig");
}

// ============================================================================
// Cloud Profile Checks
// ============================================================================

/// A control plane zone the profile does not declare for the shoot's region
/// is denied.
#[tokio::test]
async fn test_zone_not_declared_in_region_is_rejected() {
    let validator = default_validator();
    let shoot = ShootBuilder::default().zone("DC9/Nowhere").build();

    let err = validator.validate_create(&shoot).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "spec.provider.controlPlaneConfig.zone: Invalid value: \"DC9/Nowhere\": \
         not a declared zone of region \"eu-1\" in the cloud profile"
    );
    assert_eq!(err.reason(), "ValidationFailed");
}

/// A load balancer class missing from the profile's catalog is denied.
#[tokio::test]
async fn test_unknown_load_balancer_class_is_rejected() {
    let validator = default_validator();
    let mut cp = control_plane_config_payload("MEDIUM");
    cp["loadBalancerClasses"] = json!([{"name": "gold"}]);
    let shoot = ShootBuilder::default().control_plane_config(cp).build();

    let err = validator.validate_create(&shoot).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "spec.provider.controlPlaneConfig.loadBalancerClasses[0].name: \
         Invalid value: \"gold\": not a declared load balancer class in the cloud profile"
    );
}

/// A region the profile does not declare imposes no zone constraint.
#[tokio::test]
async fn test_unknown_region_imposes_no_zone_constraint() {
    let validator = default_validator();
    let shoot = ShootBuilder::default()
        .region("us-9")
        .zone("DC9/Anywhere")
        .build();

    validator.validate_create(&shoot).await.unwrap();
}

/// A missing cloud profile surfaces as the underlying NotFound API error.
#[tokio::test]
async fn test_missing_profile_is_a_kube_error() {
    let validator =
        ShootValidator::new(InMemoryProfileStore::empty(), ConfigDecoder::new());
    let shoot = ShootBuilder::default().build();

    let err = validator.validate_create(&shoot).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.reason(), "KubernetesError");
}

/// Checks against the profile run before field validation, so a bad zone
/// wins over a missing nodes CIDR.
#[tokio::test]
async fn test_profile_checks_precede_field_validation() {
    let validator = default_validator();
    let shoot = ShootBuilder::default().no_nodes().zone("DC9/Nowhere").build();

    let err = validator.validate_create(&shoot).await.unwrap_err();
    assert!(err.to_string().contains("not a declared zone"));
}

// ============================================================================
// Field Validation
// ============================================================================

/// A shoot without a nodes CIDR is denied.
#[tokio::test]
async fn test_missing_nodes_cidr_is_rejected() {
    let validator = default_validator();
    let shoot = ShootBuilder::default().no_nodes().build();

    let err = validator.validate_create(&shoot).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "spec.networking.nodes: Required value: a nodes CIDR must be provided"
    );
}

/// An NSX-T load balancer size outside the supported set is denied with the
/// supported values listed.
#[tokio::test]
async fn test_unsupported_load_balancer_size_is_rejected() {
    let validator = default_validator();
    let shoot = ShootBuilder::default()
        .control_plane_config(control_plane_config_payload("XL"))
        .build();

    let err = validator.validate_create(&shoot).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "spec.provider.controlPlaneConfig.loadBalancerSize: Unsupported value: \"XL\": \
         supported values: \"SMALL\", \"MEDIUM\", \"LARGE\""
    );
}

/// A worker pool whose minimum exceeds its maximum is denied.
#[tokio::test]
async fn test_worker_minimum_exceeding_maximum_is_rejected() {
    let validator = default_validator();
    let shoot = ShootBuilder::default()
        .workers(vec![worker("pool-1", 5, 3, &["DC1/Cluster-A"])])
        .build();

    let err = validator.validate_create(&shoot).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "spec.provider.workers[0].minimum: Invalid value: 5: \
         minimum value must not exceed maximum value"
    );
}

/// A worker pool without zones is denied.
#[tokio::test]
async fn test_worker_without_zones_is_rejected() {
    let validator = default_validator();
    let shoot = ShootBuilder::default()
        .workers(vec![worker("pool-1", 1, 3, &[])])
        .build();

    let err = validator.validate_create(&shoot).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "spec.provider.workers[0].zones: Required value: \
         at least one zone must be configured"
    );
}

/// Errors from several worker pools are aggregated into one denial.
#[tokio::test]
async fn test_multiple_worker_errors_are_aggregated() {
    let validator = default_validator();
    let shoot = ShootBuilder::default()
        .workers(vec![
            worker("", 1, 3, &["DC1/Cluster-A"]),
            worker("pool-2", -1, 3, &["DC1/Cluster-A"]),
        ])
        .build();

    let err = validator.validate_create(&shoot).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "[spec.provider.workers[0].name: Required value: worker name must not be empty, \
         spec.provider.workers[1].minimum: Invalid value: -1: \
         minimum value must not be negative]"
    );
}

/// The payload published by the provider is also what the decoder accepts;
/// guards the fixture against drifting from the registered apiVersion.
#[test]
fn test_fixture_payloads_use_provider_api_version() {
    let payload = control_plane_config_payload("SMALL");
    assert_eq!(payload["apiVersion"], json!(provider_api_version()));
}
