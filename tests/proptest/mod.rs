// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::string_slice
)]

//! Property-based tests for vsphere-admission.
//!
//! Uses proptest to generate random inputs and verify invariants of the
//! error aggregation, the payload decoder and the field validators.

use proptest::prelude::*;

use k8s_openapi::apimachinery::pkg::runtime::RawExtension;
use serde_json::json;

use vsphere_admission::api::decoder::ConfigDecoder;
use vsphere_admission::api::garden::Worker;
use vsphere_admission::api::provider::{
    ControlPlaneConfig, LOAD_BALANCER_SIZES, provider_api_version,
};
use vsphere_admission::validation::control_plane::validate_control_plane_config;
use vsphere_admission::validation::shoot::{validate_workers, validate_workers_update};
use vsphere_admission::validation::{FieldError, FieldErrorList, FieldPath};

/// Strategy for generating error detail strings.
fn error_detail() -> impl Strategy<Value = String> {
    "[a-z][a-z ]{0,30}"
}

/// Strategy for generating field path segments.
fn path_segments() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z][a-zA-Z0-9]{0,8}", 1..4)
}

/// Strategy for generating a supported load balancer size.
fn supported_size() -> impl Strategy<Value = &'static str> {
    prop::sample::select(LOAD_BALANCER_SIZES.to_vec())
}

/// Strategy for generating a valid worker pool.
fn arb_worker() -> impl Strategy<Value = Worker> {
    (
        "[a-z]{1,8}",
        0..=10i32,
        0..=10i32,
        prop::collection::vec("[a-z]{1,6}", 1..3),
    )
        .prop_map(|(name, minimum, headroom, zones)| Worker {
            name,
            minimum,
            maximum: minimum + headroom,
            zones,
        })
}

fn workers_path() -> FieldPath {
    FieldPath::new("spec").child("provider").child("workers")
}

fn list_of(details: &[String]) -> FieldErrorList {
    details
        .iter()
        .map(|d| FieldError::required(FieldPath::new("spec"), d.clone()))
        .collect()
}

proptest! {
    /// Property: Every rendered error starts with its field path.
    #[test]
    fn test_error_rendering_starts_with_path(
        segments in path_segments(),
        detail in error_detail()
    ) {
        let mut path = FieldPath::new("spec");
        for segment in &segments {
            path = path.child(segment);
        }
        let rendered = FieldError::required(path.clone(), detail).to_string();
        prop_assert!(rendered.starts_with(&path.to_string()));
    }

    /// Property: Aggregation never invents messages; deduplication can only
    /// shrink the list.
    #[test]
    fn test_aggregate_never_grows(details in prop::collection::vec(error_detail(), 1..8)) {
        let aggregate = list_of(&details).to_aggregate().unwrap();
        prop_assert!(aggregate.messages().len() <= details.len());
    }

    /// Property: Aggregation is deterministic for the same input list.
    #[test]
    fn test_aggregate_is_deterministic(details in prop::collection::vec(error_detail(), 1..8)) {
        let first = list_of(&details).to_aggregate().unwrap().to_string();
        let second = list_of(&details).to_aggregate().unwrap().to_string();
        prop_assert_eq!(first, second);
    }

    /// Property: A single failure renders bare, without brackets.
    #[test]
    fn test_single_error_renders_bare(detail in error_detail()) {
        let err = FieldError::required(FieldPath::new("spec"), detail);
        let mut errs = FieldErrorList::new();
        errs.push(err.clone());
        let rendered = errs.to_aggregate().unwrap().to_string();
        prop_assert_eq!(rendered.clone(), err.to_string());
        prop_assert!(!rendered.starts_with('['));
    }

    /// Property: Two distinct failures render bracketed and comma-joined.
    #[test]
    fn test_distinct_errors_render_bracketed(a in error_detail(), b in error_detail()) {
        prop_assume!(a != b);
        let mut errs = FieldErrorList::new();
        errs.push(FieldError::required(FieldPath::new("spec"), a));
        errs.push(FieldError::required(FieldPath::new("spec"), b));
        let rendered = errs.to_aggregate().unwrap().to_string();
        prop_assert!(rendered.starts_with('['));
        prop_assert!(rendered.ends_with(']'));
        prop_assert!(rendered.contains(", "));
    }

    /// Property: Decoding the same payload twice yields the same outcome.
    #[test]
    fn test_decoder_is_deterministic(size in "[A-Z]{1,8}") {
        let decoder = ConfigDecoder::new();
        let raw = RawExtension(json!({
            "apiVersion": provider_api_version(),
            "kind": "ControlPlaneConfig",
            "loadBalancerSize": size,
        }));
        let first = decoder.decode::<ControlPlaneConfig>(Some(&raw));
        let second = decoder.decode::<ControlPlaneConfig>(Some(&raw));
        prop_assert_eq!(format!("{first:?}"), format!("{second:?}"));
    }

    /// Property: Every supported load balancer size passes validation.
    #[test]
    fn test_supported_sizes_always_pass(size in supported_size()) {
        let config = ControlPlaneConfig {
            load_balancer_size: Some(size.to_string()),
            ..ControlPlaneConfig::default()
        };
        let path = FieldPath::new("spec").child("provider").child("controlPlaneConfig");
        prop_assert!(validate_control_plane_config(&config, &path).is_empty());
    }

    /// Property: Sizes outside the catalog never pass. Lowercase inputs can
    /// never collide with the all-uppercase catalog.
    #[test]
    fn test_unsupported_sizes_always_fail(size in "[a-z]{1,8}") {
        let config = ControlPlaneConfig {
            load_balancer_size: Some(size),
            ..ControlPlaneConfig::default()
        };
        let path = FieldPath::new("spec").child("provider").child("controlPlaneConfig");
        let errs = validate_control_plane_config(&config, &path);
        prop_assert_eq!(errs.len(), 1);
        prop_assert!(errs.iter().next().unwrap().to_string().contains("Unsupported value"));
    }

    /// Property: Well-formed worker pools produce no errors.
    #[test]
    fn test_valid_workers_pass(workers in prop::collection::vec(arb_worker(), 0..5)) {
        prop_assert!(validate_workers(&workers, &workers_path()).is_empty());
    }

    /// Property: Inverting the bounds of one pool is reported at exactly
    /// that pool's index.
    #[test]
    fn test_inverted_bounds_are_reported(
        mut workers in prop::collection::vec(arb_worker(), 1..5),
        pick in any::<prop::sample::Index>()
    ) {
        let i = pick.index(workers.len());
        workers[i].minimum = workers[i].maximum + 1;
        let errs = validate_workers(&workers, &workers_path());
        prop_assert_eq!(errs.len(), 1);
        let rendered = errs.iter().next().unwrap().to_string();
        let needle = format!("workers[{i}].minimum");
        prop_assert!(rendered.contains(&needle));
    }

    /// Property: Changing the zones of a kept pool is always forbidden.
    #[test]
    fn test_zone_changes_are_always_caught(
        worker in arb_worker(),
        new_zone in "[a-z]{1,6}"
    ) {
        let old_workers = vec![worker.clone()];
        let mut changed = worker;
        changed.zones = vec![new_zone];
        prop_assume!(old_workers[0].zones != changed.zones);
        let errs = validate_workers_update(&old_workers, &[changed], &workers_path());
        prop_assert_eq!(errs.len(), 1);
        prop_assert_eq!(
            errs.iter().next().unwrap().to_string(),
            "spec.provider.workers[0].zones: Forbidden: field is immutable"
        );
    }
}
