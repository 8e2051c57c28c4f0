//! The `extensions.gardener.cloud/v1alpha1` `Cluster` resource.
//!
//! Gardener mirrors every shoot into its seed as a cluster-scoped `Cluster`
//! object whose spec embeds raw copies of the shoot, its cloud profile and
//! its seed. Provider extensions running in the seed read those payloads
//! instead of talking back to the garden cluster.

use k8s_openapi::apimachinery::pkg::runtime::RawExtension;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Spec of the seed-side `Cluster` mirror resource.
///
/// Each payload is independently optional; a missing payload means the
/// source object was not synced, not that the cluster is invalid.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "extensions.gardener.cloud",
    version = "v1alpha1",
    kind = "Cluster",
    plural = "clusters"
)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterSpec {
    /// Raw copy of the `CloudProfile` the shoot was created against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_profile: Option<RawExtension>,
    /// Raw copy of the `Seed` the shoot is scheduled to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<RawExtension>,
    /// Raw copy of the `Shoot` itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shoot: Option<RawExtension>,
}
