//! Core Gardener resource shapes consumed by the admission webhook.
//!
//! These are views of `core.gardener.cloud/v1beta1` resources owned by the
//! Gardener API server, modelled only down to the fields this component
//! reads. Unknown fields are ignored on deserialization, so garden clusters
//! running richer versions of these types remain compatible.

use k8s_openapi::apimachinery::pkg::runtime::RawExtension;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A Gardener shoot cluster.
///
/// The provider section carries two opaque payloads
/// (`infrastructureConfig`, `controlPlaneConfig`) that are decoded and
/// validated by this webhook before the shoot is admitted.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "core.gardener.cloud",
    version = "v1beta1",
    kind = "Shoot",
    plural = "shoots",
    namespaced
)]
#[serde(default, rename_all = "camelCase")]
pub struct ShootSpec {
    /// Name of the cloud profile the shoot is created against.
    pub cloud_profile_name: String,
    /// Target region of the shoot.
    pub region: String,
    /// Seed cluster the shoot is scheduled to, once assigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_name: Option<String>,
    /// Cluster networking configuration.
    pub networking: Networking,
    /// Provider type and provider-specific configuration.
    pub provider: Provider,
}

/// CIDR configuration of a shoot's networks.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct Networking {
    /// CIDR of the node network. Required for vSphere shoots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<String>,
    /// CIDR of the pod network.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pods: Option<String>,
    /// CIDR of the service network.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<String>,
}

/// Provider section of a shoot spec.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct Provider {
    /// Provider type, `vsphere` for shoots handled here.
    pub r#type: String,
    /// Opaque provider infrastructure configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub infrastructure_config: Option<RawExtension>,
    /// Opaque provider control plane configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_plane_config: Option<RawExtension>,
    /// Worker pools of the shoot.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub workers: Vec<Worker>,
}

/// A single worker pool.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct Worker {
    /// Pool name, unique within the shoot.
    pub name: String,
    /// Minimum number of machines.
    pub minimum: i32,
    /// Maximum number of machines.
    pub maximum: i32,
    /// Availability zones the pool spans. Immutable after creation.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub zones: Vec<String>,
}

/// A Gardener cloud profile, the per-provider catalog of offered regions,
/// machine types and provider constraints. Cluster-scoped.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "core.gardener.cloud",
    version = "v1beta1",
    kind = "CloudProfile",
    plural = "cloudprofiles"
)]
#[serde(default, rename_all = "camelCase")]
pub struct CloudProfileSpec {
    /// Provider type the profile describes.
    pub r#type: String,
    /// Opaque provider-specific profile configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_config: Option<RawExtension>,
}

/// A Gardener seed cluster. Cluster-scoped; only the provider section is
/// read here, when mirroring shoots into their seed.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "core.gardener.cloud",
    version = "v1beta1",
    kind = "Seed",
    plural = "seeds"
)]
#[serde(default, rename_all = "camelCase")]
pub struct SeedSpec {
    /// Provider type and location of the seed.
    pub provider: SeedProvider,
}

/// Provider section of a seed spec.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct SeedProvider {
    /// Provider type of the seed infrastructure.
    pub r#type: String,
    /// Region the seed runs in.
    pub region: String,
}
