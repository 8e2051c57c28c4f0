//! vSphere provider configuration types.
//!
//! These are the typed forms of the opaque payloads embedded in shoots and
//! cloud profiles under `vsphere.provider.extensions.gardener.cloud/v1alpha1`.
//! Every field is defaulted on deserialization, matching the zero-value
//! behavior provider payloads have always had; validators are the place
//! where absence becomes an error.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::decoder::ProviderConfigKind;

/// API group of the provider configuration types.
pub const PROVIDER_GROUP: &str = "vsphere.provider.extensions.gardener.cloud";

/// Version of the provider configuration types.
pub const PROVIDER_VERSION: &str = "v1alpha1";

/// Load balancer sizes the NSX-T integration can provision.
pub const LOAD_BALANCER_SIZES: [&str; 3] = ["SMALL", "MEDIUM", "LARGE"];

/// `apiVersion` string provider payloads carry on the wire.
pub fn provider_api_version() -> String {
    format!("{PROVIDER_GROUP}/{PROVIDER_VERSION}")
}

/// Infrastructure configuration embedded in a shoot's provider section.
///
/// The NSX-T infrastructure layout is derived server-side; the only knob a
/// shoot owner has is pinning the layout version, so no field here carries
/// admission-time constraints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct InfrastructureConfig {
    /// Pin the NSX-T infrastructure layout to an explicit version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overwrite_nsxt_infra_version: Option<String>,
}

impl ProviderConfigKind for InfrastructureConfig {
    const KIND: &'static str = "InfrastructureConfig";
}

/// Control plane configuration embedded in a shoot's provider section.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ControlPlaneConfig {
    /// Settings for the cloud-controller-manager deployment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_controller_manager: Option<CloudControllerManagerConfig>,
    /// Load balancer classes the shoot wants to use. Each must be declared
    /// in the cloud profile.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub load_balancer_classes: Vec<ControlPlaneLoadBalancerClass>,
    /// Requested NSX-T load balancer size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_balancer_size: Option<String>,
    /// Zone the control plane should be placed in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
}

impl ProviderConfigKind for ControlPlaneConfig {
    const KIND: &'static str = "ControlPlaneConfig";
}

/// cloud-controller-manager settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CloudControllerManagerConfig {
    /// Feature gates passed to the cloud-controller-manager.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub feature_gates: BTreeMap<String, bool>,
}

/// A load balancer class selected by a shoot's control plane.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ControlPlaneLoadBalancerClass {
    /// Name of the class as declared in the cloud profile.
    pub name: String,
    /// IP pool overriding the class default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_pool_name: Option<String>,
}

/// Provider configuration embedded in a cloud profile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CloudProfileConfig {
    /// Prefix for all NSX-T objects created for shoots of this profile.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name_prefix: String,
    /// Storage policy backing the default storage class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_class_storage_policy_name: Option<String>,
    /// Regions offered by this profile, with their zones.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<RegionSpec>,
    /// Provider constraints shoots must stay within.
    pub constraints: Constraints,
    /// DNS servers handed to shoot nodes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dns_servers: Vec<String>,
}

impl ProviderConfigKind for CloudProfileConfig {
    const KIND: &'static str = "CloudProfileConfig";
}

/// A region offered by the cloud profile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct RegionSpec {
    /// Region name as referenced by shoots.
    pub name: String,
    /// Zones available in the region.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub zones: Vec<ZoneSpec>,
}

/// A zone within a region.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ZoneSpec {
    /// Zone name as referenced by shoots.
    pub name: String,
    /// Datastore to place machines on, overriding the region default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datastore: Option<String>,
}

/// Constraint section of the profile configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct Constraints {
    /// Load balancer constraints.
    pub load_balancer_config: LoadBalancerConfig,
}

/// Load balancer constraints declared by the profile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct LoadBalancerConfig {
    /// Default NSX-T load balancer size.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub size: String,
    /// Catalog of load balancer classes shoots may select.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<LoadBalancerClass>,
}

/// A load balancer class declared by the profile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct LoadBalancerClass {
    /// Class name shoots reference.
    pub name: String,
    /// IP pool the class allocates from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_pool_name: Option<String>,
}

/// Infrastructure state written by the provider controller, embedded in the
/// `infrastructureProviderStatus` of a shoot's control plane.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct InfrastructureStatus {
    /// NSX-T objects created for the shoot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nsxt_infra_state: Option<NsxtInfraState>,
    /// Set once infrastructure creation has begun, to make partial
    /// creations detectable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_started: Option<bool>,
}

impl ProviderConfigKind for InfrastructureStatus {
    const KIND: &'static str = "InfrastructureStatus";
}

/// NSX-T objects backing a shoot's network.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct NsxtInfraState {
    /// Layout version the objects were created with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Path of the tier-1 gateway.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier1_gateway_ref: Option<String>,
    /// Name of the logical segment carrying the node network.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_name: Option<String>,
    /// Address of the DHCP server on the segment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_server_address: Option<String>,
}
