//! Assembly and syncing of the seed-side `Cluster` mirror resource.
//!
//! The garden cluster owns `Shoot`, `CloudProfile` and `Seed`; the seed only
//! sees raw copies embedded in an `extensions.gardener.cloud` `Cluster`.
//! This module decodes those copies back into typed objects and mirrors
//! garden objects into the seed.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::runtime::RawExtension;
use kube::api::{Patch, PatchParams, PostParams};
use kube::{Api, Client, Resource};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::api::extensions::{Cluster as ClusterResource, ClusterSpec};
use crate::api::garden::{CloudProfile, Seed, Shoot};

/// Field manager used for writes to the seed.
pub const FIELD_MANAGER: &str = "vsphere-admission";

/// Failures while reading or writing the `Cluster` mirror resource.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// Kubernetes API error.
    #[error(transparent)]
    Kube(#[from] kube::Error),

    /// An embedded payload does not decode into its garden type.
    #[error("cannot decode {kind} payload of cluster {cluster:?}: {detail}")]
    Decode {
        /// Name of the `Cluster` resource.
        cluster: String,
        /// Garden kind the payload was expected to hold.
        kind: String,
        /// What went wrong.
        detail: String,
    },

    /// A garden object could not be serialized for embedding.
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

/// A shoot cluster as seen from the seed, with embedded payloads decoded.
///
/// Payloads are independently optional: an absent payload means the source
/// object was never synced, not that the cluster is broken.
#[derive(Clone, Debug, Default)]
pub struct Cluster {
    /// Metadata of the `Cluster` mirror resource.
    pub metadata: ObjectMeta,
    /// Decoded cloud profile, when synced.
    pub cloud_profile: Option<CloudProfile>,
    /// Decoded seed, when synced.
    pub seed: Option<Seed>,
    /// Decoded shoot, when synced.
    pub shoot: Option<Shoot>,
}

/// Fetch the named `Cluster` resource and decode its embedded payloads.
pub async fn get_cluster(client: Client, name: &str) -> Result<Cluster, ClusterError> {
    let api: Api<ClusterResource> = Api::all(client);
    let resource = api.get(name).await?;
    decode_cluster(resource)
}

/// Fetch the named `Cluster` resource and decode only its embedded shoot.
pub async fn get_shoot(client: Client, name: &str) -> Result<Option<Shoot>, ClusterError> {
    let api: Api<ClusterResource> = Api::all(client);
    let resource = api.get(name).await?;
    shoot_from_cluster(&resource)
}

/// Decode the cloud profile embedded in a cluster resource.
pub fn cloud_profile_from_cluster(
    cluster: &ClusterResource,
) -> Result<Option<CloudProfile>, ClusterError> {
    decode_payload(cluster, cluster.spec.cloud_profile.as_ref())
}

/// Decode the seed embedded in a cluster resource.
pub fn seed_from_cluster(cluster: &ClusterResource) -> Result<Option<Seed>, ClusterError> {
    decode_payload(cluster, cluster.spec.seed.as_ref())
}

/// Decode the shoot embedded in a cluster resource.
pub fn shoot_from_cluster(cluster: &ClusterResource) -> Result<Option<Shoot>, ClusterError> {
    decode_payload(cluster, cluster.spec.shoot.as_ref())
}

/// Mirror garden objects into the seed's `Cluster` resource.
///
/// Returns without writing while the shoot has no seed assigned. Only the
/// payloads whose source object is given are written; a sync that omits an
/// object leaves that payload untouched. Embedded copies carry their
/// apiVersion/kind and no `managedFields`.
pub async fn sync_cluster_resource_to_seed(
    client: Client,
    name: &str,
    shoot: &Shoot,
    cloud_profile: Option<&CloudProfile>,
    seed: Option<&Seed>,
) -> Result<(), ClusterError> {
    let Some(spec) = build_cluster_spec(shoot, cloud_profile, seed)? else {
        debug!(cluster = %name, "shoot has no seed assigned, skipping cluster sync");
        return Ok(());
    };

    let api: Api<ClusterResource> = Api::all(client);
    let patch = serde_json::json!({ "spec": &spec });
    match api
        .patch(name, &PatchParams::apply(FIELD_MANAGER), &Patch::Merge(&patch))
        .await
    {
        Ok(_) => Ok(()),
        Err(err) if is_not_found(&err) => {
            let cluster = ClusterResource {
                metadata: ObjectMeta {
                    name: Some(name.to_string()),
                    ..ObjectMeta::default()
                },
                spec,
            };
            api.create(&PostParams::default(), &cluster).await?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

/// Build the spec fragment to write, or `None` for seedless shoots.
fn build_cluster_spec(
    shoot: &Shoot,
    cloud_profile: Option<&CloudProfile>,
    seed: Option<&Seed>,
) -> Result<Option<ClusterSpec>, ClusterError> {
    if shoot.spec.seed_name.is_none() {
        return Ok(None);
    }
    Ok(Some(ClusterSpec {
        cloud_profile: cloud_profile.map(embed).transpose()?,
        seed: seed.map(embed).transpose()?,
        shoot: Some(embed(shoot)?),
    }))
}

/// Serialize a garden object for embedding.
///
/// The derived serializer writes apiVersion and kind; `managedFields` is
/// stripped because it describes garden-side ownership that means nothing
/// in the seed.
fn embed<T>(object: &T) -> Result<RawExtension, ClusterError>
where
    T: Resource<DynamicType = ()> + Serialize,
{
    let mut value = serde_json::to_value(object)?;
    if let Some(metadata) = value.get_mut("metadata").and_then(Value::as_object_mut) {
        metadata.remove("managedFields");
    }
    Ok(RawExtension(value))
}

fn decode_cluster(resource: ClusterResource) -> Result<Cluster, ClusterError> {
    let cloud_profile = cloud_profile_from_cluster(&resource)?;
    let seed = seed_from_cluster(&resource)?;
    let shoot = shoot_from_cluster(&resource)?;
    Ok(Cluster {
        metadata: resource.metadata,
        cloud_profile,
        seed,
        shoot,
    })
}

fn decode_payload<T>(
    cluster: &ClusterResource,
    raw: Option<&RawExtension>,
) -> Result<Option<T>, ClusterError>
where
    T: Resource<DynamicType = ()> + DeserializeOwned,
{
    let Some(raw) = raw.filter(|raw| !raw.0.is_null()) else {
        return Ok(None);
    };

    let expected_kind = T::kind(&());
    let expected_api_version = T::api_version(&());
    let declared_kind = raw.0.get("kind").and_then(Value::as_str).unwrap_or_default();
    let declared_api_version = raw
        .0
        .get("apiVersion")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if declared_kind != expected_kind || declared_api_version != expected_api_version {
        let detail = format!(
            "expected {expected_api_version}/{expected_kind}, payload declares {declared_api_version}/{declared_kind}"
        );
        return Err(ClusterError::Decode {
            cluster: cluster_name(cluster),
            kind: expected_kind.into_owned(),
            detail,
        });
    }

    T::deserialize(&raw.0)
        .map(Some)
        .map_err(|err| ClusterError::Decode {
            cluster: cluster_name(cluster),
            kind: T::kind(&()).into_owned(),
            detail: err.to_string(),
        })
}

fn cluster_name(cluster: &ClusterResource) -> String {
    cluster.metadata.name.clone().unwrap_or_default()
}

fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(response) if response.code == 404)
}
