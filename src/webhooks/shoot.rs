//! Shoot admission validator.
//!
//! On CREATE the shoot's provider payloads are decoded, checked against the
//! referenced cloud profile and then field-validated. On UPDATE the
//! immutability deltas between old and new state run before the full
//! validation of the new shoot. The first failure terminates the flow.

use async_trait::async_trait;
use kube::{Api, Client, ResourceExt};

use crate::api::decoder::ConfigDecoder;
use crate::api::garden::{CloudProfile, Shoot};
use crate::api::provider::{CloudProfileConfig, ControlPlaneConfig, InfrastructureConfig};
use crate::validation::cloud_profile::validate_cloud_profile_config;
use crate::validation::control_plane::{
    validate_control_plane_config, validate_control_plane_config_against_cloud_profile,
    validate_control_plane_config_update,
};
use crate::validation::infrastructure::{
    validate_infrastructure_config, validate_infrastructure_config_against_cloud_profile,
    validate_infrastructure_config_update,
};
use crate::validation::shoot::{validate_networking, validate_workers, validate_workers_update};
use crate::validation::{FieldErrorList, FieldPath};

use super::context::{cp_config_path, infra_config_path, ValidationContext};
use super::error::{Error, Result};

/// Read access to cloud profiles.
///
/// Production uses [`KubeProfileStore`]; tests substitute in-memory fakes.
#[async_trait]
pub trait CloudProfileStore: Send + Sync {
    /// Fetch a cloud profile by name.
    async fn get_cloud_profile(
        &self,
        name: &str,
    ) -> std::result::Result<CloudProfile, kube::Error>;
}

/// Cloud profile store backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeProfileStore {
    client: Client,
}

impl KubeProfileStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CloudProfileStore for KubeProfileStore {
    async fn get_cloud_profile(
        &self,
        name: &str,
    ) -> std::result::Result<CloudProfile, kube::Error> {
        Api::<CloudProfile>::all(self.client.clone()).get(name).await
    }
}

fn networking_path() -> FieldPath {
    FieldPath::new("spec").child("networking")
}

fn workers_path() -> FieldPath {
    FieldPath::new("spec").child("provider").child("workers")
}

/// Convert a non-empty error list into a validation failure.
fn fail_fast(errors: FieldErrorList) -> Result<()> {
    match errors.to_aggregate() {
        Some(aggregate) => Err(Error::Validation(aggregate)),
        None => Ok(()),
    }
}

/// Validates shoots of the vSphere provider on admission.
pub struct ShootValidator<S> {
    store: S,
    decoder: ConfigDecoder,
}

impl<S: CloudProfileStore> ShootValidator<S> {
    pub fn new(store: S, decoder: ConfigDecoder) -> Self {
        Self { store, decoder }
    }

    /// Validate a shoot that is being created.
    pub async fn validate_create(&self, shoot: &Shoot) -> Result<()> {
        let context = ValidationContext::new(&self.decoder, shoot)?;

        self.validate_infra_against_cloud_profile(shoot, &context.infra_config, &infra_config_path())
            .await?;
        self.validate_cp_against_cloud_profile(shoot, &context.cp_config, &cp_config_path())
            .await?;

        self.validate_shoot(&context)
    }

    /// Validate a shoot update against its previous state.
    ///
    /// Immutability deltas run first, infrastructure before control plane
    /// before workers, then the new shoot is validated in full. Cross
    /// profile checks are a create-time concern and are not repeated here.
    pub async fn validate_update(&self, old_shoot: &Shoot, shoot: &Shoot) -> Result<()> {
        let old_context = ValidationContext::new(&self.decoder, old_shoot)?;
        let context = ValidationContext::new(&self.decoder, shoot)?;

        fail_fast(validate_infrastructure_config_update(
            &old_context.infra_config,
            &context.infra_config,
            &infra_config_path(),
        ))?;
        fail_fast(validate_control_plane_config_update(
            &old_context.cp_config,
            &context.cp_config,
            &cp_config_path(),
        ))?;
        fail_fast(validate_workers_update(
            &old_shoot.spec.provider.workers,
            &shoot.spec.provider.workers,
            &workers_path(),
        ))?;

        self.validate_shoot(&context)
    }

    /// Field validation of a decoded shoot, in fixed order.
    fn validate_shoot(&self, context: &ValidationContext<'_>) -> Result<()> {
        fail_fast(validate_networking(
            &context.shoot.spec.networking,
            &networking_path(),
        ))?;
        fail_fast(validate_infrastructure_config(
            &context.infra_config,
            context.shoot.spec.networking.nodes.as_deref(),
            &infra_config_path(),
        ))?;
        fail_fast(validate_control_plane_config(
            &context.cp_config,
            &cp_config_path(),
        ))?;
        fail_fast(validate_workers(
            &context.shoot.spec.provider.workers,
            &workers_path(),
        ))
    }

    async fn validate_infra_against_cloud_profile(
        &self,
        shoot: &Shoot,
        infra_config: &InfrastructureConfig,
        path: &FieldPath,
    ) -> Result<()> {
        let profile_config = self.read_cloud_profile_config(shoot).await?;
        fail_fast(validate_infrastructure_config_against_cloud_profile(
            infra_config,
            &shoot.spec.region,
            &profile_config,
            path,
        ))
    }

    async fn validate_cp_against_cloud_profile(
        &self,
        shoot: &Shoot,
        cp_config: &ControlPlaneConfig,
        path: &FieldPath,
    ) -> Result<()> {
        let profile_config = self.read_cloud_profile_config(shoot).await?;
        fail_fast(validate_control_plane_config_against_cloud_profile(
            cp_config,
            &shoot.spec.region,
            &profile_config,
            path,
        ))
    }

    /// Fetch the shoot's cloud profile and decode and validate its provider
    /// config. A profile without one cannot host vSphere shoots.
    async fn read_cloud_profile_config(&self, shoot: &Shoot) -> Result<CloudProfileConfig> {
        let profile = self
            .store
            .get_cloud_profile(&shoot.spec.cloud_profile_name)
            .await?;
        let name = profile.name_any();

        let Some(raw) = profile.spec.provider_config.as_ref() else {
            return Err(Error::MissingProviderConfig(name));
        };

        let config = self
            .decoder
            .decode::<CloudProfileConfig>(Some(raw))
            .map_err(|err| Error::CloudProfileConfig {
                name: name.clone(),
                detail: err.to_string(),
            })?;

        let profile_path = FieldPath::new("spec").child("providerConfig");
        if let Some(aggregate) = validate_cloud_profile_config(&config, &profile_path).to_aggregate()
        {
            return Err(Error::CloudProfileConfig {
                name,
                detail: aggregate.to_string(),
            });
        }

        Ok(config)
    }
}
