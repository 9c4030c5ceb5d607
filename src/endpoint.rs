//! Endpoint controller: point named traffic endpoints at versions.
//!
//! Repointing is the rollout *and* rollback mechanism: rollback is just a
//! repoint to a smaller version number. No new version is created, no
//! artifact moves — one remote call plus polling. That asymmetry against
//! `deploy` (repoint is O(1), deploy is O(build)) is the central
//! performance property of the design.

use crate::backend::RuntimeApi;
use crate::config::ControllerConfig;
use crate::error::DeployError;
use crate::poll::{await_terminal, WaitPolicy};
use crate::runtime::wait_unit_ready;
use crate::types::{EndpointStatus, ResolvedUnit};
use tracing::info;

const READY: &[EndpointStatus] = &[EndpointStatus::Ready];
const MUTATION_FAILED: &[EndpointStatus] =
    &[EndpointStatus::CreateFailed, EndpointStatus::UpdateFailed];

/// Result of creating an endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEndpoint {
    pub name: String,
    /// Stable external reference (ARN-style).
    pub reference: String,
}

/// Result of repointing an endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepointOutcome {
    pub name: String,
    pub prior_version: u64,
    pub new_version: u64,
}

/// Creates and repoints named endpoints on a deployment unit.
pub struct EndpointController<'a, B: RuntimeApi> {
    api: &'a B,
    config: &'a ControllerConfig,
}

impl<'a, B: RuntimeApi> EndpointController<'a, B> {
    pub fn new(api: &'a B, config: &'a ControllerConfig) -> Self {
        Self { api, config }
    }

    /// Create an endpoint on `unit_id` routing to `version`.
    ///
    /// With no explicit `name`, one is generated deterministically from
    /// the unit name and version — recognizable on re-runs, though a
    /// duplicate generated name across repeated calls is the caller's
    /// problem.
    pub async fn create(
        &self,
        unit_id: &str,
        version: u64,
        name: Option<&str>,
    ) -> Result<CreatedEndpoint, DeployError> {
        let unit = self.checked_unit(unit_id, version).await?;

        let name = match name {
            Some(n) => n.to_string(),
            None => generated_name(&unit.name, version),
        };

        wait_unit_ready(self.api, self.config, unit_id).await?;

        info!(unit = unit_id, endpoint = %name, version, "creating endpoint");
        let created = self.api.create_endpoint(unit_id, &name, version).await?;

        self.wait_endpoint_ready(unit_id, &name).await?;

        Ok(CreatedEndpoint {
            name,
            reference: created.reference,
        })
    }

    /// Repoint an existing endpoint to `new_version`.
    ///
    /// Never allocates a version. Repointing to a version that has not
    /// been created is rejected locally, before any remote call.
    pub async fn repoint(
        &self,
        unit_id: &str,
        name: &str,
        new_version: u64,
    ) -> Result<RepointOutcome, DeployError> {
        self.checked_unit(unit_id, new_version).await?;

        wait_unit_ready(self.api, self.config, unit_id).await?;

        info!(unit = unit_id, endpoint = name, version = new_version, "repointing endpoint");
        let repointed = self.api.update_endpoint(unit_id, name, new_version).await?;

        self.wait_endpoint_ready(unit_id, name).await?;

        info!(
            unit = unit_id,
            endpoint = name,
            prior = repointed.prior_version,
            new = new_version,
            "endpoint repointed"
        );
        Ok(RepointOutcome {
            name: name.to_string(),
            prior_version: repointed.prior_version,
            new_version,
        })
    }

    /// Resolve the unit and validate `version` against its known maximum.
    /// Runs before any mutation is issued.
    async fn checked_unit(&self, unit_id: &str, version: u64) -> Result<ResolvedUnit, DeployError> {
        if version == 0 {
            return Err(DeployError::Validation("versions start at 1".into()));
        }

        let unit = self
            .api
            .describe_unit(unit_id)
            .await?
            .ok_or_else(|| DeployError::NotFound(format!("unit {unit_id}")))?;

        if version > unit.latest_version {
            return Err(DeployError::Validation(format!(
                "version {version} does not exist for unit {unit_id} (latest is {})",
                unit.latest_version
            )));
        }

        Ok(unit)
    }

    /// Propagation wait: block until the endpoint itself reports READY.
    async fn wait_endpoint_ready(&self, unit_id: &str, name: &str) -> Result<(), DeployError> {
        let policy = WaitPolicy::new(self.config.poll_interval, self.config.poll_ceiling);
        let subject = format!("endpoint {name} on unit {unit_id}");

        await_terminal(&policy, &subject, READY, MUTATION_FAILED, || async move {
            match self.api.describe_endpoint(unit_id, name).await? {
                Some(endpoint) => Ok(endpoint.status),
                None => Err(DeployError::NotFound(format!(
                    "endpoint {name} disappeared while waiting for READY"
                ))),
            }
        })
        .await?;

        Ok(())
    }
}

/// Deterministic endpoint name from unit name and version.
fn generated_name(unit_name: &str, version: u64) -> String {
    format!("{unit_name}_v{version}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_name_is_deterministic() {
        assert_eq!(generated_name("svc", 3), "svc_v3");
        assert_eq!(generated_name("svc", 3), generated_name("svc", 3));
        assert_ne!(generated_name("svc", 3), generated_name("svc", 4));
    }
}
