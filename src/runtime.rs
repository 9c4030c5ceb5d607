//! Runtime lifecycle controller: create or update a deployment unit.
//!
//! One call, one new version. The controller resolves the unit by name,
//! takes the create or update path, then blocks until the control plane
//! reports READY (or a terminal failure, or the ceiling).

use crate::backend::RuntimeApi;
use crate::config::ControllerConfig;
use crate::error::DeployError;
use crate::poll::{await_terminal, WaitPolicy};
use crate::types::{ArtifactReference, UnitStatus};
use tracing::info;

const READY: &[UnitStatus] = &[UnitStatus::Ready];
const PROVISION_FAILED: &[UnitStatus] = &[UnitStatus::CreateFailed, UnitStatus::UpdateFailed];

/// Result of a successful deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    /// Control-plane identifier of the unit.
    pub unit_id: String,
    /// The version this deploy produced.
    pub version: u64,
    /// True if this call created the unit (version is then 1).
    pub created: bool,
}

/// Creates or updates a deployment unit, producing a new immutable version.
pub struct RuntimeLifecycle<'a, B: RuntimeApi> {
    api: &'a B,
    config: &'a ControllerConfig,
}

impl<'a, B: RuntimeApi> RuntimeLifecycle<'a, B> {
    pub fn new(api: &'a B, config: &'a ControllerConfig) -> Self {
        Self { api, config }
    }

    /// Deploy `artifact` to the unit named `name`, creating the unit if it
    /// does not exist yet.
    ///
    /// Exactly one new version is allocated per call; prior versions are
    /// never mutated or renumbered. Concurrent deploys against the same
    /// name are not coordinated here — the control plane's own concurrency
    /// control is the only guard.
    pub async fn deploy(
        &self,
        name: &str,
        artifact: &ArtifactReference,
    ) -> Result<DeployOutcome, DeployError> {
        if name.is_empty() {
            return Err(DeployError::Validation("unit name must not be empty".into()));
        }

        // Absence is the create branch, not an error. Anything else from
        // the resolve call is fatal.
        let existing = self.api.resolve_unit(name).await?;

        let (unit_id, version, created) = match existing {
            None => {
                info!(unit = name, artifact = %artifact, "creating unit");
                let created = self
                    .api
                    .create_unit(name, artifact, &self.config.role_ref, &self.config.runtime)
                    .await?;
                (created.id, created.version, true)
            }
            Some(unit) => {
                info!(unit = name, id = %unit.id, artifact = %artifact, "updating unit");
                let updated = self.api.update_unit(&unit.id, artifact).await?;
                (unit.id, updated.version, false)
            }
        };

        self.wait_until_ready(&unit_id).await?;

        info!(unit = name, id = %unit_id, version, "unit ready");
        Ok(DeployOutcome {
            unit_id,
            version,
            created,
        })
    }

    async fn wait_until_ready(&self, unit_id: &str) -> Result<UnitStatus, DeployError> {
        wait_unit_ready(self.api, self.config, unit_id).await
    }
}

/// Block until the unit reports READY.
///
/// Shared by deploy and the endpoint controller (an endpoint mutation
/// against a unit mid-provisioning is a guaranteed rejection, so callers
/// wait here first). A unit that stops resolving mid-wait was deleted out
/// from under us; that surfaces as `NotFound` rather than an endless wait.
pub(crate) async fn wait_unit_ready<B: RuntimeApi>(
    api: &B,
    config: &ControllerConfig,
    unit_id: &str,
) -> Result<UnitStatus, DeployError> {
    let policy = WaitPolicy::new(config.poll_interval, config.poll_ceiling);
    let subject = format!("unit {unit_id}");

    await_terminal(&policy, &subject, READY, PROVISION_FAILED, || async move {
        match api.describe_unit(unit_id).await? {
            Some(unit) => Ok(unit.status),
            None => Err(DeployError::NotFound(format!(
                "unit {unit_id} disappeared while waiting for READY"
            ))),
        }
    })
    .await
}
