//! Cleanup orchestrator: dependency-ordered, verified teardown.
//!
//! Endpoints go first, the unit last, and every deletion is verified by
//! polling until the resource stops resolving — absence is the success
//! condition, not a status field. Endpoint deletions fan out best-effort;
//! if any of them fails, the unit delete is skipped entirely, because the
//! control plane rejects deleting a unit with endpoints still attached.
//! Skipping is the correct conservative behavior, not a convenience.

use crate::backend::RuntimeApi;
use crate::config::{ControllerConfig, CONFIRM_TOKEN};
use crate::error::DeployError;
use crate::poll::{await_absent, WaitPolicy};
use crate::types::{EndpointStatus, UnitStatus};
use tracing::{info, warn};

/// Phases of one teardown run, in order. `Failed` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupPhase {
    Listing,
    DeletingEndpoints,
    VerifyingEndpoints,
    DeletingUnit,
    VerifyingUnit,
    Done,
    Failed,
}

impl CleanupPhase {
    /// Phase name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            CleanupPhase::Listing => "listing",
            CleanupPhase::DeletingEndpoints => "deleting_endpoints",
            CleanupPhase::VerifyingEndpoints => "verifying_endpoints",
            CleanupPhase::DeletingUnit => "deleting_unit",
            CleanupPhase::VerifyingUnit => "verifying_unit",
            CleanupPhase::Done => "done",
            CleanupPhase::Failed => "failed",
        }
    }
}

/// What a teardown run actually did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    /// Endpoints deleted and verified absent, protected one excluded.
    pub deleted_endpoints: Vec<String>,
    /// Whether the unit itself was deleted and verified absent.
    pub unit_deleted: bool,
}

/// Tears down a deployment unit and its operator-created endpoints.
pub struct CleanupOrchestrator<'a, B: RuntimeApi> {
    api: &'a B,
    config: &'a ControllerConfig,
}

impl<'a, B: RuntimeApi> CleanupOrchestrator<'a, B> {
    pub fn new(api: &'a B, config: &'a ControllerConfig) -> Self {
        Self { api, config }
    }

    /// Destroy `unit_id`: delete all non-protected endpoints, verify each
    /// is gone, then delete and verify the unit.
    ///
    /// `confirmation` must equal [`CONFIRM_TOKEN`] — this operation has no
    /// undo, so the human-in-the-loop gate runs before any remote call.
    /// Per-endpoint failures do not abort the remaining endpoint
    /// deletions, but any failure withholds the unit delete and the whole
    /// run returns [`DeployError::PartialFailure`].
    pub async fn destroy(
        &self,
        unit_id: &str,
        confirmation: &str,
    ) -> Result<CleanupReport, DeployError> {
        if confirmation != CONFIRM_TOKEN {
            return Err(DeployError::Unconfirmed);
        }

        let mut phase = CleanupPhase::Listing;
        info!(unit = unit_id, phase = phase.name(), "cleanup started");

        let endpoints = self.api.list_endpoints(unit_id).await?;
        let deletable: Vec<String> = endpoints
            .iter()
            .filter(|ep| ep.name != self.config.protected_endpoint)
            .map(|ep| ep.name.clone())
            .collect();

        let protected = endpoints.len() - deletable.len();
        info!(
            unit = unit_id,
            deletable = deletable.len(),
            protected,
            "endpoints listed"
        );

        phase = CleanupPhase::DeletingEndpoints;
        info!(unit = unit_id, phase = phase.name(), "phase transition");

        let mut issued: Vec<String> = Vec::new();
        let mut failed: Vec<String> = Vec::new();

        for name in &deletable {
            match self.api.delete_endpoint(unit_id, name).await {
                Ok(()) => issued.push(name.clone()),
                Err(err) => {
                    warn!(unit = unit_id, endpoint = %name, error = %err, "endpoint delete rejected");
                    failed.push(name.clone());
                }
            }
        }

        phase = CleanupPhase::VerifyingEndpoints;
        info!(unit = unit_id, phase = phase.name(), "phase transition");

        let mut deleted: Vec<String> = Vec::new();

        for name in &issued {
            match self.verify_endpoint_absent(unit_id, name).await {
                Ok(()) => deleted.push(name.clone()),
                Err(err) => {
                    warn!(unit = unit_id, endpoint = %name, error = %err, "endpoint still present");
                    failed.push(name.clone());
                }
            }
        }

        if !failed.is_empty() {
            phase = CleanupPhase::Failed;
            warn!(
                unit = unit_id,
                phase = phase.name(),
                failed = failed.len(),
                "unit deletion withheld"
            );
            return Err(DeployError::PartialFailure { deleted, failed });
        }

        phase = CleanupPhase::DeletingUnit;
        info!(unit = unit_id, phase = phase.name(), "phase transition");
        self.api.delete_unit(unit_id).await?;

        phase = CleanupPhase::VerifyingUnit;
        info!(unit = unit_id, phase = phase.name(), "phase transition");
        let policy = WaitPolicy::new(self.config.poll_interval, self.config.poll_ceiling);
        await_absent::<UnitStatus, _, _>(&policy, &format!("unit {unit_id}"), || async move {
            Ok(self.api.describe_unit(unit_id).await?.map(|u| u.status))
        })
        .await?;

        phase = CleanupPhase::Done;
        info!(unit = unit_id, phase = phase.name(), "cleanup complete");

        Ok(CleanupReport {
            deleted_endpoints: deleted,
            unit_deleted: true,
        })
    }

    /// Poll until the endpoint's own resolution returns nothing.
    async fn verify_endpoint_absent(&self, unit_id: &str, name: &str) -> Result<(), DeployError> {
        let policy = WaitPolicy::new(self.config.poll_interval, self.config.poll_ceiling);
        await_absent::<EndpointStatus, _, _>(
            &policy,
            &format!("endpoint {name} on unit {unit_id}"),
            || async move {
                Ok(self
                    .api
                    .describe_endpoint(unit_id, name)
                    .await?
                    .map(|ep| ep.status))
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_names() {
        assert_eq!(CleanupPhase::Listing.name(), "listing");
        assert_eq!(CleanupPhase::VerifyingUnit.name(), "verifying_unit");
        assert_eq!(CleanupPhase::Failed.name(), "failed");
    }
}
