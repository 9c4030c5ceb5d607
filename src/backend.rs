//! The One Trait: RuntimeApi
//!
//! This is the single abstraction point for the remote control plane.
//! The controllers are pure logic — they don't know about HTTP, SDKs,
//! signing, or regions. That's YOUR problem when you implement this trait.
//!
//! Absence is data here: `resolve_unit`, `describe_unit` and
//! `describe_endpoint` return `Ok(None)` for a missing resource instead of
//! an error. The deploy controller branches on it, and the cleanup
//! orchestrator treats it as proof of deletion.

use crate::error::DeployError;
use crate::types::{
    ArtifactReference, CreatedUnit, EndpointInfo, RepointedEndpoint, ResolvedUnit, RuntimeConfig,
    UpdatedUnit,
};
use std::future::Future;

/// The single trait consumers implement to drive the controllers.
///
/// Every method maps 1:1 to a control-plane call. Implementations must not
/// retry internally on provisioning states — the polling engine owns all
/// waiting.
pub trait RuntimeApi: Send + Sync {
    // ═══════════════════════════════════════════════════════════════
    // QUERIES (read-only)
    // ═══════════════════════════════════════════════════════════════

    /// Look up a unit by its operator-chosen name.
    fn resolve_unit(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<ResolvedUnit>, DeployError>> + Send;

    /// Look up a unit by its control-plane identifier.
    fn describe_unit(
        &self,
        unit_id: &str,
    ) -> impl Future<Output = Result<Option<ResolvedUnit>, DeployError>> + Send;

    /// List all endpoints owned by a unit, the protected one included.
    fn list_endpoints(
        &self,
        unit_id: &str,
    ) -> impl Future<Output = Result<Vec<EndpointInfo>, DeployError>> + Send;

    /// Look up a single endpoint by name.
    fn describe_endpoint(
        &self,
        unit_id: &str,
        name: &str,
    ) -> impl Future<Output = Result<Option<EndpointInfo>, DeployError>> + Send;

    // ═══════════════════════════════════════════════════════════════
    // MUTATIONS
    // ═══════════════════════════════════════════════════════════════

    /// Create a unit. The sole way a unit and its version 1 come into
    /// existence. Returns immediately with a provisioning status.
    fn create_unit(
        &self,
        name: &str,
        artifact: &ArtifactReference,
        role_ref: &str,
        config: &RuntimeConfig,
    ) -> impl Future<Output = Result<CreatedUnit, DeployError>> + Send;

    /// Swap the artifact on an existing unit, allocating the next version.
    /// Prior versions stay intact and queryable.
    fn update_unit(
        &self,
        unit_id: &str,
        artifact: &ArtifactReference,
    ) -> impl Future<Output = Result<UpdatedUnit, DeployError>> + Send;

    /// Request unit deletion. Acceptance only — completion is verified by
    /// polling `describe_unit` until it returns `None`.
    fn delete_unit(
        &self,
        unit_id: &str,
    ) -> impl Future<Output = Result<(), DeployError>> + Send;

    /// Create a named endpoint routing to `version`.
    fn create_endpoint(
        &self,
        unit_id: &str,
        name: &str,
        version: u64,
    ) -> impl Future<Output = Result<EndpointInfo, DeployError>> + Send;

    /// Repoint an existing endpoint to `version`. Returns the version the
    /// endpoint routed to before the call.
    fn update_endpoint(
        &self,
        unit_id: &str,
        name: &str,
        version: u64,
    ) -> impl Future<Output = Result<RepointedEndpoint, DeployError>> + Send;

    /// Request endpoint deletion. Acceptance only; completion is verified
    /// by polling `describe_endpoint` until it returns `None`.
    fn delete_endpoint(
        &self,
        unit_id: &str,
        name: &str,
    ) -> impl Future<Output = Result<(), DeployError>> + Send;
}
