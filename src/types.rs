//! Minimal domain types for the deployment controller.
//!
//! These are the types the controllers need. Nothing more. If you're
//! adding types here, ask yourself if a controller actually needs them
//! or if you're just being clever.

use serde::{Deserialize, Serialize};

/// Immutable pointer to a packaged artifact in blob storage.
///
/// The controller never inspects artifact contents — the packager
/// guarantees the blob is complete and retrievable before `deploy` runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactReference {
    /// Blob store identifier (bucket).
    pub store: String,
    /// Object key within the store.
    pub key: String,
}

impl ArtifactReference {
    pub fn new(store: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            store: store.into(),
            key: key.into(),
        }
    }
}

impl std::fmt::Display for ArtifactReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.store, self.key)
    }
}

/// Lifecycle status of a deployment unit, as reported by the control plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitStatus {
    Creating,
    Updating,
    Ready,
    CreateFailed,
    UpdateFailed,
    Deleting,
    Deleted,
}

impl UnitStatus {
    /// Wire-format name, also used in logs and error details.
    pub fn name(&self) -> &'static str {
        match self {
            UnitStatus::Creating => "CREATING",
            UnitStatus::Updating => "UPDATING",
            UnitStatus::Ready => "READY",
            UnitStatus::CreateFailed => "CREATE_FAILED",
            UnitStatus::UpdateFailed => "UPDATE_FAILED",
            UnitStatus::Deleting => "DELETING",
            UnitStatus::Deleted => "DELETED",
        }
    }
}

impl std::fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Status of a named endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndpointStatus {
    Creating,
    Updating,
    Ready,
    CreateFailed,
    UpdateFailed,
    Deleting,
}

impl EndpointStatus {
    pub fn name(&self) -> &'static str {
        match self {
            EndpointStatus::Creating => "CREATING",
            EndpointStatus::Updating => "UPDATING",
            EndpointStatus::Ready => "READY",
            EndpointStatus::CreateFailed => "CREATE_FAILED",
            EndpointStatus::UpdateFailed => "UPDATE_FAILED",
            EndpointStatus::Deleting => "DELETING",
        }
    }
}

impl std::fmt::Display for EndpointStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Snapshot of a deployment unit from `resolve_unit` / `describe_unit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedUnit {
    /// Control-plane-assigned identifier.
    pub id: String,
    /// Operator-chosen unique name.
    pub name: String,
    pub status: UnitStatus,
    /// Highest version number allocated so far (1-based).
    pub latest_version: u64,
}

/// Result of a `create_unit` call. Version is always 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedUnit {
    pub id: String,
    /// Stable external reference (ARN-style), for operator display.
    pub reference: String,
    pub version: u64,
    pub status: UnitStatus,
}

/// Result of an `update_unit` call. Version is the prior max plus one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatedUnit {
    pub version: u64,
    pub status: UnitStatus,
}

/// Snapshot of a named endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointInfo {
    pub name: String,
    /// Version this endpoint currently routes to.
    pub version: u64,
    pub status: EndpointStatus,
    /// Stable external reference (ARN-style).
    pub reference: String,
}

/// Result of an `update_endpoint` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepointedEndpoint {
    /// Version the endpoint routed to before this call.
    pub prior_version: u64,
    pub status: EndpointStatus,
}

/// Network exposure mode for a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetworkMode {
    #[default]
    Public,
    VpcOnly,
}

/// Protocol the unit's server speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerProtocol {
    #[default]
    Http,
    Grpc,
}

/// Create-time configuration for a deployment unit.
///
/// Sent once on `create_unit`; updates only swap the artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
    /// Language runtime the artifact targets, e.g. `PYTHON_3_11`.
    pub runtime_kind: String,
    /// Entry point files within the artifact, e.g. `["agent.py"]`.
    pub entry_point: Vec<String>,
    pub network_mode: NetworkMode,
    pub server_protocol: ServerProtocol,
    pub description: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            runtime_kind: "PYTHON_3_11".to_string(),
            entry_point: Vec::new(),
            network_mode: NetworkMode::Public,
            server_protocol: ServerProtocol::Http,
            description: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_reference_display() {
        let artifact = ArtifactReference::new("deploy-bucket", "svc/17/agent.zip");
        assert_eq!(artifact.to_string(), "deploy-bucket/svc/17/agent.zip");
    }

    #[test]
    fn test_unit_status_wire_format() {
        let json = serde_json::to_string(&UnitStatus::CreateFailed).unwrap();
        assert_eq!(json, "\"CREATE_FAILED\"");

        let status: UnitStatus = serde_json::from_str("\"READY\"").unwrap();
        assert_eq!(status, UnitStatus::Ready);
        assert_eq!(status.name(), "READY");
    }

    #[test]
    fn test_endpoint_status_wire_format() {
        let json = serde_json::to_string(&EndpointStatus::Deleting).unwrap();
        assert_eq!(json, "\"DELETING\"");
        assert_eq!(EndpointStatus::UpdateFailed.to_string(), "UPDATE_FAILED");
    }

    #[test]
    fn test_runtime_config_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.runtime_kind, "PYTHON_3_11");
        assert_eq!(config.network_mode, NetworkMode::Public);
        assert_eq!(config.server_protocol, ServerProtocol::Http);
        assert!(config.description.is_none());
    }
}
