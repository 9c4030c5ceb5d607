//! Error types for the runtime deployment controller.
//!
//! No `anyhow` leakage. Explicit, typed errors — one variant per failure
//! class the caller can actually act on.

/// All errors surfaced by the controller.
///
/// Absence of a resource is *not* always an error: `resolve_unit` returning
/// `None` is the create branch in `deploy`, and a vanished endpoint is the
/// success condition during cleanup verification. [`DeployError::NotFound`]
/// is raised only when the caller expected presence.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("control plane query failed: {0}")]
    Query(String),

    #[error("provisioning failed: status={status}, detail={detail}")]
    Provisioning { status: String, detail: String },

    #[error("timed out waiting for {subject} after {waited_secs}s (last status: {last_status})")]
    Timeout {
        subject: String,
        waited_secs: u64,
        last_status: String,
    },

    #[error("destructive operation not confirmed")]
    Unconfirmed,

    #[error("cleanup partially failed: deleted [{}], failed [{}]; unit deletion skipped",
        .deleted.join(", "), .failed.join(", "))]
    PartialFailure {
        deleted: Vec<String>,
        failed: Vec<String>,
    },
}

impl DeployError {
    /// Stable category name, written to stderr by the CLI so automation can
    /// distinguish failure classes without parsing messages.
    pub fn category(&self) -> &'static str {
        match self {
            DeployError::Validation(_) => "validation",
            DeployError::NotFound(_) => "not-found",
            DeployError::Query(_) => "query",
            DeployError::Provisioning { .. } => "provisioning",
            DeployError::Timeout { .. } => "timeout",
            DeployError::Unconfirmed => "unconfirmed",
            DeployError::PartialFailure { .. } => "partial-failure",
        }
    }

    /// Whether a re-run of the same operation might succeed.
    ///
    /// `Timeout` is recoverable by design: the remote operation keeps
    /// running server-side after we give up, so the unit may well be READY
    /// by the time the caller retries.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DeployError::Query(_)
                | DeployError::Timeout { .. }
                | DeployError::PartialFailure { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DeployError::Validation("version 0 does not exist".to_string());
        assert_eq!(err.to_string(), "invalid input: version 0 does not exist");

        let err = DeployError::Provisioning {
            status: "CREATE_FAILED".to_string(),
            detail: "image pull error".to_string(),
        };
        assert!(err.to_string().contains("CREATE_FAILED"));
        assert!(err.to_string().contains("image pull error"));

        let err = DeployError::Timeout {
            subject: "unit rt-1".to_string(),
            waited_secs: 300,
            last_status: "CREATING".to_string(),
        };
        assert!(err.to_string().contains("300s"));
        assert!(err.to_string().contains("CREATING"));

        let err = DeployError::PartialFailure {
            deleted: vec!["pr-7".to_string()],
            failed: vec!["staging".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("pr-7"));
        assert!(msg.contains("staging"));
        assert!(msg.contains("unit deletion skipped"));

        assert_eq!(
            DeployError::Unconfirmed.to_string(),
            "destructive operation not confirmed"
        );
    }

    #[test]
    fn test_error_category() {
        assert_eq!(DeployError::Validation("x".into()).category(), "validation");
        assert_eq!(DeployError::NotFound("x".into()).category(), "not-found");
        assert_eq!(DeployError::Query("x".into()).category(), "query");
        assert_eq!(DeployError::Unconfirmed.category(), "unconfirmed");
        assert_eq!(
            DeployError::Timeout {
                subject: "s".into(),
                waited_secs: 1,
                last_status: "CREATING".into()
            }
            .category(),
            "timeout"
        );
        assert_eq!(
            DeployError::PartialFailure {
                deleted: vec![],
                failed: vec![]
            }
            .category(),
            "partial-failure"
        );
    }

    #[test]
    fn test_error_is_recoverable() {
        assert!(DeployError::Query("test".to_string()).is_recoverable());
        assert!(DeployError::Timeout {
            subject: "s".into(),
            waited_secs: 300,
            last_status: "UPDATING".into()
        }
        .is_recoverable());

        assert!(!DeployError::Validation("test".to_string()).is_recoverable());
        assert!(!DeployError::Unconfirmed.is_recoverable());
        assert!(!DeployError::Provisioning {
            status: "UPDATE_FAILED".into(),
            detail: String::new()
        }
        .is_recoverable());
    }
}
