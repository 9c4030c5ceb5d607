//! Readiness polling: bounded, interval-based status re-querying.
//!
//! Every state transition in this crate funnels through here — the engine
//! converts the control plane's asynchronous provisioning into a
//! synchronous, bounded wait. The decision logic is a pure function
//! ([`classify`]) over an observed status and the elapsed time, so the
//! success/failure/timeout races are unit-testable without real delays;
//! the async drivers just probe, classify, and sleep.
//!
//! The engine does not retry transient probe failures: a failing probe
//! call surfaces immediately as [`DeployError::Query`] (or whatever the
//! probe returned). Retry tolerance belongs to the probe itself.

use crate::error::DeployError;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::info;

/// Cadence and ceiling for one bounded wait.
#[derive(Debug, Clone, Copy)]
pub struct WaitPolicy {
    /// Delay between probes.
    pub interval: Duration,
    /// Give up once this much time has elapsed without a terminal status.
    pub max_wait: Duration,
}

impl WaitPolicy {
    pub fn new(interval: Duration, max_wait: Duration) -> Self {
        Self { interval, max_wait }
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_wait: Duration::from_secs(300),
        }
    }
}

/// Outcome of classifying one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitState<S> {
    /// Not terminal yet; sleep and probe again.
    Waiting,
    /// Observed status is in the success set.
    Succeeded(S),
    /// Observed status is in the failure set — fail fast.
    Failed(S),
    /// Ceiling elapsed before a terminal status appeared.
    TimedOut(S),
}

/// Pure decision step of the wait state machine.
///
/// Terminal statuses win over the ceiling: an observation that is already
/// in the success or failure set resolves even if it arrives exactly at
/// `max_wait`.
pub fn classify<S>(
    observed: S,
    elapsed: Duration,
    policy: &WaitPolicy,
    success: &[S],
    failure: &[S],
) -> WaitState<S>
where
    S: Copy + PartialEq,
{
    if success.contains(&observed) {
        WaitState::Succeeded(observed)
    } else if failure.contains(&observed) {
        WaitState::Failed(observed)
    } else if elapsed >= policy.max_wait {
        WaitState::TimedOut(observed)
    } else {
        WaitState::Waiting
    }
}

/// Probe at a fixed interval until the status is terminal or the ceiling
/// elapses.
///
/// Returns the success status, or [`DeployError::Provisioning`] for a
/// failure status, or [`DeployError::Timeout`] at the ceiling. Timeout is
/// deliberately distinct: the remote operation may still converge after
/// the caller gives up.
pub async fn await_terminal<S, P, Fut>(
    policy: &WaitPolicy,
    subject: &str,
    success: &[S],
    failure: &[S],
    mut probe: P,
) -> Result<S, DeployError>
where
    S: Copy + PartialEq + Display + Send,
    P: FnMut() -> Fut + Send,
    Fut: Future<Output = Result<S, DeployError>> + Send,
{
    let start = Instant::now();
    let mut last: Option<S> = None;

    loop {
        let observed = probe().await?;

        if last != Some(observed) {
            info!(subject, status = %observed, "observed status");
            last = Some(observed);
        }

        match classify(observed, start.elapsed(), policy, success, failure) {
            WaitState::Succeeded(status) => {
                info!(subject, status = %status, "wait complete");
                return Ok(status);
            }
            WaitState::Failed(status) => {
                return Err(DeployError::Provisioning {
                    status: status.to_string(),
                    detail: format!("{subject} reached a terminal failure status"),
                });
            }
            WaitState::TimedOut(status) => {
                return Err(DeployError::Timeout {
                    subject: subject.to_string(),
                    waited_secs: start.elapsed().as_secs(),
                    last_status: status.to_string(),
                });
            }
            WaitState::Waiting => {
                tokio::time::sleep(policy.interval).await;
            }
        }
    }
}

/// Probe at a fixed interval until the resource no longer resolves.
///
/// Absence (`Ok(None)` from the probe) is the success condition — used to
/// verify deletions, where no status field ever says "gone".
pub async fn await_absent<S, P, Fut>(
    policy: &WaitPolicy,
    subject: &str,
    mut probe: P,
) -> Result<(), DeployError>
where
    S: Copy + PartialEq + Display + Send,
    P: FnMut() -> Fut + Send,
    Fut: Future<Output = Result<Option<S>, DeployError>> + Send,
{
    let start = Instant::now();
    let mut last: Option<S> = None;

    loop {
        match probe().await? {
            None => {
                info!(subject, "verified absent");
                return Ok(());
            }
            Some(observed) => {
                if last != Some(observed) {
                    info!(subject, status = %observed, "still present");
                    last = Some(observed);
                }

                if start.elapsed() >= policy.max_wait {
                    return Err(DeployError::Timeout {
                        subject: subject.to_string(),
                        waited_secs: start.elapsed().as_secs(),
                        last_status: observed.to_string(),
                    });
                }

                tokio::time::sleep(policy.interval).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UnitStatus;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SUCCESS: &[UnitStatus] = &[UnitStatus::Ready];
    const FAILURE: &[UnitStatus] = &[UnitStatus::CreateFailed, UnitStatus::UpdateFailed];

    fn policy() -> WaitPolicy {
        WaitPolicy::new(Duration::from_secs(10), Duration::from_secs(300))
    }

    #[test]
    fn test_classify_success() {
        let state = classify(
            UnitStatus::Ready,
            Duration::from_secs(0),
            &policy(),
            SUCCESS,
            FAILURE,
        );
        assert_eq!(state, WaitState::Succeeded(UnitStatus::Ready));
    }

    #[test]
    fn test_classify_failure_beats_timeout() {
        // A terminal failure observed exactly at the ceiling is still a
        // failure, not a timeout.
        let state = classify(
            UnitStatus::CreateFailed,
            Duration::from_secs(300),
            &policy(),
            SUCCESS,
            FAILURE,
        );
        assert_eq!(state, WaitState::Failed(UnitStatus::CreateFailed));
    }

    #[test]
    fn test_classify_success_beats_timeout() {
        let state = classify(
            UnitStatus::Ready,
            Duration::from_secs(301),
            &policy(),
            SUCCESS,
            FAILURE,
        );
        assert_eq!(state, WaitState::Succeeded(UnitStatus::Ready));
    }

    #[test]
    fn test_classify_waiting_then_timeout() {
        let state = classify(
            UnitStatus::Creating,
            Duration::from_secs(299),
            &policy(),
            SUCCESS,
            FAILURE,
        );
        assert_eq!(state, WaitState::Waiting);

        let state = classify(
            UnitStatus::Creating,
            Duration::from_secs(300),
            &policy(),
            SUCCESS,
            FAILURE,
        );
        assert_eq!(state, WaitState::TimedOut(UnitStatus::Creating));
    }

    #[tokio::test(start_paused = true)]
    async fn test_await_terminal_ready_after_probes() {
        let calls = AtomicUsize::new(0);
        let result = await_terminal(&policy(), "unit rt-1", SUCCESS, FAILURE, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                Ok(if n < 3 {
                    UnitStatus::Creating
                } else {
                    UnitStatus::Ready
                })
            }
        })
        .await;

        assert_eq!(result.unwrap(), UnitStatus::Ready);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_await_terminal_fails_fast() {
        let result = await_terminal(&policy(), "unit rt-1", SUCCESS, FAILURE, || async {
            Ok(UnitStatus::UpdateFailed)
        })
        .await;

        match result {
            Err(DeployError::Provisioning { status, .. }) => {
                assert_eq!(status, "UPDATE_FAILED");
            }
            other => panic!("expected Provisioning error, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_await_terminal_times_out() {
        let result = await_terminal(&policy(), "unit rt-1", SUCCESS, FAILURE, || async {
            Ok(UnitStatus::Creating)
        })
        .await;

        match result {
            Err(DeployError::Timeout {
                waited_secs,
                last_status,
                ..
            }) => {
                assert!(waited_secs >= 300);
                assert_eq!(last_status, "CREATING");
            }
            other => panic!("expected Timeout error, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_await_terminal_probe_error_surfaces() {
        let result: Result<UnitStatus, _> =
            await_terminal(&policy(), "unit rt-1", SUCCESS, FAILURE, || async {
                Err(DeployError::Query("connection reset".into()))
            })
            .await;

        assert!(matches!(result, Err(DeployError::Query(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_await_absent_succeeds_on_none() {
        let calls = AtomicUsize::new(0);
        let result = await_absent(&policy(), "endpoint prod", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                Ok(if n < 2 {
                    Some(UnitStatus::Deleting)
                } else {
                    None
                })
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_await_absent_times_out_while_present() {
        let result = await_absent(&policy(), "unit rt-1", || async {
            Ok(Some(UnitStatus::Deleting))
        })
        .await;

        match result {
            Err(DeployError::Timeout { last_status, .. }) => {
                assert_eq!(last_status, "DELETING");
            }
            other => panic!("expected Timeout error, got {other:?}"),
        }
    }
}
