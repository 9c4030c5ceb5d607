//! Agent Runtime Deploy Library
//!
//! Standalone, trait-based lifecycle controller for versioned agent
//! runtimes on a remote managed compute control plane.
//!
//! # Design
//!
//! This library provides the deployment lifecycle logic without coupling
//! to any specific transport, SDK, or region plumbing. You implement the
//! [`RuntimeApi`] trait with your infrastructure (or use the bundled
//! [`HttpRuntimeApi`]), and three small controllers handle the rest:
//!
//! - [`RuntimeLifecycle`] — create or update a unit, producing one new
//!   immutable version per call, and wait for READY.
//! - [`EndpointController`] — point a named endpoint at a version.
//!   Rollback is a repoint to a smaller version: one remote call plus
//!   polling, never a rebuild.
//! - [`CleanupOrchestrator`] — verified, dependency-ordered teardown:
//!   endpoints first, unit last, nothing deleted without the literal
//!   confirmation token.
//!
//! All three converge on the polling engine in [`poll`], which turns the
//! control plane's asynchronous provisioning into bounded synchronous
//! waits.
//!
//! # Usage
//!
//! ```ignore
//! use agentcore_deploy::{
//!     ArtifactReference, ControllerConfig, EndpointController, HttpRuntimeApi,
//!     RuntimeLifecycle,
//! };
//!
//! let api = HttpRuntimeApi::new("https://control-plane.example.com");
//! let config = ControllerConfig::new("arn:aws:iam::123456789012:role/runtime-exec");
//!
//! let outcome = RuntimeLifecycle::new(&api, &config)
//!     .deploy("svc", &ArtifactReference::new("deploy-bucket", "svc/42/agent.zip"))
//!     .await?;
//!
//! EndpointController::new(&api, &config)
//!     .create(&outcome.unit_id, outcome.version, Some("prod"))
//!     .await?;
//! ```

pub mod backend;
pub mod cleanup;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod poll;
pub mod runtime;
pub mod types;

#[cfg(feature = "http-client")]
pub mod client;

// Re-export the main types at crate root for convenience
pub use backend::RuntimeApi;
pub use cleanup::{CleanupOrchestrator, CleanupPhase, CleanupReport};
pub use config::{ControllerConfig, CONFIRM_TOKEN, DEFAULT_ENDPOINT};
pub use endpoint::{CreatedEndpoint, EndpointController, RepointOutcome};
pub use error::DeployError;
pub use poll::{await_absent, await_terminal, WaitPolicy, WaitState};
pub use runtime::{DeployOutcome, RuntimeLifecycle};
pub use types::*;

#[cfg(feature = "http-client")]
pub use client::HttpRuntimeApi;
