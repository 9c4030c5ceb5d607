//! agentcore-deploy — drive the runtime lifecycle from the command line.
//!
//! Exit codes: 0 on success, 1 on any fatal error. The error category
//! (`validation`, `timeout`, `provisioning`, ...) is written to stderr so
//! CI wiring can branch on it without parsing messages.

use agentcore_deploy::{
    ArtifactReference, CleanupOrchestrator, ControllerConfig, DeployError, EndpointController,
    HttpRuntimeApi, RuntimeLifecycle, CONFIRM_TOKEN,
};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};

#[derive(Parser)]
#[command(name = "agentcore-deploy")]
#[command(about = "Deploy, route, and tear down versioned agent runtimes")]
#[command(version)]
struct Cli {
    /// Control plane base URL
    #[arg(long, env = "AGENTCORE_API_URL", global = true)]
    api_url: Option<String>,

    /// Execution role the runtime assumes
    #[arg(long, env = "AGENTCORE_ROLE", global = true)]
    role: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or update a runtime from a packaged artifact
    Deploy {
        /// Runtime name (unique within the account/region)
        name: String,

        /// Blob store (bucket) holding the artifact
        #[arg(long)]
        store: String,

        /// Object key of the artifact
        #[arg(long)]
        key: String,
    },

    /// Create an endpoint routing to a specific version
    CreateEndpoint {
        /// Runtime identifier
        unit_id: String,

        /// Version the endpoint should route to
        version: u64,

        /// Endpoint name (generated from unit name and version if omitted)
        name: Option<String>,
    },

    /// Repoint an existing endpoint to a different version
    UpdateEndpoint {
        /// Runtime identifier
        unit_id: String,

        /// Endpoint name
        name: String,

        /// New target version (smaller than the current target = rollback)
        version: u64,
    },

    /// Delete all custom endpoints, then the runtime itself
    Destroy {
        /// Runtime identifier
        unit_id: String,

        /// Confirmation token; prompts interactively if omitted
        #[arg(long)]
        confirm: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("error[{}]: {}", err.category(), err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), DeployError> {
    let api_url = cli
        .api_url
        .ok_or_else(|| DeployError::Validation("--api-url or AGENTCORE_API_URL required".into()))?;
    let api = HttpRuntimeApi::new(api_url);

    match cli.command {
        Commands::Deploy { name, store, key } => {
            let role = cli.role.ok_or_else(|| {
                DeployError::Validation("--role or AGENTCORE_ROLE required for deploy".into())
            })?;
            let config = ControllerConfig::new(role);

            let outcome = RuntimeLifecycle::new(&api, &config)
                .deploy(&name, &ArtifactReference::new(store, key))
                .await?;

            println!("runtime_id={}", outcome.unit_id);
            println!("version={}", outcome.version);
            println!("created={}", outcome.created);
        }

        Commands::CreateEndpoint {
            unit_id,
            version,
            name,
        } => {
            let config = ControllerConfig::new(cli.role.unwrap_or_default());
            let created = EndpointController::new(&api, &config)
                .create(&unit_id, version, name.as_deref())
                .await?;

            println!("endpoint_name={}", created.name);
            println!("endpoint_ref={}", created.reference);
        }

        Commands::UpdateEndpoint {
            unit_id,
            name,
            version,
        } => {
            let config = ControllerConfig::new(cli.role.unwrap_or_default());
            let outcome = EndpointController::new(&api, &config)
                .repoint(&unit_id, &name, version)
                .await?;

            println!("endpoint_name={}", outcome.name);
            println!("prior_version={}", outcome.prior_version);
            println!("new_version={}", outcome.new_version);
        }

        Commands::Destroy { unit_id, confirm } => {
            let token = match confirm {
                Some(token) => token,
                None => prompt_confirmation(&unit_id)?,
            };

            let config = ControllerConfig::new(cli.role.unwrap_or_default());
            let report = CleanupOrchestrator::new(&api, &config)
                .destroy(&unit_id, &token)
                .await?;

            for name in &report.deleted_endpoints {
                println!("deleted_endpoint={name}");
            }
            println!("unit_deleted={}", report.unit_deleted);
        }
    }

    Ok(())
}

/// Interactive confirmation gate. The core only ever sees the token; the
/// terminal prompt lives out here so the library stays non-interactive.
fn prompt_confirmation(unit_id: &str) -> Result<String, DeployError> {
    eprintln!("WARNING: this permanently deletes runtime {unit_id} and its endpoints.");
    eprint!("Type '{CONFIRM_TOKEN}' to confirm: ");
    io::stderr().flush().ok();

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| DeployError::Validation(format!("could not read confirmation: {e}")))?;

    Ok(line.trim().to_string())
}
