//! Default `RuntimeApi` implementation over the control plane's JSON API.
//!
//! Feature-gated (`http-client`) so library consumers who bring their own
//! transport don't pull in reqwest. One method per control-plane call,
//! no retries, no waiting — the polling engine owns all of that.

use crate::backend::RuntimeApi;
use crate::error::DeployError;
use crate::types::{
    ArtifactReference, CreatedUnit, EndpointInfo, RepointedEndpoint, ResolvedUnit, RuntimeConfig,
    UpdatedUnit,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// HTTP client for the runtime control plane.
pub struct HttpRuntimeApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpRuntimeApi {
    /// Create a client against `base_url` (no trailing slash needed).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Use a pre-configured reqwest client (custom TLS, proxies, auth
    /// middleware).
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a resource; 404 is `None`, any other non-success is `Query`.
    async fn get_opt<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, DeployError> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| DeployError::Query(format!("GET {path}: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = check_status(response, "GET", path).await?;
        let body = response
            .json::<T>()
            .await
            .map_err(|e| DeployError::Query(format!("GET {path}: invalid response body: {e}")))?;
        Ok(Some(body))
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> Result<T, DeployError> {
        let verb = method.as_str().to_string();
        let response = self
            .http
            .request(method, self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| DeployError::Query(format!("{verb} {path}: {e}")))?;

        let response = check_status(response, &verb, path).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| DeployError::Query(format!("{verb} {path}: invalid response body: {e}")))
    }

    /// DELETE a resource. 404 counts as accepted — absence is the goal.
    async fn delete(&self, path: &str) -> Result<(), DeployError> {
        let response = self
            .http
            .delete(self.url(path))
            .send()
            .await
            .map_err(|e| DeployError::Query(format!("DELETE {path}: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }

        check_status(response, "DELETE", path).await?;
        Ok(())
    }
}

async fn check_status(
    response: reqwest::Response,
    verb: &str,
    path: &str,
) -> Result<reqwest::Response, DeployError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(DeployError::Query(format!(
        "{verb} {path}: HTTP {status}: {body}"
    )))
}

// ═══════════════════════════════════════════════════════════════════
// WIRE TYPES
// ═══════════════════════════════════════════════════════════════════

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnitListWire {
    runtimes: Vec<ResolvedUnit>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EndpointListWire {
    endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateUnitWire<'a> {
    name: &'a str,
    artifact: &'a ArtifactReference,
    role_ref: &'a str,
    #[serde(flatten)]
    config: &'a RuntimeConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateUnitWire<'a> {
    artifact: &'a ArtifactReference,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateEndpointWire<'a> {
    name: &'a str,
    version: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateEndpointWire {
    version: u64,
}

impl RuntimeApi for HttpRuntimeApi {
    async fn resolve_unit(&self, name: &str) -> Result<Option<ResolvedUnit>, DeployError> {
        // The control plane indexes units by id; name lookup is a filtered
        // list call, matched exactly on our side.
        let listing: Option<UnitListWire> = self.get_opt(&format!("/runtimes?name={name}")).await?;
        Ok(listing.and_then(|l| l.runtimes.into_iter().find(|u| u.name == name)))
    }

    async fn describe_unit(&self, unit_id: &str) -> Result<Option<ResolvedUnit>, DeployError> {
        self.get_opt(&format!("/runtimes/{unit_id}")).await
    }

    async fn list_endpoints(&self, unit_id: &str) -> Result<Vec<EndpointInfo>, DeployError> {
        let listing: Option<EndpointListWire> = self
            .get_opt(&format!("/runtimes/{unit_id}/endpoints"))
            .await?;
        listing
            .map(|l| l.endpoints)
            .ok_or_else(|| DeployError::NotFound(format!("unit {unit_id}")))
    }

    async fn describe_endpoint(
        &self,
        unit_id: &str,
        name: &str,
    ) -> Result<Option<EndpointInfo>, DeployError> {
        self.get_opt(&format!("/runtimes/{unit_id}/endpoints/{name}"))
            .await
    }

    async fn create_unit(
        &self,
        name: &str,
        artifact: &ArtifactReference,
        role_ref: &str,
        config: &RuntimeConfig,
    ) -> Result<CreatedUnit, DeployError> {
        let body = CreateUnitWire {
            name,
            artifact,
            role_ref,
            config,
        };
        self.send_json(reqwest::Method::POST, "/runtimes", &body)
            .await
    }

    async fn update_unit(
        &self,
        unit_id: &str,
        artifact: &ArtifactReference,
    ) -> Result<UpdatedUnit, DeployError> {
        let body = UpdateUnitWire { artifact };
        self.send_json(reqwest::Method::PUT, &format!("/runtimes/{unit_id}"), &body)
            .await
    }

    async fn delete_unit(&self, unit_id: &str) -> Result<(), DeployError> {
        self.delete(&format!("/runtimes/{unit_id}")).await
    }

    async fn create_endpoint(
        &self,
        unit_id: &str,
        name: &str,
        version: u64,
    ) -> Result<EndpointInfo, DeployError> {
        let body = CreateEndpointWire { name, version };
        self.send_json(
            reqwest::Method::POST,
            &format!("/runtimes/{unit_id}/endpoints"),
            &body,
        )
        .await
    }

    async fn update_endpoint(
        &self,
        unit_id: &str,
        name: &str,
        version: u64,
    ) -> Result<RepointedEndpoint, DeployError> {
        let body = UpdateEndpointWire { version };
        self.send_json(
            reqwest::Method::PUT,
            &format!("/runtimes/{unit_id}/endpoints/{name}"),
            &body,
        )
        .await
    }

    async fn delete_endpoint(&self, unit_id: &str, name: &str) -> Result<(), DeployError> {
        self.delete(&format!("/runtimes/{unit_id}/endpoints/{name}"))
            .await
    }
}
