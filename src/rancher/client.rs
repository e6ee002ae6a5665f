// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Authenticated access to the Rancher REST API.
//!
//! This is the only place that performs network I/O. Every exchange is bounded
//! by a fixed timeout and is never retried.

use crate::config::{Config, Credentials};
use crate::constants::timing::REQUEST_TIMEOUT_SECS;
use crate::error::{ProvisionError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use http::{header, HeaderValue, Method, Request, StatusCode};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(REQUEST_TIMEOUT_SECS);

/// The entity collections this tool talks to
#[derive(Clone, Copy, Debug)]
pub enum Collection<'a> {
    Clusters,
    Projects,
    /// Namespaces of one downstream cluster, reached through the Rancher proxy
    Namespaces { cluster_id: &'a str },
}

impl Collection<'_> {
    fn path(&self) -> String {
        match self {
            Collection::Clusters => "/v3/clusters".to_string(),
            Collection::Projects => "/v3/projects".to_string(),
            Collection::Namespaces { cluster_id } => {
                format!("/k8s/clusters/{}/v1/namespaces", cluster_id)
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Collection::Clusters => "cluster",
            Collection::Projects => "project",
            Collection::Namespaces { .. } => "namespace",
        }
    }
}

/// Outcome of a creation call
#[derive(Debug)]
pub enum CreateOutcome<T> {
    Created(T),
    /// The server answered 409; the entity already exists
    AlreadyExists,
}

#[derive(Deserialize)]
struct CollectionEnvelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for the Rancher API of one server
#[derive(Clone)]
pub struct RancherClient {
    client: Client,
    server: String,
    authorization: HeaderValue,
}

impl RancherClient {
    /// Create a client for the server and credentials in the configuration
    pub fn new(config: &Config) -> Result<Self> {
        let cluster_url: http::Uri = config
            .server_url
            .parse()
            .map_err(|e| ProvisionError::Config(format!("Invalid server URL: {}", e)))?;

        let mut kube_config = kube::Config::new(cluster_url);
        kube_config.connect_timeout = Some(REQUEST_TIMEOUT);
        kube_config.read_timeout = Some(REQUEST_TIMEOUT);
        kube_config.write_timeout = Some(REQUEST_TIMEOUT);

        let client = Client::try_from(kube_config)?;
        Ok(Self::from_client(client, &config.server_url, &config.credentials))
    }

    /// Wrap an existing transport
    pub fn from_client(client: Client, server: &str, credentials: &Credentials) -> Self {
        let token = STANDARD.encode(format!(
            "{}:{}",
            credentials.access_key,
            credentials.secret_key()
        ));
        let mut authorization = HeaderValue::from_str(&format!("Basic {}", token))
            .unwrap_or_else(|_| HeaderValue::from_static(""));
        authorization.set_sensitive(true);

        Self {
            client,
            server: server.trim_end_matches('/').to_string(),
            authorization,
        }
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    /// Check that the credentials are accepted by the server
    #[instrument(skip(self), fields(server = %self.server))]
    pub async fn verify_access(&self) -> Result<()> {
        info!("Verifying access to Rancher server...");
        match self.execute(Method::GET, "/v3/", None).await {
            Ok((StatusCode::OK, _)) => {
                info!("Successfully authenticated to {}", self.server);
                Ok(())
            }
            Ok((status, _)) => Err(ProvisionError::Auth {
                server: self.server.clone(),
                status: status.as_u16(),
            }),
            Err(e) => Err(e),
        }
    }

    /// List a collection, filtered by the given query parameters
    #[instrument(skip(self), fields(kind = kind.kind()))]
    pub async fn list<T: DeserializeOwned>(
        &self,
        kind: Collection<'_>,
        filter: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let uri = with_query(&kind.path(), filter);
        let (status, body) = self.execute(Method::GET, &uri, None).await?;

        match status {
            StatusCode::OK => {
                let envelope: CollectionEnvelope<T> = decode(&body, kind.kind())?;
                debug!("Listed {} {} records", envelope.data.len(), kind.kind());
                Ok(envelope.data)
            }
            StatusCode::NOT_FOUND => Ok(Vec::new()),
            status => Err(unexpected(&uri, status, &body)),
        }
    }

    /// Enumerate a whole collection; unlike [`RancherClient::list`], a 404 is an error
    #[instrument(skip(self), fields(kind = kind.kind()))]
    pub async fn list_all<T: DeserializeOwned>(&self, kind: Collection<'_>) -> Result<Vec<T>> {
        let uri = kind.path();
        let (status, body) = self.execute(Method::GET, &uri, None).await?;

        match status {
            StatusCode::OK => {
                let envelope: CollectionEnvelope<T> = decode(&body, kind.kind())?;
                debug!("Listed {} {} records", envelope.data.len(), kind.kind());
                Ok(envelope.data)
            }
            status => Err(unexpected(&uri, status, &body)),
        }
    }

    /// Fetch one entity by id, `None` if the server does not know it
    #[instrument(skip(self), fields(kind = kind.kind()))]
    pub async fn get<T: DeserializeOwned>(&self, kind: Collection<'_>, id: &str) -> Result<Option<T>> {
        let uri = format!("{}/{}", kind.path(), id);
        let (status, body) = self.execute(Method::GET, &uri, None).await?;

        match status {
            StatusCode::OK => Ok(Some(decode(&body, kind.kind())?)),
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(unexpected(&uri, status, &body)),
        }
    }

    /// Create an entity; a conflict is reported as [`CreateOutcome::AlreadyExists`]
    #[instrument(skip(self, payload), fields(kind = kind.kind()))]
    pub async fn create<T: DeserializeOwned, P: Serialize>(
        &self,
        kind: Collection<'_>,
        payload: &P,
    ) -> Result<CreateOutcome<T>> {
        let uri = kind.path();
        let body = serde_json::to_vec(payload)?;
        let (status, body) = self.execute(Method::POST, &uri, Some(body)).await?;

        match status {
            StatusCode::OK | StatusCode::CREATED => {
                Ok(CreateOutcome::Created(decode(&body, kind.kind())?))
            }
            StatusCode::CONFLICT => Ok(CreateOutcome::AlreadyExists),
            status => Err(unexpected(&uri, status, &body)),
        }
    }

    /// Replace an entity with the given representation
    #[instrument(skip(self, payload), fields(kind = kind.kind()))]
    pub async fn update<T: DeserializeOwned, P: Serialize>(
        &self,
        kind: Collection<'_>,
        id: &str,
        payload: &P,
    ) -> Result<T> {
        let uri = format!("{}/{}", kind.path(), id);
        let body = serde_json::to_vec(payload)?;
        let (status, body) = self.execute(Method::PUT, &uri, Some(body)).await?;

        match status {
            StatusCode::OK => decode(&body, kind.kind()),
            status => Err(unexpected(&uri, status, &body)),
        }
    }

    /// Invoke a Rancher action on an entity and decode its output
    #[instrument(skip(self), fields(kind = kind.kind()))]
    pub async fn invoke_action<T: DeserializeOwned>(
        &self,
        kind: Collection<'_>,
        id: &str,
        action: &str,
    ) -> Result<T> {
        let uri = with_query(&format!("{}/{}", kind.path(), id), &[("action", action)]);
        let (status, body) = self.execute(Method::POST, &uri, None).await?;

        match status {
            StatusCode::OK | StatusCode::CREATED => decode(&body, action),
            status => Err(unexpected(&uri, status, &body)),
        }
    }

    async fn execute(
        &self,
        method: Method,
        uri: &str,
        body: Option<Vec<u8>>,
    ) -> Result<(StatusCode, Bytes)> {
        debug!("{} {}", method, uri);

        let request = Request::builder()
            .method(method.clone())
            .uri(uri)
            .header(header::AUTHORIZATION, self.authorization.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .body(Body::from(body.unwrap_or_default()))
            .map_err(|e| ProvisionError::Transport(format!("Failed to build request: {}", e)))?;

        let exchange = async {
            let response = self.client.send(request).await?;
            let status = response.status();
            let bytes = response
                .into_body()
                .collect()
                .await
                .map_err(|e| ProvisionError::Transport(format!("Failed to read body: {}", e)))?
                .to_bytes();
            Ok::<_, ProvisionError>((status, bytes))
        };

        let (status, bytes) = tokio::time::timeout(REQUEST_TIMEOUT, exchange)
            .await
            .map_err(|_| {
                ProvisionError::Transport(format!(
                    "{} {} timed out after {}s",
                    method, uri, REQUEST_TIMEOUT_SECS
                ))
            })??;

        debug!("{} {} -> {}", method, uri, status.as_u16());
        Ok((status, bytes))
    }
}

fn with_query(path: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    format!("{}?{}", path, query)
}

fn decode<T: DeserializeOwned>(body: &[u8], what: &str) -> Result<T> {
    serde_json::from_slice(body)
        .map_err(|e| ProvisionError::Parse(format!("Failed to decode {} response: {}", what, e)))
}

fn unexpected(resource: &str, status: StatusCode, body: &[u8]) -> ProvisionError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string()
        });

    ProvisionError::UnexpectedStatus {
        resource: resource.to_string(),
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{cluster_json, collection_json, error_json, MockService};
    use crate::types::ClusterRecord;

    #[test]
    fn test_with_query_encodes_values() {
        assert_eq!(
            with_query("/v3/projects", &[("clusterId", "c-001"), ("name", "my project")]),
            "/v3/projects?clusterId=c-001&name=my+project"
        );
        assert_eq!(with_query("/v3/clusters", &[]), "/v3/clusters");
    }

    #[test]
    fn test_namespace_collection_path() {
        let kind = Collection::Namespaces { cluster_id: "c-001" };
        assert_eq!(kind.path(), "/k8s/clusters/c-001/v1/namespaces");
        assert_eq!(kind.kind(), "namespace");
    }

    #[tokio::test]
    async fn test_requests_carry_basic_auth() {
        let mock = MockService::new().on_get("/v3/", 200, "{}");
        let api = mock.clone().into_rancher();

        api.verify_access().await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        // base64("token-abcde:secret")
        assert_eq!(
            requests[0].authorization.as_deref(),
            Some("Basic dG9rZW4tYWJjZGU6c2VjcmV0")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_response_times_out() {
        let mock = MockService::new()
            .on_get("/v3/", 200, "{}")
            .with_delay(Duration::from_secs(REQUEST_TIMEOUT_SECS * 3));
        let api = mock.clone().into_rancher();
        let started = tokio::time::Instant::now();

        let err = api.verify_access().await.unwrap_err();

        assert!(matches!(err, ProvisionError::Transport(_)), "got {:?}", err);
        assert_eq!(err.status(), None);
        assert!(started.elapsed() >= REQUEST_TIMEOUT);
        assert!(started.elapsed() < Duration::from_secs(REQUEST_TIMEOUT_SECS * 3));
        // never retried
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_verify_access_rejected() {
        let mock = MockService::new().on_get("/v3/", 401, &error_json(401, "Unauthorized"));
        let api = mock.into_rancher();

        let err = api.verify_access().await.unwrap_err();
        assert!(matches!(err, ProvisionError::Auth { status: 401, .. }));
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn test_list_filters_by_query() {
        let mock = MockService::new().on_get(
            "/v3/clusters?name=prod-a",
            200,
            &collection_json(&[cluster_json("prod-a", "c-001", "rke2", "active")]),
        );
        let api = mock.clone().into_rancher();

        let clusters: Vec<ClusterRecord> = api
            .list(Collection::Clusters, &[("name", "prod-a")])
            .await
            .unwrap();

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].id, "c-001");
        assert_eq!(mock.requests()[0].path_and_query(), "/v3/clusters?name=prod-a");
    }

    #[tokio::test]
    async fn test_list_not_found_is_empty() {
        let api = MockService::new().into_rancher();

        let projects: Vec<serde_json::Value> =
            api.list(Collection::Projects, &[("name", "x")]).await.unwrap();
        assert!(projects.is_empty());
    }

    #[tokio::test]
    async fn test_list_all_not_found_is_an_error() {
        let api = MockService::new()
            .on_get("/v3/clusters", 404, &error_json(404, "not found"))
            .into_rancher();

        let err = api
            .list_all::<ClusterRecord>(Collection::Clusters)
            .await
            .unwrap_err();
        assert!(matches!(err, ProvisionError::UnexpectedStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_list_undecodable_body() {
        let api = MockService::new()
            .on_get("/v3/clusters", 200, "<html>oops</html>")
            .into_rancher();

        let err = api
            .list::<ClusterRecord>(Collection::Clusters, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ProvisionError::Parse(_)));
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let api = MockService::new().into_rancher();

        let ns: Option<serde_json::Value> = api
            .get(Collection::Namespaces { cluster_id: "c-001" }, "absent")
            .await
            .unwrap();
        assert!(ns.is_none());
    }

    #[tokio::test]
    async fn test_create_conflict_is_not_an_error() {
        let api = MockService::new()
            .on_post("/v3/projects", 409, &error_json(409, "already exists"))
            .into_rancher();

        let outcome: CreateOutcome<serde_json::Value> = api
            .create(Collection::Projects, &serde_json::json!({"name": "dup"}))
            .await
            .unwrap();
        assert!(matches!(outcome, CreateOutcome::AlreadyExists));
    }

    #[tokio::test]
    async fn test_unexpected_status_carries_message() {
        let api = MockService::new()
            .on_post("/v3/projects", 403, &error_json(403, "permission denied"))
            .into_rancher();

        let err = api
            .create::<serde_json::Value, _>(Collection::Projects, &serde_json::json!({}))
            .await
            .unwrap_err();

        match err {
            ProvisionError::UnexpectedStatus {
                status, message, ..
            } => {
                assert_eq!(status, 403);
                assert_eq!(message, "permission denied");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invoke_action_uses_action_query() {
        let mock = MockService::new().on_post(
            "/v3/clusters/c-001?action=generateKubeconfig",
            200,
            r#"{"config":"apiVersion: v1"}"#,
        );
        let api = mock.clone().into_rancher();

        let out: serde_json::Value = api
            .invoke_action(Collection::Clusters, "c-001", "generateKubeconfig")
            .await
            .unwrap();

        assert_eq!(out["config"], "apiVersion: v1");
        assert_eq!(mock.requests()[0].method, "POST");
    }
}
