// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking the Rancher API.

use crate::config::Credentials;
use crate::rancher::RancherClient;
use http::{Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::Client;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::Instant;
use tower::Service;

type Key = (String, String);

/// A request as it reached the mock
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
    pub at: Instant,
}

impl RecordedRequest {
    pub fn path_and_query(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{}", self.path, q),
            None => self.path.clone(),
        }
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// A mock HTTP service that returns predefined responses based on method and path.
///
/// Responses are looked up by the exact path including the query string first,
/// then by the bare path. Several responses registered for the same key are
/// served in order; the last one keeps being served once the others are used up.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<Key, VecDeque<(u16, String)>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    delay: Option<Duration>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Hold every response back for `delay` after the request was recorded
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back((status, body.to_string()));
        self
    }

    /// Add a response for GET requests matching the path (optionally with query)
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for POST requests matching the path (optionally with query)
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    /// Add a response for PUT requests matching the path
    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PUT", path, status, body)
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    /// Build a Rancher API client backed by this mock service
    pub fn into_rancher(self) -> RancherClient {
        let credentials = Credentials::new("token-abcde", "secret");
        RancherClient::from_client(self.into_client(), "https://rancher.test", &credentials)
    }

    /// All requests received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests received for a method whose path starts with `prefix`
    pub fn requests_to(&self, method: &str, prefix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path.starts_with(prefix))
            .collect()
    }

    fn find_response(&self, method: &str, path: &str, query: Option<&str>) -> Option<(u16, String)> {
        let mut responses = self.responses.lock().unwrap();

        let mut keys = Vec::with_capacity(2);
        if let Some(q) = query {
            keys.push((method.to_string(), format!("{}?{}", path, q)));
        }
        keys.push((method.to_string(), path.to_string()));

        for key in keys {
            if let Some(queue) = responses.get_mut(&key) {
                if queue.len() > 1 {
                    return queue.pop_front();
                }
                return queue.front().cloned();
            }
        }

        None
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let query = req.uri().query().map(str::to_string);
        let authorization = req
            .headers()
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let response = self.find_response(&method, &path, query.as_deref());
        let requests = self.requests.clone();
        let delay = self.delay;

        Box::pin(async move {
            let body = req.into_body().collect().await?.to_bytes();
            requests.lock().unwrap().push(RecordedRequest {
                method,
                path,
                query,
                authorization,
                body: String::from_utf8_lossy(&body).into_owned(),
                at: Instant::now(),
            });

            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            let (status, body) = response.unwrap_or_else(|| {
                // Default 404 for unmatched requests
                (404, not_found_json())
            });

            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// A Rancher collection envelope around the given items
pub fn collection_json(items: &[serde_json::Value]) -> String {
    serde_json::json!({
        "type": "collection",
        "data": items,
    })
    .to_string()
}

/// A Rancher cluster record
pub fn cluster_json(name: &str, id: &str, provider: &str, state: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "type": "cluster",
        "provider": provider,
        "state": state,
        "labels": {},
    })
}

/// A Rancher cluster record carrying labels
pub fn labeled_cluster_json(
    name: &str,
    id: &str,
    state: &str,
    labels: &[(&str, &str)],
) -> serde_json::Value {
    let labels: serde_json::Map<String, serde_json::Value> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::from(*v)))
        .collect();
    serde_json::json!({
        "id": id,
        "name": name,
        "type": "cluster",
        "provider": "rke2",
        "state": state,
        "labels": labels,
    })
}

/// A Rancher project record
pub fn project_json(name: &str, id: &str, cluster_id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "type": "project",
        "clusterId": cluster_id,
    })
}

/// A namespace as served by the Rancher proxy, optionally bound to a project
pub fn namespace_json(name: &str, project_id: Option<&str>) -> String {
    let mut annotations = serde_json::Map::new();
    if let Some(id) = project_id {
        annotations.insert(
            crate::constants::annotations::PROJECT_ID.to_string(),
            serde_json::Value::from(id),
        );
    }
    serde_json::json!({
        "id": name,
        "type": "namespace",
        "metadata": {
            "name": name,
            "uid": "test-uid",
            "resourceVersion": "1",
            "annotations": annotations,
        },
        "spec": {"finalizers": ["kubernetes"]},
    })
    .to_string()
}

/// Response of the `generateKubeconfig` action
pub fn kubeconfig_json(config: &str) -> String {
    serde_json::json!({
        "type": "generateKubeConfigOutput",
        "config": config,
    })
    .to_string()
}

/// A Rancher API error body
pub fn error_json(status: u16, message: &str) -> String {
    serde_json::json!({
        "type": "error",
        "status": status,
        "code": "Error",
        "message": message,
    })
    .to_string()
}

fn not_found_json() -> String {
    error_json(404, "not found")
}

/// A unique scratch directory for tests that write files
pub fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "rancher-projects-{}-{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
