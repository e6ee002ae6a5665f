// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::annotations;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A namespace as served by the Rancher proxy at `/k8s/clusters/<id>/v1/namespaces`.
///
/// Top-level fields other than `type` and `metadata` are carried through
/// untouched. `metadata` goes through `ObjectMeta`, so Rancher-only metadata
/// keys such as `state`, `fields` or `relationships` are dropped on update;
/// the server ignores them on a PUT.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NamespaceResource {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NamespaceResource {
    /// Body of a namespace creation request
    pub fn new(name: &str) -> Self {
        NamespaceResource {
            type_: Some("namespace".to_string()),
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            extra: Map::new(),
        }
    }

    /// Project the namespace is currently bound to
    pub fn project_id(&self) -> Option<&str> {
        self.metadata
            .annotations
            .as_ref()
            .and_then(|a| a.get(annotations::PROJECT_ID))
            .map(String::as_str)
    }

    pub fn set_project_id(&mut self, project_id: &str) {
        self.metadata
            .annotations
            .get_or_insert_with(Default::default)
            .insert(annotations::PROJECT_ID.to_string(), project_id.to_string());
    }
}

/// Assignment of a namespace to a project, as recorded on the namespace
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceBinding {
    pub namespace: String,
    pub cluster_id: String,
    pub project_id: String,
}
