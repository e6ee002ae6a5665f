// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use serde::{Deserialize, Serialize};

/// A project as returned by the Rancher `/v3/projects` collection
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cluster_id: Option<String>,
}

/// A project scoped to exactly one cluster
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectRef {
    pub name: String,
    pub id: String,
    pub cluster_id: String,
}

impl ProjectRef {
    /// Build a reference from an API record, falling back to the cluster the lookup was scoped to
    pub fn from_record(record: ProjectRecord, cluster_id: &str) -> Self {
        ProjectRef {
            name: record.name,
            id: record.id,
            cluster_id: record.cluster_id.unwrap_or_else(|| cluster_id.to_string()),
        }
    }
}

/// Body of a project creation request
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NewProject<'a> {
    #[serde(rename = "type")]
    pub type_: &'static str,
    pub name: &'a str,
    pub cluster_id: &'a str,
}

impl<'a> NewProject<'a> {
    pub fn new(name: &'a str, cluster_id: &'a str) -> Self {
        NewProject {
            type_: "project",
            name,
            cluster_id,
        }
    }
}
