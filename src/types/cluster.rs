// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// A cluster as returned by the Rancher `/v3/clusters` collection
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub state: Option<String>,
}

/// Name and opaque id of a cluster known to Rancher
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterRef {
    pub name: String,
    pub id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClusterState {
    Active,
    Inactive,
    Unknown,
}

impl ClusterState {
    /// Derive the state from the `state` field Rancher reports
    pub fn from_reported(state: Option<&str>) -> Self {
        match state.map(str::trim) {
            None | Some("") => ClusterState::Unknown,
            Some(s) if s.eq_ignore_ascii_case("active") => ClusterState::Active,
            Some(_) => ClusterState::Inactive,
        }
    }
}

impl fmt::Display for ClusterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClusterState::Active => "active",
            ClusterState::Inactive => "inactive",
            ClusterState::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Everything the selection filter needs to know about a cluster
#[derive(Clone, Debug)]
pub struct ClusterDescriptor {
    pub cluster: ClusterRef,
    pub provider: String,
    pub labels: BTreeMap<String, String>,
    pub state: ClusterState,
}

impl ClusterDescriptor {
    pub fn name(&self) -> &str {
        &self.cluster.name
    }

    pub fn is_active(&self) -> bool {
        self.state == ClusterState::Active
    }
}

impl From<ClusterRecord> for ClusterDescriptor {
    fn from(record: ClusterRecord) -> Self {
        let state = ClusterState::from_reported(record.state.as_deref());
        ClusterDescriptor {
            cluster: ClusterRef {
                name: record.name,
                id: record.id,
            },
            provider: record.provider.unwrap_or_default(),
            labels: record.labels.unwrap_or_default(),
            state,
        }
    }
}
