// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Rancher API access, entity resolution and kubeconfig generation.

pub mod client;
pub mod clusters;
pub mod kubeconfig;
pub mod namespaces;
pub mod projects;

pub use client::{Collection, CreateOutcome, RancherClient};
pub use clusters::{describe_cluster, list_clusters, resolve_cluster};
pub use kubeconfig::generate_kubeconfig;
pub use namespaces::{
    assign_namespace_to_project, ensure_namespace, verify_project_assignment, NamespaceStatus,
};
pub use projects::{ensure_project, find_project, resolve_project};

use crate::error::{ProvisionError, Result};
use tracing::warn;

/// Pick the first record of a lookup by name.
///
/// Rancher filters are not unique constraints; when several records match, the
/// first one in server order wins and the ambiguity is only logged.
pub(crate) fn resolve_first<T>(records: Vec<T>, kind: &'static str, name: &str) -> Result<T> {
    let count = records.len();
    if count > 1 {
        warn!(
            "{} {} records match name '{}', using the first one",
            count, kind, name
        );
    }

    records
        .into_iter()
        .next()
        .ok_or_else(|| ProvisionError::NotFound {
            kind,
            name: name.to_string(),
        })
}
