// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace management in downstream clusters, through the Rancher proxy

use crate::constants::timing::NAMESPACE_SETTLE_SECS;
use crate::error::{ProvisionError, Result};
use crate::rancher::client::{Collection, CreateOutcome, RancherClient};
use crate::types::{NamespaceBinding, NamespaceResource};
use serde::de::IgnoredAny;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamespaceStatus {
    /// The namespace was already there
    Exists,
    /// The namespace was created and the settle delay has passed
    CreatedAndSettled,
}

/// Make sure a namespace is present in the cluster.
///
/// With `create` set, creation is attempted and a conflict counts as success.
/// A fresh namespace is given a fixed settle delay before anything else touches
/// it. Without `create`, the namespace must already exist.
#[instrument(skip(api))]
pub async fn ensure_namespace(
    api: &RancherClient,
    cluster_id: &str,
    name: &str,
    create: bool,
) -> Result<NamespaceStatus> {
    let kind = Collection::Namespaces { cluster_id };

    if !create {
        info!("Verifying namespace {}...", name);
        return match api.get::<IgnoredAny>(kind, name).await? {
            Some(_) => {
                info!("Successfully found namespace {}", name);
                Ok(NamespaceStatus::Exists)
            }
            None => Err(ProvisionError::NotFound {
                kind: "namespace",
                name: name.to_string(),
            }),
        };
    }

    info!("Creating namespace {}...", name);
    match api
        .create::<IgnoredAny, _>(kind, &NamespaceResource::new(name))
        .await?
    {
        CreateOutcome::Created(_) => {
            info!(
                "Successfully created namespace {}, waiting {} seconds for it to settle...",
                name, NAMESPACE_SETTLE_SECS
            );
            sleep(Duration::from_secs(NAMESPACE_SETTLE_SECS)).await;
            Ok(NamespaceStatus::CreatedAndSettled)
        }
        CreateOutcome::AlreadyExists => {
            info!("Namespace {} already exists", name);
            Ok(NamespaceStatus::Exists)
        }
    }
}

/// Bind a namespace to a project by rewriting its project annotation
#[instrument(skip(api))]
pub async fn assign_namespace_to_project(
    api: &RancherClient,
    cluster_id: &str,
    namespace: &str,
    project_id: &str,
) -> Result<NamespaceBinding> {
    info!("Assigning namespace {} to project {}...", namespace, project_id);
    let kind = Collection::Namespaces { cluster_id };

    let mut resource = fetch_namespace(api, cluster_id, namespace).await?;
    if let Some(previous) = resource.project_id() {
        debug!("Namespace {} was bound to {}", namespace, previous);
    }
    resource.set_project_id(project_id);

    api.update::<IgnoredAny, _>(kind, namespace, &resource).await?;

    info!(
        "Successfully assigned namespace {} to project {}",
        namespace, project_id
    );
    Ok(NamespaceBinding {
        namespace: namespace.to_string(),
        cluster_id: cluster_id.to_string(),
        project_id: project_id.to_string(),
    })
}

/// Re-read a namespace and check it is bound to the expected project
#[instrument(skip(api))]
pub async fn verify_project_assignment(api: &RancherClient, binding: &NamespaceBinding) -> Result<()> {
    info!("Verifying project assignment...");
    let resource = fetch_namespace(api, &binding.cluster_id, &binding.namespace).await?;

    match resource.project_id() {
        Some(actual) if actual == binding.project_id => {
            info!("Successfully verified project assignment");
            Ok(())
        }
        actual => Err(ProvisionError::AssignmentMismatch {
            namespace: binding.namespace.clone(),
            expected: binding.project_id.clone(),
            actual: actual.unwrap_or_default().to_string(),
        }),
    }
}

async fn fetch_namespace(api: &RancherClient, cluster_id: &str, name: &str) -> Result<NamespaceResource> {
    api.get(Collection::Namespaces { cluster_id }, name)
        .await?
        .ok_or_else(|| ProvisionError::NotFound {
            kind: "namespace",
            name: name.to_string(),
        })
}
