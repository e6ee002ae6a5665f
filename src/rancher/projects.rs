// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Project lookup and creation

use crate::error::{ProvisionError, Result};
use crate::rancher::client::{Collection, CreateOutcome, RancherClient};
use crate::rancher::resolve_first;
use crate::types::{NewProject, ProjectRecord, ProjectRef};
use tracing::{info, instrument};

/// Look up a project by name within a cluster
#[instrument(skip(api))]
pub async fn find_project(
    api: &RancherClient,
    cluster_id: &str,
    name: &str,
) -> Result<Option<ProjectRef>> {
    let records: Vec<ProjectRecord> = api
        .list(Collection::Projects, &[("clusterId", cluster_id), ("name", name)])
        .await?;

    if records.is_empty() {
        return Ok(None);
    }
    let record = resolve_first(records, "project", name)?;
    Ok(Some(ProjectRef::from_record(record, cluster_id)))
}

/// Resolve a project name to its id, failing if it does not exist
pub async fn resolve_project(api: &RancherClient, cluster_id: &str, name: &str) -> Result<ProjectRef> {
    let project = find_project(api, cluster_id, name)
        .await?
        .ok_or_else(|| ProvisionError::NotFound {
            kind: "project",
            name: name.to_string(),
        })?;

    info!("Project {} has id {}", name, project.id);
    Ok(project)
}

/// Resolve a project, creating it when it does not exist yet.
///
/// The creation response is authoritative. Only a conflict (someone created the
/// project in between) triggers another lookup.
#[instrument(skip(api))]
pub async fn ensure_project(api: &RancherClient, cluster_id: &str, name: &str) -> Result<ProjectRef> {
    info!("Checking if project {} exists...", name);
    if let Some(project) = find_project(api, cluster_id, name).await? {
        info!("Project {} already exists", name);
        return Ok(project);
    }

    info!("Creating project {}...", name);
    let outcome: CreateOutcome<ProjectRecord> = api
        .create(Collection::Projects, &NewProject::new(name, cluster_id))
        .await?;

    match outcome {
        CreateOutcome::Created(record) => {
            info!("Successfully created project {} ({})", name, record.id);
            Ok(ProjectRef::from_record(record, cluster_id))
        }
        CreateOutcome::AlreadyExists => {
            info!("Project {} was created concurrently, resolving it", name);
            resolve_project(api, cluster_id, name).await
        }
    }
}
