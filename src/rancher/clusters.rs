// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster lookup and inventory

use crate::error::Result;
use crate::rancher::client::{Collection, RancherClient};
use crate::rancher::resolve_first;
use crate::types::{ClusterDescriptor, ClusterRecord, ClusterRef};
use tracing::{debug, info, instrument};

/// Enumerate every cluster known to Rancher
#[instrument(skip(api))]
pub async fn list_clusters(api: &RancherClient) -> Result<Vec<ClusterDescriptor>> {
    info!("Getting all clusters...");
    let records: Vec<ClusterRecord> = api.list_all(Collection::Clusters).await?;

    let clusters: Vec<ClusterDescriptor> =
        records.into_iter().map(ClusterDescriptor::from).collect();
    debug!(
        "Clusters: {:?}",
        clusters.iter().map(|c| c.name()).collect::<Vec<_>>()
    );
    Ok(clusters)
}

/// Fetch the current descriptor of a cluster by name
#[instrument(skip(api))]
pub async fn describe_cluster(api: &RancherClient, name: &str) -> Result<ClusterDescriptor> {
    let records: Vec<ClusterRecord> = api.list(Collection::Clusters, &[("name", name)]).await?;
    let record = resolve_first(records, "cluster", name)?;
    Ok(ClusterDescriptor::from(record))
}

/// Resolve a cluster name to its id
pub async fn resolve_cluster(api: &RancherClient, name: &str) -> Result<ClusterRef> {
    let descriptor = describe_cluster(api, name).await?;
    info!("Cluster {} has id {}", name, descriptor.cluster.id);
    Ok(descriptor.cluster)
}
