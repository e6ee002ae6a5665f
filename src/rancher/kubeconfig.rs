// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubeconfig generation through the Rancher `generateKubeconfig` action

use crate::constants::GENERATE_KUBECONFIG_ACTION;
use crate::error::Result;
use crate::rancher::client::{Collection, RancherClient};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

#[derive(Deserialize)]
struct GeneratedKubeconfig {
    config: String,
}

/// Generate a kubeconfig for a cluster and write it verbatim to `target`.
///
/// An existing file is overwritten, never merged.
#[instrument(skip(api), fields(target = %target.display()))]
pub async fn generate_kubeconfig(api: &RancherClient, cluster_id: &str, target: &Path) -> Result<()> {
    info!("Generating kubeconfig for cluster {}...", cluster_id);

    let generated: GeneratedKubeconfig = api
        .invoke_action(Collection::Clusters, cluster_id, GENERATE_KUBECONFIG_ACTION)
        .await?;

    tokio::fs::write(target, generated.config.as_bytes()).await?;

    info!("Kubeconfig file generated: {}", target.display());
    Ok(())
}

/// Where the kubeconfig of a cluster goes when several clusters are processed
pub fn kubeconfig_path_for(dir: &Path, prefix: &str, cluster_name: &str) -> PathBuf {
    dir.join(format!("{}{}", prefix, cluster_name))
}
