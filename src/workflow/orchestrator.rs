// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Multi-cluster runs: enumerate, select, and generate a kubeconfig per match.
//!
//! Failures while handling one cluster are logged and recorded, the run moves
//! on to the next cluster. Only enumeration and setup failures end the run.

use crate::config::MultiClusterOptions;
use crate::error::Result;
use crate::rancher::kubeconfig::kubeconfig_path_for;
use crate::rancher::{describe_cluster, list_clusters, RancherClient};
use crate::selection::{select, Selection};
use crate::types::ClusterDescriptor;
use crate::workflow::cluster::run_credential_only;
use std::path::PathBuf;
use tracing::{error, info, instrument};

/// What happened to one cluster of the inventory
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClusterResult {
    KubeconfigWritten(PathBuf),
    Skipped(Selection),
    Failed(String),
}

#[derive(Clone, Debug)]
pub struct ClusterReport {
    pub cluster: String,
    pub result: ClusterResult,
}

/// Per-cluster results of a multi-cluster run, in inventory order
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    pub clusters: Vec<ClusterReport>,
}

impl RunSummary {
    pub fn written(&self) -> usize {
        self.count(|r| matches!(r, ClusterResult::KubeconfigWritten(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|r| matches!(r, ClusterResult::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|r| matches!(r, ClusterResult::Failed(_)))
    }

    fn count(&self, f: impl Fn(&ClusterResult) -> bool) -> usize {
        self.clusters.iter().filter(|c| f(&c.result)).count()
    }
}

pub struct MultiClusterOrchestrator<'a> {
    api: &'a RancherClient,
    options: &'a MultiClusterOptions,
}

impl<'a> MultiClusterOrchestrator<'a> {
    pub fn new(api: &'a RancherClient, options: &'a MultiClusterOptions) -> Self {
        Self { api, options }
    }

    /// Process the whole inventory, one cluster at a time
    #[instrument(skip(self), fields(criterion = %self.options.criterion))]
    pub async fn run(&self) -> Result<RunSummary> {
        tokio::fs::create_dir_all(&self.options.kubeconfig_dir).await?;

        let inventory = list_clusters(self.api).await?;
        info!(
            "Found {} clusters, selecting by {}",
            inventory.len(),
            self.options.criterion
        );

        let mut summary = RunSummary::default();
        for listed in &inventory {
            let result = self.process(listed).await;
            summary.clusters.push(ClusterReport {
                cluster: listed.name().to_string(),
                result,
            });
        }

        info!(
            "Run complete: {} kubeconfigs written, {} clusters skipped, {} clusters failed",
            summary.written(),
            summary.skipped(),
            summary.failed()
        );
        Ok(summary)
    }

    #[instrument(skip(self, listed), fields(cluster = %listed.name()))]
    async fn process(&self, listed: &ClusterDescriptor) -> ClusterResult {
        info!("Checking if cluster {} is active...", listed.name());
        let current = match describe_cluster(self.api, listed.name()).await {
            Ok(descriptor) => descriptor,
            Err(e) => {
                error!("Failed to check if cluster {} is active: {}", listed.name(), e);
                return ClusterResult::Failed(e.to_string());
            }
        };

        match select(&current, &self.options.criterion) {
            Selection::Inactive(state) => {
                info!(
                    "Skipping cluster {} because it is not active ({})",
                    current.name(),
                    state
                );
                ClusterResult::Skipped(Selection::Inactive(state))
            }
            Selection::NotMatched => {
                info!(
                    "Cluster {} does not match {}",
                    current.name(),
                    self.options.criterion
                );
                ClusterResult::Skipped(Selection::NotMatched)
            }
            Selection::Selected => {
                info!("Cluster {} matches {}", current.name(), self.options.criterion);
                let target = kubeconfig_path_for(
                    &self.options.kubeconfig_dir,
                    &self.options.kubeconfig_prefix,
                    current.name(),
                );
                match run_credential_only(self.api, &current.cluster, &target).await {
                    Ok(_) => ClusterResult::KubeconfigWritten(target),
                    Err(e) => {
                        error!(
                            "Failed to generate kubeconfig for cluster {}: {}",
                            current.name(),
                            e
                        );
                        ClusterResult::Failed(e.to_string())
                    }
                }
            }
        }
    }
}
