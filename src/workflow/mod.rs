// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Entry point of a run: authenticate, then hand off to the single-cluster
//! workflow or the multi-cluster orchestrator.

pub mod cluster;
pub mod orchestrator;

pub use cluster::{run_credential_only, ClusterWorkflow, WorkflowOutcome, WorkflowStep};
pub use orchestrator::{ClusterReport, ClusterResult, MultiClusterOrchestrator, RunSummary};

use crate::config::{Config, RunMode};
use crate::error::Result;
use crate::rancher::RancherClient;

/// Result of a complete invocation
#[derive(Clone, Debug)]
pub enum RunReport {
    Single(WorkflowOutcome),
    Multi(RunSummary),
}

/// Run the mode selected by `config` against an already built client
pub async fn run(api: &RancherClient, config: &Config) -> Result<RunReport> {
    api.verify_access().await?;

    match &config.mode {
        RunMode::Single(options) => {
            let outcome = ClusterWorkflow::new(api, options).run().await?;
            Ok(RunReport::Single(outcome))
        }
        RunMode::Multi(options) => {
            let summary = MultiClusterOrchestrator::new(api, options).run().await?;
            Ok(RunReport::Multi(summary))
        }
    }
}
