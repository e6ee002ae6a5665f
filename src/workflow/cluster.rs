// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The ordered steps applied to one cluster.
//!
//! `VerifyCluster -> ResolveOrCreateProject -> EnsureNamespace ->
//! AssignNamespaceToProject -> VerifyAssignment -> GenerateCredential`, where the
//! project steps only run when a project is requested and the credential step
//! only when a kubeconfig is requested. Nothing is rolled back when a later step
//! fails.

use crate::config::SingleClusterOptions;
use crate::error::Result;
use crate::rancher::{
    assign_namespace_to_project, ensure_namespace, ensure_project, generate_kubeconfig,
    resolve_cluster, resolve_project, verify_project_assignment, NamespaceStatus, RancherClient,
};
use crate::types::{ClusterRef, NamespaceBinding, ProjectRef};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkflowStep {
    VerifyCluster,
    ResolveOrCreateProject,
    EnsureNamespace,
    AssignNamespaceToProject,
    VerifyAssignment,
    GenerateCredential,
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkflowStep::VerifyCluster => "verify cluster",
            WorkflowStep::ResolveOrCreateProject => "resolve or create project",
            WorkflowStep::EnsureNamespace => "ensure namespace",
            WorkflowStep::AssignNamespaceToProject => "assign namespace to project",
            WorkflowStep::VerifyAssignment => "verify assignment",
            WorkflowStep::GenerateCredential => "generate kubeconfig",
        };
        f.write_str(s)
    }
}

/// What a completed workflow did to a cluster
#[derive(Clone, Debug)]
pub struct WorkflowOutcome {
    pub cluster: ClusterRef,
    pub project: Option<ProjectRef>,
    pub namespace: Option<NamespaceStatus>,
    pub binding: Option<NamespaceBinding>,
    pub kubeconfig: Option<PathBuf>,
    /// Steps executed, in order
    pub steps: Vec<WorkflowStep>,
}

impl WorkflowOutcome {
    fn new(cluster: ClusterRef) -> Self {
        WorkflowOutcome {
            cluster,
            project: None,
            namespace: None,
            binding: None,
            kubeconfig: None,
            steps: vec![WorkflowStep::VerifyCluster],
        }
    }
}

/// Workflow for one named cluster
pub struct ClusterWorkflow<'a> {
    api: &'a RancherClient,
    options: &'a SingleClusterOptions,
}

impl<'a> ClusterWorkflow<'a> {
    pub fn new(api: &'a RancherClient, options: &'a SingleClusterOptions) -> Self {
        Self { api, options }
    }

    /// Run every requested step; the first failing step ends the workflow
    #[instrument(skip(self), fields(cluster = %self.options.cluster_name))]
    pub async fn run(&self) -> Result<WorkflowOutcome> {
        let mut current = WorkflowStep::VerifyCluster;
        let result = self.execute(&mut current).await;
        if let Err(e) = &result {
            error!(
                "Cluster {} stopped at step '{}': {}",
                self.options.cluster_name, current, e
            );
        }
        result
    }

    async fn execute(&self, current: &mut WorkflowStep) -> Result<WorkflowOutcome> {
        info!("Verifying cluster {}...", self.options.cluster_name);
        let cluster = resolve_cluster(self.api, &self.options.cluster_name).await?;
        let mut outcome = WorkflowOutcome::new(cluster);

        if let Some(project) = &self.options.project {
            let cluster_id = outcome.cluster.id.clone();

            *current = WorkflowStep::ResolveOrCreateProject;
            outcome.steps.push(*current);
            let resolved = if project.create_project {
                ensure_project(self.api, &cluster_id, &project.name).await?
            } else {
                resolve_project(self.api, &cluster_id, &project.name).await?
            };

            *current = WorkflowStep::EnsureNamespace;
            outcome.steps.push(*current);
            outcome.namespace = Some(
                ensure_namespace(
                    self.api,
                    &cluster_id,
                    &project.namespace,
                    project.create_namespace,
                )
                .await?,
            );

            *current = WorkflowStep::AssignNamespaceToProject;
            outcome.steps.push(*current);
            let binding =
                assign_namespace_to_project(self.api, &cluster_id, &project.namespace, &resolved.id)
                    .await?;

            *current = WorkflowStep::VerifyAssignment;
            outcome.steps.push(*current);
            verify_project_assignment(self.api, &binding).await?;

            outcome.project = Some(resolved);
            outcome.binding = Some(binding);
        }

        if let Some(target) = &self.options.kubeconfig {
            *current = WorkflowStep::GenerateCredential;
            outcome.steps.push(*current);
            generate_kubeconfig(self.api, &outcome.cluster.id, target).await?;
            outcome.kubeconfig = Some(target.clone());
        }

        info!("Finished cluster {}", outcome.cluster.name);
        Ok(outcome)
    }
}

/// Credential-only path used for clusters picked by a multi-cluster run
pub async fn run_credential_only(
    api: &RancherClient,
    cluster: &ClusterRef,
    target: &Path,
) -> Result<WorkflowOutcome> {
    let mut outcome = WorkflowOutcome::new(cluster.clone());

    outcome.steps.push(WorkflowStep::GenerateCredential);
    generate_kubeconfig(api, &cluster.id, target).await?;
    outcome.kubeconfig = Some(target.to_path_buf());

    Ok(outcome)
}
