// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Annotation keys written by Rancher on downstream resources
pub mod annotations {
    /// Binds a namespace to a Rancher project (`<cluster-id>:<project-id>`)
    pub const PROJECT_ID: &str = "field.cattle.io/projectId";
}

/// Timing of remote calls
pub mod timing {
    /// Every request to the Rancher API is bounded by this timeout
    pub const REQUEST_TIMEOUT_SECS: u64 = 10;
    /// Wait after a namespace was created before it is annotated
    pub const NAMESPACE_SETTLE_SECS: u64 = 5;
}

/// Rancher action that returns a kubeconfig for a cluster
pub const GENERATE_KUBECONFIG_ACTION: &str = "generateKubeconfig";

/// Output file used by the single-cluster path when none is given
pub const DEFAULT_KUBECONFIG_FILE: &str = "rancher-projects-kubeconfig";
