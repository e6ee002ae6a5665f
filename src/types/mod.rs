// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Rancher entities as seen by this tool.

pub mod cluster;
pub mod namespace;
pub mod project;

pub use cluster::{ClusterDescriptor, ClusterRecord, ClusterRef, ClusterState};
pub use namespace::{NamespaceBinding, NamespaceResource};
pub use project::{NewProject, ProjectRecord, ProjectRef};
