// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Deciding which clusters a multi-cluster run processes.
//!
//! A label filter matches when the cluster carries **any** of the requested
//! `key=value` pairs, not all of them.

use crate::error::{ProvisionError, Result};
use crate::types::{ClusterDescriptor, ClusterState};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelPair {
    pub key: String,
    pub value: String,
}

impl FromStr for LabelPair {
    type Err = ProvisionError;

    fn from_str(s: &str) -> Result<Self> {
        let pair = s.trim();
        let mut parts = pair.split('=');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(value), None) => Ok(LabelPair {
                key: key.trim().to_string(),
                value: value.trim().to_string(),
            }),
            _ => Err(ProvisionError::Parse(format!(
                "invalid key-value pair '{}', expected key=value",
                pair
            ))),
        }
    }
}

impl fmt::Display for LabelPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// How clusters are picked in a multi-cluster run
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionCriterion {
    ByType(String),
    ByLabelSet(Vec<LabelPair>),
}

impl SelectionCriterion {
    /// Parse a comma-separated list of `key=value` pairs.
    ///
    /// A single malformed pair rejects the whole filter.
    pub fn parse_labels(raw: &str) -> Result<Self> {
        let pairs = raw
            .split(',')
            .map(LabelPair::from_str)
            .collect::<Result<Vec<_>>>()?;
        Ok(SelectionCriterion::ByLabelSet(pairs))
    }

    pub fn matches(&self, descriptor: &ClusterDescriptor) -> bool {
        match self {
            SelectionCriterion::ByType(provider) => matches_type(descriptor, provider),
            SelectionCriterion::ByLabelSet(pairs) => matches_label_set(descriptor, pairs),
        }
    }
}

impl fmt::Display for SelectionCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionCriterion::ByType(provider) => write!(f, "type={}", provider),
            SelectionCriterion::ByLabelSet(pairs) => {
                let pairs: Vec<String> = pairs.iter().map(LabelPair::to_string).collect();
                write!(f, "labels={}", pairs.join(","))
            }
        }
    }
}

/// Exact, case-sensitive comparison of the cluster provider
pub fn matches_type(descriptor: &ClusterDescriptor, wanted_provider: &str) -> bool {
    descriptor.provider == wanted_provider
}

/// True when at least one requested pair is present with an equal value
pub fn matches_label_set(descriptor: &ClusterDescriptor, required: &[LabelPair]) -> bool {
    required
        .iter()
        .any(|pair| descriptor.labels.get(&pair.key) == Some(&pair.value))
}

/// Result of running a cluster through the selection filter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    Selected,
    Inactive(ClusterState),
    NotMatched,
}

/// Decide whether a cluster is processed; inactive clusters never are
pub fn select(descriptor: &ClusterDescriptor, criterion: &SelectionCriterion) -> Selection {
    if !descriptor.is_active() {
        return Selection::Inactive(descriptor.state);
    }
    if criterion.matches(descriptor) {
        Selection::Selected
    } else {
        Selection::NotMatched
    }
}
