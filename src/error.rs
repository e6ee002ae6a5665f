// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to authenticate to {server} (status {status})")]
    Auth { server: String, status: u16 },

    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error(
        "Namespace {namespace} is assigned to project '{actual}' instead of '{expected}'"
    )]
    AssignmentMismatch {
        namespace: String,
        expected: String,
        actual: String,
    },

    #[error("Unexpected status {status} for {resource}: {message}")]
    UnexpectedStatus {
        resource: String,
        status: u16,
        message: String,
    },

    #[error("Failed to write kubeconfig: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ProvisionError {
    /// The HTTP status carried by this error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ProvisionError::Auth { status, .. } | ProvisionError::UnexpectedStatus { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

impl From<kube::Error> for ProvisionError {
    fn from(e: kube::Error) -> Self {
        ProvisionError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for ProvisionError {
    fn from(e: serde_json::Error) -> Self {
        ProvisionError::Parse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
