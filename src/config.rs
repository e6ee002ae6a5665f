// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::DEFAULT_KUBECONFIG_FILE;
use crate::error::ProvisionError;
use crate::selection::SelectionCriterion;
use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;

/// Command line and environment options
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "rancher-projects",
    version,
    about = "Manage Rancher projects, namespaces and kubeconfigs"
)]
pub struct Args {
    /// Rancher server URL
    #[arg(long = "rancher-server", env = "RANCHER_SERVER")]
    pub rancher_server: Option<String>,

    /// Rancher API access key
    #[arg(long = "rancher-access-key", env = "RANCHER_ACCESS_KEY")]
    pub rancher_access_key: Option<String>,

    /// Rancher API secret key
    #[arg(long = "rancher-secret-key", env = "RANCHER_SECRET_KEY", hide_env_values = true)]
    pub rancher_secret_key: Option<String>,

    /// Name of the cluster to work on
    #[arg(long = "cluster-name", env = "CLUSTER_NAME")]
    pub cluster_name: Option<String>,

    /// Project to verify or create in the cluster
    #[arg(long = "project-name", env = "PROJECT_NAME")]
    pub project_name: Option<String>,

    /// Namespace to bind to the project (defaults to the project name)
    #[arg(long, env = "NAMESPACE")]
    pub namespace: Option<String>,

    /// Create the project when it does not exist
    #[arg(long = "create-project", env = "CREATE_PROJECT")]
    pub create_project: bool,

    /// Create the namespace when it does not exist
    #[arg(long = "create-namespace", env = "CREATE_NAMESPACE")]
    pub create_namespace: bool,

    /// Generate a kubeconfig for the cluster
    #[arg(long = "create-kubeconfig", env = "CREATE_KUBECONFIG")]
    pub create_kubeconfig: bool,

    /// Process every active cluster of this provider type
    #[arg(long = "cluster-type", visible_alias = "get-clusters-by-type", env = "CLUSTER_TYPE")]
    pub cluster_type: Option<String>,

    /// Process every active cluster carrying any of these comma-separated key=value labels
    #[arg(long = "cluster-labels", visible_alias = "get-clusters-by-label", env = "CLUSTER_LABELS")]
    pub cluster_labels: Option<String>,

    /// Kubeconfig file written for a single cluster
    #[arg(long = "kubeconfig", env = "KUBECONFIG_FILE")]
    pub kubeconfig: Option<PathBuf>,

    /// Directory receiving one kubeconfig per cluster in multi-cluster mode
    #[arg(long = "kubeconfig-dir", env = "KUBECONFIG_DIR")]
    pub kubeconfig_dir: Option<PathBuf>,

    /// Prefix of the kubeconfig file names in multi-cluster mode
    #[arg(long = "kubeconfig-prefix", env = "KUBECONFIG_PREFIX")]
    pub kubeconfig_prefix: Option<String>,

    /// Enable debug logging
    #[arg(long, env = "DEBUG")]
    pub debug: bool,

    /// Log output format
    #[arg(long = "log-format", env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Credentials for HTTP basic authentication against Rancher
#[derive(Clone)]
pub struct Credentials {
    pub access_key: String,
    secret_key: String,
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Project and namespace handling requested for a single cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectOptions {
    pub name: String,
    pub namespace: String,
    pub create_project: bool,
    pub create_namespace: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleClusterOptions {
    pub cluster_name: String,
    pub project: Option<ProjectOptions>,
    /// Target of the kubeconfig, `None` when no kubeconfig is requested
    pub kubeconfig: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiClusterOptions {
    pub criterion: SelectionCriterion,
    pub kubeconfig_dir: PathBuf,
    pub kubeconfig_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    Single(SingleClusterOptions),
    Multi(MultiClusterOptions),
}

/// Validated, immutable configuration of one invocation
#[derive(Debug, Clone)]
pub struct Config {
    pub server_url: String,
    pub credentials: Credentials,
    pub mode: RunMode,
}

impl Config {
    /// Validate command line and environment options
    pub fn from_args(args: Args) -> Result<Self> {
        let server_url = required(args.rancher_server, "--rancher-server / RANCHER_SERVER")?;
        let access_key = required(
            args.rancher_access_key,
            "--rancher-access-key / RANCHER_ACCESS_KEY",
        )?;
        let secret_key = required(
            args.rancher_secret_key,
            "--rancher-secret-key / RANCHER_SECRET_KEY",
        )?;

        let parsed = url::Url::parse(&server_url)
            .with_context(|| format!("Invalid Rancher server URL '{}'", server_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(ProvisionError::Config(format!(
                "Rancher server URL must be http or https, got '{}'",
                server_url
            )));
        }

        let cluster_name = non_empty(args.cluster_name);
        let cluster_type = non_empty(args.cluster_type);
        let cluster_labels = non_empty(args.cluster_labels);

        let mode = match (cluster_name, cluster_type, cluster_labels) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
                bail!(ProvisionError::Config(
                    "--cluster-name cannot be combined with --cluster-type or --cluster-labels"
                        .to_string()
                ))
            }
            (None, Some(_), Some(_)) => bail!(ProvisionError::Config(
                "--cluster-type and --cluster-labels are mutually exclusive".to_string()
            )),
            (None, None, None) => bail!(ProvisionError::Config(
                "one of --cluster-name, --cluster-type or --cluster-labels is required".to_string()
            )),
            (Some(cluster_name), None, None) => {
                let project = non_empty(args.project_name).map(|name| ProjectOptions {
                    namespace: non_empty(args.namespace).unwrap_or_else(|| name.clone()),
                    name,
                    create_project: args.create_project,
                    create_namespace: args.create_namespace,
                });
                let kubeconfig = args.create_kubeconfig.then(|| {
                    args.kubeconfig
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_KUBECONFIG_FILE))
                });
                RunMode::Single(SingleClusterOptions {
                    cluster_name,
                    project,
                    kubeconfig,
                })
            }
            (None, Some(provider), None) => RunMode::Multi(MultiClusterOptions {
                criterion: SelectionCriterion::ByType(provider),
                kubeconfig_dir: args.kubeconfig_dir.unwrap_or_else(|| PathBuf::from(".")),
                kubeconfig_prefix: args.kubeconfig_prefix.unwrap_or_default(),
            }),
            (None, None, Some(labels)) => RunMode::Multi(MultiClusterOptions {
                criterion: SelectionCriterion::parse_labels(&labels)
                    .context("Invalid --cluster-labels")?,
                kubeconfig_dir: args.kubeconfig_dir.unwrap_or_else(|| PathBuf::from(".")),
                kubeconfig_prefix: args.kubeconfig_prefix.unwrap_or_default(),
            }),
        };

        Ok(Config {
            server_url: server_url.trim_end_matches('/').to_string(),
            credentials: Credentials::new(access_key, secret_key),
            mode,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    non_empty(value)
        .ok_or_else(|| ProvisionError::Config(format!("missing required setting {}", name)))
        .map_err(Into::into)
}
