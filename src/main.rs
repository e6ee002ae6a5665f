// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rancher_projects::config::{Args, Config, LogFormat};
use rancher_projects::rancher::RancherClient;
use rancher_projects::workflow::{self, RunReport};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.debug, args.log_format);

    let config = Config::from_args(args)?;
    debug!("Configuration loaded: {:?}", config);

    let api = RancherClient::new(&config)?;
    info!("Using Rancher server {}", api.server());

    match workflow::run(&api, &config).await? {
        RunReport::Single(outcome) => {
            if let Some(path) = &outcome.kubeconfig {
                info!("Kubeconfig for cluster {} written to {}", outcome.cluster.name, path.display());
            }
            info!("Cluster {} done", outcome.cluster.name);
        }
        RunReport::Multi(summary) => {
            if summary.failed() > 0 {
                warn!("{} of {} clusters failed", summary.failed(), summary.clusters.len());
            }
            if summary.written() == 0 && summary.failed() == 0 {
                warn!("No kubeconfig was generated, no active cluster matched");
            }
        }
    }

    Ok(())
}

/// LOG_LEVEL takes precedence over --debug
fn init_tracing(debug: bool, format: LogFormat) {
    let default = if debug {
        "rancher_projects=debug,kube=warn,hyper=warn,tower=warn"
    } else {
        "rancher_projects=info,kube=warn,hyper=warn,tower=warn"
    };
    let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(default));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry.with(fmt::layer().with_target(false)).init(),
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
    }
}
