//! Serve command implementation

use anyhow::{Context, Result};
use std::future::Future;
use std::io;
use tierlog::TierlogLayer;
use tierlog_core::LogConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::ServeArgs;
use crate::output::print_info;

pub async fn execute(config: &LogConfig, args: ServeArgs) -> Result<()> {
    let composite = tierlog::try_init(super::options(config))?;

    // Everything logged through `tracing` from here on, including the
    // endpoint's request traces, ends up in tierlog's sinks
    tracing_subscriber::registry()
        .with(TierlogLayer::new(composite.logger().clone()))
        .try_init()
        .context("Failed to install tracing bridge")?;

    print_info(&format!(
        "Log level endpoint on http://{}/log/level (level {})",
        args.bind,
        composite.level()
    ));

    let served = tierlog_web::serve_until(
        &args.bind,
        composite.threshold().clone(),
        shutdown_on(tokio::signal::ctrl_c()),
    )
    .await
    .with_context(|| format!("Failed to serve on {}", args.bind));

    tracing::info!("Log level endpoint stopped");
    composite.flush()?;
    served
}

/// Resolve once `signal` fires. A signal that cannot be listened for is
/// logged and treated as a shutdown request.
async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
    }
}
