//! Shared logging setup for tasks using the substrate

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialize logging for a control-plane task
///
/// `RUST_LOG` overrides the defaults; the task name is elevated to info so a
/// quiet default still shows session lifecycle and metrics.
pub fn init_task_logging(task_name: &str) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("info".parse()?)
        .add_directive(format!("{}=info", task_name).parse()?)
        .add_directive("nemo_dispatch=info".parse()?)
        .add_directive("nemo_transport=warn".parse()?);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install subscriber: {e}"))?;

    Ok(())
}

/// Test-friendly variant; safe to call from every test
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("debug"));

    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
