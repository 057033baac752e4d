use softphone::application::simulator::{spawn_clock, spawn_event_source, spawn_ui_poller};
use softphone::config::Config;
use softphone::domain::session::CallSessionManager;
use softphone::infrastructure::audit::CallAuditLog;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional config file as the first argument
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log.level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting softphone call session demo");
    debug!("Effective configuration:\n{}", config.to_toml()?);

    let manager = Arc::new(CallSessionManager::with_directory(config.contact_directory()));
    let audit = Arc::new(CallAuditLog::new(config.session.audit_capacity));
    manager.subscribe(audit.clone());

    let events = spawn_event_source(
        manager.clone(),
        Duration::from_millis(config.session.event_interval_ms),
        config.session.demo_steps,
    );
    let clock = spawn_clock(manager.clone());
    let ui = spawn_ui_poller(
        manager.clone(),
        Duration::from_millis(config.session.ui_interval_ms),
    );

    tokio::select! {
        result = events => result?,
        _ = tokio::signal::ctrl_c() => info!("Received CTRL+C, shutting down"),
    }

    clock.abort();
    ui.abort();

    manager.print_history();
    info!("Audit log holds {} events", audit.len());

    Ok(())
}
