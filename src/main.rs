use anyhow::Result;
use homedash::*;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    tracing::info!(name = version::NAME, version = version::VERSION, "starting");

    let sample_interval = Duration::from_millis(app_config.monitoring.sample_interval_ms);
    let history_repo = Arc::new(history_repo::HistoryRepo::load(&app_config.history).await);
    let hub = Arc::new(hub::BroadcastHub::new(
        app_config.monitoring.broadcast_capacity,
    ));
    let orchestrator = Arc::new(orchestrator::Orchestrator::new(
        history_repo,
        hub.clone(),
        Duration::from_secs(app_config.history.bucket_interval_secs),
    ));

    let prober = Arc::new(probe::CommandProber::from_config(&app_config.site));
    let classifier =
        site::SiteClassifier::new(prober, site::ProbeTimeouts::from_config(&app_config.site));
    let site_monitor = Arc::new(site::SiteMonitor::new(classifier, sample_interval * 2));

    let deps = session::PollerDeps {
        host: Arc::new(sysinfo_repo::SysinfoRepo::new()),
        workloads: Arc::new(docker_repo::DockerRepo::connect()?),
        site: site_monitor.clone(),
        orchestrator: orchestrator.clone(),
        interval: sample_interval,
    };

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            site: site_monitor,
            hub: hub.clone(),
            orchestrator,
            shutdown_rx,
        },
        worker::WorkerConfig {
            probe_interval_ms: app_config.monitoring.sample_interval_ms,
            stats_log_interval_secs: app_config.monitoring.stats_log_interval_secs,
        },
    );

    let app = routes::app(deps, hub.clone(), app_config.clone());
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = shutdown_signal() => {
            tracing::info!("Received shutdown signal");
            hub.shutdown();
            let _ = shutdown_tx.send(());
            let _ = worker_handle.await;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
