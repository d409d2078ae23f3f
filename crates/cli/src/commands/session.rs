//! Shared session runner for `patrol` and `route`.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use contracts::{SessionReport, SimulatorConfig, StartCommand};
use playback::{SessionController, SinkSet};
use tracing::{info, warn};

use crate::cli::SessionArgs;
use crate::error::CliError;

/// Load configuration (defaults when no path is given) and apply CLI overrides
pub fn load_config(args: &SessionArgs) -> Result<SimulatorConfig> {
    let mut config = match args.config.as_deref() {
        Some(path) => load_from(path)?,
        None => {
            info!("No configuration file given, using defaults");
            SimulatorConfig::default()
        }
    };

    if let Some(tick_ms) = args.tick_ms {
        info!(tick_ms, "Overriding tick interval from CLI");
        config.playback.tick_ms = tick_ms;
    }
    config_loader::ConfigLoader::validate(&config).context("Invalid configuration")?;

    Ok(config)
}

fn load_from(path: &Path) -> Result<SimulatorConfig> {
    info!(config = %path.display(), "Loading configuration");
    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()).into());
    }
    config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Run one session until it ends, `--duration` elapses or a shutdown signal
/// arrives, then print its report.
pub async fn run_session(
    config: &SimulatorConfig,
    command: StartCommand,
    args: &SessionArgs,
) -> Result<SessionReport> {
    let sinks = SinkSet::from_configs(&config.sinks).context("Failed to create sinks")?;
    info!(sinks = sinks.len(), tick_ms = config.playback.tick_ms, "Sinks ready");
    if sinks.is_empty() {
        warn!("No sinks configured, the session will end on its first tick");
    }

    let mut controller = SessionController::new(sinks, config);
    let outcome = controller.start(command).await?;
    info!(session_id = outcome.session_id(), "Session running, press Ctrl+C to stop");

    let deadline = async {
        match args.duration {
            0 => std::future::pending::<()>().await,
            secs => tokio::time::sleep(Duration::from_secs(secs)).await,
        }
    };

    let finished = tokio::select! {
        report = controller.wait() => report?,
        _ = setup_shutdown_signal() => {
            warn!("Received shutdown signal, stopping session...");
            None
        }
        _ = deadline => {
            info!(duration_secs = args.duration, "Duration elapsed, stopping session");
            None
        }
    };

    let report = match finished {
        Some(report) => report,
        None => controller
            .stop()
            .await?
            .ok_or_else(|| CliError::shutdown("no session was running"))?,
    };

    print_report(&report, args.report_json)?;

    if !report.is_success() {
        return Err(CliError::SessionFailed {
            session_id: report.session_id,
            reason: report.failure_reason.clone().unwrap_or_default(),
        }
        .into());
    }
    Ok(report)
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn print_report(report: &SessionReport, json: bool) -> Result<()> {
    if json {
        let json =
            serde_json::to_string_pretty(report).context("Failed to serialize session report")?;
        println!("{}", json);
        return Ok(());
    }

    println!("\n=== Session Report ===\n");
    println!("  Session: {} ({})", report.session_id, report.mode.as_str());
    println!("  Outcome: {}", report.outcome.as_str());
    println!("  Ticks: {}", report.ticks);
    println!("  Fixes published: {}", report.published);
    println!("  Elapsed: {:.2}s", report.elapsed.as_secs_f64());
    if let Some(ref reason) = report.failure_reason {
        println!("  Failure: {}", reason);
    }
    println!();
    Ok(())
}
