//! `route` command implementation.

use anyhow::{Context, Result};
use contracts::RouteCommand;
use path_engine::WaypointPlan;
use tracing::info;

use super::session::{load_config, run_session};
use crate::cli::RouteArgs;
use crate::error::CliError;

/// Execute the `route` command
pub async fn run_route(args: &RouteArgs) -> Result<()> {
    let descriptor = read_descriptor(args)?;
    let config = load_config(&args.session)?;

    if args.print_route {
        return print_route(&descriptor, &config.route);
    }

    info!(descriptor_bytes = descriptor.len(), "Starting route");
    run_session(&config, RouteCommand::new(descriptor).into(), &args.session).await?;

    info!("mockloc finished");
    Ok(())
}

fn read_descriptor(args: &RouteArgs) -> Result<String, CliError> {
    if let Some(ref json) = args.json {
        return Ok(json.clone());
    }
    match args.descriptor {
        Some(ref path) => std::fs::read_to_string(path)
            .map_err(|e| CliError::descriptor_read(path.display().to_string(), e.to_string())),
        None => Err(CliError::descriptor_read("-", "no descriptor given")),
    }
}

/// Interpolate without playing and print the sequence as JSON
fn print_route(descriptor: &str, defaults: &contracts::RouteDefaults) -> Result<()> {
    let plan = WaypointPlan::parse(Some(descriptor), defaults);
    let sequence = plan.interpolate();

    info!(
        waypoints = plan.waypoints.len(),
        forward = sequence.forward.len(),
        reverse = sequence.reverse.len(),
        "Route interpolated"
    );

    let json = serde_json::to_string_pretty(&sequence).context("Failed to serialize route")?;
    println!("{}", json);
    Ok(())
}
