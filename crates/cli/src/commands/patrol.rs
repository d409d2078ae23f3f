//! `patrol` command implementation.

use anyhow::Result;
use contracts::{Coordinate, PatrolCommand};
use tracing::info;

use super::session::{load_config, run_session};
use crate::cli::PatrolArgs;
use crate::error::CliError;

/// Execute the `patrol` command
pub async fn run_patrol(args: &PatrolArgs) -> Result<()> {
    let start = parse_start(args.lat, args.lng)?;
    let mut config = load_config(&args.session)?;

    if let Some(delay_ms) = args.initial_delay_ms {
        config.playback.patrol_initial_delay_ms = delay_ms;
    }

    let profile = args.profile.map(Into::into).unwrap_or(config.patrol.profile);
    let radius = args.radius.unwrap_or(config.patrol.radius_steps);

    info!(
        start = %start,
        profile = profile.as_str(),
        radius_steps = radius,
        initial_delay_ms = config.playback.patrol_initial_delay_ms,
        "Starting patrol"
    );

    let command = PatrolCommand::new(start, profile).with_radius(radius);
    run_session(&config, command.into(), &args.session).await?;

    info!("mockloc finished");
    Ok(())
}

fn parse_start(lat: f64, lng: f64) -> Result<Coordinate, CliError> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(CliError::invalid_coordinate(lat, lng, "latitude must be within [-90, 90]"));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(CliError::invalid_coordinate(
            lat,
            lng,
            "longitude must be within [-180, 180]",
        ));
    }
    Ok(Coordinate::new(lat, lng))
}
