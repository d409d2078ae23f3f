//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use contracts::MovementProfile;
use std::path::PathBuf;

/// mockloc - simulated location playback
#[derive(Parser, Debug)]
#[command(
    name = "mockloc",
    author,
    version,
    about = "Simulated location playback: square patrols and waypoint routes",
    long_about = "Plays simulated location fixes into configured sinks.\n\n\
                  `patrol` walks a square around a start point until stopped, \n\
                  `route` interpolates a JSON waypoint descriptor at a given speed."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "MOCKLOC_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "MOCKLOC_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Patrol a square around a start coordinate
    Patrol(PatrolArgs),

    /// Play a waypoint route descriptor
    Route(RouteArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),
}

impl Commands {
    /// Prometheus port requested by a session command, `None` when disabled
    pub fn metrics_port(&self) -> Option<u16> {
        let port = match self {
            Self::Patrol(args) => args.session.metrics_port,
            Self::Route(args) => args.session.metrics_port,
            Self::Validate(_) => 0,
        };
        (port != 0).then_some(port)
    }
}

/// Options shared by every command that runs a session
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Path to configuration file (TOML or JSON); defaults apply when absent
    #[arg(short, long, env = "MOCKLOC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Stop the session after this many seconds (0 = until Ctrl+C)
    #[arg(long, default_value = "0", env = "MOCKLOC_DURATION")]
    pub duration: u64,

    /// Override the tick interval from configuration
    #[arg(long, env = "MOCKLOC_TICK_MS")]
    pub tick_ms: Option<u64>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "MOCKLOC_METRICS_PORT")]
    pub metrics_port: u16,

    /// Print the session report as JSON
    #[arg(long)]
    pub report_json: bool,
}

/// Arguments for the `patrol` command
#[derive(Parser, Debug, Clone)]
pub struct PatrolArgs {
    /// Start latitude (decimal degrees)
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Start longitude (decimal degrees)
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Movement profile; configuration default when omitted
    #[arg(long, value_enum, env = "MOCKLOC_PROFILE")]
    pub profile: Option<ProfileArg>,

    /// Half-width of the square in steps; configuration default when omitted
    #[arg(long, env = "MOCKLOC_RADIUS")]
    pub radius: Option<u32>,

    /// Override the delay before the first fix (milliseconds)
    #[arg(long)]
    pub initial_delay_ms: Option<u64>,

    #[command(flatten)]
    pub session: SessionArgs,
}

/// Arguments for the `route` command
#[derive(Parser, Debug, Clone)]
#[command(group(
    clap::ArgGroup::new("source")
        .required(true)
        .args(["descriptor", "json"])
))]
pub struct RouteArgs {
    /// Path to a JSON route descriptor
    #[arg(short, long)]
    pub descriptor: Option<PathBuf>,

    /// Inline JSON route descriptor
    #[arg(long)]
    pub json: Option<String>,

    /// Print the interpolated route and exit without playing it
    #[arg(long)]
    pub print_route: bool,

    #[command(flatten)]
    pub session: SessionArgs,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "mockloc.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Movement profile as accepted on the command line
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ProfileArg {
    Walk,
    Bike,
    Car,
}

impl From<ProfileArg> for MovementProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Walk => MovementProfile::Walk,
            ProfileArg::Bike => MovementProfile::Bike,
            ProfileArg::Car => MovementProfile::Car,
        }
    }
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
