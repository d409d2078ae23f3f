//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{SimulatorConfig, DEFAULT_TICK_MS};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    tick_ms: u64,
    patrol_initial_delay_ms: u64,
    patrol_profile: String,
    radius_steps: u32,
    route_default_delay_ms: u64,
    sink_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", config.version),
                    tick_ms: config.playback.tick_ms,
                    patrol_initial_delay_ms: config.playback.patrol_initial_delay_ms,
                    patrol_profile: config.patrol.profile.as_str().to_string(),
                    radius_steps: config.patrol.radius_steps,
                    route_default_delay_ms: config.route.default_delay_ms,
                    sink_count: config.sinks.len(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &SimulatorConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.sinks.is_empty() {
        warnings.push("No sinks configured - sessions end on their first tick".to_string());
    }

    // Route speed is converted to a per-tick distance assuming 1 s ticks
    if config.playback.tick_ms != DEFAULT_TICK_MS {
        warnings.push(format!(
            "playback.tick_ms = {} - routes play {:.2}x their descriptor speed",
            config.playback.tick_ms,
            DEFAULT_TICK_MS as f64 / config.playback.tick_ms as f64
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Tick: {} ms", summary.tick_ms);
            println!("  Patrol delay: {} ms", summary.patrol_initial_delay_ms);
            println!(
                "  Patrol: {} x {} steps",
                summary.patrol_profile, summary.radius_steps
            );
            println!("  Route default delay: {} ms", summary.route_default_delay_ms);
            println!("  Sinks: {}", summary.sink_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
