//! SimulatorConfig - Config Loader output
//!
//! Playback timing, patrol defaults, route defaults and sink routing.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{MovementProfile, DEFAULT_RADIUS_STEPS};

/// Default initial delay for both patrol sessions and descriptors without `delay`
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 10_000;

/// Default tick interval
pub const DEFAULT_TICK_MS: u64 = 1_000;

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete simulator configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SimulatorConfig {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// Tick timing
    #[serde(default)]
    #[validate(nested)]
    pub playback: PlaybackConfig,

    /// Defaults for patrol start commands
    #[serde(default)]
    #[validate(nested)]
    pub patrol: PatrolDefaults,

    /// Defaults for route descriptors
    #[serde(default)]
    pub route: RouteDefaults,

    /// 输出路由配置
    #[serde(default = "default_sinks")]
    pub sinks: Vec<SinkConfig>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            version: ConfigVersion::default(),
            playback: PlaybackConfig::default(),
            patrol: PatrolDefaults::default(),
            route: RouteDefaults::default(),
            sinks: default_sinks(),
        }
    }
}

fn default_sinks() -> Vec<SinkConfig> {
    vec![SinkConfig {
        name: "log".to_string(),
        sink_type: SinkType::Log,
        params: HashMap::new(),
    }]
}

/// Tick cadence of the playback driver
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlaybackConfig {
    /// Interval between two published fixes
    #[serde(default = "default_tick_ms")]
    #[validate(range(min = 1))]
    pub tick_ms: u64,

    /// Delay before the first patrol fix
    #[serde(default = "default_initial_delay_ms")]
    pub patrol_initial_delay_ms: u64,
}

impl PlaybackConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn patrol_initial_delay(&self) -> Duration {
        Duration::from_millis(self.patrol_initial_delay_ms)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            patrol_initial_delay_ms: DEFAULT_INITIAL_DELAY_MS,
        }
    }
}

fn default_tick_ms() -> u64 {
    DEFAULT_TICK_MS
}

fn default_initial_delay_ms() -> u64 {
    DEFAULT_INITIAL_DELAY_MS
}

/// Patrol defaults used when a host omits them
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PatrolDefaults {
    #[serde(default)]
    pub profile: MovementProfile,

    #[serde(default = "default_radius_steps")]
    #[validate(range(min = 1))]
    pub radius_steps: u32,
}

impl Default for PatrolDefaults {
    fn default() -> Self {
        Self {
            profile: MovementProfile::default(),
            radius_steps: DEFAULT_RADIUS_STEPS,
        }
    }
}

fn default_radius_steps() -> u32 {
    DEFAULT_RADIUS_STEPS
}

/// Defaults applied to route descriptors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDefaults {
    /// Used when the descriptor has no `delay`
    #[serde(default = "default_initial_delay_ms")]
    pub default_delay_ms: u64,
}

impl Default for RouteDefaults {
    fn default() -> Self {
        Self {
            default_delay_ms: DEFAULT_INITIAL_DELAY_MS,
        }
    }
}

/// Sink 输出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink 名称
    pub name: String,

    /// Sink 类型
    pub sink_type: SinkType,

    /// 类型特定参数
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// Sink 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// 日志输出
    Log,
    /// JSON-lines 文件输出
    File,
}
