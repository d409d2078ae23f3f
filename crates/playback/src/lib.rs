//! # Playback
//!
//! 位置回放模块。
//!
//! 负责：
//! - 以固定 tick 驱动 `PointSource`，逐点发布到 `LocationSink`
//! - 停止信号与失败检测，确定会话终态
//! - 单会话准入控制（巡逻忽略、路线替换）
//! - 内置 sinks：日志、JSON-lines 文件、内存记录

pub mod driver;
pub mod error;
pub mod metrics;
pub mod session;
pub mod sinks;
pub mod stop;

pub use contracts::{LocationSink, SessionOutcome, SessionReport, StartCommand};
pub use driver::{DriverConfig, PlaybackDriver};
pub use error::PlaybackError;
pub use metrics::{MetricsSnapshot, SessionMetrics};
pub use session::{SessionController, SessionInfo, StartOutcome};
pub use sinks::{
    ConfiguredSink, FileSink, FileSinkConfig, LogSink, MemoryRecorder, MemorySink, SinkSet,
};
pub use stop::{stop_channel, StopHandle, StopSignal};
