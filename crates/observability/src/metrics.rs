//! Playback 指标收集模块
//!
//! 通过 `metrics` facade 记录；未安装 recorder 时所有调用均为空操作。

use contracts::{PlaybackMode, SessionReport};
use metrics::{counter, gauge, histogram};

/// 记录一次成功发布的位置
pub fn record_fix_published(mode: PlaybackMode) {
    counter!("mockloc_fixes_published_total", "mode" => mode.as_str()).increment(1);
}

/// 记录一次被 sink 拒绝的发布
pub fn record_publish_failure(mode: PlaybackMode) {
    counter!("mockloc_publish_failures_total", "mode" => mode.as_str()).increment(1);
}

/// 记录空转 tick（路线播放完毕或为空）
pub fn record_idle_tick(mode: PlaybackMode) {
    counter!("mockloc_idle_ticks_total", "mode" => mode.as_str()).increment(1);
}

/// 记录会话开始
pub fn record_session_started(mode: PlaybackMode) {
    counter!("mockloc_sessions_started_total", "mode" => mode.as_str()).increment(1);
    gauge!("mockloc_sessions_active").increment(1.0);
}

/// 记录会话结束
///
/// # Example
///
/// ```ignore
/// let report = controller.stop().await?;
/// if let Some(report) = report {
///     observability::record_session_finished(&report);
/// }
/// ```
pub fn record_session_finished(report: &SessionReport) {
    counter!(
        "mockloc_sessions_total",
        "mode" => report.mode.as_str(),
        "outcome" => report.outcome.as_str()
    )
    .increment(1);
    gauge!("mockloc_sessions_active").decrement(1.0);
    histogram!("mockloc_session_duration_seconds", "mode" => report.mode.as_str())
        .record(report.elapsed.as_secs_f64());
    histogram!("mockloc_session_fixes", "mode" => report.mode.as_str())
        .record(report.published as f64);
}

/// 记录巡逻方向切换
pub fn record_patrol_transition() {
    counter!("mockloc_patrol_phase_transitions_total").increment(1);
}
