//! PlaybackDriver - tick loop and termination logic for one session

use std::sync::Arc;
use std::time::Duration;

use contracts::{
    ContractError, LocationFix, LocationSink, PlaybackMode, SessionOutcome, SessionReport,
};
use path_engine::PointSource;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::metrics::SessionMetrics;
use crate::stop::StopSignal;

/// Driver timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Interval between two ticks
    pub tick: Duration,
    /// Wait before the first tick
    pub initial_delay: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            initial_delay: Duration::from_secs(10),
        }
    }
}

/// How the tick loop ended
enum Termination {
    Stopped,
    SinkUnavailable,
    Failed(ContractError),
}

/// Drives one session from first tick to terminal outcome
pub struct PlaybackDriver<S> {
    session_id: u64,
    mode: PlaybackMode,
    sink: Arc<Mutex<S>>,
    stop: StopSignal,
    config: DriverConfig,
    metrics: Arc<SessionMetrics>,
}

impl<S: LocationSink + Send + 'static> PlaybackDriver<S> {
    pub fn new(
        session_id: u64,
        mode: PlaybackMode,
        sink: Arc<Mutex<S>>,
        stop: StopSignal,
        config: DriverConfig,
    ) -> Self {
        Self {
            session_id,
            mode,
            sink,
            stop,
            config,
            metrics: Arc::new(SessionMetrics::new()),
        }
    }

    pub fn metrics(&self) -> &Arc<SessionMetrics> {
        &self.metrics
    }

    /// Run the session to completion.
    ///
    /// Holds the sink for the whole session. Simulation mode is enabled
    /// first and disabled on every exit path.
    #[instrument(
        name = "playback_session",
        skip(self, source),
        fields(session_id = self.session_id, mode = self.mode.as_str())
    )]
    pub async fn run(mut self, mut source: Box<dyn PointSource>) -> SessionReport {
        let started = Instant::now();
        let sink_handle = Arc::clone(&self.sink);
        let mut sink = sink_handle.lock().await;

        info!(
            sink = sink.name(),
            tick_ms = self.config.tick.as_millis() as u64,
            initial_delay_ms = self.config.initial_delay.as_millis() as u64,
            "session started"
        );

        let termination = match sink.enable_simulation().await {
            Ok(()) => self.drive(&mut *sink, source.as_mut(), started).await,
            Err(e) => Termination::Failed(e),
        };

        if let Err(e) = sink.disable_simulation().await {
            warn!(sink = sink.name(), error = %e, "failed to leave simulation mode");
        }
        drop(sink);

        self.report(termination, started)
    }

    async fn drive(
        &mut self,
        sink: &mut S,
        source: &mut dyn PointSource,
        started: Instant,
    ) -> Termination {
        if !self.pause(self.config.initial_delay).await {
            debug!("stopped during initial delay");
            return Termination::Stopped;
        }

        loop {
            if self.stop.is_stopped() {
                return Termination::Stopped;
            }
            if !sink.is_available() {
                return Termination::SinkUnavailable;
            }

            let tick = self.metrics.ticks() + 1;
            match source.next_point() {
                Some(point) => {
                    let fix = LocationFix::new(point, started.elapsed());
                    if let Err(e) = sink.publish(&fix).await {
                        observability::record_publish_failure(self.mode);
                        error!(tick, at = %point, error = %e, "publish failed");
                        self.metrics.inc_ticks();
                        return Termination::Failed(e);
                    }
                    self.metrics.inc_published();
                    observability::record_fix_published(self.mode);
                    trace!(tick, at = %point, "fix published");
                }
                None => {
                    self.metrics.inc_idle_ticks();
                    observability::record_idle_tick(self.mode);
                    if self.metrics.idle_ticks() == 1 {
                        debug!(tick, "nothing left to publish, idling until stopped");
                    }
                }
            }
            self.metrics.inc_ticks();

            if !self.pause(self.config.tick).await {
                return Termination::Stopped;
            }
        }
    }

    /// Sleep unless stopped first; returns false when stopped
    async fn pause(&mut self, duration: Duration) -> bool {
        if duration.is_zero() {
            return !self.stop.is_stopped();
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => true,
            _ = self.stop.stopped() => false,
        }
    }

    fn report(&self, termination: Termination, started: Instant) -> SessionReport {
        let (outcome, failure_reason) = match termination {
            Termination::Stopped => (SessionOutcome::Success, None),
            Termination::SinkUnavailable => {
                info!("sink no longer available, ending session");
                (SessionOutcome::Success, None)
            }
            Termination::Failed(e) => (SessionOutcome::Failure, Some(e.to_string())),
        };

        let snapshot = self.metrics.snapshot();
        let report = SessionReport {
            session_id: self.session_id,
            mode: self.mode,
            outcome,
            ticks: snapshot.ticks,
            published: snapshot.published,
            failure_reason,
            elapsed: started.elapsed(),
        };

        info!(
            outcome = report.outcome.as_str(),
            ticks = report.ticks,
            published = report.published,
            "session finished"
        );
        report
    }
}
