//! Session control - single-session admission per service instance
//!
//! Patrol starts are ignored while a session is active; route starts cancel
//! the active session and take its place. A session that already ended on
//! its own (failure, sink gone) does not count as active.

use std::sync::Arc;
use std::time::Duration;

use contracts::{
    AdmissionPolicy, LocationSink, PatrolCommand, PlaybackConfig, PlaybackMode, RouteCommand, RouteDefaults,
    SessionReport, SimulatorConfig, StartCommand,
};
use path_engine::{PointSource, RoutePlayback, RouteSequence, SquarePatrol, WaypointPlan};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::driver::{DriverConfig, PlaybackDriver};
use crate::error::PlaybackError;
use crate::metrics::{MetricsSnapshot, SessionMetrics};
use crate::stop::{stop_channel, StopHandle};

/// Result of a start request
#[derive(Debug, Clone)]
pub enum StartOutcome {
    /// A new session is running
    Started { session_id: u64 },
    /// A session was already active and was kept
    Ignored { active_session_id: u64 },
    /// The active session was stopped and a new one started
    Replaced {
        session_id: u64,
        previous: SessionReport,
    },
}

impl StartOutcome {
    /// Id of the session running after the request
    pub fn session_id(&self) -> u64 {
        match self {
            Self::Started { session_id } | Self::Replaced { session_id, .. } => *session_id,
            Self::Ignored { active_session_id } => *active_session_id,
        }
    }
}

/// Public view of the active session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionInfo {
    pub session_id: u64,
    pub mode: PlaybackMode,
    pub metrics: MetricsSnapshot,
}

struct ActiveSession {
    id: u64,
    mode: PlaybackMode,
    stop: StopHandle,
    task: JoinHandle<SessionReport>,
    metrics: Arc<SessionMetrics>,
}

impl ActiveSession {
    fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    async fn join(self) -> Result<SessionReport, PlaybackError> {
        self.task.await.map_err(|e| PlaybackError::SessionJoin {
            session_id: self.id,
            message: e.to_string(),
        })
    }
}

/// Point source of a session that has not started ticking yet
enum PendingSource {
    Ready(Box<dyn PointSource>),
    /// Interpolated on the blocking pool once the session task runs
    Route(WaypointPlan),
}

impl PendingSource {
    async fn resolve(self) -> Box<dyn PointSource> {
        match self {
            Self::Ready(source) => source,
            Self::Route(plan) => {
                let repeat = plan.repeat;
                let sequence = match tokio::task::spawn_blocking(move || plan.interpolate()).await {
                    Ok(sequence) => sequence,
                    Err(e) => {
                        warn!(error = %e, "route interpolation aborted, session will idle");
                        RouteSequence::default()
                    }
                };
                debug!(points_per_cycle = sequence.cycle_len(), "route sequence ready");
                Box::new(RoutePlayback::new(sequence, repeat))
            }
        }
    }
}

/// Owns the single-session registry and the shared sink
pub struct SessionController<S> {
    sink: Arc<Mutex<S>>,
    playback: PlaybackConfig,
    route_defaults: RouteDefaults,
    next_id: u64,
    active: Option<ActiveSession>,
    last_report: Option<SessionReport>,
}

impl<S: LocationSink + Send + 'static> SessionController<S> {
    pub fn new(sink: S, config: &SimulatorConfig) -> Self {
        Self::with_shared_sink(Arc::new(Mutex::new(sink)), config)
    }

    /// Use a sink that is also held elsewhere
    pub fn with_shared_sink(sink: Arc<Mutex<S>>, config: &SimulatorConfig) -> Self {
        Self {
            sink,
            playback: config.playback.clone(),
            route_defaults: config.route.clone(),
            next_id: 1,
            active: None,
            last_report: None,
        }
    }

    pub fn sink(&self) -> &Arc<Mutex<S>> {
        &self.sink
    }

    /// Whether a session is currently running
    pub fn is_active(&self) -> bool {
        self.active.as_ref().is_some_and(ActiveSession::is_running)
    }

    pub fn active_session(&self) -> Option<SessionInfo> {
        self.active
            .as_ref()
            .filter(|s| s.is_running())
            .map(|s| SessionInfo {
                session_id: s.id,
                mode: s.mode,
                metrics: s.metrics.snapshot(),
            })
    }

    /// Report of the most recently collected session
    pub fn last_report(&self) -> Option<&SessionReport> {
        self.last_report.as_ref()
    }

    /// Start a session according to the command's admission policy
    #[instrument(name = "session_start", skip(self, command), fields(mode = command.mode().as_str()))]
    pub async fn start(&mut self, command: StartCommand) -> Result<StartOutcome, PlaybackError> {
        self.reap_finished().await?;

        if let Some(active) = &self.active {
            if command.admission() == AdmissionPolicy::IgnoreIfActive {
                debug!(active_session_id = active.id, "session already active, ignoring start");
                return Ok(StartOutcome::Ignored {
                    active_session_id: active.id,
                });
            }
        }
        let previous = self.stop().await?;

        let session_id = self.spawn(command);
        Ok(match previous {
            Some(previous) => {
                info!(session_id, previous_session_id = previous.session_id, "session replaced");
                StartOutcome::Replaced {
                    session_id,
                    previous,
                }
            }
            None => StartOutcome::Started { session_id },
        })
    }

    /// Stop the active session and wait for it to release the sink.
    ///
    /// Returns `None` when nothing was active.
    #[instrument(name = "session_stop", skip(self))]
    pub async fn stop(&mut self) -> Result<Option<SessionReport>, PlaybackError> {
        let Some(active) = self.active.take() else {
            debug!("stop requested with no active session");
            return Ok(None);
        };

        active.stop.stop();
        let report = active.join().await?;
        self.last_report = Some(report.clone());
        Ok(Some(report))
    }

    /// Wait until the active session ends on its own.
    ///
    /// Cancel-safe: dropping the future leaves the session registered.
    pub async fn wait(&mut self) -> Result<Option<SessionReport>, PlaybackError> {
        let Some(active) = self.active.as_mut() else {
            return Ok(None);
        };
        let joined = (&mut active.task).await;
        let session_id = active.id;
        self.active = None;

        let report = joined.map_err(|e| PlaybackError::SessionJoin {
            session_id,
            message: e.to_string(),
        })?;
        self.last_report = Some(report.clone());
        Ok(Some(report))
    }

    async fn reap_finished(&mut self) -> Result<(), PlaybackError> {
        if self.active.as_ref().is_some_and(|s| !s.is_running()) {
            if let Some(report) = self.wait().await? {
                debug!(
                    session_id = report.session_id,
                    outcome = report.outcome.as_str(),
                    "reaped finished session"
                );
            }
        }
        Ok(())
    }

    fn spawn(&mut self, command: StartCommand) -> u64 {
        let session_id = self.next_id;
        self.next_id += 1;

        let mode = command.mode();
        let (source, initial_delay) = match command {
            StartCommand::Patrol(patrol) => self.patrol_source(patrol),
            StartCommand::Route(route) => self.route_source(route),
        };
        let config = DriverConfig {
            tick: self.playback.tick(),
            initial_delay,
        };

        let (stop, signal) = stop_channel();
        let driver = PlaybackDriver::new(session_id, mode, Arc::clone(&self.sink), signal, config);
        let metrics = Arc::clone(driver.metrics());

        observability::record_session_started(mode);
        let task = tokio::spawn(async move {
            let source = source.resolve().await;
            let report = driver.run(source).await;
            observability::record_session_finished(&report);
            report
        });

        self.active = Some(ActiveSession {
            id: session_id,
            mode,
            stop,
            task,
            metrics,
        });
        session_id
    }

    fn patrol_source(&self, command: PatrolCommand) -> (PendingSource, Duration) {
        info!(
            start = %command.start,
            profile = command.profile.as_str(),
            radius_steps = command.radius_steps,
            "starting patrol"
        );
        let patrol = SquarePatrol::new(command.start, command.profile, command.radius_steps);
        (
            PendingSource::Ready(Box::new(patrol)),
            self.playback.patrol_initial_delay(),
        )
    }

    fn route_source(&self, command: RouteCommand) -> (PendingSource, Duration) {
        let plan = WaypointPlan::parse(command.descriptor.as_deref(), &self.route_defaults);
        info!(
            waypoints = plan.waypoints.len(),
            speed_kmh = ?plan.speed_kmh,
            repeat = ?plan.repeat,
            initial_delay_ms = plan.initial_delay.as_millis() as u64,
            "starting route"
        );
        let initial_delay = plan.initial_delay;
        (PendingSource::Route(plan), initial_delay)
    }
}
