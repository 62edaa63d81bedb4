//! Adaptive stepping controller
//!
//! Driven by the host render loop, one `tick()` per frame:
//!
//! 1. `MeasuringBaseline`: time the minimal scene until the baseline window
//!    is full, then freeze its mean as the baseline and attach the first
//!    workload.
//! 2. `Stepping`: time baseline + workload, average the load window (partial
//!    windows included), and either grow the workload by one step or stop.
//! 3. `Stopped`: keep rendering, change nothing.

use redline_metrics::{Clock, FrameTimer, SlidingWindow, SystemClock};
use tracing::{debug, info, warn};

use crate::config::{ConfigError, ProbeConfig};
use crate::error::ProbeError;
use crate::report::{Report, ReportLog};
use crate::scene::Scene;
use crate::workload::{Workload, WorkloadGenerator};

/// Controller state with the fields that only make sense in each phase.
#[derive(Debug, Clone)]
pub enum ProbeState {
    MeasuringBaseline {
        window: SlidingWindow,
    },
    Stepping {
        baseline_ms: f64,
        vertex_count: u32,
        window: SlidingWindow,
        average_ms: Option<f64>,
    },
    Stopped {
        baseline_ms: f64,
        vertex_count: u32,
        average_ms: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    MeasuringBaseline,
    Stepping,
    Stopped,
}

impl ProbeState {
    pub fn phase(&self) -> Phase {
        match self {
            ProbeState::MeasuringBaseline { .. } => Phase::MeasuringBaseline,
            ProbeState::Stepping { .. } => Phase::Stepping,
            ProbeState::Stopped { .. } => Phase::Stopped,
        }
    }
}

type ReportCallback = Box<dyn FnMut(&str)>;

pub struct ProbeController<S: Scene, C: Clock = SystemClock> {
    config: ProbeConfig,
    state: ProbeState,
    scene: S,
    timer: FrameTimer<C>,
    generator: WorkloadGenerator,
    baseline_object: Workload,
    active: Option<Workload>,
    log: ReportLog,
    on_report: Option<ReportCallback>,
}

impl<S: Scene> ProbeController<S, SystemClock> {
    pub fn new(config: ProbeConfig, scene: S) -> Result<Self, ProbeError<S::Error>> {
        Self::with_clock(config, scene, SystemClock::new())
    }
}

impl<S: Scene, C: Clock> ProbeController<S, C> {
    /// Validates `config` and attaches the permanent baseline object to `scene`.
    pub fn with_clock(
        config: ProbeConfig,
        mut scene: S,
        clock: C,
    ) -> Result<Self, ProbeError<S::Error>> {
        config.validate()?;
        let window =
            SlidingWindow::new(config.window_capacity).map_err(|_| ConfigError::ZeroWindow)?;

        let generator = match config.seed {
            Some(seed) => WorkloadGenerator::seeded(seed),
            None => WorkloadGenerator::new(),
        };

        let baseline_object = Workload::cube();
        scene
            .add_to_scene(&baseline_object)
            .map_err(|source| ProbeError::Attach {
                vertex_count: baseline_object.vertex_count(),
                source,
            })?;

        info!(
            budget_ms = config.max_frame_time_ms,
            window = config.window_capacity,
            step = config.step_vertices,
            "measuring baseline"
        );

        Ok(Self {
            config,
            state: ProbeState::MeasuringBaseline { window },
            scene,
            timer: FrameTimer::with_clock(clock),
            generator,
            baseline_object,
            active: None,
            log: ReportLog::new(),
            on_report: None,
        })
    }

    /// Registers the callback invoked with each new report line.
    pub fn on_report(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_report = Some(Box::new(callback));
    }

    /// Renders one frame and advances the state machine.
    ///
    /// Returns the report emitted by this tick, if any. A render failure
    /// aborts the session and is returned untouched.
    pub fn tick(&mut self) -> Result<Option<&Report>, ProbeError<S::Error>> {
        let scene = &mut self.scene;

        let report = match &mut self.state {
            ProbeState::Stopped { .. } => {
                scene.render_frame().map_err(ProbeError::Render)?;
                None
            }
            ProbeState::MeasuringBaseline { window } => {
                let sample = self
                    .timer
                    .time(|| scene.render_frame())
                    .map_err(ProbeError::Render)?;
                window.push(sample);

                if window.is_full() {
                    let baseline_ms = window.mean()?;
                    Some(self.begin_stepping(baseline_ms)?)
                } else {
                    None
                }
            }
            ProbeState::Stepping {
                baseline_ms,
                vertex_count,
                window,
                average_ms,
            } => {
                let sample = self
                    .timer
                    .time(|| scene.render_frame())
                    .map_err(ProbeError::Render)?;
                window.push(sample);
                let avg = window.mean()?;
                *average_ms = Some(avg);

                let baseline_ms = *baseline_ms;
                let current = *vertex_count;

                if avg > self.config.max_frame_time_ms {
                    self.state = ProbeState::Stopped {
                        baseline_ms,
                        vertex_count: current,
                        average_ms: avg,
                    };
                    info!(
                        vertex_count = current,
                        baseline_ms,
                        average_ms = avg,
                        "frame budget exceeded, probe stopped"
                    );
                    Some(Report::Final {
                        vertex_count: current,
                        baseline_ms,
                        average_ms: avg,
                    })
                } else {
                    let next = current.saturating_add(self.config.step_vertices);
                    if let Err(e) = self.replace_workload(next) {
                        self.halt(baseline_ms, current, avg);
                        return Err(e);
                    }
                    if let ProbeState::Stepping { vertex_count, .. } = &mut self.state {
                        *vertex_count = next;
                    }
                    debug!(vertex_count = next, average_ms = avg, "grew workload");
                    Some(Report::Progress {
                        vertex_count: next,
                        baseline_ms,
                        average_ms: avg,
                    })
                }
            }
        };

        match report {
            Some(report) => Ok(Some(self.emit(report))),
            None => Ok(None),
        }
    }

    fn begin_stepping(&mut self, baseline_ms: f64) -> Result<Report, ProbeError<S::Error>> {
        let vertex_count = self.config.step_vertices;
        let window = SlidingWindow::new(self.config.window_capacity)?;

        if let Err(e) = self.replace_workload(vertex_count) {
            self.halt(baseline_ms, 0, baseline_ms);
            return Err(e);
        }
        self.state = ProbeState::Stepping {
            baseline_ms,
            vertex_count,
            window,
            average_ms: None,
        };

        info!(baseline_ms, vertex_count, "baseline measured, stepping");
        Ok(Report::Baseline { baseline_ms })
    }

    /// Releases the active workload before building its successor, so at
    /// most one test workload exists at a time.
    fn replace_workload(&mut self, vertex_count: u32) -> Result<(), ProbeError<S::Error>> {
        self.release_active();

        let workload = self.generator.generate(vertex_count);
        if let Err(source) = self.scene.add_to_scene(&workload) {
            self.generator.release(workload);
            return Err(ProbeError::Attach {
                vertex_count,
                source,
            });
        }
        self.active = Some(workload);
        Ok(())
    }

    /// Freezes the session after the scene refused a workload. Nothing test
    /// related is attached any more, so `vertex_count` is the last level that
    /// was actually rendered and measured.
    fn halt(&mut self, baseline_ms: f64, vertex_count: u32, average_ms: f64) {
        warn!(vertex_count, "scene refused workload, session stopped");
        self.state = ProbeState::Stopped {
            baseline_ms,
            vertex_count,
            average_ms,
        };
    }

    fn release_active(&mut self) {
        if let Some(old) = self.active.take() {
            self.scene.remove_from_scene(&old);
            self.generator.release(old);
        }
    }

    fn emit(&mut self, report: Report) -> &Report {
        if let Some(callback) = self.on_report.as_mut() {
            callback(&report.to_string());
        }
        self.log.append(report)
    }

    /// Ends the session: detaches the active workload and hands back the scene.
    /// The baseline object stays attached.
    pub fn finish(mut self) -> S {
        self.release_active();
        self.scene
    }

    pub fn state(&self) -> &ProbeState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn is_stopped(&self) -> bool {
        self.phase() == Phase::Stopped
    }

    /// Current load level; 0 while measuring the baseline.
    pub fn vertex_count(&self) -> u32 {
        match &self.state {
            ProbeState::MeasuringBaseline { .. } => 0,
            ProbeState::Stepping { vertex_count, .. } | ProbeState::Stopped { vertex_count, .. } => {
                *vertex_count
            }
        }
    }

    pub fn baseline_frame_time(&self) -> Option<f64> {
        match &self.state {
            ProbeState::MeasuringBaseline { .. } => None,
            ProbeState::Stepping { baseline_ms, .. } | ProbeState::Stopped { baseline_ms, .. } => {
                Some(*baseline_ms)
            }
        }
    }

    /// Last mean computed over the load window.
    pub fn current_average(&self) -> Option<f64> {
        match &self.state {
            ProbeState::MeasuringBaseline { .. } => None,
            ProbeState::Stepping { average_ms, .. } => *average_ms,
            ProbeState::Stopped { average_ms, .. } => Some(*average_ms),
        }
    }

    pub fn reports(&self) -> &ReportLog {
        &self.log
    }

    pub fn export_report(&self) -> String {
        self.log.export()
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    pub fn active_workload(&self) -> Option<&Workload> {
        self.active.as_ref()
    }

    pub fn baseline_object(&self) -> &Workload {
        &self.baseline_object
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }
}
