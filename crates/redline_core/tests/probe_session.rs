//! Headless probe sessions driven by a manual clock.

use redline_core::metrics::ManualClock;
use redline_core::{Phase, ProbeConfig, ProbeController, Report, Scene, Workload, WorkloadKind};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("gpu hung")]
struct GpuHung;

enum CostModel {
    /// Every frame takes the same time.
    Fixed(f64),
    /// `base + vertices * per_vertex`, over the attached test vertices.
    Linear { base_ms: f64, per_vertex_ms: f64 },
}

struct ScriptedScene {
    clock: ManualClock,
    cost: CostModel,
    test_vertices: u32,
    renders: usize,
    hang_on_render: Option<usize>,
    attaches: usize,
    refuse_attach: Option<usize>,
}

impl ScriptedScene {
    fn new(clock: ManualClock, cost: CostModel) -> Self {
        Self {
            clock,
            cost,
            test_vertices: 0,
            renders: 0,
            hang_on_render: None,
            attaches: 0,
            refuse_attach: None,
        }
    }
}

impl Scene for ScriptedScene {
    type Error = GpuHung;

    fn render_frame(&mut self) -> Result<(), GpuHung> {
        self.renders += 1;
        if self.hang_on_render == Some(self.renders) {
            return Err(GpuHung);
        }
        let ms = match self.cost {
            CostModel::Fixed(ms) => ms,
            CostModel::Linear {
                base_ms,
                per_vertex_ms,
            } => base_ms + f64::from(self.test_vertices) * per_vertex_ms,
        };
        self.clock.advance_ms(ms);
        Ok(())
    }

    fn add_to_scene(&mut self, workload: &Workload) -> Result<(), GpuHung> {
        self.attaches += 1;
        if self.refuse_attach == Some(self.attaches) {
            return Err(GpuHung);
        }
        if workload.kind() == WorkloadKind::Test {
            assert_eq!(self.test_vertices, 0, "previous workload was not removed");
            self.test_vertices = workload.vertex_count();
        }
        Ok(())
    }

    fn remove_from_scene(&mut self, workload: &Workload) {
        if workload.kind() == WorkloadKind::Test {
            self.test_vertices = 0;
        }
    }
}

fn session(cost: CostModel) -> ProbeController<ScriptedScene, ManualClock> {
    let clock = ManualClock::new();
    let config = ProbeConfig {
        seed: Some(2024),
        ..ProbeConfig::default()
    };
    ProbeController::with_clock(config, ScriptedScene::new(clock.clone(), cost), clock).unwrap()
}

fn set_cost(probe: &mut ProbeController<ScriptedScene, ManualClock>, ms: f64) {
    probe.scene_mut().cost = CostModel::Fixed(ms);
}

#[test]
fn identical_baseline_samples_freeze_the_baseline() {
    let mut probe = session(CostModel::Fixed(7.25));

    for _ in 0..60 {
        probe.tick().unwrap();
    }

    assert_eq!(probe.phase(), Phase::Stepping);
    assert_eq!(probe.vertex_count(), 1000);
    assert!((probe.baseline_frame_time().unwrap() - 7.25).abs() < 1e-9);
    assert_eq!(probe.reports().len(), 1);
}

#[test]
fn end_to_end_breaking_point() {
    let mut probe = session(CostModel::Fixed(5.0));

    for _ in 0..60 {
        probe.tick().unwrap();
    }
    assert_eq!(probe.export_report(), "Baseline: 5.00ms");
    assert_eq!(probe.vertex_count(), 1000);

    // Well under budget: one step per frame.
    set_cost(&mut probe, 10.0);
    for i in 1..=100u32 {
        let report = probe.tick().unwrap().cloned().unwrap();
        assert!(matches!(report, Report::Progress { .. }));
        assert_eq!(probe.vertex_count(), 1000 + i * 1000);
    }
    assert!((probe.current_average().unwrap() - 10.0).abs() < 1e-9);

    // 20ms frames drag the 60-frame average up by 1/6 ms each; the 41st
    // pushes it past 16.67.
    set_cost(&mut probe, 20.0);
    for _ in 0..40 {
        let report = probe.tick().unwrap().cloned().unwrap();
        assert!(!report.is_final());
    }
    assert_eq!(probe.vertex_count(), 141_000);

    let last = probe.tick().unwrap().cloned().unwrap();
    assert!(last.is_final());
    assert_eq!(probe.phase(), Phase::Stopped);
    assert_eq!(probe.vertex_count(), 141_000);
    assert_eq!(
        last.to_string(),
        "Breaking point: 141,000 vertices | Baseline: 5.00ms | Avg: 16.83ms | FPS: 59.4"
    );

    let lines = probe.reports().len();
    assert_eq!(lines, 1 + 100 + 40 + 1);
    assert_eq!(probe.export_report().lines().count(), lines);
}

#[test]
fn growth_is_monotonic_until_the_budget_breaks() {
    // 4ms + 0.1ms per thousand vertices crosses 16.67ms near 126k vertices.
    let mut probe = session(CostModel::Linear {
        base_ms: 4.0,
        per_vertex_ms: 0.0001,
    });

    let mut previous = 0;
    for _ in 0..10_000 {
        probe.tick().unwrap();
        if probe.is_stopped() {
            break;
        }
        if probe.phase() == Phase::Stepping {
            let current = probe.vertex_count();
            if previous != 0 {
                assert_eq!(current, previous + 1000);
            }
            previous = current;
        }
    }

    assert!(probe.is_stopped());
    let average = probe.current_average().unwrap();
    assert!(average > 16.67);
    assert!(probe.reports().last().unwrap().is_final());
    assert!(probe.vertex_count() > 126_000);
}

#[test]
fn stopped_is_idempotent() {
    let mut probe = session(CostModel::Fixed(18.0));
    while !probe.is_stopped() {
        probe.tick().unwrap();
    }

    let vertex_count = probe.vertex_count();
    let baseline = probe.baseline_frame_time();
    let reports = probe.reports().len();
    let renders = probe.scene().renders;

    set_cost(&mut probe, 1.0);
    for _ in 0..500 {
        assert!(probe.tick().unwrap().is_none());
    }

    assert_eq!(probe.vertex_count(), vertex_count);
    assert_eq!(probe.baseline_frame_time(), baseline);
    assert_eq!(probe.reports().len(), reports);
    // Still rendering for visual continuity.
    assert_eq!(probe.scene().renders, renders + 500);
}

#[test]
fn render_failure_aborts_mid_stepping() {
    let mut probe = session(CostModel::Fixed(5.0));
    probe.scene_mut().hang_on_render = Some(65);

    for _ in 0..64 {
        probe.tick().unwrap();
    }
    let before = probe.export_report();

    let err = probe.tick().unwrap_err();
    assert_eq!(err.to_string(), "render submission failed");
    assert_eq!(probe.export_report(), before);
    assert_eq!(probe.vertex_count(), 5000);
}

#[test]
fn refused_workload_freezes_the_session() {
    let mut probe = session(CostModel::Linear {
        base_ms: 5.0,
        per_vertex_ms: 0.0001,
    });
    // Attach 1 is the cube, 2 is the first workload; the 11th (10,000 vertices) fails.
    probe.scene_mut().refuse_attach = Some(11);

    let mut failure = None;
    for _ in 0..200 {
        if let Err(e) = probe.tick() {
            failure = Some(e);
            break;
        }
    }

    let failure = failure.expect("scene refusal should surface from tick");
    assert_eq!(failure.to_string(), "scene rejected workload of 10000 vertices");
    assert_eq!(probe.phase(), Phase::Stopped);
    assert_eq!(probe.vertex_count(), 9000);
    assert!(!probe.reports().last().unwrap().is_final());
    assert_eq!(probe.scene().test_vertices, 0);

    // Later frames render the baseline scene and report nothing.
    let reports = probe.reports().len();
    for _ in 0..30 {
        assert!(probe.tick().unwrap().is_none());
    }
    assert_eq!(probe.reports().len(), reports);
    assert_eq!(probe.scene().attaches, 11);
}
