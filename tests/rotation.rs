use dome_gallery::{
    FrameScheduler, GalleryConfig, Orientation, Phase, PointerPos, RendererSink,
    RotationController, ViewportMetrics,
};
use std::time::Duration;

/// Records every orientation push together with the frame it happened in.
/// Pushes caused by input between frames are tagged with frame 0.
#[derive(Default)]
struct Recorder {
    frame: u64,
    writes: Vec<(u64, f64)>,
    metrics: Vec<ViewportMetrics>,
}

impl RendererSink for Recorder {
    fn apply_orientation(&mut self, orientation: Orientation) {
        assert_eq!(orientation.pitch, 0.0);
        assert!(orientation.yaw > -180.0 && orientation.yaw <= 180.0);
        self.writes.push((self.frame, orientation.yaw));
    }

    fn apply_viewport_metrics(&mut self, metrics: ViewportMetrics) {
        self.metrics.push(metrics);
    }
}

struct Harness {
    view: RotationController<FrameScheduler, Recorder>,
    now: Duration,
    frame_no: u64,
}

const FRAME: Duration = Duration::from_millis(16);

impl Harness {
    fn new(cfg: GalleryConfig) -> Self {
        Self {
            view: RotationController::new(cfg, FrameScheduler::new(), Recorder::default()),
            now: Duration::ZERO,
            frame_no: 0,
        }
    }

    fn frame(&mut self) {
        self.now += FRAME;
        self.frame_no += 1;
        self.view.sink_mut().frame = self.frame_no;
        self.view.advance_frame(self.now);
        self.view.sink_mut().frame = 0;
    }

    fn frames(&mut self, n: usize) {
        for _ in 0..n {
            self.frame();
        }
    }

    fn run_for(&mut self, d: Duration) {
        let end = self.now + d;
        while self.now < end {
            self.frame();
        }
    }

    fn writes_in_frame(&self, frame: u64) -> usize {
        self.view
            .sink()
            .writes
            .iter()
            .filter(|(f, _)| *f == frame)
            .count()
    }

    fn drag(&mut self, from: f64, to: f64) {
        self.view.pointer_down(PointerPos::new(from, 0.0));
        self.view.pointer_move(PointerPos::new(to, 0.0));
        self.view.pointer_up(PointerPos::new(to, 0.0));
    }
}

fn short_coast() -> GalleryConfig {
    GalleryConfig {
        inertia_max_frames: 10,
        ..GalleryConfig::default()
    }
}

#[test]
fn fling_coasts_then_resumes_after_cooldown() {
    let mut h = Harness::new(short_coast());
    h.run_for(Duration::from_millis(1100));
    assert_eq!(h.view.phase(), Phase::AutoRotating);

    h.drag(0.0, 150.0);
    assert_eq!(h.view.phase(), Phase::Coasting);
    let yaw_at_release = h.view.orientation().yaw;

    h.frames(10);
    assert_eq!(h.view.phase(), Phase::Coasting);
    assert!(h.view.orientation().yaw > yaw_at_release);

    // the 11th step exceeds the cap
    h.frame();
    assert_eq!(h.view.phase(), Phase::Idle);
    assert!(h.view.arbiter().resume_pending());

    h.run_for(Duration::from_millis(480));
    assert_eq!(h.view.phase(), Phase::Idle);
    h.run_for(Duration::from_millis(40));
    assert_eq!(h.view.phase(), Phase::AutoRotating);
}

#[test]
fn slow_release_skips_coasting() {
    let mut h = Harness::new(GalleryConfig::default());
    h.view.pointer_down(PointerPos::new(0.0, 0.0));
    h.view.pointer_move(PointerPos::new(40.0, 0.0));
    h.view.pointer_up(PointerPos::new(1.5, 0.0));
    assert_eq!(h.view.phase(), Phase::Idle);
    assert!(h.view.inertia().is_none());
    assert!(h.view.arbiter().resume_pending());
}

#[test]
fn at_most_one_write_per_frame() {
    let mut h = Harness::new(short_coast());
    h.run_for(Duration::from_millis(1200));

    // press mid auto-rotate, fling, re-press mid coast, fling again
    h.drag(0.0, 300.0);
    h.frames(3);
    h.drag(0.0, -300.0);
    h.run_for(Duration::from_millis(1500));

    assert!(h.frame_no > 100);
    for frame in 1..=h.frame_no {
        assert!(h.writes_in_frame(frame) <= 1, "frame {} written twice", frame);
    }
}

#[test]
fn press_during_coast_freezes_yaw() {
    let mut h = Harness::new(GalleryConfig::default());
    h.drag(0.0, 600.0);
    h.frames(5);
    assert_eq!(h.view.phase(), Phase::Coasting);

    h.view.pointer_down(PointerPos::new(0.0, 0.0));
    let yaw = h.view.orientation().yaw;
    let writes = h.view.sink().writes.len();
    h.run_for(Duration::from_secs(2));
    assert_eq!(h.view.orientation().yaw, yaw);
    assert_eq!(h.view.sink().writes.len(), writes);
    assert_eq!(h.view.phase(), Phase::Dragging);
}

#[test]
fn release_outside_after_leave_still_coasts() {
    let mut h = Harness::new(GalleryConfig::default());
    h.view.pointer_down(PointerPos::new(0.0, 0.0));
    h.view.pointer_move(PointerPos::new(90.0, 0.0));
    h.view.pointer_leave();
    let yaw = h.view.orientation().yaw;

    // moves after leaving are ignored
    h.view.pointer_move(PointerPos::new(400.0, 0.0));
    assert_eq!(h.view.orientation().yaw, yaw);

    h.frames(5);
    h.view.pointer_up(PointerPos::new(150.0, 0.0));
    assert_eq!(h.view.phase(), Phase::Coasting);
    assert!((h.view.inertia().unwrap().velocity - 48.0).abs() < 1e-9);
    assert!(!h.view.arbiter().resume_pending());
}

#[test]
fn leave_fallback_drops_gesture_and_auto_rotates() {
    let mut h = Harness::new(GalleryConfig::default());
    h.view.pointer_down(PointerPos::new(0.0, 0.0));
    h.view.pointer_move(PointerPos::new(90.0, 0.0));
    h.view.pointer_leave();

    h.run_for(Duration::from_millis(520));
    assert_eq!(h.view.phase(), Phase::AutoRotating);
    assert!(h.view.drag_session().is_none());

    // a release arriving after the fallback is ignored
    h.view.pointer_up(PointerPos::new(150.0, 0.0));
    assert_eq!(h.view.phase(), Phase::AutoRotating);
}

#[test]
fn quick_re_press_after_leave_does_not_start_auto_rotate() {
    let mut h = Harness::new(GalleryConfig::default());
    h.view.pointer_down(PointerPos::new(0.0, 0.0));
    h.view.pointer_move(PointerPos::new(90.0, 0.0));
    h.view.pointer_leave();
    h.frames(3);

    h.view.pointer_down(PointerPos::new(10.0, 0.0));
    h.run_for(Duration::from_secs(2));
    assert_eq!(h.view.phase(), Phase::Dragging);
    assert_eq!(h.view.scheduler().pending_timers(), 0);
    assert_eq!(h.view.scheduler().pending_frames(), 0);
}

#[test]
fn repeated_stops_never_stack_resumptions() {
    let mut h = Harness::new(GalleryConfig::default());
    for _ in 0..5 {
        h.view.pointer_down(PointerPos::new(0.0, 0.0));
        h.view.pointer_up(PointerPos::new(0.0, 0.0));
        h.frames(2);
    }
    assert_eq!(h.view.scheduler().pending_timers(), 1);

    h.run_for(Duration::from_millis(600));
    assert_eq!(h.view.phase(), Phase::AutoRotating);
    assert_eq!(h.view.scheduler().pending_frames(), 1);
}

#[test]
fn resize_reasserts_orientation_without_touching_it() {
    let mut h = Harness::new(GalleryConfig::default());
    h.drag(0.0, 45.0);
    let yaw = h.view.orientation().yaw;
    let writes = h.view.sink().writes.len();

    h.view.resize(1280.0, 720.0);
    assert_eq!(h.view.sink().metrics.len(), 1);
    assert_eq!(h.view.sink().metrics[0].radius, 832.0);
    assert_eq!(h.view.sink().writes.len(), writes + 1);
    assert_eq!(h.view.orientation().yaw, yaw);
}

#[test]
fn yaw_stays_bounded_over_long_spin() {
    let cfg = GalleryConfig {
        auto_rotate_speed: 7.3,
        ..GalleryConfig::default()
    };
    let mut h = Harness::new(cfg);
    h.run_for(Duration::from_secs(30));
    let yaw = h.view.orientation().yaw;
    assert!(yaw > -180.0 && yaw <= 180.0);
}

#[test]
fn dropping_the_view_cancels_pending_work() {
    let mut h = Harness::new(GalleryConfig::default());
    h.run_for(Duration::from_millis(1100));
    h.view.teardown();
    assert_eq!(h.view.scheduler().pending_frames(), 0);
    assert_eq!(h.view.scheduler().pending_timers(), 0);
}
