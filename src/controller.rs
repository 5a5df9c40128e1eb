// controller.rs: the rotation core of one gallery view
//
// Owns the orientation, the arbiter, the three drivers, the scheduler and
// the renderer sink. Input handlers and fired tasks are the only entry
// points; every yaw write goes through `OrientationState::set`.

use crate::arbiter::{DriverArbiter, Phase};
use crate::auto_rotate::AutoRotateState;
use crate::config::GalleryConfig;
use crate::drag::{DragSession, PointerPos, Release};
use crate::inertia::{InertiaState, InertiaStep};
use crate::orientation::{Orientation, OrientationState};
use crate::scheduler::{Fired, FrameSource, Scheduler, Task, TaskHandle};
use crate::sink::RendererSink;
use crate::viewport::{ViewportCalculator, ViewportMetrics};
use std::time::Duration;

pub struct RotationController<S: Scheduler, K: RendererSink> {
    cfg: GalleryConfig,
    orientation: OrientationState,
    arbiter: DriverArbiter,
    drag: Option<DragSession>,
    inertia: Option<InertiaState>,
    auto_rotate: AutoRotateState,
    viewport: ViewportCalculator,
    scheduler: S,
    sink: K,
}

impl<S: Scheduler, K: RendererSink> RotationController<S, K> {
    /// Push the initial orientation and schedule the first auto-rotate after
    /// the startup delay.
    pub fn new(cfg: GalleryConfig, scheduler: S, sink: K) -> Self {
        let mut this = Self {
            cfg,
            orientation: OrientationState::new(),
            arbiter: DriverArbiter::new(),
            drag: None,
            inertia: None,
            auto_rotate: AutoRotateState::default(),
            viewport: ViewportCalculator::new(),
            scheduler,
            sink,
        };
        this.orientation.reassert(&mut this.sink);
        let delay = this.cfg.startup_delay();
        this.arbiter.settle(&mut this.scheduler, delay);
        log::info!("rotation controller ready, auto-rotate in {:?}", delay);
        this
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.cfg
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation.get()
    }

    pub fn phase(&self) -> Phase {
        self.arbiter.phase()
    }

    pub fn arbiter(&self) -> &DriverArbiter {
        &self.arbiter
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn inertia(&self) -> Option<&InertiaState> {
        self.inertia.as_ref()
    }

    pub fn auto_rotate(&self) -> AutoRotateState {
        self.auto_rotate
    }

    pub fn viewport(&self) -> Option<ViewportMetrics> {
        self.viewport.current()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    // ---- input ----

    pub fn pointer_down(&mut self, pos: PointerPos) {
        self.arbiter.begin_drag(&mut self.scheduler);
        self.inertia = None;
        self.auto_rotate.deactivate();
        self.drag = Some(DragSession::open(self.orientation.yaw(), pos));
    }

    pub fn pointer_move(&mut self, pos: PointerPos) {
        if self.arbiter.phase() != Phase::Dragging {
            return;
        }
        let Some(session) = self.drag.as_mut().filter(|s| s.is_tracking()) else {
            return;
        };
        let yaw = session.track(pos, &self.cfg);
        self.orientation.set(yaw, &mut self.sink);
    }

    /// A release without an open session (already handled, or dropped by the
    /// leave fallback) is ignored.
    pub fn pointer_up(&mut self, pos: PointerPos) {
        let Some(session) = self.drag.take() else {
            return;
        };
        match session.release(pos, &self.cfg) {
            Release::Fling { velocity } => self.start_inertia(velocity),
            Release::Settle { velocity } => {
                log::debug!("release velocity {:.4} too low to coast", velocity);
                self.schedule_resume();
            }
            Release::Tap => self.schedule_resume(),
        }
    }

    /// Stop applying moves but keep the session so a release outside the
    /// surface still counts.
    pub fn pointer_leave(&mut self) {
        if self.arbiter.phase() != Phase::Dragging {
            return;
        }
        let Some(session) = self.drag.as_mut().filter(|s| s.is_tracking()) else {
            return;
        };
        session.detach();
        let delay = self.cfg.resume_delay();
        self.arbiter.arm_leave_fallback(&mut self.scheduler, delay);
    }

    /// Recompute radius and padding; re-push the orientation so the transform
    /// stays consistent. Invalid sizes are skipped.
    pub fn resize(&mut self, width: f64, height: f64) {
        match self.viewport.on_resize(width, height, &self.cfg) {
            Some(metrics) => {
                self.sink.apply_viewport_metrics(metrics);
                self.orientation.reassert(&mut self.sink);
            }
            None => log::debug!("skipping resize to {}x{}", width, height),
        }
    }

    // ---- scheduled work ----

    pub fn run(&mut self, fired: Fired) {
        let Fired { handle, task } = fired;
        match task {
            Task::AutoRotateStep => self.auto_rotate_step(handle),
            Task::InertiaStep => self.inertia_step(handle),
            Task::ResumeAutoRotate => self.resume_auto_rotate(handle),
            Task::ReleaseStaleGesture => self.release_stale_gesture(handle),
        }
    }

    /// Cancel every pending frame step and timer. The controller stays
    /// usable; input starts it again.
    pub fn teardown(&mut self) {
        self.arbiter.stop(&mut self.scheduler);
        self.drag = None;
        self.inertia = None;
        self.auto_rotate.deactivate();
    }

    fn auto_rotate_step(&mut self, handle: TaskHandle) {
        if !self.arbiter.claim_frame(handle) {
            log::trace!("stale auto-rotate frame {}", handle.id());
            return;
        }
        if self.arbiter.phase() != Phase::AutoRotating {
            return;
        }
        let Some(delta) = self.auto_rotate.step(&self.cfg) else {
            return;
        };
        self.orientation
            .set(self.orientation.yaw() + delta, &mut self.sink);
        self.arbiter
            .continue_frame(&mut self.scheduler, Task::AutoRotateStep);
    }

    fn inertia_step(&mut self, handle: TaskHandle) {
        if !self.arbiter.claim_frame(handle) {
            log::trace!("stale inertia frame {}", handle.id());
            return;
        }
        if self.arbiter.phase() != Phase::Coasting {
            return;
        }
        let Some(inertia) = self.inertia.as_mut() else {
            return;
        };
        match inertia.step(&self.cfg) {
            InertiaStep::Advance(delta) => {
                self.orientation
                    .set(self.orientation.yaw() + delta, &mut self.sink);
                self.arbiter
                    .continue_frame(&mut self.scheduler, Task::InertiaStep);
            }
            InertiaStep::Settled => {
                log::debug!("inertia settled after {} frames", inertia.frame_count);
                self.inertia = None;
                self.schedule_resume();
            }
        }
    }

    fn resume_auto_rotate(&mut self, handle: TaskHandle) {
        if !self.arbiter.claim_resume(handle) {
            log::trace!("stale resume timer {}", handle.id());
            return;
        }
        if matches!(self.arbiter.phase(), Phase::Dragging | Phase::Coasting) {
            return;
        }
        self.start_auto_rotate();
    }

    fn release_stale_gesture(&mut self, handle: TaskHandle) {
        if !self.arbiter.claim_resume(handle) {
            log::trace!("stale leave fallback {}", handle.id());
            return;
        }
        if self.drag.take().is_some() {
            log::debug!("release never arrived, dropping gesture");
        }
        if self.arbiter.phase() == Phase::Dragging {
            self.start_auto_rotate();
        }
    }

    fn start_inertia(&mut self, release_velocity: f64) {
        let state = InertiaState::launch(release_velocity, &self.cfg);
        log::debug!("coasting from velocity {:.3}", state.velocity);
        self.auto_rotate.deactivate();
        self.inertia = Some(state);
        self.arbiter.begin_coast(&mut self.scheduler);
    }

    fn start_auto_rotate(&mut self) {
        self.inertia = None;
        self.auto_rotate.activate();
        self.arbiter.begin_auto_rotate(&mut self.scheduler);
    }

    fn schedule_resume(&mut self) {
        let delay = self.cfg.resume_delay();
        self.arbiter.settle(&mut self.scheduler, delay);
    }
}

impl<S: Scheduler + FrameSource, K: RendererSink> RotationController<S, K> {
    /// Open a frame at `now` (time since the view started) and run everything
    /// due in it. Returns the number of tasks run.
    pub fn advance_frame(&mut self, now: Duration) -> usize {
        self.scheduler.begin_frame(now);
        let mut ran = 0;
        while let Some(fired) = self.scheduler.pop_due() {
            self.run(fired);
            ran += 1;
        }
        ran
    }
}

impl<S: Scheduler, K: RendererSink> Drop for RotationController<S, K> {
    fn drop(&mut self) {
        self.teardown();
    }
}
