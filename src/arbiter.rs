// arbiter.rs: which motion driver owns the orientation
//
// The arbiter holds the only two live handles a driver can have: the pending
// per-frame step and the pending auto-rotate resumption. Every transition
// cancels whatever the losing driver had scheduled before it returns, so a
// superseded step can never fire. Handles that arrive after being replaced
// are rejected by `claim_frame` / `claim_resume`.

use crate::scheduler::{Scheduler, Task, TaskHandle};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing animates. A resumption may be pending.
    Idle,
    Dragging,
    Coasting,
    AutoRotating,
}

#[derive(Debug)]
pub struct DriverArbiter {
    phase: Phase,
    frame: Option<TaskHandle>,
    resume: Option<TaskHandle>,
}

impl Default for DriverArbiter {
    fn default() -> Self {
        Self::new()
    }
}

impl DriverArbiter {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            frame: None,
            resume: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while an auto-rotate resumption (or leave fallback) is pending.
    pub fn resume_pending(&self) -> bool {
        self.resume.is_some()
    }

    pub fn frame_pending(&self) -> bool {
        self.frame.is_some()
    }

    /// Any state → Dragging. Stops coasting and auto-rotate, including a
    /// pending resumption.
    pub fn begin_drag(&mut self, sched: &mut impl Scheduler) {
        self.cancel_all(sched);
        self.enter(Phase::Dragging);
    }

    /// Dragging → Coasting.
    pub fn begin_coast(&mut self, sched: &mut impl Scheduler) {
        self.cancel_all(sched);
        self.enter(Phase::Coasting);
        self.frame = Some(sched.schedule_frame(Task::InertiaStep));
    }

    /// → AutoRotating, first step on the next frame.
    pub fn begin_auto_rotate(&mut self, sched: &mut impl Scheduler) {
        self.cancel_all(sched);
        self.enter(Phase::AutoRotating);
        self.frame = Some(sched.schedule_frame(Task::AutoRotateStep));
    }

    /// → Idle with auto-rotate scheduled after `delay`. A pending resumption
    /// is replaced, never stacked.
    pub fn settle(&mut self, sched: &mut impl Scheduler, delay: Duration) {
        self.cancel_all(sched);
        self.enter(Phase::Idle);
        self.resume = Some(sched.schedule_delayed(Task::ResumeAutoRotate, delay));
    }

    /// Dragging stays Dragging after the pointer leaves, with a fallback armed
    /// in the resumption slot in case the release never arrives.
    pub fn arm_leave_fallback(&mut self, sched: &mut impl Scheduler, delay: Duration) {
        if let Some(h) = self.resume.take() {
            sched.cancel(h);
        }
        self.resume = Some(sched.schedule_delayed(Task::ReleaseStaleGesture, delay));
    }

    /// Re-arm the per-frame step of the current driver.
    pub fn continue_frame(&mut self, sched: &mut impl Scheduler, task: Task) {
        if let Some(h) = self.frame.take() {
            sched.cancel(h);
        }
        self.frame = Some(sched.schedule_frame(task));
    }

    /// Consume a fired frame handle. False means it was superseded.
    pub fn claim_frame(&mut self, handle: TaskHandle) -> bool {
        if self.frame == Some(handle) {
            self.frame = None;
            true
        } else {
            false
        }
    }

    /// Consume a fired resumption handle. False means it was superseded.
    pub fn claim_resume(&mut self, handle: TaskHandle) -> bool {
        if self.resume == Some(handle) {
            self.resume = None;
            true
        } else {
            false
        }
    }

    /// Current driver finished on its own → Idle, nothing scheduled.
    pub fn stop(&mut self, sched: &mut impl Scheduler) {
        self.cancel_all(sched);
        self.enter(Phase::Idle);
    }

    fn cancel_all(&mut self, sched: &mut impl Scheduler) {
        if let Some(h) = self.frame.take() {
            sched.cancel(h);
        }
        if let Some(h) = self.resume.take() {
            sched.cancel(h);
        }
    }

    fn enter(&mut self, next: Phase) {
        if self.phase != next {
            log::debug!("arbiter: {:?} -> {:?}", self.phase, next);
        }
        self.phase = next;
    }
}
