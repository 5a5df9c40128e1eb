// scheduler.rs: frame callbacks and delayed timers
//
// Work is named by `Task` rather than by closure so the controller can run
// it against its own state. The clock is supplied by the caller, which makes
// `FrameScheduler` deterministic under test.

use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    AutoRotateStep,
    InertiaStep,
    ResumeAutoRotate,
    /// Leave-fallback: drop a gesture whose release never arrived.
    ReleaseStaleGesture,
}

/// Cancel token for one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskHandle(u64);

impl TaskHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// A task that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub handle: TaskHandle,
    pub task: Task,
}

pub trait Scheduler {
    /// Run `task` once at the next frame boundary.
    fn schedule_frame(&mut self, task: Task) -> TaskHandle;
    /// Run `task` once after `delay`.
    fn schedule_delayed(&mut self, task: Task, delay: Duration) -> TaskHandle;
    /// Unknown or already-fired handles are ignored.
    fn cancel(&mut self, handle: TaskHandle);
}

/// A source of due tasks, driven one frame at a time.
pub trait FrameSource {
    /// Open the next frame at clock `now` (time since start).
    fn begin_frame(&mut self, now: Duration);
    /// Pop the next task due in the current frame.
    fn pop_due(&mut self) -> Option<Fired>;
}

#[derive(Debug)]
struct Timer {
    handle: TaskHandle,
    deadline: Duration,
    task: Task,
}

#[derive(Debug)]
struct FrameTask {
    handle: TaskHandle,
    frame: u64,
    task: Task,
}

/// Frame tasks registered during frame N run in frame N+1. Timers run in the
/// first frame whose clock reaches their deadline, earliest deadline first,
/// ties in registration order, ahead of that frame's frame tasks.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    now: Duration,
    frame: u64,
    next_id: u64,
    frames: VecDeque<FrameTask>,
    timers: Vec<Timer>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn frame_index(&self) -> u64 {
        self.frame
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.frames.iter().any(|f| f.handle == handle)
            || self.timers.iter().any(|t| t.handle == handle)
    }

    /// Deadline of the earliest timer, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.iter().map(|t| t.deadline).min()
    }

    fn allocate(&mut self) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        handle
    }
}

impl Scheduler for FrameScheduler {
    fn schedule_frame(&mut self, task: Task) -> TaskHandle {
        let handle = self.allocate();
        self.frames.push_back(FrameTask {
            handle,
            frame: self.frame + 1,
            task,
        });
        handle
    }

    fn schedule_delayed(&mut self, task: Task, delay: Duration) -> TaskHandle {
        let handle = self.allocate();
        self.timers.push(Timer {
            handle,
            deadline: self.now + delay,
            task,
        });
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) {
        self.frames.retain(|f| f.handle != handle);
        self.timers.retain(|t| t.handle != handle);
    }
}

impl FrameSource for FrameScheduler {
    fn begin_frame(&mut self, now: Duration) {
        // the clock never runs backwards
        self.now = self.now.max(now);
        self.frame += 1;
    }

    fn pop_due(&mut self) -> Option<Fired> {
        let now = self.now;
        let due_timer = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= now)
            .min_by_key(|(_, t)| (t.deadline, t.handle))
            .map(|(i, _)| i);
        if let Some(i) = due_timer {
            let t = self.timers.remove(i);
            return Some(Fired {
                handle: t.handle,
                task: t.task,
            });
        }

        if self.frames.front().is_some_and(|f| f.frame <= self.frame) {
            return self.frames.pop_front().map(|f| Fired {
                handle: f.handle,
                task: f.task,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut FrameScheduler) -> Vec<Task> {
        std::iter::from_fn(|| s.pop_due()).map(|f| f.task).collect()
    }

    #[test]
    fn frame_tasks_wait_for_next_frame() {
        let mut s = FrameScheduler::new();
        s.schedule_frame(Task::AutoRotateStep);
        assert!(s.pop_due().is_none());

        s.begin_frame(Duration::from_millis(16));
        assert_eq!(drain(&mut s), vec![Task::AutoRotateStep]);
    }

    #[test]
    fn frame_task_scheduled_mid_frame_runs_next_frame() {
        let mut s = FrameScheduler::new();
        s.schedule_frame(Task::InertiaStep);
        s.begin_frame(Duration::from_millis(16));
        let fired = s.pop_due().unwrap();
        assert_eq!(fired.task, Task::InertiaStep);
        s.schedule_frame(Task::InertiaStep);
        assert!(s.pop_due().is_none());
        assert_eq!(s.pending_frames(), 1);
    }

    #[test]
    fn timers_fire_in_deadline_order() {
        let mut s = FrameScheduler::new();
        s.schedule_delayed(Task::ResumeAutoRotate, Duration::from_millis(500));
        s.schedule_delayed(Task::ReleaseStaleGesture, Duration::from_millis(100));

        s.begin_frame(Duration::from_millis(50));
        assert!(drain(&mut s).is_empty());

        s.begin_frame(Duration::from_millis(600));
        assert_eq!(
            drain(&mut s),
            vec![Task::ReleaseStaleGesture, Task::ResumeAutoRotate]
        );
        assert_eq!(s.next_deadline(), None);
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut s = FrameScheduler::new();
        let frame = s.schedule_frame(Task::AutoRotateStep);
        let timer = s.schedule_delayed(Task::ResumeAutoRotate, Duration::ZERO);
        s.cancel(frame);
        s.cancel(timer);
        s.cancel(timer);
        assert!(!s.is_pending(frame));

        s.begin_frame(Duration::from_secs(1));
        assert!(s.pop_due().is_none());
    }

    #[test]
    fn clock_is_monotonic() {
        let mut s = FrameScheduler::new();
        s.begin_frame(Duration::from_millis(100));
        s.begin_frame(Duration::from_millis(10));
        assert_eq!(s.now(), Duration::from_millis(100));
        assert_eq!(s.frame_index(), 2);
    }
}
