// drag.rs: one press-drag-release cycle
//
// Only horizontal displacement drives yaw; the vertical coordinate is kept
// for completeness but never read for rotation.

use crate::angle::{clamp, finite_or};
use crate::config::GalleryConfig;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPos {
    pub x: f64,
    pub y: f64,
}

impl PointerPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub start_yaw: f64,
    pub start_x: f64,
    pub start_y: f64,
    pub has_moved: bool,
    /// Cleared when the pointer leaves the surface; moves stop applying but the
    /// start reference survives for a late release.
    tracking: bool,
}

/// How a release resolves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Release {
    /// Never passed the drag distance threshold.
    Tap,
    /// Moved, but too slowly to coast.
    Settle { velocity: f64 },
    /// Moved fast enough to hand off to inertia.
    Fling { velocity: f64 },
}

impl DragSession {
    pub fn open(start_yaw: f64, pos: PointerPos) -> Self {
        Self {
            start_yaw,
            start_x: finite_or(pos.x, 0.0),
            start_y: finite_or(pos.y, 0.0),
            has_moved: false,
            tracking: true,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn detach(&mut self) {
        self.tracking = false;
    }

    /// Horizontal displacement from the press point. A non-finite coordinate
    /// counts as no displacement.
    pub fn displacement(&self, pos: PointerPos) -> f64 {
        finite_or(pos.x, self.start_x) - self.start_x
    }

    /// Apply a move. Returns the unwrapped target yaw.
    pub fn track(&mut self, pos: PointerPos, cfg: &GalleryConfig) -> f64 {
        let dx = self.displacement(pos);
        if !self.has_moved && dx.abs() > cfg.min_drag_distance {
            self.has_moved = true;
        }
        self.start_yaw + dx / cfg.drag_sensitivity
    }

    pub fn release(&self, pos: PointerPos, cfg: &GalleryConfig) -> Release {
        if !self.has_moved {
            return Release::Tap;
        }
        let velocity = release_velocity(self.displacement(pos), cfg);
        if velocity.abs() > cfg.min_release_velocity {
            Release::Fling { velocity }
        } else {
            Release::Settle { velocity }
        }
    }
}

/// Velocity proportional to the final displacement, clamped to the release limit.
pub fn release_velocity(dx: f64, cfg: &GalleryConfig) -> f64 {
    let limit = cfg.release_velocity_limit;
    clamp(
        (dx / cfg.drag_sensitivity) * cfg.release_velocity_scale,
        -limit,
        limit,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_moves_stay_a_tap() {
        let cfg = GalleryConfig::default();
        let mut s = DragSession::open(0.0, PointerPos::new(100.0, 100.0));
        s.track(PointerPos::new(104.0, 300.0), &cfg);
        s.track(PointerPos::new(96.0, 0.0), &cfg);
        assert!(!s.has_moved);
        assert_eq!(s.release(PointerPos::new(104.0, 0.0), &cfg), Release::Tap);
    }

    #[test]
    fn drag_of_150px_turns_10_degrees() {
        let cfg = GalleryConfig::default();
        let mut s = DragSession::open(5.0, PointerPos::new(0.0, 0.0));
        assert_eq!(s.track(PointerPos::new(75.0, 40.0), &cfg), 10.0);
        assert_eq!(s.track(PointerPos::new(150.0, -40.0), &cfg), 15.0);
        assert!(s.has_moved);
    }

    #[test]
    fn release_after_150px_flings_at_0_4() {
        let cfg = GalleryConfig::default();
        let mut s = DragSession::open(0.0, PointerPos::new(0.0, 0.0));
        s.track(PointerPos::new(150.0, 0.0), &cfg);
        match s.release(PointerPos::new(150.0, 0.0), &cfg) {
            Release::Fling { velocity } => assert!((velocity - 0.4).abs() < 1e-12),
            other => panic!("expected fling, got {:?}", other),
        }
    }

    #[test]
    fn moved_but_returned_settles() {
        let cfg = GalleryConfig::default();
        let mut s = DragSession::open(0.0, PointerPos::new(0.0, 0.0));
        s.track(PointerPos::new(50.0, 0.0), &cfg);
        s.track(PointerPos::new(1.0, 0.0), &cfg);
        assert!(s.has_moved);
        // (1 / 15) * 0.04 ≈ 0.0027, below 0.005
        assert!(matches!(
            s.release(PointerPos::new(1.0, 0.0), &cfg),
            Release::Settle { .. }
        ));
    }

    #[test]
    fn release_velocity_is_clamped() {
        let cfg = GalleryConfig::default();
        assert_eq!(release_velocity(10_000.0, &cfg), 2.0);
        assert_eq!(release_velocity(-10_000.0, &cfg), -2.0);
    }

    #[test]
    fn non_finite_pointer_means_no_displacement() {
        let cfg = GalleryConfig::default();
        let mut s = DragSession::open(12.0, PointerPos::new(30.0, 0.0));
        assert_eq!(s.track(PointerPos::new(f64::NAN, 0.0), &cfg), 12.0);
        assert!(!s.has_moved);
    }
}
