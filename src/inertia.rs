// inertia.rs: exponential coast after a fling

use crate::angle::clamp;
use crate::config::GalleryConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InertiaState {
    pub velocity: f64,
    pub frame_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InertiaStep {
    /// Advance yaw by this many degrees.
    Advance(f64),
    /// Velocity fell below the stop threshold or the frame cap was hit.
    Settled,
}

impl InertiaState {
    pub fn launch(release_velocity: f64, cfg: &GalleryConfig) -> Self {
        let max = cfg.inertia_max_velocity;
        Self {
            velocity: clamp(release_velocity, -max, max) * cfg.inertia_velocity_multiplier,
            frame_count: 0,
        }
    }

    pub fn step(&mut self, cfg: &GalleryConfig) -> InertiaStep {
        self.velocity *= cfg.inertia_friction;
        if self.velocity.is_nan() || self.velocity.abs() < cfg.inertia_stop_threshold {
            return InertiaStep::Settled;
        }
        self.frame_count += 1;
        if self.frame_count > cfg.inertia_max_frames {
            return InertiaStep::Settled;
        }
        InertiaStep::Advance(self.velocity / cfg.inertia_yaw_divisor)
    }
}
