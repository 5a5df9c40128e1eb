use crate::angle::wrap_angle_signed;
use crate::sink::RendererSink;

/// Sphere orientation in degrees. Pitch stays 0: vertical rotation is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    pub yaw: f64,
    pub pitch: f64,
}

/// Single owner of the yaw value. Every write is wrapped to `(-180, 180]`
/// and pushed to the sink before `set` returns.
#[derive(Debug, Default)]
pub struct OrientationState {
    yaw: f64,
}

impl OrientationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Orientation {
        Orientation {
            yaw: self.yaw,
            pitch: 0.0,
        }
    }

    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    pub fn set(&mut self, yaw: f64, sink: &mut impl RendererSink) {
        self.yaw = wrap_angle_signed(yaw);
        sink.apply_orientation(self.get());
    }

    /// Push the current value again without changing it.
    pub fn reassert(&self, sink: &mut impl RendererSink) {
        sink.apply_orientation(self.get());
    }
}
