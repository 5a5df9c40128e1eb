// sink.rs: the presentation boundary
//
// The rotation core pushes state out through this trait and never reads back.

use crate::orientation::Orientation;
use crate::viewport::ViewportMetrics;

pub trait RendererSink {
    fn apply_orientation(&mut self, orientation: Orientation);
    fn apply_viewport_metrics(&mut self, metrics: ViewportMetrics);
}

impl<T: RendererSink + ?Sized> RendererSink for &mut T {
    fn apply_orientation(&mut self, orientation: Orientation) {
        (**self).apply_orientation(orientation);
    }

    fn apply_viewport_metrics(&mut self, metrics: ViewportMetrics) {
        (**self).apply_viewport_metrics(metrics);
    }
}

/// Sink that keeps the latest values, for hosts that render on their own clock.
#[derive(Debug, Clone, Default)]
pub struct LatchedSink {
    pub orientation: Orientation,
    pub metrics: Option<ViewportMetrics>,
    /// Number of orientation pushes received.
    pub orientation_writes: u64,
}

impl RendererSink for LatchedSink {
    fn apply_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
        self.orientation_writes += 1;
    }

    fn apply_viewport_metrics(&mut self, metrics: ViewportMetrics) {
        self.metrics = Some(metrics);
    }
}
