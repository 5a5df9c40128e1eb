// viewport.rs: projection radius and viewer padding from the container size
//
// Independent of rotation. A wide container uses its full width as the
// basis, otherwise the shorter side; the result is capped by a multiple of
// the height and floored at `min_radius`.

use crate::angle::clamp;
use crate::config::GalleryConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMetrics {
    pub radius: f64,
    pub viewer_padding: f64,
}

/// `None` when either dimension is not a finite number.
pub fn compute_metrics(width: f64, height: f64, cfg: &GalleryConfig) -> Option<ViewportMetrics> {
    if !width.is_finite() || !height.is_finite() {
        return None;
    }
    let w = width.max(1.0);
    let h = height.max(1.0);
    let min_dim = w.min(h);
    let aspect = w / h;
    let basis = if aspect >= cfg.wide_aspect { w } else { min_dim };

    let radius = radius_for_basis(basis, h, cfg);
    let viewer_padding = cfg
        .min_viewer_padding
        .max((min_dim * cfg.viewer_padding_fraction).round());

    Some(ViewportMetrics {
        radius,
        viewer_padding,
    })
}

/// `basis * radius_fraction`, capped at `height * height_guard`, bounded to
/// `[min_radius, max_radius]` and rounded to whole pixels.
pub fn radius_for_basis(basis: f64, height: f64, cfg: &GalleryConfig) -> f64 {
    let radius = (basis * cfg.radius_fraction).min(height * cfg.height_guard);
    clamp(radius, cfg.min_radius, cfg.radius_ceiling()).round()
}

/// Remembers the last good measurement so repeated notifications of the same
/// size are cheap to detect.
#[derive(Debug, Default)]
pub struct ViewportCalculator {
    last: Option<ViewportMetrics>,
}

impl ViewportCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<ViewportMetrics> {
        self.last
    }

    /// Recompute for a new container size. An invalid size keeps the previous
    /// metrics and returns `None`.
    pub fn on_resize(
        &mut self,
        width: f64,
        height: f64,
        cfg: &GalleryConfig,
    ) -> Option<ViewportMetrics> {
        let metrics = compute_metrics(width, height, cfg)?;
        self.last = Some(metrics);
        Some(metrics)
    }
}
