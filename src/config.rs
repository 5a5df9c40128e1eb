// config.rs: tuning for motion, layout and viewport
//
// All values are fixed once a controller is built. The JSON file may set any
// subset of fields; the rest keep their defaults.

use crate::error::GalleryError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Pixels of horizontal displacement per degree of yaw.
    pub drag_sensitivity: f64,
    /// |dx| must exceed this before a press counts as a drag.
    pub min_drag_distance: f64,
    pub release_velocity_scale: f64,
    pub release_velocity_limit: f64,
    /// Release velocities at or below this resume auto-rotate instead of coasting.
    pub min_release_velocity: f64,

    /// Degrees of yaw per auto-rotate frame.
    pub auto_rotate_speed: f64,

    pub inertia_max_velocity: f64,
    pub inertia_velocity_multiplier: f64,
    pub inertia_friction: f64,
    pub inertia_stop_threshold: f64,
    pub inertia_max_frames: u32,
    /// Yaw advance per coasting frame is `velocity / inertia_yaw_divisor`.
    pub inertia_yaw_divisor: f64,

    pub resume_delay_ms: u64,
    pub startup_delay_ms: u64,

    pub segments: usize,

    pub min_radius: f64,
    /// `None` leaves the radius unbounded above.
    pub max_radius: Option<f64>,
    pub radius_fraction: f64,
    pub height_guard: f64,
    pub wide_aspect: f64,
    pub viewer_padding_fraction: f64,
    pub min_viewer_padding: f64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            drag_sensitivity: 15.0,
            min_drag_distance: 4.0,
            release_velocity_scale: 0.04,
            release_velocity_limit: 2.0,
            min_release_velocity: 0.005,

            auto_rotate_speed: 0.04,

            inertia_max_velocity: 2.5,
            inertia_velocity_multiplier: 120.0,
            inertia_friction: 0.992,
            inertia_stop_threshold: 0.001,
            inertia_max_frames: 1200,
            inertia_yaw_divisor: 200.0,

            resume_delay_ms: 500,
            startup_delay_ms: 1000,

            segments: 35,

            min_radius: 700.0,
            max_radius: None,
            radius_fraction: 0.65,
            height_guard: 1.35,
            wide_aspect: 1.3,
            viewer_padding_fraction: 0.25,
            min_viewer_padding: 8.0,
        }
    }
}

impl GalleryConfig {
    /// Load from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, GalleryError> {
        if !path.exists() {
            log::info!("No gallery config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| GalleryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, GalleryError> {
        let cfg: GalleryConfig = serde_json::from_str(text)?;
        Ok(cfg.sanitized())
    }

    /// Replace every value outside its domain with the default.
    pub fn sanitized(mut self) -> Self {
        let d = Self::default();

        fn positive(name: &str, v: &mut f64, fallback: f64) {
            if !(v.is_finite() && *v > 0.0) {
                log::warn!("config: {} = {} is invalid, using {}", name, v, fallback);
                *v = fallback;
            }
        }
        fn non_negative(name: &str, v: &mut f64, fallback: f64) {
            if !(v.is_finite() && *v >= 0.0) {
                log::warn!("config: {} = {} is invalid, using {}", name, v, fallback);
                *v = fallback;
            }
        }

        positive("drag_sensitivity", &mut self.drag_sensitivity, d.drag_sensitivity);
        non_negative("min_drag_distance", &mut self.min_drag_distance, d.min_drag_distance);
        positive(
            "release_velocity_scale",
            &mut self.release_velocity_scale,
            d.release_velocity_scale,
        );
        positive(
            "release_velocity_limit",
            &mut self.release_velocity_limit,
            d.release_velocity_limit,
        );
        non_negative(
            "min_release_velocity",
            &mut self.min_release_velocity,
            d.min_release_velocity,
        );
        if !self.auto_rotate_speed.is_finite() {
            log::warn!("config: auto_rotate_speed is not finite, using {}", d.auto_rotate_speed);
            self.auto_rotate_speed = d.auto_rotate_speed;
        }
        positive("inertia_max_velocity", &mut self.inertia_max_velocity, d.inertia_max_velocity);
        positive(
            "inertia_velocity_multiplier",
            &mut self.inertia_velocity_multiplier,
            d.inertia_velocity_multiplier,
        );
        if !(self.inertia_friction.is_finite()
            && self.inertia_friction > 0.0
            && self.inertia_friction < 1.0)
        {
            log::warn!(
                "config: inertia_friction = {} must lie in (0, 1), using {}",
                self.inertia_friction,
                d.inertia_friction
            );
            self.inertia_friction = d.inertia_friction;
        }
        positive(
            "inertia_stop_threshold",
            &mut self.inertia_stop_threshold,
            d.inertia_stop_threshold,
        );
        positive("inertia_yaw_divisor", &mut self.inertia_yaw_divisor, d.inertia_yaw_divisor);
        if self.segments == 0 {
            log::warn!("config: segments = 0, using {}", d.segments);
            self.segments = d.segments;
        }

        non_negative("min_radius", &mut self.min_radius, d.min_radius);
        if let Some(max) = self.max_radius {
            if max.is_nan() || max < self.min_radius {
                log::warn!("config: max_radius = {} is below min_radius, ignoring", max);
                self.max_radius = None;
            }
        }
        positive("radius_fraction", &mut self.radius_fraction, d.radius_fraction);
        positive("height_guard", &mut self.height_guard, d.height_guard);
        positive("wide_aspect", &mut self.wide_aspect, d.wide_aspect);
        non_negative(
            "viewer_padding_fraction",
            &mut self.viewer_padding_fraction,
            d.viewer_padding_fraction,
        );
        non_negative("min_viewer_padding", &mut self.min_viewer_padding, d.min_viewer_padding);

        self
    }

    pub fn resume_delay(&self) -> Duration {
        Duration::from_millis(self.resume_delay_ms)
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    pub fn radius_ceiling(&self) -> f64 {
        self.max_radius.unwrap_or(f64::INFINITY)
    }
}

/// Resolve the config path:
/// 1) `--config <path>`
/// 2) `DOME_CONFIG`
/// 3) `<exe_dir>/assets/gallery.json`
/// 4) `./assets/gallery.json`
pub fn resolve_config_path<I: IntoIterator<Item = String>>(args: I) -> PathBuf {
    let mut it = args.into_iter();
    while let Some(a) = it.next() {
        if a == "--config" {
            if let Some(v) = it.next() {
                return PathBuf::from(v);
            }
        }
    }

    if let Ok(v) = std::env::var("DOME_CONFIG") {
        if !v.trim().is_empty() {
            return PathBuf::from(v);
        }
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let p = dir.join("assets").join("gallery.json");
            if p.exists() {
                return p;
            }
        }
    }

    PathBuf::from("assets").join("gallery.json")
}
