// src/lib.rs
//! Rotation core of a tiled spherical gallery.
//!
//! One `RotationController` owns the sphere's yaw and hands it between three
//! mutually exclusive drivers: pointer drag, inertial coasting after a fling,
//! and idle auto-rotation. Frame callbacks and timers go through the
//! `Scheduler` port; state leaves through the `RendererSink` trait.

pub mod angle;
pub mod arbiter;
pub mod auto_rotate;
pub mod config;
pub mod controller;
pub mod drag;
pub mod error;
pub mod inertia;
pub mod layout;
pub mod orientation;
pub mod scheduler;
pub mod sink;
pub mod viewport;

pub use arbiter::Phase;
pub use config::GalleryConfig;
pub use controller::RotationController;
pub use drag::PointerPos;
pub use error::GalleryError;
pub use layout::{build_tiles, ImageRef, TilePlacement};
pub use orientation::Orientation;
pub use scheduler::{FrameScheduler, FrameSource, Scheduler, Task, TaskHandle};
pub use sink::{LatchedSink, RendererSink};
pub use viewport::ViewportMetrics;
