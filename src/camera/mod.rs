//! Camera system for viewing the sphere corridor.
//!
//! Provides a perspective camera and an orbital controller. The camera has
//! no GPU resources of its own — its view-projection is recomputed once per
//! tick and broadcast into every instance's per-frame uniform snapshot.

/// Orbital camera controller managing rotation, pan, and zoom.
pub mod controller;
/// Core perspective camera math.
pub mod core;

pub use controller::CameraController;
pub use core::Camera;
