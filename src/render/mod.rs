//! Camera state and the interpolation helpers that animate it.

pub mod camera;
pub mod interpolate;

pub use camera::{CameraPose, OrbitCamera};
pub use interpolate::RotationBlend;
