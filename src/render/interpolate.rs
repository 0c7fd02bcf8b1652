//! Time-progress blending for camera fly-to transitions.
//!
//! Everything here is a pure function of its inputs; the controller owns
//! the clock and the transition bookkeeping.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// How orientation is blended between two Euler triples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationBlend {
    /// Straight per-axis blend of the raw angles. Large deltas may take the
    /// long way around.
    #[default]
    PerAxis,
    /// Per-axis blend along the shorter arc (delta wrapped to `[-PI, PI]`).
    ShortestArc,
}

/// Normalized progress of a transition, clamped to `[0, 1]`.
///
/// A non-positive duration is treated as already finished.
pub fn progress(start_time: f64, duration: f64, now: f64) -> f32 {
    if duration.is_nan() || duration <= 0.0 {
        return 1.0;
    }
    let raw = (now - start_time) / duration;
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, 1.0) as f32
}

pub fn lerp_vec3(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    from + (to - from) * t
}

pub fn blend_angle(from: f32, to: f32, t: f32, mode: RotationBlend) -> f32 {
    let delta = match mode {
        RotationBlend::PerAxis => to - from,
        RotationBlend::ShortestArc => wrap_angle(to - from),
    };
    from + delta * t
}

pub fn blend_euler(from: Vec3, to: Vec3, t: f32, mode: RotationBlend) -> Vec3 {
    Vec3::new(
        blend_angle(from.x, to.x, t, mode),
        blend_angle(from.y, to.y, t, mode),
        blend_angle(from.z, to.z, t, mode),
    )
}

fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return angle;
    }
    (angle + PI).rem_euclid(TAU) - PI
}
