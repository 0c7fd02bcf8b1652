use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::interpolate::{blend_euler, lerp_vec3, RotationBlend};

/// Camera placement: eye position, Euler XYZ orientation (radians) and the
/// point the orbit controls pivot around.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub rotation: Vec3,
    pub look_at: Vec3,
}

impl CameraPose {
    pub fn new(position: Vec3, rotation: Vec3, look_at: Vec3) -> Self {
        Self {
            position,
            rotation,
            look_at,
        }
    }

    /// Pose at `position` looking along `rotation`, with the look-at point
    /// `distance` units in front of the eye.
    pub fn facing(position: Vec3, rotation: Vec3, distance: f32) -> Self {
        Self::new(
            position,
            rotation,
            position + facing_direction(rotation) * distance,
        )
    }

    pub fn blend(&self, target: &CameraPose, t: f32, mode: RotationBlend) -> CameraPose {
        CameraPose {
            position: lerp_vec3(self.position, target.position, t),
            rotation: blend_euler(self.rotation, target.rotation, t, mode),
            look_at: lerp_vec3(self.look_at, target.look_at, t),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.look_at.is_finite()
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 15.0), Vec3::ZERO, Vec3::ZERO)
    }
}

/// Forward vector of a camera with the given Euler XYZ rotation. An
/// unrotated camera looks down -Z.
pub fn facing_direction(rotation: Vec3) -> Vec3 {
    let orientation = Quat::from_rotation_x(rotation.x)
        * Quat::from_rotation_y(rotation.y)
        * Quat::from_rotation_z(rotation.z);
    orientation * Vec3::NEG_Z
}

/// The externally driven camera plus its orbit-control enable flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub pose: CameraPose,
    pub controls_enabled: bool,
}

impl OrbitCamera {
    pub fn new(pose: CameraPose) -> Self {
        Self {
            pose,
            controls_enabled: true,
        }
    }

    /// Rotate the eye around the look-at point, keeping the distance.
    /// Returns `false` when the controls are disabled.
    pub fn orbit(&mut self, yaw_delta: f32, pitch_delta: f32) -> bool {
        if !self.controls_enabled {
            return false;
        }
        let offset = self.pose.position - self.pose.look_at;
        let distance = offset.length().max(0.05);
        let yaw = Quat::from_rotation_y(yaw_delta);
        let right = offset.cross(Vec3::Y).normalize_or_zero();
        let pitch = if right == Vec3::ZERO {
            Quat::IDENTITY
        } else {
            Quat::from_axis_angle(right, pitch_delta)
        };
        let rotated = (yaw * pitch * offset).normalize_or_zero() * distance;
        self.pose.position = self.pose.look_at + rotated;
        self.pose.rotation.y += yaw_delta;
        self.pose.rotation.x += pitch_delta;
        true
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(CameraPose::default())
    }
}
