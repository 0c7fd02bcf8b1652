//! Interaction registry: named, mutually exclusive camera focus modes.
//!
//! Descriptors are registered once at setup and never mutated afterwards;
//! the [`controller`] drives the camera between them.

pub mod controller;

use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::render::camera::CameraPose;

pub use controller::{
    CameraInteractionController, CancelPolicy, InteractionConfig, Phase, PhaseChange,
};

#[derive(Debug, thiserror::Error)]
pub enum InteractionError {
    #[error("interaction `{0}` is already registered")]
    Duplicate(String),
}

/// Target camera placement for one interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionDescriptor {
    pub id: String,
    pub camera_position: Vec3,
    /// Euler XYZ, radians.
    pub camera_rotation: Vec3,
    /// Explicit orbit pivot. When absent the pivot is placed in front of the
    /// target position along the target facing direction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub look_at: Option<Vec3>,
}

impl InteractionDescriptor {
    pub fn new(id: impl Into<String>, camera_position: Vec3, camera_rotation: Vec3) -> Self {
        Self {
            id: id.into(),
            camera_position,
            camera_rotation,
            look_at: None,
        }
    }

    pub fn with_look_at(mut self, look_at: Vec3) -> Self {
        self.look_at = Some(look_at);
        self
    }

    pub fn target_pose(&self, look_at_distance: f32) -> CameraPose {
        match self.look_at {
            Some(look_at) => CameraPose::new(self.camera_position, self.camera_rotation, look_at),
            None => CameraPose::facing(self.camera_position, self.camera_rotation, look_at_distance),
        }
    }
}

/// Side effects run by the controller at phase boundaries.
///
/// `on_enter` fires when the fly-in starts (the camera is still moving),
/// `on_exit` when the fly-out starts. Each is called at most once per session.
pub trait InteractionHooks {
    fn on_enter(&mut self, _id: &str) {}
    fn on_exit(&mut self, _id: &str) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl InteractionHooks for NoopHooks {}

struct RegisteredInteraction {
    descriptor: InteractionDescriptor,
    hooks: Box<dyn InteractionHooks>,
}

#[derive(Default)]
pub struct InteractionRegistry {
    entries: HashMap<String, RegisteredInteraction>,
}

impl InteractionRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn register(
        &mut self,
        descriptor: InteractionDescriptor,
        hooks: Box<dyn InteractionHooks>,
    ) -> Result<(), InteractionError> {
        if self.entries.contains_key(&descriptor.id) {
            return Err(InteractionError::Duplicate(descriptor.id));
        }
        log::info!("Registered interaction '{}'", descriptor.id);
        self.entries.insert(
            descriptor.id.clone(),
            RegisteredInteraction { descriptor, hooks },
        );
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn descriptor(&self, id: &str) -> Option<&InteractionDescriptor> {
        self.entries.get(id).map(|entry| &entry.descriptor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn notify_enter(&mut self, id: &str) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.hooks.on_enter(id);
        }
    }

    pub(crate) fn notify_exit(&mut self, id: &str) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.hooks.on_exit(id);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

impl std::fmt::Debug for InteractionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("InteractionRegistry")
            .field("interactions", &ids)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = InteractionRegistry::new();
        let piano = InteractionDescriptor::new("piano", Vec3::ONE, Vec3::ZERO);
        registry
            .register(piano.clone(), Box::new(NoopHooks))
            .unwrap();
        let err = registry
            .register(piano.with_look_at(Vec3::ZERO), Box::new(NoopHooks))
            .unwrap_err();
        assert!(matches!(err, InteractionError::Duplicate(ref id) if id == "piano"));
        // The first descriptor survives.
        assert_eq!(registry.descriptor("piano").unwrap().look_at, None);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn explicit_look_at_wins() {
        let descriptor = InteractionDescriptor::new("screen", Vec3::ZERO, Vec3::ZERO)
            .with_look_at(Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(descriptor.target_pose(5.0).look_at, Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn derived_look_at_uses_distance() {
        let descriptor = InteractionDescriptor::new("piano", Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO);
        let pose = descriptor.target_pose(2.0);
        assert!((pose.look_at - Vec3::new(0.0, 1.0, -2.0)).length() < 1e-6);
    }
}
