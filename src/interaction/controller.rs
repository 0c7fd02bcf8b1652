//! Exclusive-mode camera transition controller.
//!
//! The controller owns the camera while a session is active: it snapshots
//! the pose and the orbit-control flag on entry, flies to the interaction
//! target, and flies back to the snapshot on exit. All work happens inside
//! [`CameraInteractionController::tick`], driven by the frame clock.

use serde::{Deserialize, Serialize};

use super::{InteractionDescriptor, InteractionError, InteractionHooks, InteractionRegistry};
use crate::render::camera::{CameraPose, OrbitCamera};
use crate::render::interpolate::{progress, RotationBlend};

/// What a stop request does while the camera is still flying in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelPolicy {
    /// The fly-in always finishes. A cancel signal during a transition is
    /// dropped; an explicit `stop_interaction` is deferred until the camera
    /// is engaged.
    #[default]
    FinishTransition,
    /// Stop reverses immediately from the current interpolated pose.
    Interrupt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Seconds per fly-in / fly-out.
    pub transition_duration: f64,
    /// Distance of the derived look-at point in front of the target pose.
    pub look_at_distance: f32,
    pub cancel_policy: CancelPolicy,
    pub rotation_blend: RotationBlend,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            transition_duration: 1.0,
            look_at_distance: 5.0,
            cancel_policy: CancelPolicy::default(),
            rotation_blend: RotationBlend::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    EnteringTransition,
    Engaged,
    ExitingTransition,
}

/// Reported by `tick` when a transition completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseChange {
    /// The fly-in finished; the interaction is engaged.
    Engaged(String),
    /// The fly-out finished; the camera is back under external control.
    Restored(String),
}

#[derive(Debug, Clone, Copy)]
struct CameraSnapshot {
    pose: CameraPose,
    controls_enabled: bool,
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    from: CameraPose,
    to: CameraPose,
    start_time: f64,
    duration: f64,
}

impl Transition {
    fn new(from: CameraPose, to: CameraPose, start_time: f64, duration: f64) -> Self {
        Self {
            from,
            to,
            start_time,
            duration,
        }
    }

    /// Pose at `now` and whether the transition has reached its target.
    /// The finished pose is the exact target, never an interpolated value.
    fn sample(&self, now: f64, blend: RotationBlend) -> (CameraPose, bool) {
        let t = progress(self.start_time, self.duration, now);
        if t >= 1.0 {
            (self.to, true)
        } else {
            (self.from.blend(&self.to, t, blend), false)
        }
    }
}

#[derive(Debug)]
struct Session {
    interaction_id: String,
    snapshot: CameraSnapshot,
    phase: Phase,
    transition: Option<Transition>,
    exit_notified: bool,
    stop_requested: bool,
}

#[derive(Debug)]
pub struct CameraInteractionController {
    config: InteractionConfig,
    registry: InteractionRegistry,
    camera: OrbitCamera,
    session: Option<Session>,
    alive: bool,
}

impl CameraInteractionController {
    pub fn new(config: InteractionConfig, camera: OrbitCamera) -> Self {
        Self {
            config,
            registry: InteractionRegistry::new(),
            camera,
            session: None,
            alive: true,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn registry(&self) -> &InteractionRegistry {
        &self.registry
    }

    pub fn register(
        &mut self,
        descriptor: InteractionDescriptor,
        hooks: Box<dyn InteractionHooks>,
    ) -> Result<(), InteractionError> {
        self.registry.register(descriptor, hooks)
    }

    pub fn phase(&self) -> Phase {
        self.session
            .as_ref()
            .map(|session| session.phase)
            .unwrap_or(Phase::Idle)
    }

    pub fn active_interaction(&self) -> Option<&str> {
        self.session
            .as_ref()
            .map(|session| session.interaction_id.as_str())
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// External access to the camera. Denied while a session owns it.
    pub fn camera_mut(&mut self) -> Option<&mut OrbitCamera> {
        if self.session.is_some() {
            None
        } else {
            Some(&mut self.camera)
        }
    }

    /// Fly to the interaction `id`. Returns `false` without side effects if a
    /// session is already active or `id` is unknown.
    pub fn start_interaction(&mut self, id: &str, now: f64) -> bool {
        if !self.alive {
            return false;
        }
        if let Some(session) = &self.session {
            log::debug!(
                "Ignoring start of '{}': '{}' is active ({:?})",
                id,
                session.interaction_id,
                session.phase
            );
            return false;
        }
        let Some(descriptor) = self.registry.descriptor(id) else {
            log::debug!("Ignoring start of unknown interaction '{}'", id);
            return false;
        };
        let target = descriptor.target_pose(self.config.look_at_distance);

        let snapshot = CameraSnapshot {
            pose: self.camera.pose,
            controls_enabled: self.camera.controls_enabled,
        };
        self.camera.controls_enabled = false;
        self.session = Some(Session {
            interaction_id: id.to_string(),
            snapshot,
            phase: Phase::EnteringTransition,
            transition: Some(Transition::new(
                snapshot.pose,
                target,
                now,
                self.config.transition_duration,
            )),
            exit_notified: false,
            stop_requested: false,
        });
        log::info!(
            "Interaction '{}' entering: {:?} -> {:?}",
            id,
            snapshot.pose.position,
            target.position
        );
        self.registry.notify_enter(id);
        true
    }

    /// Fly back to the snapshot taken at session start.
    ///
    /// Returns `true` when the request was accepted (including a deferred
    /// stop under [`CancelPolicy::FinishTransition`]).
    pub fn stop_interaction(&mut self, now: f64) -> bool {
        if !self.alive {
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            log::debug!("Ignoring stop: no active interaction");
            return false;
        };
        match session.phase {
            Phase::Engaged => {
                self.begin_exit(now);
                true
            }
            Phase::EnteringTransition => match self.config.cancel_policy {
                CancelPolicy::FinishTransition => {
                    session.stop_requested = true;
                    log::debug!(
                        "Deferring stop of '{}' until the fly-in completes",
                        session.interaction_id
                    );
                    true
                }
                CancelPolicy::Interrupt => {
                    self.begin_exit(now);
                    true
                }
            },
            Phase::ExitingTransition | Phase::Idle => false,
        }
    }

    /// Escape-equivalent cancel signal.
    pub fn cancel(&mut self, now: f64) -> bool {
        match (self.phase(), self.config.cancel_policy) {
            (Phase::Engaged, _) | (Phase::EnteringTransition, CancelPolicy::Interrupt) => {
                self.stop_interaction(now)
            }
            (Phase::EnteringTransition | Phase::ExitingTransition, _) => {
                log::debug!("Cancel ignored during transition");
                false
            }
            (Phase::Idle, _) => false,
        }
    }

    /// Stop `id` if it is the active interaction, otherwise try to start it.
    pub fn toggle_interaction(&mut self, id: &str, now: f64) -> bool {
        if self.active_interaction() == Some(id) {
            self.stop_interaction(now)
        } else {
            self.start_interaction(id, now)
        }
    }

    /// Advance the running transition to `now`.
    pub fn tick(&mut self, now: f64) -> Option<PhaseChange> {
        if !self.alive {
            return None;
        }
        let session = self.session.as_mut()?;
        let transition = session.transition?;
        let (pose, finished) = transition.sample(now, self.config.rotation_blend);
        self.camera.pose = pose;
        if !finished {
            return None;
        }
        session.transition = None;

        match session.phase {
            Phase::EnteringTransition => {
                session.phase = Phase::Engaged;
                self.camera.controls_enabled = false;
                let id = session.interaction_id.clone();
                let stop_requested = session.stop_requested;
                log::info!("Interaction '{}' engaged", id);
                if stop_requested {
                    self.begin_exit(now);
                }
                Some(PhaseChange::Engaged(id))
            }
            Phase::ExitingTransition => {
                let restored = session.snapshot.controls_enabled;
                let id = session.interaction_id.clone();
                self.camera.controls_enabled = restored;
                self.session = None;
                log::info!("Interaction '{}' finished, camera restored", id);
                Some(PhaseChange::Restored(id))
            }
            Phase::Engaged | Phase::Idle => None,
        }
    }

    /// Tear down without animating: the camera jumps back to the snapshot
    /// and every later call is a no-op.
    pub fn dispose(&mut self) {
        if !self.alive {
            return;
        }
        if let Some(session) = self.session.take() {
            if !session.exit_notified {
                self.registry.notify_exit(&session.interaction_id);
            }
            self.camera.pose = session.snapshot.pose;
            self.camera.controls_enabled = session.snapshot.controls_enabled;
            log::info!(
                "Interaction '{}' torn down on dispose",
                session.interaction_id
            );
        }
        self.registry.clear();
        self.alive = false;
    }

    fn begin_exit(&mut self, now: f64) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.exit_notified {
            session.exit_notified = true;
            self.registry.notify_exit(&session.interaction_id);
        }
        // An interrupted fly-in reverses from where it would be at `now`,
        // even if no tick has sampled it yet.
        if let Some(running) = session.transition {
            self.camera.pose = running.sample(now, self.config.rotation_blend).0;
        }
        session.phase = Phase::ExitingTransition;
        session.stop_requested = false;
        session.transition = Some(Transition::new(
            self.camera.pose,
            session.snapshot.pose,
            now,
            self.config.transition_duration,
        ));
        log::info!(
            "Interaction '{}' exiting -> {:?}",
            session.interaction_id,
            session.snapshot.pose.position
        );
    }
}
