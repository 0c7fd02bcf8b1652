pub mod serialization;

use crate::assets::{AssetEvent, AssetQueue};
use crate::interaction::{
    CameraInteractionController, InteractionError, InteractionHooks, Phase, PhaseChange,
};
use crate::render::camera::OrbitCamera;
use crate::screen::{HitResult, ScreenError, TextureBinder, VirtualScreenRenderer};
use serialization::SceneConfig;

/// Tag prefix the raycast source puts on screen meshes.
pub const SCREEN_TAG_PREFIX: &str = "screen:";
pub const PIANO_TAG: &str = "piano";
pub const PIANO_INTERACTION: &str = "piano";

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error(transparent)]
    Interaction(#[from] InteractionError),
    #[error(transparent)]
    Screen(#[from] ScreenError),
    #[error(transparent)]
    Serialization(#[from] serialization::SerializationError),
}

/// What a pointer ray hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitKind {
    Piano,
    Screen(String),
    None,
}

impl HitKind {
    pub fn from_tag(tag: &str) -> Self {
        if tag == PIANO_TAG {
            return HitKind::Piano;
        }
        match tag.strip_prefix(SCREEN_TAG_PREFIX) {
            Some(id) if !id.is_empty() => HitKind::Screen(id.to_string()),
            _ => HitKind::None,
        }
    }
}

/// One raycast result. `u`, `v` are the hit's texture coordinates with the
/// origin at the top-left of the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PickEvent {
    pub kind: HitKind,
    pub u: f32,
    pub v: f32,
}

impl PickEvent {
    pub fn new(kind: HitKind, u: f32, v: f32) -> Self {
        Self { kind, u, v }
    }

    pub fn tagged(tag: &str, u: f32, v: f32) -> Self {
        Self::new(HitKind::from_tag(tag), u, v)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    /// Leave the current interaction.
    Cancel,
    /// Enter `id`, or leave it if it is the engaged interaction.
    Toggle(String),
    /// Orbit the free camera by the given angles in radians. Ignored while an
    /// interaction owns the camera.
    Orbit { yaw: f32, pitch: f32 },
}

/// Result of handling one pick.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PickOutcome {
    pub hit: Option<HitResult>,
    pub interaction_started: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameReport {
    pub phase_change: Option<PhaseChange>,
    pub assets_loaded: usize,
    pub assets_failed: usize,
    pub redrawn: Vec<String>,
}

/// Ties the interaction controller, the virtual screens and the asset
/// queue to one frame clock.
pub struct ShowroomScene {
    controller: CameraInteractionController,
    renderer: VirtualScreenRenderer,
    assets: AssetQueue,
}

impl ShowroomScene {
    pub fn new(controller: CameraInteractionController, renderer: VirtualScreenRenderer) -> Self {
        Self {
            controller,
            renderer,
            assets: AssetQueue::new(),
        }
    }

    /// Build the scene from `config`. `hooks_for` supplies the enter/exit
    /// callbacks of each configured interaction.
    pub fn from_config<F>(
        config: &SceneConfig,
        binder: &mut dyn TextureBinder,
        mut hooks_for: F,
    ) -> Result<Self, SceneError>
    where
        F: FnMut(&str) -> Box<dyn InteractionHooks>,
    {
        let mut controller = CameraInteractionController::new(
            config.interaction.clone(),
            OrbitCamera::new(config.camera),
        );
        for descriptor in &config.interactions {
            let hooks = hooks_for(&descriptor.id);
            controller.register(descriptor.clone(), hooks)?;
        }
        let mut renderer = VirtualScreenRenderer::new();
        for screen in &config.screens {
            renderer.register_screen(screen.clone(), binder)?;
        }
        Ok(Self::new(controller, renderer))
    }

    pub fn controller(&self) -> &CameraInteractionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut CameraInteractionController {
        &mut self.controller
    }

    pub fn renderer(&self) -> &VirtualScreenRenderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut VirtualScreenRenderer {
        &mut self.renderer
    }

    pub fn asset_queue(&self) -> &AssetQueue {
        &self.assets
    }

    pub fn handle_pick(&mut self, event: &PickEvent, now: f64) -> PickOutcome {
        match &event.kind {
            HitKind::Piano => PickOutcome {
                hit: None,
                interaction_started: self.controller.start_interaction(PIANO_INTERACTION, now),
            },
            HitKind::Screen(screen_id) => {
                let hit = self.renderer.hit_test(screen_id, event.u, event.v);
                let interaction_started = self.controller.registry().contains(screen_id)
                    && self.controller.start_interaction(screen_id, now);
                PickOutcome {
                    hit: Some(hit),
                    interaction_started,
                }
            }
            HitKind::None => PickOutcome::default(),
        }
    }

    pub fn handle_input(&mut self, action: &InputAction, now: f64) -> bool {
        match action {
            InputAction::Cancel => self.controller.cancel(now),
            InputAction::Toggle(id) => self.controller.toggle_interaction(id, now),
            InputAction::Orbit { yaw, pitch } => match self.controller.camera_mut() {
                Some(camera) => camera.orbit(*yaw, *pitch),
                None => {
                    log::debug!("Ignoring orbit: the camera is owned by an interaction");
                    false
                }
            },
        }
    }

    /// One frame: advance the camera, apply finished asset loads and redraw
    /// the screens they touched.
    pub fn tick(&mut self, now: f64) -> FrameReport {
        let phase_change = self.controller.tick(now);
        if let Some(change) = &phase_change {
            log::debug!("Phase change at {:.3}s: {:?}", now, change);
        }

        let mut report = FrameReport {
            phase_change,
            ..FrameReport::default()
        };
        for event in self.assets.drain() {
            match event {
                AssetEvent::Loaded { asset_ref, image } => {
                    self.renderer.on_asset_loaded(&asset_ref, image);
                    report.assets_loaded += 1;
                }
                AssetEvent::Failed { asset_ref, reason } => {
                    self.renderer.on_asset_failed(&asset_ref, &reason);
                    report.assets_failed += 1;
                }
            }
        }
        report.redrawn = self.renderer.flush();
        report
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub fn dispose(&mut self) {
        self.controller.dispose();
        self.renderer.dispose();
    }
}

impl Drop for ShowroomScene {
    fn drop(&mut self) {
        self.dispose();
    }
}
