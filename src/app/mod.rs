mod input;
mod timing;

use crate::assets::FileAssetLoader;
use crate::interaction::InteractionHooks;
use crate::scene::serialization::{load_config_from_file, SceneConfig};
use crate::scene::{FrameReport, InputAction, PickEvent, SceneError, ShowroomScene};
use crate::screen::layout::ScreenArchetype;
use crate::screen::{TextureBinder, TextureBinding};
pub use input::action_for_key;
pub use timing::FrameTiming;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error("failed creating capture directory '{path}': {source}")]
    CaptureDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed writing capture '{path}': {source}")]
    Capture {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedAction {
    Pick(PickEvent),
    Input(InputAction),
}

/// An input replayed once the frame clock reaches `at` seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedEvent {
    pub at: f64,
    pub action: ScriptedAction,
}

impl ScriptedEvent {
    pub fn pick(at: f64, tag: &str, u: f32, v: f32) -> Self {
        Self {
            at,
            action: ScriptedAction::Pick(PickEvent::tagged(tag, u, v)),
        }
    }

    pub fn input(at: f64, action: InputAction) -> Self {
        Self {
            at,
            action: ScriptedAction::Input(action),
        }
    }
}

/// Nudge the free camera, click through both screens, visit the piano,
/// then leave with Escape.
pub fn demo_script() -> Vec<ScriptedEvent> {
    vec![
        ScriptedEvent::input(0.1, InputAction::Orbit { yaw: 0.2, pitch: 0.0 }),
        ScriptedEvent::pick(0.2, "screen:affichage_g", 0.6, 0.02),
        ScriptedEvent::pick(0.5, "screen:affichage_d", 0.2, 0.95),
        ScriptedEvent::pick(1.0, "piano", 0.5, 0.5),
        ScriptedEvent::input(2.5, InputAction::Cancel),
    ]
}

struct LoggingBinder;

impl TextureBinder for LoggingBinder {
    fn bind_texture(&mut self, screen_id: &str, binding: &TextureBinding) {
        log::info!(
            "Bound texture {:?} ({}x{}) to screen '{}'",
            binding.handle,
            binding.width,
            binding.height,
            screen_id
        );
    }
}

struct LoggingHooks;

impl InteractionHooks for LoggingHooks {
    fn on_enter(&mut self, id: &str) {
        log::info!("Entered interaction '{}'", id);
    }

    fn on_exit(&mut self, id: &str) {
        log::info!("Left interaction '{}'", id);
    }
}

/// Headless frame driver: owns the scene, replays a script against the
/// frame clock and captures the screen textures at the end.
pub struct App {
    scene: ShowroomScene,
    loader: FileAssetLoader,
    script: Vec<ScriptedEvent>,
    next_event: usize,
    frames: u64,
    clock_second: Option<u64>,
}

impl App {
    pub fn new(config: &SceneConfig, mut script: Vec<ScriptedEvent>) -> Result<Self, AppError> {
        let scene = ShowroomScene::from_config(config, &mut LoggingBinder, |_| Box::new(LoggingHooks))?;
        let loader = FileAssetLoader::new(&config.asset_root, scene.asset_queue());
        script.sort_by(|a, b| a.at.total_cmp(&b.at));
        Ok(Self {
            scene,
            loader,
            script,
            next_event: 0,
            frames: 0,
            clock_second: None,
        })
    }

    pub fn scene(&self) -> &ShowroomScene {
        &self.scene
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Ask the loader for every image the screens reference.
    pub fn request_assets(&self) {
        let refs = self.scene.renderer().asset_refs();
        log::info!(
            "Requesting {} assets from '{}'",
            refs.len(),
            self.loader.root().display()
        );
        // Loader threads are detached; results arrive through the queue.
        drop(self.loader.request_all(refs));
    }

    fn script_end(&self) -> f64 {
        self.script.last().map(|event| event.at).unwrap_or(0.0)
    }

    pub fn is_finished(&self, now: f64) -> bool {
        self.next_event >= self.script.len()
            && now >= self.script_end()
            && self.scene.phase() == crate::interaction::Phase::Idle
    }

    /// Replay every scripted input due at `now`, then tick the scene.
    pub fn step(&mut self, now: f64) -> FrameReport {
        while let Some(event) = self.script.get(self.next_event) {
            if event.at > now {
                break;
            }
            match &event.action {
                ScriptedAction::Pick(pick) => {
                    let outcome = self.scene.handle_pick(pick, now);
                    log::debug!("Pick {:?} at {:.3}s -> {:?}", pick.kind, now, outcome);
                }
                ScriptedAction::Input(action) => {
                    let handled = self.scene.handle_input(action, now);
                    log::debug!("Input {:?} at {:.3}s handled: {}", action, now, handled);
                }
            }
            self.next_event += 1;
        }
        self.frames += 1;
        self.update_tray_clock(now);
        let report = self.scene.tick(now);
        if let Some(change) = &report.phase_change {
            log::info!("{:?} at {:.2}s", change, now);
        }
        report
    }

    /// Show the frame clock in every task-bar tray, once per whole second.
    fn update_tray_clock(&mut self, now: f64) {
        let second = now.max(0.0) as u64;
        if self.clock_second == Some(second) {
            return;
        }
        self.clock_second = Some(second);
        let label = format_clock(second);
        let renderer = self.scene.renderer();
        let task_bars: Vec<String> = renderer
            .screen_ids()
            .filter(|id| {
                renderer
                    .model(id)
                    .is_some_and(|model| matches!(model.archetype(), ScreenArchetype::TaskBar(_)))
            })
            .map(str::to_string)
            .collect();
        let renderer = self.scene.renderer_mut();
        for screen_id in task_bars {
            renderer.set_tray_label(&screen_id, Some(label.clone()));
        }
    }

    /// Run the script in real time at `frame_duration` cadence. `timeout`
    /// bounds the run if the camera never settles.
    pub fn run_realtime(&mut self, frame_duration: Duration, timeout: Duration) {
        let start = Instant::now();
        let mut timing = FrameTiming::new("vitrine".to_string(), start);
        loop {
            let frame_start = Instant::now();
            timing.update(frame_start);
            let now = timing.now_seconds(frame_start);
            self.step(now);
            if self.is_finished(now) || now >= timeout.as_secs_f64() {
                break;
            }
            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                std::thread::sleep(frame_duration - elapsed);
            }
        }
        log::info!("Script finished after {} frames", self.frames);
    }

    /// Write every screen texture to `<dir>/<screen_id>.png`.
    pub fn capture_screens(&self, dir: &Path) -> Result<Vec<PathBuf>, AppError> {
        let renderer = self.scene.renderer();
        let mut written = Vec::new();
        for screen_id in renderer.screen_ids() {
            let Some(texture) = renderer.texture(screen_id) else {
                continue;
            };
            let (width, height) = texture.dimensions();
            let path = dir.join(format!("{screen_id}.png"));
            save_png(&path, width, height, texture.pixels())?;
            written.push(path);
        }
        Ok(written)
    }

    pub fn shutdown(&mut self) {
        self.scene.dispose();
    }
}

/// `mm:ss`; minutes keep counting past 59.
fn format_clock(total_seconds: u64) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

fn save_png(path: &Path, width: u32, height: u32, pixels: &[u8]) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| AppError::CaptureDir {
                path: parent.display().to_string(),
                source,
            })?;
        }
    }

    image::save_buffer_with_format(
        path,
        pixels,
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|source| AppError::Capture {
        path: path.display().to_string(),
        source,
    })
}

/// Entry point for the binary: `vitrine [scene.json] [capture-dir]`.
pub fn run() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            let config = load_config_from_file(Path::new(&path)).map_err(SceneError::from)?;
            log::info!("Scene loaded from {}", path);
            config
        }
        None => SceneConfig::default(),
    };
    let capture_dir = PathBuf::from(args.next().unwrap_or_else(|| "captures".to_string()));

    log::info!("Vitrine showroom demo");
    let mut app = App::new(&config, demo_script())?;
    app.request_assets();
    app.run_realtime(Duration::from_millis(16), Duration::from_secs(10));
    let written = app.capture_screens(&capture_dir)?;
    for path in &written {
        log::info!("Captured {}", path.display());
    }
    app.shutdown();
    log::info!("Goodbye!");
    Ok(())
}
