use crate::interaction::{InteractionConfig, InteractionDescriptor};
use crate::render::camera::CameraPose;
use crate::screen::layout::{ScreenArchetype, TabStripLayout, TaskBarLayout};
use crate::screen::{ScreenContentItem, ScreenSpec};
use glam::Vec3;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SerializationError>;

/// Setup-time description of the showroom: camera rest pose, interactions
/// and virtual screens. Immutable once the scene is built.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub camera: CameraPose,
    #[serde(default)]
    pub interaction: InteractionConfig,
    #[serde(default)]
    pub interactions: Vec<InteractionDescriptor>,
    #[serde(default)]
    pub screens: Vec<ScreenSpec>,
    /// Directory asset refs are resolved against.
    #[serde(default = "default_asset_root")]
    pub asset_root: String,
}

fn default_asset_root() -> String {
    "assets".to_string()
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: CameraPose::default(),
            interaction: InteractionConfig::default(),
            interactions: vec![InteractionDescriptor::new(
                "piano",
                Vec3::new(-3.18, 0.5, -2.5),
                Vec3::new(-1.2, 0.0, 0.0),
            )],
            screens: vec![browser_screen(), desktop_screen()],
            asset_root: default_asset_root(),
        }
    }
}

fn tab(id: &str, title: &str, url: &str, image: &str) -> ScreenContentItem {
    ScreenContentItem::new(id, title)
        .with_subtitle(url)
        .with_icon(format!("{image}-icon.png"))
        .with_preview(format!("{image}.png"))
}

fn browser_screen() -> ScreenSpec {
    ScreenSpec::new(
        "affichage_g",
        ScreenArchetype::TabStrip(TabStripLayout::default()),
        vec![
            tab("smartdesk", "SmartDesk", "smartdesk.dev", "SmartDesk"),
            tab("panleuth", "Panleuth", "panleuth.com", "Panleuth"),
            tab("miammiam", "MiamMiam", "miammiam.fr", "Miammiam"),
            tab("transportdoux", "Transport Doux", "transport.doux", "TransportDoux"),
        ],
    )
}

fn desktop_screen() -> ScreenSpec {
    ScreenSpec::new(
        "affichage_d",
        ScreenArchetype::TaskBar(TaskBarLayout::default()),
        vec![
            ScreenContentItem::new("saeavion", "SAE Avion")
                .with_icon("SAEAvion-icon.png")
                .with_preview("SAEAvion.png"),
            ScreenContentItem::new("survie", "Survie")
                .with_icon("Survie-icon.png")
                .with_preview("Survie.png"),
            ScreenContentItem::new("mtvehicles", "MTVehicles")
                .with_icon("MTVehicles-icon.jpg")
                .with_preview("MTVehicles.png"),
        ],
    )
    .with_chrome_icon("windows-11.png")
}

pub fn save_config_to_file(config: &SceneConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn load_config_from_file(path: &Path) -> Result<SceneConfig> {
    let json = std::fs::read_to_string(path)?;
    let config: SceneConfig = serde_json::from_str(&json)?;
    Ok(config)
}
