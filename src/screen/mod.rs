//! Virtual screens: 3D surfaces whose texture is a procedurally drawn 2D
//! panel. Each screen owns a [`ScreenModel`] (items, selection, image cache)
//! and is drawn by the [`renderer::VirtualScreenRenderer`] using one of the
//! fixed [`layout`] archetypes; [`hit`] maps UV picks back onto the same
//! layout.

pub mod hit;
pub mod layout;
pub mod renderer;
pub mod surface;

use std::collections::HashMap;
use std::sync::Arc;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use layout::ScreenArchetype;

pub use hit::HitResult;
pub use renderer::{ScreenTexture, TextureBinder, TextureBinding, TextureHandle, VirtualScreenRenderer};

/// Stable asset reference (a path relative to the asset root).
pub type AssetRef = String;

/// Decoded image shared between the loader and every cache holding it.
pub type ImageHandle = Arc<RgbaImage>;

pub const DEFAULT_SURFACE_WIDTH: u32 = 512;
pub const DEFAULT_SURFACE_HEIGHT: u32 = 256;

#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    #[error("screen `{0}` is already registered")]
    Duplicate(String),
    #[error("screen `{0}` has no content items")]
    EmptyScreen(String),
    #[error("screen `{id}` has an invalid surface size {width}x{height}")]
    InvalidSurface { id: String, width: u32, height: u32 },
    #[error("screen `{id}` has a layout that does not fit its surface: {reason}")]
    InvalidLayout { id: String, reason: String },
    #[error("screen renderer has been disposed")]
    Disposed,
}

/// One selectable tab or app on a screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenContentItem {
    pub id: String,
    pub title: String,
    /// Address-bar text for tab strips.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<AssetRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<AssetRef>,
    // Inspector-only metadata, never drawn on the surface.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
}

impl ScreenContentItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: None,
            icon: None,
            preview: None,
            description: String::new(),
            technologies: Vec::new(),
            skills: Vec::new(),
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<AssetRef>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_preview(mut self, preview: impl Into<AssetRef>) -> Self {
        self.preview = Some(preview.into());
        self
    }

    pub fn asset_refs(&self) -> impl Iterator<Item = &AssetRef> {
        self.icon.iter().chain(self.preview.iter())
    }
}

/// Setup-time description of a screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenSpec {
    pub id: String,
    pub archetype: ScreenArchetype,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    pub items: Vec<ScreenContentItem>,
    /// Icon for archetype chrome (the task-bar start button).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chrome_icon: Option<AssetRef>,
}

fn default_width() -> u32 {
    DEFAULT_SURFACE_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_SURFACE_HEIGHT
}

impl ScreenSpec {
    pub fn new(id: impl Into<String>, archetype: ScreenArchetype, items: Vec<ScreenContentItem>) -> Self {
        Self {
            id: id.into(),
            archetype,
            width: DEFAULT_SURFACE_WIDTH,
            height: DEFAULT_SURFACE_HEIGHT,
            items,
            chrome_icon: None,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_chrome_icon(mut self, icon: impl Into<AssetRef>) -> Self {
        self.chrome_icon = Some(icon.into());
        self
    }
}

/// Loaded images for one screen. Entries are inserted once and never
/// evicted while the screen lives.
#[derive(Debug, Default, Clone)]
pub struct ImageCache {
    images: HashMap<AssetRef, ImageHandle>,
}

impl ImageCache {
    pub fn get(&self, asset: &str) -> Option<&ImageHandle> {
        self.images.get(asset)
    }

    pub fn contains(&self, asset: &str) -> bool {
        self.images.contains_key(asset)
    }

    /// Returns `false` if the asset was already cached; the first image wins.
    pub fn insert(&mut self, asset: &str, image: ImageHandle) -> bool {
        if self.images.contains_key(asset) {
            return false;
        }
        self.images.insert(asset.to_string(), image);
        true
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ScreenModel {
    id: String,
    archetype: ScreenArchetype,
    items: Vec<ScreenContentItem>,
    selected: usize,
    chrome_icon: Option<AssetRef>,
    tray_label: Option<String>,
    cache: ImageCache,
}

impl ScreenModel {
    pub fn new(spec: ScreenSpec) -> Result<Self, ScreenError> {
        if spec.items.is_empty() {
            return Err(ScreenError::EmptyScreen(spec.id));
        }
        Ok(Self {
            id: spec.id,
            archetype: spec.archetype,
            items: spec.items,
            selected: 0,
            chrome_icon: spec.chrome_icon,
            tray_label: None,
            cache: ImageCache::default(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn archetype(&self) -> &ScreenArchetype {
        &self.archetype
    }

    pub fn items(&self) -> &[ScreenContentItem] {
        &self.items
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> &ScreenContentItem {
        &self.items[self.selected]
    }

    /// Returns `false` for out-of-range indices, leaving the selection as is.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        self.selected = index;
        true
    }

    pub fn chrome_icon(&self) -> Option<&AssetRef> {
        self.chrome_icon.as_ref()
    }

    pub fn tray_label(&self) -> Option<&str> {
        self.tray_label.as_deref()
    }

    pub(crate) fn set_tray_label(&mut self, label: Option<String>) -> bool {
        if self.tray_label == label {
            return false;
        }
        self.tray_label = label;
        true
    }

    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    pub(crate) fn cache_mut(&mut self) -> &mut ImageCache {
        &mut self.cache
    }

    pub fn references(&self, asset: &str) -> bool {
        self.chrome_icon.as_deref() == Some(asset)
            || self
                .items
                .iter()
                .flat_map(|item| item.asset_refs())
                .any(|reference| reference == asset)
    }

    pub fn asset_refs(&self) -> impl Iterator<Item = &AssetRef> {
        self.chrome_icon
            .iter()
            .chain(self.items.iter().flat_map(|item| item.asset_refs()))
    }
}
