//! Off-screen surfaces and their published textures.
//!
//! Each registered screen gets exactly one `RgbaImage` surface and one
//! [`ScreenTexture`]; both are allocated at registration and reused by every
//! redraw. Redraws are a pure function of the [`ScreenModel`] and its image
//! cache, so repeating one yields a bit-identical surface.

use std::collections::{BTreeMap, BTreeSet};

use image::{Rgba, RgbaImage};
use sha2::{Digest, Sha256};

use super::layout::{PixelRect, ScreenArchetype, TabStripLayout, TaskBarLayout};
use super::surface::{rgb, rgba, Canvas, GLYPH_SIZE};
use super::{AssetRef, ImageHandle, ScreenError, ScreenModel, ScreenSpec};

const BACKGROUND: Rgba<u8> = rgb(0xf0, 0xf0, 0xf0);
const TAB_STRIP: Rgba<u8> = rgb(0xf1, 0xf3, 0xf4);
const TAB_ACTIVE: Rgba<u8> = rgb(0xff, 0xff, 0xff);
const TAB_INACTIVE: Rgba<u8> = rgb(0xda, 0xdc, 0xe0);
const BORDER: Rgba<u8> = rgb(0xda, 0xdc, 0xe0);
const TEXT: Rgba<u8> = rgb(0x20, 0x21, 0x24);
const ADDRESS_FIELD: Rgba<u8> = rgb(0xf8, 0xf9, 0xfa);
const ADDRESS_TEXT: Rgba<u8> = rgb(0x5f, 0x63, 0x68);
const CONTENT: Rgba<u8> = rgb(0xff, 0xff, 0xff);
const PLACEHOLDER: Rgba<u8> = rgb(0xf0, 0xf0, 0xf0);
const PLACEHOLDER_TEXT: Rgba<u8> = rgb(0x66, 0x66, 0x66);
const TASK_BAR: Rgba<u8> = rgba(0, 0, 0, 204);
const START_BUTTON: Rgba<u8> = rgb(0x00, 0x78, 0xd4);
const APP_ACTIVE: Rgba<u8> = rgba(0xff, 0xff, 0xff, 51);
const WHITE: Rgba<u8> = rgb(0xff, 0xff, 0xff);

const LOADING_LABEL: &str = "Loading...";
const TAB_ICON_FALLBACK: &str = "@";
const APP_ICON_FALLBACK: &str = "#";
const START_ICON_FALLBACK: &str = "+";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(u64);

impl TextureHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Material parameters handed to the scene layer when a screen texture is
/// bound to its 3D surface.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureBinding {
    pub handle: TextureHandle,
    pub width: u32,
    pub height: u32,
    pub linear_filtering: bool,
    pub flip_y: bool,
    pub transparent: bool,
}

/// Scene/material collaborator. Called once per screen at registration.
pub trait TextureBinder {
    fn bind_texture(&mut self, screen_id: &str, binding: &TextureBinding);
}

/// GPU-visible copy of a screen surface.
#[derive(Debug, Clone)]
pub struct ScreenTexture {
    handle: TextureHandle,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    version: u64,
    digest: [u8; 32],
    needs_upload: bool,
}

impl ScreenTexture {
    fn new(handle: TextureHandle, width: u32, height: u32) -> Self {
        Self {
            handle,
            width,
            height,
            pixels: vec![0u8; (width as usize) * (height as usize) * 4],
            version: 0,
            digest: [0u8; 32],
            needs_upload: false,
        }
    }

    pub fn handle(&self) -> TextureHandle {
        self.handle
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Tightly packed RGBA8 rows, top row first.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Bumped whenever published content differs from the previous upload.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// SHA-256 of the published pixels.
    pub fn digest(&self) -> &[u8; 32] {
        &self.digest
    }

    pub fn needs_upload(&self) -> bool {
        self.needs_upload
    }

    pub fn mark_uploaded(&mut self) {
        self.needs_upload = false;
    }

    /// Copy `surface` into the texture buffer. Returns `false` when the
    /// content is unchanged and nothing needs re-uploading.
    fn publish(&mut self, surface: &RgbaImage) -> bool {
        let digest: [u8; 32] = Sha256::digest(surface.as_raw().as_slice()).into();
        if self.version > 0 && digest == self.digest {
            return false;
        }
        self.pixels.copy_from_slice(surface.as_raw());
        self.digest = digest;
        self.version += 1;
        self.needs_upload = true;
        true
    }
}

#[derive(Debug)]
struct ScreenSlot {
    model: ScreenModel,
    surface: RgbaImage,
    texture: ScreenTexture,
    redraws: u64,
}

#[derive(Debug)]
pub struct VirtualScreenRenderer {
    screens: BTreeMap<String, ScreenSlot>,
    dirty: BTreeSet<String>,
    next_handle: u64,
    alive: bool,
}

impl Default for VirtualScreenRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualScreenRenderer {
    pub fn new() -> Self {
        Self {
            screens: BTreeMap::new(),
            dirty: BTreeSet::new(),
            next_handle: 1,
            alive: true,
        }
    }

    pub fn register_screen(
        &mut self,
        spec: ScreenSpec,
        binder: &mut dyn TextureBinder,
    ) -> Result<TextureHandle, ScreenError> {
        if !self.alive {
            return Err(ScreenError::Disposed);
        }
        if self.screens.contains_key(&spec.id) {
            return Err(ScreenError::Duplicate(spec.id));
        }
        if spec.width == 0 || spec.height == 0 {
            return Err(ScreenError::InvalidSurface {
                id: spec.id,
                width: spec.width,
                height: spec.height,
            });
        }
        if let Err(reason) = spec.archetype.validate(spec.width, spec.height) {
            return Err(ScreenError::InvalidLayout { id: spec.id, reason });
        }
        let (width, height) = (spec.width, spec.height);
        let model = ScreenModel::new(spec)?;
        let id = model.id().to_string();

        let handle = TextureHandle(self.next_handle);
        self.next_handle += 1;
        let binding = TextureBinding {
            handle,
            width,
            height,
            linear_filtering: true,
            flip_y: false,
            transparent: true,
        };
        binder.bind_texture(&id, &binding);

        self.screens.insert(
            id.clone(),
            ScreenSlot {
                model,
                surface: RgbaImage::new(width, height),
                texture: ScreenTexture::new(handle, width, height),
                redraws: 0,
            },
        );
        log::info!("Registered screen '{}' ({}x{}, texture {:?})", id, width, height, handle);
        self.redraw(&id);
        Ok(handle)
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn screen_ids(&self) -> impl Iterator<Item = &str> {
        self.screens.keys().map(String::as_str)
    }

    pub fn model(&self, screen_id: &str) -> Option<&ScreenModel> {
        self.screens.get(screen_id).map(|slot| &slot.model)
    }

    pub fn surface(&self, screen_id: &str) -> Option<&RgbaImage> {
        self.screens.get(screen_id).map(|slot| &slot.surface)
    }

    pub fn texture(&self, screen_id: &str) -> Option<&ScreenTexture> {
        self.screens.get(screen_id).map(|slot| &slot.texture)
    }

    pub fn texture_mut(&mut self, screen_id: &str) -> Option<&mut ScreenTexture> {
        self.screens.get_mut(screen_id).map(|slot| &mut slot.texture)
    }

    /// Number of redraws performed for `screen_id` since registration.
    pub fn redraw_count(&self, screen_id: &str) -> Option<u64> {
        self.screens.get(screen_id).map(|slot| slot.redraws)
    }

    pub fn is_dirty(&self, screen_id: &str) -> bool {
        self.dirty.contains(screen_id)
    }

    /// Every asset referenced by any screen, once.
    pub fn asset_refs(&self) -> Vec<AssetRef> {
        let refs: BTreeSet<&AssetRef> = self
            .screens
            .values()
            .flat_map(|slot| slot.model.asset_refs())
            .collect();
        refs.into_iter().cloned().collect()
    }

    /// Select item `index` and redraw right away. Out-of-range indices and
    /// unknown screens are ignored.
    pub fn select_item(&mut self, screen_id: &str, index: usize) -> bool {
        if !self.alive {
            return false;
        }
        let Some(slot) = self.screens.get_mut(screen_id) else {
            log::debug!("Ignoring selection on unknown screen '{}'", screen_id);
            return false;
        };
        if index == slot.model.selected_index() {
            return false;
        }
        if !slot.model.select(index) {
            log::debug!(
                "Ignoring out-of-range selection {} on screen '{}' ({} items)",
                index,
                screen_id,
                slot.model.items().len()
            );
            return false;
        }
        log::debug!("Screen '{}' selected item {}", screen_id, index);
        self.redraw(screen_id)
    }

    /// Replace the task-bar tray text. Drawn on the next flush.
    pub fn set_tray_label(&mut self, screen_id: &str, label: Option<String>) {
        if !self.alive {
            return;
        }
        if let Some(slot) = self.screens.get_mut(screen_id) {
            if slot.model.set_tray_label(label) {
                self.dirty.insert(screen_id.to_string());
            }
        }
    }

    pub fn redraw(&mut self, screen_id: &str) -> bool {
        if !self.alive {
            return false;
        }
        let Some(slot) = self.screens.get_mut(screen_id) else {
            return false;
        };
        draw_screen(&slot.model, &mut slot.surface);
        slot.texture.publish(&slot.surface);
        slot.redraws += 1;
        self.dirty.remove(screen_id);
        true
    }

    /// Cache a loaded image in every screen that references it. Screens
    /// that gained an entry are redrawn on the next [`flush`](Self::flush).
    pub fn on_asset_loaded(&mut self, asset: &str, image: ImageHandle) -> usize {
        if !self.alive {
            return 0;
        }
        let mut updated = 0;
        for (id, slot) in self.screens.iter_mut() {
            if !slot.model.references(asset) {
                continue;
            }
            if slot.model.cache_mut().insert(asset, image.clone()) {
                self.dirty.insert(id.clone());
                updated += 1;
            }
        }
        if updated == 0 {
            log::debug!("Asset '{}' loaded but no screen needed it", asset);
        }
        updated
    }

    pub fn on_asset_failed(&mut self, asset: &str, reason: &str) {
        log::warn!("Asset '{}' failed to load, keeping placeholder: {}", asset, reason);
    }

    /// Redraw every screen marked dirty since the last flush.
    pub fn flush(&mut self) -> Vec<String> {
        if !self.alive {
            return Vec::new();
        }
        let pending: Vec<String> = std::mem::take(&mut self.dirty).into_iter().collect();
        for id in &pending {
            self.redraw(id);
        }
        pending
    }

    /// Release every surface and texture. Later calls are no-ops.
    pub fn dispose(&mut self) {
        if !self.alive {
            return;
        }
        log::info!("Disposing {} virtual screens", self.screens.len());
        self.screens.clear();
        self.dirty.clear();
        self.alive = false;
    }
}

fn draw_screen(model: &ScreenModel, surface: &mut RgbaImage) {
    let mut canvas = Canvas::new(surface);
    canvas.clear(BACKGROUND);
    match model.archetype() {
        ScreenArchetype::TabStrip(layout) => draw_tab_strip(&mut canvas, layout, model),
        ScreenArchetype::TaskBar(layout) => draw_task_bar(&mut canvas, layout, model),
    }
}

fn cached<'m>(model: &'m ScreenModel, asset: Option<&AssetRef>) -> Option<&'m ImageHandle> {
    asset.and_then(|asset| model.cache().get(asset))
}

fn draw_placeholder(canvas: &mut Canvas<'_>, rect: PixelRect) {
    canvas.fill_rect(rect, PLACEHOLDER);
    canvas.draw_text_centered(
        rect.x.saturating_add(rect.width / 2),
        rect.y.saturating_add(rect.height / 2),
        LOADING_LABEL,
        PLACEHOLDER_TEXT,
    );
}

fn draw_tab_strip(canvas: &mut Canvas<'_>, layout: &TabStripLayout, model: &ScreenModel) {
    let width = canvas.width();
    let height = canvas.height();
    let count = model.items().len();

    canvas.fill_rect(PixelRect::new(0, 0, width, layout.tab_height), TAB_STRIP);
    let text_y = layout.tab_height.saturating_sub(GLYPH_SIZE) / 2;
    for (index, item) in model.items().iter().enumerate() {
        let tab = layout.tab_rect(index, count, width);
        let fill = if index == model.selected_index() {
            TAB_ACTIVE
        } else {
            TAB_INACTIVE
        };
        canvas.fill_rect(tab, fill);
        canvas.stroke_rect(tab, BORDER);

        let icon = PixelRect::new(
            tab.x.saturating_add(5),
            layout.tab_height.saturating_sub(layout.favicon_size) / 2,
            layout.favicon_size,
            layout.favicon_size,
        );
        match cached(model, item.icon.as_ref()) {
            Some(image) => canvas.draw_image(image, icon),
            None => {
                canvas.draw_text(tab.x.saturating_add(8), text_y, TAB_ICON_FALLBACK, TEXT);
            }
        }
        canvas.draw_text_clipped(
            tab.x.saturating_add(25),
            text_y,
            &item.title,
            TEXT,
            tab.right().saturating_sub(4),
        );
    }

    let selected = model.selected_item();
    canvas.fill_rect(layout.address_bar_rect(width), CONTENT);
    let field = layout.address_field_rect(width);
    canvas.fill_rect(field, ADDRESS_FIELD);
    canvas.stroke_rect(field, BORDER);
    let address = selected.subtitle.as_deref().unwrap_or(&selected.title);
    canvas.draw_text_clipped(
        field.x.saturating_add(8),
        field.y.saturating_add(field.height.saturating_sub(GLYPH_SIZE) / 2),
        address,
        ADDRESS_TEXT,
        field.right().saturating_sub(8),
    );

    let content = layout.content_rect(width, height);
    canvas.fill_rect(content, CONTENT);
    match cached(model, selected.preview.as_ref()) {
        Some(image) => canvas.draw_image_cover(image, content),
        None => draw_placeholder(canvas, content),
    }
}

fn draw_task_bar(canvas: &mut Canvas<'_>, layout: &TaskBarLayout, model: &ScreenModel) {
    let width = canvas.width();
    let height = canvas.height();
    let selected = model.selected_item();

    let content = layout.content_rect(width, height);
    match cached(model, selected.preview.as_ref()) {
        Some(image) => canvas.draw_image_cover(image, content),
        None => draw_placeholder(canvas, content),
    }

    let bar = layout.bar_rect(width, height);
    canvas.fill_rect(bar, TASK_BAR);
    let bar_center_y = bar.y.saturating_add(bar.height / 2);

    let start = layout.start_button_rect(height);
    canvas.fill_rect(start, START_BUTTON);
    match cached(model, model.chrome_icon()) {
        Some(image) => canvas.draw_image(image, layout.icon_rect(start)),
        None => canvas.draw_text_centered(
            start.x.saturating_add(start.width / 2),
            start.y.saturating_add(start.height / 2),
            START_ICON_FALLBACK,
            WHITE,
        ),
    }

    for (index, item) in model.items().iter().enumerate() {
        let button = layout.button_rect(index, height);
        if index == model.selected_index() {
            canvas.fill_rect(button, APP_ACTIVE);
            canvas.stroke_rect(button, WHITE);
        }
        match cached(model, item.icon.as_ref()) {
            Some(image) => canvas.draw_image(image, layout.icon_rect(button)),
            None => canvas.draw_text_centered(
                button.x.saturating_add(button.width / 2),
                button.y.saturating_add(button.height / 2),
                APP_ICON_FALLBACK,
                WHITE,
            ),
        }
    }

    if let Some(label) = model.tray_label() {
        canvas.draw_text_right(width.saturating_sub(layout.tray_margin), bar_center_y, label, WHITE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::ScreenContentItem;
    use std::sync::Arc;

    #[derive(Default)]
    struct RecordingBinder {
        bound: Vec<(String, TextureBinding)>,
    }

    impl TextureBinder for RecordingBinder {
        fn bind_texture(&mut self, screen_id: &str, binding: &TextureBinding) {
            self.bound.push((screen_id.to_string(), binding.clone()));
        }
    }

    fn items(prefix: &str, count: usize) -> Vec<ScreenContentItem> {
        (0..count)
            .map(|index| {
                ScreenContentItem::new(format!("{prefix}{index}"), format!("{prefix} {index}"))
                    .with_subtitle(format!("{prefix}{index}.dev"))
                    .with_icon(format!("{prefix}{index}-icon.png"))
                    .with_preview(format!("{prefix}{index}.png"))
            })
            .collect()
    }

    fn browser(id: &str, count: usize) -> ScreenSpec {
        ScreenSpec::new(id, ScreenArchetype::TabStrip(TabStripLayout::default()), items("tab", count))
    }

    fn desktop(id: &str, count: usize) -> ScreenSpec {
        ScreenSpec::new(id, ScreenArchetype::TaskBar(TaskBarLayout::default()), items("app", count))
            .with_chrome_icon("start.png")
    }

    fn solid(width: u32, height: u32, color: Rgba<u8>) -> ImageHandle {
        Arc::new(RgbaImage::from_pixel(width, height, color))
    }

    #[test]
    fn registration_binds_once_and_draws() {
        let mut renderer = VirtualScreenRenderer::new();
        let mut binder = RecordingBinder::default();
        let handle = renderer.register_screen(browser("left", 4), &mut binder).unwrap();

        assert_eq!(binder.bound.len(), 1);
        let (id, binding) = &binder.bound[0];
        assert_eq!(id, "left");
        assert_eq!(binding.handle, handle);
        assert_eq!((binding.width, binding.height), (512, 256));
        assert!(!binding.flip_y);
        assert_eq!(renderer.redraw_count("left"), Some(1));
        assert_eq!(renderer.texture("left").unwrap().version(), 1);
        assert!(renderer.texture("left").unwrap().needs_upload());
    }

    #[test]
    fn duplicate_and_invalid_screens_are_rejected() {
        let mut renderer = VirtualScreenRenderer::new();
        let mut binder = RecordingBinder::default();
        renderer.register_screen(browser("left", 2), &mut binder).unwrap();
        assert!(matches!(
            renderer.register_screen(browser("left", 3), &mut binder),
            Err(ScreenError::Duplicate(_))
        ));
        assert!(matches!(
            renderer.register_screen(browser("tiny", 2).with_size(0, 10), &mut binder),
            Err(ScreenError::InvalidSurface { .. })
        ));
        assert_eq!(binder.bound.len(), 1);
        assert_eq!(renderer.model("left").unwrap().items().len(), 2);
    }

    #[test]
    fn layouts_that_do_not_fit_are_rejected() {
        let mut renderer = VirtualScreenRenderer::new();
        let mut binder = RecordingBinder::default();

        let tabs: TabStripLayout = serde_json::from_str(r#"{ "address_padding": 3000000000 }"#).unwrap();
        let spec = ScreenSpec::new("left", ScreenArchetype::TabStrip(tabs), items("tab", 2));
        assert!(matches!(
            renderer.register_screen(spec, &mut binder),
            Err(ScreenError::InvalidLayout { ref id, .. }) if id == "left"
        ));

        let bar: TaskBarLayout = serde_json::from_str(r#"{ "button_width": 4294967295 }"#).unwrap();
        let spec = ScreenSpec::new("right", ScreenArchetype::TaskBar(bar), items("app", 2));
        assert!(matches!(
            renderer.register_screen(spec, &mut binder),
            Err(ScreenError::InvalidLayout { .. })
        ));

        assert!(binder.bound.is_empty());
        assert_eq!(renderer.screen_ids().count(), 0);
        assert_eq!(renderer.hit_test("right", 0.5, 0.95), crate::screen::HitResult::NoOp);
    }

    #[test]
    fn redraw_is_bit_identical() {
        let mut renderer = VirtualScreenRenderer::new();
        let mut binder = RecordingBinder::default();
        renderer.register_screen(desktop("right", 3), &mut binder).unwrap();
        renderer.on_asset_loaded("app0.png", solid(64, 32, rgb(10, 20, 30)));
        renderer.flush();

        let before = renderer.surface("right").unwrap().clone();
        let digest = *renderer.texture("right").unwrap().digest();
        let version = renderer.texture("right").unwrap().version();
        renderer.texture_mut("right").unwrap().mark_uploaded();

        assert!(renderer.redraw("right"));
        assert!(renderer.redraw("right"));
        assert_eq!(renderer.surface("right").unwrap().as_raw(), before.as_raw());
        let texture = renderer.texture("right").unwrap();
        assert_eq!(texture.digest(), &digest);
        assert_eq!(texture.version(), version);
        assert!(!texture.needs_upload());
    }

    #[test]
    fn selection_redraws_in_place() {
        let mut renderer = VirtualScreenRenderer::new();
        let mut binder = RecordingBinder::default();
        renderer.register_screen(browser("left", 4), &mut binder).unwrap();
        let buffer = renderer.surface("left").unwrap().as_raw().as_ptr();
        let pixels = renderer.texture("left").unwrap().pixels().as_ptr();

        assert!(renderer.select_item("left", 2));
        assert_eq!(renderer.model("left").unwrap().selected_index(), 2);
        assert_eq!(renderer.redraw_count("left"), Some(2));
        assert_eq!(renderer.surface("left").unwrap().as_raw().as_ptr(), buffer);
        assert_eq!(renderer.texture("left").unwrap().pixels().as_ptr(), pixels);
        assert_eq!(renderer.texture("left").unwrap().version(), 2);
    }

    #[test]
    fn out_of_range_selection_changes_nothing() {
        let mut renderer = VirtualScreenRenderer::new();
        let mut binder = RecordingBinder::default();
        renderer.register_screen(browser("left", 4), &mut binder).unwrap();
        assert!(!renderer.select_item("left", 4));
        assert!(!renderer.select_item("left", 0));
        assert!(!renderer.select_item("nowhere", 1));
        assert_eq!(renderer.model("left").unwrap().selected_index(), 0);
        assert_eq!(renderer.redraw_count("left"), Some(1));
    }

    #[test]
    fn placeholder_until_preview_arrives() {
        let mut renderer = VirtualScreenRenderer::new();
        let mut binder = RecordingBinder::default();
        renderer.register_screen(browser("left", 2), &mut binder).unwrap();
        let content = TabStripLayout::default().content_rect(512, 256);
        let sample = (content.x + 3, content.y + 3);
        assert_eq!(renderer.surface("left").unwrap().get_pixel(sample.0, sample.1), &PLACEHOLDER);

        assert_eq!(renderer.on_asset_loaded("tab0.png", solid(100, 50, rgb(200, 0, 0))), 1);
        assert!(renderer.is_dirty("left"));
        // Not drawn until the next flush.
        assert_eq!(renderer.redraw_count("left"), Some(1));
        assert_eq!(renderer.flush(), vec!["left".to_string()]);
        assert_eq!(renderer.surface("left").unwrap().get_pixel(sample.0, sample.1), &rgb(200, 0, 0));
    }

    #[test]
    fn duplicate_delivery_is_absorbed() {
        let mut renderer = VirtualScreenRenderer::new();
        let mut binder = RecordingBinder::default();
        renderer.register_screen(browser("left", 2), &mut binder).unwrap();
        renderer.on_asset_loaded("tab1.png", solid(8, 8, rgb(1, 1, 1)));
        renderer.flush();
        assert_eq!(renderer.on_asset_loaded("tab1.png", solid(8, 8, rgb(9, 9, 9))), 0);
        assert!(renderer.flush().is_empty());
        assert_eq!(renderer.redraw_count("left"), Some(2));
        let cached = renderer.model("left").unwrap().cache().get("tab1.png").unwrap();
        assert_eq!(cached.get_pixel(0, 0), &rgb(1, 1, 1));
    }

    #[test]
    fn assets_only_reach_referencing_screens() {
        let mut renderer = VirtualScreenRenderer::new();
        let mut binder = RecordingBinder::default();
        renderer.register_screen(browser("left", 2), &mut binder).unwrap();
        renderer.register_screen(desktop("right", 2), &mut binder).unwrap();

        assert_eq!(renderer.on_asset_loaded("start.png", solid(4, 4, WHITE)), 1);
        assert!(renderer.model("left").unwrap().cache().is_empty());
        assert_eq!(renderer.flush(), vec!["right".to_string()]);
        assert_eq!(renderer.on_asset_loaded("unrelated.png", solid(4, 4, WHITE)), 0);
    }

    #[test]
    fn failed_assets_keep_the_placeholder() {
        let mut renderer = VirtualScreenRenderer::new();
        let mut binder = RecordingBinder::default();
        renderer.register_screen(desktop("right", 1), &mut binder).unwrap();
        let before = *renderer.texture("right").unwrap().digest();
        renderer.on_asset_failed("app0.png", "not found");
        assert!(renderer.flush().is_empty());
        assert_eq!(renderer.texture("right").unwrap().digest(), &before);
    }

    #[test]
    fn tray_label_changes_the_surface() {
        let mut renderer = VirtualScreenRenderer::new();
        let mut binder = RecordingBinder::default();
        renderer.register_screen(desktop("right", 2), &mut binder).unwrap();
        let before = *renderer.texture("right").unwrap().digest();
        renderer.set_tray_label("right", Some("12:34".to_string()));
        renderer.flush();
        assert_ne!(renderer.texture("right").unwrap().digest(), &before);
        renderer.set_tray_label("right", Some("12:34".to_string()));
        assert!(!renderer.is_dirty("right"));
    }

    #[test]
    fn asset_refs_are_deduplicated() {
        let mut renderer = VirtualScreenRenderer::new();
        let mut binder = RecordingBinder::default();
        renderer.register_screen(desktop("a", 2), &mut binder).unwrap();
        renderer.register_screen(desktop("b", 2), &mut binder).unwrap();
        // Two apps with icon + preview each, plus the shared start icon.
        assert_eq!(renderer.asset_refs().len(), 5);
    }

    #[test]
    fn disposed_renderer_ignores_everything() {
        let mut renderer = VirtualScreenRenderer::new();
        let mut binder = RecordingBinder::default();
        renderer.register_screen(browser("left", 2), &mut binder).unwrap();
        renderer.dispose();
        assert!(!renderer.is_alive());
        assert_eq!(renderer.on_asset_loaded("tab0.png", solid(2, 2, WHITE)), 0);
        assert!(renderer.flush().is_empty());
        assert!(!renderer.select_item("left", 1));
        assert!(renderer.surface("left").is_none());
        assert!(matches!(
            renderer.register_screen(browser("other", 2), &mut binder),
            Err(ScreenError::Disposed)
        ));
    }
}
