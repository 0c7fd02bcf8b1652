//! UV pick routing for virtual screens.

use super::layout::ScreenArchetype;
use super::renderer::VirtualScreenRenderer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitResult {
    /// The pick landed on item `index`, which is now selected.
    Selected { screen_id: String, index: usize },
    NoOp,
}

impl HitResult {
    pub fn is_selected(&self) -> bool {
        matches!(self, HitResult::Selected { .. })
    }
}

impl VirtualScreenRenderer {
    /// Resolve a normalized pick `(u, v)` (origin top-left) against the
    /// screen's layout and select the item under it.
    pub fn hit_test(&mut self, screen_id: &str, u: f32, v: f32) -> HitResult {
        if !u.is_finite() || !v.is_finite() || !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            log::debug!("Ignoring pick ({}, {}) on screen '{}'", u, v, screen_id);
            return HitResult::NoOp;
        }
        let Some(model) = self.model(screen_id) else {
            return HitResult::NoOp;
        };
        let Some(surface) = self.surface(screen_id) else {
            return HitResult::NoOp;
        };
        let (width, height) = surface.dimensions();
        let count = model.items().len();
        let index = match model.archetype() {
            ScreenArchetype::TabStrip(layout) => layout.tab_at(u, v, count, height),
            ScreenArchetype::TaskBar(layout) => layout.button_at(u, v, count, width, height),
        };
        let Some(index) = index else {
            return HitResult::NoOp;
        };
        self.select_item(screen_id, index);
        HitResult::Selected {
            screen_id: screen_id.to_string(),
            index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::layout::{TabStripLayout, TaskBarLayout};
    use crate::screen::{ScreenContentItem, ScreenSpec, TextureBinder, TextureBinding};

    struct NullBinder;

    impl TextureBinder for NullBinder {
        fn bind_texture(&mut self, _screen_id: &str, _binding: &TextureBinding) {}
    }

    fn items(count: usize) -> Vec<ScreenContentItem> {
        (0..count)
            .map(|index| ScreenContentItem::new(format!("item{index}"), format!("Item {index}")))
            .collect()
    }

    fn renderer_with(spec: ScreenSpec) -> VirtualScreenRenderer {
        let mut renderer = VirtualScreenRenderer::new();
        renderer.register_screen(spec, &mut NullBinder).unwrap();
        renderer
    }

    #[test]
    fn tab_strip_pick_selects_and_redraws_once() {
        let spec = ScreenSpec::new("left", ScreenArchetype::TabStrip(TabStripLayout::default()), items(4));
        let mut renderer = renderer_with(spec);
        let before = renderer.redraw_count("left").unwrap();

        let hit = renderer.hit_test("left", 0.9, 0.01);
        assert_eq!(
            hit,
            HitResult::Selected {
                screen_id: "left".to_string(),
                index: 3
            }
        );
        assert_eq!(renderer.model("left").unwrap().selected_index(), 3);
        assert_eq!(renderer.redraw_count("left").unwrap(), before + 1);
    }

    #[test]
    fn tab_centers_select_their_tab() {
        let spec = ScreenSpec::new("left", ScreenArchetype::TabStrip(TabStripLayout::default()), items(5));
        let mut renderer = renderer_with(spec);
        for k in 0..5 {
            let u = (k as f32 + 0.5) / 5.0;
            assert_eq!(
                renderer.hit_test("left", u, 0.05),
                HitResult::Selected {
                    screen_id: "left".to_string(),
                    index: k
                }
            );
        }
    }

    #[test]
    fn content_area_and_bad_input_are_ignored() {
        let spec = ScreenSpec::new("left", ScreenArchetype::TabStrip(TabStripLayout::default()), items(4));
        let mut renderer = renderer_with(spec);
        assert_eq!(renderer.hit_test("left", 0.5, 0.6), HitResult::NoOp);
        assert_eq!(renderer.hit_test("left", f32::NAN, 0.01), HitResult::NoOp);
        assert_eq!(renderer.hit_test("left", 1.5, 0.01), HitResult::NoOp);
        assert_eq!(renderer.hit_test("left", 0.5, -0.1), HitResult::NoOp);
        assert_eq!(renderer.hit_test("elsewhere", 0.5, 0.01), HitResult::NoOp);
        assert_eq!(renderer.redraw_count("left"), Some(1));
    }

    #[test]
    fn task_bar_pick_uses_button_rects() {
        let layout = TaskBarLayout::default();
        let spec = ScreenSpec::new("right", ScreenArchetype::TaskBar(layout), items(3));
        let mut renderer = renderer_with(spec);

        let button = layout.button_rect(2, 256);
        let u = (button.x as f32 + 1.0) / 512.0;
        let v = (button.y as f32 + 1.0) / 256.0;
        assert!(renderer.hit_test("right", u, v).is_selected());
        assert_eq!(renderer.model("right").unwrap().selected_index(), 2);

        // Start button and empty bar space.
        assert_eq!(renderer.hit_test("right", 10.0 / 512.0, 0.95), HitResult::NoOp);
        assert_eq!(renderer.hit_test("right", 0.95, 0.95), HitResult::NoOp);
    }
}
