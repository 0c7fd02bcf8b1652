use crate::interaction::Phase;
use crate::scene::ShowroomScene;
use crate::screen::{ScreenContentItem, VirtualScreenRenderer};

/// Side panel describing the item selected on each virtual screen.
pub struct ItemInspector {
    show_panel: bool,
    summary: String,
}

impl Default for ItemInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemInspector {
    pub fn new() -> Self {
        Self {
            show_panel: true,
            summary: String::new(),
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.show_panel = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.show_panel
    }

    pub fn update(&mut self, scene: &ShowroomScene) {
        if !self.show_panel {
            return;
        }
        let renderer = scene.renderer();
        let mut summary = String::new();
        for screen_id in renderer.screen_ids() {
            let Some(model) = renderer.model(screen_id) else {
                continue;
            };
            summary.push_str(&format!(
                "{}: {} ({}/{})\n",
                screen_id,
                model.selected_item().title,
                model.selected_index() + 1,
                model.items().len()
            ));
        }
        let phase = scene.phase();
        match scene.controller().active_interaction() {
            Some(id) if phase != Phase::Idle => summary.push_str(&format!("Interaction: {} ({:?})", id, phase)),
            _ => summary.push_str("Interaction: none"),
        }
        self.summary = summary;
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn show(&self, ctx: &egui::Context, renderer: &VirtualScreenRenderer) {
        if !self.show_panel {
            return;
        }
        egui::SidePanel::right("item_inspector").show(ctx, |ui| {
            ui.label(self.summary.as_str());
            ui.separator();
            for screen_id in renderer.screen_ids() {
                if let Some(model) = renderer.model(screen_id) {
                    item_details(ui, model.selected_item());
                    ui.separator();
                }
            }
        });
    }
}

fn item_details(ui: &mut egui::Ui, item: &ScreenContentItem) {
    ui.heading(item.title.as_str());
    if let Some(subtitle) = &item.subtitle {
        ui.label(subtitle.as_str());
    }
    if !item.description.is_empty() {
        ui.label(item.description.as_str());
    }
    if !item.technologies.is_empty() {
        ui.label(format!("Technologies: {}", item.technologies.join(", ")));
    }
    if !item.skills.is_empty() {
        ui.label(format!("Skills: {}", item.skills.join(", ")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::NoopHooks;
    use crate::scene::serialization::SceneConfig;
    use crate::scene::PickEvent;
    use crate::screen::{TextureBinder, TextureBinding};

    struct NullBinder;

    impl TextureBinder for NullBinder {
        fn bind_texture(&mut self, _screen_id: &str, _binding: &TextureBinding) {}
    }

    fn scene() -> ShowroomScene {
        let mut config = SceneConfig::default();
        config.screens[0].items[0].technologies = vec!["Rust".to_string()];
        ShowroomScene::from_config(&config, &mut NullBinder, |_| Box::new(NoopHooks)).unwrap()
    }

    #[test]
    fn summary_tracks_selection_and_interaction() {
        let mut scene = scene();
        let mut inspector = ItemInspector::new();
        inspector.update(&scene);
        assert!(inspector.summary().contains("affichage_g: SmartDesk (1/4)"));
        assert!(inspector.summary().ends_with("Interaction: none"));

        scene.handle_pick(&PickEvent::tagged("screen:affichage_g", 0.3, 0.01), 0.0);
        scene.handle_pick(&PickEvent::tagged("piano", 0.0, 0.0), 0.0);
        inspector.update(&scene);
        assert!(inspector.summary().contains("affichage_g: Panleuth (2/4)"));
        assert!(inspector.summary().contains("Interaction: piano (EnteringTransition)"));
    }

    #[test]
    fn hidden_panel_keeps_the_last_summary() {
        let scene = scene();
        let mut inspector = ItemInspector::new();
        inspector.set_visible(false);
        inspector.update(&scene);
        assert!(inspector.summary().is_empty());
    }

    #[test]
    fn panel_renders_headless() {
        let scene = scene();
        let mut inspector = ItemInspector::new();
        inspector.update(&scene);
        let ctx = egui::Context::default();
        let output = ctx.run(egui::RawInput::default(), |ctx| {
            inspector.show(ctx, scene.renderer());
        });
        assert!(!output.shapes.is_empty());
    }
}
