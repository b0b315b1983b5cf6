use eframe::egui;

use crate::app::LabelApp;
use crate::app_state::SessionPhase;

impl LabelApp {
    /// Central panel: the annotated map image, or the loading/error state.
    pub(crate) fn draw_canvas(&mut self, ctx: &egui::Context) {
        let phase = self.phase.clone();
        egui::CentralPanel::default().show(ctx, |ui| match phase {
            SessionPhase::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Fetching map image\u{2026}");
                });
            }
            SessionPhase::Failed(reason) => {
                ui.colored_label(
                    egui::Color32::from_rgb(255, 110, 110),
                    format!("No map image: {reason}"),
                );
            }
            SessionPhase::Committed => {
                ui.label("Label saved.");
            }
            SessionPhase::Labelling => {
                egui::ScrollArea::both().show(ui, |ui| self.draw_map(ui));
            }
        });
    }

    fn draw_map(&mut self, ui: &mut egui::Ui) {
        let side = self.frame.image_size_px as f32;
        let (response, painter) =
            ui.allocate_painter(egui::vec2(side, side), egui::Sense::click());

        if let Some(ref tex) = self.texture {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter.image(tex.id(), response.rect, uv, egui::Color32::WHITE);
        }

        self.handle_canvas_input(&response);
    }
}
