use eframe::egui;

use crate::app::LabelApp;

impl LabelApp {
    /// Bottom panel: one commit button per label, any pending error, and EXIT.
    pub(crate) fn draw_label_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("labels").show(ctx, |ui| {
            if let Some(status) = &self.status {
                ui.colored_label(egui::Color32::from_rgb(255, 110, 110), status.as_str());
            }

            let live = self.session.is_some();
            let mut chosen: Option<String> = None;
            ui.horizontal_wrapped(|ui| {
                for label in &self.config.labels {
                    if ui.add_enabled(live, egui::Button::new(label.as_str())).clicked() {
                        chosen = Some(label.clone());
                    }
                }
            });
            if let Some(label) = chosen {
                self.commit_label(ctx, &label);
            }

            ui.separator();
            let exit = egui::Button::new(egui::RichText::new("EXIT").color(egui::Color32::WHITE))
                .fill(egui::Color32::from_rgb(200, 40, 40))
                .min_size(egui::vec2(100.0, 32.0));
            if ui.add(exit).clicked() {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });
    }
}
