use eframe::egui;

use geolabel_core::{StepDirection, MAX_STEP_SIZE_PX};

use crate::app::LabelApp;

/// Step buttons in display order. "Y+" moves the marker north, which is
/// up the image and therefore toward smaller pixel rows.
const STEP_BUTTONS: [(&str, StepDirection); 4] = [
    ("X+", StepDirection::XPlus),
    ("X-", StepDirection::XMinus),
    ("Y+", StepDirection::YMinus),
    ("Y-", StepDirection::YPlus),
];

impl LabelApp {
    /// Top panel: step buttons, step size, and the coordinate readout.
    pub(crate) fn draw_controls(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            let live = self.session.is_some();

            ui.horizontal(|ui| {
                for (text, direction) in STEP_BUTTONS {
                    if ui.add_enabled(live, egui::Button::new(text)).clicked() {
                        let _ = self.navigate(|s| s.on_step(direction));
                    }
                }
            });

            ui.horizontal(|ui| {
                ui.label("Step size:");
                let slider = egui::Slider::new(&mut self.step_size, 0..=MAX_STEP_SIZE_PX)
                    .suffix(" px");
                if ui.add(slider).changed() {
                    self.apply_step_size();
                }
            });

            ui.horizontal(|ui| {
                if ui.add_enabled(live, egui::Button::new("Copy")).clicked() {
                    if let Some(session) = &self.session {
                        ctx.copy_text(session.clipboard_text());
                    }
                }

                let readout = match &self.session {
                    Some(session) => {
                        format!("Longitude, Latitude: {}", session.current_geo_coordinate())
                    }
                    None => format!("Longitude, Latitude: {}", self.frame.center),
                };
                ui.label(readout);

                if ui.add_enabled(live, egui::Button::new("Open in map")).clicked() {
                    if let Some(session) = &self.session {
                        let url = session.map_link(&self.config.map_link_template);
                        ctx.open_url(egui::OpenUrl::new_tab(url));
                    }
                }
            });
        });
    }
}
