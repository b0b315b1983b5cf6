use eframe::egui;

use geolabel_core::{PixelPoint, StepDirection};

use crate::app::LabelApp;
use crate::app_state::SessionPhase;

/// Arrow keys step the marker; up is north.
const KEY_STEPS: [(egui::Key, StepDirection); 4] = [
    (egui::Key::ArrowLeft, StepDirection::XMinus),
    (egui::Key::ArrowRight, StepDirection::XPlus),
    (egui::Key::ArrowUp, StepDirection::YMinus),
    (egui::Key::ArrowDown, StepDirection::YPlus),
];

impl LabelApp {
    pub(crate) fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if self.phase != SessionPhase::Labelling {
            return;
        }
        for (key, direction) in KEY_STEPS {
            if ctx.input(|i| i.key_pressed(key)) {
                let _ = self.navigate(|s| s.on_step(direction));
            }
        }
    }

    /// Convert a click on the map canvas to an image pixel and move there.
    pub(crate) fn handle_canvas_input(&mut self, response: &egui::Response) {
        if !response.clicked() {
            return;
        }
        let Some(pos) = response.interact_pointer_pos() else {
            return;
        };
        let local = pos - response.rect.min;
        let pixels_per_point = self.frame.image_size_px as f32 / response.rect.width().max(1.0);
        let pixel = PixelPoint::new(
            (local.x * pixels_per_point).floor() as f64,
            (local.y * pixels_per_point).floor() as f64,
        );
        let _ = self.navigate(|s| s.on_click(pixel));
    }
}
