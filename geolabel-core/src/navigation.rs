use tracing::debug;

use crate::geo::{GeoPoint, PixelPoint};
use crate::transform::GeoFrame;

/// Step size used when a session starts.
pub const DEFAULT_STEP_SIZE_PX: u32 = 5;
/// Largest accepted step size, inclusive.
pub const MAX_STEP_SIZE_PX: u32 = 50;

/// One discrete move along a single pixel axis.
///
/// `XPlus`/`YPlus` increase the pixel coordinate, so `YPlus` moves the
/// marker down the image (south).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    XMinus,
    XPlus,
    YMinus,
    YPlus,
}

impl StepDirection {
    /// Unit pixel offset `(dx, dy)` for this direction.
    fn unit(self) -> (f64, f64) {
        match self {
            Self::XMinus => (-1.0, 0.0),
            Self::XPlus => (1.0, 0.0),
            Self::YMinus => (0.0, -1.0),
            Self::YPlus => (0.0, 1.0),
        }
    }
}

/// Current marker position on one map image.
///
/// Owns the pixel position and the geographic coordinate derived from it;
/// every mutation recomputes both axes of the coordinate through the frame.
/// Positions are never clipped to the canvas.
#[derive(Debug, Clone)]
pub struct NavigationState {
    frame: GeoFrame,
    current_pixel: PixelPoint,
    current_geo: GeoPoint,
    step_size_px: u32,
}

impl NavigationState {
    /// Start at the image centre, which maps back exactly onto the frame's center.
    pub fn new(frame: GeoFrame) -> Self {
        let current_pixel = frame.center_pixel();
        Self {
            frame,
            current_pixel,
            current_geo: frame.pixel_to_geo(current_pixel),
            step_size_px: DEFAULT_STEP_SIZE_PX,
        }
    }

    /// Same as [`new`](Self::new) with an initial step size (clamped).
    pub fn with_step_size(frame: GeoFrame, step_size_px: i64) -> Self {
        let mut state = Self::new(frame);
        state.set_step_size(step_size_px);
        state
    }

    /// Move the marker to the clicked pixel.
    pub fn on_click(&mut self, pixel: PixelPoint) -> GeoPoint {
        self.move_to(pixel)
    }

    /// Move the marker by the current step size along one axis.
    pub fn on_step(&mut self, direction: StepDirection) -> GeoPoint {
        let (dx, dy) = direction.unit();
        let step = self.step_size_px as f64;
        let target = PixelPoint::new(
            self.current_pixel.x + dx * step,
            self.current_pixel.y + dy * step,
        );
        self.move_to(target)
    }

    /// Set the step size, clamped into `0..=MAX_STEP_SIZE_PX`. Returns the
    /// value actually applied.
    pub fn set_step_size(&mut self, px: i64) -> u32 {
        let clamped = px.clamp(0, MAX_STEP_SIZE_PX as i64) as u32;
        if clamped as i64 != px {
            debug!(requested = px, applied = clamped, "Step size clamped");
        }
        self.step_size_px = clamped;
        clamped
    }

    pub fn current_pixel(&self) -> PixelPoint {
        self.current_pixel
    }

    pub fn current_geo(&self) -> GeoPoint {
        self.current_geo
    }

    pub fn step_size(&self) -> u32 {
        self.step_size_px
    }

    pub fn frame(&self) -> &GeoFrame {
        &self.frame
    }

    fn move_to(&mut self, pixel: PixelPoint) -> GeoPoint {
        self.current_pixel = pixel;
        self.current_geo = self.frame.pixel_to_geo(pixel);
        debug!(
            x = pixel.x,
            y = pixel.y,
            lon = self.current_geo.longitude,
            lat = self.current_geo.latitude,
            "Marker moved"
        );
        self.current_geo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> NavigationState {
        let frame = GeoFrame::new(GeoPoint::new(10.0, 50.0), 512, 0.02).unwrap();
        NavigationState::new(frame)
    }

    #[test]
    fn starts_at_center() {
        let nav = state();
        assert_eq!(nav.current_pixel(), PixelPoint::new(256.0, 256.0));
        assert_eq!(nav.current_geo(), GeoPoint::new(10.0, 50.0));
        assert_eq!(nav.step_size(), DEFAULT_STEP_SIZE_PX);
    }

    #[test]
    fn three_steps_right() {
        let mut nav = state();
        nav.set_step_size(5);
        for _ in 0..3 {
            nav.on_step(StepDirection::XPlus);
        }
        assert_eq!(nav.current_pixel().x, 256.0 + 15.0);
        assert_eq!(nav.current_pixel().y, 256.0);
    }

    #[test]
    fn click_then_step_matches_direct_click() {
        let mut stepped = state();
        stepped.set_step_size(7);
        stepped.on_click(PixelPoint::new(40.0, 300.0));
        stepped.on_step(StepDirection::XPlus);

        let mut clicked = state();
        clicked.on_click(PixelPoint::new(47.0, 300.0));

        assert_eq!(stepped.current_pixel().x, clicked.current_pixel().x);
        assert_eq!(stepped.current_geo(), clicked.current_geo());
    }

    #[test]
    fn step_updates_both_axes_of_geo() {
        let mut nav = state();
        nav.on_click(PixelPoint::new(100.0, 100.0));
        let before = nav.current_geo();

        let after_x = nav.on_step(StepDirection::XPlus);
        assert!(after_x.longitude > before.longitude);
        assert_eq!(after_x.latitude, before.latitude);
        assert_eq!(nav.current_geo(), after_x);

        let after_y = nav.on_step(StepDirection::YPlus);
        assert!(after_y.latitude < after_x.latitude);
        assert_eq!(after_y.longitude, after_x.longitude);
        assert_eq!(nav.current_geo(), nav.frame().pixel_to_geo(nav.current_pixel()));
    }

    #[test]
    fn step_directions_move_expected_axis() {
        let mut nav = state();
        nav.on_step(StepDirection::XMinus);
        assert_eq!(nav.current_pixel(), PixelPoint::new(251.0, 256.0));
        nav.on_step(StepDirection::YMinus);
        assert_eq!(nav.current_pixel(), PixelPoint::new(251.0, 251.0));
        nav.on_step(StepDirection::YPlus);
        nav.on_step(StepDirection::YPlus);
        assert_eq!(nav.current_pixel(), PixelPoint::new(251.0, 261.0));
    }

    #[test]
    fn click_is_not_clipped() {
        let mut nav = state();
        let geo = nav.on_click(PixelPoint::new(-30.0, 9000.0));
        assert_eq!(nav.current_pixel(), PixelPoint::new(-30.0, 9000.0));
        assert!(geo.longitude < 9.99);
        assert!(geo.latitude < 49.99);
    }

    #[test]
    fn stepping_can_leave_the_canvas() {
        let mut nav = state();
        nav.set_step_size(50);
        for _ in 0..20 {
            nav.on_step(StepDirection::XMinus);
        }
        assert_eq!(nav.current_pixel().x, 256.0 - 1000.0);
    }

    #[test]
    fn step_size_is_clamped_inclusive() {
        let mut nav = state();
        assert_eq!(nav.set_step_size(0), 0);
        assert_eq!(nav.set_step_size(50), 50);
        assert_eq!(nav.set_step_size(51), 50);
        assert_eq!(nav.set_step_size(-3), 0);
        assert_eq!(nav.step_size(), 0);
    }

    #[test]
    fn zero_step_does_not_move() {
        let mut nav = NavigationState::with_step_size(*state().frame(), 0);
        let geo = nav.on_step(StepDirection::YPlus);
        assert_eq!(geo, GeoPoint::new(10.0, 50.0));
    }
}
