//! Position markers composited onto a copy of the base map image.
//!
//! Every function here clones the base and draws on the clone, so the base
//! raster stays pristine and a redraw never shows a stale marker.

use geolabel_core::{GeoPoint, PixelPoint};

use crate::buffer::RenderBuffer;

/// Appearance of the position marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    /// Marker color; always drawn fully opaque.
    pub color: [u8; 3],
    /// Every pixel within this distance of the marker pixel is filled, so a
    /// disc spans `2 * radius_px + 1` pixels across (11 at the default).
    /// The center mark's arms reach twice as far.
    pub radius_px: u32,
}

impl MarkerStyle {
    pub const DEFAULT_RADIUS_PX: u32 = 5;

    pub fn with_radius(radius_px: u32) -> Self {
        Self {
            radius_px,
            ..Self::default()
        }
    }

    #[inline]
    fn rgba(&self) -> [u8; 4] {
        [self.color[0], self.color[1], self.color[2], 255]
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: [255, 0, 0],
            radius_px: Self::DEFAULT_RADIUS_PX,
        }
    }
}

/// Copy of `base` with a filled disc centred on `pixel`.
///
/// Parts of the disc outside the raster are dropped; a marker entirely off
/// the canvas (or at a non-finite position) leaves the copy untouched.
pub fn render_marker(base: &RenderBuffer, pixel: PixelPoint, style: &MarkerStyle) -> RenderBuffer {
    let mut out = base.clone();
    if let Some((cx, cy)) = raster_position(pixel) {
        fill_disc(&mut out, cx, cy, style.radius_px as i64, style.rgba());
    }
    out
}

/// Copy of `base` with a crosshair marking the session center.
pub fn render_center_mark(
    base: &RenderBuffer,
    center_pixel: PixelPoint,
    style: &MarkerStyle,
) -> RenderBuffer {
    let mut out = base.clone();
    if let Some((cx, cy)) = raster_position(center_pixel) {
        let arm = (style.radius_px as i64 * 2).max(2);
        let rgba = style.rgba();
        if (0..out.height as i64).contains(&cy) {
            let (x0, x1) = clip_span(cx, arm, out.width);
            for x in x0..=x1 {
                out.put_pixel(x as u32, cy as u32, rgba);
            }
        }
        if (0..out.width as i64).contains(&cx) {
            let (y0, y1) = clip_span(cy, arm, out.height);
            for y in y0..=y1 {
                out.put_pixel(cx as u32, y as u32, rgba);
            }
        }
    }
    out
}

/// What the canvas shows before the operator has moved the marker.
///
/// A session centred on [`GeoPoint::UNSET`] shows the raw image with no
/// mark at all; any other center gets a center mark.
pub fn initial_display(
    base: &RenderBuffer,
    center: GeoPoint,
    center_pixel: PixelPoint,
    style: &MarkerStyle,
) -> RenderBuffer {
    if center.is_unset() {
        base.clone()
    } else {
        render_center_mark(base, center_pixel, style)
    }
}

/// Integer raster position of a pixel point, truncating toward zero.
fn raster_position(pixel: PixelPoint) -> Option<(i64, i64)> {
    if !pixel.x.is_finite() || !pixel.y.is_finite() {
        return None;
    }
    // `as` saturates, so far-off positions simply end up clipped.
    Some((pixel.x.trunc() as i64, pixel.y.trunc() as i64))
}

fn fill_disc(buf: &mut RenderBuffer, cx: i64, cy: i64, radius: i64, rgba: [u8; 4]) {
    let (x0, x1) = clip_span(cx, radius, buf.width);
    let (y0, y1) = clip_span(cy, radius, buf.height);
    if x0 > x1 || y0 > y1 {
        return;
    }
    // Squares of u32-sized offsets do not fit in i64.
    let r2 = (radius as i128).pow(2);
    for y in y0..=y1 {
        let dy = (y - cy) as i128;
        for x in x0..=x1 {
            let dx = (x - cx) as i128;
            if dx * dx + dy * dy <= r2 {
                buf.put_pixel(x as u32, y as u32, rgba);
            }
        }
    }
}

/// `center ± reach` clipped to `0..len`. Empty (start > end) when the span
/// misses the raster entirely.
#[inline]
fn clip_span(center: i64, reach: i64, len: u32) -> (i64, i64) {
    let start = center.saturating_sub(reach).max(0);
    let end = center.saturating_add(reach).min(len as i64 - 1);
    (start, end)
}
