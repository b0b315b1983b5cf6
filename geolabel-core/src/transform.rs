use crate::error::CoreError;
use crate::geo::{BoundingBox, GeoPoint, PixelPoint};

/// Map a pixel position on a square map image to a geographic coordinate.
///
/// The image is assumed to cover `relative_span` degrees in both directions,
/// centred on `center`. Pixel rows grow downward while latitude grows
/// northward, so the vertical offset is subtracted.
///
/// Only `image_size_px` is validated; the mapping itself is a total linear
/// function and accepts pixels outside the canvas.
pub fn pixel_to_geo(
    pixel: PixelPoint,
    center: GeoPoint,
    image_size_px: u32,
    relative_span: f64,
) -> crate::Result<GeoPoint> {
    check_image_size(image_size_px)?;
    Ok(linear_pixel_to_geo(
        pixel,
        center,
        image_size_px,
        relative_span,
    ))
}

/// Inverse of [`pixel_to_geo`] for the same center, size and span.
pub fn geo_to_pixel(
    geo: GeoPoint,
    center: GeoPoint,
    image_size_px: u32,
    relative_span: f64,
) -> crate::Result<PixelPoint> {
    check_image_size(image_size_px)?;
    check_span(relative_span)?;
    Ok(linear_geo_to_pixel(
        geo,
        center,
        image_size_px,
        relative_span,
    ))
}

/// Square box of side `relative_span` degrees centred on `center`.
pub fn bounding_box(center: GeoPoint, relative_span: f64) -> crate::Result<BoundingBox> {
    check_span(relative_span)?;
    Ok(BoundingBox::around(center, relative_span))
}

#[inline]
fn linear_pixel_to_geo(
    pixel: PixelPoint,
    center: GeoPoint,
    image_size_px: u32,
    relative_span: f64,
) -> GeoPoint {
    let size = image_size_px as f64;
    let degrees_per_pixel = relative_span / size;
    let half = size / 2.0;
    GeoPoint::new(
        center.longitude + (pixel.x - half) * degrees_per_pixel,
        center.latitude - (pixel.y - half) * degrees_per_pixel,
    )
}

#[inline]
fn linear_geo_to_pixel(
    geo: GeoPoint,
    center: GeoPoint,
    image_size_px: u32,
    relative_span: f64,
) -> PixelPoint {
    let size = image_size_px as f64;
    let degrees_per_pixel = relative_span / size;
    let half = size / 2.0;
    PixelPoint::new(
        half + (geo.longitude - center.longitude) / degrees_per_pixel,
        half - (geo.latitude - center.latitude) / degrees_per_pixel,
    )
}

fn check_image_size(image_size_px: u32) -> crate::Result<()> {
    if image_size_px == 0 {
        return Err(CoreError::InvalidDimension {
            what: "image size",
            value: 0.0,
        });
    }
    Ok(())
}

fn check_span(relative_span: f64) -> crate::Result<()> {
    if relative_span <= 0.0 || !relative_span.is_finite() {
        return Err(CoreError::InvalidDimension {
            what: "relative span",
            value: relative_span,
        });
    }
    Ok(())
}

/// The region of the earth shown by one fetched map image.
///
/// A frame is the single source of both the bounding box used to request
/// the image and the pixel/geo mapping applied to clicks on it. Building
/// both from the same frame keeps them calibrated against each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoFrame {
    /// Geographic point at the middle of the image.
    pub center: GeoPoint,

    /// Side length of the (square) image in pixels.
    pub image_size_px: u32,

    /// Degrees covered by the full image width, and height.
    pub relative_span: f64,
}

impl GeoFrame {
    /// Create a frame, rejecting a zero size or a non-positive span.
    pub fn new(center: GeoPoint, image_size_px: u32, relative_span: f64) -> crate::Result<Self> {
        check_image_size(image_size_px)?;
        check_span(relative_span)?;
        Ok(Self {
            center,
            image_size_px,
            relative_span,
        })
    }

    /// The box to request from the map service for this frame.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::around(self.center, self.relative_span)
    }

    #[inline]
    pub fn pixel_to_geo(&self, pixel: PixelPoint) -> GeoPoint {
        linear_pixel_to_geo(pixel, self.center, self.image_size_px, self.relative_span)
    }

    #[inline]
    pub fn geo_to_pixel(&self, geo: GeoPoint) -> PixelPoint {
        linear_geo_to_pixel(geo, self.center, self.image_size_px, self.relative_span)
    }

    /// The pixel that maps exactly onto [`center`](Self::center).
    pub fn center_pixel(&self) -> PixelPoint {
        let half = self.image_size_px as f64 / 2.0;
        PixelPoint::new(half, half)
    }

    pub fn degrees_per_pixel(&self) -> f64 {
        self.relative_span / self.image_size_px as f64
    }
}
