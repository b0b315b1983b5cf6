use std::fmt;

use serde::{Deserialize, Serialize};

/// A geographic coordinate in degrees.
///
/// Values are never clamped or wrapped: navigating far from a session's
/// center can legitimately produce longitudes beyond ±180 or latitudes
/// beyond ±90.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    /// The "no center given" coordinate. A session anchored here starts
    /// without a center mark.
    pub const UNSET: Self = Self {
        longitude: 0.0,
        latitude: 0.0,
    };

    #[inline]
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// True only when both components are exactly zero.
    #[inline]
    pub fn is_unset(self) -> bool {
        self.longitude == 0.0 && self.latitude == 0.0
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.longitude, self.latitude)
    }
}

/// A position in image space. Origin is the top-left corner, `x` grows to
/// the right and `y` grows downward. Not bounded to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The rectangle requested from the map service, in degrees.
///
/// Only built by [`crate::bounding_box`] or [`crate::GeoFrame::bounding_box`],
/// so it is always square and centred on the point it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    pub(crate) fn around(center: GeoPoint, span: f64) -> Self {
        let half = span / 2.0;
        Self {
            west: center.longitude - half,
            south: center.latitude - half,
            east: center.longitude + half,
            north: center.latitude + half,
        }
    }

    /// Longitude extent (`east - west`).
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Latitude extent (`north - south`).
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.west + self.east) / 2.0,
            (self.south + self.north) / 2.0,
        )
    }

    /// `west,south,east,north`, the order WMS `BBOX` parameters expect.
    pub fn to_wms_string(&self) -> String {
        format!("{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_sentinel_requires_both_zero() {
        assert!(GeoPoint::UNSET.is_unset());
        assert!(GeoPoint::new(0.0, 0.0).is_unset());
        assert!(GeoPoint::new(-0.0, 0.0).is_unset());
        assert!(!GeoPoint::new(0.0, 1e-12).is_unset());
        assert!(!GeoPoint::new(10.0, 0.0).is_unset());
    }

    #[test]
    fn display_is_lon_comma_lat() {
        assert_eq!(GeoPoint::new(10.5, 50.25).to_string(), "10.5,50.25");
    }

    #[test]
    fn wms_string_order() {
        let bbox = BoundingBox::around(GeoPoint::new(1.0, 2.0), 2.0);
        assert_eq!(bbox.to_wms_string(), "0,1,2,3");
    }

    #[test]
    fn geo_point_serde_field_names() {
        let json = serde_json::to_string(&GeoPoint::new(1.5, -2.0)).unwrap();
        assert_eq!(json, r#"{"longitude":1.5,"latitude":-2.0}"#);
    }
}
