pub mod error;
pub mod geo;
pub mod navigation;
pub mod transform;

// Re-export primary types for convenience.
pub use error::CoreError;
pub use geo::{BoundingBox, GeoPoint, PixelPoint};
pub use navigation::{NavigationState, StepDirection, DEFAULT_STEP_SIZE_PX, MAX_STEP_SIZE_PX};
pub use transform::{bounding_box, geo_to_pixel, pixel_to_geo, GeoFrame};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
