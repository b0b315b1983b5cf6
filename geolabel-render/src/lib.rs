pub mod buffer;
pub mod decode;
pub mod error;
pub mod marker;

pub use buffer::RenderBuffer;
pub use decode::decode_image;
pub use error::RenderError;
pub use marker::{initial_display, render_center_mark, render_marker, MarkerStyle};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
