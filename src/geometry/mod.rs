//! Deterministic 2D geometry kernel.
//!
//! Every function here is pure: inputs are borrowed, outputs are new values.
//! Nothing in this module rejects degenerate geometry; zero-sized boxes and
//! empty polygons produce defined (if uninteresting) results so that drag
//! gestures never fail mid-interaction.
//!
//! # Example
//!
//! ```
//! use labelkit::geometry::{apply_resize, clamp_box, normalize_box, ResizeHandle};
//!
//! let drawn = normalize_box(300.0, 250.0, 100.0, 100.0);
//! let inside = clamp_box(&drawn, 800.0, 600.0);
//! let resized = apply_resize(&inside, ResizeHandle::W, 300.0, 0.0);
//! assert_eq!(resized.width, 1.0);
//! assert_eq!(resized.x, 299.0);
//! ```

mod bbox;
mod point;
mod polygon;
mod space;

pub use bbox::{
    apply_resize, boxes_intersect, clamp_box, get_resize_handle, move_box, normalize_box,
    point_in_box, BoundingBox, ResizeHandle, DEFAULT_HANDLE_SIZE,
};
pub use point::{NormalizedPoint, Point, PolygonPoint};
pub use polygon::{close_polygon, point_in_polygon, polygon_bounds, simplify_polygon};
pub use space::{Normalized, Pixel};
