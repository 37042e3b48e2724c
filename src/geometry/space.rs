//! Coordinate space marker types.
//!
//! These are zero-sized types (ZSTs) used as type parameters to distinguish
//! image-pixel positions from YOLO's normalized fractions at compile time.

use std::fmt;

/// Marker type for pixel coordinates (absolute values).
///
/// Pixel coordinates are floats measured from the top-left corner of the
/// image. Everything the store holds lives in this space.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Marker type for normalized coordinates (0.0 to 1.0).
///
/// Normalized coordinates are fractions of the image width/height and only
/// appear inside the YOLO codec.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalized {}

impl fmt::Debug for Pixel {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl fmt::Debug for Normalized {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}
