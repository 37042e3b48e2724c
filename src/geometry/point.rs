//! Polygon vertices tagged with their coordinate space.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

use super::space::{Normalized, Pixel};

/// A 2D vertex with a type-level marker for the coordinate space.
///
/// Use the [`PolygonPoint`] alias for pixel-space vertices and
/// [`NormalizedPoint`] for YOLO fractions; the two cannot be mixed by
/// accident.
#[derive(Clone, Copy, PartialEq)]
pub struct Point<TSpace> {
    pub x: f64,
    pub y: f64,
    _space: PhantomData<TSpace>,
}

/// A pixel-space polygon vertex.
pub type PolygonPoint = Point<Pixel>;

/// A vertex expressed as fractions of the image size.
pub type NormalizedPoint = Point<Normalized>;

impl<TSpace> Point<TSpace> {
    /// Creates a new point with the given x and y values.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            _space: PhantomData,
        }
    }

    /// Returns true if both coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Point<Pixel> {
    /// Divides by the image size.
    #[inline]
    pub fn to_normalized(&self, image_width: f64, image_height: f64) -> Point<Normalized> {
        Point::new(self.x / image_width, self.y / image_height)
    }
}

impl Point<Normalized> {
    /// Scales back up to pixels.
    #[inline]
    pub fn to_pixel(&self, image_width: f64, image_height: f64) -> Point<Pixel> {
        Point::new(self.x * image_width, self.y * image_height)
    }
}

impl<TSpace> std::fmt::Debug for Point<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Point")
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}

impl<TSpace> Default for Point<TSpace> {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

// Hand-written so that TSpace does not need serde bounds.
impl<TSpace> Serialize for Point<TSpace> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Point", 2)?;
        state.serialize_field("x", &self.x)?;
        state.serialize_field("y", &self.y)?;
        state.end()
    }
}

impl<'de, TSpace> Deserialize<'de> for Point<TSpace> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct PointData {
            x: f64,
            y: f64,
        }
        let data = PointData::deserialize(deserializer)?;
        Ok(Point::new(data.x, data.y))
    }
}
