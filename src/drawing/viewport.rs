//! Pan/zoom transform between canvas and image pixels.

use serde::{Deserialize, Serialize};

use crate::geometry::PolygonPoint;

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

/// Multiplier applied by one zoom-in step (and divided out by zoom-out).
pub const ZOOM_STEP: f64 = 1.2;

/// Canvas = image * zoom + pan.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl Viewport {
    pub fn new(zoom: f64, pan_x: f64, pan_y: f64) -> Self {
        Self {
            zoom: clamp_zoom(zoom),
            pan_x,
            pan_y,
        }
    }

    /// Sets the zoom, clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_zoom(zoom);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / ZOOM_STEP);
    }

    pub fn set_pan(&mut self, pan_x: f64, pan_y: f64) {
        self.pan_x = pan_x;
        self.pan_y = pan_y;
    }

    /// Back to zoom 1 with no pan.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Maps a canvas position to image pixels.
    pub fn to_image(&self, canvas_x: f64, canvas_y: f64) -> PolygonPoint {
        PolygonPoint::new(
            (canvas_x - self.pan_x) / self.zoom,
            (canvas_y - self.pan_y) / self.zoom,
        )
    }

    /// Maps a canvas position to image pixels, clamped into the image.
    pub fn to_image_clamped(
        &self,
        canvas_x: f64,
        canvas_y: f64,
        image_width: f64,
        image_height: f64,
    ) -> PolygonPoint {
        let p = self.to_image(canvas_x, canvas_y);
        PolygonPoint::new(p.x.min(image_width).max(0.0), p.y.min(image_height).max(0.0))
    }

    /// Distance between two image points as it appears on screen.
    pub fn screen_distance(&self, a: &PolygonPoint, b: &PolygonPoint) -> f64 {
        a.distance_to(b) * self.zoom
    }
}

fn clamp_zoom(zoom: f64) -> f64 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}
