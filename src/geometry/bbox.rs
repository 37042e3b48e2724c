//! Axis-aligned boxes in pixel space and the drag math that edits them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Hit radius used by the canvas for resize handles, in pixels.
pub const DEFAULT_HANDLE_SIZE: f64 = 8.0;

/// Smallest width/height a resize can produce.
const MIN_RESIZE_EXTENT: f64 = 1.0;

/// An axis-aligned bounding box in XYWH format (top-left origin).
///
/// Width and height are expected to be non-negative, but this is not
/// enforced: producers normalize at the gesture boundary and consumers treat
/// it as a soft contract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Creates a new box from origin and size.
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the right edge (`x + width`).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Returns the bottom edge (`y + height`).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Returns true if all fields are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// Builds the canonical box spanned by two drag corners, in any order.
///
/// Degenerate (zero width or height) results are returned as-is; callers
/// reject them before committing.
pub fn normalize_box(start_x: f64, start_y: f64, end_x: f64, end_y: f64) -> BoundingBox {
    BoundingBox {
        x: start_x.min(end_x),
        y: start_y.min(end_y),
        width: (end_x - start_x).abs(),
        height: (end_y - start_y).abs(),
    }
}

/// Clamps a box into `[0, max_width] x [0, max_height]`.
///
/// The origin is clamped first, then each dimension is limited to the space
/// left between the clamped origin and the far boundary.
pub fn clamp_box(bbox: &BoundingBox, max_width: f64, max_height: f64) -> BoundingBox {
    let x = bbox.x.min(max_width).max(0.0);
    let y = bbox.y.min(max_height).max(0.0);
    BoundingBox {
        x,
        y,
        width: bbox.width.min(max_width - x),
        height: bbox.height.min(max_height - y),
    }
}

/// Inclusive containment test: points on any edge are inside.
pub fn point_in_box(px: f64, py: f64, bbox: &BoundingBox) -> bool {
    px >= bbox.x && px <= bbox.right() && py >= bbox.y && py <= bbox.bottom()
}

/// Returns true unless the boxes are strictly separated on an axis.
///
/// Boxes that merely touch along an edge count as intersecting.
pub fn boxes_intersect(a: &BoundingBox, b: &BoundingBox) -> bool {
    !(a.right() < b.x || b.right() < a.x || a.bottom() < b.y || b.bottom() < a.y)
}

/// Translates a box without touching its size.
pub fn move_box(bbox: &BoundingBox, dx: f64, dy: f64) -> BoundingBox {
    BoundingBox {
        x: bbox.x + dx,
        y: bbox.y + dy,
        ..*bbox
    }
}

/// One of the eight grab points around a box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    Nw,
    Ne,
    Sw,
    Se,
    N,
    S,
    E,
    W,
}

impl ResizeHandle {
    /// All handles, corners first.
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::Nw,
        ResizeHandle::Ne,
        ResizeHandle::Sw,
        ResizeHandle::Se,
        ResizeHandle::N,
        ResizeHandle::S,
        ResizeHandle::E,
        ResizeHandle::W,
    ];

    /// Short compass name (`"nw"`, `"e"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeHandle::Nw => "nw",
            ResizeHandle::Ne => "ne",
            ResizeHandle::Sw => "sw",
            ResizeHandle::Se => "se",
            ResizeHandle::N => "n",
            ResizeHandle::S => "s",
            ResizeHandle::E => "e",
            ResizeHandle::W => "w",
        }
    }

    /// Returns true for the four corner handles.
    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            ResizeHandle::Nw | ResizeHandle::Ne | ResizeHandle::Sw | ResizeHandle::Se
        )
    }
}

impl fmt::Display for ResizeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finds the resize handle under `(px, py)`, if any.
///
/// A point is on an edge when its perpendicular distance to it is at most
/// `handle_size / 2`. Corners are checked before edges, and edge handles
/// additionally require the other coordinate to lie strictly between the
/// box's extents on that axis.
pub fn get_resize_handle(
    px: f64,
    py: f64,
    bbox: &BoundingBox,
    handle_size: f64,
) -> Option<ResizeHandle> {
    let half = handle_size / 2.0;
    let right = bbox.right();
    let bottom = bbox.bottom();

    let on_left = (px - bbox.x).abs() <= half;
    let on_right = (px - right).abs() <= half;
    let on_top = (py - bbox.y).abs() <= half;
    let on_bottom = (py - bottom).abs() <= half;

    let inside_x = px > bbox.x && px < right;
    let inside_y = py > bbox.y && py < bottom;

    if on_top && on_left {
        Some(ResizeHandle::Nw)
    } else if on_top && on_right {
        Some(ResizeHandle::Ne)
    } else if on_bottom && on_left {
        Some(ResizeHandle::Sw)
    } else if on_bottom && on_right {
        Some(ResizeHandle::Se)
    } else if on_top && inside_x {
        Some(ResizeHandle::N)
    } else if on_bottom && inside_x {
        Some(ResizeHandle::S)
    } else if on_left && inside_y {
        Some(ResizeHandle::W)
    } else if on_right && inside_y {
        Some(ResizeHandle::E)
    } else {
        None
    }
}

/// Applies a handle drag of `(dx, dy)` to a box.
///
/// After the drag, each axis is held to a minimum extent of 1. A collapsed
/// axis keeps its far edge where the adjusted box put it: the origin becomes
/// `origin + extent - 1` and the extent becomes exactly 1.
pub fn apply_resize(bbox: &BoundingBox, handle: ResizeHandle, dx: f64, dy: f64) -> BoundingBox {
    let mut out = *bbox;

    match handle {
        ResizeHandle::Nw => {
            out.x += dx;
            out.y += dy;
            out.width -= dx;
            out.height -= dy;
        }
        ResizeHandle::Ne => {
            out.y += dy;
            out.width += dx;
            out.height -= dy;
        }
        ResizeHandle::Sw => {
            out.x += dx;
            out.width -= dx;
            out.height += dy;
        }
        ResizeHandle::Se => {
            out.width += dx;
            out.height += dy;
        }
        ResizeHandle::N => {
            out.y += dy;
            out.height -= dy;
        }
        ResizeHandle::S => {
            out.height += dy;
        }
        ResizeHandle::W => {
            out.x += dx;
            out.width -= dx;
        }
        ResizeHandle::E => {
            out.width += dx;
        }
    }

    if out.width < MIN_RESIZE_EXTENT {
        out.x = out.x + out.width - MIN_RESIZE_EXTENT;
        out.width = MIN_RESIZE_EXTENT;
    }
    if out.height < MIN_RESIZE_EXTENT {
        out.y = out.y + out.height - MIN_RESIZE_EXTENT;
        out.height = MIN_RESIZE_EXTENT;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BoundingBox {
        BoundingBox::new(100.0, 100.0, 200.0, 150.0)
    }

    #[test]
    fn normalize_box_handles_every_drag_direction() {
        let expected = BoundingBox::new(10.0, 20.0, 90.0, 180.0);
        assert_eq!(normalize_box(10.0, 20.0, 100.0, 200.0), expected);
        assert_eq!(normalize_box(100.0, 200.0, 10.0, 20.0), expected);
        assert_eq!(normalize_box(10.0, 200.0, 100.0, 20.0), expected);
        assert_eq!(normalize_box(100.0, 20.0, 10.0, 200.0), expected);
    }

    #[test]
    fn normalize_box_allows_degenerate_output() {
        assert_eq!(
            normalize_box(50.0, 50.0, 50.0, 50.0),
            BoundingBox::new(50.0, 50.0, 0.0, 0.0)
        );
        assert_eq!(
            normalize_box(10.0, 50.0, 100.0, 50.0),
            BoundingBox::new(10.0, 50.0, 90.0, 0.0)
        );
    }

    #[test]
    fn clamp_box_trims_right_and_bottom_overflow() {
        let clamped = clamp_box(&BoundingBox::new(150.0, 150.0, 100.0, 100.0), 200.0, 200.0);
        assert_eq!(clamped, BoundingBox::new(150.0, 150.0, 50.0, 50.0));
    }

    #[test]
    fn clamp_box_moves_negative_origin_without_shrinking() {
        let clamped = clamp_box(&BoundingBox::new(-20.0, -30.0, 100.0, 100.0), 200.0, 200.0);
        assert_eq!(clamped, BoundingBox::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn clamp_box_pulls_far_outside_box_onto_boundary() {
        let clamped = clamp_box(&BoundingBox::new(500.0, 700.0, 50.0, 50.0), 200.0, 200.0);
        assert_eq!(clamped, BoundingBox::new(200.0, 200.0, 0.0, 0.0));
    }

    #[test]
    fn point_in_box_is_inclusive() {
        let b = BoundingBox::new(10.0, 10.0, 100.0, 80.0);
        assert!(point_in_box(50.0, 50.0, &b));
        assert!(point_in_box(10.0, 10.0, &b));
        assert!(point_in_box(110.0, 90.0, &b));
        assert!(point_in_box(110.0, 50.0, &b));
        assert!(!point_in_box(5.0, 50.0, &b));
        assert!(!point_in_box(50.0, 90.5, &b));
    }

    #[test]
    fn boxes_touching_at_edge_intersect() {
        let a = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let b = BoundingBox::new(100.0, 0.0, 100.0, 100.0);
        assert!(boxes_intersect(&a, &b));

        let far = BoundingBox::new(100.5, 0.0, 10.0, 10.0);
        assert!(!boxes_intersect(&a, &far));
    }

    #[test]
    fn move_box_translates_only() {
        let b = sample();
        let moved = move_box(&b, -10.0, 5.0);
        assert_eq!(moved, BoundingBox::new(90.0, 105.0, 200.0, 150.0));
        assert_eq!(b, sample());
    }

    #[test]
    fn resize_handle_detects_corners_and_edges() {
        let b = sample();
        assert_eq!(get_resize_handle(100.0, 100.0, &b, 8.0), Some(ResizeHandle::Nw));
        assert_eq!(get_resize_handle(300.0, 100.0, &b, 8.0), Some(ResizeHandle::Ne));
        assert_eq!(get_resize_handle(100.0, 250.0, &b, 8.0), Some(ResizeHandle::Sw));
        assert_eq!(get_resize_handle(303.0, 253.0, &b, 8.0), Some(ResizeHandle::Se));
        assert_eq!(get_resize_handle(200.0, 98.0, &b, 8.0), Some(ResizeHandle::N));
        assert_eq!(get_resize_handle(200.0, 250.0, &b, 8.0), Some(ResizeHandle::S));
        assert_eq!(get_resize_handle(100.0, 175.0, &b, 8.0), Some(ResizeHandle::W));
        assert_eq!(get_resize_handle(300.0, 175.0, &b, 8.0), Some(ResizeHandle::E));
    }

    #[test]
    fn resize_handle_none_in_interior_or_far_away() {
        let b = sample();
        assert_eq!(get_resize_handle(200.0, 175.0, &b, 8.0), None);
        assert_eq!(get_resize_handle(0.0, 0.0, &b, 8.0), None);
        assert_eq!(get_resize_handle(100.0, 96.0, &b, 8.0), Some(ResizeHandle::Nw));
        assert_eq!(get_resize_handle(100.0, 95.0, &b, 8.0), None);
    }

    #[test]
    fn resize_handle_corner_wins_on_tiny_box() {
        let tiny = BoundingBox::new(10.0, 10.0, 2.0, 2.0);
        assert_eq!(get_resize_handle(11.0, 11.0, &tiny, 8.0), Some(ResizeHandle::Nw));
    }

    #[test]
    fn apply_resize_follows_handle_table() {
        let b = sample();
        assert_eq!(
            apply_resize(&b, ResizeHandle::Nw, 10.0, 20.0),
            BoundingBox::new(110.0, 120.0, 190.0, 130.0)
        );
        assert_eq!(
            apply_resize(&b, ResizeHandle::Ne, 10.0, 20.0),
            BoundingBox::new(100.0, 120.0, 210.0, 130.0)
        );
        assert_eq!(
            apply_resize(&b, ResizeHandle::Sw, 10.0, 20.0),
            BoundingBox::new(110.0, 100.0, 190.0, 170.0)
        );
        assert_eq!(
            apply_resize(&b, ResizeHandle::Se, 10.0, 20.0),
            BoundingBox::new(100.0, 100.0, 210.0, 170.0)
        );
        assert_eq!(
            apply_resize(&b, ResizeHandle::N, 10.0, 20.0),
            BoundingBox::new(100.0, 120.0, 200.0, 130.0)
        );
        assert_eq!(
            apply_resize(&b, ResizeHandle::S, 10.0, 20.0),
            BoundingBox::new(100.0, 100.0, 200.0, 170.0)
        );
        assert_eq!(
            apply_resize(&b, ResizeHandle::E, 10.0, 20.0),
            BoundingBox::new(100.0, 100.0, 210.0, 150.0)
        );
        assert_eq!(
            apply_resize(&b, ResizeHandle::W, 10.0, 20.0),
            BoundingBox::new(110.0, 100.0, 190.0, 150.0)
        );
    }

    #[test]
    fn apply_resize_collapses_to_one_pixel_keeping_far_edge() {
        let b = sample();
        assert_eq!(
            apply_resize(&b, ResizeHandle::W, 300.0, 0.0),
            BoundingBox::new(299.0, 100.0, 1.0, 150.0)
        );
        assert_eq!(
            apply_resize(&b, ResizeHandle::S, 0.0, -400.0),
            BoundingBox::new(100.0, -151.0, 200.0, 1.0)
        );
    }

    #[test]
    fn handle_names_round_trip_through_serde() {
        for handle in ResizeHandle::ALL {
            let json = serde_json::to_string(&handle).expect("serialize");
            assert_eq!(json, format!("\"{}\"", handle.as_str()));
        }
        assert!(ResizeHandle::Se.is_corner());
        assert!(!ResizeHandle::E.is_corner());
    }
}
