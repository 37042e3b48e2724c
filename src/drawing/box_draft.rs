use crate::geometry::{clamp_box, normalize_box, BoundingBox};

use super::Viewport;

/// Boxes must be strictly larger than this on both sides to be committed.
pub const MIN_BOX_SIZE: f64 = 2.0;

/// Press-drag-release box drawing.
///
/// The press point is kept unclamped; each drag normalizes the two corners
/// and clamps the result into the image.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxDraft {
    image_width: f64,
    image_height: f64,
    start: Option<(f64, f64)>,
    current: Option<BoundingBox>,
}

impl BoxDraft {
    pub fn new(image_width: f64, image_height: f64) -> Self {
        Self {
            image_width,
            image_height,
            start: None,
            current: None,
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.start.is_some()
    }

    /// The box as of the last drag, for live preview.
    pub fn current(&self) -> Option<&BoundingBox> {
        self.current.as_ref()
    }

    pub fn press(&mut self, canvas_x: f64, canvas_y: f64, view: &Viewport) {
        let p = view.to_image(canvas_x, canvas_y);
        self.start = Some((p.x, p.y));
        self.current = None;
    }

    pub fn drag(&mut self, canvas_x: f64, canvas_y: f64, view: &Viewport) -> Option<&BoundingBox> {
        let (start_x, start_y) = self.start?;
        let p = view.to_image(canvas_x, canvas_y);
        let bbox = normalize_box(start_x, start_y, p.x, p.y);
        self.current = Some(clamp_box(&bbox, self.image_width, self.image_height));
        self.current.as_ref()
    }

    /// Ends the gesture, returning the box if it is big enough to keep.
    pub fn release(&mut self) -> Option<BoundingBox> {
        self.start.take()?;
        self.current
            .take()
            .filter(|bbox| bbox.width > MIN_BOX_SIZE && bbox.height > MIN_BOX_SIZE)
    }
}
