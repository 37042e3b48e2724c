use crate::geometry::{apply_resize, get_resize_handle, move_box, BoundingBox, ResizeHandle, DEFAULT_HANDLE_SIZE};
use crate::model::{Annotation, AnnotationId, ImageId};

use super::Viewport;

/// What a press on an existing box grabbed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditKind {
    Move,
    Resize(ResizeHandle),
}

#[derive(Clone, Debug, PartialEq)]
struct ActiveEdit {
    annotation_id: AnnotationId,
    image_id: ImageId,
    kind: EditKind,
    start_x: f64,
    start_y: f64,
    original_box: BoundingBox,
}

/// Press-drag-release editing of a stored box.
///
/// Every drag step is measured from the press point and applied to the box
/// as it was at press time, so repeated steps never accumulate drift.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoxEdit {
    active: Option<ActiveEdit>,
}

impl BoxEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing(&self) -> bool {
        self.active.is_some()
    }

    pub fn kind(&self) -> Option<EditKind> {
        self.active.as_ref().map(|edit| edit.kind)
    }

    /// The annotation being edited and the image that holds it.
    pub fn target(&self) -> Option<(&AnnotationId, &ImageId)> {
        self.active
            .as_ref()
            .map(|edit| (&edit.annotation_id, &edit.image_id))
    }

    /// Grabs `annotation` at a canvas position. A press within the handle
    /// radius (constant on screen, so `DEFAULT_HANDLE_SIZE / zoom` in image
    /// pixels) resizes; anywhere else moves.
    pub fn press(&mut self, annotation: &Annotation, canvas_x: f64, canvas_y: f64, view: &Viewport) -> EditKind {
        let p = view.to_image(canvas_x, canvas_y);
        let handle_size = DEFAULT_HANDLE_SIZE / view.zoom;
        let kind = get_resize_handle(p.x, p.y, &annotation.bbox, handle_size)
            .map_or(EditKind::Move, EditKind::Resize);

        self.active = Some(ActiveEdit {
            annotation_id: annotation.id.clone(),
            image_id: annotation.image_id.clone(),
            kind,
            start_x: p.x,
            start_y: p.y,
            original_box: annotation.bbox,
        });
        kind
    }

    /// The edited box for the current pointer position.
    pub fn drag(&self, canvas_x: f64, canvas_y: f64, view: &Viewport) -> Option<BoundingBox> {
        let edit = self.active.as_ref()?;
        let p = view.to_image(canvas_x, canvas_y);
        let dx = p.x - edit.start_x;
        let dy = p.y - edit.start_y;

        Some(match edit.kind {
            EditKind::Move => move_box(&edit.original_box, dx, dy),
            EditKind::Resize(handle) => apply_resize(&edit.original_box, handle, dx, dy),
        })
    }

    /// Ends the gesture. Returns false if nothing was grabbed.
    pub fn release(&mut self) -> bool {
        self.active.take().is_some()
    }
}
