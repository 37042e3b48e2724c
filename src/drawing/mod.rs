//! Drawing gestures as small state machines.
//!
//! The host forwards raw canvas positions; the drafts map them into image
//! pixels through a [`Viewport`] and hand back finished geometry ready for
//! [`crate::store::AnnotationStore::add_annotation`]. [`BoxEdit`] does the
//! same for moving and resizing a box that is already stored.

mod box_draft;
mod box_edit;
mod polygon_draft;
mod viewport;

pub use box_draft::{BoxDraft, MIN_BOX_SIZE};
pub use box_edit::{BoxEdit, EditKind};
pub use polygon_draft::{CompletedPolygon, PolygonDraft, CLOSE_THRESHOLD, MIN_POLYGON_POINTS};
pub use viewport::{Viewport, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
