//! Data model for the annotation engine.
//!
//! Everything here is plain data: ids, labels, annotations, images and the
//! project document. Behaviour lives in [`crate::geometry`], [`crate::yolo`]
//! and [`crate::store`].
//!
//! # Example
//!
//! ```
//! use labelkit::geometry::BoundingBox;
//! use labelkit::model::{Annotation, AnnotationType, Label};
//!
//! let label = Label::new("label-cat", "cat", "#ff0000", 0);
//! let ann = Annotation::new("a1", "img1", label.id.clone(), BoundingBox::new(0.0, 0.0, 10.0, 10.0));
//! assert_eq!(ann.effective_type(), AnnotationType::Box);
//! ```

mod annotation;
mod ids;
pub mod io_json;

pub use annotation::{
    Annotation, AnnotationCollection, AnnotationPatch, AnnotationType, ImageData, Label, Project,
};
pub use ids::{AnnotationId, ImageId, LabelId};
