//! Core annotation model shared by the store, the codec and the CLI.
//!
//! Field names serialize in camelCase so that the JSON matches what the host
//! widget already produces (`imageId`, `labelId`, `classId`, ...).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ids::{AnnotationId, ImageId, LabelId};
use crate::geometry::{polygon_bounds, BoundingBox, PolygonPoint};

/// Annotations keyed by image. Vector order is display order.
pub type AnnotationCollection = BTreeMap<ImageId, Vec<Annotation>>;

/// Which geometry an annotation carries and which codec path handles it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationType {
    /// Axis-aligned box; the default when `type` is absent.
    #[default]
    Box,
    /// Free-form segmentation polygon, three or more vertices.
    Polygon,
    /// Oriented bounding box, exactly four ordered vertices.
    Obb,
    /// Whole-image label with no spatial meaning.
    Classification,
}

impl AnnotationType {
    /// Lower-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationType::Box => "box",
            AnnotationType::Polygon => "polygon",
            AnnotationType::Obb => "obb",
            AnnotationType::Classification => "classification",
        }
    }
}

/// A label (class) that annotations reference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    /// Stable identity used for joins.
    pub id: LabelId,

    /// Display name.
    pub name: String,

    /// Display colour, usually a CSS hex string.
    pub color: String,

    /// Integer written to YOLO text files.
    pub class_id: u32,
}

impl Label {
    /// Creates a new label.
    pub fn new(
        id: impl Into<LabelId>,
        name: impl Into<String>,
        color: impl Into<String>,
        class_id: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            class_id,
        }
    }
}

/// A single annotation on one image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Unique identifier within the owning store.
    pub id: AnnotationId,

    /// Image this annotation belongs to.
    pub image_id: ImageId,

    /// Label (class) of this annotation.
    pub label_id: LabelId,

    /// Declared geometry kind. `None` is read as [`AnnotationType::Box`];
    /// use [`Annotation::effective_type`] rather than matching on this.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<AnnotationType>,

    /// Pixel-space box. For polygon and OBB annotations this is the cached
    /// bound of `polygon`, kept in sync by whoever edits the polygon.
    #[serde(rename = "box")]
    pub bbox: BoundingBox,

    /// Vertices for polygon and OBB annotations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Vec<PolygonPoint>>,
}

impl Annotation {
    /// Creates an annotation with no declared type (read as a box).
    pub fn new(
        id: impl Into<AnnotationId>,
        image_id: impl Into<ImageId>,
        label_id: impl Into<LabelId>,
        bbox: BoundingBox,
    ) -> Self {
        Self {
            id: id.into(),
            image_id: image_id.into(),
            label_id: label_id.into(),
            kind: None,
            bbox,
            polygon: None,
        }
    }

    /// Creates an explicit box annotation.
    pub fn new_box(
        id: impl Into<AnnotationId>,
        image_id: impl Into<ImageId>,
        label_id: impl Into<LabelId>,
        bbox: BoundingBox,
    ) -> Self {
        Self::new(id, image_id, label_id, bbox).with_type(AnnotationType::Box)
    }

    /// Creates a polygon annotation; the box is derived from the vertices.
    pub fn new_polygon(
        id: impl Into<AnnotationId>,
        image_id: impl Into<ImageId>,
        label_id: impl Into<LabelId>,
        points: Vec<PolygonPoint>,
    ) -> Self {
        Self::new(id, image_id, label_id, polygon_bounds(&points))
            .with_type(AnnotationType::Polygon)
            .with_polygon(points)
    }

    /// Creates an oriented-box annotation; the box is derived from the vertices.
    pub fn new_obb(
        id: impl Into<AnnotationId>,
        image_id: impl Into<ImageId>,
        label_id: impl Into<LabelId>,
        points: Vec<PolygonPoint>,
    ) -> Self {
        Self::new(id, image_id, label_id, polygon_bounds(&points))
            .with_type(AnnotationType::Obb)
            .with_polygon(points)
    }

    /// Creates a whole-image classification with a zero box.
    pub fn new_classification(
        id: impl Into<AnnotationId>,
        image_id: impl Into<ImageId>,
        label_id: impl Into<LabelId>,
    ) -> Self {
        Self::new(id, image_id, label_id, BoundingBox::default())
            .with_type(AnnotationType::Classification)
    }

    /// Sets the declared type.
    pub fn with_type(mut self, kind: AnnotationType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets the polygon without touching the box.
    pub fn with_polygon(mut self, points: Vec<PolygonPoint>) -> Self {
        self.polygon = Some(points);
        self
    }

    /// The declared type with the backward-compatible `box` default applied.
    ///
    /// Every codec and export path resolves the type through here.
    #[inline]
    pub fn effective_type(&self) -> AnnotationType {
        self.kind.unwrap_or_default()
    }

    /// Polygon vertices, or an empty slice when there are none.
    #[inline]
    pub fn polygon_points(&self) -> &[PolygonPoint] {
        self.polygon.as_deref().unwrap_or(&[])
    }
}

/// Partial update merged into an existing annotation.
///
/// `None` fields are left untouched. Callers that change `polygon` must also
/// supply the matching `bbox`; the store does not recompute it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_id: Option<LabelId>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<AnnotationType>,

    #[serde(rename = "box", default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Vec<PolygonPoint>>,
}

impl AnnotationPatch {
    pub fn label(label_id: impl Into<LabelId>) -> Self {
        Self {
            label_id: Some(label_id.into()),
            ..Default::default()
        }
    }

    pub fn bbox(bbox: BoundingBox) -> Self {
        Self {
            bbox: Some(bbox),
            ..Default::default()
        }
    }

    /// Replaces the polygon and its cached bound together.
    pub fn polygon(points: Vec<PolygonPoint>) -> Self {
        Self {
            bbox: Some(polygon_bounds(&points)),
            polygon: Some(points),
            ..Default::default()
        }
    }

    /// Merges the set fields into `annotation`.
    pub fn apply_to(&self, annotation: &mut Annotation) {
        if let Some(label_id) = &self.label_id {
            annotation.label_id = label_id.clone();
        }
        if let Some(kind) = self.kind {
            annotation.kind = Some(kind);
        }
        if let Some(bbox) = self.bbox {
            annotation.bbox = bbox;
        }
        if let Some(polygon) = &self.polygon {
            annotation.polygon = Some(polygon.clone());
        }
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.label_id.is_none() && self.kind.is_none() && self.bbox.is_none() && self.polygon.is_none()
    }
}

/// An image known to the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    pub id: ImageId,

    /// File name; its stem names the YOLO label file.
    pub name: String,

    /// Optional source path or URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,

    /// Natural width in pixels, if known.
    #[serde(default, alias = "naturalWidth", skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Natural height in pixels, if known.
    #[serde(default, alias = "naturalHeight", skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl ImageData {
    /// Creates an image with no known size.
    pub fn new(id: impl Into<ImageId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            src: None,
            width: None,
            height: None,
        }
    }

    /// Sets the natural size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Sets the source path or URL.
    pub fn with_src(mut self, src: impl Into<String>) -> Self {
        self.src = Some(src.into());
        self
    }

    /// Size used for normalization; unknown dimensions count as 1.
    pub fn export_size(&self) -> (f64, f64) {
        (
            self.width.unwrap_or(1) as f64,
            self.height.unwrap_or(1) as f64,
        )
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        std::path::Path::new(&self.name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(&self.name)
    }
}

/// A complete annotation session: images, labels and their annotations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub images: Vec<ImageData>,

    pub labels: Vec<Label>,

    #[serde(default)]
    pub annotations: AnnotationCollection,

    /// Quick-select label ids, at most nine.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub favorites: Vec<LabelId>,
}
