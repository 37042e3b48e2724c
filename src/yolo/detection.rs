//! Detection lines (`class cx cy w h`) and the type-dispatching writer.

use tracing::debug;

use super::polygon::{format_obb_line, format_segmentation_line};
use super::{fmt_value, imported_id, numbered_lines, parse_class_id, parse_f64, tokens, ClassMap};
use crate::geometry::BoundingBox;
use crate::model::{Annotation, AnnotationType, ImageId, Label};

/// A detection row in normalized, center-based form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YoloAnnotation {
    pub class_id: u32,
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Converts a pixel-space box to normalized center form.
pub fn to_yolo_annotation(
    bbox: &BoundingBox,
    class_id: u32,
    image_width: f64,
    image_height: f64,
) -> YoloAnnotation {
    YoloAnnotation {
        class_id,
        center_x: (bbox.x + bbox.width / 2.0) / image_width,
        center_y: (bbox.y + bbox.height / 2.0) / image_height,
        width: bbox.width / image_width,
        height: bbox.height / image_height,
    }
}

/// Recovers the pixel-space box (and class id) from normalized center form.
pub fn from_yolo_annotation(
    yolo: &YoloAnnotation,
    image_width: f64,
    image_height: f64,
) -> (BoundingBox, u32) {
    let w = yolo.width * image_width;
    let h = yolo.height * image_height;
    let bbox = BoundingBox {
        x: yolo.center_x * image_width - w / 2.0,
        y: yolo.center_y * image_height - h / 2.0,
        width: w,
        height: h,
    };
    (bbox, yolo.class_id)
}

pub(super) fn format_detection_line(yolo: &YoloAnnotation) -> String {
    format!(
        "{} {} {} {} {}",
        yolo.class_id,
        fmt_value(yolo.center_x),
        fmt_value(yolo.center_y),
        fmt_value(yolo.width),
        fmt_value(yolo.height)
    )
}

/// Writes one line per annotation, choosing the format from its type.
///
/// - `polygon` with vertices: segmentation line
/// - `obb` with exactly four vertices: OBB line
/// - anything else: detection line from `bbox`
///
/// Annotations whose label is not in `labels` are dropped. Lines are joined
/// with `\n` and there is no trailing newline; no annotations gives `""`.
pub fn to_yolo_txt(
    annotations: &[Annotation],
    labels: &[Label],
    image_width: f64,
    image_height: f64,
) -> String {
    let class_map = ClassMap::new(labels);

    annotations
        .iter()
        .filter_map(|ann| {
            let Some(class_id) = class_map.class_id(&ann.label_id) else {
                debug!(annotation = %ann.id, label = %ann.label_id, "dropping annotation with unknown label");
                return None;
            };

            let line = match (ann.effective_type(), ann.polygon.as_deref()) {
                (AnnotationType::Polygon, Some(points)) => {
                    format_segmentation_line(class_id, points, image_width, image_height)
                }
                (AnnotationType::Obb, Some(points)) if points.len() == 4 => {
                    format_obb_line(class_id, points, image_width, image_height)
                }
                _ => format_detection_line(&to_yolo_annotation(
                    &ann.bbox,
                    class_id,
                    image_width,
                    image_height,
                )),
            };
            Some(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses detection lines into box annotations.
///
/// Lines need at least five tokens; anything after the fifth is ignored.
/// Blank lines, short lines, unparsable numbers and unknown class ids are
/// skipped.
pub fn parse_yolo_txt(
    txt: &str,
    labels: &[Label],
    image_width: f64,
    image_height: f64,
    image_id: &ImageId,
) -> Vec<Annotation> {
    let class_map = ClassMap::new(labels);
    let mut results = Vec::new();

    for (index, line) in numbered_lines(txt) {
        let parts = tokens(line);
        if parts.len() < 5 {
            debug!(line = index, tokens = parts.len(), "skipping short detection line");
            continue;
        }
        let Some(yolo) = parse_detection_tokens(&parts[..5]) else {
            debug!(line = index, "skipping detection line with invalid numbers");
            continue;
        };
        let Some(label_id) = class_map.label_id(yolo.class_id) else {
            debug!(line = index, class_id = yolo.class_id, "skipping unknown class id");
            continue;
        };

        let (bbox, _) = from_yolo_annotation(&yolo, image_width, image_height);
        results.push(Annotation::new_box(
            imported_id("", image_id, index),
            image_id.clone(),
            label_id.clone(),
            bbox,
        ));
    }

    results
}

/// Reads exactly `class cx cy w h`.
pub(super) fn parse_detection_tokens(parts: &[&str]) -> Option<YoloAnnotation> {
    let [class_id, cx, cy, w, h] = parts else {
        return None;
    };
    Some(YoloAnnotation {
        class_id: parse_class_id(class_id)?,
        center_x: parse_f64(cx)?,
        center_y: parse_f64(cy)?,
        width: parse_f64(w)?,
        height: parse_f64(h)?,
    })
}
