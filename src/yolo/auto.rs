//! Per-line format detection for mixed label files.

use tracing::debug;

use super::detection::{from_yolo_annotation, parse_detection_tokens};
use super::polygon::parse_polygon_tokens;
use super::{imported_id, numbered_lines, tokens, ClassMap, YoloFormat};
use crate::model::{Annotation, ImageId, Label};

/// Guesses a line's format from its token count alone.
///
/// - 5 tokens: detection
/// - 9 tokens: OBB
/// - an odd count above 9: segmentation
///
/// Anything else, including a 7-token triangle, is `None`. A four-vertex
/// segmentation polygon is indistinguishable from an OBB and reads as one.
pub fn detect_yolo_format(line: &str) -> Option<YoloFormat> {
    match tokens(line).len() {
        5 => Some(YoloFormat::Detection),
        9 => Some(YoloFormat::Obb),
        count if count > 9 && count % 2 == 1 => Some(YoloFormat::Segmentation),
        _ => None,
    }
}

/// Parses text whose lines may mix detection, segmentation and OBB rows.
///
/// Ids follow the scheme of the format each line was detected as, with the
/// index counting every non-blank line of the input.
pub fn parse_yolo_auto_txt(
    txt: &str,
    labels: &[Label],
    image_width: f64,
    image_height: f64,
    image_id: &ImageId,
) -> Vec<Annotation> {
    let class_map = ClassMap::new(labels);
    let mut results = Vec::new();

    for (index, line) in numbered_lines(txt) {
        let Some(format) = detect_yolo_format(line) else {
            debug!(line = index, "skipping line of unknown format");
            continue;
        };
        let parts = tokens(line);

        let annotation = match format {
            YoloFormat::Detection => parse_detection_tokens(&parts).and_then(|yolo| {
                let label_id = class_map.label_id(yolo.class_id)?;
                let (bbox, _) = from_yolo_annotation(&yolo, image_width, image_height);
                Some(Annotation::new_box(
                    imported_id("", image_id, index),
                    image_id.clone(),
                    label_id.clone(),
                    bbox,
                ))
            }),
            YoloFormat::Obb | YoloFormat::Segmentation => {
                parse_polygon_tokens(&parts, image_width, image_height).and_then(|(class_id, points)| {
                    let label_id = class_map.label_id(class_id)?.clone();
                    Some(if format == YoloFormat::Obb {
                        Annotation::new_obb(imported_id("obb-", image_id, index), image_id.clone(), label_id, points)
                    } else {
                        Annotation::new_polygon(imported_id("seg-", image_id, index), image_id.clone(), label_id, points)
                    })
                })
            }
        };

        match annotation {
            Some(annotation) => results.push(annotation),
            None => debug!(line = index, %format, "skipping line with unknown class or invalid numbers"),
        }
    }

    results
}
