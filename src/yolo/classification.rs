//! Whole-image classification lines: a bare class id per line.

use tracing::debug;

use super::{imported_id, numbered_lines, parse_class_id, tokens, ClassMap};
use crate::model::{Annotation, AnnotationType, ImageId, Label};

/// Writes one class id per `classification` annotation.
///
/// Spatial annotations and unknown labels are dropped.
pub fn to_yolo_classification_txt(annotations: &[Annotation], labels: &[Label]) -> String {
    let class_map = ClassMap::new(labels);
    annotations
        .iter()
        .filter(|ann| ann.effective_type() == AnnotationType::Classification)
        .filter_map(|ann| class_map.class_id(&ann.label_id))
        .map(|class_id| class_id.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses single-token lines into classification annotations with a zero box.
pub fn parse_yolo_classification_txt(
    txt: &str,
    labels: &[Label],
    image_id: &ImageId,
) -> Vec<Annotation> {
    let class_map = ClassMap::new(labels);
    let mut results = Vec::new();

    for (index, line) in numbered_lines(txt) {
        let parts = tokens(line);
        let [raw] = parts.as_slice() else {
            debug!(line = index, tokens = parts.len(), "skipping non-classification line");
            continue;
        };
        let Some(label_id) = parse_class_id(raw).and_then(|id| class_map.label_id(id)) else {
            debug!(line = index, "skipping unknown class id");
            continue;
        };
        results.push(Annotation::new_classification(
            imported_id("cls-", image_id, index),
            image_id.clone(),
            label_id.clone(),
        ));
    }

    results
}
