//! Export assembly: turns the store's collection into per-image payloads.
//!
//! One [`ExportEntry`] is produced per image that has something to export.
//! Spatial formats skip classification annotations entirely; the
//! classification format keeps only them. Images whose size is unknown are
//! normalized against 1x1.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LabelkitError;
use crate::model::{Annotation, AnnotationCollection, AnnotationType, ImageData, ImageId, Label};
use crate::yolo::LabelFormat;

/// Serialized label text for one image, plus the annotations behind it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEntry {
    pub image_id: ImageId,
    pub image_name: String,
    pub yolo_txt: String,
    pub annotations: Vec<Annotation>,
    pub format: LabelFormat,
}

fn is_exportable(annotation: &Annotation, format: LabelFormat) -> bool {
    let is_classification = annotation.effective_type() == AnnotationType::Classification;
    match format {
        LabelFormat::Classification => is_classification,
        _ => !is_classification,
    }
}

/// Builds the entry for one image, or `None` if nothing in it is exportable.
pub fn export_image(
    image: &ImageData,
    annotations: &[Annotation],
    labels: &[Label],
    format: LabelFormat,
) -> Option<ExportEntry> {
    let annotations: Vec<Annotation> = annotations
        .iter()
        .filter(|ann| is_exportable(ann, format))
        .cloned()
        .collect();
    if annotations.is_empty() {
        return None;
    }

    let (width, height) = image.export_size();
    let yolo_txt = format.write_txt(&annotations, labels, width, height);

    Some(ExportEntry {
        image_id: image.id.clone(),
        image_name: image.name.clone(),
        yolo_txt,
        annotations,
        format,
    })
}

/// Builds entries for every image, in image order, omitting empty ones.
pub fn export_all(
    images: &[ImageData],
    collection: &AnnotationCollection,
    labels: &[Label],
    format: LabelFormat,
) -> Vec<ExportEntry> {
    images
        .iter()
        .filter_map(|image| {
            let annotations = collection.get(&image.id).map(Vec::as_slice).unwrap_or(&[]);
            let entry = export_image(image, annotations, labels, format);
            if entry.is_none() {
                debug!(image = %image.id, %format, "nothing to export");
            }
            entry
        })
        .collect()
}

/// Renders the export payload as pretty JSON.
pub fn to_json_string(entries: &[ExportEntry]) -> Result<String, LabelkitError> {
    serde_json::to_string_pretty(entries).map_err(LabelkitError::ExportJsonWrite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BoundingBox, PolygonPoint};

    fn labels() -> Vec<Label> {
        vec![
            Label::new("label-cat", "cat", "#ff0000", 0),
            Label::new("label-dog", "dog", "#00ff00", 1),
        ]
    }

    fn images() -> Vec<ImageData> {
        vec![
            ImageData::new("img1", "one.jpg").with_size(800, 600),
            ImageData::new("img2", "two.jpg").with_size(100, 100),
            ImageData::new("img3", "three.jpg"),
        ]
    }

    fn collection() -> AnnotationCollection {
        let mut collection = AnnotationCollection::new();
        collection.insert(
            ImageId::from("img1"),
            vec![
                Annotation::new("a1", "img1", "label-cat", BoundingBox::new(0.0, 0.0, 400.0, 300.0)),
                Annotation::new_classification("c1", "img1", "label-dog"),
            ],
        );
        collection.insert(
            ImageId::from("img2"),
            vec![Annotation::new_classification("c2", "img2", "label-cat")],
        );
        collection.insert(
            ImageId::from("img3"),
            vec![Annotation::new_polygon(
                "p1",
                "img3",
                "label-dog",
                vec![
                    PolygonPoint::new(0.0, 0.0),
                    PolygonPoint::new(1.0, 0.0),
                    PolygonPoint::new(1.0, 1.0),
                ],
            )],
        );
        collection
    }

    #[test]
    fn spatial_export_skips_classification_only_images() {
        let entries = export_all(&images(), &collection(), &labels(), LabelFormat::Auto);

        let ids: Vec<_> = entries.iter().map(|e| e.image_id.as_str()).collect();
        assert_eq!(ids, vec!["img1", "img3"]);
        assert_eq!(entries[0].yolo_txt, "0 0.250000 0.250000 0.500000 0.500000");
        assert_eq!(entries[0].annotations.len(), 1);
        assert_eq!(entries[0].image_name, "one.jpg");
    }

    #[test]
    fn unknown_size_normalizes_against_one() {
        let entries = export_all(&images(), &collection(), &labels(), LabelFormat::Auto);
        assert_eq!(
            entries[1].yolo_txt,
            "1 0.000000 0.000000 1.000000 0.000000 1.000000 1.000000"
        );
    }

    #[test]
    fn classification_export_keeps_only_classifications() {
        let entries = export_all(&images(), &collection(), &labels(), LabelFormat::Classification);
        let summary: Vec<_> = entries
            .iter()
            .map(|e| (e.image_id.as_str(), e.yolo_txt.as_str()))
            .collect();
        assert_eq!(summary, vec![("img1", "1"), ("img2", "0")]);
    }

    #[test]
    fn obb_export_can_yield_empty_text() {
        let entries = export_all(&images(), &collection(), &labels(), LabelFormat::Obb);
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.yolo_txt.is_empty()));
        assert!(entries.iter().all(|e| e.format == LabelFormat::Obb));
    }

    #[test]
    fn payload_json_uses_camel_case() {
        let entries = export_all(&images(), &collection(), &labels(), LabelFormat::Detection);
        let json = to_json_string(&entries).expect("serialize");
        assert!(json.contains("\"imageId\": \"img1\""));
        assert!(json.contains("\"yoloTxt\""));
        assert!(json.contains("\"format\": \"detection\""));
    }
}
