//! JSON serialization for project documents.
//!
//! A project bundles images, labels and the annotation collection in the
//! same shape the host widget uses, so a session can be saved from the UI
//! and fed straight to the CLI.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use super::annotation::Project;
use crate::error::LabelkitError;

/// Reads a project from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_project_json(path: &Path) -> Result<Project, LabelkitError> {
    let file = File::open(path).map_err(LabelkitError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| LabelkitError::ProjectJsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a project to a JSON file, pretty-printed.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_project_json(path: &Path, project: &Project) -> Result<(), LabelkitError> {
    let file = File::create(path).map_err(LabelkitError::Io)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, project).map_err(|source| {
        LabelkitError::ProjectJsonWrite {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Reads a project from a JSON string.
pub fn from_json_str(json: &str) -> Result<Project, serde_json::Error> {
    serde_json::from_str(json)
}

/// Writes a project to a pretty-printed JSON string.
pub fn to_json_string(project: &Project) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BoundingBox, PolygonPoint};
    use crate::model::{Annotation, ImageData, ImageId, Label};

    fn sample_project() -> Project {
        let mut project = Project {
            images: vec![
                ImageData::new("img1", "cat.jpg").with_size(800, 600),
                ImageData::new("img2", "dog.png").with_src("https://example.com/dog.png"),
            ],
            labels: vec![
                Label::new("label-cat", "cat", "#ff0000", 0),
                Label::new("label-dog", "dog", "#00ff00", 1),
            ],
            ..Default::default()
        };
        project.annotations.insert(
            ImageId::from("img1"),
            vec![
                Annotation::new_box(
                    "a1",
                    "img1",
                    "label-cat",
                    BoundingBox::new(0.0, 0.0, 400.0, 300.0),
                ),
                Annotation::new_polygon(
                    "a2",
                    "img1",
                    "label-dog",
                    vec![
                        PolygonPoint::new(1.0, 1.0),
                        PolygonPoint::new(5.0, 1.0),
                        PolygonPoint::new(3.0, 4.0),
                    ],
                ),
            ],
        );
        project
    }

    #[test]
    fn test_json_roundtrip() {
        let original = sample_project();

        let json = to_json_string(&original).expect("serialization failed");
        let restored = from_json_str(&json).expect("deserialization failed");

        assert_eq!(original, restored);
        assert!(json.contains(r#""src": "https://example.com/dog.png""#));
        assert!(!json.contains(r#""src": null"#));
    }

    #[test]
    fn test_json_accepts_natural_size_aliases() {
        let json = r#"{
            "images": [{"id": "img1", "name": "a.jpg", "naturalWidth": 640, "naturalHeight": 480}],
            "labels": []
        }"#;
        let project = from_json_str(json).expect("parse");
        assert_eq!(project.images[0].width, Some(640));
        assert_eq!(project.images[0].height, Some(480));
        assert!(project.annotations.is_empty());
    }

    #[test]
    fn test_json_file_roundtrip() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("project.json");

        write_project_json(&path, &sample_project()).expect("write project");
        let restored = read_project_json(&path).expect("read project");
        assert_eq!(restored, sample_project());
    }

    #[test]
    fn test_json_parse_error_carries_path() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("broken.json");
        std::fs::write(&path, "{ not json").expect("write broken file");

        let err = read_project_json(&path).unwrap_err();
        assert!(matches!(err, LabelkitError::ProjectJsonParse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
