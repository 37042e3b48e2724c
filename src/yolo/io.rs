//! YOLO label directories on disk.
//!
//! The writer lays out `labels/<stem>.txt` per exported image plus a
//! `data.yaml` with the class names. The reader walks a labels tree and
//! matches each file back to a project image by file stem.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::LabelFormat;
use crate::error::LabelkitError;
use crate::export::ExportEntry;
use crate::model::{AnnotationCollection, ImageData, Label, Project};

const LABEL_EXTENSION: &str = "txt";

/// Writes exported entries as a YOLO label directory.
///
/// Each entry becomes `labels/<stem>.txt` where `<stem>` is the image name
/// without its extension; non-empty text gets a trailing newline. `data.yaml`
/// maps class ids to label names. Image binaries are not copied.
pub fn write_label_dir(
    path: &Path,
    entries: &[ExportEntry],
    labels: &[Label],
) -> Result<(), LabelkitError> {
    let labels_dir = path.join("labels");
    fs::create_dir_all(&labels_dir).map_err(LabelkitError::Io)?;

    for entry in entries {
        let stem = file_stem(&entry.image_name);
        let label_path = labels_dir.join(format!("{stem}.{LABEL_EXTENSION}"));

        let mut contents = entry.yolo_txt.clone();
        if !contents.is_empty() {
            contents.push('\n');
        }
        fs::write(&label_path, contents).map_err(LabelkitError::Io)?;
        debug!(path = %label_path.display(), annotations = entry.annotations.len(), "wrote label file");
    }

    write_data_yaml(path, labels)?;
    info!(files = entries.len(), dir = %labels_dir.display(), "wrote YOLO labels");
    Ok(())
}

/// Reads a labels tree back into an annotation collection.
///
/// `path` may be the dataset root containing `labels/`, or the labels
/// directory itself. Each `*.txt` file is matched to the first project image
/// with the same stem and parsed with that image's size; unmatched files are
/// skipped with a warning and images without a file stay absent.
pub fn read_label_dir(
    path: &Path,
    project: &Project,
    format: LabelFormat,
) -> Result<AnnotationCollection, LabelkitError> {
    let labels_dir = resolve_labels_dir(path)?;

    let mut by_stem: BTreeMap<&str, &ImageData> = BTreeMap::new();
    for image in &project.images {
        by_stem.entry(image.stem()).or_insert(image);
    }

    let mut label_files = collect_label_files(&labels_dir)?;
    label_files.sort();

    let mut collection = AnnotationCollection::new();
    for label_path in label_files {
        let Some(image) = label_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| by_stem.get(stem))
        else {
            warn!(path = %label_path.display(), "no image matches label file");
            continue;
        };

        let txt = fs::read_to_string(&label_path).map_err(LabelkitError::Io)?;
        let (width, height) = image.export_size();
        let annotations = format.parse_txt(&txt, &project.labels, width, height, &image.id);
        debug!(image = %image.id, annotations = annotations.len(), "read label file");

        if !annotations.is_empty() {
            collection.entry(image.id.clone()).or_default().extend(annotations);
        }
    }

    Ok(collection)
}

fn resolve_labels_dir(path: &Path) -> Result<PathBuf, LabelkitError> {
    if !path.is_dir() {
        return Err(LabelkitError::LabelDirInvalid {
            path: path.to_path_buf(),
            message: "not a directory".to_string(),
        });
    }

    let nested = path.join("labels");
    if nested.is_dir() {
        Ok(nested)
    } else {
        Ok(path.to_path_buf())
    }
}

fn collect_label_files(root: &Path) -> Result<Vec<PathBuf>, LabelkitError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|source| LabelkitError::LabelDirInvalid {
            path: root.to_path_buf(),
            message: format!("failed while traversing directory: {source}"),
        })?;

        let is_label = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(LABEL_EXTENSION));
        if entry.file_type().is_file() && is_label {
            files.push(entry.path().to_path_buf());
        }
    }

    Ok(files)
}

fn write_data_yaml(output_root: &Path, labels: &[Label]) -> Result<(), LabelkitError> {
    let mut names: BTreeMap<u32, &str> = BTreeMap::new();
    for label in labels {
        names.entry(label.class_id).or_insert(&label.name);
    }

    let mut yaml = String::from("names:\n");
    for (class_id, name) in names {
        yaml.push_str(&format!("  {}: {}\n", class_id, yaml_single_quoted(name)));
    }

    let path = output_root.join("data.yaml");
    fs::write(&path, yaml).map_err(LabelkitError::Io)
}

fn yaml_single_quoted(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "''"))
}

fn file_stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(name)
}

/// Fuzz-only entrypoint for mixed-format line parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_auto(input: &str) {
    let labels = [Label::new("fuzz", "fuzz", "#000000", 0)];
    let image_id = crate::model::ImageId::from("fuzz");
    for line in input.lines() {
        let _ = super::detect_yolo_format(line);
    }
    let _ = super::parse_yolo_auto_txt(input, &labels, 640.0, 480.0, &image_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::export_all;
    use crate::geometry::BoundingBox;
    use crate::model::{Annotation, ImageId};

    fn project() -> Project {
        let mut project = Project {
            images: vec![
                ImageData::new("img1", "cat.jpg").with_size(800, 600),
                ImageData::new("img2", "dog.png").with_size(640, 480),
            ],
            labels: vec![
                Label::new("label-cat", "cat", "#ff0000", 0),
                Label::new("label-dog", "it's a dog", "#00ff00", 1),
            ],
            ..Default::default()
        };
        project.annotations.insert(
            ImageId::from("img1"),
            vec![Annotation::new_box(
                "a1",
                "img1",
                "label-cat",
                BoundingBox::new(0.0, 0.0, 400.0, 300.0),
            )],
        );
        project
    }

    #[test]
    fn write_label_dir_creates_files_and_data_yaml() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let project = project();
        let entries = export_all(
            &project.images,
            &project.annotations,
            &project.labels,
            LabelFormat::Auto,
        );

        write_label_dir(temp.path(), &entries, &project.labels).expect("write labels");

        let cat = fs::read_to_string(temp.path().join("labels/cat.txt")).expect("read cat.txt");
        assert_eq!(cat, "0 0.250000 0.250000 0.500000 0.500000\n");
        assert!(!temp.path().join("labels/dog.txt").exists());

        let data_yaml = fs::read_to_string(temp.path().join("data.yaml")).expect("read data.yaml");
        assert_eq!(data_yaml, "names:\n  0: 'cat'\n  1: 'it''s a dog'\n");
    }

    #[test]
    fn read_label_dir_matches_files_by_stem() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let labels_dir = temp.path().join("labels");
        fs::create_dir_all(labels_dir.join("nested")).expect("create labels dir");
        fs::write(labels_dir.join("cat.txt"), "0 0.25 0.25 0.5 0.5\n").expect("write cat");
        fs::write(labels_dir.join("nested/dog.txt"), "1 0.5 0.5 0.25 0.25\n").expect("write dog");
        fs::write(labels_dir.join("orphan.txt"), "0 0.5 0.5 0.1 0.1\n").expect("write orphan");
        fs::write(labels_dir.join("notes.md"), "ignored").expect("write notes");

        let collection = read_label_dir(temp.path(), &project(), LabelFormat::Auto).expect("read labels");

        assert_eq!(collection.len(), 2);
        let cat = &collection[&ImageId::from("img1")];
        assert_eq!(cat[0].id.as_str(), "imported-img1-0");
        assert!((cat[0].bbox.width - 400.0).abs() < 1e-9);
        let dog = &collection[&ImageId::from("img2")];
        assert_eq!(dog[0].label_id.as_str(), "label-dog");
        assert!((dog[0].bbox.x - 240.0).abs() < 1e-9);
    }

    #[test]
    fn read_label_dir_accepts_labels_dir_directly() {
        let temp = tempfile::tempdir().expect("create temp dir");
        fs::write(temp.path().join("cat.txt"), "0 0.5 0.5 0.5 0.5").expect("write cat");

        let collection = read_label_dir(temp.path(), &project(), LabelFormat::Detection).expect("read labels");
        assert_eq!(collection[&ImageId::from("img1")].len(), 1);
    }

    #[test]
    fn read_label_dir_rejects_missing_directory() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let err = read_label_dir(&temp.path().join("missing"), &project(), LabelFormat::Auto).unwrap_err();
        assert!(matches!(err, LabelkitError::LabelDirInvalid { .. }));
    }
}
