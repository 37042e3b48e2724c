//! YOLO text codec.
//!
//! Converts pixel-space annotations to and from the normalized, one-line-per-
//! object YOLO text formats:
//!
//! | format         | line                                   | tokens       |
//! |----------------|----------------------------------------|--------------|
//! | detection      | `class cx cy w h`                      | 5            |
//! | segmentation   | `class x1 y1 x2 y2 ... xn yn`          | odd, >= 7    |
//! | obb            | `class x1 y1 x2 y2 x3 y3 x4 y4`        | 9            |
//! | classification | `class`                                | 1            |
//!
//! Floats are always written with exactly six decimals. Writers and parsers
//! never fail: annotations whose label is unknown and lines that are
//! malformed or carry an unknown class id are skipped.
//!
//! Imported annotations get deterministic ids of the form
//! `imported-<scope><imageId>-<index>` where `<scope>` is empty for
//! detection, `seg-` for segmentation, `obb-` for OBB and `cls-` for
//! classification, and `<index>` counts non-blank lines only. Downstream
//! consumers deduplicate on these ids, so the text is part of the contract.

mod auto;
mod classification;
mod detection;
pub mod io;
mod polygon;

pub use auto::{detect_yolo_format, parse_yolo_auto_txt};
pub use classification::{parse_yolo_classification_txt, to_yolo_classification_txt};
pub use detection::{from_yolo_annotation, parse_yolo_txt, to_yolo_annotation, to_yolo_txt, YoloAnnotation};
pub use polygon::{
    from_yolo_obb, from_yolo_segmentation, parse_yolo_obb_txt, parse_yolo_segmentation_txt,
    to_yolo_obb, to_yolo_obb_txt, to_yolo_segmentation, to_yolo_segmentation_txt, DecodedPolygon,
    YoloObb, YoloSegmentation,
};

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::{NormalizedPoint, PolygonPoint};
use crate::model::{Annotation, AnnotationId, ImageId, Label, LabelId};

/// The spatial YOLO line formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YoloFormat {
    Detection,
    Segmentation,
    Obb,
}

impl YoloFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            YoloFormat::Detection => "detection",
            YoloFormat::Segmentation => "segmentation",
            YoloFormat::Obb => "obb",
        }
    }
}

impl fmt::Display for YoloFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for YoloFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "detection" => Ok(YoloFormat::Detection),
            "segmentation" | "seg" => Ok(YoloFormat::Segmentation),
            "obb" => Ok(YoloFormat::Obb),
            other => Err(format!(
                "'{other}' (supported: detection, segmentation, obb)"
            )),
        }
    }
}

/// Format selector for whole label files.
///
/// `Auto` writes each annotation in the format its type calls for and reads
/// each line in the format its token count suggests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelFormat {
    #[default]
    Auto,
    Detection,
    Segmentation,
    Obb,
    Classification,
}

impl LabelFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelFormat::Auto => "auto",
            LabelFormat::Detection => "detection",
            LabelFormat::Segmentation => "segmentation",
            LabelFormat::Obb => "obb",
            LabelFormat::Classification => "classification",
        }
    }

    /// Serializes one image's annotations.
    ///
    /// `Detection` shares the type-dispatching writer with `Auto`, so polygon
    /// and OBB annotations keep their shape.
    pub fn write_txt(
        self,
        annotations: &[Annotation],
        labels: &[Label],
        image_width: f64,
        image_height: f64,
    ) -> String {
        match self {
            LabelFormat::Auto | LabelFormat::Detection => {
                to_yolo_txt(annotations, labels, image_width, image_height)
            }
            LabelFormat::Segmentation => {
                to_yolo_segmentation_txt(annotations, labels, image_width, image_height)
            }
            LabelFormat::Obb => to_yolo_obb_txt(annotations, labels, image_width, image_height),
            LabelFormat::Classification => to_yolo_classification_txt(annotations, labels),
        }
    }

    /// Parses one image's label text.
    pub fn parse_txt(
        self,
        txt: &str,
        labels: &[Label],
        image_width: f64,
        image_height: f64,
        image_id: &ImageId,
    ) -> Vec<Annotation> {
        match self {
            LabelFormat::Auto => parse_yolo_auto_txt(txt, labels, image_width, image_height, image_id),
            LabelFormat::Detection => parse_yolo_txt(txt, labels, image_width, image_height, image_id),
            LabelFormat::Segmentation => {
                parse_yolo_segmentation_txt(txt, labels, image_width, image_height, image_id)
            }
            LabelFormat::Obb => parse_yolo_obb_txt(txt, labels, image_width, image_height, image_id),
            LabelFormat::Classification => parse_yolo_classification_txt(txt, labels, image_id),
        }
    }
}

impl fmt::Display for LabelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabelFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "auto" => Ok(LabelFormat::Auto),
            "classification" | "cls" => Ok(LabelFormat::Classification),
            other => other.parse::<YoloFormat>().map(LabelFormat::from).map_err(|_| {
                format!("'{other}' (supported: auto, detection, segmentation, obb, classification)")
            }),
        }
    }
}

impl From<YoloFormat> for LabelFormat {
    fn from(format: YoloFormat) -> Self {
        match format {
            YoloFormat::Detection => LabelFormat::Detection,
            YoloFormat::Segmentation => LabelFormat::Segmentation,
            YoloFormat::Obb => LabelFormat::Obb,
        }
    }
}

/// Label lookups in both directions.
///
/// When several labels share an id or a class id, the first one in the list
/// wins.
struct ClassMap<'a> {
    by_label: HashMap<&'a LabelId, u32>,
    by_class: HashMap<u32, &'a LabelId>,
}

impl<'a> ClassMap<'a> {
    fn new(labels: &'a [Label]) -> Self {
        let mut by_label = HashMap::with_capacity(labels.len());
        let mut by_class = HashMap::with_capacity(labels.len());
        for label in labels {
            by_label.entry(&label.id).or_insert(label.class_id);
            by_class.entry(label.class_id).or_insert(&label.id);
        }
        Self { by_label, by_class }
    }

    fn class_id(&self, label_id: &LabelId) -> Option<u32> {
        self.by_label.get(label_id).copied()
    }

    fn label_id(&self, class_id: u32) -> Option<&'a LabelId> {
        self.by_class.get(&class_id).copied()
    }
}

/// Non-blank lines, numbered in the order they appear.
fn numbered_lines<'a>(txt: &'a str) -> impl Iterator<Item = (usize, &'a str)> + 'a {
    txt.lines().filter(|line| !line.trim().is_empty()).enumerate()
}

fn tokens(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Reads the leading decimal digits of `raw`, so `1.0` and `2abc` give 1
/// and 2. A token without leading digits is rejected.
fn parse_class_id(raw: &str) -> Option<u32> {
    let unsigned = raw.strip_prefix('+').unwrap_or(raw);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    unsigned[..end].parse::<u32>().ok()
}

fn parse_f64(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok()
}

/// Parses `x y` pairs into pixel-space points.
fn parse_points(pairs: &[&str], image_width: f64, image_height: f64) -> Option<Vec<PolygonPoint>> {
    pairs
        .chunks_exact(2)
        .map(|pair| {
            let x = parse_f64(pair[0])?;
            let y = parse_f64(pair[1])?;
            Some(NormalizedPoint::new(x, y).to_pixel(image_width, image_height))
        })
        .collect()
}

/// Six-decimal fixed formatting used for every float in the text formats.
fn fmt_value(value: f64) -> String {
    // Adding zero turns -0.0 into 0.0 so it never prints as "-0.000000".
    format!("{:.6}", value + 0.0)
}

fn fmt_points(points: &[NormalizedPoint]) -> String {
    points
        .iter()
        .map(|p| format!("{} {}", fmt_value(p.x), fmt_value(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn imported_id(scope: &str, image_id: &ImageId, index: usize) -> AnnotationId {
    AnnotationId::new(format!("imported-{scope}{image_id}-{index}"))
}
