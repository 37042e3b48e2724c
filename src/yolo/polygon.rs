//! Segmentation and oriented-box lines.
//!
//! Both formats are a class id followed by normalized `x y` pairs; they
//! differ only in how many pairs a line may carry.

use tracing::debug;

use super::{fmt_points, imported_id, numbered_lines, parse_class_id, parse_points, tokens, ClassMap};
use crate::geometry::{polygon_bounds, BoundingBox, NormalizedPoint, PolygonPoint};
use crate::model::{Annotation, ImageId, Label, LabelId};

/// A segmentation row: class id plus any number of normalized vertices.
#[derive(Clone, Debug, PartialEq)]
pub struct YoloSegmentation {
    pub class_id: u32,
    pub points: Vec<NormalizedPoint>,
}

/// An oriented-box row: class id plus four ordered normalized corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YoloObb {
    pub class_id: u32,
    pub points: [NormalizedPoint; 4],
}

/// A polygon recovered from normalized form, with its cached bound.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedPolygon {
    pub class_id: u32,
    pub polygon: Vec<PolygonPoint>,
    pub bbox: BoundingBox,
}

impl DecodedPolygon {
    fn from_pixels(class_id: u32, polygon: Vec<PolygonPoint>) -> Self {
        let bbox = polygon_bounds(&polygon);
        Self {
            class_id,
            polygon,
            bbox,
        }
    }
}

fn normalize_all(points: &[PolygonPoint], image_width: f64, image_height: f64) -> Vec<NormalizedPoint> {
    points
        .iter()
        .map(|p| p.to_normalized(image_width, image_height))
        .collect()
}

pub fn to_yolo_segmentation(
    polygon: &[PolygonPoint],
    class_id: u32,
    image_width: f64,
    image_height: f64,
) -> YoloSegmentation {
    YoloSegmentation {
        class_id,
        points: normalize_all(polygon, image_width, image_height),
    }
}

pub fn from_yolo_segmentation(
    seg: &YoloSegmentation,
    image_width: f64,
    image_height: f64,
) -> DecodedPolygon {
    let polygon = seg
        .points
        .iter()
        .map(|p| p.to_pixel(image_width, image_height))
        .collect();
    DecodedPolygon::from_pixels(seg.class_id, polygon)
}

pub fn to_yolo_obb(
    points: &[PolygonPoint; 4],
    class_id: u32,
    image_width: f64,
    image_height: f64,
) -> YoloObb {
    YoloObb {
        class_id,
        points: points.map(|p| p.to_normalized(image_width, image_height)),
    }
}

pub fn from_yolo_obb(obb: &YoloObb, image_width: f64, image_height: f64) -> DecodedPolygon {
    let polygon = obb
        .points
        .iter()
        .map(|p| p.to_pixel(image_width, image_height))
        .collect();
    DecodedPolygon::from_pixels(obb.class_id, polygon)
}

pub(super) fn format_segmentation_line(
    class_id: u32,
    polygon: &[PolygonPoint],
    image_width: f64,
    image_height: f64,
) -> String {
    let seg = to_yolo_segmentation(polygon, class_id, image_width, image_height);
    format!("{} {}", seg.class_id, fmt_points(&seg.points))
}

/// Writes the first four vertices as an OBB line.
pub(super) fn format_obb_line(
    class_id: u32,
    polygon: &[PolygonPoint],
    image_width: f64,
    image_height: f64,
) -> String {
    let corners = &polygon[..polygon.len().min(4)];
    let points = normalize_all(corners, image_width, image_height);
    format!("{class_id} {}", fmt_points(&points))
}

fn write_lines<F>(annotations: &[Annotation], labels: &[Label], mut line_for: F) -> String
where
    F: FnMut(u32, &[PolygonPoint]) -> Option<String>,
{
    let class_map = ClassMap::new(labels);
    annotations
        .iter()
        .filter_map(|ann| {
            let class_id = class_map.class_id(&ann.label_id)?;
            line_for(class_id, ann.polygon_points())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes one segmentation line per annotation with at least three vertices.
///
/// The annotation type is not consulted; anything carrying a usable polygon
/// is written.
pub fn to_yolo_segmentation_txt(
    annotations: &[Annotation],
    labels: &[Label],
    image_width: f64,
    image_height: f64,
) -> String {
    write_lines(annotations, labels, |class_id, points| {
        (points.len() >= 3)
            .then(|| format_segmentation_line(class_id, points, image_width, image_height))
    })
}

/// Writes one OBB line per annotation with exactly four vertices.
pub fn to_yolo_obb_txt(
    annotations: &[Annotation],
    labels: &[Label],
    image_width: f64,
    image_height: f64,
) -> String {
    write_lines(annotations, labels, |class_id, points| {
        (points.len() == 4).then(|| format_obb_line(class_id, points, image_width, image_height))
    })
}

/// Reads `class x y ...` into a class id and pixel-space polygon.
pub(super) fn parse_polygon_tokens(
    parts: &[&str],
    image_width: f64,
    image_height: f64,
) -> Option<(u32, Vec<PolygonPoint>)> {
    let (class_id, coords) = parts.split_first()?;
    let class_id = parse_class_id(class_id)?;
    let points = parse_points(coords, image_width, image_height)?;
    Some((class_id, points))
}

/// Parses segmentation lines into polygon annotations.
///
/// A line needs an odd token count of at least seven (three vertices).
pub fn parse_yolo_segmentation_txt(
    txt: &str,
    labels: &[Label],
    image_width: f64,
    image_height: f64,
    image_id: &ImageId,
) -> Vec<Annotation> {
    parse_polygon_lines(
        txt,
        labels,
        (image_width, image_height),
        image_id,
        |count| count >= 7 && count % 2 == 1,
        |index, image, label, points| {
            Annotation::new_polygon(imported_id("seg-", image, index), image.clone(), label, points)
        },
    )
}

/// Parses OBB lines into oriented-box annotations.
///
/// A line needs exactly nine tokens (four corners).
pub fn parse_yolo_obb_txt(
    txt: &str,
    labels: &[Label],
    image_width: f64,
    image_height: f64,
    image_id: &ImageId,
) -> Vec<Annotation> {
    parse_polygon_lines(
        txt,
        labels,
        (image_width, image_height),
        image_id,
        |count| count == 9,
        |index, image, label, points| {
            Annotation::new_obb(imported_id("obb-", image, index), image.clone(), label, points)
        },
    )
}

fn parse_polygon_lines<A, B>(
    txt: &str,
    labels: &[Label],
    (image_width, image_height): (f64, f64),
    image_id: &ImageId,
    accepts: A,
    build: B,
) -> Vec<Annotation>
where
    A: Fn(usize) -> bool,
    B: Fn(usize, &ImageId, LabelId, Vec<PolygonPoint>) -> Annotation,
{
    let class_map = ClassMap::new(labels);
    let mut results = Vec::new();

    for (index, line) in numbered_lines(txt) {
        let parts = tokens(line);
        if !accepts(parts.len()) {
            debug!(line = index, tokens = parts.len(), "skipping line with wrong token count");
            continue;
        }
        let Some((class_id, points)) = parse_polygon_tokens(&parts, image_width, image_height) else {
            debug!(line = index, "skipping polygon line with invalid numbers");
            continue;
        };
        let Some(label_id) = class_map.label_id(class_id) else {
            debug!(line = index, class_id, "skipping unknown class id");
            continue;
        };
        results.push(build(index, image_id, label_id.clone(), points));
    }

    results
}
