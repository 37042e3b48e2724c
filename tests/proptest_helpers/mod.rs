#![allow(dead_code)]

use std::f64::consts::TAU;

use labelkit::geometry::{BoundingBox, PolygonPoint};
use labelkit::model::{Annotation, Label};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

/// Pixel tolerance for a text round trip: six decimals on the larger side.
pub fn eps_yolo(image_w: f64, image_h: f64) -> f64 {
    image_w.max(image_h) * 1e-6
}

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// `count` labels with distinct ids, `label-0` .. and class ids 0...
pub fn labels(count: usize) -> Vec<Label> {
    (0..count)
        .map(|i| Label::new(format!("label-{i}"), format!("class {i}"), "#000000", i as u32))
        .collect()
}

pub fn arb_coord() -> BoxedStrategy<f64> {
    (-5000.0f64..5000.0).boxed()
}

/// Image sizes in the range real exports see.
pub fn arb_image_size() -> BoxedStrategy<(f64, f64)> {
    (800u32..=4000, 600u32..=3000)
        .prop_map(|(w, h)| (w as f64, h as f64))
        .boxed()
}

/// A box with non-negative size, anywhere.
pub fn arb_box() -> BoxedStrategy<BoundingBox> {
    (arb_coord(), arb_coord(), 0.0f64..2000.0, 0.0f64..2000.0)
        .prop_map(|(x, y, w, h)| BoundingBox::new(x, y, w, h))
        .boxed()
}

/// A box of at least one pixel lying inside a `w x h` image.
pub fn arb_box_within(w: f64, h: f64) -> BoxedStrategy<BoundingBox> {
    (0.0f64..1.0, 0.0f64..1.0, 0.0f64..1.0, 0.0f64..1.0)
        .prop_map(move |(fx, fy, fw, fh)| {
            let x = fx * (w - 1.0);
            let y = fy * (h - 1.0);
            let width = 1.0 + fw * (w - x - 1.0);
            let height = 1.0 + fh * (h - y - 1.0);
            BoundingBox::new(x, y, width, height)
        })
        .boxed()
}

/// A vertex inside a `w x h` image.
pub fn arb_point_within(w: f64, h: f64) -> BoxedStrategy<PolygonPoint> {
    (0.0f64..=w, 0.0f64..=h)
        .prop_map(|(x, y)| PolygonPoint::new(x, y))
        .boxed()
}

/// `count` points around a circle, angles strictly increasing.
///
/// No three of them are collinear.
pub fn arb_convex_polygon(count: std::ops::Range<usize>) -> BoxedStrategy<Vec<PolygonPoint>> {
    (count, 50.0f64..500.0, -1000.0f64..1000.0, -1000.0f64..1000.0)
        .prop_flat_map(|(n, radius, cx, cy)| {
            proptest::collection::vec(0.1f64..0.9, n).prop_map(move |jitter| {
                let step = TAU / jitter.len() as f64;
                jitter
                    .iter()
                    .enumerate()
                    .map(|(i, j)| {
                        let angle = (i as f64 + j) * step;
                        PolygonPoint::new(cx + radius * angle.cos(), cy + radius * angle.sin())
                    })
                    .collect()
            })
        })
        .boxed()
}

/// Box annotations on `img1` spread over `label_count` labels.
pub fn arb_box_annotations(
    w: f64,
    h: f64,
    label_count: usize,
    max_annotations: usize,
) -> BoxedStrategy<Vec<Annotation>> {
    proptest::collection::vec((arb_box_within(w, h), 0..label_count), 0..=max_annotations)
        .prop_map(|items| {
            items
                .into_iter()
                .enumerate()
                .map(|(i, (bbox, label))| {
                    Annotation::new_box(format!("a{i}"), "img1", format!("label-{label}"), bbox)
                })
                .collect()
        })
        .boxed()
}
