#![allow(dead_code)]

use std::fs;
use std::path::Path;

use labelkit::geometry::{BoundingBox, PolygonPoint};
use labelkit::model::{Annotation, ImageData, ImageId, Label, Project};

pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    let row_stride = (width * 3).div_ceil(4) * 4;
    let pixel_array_size = row_stride * height;
    let file_size = 54 + pixel_array_size;

    let mut bytes = Vec::with_capacity(file_size as usize);
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&54u32.to_le_bytes());

    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&pixel_array_size.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());

    bytes.resize(file_size as usize, 0);
    bytes
}

pub fn write_bmp(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bmp_bytes(width, height)).expect("write bmp file");
}

pub fn labels() -> Vec<Label> {
    vec![
        Label::new("label-cat", "cat", "#ff0000", 0),
        Label::new("label-dog", "dog", "#00ff00", 1),
        Label::new("label-bird", "bird's nest", "#0000ff", 2),
    ]
}

/// Two sized images with a box, a polygon, an OBB and a classification,
/// plus an unsized third image with a single box.
pub fn sample_project() -> Project {
    let mut project = Project {
        images: vec![
            ImageData::new("img1", "street.jpg").with_size(800, 600),
            ImageData::new("img2", "park.v2.png").with_size(1920, 1080),
            ImageData::new("img3", "unsized.bmp"),
        ],
        labels: labels(),
        ..Default::default()
    };

    project.annotations.insert(
        ImageId::from("img1"),
        vec![
            Annotation::new_box("a1", "img1", "label-cat", BoundingBox::new(0.0, 0.0, 400.0, 300.0)),
            Annotation::new_polygon(
                "a2",
                "img1",
                "label-dog",
                vec![
                    PolygonPoint::new(100.0, 100.0),
                    PolygonPoint::new(300.0, 120.0),
                    PolygonPoint::new(200.0, 400.0),
                ],
            ),
            Annotation::new_classification("a3", "img1", "label-bird"),
        ],
    );
    project.annotations.insert(
        ImageId::from("img2"),
        vec![Annotation::new_obb(
            "b1",
            "img2",
            "label-bird",
            vec![
                PolygonPoint::new(960.0, 100.0),
                PolygonPoint::new(1200.0, 540.0),
                PolygonPoint::new(960.0, 980.0),
                PolygonPoint::new(720.0, 540.0),
            ],
        )],
    );
    project.annotations.insert(
        ImageId::from("img3"),
        vec![Annotation::new_box("c1", "img3", "label-cat", BoundingBox::new(8.0, 4.0, 16.0, 8.0))],
    );
    project
}
