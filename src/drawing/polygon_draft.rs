use crate::geometry::{polygon_bounds, BoundingBox, PolygonPoint};

use super::Viewport;

/// Screen-pixel radius around the first vertex that closes the polygon.
pub const CLOSE_THRESHOLD: f64 = 12.0;

/// Fewest vertices a committed polygon may have.
pub const MIN_POLYGON_POINTS: usize = 3;

/// A finished polygon and its bounding box.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletedPolygon {
    pub points: Vec<PolygonPoint>,
    pub bounds: BoundingBox,
}

/// Click-to-add polygon drawing.
///
/// Idle until the first click, then accumulating. A click near the first
/// vertex, a double-click or Enter commits once there are enough vertices;
/// Escape drops everything.
#[derive(Clone, Debug, PartialEq)]
pub struct PolygonDraft {
    image_width: f64,
    image_height: f64,
    points: Vec<PolygonPoint>,
    cursor: Option<PolygonPoint>,
}

impl PolygonDraft {
    pub fn new(image_width: f64, image_height: f64) -> Self {
        Self {
            image_width,
            image_height,
            points: Vec::new(),
            cursor: None,
        }
    }

    pub fn is_drawing(&self) -> bool {
        !self.points.is_empty()
    }

    pub fn points(&self) -> &[PolygonPoint] {
        &self.points
    }

    /// Last hovered position while drawing, for the rubber-band edge.
    pub fn cursor(&self) -> Option<&PolygonPoint> {
        self.cursor.as_ref()
    }

    fn image_point(&self, canvas_x: f64, canvas_y: f64, view: &Viewport) -> PolygonPoint {
        view.to_image_clamped(canvas_x, canvas_y, self.image_width, self.image_height)
    }

    /// Adds a vertex, or commits if the click lands near the first one.
    pub fn click(&mut self, canvas_x: f64, canvas_y: f64, view: &Viewport) -> Option<CompletedPolygon> {
        let point = self.image_point(canvas_x, canvas_y, view);

        let closes = self.points.len() >= MIN_POLYGON_POINTS
            && self
                .points
                .first()
                .is_some_and(|first| view.screen_distance(&point, first) < CLOSE_THRESHOLD);
        if closes {
            return self.finish();
        }

        self.points.push(point);
        None
    }

    pub fn hover(&mut self, canvas_x: f64, canvas_y: f64, view: &Viewport) {
        if self.is_drawing() {
            self.cursor = Some(self.image_point(canvas_x, canvas_y, view));
        }
    }

    /// Commits without adding the double-clicked position.
    pub fn double_click(&mut self) -> Option<CompletedPolygon> {
        if self.points.len() >= MIN_POLYGON_POINTS {
            self.finish()
        } else {
            None
        }
    }

    /// `Escape` cancels; `Enter` commits when there are enough vertices.
    pub fn key(&mut self, key: &str) -> Option<CompletedPolygon> {
        match key {
            "Escape" => {
                self.cancel();
                None
            }
            "Enter" => self.double_click(),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.points.clear();
        self.cursor = None;
    }

    fn finish(&mut self) -> Option<CompletedPolygon> {
        let points = std::mem::take(&mut self.points);
        self.cursor = None;
        if points.len() < MIN_POLYGON_POINTS {
            return None;
        }
        let bounds = polygon_bounds(&points);
        Some(CompletedPolygon { points, bounds })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(draft: &mut PolygonDraft, view: &Viewport) {
        assert!(draft.click(10.0, 10.0, view).is_none());
        assert!(draft.click(100.0, 10.0, view).is_none());
        assert!(draft.click(50.0, 80.0, view).is_none());
    }

    #[test]
    fn click_near_first_point_closes() {
        let view = Viewport::default();
        let mut draft = PolygonDraft::new(200.0, 200.0);
        triangle(&mut draft, &view);

        let done = draft.click(15.0, 14.0, &view).expect("closed");
        assert_eq!(done.points.len(), 3);
        assert_eq!(done.bounds, BoundingBox::new(10.0, 10.0, 90.0, 70.0));
        assert!(!draft.is_drawing());
    }

    #[test]
    fn close_threshold_is_measured_on_screen() {
        // At 4x zoom, 5 image pixels are 20 screen pixels: too far to close.
        let view = Viewport::new(4.0, 0.0, 0.0);
        let mut draft = PolygonDraft::new(200.0, 200.0);
        draft.click(40.0, 40.0, &view);
        draft.click(400.0, 40.0, &view);
        draft.click(200.0, 320.0, &view);

        assert!(draft.click(60.0, 40.0, &view).is_none());
        assert_eq!(draft.points().len(), 4);
    }

    #[test]
    fn near_first_point_with_two_vertices_adds_a_point() {
        let view = Viewport::default();
        let mut draft = PolygonDraft::new(200.0, 200.0);
        draft.click(10.0, 10.0, &view);
        draft.click(100.0, 10.0, &view);
        assert!(draft.click(11.0, 11.0, &view).is_none());
        assert_eq!(draft.points().len(), 3);
    }

    #[test]
    fn enter_and_double_click_need_three_points() {
        let view = Viewport::default();
        let mut draft = PolygonDraft::new(200.0, 200.0);
        draft.click(10.0, 10.0, &view);
        draft.click(100.0, 10.0, &view);
        assert!(draft.key("Enter").is_none());
        assert!(draft.double_click().is_none());
        assert!(draft.is_drawing());

        draft.click(50.0, 80.0, &view);
        assert!(draft.key("Enter").is_some());
        assert!(!draft.is_drawing());
    }

    #[test]
    fn escape_cancels() {
        let view = Viewport::default();
        let mut draft = PolygonDraft::new(200.0, 200.0);
        triangle(&mut draft, &view);
        draft.hover(60.0, 60.0, &view);
        assert!(draft.cursor().is_some());

        assert!(draft.key("Escape").is_none());
        assert!(!draft.is_drawing());
        assert!(draft.cursor().is_none());
    }

    #[test]
    fn points_are_clamped_into_the_image() {
        let view = Viewport::new(1.0, 50.0, 50.0);
        let mut draft = PolygonDraft::new(100.0, 100.0);
        draft.click(0.0, 500.0, &view);
        assert_eq!(draft.points()[0], PolygonPoint::new(0.0, 100.0));
    }

    #[test]
    fn unknown_image_width_keeps_clicking() {
        let mut draft = PolygonDraft::new(f64::NAN, 100.0);
        assert!(draft.click(5.0, 5.0, &Viewport::default()).is_none());
        assert_eq!(draft.points(), &[PolygonPoint::new(5.0, 5.0)]);
    }
}
