use labelkit::geometry::{
    apply_resize, clamp_box, get_resize_handle, normalize_box, simplify_polygon, BoundingBox,
    ResizeHandle, DEFAULT_HANDLE_SIZE,
};
use proptest::prelude::*;

mod proptest_helpers;

const EPS: f64 = 1e-6;

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn normalize_box_has_non_negative_size_and_contains_both_corners(
        x0 in proptest_helpers::arb_coord(),
        y0 in proptest_helpers::arb_coord(),
        x1 in proptest_helpers::arb_coord(),
        y1 in proptest_helpers::arb_coord(),
    ) {
        let bbox = normalize_box(x0, y0, x1, y1);
        prop_assert!(bbox.width >= 0.0 && bbox.height >= 0.0);
        for (px, py) in [(x0, y0), (x1, y1)] {
            prop_assert!(px >= bbox.x - EPS && px <= bbox.right() + EPS);
            prop_assert!(py >= bbox.y - EPS && py <= bbox.bottom() + EPS);
        }
    }

    #[test]
    fn clamp_box_stays_inside_the_image(
        bbox in proptest_helpers::arb_box(),
        (w, h) in proptest_helpers::arb_image_size(),
    ) {
        let clamped = clamp_box(&bbox, w, h);
        prop_assert!(clamped.x >= 0.0 && clamped.x <= w);
        prop_assert!(clamped.y >= 0.0 && clamped.y <= h);
        prop_assert!(clamped.right() <= w + EPS);
        prop_assert!(clamped.bottom() <= h + EPS);
    }

    #[test]
    fn apply_resize_never_collapses_below_one_pixel(
        bbox in proptest_helpers::arb_box(),
        handle in proptest::sample::select(ResizeHandle::ALL.to_vec()),
        dx in -3000.0f64..3000.0,
        dy in -3000.0f64..3000.0,
    ) {
        let resized = apply_resize(&bbox, handle, dx, dy);
        prop_assert!(resized.width >= 1.0, "width {}", resized.width);
        prop_assert!(resized.height >= 1.0, "height {}", resized.height);
    }

    #[test]
    fn points_near_a_corner_always_get_a_corner_handle(
        bbox in proptest_helpers::arb_box(),
        corner in 0usize..4,
        ox in -3.9f64..3.9,
        oy in -3.9f64..3.9,
    ) {
        let (cx, cy) = match corner {
            0 => (bbox.x, bbox.y),
            1 => (bbox.right(), bbox.y),
            2 => (bbox.x, bbox.bottom()),
            _ => (bbox.right(), bbox.bottom()),
        };
        let handle = get_resize_handle(cx + ox, cy + oy, &bbox, DEFAULT_HANDLE_SIZE);
        prop_assert!(handle.is_some_and(|h| h.is_corner()), "{:?}", handle);
    }

    #[test]
    fn interior_points_of_large_boxes_have_no_handle(
        x in -1000.0f64..1000.0,
        y in -1000.0f64..1000.0,
        fx in 0.1f64..0.9,
        fy in 0.1f64..0.9,
    ) {
        let bbox = BoundingBox::new(x, y, 200.0, 200.0);
        let handle = get_resize_handle(x + fx * 200.0, y + fy * 200.0, &bbox, DEFAULT_HANDLE_SIZE);
        prop_assert_eq!(handle, None);
    }

    #[test]
    fn simplify_with_zero_tolerance_keeps_non_collinear_points(
        points in proptest_helpers::arb_convex_polygon(3..24)
    ) {
        let simplified = simplify_polygon(&points, 0.0);
        prop_assert_eq!(simplified, points);
    }
}
