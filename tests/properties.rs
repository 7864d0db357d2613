//! Property tests for the rasterizer and console

use proptest::prelude::*;

use nimbus_display::core::{Framebuffer, Mode, Screen};
use nimbus_display::raster::{self, Point};

fn point() -> impl Strategy<Value = Point> {
    (-50i32..400, -50i32..300).prop_map(|(x, y)| Point::new(x, y))
}

proptest! {
    #[test]
    fn line_direction_does_not_matter(a in point(), b in point()) {
        let mut forward = Framebuffer::new(320, 250, 0);
        let mut backward = Framebuffer::new(320, 250, 0);
        raster::line(&mut forward, a, b, 1, true);
        raster::line(&mut backward, b, a, 1, true);
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn line_includes_visible_endpoints(a in point(), b in point()) {
        let mut fb = Framebuffer::new(320, 250, 0);
        raster::line(&mut fb, a, b, 1, true);
        for p in [a, b] {
            if let Some(v) = fb.get(p.x, p.y) {
                prop_assert_eq!(v, 1);
            }
        }
    }

    #[test]
    fn rectangle_fill_is_exact(
        x0 in 0i32..300, y0 in 0i32..230, w in 0i32..20, h in 0i32..20,
    ) {
        let (x1, y1) = (x0 + w, y0 + h);
        let mut fb = Framebuffer::new(320, 250, 0);
        let corners = [
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
            Point::new(x0, y0),
        ];
        raster::area(&mut fb, &corners, 2, true);
        let expected = if w == 0 || h == 0 { 0 } else { ((w + 1) * (h + 1)) as usize };
        prop_assert_eq!(fb.count(2), expected);
        if expected > 0 {
            prop_assert_eq!(fb.get(x0, y0), Some(2));
            prop_assert_eq!(fb.get(x1, y1), Some(2));
        }
    }

    #[test]
    fn area_never_panics(points in prop::collection::vec(point(), 0..12)) {
        let mut fb = Framebuffer::new(320, 250, 0);
        raster::area(&mut fb, &points, 1, false);
    }

    #[test]
    fn cursor_stays_on_grid(text in "[ -~\n]{0,3000}") {
        let mut screen = Screen::new(Mode::Low, 25);
        screen.print(&text);
        let (col, row) = screen.curpos();
        prop_assert!(col < 40);
        prop_assert!(row < 25);
    }
}
