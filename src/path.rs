//! Cubic bezier construction for connection curves.
//!
//! Connections render as horizontal-biased cubics: the control points extend
//! horizontally from each anchor, proportionally to the horizontal distance
//! between the anchors, so curves leave ports flat and never kink. Anchors
//! closer than a small threshold degenerate to a straight segment.

use crate::view::Point;

/// Default minimum control-point offset, world units.
pub const BEZIER_MIN_OFFSET: f32 = 50.0;

/// Anchors closer than this (world units) get a straight segment instead of
/// a curve, avoiding zig-zags on near-zero spans.
const SHORT_SPAN_THRESHOLD: f32 = 10.0;

/// A cubic bezier in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl CubicBezier {
    /// Build the connection curve between two port anchors.
    ///
    /// Control offset is `max(|dx| * 0.5, min_offset)`, extending rightward
    /// from the start and leftward into the end. Degenerate (short) spans
    /// collapse the control points onto the endpoints.
    pub fn from_endpoints(start: Point, end: Point, min_offset: f32) -> Self {
        let d = end - start;
        if d.x * d.x + d.y * d.y < SHORT_SPAN_THRESHOLD * SHORT_SPAN_THRESHOLD {
            return CubicBezier {
                p0: start,
                p1: start,
                p2: end,
                p3: end,
            };
        }

        let offset = (d.x.abs() * 0.5).max(min_offset);
        CubicBezier {
            p0: start,
            p1: Point::new(start.x + offset, start.y),
            p2: Point::new(end.x - offset, end.y),
            p3: end,
        }
    }

    /// Evaluate the curve at parameter `t` in `[0, 1]`.
    pub fn eval(&self, t: f32) -> Point {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        Point::new(
            mt3 * self.p0.x + 3.0 * mt2 * t * self.p1.x + 3.0 * mt * t2 * self.p2.x + t3 * self.p3.x,
            mt3 * self.p0.y + 3.0 * mt2 * t * self.p1.y + 3.0 * mt * t2 * self.p2.y + t3 * self.p3.y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // CubicBezier::from_endpoints() — construction
    // ========================================================================

    #[test]
    fn test_from_endpoints_horizontal_control_points() {
        let bezier = CubicBezier::from_endpoints(
            Point::new(0.0, 50.0),
            Point::new(200.0, 150.0),
            BEZIER_MIN_OFFSET,
        );

        // Controls stay on their anchor's y and extend toward the middle.
        assert_eq!(bezier.p1.y, 50.0);
        assert_eq!(bezier.p2.y, 150.0);
        assert!(bezier.p1.x > bezier.p0.x);
        assert!(bezier.p2.x < bezier.p3.x);
        // |dx| = 200, so the offset is dx/2 = 100.
        assert_eq!(bezier.p1.x, 100.0);
        assert_eq!(bezier.p2.x, 100.0);
    }

    #[test]
    fn test_from_endpoints_min_offset_floor() {
        // |dx| = 40 → dx/2 = 20 is below the 50 floor.
        let bezier = CubicBezier::from_endpoints(
            Point::new(0.0, 0.0),
            Point::new(40.0, 200.0),
            BEZIER_MIN_OFFSET,
        );
        assert_eq!(bezier.p1.x, 50.0);
        assert_eq!(bezier.p2.x, -10.0);
    }

    #[test]
    fn test_from_endpoints_short_span_degenerates() {
        let bezier = CubicBezier::from_endpoints(
            Point::new(50.0, 50.0),
            Point::new(53.0, 51.0),
            BEZIER_MIN_OFFSET,
        );
        assert_eq!(bezier.p1, bezier.p0);
        assert_eq!(bezier.p2, bezier.p3);
    }

    #[test]
    fn test_from_endpoints_leftward_connection() {
        // Target left of source; controls still extend horizontally outward.
        let bezier = CubicBezier::from_endpoints(
            Point::new(200.0, 0.0),
            Point::new(0.0, 100.0),
            BEZIER_MIN_OFFSET,
        );
        assert_eq!(bezier.p1.x, 300.0);
        assert_eq!(bezier.p2.x, -100.0);
    }

    // ========================================================================
    // CubicBezier::eval() — endpoints and interior
    // ========================================================================

    #[test]
    fn test_eval_endpoints() {
        let bezier = CubicBezier::from_endpoints(
            Point::new(10.0, 20.0),
            Point::new(110.0, 80.0),
            BEZIER_MIN_OFFSET,
        );

        let start = bezier.eval(0.0);
        let end = bezier.eval(1.0);
        assert!((start.x - 10.0).abs() < 1e-3 && (start.y - 20.0).abs() < 1e-3);
        assert!((end.x - 110.0).abs() < 1e-3 && (end.y - 80.0).abs() < 1e-3);
    }

    #[test]
    fn test_eval_midpoint_of_symmetric_curve() {
        let bezier = CubicBezier::from_endpoints(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            BEZIER_MIN_OFFSET,
        );
        let mid = bezier.eval(0.5);
        assert!((mid.x - 50.0).abs() < 1e-3);
        assert!(mid.y.abs() < 1e-3);
    }

    #[test]
    fn test_eval_symmetry() {
        let bezier = CubicBezier::from_endpoints(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            BEZIER_MIN_OFFSET,
        );
        let left = bezier.eval(0.25);
        let right = bezier.eval(0.75);
        assert!((left.y - right.y).abs() < 1e-3);
        assert!((left.x + right.x - 100.0).abs() < 0.1);
    }
}
