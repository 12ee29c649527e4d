//! Camera state: pan offset and zoom factor, and the world/screen conversions
//! every other component composes with.
//!
//! World coordinates are the graph's own space; screen coordinates are pointer
//! and render space. The mapping is `screen = (world + pan) * zoom`, so pan is
//! a world-space offset applied before scaling.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A 2D point, in world or screen space depending on context.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A 2D extent (node body, render surface).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Lower bound of the zoom range.
pub const MIN_ZOOM: f32 = 0.1;
/// Upper bound of the zoom range.
pub const MAX_ZOOM: f32 = 3.0;

/// Pan/zoom camera over the patch.
///
/// Purely a camera: panning and zooming never consult graph content.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub pan: Point,
    zoom: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewTransform {
    /// Identity view: no pan, zoom 1.0.
    pub fn new() -> Self {
        Self {
            pan: Point::default(),
            zoom: 1.0,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom factor, clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Multiply the zoom factor (wheel steps), clamped like [`set_zoom`](Self::set_zoom).
    pub fn zoom_by(&mut self, factor: f32) {
        self.set_zoom(self.zoom * factor);
    }

    /// Translate the camera by a world-space delta.
    pub fn pan_by(&mut self, delta: Point) {
        self.pan = self.pan + delta;
    }

    /// Screen → world: `screen / zoom − pan`.
    pub fn to_world(&self, screen: Point) -> Point {
        Point::new(screen.x / self.zoom - self.pan.x, screen.y / self.zoom - self.pan.y)
    }

    /// World → screen: `(world + pan) * zoom`.
    pub fn to_screen(&self, world: Point) -> Point {
        Point::new(
            (world.x + self.pan.x) * self.zoom,
            (world.y + self.pan.y) * self.zoom,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    // ========================================================================
    // Zoom clamping
    // ========================================================================

    #[test]
    fn test_default_view_is_identity() {
        let view = ViewTransform::new();
        assert_eq!(view.zoom(), 1.0);
        assert_eq!(view.pan, Point::default());
        assert_eq!(view.to_screen(Point::new(10.0, 20.0)), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_set_zoom_clamps_low() {
        let mut view = ViewTransform::new();
        view.set_zoom(0.01);
        assert_eq!(view.zoom(), MIN_ZOOM);
    }

    #[test]
    fn test_set_zoom_clamps_high() {
        let mut view = ViewTransform::new();
        view.set_zoom(100.0);
        assert_eq!(view.zoom(), MAX_ZOOM);
    }

    #[test]
    fn test_zoom_by_accumulates_and_clamps() {
        let mut view = ViewTransform::new();
        view.zoom_by(1.1);
        assert!((view.zoom() - 1.1).abs() < 1e-6);
        for _ in 0..50 {
            view.zoom_by(1.1);
        }
        assert_eq!(view.zoom(), MAX_ZOOM);
        for _ in 0..100 {
            view.zoom_by(0.9);
        }
        assert_eq!(view.zoom(), MIN_ZOOM);
    }

    // ========================================================================
    // Coordinate conversions
    // ========================================================================

    #[test]
    fn test_to_screen_applies_pan_then_zoom() {
        let mut view = ViewTransform::new();
        view.pan = Point::new(10.0, -5.0);
        view.set_zoom(2.0);

        let screen = view.to_screen(Point::new(100.0, 50.0));
        assert_eq!(screen, Point::new(220.0, 90.0));
    }

    #[test]
    fn test_to_world_inverts_to_screen() {
        let mut view = ViewTransform::new();
        view.pan = Point::new(-33.0, 71.5);
        view.set_zoom(1.7);

        let points = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(-250.5, 42.0),
            Point::new(1e4, -1e4),
        ];
        for p in points {
            assert!(approx(view.to_world(view.to_screen(p)), p), "{p:?}");
        }
    }

    #[test]
    fn test_round_trip_at_zoom_extremes() {
        for zoom in [MIN_ZOOM, MAX_ZOOM] {
            let mut view = ViewTransform::new();
            view.pan = Point::new(12.0, 34.0);
            view.set_zoom(zoom);
            let p = Point::new(-77.0, 123.0);
            assert!(approx(view.to_world(view.to_screen(p)), p), "zoom {zoom}");
        }
    }

    #[test]
    fn test_pan_by_translates() {
        let mut view = ViewTransform::new();
        view.pan_by(Point::new(5.0, -3.0));
        view.pan_by(Point::new(5.0, -3.0));
        assert_eq!(view.pan, Point::new(10.0, -6.0));
    }

    #[test]
    fn test_pan_is_independent_of_zoom() {
        let mut view = ViewTransform::new();
        view.set_zoom(2.0);
        view.pan_by(Point::new(10.0, 0.0));
        // Pan is a world offset: the screen shifts by pan * zoom.
        assert_eq!(view.to_screen(Point::new(0.0, 0.0)), Point::new(20.0, 0.0));
    }
}
