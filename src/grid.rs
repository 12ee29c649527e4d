//! Background grid generation for the render pass.
//!
//! Produces screen-space line segments for an infinite grid that pans and
//! zooms with the view. Lines are suppressed when the effective spacing
//! drops below a legibility threshold.

use crate::view::{Point, Size};

/// Base grid spacing in screen pixels at zoom 1.
pub const GRID_SPACING: f32 = 24.0;

/// Below this effective spacing the grid is visual noise and is skipped.
const MIN_VISIBLE_SPACING: f32 = 4.0;

/// Screen-space grid segments for a surface of the given size.
///
/// `pan_x`/`pan_y` are the screen-space offset of the world origin
/// (i.e. `pan * zoom`); the grid wraps modulo the effective spacing so it
/// appears infinite.
pub fn grid_lines(
    surface: Size,
    zoom: f32,
    pan_x: f32,
    pan_y: f32,
    spacing: f32,
) -> Vec<(Point, Point)> {
    let effective_spacing = spacing * zoom;
    if effective_spacing < MIN_VISIBLE_SPACING {
        return Vec::new();
    }

    let offset_x = pan_x.rem_euclid(effective_spacing);
    let offset_y = pan_y.rem_euclid(effective_spacing);

    let mut lines = Vec::new();

    let mut x = offset_x;
    while x < surface.width + effective_spacing {
        lines.push((Point::new(x, 0.0), Point::new(x, surface.height)));
        x += effective_spacing;
    }

    let mut y = offset_y;
    while y < surface.height + effective_spacing {
        lines.push((Point::new(0.0, y), Point::new(surface.width, y)));
        y += effective_spacing;
    }

    lines
}
