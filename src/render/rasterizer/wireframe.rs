//! Triangle outlines drawn with Bresenham lines.

use super::Rasterizer;
use crate::math::Color3;
use crate::render::framebuffer::FrameBuffer;
use crate::renderlist::Triangle;

/// Draws the three edges in the material color. No depth test: the last
/// write along an edge wins.
#[derive(Debug, Default, Clone, Copy)]
pub struct WireframeRasterizer;

impl WireframeRasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Draws a line between two screen-space points using Bresenham's line
    /// algorithm.
    ///
    /// The segment is first clipped to the framebuffer bounds, so the cost is
    /// bounded by the visible length whatever the endpoints. The clipped
    /// endpoints are rounded to pixel centers.
    ///
    /// The algorithm tracks an integer "error" term, the distance between the
    /// ideal line and the current pixel. For each step along the major axis it
    /// decides from the accumulated error whether to also step along the minor
    /// axis, so a step is either straight or diagonal.
    pub fn draw_line(
        fb: &mut FrameBuffer,
        from: (f32, f32),
        to: (f32, f32),
        color: Color3,
        alpha: u8,
    ) {
        let Some(((x0, y0), (x1, y1))) = clip_segment(fb.bounds(), from, to) else {
            return;
        };
        let (x0, y0) = (x0.round() as i64, y0.round() as i64);
        let (x1, y1) = (x1.round() as i64, y1.round() as i64);

        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();

        // +1 or -1 so the same loop handles lines in any direction
        let x_incr_direction = if x0 < x1 { 1 } else { -1 };
        let y_incr_direction = if y0 < y1 { 1 } else { -1 };

        // positive error favors x movement, negative favors y
        let mut err = dx - dy;

        let mut x = x0;
        let mut y = y0;

        loop {
            fb.wpixel(x as i32, y as i32, color, None, alpha);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;

            if e2 > -dy {
                err -= dy;
                x += x_incr_direction;
            }

            // both conditions may hold, giving a diagonal step
            if e2 < dx {
                err += dx;
                y += y_incr_direction;
            }
        }
    }
}

/// Liang-Barsky clip of a segment against the pixel centers of the half-open
/// `bounds`. Returns `None` when nothing of the segment is inside or an
/// endpoint is not finite. Computed in `f64`; screen coordinates of far-off
/// vertices exceed the precision of `f32` at pixel scale.
fn clip_segment(
    (bx0, by0, bx1, by1): (i32, i32, i32, i32),
    (x0, y0): (f32, f32),
    (x1, y1): (f32, f32),
) -> Option<((f64, f64), (f64, f64))> {
    if ![x0, y0, x1, y1].iter().all(|c| c.is_finite()) {
        return None;
    }
    let (xmin, ymin) = (bx0 as f64, by0 as f64);
    let (xmax, ymax) = ((bx1 - 1) as f64, (by1 - 1) as f64);
    let (x0, y0, x1, y1) = (x0 as f64, y0 as f64, x1 as f64, y1 as f64);
    let (dx, dy) = (x1 - x0, y1 - y0);

    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in [(-dx, x0 - xmin), (dx, xmax - x0), (-dy, y0 - ymin), (dy, ymax - y0)] {
        if p == 0.0 {
            // parallel to this edge
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let at = |t: f64| {
        (
            (x0 + t * dx).clamp(xmin, xmax),
            (y0 + t * dy).clamp(ymin, ymax),
        )
    };
    Some((at(t0), at(t1)))
}

impl Rasterizer for WireframeRasterizer {
    fn draw_triangle(&self, triangle: &Triangle, fb: &mut FrameBuffer) {
        let color = triangle
            .material
            .as_ref()
            .map_or(Color3::WHITE, |m| m.color);
        let alpha = triangle.alpha();
        let [a, b, c] = triangle.positions().map(|p| (p.x, p.y));

        // a segment [a, b, b] only needs one line
        Self::draw_line(fb, a, b, color, alpha);
        if b != c {
            Self::draw_line(fb, b, c, color, alpha);
            Self::draw_line(fb, c, a, color, alpha);
        }
    }
}
