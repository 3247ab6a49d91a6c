//! Shared scanline walker for the filled rasterizers.
//!
//! # Algorithm Overview
//!
//! 1. **Sort vertices** by Y (top to bottom in screen space)
//! 2. **Pick sides once**: compare the long edge `v0 → v2` with the middle
//!    vertex at the middle scanline. This decides left/right for both halves.
//! 3. **Walk each half** (`v0 → v1`, then `v1 → v2`) one scanline at a time,
//!    evaluating both edges and filling the span between them.
//!
//! ```text
//!        v0
//!        /\
//!       /  \          upper half: long edge v0→v2 vs short edge v0→v1
//!      /----\ v1 <- split at v1.y
//!     /    /
//!    /   /            lower half: long edge v0→v2 vs short edge v1→v2
//!   /  /
//!   v2
//! ```
//!
//! # Perspective-Correct Attributes
//!
//! Screen-space z holds `1/z`. Callers pass each attribute premultiplied by
//! `1/z`; the walker interpolates those and `1/z` linearly in screen space and
//! hands both to the plot callback, which recovers `attr = (attr/z) / (1/z)`.
//!
//! # Coverage
//!
//! Pixels are sampled at integer coordinates. Both axes use half-open ranges
//! `[ceil(start), ceil(end))`, clamped to the framebuffer bounds, and edge and
//! span values are evaluated exactly at the first sampled pixel (prestep), so
//! triangles sharing an edge never overlap or leave gaps.

use crate::math::EPSILON;

/// A screen-space corner: position, `1/z` and `N` attributes premultiplied by `1/z`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScanVertex<const N: usize> {
    pub x: f32,
    pub y: f32,
    pub inv_z: f32,
    pub attrs: [f32; N],
}

impl<const N: usize> ScanVertex<N> {
    /// Builds a corner from raw attributes, dividing them by z.
    pub fn new(x: f32, y: f32, inv_z: f32, raw: [f32; N]) -> Self {
        Self {
            x,
            y,
            inv_z,
            attrs: raw.map(|a| a * inv_z),
        }
    }
}

/// Interpolated values at one point: x, `1/z` and the attributes.
#[derive(Debug, Clone, Copy)]
struct Sample<const N: usize> {
    x: f32,
    inv_z: f32,
    attrs: [f32; N],
}

impl<const N: usize> Sample<N> {
    fn lerp_step(from: &Self, to: &Self, extent: f32) -> Self {
        Self {
            x: (to.x - from.x) / extent,
            inv_z: (to.inv_z - from.inv_z) / extent,
            attrs: std::array::from_fn(|i| (to.attrs[i] - from.attrs[i]) / extent),
        }
    }

    fn advanced(&self, step: &Self, t: f32) -> Self {
        Self {
            x: self.x + step.x * t,
            inv_z: self.inv_z + step.inv_z * t,
            attrs: std::array::from_fn(|i| self.attrs[i] + step.attrs[i] * t),
        }
    }

    #[inline]
    fn add(&mut self, step: &Self) {
        self.inv_z += step.inv_z;
        for (a, s) in self.attrs.iter_mut().zip(step.attrs.iter()) {
            *a += s;
        }
    }
}

/// An edge from `top` to `bottom`, stepped per unit of y.
struct Edge<const N: usize> {
    top_y: f32,
    start: Sample<N>,
    step: Sample<N>,
}

impl<const N: usize> Edge<N> {
    fn new(top: &ScanVertex<N>, bottom: &ScanVertex<N>) -> Self {
        let start = Sample {
            x: top.x,
            inv_z: top.inv_z,
            attrs: top.attrs,
        };
        let end = Sample {
            x: bottom.x,
            inv_z: bottom.inv_z,
            attrs: bottom.attrs,
        };
        Self {
            top_y: top.y,
            step: Sample::lerp_step(&start, &end, bottom.y - top.y),
            start,
        }
    }

    #[inline]
    fn at(&self, y: f32) -> Sample<N> {
        self.start.advanced(&self.step, y - self.top_y)
    }
}

/// Half-open clip rectangle `(x0, y0, x1, y1)` in screen coordinates.
pub(crate) type ClipRect = (i32, i32, i32, i32);

/// Rasterizes one triangle, calling `plot(x, y, inv_z, attrs_over_z)` for every
/// covered pixel inside `clip`.
///
/// Triangles with (near) zero height or area produce nothing, as do halves
/// and spans with (near) zero extent.
pub(crate) fn walk<const N: usize, F>(vertices: [ScanVertex<N>; 3], clip: ClipRect, mut plot: F)
where
    F: FnMut(i32, i32, f32, &[f32; N]),
{
    let [mut v0, mut v1, mut v2] = vertices;
    if vertices.iter().any(|v| !(v.x.is_finite() && v.y.is_finite() && v.inv_z.is_finite())) {
        return;
    }

    // Three comparisons suffice for 3 elements
    if v1.y < v0.y {
        std::mem::swap(&mut v0, &mut v1);
    }
    if v2.y < v1.y {
        std::mem::swap(&mut v1, &mut v2);
    }
    if v1.y < v0.y {
        std::mem::swap(&mut v0, &mut v1);
    }

    let height = v2.y - v0.y;
    if height < EPSILON {
        return;
    }

    let long = Edge::new(&v0, &v2);
    let split = long.at(v1.y);
    if (split.x - v1.x).abs() < EPSILON {
        return; // collinear
    }
    let long_is_left = split.x < v1.x;

    let (clip_x0, clip_y0, clip_x1, clip_y1) = clip;

    for (top, bottom) in [(&v0, &v1), (&v1, &v2)] {
        if bottom.y - top.y < EPSILON {
            continue;
        }
        let short = Edge::new(top, bottom);

        let y_start = (top.y.ceil() as i32).max(clip_y0);
        let y_end = (bottom.y.ceil() as i32).min(clip_y1);

        for y in y_start..y_end {
            let yf = y as f32;
            let (a, b) = (long.at(yf), short.at(yf));
            let (left, right) = if long_is_left { (a, b) } else { (b, a) };

            let span = right.x - left.x;
            if span < EPSILON {
                continue;
            }
            let dx = Sample::lerp_step(&left, &right, span);

            let x_start = (left.x.ceil() as i32).max(clip_x0);
            let x_end = (right.x.ceil() as i32).min(clip_x1);
            if x_start >= x_end {
                continue;
            }

            let mut p = left.advanced(&dx, x_start as f32 - left.x);
            for x in x_start..x_end {
                plot(x, y, p.inv_z, &p.attrs);
                p.add(&dx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIP: ClipRect = (0, 0, 100, 100);

    fn corner(x: f32, y: f32) -> ScanVertex<0> {
        ScanVertex::new(x, y, 1.0, [])
    }

    fn covered(vertices: [ScanVertex<0>; 3], clip: ClipRect) -> Vec<(i32, i32)> {
        let mut pixels = Vec::new();
        walk(vertices, clip, |x, y, _, _| pixels.push((x, y)));
        pixels
    }

    #[test]
    fn right_triangle_coverage() {
        // legs of 4 pixels along x and y from (0, 0)
        let px = covered([corner(0.0, 0.0), corner(4.0, 0.0), corner(0.0, 4.0)], CLIP);
        // rows 0..4 with spans [0, 4 - y)
        assert_eq!(px.len(), 4 + 3 + 2 + 1);
        assert!(px.contains(&(3, 0)));
        assert!(!px.contains(&(4, 0)));
        assert!(!px.contains(&(0, 4)));
    }

    #[test]
    fn vertex_order_does_not_matter() {
        let a = [corner(10.0, 10.0), corner(50.0, 10.0), corner(30.0, 40.0)];
        let mut reference = covered(a, CLIP);
        reference.sort();
        for perm in [[0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]] {
            let mut px = covered(perm.map(|i| a[i]), CLIP);
            px.sort();
            assert_eq!(px, reference);
        }
    }

    #[test]
    fn shared_edge_has_no_overlap_or_gap() {
        let (a, b, c, d) = (
            corner(2.3, 1.7),
            corner(30.9, 4.2),
            corner(27.1, 33.8),
            corner(1.1, 25.5),
        );
        let mut first = covered([a, b, c], CLIP);
        let second = covered([a, c, d], CLIP);
        let both = first.len() + second.len();
        first.extend(second);
        first.sort();
        first.dedup();
        assert_eq!(first.len(), both);
    }

    #[test]
    fn degenerate_triangles_draw_nothing() {
        assert!(covered([corner(0.0, 5.0), corner(10.0, 5.0), corner(20.0, 5.0)], CLIP).is_empty());
        assert!(covered([corner(0.0, 0.0), corner(5.0, 5.0), corner(10.0, 10.0)], CLIP).is_empty());
        let degenerate = [corner(f32::NAN, 0.0), corner(5.0, 5.0), corner(0.0, 10.0)];
        assert!(covered(degenerate, CLIP).is_empty());
    }

    #[test]
    fn coverage_is_clamped_to_clip_rect() {
        let huge = [corner(-50.0, -50.0), corner(150.0, -50.0), corner(-50.0, 150.0)];
        let px = covered(huge, (0, 0, 10, 10));
        assert_eq!(px.len(), 100);
        assert!(px.iter().all(|&(x, y)| (0..10).contains(&x) && (0..10).contains(&y)));
    }

    #[test]
    fn interpolates_premultiplied_attributes() {
        let v = [
            ScanVertex::new(0.0, 0.0, 0.5, [10.0]),
            ScanVertex::new(20.0, 0.0, 0.25, [30.0]),
            ScanVertex::new(0.0, 20.0, 1.0, [50.0]),
        ];
        walk(v, CLIP, |_, _, inv_z, attrs| {
            let value = attrs[0] / inv_z;
            assert!((10.0 - 1e-3..=50.0 + 1e-3).contains(&value));
        });
    }
}
