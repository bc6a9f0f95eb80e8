//! Convex-polygon clipper (spec.md §4.6's alternative to the default box).
//!
//! Vertices are given in CCW order. `contains` is inside-all-half-planes;
//! `clip_segment` is repeated half-plane clipping of the bisector's
//! parametric line (a Cyrus–Beck-style walk, generalizing the per-axis
//! extension the rect clipper does against its four half-planes); `fill_gaps`
//! walks the polygon's edges the way the rect clipper walks the box's
//! corners — see `RectClipper` in `rect.rs` for the box-specific version of
//! the same idea.

use super::{Clipper, LineSegment, RingInput, RingSegment};
use crate::numeric::{abs, Point, Real};

#[derive(Clone, Debug)]
pub struct PolygonClipper {
    /// CCW-ordered vertices, at least 3.
    vertices: Vec<Point>,
    /// Cumulative boundary-arclength at the start of each edge, same
    /// length as `vertices`.
    cumulative: Vec<Real>,
    perimeter: Real,
}

#[inline]
fn cross(a: Point, b: Point) -> Real {
    a.x * b.y - a.y * b.x
}

#[inline]
fn sub(a: Point, b: Point) -> Point {
    Point::new(a.x - b.x, a.y - b.y)
}

impl PolygonClipper {
    /// `None` if fewer than 3 vertices are given (spec.md §7:
    /// `GenerateError::DegenerateClipper`).
    pub fn new(vertices: Vec<Point>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let n = vertices.len();
        let mut cumulative = Vec::with_capacity(n);
        let mut acc = 0.0;
        for i in 0..n {
            cumulative.push(acc);
            let next = vertices[(i + 1) % n];
            acc += crate::numeric::dist(vertices[i], next);
        }
        Some(PolygonClipper {
            vertices,
            cumulative,
            perimeter: acc,
        })
    }

    fn eps(&self) -> Real {
        let (min, max) = self.bounds();
        (crate::numeric::dist(min, max) * 1e-9).max(1e-12)
    }

    fn n(&self) -> usize {
        self.vertices.len()
    }

    fn edge(&self, i: usize) -> (Point, Point) {
        (self.vertices[i], self.vertices[(i + 1) % self.n()])
    }

    fn boundary_param(&self, p: Point) -> Real {
        let eps = self.eps();
        for i in 0..self.n() {
            let (a, b) = self.edge(i);
            let d = sub(b, a);
            let len = crate::numeric::dist(a, b);
            if len <= eps {
                continue;
            }
            let rel = sub(p, a);
            let t = (rel.x * d.x + rel.y * d.y) / (len * len);
            let proj = Point::new(a.x + t * d.x, a.y + t * d.y);
            if crate::numeric::dist(proj, p) <= eps && t >= -eps && t <= 1.0 + eps {
                return self.cumulative[i] + t.clamp(0.0, 1.0) * len;
            }
        }
        // Fall back to nearest vertex's param if no edge matched closely
        // (shouldn't happen for points produced by `clip_segment`).
        0.0
    }

    fn corners_between(&self, a: Point, b: Point) -> Vec<Point> {
        let eps = self.eps();
        let pa = self.boundary_param(a);
        let pb = self.boundary_param(b);
        let mut span = pb - pa;
        if span <= eps {
            span += self.perimeter;
        }
        let mut out = Vec::new();
        for i in 0..self.n() {
            let cp = self.cumulative[i];
            let mut rel = cp - pa;
            if rel < -eps {
                rel += self.perimeter;
            }
            if rel > eps && rel < span - eps {
                out.push(self.vertices[i]);
            }
        }
        out
    }
}

impl Clipper for PolygonClipper {
    fn contains(&self, p: Point) -> bool {
        for i in 0..self.n() {
            let (a, b) = self.edge(i);
            if cross(sub(b, a), sub(p, a)) <= 0.0 {
                return false;
            }
        }
        true
    }

    fn clip_segment(&self, seg: &mut LineSegment) -> bool {
        let base = if seg.a == 1.0 {
            Point::new(seg.c, 0.0)
        } else {
            Point::new(0.0, seg.c)
        };
        let d = Point::new(-seg.b, seg.a);

        let (s_lo_known, s_hi_known): (Option<Point>, Option<Point>) =
            if seg.a == 1.0 && seg.b >= 0.0 {
                (seg.pos[1], seg.pos[0])
            } else {
                (seg.pos[0], seg.pos[1])
            };

        let param = |p: Point| -> Real {
            let rel = sub(p, base);
            (rel.x * d.x + rel.y * d.y) / (d.x * d.x + d.y * d.y)
        };

        let mut t_lo = s_lo_known.map(param).unwrap_or(Real::NEG_INFINITY);
        let mut t_hi = s_hi_known.map(param).unwrap_or(Real::INFINITY);

        let eps = self.eps();
        for i in 0..self.n() {
            let (a, b) = self.edge(i);
            let edge_dir = sub(b, a);
            let rel = sub(base, a);
            let k = cross(edge_dir, rel);
            let m = cross(edge_dir, d);
            if abs(m) <= eps {
                if k < -eps {
                    return false;
                }
                continue;
            }
            let bound = -k / m;
            if m > 0.0 {
                if bound > t_lo {
                    t_lo = bound;
                }
            } else if bound < t_hi {
                t_hi = bound;
            }
        }

        if !(t_lo.is_finite() && t_hi.is_finite()) || t_lo >= t_hi - eps {
            return false;
        }

        let p_lo = Point::new(base.x + t_lo * d.x, base.y + t_lo * d.y);
        let p_hi = Point::new(base.x + t_hi * d.x, base.y + t_hi * d.y);
        seg.pos[0] = Some(p_lo);
        seg.pos[1] = Some(p_hi);
        crate::numeric::dist(p_lo, p_hi) > eps
    }

    fn fill_gaps(&self, ring: &[RingInput]) -> Vec<RingSegment> {
        let eps = self.eps();
        if ring.is_empty() {
            let corner0 = self.vertices[0];
            let mut out = Vec::new();
            let mut prev = corner0;
            for c in self.corners_between(corner0, corner0) {
                out.push(RingSegment::Boundary(prev, c));
                prev = c;
            }
            out.push(RingSegment::Boundary(prev, corner0));
            return out;
        }

        let mut out = Vec::with_capacity(ring.len() * 2);
        for i in 0..ring.len() {
            out.push(RingSegment::Original(i));
            let (_, end) = ring[i];
            let (start_next, _) = ring[(i + 1) % ring.len()];
            if crate::numeric::dist(end, start_next) <= eps {
                continue;
            }
            let mut prev = end;
            for c in self.corners_between(end, start_next) {
                out.push(RingSegment::Boundary(prev, c));
                prev = c;
            }
            out.push(RingSegment::Boundary(prev, start_next));
        }
        out
    }

    fn bounds(&self) -> (Point, Point) {
        let mut min = self.vertices[0];
        let mut max = self.vertices[0];
        for &p in &self.vertices[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        (min, max)
    }
}
