//! The pluggable clipper (spec.md §4.6, §9).
//!
//! A clipper is a capability record of three operations — `contains`,
//! `clip_segment`, `fill_gaps` — realized as a trait rather than the
//! historical C function-pointer triple, per spec.md §9's "small vtable of
//! function values" note (a Rust trait object *is* that vtable). Deliberately
//! kept free of any `crate::arena` type: clippers only ever see plain
//! geometry (`Point`, line coefficients, ring segments), which makes
//! `clip_segment`/`fill_gaps` straightforward to unit-test in isolation and
//! to implement for a third-party convex shape without touching the arena.

mod polygon;
mod rect;

pub use polygon::PolygonClipper;
pub use rect::RectClipper;

use crate::numeric::{Point, Real};

/// A bisector line `a*x + b*y = c`, with up to two already-known endpoints
/// (`None` = "extends to infinity on this side"). `clip_segment` fills both
/// in.
#[derive(Clone, Copy, Debug)]
pub struct LineSegment {
    pub a: Real,
    pub b: Real,
    pub c: Real,
    pub pos: [Option<Point>; 2],
}

/// One segment of a site's angularly-sorted edge ring, before gap-filling.
/// Produced by `cell.rs` from the finalized `Edge`s attached to a site.
pub type RingInput = (Point, Point);

/// One segment of a site's ring *after* gap-filling: either one of the
/// original input segments (by index, so the caller can recover its
/// neighbor/edge metadata) or a freshly synthesized clip-boundary segment.
#[derive(Clone, Copy, Debug)]
pub enum RingSegment {
    Original(usize),
    Boundary(Point, Point),
}

/// The convex shape a diagram is clipped against.
pub trait Clipper: std::fmt::Debug {
    /// Is `p` strictly inside the shape?
    fn contains(&self, p: Point) -> bool;

    /// Clip `seg`'s line to the shape, filling in both endpoints. Returns
    /// `false` if the clipped result is empty (entirely outside, or the two
    /// endpoints coincide within tolerance) — the caller discards the edge.
    fn clip_segment(&self, seg: &mut LineSegment) -> bool;

    /// Given a site's ring, already sorted angularly around the site and
    /// listed as `(p0, p1)` pairs in ring order, return the full ring with
    /// boundary-following filler segments inserted wherever two adjacent
    /// segments don't already meet.
    fn fill_gaps(&self, ring: &[RingInput]) -> Vec<RingSegment>;

    /// The clip bounding box, used by input sanitization (spec.md §4.9) and
    /// to scale numerical tolerances to the diagram's coordinate range
    /// (spec.md §9's third Open Question).
    fn bounds(&self) -> (Point, Point);
}
