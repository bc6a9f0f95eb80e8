//! The public surface (spec.md §6.1): `generate`, the `Diagram` handle, and
//! its accessors.
//!
//! Grounded on `examples/original_source/src/voronoi.cpp`'s `Voronoi::generate`
//! for the sanitization/dedup/prune pipeline (lines ~530-580: the `qsort` +
//! consecutive-duplicate removal), generalized per spec.md §4.9 to also
//! prune against an arbitrary clipper (not just derive a box) and to derive
//! a padded bounding rect when none is supplied.

use crate::alloc::{BlockAllocator, SystemAllocator};
use crate::arena::{Arena, SiteId};
use crate::cell;
use crate::clip::{Clipper, PolygonClipper, RectClipper};
use crate::delaunay::{self, DelaunayEdge};
use crate::error::GenerateError;
use crate::numeric::{dist, point_eq, point_less, Point};
use crate::sweep;

/// One input site and its assembled cell ring.
pub struct SiteView<'a> {
    pub index: usize,
    pub point: Point,
    arena: &'a Arena,
    id: SiteId,
}

impl<'a> SiteView<'a> {
    /// The site's ring, already angularly sorted and gap-filled (spec.md
    /// §4.8). `neighbor` is `None` for a clip-boundary filler segment.
    pub fn cell_edges(&self) -> impl Iterator<Item = CellEdge> + 'a {
        let arena = self.arena;
        let mut cur = arena.site(self.id).edges;
        std::iter::from_fn(move || {
            let id = cur?;
            let ge = arena.graph_edge(id);
            cur = ge.next;
            Some(CellEdge {
                p0: ge.p0,
                p1: ge.p1,
                neighbor: ge.neighbor.map(|s| s.index()),
            })
        })
    }
}

/// One segment of a site's cell ring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellEdge {
    pub p0: Point,
    pub p1: Point,
    /// `None` for a clip-boundary filler; `Some(index)` for a real bisector.
    pub neighbor: Option<usize>,
}

/// One finalized Voronoi bisector segment, reported once regardless of how
/// many sites' rings reference it (spec.md §8 property 6: edge uniqueness).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoronoiEdge {
    pub site_a: usize,
    pub site_b: usize,
    pub p0: Point,
    pub p1: Point,
}

/// A generated diagram: the arena plus nothing else (spec.md §3: the
/// Diagram exclusively owns the Arena).
pub struct Diagram {
    arena: Arena,
}

impl Diagram {
    /// Releases the arena early. Idempotent — safe to call more than once,
    /// and safe on a diagram that failed to generate anything (spec.md
    /// §6.1).
    pub fn free(&mut self) {
        self.arena.clear();
    }

    pub fn num_sites(&self) -> usize {
        self.arena.num_sites()
    }

    pub fn sites(&self) -> impl Iterator<Item = SiteView<'_>> + '_ {
        (0..self.arena.num_sites()).map(move |i| {
            let id = SiteId(i as u32);
            SiteView {
                index: i,
                point: self.arena.site(id).p,
                arena: &self.arena,
                id,
            }
        })
    }

    /// Every finalized bisector, each yielded exactly once (spec.md §6.1's
    /// `edges`/`next_edge` pair, collapsed into one iterator).
    pub fn edges(&self) -> impl Iterator<Item = VoronoiEdge> + '_ {
        let arena = &self.arena;
        (0..arena.num_sites()).flat_map(move |i| {
            let site_id = SiteId(i as u32);
            let mut cur = arena.site(site_id).edges;
            std::iter::from_fn(move || loop {
                let id = cur?;
                let ge = arena.graph_edge(id);
                cur = ge.next;
                if let Some(neighbor) = ge.neighbor {
                    if neighbor.index() > site_id.index() {
                        return Some(VoronoiEdge {
                            site_a: site_id.index(),
                            site_b: neighbor.index(),
                            p0: ge.p0,
                            p1: ge.p1,
                        });
                    }
                }
            })
        })
    }

    /// The dual Delaunay edges (spec.md §4.10).
    pub fn delaunay_edges(&self) -> impl Iterator<Item = DelaunayEdge> + '_ {
        delaunay::iter(&self.arena)
    }
}

impl Drop for Diagram {
    fn drop(&mut self) {
        self.arena.clear();
    }
}

fn sanitize(points: &[Point]) -> Result<Vec<Point>, GenerateError> {
    for (index, p) in points.iter().enumerate() {
        if !p.is_finite() {
            return Err(GenerateError::NonFiniteCoordinate { index });
        }
    }
    let mut pts = points.to_vec();
    pts.sort_by(|a, b| {
        if point_less(*a, *b) {
            std::cmp::Ordering::Less
        } else if point_less(*b, *a) {
            std::cmp::Ordering::Greater
        } else {
            std::cmp::Ordering::Equal
        }
    });
    let before = pts.len();
    pts.dedup_by(|a, b| point_eq(*a, *b));
    tracing::debug!(removed = before - pts.len(), "deduplicated input sites");
    Ok(pts)
}

/// Bounding rectangle of `pts`, padded by one unit on each side (spec.md
/// §4.9.3-4) so a single-site or collinear input never yields a zero-width
/// clip.
fn derive_bounds(pts: &[Point]) -> (Point, Point) {
    const PADDING: crate::numeric::Real = 1.0;
    if pts.is_empty() {
        return (Point::new(0.0, 0.0), Point::new(1.0, 1.0));
    }
    let mut min = pts[0];
    let mut max = pts[0];
    for &p in &pts[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    (
        Point::new(min.x - PADDING, min.y - PADDING),
        Point::new(max.x + PADDING, max.y + PADDING),
    )
}

/// Runs the sweep and cell assembly over already-sanitized points. Callers
/// are responsible for having called `sanitize` exactly once beforehand —
/// kept as a separate step (rather than folded in here) so the `generate`
/// entry point can reuse one sanitized `Vec` for both bounds derivation and
/// the sweep itself, instead of sorting/deduping the input twice.
fn generate_impl(
    pts: Vec<Point>,
    clipper: Box<dyn Clipper>,
    allocator: Box<dyn BlockAllocator>,
) -> Result<Diagram, GenerateError> {
    let pts: Vec<Point> = pts.into_iter().filter(|p| clipper.contains(*p)).collect();
    tracing::debug!(surviving = pts.len(), "pruned sites outside the clip shape");

    let mut arena = Arena::with_allocator(allocator);
    for (i, p) in pts.iter().enumerate() {
        arena.alloc_site(*p, i as u32)?;
    }

    let (min, max) = clipper.bounds();
    let mid_x = (min.x + max.x) * 0.5;
    let degenerate_eps = (dist(min, max) * 1e-9).max(1e-12);

    sweep::run(&mut arena, clipper.as_ref(), mid_x, degenerate_eps)?;
    cell::assemble(&mut arena, clipper.as_ref())?;

    Ok(Diagram { arena })
}

/// Generate the Voronoi diagram of `points`, clipped to an axis-aligned
/// rectangle. `rect` is used verbatim if given (`min < max` on both axes,
/// or [`GenerateError::InvalidClipRect`]); otherwise one is derived from the
/// input's bounding box (spec.md §4.9).
#[tracing::instrument(level = "info", skip(points))]
pub fn generate(points: &[Point], rect: Option<(Point, Point)>) -> Result<Diagram, GenerateError> {
    let pts = sanitize(points)?;
    let (min, max) = match rect {
        Some((min, max)) => {
            if !(min.x < max.x && min.y < max.y) {
                return Err(GenerateError::InvalidClipRect { min, max });
            }
            (min, max)
        }
        None => derive_bounds(&pts),
    };
    generate_impl(
        pts,
        Box::new(RectClipper::new(min, max)),
        Box::new(SystemAllocator),
    )
}

/// Generate the Voronoi diagram of `points`, clipped to a convex polygon
/// given in CCW order.
#[tracing::instrument(level = "info", skip(points, vertices))]
pub fn generate_in_polygon(points: &[Point], vertices: Vec<Point>) -> Result<Diagram, GenerateError> {
    let len = vertices.len();
    let clipper =
        PolygonClipper::new(vertices).ok_or(GenerateError::DegenerateClipper { len })?;
    let pts = sanitize(points)?;
    generate_impl(pts, Box::new(clipper), Box::new(SystemAllocator))
}

/// Generate with a caller-supplied clipper and/or allocator (spec.md §6.1's
/// "clipper contract exported for extension", §6.2's allocator hook). The
/// lower-level entry point used by `generate`/`generate_in_polygon`, and
/// directly useful for tests that need to inject an allocation failure.
pub fn generate_with(
    points: &[Point],
    clipper: Box<dyn Clipper>,
    allocator: Box<dyn BlockAllocator>,
) -> Result<Diagram, GenerateError> {
    let pts = sanitize(points)?;
    generate_impl(pts, clipper, allocator)
}
