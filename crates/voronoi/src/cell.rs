//! Cell assembly (spec.md §4.8): turning each site's raw, order-scrambled
//! `GraphEdge` list (built by `sweep::finishline` in LIFO prepend order) into
//! an angularly-sorted, gap-filled, continuity-oriented ring.
//!
//! Not grounded in `examples/original_source/` — the historical `voronoi.cpp`
//! stops at the unsorted per-site list and leaves ring assembly to the
//! caller. This is grounded instead on the teacher crate's `oriented_edge`
//! module's "orient a chain of segments so consecutive endpoints match"
//! idea, generalized here to a full ring plus clip-boundary gap filling.

use crate::alloc::AllocError;
use crate::arena::{Arena, GraphEdge, GraphEdgeId, SiteId};
use crate::clip::{Clipper, RingInput, RingSegment};
use crate::numeric::{atan2, dist, Point};

/// Rebuild every site's ring in place. Must run after the sweep has
/// finished (so every surviving bisector has already been clipped and
/// attached by `sweep::finishline`).
pub(crate) fn assemble(arena: &mut Arena, clipper: &dyn Clipper) -> Result<(), AllocError> {
    for i in 0..arena.num_sites() {
        assemble_site(arena, clipper, SiteId(i as u32))?;
    }
    Ok(())
}

struct RawItem {
    id: GraphEdgeId,
    p0: Point,
    p1: Point,
}

fn assemble_site(arena: &mut Arena, clipper: &dyn Clipper, site_id: SiteId) -> Result<(), AllocError> {
    let site_p = arena.site(site_id).p;

    let mut items = Vec::new();
    let mut cur = arena.site(site_id).edges;
    while let Some(id) = cur {
        let ge = arena.graph_edge(id);
        items.push(RawItem {
            id,
            p0: ge.p0,
            p1: ge.p1,
        });
        cur = ge.next;
    }

    // Angular sort by the edge midpoint's bearing from the site (spec.md
    // §4.8): this puts the ring in CCW (or CW, consistently) rotational
    // order around the site.
    items.sort_by(|a, b| {
        let bearing = |p0: Point, p1: Point| {
            let mid = Point::new((p0.x + p1.x) * 0.5, (p0.y + p1.y) * 0.5);
            atan2(mid.y - site_p.y, mid.x - site_p.x)
        };
        bearing(a.p0, a.p1)
            .partial_cmp(&bearing(b.p0, b.p1))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Re-orient each segment so its start matches the previous segment's
    // end, wherever that's unambiguous (rotational order alone doesn't fix
    // which of a segment's two endpoints comes first).
    let mut oriented: Vec<(Point, Point)> = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        if idx == 0 {
            oriented.push((item.p0, item.p1));
        } else {
            let prev_end = oriented[idx - 1].1;
            if dist(prev_end, item.p0) <= dist(prev_end, item.p1) {
                oriented.push((item.p0, item.p1));
            } else {
                oriented.push((item.p1, item.p0));
            }
        }
    }

    let ring_inputs: Vec<RingInput> = oriented.clone();
    let filled = clipper.fill_gaps(&ring_inputs);

    let mut head: Option<GraphEdgeId> = None;
    let mut tail: Option<GraphEdgeId> = None;
    for seg in &filled {
        let id = match seg {
            RingSegment::Original(idx) => {
                let (p0, p1) = oriented[*idx];
                let id = items[*idx].id;
                let ge = arena.graph_edge_mut(id);
                ge.p0 = p0;
                ge.p1 = p1;
                ge.next = None;
                id
            }
            RingSegment::Boundary(p0, p1) => arena.alloc_graph_edge(GraphEdge {
                site: site_id,
                neighbor: None,
                edge: None,
                p0: *p0,
                p1: *p1,
                next: None,
            })?,
        };
        match tail {
            None => head = Some(id),
            Some(t) => arena.graph_edge_mut(t).next = Some(id),
        }
        tail = Some(id);
    }
    arena.site_mut(site_id).edges = head;
    Ok(())
}
