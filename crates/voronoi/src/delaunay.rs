//! The Delaunay dual (spec.md §4.9 / component 8): derived directly from the
//! per-site `GraphEdge` rings built by `cell.rs`, not recomputed.
//!
//! Not grounded in `examples/original_source/` (the historical library only
//! exposes the Voronoi side); grounded on spec.md §4.9's iteration rule
//! instead: walk each site's ring in index order, emit `(site, neighbor)`
//! once per bisector by requiring `neighbor.index > site.index`.

use crate::arena::{Arena, SiteId};
use crate::numeric::Point;

/// One Delaunay edge: the two sites whose cells share a bisector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DelaunayEdge {
    pub a: SiteId,
    pub a_point: Point,
    pub b: SiteId,
    pub b_point: Point,
}

/// Iterate every Delaunay edge exactly once, in site-index order (spec.md
/// §4.9). Convex-hull boundary segments (`neighbor == None`, synthesized by
/// `cell::assemble`'s gap filling) never appear here.
pub(crate) fn iter(arena: &Arena) -> impl Iterator<Item = DelaunayEdge> + '_ {
    (0..arena.num_sites()).flat_map(move |i| {
        let site_id = SiteId(i as u32);
        let mut cur = arena.site(site_id).edges;
        std::iter::from_fn(move || loop {
            let id = cur?;
            let ge = arena.graph_edge(id);
            cur = ge.next;
            if let Some(neighbor) = ge.neighbor {
                if neighbor.index() > site_id.index() {
                    return Some(DelaunayEdge {
                        a: site_id,
                        a_point: arena.site(site_id).p,
                        b: neighbor,
                        b_point: arena.site(neighbor).p,
                    });
                }
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::GraphEdge;

    #[test]
    fn emits_each_bisector_once_in_index_order() {
        let mut arena = Arena::new();
        let s0 = arena.alloc_site(Point::new(0.0, 0.0), 0).unwrap();
        let s1 = arena.alloc_site(Point::new(1.0, 0.0), 1).unwrap();
        let s2 = arena.alloc_site(Point::new(2.0, 0.0), 2).unwrap();

        // s0-s1 neighbor edges on both sites, s1-s2 only recorded on s1 (the
        // lower-index side always wins the emission, per the rule).
        let ge01 = arena
            .alloc_graph_edge(GraphEdge {
                site: s0,
                neighbor: Some(s1),
                edge: None,
                p0: Point::new(0.5, -1.0),
                p1: Point::new(0.5, 1.0),
                next: None,
            })
            .unwrap();
        arena.site_mut(s0).edges = Some(ge01);

        let ge10 = arena
            .alloc_graph_edge(GraphEdge {
                site: s1,
                neighbor: Some(s0),
                edge: None,
                p0: Point::new(0.5, 1.0),
                p1: Point::new(0.5, -1.0),
                next: None,
            })
            .unwrap();
        let ge12 = arena
            .alloc_graph_edge(GraphEdge {
                site: s1,
                neighbor: Some(s2),
                edge: None,
                p0: Point::new(1.5, -1.0),
                p1: Point::new(1.5, 1.0),
                next: Some(ge10),
            })
            .unwrap();
        arena.site_mut(s1).edges = Some(ge12);

        let edges: Vec<_> = iter(&arena).collect();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].a, s0);
        assert_eq!(edges[0].b, s1);
        assert_eq!(edges[1].a, s1);
        assert_eq!(edges[1].b, s2);
    }

    #[test]
    fn boundary_only_ring_yields_no_edges() {
        let mut arena = Arena::new();
        let s0 = arena.alloc_site(Point::new(0.0, 0.0), 0).unwrap();
        let ge = arena
            .alloc_graph_edge(GraphEdge {
                site: s0,
                neighbor: None,
                edge: None,
                p0: Point::new(0.0, 0.0),
                p1: Point::new(1.0, 0.0),
                next: None,
            })
            .unwrap();
        arena.site_mut(s0).edges = Some(ge);
        assert_eq!(iter(&arena).count(), 0);
    }
}
