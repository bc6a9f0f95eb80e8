//! The beachline: a doubly-linked list of arc boundaries (spec.md §4.4).
//!
//! Two sentinel half-edges (`start`, `end`) bound the list; every half-edge
//! in between owns an `Edge` and marks the boundary between two parabolic
//! arcs. `locate_arc` finds the arc directly above a new site's x using the
//! `last_inserted` half-edge as a starting guess, same as the historical
//! `get_edge_above_x`.
//!
//! Grounded on `examples/original_source/src/voronoi.cpp`: `HalfEdge::link`/
//! `unlink`, `HalfEdge::rightof`, `Voronoi::get_edge_above_x`.

use crate::alloc::AllocError;
use crate::arena::{Arena, Direction, HalfEdgeId, SiteId};
use crate::numeric::{Point, Real};

pub struct Beachline {
    pub start: HalfEdgeId,
    pub end: HalfEdgeId,
    last_inserted: Option<HalfEdgeId>,
}

impl Beachline {
    pub fn new(arena: &mut Arena) -> Result<Self, AllocError> {
        let start = arena.alloc_half_edge(None, Direction::Left)?;
        let end = arena.alloc_half_edge(None, Direction::Left)?;
        arena.half_edge_mut(start).next = Some(end);
        arena.half_edge_mut(end).prev = Some(start);
        Ok(Beachline {
            start,
            end,
            last_inserted: None,
        })
    }

    /// Insert `b` immediately to the right of `a`.
    pub fn link(&mut self, arena: &mut Arena, a: HalfEdgeId, b: HalfEdgeId) {
        let a_next = arena.half_edge(a).next;
        arena.half_edge_mut(b).prev = Some(a);
        arena.half_edge_mut(b).next = a_next;
        if let Some(n) = a_next {
            arena.half_edge_mut(n).prev = Some(b);
        }
        arena.half_edge_mut(a).next = Some(b);
    }

    /// Remove `a` from the chain. `a`'s own links are left dangling; the
    /// caller is expected to free `a` immediately after (it does, in
    /// `sweep::circle_event`).
    pub fn unlink(&mut self, arena: &mut Arena, a: HalfEdgeId) {
        let prev = arena.half_edge(a).prev;
        let next = arena.half_edge(a).next;
        if let Some(p) = prev {
            arena.half_edge_mut(p).next = next;
        }
        if let Some(n) = next {
            arena.half_edge_mut(n).prev = prev;
        }
        if self.last_inserted == Some(a) {
            self.last_inserted = prev;
        }
    }

    pub fn set_last_inserted(&mut self, he: HalfEdgeId) {
        self.last_inserted = Some(he);
    }

    pub fn clear_last_inserted_if(&mut self, he: HalfEdgeId, replacement: Option<HalfEdgeId>) {
        if self.last_inserted == Some(he) {
            self.last_inserted = replacement;
        }
    }

    pub(crate) fn leftsite(arena: &Arena, he: HalfEdgeId) -> Option<SiteId> {
        let h = arena.half_edge(he);
        h.edge.map(|e| arena.edge(e).sites[h.direction.as_index()])
    }

    pub(crate) fn rightsite(arena: &Arena, he: HalfEdgeId) -> Option<SiteId> {
        let h = arena.half_edge(he);
        h.edge
            .map(|e| arena.edge(e).sites[h.direction.opposite().as_index()])
    }

    /// Is `p` to the right of the arc bounded by `he`'s bisector? Carries
    /// the degenerate near-vertical-bisector expansion from the historical
    /// `HalfEdge::rightof` verbatim.
    fn rightof(arena: &Arena, he: HalfEdgeId, p: Point) -> bool {
        let h = arena.half_edge(he);
        let edge = arena.edge(h.edge.expect("rightof called on a sentinel"));
        let topsite = arena.site(edge.sites[1]);

        let right_of_site = p.x > topsite.p.x;
        if right_of_site && h.direction == Direction::Left {
            return true;
        }
        if !right_of_site && h.direction == Direction::Right {
            return false;
        }

        let above: bool;
        if edge.a == 1.0 {
            let dyp = p.y - topsite.p.y;
            let dxp = p.x - topsite.p.x;
            let mut fast = false;
            let mut above_fast = false;
            if (!right_of_site && edge.b < 0.0) || (right_of_site && edge.b >= 0.0) {
                above_fast = dyp >= edge.b * dxp;
                fast = above_fast;
            } else {
                let mut a = p.x + p.y * edge.b > edge.c;
                if edge.b < 0.0 {
                    a = !a;
                }
                above_fast = a;
                if !above_fast {
                    fast = true;
                }
            }
            if fast {
                above = above_fast;
            } else {
                let dxs = topsite.p.x - arena.site(edge.sites[0]).p.x;
                let mut a = edge.b * (dxp * dxp - dyp * dyp)
                    < dxs * dyp * (1.0 + 2.0 * dxp / dxs + edge.b * edge.b);
                if edge.b < 0.0 {
                    a = !a;
                }
                above = a;
            }
        } else {
            // edge.b == 1.0
            let yl = edge.c - edge.a * p.x;
            let t1 = p.y - yl;
            let t2 = p.x - topsite.p.x;
            let t3 = yl - topsite.p.y;
            above = t1 * t1 > t2 * t2 + t3 * t3;
        }
        if h.direction == Direction::Left {
            above
        } else {
            !above
        }
    }

    /// Locate the half-edge whose left arc sits directly above `p.x`
    /// (spec.md §4.4), using `last_inserted` (or a left/right choice by
    /// `p.x` against `mid_x`) as the starting guess.
    pub fn locate_arc(&mut self, arena: &Arena, p: Point, mid_x: Real) -> HalfEdgeId {
        let mut he = match self.last_inserted {
            Some(h) => h,
            None => {
                if p.x < mid_x {
                    self.start
                } else {
                    self.end
                }
            }
        };

        if he == self.start || (he != self.end && Self::rightof(arena, he, p)) {
            loop {
                he = arena.half_edge(he).next.expect("beachline end reached unexpectedly");
                if he == self.end || !Self::rightof(arena, he, p) {
                    break;
                }
            }
            he = arena.half_edge(he).prev.expect("start sentinel has no prev");
        } else {
            loop {
                he = arena.half_edge(he).prev.expect("beachline start reached unexpectedly");
                if he == self.start || Self::rightof(arena, he, p) {
                    break;
                }
            }
        }
        he
    }

    pub(crate) fn bottom_site_or(arena: &Arena, he: HalfEdgeId, fallback: SiteId) -> SiteId {
        Self::rightsite(arena, he).unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Edge;
    use crate::numeric::Point;

    fn make_edge_he(arena: &mut Arena, s0: SiteId, s1: SiteId, dir: Direction) -> HalfEdgeId {
        let p0 = arena.site(s0).p;
        let p1 = arena.site(s1).p;
        let e = Edge::between(s0, s1, p0, p1);
        let eid = arena.alloc_edge(e).unwrap();
        arena.alloc_half_edge(Some(eid), dir).unwrap()
    }

    #[test]
    fn link_and_unlink_maintain_chain_order() {
        let mut arena = Arena::new();
        let mut bl = Beachline::new(&mut arena).unwrap();
        let s0 = arena.alloc_site(Point::new(0.0, 0.0), 0).unwrap();
        let s1 = arena.alloc_site(Point::new(1.0, 1.0), 1).unwrap();
        let a = make_edge_he(&mut arena, s0, s1, Direction::Left);
        let b = make_edge_he(&mut arena, s0, s1, Direction::Right);

        bl.link(&mut arena, bl.start, a);
        bl.link(&mut arena, a, b);

        assert_eq!(arena.half_edge(bl.start).next, Some(a));
        assert_eq!(arena.half_edge(a).next, Some(b));
        assert_eq!(arena.half_edge(b).next, Some(bl.end));
        assert_eq!(arena.half_edge(bl.end).prev, Some(b));

        bl.unlink(&mut arena, a);
        assert_eq!(arena.half_edge(bl.start).next, Some(b));
        assert_eq!(arena.half_edge(b).prev, Some(bl.start));
    }

    #[test]
    fn locate_arc_finds_single_arc_for_one_site_beachline() {
        // A beachline with exactly one real arc (start -> he -> end) where
        // `he`'s bisector separates the bottom site from everything else.
        let mut arena = Arena::new();
        let mut bl = Beachline::new(&mut arena).unwrap();
        let s0 = arena.alloc_site(Point::new(0.0, 0.0), 0).unwrap();
        let s1 = arena.alloc_site(Point::new(10.0, 0.0), 1).unwrap();
        let he = make_edge_he(&mut arena, s0, s1, Direction::Left);
        bl.link(&mut arena, bl.start, he);

        let found = bl.locate_arc(&arena, Point::new(5.0, 100.0), 5.0);
        assert!(found == bl.start || found == he);
    }
}
