//! The sweepline core: site events, circle events, and the main loop
//! (spec.md §4.5-§4.8).
//!
//! Grounded on `examples/original_source/src/voronoi.cpp`'s `Voronoi::generate`,
//! `site_event`, `circle_event`, `endpos`, `finishline`, `edge_intersect`,
//! `check_circle_event`. The historical `width`/`height` clip is generalized
//! to any `&dyn Clipper` — `finishline` clips a finished bisector the moment
//! both endpoints are known, exactly as the original did inline during
//! `endpos`, not as a separate post-pass.

use crate::alloc::AllocError;
use crate::arena::{Arena, Direction, Edge, EdgeId, HalfEdgeId, SiteId};
use crate::beachline::Beachline;
use crate::clip::{Clipper, LineSegment};
use crate::numeric::{abs, dist, point_less, Point, Real};
use crate::queue::EventQueue;

/// Run the sweep over every site already allocated in `arena` (sites must be
/// sorted and deduplicated; the first is used as the fallback bottom site,
/// exactly as the historical `bottomsite = nextsite()`).
///
/// `mid_x` is the beachline's starting-guess split point, used only before
/// the first site has been inserted (the historical `p.x < width / 2`
/// check) — callers pass the clip bounds' horizontal midpoint.
///
/// `degenerate_eps` bounds how close to parallel two bisectors may be before
/// `edge_intersect` gives up on their intersection (spec.md §9's third Open
/// Question: scaled by the clip bounds' diagonal rather than a fixed
/// `1e-5`).
#[tracing::instrument(level = "debug", skip(arena, clipper))]
pub(crate) fn run(
    arena: &mut Arena,
    clipper: &dyn Clipper,
    mid_x: Real,
    degenerate_eps: Real,
) -> Result<(), AllocError> {
    let num_sites = arena.num_sites();
    if num_sites == 0 {
        return Ok(());
    }

    let mut beachline = Beachline::new(arena)?;
    let mut queue = EventQueue::new();
    let bottom_site = SiteId(0);
    let mut next_site = 1u32;

    while next_site < num_sites as u32 || !queue.is_empty() {
        let take_site = match (next_site < num_sites as u32, queue.peek_min()) {
            (true, None) => true,
            (true, Some(he)) => {
                let site_p = arena.site(SiteId(next_site)).p;
                let event_p = Point::new(arena.half_edge(he).vertex.x, arena.half_edge(he).y);
                point_less(site_p, event_p)
            }
            (false, _) => false,
        };

        if take_site {
            site_event(
                arena,
                &mut beachline,
                &mut queue,
                bottom_site,
                SiteId(next_site),
                mid_x,
                degenerate_eps,
            )?;
            next_site += 1;
        } else {
            circle_event(arena, &mut beachline, &mut queue, clipper, degenerate_eps)?;
        }
    }

    let mut he = arena.half_edge(beachline.start).next;
    while let Some(h) = he {
        if h == beachline.end {
            break;
        }
        if let Some(edge_id) = arena.half_edge(h).edge {
            finishline(arena, clipper, edge_id)?;
        }
        he = arena.half_edge(h).next;
    }

    tracing::debug!(num_sites, num_edges = arena.num_edges(), "sweep complete");
    Ok(())
}

fn site_event(
    arena: &mut Arena,
    beachline: &mut Beachline,
    queue: &mut EventQueue,
    bottom_site: SiteId,
    site_id: SiteId,
    mid_x: Real,
    eps: Real,
) -> Result<(), AllocError> {
    let site_p = arena.site(site_id).p;
    let left = beachline.locate_arc(arena, site_p, mid_x);
    let right = arena
        .half_edge(left)
        .next
        .expect("locate_arc never returns the end sentinel");
    let bottom = Beachline::bottom_site_or(arena, left, bottom_site);

    let bottom_p = arena.site(bottom).p;
    let edge = Edge::between(bottom, site_id, bottom_p, site_p);
    let edge_id = arena.alloc_edge(edge)?;

    let he1 = arena.alloc_half_edge(Some(edge_id), Direction::Left)?;
    let he2 = arena.alloc_half_edge(Some(edge_id), Direction::Right)?;

    beachline.link(arena, left, he1);
    beachline.link(arena, he1, he2);
    beachline.set_last_inserted(he1);

    if let Some(p) = check_circle_event(arena, left, he1, eps) {
        queue.remove(arena, left);
        arena.half_edge_mut(left).vertex = p;
        arena.half_edge_mut(left).y = p.y + dist(site_p, p);
        queue.push(arena, left)?;
    }
    if let Some(p) = check_circle_event(arena, he2, right, eps) {
        arena.half_edge_mut(he2).vertex = p;
        arena.half_edge_mut(he2).y = p.y + dist(site_p, p);
        queue.push(arena, he2)?;
    }

    Ok(())
}

fn circle_event(
    arena: &mut Arena,
    beachline: &mut Beachline,
    queue: &mut EventQueue,
    clipper: &dyn Clipper,
    eps: Real,
) -> Result<(), AllocError> {
    let left = queue
        .pop_min(arena)
        .expect("caller only calls circle_event when the queue is non-empty");
    let leftleft = arena.half_edge(left).prev.expect("left always has a prev");
    let right = arena.half_edge(left).next.expect("left always has a next");
    let rightright = arena
        .half_edge(right)
        .next
        .expect("right always has a next");

    let bottom = Beachline::leftsite(arena, left).expect("circle-event half-edge owns an edge");
    let top = Beachline::rightsite(arena, right).expect("circle-event half-edge owns an edge");

    let vertex = arena.half_edge(left).vertex;
    let left_edge = arena.half_edge(left).edge.unwrap();
    let left_dir = arena.half_edge(left).direction;
    endpos(arena, clipper, left_edge, vertex, left_dir)?;
    let right_edge = arena.half_edge(right).edge.unwrap();
    let right_dir = arena.half_edge(right).direction;
    endpos(arena, clipper, right_edge, vertex, right_dir)?;

    beachline.clear_last_inserted_if(left, Some(leftleft));
    beachline.clear_last_inserted_if(right, Some(rightright));

    queue.remove(arena, right);
    beachline.unlink(arena, left);
    beachline.unlink(arena, right);
    arena.free_half_edge(left);
    arena.free_half_edge(right);

    let (bottom, top, direction) = if arena.site(bottom).p.y > arena.site(top).p.y {
        (top, bottom, Direction::Right)
    } else {
        (bottom, top, Direction::Left)
    };

    let bottom_p = arena.site(bottom).p;
    let top_p = arena.site(top).p;
    let new_edge = Edge::between(bottom, top, bottom_p, top_p);
    let new_edge_id = arena.alloc_edge(new_edge)?;
    let he = arena.alloc_half_edge(Some(new_edge_id), direction)?;
    beachline.link(arena, leftleft, he);
    endpos(arena, clipper, new_edge_id, vertex, direction.opposite())?;

    if let Some(p) = check_circle_event(arena, leftleft, he, eps) {
        queue.remove(arena, leftleft);
        arena.half_edge_mut(leftleft).vertex = p;
        arena.half_edge_mut(leftleft).y = p.y + dist(bottom_p, p);
        queue.push(arena, leftleft)?;
    }
    if let Some(p) = check_circle_event(arena, he, rightright, eps) {
        arena.half_edge_mut(he).vertex = p;
        arena.half_edge_mut(he).y = p.y + dist(bottom_p, p);
        queue.push(arena, he)?;
    }
    Ok(())
}

fn endpos(
    arena: &mut Arena,
    clipper: &dyn Clipper,
    edge_id: EdgeId,
    p: Point,
    direction: Direction,
) -> Result<(), AllocError> {
    arena.edge_mut(edge_id).pos[direction.as_index()] = Some(p);
    let edge = arena.edge(edge_id);
    if edge.pos[0].is_some() && edge.pos[1].is_some() {
        finishline(arena, clipper, edge_id)?;
    }
    Ok(())
}

/// Clip a finished bisector and, if any of it survives, attach one
/// `GraphEdge` to each of its two sites (the historical `Voronoi::finishline`).
fn finishline(arena: &mut Arena, clipper: &dyn Clipper, edge_id: EdgeId) -> Result<(), AllocError> {
    let mut seg = {
        let e = arena.edge(edge_id);
        LineSegment {
            a: e.a,
            b: e.b,
            c: e.c,
            pos: e.pos,
        }
    };
    if !clipper.clip_segment(&mut seg) {
        tracing::trace!(?edge_id, "bisector discarded by clipper");
        return Ok(());
    }
    let p = [
        seg.pos[0].expect("clip_segment fills both endpoints on success"),
        seg.pos[1].expect("clip_segment fills both endpoints on success"),
    ];

    for i in 0..2 {
        let site_i = arena.edge(edge_id).sites[i];
        let neighbor = arena.edge(edge_id).sites[1 - i];
        let head = arena.site(site_i).edges;
        let ge_id = arena.alloc_graph_edge(crate::arena::GraphEdge {
            site: site_i,
            neighbor: Some(neighbor),
            edge: Some(edge_id),
            p0: p[i],
            p1: p[1 - i],
            next: head,
        })?;
        arena.site_mut(site_i).edges = Some(ge_id);
    }
    Ok(())
}

/// The historical `Voronoi::edge_intersect`: where do the two bisectors
/// owned by `he1`/`he2` actually meet, if anywhere in front of the sweep?
fn edge_intersect(arena: &Arena, he1: HalfEdgeId, he2: HalfEdgeId, eps: Real) -> Option<Point> {
    let e1 = arena.half_edge(he1).edge.expect("checked by caller");
    let e2 = arena.half_edge(he2).edge.expect("checked by caller");
    let e1 = arena.edge(e1);
    let e2 = arena.edge(e2);

    let s1_top = arena.site(e1.sites[1]).p;
    let s2_top = arena.site(e2.sites[1]).p;
    let dx = s2_top.x - s1_top.x;
    let dy = s2_top.y - s1_top.y;
    if dx == 0.0 && dy == 0.0 {
        return None;
    }

    let d = e1.a * e2.b - e1.b * e2.a;
    if abs(d) < eps {
        return None;
    }
    let out = Point::new(
        (e1.c * e2.b - e1.b * e2.c) / d,
        (e1.a * e2.c - e1.c * e2.a) / d,
    );

    let (he, top) = if point_less(s1_top, s2_top) {
        (he1, s1_top)
    } else {
        (he2, s2_top)
    };
    let right_of_site = out.x >= top.x;
    let dir = arena.half_edge(he).direction;
    if (right_of_site && dir == Direction::Left) || (!right_of_site && dir == Direction::Right) {
        return None;
    }
    Some(out)
}

/// The historical `Voronoi::check_circle_event`.
fn check_circle_event(arena: &Arena, he1: HalfEdgeId, he2: HalfEdgeId, eps: Real) -> Option<Point> {
    let e1 = arena.half_edge(he1).edge?;
    let e2 = arena.half_edge(he2).edge?;
    if arena.edge(e1).sites[1] == arena.edge(e2).sites[1] {
        return None;
    }
    edge_intersect(arena, he1, he2, eps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::RectClipper;

    fn run_on(points: &[Point]) -> Arena {
        let mut arena = Arena::new();
        for &p in points {
            arena.alloc_site(p, 0).unwrap();
        }
        let clipper = RectClipper::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        run(&mut arena, &clipper, 50.0, 1e-7).unwrap();
        arena
    }

    #[test]
    fn two_sites_produce_one_bisector_reaching_both_sites() {
        let arena = run_on(&[Point::new(20.0, 50.0), Point::new(80.0, 50.0)]);
        assert_eq!(arena.num_sites(), 2);
        assert!(arena.site(SiteId(0)).edges.is_some());
        assert!(arena.site(SiteId(1)).edges.is_some());
    }

    #[test]
    fn single_site_has_no_bisectors() {
        let arena = run_on(&[Point::new(50.0, 50.0)]);
        assert_eq!(arena.num_edges(), 0);
        assert!(arena.site(SiteId(0)).edges.is_none());
    }

    #[test]
    fn three_collinear_sites_stay_consistent() {
        // A circle event is expected not to fire for collinear sites (no
        // finite circumcenter); the sweep must still terminate cleanly.
        let arena = run_on(&[
            Point::new(10.0, 50.0),
            Point::new(50.0, 50.0),
            Point::new(90.0, 50.0),
        ]);
        assert_eq!(arena.num_sites(), 3);
        for i in 0..3 {
            assert!(arena.site(SiteId(i)).edges.is_some());
        }
    }

    #[test]
    fn four_cocircular_sites_terminate_and_cover_every_site() {
        let arena = run_on(&[
            Point::new(50.0, 10.0),
            Point::new(90.0, 50.0),
            Point::new(50.0, 90.0),
            Point::new(10.0, 50.0),
        ]);
        for i in 0..4 {
            assert!(arena.site(SiteId(i)).edges.is_some());
        }
    }
}
