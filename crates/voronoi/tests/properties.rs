//! Integration tests for the universal properties and boundary scenarios in
//! spec.md §8: S6 here (S1-S5 live as unit tests beside `diagram.rs`, the
//! teacher's `geom2/tests.rs` placement style for boundary-literal cases),
//! plus P1-P3 as `proptest` generators exercising the crate's previously
//! unused `proptest`/`rand` dev-dependencies.

use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use voronoi::{generate, Diagram, Point};

const EPS: f64 = 1e-6;

fn dist(a: Point, b: Point) -> f64 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    (dx * dx + dy * dy).sqrt()
}

fn approx_eq(a: Point, b: Point) -> bool {
    dist(a, b) < EPS
}

/// Property 1: every site's ring is a closed polygonal loop.
fn assert_cell_closure(d: &Diagram) {
    for site in d.sites() {
        let ring: Vec<_> = site.cell_edges().collect();
        assert!(!ring.is_empty(), "site {} has an empty ring", site.index);
        for i in 0..ring.len() {
            let next = ring[(i + 1) % ring.len()];
            assert!(
                approx_eq(ring[i].p1, next.p0),
                "site {} ring is not closed at segment {i}",
                site.index
            );
        }
    }
}

/// Property 3: if site `a` records a neighbor `b`, `b` records `a` back with
/// the same (possibly swapped) segment.
fn assert_neighbor_symmetry(d: &Diagram) {
    let sites: Vec<_> = d.sites().map(|s| s.point).collect();
    let rings: Vec<Vec<_>> = d.sites().map(|s| s.cell_edges().collect::<Vec<_>>()).collect();
    for (i, ring) in rings.iter().enumerate() {
        for edge in ring {
            let Some(j) = edge.neighbor else { continue };
            let back = &rings[j];
            let found = back.iter().any(|e| {
                e.neighbor == Some(i)
                    && ((approx_eq(e.p0, edge.p0) && approx_eq(e.p1, edge.p1))
                        || (approx_eq(e.p0, edge.p1) && approx_eq(e.p1, edge.p0)))
            });
            assert!(
                found,
                "site {i} ({:?}) claims neighbor {j} ({:?}) without a matching back-reference",
                sites[i], sites[j]
            );
        }
    }
}

/// Property 4: every interior point of a bisector is equidistant (within
/// eps) from the two sites it separates.
fn assert_bisector_equidistant(d: &Diagram) {
    for e in d.edges() {
        let sites: Vec<_> = d.sites().collect();
        let a = sites[e.site_a].point;
        let b = sites[e.site_b].point;
        let mid = Point::new((e.p0.x + e.p1.x) * 0.5, (e.p0.y + e.p1.y) * 0.5);
        assert!(
            (dist(mid, a) - dist(mid, b)).abs() < 1e-3,
            "bisector midpoint {mid:?} is not equidistant from sites {a:?}/{b:?}"
        );
    }
}

/// Property 5: every ring endpoint lies within the clip rectangle.
fn assert_clip_containment(d: &Diagram, min: Point, max: Point) {
    let pad = 1e-6;
    for site in d.sites() {
        for e in site.cell_edges() {
            for p in [e.p0, e.p1] {
                assert!(p.x >= min.x - pad && p.x <= max.x + pad, "x out of bounds: {p:?}");
                assert!(p.y >= min.y - pad && p.y <= max.y + pad, "y out of bounds: {p:?}");
            }
        }
    }
}

/// Property 6: each bisector and each Delaunay pair appears exactly once.
fn assert_edge_uniqueness(d: &Diagram) {
    let mut seen = std::collections::HashSet::new();
    for e in d.edges() {
        assert!(e.site_a < e.site_b, "edges() must emit i < j pairs");
        assert!(seen.insert((e.site_a, e.site_b)), "duplicate bisector {:?}-{:?}", e.site_a, e.site_b);
    }
    let mut seen = std::collections::HashSet::new();
    for de in d.delaunay_edges() {
        let (a, b) = (de.a.0, de.b.0);
        let pair = (a.min(b), a.max(b));
        assert!(seen.insert(pair), "duplicate Delaunay pair {pair:?}");
    }
}

fn assert_universal_properties_1_to_7(pts: &[Point], rect: (Point, Point)) {
    let d1 = generate(pts, Some(rect)).unwrap();
    assert_cell_closure(&d1);
    assert_neighbor_symmetry(&d1);
    assert_bisector_equidistant(&d1);
    assert_clip_containment(&d1, rect.0, rect.1);
    assert_edge_uniqueness(&d1);

    // Property 7: determinism.
    let d2 = generate(pts, Some(rect)).unwrap();
    let e1: Vec<_> = d1.edges().collect();
    let e2: Vec<_> = d2.edges().collect();
    assert_eq!(e1.len(), e2.len());
    for (a, b) in e1.iter().zip(e2.iter()) {
        assert_eq!(a.site_a, b.site_a);
        assert_eq!(a.site_b, b.site_b);
        assert!(approx_eq(a.p0, b.p0) && approx_eq(a.p1, b.p1));
    }
}

// spec.md S6 literally asserts `d.edges().count() == 10, "including the
// clip-border segments"` — but `edges()` is scoped to bisectors only by
// spec.md line 159 and testable property 6, and clip-border segments are
// never bisectors, so that literal count is unreachable by this (or the
// original C++) implementation. See SPEC_FULL.md §9's resolution. What's
// actually checked here is the one part of S6 that both readings agree
// on: every site's ring has exactly 4 `GraphEdge`s.
#[test]
fn s6_four_cocircular_ish_points_edge_count() {
    let pts = [
        Point::new(0.0, 0.0),
        Point::new(2.0, 0.0),
        Point::new(-2.0, 0.0),
        Point::new(0.0, -2.0),
    ];
    let d = generate(&pts, None).unwrap();
    assert_eq!(d.num_sites(), 4);
    for site in d.sites() {
        assert_eq!(site.cell_edges().count(), 4, "site {} should have 4 GraphEdges", site.index);
    }
    let total: usize = d.sites().map(|s| s.cell_edges().count()).sum();
    assert_eq!(total, 16, "16 GraphEdges across all rings (each boundary/bisector counted per owning site)");
}

#[test]
fn dedup_invariance() {
    let pts = [
        Point::new(1.0, 1.0),
        Point::new(1.0, 1.0),
        Point::new(2.0, 2.0),
        Point::new(2.0, 2.0),
        Point::new(3.0, 1.0),
    ];
    let d = generate(&pts, Some((Point::new(0.0, 0.0), Point::new(10.0, 10.0)))).unwrap();
    assert_eq!(d.num_sites(), 3);
}

fn arb_square_points(max_n: usize) -> impl Strategy<Value = Vec<Point>> {
    proptest::collection::vec((0.0f64..1000.0, 0.0f64..1000.0), 1..max_n)
        .prop_map(|v| v.into_iter().map(|(x, y)| Point::new(x, y)).collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// P1: N random points in a square satisfy properties 1-7.
    #[test]
    fn p1_random_points_in_square(pts in arb_square_points(30)) {
        assert_universal_properties_1_to_7(&pts, (Point::new(0.0, 0.0), Point::new(1000.0, 1000.0)));
    }

    /// P3: N collinear points only form interior bisectors perpendicular to
    /// the line, and only adjacent pairs (by position along the line) share
    /// an edge.
    #[test]
    fn p3_collinear_points_only_adjacent_pairs_share_edges(n in 3usize..12, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut xs: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..1000.0)).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        xs.dedup_by(|a, b| (*a - *b).abs() < 1e-6);
        prop_assume!(xs.len() >= 3);
        let pts: Vec<Point> = xs.iter().map(|&x| Point::new(x, 500.0)).collect();
        let d = generate(&pts, Some((Point::new(0.0, 0.0), Point::new(1000.0, 1000.0)))).unwrap();

        for e in d.edges() {
            prop_assert!(e.site_b == e.site_a + 1, "collinear sites should only share edges with their immediate neighbor");
            let dx = (e.p1.x - e.p0.x) as f64;
            let dy = (e.p1.y - e.p0.y) as f64;
            // perpendicular to the (horizontal) line means the bisector is
            // vertical: dx ~ 0 (unless the segment degenerates to the clip
            // corner, which collinear horizontal sites never produce here).
            prop_assert!(dx.abs() < 1e-3 * (dx.abs() + dy.abs() + 1.0));
        }
    }
}

#[test]
fn p2_points_on_circle_consecutive_by_angle_are_delaunay_adjacent() {
    let n = 8;
    let radius = 100.0;
    let pts: Vec<Point> = (0..n)
        .map(|i| {
            let theta = (i as f64) * std::f64::consts::TAU / (n as f64);
            Point::new(radius * theta.cos(), radius * theta.sin())
        })
        .collect();
    let d = generate(
        &pts,
        Some((Point::new(-200.0, -200.0), Point::new(200.0, 200.0))),
    )
    .unwrap();

    let mut adjacency = vec![std::collections::HashSet::new(); n];
    for de in d.delaunay_edges() {
        let (a, b) = (de.a.0 as usize, de.b.0 as usize);
        adjacency[a].insert(b);
        adjacency[b].insert(a);
    }
    for i in 0..n {
        let next = (i + 1) % n;
        assert!(
            adjacency[i].contains(&next),
            "consecutive-by-angle sites {i} and {next} should be Delaunay-adjacent"
        );
    }
}
