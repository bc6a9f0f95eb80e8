//! The arena: a single owner for every record in a diagram.
//!
//! Purpose
//! - Translate the historical bump-block-plus-free-list allocator
//!   (`examples/original_source/src/voronoi.cpp`: `alloc`, `alloc_edge`,
//!   `alloc_halfedge`, `delete_edge`, `delete_halfedge`) into the safe
//!   equivalent recommended by spec.md §9: typed slabs (`Vec<T>`) addressed
//!   by 32-bit indices, with `Option<Id>` replacing nullable pointers.
//! - `Site`/`Edge`/`HalfEdge`/`GraphEdge` all live in exactly one `Arena`;
//!   cross-references between them are plain `Id` values, never borrows, so
//!   the sweep can freely link and unlink without fighting the borrow
//!   checker.
//!
//! Freeing discipline (spec.md §4.2): `Edge` and `HalfEdge` are the only
//! two record types ever reclaimed mid-sweep (a beachline arc disappears at
//! a circle event and its two bounding half-edges go back to the pool).
//! `Site` and `GraphEdge` live for the whole diagram. There is no per-record
//! free function on the arena itself — `free_edge`/`free_half_edge` push
//! onto a small index stack that `alloc_edge`/`alloc_half_edge` consult
//! first, mirroring the original's free-list-before-bump-pointer order.

use crate::alloc::{AllocError, BlockAllocator, SystemAllocator};
use crate::numeric::{Point, Real};

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub struct $name(pub u32);

        impl $name {
            #[inline]
            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

define_id!(SiteId);
define_id!(EdgeId);
define_id!(HalfEdgeId);
define_id!(GraphEdgeId);

/// Which site a half-edge calls its "left" neighbor (spec.md §3's
/// direction bit).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left = 0,
    Right = 1,
}

impl Direction {
    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    #[inline]
    pub(crate) fn as_index(self) -> usize {
        self as usize
    }
}

/// One input site.
#[derive(Clone, Debug)]
pub struct Site {
    pub p: Point,
    /// Stable index into the final, deduplicated, sorted site sequence
    /// (spec.md §3: "restored to 0..M-1 after sorting").
    pub index: u32,
    /// Head of this site's `GraphEdge` ring, built at finalization.
    pub edges: Option<GraphEdgeId>,
}

/// A bisector between two sites, held as the line `a*x + b*y = c` with
/// `a == 1` or `b == 1` (spec.md §3).
#[derive(Clone, Debug)]
pub struct Edge {
    pub sites: [SiteId; 2],
    /// Endpoints. `None` means "extends to infinity on this side" — the
    /// explicit replacement for the historical `x == -1` sentinel (spec.md
    /// §9's first Open Question).
    pub pos: [Option<Point>; 2],
    pub a: Real,
    pub b: Real,
    pub c: Real,
    pub next: Option<EdgeId>,
}

impl Edge {
    /// Build the bisector of `s1`/`s2` (the historical `Edge::create`).
    pub(crate) fn between(s1: SiteId, s2: SiteId, p1: Point, p2: Point) -> Self {
        let dx = p2.x - p1.x;
        let dy = p2.y - p1.y;
        let mut c = dx * (p1.x + dx * 0.5) + dy * (p1.y + dy * 0.5);
        let (a, b);
        if crate::numeric::abs(dx) > crate::numeric::abs(dy) {
            a = 1.0;
            b = dy / dx;
            c /= dx;
        } else {
            a = dx / dy;
            b = 1.0;
            c /= dy;
        }
        Edge {
            sites: [s1, s2],
            pos: [None, None],
            a,
            b,
            c,
            next: None,
        }
    }
}

/// One side of a bisector, acting as a beachline arc boundary.
#[derive(Clone, Debug)]
pub struct HalfEdge {
    pub edge: Option<EdgeId>,
    pub direction: Direction,
    pub prev: Option<HalfEdgeId>,
    pub next: Option<HalfEdgeId>,
    /// Pending circle-event vertex and its event-y, valid only while this
    /// half-edge sits in the priority queue.
    pub vertex: Point,
    pub y: Real,
    /// 1-based slot index in the priority queue's heap array; 0 means "not
    /// queued". Mirrors the historical `pqpos` field.
    pub pq_pos: usize,
}

impl HalfEdge {
    fn new(edge: Option<EdgeId>, direction: Direction) -> Self {
        HalfEdge {
            edge,
            direction,
            prev: None,
            next: None,
            vertex: Point::new(0.0, 0.0),
            y: 0.0,
            pq_pos: 0,
        }
    }
}

/// A half-edge decorated with clipped endpoints and attached to one site's
/// ring (spec.md §3).
#[derive(Clone, Debug)]
pub struct GraphEdge {
    pub site: SiteId,
    pub neighbor: Option<SiteId>,
    pub edge: Option<EdgeId>,
    pub p0: Point,
    pub p1: Point,
    pub next: Option<GraphEdgeId>,
}

/// Owner of every record produced while generating one diagram.
pub struct Arena {
    allocator: Box<dyn BlockAllocator>,
    sites: Vec<Site>,
    edges: Vec<Edge>,
    half_edges: Vec<HalfEdge>,
    graph_edges: Vec<GraphEdge>,
    edge_free: Vec<EdgeId>,
    half_edge_free: Vec<HalfEdgeId>,
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("sites", &self.sites.len())
            .field("edges", &self.edges.len())
            .field("half_edges", &self.half_edges.len())
            .field("graph_edges", &self.graph_edges.len())
            .finish()
    }
}

/// One slab growth request, in bytes, used to probe the [`BlockAllocator`]
/// before `try_reserve`. Matches spec.md §4.2's "at least 16 KiB or the
/// request, whichever is larger" block-sizing rule.
const MIN_BLOCK_BYTES: usize = 16 * 1024;

fn grow<T>(
    allocator: &dyn BlockAllocator,
    vec: &mut Vec<T>,
    additional: usize,
) -> Result<(), AllocError> {
    if vec.capacity() - vec.len() >= additional {
        return Ok(());
    }
    let elem_bytes = std::mem::size_of::<T>().max(1);
    let requested = (additional * elem_bytes).max(MIN_BLOCK_BYTES);
    allocator.grow(requested)?;
    let extra_elems = (requested / elem_bytes).max(additional);
    vec.try_reserve(extra_elems)
        .map_err(|_| AllocError { requested_bytes: requested })
}

impl Arena {
    pub fn new() -> Self {
        Self::with_allocator(Box::new(SystemAllocator))
    }

    pub fn with_allocator(allocator: Box<dyn BlockAllocator>) -> Self {
        Arena {
            allocator,
            sites: Vec::new(),
            edges: Vec::new(),
            half_edges: Vec::new(),
            graph_edges: Vec::new(),
            edge_free: Vec::new(),
            half_edge_free: Vec::new(),
        }
    }

    pub(crate) fn alloc_site(&mut self, p: Point, index: u32) -> Result<SiteId, AllocError> {
        grow(self.allocator.as_ref(), &mut self.sites, 1)?;
        let id = SiteId(self.sites.len() as u32);
        self.sites.push(Site { p, index, edges: None });
        Ok(id)
    }

    pub(crate) fn alloc_edge(&mut self, e: Edge) -> Result<EdgeId, AllocError> {
        if let Some(id) = self.edge_free.pop() {
            self.edges[id.index()] = e;
            return Ok(id);
        }
        grow(self.allocator.as_ref(), &mut self.edges, 1)?;
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(e);
        Ok(id)
    }

    pub(crate) fn free_edge(&mut self, id: EdgeId) {
        self.edge_free.push(id);
    }

    pub(crate) fn alloc_half_edge(
        &mut self,
        edge: Option<EdgeId>,
        direction: Direction,
    ) -> Result<HalfEdgeId, AllocError> {
        let rec = HalfEdge::new(edge, direction);
        if let Some(id) = self.half_edge_free.pop() {
            self.half_edges[id.index()] = rec;
            return Ok(id);
        }
        grow(self.allocator.as_ref(), &mut self.half_edges, 1)?;
        let id = HalfEdgeId(self.half_edges.len() as u32);
        self.half_edges.push(rec);
        Ok(id)
    }

    pub(crate) fn free_half_edge(&mut self, id: HalfEdgeId) {
        self.half_edge_free.push(id);
    }

    pub(crate) fn alloc_graph_edge(&mut self, ge: GraphEdge) -> Result<GraphEdgeId, AllocError> {
        grow(self.allocator.as_ref(), &mut self.graph_edges, 1)?;
        let id = GraphEdgeId(self.graph_edges.len() as u32);
        self.graph_edges.push(ge);
        Ok(id)
    }

    #[inline]
    pub(crate) fn site(&self, id: SiteId) -> &Site {
        &self.sites[id.index()]
    }
    #[inline]
    pub(crate) fn site_mut(&mut self, id: SiteId) -> &mut Site {
        &mut self.sites[id.index()]
    }
    #[inline]
    pub(crate) fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }
    #[inline]
    pub(crate) fn edge_mut(&mut self, id: EdgeId) -> &mut Edge {
        &mut self.edges[id.index()]
    }
    #[inline]
    pub(crate) fn half_edge(&self, id: HalfEdgeId) -> &HalfEdge {
        &self.half_edges[id.index()]
    }
    #[inline]
    pub(crate) fn half_edge_mut(&mut self, id: HalfEdgeId) -> &mut HalfEdge {
        &mut self.half_edges[id.index()]
    }
    #[inline]
    pub(crate) fn graph_edge(&self, id: GraphEdgeId) -> &GraphEdge {
        &self.graph_edges[id.index()]
    }
    #[inline]
    pub(crate) fn graph_edge_mut(&mut self, id: GraphEdgeId) -> &mut GraphEdge {
        &mut self.graph_edges[id.index()]
    }

    #[inline]
    pub(crate) fn sites_slice(&self) -> &[Site] {
        &self.sites
    }

    pub(crate) fn num_sites(&self) -> usize {
        self.sites.len()
    }

    /// Total number of `Edge` records ever allocated, including any
    /// recycled through `free_edge`. Bisectors are never actually freed by
    /// the sweep (only half-edges are), so this doubles as "every bisector
    /// the sweep ever created" — what `delaunay.rs` iterates over.
    pub(crate) fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Releases every slab. Leaves the arena in the same state as
    /// [`Arena::new`] — safe to call more than once.
    pub(crate) fn clear(&mut self) {
        self.sites.clear();
        self.edges.clear();
        self.half_edges.clear();
        self.graph_edges.clear();
        self.edge_free.clear();
        self.half_edge_free.clear();
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}
