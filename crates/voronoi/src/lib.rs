//! Voronoi diagrams and their dual Delaunay triangulation, computed with
//! Fortune's sweepline algorithm over a single arena.
//!
//! The entry points are [`generate`], [`generate_in_polygon`], and the
//! lower-level [`generate_with`] for a custom clipper or allocator. All
//! three return a [`Diagram`], which owns every record the sweep produced
//! and releases them on [`Diagram::free`] or `Drop`.

mod alloc;
mod arena;
mod beachline;
mod cell;
mod clip;
mod delaunay;
mod diagram;
mod error;
mod numeric;
mod queue;
mod sweep;

pub use alloc::{AllocError, BlockAllocator, SystemAllocator};
pub use clip::{Clipper, PolygonClipper, RectClipper};
pub use delaunay::DelaunayEdge;
pub use diagram::{generate, generate_in_polygon, generate_with, CellEdge, Diagram, SiteView, VoronoiEdge};
pub use error::GenerateError;
pub use numeric::{Point, Real};

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
