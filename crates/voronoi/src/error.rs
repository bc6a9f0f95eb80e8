//! Error taxonomy for the public surface.
//!
//! References
//! - spec.md §7.
//! - The `thiserror` derive and `#[error("...")]` style are grounded on
//!   `logannye-tinyzkp`'s `src/pcs.rs`, not on this teacher crate: the
//!   teacher's own `geom4::volume::VolumeError`/`rand4::GeneratorError`
//!   are hand-rolled enums with manual `Display`/`Error` impls, chosen
//!   there specifically to avoid an external dependency for this concern.

use crate::alloc::AllocError;

/// Everything that can keep [`crate::diagram::generate`] from producing a
/// diagram.
///
/// Numerical near-degeneracy (collinear sites, cocircular quadruples) is
/// deliberately not a variant here: spec.md §7 treats it as resolved by
/// epsilon tolerances and deterministic tie-breaking, not as an error.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// A site coordinate was NaN or infinite. Rejected before sorting.
    #[error("site {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    /// An explicit clip rectangle had `min >= max` on some axis.
    #[error("clip rectangle is empty or inverted: min={min:?} max={max:?}")]
    InvalidClipRect {
        min: crate::numeric::Point,
        max: crate::numeric::Point,
    },

    /// A convex-polygon clipper was given fewer than 3 vertices.
    #[error("convex polygon clipper needs at least 3 vertices, got {len}")]
    DegenerateClipper { len: usize },

    /// The arena could not grow a slab to satisfy an allocation.
    #[error("arena allocation failed: {0}")]
    Alloc(#[from] AllocError),
}
