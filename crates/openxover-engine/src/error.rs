//! Engine error type.
//!
//! Invalid arguments are returned to the caller and leave the model
//! unmodified. Malformed catalog construction (duplicate topology keys) is a
//! programming error and panics when the lookup table is first built.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A stage position outside the current chain.
    #[error("position {position} is out of range for a chain of {len} stage(s)")]
    PositionOutOfRange { position: usize, len: usize },

    /// A topology key with no catalog entry.
    #[error("unknown topology key `{key}`")]
    UnknownTopology { key: String },

    /// Baseline arrays must be non-empty and of equal length.
    #[error(
        "baseline arrays have mismatched shapes: {frequencies} frequencies, \
         {magnitudes} magnitudes, {phases} phases"
    )]
    BaselineShape {
        frequencies: usize,
        magnitudes: usize,
        phases: usize,
    },
}
