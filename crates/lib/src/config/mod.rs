//! Global build settings and the append-only accumulator that builds them.
//!
//! Descriptors never see a [`BuildConfig`] directly: every contribution goes through
//! a [`ConfigAccumulator`], which only appends (option lists) or overwrites
//! (single-valued settings). Once composition finishes the accumulator is
//! consumed by [`ConfigAccumulator::finalize`] and the resulting [`BuildConfig`]
//! is read-only.

mod accumulator;
mod types;

pub use accumulator::ConfigAccumulator;
pub use types::*;
