//! Project graph: references, evaluated units and depth-first traversal.
//!
//! # Traversal order
//!
//! References are evaluated depth-first, pre-order. A descriptor's own
//! contributions land in the accumulator while it runs; the references it queued
//! with `prj.required` are evaluated after it returns, each fully (with its own
//! nested references) before the next sibling.
//!
//! # Identity
//!
//! Descriptors are identified by canonical path. Revisiting a path that is on
//! the current evaluation stack is a cycle; revisiting one that finished earlier
//! is skipped.

mod session;
mod traverse;
mod types;

use thiserror::Error;

pub use session::{FrameKind, Session, SharedSession, UnitFrame};
pub use traverse::ProjectGraph;
pub use types::*;

/// Structural errors in the reference graph.
#[derive(Debug, Error)]
pub enum GraphError {
  /// A descriptor requires itself, directly or transitively.
  #[error("reference cycle detected: {chain}")]
  Cycle { chain: String },

  /// Nesting exceeds the configured limit.
  #[error("reference chain too deep (maximum {max}): {chain}")]
  TooDeep { max: usize, chain: String },
}
