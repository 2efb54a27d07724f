//! Errors surfaced by a composition run.
//!
//! Every variant that concerns a project reference carries the reference as
//! written, its 1-based position among its siblings and the chain of
//! descriptors that led to it, so a front end can print an actionable message.

use std::path::PathBuf;

use mlua::prelude::*;
use thiserror::Error;

use crate::graph::GraphError;

/// Errors loading the root composite descriptor.
#[derive(Debug, Error)]
pub enum RootError {
  #[error("root descriptor not found: {}", .path.display())]
  NotFound { path: PathBuf },

  #[error("failed to evaluate root descriptor {}", .path.display())]
  Lua {
    path: PathBuf,
    #[source]
    source: LuaError,
  },

  #[error("run directory not found: {}", .path.display())]
  RunDirNotFound { path: PathBuf },

  #[error("root descriptor {} must return a table", .path.display())]
  NotATable { path: PathBuf },

  #[error("root descriptor {}: field '{field}' {message}", .path.display())]
  InvalidField {
    path: PathBuf,
    field: String,
    message: String,
  },
}

#[derive(Debug, Error)]
pub enum ComposeError {
  #[error(transparent)]
  Root(#[from] RootError),

  /// A reference does not resolve to a descriptor file.
  #[error("project descriptor '{path}' not found at {} (reference #{position} in {chain})", .resolved.display())]
  ReferenceNotFound {
    path: String,
    resolved: PathBuf,
    position: usize,
    chain: String,
  },

  /// A descriptor raised an error while being evaluated.
  #[error("failed to evaluate project descriptor '{path}' (reference #{position} in {chain})")]
  Descriptor {
    path: String,
    position: usize,
    chain: String,
    #[source]
    source: LuaError,
  },

  #[error(transparent)]
  Graph(#[from] GraphError),

  /// The local override, or something it requires, failed. There is no fallback
  /// to the built-in defaults once an override is present.
  #[error("local override descriptor {} failed", .path.display())]
  MalformedOverride {
    path: PathBuf,
    #[source]
    source: Box<ComposeError>,
  },

  /// Runtime setup failed before any descriptor ran.
  #[error("lua runtime error: {0}")]
  Lua(#[from] LuaError),
}
