//! Lua runtime for descriptor evaluation.
//!
//! # Submodules
//!
//! - [`globals`] - The `prj` table descriptors use to contribute settings
//! - [`loaders`] - File loading with a per-file environment carrying `__dir`
//! - [`runtime`] - Runtime construction for one composition run

pub mod globals;
pub mod loaders;
pub mod runtime;
