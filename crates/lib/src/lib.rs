//! prjcomp-lib: build composition engine
//!
//! This crate turns a tree of build descriptors into one resolved build plan:
//! - `CompositeTarget`: the root that orchestrates a composition run
//! - `ConfigAccumulator` / `BuildConfig`: append-only global build settings
//! - `ToolsetRule`: toolset-conditional option contributions
//! - `DefaultsSource`: local override versus built-in defaults
//! - `ProjectGraph`: depth-first traversal of required sub-projects
//! - `BuildPlan`: the finalized configuration and ordered units

pub mod compose;
pub mod config;
pub mod consts;
pub mod error;
pub mod graph;
pub mod lua;
pub mod overrides;
pub mod plan;
pub mod toolset;
pub mod util;
