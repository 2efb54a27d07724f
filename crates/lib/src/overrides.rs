//! Choice between a local override descriptor and the built-in defaults.
//!
//! The choice is made once per run, before any defaults-governed field is written.
//! Exactly one of the two sources then owns `runtime_mode`, `show_brief` and
//! `obj_placement` for the rest of the run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{ConfigAccumulator, ObjPlacement, RuntimeMode};

/// Where the defaults-governed fields come from in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "path", rename_all = "snake_case")]
pub enum DefaultsSource {
  /// The override descriptor at this path is evaluated and owns the fields.
  LocalOverride(PathBuf),
  /// The built-in defaults are applied and no override is evaluated.
  BuiltinDefaults,
}

impl DefaultsSource {
  pub fn is_override(&self) -> bool {
    matches!(self, Self::LocalOverride(_))
  }
}

/// Resolve the defaults source for a run rooted at `run_dir`.
///
/// Only existence is checked; a malformed override surfaces later when it is evaluated.
pub fn resolve(run_dir: &Path, file_name: &str) -> DefaultsSource {
  let candidate = run_dir.join(file_name);
  if candidate.is_file() {
    info!(path = %candidate.display(), "using local override descriptor");
    DefaultsSource::LocalOverride(candidate)
  } else {
    debug!(path = %candidate.display(), "no local override, using built-in defaults");
    DefaultsSource::BuiltinDefaults
  }
}

/// Values written when no override is present.
///
/// Applying them always enables brief output along with the two fields below,
/// so the built-in source never leaves a governed field unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltinDefaults {
  pub runtime_mode: RuntimeMode,
  pub obj_placement: ObjPlacement,
}

impl Default for BuiltinDefaults {
  fn default() -> Self {
    Self {
      runtime_mode: RuntimeMode::Release,
      obj_placement: ObjPlacement::RuntimeSubdir {
        root: "target".to_string(),
      },
    }
  }
}

impl BuiltinDefaults {
  /// Write all defaults-governed fields at once.
  pub fn apply(&self, config: &mut ConfigAccumulator) {
    config.set_runtime_mode(self.runtime_mode);
    config.enable_show_brief();
    config.set_obj_placement(self.obj_placement.clone());
  }
}
