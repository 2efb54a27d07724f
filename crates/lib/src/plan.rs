//! The output of a composition run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::BuildConfig;
use crate::graph::ResolvedUnit;
use crate::overrides::DefaultsSource;
use crate::toolset::Toolset;
use crate::util::hash::Hashable;

/// A finalized build configuration plus the ordered units to build.
///
/// Handed to the external build executor as-is; nothing mutates it after
/// composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
  pub name: Option<String>,
  pub toolset: Toolset,
  pub run_dir: PathBuf,
  pub defaults: DefaultsSource,
  pub config: BuildConfig,
  pub units: Vec<ResolvedUnit>,
}

impl Hashable for BuildPlan {}

impl BuildPlan {
  /// Declared references of all units, in build order.
  pub fn references(&self) -> Vec<&str> {
    self.units.iter().map(|u| u.reference.as_str()).collect()
  }

  /// Find a unit by its declared reference.
  pub fn unit(&self, reference: &str) -> Option<&ResolvedUnit> {
    self.units.iter().find(|u| u.reference == reference)
  }

  /// Directory of a unit's descriptor, relative to the run directory.
  pub fn source_dir(&self, unit: &ResolvedUnit) -> PathBuf {
    let dir = unit.descriptor.parent().unwrap_or(Path::new(""));
    dir.strip_prefix(&self.run_dir).unwrap_or(dir).to_path_buf()
  }

  /// Where object files of `unit` go under the effective placement.
  pub fn obj_dir(&self, unit: &ResolvedUnit) -> PathBuf {
    self
      .config
      .effective_placement()
      .obj_dir(&self.source_dir(unit), self.config.runtime_mode)
  }

  /// Where the linked target of `unit` goes under the effective placement.
  pub fn target_dir(&self, unit: &ResolvedUnit) -> PathBuf {
    self
      .config
      .effective_placement()
      .target_dir(&self.source_dir(unit), self.config.runtime_mode)
  }
}
