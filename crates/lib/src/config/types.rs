//! Build configuration types.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Runtime flavour the native toolchain builds for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
  Debug,
  Release,
}

impl RuntimeMode {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Debug => "debug",
      Self::Release => "release",
    }
  }
}

impl fmt::Display for RuntimeMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for RuntimeMode {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "debug" => Ok(Self::Debug),
      "release" => Ok(Self::Release),
      other => Err(format!("unknown runtime mode '{}' (expected 'debug' or 'release')", other)),
    }
  }
}

/// Where object files and linked targets are placed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjPlacement {
  /// Objects next to their sources, targets in the descriptor directory.
  Default,
  /// Objects in a fixed subdirectory of each source directory.
  SourceSubdir { subdir: String },
  /// Everything under `<root>/<runtime mode>`, objects in its `_objs` tree.
  RuntimeSubdir { root: String },
}

impl ObjPlacement {
  /// Directory for object files compiled from sources in `source_dir`.
  ///
  /// `source_dir` is relative to the run directory.
  pub fn obj_dir(&self, source_dir: &Path, mode: Option<RuntimeMode>) -> PathBuf {
    match self {
      Self::Default => source_dir.to_path_buf(),
      Self::SourceSubdir { subdir } => source_dir.join(subdir),
      Self::RuntimeSubdir { root } => Path::new(root)
        .join(mode_dir(mode))
        .join("_objs")
        .join(source_dir),
    }
  }

  /// Directory for linked targets of a unit declared in `source_dir`.
  pub fn target_dir(&self, source_dir: &Path, mode: Option<RuntimeMode>) -> PathBuf {
    match self {
      Self::Default | Self::SourceSubdir { .. } => source_dir.to_path_buf(),
      Self::RuntimeSubdir { root } => Path::new(root).join(mode_dir(mode)),
    }
  }
}

fn mode_dir(mode: Option<RuntimeMode>) -> &'static str {
  mode.map(|m| m.as_str()).unwrap_or("default")
}

impl fmt::Display for ObjPlacement {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Default => write!(f, "default"),
      Self::SourceSubdir { subdir } => write!(f, "source_subdir({})", subdir),
      Self::RuntimeSubdir { root } => write!(f, "runtime_subdir({})", root),
    }
  }
}

/// The finalized global build configuration.
///
/// Option lists keep insertion order and may hold duplicates; native toolchains
/// tolerate repeated flags and a later flag may deliberately override an
/// earlier one, so nothing here sorts or deduplicates.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
  pub include_paths: Vec<String>,
  pub compiler_options: Vec<String>,
  pub linker_options: Vec<String>,
  /// Preprocessor defines, `NAME` or `NAME=VALUE`.
  pub defines: Vec<String>,
  pub cpp_std: Option<String>,
  /// Unset until a defaults source writes it.
  pub runtime_mode: Option<RuntimeMode>,
  pub obj_placement: Option<ObjPlacement>,
  /// Informational: ask the executor for a brief build summary.
  pub show_brief: bool,
}

impl BuildConfig {
  /// Placement in effect, falling back to [`ObjPlacement::Default`].
  pub fn effective_placement(&self) -> ObjPlacement {
    self.obj_placement.clone().unwrap_or(ObjPlacement::Default)
  }
}
