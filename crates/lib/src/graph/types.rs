use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A reference to a sub-project descriptor, as written in its parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectReference {
  pub path: String,
}

impl ProjectReference {
  pub fn new(path: impl Into<String>) -> Self {
    Self { path: path.into() }
  }
}

impl fmt::Display for ProjectReference {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.path)
  }
}

impl From<&str> for ProjectReference {
  fn from(path: &str) -> Self {
    Self::new(path)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
  Exe,
  Lib,
  Dll,
}

impl FromStr for TargetKind {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "exe" => Ok(Self::Exe),
      "lib" => Ok(Self::Lib),
      "dll" => Ok(Self::Dll),
      other => Err(format!("unknown target kind '{}' (expected 'exe', 'lib' or 'dll')", other)),
    }
  }
}

impl fmt::Display for TargetKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::Exe => "exe",
      Self::Lib => "lib",
      Self::Dll => "dll",
    };
    write!(f, "{}", s)
  }
}

/// The binary a project descriptor builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDecl {
  pub name: String,
  pub kind: TargetKind,
  /// Source files, relative to the descriptor's directory.
  pub sources: Vec<String>,
}

/// Settings that apply to one unit only.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalConfig {
  pub include_paths: Vec<String>,
  pub compiler_options: Vec<String>,
  pub linker_options: Vec<String>,
  pub libs: Vec<String>,
}

impl LocalConfig {
  pub fn is_empty(&self) -> bool {
    self.include_paths.is_empty()
      && self.compiler_options.is_empty()
      && self.linker_options.is_empty()
      && self.libs.is_empty()
  }
}

/// One evaluated sub-project, ready for the build executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedUnit {
  /// The reference as declared by the parent.
  pub reference: String,
  /// Canonical path of the evaluated descriptor.
  pub descriptor: PathBuf,
  /// Declared reference of the parent descriptor, `None` at top level.
  pub parent: Option<String>,
  /// Nesting depth, 0 for references declared by the root.
  pub depth: usize,
  pub target: Option<TargetDecl>,
  pub local: LocalConfig,
}
