//! Composite target orchestration.
//!
//! [`CompositeTarget::compose`] runs one composition:
//! 1. Creates a fresh accumulator and Lua runtime bound to the toolset
//! 2. Loads the root descriptor table (when the target comes from a file)
//! 3. Applies the root's own global settings
//! 4. Applies the toolset-conditional rules
//! 5. Resolves the defaults source once, then either applies the built-in
//!    defaults or evaluates the local override
//! 6. Traverses the required references in declaration order
//! 7. Finalizes the configuration into a read-only [`BuildPlan`]
//!
//! # Example
//! ```ignore
//! use std::path::Path;
//! use prjcomp_lib::compose::{ComposeOptions, CompositeTarget};
//! use prjcomp_lib::toolset::Toolset;
//!
//! let target = CompositeTarget::load(Path::new("build.lua"))?;
//! let plan = target.compose(&Toolset::new("gcc"), &ComposeOptions::default())?;
//! for unit in &plan.units {
//!   println!("{}", unit.reference);
//! }
//! ```

use std::path::{Path, PathBuf};

use mlua::prelude::*;
use tracing::{debug, info, warn};

use crate::config::ConfigAccumulator;
use crate::consts::{MAX_REQUIRE_DEPTH, OVERRIDE_FILE_NAME};
use crate::error::{ComposeError, RootError};
use crate::graph::{ProjectGraph, ProjectReference, Session};
use crate::lua::{loaders, runtime};
use crate::overrides::{self, BuiltinDefaults, DefaultsSource};
use crate::plan::BuildPlan;
use crate::toolset::{Contribution, Toolset, ToolsetPredicate, ToolsetRule, apply_rules, builtin_rules};

/// Knobs for a composition run that are not part of any descriptor.
#[derive(Debug, Clone)]
pub struct ComposeOptions {
  /// Maximum nesting of required references.
  pub max_depth: usize,
  /// Values written when no local override is present.
  pub defaults: BuiltinDefaults,
}

impl Default for ComposeOptions {
  fn default() -> Self {
    Self {
      max_depth: MAX_REQUIRE_DEPTH,
      defaults: BuiltinDefaults::default(),
    }
  }
}

/// The declarative content of a root composite descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeSpec {
  pub name: Option<String>,
  pub cpp_std: Option<String>,
  pub include_paths: Vec<String>,
  pub compiler_options: Vec<String>,
  pub linker_options: Vec<String>,
  /// Whether [`builtin_rules`] apply before `rules`.
  pub builtin_rules: bool,
  pub rules: Vec<ToolsetRule>,
  /// Override file name, relative to the run directory.
  pub override_file: String,
  pub required: Vec<ProjectReference>,
}

impl Default for CompositeSpec {
  fn default() -> Self {
    Self {
      name: None,
      cpp_std: None,
      include_paths: Vec::new(),
      compiler_options: Vec::new(),
      linker_options: Vec::new(),
      builtin_rules: true,
      rules: Vec::new(),
      override_file: OVERRIDE_FILE_NAME.to_string(),
      required: Vec::new(),
    }
  }
}

const ROOT_FIELDS: &[&str] = &[
  "name",
  "cpp_std",
  "include_paths",
  "compiler_options",
  "linker_options",
  "builtin_rules",
  "rules",
  "override",
  "required",
];

impl CompositeSpec {
  /// Parse the table returned by a root descriptor.
  ///
  /// Errors are `(field, message)` pairs.
  pub fn from_lua_table(table: &LuaTable) -> Result<Self, (String, String)> {
    for pair in table.pairs::<LuaValue, LuaValue>() {
      let (key, _) = pair.map_err(|e| ("<table>".to_string(), e.to_string()))?;
      let key = match key {
        LuaValue::String(s) => s.to_string_lossy(),
        other => return Err((format!("{:?}", other), "is not a valid field name".to_string())),
      };
      if !ROOT_FIELDS.contains(&key.as_str()) {
        return Err((key, "is not a recognised root field".to_string()));
      }
    }

    let mut spec = Self {
      name: optional_string(table, "name")?,
      cpp_std: optional_string(table, "cpp_std")?,
      include_paths: string_list(table, "include_paths")?,
      compiler_options: string_list(table, "compiler_options")?,
      linker_options: string_list(table, "linker_options")?,
      rules: parse_rules(table)?,
      required: string_list(table, "required")?
        .into_iter()
        .map(ProjectReference::new)
        .collect(),
      ..Self::default()
    };

    match table.get::<LuaValue>("builtin_rules") {
      Ok(LuaValue::Nil) => {}
      Ok(LuaValue::Boolean(b)) => spec.builtin_rules = b,
      _ => return Err(("builtin_rules".to_string(), "must be a boolean".to_string())),
    }
    if let Some(file) = optional_string(table, "override")? {
      spec.override_file = file;
    }

    Ok(spec)
  }
}

fn optional_string(table: &LuaTable, field: &str) -> Result<Option<String>, (String, String)> {
  match table.get::<LuaValue>(field) {
    Ok(LuaValue::Nil) => Ok(None),
    Ok(LuaValue::String(s)) => Ok(Some(s.to_string_lossy())),
    _ => Err((field.to_string(), "must be a string".to_string())),
  }
}

fn string_list(table: &LuaTable, field: &str) -> Result<Vec<String>, (String, String)> {
  let invalid = || (field.to_string(), "must be an array of strings".to_string());
  match table.get::<LuaValue>(field) {
    Ok(LuaValue::Nil) => Ok(Vec::new()),
    Ok(LuaValue::Table(t)) => {
      let mut values = Vec::new();
      for value in t.sequence_values::<LuaValue>() {
        match value.map_err(|_| invalid())? {
          LuaValue::String(s) => values.push(s.to_string_lossy()),
          _ => return Err(invalid()),
        }
      }
      Ok(values)
    }
    _ => Err(invalid()),
  }
}

/// Parse `rules = { { toolsets = {..}, compiler_options = {..}, ... }, ... }`.
fn parse_rules(table: &LuaTable) -> Result<Vec<ToolsetRule>, (String, String)> {
  let invalid = |msg: &str| ("rules".to_string(), msg.to_string());
  let rules = match table.get::<LuaValue>("rules") {
    Ok(LuaValue::Nil) => return Ok(Vec::new()),
    Ok(LuaValue::Table(t)) => t,
    _ => return Err(invalid("must be an array of rule tables")),
  };

  let mut parsed = Vec::new();
  for rule in rules.sequence_values::<LuaValue>() {
    let rule = match rule {
      Ok(LuaValue::Table(t)) => t,
      _ => return Err(invalid("must be an array of rule tables")),
    };
    let toolsets = string_list(&rule, "toolsets")?;
    if toolsets.is_empty() {
      return Err(invalid("each rule needs a non-empty 'toolsets' list"));
    }

    let mut contributions = Vec::new();
    contributions.extend(string_list(&rule, "include_paths")?.into_iter().map(Contribution::IncludePath));
    contributions.extend(
      string_list(&rule, "compiler_options")?
        .into_iter()
        .map(Contribution::CompilerOption),
    );
    contributions.extend(string_list(&rule, "linker_options")?.into_iter().map(Contribution::LinkerOption));
    parsed.push(ToolsetRule::new(ToolsetPredicate::any_of(toolsets), contributions));
  }
  Ok(parsed)
}

#[derive(Debug, Clone)]
enum RootSource {
  Descriptor(PathBuf),
  Spec(CompositeSpec),
}

/// The root of a composition: where its spec comes from and its run directory.
#[derive(Debug, Clone)]
pub struct CompositeTarget {
  source: RootSource,
  run_dir: PathBuf,
}

impl CompositeTarget {
  /// A composite target defined by the root descriptor at `path`.
  ///
  /// The run directory is the descriptor's directory. The descriptor itself is
  /// evaluated on every [`compose`](Self::compose) call.
  pub fn load(path: &Path) -> Result<Self, ComposeError> {
    let canonical = dunce::canonicalize(path).map_err(|_| RootError::NotFound {
      path: path.to_path_buf(),
    })?;
    if !canonical.is_file() {
      return Err(RootError::NotFound {
        path: path.to_path_buf(),
      }
      .into());
    }
    let run_dir = canonical.parent().unwrap_or(Path::new(".")).to_path_buf();
    Ok(Self {
      source: RootSource::Descriptor(canonical),
      run_dir,
    })
  }

  /// A composite target built from an in-memory spec, run in `run_dir`.
  pub fn new(spec: CompositeSpec, run_dir: &Path) -> Result<Self, ComposeError> {
    let run_dir = match dunce::canonicalize(run_dir) {
      Ok(dir) if dir.is_dir() => dir,
      _ => {
        return Err(
          RootError::RunDirNotFound {
            path: run_dir.to_path_buf(),
          }
          .into(),
        );
      }
    };
    Ok(Self {
      source: RootSource::Spec(spec),
      run_dir,
    })
  }

  pub fn run_dir(&self) -> &Path {
    &self.run_dir
  }

  /// Run one composition for `toolset`.
  ///
  /// Composition is a pure function of the descriptors on disk, the toolset and
  /// `options`: composing twice with the same inputs yields equal plans.
  pub fn compose(&self, toolset: &Toolset, options: &ComposeOptions) -> Result<BuildPlan, ComposeError> {
    info!(toolset = %toolset, run_dir = %self.run_dir.display(), "composing build");

    let session = Session::shared();
    let (spec, defaults, units) = {
      let lua = runtime::create_runtime(session.clone(), toolset, &self.run_dir)?;

      let (spec, root_label, root_path) = match &self.source {
        RootSource::Descriptor(path) => {
          let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
          (load_root(&lua, path)?, label, path.clone())
        }
        RootSource::Spec(spec) => (spec.clone(), "<root>".to_string(), self.run_dir.clone()),
      };

      {
        let mut state = session.borrow_mut();
        let config = &mut state.config;
        apply_root_settings(&spec, config);

        let mut rules = if spec.builtin_rules { builtin_rules() } else { Vec::new() };
        rules.extend(spec.rules.iter().cloned());
        let applied = apply_rules(&rules, toolset, config);
        debug!(applied, "toolset rules applied");
      }

      let defaults = overrides::resolve(&self.run_dir, &spec.override_file);
      let mut graph =
        ProjectGraph::new(&lua, session.clone(), &self.run_dir, options.max_depth).with_root(root_label, root_path);

      let mut units = match &defaults {
        DefaultsSource::BuiltinDefaults => {
          options.defaults.apply(&mut session.borrow_mut().config);
          Vec::new()
        }
        DefaultsSource::LocalOverride(path) => {
          let reference = ProjectReference::new(spec.override_file.as_str());
          let units = graph
            .evaluate_override(&reference)
            .map_err(|e| ComposeError::MalformedOverride {
              path: path.clone(),
              source: Box::new(e),
            })?;
          if session.borrow().config.current().runtime_mode.is_none() {
            warn!(path = %path.display(), "local override did not set a runtime mode");
          }
          units
        }
      };

      units.extend(graph.evaluate_all(&spec.required)?);
      (spec, defaults, units)
    };

    let config = std::mem::take(&mut session.borrow_mut().config).finalize();
    info!(units = units.len(), "composition finished");

    Ok(BuildPlan {
      name: spec.name,
      toolset: toolset.clone(),
      run_dir: self.run_dir.clone(),
      defaults,
      config,
      units,
    })
  }
}

fn apply_root_settings(spec: &CompositeSpec, config: &mut ConfigAccumulator) {
  if let Some(std) = &spec.cpp_std {
    config.set_cpp_std(std.as_str());
  }
  for path in &spec.include_paths {
    config.add_include_path(path.as_str());
  }
  for option in &spec.compiler_options {
    config.add_compiler_option(option.as_str());
  }
  for option in &spec.linker_options {
    config.add_linker_option(option.as_str());
  }
}

/// Evaluate the root descriptor and parse the table it returns.
///
/// No descriptor frame is open while the root runs, so `prj.toolset` can be read
/// but every `prj` function fails.
fn load_root(lua: &Lua, path: &Path) -> Result<CompositeSpec, RootError> {
  let value = loaders::load_file_with_dir(lua, path).map_err(|source| RootError::Lua {
    path: path.to_path_buf(),
    source,
  })?;
  let LuaValue::Table(table) = value else {
    return Err(RootError::NotATable {
      path: path.to_path_buf(),
    });
  };
  CompositeSpec::from_lua_table(&table).map_err(|(field, message)| RootError::InvalidField {
    path: path.to_path_buf(),
    field,
    message,
  })
}
