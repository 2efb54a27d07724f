//! The `prj` global table.
//!
//! Descriptors contribute to a run exclusively through these functions:
//! - `prj.toolset.name`, `prj.run_dir` - read-only run inputs
//! - `prj.global_include_path(p)`, `prj.global_compiler_option(o)`,
//!   `prj.global_linker_option(o)`, `prj.global_define(name [, value])`,
//!   `prj.cpp_std(std)` - global settings
//! - `prj.runtime_mode(mode)`, `prj.show_brief()`, `prj.obj_placement{}` -
//!   defaults-governed settings, override descriptor only
//! - `prj.target{}`, `prj.include_path(p)`, `prj.compiler_option(o)`,
//!   `prj.linker_option(o)`, `prj.lib(name)` - settings of the current unit
//! - `prj.required(path)` - queue a nested project reference
//!
//! Every function needs an active descriptor frame and fails otherwise.

use std::path::Path;

use mlua::prelude::*;

use crate::config::{ConfigAccumulator, ObjPlacement, RuntimeMode};
use crate::graph::{FrameKind, ProjectReference, SharedSession, TargetDecl, TargetKind, UnitFrame};
use crate::toolset::Toolset;

/// Register the `prj` global table in the Lua runtime.
pub fn register_globals(lua: &Lua, session: SharedSession, toolset: &Toolset, run_dir: &Path) -> LuaResult<()> {
  let prj = lua.create_table()?;

  let toolset_table = lua.create_table()?;
  toolset_table.set("name", toolset.name.as_str())?;
  prj.set("toolset", toolset_table)?;
  prj.set("run_dir", run_dir.to_string_lossy().to_string())?;

  // Global settings
  register(lua, &prj, &session, "global_include_path", |_, config, path: String| {
    config.add_include_path(path);
    Ok(())
  })?;
  register(lua, &prj, &session, "global_compiler_option", |_, config, option: String| {
    config.add_compiler_option(option);
    Ok(())
  })?;
  register(lua, &prj, &session, "global_linker_option", |_, config, option: String| {
    config.add_linker_option(option);
    Ok(())
  })?;
  register(
    lua,
    &prj,
    &session,
    "global_define",
    |_, config, (name, value): (String, Option<String>)| {
      config.add_define(&name, value.as_deref());
      Ok(())
    },
  )?;
  register(lua, &prj, &session, "cpp_std", |_, config, std: String| {
    config.set_cpp_std(std);
    Ok(())
  })?;

  // Defaults-governed settings
  register_governed(lua, &prj, &session, "runtime_mode", |config, mode: String| {
    let mode: RuntimeMode = mode.parse().map_err(LuaError::external)?;
    config.set_runtime_mode(mode);
    Ok(())
  })?;
  register_governed(lua, &prj, &session, "show_brief", |config, (): ()| {
    config.enable_show_brief();
    Ok(())
  })?;
  register_governed(lua, &prj, &session, "obj_placement", |config, placement: ObjPlacement| {
    config.set_obj_placement(placement);
    Ok(())
  })?;

  // Unit-local settings
  register(lua, &prj, &session, "target", |frame, _, target: TargetDecl| {
    if let Some(existing) = &frame.target {
      return Err(LuaError::external(format!(
        "target already declared as '{}' in this descriptor",
        existing.name
      )));
    }
    frame.target = Some(target);
    Ok(())
  })?;
  register(lua, &prj, &session, "include_path", |frame, _, path: String| {
    frame.local.include_paths.push(path);
    Ok(())
  })?;
  register(lua, &prj, &session, "compiler_option", |frame, _, option: String| {
    frame.local.compiler_options.push(option);
    Ok(())
  })?;
  register(lua, &prj, &session, "linker_option", |frame, _, option: String| {
    frame.local.linker_options.push(option);
    Ok(())
  })?;
  register(lua, &prj, &session, "lib", |frame, _, name: String| {
    frame.local.libs.push(name);
    Ok(())
  })?;

  // Graph
  register(lua, &prj, &session, "required", |frame, _, path: String| {
    if path.is_empty() {
      return Err(LuaError::external("prj.required: path cannot be empty"));
    }
    frame.required.push(ProjectReference::new(path));
    Ok(())
  })?;

  lua.globals().set("prj", prj)?;
  Ok(())
}

/// Register `prj.<name>` as a function that runs `f` against the active frame.
///
/// Arguments are converted before the session is borrowed: converting a table
/// can run Lua metamethods, which may call back into `prj`.
fn register<A, F>(lua: &Lua, prj: &LuaTable, session: &SharedSession, name: &'static str, f: F) -> LuaResult<()>
where
  A: FromLuaMulti,
  F: Fn(&mut UnitFrame, &mut ConfigAccumulator, A) -> LuaResult<()> + 'static,
{
  let session = session.clone();
  let func = lua.create_function(move |_, args: A| {
    let mut guard = session
      .try_borrow_mut()
      .map_err(|_| LuaError::external(format!("prj.{} cannot be called while another prj call is running", name)))?;
    let state = &mut *guard;
    let frame = state.frame.as_mut().ok_or_else(|| outside_descriptor(name))?;
    f(frame, &mut state.config, args)
  })?;
  prj.set(name, func)
}

/// Like [`register`], but only the override descriptor may call the function.
fn register_governed<A, F>(lua: &Lua, prj: &LuaTable, session: &SharedSession, name: &'static str, f: F) -> LuaResult<()>
where
  A: FromLuaMulti,
  F: Fn(&mut ConfigAccumulator, A) -> LuaResult<()> + 'static,
{
  register(lua, prj, session, name, move |frame, config, args: A| {
    if frame.kind != FrameKind::Override {
      return Err(LuaError::external(format!(
        "prj.{} may only be called from the local override descriptor",
        name
      )));
    }
    f(config, args)
  })
}

fn outside_descriptor(name: &str) -> LuaError {
  LuaError::external(format!("prj.{} may only be called while a project descriptor is evaluated", name))
}

impl FromLua for ObjPlacement {
  fn from_lua(value: LuaValue, _: &Lua) -> LuaResult<Self> {
    match value {
      LuaValue::Table(spec) => parse_obj_placement(&spec),
      other => Err(LuaError::external(format!(
        "prj.obj_placement expects a table, got {}",
        other.type_name()
      ))),
    }
  }
}

impl FromLua for TargetDecl {
  fn from_lua(value: LuaValue, _: &Lua) -> LuaResult<Self> {
    match value {
      LuaValue::Table(spec) => parse_target(&spec),
      other => Err(LuaError::external(format!("prj.target expects a table, got {}", other.type_name()))),
    }
  }
}

fn parse_obj_placement(spec: &LuaTable) -> LuaResult<ObjPlacement> {
  let kind: String = spec
    .get::<Option<String>>("kind")?
    .ok_or_else(|| LuaError::external("obj_placement requires a 'kind' field"))?;

  match kind.as_str() {
    "default" => Ok(ObjPlacement::Default),
    "source_subdir" => {
      let subdir = spec.get::<Option<String>>("subdir")?.unwrap_or_else(|| "o".to_string());
      Ok(ObjPlacement::SourceSubdir { subdir })
    }
    "runtime_subdir" => {
      let root = spec.get::<Option<String>>("root")?.unwrap_or_else(|| "target".to_string());
      Ok(ObjPlacement::RuntimeSubdir { root })
    }
    other => Err(LuaError::external(format!(
      "unknown obj_placement kind '{}' (expected 'default', 'source_subdir' or 'runtime_subdir')",
      other
    ))),
  }
}

fn parse_target(spec: &LuaTable) -> LuaResult<TargetDecl> {
  let name: String = spec
    .get::<Option<String>>("name")?
    .ok_or_else(|| LuaError::external("target requires a 'name' field"))?;
  if name.is_empty() {
    return Err(LuaError::external("target name cannot be empty"));
  }

  let kind = match spec.get::<Option<String>>("kind")? {
    Some(kind) => kind.parse::<TargetKind>().map_err(LuaError::external)?,
    None => TargetKind::Exe,
  };

  let sources = match spec.get::<LuaValue>("sources")? {
    LuaValue::Nil => Vec::new(),
    LuaValue::Table(t) => t.sequence_values::<String>().collect::<LuaResult<Vec<_>>>()?,
    _ => return Err(LuaError::external("target 'sources' must be an array of strings")),
  };

  Ok(TargetDecl { name, kind, sources })
}
