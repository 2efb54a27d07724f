use std::path::Path;

use mlua::prelude::*;

use crate::graph::SharedSession;
use crate::lua::globals;
use crate::toolset::Toolset;

/// Create the Lua runtime for one composition run.
///
/// Every run gets a fresh VM so nothing a descriptor leaves behind can leak into
/// a later run.
pub fn create_runtime(session: SharedSession, toolset: &Toolset, run_dir: &Path) -> LuaResult<Lua> {
  let lua = Lua::new();
  globals::register_globals(&lua, session, toolset, run_dir)?;
  Ok(lua)
}
