//! Descriptor file loading with per-file `__dir` injection.
//!
//! Each file runs in its own environment table whose metatable `__index` points
//! at `_G`. Reads fall through to globals (`prj`, the standard library) while
//! assignments stay local to the file, so one descriptor cannot change what a
//! later one sees.

use std::fs;
use std::path::Path;

use mlua::prelude::*;

/// Load and execute the Lua file at `path`, returning its result.
///
/// The file's environment contains `__dir`, the canonical directory of the file.
pub fn load_file_with_dir(lua: &Lua, path: &Path) -> LuaResult<LuaValue> {
  let canonical_path = dunce::canonicalize(path)
    .map_err(|e| LuaError::external(format!("cannot resolve '{}': {}", path.display(), e)))?;

  let content = fs::read_to_string(&canonical_path)
    .map_err(|e| LuaError::external(format!("cannot read '{}': {}", canonical_path.display(), e)))?;

  let dir = canonical_path
    .parent()
    .unwrap_or(Path::new("."))
    .to_string_lossy()
    .into_owned();

  let env = lua.create_table()?;
  env.set("__dir", dir)?;

  let mt = lua.create_table()?;
  mt.set("__index", lua.globals())?;
  env.set_metatable(Some(mt))?;

  lua
    .load(&content)
    .set_name(format!("@{}", canonical_path.display()))
    .set_environment(env)
    .eval::<LuaValue>()
}
