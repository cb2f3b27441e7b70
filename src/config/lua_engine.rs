use mlua::{
  Lua,
  LuaOptions,
  Result as LuaResult,
  StdLib,
};

/// Sandboxed Lua state for reading configuration.
///
/// Only the STRING, TABLE and MATH libraries are loaded (no io/os/debug/
/// package); the loader installs the `colfm` table and a restricted
/// `require()` on top.
pub struct LuaEngine
{
  lua: Lua,
}

impl LuaEngine
{
  pub fn new() -> LuaResult<Self>
  {
    let lua = Lua::new_with(
      StdLib::STRING | StdLib::TABLE | StdLib::MATH,
      LuaOptions::default(),
    )?;
    Ok(Self { lua })
  }

  pub fn lua(&self) -> &Lua
  {
    &self.lua
  }
}
