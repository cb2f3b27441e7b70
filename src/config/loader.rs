use std::{
  cell::RefCell,
  fs,
  io,
  path::Path,
  rc::Rc,
};

use super::{
  Config,
  ConfigPaths,
  KeyMapping,
  LuaEngine,
};
use crate::trace;

pub type ConfigArtifacts = (Config, Vec<KeyMapping>);

/// A named Lua chunk to run after the built-in defaults.
struct Chunk<'a>
{
  name: String,
  code: &'a str,
}

/// Load configuration from the discovered `init.lua` (if any).
///
/// Returns the merged [`Config`] plus the key mappings: Rust defaults first,
/// then everything registered from Lua, so later bindings win.
pub fn load_config(paths: &ConfigPaths) -> io::Result<ConfigArtifacts>
{
  let user_code = if paths.exists
  {
    Some(
      fs::read_to_string(&paths.entry)
        .map_err(|e| io_err(format!("read init.lua failed: {e}")))?,
    )
  }
  else
  {
    None
  };
  let chunk = user_code.as_deref().map(|code| Chunk {
    name: paths.entry.to_string_lossy().to_string(),
    code,
  });
  run(chunk, &paths.root)
}

/// Load configuration from a Lua source string for tests or programmatic use.
///
/// Defaults are loaded first, followed by the provided snippet. `root`
/// controls the directory used for `require()` (modules resolve under
/// `root/lua`).
pub fn load_config_from_code(
  code: &str,
  root: Option<&Path>,
) -> io::Result<ConfigArtifacts>
{
  let base = match root
  {
    Some(p) => p.to_path_buf(),
    None => std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from(".")),
  };
  run(Some(Chunk { name: "inline init.lua".to_string(), code }), &base)
}

fn run(
  user: Option<Chunk>,
  root: &Path,
) -> io::Result<ConfigArtifacts>
{
  let engine = LuaEngine::new().map_err(|e| io_err(format!("lua init failed: {e}")))?;
  let lua = engine.lua();

  let config_acc = Rc::new(RefCell::new(Config::default()));
  let keymaps_acc: Rc<RefCell<Vec<KeyMapping>>> =
    Rc::new(RefCell::new(super::rust_default_keymaps()));

  super::install_colfm_api(lua, Rc::clone(&config_acc), Rc::clone(&keymaps_acc))
    .map_err(|e| io_err(format!("colfm api install failed: {e}")))?;
  super::install_require(lua, &root.join("lua"))
    .map_err(|e| io_err(format!("require install failed: {e}")))?;

  trace::log("[config] exec builtin/defaults.lua");
  lua
    .load(super::BUILTIN_DEFAULTS_LUA)
    .set_name("builtin/defaults.lua")
    .exec()
    .map_err(|e| {
      trace::log(format!("[config] defaults.lua error: {}", e));
      io_err(format!("defaults.lua execution failed: {e}"))
    })?;

  if let Some(chunk) = user
  {
    trace::log(format!("[config] exec {}", chunk.name));
    lua.load(chunk.code).set_name(chunk.name.clone()).exec().map_err(|e| {
      trace::log(format!("[config] {} error: {}", chunk.name, e));
      io_err(format!("{} execution failed: {e}", chunk.name))
    })?;
  }

  let cfg = config_acc.borrow().clone();
  let maps = keymaps_acc.borrow().clone();
  Ok((cfg, maps))
}

fn io_err(msg: String) -> io::Error
{
  io::Error::other(msg)
}
