//! Loading configuration from Lua.
//!
//! Built-in defaults (`src/lua/defaults.lua`) run first, then the user's
//! `init.lua`. Scripts talk to the `colfm` table:
//!
//! - `colfm.config{ ui = {...}, keys = {...} }` overlays the provided fields;
//! - `colfm.mapkey(seq, action, description?)` binds an internal action;
//! - `colfm.map_command(seq, template, flags?, description?)` binds a shell
//!   command template with its behaviour flags.

mod defaults;
mod loader;
mod lua_engine;
mod paths;
mod types;

pub use defaults::rust_default_keymaps;
pub use loader::{
  load_config,
  load_config_from_code,
};
pub use lua_engine::LuaEngine;
pub use paths::{
  ConfigPaths,
  discover_config_paths,
};
pub use types::{
  CommandBinding,
  Config,
  KeyMapping,
  KeysConfig,
  UiConfig,
  UiTheme,
};

use mlua::{
  Error as LuaError,
  Lua,
  Table,
  Value,
};
use std::{
  cell::RefCell,
  path::Path,
  rc::Rc,
};

use crate::{
  core::{
    command::BehaviorFlags,
    fs_ops::ReplacePolicy,
    layout::RatioConfig,
  },
  trace,
};

pub(crate) const BUILTIN_DEFAULTS_LUA: &str = include_str!("lua/defaults.lua");

pub(crate) fn install_colfm_api(
  lua: &Lua,
  cfg: Rc<RefCell<Config>>,
  maps: Rc<RefCell<Vec<KeyMapping>>>,
) -> mlua::Result<()>
{
  let globals = lua.globals();
  let colfm: Table = lua.create_table()?;

  // colfm.config(table)
  let cfg_for_config = Rc::clone(&cfg);
  let config_fn = lua.create_function(move |_, tbl: Table| {
    apply_config_table(&mut cfg_for_config.borrow_mut(), &tbl)?;
    Ok(true)
  })?;

  // colfm.mapkey(seq, action, desc?)
  let maps_for_mapkey = Rc::clone(&maps);
  let mapkey_fn = lua.create_function(
    move |_, (seq, action, desc): (String, String, Option<String>)| {
      maps_for_mapkey.borrow_mut().push(KeyMapping {
        sequence: seq,
        action,
        description: desc,
      });
      Ok(true)
    },
  )?;

  // colfm.map_command(seq, template, flags?, desc?)
  let cfg_for_cmd = Rc::clone(&cfg);
  let maps_for_cmd = Rc::clone(&maps);
  let map_command_fn = lua.create_function(
    move |_,
          (seq, template, flags, desc): (
      String,
      String,
      Option<Table>,
      Option<String>,
    )| {
      let flags = match flags
      {
        Some(t) => parse_flags(t)?,
        None => BehaviorFlags::default(),
      };
      let idx = {
        let mut cfg_mut = cfg_for_cmd.borrow_mut();
        cfg_mut.commands.push(CommandBinding {
          template: template.clone(),
          flags,
          description: desc.clone(),
        });
        cfg_mut.commands.len() - 1
      };
      maps_for_cmd.borrow_mut().push(KeyMapping {
        sequence:    seq,
        action:      format!("run_cmd:{}", idx),
        description: desc.or(Some(template)),
      });
      Ok(true)
    },
  )?;

  colfm.set("config", config_fn)?;
  colfm.set("mapkey", mapkey_fn)?;
  colfm.set("map_command", map_command_fn)?;
  globals.set("colfm", colfm)?;
  Ok(())
}

fn apply_config_table(
  cfg: &mut Config,
  tbl: &Table,
) -> mlua::Result<()>
{
  if let Some(keys_tbl) = tbl.get::<Option<Table>>("keys")?
    && let Some(ms) = keys_tbl.get::<Option<u64>>("sequence_timeout_ms")?
  {
    cfg.keys.sequence_timeout_ms = ms;
  }
  let Some(ui_tbl) = tbl.get::<Option<Table>>("ui")?
  else
  {
    return Ok(());
  };
  if let Some(b) = ui_tbl.get::<Option<bool>>("show_hidden")?
  {
    cfg.ui.show_hidden = b;
  }
  if let Some(b) = ui_tbl.get::<Option<bool>>("dirs_first")?
  {
    cfg.ui.dirs_first = b;
  }
  if let Some(b) = ui_tbl.get::<Option<bool>>("confirm_commands")?
  {
    cfg.ui.confirm_commands = b;
  }
  if let Some(s) = ui_tbl.get::<Option<String>>("ratio")?
  {
    cfg.ui.ratio = Some(s);
  }
  if let Some(s) = ui_tbl.get::<Option<String>>("replace_existing")?
  {
    match ReplacePolicy::from_name(&s)
    {
      Some(p) => cfg.ui.replace_existing = p,
      None => trace::log(format!("[config] unknown replace_existing '{}'", s)),
    }
  }
  if let Some(s) = ui_tbl.get::<Option<String>>("editor")?
    && !s.trim().is_empty()
  {
    cfg.ui.editor = Some(s);
  }
  if let Some(list) = ui_tbl.get::<Option<Table>>("ratios")?
  {
    for item in list.sequence_values::<Table>()
    {
      if let Some(preset) = parse_ratio(&item?)?
      {
        match cfg.ui.ratios.iter().position(|p| p.name() == preset.name())
        {
          Some(i) => cfg.ui.ratios[i] = preset,
          None => cfg.ui.ratios.push(preset),
        }
      }
    }
  }
  if let Some(theme_tbl) = ui_tbl.get::<Option<Table>>("theme")?
  {
    let mut th = cfg.ui.theme.clone().unwrap_or_default();
    for (key, slot) in [
      ("dir_fg", &mut th.dir_fg),
      ("file_fg", &mut th.file_fg),
      ("selected_fg", &mut th.selected_fg),
      ("cursor_fg", &mut th.cursor_fg),
      ("cursor_bg", &mut th.cursor_bg),
      ("border_fg", &mut th.border_fg),
      ("title_fg", &mut th.title_fg),
      ("status_fg", &mut th.status_fg),
    ]
    {
      if let Some(s) = theme_tbl.get::<Option<String>>(key)?
      {
        *slot = Some(s);
      }
    }
    cfg.ui.theme = Some(th);
  }
  Ok(())
}

/// `{ name = "x", weights = { 1, 2 }, current = 1 }`; `current` is 1-based.
/// Invalid presets are skipped.
fn parse_ratio(t: &Table) -> mlua::Result<Option<RatioConfig>>
{
  let name: String = t.get("name")?;
  let weights: Vec<u16> = t.get("weights")?;
  let current = t.get::<Option<usize>>("current")?.unwrap_or(1);
  let Some(current) = current.checked_sub(1)
  else
  {
    trace::log(format!("[config] ratio '{}': current must be >= 1", name));
    return Ok(None);
  };
  match RatioConfig::new(name, weights, current)
  {
    Ok(p) => Ok(Some(p)),
    Err(e) =>
    {
      trace::log(format!("[config] skipping ratio preset: {}", e));
      Ok(None)
    }
  }
}

/// Accepts `{ cd = true, no_wait = true }` or `{ "cd", "no_wait" }`.
fn parse_flags(t: Table) -> mlua::Result<BehaviorFlags>
{
  let mut flags = BehaviorFlags::default();
  for pair in t.pairs::<Value, Value>()
  {
    let (k, v) = pair?;
    let (name, on) = match (k, v)
    {
      (Value::String(s), Value::Boolean(b)) => (s.to_str()?.to_string(), b),
      (Value::Integer(_), Value::String(s)) => (s.to_str()?.to_string(), true),
      _ => return Err(LuaError::external("command flags must be names or name = bool")),
    };
    if !flags.set_by_name(&name, on)
    {
      return Err(LuaError::external(format!("unknown command flag '{}'", name)));
    }
  }
  Ok(flags)
}

pub(crate) fn install_require(
  lua: &Lua,
  lua_root: &Path,
) -> mlua::Result<()>
{
  let root = lua_root.to_path_buf();
  let require_fn = lua.create_function(move |lua, name: String| {
    if name.contains("..") || name.starts_with('/')
    {
      return Err(LuaError::external("invalid module name"));
    }
    let rel_path = name.replace('.', "/");
    let path = root.join(format!("{}.lua", rel_path));
    // Canonicalize and ensure under root
    let canon = std::fs::canonicalize(&path)
      .map_err(|e| LuaError::external(format!("{e}")))?;
    let canon_root = std::fs::canonicalize(&root)
      .map_err(|e| LuaError::external(format!("{e}")))?;
    if !canon.starts_with(&canon_root)
    {
      return Err(LuaError::external("module outside config root"));
    }
    let code = std::fs::read_to_string(&canon)
      .map_err(|e| LuaError::external(format!("{e}")))?;
    lua.load(&code).set_name(name).eval::<Value>()
  })?;
  lua.globals().set("require", require_fn)?;
  Ok(())
}
