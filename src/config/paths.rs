use std::{
  env,
  fs,
  path::{
    Path,
    PathBuf,
  },
};

/// Resolved configuration locations for colfm.
#[derive(Debug, Clone)]
pub struct ConfigPaths
{
  pub root:   PathBuf,
  pub entry:  PathBuf,
  pub exists: bool,
}

/// Discover the effective configuration directory and entry point.
///
/// Checks `COLFM_CONFIG_DIR`, then `XDG_CONFIG_HOME/colfm`, then
/// `~/.config/colfm`. The returned struct includes the root directory, the
/// path to `init.lua`, and whether the file currently exists.
pub fn discover_config_paths() -> std::io::Result<ConfigPaths>
{
  fn non_empty(var: &str) -> Option<String>
  {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
  }

  let root = if let Some(over) = non_empty("COLFM_CONFIG_DIR")
  {
    PathBuf::from(over)
  }
  else if let Some(xdg) = non_empty("XDG_CONFIG_HOME")
  {
    Path::new(&xdg).join("colfm")
  }
  else if let Some(home) = non_empty("HOME")
  {
    Path::new(&home).join(".config").join("colfm")
  }
  else
  {
    Path::new(".config").join("colfm")
  };

  let entry = root.join("init.lua");
  let exists = fs::metadata(&entry).map(|m| m.is_file()).unwrap_or(false);
  Ok(ConfigPaths { root, entry, exists })
}
