use std::{
  io,
  path::{
    Path,
    PathBuf,
  },
};

use crate::core::listing::Entry;

/// Recursively copy a file or directory tree from `src` to `dst`.
pub fn copy_path_recursive(
  src: &Path,
  dst: &Path,
) -> io::Result<()>
{
  let meta = std::fs::metadata(src)?;
  if meta.is_dir()
  {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)?
    {
      let de = entry?;
      copy_path_recursive(&de.path(), &dst.join(de.file_name()))?;
    }
    Ok(())
  }
  else
  {
    std::fs::copy(src, dst).map(|_| ())
  }
}

/// Move a path via rename, falling back to copy+remove on cross-device moves.
pub fn move_path_with_fallback(
  src: &Path,
  dst: &Path,
) -> io::Result<()>
{
  match std::fs::rename(src, dst)
  {
    Ok(()) => Ok(()),
    Err(_e) =>
    {
      copy_path_recursive(src, dst)?;
      if std::fs::symlink_metadata(src)?.is_dir()
      {
        std::fs::remove_dir_all(src)
      }
      else
      {
        std::fs::remove_file(src)
      }
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOp
{
  Copy,
  Move,
}

/// What to do when a transfer destination already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplacePolicy
{
  /// Ask once per batch before replacing anything.
  #[default]
  Ask,
  Always,
  Never,
}

impl ReplacePolicy
{
  pub fn from_name(name: &str) -> Option<Self>
  {
    match name.trim().to_ascii_lowercase().as_str()
    {
      "ask" => Some(Self::Ask),
      "always" => Some(Self::Always),
      "never" => Some(Self::Never),
      _ => None,
    }
  }
}

/// Per-item tally of a copy/move batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferReport
{
  pub ok:       usize,
  /// Destinations removed to make room for the incoming item.
  pub replaced: usize,
  pub skipped:  Vec<String>,
  pub errors:   Vec<String>,
  /// Sources that no longer exist at their old location.
  pub moved:    Vec<PathBuf>,
}

impl TransferReport
{
  pub fn summary(&self) -> String
  {
    format!(
      "ok={} replaced={} skipped={} errors={}",
      self.ok,
      self.replaced,
      self.skipped.len(),
      self.errors.len()
    )
  }
}

/// Why an item cannot be transferred at all, whatever the replace policy.
fn blocked(
  src: &Path,
  dest_dir: &Path,
) -> Option<String>
{
  let Some(name) = src.file_name()
  else
  {
    return Some(format!("no file name: {}", src.display()));
  };
  let dest = dest_dir.join(name);
  if dest_dir.starts_with(src)
  {
    return Some(format!("into itself: {}", src.display()));
  }
  if dest == src
  {
    return Some(format!("same path: {}", src.display()));
  }
  if src.starts_with(&dest)
  {
    return Some(format!("inside target: {}", src.display()));
  }
  None
}

/// Destinations in `dest_dir` that a transfer of `items` would replace.
pub fn conflicts(
  items: &[PathBuf],
  dest_dir: &Path,
) -> Vec<PathBuf>
{
  items
    .iter()
    .filter(|src| blocked(src, dest_dir).is_none())
    .filter_map(|src| src.file_name().map(|n| dest_dir.join(n)))
    .filter(|dest| std::fs::symlink_metadata(dest).is_ok())
    .collect()
}

fn remove_path(path: &Path) -> io::Result<()>
{
  if std::fs::symlink_metadata(path)?.is_dir()
  {
    std::fs::remove_dir_all(path)
  }
  else
  {
    std::fs::remove_file(path)
  }
}

/// Copy or move every path in `items` into `dest_dir`, keeping file names.
///
/// An existing destination is removed first when `replace` is set and
/// skipped otherwise. Moving a directory into or onto itself is always
/// skipped, as is replacing a directory that contains the source.
pub fn transfer_into(
  items: &[PathBuf],
  dest_dir: &Path,
  op: TransferOp,
  replace: bool,
) -> TransferReport
{
  let mut report = TransferReport::default();
  for src in items
  {
    if let Some(why) = blocked(src, dest_dir)
    {
      report.skipped.push(why);
      continue;
    }
    let Some(name) = src.file_name()
    else
    {
      continue;
    };
    let dest = dest_dir.join(name);
    if std::fs::symlink_metadata(&dest).is_ok()
    {
      if !replace
      {
        report.skipped.push(format!("exists: {}", dest.display()));
        continue;
      }
      if let Err(e) = remove_path(&dest)
      {
        report.errors.push(format!("replace {}: {}", dest.display(), e));
        continue;
      }
      report.replaced += 1;
    }
    let res = match op
    {
      TransferOp::Copy => copy_path_recursive(src, &dest),
      TransferOp::Move => move_path_with_fallback(src, &dest),
    };
    match res
    {
      Ok(()) =>
      {
        report.ok += 1;
        if op == TransferOp::Move
        {
          report.moved.push(src.clone());
        }
      }
      Err(e) => report.errors.push(format!("{} -> {}: {}", src.display(), dest.display(), e)),
    }
  }
  report
}

/// Rename `name` inside `dir` to `new_name` (same directory).
pub fn rename_in_dir(
  dir: &Path,
  name: &str,
  new_name: &str,
) -> io::Result<PathBuf>
{
  let new_name = new_name.trim();
  if new_name.is_empty() || new_name.contains('/') || new_name == "." || new_name == ".."
  {
    return Err(io::Error::new(
      io::ErrorKind::InvalidInput,
      format!("invalid name '{}'", new_name),
    ));
  }
  let to = dir.join(new_name);
  if to.exists()
  {
    return Err(io::Error::new(
      io::ErrorKind::AlreadyExists,
      format!("'{}' already exists", new_name),
    ));
  }
  std::fs::rename(dir.join(name), &to)?;
  Ok(to)
}

/// Rename each entry to the name at the same position in `new_names`.
///
/// Both lists must have the same length. Blank lines and unchanged names
/// leave their entry alone; every other pair goes through
/// [`rename_in_dir`], so an existing target is an error for that entry only.
pub fn rename_all(
  entries: &[Entry],
  new_names: &[String],
) -> io::Result<TransferReport>
{
  if entries.len() != new_names.len()
  {
    return Err(io::Error::new(
      io::ErrorKind::InvalidInput,
      format!("expected {} names, got {}", entries.len(), new_names.len()),
    ));
  }
  let mut report = TransferReport::default();
  for (entry, new_name) in entries.iter().zip(new_names)
  {
    let new_name = new_name.trim();
    if new_name.is_empty() || new_name == entry.name
    {
      report.skipped.push(format!("unchanged: {}", entry.name));
      continue;
    }
    match rename_in_dir(&entry.dir, &entry.name, new_name)
    {
      Ok(_) =>
      {
        report.ok += 1;
        report.moved.push(entry.path());
      }
      Err(e) => report.errors.push(format!("{} -> {}: {}", entry.name, new_name, e)),
    }
  }
  Ok(report)
}
