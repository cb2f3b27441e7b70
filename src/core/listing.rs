use std::{
  cmp::Ordering,
  fs,
  io,
  path::{
    Path,
    PathBuf,
  },
};

use crate::trace;

/// One filesystem object shown in a listing.
///
/// Identity is `(dir, name)`; `is_dir` is carried along for rendering and
/// ordering but does not take part in equality.
#[derive(Debug, Clone)]
pub struct Entry
{
  pub name:   String,
  pub dir:    PathBuf,
  pub is_dir: bool,
}

impl Entry
{
  pub fn new(
    dir: impl Into<PathBuf>,
    name: impl Into<String>,
    is_dir: bool,
  ) -> Self
  {
    Self { name: name.into(), dir: dir.into(), is_dir }
  }

  /// Absolute path of the entry.
  pub fn path(&self) -> PathBuf
  {
    self.dir.join(&self.name)
  }

  /// Dotfiles, which listings drop unless hidden files are shown.
  pub fn is_hidden(&self) -> bool
  {
    self.name.starts_with('.')
  }
}

impl PartialEq for Entry
{
  fn eq(
    &self,
    other: &Self,
  ) -> bool
  {
    self.name == other.name && self.dir == other.dir
  }
}

impl Eq for Entry {}

/// Filter and ordering switches shared by the focused listing and every
/// side column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListingOptions
{
  pub show_hidden: bool,
  pub dirs_first:  bool,
}

/// Enumerate `dir` and return its visible entries in display order.
///
/// `.` and `..` never appear; dotfiles are dropped unless `show_hidden` is
/// set. Names compare byte-wise; with `dirs_first` every directory sorts
/// ahead of every non-directory. Any enumeration error fails the whole scan
/// so callers never observe a partial listing.
pub fn read_dir_sorted(
  dir: &Path,
  opts: ListingOptions,
) -> io::Result<Vec<Entry>>
{
  let mut entries = Vec::new();
  for res in fs::read_dir(dir)?
  {
    let de = res?;
    // Names must map back to the same path in renames and commands.
    let name = match de.file_name().into_string()
    {
      Ok(name) => name,
      Err(raw) =>
      {
        trace::log(format!("[listing] skip non-UTF-8 name {:?} in '{}'", raw, dir.display()));
        continue;
      }
    };
    let mut entry = Entry::new(dir, name, false);
    if entry.name == "." || entry.name == ".."
    {
      continue;
    }
    if !opts.show_hidden && entry.is_hidden()
    {
      continue;
    }
    let ft = de.file_type()?;
    // Follow symlinks so linked directories can be entered and previewed
    entry.is_dir = if ft.is_symlink()
    {
      fs::metadata(de.path()).map(|m| m.is_dir()).unwrap_or(false)
    }
    else
    {
      ft.is_dir()
    };
    entries.push(entry);
  }
  entries.sort_by(|a, b| compare_entries(a, b, opts.dirs_first));
  Ok(entries)
}

fn compare_entries(
  a: &Entry,
  b: &Entry,
  dirs_first: bool,
) -> Ordering
{
  if dirs_first
  {
    match (a.is_dir, b.is_dir)
    {
      (true, false) => return Ordering::Less,
      (false, true) => return Ordering::Greater,
      _ =>
      {}
    }
  }
  a.name.as_bytes().cmp(b.name.as_bytes())
}
