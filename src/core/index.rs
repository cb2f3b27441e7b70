//! Ordered entries of the working directory plus the focused position.

use std::path::Path;

use crate::{
  core::listing::{
    Entry,
    ListingOptions,
    read_dir_sorted,
  },
  trace,
};

/// Entries of one directory with a 1-based cursor.
///
/// Position 0 means "no entry"; whenever the index is non-empty the cursor
/// stays within `1..=len`.
#[derive(Debug, Clone, Default)]
pub struct EntryIndex
{
  entries: Vec<Entry>,
  cursor:  usize,
}

impl EntryIndex
{
  /// Build an index from already ordered entries with the cursor on the
  /// first one.
  pub fn from_entries(entries: Vec<Entry>) -> Self
  {
    let cursor = if entries.is_empty() { 0 } else { 1 };
    Self { entries, cursor }
  }

  /// Replace the contents with a fresh scan of `dir`.
  ///
  /// The cursor returns to the first entry. An unreadable directory leaves
  /// the index empty.
  pub fn rebuild(
    &mut self,
    dir: &Path,
    opts: ListingOptions,
  )
  {
    let entries = match read_dir_sorted(dir, opts)
    {
      Ok(list) => list,
      Err(e) =>
      {
        trace::log(format!("[index] scan '{}' failed: {}", dir.display(), e));
        Vec::new()
      }
    };
    trace::log(format!(
      "[index] rebuilt '{}' count={} hidden={} dirs_first={}",
      dir.display(),
      entries.len(),
      opts.show_hidden,
      opts.dirs_first
    ));
    *self = Self::from_entries(entries);
  }

  pub fn len(&self) -> usize
  {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool
  {
    self.entries.is_empty()
  }

  pub fn cursor(&self) -> usize
  {
    self.cursor
  }

  pub fn entries(&self) -> &[Entry]
  {
    &self.entries
  }

  /// Entry at the 1-based position `pos`.
  pub fn get(
    &self,
    pos: usize,
  ) -> Option<&Entry>
  {
    pos.checked_sub(1).and_then(|i| self.entries.get(i))
  }

  pub fn cursor_entry(&self) -> Option<&Entry>
  {
    self.get(self.cursor)
  }

  /// Move the cursor by `delta`, stopping at either end.
  pub fn move_cursor(
    &mut self,
    delta: isize,
  )
  {
    if self.entries.is_empty()
    {
      return;
    }
    let last = self.entries.len() as isize;
    self.cursor = (self.cursor as isize + delta).clamp(1, last) as usize;
  }

  /// Place the cursor at `pos`, clamped into the valid range.
  pub fn set_cursor(
    &mut self,
    pos: usize,
  )
  {
    if self.entries.is_empty()
    {
      return;
    }
    self.cursor = pos.clamp(1, self.entries.len());
  }

  pub fn first(&mut self)
  {
    self.set_cursor(1);
  }

  pub fn last(&mut self)
  {
    self.set_cursor(self.entries.len());
  }

  /// 1-based position of the entry called `name`.
  pub fn position_of(
    &self,
    name: &str,
  ) -> Option<usize>
  {
    self.entries.iter().position(|e| e.name == name).map(|i| i + 1)
  }
}
