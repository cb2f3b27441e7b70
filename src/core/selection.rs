//! Cross-directory working selection.

use std::path::Path;

use crate::core::listing::Entry;

/// Growth step for the backing storage.
const CHUNK: usize = 32;

/// Ordered set of entry identities that survives navigation.
///
/// Insertion order is kept; removing an element shifts the ones after it.
/// Storage grows in fixed chunks and is only released by [`clear`].
///
/// [`clear`]: SelectionSet::clear
#[derive(Debug, Clone, Default)]
pub struct SelectionSet
{
  items: Vec<Entry>,
}

impl SelectionSet
{
  pub fn new() -> Self
  {
    Self::default()
  }

  pub fn len(&self) -> usize
  {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool
  {
    self.items.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &Entry>
  {
    self.items.iter()
  }

  pub fn capacity(&self) -> usize
  {
    self.items.capacity()
  }

  pub fn contains(
    &self,
    entry: &Entry,
  ) -> bool
  {
    self.items.iter().any(|e| e == entry)
  }

  /// Add `entry` when absent, remove it when present. Returns whether the
  /// entry is selected afterwards.
  pub fn toggle(
    &mut self,
    entry: &Entry,
  ) -> bool
  {
    if let Some(i) = self.items.iter().position(|e| e == entry)
    {
      self.items.remove(i);
      false
    }
    else
    {
      self.push(entry.clone());
      true
    }
  }

  /// Add every entry not already selected. Returns how many were added.
  pub fn add_all<'a>(
    &mut self,
    entries: impl IntoIterator<Item = &'a Entry>,
  ) -> usize
  {
    let mut added = 0usize;
    for e in entries
    {
      if !self.contains(e)
      {
        self.push(e.clone());
        added += 1;
      }
    }
    added
  }

  pub fn clear(&mut self)
  {
    self.items = Vec::new();
  }

  /// Drop the entry living at `path`. Returns whether one was selected.
  pub fn remove_path(
    &mut self,
    path: &Path,
  ) -> bool
  {
    match self.items.iter().position(|e| e.dir.join(&e.name) == path)
    {
      Some(i) =>
      {
        self.items.remove(i);
        true
      }
      None => false,
    }
  }

  fn push(
    &mut self,
    entry: Entry,
  )
  {
    if self.items.len() == self.items.capacity()
    {
      self.items.reserve_exact(CHUNK);
    }
    self.items.push(entry);
  }
}
