//! Regex search over the focused listing with a single wraparound pass.

use regex::Regex;
use thiserror::Error;

use crate::core::listing::Entry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection
{
  /// Fresh pattern: the entry under the cursor is checked first.
  New,
  Next,
  Previous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome
{
  Found(usize),
  Wrapped(usize),
  NotFound,
}

impl SearchOutcome
{
  pub fn position(&self) -> Option<usize>
  {
    match self
    {
      SearchOutcome::Found(p) | SearchOutcome::Wrapped(p) => Some(*p),
      SearchOutcome::NotFound => None,
    }
  }
}

#[derive(Debug, Error)]
pub enum SearchError
{
  #[error("no search pattern")]
  NoPattern,
  #[error("invalid pattern: {0}")]
  InvalidPattern(#[from] regex::Error),
}

/// Holds the last accepted pattern in source and compiled form.
#[derive(Debug, Clone, Default)]
pub struct SearchEngine
{
  pattern: Option<(String, Regex)>,
}

impl SearchEngine
{
  pub fn new() -> Self
  {
    Self::default()
  }

  pub fn pattern(&self) -> Option<&str>
  {
    self.pattern.as_ref().map(|(s, _)| s.as_str())
  }

  /// Compile and store `pattern`. An invalid pattern leaves the stored one
  /// untouched. An empty string clears it.
  pub fn set_pattern(
    &mut self,
    pattern: &str,
  ) -> Result<(), SearchError>
  {
    if pattern.is_empty()
    {
      self.pattern = None;
      return Ok(());
    }
    let re = Regex::new(pattern)?;
    self.pattern = Some((pattern.to_string(), re));
    Ok(())
  }

  /// Replace the stored pattern wholesale, returning the previous one so it
  /// can be put back with [`restore`](Self::restore).
  pub fn swap_pattern(
    &mut self,
    pattern: &str,
  ) -> Result<Option<(String, Regex)>, SearchError>
  {
    let re = Regex::new(pattern)?;
    Ok(self.pattern.replace((pattern.to_string(), re)))
  }

  pub fn restore(
    &mut self,
    previous: Option<(String, Regex)>,
  )
  {
    self.pattern = previous;
  }

  /// Store `pattern` and search from the cursor, the current entry included.
  pub fn search_new(
    &mut self,
    pattern: &str,
    entries: &[Entry],
    cursor: usize,
  ) -> Result<SearchOutcome, SearchError>
  {
    let re = Regex::new(pattern)?;
    self.pattern = Some((pattern.to_string(), re));
    self.search(SearchDirection::New, entries, cursor)
  }

  /// Scan `entries` (cursor is 1-based) with the stored pattern.
  ///
  /// The scan runs to the end of the list in the chosen direction, then
  /// wraps once to the opposite end and stops short of the cursor.
  pub fn search(
    &self,
    dir: SearchDirection,
    entries: &[Entry],
    cursor: usize,
  ) -> Result<SearchOutcome, SearchError>
  {
    let (_, re) = self.pattern.as_ref().ok_or(SearchError::NoPattern)?;
    let count = entries.len();
    if count == 0
    {
      return Ok(SearchOutcome::NotFound);
    }
    let cursor = cursor.clamp(1, count);
    let hit = |pos: &usize| re.is_match(&entries[*pos - 1].name);
    let outcome = match dir
    {
      SearchDirection::New => find_first((cursor..=count).find(hit), (1..cursor).find(hit)),
      SearchDirection::Next =>
      {
        find_first((cursor + 1..=count).find(hit), (1..cursor).find(hit))
      }
      SearchDirection::Previous => find_first(
        (1..cursor).rev().find(hit),
        (cursor + 1..=count).rev().find(hit),
      ),
    };
    Ok(outcome)
  }
}

fn find_first(
  direct: Option<usize>,
  wrapped: Option<usize>,
) -> SearchOutcome
{
  match (direct, wrapped)
  {
    (Some(p), _) => SearchOutcome::Found(p),
    (None, Some(p)) => SearchOutcome::Wrapped(p),
    (None, None) => SearchOutcome::NotFound,
  }
}
