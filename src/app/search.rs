//! Pattern search over the focused listing.

use crate::{
  app::{
    App,
    Overlay,
    PromptKind,
    PromptState,
  },
  core::search::{
    SearchDirection,
    SearchError,
    SearchOutcome,
  },
};

impl App
{
  pub fn open_search_prompt(&mut self)
  {
    let input = self.search.pattern().unwrap_or_default().to_string();
    let cursor = input.chars().count();
    self.overlay = Overlay::Prompt(Box::new(PromptState {
      title: "Search".to_string(),
      input,
      cursor,
      kind: PromptKind::Search,
    }));
  }

  /// Store `pattern` and jump to the first match at or after the cursor.
  pub fn search_new(
    &mut self,
    pattern: &str,
  )
  {
    if pattern.is_empty()
    {
      self.add_message("search: empty pattern");
      return;
    }
    let res = self.search.search_new(pattern, self.index.entries(), self.index.cursor());
    self.apply_search(res);
  }

  /// Repeat the stored pattern forwards or backwards.
  pub fn search_step(
    &mut self,
    dir: SearchDirection,
  )
  {
    let res = self.search.search(dir, self.index.entries(), self.index.cursor());
    self.apply_search(res);
  }

  /// Search for `pattern` starting at `from` without replacing the stored
  /// pattern.
  pub(crate) fn search_transient(
    &mut self,
    pattern: &str,
    from: usize,
  ) -> Result<SearchOutcome, SearchError>
  {
    let previous = self.search.swap_pattern(pattern)?;
    let res = self.search.search(SearchDirection::New, self.index.entries(), from);
    self.search.restore(previous);
    res
  }

  pub(crate) fn apply_search(
    &mut self,
    res: Result<SearchOutcome, SearchError>,
  )
  {
    match res
    {
      Ok(outcome) =>
      {
        let Some(pos) = outcome.position()
        else
        {
          self.add_message("search: no match");
          return;
        };
        self.index.set_cursor(pos);
        self.sync_viewport();
        let name = self.index.cursor_entry().map(|e| e.name.clone()).unwrap_or_default();
        match outcome
        {
          SearchOutcome::Wrapped(_) => self.add_message(&format!("search wrapped: {}", name)),
          _ => self.add_message(&format!("found: {}", name)),
        }
      }
      Err(e) => self.add_message(&format!("search: {}", e)),
    }
  }
}
