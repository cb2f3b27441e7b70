//! Scrolling window over a 1-based list.

/// Visible window: the first shown position and how many rows fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport
{
  pub top:          usize,
  pub visible_rows: usize,
}

impl Default for Viewport
{
  fn default() -> Self
  {
    Self { top: 1, visible_rows: 1 }
  }
}

impl Viewport
{
  pub fn new(visible_rows: usize) -> Self
  {
    Self { top: 1, visible_rows }
  }

  fn rows(&self) -> usize
  {
    self.visible_rows.max(1)
  }

  /// Whether `pos` lies inside `[top, top + rows)`.
  pub fn shows(
    &self,
    pos: usize,
  ) -> bool
  {
    pos >= self.top && pos < self.top + self.rows()
  }

  /// Re-establish `top <= cursor < top + rows` for a list of `count`
  /// entries.
  ///
  /// `top` only moves when the cursor has left the window; it then snaps so
  /// the cursor sits on the edge it crossed.
  pub fn recompute(
    &mut self,
    cursor: usize,
    count: usize,
  )
  {
    if count == 0
    {
      self.top = 1;
      return;
    }
    let rows = self.rows();
    if !self.shows(cursor)
    {
      self.top = if cursor >= self.top + rows { cursor + 1 - rows } else { cursor };
    }
    self.top = self.top.clamp(1, count);
    if !self.shows(cursor)
    {
      self.top = cursor.max(1);
    }
  }

  /// Shift the window by `delta` rows and return the cursor position that
  /// keeps the cursor on screen.
  pub fn scroll(
    &mut self,
    delta: isize,
    cursor: usize,
    count: usize,
  ) -> usize
  {
    if count == 0
    {
      return cursor;
    }
    let rows = self.rows();
    self.top = (self.top as isize + delta).clamp(1, count as isize) as usize;
    if cursor < self.top
    {
      self.top
    }
    else if cursor >= self.top + rows
    {
      self.top + rows - 1
    }
    else
    {
      cursor
    }
  }

  /// Positions currently on screen, clipped to `count`.
  pub fn range(
    &self,
    count: usize,
  ) -> std::ops::Range<usize>
  {
    if count == 0
    {
      return 1..1;
    }
    let end = (self.top + self.rows()).min(count + 1);
    self.top..end
  }
}
