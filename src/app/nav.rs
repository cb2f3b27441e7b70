//! Directory changes, cursor motion and listing toggles.

use std::{
  io,
  path::Path,
};

use crate::{
  app::App,
  trace,
};

impl App
{
  /// Rescan the working directory; cursor and window return to the top.
  pub(crate) fn rebuild(&mut self)
  {
    self.index.rebuild(&self.cwd, self.opts);
    self.viewport.top = 1;
    self.sync_viewport();
  }

  pub(crate) fn sync_viewport(&mut self)
  {
    self.viewport.recompute(self.index.cursor(), self.index.len());
  }

  /// Make `dir` the working directory. The old directory is kept when
  /// `dir` cannot be resolved or is not a directory.
  pub fn set_cwd(
    &mut self,
    dir: &Path,
  ) -> io::Result<()>
  {
    let canon = std::fs::canonicalize(dir)?;
    if !canon.is_dir()
    {
      return Err(io::Error::new(
        io::ErrorKind::NotADirectory,
        format!("not a directory: {}", canon.display()),
      ));
    }
    trace::log(format!("[nav] cwd '{}' -> '{}'", self.cwd.display(), canon.display()));
    self.cwd = canon;
    self.rebuild();
    Ok(())
  }

  pub fn move_cursor(
    &mut self,
    delta: isize,
  )
  {
    self.index.move_cursor(delta);
    self.sync_viewport();
  }

  /// Move by half the visible rows in `direction` (sign only).
  pub fn page(
    &mut self,
    direction: isize,
  )
  {
    let step = (self.viewport.visible_rows / 2).max(1) as isize;
    self.move_cursor(step * direction.signum());
  }

  pub fn go_top(&mut self)
  {
    self.index.first();
    self.sync_viewport();
  }

  pub fn go_bottom(&mut self)
  {
    self.index.last();
    self.sync_viewport();
  }

  /// Scroll the window by `delta` rows, dragging the cursor along only when
  /// it would leave the screen.
  pub fn scroll(
    &mut self,
    delta: isize,
  )
  {
    let cursor = self.viewport.scroll(delta, self.index.cursor(), self.index.len());
    self.index.set_cursor(cursor);
    self.sync_viewport();
  }

  pub fn enter_current(&mut self)
  {
    let Some(entry) = self.index.cursor_entry()
    else
    {
      return;
    };
    if !entry.is_dir
    {
      self.add_message(&format!("not a directory: {}", entry.name));
      return;
    }
    let path = entry.path();
    if let Err(e) = self.set_cwd(&path)
    {
      self.add_message(&format!("cannot enter {}: {}", path.display(), e));
    }
  }

  /// Go up one level and put the cursor back on the directory just left.
  pub fn go_parent(&mut self)
  {
    let Some(parent) = self.cwd.parent().map(Path::to_path_buf)
    else
    {
      return;
    };
    let left = self.cwd.file_name().map(|s| s.to_string_lossy().to_string());
    if let Err(e) = self.set_cwd(&parent)
    {
      self.add_message(&format!("cannot open {}: {}", parent.display(), e));
      return;
    }
    if let Some(name) = left
    {
      let pattern = format!("^{}$", regex::escape(&name));
      match self.search_transient(&pattern, 1).map(|o| o.position())
      {
        Ok(Some(pos)) => self.index.set_cursor(pos),
        Ok(None) => self.add_message(&format!("not found: {}", name)),
        Err(e) => self.add_message(&e.to_string()),
      }
      self.sync_viewport();
    }
  }

  pub fn toggle_hidden(&mut self)
  {
    self.opts.show_hidden = !self.opts.show_hidden;
    self.config.ui.show_hidden = self.opts.show_hidden;
    self.rebuild();
    self.add_message(&format!(
      "hidden files: {}",
      if self.opts.show_hidden { "shown" } else { "hidden" }
    ));
  }

  pub fn toggle_dirs_first(&mut self)
  {
    self.opts.dirs_first = !self.opts.dirs_first;
    self.config.ui.dirs_first = self.opts.dirs_first;
    self.rebuild();
    self.add_message(&format!(
      "directories first: {}",
      if self.opts.dirs_first { "on" } else { "off" }
    ));
  }

  pub fn cycle_ratio(
    &mut self,
    forward: bool,
  )
  {
    if forward
    {
      self.ratios.next();
    }
    else
    {
      self.ratios.prev();
    }
    let name = self.ratios.active().name().to_string();
    self.config.ui.ratio = Some(name.clone());
    self.force_full_redraw = true;
    self.add_message(&format!("layout: {}", name));
  }
}
