//! Selection and the file operations that consume it.

use std::{
  env,
  io::{
    self,
    Write,
  },
  path::PathBuf,
};

use crate::{
  app::{
    App,
    ConfirmKind,
    ConfirmState,
    Overlay,
    PromptKind,
    PromptState,
  },
  core::{
    command,
    fs_ops::{
      self,
      ReplacePolicy,
      TransferOp,
    },
    listing::Entry,
  },
  trace,
};

impl App
{
  pub fn toggle_select_current(&mut self)
  {
    let Some(entry) = self.index.cursor_entry().cloned()
    else
    {
      return;
    };
    let added = self.selection.toggle(&entry);
    self.add_message(&format!(
      "{} {} ({} selected)",
      if added { "selected" } else { "unselected" },
      entry.name,
      self.selection.len()
    ));
  }

  pub fn select_all(&mut self)
  {
    let added = self.selection.add_all(self.index.entries());
    self.add_message(&format!("selected {} ({} total)", added, self.selection.len()));
  }

  pub fn clear_selection(&mut self)
  {
    self.selection.clear();
    self.add_message("selection cleared");
  }

  pub fn show_selection(&mut self)
  {
    let lines: Vec<String> =
      self.selection.iter().map(|e| e.path().display().to_string()).collect();
    let title = format!("Selection ({})", lines.len());
    let lines = if lines.is_empty() { vec!["(empty)".to_string()] } else { lines };
    self.display_output(&title, lines);
  }

  /// Copy or move every selected entry into the working directory.
  ///
  /// With [`ReplacePolicy::Ask`] and at least one existing destination, a
  /// confirmation decides whether those destinations are replaced.
  pub fn transfer_selection_here(
    &mut self,
    op: TransferOp,
    policy: ReplacePolicy,
  )
  {
    let items: Vec<PathBuf> = self.selection.iter().map(|e| e.path()).collect();
    if items.is_empty()
    {
      self.add_message(&format!("{}: no items selected", verb(op)));
      return;
    }
    match policy
    {
      ReplacePolicy::Always => self.finish_transfer(op, &items, true),
      ReplacePolicy::Never => self.finish_transfer(op, &items, false),
      ReplacePolicy::Ask =>
      {
        let existing = fs_ops::conflicts(&items, &self.cwd);
        if existing.is_empty()
        {
          self.finish_transfer(op, &items, false);
          return;
        }
        let first = existing[0].file_name().map(|n| n.to_string_lossy().to_string());
        let question = match (existing.len(), first)
        {
          (1, Some(name)) => format!("replace existing '{}'? (y/n)", name),
          (n, _) => format!("replace {} existing items? (y/n)", n),
        };
        self.overlay = Overlay::Confirm(Box::new(ConfirmState {
          title: format!("{} selection", verb(op)),
          question,
          kind: ConfirmKind::Replace { op, items },
        }));
      }
    }
  }

  pub(crate) fn finish_transfer(
    &mut self,
    op: TransferOp,
    items: &[PathBuf],
    replace: bool,
  )
  {
    let what = verb(op);
    let report = fs_ops::transfer_into(items, &self.cwd, op, replace);
    for line in report.skipped.iter().chain(report.errors.iter())
    {
      trace::log(format!("[{}] {}", what, line));
    }
    self.selection.clear();
    self.rebuild();
    self.add_message(&format!("{}: {}", what, report.summary()));
  }

  pub fn open_rename_prompt(&mut self)
  {
    let Some(entry) = self.index.cursor_entry()
    else
    {
      self.add_message("rename: nothing here");
      return;
    };
    let name = entry.name.clone();
    self.overlay = Overlay::Prompt(Box::new(PromptState {
      title: format!("Rename {}", name),
      input: name.clone(),
      cursor: name.chars().count(),
      kind: PromptKind::Rename { name },
    }));
  }

  /// Rename `name` in the working directory and focus the new name.
  pub fn rename_entry(
    &mut self,
    name: &str,
    new_name: &str,
  )
  {
    if name == new_name.trim()
    {
      return;
    }
    match fs_ops::rename_in_dir(&self.cwd, name, new_name)
    {
      Ok(to) =>
      {
        self.selection.remove_path(&self.cwd.join(name));
        self.rebuild();
        let new_name = new_name.trim();
        if let Some(pos) = self.index.position_of(new_name)
        {
          self.index.set_cursor(pos);
          self.sync_viewport();
        }
        self.add_message(&format!("renamed to {}", to.display()));
      }
      Err(e) => self.add_message(&format!("rename failed: {}", e)),
    }
  }

  /// Rename every selected entry by editing their names in `$EDITOR`.
  ///
  /// The names go one per line into a scratch file; line `n` of the edited
  /// file becomes the new name of the `n`th selected entry. A file with a
  /// different number of lines renames nothing.
  pub fn bulk_rename(&mut self)
  {
    if self.selection.is_empty()
    {
      self.add_message("bulk rename: no items selected");
      return;
    }
    let editor = self
      .config
      .ui
      .editor
      .clone()
      .or_else(|| env::var("VISUAL").ok().filter(|v| !v.trim().is_empty()))
      .or_else(|| env::var("EDITOR").ok().filter(|v| !v.trim().is_empty()))
      .unwrap_or_else(|| "vi".to_string());
    let entries: Vec<Entry> = self.selection.iter().cloned().collect();
    let result = self.edit_names(&editor, &entries);
    match result.and_then(|names| fs_ops::rename_all(&entries, &names))
    {
      Ok(report) =>
      {
        for line in report.errors.iter()
        {
          trace::log(format!("[rename] {}", line));
        }
        self.selection.clear();
        self.rebuild();
        self.add_message(&format!(
          "bulk rename: renamed={} errors={}",
          report.ok,
          report.errors.len()
        ));
      }
      Err(e) => self.add_message(&format!("bulk rename: {}", e)),
    }
  }

  /// Round-trip the entry names through `editor`, one per line.
  fn edit_names(
    &mut self,
    editor: &str,
    entries: &[Entry],
  ) -> io::Result<Vec<String>>
  {
    let mut scratch = tempfile::Builder::new().prefix("colfm-rename-").suffix(".txt").tempfile()?;
    for e in entries
    {
      writeln!(scratch, "{}", e.name)?;
    }
    scratch.flush()?;
    let scratch = scratch.into_temp_path();

    if let Err(e) = self.console.suspend()
    {
      trace::log(format!("[rename] suspend failed: {}", e));
    }
    let status = command::run_editor(editor, &scratch, &self.cwd);
    if let Err(e) = self.console.resume()
    {
      trace::log(format!("[rename] resume failed: {}", e));
    }
    self.force_full_redraw = true;

    let status = status?;
    if !status.success()
    {
      return Err(io::Error::other(format!("editor exited with {}", status)));
    }
    let edited = std::fs::read_to_string(&scratch)?;
    Ok(edited.lines().map(str::to_string).collect())
  }
}

fn verb(op: TransferOp) -> &'static str
{
  match op
  {
    TransferOp::Copy => "copy",
    TransferOp::Move => "move",
  }
}
