//! Shell command templates, behaviour flags and output capture.

use std::{
  io::{
    self,
    Read,
  },
  path::Path,
  process::{
    Command,
    ExitStatus,
    Stdio,
  },
};

use thiserror::Error;

use crate::{
  core::{
    listing::Entry,
    selection::SelectionSet,
  },
  trace,
};

/// Longest line kept by [`LineCapture`] before it is cut.
pub const LINE_CAPACITY: usize = 4096;

/// Per-invocation switches bundled with a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BehaviorFlags
{
  pub no_confirm:        bool,
  pub no_reload:         bool,
  pub keep_raw:          bool,
  pub cd_to_output:      bool,
  pub search_output:     bool,
  pub no_persist_search: bool,
  pub no_wait:           bool,
}

impl BehaviorFlags
{
  /// Set the flag called `name`. Returns false for unknown names.
  pub fn set_by_name(
    &mut self,
    name: &str,
    on: bool,
  ) -> bool
  {
    let slot = match name
    {
      "no_confirm" => &mut self.no_confirm,
      "no_reload" => &mut self.no_reload,
      "keep_raw" => &mut self.keep_raw,
      "cd" => &mut self.cd_to_output,
      "search" => &mut self.search_output,
      "no_persist_search" => &mut self.no_persist_search,
      "no_wait" => &mut self.no_wait,
      _ => return false,
    };
    *slot = on;
    true
  }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExpandError
{
  #[error("selection is empty")]
  EmptySelection,
  #[error("no current entry")]
  NoCurrentEntry,
}

/// Expand `%c`, `%s`, `%p` and `%%` in one left-to-right pass.
///
/// `%c` is the focused entry's name, `%s` the selection's absolute paths in
/// selection order joined by spaces, `%p` the working directory. Any other
/// `%x` is copied through untouched, as is a trailing lone `%`.
pub fn expand_template(
  template: &str,
  current: Option<&Entry>,
  selection: &SelectionSet,
  cwd: &Path,
) -> Result<String, ExpandError>
{
  let mut out = String::with_capacity(template.len());
  let mut chars = template.chars();
  while let Some(ch) = chars.next()
  {
    if ch != '%'
    {
      out.push(ch);
      continue;
    }
    match chars.next()
    {
      Some('c') =>
      {
        let e = current.ok_or(ExpandError::NoCurrentEntry)?;
        out.push_str(&e.name);
      }
      Some('s') =>
      {
        if selection.is_empty()
        {
          return Err(ExpandError::EmptySelection);
        }
        let paths: Vec<String> =
          selection.iter().map(|e| e.path().to_string_lossy().to_string()).collect();
        out.push_str(&paths.join(" "));
      }
      Some('p') => out.push_str(&cwd.to_string_lossy()),
      Some('%') => out.push('%'),
      Some(other) =>
      {
        out.push('%');
        out.push(other);
      }
      None => out.push('%'),
    }
  }
  Ok(out)
}

/// Splits a byte stream into lines, remembering only the latest one.
///
/// A line completes on `\n` or when [`LINE_CAPACITY`] bytes have piled up;
/// a `\n` arriving right after such a cut ends the cut line rather than
/// starting an empty one. [`finish`](Self::finish) flushes a partial
/// trailing line.
#[derive(Debug)]
pub struct LineCapture
{
  buf:       Vec<u8>,
  capacity:  usize,
  last_line: Option<String>,
  cut:       bool,
}

impl Default for LineCapture
{
  fn default() -> Self
  {
    Self::with_capacity(LINE_CAPACITY)
  }
}

impl LineCapture
{
  pub fn with_capacity(capacity: usize) -> Self
  {
    let capacity = capacity.max(1);
    Self { buf: Vec::with_capacity(capacity), capacity, last_line: None, cut: false }
  }

  pub fn feed(
    &mut self,
    bytes: &[u8],
  )
  {
    for b in bytes
    {
      if *b == b'\n'
      {
        if !(self.cut && self.buf.is_empty())
        {
          self.complete();
        }
        self.cut = false;
        continue;
      }
      self.cut = false;
      self.buf.push(*b);
      if self.buf.len() >= self.capacity
      {
        self.complete();
        self.cut = true;
      }
    }
  }

  pub fn finish(mut self) -> Option<String>
  {
    if !self.buf.is_empty()
    {
      self.complete();
    }
    self.last_line
  }

  fn complete(&mut self)
  {
    let line = String::from_utf8_lossy(&self.buf).trim_end_matches('\r').to_string();
    self.last_line = Some(line);
    self.buf.clear();
  }
}

/// Terminal hooks used while a command owns the screen.
pub trait Console
{
  /// Hand the terminal to the child process.
  fn suspend(&mut self) -> io::Result<()>;
  /// Take the terminal back for the interface.
  fn resume(&mut self) -> io::Result<()>;
  /// Show a chunk of the child's standard output as it arrives.
  fn echo(
    &mut self,
    bytes: &[u8],
  );
  /// Block until the user acknowledges the output.
  fn wait_for_key(&mut self);
}

/// Console that discards output; used before a terminal is attached.
#[derive(Debug, Default)]
pub struct NullConsole;

impl Console for NullConsole
{
  fn suspend(&mut self) -> io::Result<()>
  {
    Ok(())
  }

  fn resume(&mut self) -> io::Result<()>
  {
    Ok(())
  }

  fn echo(
    &mut self,
    _bytes: &[u8],
  )
  {
  }

  fn wait_for_key(&mut self) {}
}

/// Result of one finished child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome
{
  pub exit_code: Option<i32>,
  pub success:   bool,
  pub last_line: Option<String>,
}

impl CommandOutcome
{
  /// Last output line, only when the command succeeded and the line has
  /// content.
  pub fn usable_line(&self) -> Option<&str>
  {
    if !self.success
    {
      return None;
    }
    self.last_line.as_deref().filter(|l| !l.is_empty())
  }
}

/// Run `command` through `sh -c` inside `cwd`, streaming its standard
/// output to `console` while keeping the last line.
///
/// Blocks until the child exits; there is no timeout.
pub fn run_shell(
  command: &str,
  cwd: &Path,
  console: &mut dyn Console,
) -> io::Result<CommandOutcome>
{
  trace::log(format!("[cmd] spawn cwd='{}' cmd='{}'", cwd.display(), command));
  let mut child = Command::new("sh")
    .arg("-c")
    .arg(command)
    .current_dir(cwd)
    .stdin(Stdio::inherit())
    .stdout(Stdio::piped())
    .stderr(Stdio::inherit())
    .spawn()?;

  let mut capture = LineCapture::default();
  if let Some(mut out) = child.stdout.take()
  {
    let mut chunk = [0u8; 1024];
    loop
    {
      match out.read(&mut chunk)
      {
        Ok(0) => break,
        Ok(n) =>
        {
          console.echo(&chunk[..n]);
          capture.feed(&chunk[..n]);
        }
        Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
        Err(e) =>
        {
          trace::log(format!("[cmd] read error: {}", e));
          break;
        }
      }
    }
  }
  let status = child.wait()?;
  let outcome = CommandOutcome {
    exit_code: status.code(),
    success:   status.success(),
    last_line: capture.finish(),
  };
  trace::log(format!(
    "[cmd] exit={:?} last_line={:?}",
    outcome.exit_code, outcome.last_line
  ));
  Ok(outcome)
}

/// Open `file` in `editor` with the terminal handed over completely.
///
/// `editor` is a shell word list such as `vim` or `code --wait`; the file is
/// passed as a separate argument so it needs no quoting.
pub fn run_editor(
  editor: &str,
  file: &Path,
  cwd: &Path,
) -> io::Result<ExitStatus>
{
  trace::log(format!("[cmd] editor '{}' file='{}'", editor, file.display()));
  let status = Command::new("sh")
    .arg("-c")
    .arg(format!("{} \"$1\"", editor))
    .arg("sh")
    .arg(file)
    .current_dir(cwd)
    .stdin(Stdio::inherit())
    .stdout(Stdio::inherit())
    .stderr(Stdio::inherit())
    .status()?;
  trace::log(format!("[cmd] editor exit={:?}", status.code()));
  Ok(status)
}
