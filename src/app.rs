//! Session state shared by every component.
//!
//! [`App`] owns the working directory, the focused [`EntryIndex`] with its
//! [`Viewport`], the cross-directory [`SelectionSet`], the stored search
//! pattern, the ratio presets and the overlay/status line. The terminal
//! runtime drives it through [`App::on_key`], [`App::on_resize`] and
//! [`App::layout`]; tests construct one with [`App::for_dir`] and poke the
//! same entry points.

mod commands;
mod nav;
mod overlays;
mod search;
mod selection;

use std::{
  env,
  io,
  path::{
    Path,
    PathBuf,
  },
};

use crate::{
  config::{
    Config,
    KeyMapping,
  },
  core::{
    command::{
      BehaviorFlags,
      CommandOutcome,
      Console,
      NullConsole,
    },
    fs_ops::TransferOp,
    index::EntryIndex,
    layout::{
      self,
      ColumnLayout,
      LayoutInput,
      RatioPresets,
    },
    listing::{
      Entry,
      ListingOptions,
    },
    search::SearchEngine,
    selection::SelectionSet,
    viewport::Viewport,
  },
  keymap::KeyState,
  trace,
};

/// Rows taken by the header, the status line and the column borders.
const CHROME_ROWS: u16 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind
{
  Search,
  Command,
  Rename
  {
    name: String,
  },
}

#[derive(Debug, Clone)]
pub struct PromptState
{
  pub title:  String,
  pub input:  String,
  /// Cursor position in characters.
  pub cursor: usize,
  pub kind:   PromptKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmKind
{
  RunCommand
  {
    command: String,
    flags:   BehaviorFlags,
  },
  /// Some destinations of a copy/move exist; "no" skips just those.
  Replace
  {
    op:    TransferOp,
    items: Vec<PathBuf>,
  },
}

#[derive(Debug, Clone)]
pub struct ConfirmState
{
  pub title:    String,
  pub question: String,
  pub kind:     ConfirmKind,
}

#[derive(Debug, Clone)]
pub enum Overlay
{
  None,
  Output
  {
    title: String,
    lines: Vec<String>,
  },
  Prompt(Box<PromptState>),
  Confirm(Box<ConfirmState>),
}

/// Mutable state of one browsing session.
pub struct App
{
  pub(crate) cwd:               PathBuf,
  pub(crate) index:             EntryIndex,
  pub(crate) viewport:          Viewport,
  pub(crate) selection:         SelectionSet,
  pub(crate) search:            SearchEngine,
  pub(crate) ratios:            RatioPresets,
  pub(crate) opts:              ListingOptions,
  pub(crate) config:            Config,
  pub(crate) keys:              KeyState,
  pub(crate) overlay:           Overlay,
  pub(crate) status:            Option<String>,
  pub(crate) recent_messages:   Vec<String>,
  pub(crate) console:           Box<dyn Console>,
  pub(crate) screen:            (u16, u16),
  pub(crate) last_output:       Option<CommandOutcome>,
  pub(crate) force_full_redraw: bool,
  pub(crate) should_quit:       bool,
}

impl App
{
  /// Start in the process working directory with the user's configuration.
  ///
  /// A broken `init.lua` does not prevent startup: defaults are used and the
  /// error lands in the status line.
  pub fn new() -> io::Result<Self>
  {
    let cwd = env::current_dir()?;
    let paths = crate::config::discover_config_paths()?;
    let (loaded, err) = match crate::config::load_config(&paths)
    {
      Ok(artifacts) => (artifacts, None),
      Err(e) => (
        crate::config::load_config_from_code("", Some(&paths.root))?,
        Some(e),
      ),
    };
    let mut app = Self::with_config(&cwd, loaded.0, loaded.1)?;
    if let Some(e) = err
    {
      app.add_message(&format!("config error: {}", e));
    }
    Ok(app)
  }

  /// Start in `dir` with an explicit configuration.
  pub fn with_config(
    dir: &Path,
    config: Config,
    maps: Vec<KeyMapping>,
  ) -> io::Result<Self>
  {
    let cwd = std::fs::canonicalize(dir)?;
    let mut ratios = RatioPresets::builtin();
    for preset in &config.ui.ratios
    {
      ratios.insert(preset.clone());
    }
    if let Some(name) = config.ui.ratio.as_deref()
      && !ratios.select(name)
    {
      trace::log(format!("[config] unknown ratio preset '{}'", name));
    }
    let opts = ListingOptions {
      show_hidden: config.ui.show_hidden,
      dirs_first:  config.ui.dirs_first,
    };
    let screen = (80, 24);
    let mut app = Self {
      cwd,
      index: EntryIndex::default(),
      viewport: Viewport::new(list_rows(screen.1)),
      selection: SelectionSet::new(),
      search: SearchEngine::new(),
      ratios,
      opts,
      config,
      keys: KeyState::new(maps),
      overlay: Overlay::None,
      status: None,
      recent_messages: Vec::new(),
      console: Box::new(NullConsole),
      screen,
      last_output: None,
      force_full_redraw: false,
      should_quit: false,
    };
    app.rebuild();
    Ok(app)
  }

  /// Start in `dir` with built-in defaults only (no Lua involved).
  pub fn for_dir(dir: &Path) -> io::Result<Self>
  {
    Self::with_config(dir, Config::default(), crate::config::rust_default_keymaps())
  }

  /// Install the terminal hooks used while commands run.
  pub fn set_console(
    &mut self,
    console: Box<dyn Console>,
  )
  {
    self.console = console;
  }

  /// Feed one key event; returns `Ok(true)` once the session should end.
  pub fn on_key(
    &mut self,
    key: crossterm::event::KeyEvent,
  ) -> io::Result<bool>
  {
    crate::input::handle_key(self, key)
  }

  /// Adopt a new terminal size and re-validate the viewport.
  pub fn on_resize(
    &mut self,
    width: u16,
    height: u16,
  )
  {
    self.screen = (width, height);
    self.viewport.visible_rows = list_rows(height);
    self.sync_viewport();
    self.force_full_redraw = true;
  }

  /// Layout description for the next paint, using the full screen width.
  pub fn layout(&self) -> ColumnLayout
  {
    self.layout_with_width(self.screen.0)
  }

  pub fn layout_with_width(
    &self,
    width: u16,
  ) -> ColumnLayout
  {
    layout::compute(&LayoutInput {
      ratio: self.ratios.active(),
      cwd: &self.cwd,
      index: &self.index,
      viewport: &self.viewport,
      selection: &self.selection,
      opts: self.opts,
      width,
    })
  }

  pub fn status_message(&self) -> Option<&str>
  {
    self.status.as_deref()
  }

  /// Final working directory, for the caller to persist.
  pub fn on_exit(&self) -> PathBuf
  {
    trace::log(format!("[app] exit in '{}'", self.cwd.display()));
    self.cwd.clone()
  }

  pub fn cwd(&self) -> &Path
  {
    &self.cwd
  }

  pub fn index(&self) -> &EntryIndex
  {
    &self.index
  }

  pub fn viewport(&self) -> &Viewport
  {
    &self.viewport
  }

  pub fn selection(&self) -> &SelectionSet
  {
    &self.selection
  }

  pub fn search_pattern(&self) -> Option<&str>
  {
    self.search.pattern()
  }

  pub fn config(&self) -> &Config
  {
    &self.config
  }

  pub fn listing_options(&self) -> ListingOptions
  {
    self.opts
  }

  pub fn ratio_name(&self) -> &str
  {
    self.ratios.active().name()
  }

  pub fn overlay(&self) -> &Overlay
  {
    &self.overlay
  }

  pub fn last_output(&self) -> Option<&CommandOutcome>
  {
    self.last_output.as_ref()
  }

  pub fn get_quit(&self) -> bool
  {
    self.should_quit
  }

  pub fn current_entry(&self) -> Option<&Entry>
  {
    self.index.cursor_entry()
  }

  /// Names of the focused listing in display order.
  pub fn entry_names(&self) -> Vec<String>
  {
    self.index.entries().iter().map(|e| e.name.clone()).collect()
  }

  /// Report `msg` on the status line and keep it in the message history.
  pub fn add_message(
    &mut self,
    msg: &str,
  )
  {
    let m = msg.trim().to_string();
    if m.is_empty()
    {
      return;
    }
    trace::log(format!("[status] {}", m));
    self.status = Some(m.clone());
    self.recent_messages.push(m);
    if self.recent_messages.len() > 100
    {
      let _ = self.recent_messages.drain(0..self.recent_messages.len() - 100);
    }
  }

  /// Show the status messages of this session, oldest first.
  pub fn show_messages(&mut self)
  {
    let lines = if self.recent_messages.is_empty()
    {
      vec!["(no messages)".to_string()]
    }
    else
    {
      self.recent_messages.clone()
    };
    self.display_output("Messages", lines);
  }

  pub fn display_output(
    &mut self,
    title: &str,
    lines: Vec<String>,
  )
  {
    self.overlay = Overlay::Output { title: title.to_string(), lines };
    self.force_full_redraw = true;
  }

  pub(crate) fn take_full_redraw(&mut self) -> bool
  {
    std::mem::take(&mut self.force_full_redraw)
  }
}

/// Rows available to each column for a terminal `height` rows tall.
pub fn list_rows(height: u16) -> usize
{
  height.saturating_sub(CHROME_ROWS).max(1) as usize
}
