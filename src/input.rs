//! Input handling for keyboard events.

use crate::{
  actions::{
    Action,
    NavAction,
    dispatch_action,
  },
  app::App,
  keymap::{
    KeyStep,
    token_for,
  },
};
use std::{
  io,
  time::{
    Duration,
    Instant,
  },
};

use crossterm::event::{
  KeyCode,
  KeyEvent,
  KeyEventKind,
};

/// Accept a terminal key event and mutate the [`App`] accordingly.
///
/// Returns `Ok(true)` when the caller should exit. Multi-key sequences are
/// resolved via the keymap; unmapped keys fall back to built-in navigation
/// on the arrow keys, Enter and Backspace.
pub fn handle_key(
  app: &mut App,
  key: KeyEvent,
) -> io::Result<bool>
{
  // Release/repeat events would otherwise be processed twice on some
  // terminals.
  if key.kind != KeyEventKind::Press
  {
    return Ok(false);
  }
  app.status = None;

  if app.handle_overlay_key(key)
  {
    app.sync_viewport();
    return Ok(app.should_quit);
  }

  if let Some(tok) = token_for(key.code, key.modifiers)
  {
    let ms = app.config.keys.sequence_timeout_ms;
    let timeout = (ms > 0).then(|| Duration::from_millis(ms));
    if let KeyStep::Action(action) = app.keys.feed(&tok, Instant::now(), timeout)
    {
      dispatch_action(app, &action)?;
    }
    return Ok(app.should_quit);
  }

  let fallback = match key.code
  {
    KeyCode::Up => Some(Action::Nav(NavAction::Up)),
    KeyCode::Down => Some(Action::Nav(NavAction::Down)),
    KeyCode::PageUp => Some(Action::Nav(NavAction::PageUp)),
    KeyCode::PageDown => Some(Action::Nav(NavAction::PageDown)),
    KeyCode::Home => Some(Action::Nav(NavAction::Top)),
    KeyCode::End => Some(Action::Nav(NavAction::Bottom)),
    KeyCode::Enter | KeyCode::Right => Some(Action::Nav(NavAction::Enter)),
    KeyCode::Backspace | KeyCode::Left => Some(Action::Nav(NavAction::Parent)),
    KeyCode::Esc =>
    {
      app.keys.clear_pending();
      None
    }
    _ => None,
  };
  if let Some(action) = fallback
  {
    crate::actions::internal::execute_action(app, action)?;
  }
  Ok(app.should_quit)
}
