// Central action dispatcher.
//
// Accepts action strings, supports ';' separated sequences and executes
// the tagged actions parsed by `internal`.
use std::io;

use crate::app::App;

use super::internal::{
  execute_action,
  parse_action,
};
use crate::trace;

/// Parse and execute an action string.
///
/// Returns `Ok(true)` when at least one action was recognised.
pub fn dispatch_action(
  app: &mut App,
  action: &str,
) -> io::Result<bool>
{
  let parts: Vec<&str> =
    action.split(';').map(|s| s.trim()).filter(|s| !s.is_empty()).collect();
  if parts.len() > 1
  {
    let mut any = false;
    for p in parts
    {
      if dispatch_action(app, p)?
      {
        any = true;
      }
      if app.should_quit
      {
        break;
      }
    }
    return Ok(any);
  }

  match parse_action(action)
  {
    Some(act) =>
    {
      trace::log(format!("[dispatch] action='{}'", action));
      execute_action(app, act)?;
      Ok(true)
    }
    None =>
    {
      trace::log(format!("[dispatch] unknown action='{}'", action));
      app.add_message(&format!("unknown action: {}", action.trim()));
      Ok(false)
    }
  }
}
