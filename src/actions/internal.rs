// Tagged actions behind the action strings used in keymaps.

use std::io;

use crate::{
  app::App,
  core::{
    fs_ops::{
      ReplacePolicy,
      TransferOp,
    },
    search::SearchDirection,
  },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction
{
  Up,
  Down,
  PageUp,
  PageDown,
  Top,
  Bottom,
  Parent,
  Enter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAction
{
  Toggle,
  All,
  Clear,
  Show,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action
{
  Quit,
  Nav(NavAction),
  Scroll(isize),
  Select(SelectAction),
  ToggleHidden,
  ToggleDirsFirst,
  RatioNext,
  RatioPrev,
  Search(SearchDirection),
  CommandPrompt,
  RunCommand(usize),
  /// Copy or move the selection here; `None` uses the configured policy.
  Transfer(TransferOp, Option<ReplacePolicy>),
  Rename,
  BulkRename,
  Messages,
}

/// Parse an action string such as `nav:down` or `run_cmd:3`.
pub fn parse_action(s: &str) -> Option<Action>
{
  let low = s.trim().to_ascii_lowercase();
  if let Some(rest) = low.strip_prefix("run_cmd:")
  {
    return rest.parse::<usize>().ok().map(Action::RunCommand);
  }
  for (prefix, op) in [("file:copy_here", TransferOp::Copy), ("file:move_here", TransferOp::Move)]
  {
    if let Some(rest) = low.strip_prefix(prefix)
    {
      return match rest.strip_prefix(':')
      {
        None if rest.is_empty() => Some(Action::Transfer(op, None)),
        Some(name) => ReplacePolicy::from_name(name).map(|p| Action::Transfer(op, Some(p))),
        None => None,
      };
    }
  }
  let act = match low.as_str()
  {
    "quit" | "q" => Action::Quit,
    "nav:up" => Action::Nav(NavAction::Up),
    "nav:down" => Action::Nav(NavAction::Down),
    "nav:page_up" => Action::Nav(NavAction::PageUp),
    "nav:page_down" => Action::Nav(NavAction::PageDown),
    "nav:top" | "top" => Action::Nav(NavAction::Top),
    "nav:bottom" | "bottom" => Action::Nav(NavAction::Bottom),
    "nav:parent" => Action::Nav(NavAction::Parent),
    "nav:enter" => Action::Nav(NavAction::Enter),
    "scroll:up" => Action::Scroll(-1),
    "scroll:down" => Action::Scroll(1),
    "select:toggle" => Action::Select(SelectAction::Toggle),
    "select:all" => Action::Select(SelectAction::All),
    "select:clear" => Action::Select(SelectAction::Clear),
    "select:show" => Action::Select(SelectAction::Show),
    "toggle:hidden" => Action::ToggleHidden,
    "toggle:dirs_first" => Action::ToggleDirsFirst,
    "ratio:next" => Action::RatioNext,
    "ratio:prev" => Action::RatioPrev,
    "search:new" => Action::Search(SearchDirection::New),
    "search:next" => Action::Search(SearchDirection::Next),
    "search:prev" => Action::Search(SearchDirection::Previous),
    "cmd:prompt" => Action::CommandPrompt,
    "file:rename" => Action::Rename,
    "file:bulk_rename" => Action::BulkRename,
    "messages" | "ui:messages" => Action::Messages,
    _ => return None,
  };
  Some(act)
}

pub(crate) fn execute_action(
  app: &mut App,
  action: Action,
) -> io::Result<()>
{
  match action
  {
    Action::Quit =>
    {
      app.should_quit = true;
    }
    Action::Nav(nav) => match nav
    {
      NavAction::Up => app.move_cursor(-1),
      NavAction::Down => app.move_cursor(1),
      NavAction::PageUp => app.page(-1),
      NavAction::PageDown => app.page(1),
      NavAction::Top => app.go_top(),
      NavAction::Bottom => app.go_bottom(),
      NavAction::Parent => app.go_parent(),
      NavAction::Enter => app.enter_current(),
    },
    Action::Scroll(delta) => app.scroll(delta),
    Action::Select(sel) => match sel
    {
      SelectAction::Toggle => app.toggle_select_current(),
      SelectAction::All => app.select_all(),
      SelectAction::Clear => app.clear_selection(),
      SelectAction::Show => app.show_selection(),
    },
    Action::ToggleHidden => app.toggle_hidden(),
    Action::ToggleDirsFirst => app.toggle_dirs_first(),
    Action::RatioNext => app.cycle_ratio(true),
    Action::RatioPrev => app.cycle_ratio(false),
    Action::Search(SearchDirection::New) => app.open_search_prompt(),
    Action::Search(dir) => app.search_step(dir),
    Action::CommandPrompt => app.open_command_prompt(),
    Action::RunCommand(idx) => app.run_bound_command(idx),
    Action::Transfer(op, policy) =>
    {
      let policy = policy.unwrap_or(app.config.ui.replace_existing);
      app.transfer_selection_here(op, policy);
    }
    Action::Rename => app.open_rename_prompt(),
    Action::BulkRename => app.bulk_rename(),
    Action::Messages => app.show_messages(),
  }
  app.sync_viewport();
  Ok(())
}
