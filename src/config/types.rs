use crate::core::{
  command::BehaviorFlags,
  fs_ops::ReplacePolicy,
  layout::RatioConfig,
};

#[derive(Debug, Clone, Default)]
/// Key-handling configuration (currently only sequence timeout).
pub struct KeysConfig
{
  pub sequence_timeout_ms: u64,
}

#[derive(Debug, Clone, Default)]
/// Top-level configuration composed from Lua input.
pub struct Config
{
  pub keys:     KeysConfig,
  pub ui:       UiConfig,
  /// Commands bound with `colfm.map_command`, addressed by `run_cmd:<idx>`.
  pub commands: Vec<CommandBinding>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A single key mapping supplied by `colfm.mapkey` or `colfm.map_command`.
pub struct KeyMapping
{
  pub sequence:    String,
  pub action:      String,
  pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBinding
{
  pub template:    String,
  pub flags:       BehaviorFlags,
  pub description: Option<String>,
}

#[derive(Debug, Clone)]
/// User interface configuration block replicated from Lua.
pub struct UiConfig
{
  pub show_hidden:      bool,
  pub dirs_first:       bool,
  /// Name of the preset active at startup.
  pub ratio:            Option<String>,
  /// Extra presets; a name matching a built-in replaces it.
  pub ratios:           Vec<RatioConfig>,
  pub confirm_commands: bool,
  /// Policy for copy/move actions that do not name one.
  pub replace_existing: ReplacePolicy,
  /// Editor for bulk renames; `$VISUAL`, then `$EDITOR`, then `vi` if unset.
  pub editor:           Option<String>,
  pub theme:            Option<UiTheme>,
}

impl Default for UiConfig
{
  fn default() -> Self
  {
    Self {
      show_hidden:      false,
      dirs_first:       true,
      ratio:            None,
      ratios:           Vec::new(),
      confirm_commands: true,
      replace_existing: ReplacePolicy::Ask,
      editor:           None,
      theme:            None,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Theme colours for the UI. Fields are optional and fall back to defaults.
pub struct UiTheme
{
  pub dir_fg:      Option<String>,
  pub file_fg:     Option<String>,
  pub selected_fg: Option<String>,
  pub cursor_fg:   Option<String>,
  pub cursor_bg:   Option<String>,
  pub border_fg:   Option<String>,
  pub title_fg:    Option<String>,
  pub status_fg:   Option<String>,
}
