use super::KeyMapping;

fn map(
  sequence: &str,
  action: &str,
  description: &str,
) -> KeyMapping
{
  KeyMapping {
    sequence:    sequence.into(),
    action:      action.into(),
    description: Some(description.into()),
  }
}

/// Built-in keymaps defined in Rust, applied before anything from Lua so
/// user bindings win.
pub fn rust_default_keymaps() -> Vec<KeyMapping>
{
  vec![
    map("q", "quit", "Quit"),
    // Movement
    map("j", "nav:down", "Down"),
    map("k", "nav:up", "Up"),
    map("h", "nav:parent", "Parent directory"),
    map("l", "nav:enter", "Enter directory"),
    map("<C-d>", "nav:page_down", "Half page down"),
    map("<C-u>", "nav:page_up", "Half page up"),
    map("g", "nav:top", "Go to top"),
    map("G", "nav:bottom", "Go to bottom"),
    map("<C-e>", "scroll:down", "Scroll down"),
    map("<C-y>", "scroll:up", "Scroll up"),
    // Selection
    map("v", "select:toggle", "Toggle selection"),
    map("V", "select:clear", "Clear selection"),
    map("<C-a>", "select:all", "Select all"),
    map("<C-v>", "select:show", "Show selection"),
    // Listing
    map(".", "toggle:hidden", "Toggle hidden files"),
    map("<C-h>", "toggle:hidden", "Toggle hidden files"),
    map("zh", "toggle:hidden", "Toggle hidden files"),
    map("zd", "toggle:dirs_first", "Toggle directories first"),
    // Ctrl+/ and Ctrl+_ both arrive as Ctrl+7 on Unix terminals.
    map("<C-7>", "toggle:dirs_first", "Toggle directories first"),
    map("~", "ratio:next", "Next column preset"),
    map("`", "ratio:prev", "Previous column preset"),
    // Search
    map("/", "search:new", "Search"),
    map("n", "search:next", "Next match"),
    map("N", "search:prev", "Previous match"),
    // Commands and file operations
    map("!", "cmd:prompt", "Run command"),
    map("y", "file:copy_here", "Copy selection here"),
    map("d", "file:move_here", "Move selection here"),
    map("c", "file:rename", "Rename"),
    map("b", "file:bulk_rename", "Rename selection in $EDITOR"),
    map("zm", "messages", "Show messages"),
  ]
}
