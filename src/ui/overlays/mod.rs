pub mod confirm;
pub mod output;
pub mod prompt;

pub use confirm::draw_confirm_panel;
pub use output::draw_output_panel;
pub use prompt::draw_prompt_panel;

use ratatui::{
  style::{
    Color,
    Modifier,
    Style,
  },
  text::Span,
  widgets::{
    Block,
    Borders,
  },
};

/// Bordered, titled block shared by the popups.
pub(crate) fn popup_block(
  title: &str,
  app: &crate::app::App,
) -> Block<'static>
{
  let theme = app.config.ui.theme.as_ref();
  let border = crate::ui::colors::themed(theme, |t| &t.border_fg, Color::Gray);
  let title_fg = crate::ui::colors::themed(theme, |t| &t.title_fg, Color::Yellow);
  Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border))
    .title(Span::styled(
      title.to_string(),
      Style::default().fg(title_fg).add_modifier(Modifier::BOLD),
    ))
}
