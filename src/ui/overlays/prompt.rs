use ratatui::{
  layout::{
    Position,
    Rect,
  },
  text::{
    Line,
    Span,
  },
  widgets::{
    Clear,
    Paragraph,
  },
};
use unicode_width::UnicodeWidthStr;

use crate::app::{
  App,
  Overlay,
};

pub fn draw_prompt_panel(
  f: &mut ratatui::Frame,
  area: Rect,
  app: &App,
)
{
  let Overlay::Prompt(ref state) = app.overlay
  else
  {
    return;
  };

  let width = (area.width.saturating_mul(60) / 100).max(20).min(area.width);
  let height = 3.min(area.height);
  let popup = Rect::new(
    area.x + area.width.saturating_sub(width) / 2,
    area.y + area.height.saturating_sub(height) / 2,
    width,
    height,
  );
  f.render_widget(Clear, popup);
  let block = super::popup_block(&state.title, app);
  let inner = block.inner(popup);
  f.render_widget(block, popup);

  // Keep the tail of long input visible.
  let before: String = state.input.chars().take(state.cursor).collect();
  let before_w = UnicodeWidthStr::width(before.as_str()) as u16;
  let skip = before_w.saturating_sub(inner.width.saturating_sub(1));
  let para = Paragraph::new(Line::from(Span::raw(state.input.clone()))).scroll((0, skip));
  f.render_widget(para, inner);
  if inner.width > 0 && inner.height > 0
  {
    f.set_cursor_position(Position::new(inner.x + before_w - skip, inner.y));
  }
}
