use ratatui::{
  layout::Rect,
  text::{
    Line,
    Span,
  },
  widgets::{
    Clear,
    Paragraph,
    Wrap,
  },
};

use crate::app::{
  App,
  Overlay,
};

pub fn draw_confirm_panel(
  f: &mut ratatui::Frame,
  area: Rect,
  app: &App,
)
{
  let Overlay::Confirm(ref state) = app.overlay
  else
  {
    return;
  };

  let width = 60.min(area.width);
  let height = 5.min(area.height);
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
  let lines: Vec<Line> = vec![Line::from(""), Line::from(Span::raw(state.question.clone()))];
  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}
