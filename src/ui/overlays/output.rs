use ratatui::{
  layout::{
    Constraint,
    Direction,
    Layout,
    Rect,
  },
  text::Line,
  widgets::{
    Clear,
    Paragraph,
  },
};

use crate::app::{
  App,
  Overlay,
};

pub fn draw_output_panel(
  f: &mut ratatui::Frame,
  area: Rect,
  app: &App,
)
{
  let Overlay::Output { ref title, ref lines } = app.overlay
  else
  {
    return;
  };
  let min_h = ((area.height as u32 * 20) / 100).max(3) as u16;
  let max_h = ((area.height as u32 * 60) / 100).max(min_h as u32) as u16;
  let needed = (lines.len() as u16).saturating_add(2).max(3);
  let panel_h = needed.min(max_h).max(min_h).min(area.height);

  let layout = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Min(0), Constraint::Length(panel_h)])
    .split(area);
  let panel = layout[1];
  f.render_widget(Clear, panel);

  // Show the last lines when the list does not fit.
  let avail_rows = panel_h.saturating_sub(2) as usize;
  let start = lines.len().saturating_sub(avail_rows);
  let body: Vec<Line> = lines[start..].iter().map(|l| Line::from(l.clone())).collect();
  let block = super::popup_block(title, app);
  f.render_widget(Paragraph::new(body).block(block), panel);
}
