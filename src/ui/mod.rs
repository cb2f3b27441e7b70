pub mod colors;
pub mod overlays;
pub mod panes;

use ratatui::{
  layout::{
    Alignment,
    Constraint,
    Direction,
    Layout,
    Rect,
  },
  style::{
    Color,
    Style,
  },
  widgets::Paragraph,
};
use unicode_width::{
  UnicodeWidthChar,
  UnicodeWidthStr,
};

use crate::app::{
  App,
  Overlay,
};
use colors::themed;

pub fn draw(
  f: &mut ratatui::Frame,
  app: &App,
)
{
  // Header row, columns, status row.
  let full = f.area();
  let vchunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(1), Constraint::Min(1), Constraint::Length(1)])
    .split(full);

  draw_header(f, vchunks[0], app);

  let main = vchunks[1];
  let layout = app.layout_with_width(main.width);
  for col in &layout.columns
  {
    if col.width == 0
    {
      continue;
    }
    let area = Rect { x: main.x + col.x, y: main.y, width: col.width, height: main.height };
    panes::draw_column(f, area, col, app);
  }

  draw_status(f, vchunks[2], app);

  match app.overlay
  {
    Overlay::Prompt(_) => overlays::draw_prompt_panel(f, full, app),
    Overlay::Confirm(_) => overlays::draw_confirm_panel(f, full, app),
    Overlay::Output { .. } => overlays::draw_output_panel(f, full, app),
    Overlay::None =>
    {}
  }
}

fn draw_header(
  f: &mut ratatui::Frame,
  area: Rect,
  app: &App,
)
{
  // Left: {user}@{host}:{cwd}; right: active preset and selection size.
  let user = whoami::username();
  let host = whoami::fallible::hostname().unwrap_or_default();
  let left_full = format!("{}@{}:{}", user, host, app.cwd.display());
  let right_full = if app.selection.is_empty()
  {
    format!("[{}]", app.ratios.active().name())
  }
  else
  {
    format!("sel:{}  [{}]", app.selection.len(), app.ratios.active().name())
  };

  let total = area.width as usize;
  let right_w = UnicodeWidthStr::width(right_full.as_str());
  let left = truncate_to_width(&left_full, total.saturating_sub(right_w + 1));

  let style =
    Style::default().fg(themed(app.config.ui.theme.as_ref(), |t| &t.title_fg, Color::Gray));
  f.render_widget(Paragraph::new(left).alignment(Alignment::Left).style(style), area);
  f.render_widget(Paragraph::new(right_full).alignment(Alignment::Right).style(style), area);
}

fn draw_status(
  f: &mut ratatui::Frame,
  area: Rect,
  app: &App,
)
{
  let style = Style::default().fg(themed(
    app.config.ui.theme.as_ref(),
    |t| &t.status_fg,
    Color::Yellow,
  ));
  let position = if app.index.is_empty()
  {
    String::from("0/0")
  }
  else
  {
    format!("{}/{}", app.index.cursor(), app.index.len())
  };
  let pending = if app.keys.pending().is_empty()
  {
    String::new()
  }
  else
  {
    format!("{}  ", app.keys.pending())
  };
  let right = format!("{}{}", pending, position);
  let msg = app.status.as_deref().unwrap_or_default();
  let left = truncate_to_width(
    msg,
    (area.width as usize).saturating_sub(UnicodeWidthStr::width(right.as_str()) + 1),
  );
  f.render_widget(Paragraph::new(left).alignment(Alignment::Left).style(style), area);
  f.render_widget(Paragraph::new(right).alignment(Alignment::Right).style(style), area);
}

/// Cut `s` to at most `max_w` terminal cells.
pub fn truncate_to_width(
  s: &str,
  max_w: usize,
) -> String
{
  if max_w == 0
  {
    return String::new();
  }
  let mut out = String::new();
  let mut w = 0usize;
  for ch in s.chars()
  {
    let cw = UnicodeWidthChar::width(ch).unwrap_or(0);
    if w + cw > max_w
    {
      break;
    }
    out.push(ch);
    w += cw;
  }
  out
}
