use ratatui::{
  layout::Rect,
  style::{
    Color,
    Modifier,
    Style,
  },
  text::{
    Line,
    Span,
  },
  widgets::{
    Block,
    Borders,
    Clear,
    Paragraph,
  },
};

use crate::{
  app::App,
  core::layout::{
    ColumnRole,
    LayoutColumn,
    LayoutRow,
  },
  ui::{
    colors::themed,
    truncate_to_width,
  },
};

/// Paint one column of the layout inside a bordered block.
pub fn draw_column(
  f: &mut ratatui::Frame,
  area: Rect,
  col: &LayoutColumn,
  app: &App,
)
{
  f.render_widget(Clear, area);
  let theme = app.config.ui.theme.as_ref();
  let border = themed(theme, |t| &t.border_fg, Color::DarkGray);
  let mut block = Block::default().borders(Borders::ALL).border_style(Style::default().fg(border));
  if col.role == ColumnRole::Focused
    && let Some(name) = col.dir.as_ref().and_then(|d| d.file_name())
  {
    block = block.title(Span::styled(
      name.to_string_lossy().to_string(),
      Style::default().fg(themed(theme, |t| &t.title_fg, Color::Gray)),
    ));
  }
  let inner = block.inner(area);
  f.render_widget(block, area);

  if let Some(ph) = col.placeholder
  {
    let style = Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC);
    f.render_widget(Paragraph::new(Span::styled(ph.text(), style)), inner);
    return;
  }

  let lines: Vec<Line> = col
    .rows
    .iter()
    .map(|row| row_line(row, col.role == ColumnRole::Focused, inner.width, app))
    .collect();
  f.render_widget(Paragraph::new(lines), inner);
}

fn row_line(
  row: &LayoutRow,
  in_focus: bool,
  width: u16,
  app: &App,
) -> Line<'static>
{
  let theme = app.config.ui.theme.as_ref();
  let mut text = row.text.clone();
  if row.is_dir
  {
    text.push('/');
  }
  let marker = if row.is_selected { "*" } else { " " };
  let body = truncate_to_width(&format!("{}{}", marker, text), width as usize);

  let fg = if row.is_selected
  {
    themed(theme, |t| &t.selected_fg, Color::Yellow)
  }
  else if row.is_dir
  {
    themed(theme, |t| &t.dir_fg, Color::Blue)
  }
  else
  {
    themed(theme, |t| &t.file_fg, Color::Reset)
  };
  let mut style = Style::default().fg(fg);
  if row.is_dir
  {
    style = style.add_modifier(Modifier::BOLD);
  }
  if row.is_focused
  {
    let bg = themed(theme, |t| &t.cursor_bg, Color::Blue);
    let cfg = themed(theme, |t| &t.cursor_fg, Color::White);
    style = if in_focus
    {
      Style::default().fg(cfg).bg(bg).add_modifier(Modifier::BOLD)
    }
    else
    {
      style.add_modifier(Modifier::REVERSED)
    };
    // Pad so the cursor bar spans the column.
    let pad = (width as usize).saturating_sub(unicode_width::UnicodeWidthStr::width(body.as_str()));
    return Line::from(Span::styled(format!("{}{}", body, " ".repeat(pad)), style));
  }
  Line::from(Span::styled(body, style))
}
