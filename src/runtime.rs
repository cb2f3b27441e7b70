use std::{
  io::{
    self,
    Write,
  },
  time::Duration,
};

use crossterm::{
  cursor,
  event,
  event::{
    Event,
    KeyEventKind,
  },
  execute,
  terminal::{
    self,
    EnterAlternateScreen,
    LeaveAlternateScreen,
    disable_raw_mode,
    enable_raw_mode,
  },
};
use ratatui::{
  Terminal,
  backend::CrosstermBackend,
};

use crate::{
  app::App,
  core::command::Console,
  trace,
};

/// Console backed by the real terminal: leaves the alternate screen while a
/// command runs and echoes its output to stdout.
#[derive(Debug, Default)]
pub struct TerminalConsole;

impl Console for TerminalConsole
{
  fn suspend(&mut self) -> io::Result<()>
  {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)?;
    Ok(())
  }

  fn resume(&mut self) -> io::Result<()>
  {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;
    Ok(())
  }

  fn echo(
    &mut self,
    bytes: &[u8],
  )
  {
    let mut out = io::stdout();
    let _ = out.write_all(bytes);
    let _ = out.flush();
  }

  fn wait_for_key(&mut self)
  {
    let mut out = io::stdout();
    let _ = out.write_all(b"\r\n[press any key to continue]");
    let _ = out.flush();
    let was_raw = terminal::is_raw_mode_enabled().unwrap_or(false);
    if !was_raw && let Err(e) = enable_raw_mode()
    {
      trace::log(format!("[runtime] raw mode for wait failed: {}", e));
    }
    loop
    {
      match event::read()
      {
        Ok(Event::Key(k)) if k.kind == KeyEventKind::Press => break,
        Ok(_) =>
        {}
        Err(_) => break,
      }
    }
    if !was_raw
    {
      let _ = disable_raw_mode();
    }
  }
}

pub fn run_app(app: &mut App) -> Result<(), Box<dyn std::error::Error>>
{
  enable_raw_mode()?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen)?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend)?;
  terminal.clear()?;
  app.set_console(Box::new(TerminalConsole));
  let (w, h) = terminal::size()?;
  app.on_resize(w, h);

  // Restore the terminal even if event handling fails.
  let res: Result<(), Box<dyn std::error::Error>> = {
    let mut result: Result<(), Box<dyn std::error::Error>> = Ok(());
    loop
    {
      if app.take_full_redraw()
      {
        let _ = terminal.clear();
      }
      if let Err(e) = terminal.draw(|f| crate::ui::draw(f, app))
      {
        result = Err(e.into());
        break;
      }
      match event::poll(Duration::from_millis(200))
      {
        Ok(true) => match event::read()
        {
          Ok(Event::Key(key)) => match app.on_key(key)
          {
            Ok(true) => break,
            Ok(false) =>
            {}
            Err(e) =>
            {
              result = Err(e.into());
              break;
            }
          },
          Ok(Event::Resize(w, h)) => app.on_resize(w, h),
          Ok(_) =>
          {}
          Err(e) =>
          {
            result = Err(e.into());
            break;
          }
        },
        Ok(false) =>
        {}
        Err(e) =>
        {
          result = Err(e.into());
          break;
        }
      }
    }
    result
  };

  disable_raw_mode()?;
  execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
  terminal.show_cursor()?;
  res
}
