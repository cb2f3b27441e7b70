//! Key handling while a prompt, confirmation or output overlay is open.

use crossterm::event::{
  KeyCode,
  KeyEvent,
};

use crate::{
  app::{
    App,
    ConfirmKind,
    Overlay,
    PromptKind,
    PromptState,
  },
  core::command::BehaviorFlags,
};

impl App
{
  pub fn has_overlay(&self) -> bool
  {
    !matches!(self.overlay, Overlay::None)
  }

  /// Route `key` to the open overlay. Returns `false` when none is open.
  pub(crate) fn handle_overlay_key(
    &mut self,
    key: KeyEvent,
  ) -> bool
  {
    match self.overlay
    {
      Overlay::None => return false,
      Overlay::Output { .. } => self.close_overlay(),
      Overlay::Confirm(_) => match key.code
      {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => self.answer_confirm(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.answer_confirm(false),
        _ =>
        {}
      },
      Overlay::Prompt(_) => match key.code
      {
        KeyCode::Esc => self.close_overlay(),
        KeyCode::Enter => self.submit_prompt(),
        code =>
        {
          if let Overlay::Prompt(state) = &mut self.overlay
          {
            edit_prompt(state, code);
          }
        }
      },
    }
    true
  }

  fn close_overlay(&mut self)
  {
    self.overlay = Overlay::None;
    self.force_full_redraw = true;
  }

  fn answer_confirm(
    &mut self,
    yes: bool,
  )
  {
    let Overlay::Confirm(state) = std::mem::replace(&mut self.overlay, Overlay::None)
    else
    {
      return;
    };
    self.force_full_redraw = true;
    match state.kind
    {
      ConfirmKind::RunCommand { command, flags } =>
      {
        if yes
        {
          self.run_expanded(&command, flags);
        }
        else
        {
          self.add_message("command cancelled");
        }
      }
      ConfirmKind::Replace { op, items } => self.finish_transfer(op, &items, yes),
    }
  }

  fn submit_prompt(&mut self)
  {
    let Overlay::Prompt(state) = std::mem::replace(&mut self.overlay, Overlay::None)
    else
    {
      return;
    };
    self.force_full_redraw = true;
    let input = state.input;
    match state.kind
    {
      PromptKind::Search => self.search_new(&input),
      PromptKind::Command =>
      {
        if input.trim().is_empty()
        {
          return;
        }
        let flags = BehaviorFlags { no_confirm: true, ..BehaviorFlags::default() };
        self.execute_command(&input, flags);
      }
      PromptKind::Rename { name } => self.rename_entry(&name, &input),
    }
  }
}

fn byte_index(
  s: &str,
  char_pos: usize,
) -> usize
{
  s.char_indices().nth(char_pos).map(|(i, _)| i).unwrap_or(s.len())
}

fn edit_prompt(
  st: &mut PromptState,
  code: KeyCode,
)
{
  let len = st.input.chars().count();
  match code
  {
    KeyCode::Char(c) =>
    {
      let at = byte_index(&st.input, st.cursor);
      st.input.insert(at, c);
      st.cursor += 1;
    }
    KeyCode::Backspace =>
    {
      if st.cursor > 0
      {
        st.cursor -= 1;
        let at = byte_index(&st.input, st.cursor);
        st.input.remove(at);
      }
    }
    KeyCode::Delete =>
    {
      if st.cursor < len
      {
        let at = byte_index(&st.input, st.cursor);
        st.input.remove(at);
      }
    }
    KeyCode::Left => st.cursor = st.cursor.saturating_sub(1),
    KeyCode::Right => st.cursor = (st.cursor + 1).min(len),
    KeyCode::Home => st.cursor = 0,
    KeyCode::End => st.cursor = len,
    _ =>
    {}
  }
}
