//! Running shell command templates and acting on their output.

use crate::{
  app::{
    App,
    ConfirmKind,
    ConfirmState,
    Overlay,
    PromptKind,
    PromptState,
  },
  core::command::{
    self,
    BehaviorFlags,
  },
  trace,
};

impl App
{
  pub fn open_command_prompt(&mut self)
  {
    self.overlay = Overlay::Prompt(Box::new(PromptState {
      title:  "Command".to_string(),
      input:  String::new(),
      cursor: 0,
      kind:   PromptKind::Command,
    }));
  }

  /// Execute the command bound at `idx` by `colfm.map_command`.
  pub fn run_bound_command(
    &mut self,
    idx: usize,
  )
  {
    let Some(binding) = self.config.commands.get(idx).cloned()
    else
    {
      self.add_message(&format!("no command bound at {}", idx));
      return;
    };
    self.execute_command(&binding.template, binding.flags);
  }

  /// Expand `template`, ask for confirmation when required, then run it.
  pub fn execute_command(
    &mut self,
    template: &str,
    flags: BehaviorFlags,
  )
  {
    let expanded = match command::expand_template(
      template,
      self.index.cursor_entry(),
      &self.selection,
      &self.cwd,
    )
    {
      Ok(s) => s,
      Err(e) =>
      {
        self.add_message(&format!("command aborted: {}", e));
        return;
      }
    };
    if flags.no_confirm || !self.config.ui.confirm_commands
    {
      self.run_expanded(&expanded, flags);
      return;
    }
    self.overlay = Overlay::Confirm(Box::new(ConfirmState {
      title:    "Run command".to_string(),
      question: format!("{} (y/n)", expanded),
      kind:     ConfirmKind::RunCommand { command: expanded, flags },
    }));
  }

  /// Run an already expanded command line and apply `flags` to the result.
  pub(crate) fn run_expanded(
    &mut self,
    line: &str,
    flags: BehaviorFlags,
  )
  {
    trace::log(format!("[cmd] run '{}' flags={:?}", line, flags));
    if !flags.keep_raw
      && let Err(e) = self.console.suspend()
    {
      trace::log(format!("[cmd] suspend failed: {}", e));
    }
    let result = command::run_shell(line, &self.cwd, self.console.as_mut());
    if !flags.no_wait
    {
      self.console.wait_for_key();
    }
    if !flags.keep_raw
      && let Err(e) = self.console.resume()
    {
      trace::log(format!("[cmd] resume failed: {}", e));
    }
    self.force_full_redraw = true;

    let usable = match &result
    {
      Ok(outcome) => outcome.usable_line().map(str::to_string),
      Err(_) => None,
    };
    match &result
    {
      Ok(outcome) if outcome.success => self.add_message(&format!("done: {}", line)),
      Ok(outcome) => match outcome.exit_code
      {
        Some(code) => self.add_message(&format!("command exited with status {}", code)),
        None => self.add_message("command terminated by signal"),
      },
      Err(e) => self.add_message(&format!("command failed: {}", e)),
    }
    self.last_output = result.ok();

    if !flags.no_reload
    {
      self.rebuild();
    }
    if flags.search_output
      && let Some(pattern) = usable.as_deref()
    {
      if flags.no_persist_search
      {
        let res = self.search_transient(pattern, self.index.cursor());
        self.apply_search(res);
      }
      else
      {
        self.search_new(pattern);
      }
    }
    if flags.cd_to_output
      && let Some(target) = usable.as_deref()
    {
      let path = self.cwd.join(target);
      if let Err(e) = self.set_cwd(&path)
      {
        self.add_message(&format!("cd {}: {}", target, e));
      }
    }
  }
}
