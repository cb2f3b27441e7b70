//! Key tokens and sequence resolution.

use std::{
  collections::{
    HashMap,
    HashSet,
  },
  time::{
    Duration,
    Instant,
  },
};

use crossterm::event::{
  KeyCode,
  KeyModifiers,
};

use crate::config::KeyMapping;

/// Result of feeding one token into a [`KeyState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyStep
{
  /// A complete sequence matched; the pending buffer is empty again.
  Action(String),
  /// The tokens so far start at least one longer sequence.
  Pending,
  /// Nothing matched, not even the last token on its own.
  Unbound,
}

/// Bound sequences plus the partially typed sequence.
#[derive(Debug, Clone, Default)]
pub struct KeyState
{
  maps:     Vec<KeyMapping>,
  bound:    HashMap<String, String>,
  prefixes: HashSet<String>,
  pending:  String,
  last_at:  Option<Instant>,
}

impl KeyState
{
  pub fn new(maps: Vec<KeyMapping>) -> Self
  {
    let mut st = Self::default();
    st.set_maps(maps);
    st
  }

  /// Replace every binding. Later mappings of the same sequence win.
  pub fn set_maps(
    &mut self,
    maps: Vec<KeyMapping>,
  )
  {
    self.bound.clear();
    self.prefixes.clear();
    self.pending.clear();
    for m in &maps
    {
      self.bound.insert(m.sequence.clone(), m.action.clone());
      let tokens = tokenize_sequence(&m.sequence);
      for n in 1..tokens.len()
      {
        self.prefixes.insert(tokens[..n].concat());
      }
    }
    self.maps = maps;
  }

  pub fn maps(&self) -> &[KeyMapping]
  {
    &self.maps
  }

  pub fn action_for(
    &self,
    seq: &str,
  ) -> Option<&str>
  {
    self.bound.get(seq).map(String::as_str)
  }

  /// True when `seq` is a proper prefix of some bound sequence.
  pub fn is_prefix(
    &self,
    seq: &str,
  ) -> bool
  {
    self.prefixes.contains(seq)
  }

  /// Tokens typed so far of an unfinished sequence.
  pub fn pending(&self) -> &str
  {
    &self.pending
  }

  pub fn clear_pending(&mut self)
  {
    self.pending.clear();
  }

  /// Append `tok` to the pending sequence and resolve it.
  ///
  /// A pending sequence older than `timeout` is dropped first. When the
  /// extended sequence leads nowhere, `tok` is retried on its own so a
  /// stray prefix key does not swallow the next binding.
  pub fn feed(
    &mut self,
    tok: &str,
    now: Instant,
    timeout: Option<Duration>,
  ) -> KeyStep
  {
    if let (Some(limit), Some(last)) = (timeout, self.last_at)
      && now.duration_since(last) > limit
    {
      self.pending.clear();
    }
    self.last_at = Some(now);

    let had_pending = !self.pending.is_empty();
    self.pending.push_str(tok);
    if let Some(action) = self.bound.get(&self.pending)
    {
      let action = action.clone();
      self.pending.clear();
      return KeyStep::Action(action);
    }
    if self.prefixes.contains(&self.pending)
    {
      return KeyStep::Pending;
    }
    self.pending.clear();
    if had_pending
    {
      if let Some(action) = self.bound.get(tok)
      {
        return KeyStep::Action(action.clone());
      }
      if self.prefixes.contains(tok)
      {
        self.pending.push_str(tok);
        return KeyStep::Pending;
      }
    }
    KeyStep::Unbound
  }
}

/// Split a key sequence string into tokens, preserving modifier tokens like
/// "<C-x>" as single units.
pub fn tokenize_sequence(seq: &str) -> Vec<String>
{
  let mut toks = Vec::new();
  let mut i = 0;
  let b = seq.as_bytes();
  while i < b.len()
  {
    if b[i] == b'<'
      && let Some(j) = seq[i + 1..].find('>')
      && j > 0
    {
      let end = i + 1 + j + 1;
      toks.push(seq[i..end].to_string());
      i = end;
      continue;
    }
    let Some(ch) = seq[i..].chars().next()
    else
    {
      break;
    };
    toks.push(ch.to_string());
    i += ch.len_utf8();
  }
  toks
}

/// Build a key token from a character and its modifiers.
/// Examples: 'x' -> "x", Ctrl-x -> "<C-x>", Alt-x -> "<M-x>". Shift is
/// already reflected in the character itself and is ignored.
pub fn build_token(
  ch: char,
  mods: KeyModifiers,
) -> String
{
  let ctrl = mods.contains(KeyModifiers::CONTROL);
  let alt = mods.contains(KeyModifiers::ALT);
  let superm = mods.contains(KeyModifiers::SUPER);
  if ctrl || alt || superm
  {
    let mut tok = String::from("<");
    if ctrl
    {
      tok.push_str("C-");
    }
    if alt
    {
      tok.push_str("M-");
    }
    if superm
    {
      tok.push_str("S-");
    }
    tok.push(ch);
    tok.push('>');
    tok
  }
  else
  {
    ch.to_string()
  }
}

/// Token for a key event, or `None` for keys that never take part in
/// sequences (arrows, Enter, ...).
pub fn token_for(
  code: KeyCode,
  mods: KeyModifiers,
) -> Option<String>
{
  match code
  {
    KeyCode::Char(ch) => Some(build_token(ch, mods)),
    _ => None,
  }
}
