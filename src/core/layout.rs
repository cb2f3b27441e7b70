//! Ratio-driven column layout.
//!
//! A [`RatioConfig`] splits the available width into weighted columns and
//! marks one of them as the focused column. [`compute`] turns it, together
//! with the working directory and the cursor state, into a [`ColumnLayout`]
//! describing what every column shows: ancestor directories to the left of
//! the focused column and a drill-down preview of the focused entry to the
//! right. Side columns scan the filesystem on every call and never touch
//! the focused index.

use std::path::{
  Path,
  PathBuf,
};

use thiserror::Error;

use crate::core::{
  index::EntryIndex,
  listing::{
    Entry,
    ListingOptions,
    read_dir_sorted,
  },
  selection::SelectionSet,
  viewport::Viewport,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError
{
  #[error("ratio preset '{0}' has no columns")]
  EmptyWeights(String),
  #[error("ratio preset '{name}' has a zero weight in column {column}")]
  ZeroWeight
  {
    name:   String,
    column: usize,
  },
  #[error("ratio preset '{name}' focuses column {current} but has {len}")]
  CurrentOutOfRange
  {
    name:    String,
    current: usize,
    len:     usize,
  },
}

/// Named column weights plus the index of the focused column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatioConfig
{
  name:    String,
  weights: Vec<u16>,
  current: usize,
}

impl RatioConfig
{
  pub fn new(
    name: impl Into<String>,
    weights: Vec<u16>,
    current: usize,
  ) -> Result<Self, LayoutError>
  {
    let name = name.into();
    if weights.is_empty()
    {
      return Err(LayoutError::EmptyWeights(name));
    }
    if let Some(column) = weights.iter().position(|w| *w == 0)
    {
      return Err(LayoutError::ZeroWeight { name, column });
    }
    if current >= weights.len()
    {
      return Err(LayoutError::CurrentOutOfRange {
        name,
        current,
        len: weights.len(),
      });
    }
    Ok(Self { name, weights, current })
  }

  pub fn name(&self) -> &str
  {
    &self.name
  }

  pub fn weights(&self) -> &[u16]
  {
    &self.weights
  }

  pub fn current(&self) -> usize
  {
    self.current
  }
}

/// The fixed preset list with a cyclic cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatioPresets
{
  presets: Vec<RatioConfig>,
  active:  usize,
}

impl Default for RatioPresets
{
  fn default() -> Self
  {
    Self::builtin()
  }
}

impl RatioPresets
{
  /// Built-in presets: a lone listing, listing plus preview, the classic
  /// parent/current/preview split and a deeper four column variant.
  pub fn builtin() -> Self
  {
    let presets = [
      ("single", vec![1], 0),
      ("dual", vec![1, 1], 0),
      ("ranger", vec![1, 1, 2], 1),
      ("miller", vec![1, 1, 3, 2], 2),
    ]
    .into_iter()
    .filter_map(|(n, w, c)| RatioConfig::new(n, w, c).ok())
    .collect();
    Self { presets, active: 2 }
  }

  pub fn active(&self) -> &RatioConfig
  {
    &self.presets[self.active]
  }

  pub fn names(&self) -> Vec<&str>
  {
    self.presets.iter().map(|p| p.name()).collect()
  }

  pub fn next(&mut self)
  {
    self.active = (self.active + 1) % self.presets.len();
  }

  pub fn prev(&mut self)
  {
    let len = self.presets.len();
    self.active = (self.active + len - 1) % len;
  }

  /// Make the preset called `name` active. Returns false when unknown.
  pub fn select(
    &mut self,
    name: &str,
  ) -> bool
  {
    match self.presets.iter().position(|p| p.name == name)
    {
      Some(i) =>
      {
        self.active = i;
        true
      }
      None => false,
    }
  }

  /// Add a preset, replacing one with the same name.
  pub fn insert(
    &mut self,
    preset: RatioConfig,
  )
  {
    match self.presets.iter().position(|p| p.name == preset.name)
    {
      Some(i) => self.presets[i] = preset,
      None => self.presets.push(preset),
    }
  }
}

/// Split `width` by `weights`; the last column takes the rounding
/// remainder so the widths always sum to `width`.
pub fn column_widths(
  weights: &[u16],
  width: u16,
) -> Vec<u16>
{
  if weights.is_empty()
  {
    return Vec::new();
  }
  let total: u32 = weights.iter().map(|w| *w as u32).sum();
  let unit = if total == 0 { 0 } else { width as u32 / total };
  let mut out: Vec<u16> = weights.iter().map(|w| (*w as u32 * unit) as u16).collect();
  let prior: u16 = out[..out.len() - 1].iter().sum();
  if let Some(last) = out.last_mut()
  {
    *last = width - prior;
  }
  out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole
{
  /// `n` levels above the working directory (1 = parent).
  Ancestor(usize),
  Focused,
  /// `n` levels below the focused entry (1 = its contents).
  Descendant(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder
{
  NoFiles,
  Unreadable,
}

impl Placeholder
{
  pub fn text(&self) -> &'static str
  {
    match self
    {
      Placeholder::NoFiles => "no files",
      Placeholder::Unreadable => "unreadable",
    }
  }
}

/// One painted row: `row` counts from the top of the column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRow
{
  pub row:         usize,
  pub text:        String,
  pub is_dir:      bool,
  pub is_selected: bool,
  pub is_focused:  bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutColumn
{
  pub x:           u16,
  pub width:       u16,
  pub role:        ColumnRole,
  pub dir:         Option<PathBuf>,
  pub rows:        Vec<LayoutRow>,
  pub placeholder: Option<Placeholder>,
}

impl LayoutColumn
{
  /// Text of the highlighted row, if any.
  pub fn focused_text(&self) -> Option<&str>
  {
    self.rows.iter().find(|r| r.is_focused).map(|r| r.text.as_str())
  }

  pub fn texts(&self) -> Vec<&str>
  {
    self.rows.iter().map(|r| r.text.as_str()).collect()
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnLayout
{
  pub columns: Vec<LayoutColumn>,
}

impl ColumnLayout
{
  pub fn total_width(&self) -> u32
  {
    self.columns.iter().map(|c| c.width as u32).sum()
  }

  pub fn focused(&self) -> Option<&LayoutColumn>
  {
    self.columns.iter().find(|c| c.role == ColumnRole::Focused)
  }

  pub fn by_role(
    &self,
    role: ColumnRole,
  ) -> Option<&LayoutColumn>
  {
    self.columns.iter().find(|c| c.role == role)
  }
}

/// Everything [`compute`] reads.
pub struct LayoutInput<'a>
{
  pub ratio:     &'a RatioConfig,
  pub cwd:       &'a Path,
  pub index:     &'a EntryIndex,
  pub viewport:  &'a Viewport,
  pub selection: &'a SelectionSet,
  pub opts:      ListingOptions,
  pub width:     u16,
}

/// Build the layout for the next paint.
pub fn compute(input: &LayoutInput) -> ColumnLayout
{
  let widths = column_widths(input.ratio.weights(), input.width);
  let current = input.ratio.current();
  let mut columns: Vec<LayoutColumn> = Vec::with_capacity(widths.len());
  let mut x = 0u16;
  for (i, w) in widths.iter().enumerate()
  {
    let role = if i < current
    {
      ColumnRole::Ancestor(current - i)
    }
    else if i == current
    {
      ColumnRole::Focused
    }
    else
    {
      ColumnRole::Descendant(i - current)
    };
    columns.push(LayoutColumn {
      x,
      width: *w,
      role,
      dir: None,
      rows: Vec::new(),
      placeholder: None,
    });
    x = x.saturating_add(*w);
  }

  fill_focused(&mut columns[current], input);
  fill_ancestors(&mut columns[..current], input);
  fill_descendants(&mut columns[current + 1..], input);
  ColumnLayout { columns }
}

fn fill_focused(
  col: &mut LayoutColumn,
  input: &LayoutInput,
)
{
  col.dir = Some(input.cwd.to_path_buf());
  if input.index.is_empty()
  {
    col.placeholder = Some(Placeholder::NoFiles);
    return;
  }
  let cursor = input.index.cursor();
  col.rows = rows_for(
    input.index.entries(),
    input.viewport,
    cursor,
    input.selection,
  );
}

fn fill_ancestors(
  cols: &mut [LayoutColumn],
  input: &LayoutInput,
)
{
  // Walk right to left: the column next to the focused one is the parent.
  let mut child = input.cwd.to_path_buf();
  for col in cols.iter_mut().rev()
  {
    let Some(parent) = child.parent().map(Path::to_path_buf)
    else
    {
      break;
    };
    let name = child
      .file_name()
      .map(|s| s.to_string_lossy().to_string())
      .unwrap_or_default();
    fill_side(col, &parent, Some(&name), input);
    child = parent;
  }
}

fn fill_descendants(
  cols: &mut [LayoutColumn],
  input: &LayoutInput,
)
{
  let mut source: Option<Entry> = input.index.cursor_entry().cloned();
  for col in cols.iter_mut()
  {
    let Some(entry) = source.take().filter(|e| e.is_dir)
    else
    {
      break;
    };
    source = fill_side(col, &entry.path(), None, input);
  }
}

/// Fill a read-only column listing `dir`, highlighting `highlight` by name
/// or the first entry when `None`. Returns the highlighted entry.
fn fill_side(
  col: &mut LayoutColumn,
  dir: &Path,
  highlight: Option<&str>,
  input: &LayoutInput,
) -> Option<Entry>
{
  col.dir = Some(dir.to_path_buf());
  let list = match read_dir_sorted(dir, input.opts)
  {
    Ok(list) => list,
    Err(e) =>
    {
      crate::trace::log(format!(
        "[layout] side column '{}' unreadable: {}",
        dir.display(),
        e
      ));
      col.placeholder = Some(Placeholder::Unreadable);
      return None;
    }
  };
  if list.is_empty()
  {
    col.placeholder = Some(Placeholder::NoFiles);
    return None;
  }
  let pos = match highlight
  {
    Some(name) => list.iter().position(|e| e.name == name).map(|i| i + 1).unwrap_or(0),
    None => 1,
  };
  let mut vp = Viewport::new(input.viewport.visible_rows);
  vp.recompute(pos.max(1), list.len());
  col.rows = rows_for(&list, &vp, pos, input.selection);
  pos.checked_sub(1).and_then(|i| list.get(i).cloned())
}

fn rows_for(
  entries: &[Entry],
  vp: &Viewport,
  highlight: usize,
  selection: &SelectionSet,
) -> Vec<LayoutRow>
{
  vp.range(entries.len())
    .enumerate()
    .filter_map(|(row, pos)| {
      let e = entries.get(pos - 1)?;
      Some(LayoutRow {
        row,
        text: e.name.clone(),
        is_dir: e.is_dir,
        is_selected: selection.contains(e),
        is_focused: pos == highlight,
      })
    })
    .collect()
}
