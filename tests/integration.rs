use std::{
  fs,
  path::{
    Path,
    PathBuf,
  },
};

use crossterm::event::{
  KeyCode,
  KeyEvent,
  KeyModifiers,
};

fn key(c: char) -> KeyEvent
{
  KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

fn touch(
  dir: &Path,
  names: &[&str],
)
{
  for n in names
  {
    if let Some(d) = n.strip_suffix('/')
    {
      fs::create_dir_all(dir.join(d)).expect("mkdir");
    }
    else
    {
      fs::write(dir.join(n), b"x").expect("write");
    }
  }
}

fn canon(p: &Path) -> PathBuf
{
  fs::canonicalize(p).expect("canonicalize")
}

mod config_tests
{
  use colfm::core::layout::RatioPresets;

  #[test]
  fn config_overlay_and_keymaps()
  {
    let code = r##"
colfm.config({
  keys = { sequence_timeout_ms = 600 },
  ui = {
    show_hidden = true,
    dirs_first = false,
    confirm_commands = false,
    ratio = "wide",
    ratios = {
      { name = "wide", weights = { 1, 4 }, current = 2 },
      { name = "broken", weights = { 1, 0 } },
    },
    theme = { dir_fg = "blue", cursor_bg = "#202020" },
    replace_existing = "never",
    editor = "nano",
  },
})

colfm.mapkey("zz", "quit", "Quit twice")
colfm.map_command("gd", "du -sh %c", { "no_reload", no_wait = true }, "Disk usage")
colfm.map_command("gc", "dirname %c", { cd = true })
"##;

    let (cfg, maps) =
      colfm::config::load_config_from_code(code, Some(std::path::Path::new("."))).expect("load config");

    assert_eq!(cfg.keys.sequence_timeout_ms, 600);
    assert!(cfg.ui.show_hidden);
    assert!(!cfg.ui.dirs_first);
    assert!(!cfg.ui.confirm_commands);
    assert_eq!(cfg.ui.ratio.as_deref(), Some("wide"));
    assert_eq!(cfg.ui.ratios.len(), 1);
    assert_eq!(cfg.ui.ratios[0].weights(), &[1, 4]);
    assert_eq!(cfg.ui.replace_existing, colfm::core::fs_ops::ReplacePolicy::Never);
    assert_eq!(cfg.ui.editor.as_deref(), Some("nano"));
    assert_eq!(cfg.ui.ratios[0].current(), 1);
    assert_eq!(cfg.ui.theme.as_ref().and_then(|t| t.dir_fg.as_deref()), Some("blue"));

    let mut by_seq: std::collections::HashMap<String, String> = std::collections::HashMap::new();
    for m in &maps
    {
      by_seq.insert(m.sequence.clone(), m.action.clone());
    }
    assert_eq!(by_seq.get("zz").map(String::as_str), Some("quit"));
    assert_eq!(by_seq.get("j").map(String::as_str), Some("nav:down"));

    let gd = by_seq.get("gd").expect("gd bound");
    let idx: usize = gd.strip_prefix("run_cmd:").expect("run_cmd").parse().expect("index");
    let binding = &cfg.commands[idx];
    assert_eq!(binding.template, "du -sh %c");
    assert!(binding.flags.no_reload && binding.flags.no_wait);
    assert!(!binding.flags.cd_to_output);
    assert_eq!(binding.description.as_deref(), Some("Disk usage"));

    let gc = by_seq.get("gc").expect("gc bound");
    let idx: usize = gc.strip_prefix("run_cmd:").expect("run_cmd").parse().expect("index");
    assert!(cfg.commands[idx].flags.cd_to_output);

    let mut presets = RatioPresets::builtin();
    for p in &cfg.ui.ratios
    {
      presets.insert(p.clone());
    }
    assert!(presets.select("wide"));
  }

  #[test]
  fn defaults_apply_without_user_code()
  {
    let (cfg, maps) = colfm::config::load_config_from_code("", None).expect("load defaults");
    assert!(!cfg.ui.show_hidden);
    assert!(cfg.ui.dirs_first);
    assert!(cfg.ui.confirm_commands);
    assert_eq!(cfg.ui.ratio.as_deref(), Some("ranger"));
    assert!(maps.iter().any(|m| m.sequence == "q" && m.action == "quit"));
  }

  #[test]
  fn unknown_command_flag_is_an_error()
  {
    let code = r#"colfm.map_command("x", "ls", { bogus = true })"#;
    let err = colfm::config::load_config_from_code(code, None).err().expect("should error");
    assert!(format!("{}", err).contains("unknown command flag"));
  }

  #[test]
  fn sandbox_has_no_os_library()
  {
    let err = colfm::config::load_config_from_code("os.execute('true')", None)
      .err()
      .expect("os must be missing");
    assert!(format!("{}", err).contains("execution failed"));
  }
}

mod require_tests
{
  #[test]
  fn restricted_require_allows_relative_modules_under_root_lua()
  {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().to_path_buf();
    let lua_dir = root.join("lua");
    std::fs::create_dir_all(&lua_dir).expect("mkdir lua");
    std::fs::write(lua_dir.join("mymod.lua"), b"return 'dual'\n").expect("write module");
    let code = r#"
local name = require('mymod')
colfm.config({ ui = { ratio = name } })
"#;
    let (cfg, _maps) = colfm::config::load_config_from_code(code, Some(&root)).expect("load config");
    assert_eq!(cfg.ui.ratio.as_deref(), Some("dual"));
  }

  #[test]
  fn restricted_require_blocks_parent_traversal()
  {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().to_path_buf();
    let bad_code = r#" local x = require('../outside') "#;
    let err = colfm::config::load_config_from_code(bad_code, Some(&root)).err().expect("should error");
    let msg = format!("{}", err);
    assert!(msg.contains("invalid module name") || msg.contains("inline init.lua execution failed"));
  }
}

mod listing_tests
{
  use super::touch;
  use colfm::core::{
    index::EntryIndex,
    listing::ListingOptions,
  };

  #[test]
  fn hidden_filter_and_directory_grouping()
  {
    let tmp = tempfile::tempdir().expect("tmp");
    touch(tmp.path(), &[".hidden/", "b.txt", "adir/", ".dotfile"]);

    let mut idx = EntryIndex::default();
    idx.rebuild(tmp.path(), ListingOptions { show_hidden: false, dirs_first: true });
    let names: Vec<&str> = idx.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["adir", "b.txt"]);
    assert_eq!(idx.cursor(), 1);

    idx.rebuild(tmp.path(), ListingOptions { show_hidden: true, dirs_first: true });
    let names: Vec<&str> = idx.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec![".hidden", "adir", ".dotfile", "b.txt"]);
    let first_file = idx.entries().iter().position(|e| !e.is_dir).expect("a file");
    assert!(idx.entries()[first_file..].iter().all(|e| !e.is_dir));
  }

  #[test]
  fn dirs_first_off_sorts_by_name_only()
  {
    let tmp = tempfile::tempdir().expect("tmp");
    touch(tmp.path(), &["a.txt", "b/", "C"]);
    let mut idx = EntryIndex::default();
    idx.rebuild(tmp.path(), ListingOptions { show_hidden: false, dirs_first: false });
    let names: Vec<&str> = idx.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["C", "a.txt", "b"]);
  }

  #[test]
  fn missing_directory_yields_empty_index()
  {
    let tmp = tempfile::tempdir().expect("tmp");
    let mut idx = EntryIndex::default();
    idx.rebuild(&tmp.path().join("gone"), ListingOptions::default());
    assert!(idx.is_empty());
    assert_eq!(idx.cursor(), 0);
    assert!(idx.cursor_entry().is_none());
  }
}

mod selection_tests
{
  use colfm::core::{
    listing::Entry,
    selection::SelectionSet,
  };

  #[test]
  fn toggle_twice_restores_membership_and_order()
  {
    let mut sel = SelectionSet::new();
    let a = Entry::new("/x", "a", false);
    let b = Entry::new("/y", "a", false);
    let c = Entry::new("/x", "c", true);
    assert!(sel.toggle(&a));
    assert!(sel.toggle(&b));
    assert!(sel.toggle(&c));
    assert!(!sel.toggle(&b));
    assert!(sel.toggle(&b));
    let order: Vec<_> = sel.iter().map(|e| e.path()).collect();
    assert_eq!(order, vec![a.path(), c.path(), b.path()]);
  }

  #[test]
  fn add_all_skips_members_and_clear_empties()
  {
    let mut sel = SelectionSet::new();
    let list = vec![Entry::new("/d", "a", false), Entry::new("/d", "b", false)];
    sel.toggle(&list[1]);
    assert_eq!(sel.add_all(&list), 1);
    assert_eq!(sel.len(), 2);
    assert_eq!(sel.add_all(&list), 0);
    sel.clear();
    assert!(sel.is_empty());
    assert!(!sel.contains(&list[0]));
  }
}

mod viewport_tests
{
  use colfm::core::viewport::Viewport;

  fn holds(
    vp: &Viewport,
    cursor: usize,
    count: usize,
  ) -> bool
  {
    count == 0 || (vp.top >= 1 && vp.top <= cursor && cursor < vp.top + vp.visible_rows.max(1))
  }

  #[test]
  fn window_contains_cursor_after_any_motion()
  {
    // Small deterministic generator; the sequence only has to be varied.
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
      seed ^= seed << 13;
      seed ^= seed >> 7;
      seed ^= seed << 17;
      seed
    };
    for count in [1usize, 2, 5, 17, 60]
    {
      for rows in [1usize, 3, 10, 80]
      {
        let mut vp = Viewport::new(rows);
        let mut cursor = 1usize;
        for _ in 0..300
        {
          match next() % 4
          {
            0 =>
            {
              let delta = (next() % 21) as isize - 10;
              cursor = (cursor as isize + delta).clamp(1, count as isize) as usize;
              vp.recompute(cursor, count);
            }
            1 =>
            {
              let delta = (next() % 7) as isize - 3;
              cursor = vp.scroll(delta, cursor, count);
              vp.recompute(cursor, count);
            }
            2 =>
            {
              vp.visible_rows = 1 + (next() % 12) as usize;
              vp.recompute(cursor, count);
            }
            _ =>
            {
              cursor = 1 + (next() as usize % count);
              vp.recompute(cursor, count);
            }
          }
          assert!(holds(&vp, cursor, count), "top={} rows={} cursor={} count={}", vp.top, vp.visible_rows, cursor, count);
        }
      }
    }
  }

  #[test]
  fn moves_only_when_cursor_leaves()
  {
    let mut vp = Viewport::new(5);
    vp.recompute(3, 20);
    assert_eq!(vp.top, 1);
    vp.recompute(6, 20);
    assert_eq!(vp.top, 2);
    vp.recompute(4, 20);
    assert_eq!(vp.top, 2);
    vp.recompute(1, 20);
    assert_eq!(vp.top, 1);
  }
}

mod layout_tests
{
  use super::touch;
  use colfm::core::{
    index::EntryIndex,
    layout::{
      ColumnRole,
      LayoutInput,
      Placeholder,
      RatioConfig,
      compute,
    },
    listing::ListingOptions,
    selection::SelectionSet,
    viewport::Viewport,
  };

  #[test]
  fn ancestors_focused_and_descendants()
  {
    let tmp = tempfile::tempdir().expect("tmp");
    let root = tmp.path();
    touch(root, &["p/", "p/cur/", "p/other/", "p/cur/d1/", "p/cur/d1/inner.txt", "p/cur/z.txt"]);
    let cwd = root.join("p").join("cur");
    let opts = ListingOptions { show_hidden: false, dirs_first: true };
    let mut index = EntryIndex::default();
    index.rebuild(&cwd, opts);
    let viewport = Viewport::new(10);
    let mut selection = SelectionSet::new();
    selection.toggle(&index.entries()[1]);
    let ratio = RatioConfig::new("t", vec![1, 1, 1, 1], 1).expect("ratio");

    let layout = compute(&LayoutInput {
      ratio: &ratio,
      cwd: &cwd,
      index: &index,
      viewport: &viewport,
      selection: &selection,
      opts,
      width: 83,
    });
    assert_eq!(layout.total_width(), 83);
    assert_eq!(layout.columns.iter().map(|c| c.width).collect::<Vec<_>>(), vec![20, 20, 20, 23]);

    let parent = layout.by_role(ColumnRole::Ancestor(1)).expect("parent column");
    assert_eq!(parent.texts(), vec!["cur", "other"]);
    assert_eq!(parent.focused_text(), Some("cur"));

    let focused = layout.focused().expect("focused");
    assert_eq!(focused.texts(), vec!["d1", "z.txt"]);
    assert_eq!(focused.focused_text(), Some("d1"));
    assert!(focused.rows[1].is_selected);

    let child = layout.by_role(ColumnRole::Descendant(1)).expect("child column");
    assert_eq!(child.texts(), vec!["inner.txt"]);
    let grandchild = layout.by_role(ColumnRole::Descendant(2)).expect("grandchild column");
    assert!(grandchild.rows.is_empty());
    assert_eq!(grandchild.placeholder, None);
  }

  #[test]
  fn empty_directories_show_placeholders()
  {
    let tmp = tempfile::tempdir().expect("tmp");
    let cwd = tmp.path().join("empty");
    std::fs::create_dir_all(&cwd).expect("mkdir");
    let opts = ListingOptions::default();
    let mut index = EntryIndex::default();
    index.rebuild(&cwd, opts);
    let ratio = RatioConfig::new("t", vec![1, 2], 1).expect("ratio");
    let layout = compute(&LayoutInput {
      ratio: &ratio,
      cwd: &cwd,
      index: &index,
      viewport: &Viewport::new(5),
      selection: &SelectionSet::new(),
      opts,
      width: 30,
    });
    let focused = layout.focused().expect("focused");
    assert_eq!(focused.placeholder, Some(Placeholder::NoFiles));
    assert_eq!(Placeholder::NoFiles.text(), "no files");
  }

  #[test]
  fn vanished_child_directory_is_marked_unreadable()
  {
    let tmp = tempfile::tempdir().expect("tmp");
    let cwd = tmp.path().join("cur");
    touch(tmp.path(), &["cur/", "cur/d1/", "cur/d1/inner.txt", "cur/z.txt"]);
    let opts = ListingOptions { show_hidden: false, dirs_first: true };
    let mut index = EntryIndex::default();
    index.rebuild(&cwd, opts);
    std::fs::remove_dir_all(cwd.join("d1")).expect("remove d1");

    let ratio = RatioConfig::new("t", vec![1, 1, 1], 0).expect("ratio");
    let layout = compute(&LayoutInput {
      ratio: &ratio,
      cwd: &cwd,
      index: &index,
      viewport: &Viewport::new(5),
      selection: &SelectionSet::new(),
      opts,
      width: 60,
    });
    let focused = layout.focused().expect("focused");
    assert_eq!(focused.texts(), vec!["d1", "z.txt"]);
    let child = layout.by_role(ColumnRole::Descendant(1)).expect("child column");
    assert!(child.rows.is_empty());
    assert_eq!(child.placeholder, Some(Placeholder::Unreadable));
    assert_eq!(child.dir.as_deref(), Some(cwd.join("d1").as_path()));
    let grandchild = layout.by_role(ColumnRole::Descendant(2)).expect("grandchild column");
    assert_eq!(grandchild.placeholder, None);
    assert_eq!(grandchild.dir, None);
  }

  #[test]
  fn ancestors_above_the_root_stay_blank()
  {
    let cwd = std::path::Path::new("/");
    let opts = ListingOptions::default();
    let mut index = EntryIndex::default();
    index.rebuild(cwd, opts);

    let ratio = RatioConfig::new("t", vec![1, 1, 1], 2).expect("ratio");
    let layout = compute(&LayoutInput {
      ratio: &ratio,
      cwd,
      index: &index,
      viewport: &Viewport::new(5),
      selection: &SelectionSet::new(),
      opts,
      width: 60,
    });
    for depth in [1, 2]
    {
      let col = layout.by_role(ColumnRole::Ancestor(depth)).expect("ancestor column");
      assert!(col.rows.is_empty());
      assert_eq!(col.placeholder, None);
      assert_eq!(col.dir, None);
    }
    let focused = layout.focused().expect("focused");
    assert_eq!(focused.dir.as_deref(), Some(cwd));
  }
}

mod search_tests
{
  use colfm::core::{
    listing::Entry,
    search::{
      SearchDirection,
      SearchEngine,
      SearchError,
      SearchOutcome,
    },
  };

  fn entries(names: &[&str]) -> Vec<Entry>
  {
    names.iter().map(|n| Entry::new("/d", *n, false)).collect()
  }

  #[test]
  fn next_and_previous_wrap_without_revisiting_cursor()
  {
    let list = entries(&["apple", "banana", "avocado", "cherry"]);
    let mut s = SearchEngine::new();
    assert_eq!(s.search_new("^a", &list, 1).expect("search"), SearchOutcome::Found(1));
    assert_eq!(s.search(SearchDirection::Next, &list, 1).expect("next"), SearchOutcome::Found(3));
    assert_eq!(s.search(SearchDirection::Next, &list, 3).expect("next"), SearchOutcome::Wrapped(1));
    assert_eq!(s.search(SearchDirection::Previous, &list, 1).expect("prev"), SearchOutcome::Wrapped(3));
    assert_eq!(s.search(SearchDirection::Previous, &list, 3).expect("prev"), SearchOutcome::Found(1));

    s.set_pattern("cherry").expect("pattern");
    assert_eq!(s.search(SearchDirection::Next, &list, 4).expect("next"), SearchOutcome::NotFound);
  }

  #[test]
  fn single_match_behind_cursor_is_found_once()
  {
    let list = entries(&["keep", "a", "b", "c"]);
    let mut s = SearchEngine::new();
    s.set_pattern("^keep$").expect("pattern");
    assert_eq!(s.search(SearchDirection::Next, &list, 3).expect("next"), SearchOutcome::Wrapped(1));
    assert_eq!(s.search(SearchDirection::Next, &list, 1).expect("next"), SearchOutcome::NotFound);
  }

  #[test]
  fn every_match_is_reachable_by_repeating_next()
  {
    let list = entries(&["x1", "y", "x2", "z", "x3", "x4"]);
    let mut s = SearchEngine::new();
    let mut pos = s.search_new("x", &list, 2).expect("search").position().expect("hit");
    let mut seen = vec![pos];
    for _ in 0..3
    {
      pos = s.search(SearchDirection::Next, &list, pos).expect("next").position().expect("hit");
      seen.push(pos);
    }
    seen.sort();
    assert_eq!(seen, vec![1, 3, 5, 6]);
  }

  #[test]
  fn errors_are_reported()
  {
    let list = entries(&["a"]);
    let mut s = SearchEngine::new();
    assert!(matches!(s.search(SearchDirection::Next, &list, 1), Err(SearchError::NoPattern)));
    assert!(matches!(s.search_new("(", &list, 1), Err(SearchError::InvalidPattern(_))));
    assert_eq!(s.pattern(), None);
  }
}

mod template_tests
{
  use colfm::core::{
    command::{
      ExpandError,
      expand_template,
    },
    listing::Entry,
    selection::SelectionSet,
  };
  use std::path::Path;

  #[test]
  fn placeholders_expand_in_one_pass()
  {
    let cur = Entry::new("/w", "file name.txt", false);
    let mut sel = SelectionSet::new();
    sel.toggle(&Entry::new("/a", "one", false));
    sel.toggle(&Entry::new("/b", "two", true));
    let cwd = Path::new("/w");
    assert_eq!(expand_template("less %c", Some(&cur), &sel, cwd).unwrap(), "less file name.txt");
    assert_eq!(expand_template("tar cf x.tar %s", Some(&cur), &sel, cwd).unwrap(), "tar cf x.tar /a/one /b/two");
    assert_eq!(expand_template("echo 100%% %p %q %", Some(&cur), &sel, cwd).unwrap(), "echo 100% /w %q %");
    assert_eq!(expand_template("%%c", None, &sel, cwd).unwrap(), "%c");
  }

  #[test]
  fn missing_inputs_abort()
  {
    let sel = SelectionSet::new();
    let cwd = Path::new("/w");
    assert_eq!(expand_template("rm %s", None, &sel, cwd), Err(ExpandError::EmptySelection));
    assert_eq!(expand_template("cat %c", None, &sel, cwd), Err(ExpandError::NoCurrentEntry));
    assert_eq!(expand_template("ls", None, &sel, cwd).unwrap(), "ls");
  }
}

mod app_tests
{
  use super::{
    canon,
    key,
    touch,
  };
  use colfm::{
    App,
    app::Overlay,
    config::{
      Config,
      rust_default_keymaps,
    },
    core::{
      fs_ops::ReplacePolicy,
      layout::ColumnRole,
    },
  };
  use crossterm::event::{
    KeyCode,
    KeyEvent,
    KeyModifiers,
  };

  #[test]
  fn keys_move_enter_and_step_back()
  {
    let tmp = tempfile::tempdir().expect("tmp");
    touch(tmp.path(), &["a/", "b/", "b/inner.txt", "c.txt"]);
    let mut app = App::for_dir(tmp.path()).expect("app");
    assert_eq!(app.entry_names(), vec!["a", "b", "c.txt"]);

    app.on_key(key('j')).expect("key");
    assert_eq!(app.current_entry().map(|e| e.name.as_str()), Some("b"));
    app.on_key(key('l')).expect("key");
    assert_eq!(app.cwd(), canon(&tmp.path().join("b")));
    assert_eq!(app.entry_names(), vec!["inner.txt"]);

    app.search_new("c\\.txt");
    app.on_key(key('h')).expect("key");
    assert_eq!(app.cwd(), canon(tmp.path()));
    assert_eq!(app.current_entry().map(|e| e.name.as_str()), Some("b"));
    // The step-back lookup leaves the stored pattern alone.
    assert_eq!(app.search_pattern(), Some("c\\.txt"));

    app.on_key(key('G')).expect("key");
    assert_eq!(app.index().cursor(), 3);
    app.on_key(key('g')).expect("key");
    assert_eq!(app.index().cursor(), 1);
    assert!(!app.on_key(key('x')).expect("key"));
    assert!(app.on_key(key('q')).expect("key"));
  }

  #[test]
  fn entering_a_file_keeps_cwd()
  {
    let tmp = tempfile::tempdir().expect("tmp");
    touch(tmp.path(), &["f.txt"]);
    let mut app = App::for_dir(tmp.path()).expect("app");
    app.on_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)).expect("key");
    assert_eq!(app.cwd(), canon(tmp.path()));
    assert!(app.status_message().is_some());
  }

  #[test]
  fn viewport_follows_cursor_on_small_screens()
  {
    let tmp = tempfile::tempdir().expect("tmp");
    let names: Vec<String> = (0..30).map(|i| format!("f{:02}", i)).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    touch(tmp.path(), &refs);
    let mut app = App::for_dir(tmp.path()).expect("app");
    app.on_resize(40, 9);
    assert_eq!(app.viewport().visible_rows, 5);
    for _ in 0..12
    {
      app.on_key(key('j')).expect("key");
    }
    let (top, rows, cursor) = (app.viewport().top, app.viewport().visible_rows, app.index().cursor());
    assert_eq!(cursor, 13);
    assert!(top <= cursor && cursor < top + rows);
    app.on_key(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL)).expect("key");
    assert_eq!(app.index().cursor(), 15);
    let focused = app.layout().focused().cloned().expect("focused");
    assert_eq!(focused.focused_text(), Some("f14"));
    assert!(focused.rows.len() <= rows);
  }

  #[test]
  fn toggles_and_ratio_cycling()
  {
    let tmp = tempfile::tempdir().expect("tmp");
    touch(tmp.path(), &[".dot", "z/", "a.txt"]);
    let mut app = App::for_dir(tmp.path()).expect("app");
    assert_eq!(app.entry_names(), vec!["z", "a.txt"]);
    app.on_key(key('.')).expect("key");
    assert_eq!(app.entry_names(), vec!["z", ".dot", "a.txt"]);
    app.on_key(key('z')).expect("key");
    app.on_key(key('d')).expect("key");
    assert_eq!(app.entry_names(), vec![".dot", "a.txt", "z"]);

    assert_eq!(app.ratio_name(), "ranger");
    app.on_key(key('~')).expect("key");
    assert_eq!(app.ratio_name(), "miller");
    assert!(app.layout().by_role(ColumnRole::Ancestor(2)).is_some());
    app.on_key(key('~')).expect("key");
    assert_eq!(app.ratio_name(), "single");
    app.on_key(key('`')).expect("key");
    assert_eq!(app.ratio_name(), "miller");
  }

  #[test]
  fn selection_survives_directory_changes_and_drives_copy()
  {
    let tmp = tempfile::tempdir().expect("tmp");
    touch(tmp.path(), &["src/", "src/one.txt", "src/two.txt", "dst/"]);
    let mut app = App::for_dir(&tmp.path().join("src")).expect("app");
    app.on_key(key('v')).expect("key");
    app.on_key(key('j')).expect("key");
    app.on_key(key('v')).expect("key");
    assert_eq!(app.selection().len(), 2);

    app.set_cwd(&tmp.path().join("dst")).expect("cd");
    assert_eq!(app.selection().len(), 2);
    app.on_key(key('y')).expect("key");
    assert!(app.selection().is_empty());
    assert_eq!(app.entry_names(), vec!["one.txt", "two.txt"]);
    assert!(app.status_message().unwrap_or_default().contains("ok=2"));
    assert!(tmp.path().join("src").join("one.txt").exists());
  }

  #[test]
  fn search_prompt_and_repeat()
  {
    let tmp = tempfile::tempdir().expect("tmp");
    touch(tmp.path(), &["apple", "banana", "avocado"]);
    let mut app = App::for_dir(tmp.path()).expect("app");
    app.on_key(key('/')).expect("key");
    assert!(matches!(app.overlay(), Overlay::Prompt(_)));
    for c in "^av".chars()
    {
      app.on_key(key(c)).expect("key");
    }
    app.on_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)).expect("key");
    assert!(matches!(app.overlay(), Overlay::None));
    assert_eq!(app.current_entry().map(|e| e.name.as_str()), Some("avocado"));
    app.on_key(key('n')).expect("key");
    assert_eq!(app.current_entry().map(|e| e.name.as_str()), Some("avocado"));
    assert!(app.status_message().is_some());
  }

  #[test]
  fn rename_through_prompt()
  {
    let tmp = tempfile::tempdir().expect("tmp");
    touch(tmp.path(), &["old.txt"]);
    let mut app = App::for_dir(tmp.path()).expect("app");
    app.on_key(key('c')).expect("key");
    for _ in 0.."old.txt".len()
    {
      app.on_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE)).expect("key");
    }
    for c in "new.txt".chars()
    {
      app.on_key(key(c)).expect("key");
    }
    app.on_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)).expect("key");
    assert_eq!(app.entry_names(), vec!["new.txt"]);
    assert!(tmp.path().join("new.txt").exists());
  }

  fn enter() -> KeyEvent
  {
    KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)
  }

  #[test]
  fn renaming_a_selected_entry_unselects_it()
  {
    let tmp = tempfile::tempdir().expect("tmp");
    touch(tmp.path(), &["a.txt", "b.txt"]);
    let mut app = App::for_dir(tmp.path()).expect("app");
    app.on_key(key('v')).expect("key");
    app.on_key(key('j')).expect("key");
    app.on_key(key('v')).expect("key");
    app.on_key(key('k')).expect("key");
    assert_eq!(app.selection().len(), 2);

    app.on_key(key('c')).expect("key");
    app.on_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE)).expect("key");
    app.on_key(key('x')).expect("key");
    app.on_key(enter()).expect("key");
    assert_eq!(app.entry_names(), vec!["a.txx", "b.txt"]);
    let selected: Vec<&str> = app.selection().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(selected, vec!["b.txt"]);
  }

  #[test]
  fn copy_asks_before_replacing()
  {
    let tmp = tempfile::tempdir().expect("tmp");
    touch(tmp.path(), &["src/", "src/one.txt", "src/two.txt", "dst/"]);
    std::fs::write(tmp.path().join("dst").join("one.txt"), b"old").expect("write");
    let src = tmp.path().join("src");
    let dst = tmp.path().join("dst");
    let mut app = App::for_dir(&src).expect("app");

    app.on_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL)).expect("key");
    app.set_cwd(&dst).expect("cd");
    app.on_key(key('y')).expect("key");
    match app.overlay()
    {
      Overlay::Confirm(st) => assert!(st.question.contains("one.txt")),
      other => panic!("expected a confirmation, got {:?}", other),
    }
    app.on_key(key('n')).expect("key");
    assert!(matches!(app.overlay(), Overlay::None));
    assert_eq!(std::fs::read(dst.join("one.txt")).expect("read"), b"old");
    assert!(dst.join("two.txt").exists());
    assert!(app.status_message().unwrap_or_default().contains("skipped=1"));
    assert!(app.selection().is_empty());

    app.set_cwd(&src).expect("cd");
    app.on_key(key('v')).expect("key");
    app.set_cwd(&dst).expect("cd");
    app.on_key(key('y')).expect("key");
    app.on_key(key('y')).expect("key");
    assert_eq!(std::fs::read(dst.join("one.txt")).expect("read"), b"x");
    assert!(app.status_message().unwrap_or_default().contains("replaced=1"));
  }

  #[test]
  fn configured_never_policy_skips_without_asking()
  {
    let tmp = tempfile::tempdir().expect("tmp");
    touch(tmp.path(), &["src/", "src/one.txt", "dst/"]);
    std::fs::write(tmp.path().join("dst").join("one.txt"), b"old").expect("write");
    let mut config = Config::default();
    config.ui.replace_existing = ReplacePolicy::Never;
    let mut app = App::with_config(&tmp.path().join("src"), config, rust_default_keymaps()).expect("app");

    app.on_key(key('v')).expect("key");
    app.set_cwd(&tmp.path().join("dst")).expect("cd");
    app.on_key(key('d')).expect("key");
    assert!(matches!(app.overlay(), Overlay::None));
    assert_eq!(std::fs::read(tmp.path().join("dst").join("one.txt")).expect("read"), b"old");
    assert!(tmp.path().join("src").join("one.txt").exists());
  }

  #[test]
  fn bulk_rename_applies_edited_names()
  {
    let tmp = tempfile::tempdir().expect("tmp");
    touch(tmp.path(), &["work/", "work/a.txt", "work/b.txt", "work/c.txt"]);
    let script = tmp.path().join("edit.sh");
    std::fs::write(&script, "printf 'first.txt\\nb.txt\\nthird.txt\\n' > \"$1\"\n").expect("script");
    let mut config = Config::default();
    config.ui.editor = Some(format!("sh '{}'", script.display()));
    let mut app = App::with_config(&tmp.path().join("work"), config, rust_default_keymaps()).expect("app");

    app.on_key(key('b')).expect("key");
    assert_eq!(app.status_message(), Some("bulk rename: no items selected"));

    app.on_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL)).expect("key");
    app.on_key(key('b')).expect("key");
    assert_eq!(app.entry_names(), vec!["b.txt", "first.txt", "third.txt"]);
    assert!(app.selection().is_empty());
    assert_eq!(app.status_message(), Some("bulk rename: renamed=2 errors=0"));
  }

  #[test]
  fn bulk_rename_keeps_names_when_the_editor_fails()
  {
    let tmp = tempfile::tempdir().expect("tmp");
    touch(tmp.path(), &["a.txt", "b.txt"]);
    let mut config = Config::default();
    config.ui.editor = Some("false".to_string());
    let mut app = App::with_config(tmp.path(), config, rust_default_keymaps()).expect("app");

    app.on_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL)).expect("key");
    app.on_key(key('b')).expect("key");
    assert_eq!(app.entry_names(), vec!["a.txt", "b.txt"]);
    assert_eq!(app.selection().len(), 2);
    assert!(app.status_message().unwrap_or_default().starts_with("bulk rename: editor exited"));
  }

  #[test]
  fn message_history_opens_in_an_overlay()
  {
    let tmp = tempfile::tempdir().expect("tmp");
    touch(tmp.path(), &["a.txt"]);
    let mut app = App::for_dir(tmp.path()).expect("app");
    app.on_key(key('v')).expect("key");
    app.on_key(key('V')).expect("key");
    app.on_key(key('z')).expect("key");
    app.on_key(key('m')).expect("key");
    match app.overlay()
    {
      Overlay::Output { title, lines } =>
      {
        assert_eq!(title, "Messages");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "selection cleared");
      }
      other => panic!("expected the message list, got {:?}", other),
    }
  }
}

mod executor_tests
{
  use super::{
    canon,
    key,
    touch,
  };
  use colfm::{
    App,
    app::Overlay,
    core::command::{
      BehaviorFlags,
      Console,
    },
  };
  use std::{
    cell::RefCell,
    io,
    rc::Rc,
  };

  #[derive(Clone, Default)]
  struct RecordingConsole
  {
    log: Rc<RefCell<Vec<String>>>,
  }

  impl Console for RecordingConsole
  {
    fn suspend(&mut self) -> io::Result<()>
    {
      self.log.borrow_mut().push("suspend".into());
      Ok(())
    }

    fn resume(&mut self) -> io::Result<()>
    {
      self.log.borrow_mut().push("resume".into());
      Ok(())
    }

    fn echo(
      &mut self,
      bytes: &[u8],
    )
    {
      self.log.borrow_mut().push(format!("echo:{}", String::from_utf8_lossy(bytes)));
    }

    fn wait_for_key(&mut self)
    {
      self.log.borrow_mut().push("wait".into());
    }
  }

  fn app_with_console(dir: &std::path::Path) -> (App, Rc<RefCell<Vec<String>>>)
  {
    let mut app = App::for_dir(dir).expect("app");
    let console = RecordingConsole::default();
    let log = Rc::clone(&console.log);
    app.set_console(Box::new(console));
    (app, log)
  }

  fn flags() -> BehaviorFlags
  {
    BehaviorFlags { no_confirm: true, ..BehaviorFlags::default() }
  }

  #[test]
  fn empty_selection_aborts_before_spawning()
  {
    let tmp = tempfile::tempdir().expect("tmp");
    touch(tmp.path(), &["a.txt"]);
    let (mut app, log) = app_with_console(tmp.path());
    app.execute_command("touch marker %s", flags());
    assert!(!tmp.path().join("marker").exists());
    assert!(log.borrow().is_empty());
    assert!(app.status_message().unwrap_or_default().contains("selection is empty"));
  }

  #[test]
  fn terminal_handoff_order_and_reload()
  {
    let tmp = tempfile::tempdir().expect("tmp");
    touch(tmp.path(), &["a.txt"]);
    let (mut app, log) = app_with_console(tmp.path());
    app.execute_command("echo hi; touch %c.bak", flags());
    assert_eq!(
      log.borrow().as_slice(),
      &["suspend".to_string(), "echo:hi\n".to_string(), "wait".to_string(), "resume".to_string()]
    );
    assert_eq!(app.entry_names(), vec!["a.txt", "a.txt.bak"]);
    assert_eq!(app.last_output().and_then(|o| o.last_line.as_deref()), Some("hi"));
  }

  #[test]
  fn flags_skip_reload_wait_and_mode_switch()
  {
    let tmp = tempfile::tempdir().expect("tmp");
    touch(tmp.path(), &["a.txt"]);
    let (mut app, log) = app_with_console(tmp.path());
    let f = BehaviorFlags { no_reload: true, no_wait: true, keep_raw: true, ..flags() };
    app.execute_command("touch new.txt", f);
    assert!(tmp.path().join("new.txt").exists());
    assert_eq!(app.entry_names(), vec!["a.txt"]);
    assert!(log.borrow().is_empty());
  }

  #[test]
  fn cd_to_output_and_failure_keeps_cwd()
  {
    let tmp = tempfile::tempdir().expect("tmp");
    touch(tmp.path(), &["sub/", "sub/x"]);
    let (mut app, _log) = app_with_console(tmp.path());
    let cd = BehaviorFlags { cd_to_output: true, ..flags() };

    app.execute_command("echo sub; exit 3", cd);
    assert_eq!(app.cwd(), canon(tmp.path()));
    assert!(app.status_message().unwrap_or_default().contains("status 3"));

    app.execute_command("echo nowhere", cd);
    assert_eq!(app.cwd(), canon(tmp.path()));

    app.execute_command("echo sub", cd);
    assert_eq!(app.cwd(), canon(&tmp.path().join("sub")));
    assert_eq!(app.entry_names(), vec!["x"]);
  }

  #[test]
  fn search_output_with_and_without_persistence()
  {
    let tmp = tempfile::tempdir().expect("tmp");
    touch(tmp.path(), &["a.txt", "b.txt", "c.txt"]);
    let (mut app, _log) = app_with_console(tmp.path());
    app.search_new("zzz");

    let transient = BehaviorFlags { search_output: true, no_persist_search: true, ..flags() };
    app.execute_command("echo '^b'", transient);
    assert_eq!(app.current_entry().map(|e| e.name.as_str()), Some("b.txt"));
    assert_eq!(app.search_pattern(), Some("zzz"));

    let persist = BehaviorFlags { search_output: true, ..flags() };
    app.execute_command("echo '^c'", persist);
    assert_eq!(app.current_entry().map(|e| e.name.as_str()), Some("c.txt"));
    assert_eq!(app.search_pattern(), Some("^c"));
  }

  #[test]
  fn confirmation_gates_execution()
  {
    let tmp = tempfile::tempdir().expect("tmp");
    let (mut app, _log) = app_with_console(tmp.path());

    app.execute_command("touch x", BehaviorFlags::default());
    assert!(matches!(app.overlay(), Overlay::Confirm(_)));
    app.on_key(key('n')).expect("key");
    assert!(matches!(app.overlay(), Overlay::None));
    assert!(!tmp.path().join("x").exists());

    app.execute_command("touch x", BehaviorFlags::default());
    app.on_key(key('y')).expect("key");
    assert!(tmp.path().join("x").exists());
  }

  #[test]
  fn prompted_command_runs_in_cwd()
  {
    let tmp = tempfile::tempdir().expect("tmp");
    let (mut app, _log) = app_with_console(tmp.path());
    app.on_key(key('!')).expect("key");
    for c in "touch %p/made".chars()
    {
      app.on_key(key(c)).expect("key");
    }
    app.on_key(crossterm::event::KeyEvent::new(
      crossterm::event::KeyCode::Enter,
      crossterm::event::KeyModifiers::NONE,
    ))
    .expect("key");
    assert!(tmp.path().join("made").exists());
    assert_eq!(app.entry_names(), vec!["made"]);
  }
}
