/// End-to-end tests for `AppState`, the GUI application state machine.
///
/// These drive the real scanner and real filesystem actions against a
/// temporary directory without opening a window. Folder dialogs are
/// replaced by `FixedDialogs`, which answers with preset paths.
///
/// Covered transitions:
///   - Scan lifecycle (start, completion, failure, cancellation, restart)
///   - Tree rows: expand, collapse, activate
///   - Filtering and restoring the previous expansion
///   - Move and delete, including confirmation and the follow-up rescan
use indexicate_core::actions::DeleteMode;
use indexicate_core::category::FileCategory;
use indexicate_core::settings::Settings;
use indexicate_gui::dialogs::DialogService;
use indexicate_gui::state::{AppPhase, AppState};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Dialogs that return fixed answers instead of asking.
struct FixedDialogs {
    directory: Option<PathBuf>,
    destination: Option<PathBuf>,
}

impl DialogService for FixedDialogs {
    fn pick_directory(&self, _start_in: Option<&Path>) -> Option<PathBuf> {
        self.directory.clone()
    }

    fn pick_move_destination(&self, _item_name: &str, _start_in: Option<&Path>) -> Option<PathBuf> {
        self.destination.clone()
    }
}

fn write_bytes(path: &Path, n: usize) {
    let mut f = fs::File::create(path).unwrap();
    f.write_all(&vec![0u8; n]).unwrap();
}

/// Build a small folder and return the guard plus its canonical path.
///
/// ```text
/// library/
///   d.zip      400
///   docs/
///     a.txt    100
///     b.pdf    200
///   media/
///     c.png    300
///   notes       10
/// ```
fn make_temp_tree() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = fs::canonicalize(tmp.path()).unwrap().join("library");
    fs::create_dir_all(root.join("docs")).unwrap();
    fs::create_dir_all(root.join("media")).unwrap();
    write_bytes(&root.join("docs/a.txt"), 100);
    write_bytes(&root.join("docs/b.pdf"), 200);
    write_bytes(&root.join("media/c.png"), 300);
    write_bytes(&root.join("d.zip"), 400);
    write_bytes(&root.join("notes"), 10);
    (tmp, root)
}

fn state_with(dialogs: FixedDialogs) -> AppState {
    let settings = Settings {
        delete_mode: DeleteMode::Permanent,
        ..Settings::default()
    };
    AppState::new(settings, None, Box::new(dialogs))
}

fn state() -> AppState {
    state_with(FixedDialogs {
        directory: None,
        destination: None,
    })
}

/// Pump `process_scan_messages()` until the phase leaves `Scanning` or the
/// deadline expires.
fn pump_until_done(state: &mut AppState) {
    let deadline = std::time::Instant::now() + Duration::from_secs(30);
    while state.phase == AppPhase::Scanning {
        assert!(
            std::time::Instant::now() < deadline,
            "scan did not complete within 30 seconds"
        );
        state.process_scan_messages();
        std::thread::sleep(Duration::from_millis(10));
    }
}

fn scanned(root: &Path) -> AppState {
    let mut state = state();
    state.start_scan(root.to_path_buf());
    pump_until_done(&mut state);
    assert_eq!(state.phase, AppPhase::Results);
    state
}

/// Names of the visible rows, top to bottom.
fn row_names(state: &AppState) -> Vec<String> {
    state
        .with_tree(|tree| {
            state
                .visible_rows
                .iter()
                .map(|r| tree.node(r.node_index).name.to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn row_of(state: &AppState, name: &str) -> usize {
    row_names(state)
        .iter()
        .position(|n| n == name)
        .unwrap_or_else(|| panic!("no visible row named {name}"))
}

// ── Scan lifecycle ─────────────────────────────────────────────────────────────

#[test]
fn new_state_is_idle_and_dark() {
    let state = state();
    assert_eq!(state.phase, AppPhase::Idle);
    assert!(state.settings.dark_mode);
    assert!(state.current_tree().is_none());
    assert!(state.visible_rows.is_empty());
}

#[test]
fn start_scan_sets_scanning_phase() {
    let (_tmp, root) = make_temp_tree();
    let mut state = state();
    state.start_scan(root.clone());
    assert_eq!(state.phase, AppPhase::Scanning);
    assert_eq!(state.current_root(), Some(root));
}

#[test]
fn scan_completes_with_tree_and_category_totals() {
    let (_tmp, root) = make_temp_tree();
    let state = scanned(&root);

    let tree = state.current_tree().expect("tree after completion");
    assert_eq!(tree.file_count(), 5);
    assert_eq!(tree.node(tree.root.unwrap()).size, 1_010);
    assert!(state.scan_duration.is_some());
    assert!(!state.scan_was_cancelled);

    let size_of = |cat: FileCategory| {
        state
            .category_stats
            .iter()
            .find(|s| s.category == cat)
            .map(|s| s.total_size)
            .unwrap_or(0)
    };
    assert_eq!(size_of(FileCategory::Documents), 300);
    assert_eq!(size_of(FileCategory::Images), 300);
    assert_eq!(size_of(FileCategory::Archives), 400);
    assert_eq!(size_of(FileCategory::Other), 10);
}

#[test]
fn missing_folder_returns_to_idle_with_a_message() {
    let tmp = TempDir::new().unwrap();
    let mut state = state();
    state.start_scan(tmp.path().join("does-not-exist"));
    pump_until_done(&mut state);

    assert_eq!(state.phase, AppPhase::Idle);
    assert!(state.current_tree().is_none());
    let message = state.status_message.expect("failure message");
    assert!(message.starts_with("Scan failed"), "{message}");
}

#[test]
fn choose_folder_scans_the_picked_directory() {
    let (_tmp, root) = make_temp_tree();
    let mut state = state_with(FixedDialogs {
        directory: Some(root.clone()),
        destination: None,
    });
    state.choose_folder();
    assert_eq!(state.phase, AppPhase::Scanning);
    pump_until_done(&mut state);
    assert_eq!(state.current_root(), Some(root));
}

#[test]
fn cancelled_folder_dialog_changes_nothing() {
    let mut state = state();
    state.choose_folder();
    assert_eq!(state.phase, AppPhase::Idle);
    assert!(state.settings.last_directory.is_none());
}

#[test]
fn start_scan_remembers_the_folder() {
    let (_tmp, root) = make_temp_tree();
    let state = scanned(&root);
    assert_eq!(state.settings.last_directory, Some(root));
}

#[test]
fn cancel_scan_ends_the_scan() {
    let (_tmp, root) = make_temp_tree();
    let mut state = state();
    state.start_scan(root);
    state.cancel_scan();
    pump_until_done(&mut state);
    // The walk may finish before it notices the flag; either way it ends.
    assert_eq!(state.phase, AppPhase::Results);
    assert!(state.scan_handle.is_none());
}

#[test]
fn second_scan_replaces_the_first() {
    let (_tmp_a, root_a) = make_temp_tree();
    let (_tmp_b, root_b) = make_temp_tree();
    write_bytes(&root_b.join("extra.mp3"), 5);

    let mut state = scanned(&root_a);
    state.selected_node = state.visible_rows.get(1).map(|r| r.node_index);
    state.start_scan(root_b.clone());
    assert!(state.current_tree().is_none());
    assert!(state.selected_node.is_none());
    assert!(state.category_stats.is_empty());

    pump_until_done(&mut state);
    assert_eq!(state.current_root(), Some(root_b));
    assert_eq!(state.current_tree().unwrap().file_count(), 6);
}

// ── Tree rows ──────────────────────────────────────────────────────────────────

#[test]
fn root_starts_expanded_with_sorted_children() {
    let (_tmp, root) = make_temp_tree();
    let state = scanned(&root);

    assert!(state.visible_rows[0].is_expanded);
    assert_eq!(state.visible_rows[0].depth, 0);
    assert_eq!(&row_names(&state)[1..], ["d.zip", "docs", "media", "notes"]);
    assert!(state.visible_rows[1..].iter().all(|r| r.depth == 1));
}

#[test]
fn toggle_expand_shows_and_hides_children() {
    let (_tmp, root) = make_temp_tree();
    let mut state = scanned(&root);
    let before = state.visible_rows.len();

    let docs = row_of(&state, "docs");
    state.toggle_expand(docs);
    assert!(state.visible_rows[docs].is_expanded);
    assert_eq!(state.visible_rows.len(), before + 2);
    assert_eq!(row_names(&state)[docs + 1..docs + 3], ["a.txt", "b.pdf"]);
    assert_eq!(state.visible_rows[docs + 1].depth, 2);

    state.toggle_expand(docs);
    assert!(!state.visible_rows[docs].is_expanded);
    assert_eq!(state.visible_rows.len(), before);
}

#[test]
fn toggle_on_a_file_or_out_of_range_is_ignored() {
    let (_tmp, root) = make_temp_tree();
    let mut state = scanned(&root);
    let before = row_names(&state);

    state.toggle_expand(row_of(&state, "notes"));
    state.toggle_expand(999);
    assert_eq!(row_names(&state), before);
}

#[test]
fn activating_a_folder_toggles_and_selects_it() {
    let (_tmp, root) = make_temp_tree();
    let mut state = scanned(&root);

    let media = row_of(&state, "media");
    state.activate_row(media);
    assert_eq!(state.selected_node, Some(state.visible_rows[media].node_index));
    assert!(state.visible_rows[media].is_expanded);
    assert!(row_names(&state).contains(&"c.png".to_string()));
}

// ── Filtering ──────────────────────────────────────────────────────────────────

#[test]
fn query_filter_shows_matches_with_their_folders() {
    let (_tmp, root) = make_temp_tree();
    let mut state = scanned(&root);

    state.filter.query = "b.pd".into();
    state.refresh_filter();

    let names = row_names(&state);
    assert_eq!(&names[1..], ["docs", "b.pdf"]);
    assert_eq!(state.filter_result.as_ref().unwrap().match_count, 1);
}

#[test]
fn category_filter_hides_other_categories() {
    let (_tmp, root) = make_temp_tree();
    let mut state = scanned(&root);

    state.filter.categories.toggle(FileCategory::Archives);
    state.filter.categories.toggle(FileCategory::Other);
    state.filter.categories.toggle(FileCategory::Documents);
    state.refresh_filter();

    assert_eq!(&row_names(&state)[1..], ["media", "c.png"]);
}

#[test]
fn clearing_the_filter_restores_previous_expansion() {
    let (_tmp, root) = make_temp_tree();
    let mut state = scanned(&root);
    state.toggle_expand(row_of(&state, "docs"));
    let before = row_names(&state);

    state.filter.query = "png".into();
    state.refresh_filter();
    assert_ne!(row_names(&state), before);

    state.clear_filter();
    assert!(state.filter_result.is_none());
    assert_eq!(row_names(&state), before);
}

#[test]
fn filter_typed_during_a_scan_is_undone_by_clearing() {
    let (_tmp, root) = make_temp_tree();
    let mut state = state();
    state.start_scan(root);
    // Let the walk fill the live tree without draining its messages.
    std::thread::sleep(Duration::from_millis(300));
    assert_eq!(state.phase, AppPhase::Scanning);

    state.filter.query = "png".into();
    state.refresh_filter();
    pump_until_done(&mut state);
    assert!(state.visible_rows[row_of(&state, "media")].is_expanded);

    state.clear_filter();
    assert!(state.visible_rows[0].is_expanded, "root stays open");
    assert!(
        !state.visible_rows[row_of(&state, "media")].is_expanded,
        "media was only opened by the filter"
    );
    assert!(!row_names(&state).contains(&"c.png".to_string()));
}

#[test]
fn filter_with_no_matches_leaves_only_the_root() {
    let (_tmp, root) = make_temp_tree();
    let mut state = scanned(&root);

    state.filter.query = "zzz".into();
    state.refresh_filter();
    assert_eq!(state.visible_rows.len(), 1);
    assert_eq!(state.filter_result.as_ref().unwrap().match_count, 0);
}

// ── Move ───────────────────────────────────────────────────────────────────────

#[test]
fn move_relocates_the_file_and_rescans() {
    let (_tmp, root) = make_temp_tree();
    let dest = root.join("media");
    let mut state = state_with(FixedDialogs {
        directory: None,
        destination: Some(dest.clone()),
    });
    state.start_scan(root.clone());
    pump_until_done(&mut state);
    state.toggle_expand(row_of(&state, "docs"));

    let node = state.visible_rows[row_of(&state, "a.txt")].node_index;
    state.move_node(node);
    assert!(state.error_message.is_none(), "{:?}", state.error_message);
    assert_eq!(state.phase, AppPhase::Scanning);
    pump_until_done(&mut state);

    assert!(!root.join("docs/a.txt").exists());
    assert!(dest.join("a.txt").exists());

    let tree = state.current_tree().unwrap();
    let moved = tree.find_by_path(&dest.join("a.txt")).expect("moved file in tree");
    assert_eq!(state.selected_node, Some(moved));
    assert!(state.status_message.as_deref().unwrap_or("").starts_with("Moved a.txt"));

    // docs stays expanded across the rescan.
    let docs = row_of(&state, "docs");
    assert!(state.visible_rows[docs].is_expanded);
    assert!(row_names(&state).contains(&"b.pdf".to_string()));
}

#[test]
fn moved_entry_is_revealed_in_a_collapsed_folder() {
    let (_tmp, root) = make_temp_tree();
    let dest = root.join("media");
    let mut state = state_with(FixedDialogs {
        directory: None,
        destination: Some(dest.clone()),
    });
    state.start_scan(root.clone());
    pump_until_done(&mut state);
    assert!(!state.visible_rows[row_of(&state, "media")].is_expanded);

    let node = state.visible_rows[row_of(&state, "notes")].node_index;
    state.move_node(node);
    pump_until_done(&mut state);

    assert!(state.visible_rows[row_of(&state, "media")].is_expanded);
    let selected = state.selected_node.expect("moved entry selected");
    let row = row_of(&state, "notes");
    assert_eq!(state.visible_rows[row].node_index, selected);
    assert_eq!(state.visible_rows[row].depth, 2);
}

#[test]
fn move_cancelled_in_the_dialog_does_nothing() {
    let (_tmp, root) = make_temp_tree();
    let mut state = scanned(&root);
    let node = state.visible_rows[row_of(&state, "notes")].node_index;

    state.move_node(node);
    assert_eq!(state.phase, AppPhase::Results);
    assert!(root.join("notes").exists());
}

#[test]
fn move_onto_an_existing_name_reports_an_error() {
    let (_tmp, root) = make_temp_tree();
    write_bytes(&root.join("media/notes"), 1);
    let mut state = state_with(FixedDialogs {
        directory: None,
        destination: Some(root.join("media")),
    });
    state.start_scan(root.clone());
    pump_until_done(&mut state);

    let node = state.visible_rows[row_of(&state, "notes")].node_index;
    state.move_node(node);
    assert!(state.error_message.is_some());
    assert_eq!(state.phase, AppPhase::Results);
    assert!(root.join("notes").exists());
}

// ── Delete ─────────────────────────────────────────────────────────────────────

#[test]
fn delete_waits_for_confirmation() {
    let (_tmp, root) = make_temp_tree();
    let mut state = scanned(&root);
    let node = state.visible_rows[row_of(&state, "d.zip")].node_index;

    state.request_delete(node);
    let pending = state.pending_delete.clone().expect("confirmation pending");
    assert_eq!(pending.name, "d.zip");
    assert!(!pending.is_dir);
    assert!(root.join("d.zip").exists());

    state.cancel_delete();
    assert!(state.pending_delete.is_none());
    assert!(root.join("d.zip").exists());
}

#[test]
fn confirmed_delete_removes_and_rescans() {
    let (_tmp, root) = make_temp_tree();
    let mut state = scanned(&root);
    let node = state.visible_rows[row_of(&state, "docs")].node_index;

    state.request_delete(node);
    state.confirm_delete();
    assert!(!root.join("docs").exists());
    assert_eq!(state.status_message.as_deref(), Some("Deleted docs"));

    pump_until_done(&mut state);
    assert!(!row_names(&state).contains(&"docs".to_string()));
    assert_eq!(state.current_tree().unwrap().file_count(), 3);
}

#[test]
fn delete_without_confirmation_is_immediate() {
    let (_tmp, root) = make_temp_tree();
    let mut state = scanned(&root);
    state.settings.confirm_delete = false;
    let node = state.visible_rows[row_of(&state, "notes")].node_index;

    state.request_delete(node);
    assert!(state.pending_delete.is_none());
    assert!(!root.join("notes").exists());
    pump_until_done(&mut state);
    assert!(!row_names(&state).contains(&"notes".to_string()));
}

#[test]
fn scanned_root_cannot_be_moved_or_deleted() {
    let (_tmp, root) = make_temp_tree();
    let mut state = state_with(FixedDialogs {
        directory: None,
        destination: Some(std::env::temp_dir()),
    });
    state.start_scan(root.clone());
    pump_until_done(&mut state);
    let root_node = state.visible_rows[0].node_index;

    assert!(!state.can_modify(root_node));
    state.request_delete(root_node);
    state.move_node(root_node);
    assert!(state.pending_delete.is_none());
    assert!(root.exists());
    assert_eq!(state.phase, AppPhase::Results);
}

#[test]
fn nothing_is_modifiable_while_scanning() {
    let (_tmp, root) = make_temp_tree();
    let mut state = scanned(&root);
    let node = state.visible_rows[row_of(&state, "notes")].node_index;
    assert!(state.can_modify(node));

    state.rescan();
    assert_eq!(state.phase, AppPhase::Scanning);
    assert!(!state.can_modify(node));
    pump_until_done(&mut state);
}
