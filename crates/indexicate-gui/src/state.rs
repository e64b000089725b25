/// Application state management.
///
/// Centralises all mutable state that the UI reads and writes. The scan
/// thread communicates via a channel; state updates happen in
/// `process_scan_messages()` which runs once per frame.
///
/// During scanning, the tree view reads from the **shared `LiveTree`**
/// (`Arc<RwLock<FileTree>>`) so entries appear while the walk runs.
///
/// File actions (open, move, delete) run synchronously on the UI thread.
/// A successful move or delete rescans the current folder and restores the
/// expanded folders and the selection by path.
use crate::dialogs::{DialogService, NativeDialogService};
use indexicate_core::actions::{self, DeleteMode};
use indexicate_core::category::{analyse_categories, CategoryStats};
use indexicate_core::filter::{FilterResult, TreeFilter};
use indexicate_core::model::{FileTree, NodeIndex, SortOrder};
use indexicate_core::scanner::progress::ScanProgress;
use indexicate_core::scanner::{LiveTree, ScanHandle};
use indexicate_core::settings::Settings;
use indexicate_core::ActionError;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// The current phase of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPhase {
    /// No scan in progress and no results (startup, or after a failed scan).
    Idle,
    /// A scan is running; the live tree is shown.
    Scanning,
    /// The scan finished (or was stopped) and the tree is final.
    Results,
}

/// A row in the flattened visible-rows list for the virtualised tree view.
#[derive(Clone, Debug)]
pub struct VisibleRow {
    /// Index into the `FileTree` arena.
    pub node_index: NodeIndex,
    /// Nesting depth (0 = the scanned folder).
    pub depth: u16,
    /// Whether this directory is currently expanded (meaningless for files).
    pub is_expanded: bool,
}

/// A delete waiting for the user to confirm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

/// How a scan ended, collected while the channel is borrowed.
enum ScanEnd {
    Finished,
    Failed(String),
}

/// Maximum number of scan-progress messages drained from the channel per frame.
const MAX_MESSAGES_PER_FRAME: usize = 300;

/// Cap on remembered per-entry scan errors. The counter keeps going.
const MAX_SCAN_ERRORS: usize = 1_000;

/// Maximum rows in the virtualised tree-view visible-rows list.
///
/// Bounds memory on fully expanded trees with millions of entries; users
/// can collapse folders to explore deeper.
const MAX_VISIBLE_ROWS: usize = 500_000;

/// All application state.
pub struct AppState {
    // ── Preferences ────────────────────────────────────
    pub settings: Settings,
    /// Where `settings` is saved. `None` keeps preferences in memory only.
    settings_path: Option<PathBuf>,
    dialogs: Box<dyn DialogService>,

    // ── Scan ───────────────────────────────────────────
    pub phase: AppPhase,
    pub scan_handle: Option<ScanHandle>,
    /// The folder passed to the most recent scan, as requested.
    pub scan_root: Option<PathBuf>,
    pub scan_files_found: u64,
    pub scan_dirs_found: u64,
    pub scan_current_path: String,
    pub scan_error_count: u64,
    pub scan_duration: Option<Duration>,
    /// True if the most recent scan was stopped early (partial results).
    pub scan_was_cancelled: bool,
    pub scan_errors: Vec<(String, String)>,

    // ── Results ────────────────────────────────────────
    /// The completed scan tree (set once the scan finishes).
    pub tree: Option<FileTree>,
    /// The live tree reference during scanning.
    pub live_tree: Option<LiveTree>,
    pub visible_rows: Vec<VisibleRow>,
    pub selected_node: Option<NodeIndex>,
    pub category_stats: Vec<CategoryStats>,
    /// Node count at the last live rebuild, to detect growth.
    live_tree_last_len: usize,

    // ── Filter ─────────────────────────────────────────
    pub filter: TreeFilter,
    /// Cached result of `filter` over the current tree. `None` when the
    /// filter is inactive.
    pub filter_result: Option<FilterResult>,
    /// Folders that were expanded before a filter auto-expanded matches;
    /// restored when the filter is cleared.
    expanded_before_filter: Option<HashSet<NodeIndex>>,

    // ── Rescan restore ─────────────────────────────────
    restore_expanded: Vec<PathBuf>,
    restore_selected: Option<PathBuf>,

    // ── UI state ───────────────────────────────────────
    pub pending_delete: Option<PendingDelete>,
    /// Shown in a modal error window until dismissed.
    pub error_message: Option<String>,
    /// One-line outcome of the last scan failure or action.
    pub status_message: Option<String>,
    pub show_about: bool,
    pub show_errors: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default(), None, Box::new(NativeDialogService))
    }
}

impl AppState {
    /// Create initial application state.
    pub fn new(
        settings: Settings,
        settings_path: Option<PathBuf>,
        dialogs: Box<dyn DialogService>,
    ) -> Self {
        Self {
            settings,
            settings_path,
            dialogs,
            phase: AppPhase::Idle,
            scan_handle: None,
            scan_root: None,
            scan_files_found: 0,
            scan_dirs_found: 0,
            scan_current_path: String::new(),
            scan_error_count: 0,
            scan_duration: None,
            scan_was_cancelled: false,
            scan_errors: Vec::new(),
            tree: None,
            live_tree: None,
            visible_rows: Vec::new(),
            selected_node: None,
            category_stats: Vec::new(),
            live_tree_last_len: 0,
            filter: TreeFilter::default(),
            filter_result: None,
            expanded_before_filter: None,
            restore_expanded: Vec::new(),
            restore_selected: None,
            pending_delete: None,
            error_message: None,
            status_message: None,
            show_about: false,
            show_errors: false,
        }
    }

    // ── Scan lifecycle ────────────────────────────────────────────────────

    /// Start scanning `path`. Any running scan is cancelled first.
    pub fn start_scan(&mut self, path: PathBuf) {
        if let Some(ref handle) = self.scan_handle {
            handle.cancel();
        }

        self.phase = AppPhase::Scanning;
        self.scan_files_found = 0;
        self.scan_dirs_found = 0;
        self.scan_current_path = path.to_string_lossy().into_owned();
        self.scan_error_count = 0;
        self.scan_duration = None;
        self.scan_was_cancelled = false;
        self.scan_errors.clear();
        self.tree = None;
        self.visible_rows.clear();
        self.selected_node = None;
        self.category_stats.clear();
        self.live_tree_last_len = 0;
        self.filter_result = None;
        self.expanded_before_filter = None;
        self.restore_expanded.clear();
        self.restore_selected = None;
        self.pending_delete = None;
        self.status_message = None;

        self.settings.last_directory = Some(path.clone());
        self.save_settings();

        let handle =
            indexicate_core::scanner::start_scan(path.clone(), self.settings.scan_options());
        self.live_tree = Some(handle.live_tree.clone());
        self.scan_handle = Some(handle);
        self.scan_root = Some(path);
    }

    /// Cancel any running scan. The partial tree is kept.
    pub fn cancel_scan(&mut self) {
        if let Some(ref handle) = self.scan_handle {
            handle.cancel();
        }
    }

    /// Ask for a folder and scan it.
    pub fn choose_folder(&mut self) {
        let start = self
            .current_root()
            .or_else(|| self.settings.last_directory.clone());
        match self.dialogs.pick_directory(start.as_deref()) {
            Some(dir) => {
                info!("Folder chosen: {}", dir.display());
                self.start_scan(dir);
            }
            None => info!("Folder selection cancelled"),
        }
    }

    /// Scan the current folder again, keeping expanded folders and the
    /// selection where the paths still exist.
    pub fn rescan(&mut self) {
        self.rescan_selecting(None);
    }

    fn rescan_selecting(&mut self, select: Option<PathBuf>) {
        let Some(root) = self.current_root() else {
            return;
        };
        let expanded_nodes: Vec<NodeIndex> = match self.expanded_before_filter {
            Some(ref saved) => saved.iter().copied().collect(),
            None => self.expanded_nodes().into_iter().collect(),
        };
        let (mut expanded, selected) = self
            .with_tree(|tree| {
                let expanded: Vec<PathBuf> = expanded_nodes
                    .iter()
                    .filter(|n| n.idx() < tree.len())
                    .map(|&n| tree.full_path(n))
                    .collect();
                let selected = self
                    .selected_node
                    .filter(|n| n.idx() < tree.len())
                    .map(|n| tree.full_path(n));
                (expanded, selected)
            })
            .unwrap_or_default();
        if let Some(ref target) = select {
            // Open the folders leading to the new selection.
            expanded.extend(
                target
                    .ancestors()
                    .skip(1)
                    .take_while(|dir| dir.starts_with(&root))
                    .map(Path::to_path_buf),
            );
        }

        self.start_scan(root);
        self.restore_expanded = expanded;
        self.restore_selected = select.or(selected);
    }

    /// The folder currently shown (or being scanned).
    pub fn current_root(&self) -> Option<PathBuf> {
        match self.tree {
            Some(ref tree) => Some(tree.root_path.clone()),
            None => self.scan_root.clone(),
        }
    }

    /// The final tree, once a scan has finished.
    pub fn current_tree(&self) -> Option<&FileTree> {
        self.tree.as_ref()
    }

    /// Process pending scan progress messages. Called once per frame.
    ///
    /// Returns `true` if the UI should repaint (new data arrived).
    pub fn process_scan_messages(&mut self) -> bool {
        let handle = match &self.scan_handle {
            Some(h) => h,
            None => return false,
        };

        let mut repaint = false;
        let mut ended = None;

        // Drain without blocking, subject to a per-frame budget.
        for _ in 0..MAX_MESSAGES_PER_FRAME {
            let msg = match handle.progress_rx.try_recv() {
                Ok(m) => m,
                Err(crossbeam_channel::TryRecvError::Empty) => break,
                Err(crossbeam_channel::TryRecvError::Disconnected) => {
                    ended = Some(ScanEnd::Failed("the scanner stopped unexpectedly".into()));
                    break;
                }
            };
            repaint = true;
            match msg {
                ScanProgress::Update {
                    files_found,
                    dirs_found,
                    current_path,
                } => {
                    self.scan_files_found = files_found;
                    self.scan_dirs_found = dirs_found;
                    self.scan_current_path = current_path;
                }
                ScanProgress::Error { path, message } => {
                    self.scan_error_count += 1;
                    if self.scan_errors.len() < MAX_SCAN_ERRORS {
                        self.scan_errors.push((path, message));
                    }
                }
                ScanProgress::Complete {
                    duration,
                    error_count,
                } => {
                    self.scan_error_count = error_count;
                    self.scan_duration = Some(duration);
                    ended = Some(ScanEnd::Finished);
                    break;
                }
                ScanProgress::Cancelled => {
                    self.scan_was_cancelled = true;
                    ended = Some(ScanEnd::Finished);
                    break;
                }
                ScanProgress::Failed { message } => {
                    ended = Some(ScanEnd::Failed(message));
                    break;
                }
            }
        }

        match ended {
            Some(ScanEnd::Finished) => {
                self.finish_scan();
                return true;
            }
            Some(ScanEnd::Failed(message)) => {
                self.fail_scan(message);
                return true;
            }
            None => {}
        }

        // While scanning, refresh the rows whenever the live tree grew.
        if self.phase == AppPhase::Scanning {
            if let Some(lt) = self.live_tree.clone() {
                let tree = lt.read();
                let current_len = tree.len();
                if current_len != self.live_tree_last_len && current_len > 0 {
                    self.live_tree_last_len = current_len;
                    if self.filter.is_active() {
                        self.filter_result = self.filter.apply(&tree);
                    }
                    let mut expanded = self.expanded_nodes();
                    expanded.extend(self.restored_nodes(&tree));
                    expanded.extend(tree.root);
                    self.visible_rows = build_rows(
                        &tree,
                        &expanded,
                        self.settings.sort_order,
                        self.filter_result.as_ref(),
                    );
                    repaint = true;
                }
            }
        }

        repaint
    }

    /// Take the final tree out of the live tree and build the result view.
    fn finish_scan(&mut self) {
        self.phase = AppPhase::Results;
        // Dropping the handle releases its reference to the live tree.
        self.scan_handle = None;

        let Some(lt) = self.live_tree.take() else {
            return;
        };
        let tree = match Arc::try_unwrap(lt) {
            Ok(lock) => RwLock::into_inner(lock),
            Err(shared) => shared.read().clone(),
        };

        let restored = self.restored_nodes(&tree);
        let mut base = if self.restore_expanded.is_empty() {
            self.expanded_nodes()
        } else {
            restored.clone()
        };
        base.extend(tree.root);

        self.filter_result = self.filter.apply(&tree);
        let expanded = match self.filter_result {
            Some(ref result) => {
                let auto = visible_dirs(&tree, result);
                // A filter typed during the scan already saved the folders
                // open before it; the rows on screen are its own expansion.
                match self.expanded_before_filter {
                    Some(ref mut saved) => {
                        saved.extend(restored);
                        saved.extend(tree.root);
                    }
                    None => self.expanded_before_filter = Some(base),
                }
                auto
            }
            None => base,
        };

        self.visible_rows = build_rows(
            &tree,
            &expanded,
            self.settings.sort_order,
            self.filter_result.as_ref(),
        );
        if let Some(path) = self.restore_selected.take() {
            self.selected_node = tree.find_by_path(&path);
        } else if self.selected_node.is_some_and(|n| n.idx() >= tree.len()) {
            self.selected_node = None;
        }
        self.restore_expanded.clear();
        self.category_stats = analyse_categories(&tree);

        info!(
            "Scan of {} finished: {} entries, {} errors{}",
            tree.root_path.display(),
            tree.len(),
            self.scan_error_count,
            if self.scan_was_cancelled { " (stopped early)" } else { "" }
        );
        self.tree = Some(tree);
    }

    fn fail_scan(&mut self, message: String) {
        warn!("Scan failed: {message}");
        self.phase = AppPhase::Idle;
        self.scan_handle = None;
        self.live_tree = None;
        self.tree = None;
        self.visible_rows.clear();
        self.selected_node = None;
        self.category_stats.clear();
        self.filter_result = None;
        self.restore_expanded.clear();
        self.restore_selected = None;
        self.status_message = Some(format!("Scan failed: {message}"));
    }

    // ── Tree view ─────────────────────────────────────────────────────────

    /// Run `f` against the final tree, or the live tree during a scan.
    pub fn with_tree<R>(&self, f: impl FnOnce(&FileTree) -> R) -> Option<R> {
        if let Some(ref tree) = self.tree {
            Some(f(tree))
        } else if let Some(ref lt) = self.live_tree {
            let tree = lt.read();
            Some(f(&tree))
        } else {
            None
        }
    }

    /// Toggle expansion of the directory at `row_index` in `visible_rows`.
    pub fn toggle_expand(&mut self, row_index: usize) {
        if row_index >= self.visible_rows.len() {
            return;
        }
        let order = self.settings.sort_order;
        if let Some(ref tree) = self.tree {
            toggle_expand_inner(
                &mut self.visible_rows,
                row_index,
                tree,
                order,
                self.filter_result.as_ref(),
            );
        } else if let Some(ref lt) = self.live_tree {
            let tree = lt.read();
            toggle_expand_inner(
                &mut self.visible_rows,
                row_index,
                &tree,
                order,
                self.filter_result.as_ref(),
            );
        }
    }

    pub fn select_row(&mut self, row_index: usize) {
        if let Some(row) = self.visible_rows.get(row_index) {
            self.selected_node = Some(row.node_index);
        }
    }

    /// Double-click: folders expand or collapse, files open.
    pub fn activate_row(&mut self, row_index: usize) {
        let node = match self.visible_rows.get(row_index) {
            Some(row) => row.node_index,
            None => return,
        };
        self.selected_node = Some(node);
        let is_dir = self.with_tree(|t| t.node(node).is_dir).unwrap_or(false);
        if is_dir {
            self.toggle_expand(row_index);
        } else {
            self.open_node(node);
        }
    }

    /// Re-apply `filter` after the query or categories changed.
    ///
    /// Turning a filter on expands every folder on the way to a match;
    /// clearing it brings back the folders that were open before.
    pub fn refresh_filter(&mut self) {
        let active = self.filter.is_active();
        let current = self.expanded_nodes();
        if active && self.expanded_before_filter.is_none() {
            self.expanded_before_filter = Some(current.clone());
        }
        let saved = if active {
            None
        } else {
            self.expanded_before_filter.take()
        };
        let order = self.settings.sort_order;

        let built = self.with_tree(|tree| {
            let result = self.filter.apply(tree);
            let expanded = match (&result, saved) {
                (Some(r), _) => visible_dirs(tree, r),
                (None, Some(saved)) => saved,
                (None, None) => current,
            };
            let rows = build_rows(tree, &expanded, order, result.as_ref());
            (result, rows)
        });
        if let Some((result, rows)) = built {
            self.filter_result = result;
            self.visible_rows = rows;
        }
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
        self.refresh_filter();
    }

    /// Change the child ordering and rebuild the rows in place.
    pub fn set_sort_order(&mut self, order: SortOrder) {
        if self.settings.sort_order == order {
            return;
        }
        self.settings.sort_order = order;
        self.save_settings();
        let expanded = self.expanded_nodes();
        let rows = self.with_tree(|tree| {
            build_rows(tree, &expanded, order, self.filter_result.as_ref())
        });
        if let Some(rows) = rows {
            self.visible_rows = rows;
        }
    }

    /// Show or hide dot-files. Takes effect through a rescan.
    pub fn set_include_hidden(&mut self, include: bool) {
        if self.settings.include_hidden == include {
            return;
        }
        self.settings.include_hidden = include;
        self.save_settings();
        self.rescan();
    }

    fn expanded_nodes(&self) -> HashSet<NodeIndex> {
        self.visible_rows
            .iter()
            .filter(|r| r.is_expanded)
            .map(|r| r.node_index)
            .collect()
    }

    fn restored_nodes(&self, tree: &FileTree) -> HashSet<NodeIndex> {
        self.restore_expanded
            .iter()
            .filter_map(|p| tree.find_by_path(p))
            .collect()
    }

    // ── File actions ──────────────────────────────────────────────────────

    /// Absolute path of `node`, if it belongs to the tree on screen.
    pub fn node_path(&self, node: NodeIndex) -> Option<PathBuf> {
        self.with_tree(|tree| (node.idx() < tree.len()).then(|| tree.full_path(node)))
            .flatten()
    }

    pub fn open_node(&mut self, node: NodeIndex) {
        if let Some(path) = self.node_path(node) {
            if let Err(e) = actions::open_path(&path) {
                self.report_error(e);
            }
        }
    }

    pub fn open_node_location(&mut self, node: NodeIndex) {
        if let Some(path) = self.node_path(node) {
            if let Err(e) = actions::open_location(&path) {
                self.report_error(e);
            }
        }
    }

    /// `true` when `node` may be moved or deleted: results are final and
    /// the node is not the scanned folder itself.
    pub fn can_modify(&self, node: NodeIndex) -> bool {
        self.phase == AppPhase::Results
            && self
                .tree
                .as_ref()
                .is_some_and(|t| node.idx() < t.len() && t.root != Some(node))
    }

    /// Ask for a destination folder and move `node` there.
    pub fn move_node(&mut self, node: NodeIndex) {
        if !self.can_modify(node) {
            return;
        }
        let Some(path) = self.node_path(node) else {
            return;
        };
        let name = display_name(&path);
        let Some(dest) = self
            .dialogs
            .pick_move_destination(&name, path.parent())
        else {
            info!("Move of {} cancelled", path.display());
            return;
        };

        match actions::move_path(&path, &dest) {
            Ok(new_path) => {
                self.rescan_selecting(Some(new_path));
                self.status_message = Some(format!("Moved {name} to {}", dest.display()));
            }
            Err(e) => self.report_error(e),
        }
    }

    /// Delete `node`, asking first when `confirm_delete` is on.
    pub fn request_delete(&mut self, node: NodeIndex) {
        if !self.can_modify(node) {
            return;
        }
        let Some(tree) = self.tree.as_ref() else {
            return;
        };
        let path = tree.full_path(node);
        let pending = PendingDelete {
            name: display_name(&path),
            is_dir: tree.node(node).is_dir,
            path,
        };
        if self.settings.confirm_delete {
            self.pending_delete = Some(pending);
        } else {
            self.perform_delete(pending);
        }
    }

    /// Carry out the delete the user just confirmed.
    pub fn confirm_delete(&mut self) {
        if let Some(pending) = self.pending_delete.take() {
            self.perform_delete(pending);
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    fn perform_delete(&mut self, pending: PendingDelete) {
        let mode = self.settings.delete_mode;
        match actions::delete_path(&pending.path, mode) {
            Ok(()) => {
                self.rescan();
                self.status_message = Some(match mode {
                    DeleteMode::Trash => format!("Moved {} to the trash", pending.name),
                    DeleteMode::Permanent => format!("Deleted {}", pending.name),
                });
            }
            Err(e) => self.report_error(e),
        }
    }

    fn report_error(&mut self, e: ActionError) {
        warn!("Action failed: {e}");
        self.error_message = Some(e.to_string());
    }

    // ── Preferences ───────────────────────────────────────────────────────

    /// Persist `settings`. Failures are logged, not shown.
    pub fn save_settings(&self) {
        if let Some(ref path) = self.settings_path {
            if let Err(e) = self.settings.save_to(path) {
                warn!("Could not save settings: {e}");
            }
        }
    }

    pub fn toggle_theme(&mut self) {
        self.settings.dark_mode = !self.settings.dark_mode;
        self.save_settings();
    }
}

/// Last component of `path` for messages, or the whole path.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Every directory the filter leaves visible.
fn visible_dirs(tree: &FileTree, result: &FilterResult) -> HashSet<NodeIndex> {
    tree.nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (NodeIndex::new(i), n))
        .filter(|(idx, n)| n.is_dir && result.is_visible(*idx))
        .map(|(idx, _)| idx)
        .collect()
}

/// Children of `node` in display order, minus anything the filter hides.
fn visible_children(
    tree: &FileTree,
    node: NodeIndex,
    order: SortOrder,
    filter: Option<&FilterResult>,
) -> Vec<NodeIndex> {
    let mut children = tree.children_sorted(node, order);
    if let Some(result) = filter {
        children.retain(|&c| result.is_visible(c));
    }
    children
}

/// Flatten the tree into rows, descending only into `expanded` folders.
fn build_rows(
    tree: &FileTree,
    expanded: &HashSet<NodeIndex>,
    order: SortOrder,
    filter: Option<&FilterResult>,
) -> Vec<VisibleRow> {
    let mut rows = Vec::new();
    if let Some(root) = tree.root {
        push_rows(&mut rows, tree, root, 0, expanded, order, filter);
    }
    rows
}

fn push_rows(
    rows: &mut Vec<VisibleRow>,
    tree: &FileTree,
    node: NodeIndex,
    depth: u16,
    expanded: &HashSet<NodeIndex>,
    order: SortOrder,
    filter: Option<&FilterResult>,
) {
    if rows.len() >= MAX_VISIBLE_ROWS {
        return;
    }
    let is_expanded = tree.node(node).is_dir && expanded.contains(&node);
    rows.push(VisibleRow {
        node_index: node,
        depth,
        is_expanded,
    });
    if is_expanded {
        for child in visible_children(tree, node, order, filter) {
            push_rows(rows, tree, child, depth + 1, expanded, order, filter);
        }
    }
}

/// Toggle-expand implementation operating on the visible_rows vec directly.
///
/// Free function to avoid `&mut self` / `&self.tree` borrow conflict.
fn toggle_expand_inner(
    visible_rows: &mut Vec<VisibleRow>,
    row_index: usize,
    tree: &FileTree,
    order: SortOrder,
    filter: Option<&FilterResult>,
) {
    let row = &visible_rows[row_index];
    if !tree.node(row.node_index).is_dir {
        return;
    }

    if row.is_expanded {
        // Collapse: drop the consecutive rows that are deeper than this one.
        let parent_depth = row.depth;
        let remove_start = row_index + 1;
        let mut remove_end = remove_start;
        while remove_end < visible_rows.len() && visible_rows[remove_end].depth > parent_depth {
            remove_end += 1;
        }
        visible_rows.drain(remove_start..remove_end);
        visible_rows[row_index].is_expanded = false;
    } else {
        let child_depth = row.depth + 1;
        let children = visible_children(tree, row.node_index, order, filter);
        let insert_pos = row_index + 1;
        let headroom = MAX_VISIBLE_ROWS.saturating_sub(visible_rows.len());

        let new_rows: Vec<VisibleRow> = children
            .into_iter()
            .take(headroom)
            .map(|child| VisibleRow {
                node_index: child,
                depth: child_depth,
                is_expanded: false,
            })
            .collect();

        visible_rows.splice(insert_pos..insert_pos, new_rows);
        visible_rows[row_index].is_expanded = true;
    }
}
