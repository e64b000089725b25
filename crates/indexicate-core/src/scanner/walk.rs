/// Recursive directory walk built on `jwalk`.
///
/// `jwalk` reads directories on a rayon pool and yields entries in depth
/// first order, so every directory arrives before anything inside it.
///
/// Nodes are buffered locally and flushed to the shared tree under one
/// write lock per batch. Because `FileTree::add_node` only appends, the
/// index an entry will get is known up front (`arena_base + position`),
/// which lets children in the same batch find a parent that is not in the
/// arena yet.
use crate::model::{FileNode, NodeIndex};
use crate::scanner::progress::ScanProgress;
use crate::scanner::{LiveTree, ScanOptions};
use compact_str::CompactString;
use crossbeam_channel::Sender;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Nodes buffered before taking the write lock.
const BATCH_SIZE: usize = 512;

/// Entries between progress updates (and live re-aggregation).
const UPDATE_INTERVAL: u64 = 1_000;

/// Entries between cancellation checks.
const CANCEL_CHECK_INTERVAL: u64 = 128;

struct PendingEntry {
    node: FileNode,
    parent_idx: NodeIndex,
    pre_idx: NodeIndex,
}

/// Buffers nodes and tracks where they will land in the arena.
struct Batch<'a> {
    live_tree: &'a LiveTree,
    pending: Vec<PendingEntry>,
    /// Arena length at the start of the current batch.
    arena_base: usize,
}

impl<'a> Batch<'a> {
    fn new(live_tree: &'a LiveTree, arena_base: usize) -> Self {
        Self {
            live_tree,
            pending: Vec::with_capacity(BATCH_SIZE),
            arena_base,
        }
    }

    /// Index the next pushed node will receive.
    fn next_index(&self) -> NodeIndex {
        NodeIndex::new(self.arena_base + self.pending.len())
    }

    fn push(&mut self, node: FileNode, parent_idx: NodeIndex) -> NodeIndex {
        let pre_idx = self.next_index();
        self.pending.push(PendingEntry {
            node,
            parent_idx,
            pre_idx,
        });
        if self.pending.len() >= BATCH_SIZE {
            self.flush();
        }
        pre_idx
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let mut tree = self.live_tree.write();
        for pe in self.pending.drain(..) {
            let idx = tree.add_node(pe.node);
            debug_assert_eq!(idx, pe.pre_idx, "pre-computed NodeIndex drifted");
            tree.add_child(pe.parent_idx, idx);
        }
        self.arena_base = tree.len();
    }

    /// Flag an already-pushed node as unreadable, wherever it currently is.
    fn mark_error(&mut self, idx: NodeIndex) {
        if idx.idx() >= self.arena_base {
            if let Some(pe) = self.pending.get_mut(idx.idx() - self.arena_base) {
                pe.node.is_error = true;
            }
        } else {
            self.live_tree.write().nodes[idx.idx()].is_error = true;
        }
    }
}

/// Walk `root_path` into `live_tree`, reporting on `progress_tx`.
///
/// `root_path` must already be an absolute, readable directory and
/// `live_tree` must be empty with its `root_path` set.
pub fn scan_directory(
    root_path: PathBuf,
    options: ScanOptions,
    progress_tx: Sender<ScanProgress>,
    cancel_flag: Arc<AtomicBool>,
    live_tree: LiveTree,
) {
    let start = Instant::now();
    let mut error_count: u64 = 0;
    let mut files_found: u64 = 0;
    let mut dirs_found: u64 = 1;
    let mut seen: u64 = 0;

    let root_idx = live_tree.write().add_root();

    let mut dir_map: HashMap<PathBuf, NodeIndex> = HashMap::new();
    dir_map.insert(root_path.clone(), root_idx);

    let mut batch = Batch::new(&live_tree, root_idx.idx() + 1);

    let walker = jwalk::WalkDir::new(&root_path)
        .skip_hidden(!options.include_hidden)
        .follow_links(options.follow_links)
        .sort(true)
        .parallelism(jwalk::Parallelism::RayonNewPool(num_cpus::get()));

    for entry_result in walker {
        seen += 1;
        if seen % CANCEL_CHECK_INTERVAL == 0 && cancel_flag.load(Ordering::Relaxed) {
            batch.flush();
            live_tree.write().aggregate_sizes();
            debug!("Scan cancelled after {seen} entries");
            let _ = progress_tx.send(ScanProgress::Cancelled);
            return;
        }

        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                error_count += 1;
                let err_path = err.path().map(|p| p.to_path_buf());
                if let Some(path) = &err_path {
                    record_error_node(&mut batch, &dir_map, path);
                }
                let _ = progress_tx.send(ScanProgress::Error {
                    path: err_path
                        .map(|p| p.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    message: err.to_string(),
                });
                continue;
            }
        };

        if entry.depth() == 0 {
            if let Some(err) = &entry.read_children_error {
                // Access to the root was lost after it was checked.
                error_count += 1;
                batch.mark_error(root_idx);
                let _ = progress_tx.send(ScanProgress::Error {
                    path: root_path.to_string_lossy().into_owned(),
                    message: err.to_string(),
                });
            }
            continue;
        }

        let path = entry.path();
        let Some(parent_idx) = path.parent().and_then(|p| dir_map.get(p)).copied() else {
            warn!("Skipping {}: parent not yet in tree", path.display());
            continue;
        };

        let name = CompactString::new(entry.file_name().to_string_lossy());
        let metadata = entry.metadata();
        let modified = metadata.as_ref().ok().and_then(|m| m.modified().ok());

        if entry.file_type().is_dir() {
            let mut node = FileNode::new_dir(name, Some(parent_idx));
            node.modified = modified;
            if let Some(err) = &entry.read_children_error {
                node.is_error = true;
                error_count += 1;
                let _ = progress_tx.send(ScanProgress::Error {
                    path: path.to_string_lossy().into_owned(),
                    message: err.to_string(),
                });
            }
            let idx = batch.push(node, parent_idx);
            dir_map.insert(path.clone(), idx);
            dirs_found += 1;
        } else {
            match metadata {
                Ok(meta) => {
                    let mut node = FileNode::new_file(name, meta.len(), Some(parent_idx));
                    node.modified = modified;
                    batch.push(node, parent_idx);
                    files_found += 1;
                }
                Err(err) => {
                    error_count += 1;
                    batch.push(FileNode::new_error(name, false, Some(parent_idx)), parent_idx);
                    let _ = progress_tx.send(ScanProgress::Error {
                        path: path.to_string_lossy().into_owned(),
                        message: err.to_string(),
                    });
                }
            }
        }

        if seen % UPDATE_INTERVAL == 0 {
            batch.flush();
            live_tree.write().aggregate_sizes();
            let _ = progress_tx.send(ScanProgress::Update {
                files_found,
                dirs_found,
                current_path: path.to_string_lossy().into_owned(),
            });
        }
    }

    batch.flush();
    live_tree.write().aggregate_sizes();

    let duration = start.elapsed();
    debug!(
        "Scan complete: {files_found} files, {dirs_found} dirs, {error_count} errors in {duration:?}"
    );

    let _ = progress_tx.send(ScanProgress::Complete {
        duration,
        error_count,
    });
}

/// Put an error marker in the tree for a path the walker could not read.
///
/// If the path already has a node (a directory whose listing failed), that
/// node is flagged; otherwise a placeholder is added under its parent.
fn record_error_node(batch: &mut Batch<'_>, dir_map: &HashMap<PathBuf, NodeIndex>, path: &Path) {
    if let Some(&idx) = dir_map.get(path) {
        batch.mark_error(idx);
        return;
    }
    let Some(parent_idx) = path.parent().and_then(|p| dir_map.get(p)).copied() else {
        return;
    };
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "<unreadable>".to_string());
    batch.push(
        FileNode::new_error(CompactString::new(name), true, Some(parent_idx)),
        parent_idx,
    );
}
