/// Scanner: walks the chosen directory on a background thread.
///
/// The walk writes into a **shared `LiveTree`** (`Arc<RwLock<FileTree>>`)
/// so the tree view can show entries while the scan is still running, and
/// reports counters through a bounded crossbeam channel.
pub mod progress;
pub mod walk;

use crate::error::ScanError;
use crate::model::FileTree;
use progress::ScanProgress;

use crossbeam_channel::Receiver;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};

/// A tree the scanner writes while the UI reads it.
pub type LiveTree = Arc<RwLock<FileTree>>;

/// Capacity of the progress channel.
///
/// The UI drains it once per frame; if it falls behind, the scanner blocks
/// briefly instead of queueing without bound.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// Knobs for one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanOptions {
    /// Include dot-files and dot-directories.
    pub include_hidden: bool,
    /// Descend into symlinked directories.
    pub follow_links: bool,
}

/// Handle to a running or finished scan.
pub struct ScanHandle {
    pub progress_rx: Receiver<ScanProgress>,
    pub live_tree: LiveTree,
    /// The directory being scanned (absolute).
    pub root_path: PathBuf,
    cancel_flag: Arc<AtomicBool>,
    _thread: Option<thread::JoinHandle<()>>,
}

impl ScanHandle {
    /// Ask the scan to stop as soon as possible.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }
}

/// Check that `path` is a readable directory and return its absolute form.
pub fn resolve_root(path: &Path) -> Result<PathBuf, ScanError> {
    let meta = std::fs::metadata(path).map_err(|e| ScanError::Io(e, path.to_path_buf()))?;
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory(path.to_path_buf()));
    }
    // Metadata is readable even when the listing is not.
    std::fs::read_dir(path).map_err(|e| ScanError::Io(e, path.to_path_buf()))?;
    std::fs::canonicalize(path).map_err(|e| ScanError::Io(e, path.to_path_buf()))
}

/// Start scanning `root_path` on a background thread.
///
/// Always returns a handle; if the root is unusable the thread sends a
/// single [`ScanProgress::Failed`].
pub fn start_scan(root_path: PathBuf, options: ScanOptions) -> ScanHandle {
    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let cancel_clone = cancel_flag.clone();

    let live_tree: LiveTree = Arc::new(RwLock::new(FileTree::with_capacity(
        root_path.clone(),
        4_096,
    )));
    let tree_clone = live_tree.clone();
    let requested = root_path.clone();

    let spawned = thread::Builder::new()
        .name("indexicate-scanner".into())
        .spawn(move || {
            let root = match resolve_root(&requested) {
                Ok(root) => root,
                Err(e) => {
                    warn!("Cannot scan {}: {e}", requested.display());
                    let _ = progress_tx.send(ScanProgress::Failed {
                        message: e.to_string(),
                    });
                    return;
                }
            };
            info!("Starting scan of {}", root.display());
            tree_clone.write().root_path = root.clone();
            walk::scan_directory(root, options, progress_tx, cancel_clone, tree_clone);
        });

    let thread = match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            // The sender moved into the closure was dropped with it, so the
            // receiver reports a disconnect and the UI treats it as failure.
            warn!("Failed to spawn scanner thread: {e}");
            None
        }
    };

    ScanHandle {
        progress_rx,
        live_tree,
        root_path,
        cancel_flag,
        _thread: thread,
    }
}
