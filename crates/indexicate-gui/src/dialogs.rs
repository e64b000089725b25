//! Native folder dialogs behind a trait, so `AppState` can be driven in
//! tests without opening OS windows.

use std::path::{Path, PathBuf};

/// Folder selection dialogs used by the application.
pub trait DialogService: Send {
    /// Ask the user for a directory to scan.
    fn pick_directory(&self, start_in: Option<&Path>) -> Option<PathBuf>;

    /// Ask the user where `item_name` should be moved to.
    fn pick_move_destination(&self, item_name: &str, start_in: Option<&Path>) -> Option<PathBuf>;
}

/// Production implementation backed by `rfd`.
pub struct NativeDialogService;

impl DialogService for NativeDialogService {
    fn pick_directory(&self, start_in: Option<&Path>) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new().set_title("Choose folder");
        if let Some(dir) = start_in {
            dialog = dialog.set_directory(dir);
        }
        dialog.pick_folder()
    }

    fn pick_move_destination(&self, item_name: &str, start_in: Option<&Path>) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new().set_title(format!("Move '{item_name}' to…"));
        if let Some(dir) = start_in {
            dialog = dialog.set_directory(dir);
        }
        dialog.pick_folder()
    }
}
