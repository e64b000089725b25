//! Error types for the core crate.

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a scan cannot start at all.
///
/// Problems with individual entries below the root are not errors of this
/// kind; they are reported as progress messages and the scan carries on.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot read {1}: {0}")]
    Io(#[source] std::io::Error, PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Failures of the open / move / delete actions.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{1}: {0}")]
    Io(#[source] std::io::Error, PathBuf),

    #[error("'{0}' already exists")]
    DestinationExists(PathBuf),

    #[error("cannot move '{0}' into itself")]
    MoveIntoSelf(PathBuf),

    #[error("could not move {1} to the trash: {0}")]
    Trash(#[source] trash::Error, PathBuf),

    #[error("no application could open {1}: {0}")]
    Open(#[source] std::io::Error, PathBuf),
}

/// Settings file problems.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error for {1}: {0}")]
    Io(#[source] std::io::Error, PathBuf),

    #[error("invalid settings file: {0}")]
    Parse(#[from] serde_json::Error),
}
