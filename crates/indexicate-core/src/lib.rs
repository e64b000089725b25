/// Indexicate core: scanning, categorisation, filtering and file actions.
///
/// No UI dependencies; the GUI crate drives everything through these
/// modules.
///
/// # Modules
///
/// - [`model`]: arena-allocated file tree and display helpers.
/// - [`category`]: extension → category table and per-category totals.
/// - [`scanner`]: background directory walk with progress reporting.
/// - [`filter`]: interactive name / category filtering of a tree.
/// - [`actions`]: open, move and delete, delegated to the OS.
/// - [`settings`]: persisted user preferences.
pub mod actions;
pub mod category;
pub mod error;
pub mod filter;
pub mod model;
pub mod scanner;
pub mod settings;

pub use error::{ActionError, ScanError, SettingsError};
