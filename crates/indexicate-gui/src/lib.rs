/// Indexicate GUI, the egui desktop frontend.
///
/// This crate contains all UI code. Scanning, filtering and file actions
/// live in `indexicate-core`.
pub mod app;
pub mod dialogs;
pub mod icon;
pub mod panels;
pub mod state;
pub mod theme;
pub mod widgets;

pub use app::{IndexicateApp, IndexicateState};
