//! Panels composed by the main layout.

pub mod details_panel;
pub mod options_panel;
pub mod summary_panel;
pub mod tree_panel;
