//! UI widgets for Indexicate.

pub mod category_filter;
pub mod status_bar;
pub mod toolbar;
pub mod tree_view;
