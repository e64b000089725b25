/// Data model for the scanned directory tree.
pub mod file_node;
pub mod file_tree;
pub mod size;

pub use file_node::{FileNode, NodeIndex};
pub use file_tree::{FileTree, SortOrder};
