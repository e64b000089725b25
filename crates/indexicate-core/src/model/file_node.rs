/// A single entry in the arena-allocated file tree.
///
/// Nodes live in a flat `Vec<FileNode>`. Parent/child links are indices,
/// so the whole tree can be cloned or handed between threads without any
/// reference counting.
use crate::category::{categorise_name, FileCategory};
use compact_str::CompactString;
use std::time::SystemTime;

/// Index into the arena `Vec<FileNode>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// Create a `NodeIndex` from a `usize`.
    #[inline]
    pub fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize, "NodeIndex overflow");
        Self(index as u32)
    }

    /// Return the index as a `usize` for Vec indexing.
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A file or directory in the tree.
#[derive(Debug, Clone)]
pub struct FileNode {
    /// Entry name only. Full paths are rebuilt by walking up via `parent`.
    pub name: CompactString,

    /// Size in bytes. For directories, the sum of every descendant file,
    /// filled in by [`FileTree::aggregate_sizes`](super::FileTree::aggregate_sizes).
    pub size: u64,

    pub is_dir: bool,

    pub parent: Option<NodeIndex>,

    /// Head of this directory's child list.
    pub first_child: Option<NodeIndex>,

    pub next_sibling: Option<NodeIndex>,

    /// Number of files (not directories) below this directory.
    pub descendant_count: u64,

    pub modified: Option<SystemTime>,

    /// Display category. Always `Some` for files, `None` for directories.
    pub category: Option<FileCategory>,

    /// The entry could not be read (e.g. access denied). It stays in the
    /// tree so the user can see where the scan was blocked.
    pub is_error: bool,
}

impl FileNode {
    /// Create a file node. The category is derived from the name.
    pub fn new_file(name: CompactString, size: u64, parent: Option<NodeIndex>) -> Self {
        let category = Some(categorise_name(&name));
        Self {
            name,
            size,
            is_dir: false,
            parent,
            first_child: None,
            next_sibling: None,
            descendant_count: 0,
            modified: None,
            category,
            is_error: false,
        }
    }

    /// Create a directory node.
    pub fn new_dir(name: CompactString, parent: Option<NodeIndex>) -> Self {
        Self {
            name,
            size: 0,
            is_dir: true,
            parent,
            first_child: None,
            next_sibling: None,
            descendant_count: 0,
            modified: None,
            category: None,
            is_error: false,
        }
    }

    /// Create a placeholder for an entry that could not be read.
    pub fn new_error(name: CompactString, is_dir: bool, parent: Option<NodeIndex>) -> Self {
        let mut node = if is_dir {
            Self::new_dir(name, parent)
        } else {
            Self::new_file(name, 0, parent)
        };
        node.is_error = true;
        node
    }

    /// Icon glyph for this node: the folder glyph for directories,
    /// otherwise the glyph of the file's category.
    pub fn icon(&self) -> &'static str {
        match self.category {
            Some(cat) if !self.is_dir => cat.icon(),
            _ => crate::category::FOLDER_ICON,
        }
    }

    /// Label shown in the "Type" column.
    pub fn kind_label(&self) -> &'static str {
        match self.category {
            Some(cat) if !self.is_dir => cat.label(),
            _ => crate::category::FOLDER_LABEL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_get_a_category_directories_do_not() {
        let file = FileNode::new_file(CompactString::new("song.MP3"), 10, None);
        assert_eq!(file.category, Some(FileCategory::Media));

        let dir = FileNode::new_dir(CompactString::new("music.mp3"), None);
        assert_eq!(dir.category, None);
        assert_eq!(dir.icon(), crate::category::FOLDER_ICON);
        assert_eq!(dir.kind_label(), "Folder");
    }

    #[test]
    fn error_nodes_keep_their_kind() {
        let dir = FileNode::new_error(CompactString::new("locked"), true, None);
        assert!(dir.is_error && dir.is_dir);

        let file = FileNode::new_error(CompactString::new("secret.pdf"), false, None);
        assert!(file.is_error && !file.is_dir);
        assert_eq!(file.category, Some(FileCategory::Documents));
    }
}
