/// Arena-backed file tree with O(n) bottom-up size aggregation.
///
/// All nodes live in a single `Vec<FileNode>`. Because the scanner always
/// inserts a directory before anything inside it, iterating the arena in
/// reverse visits every child before its parent.
use super::file_node::{FileNode, NodeIndex};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Component, Path, PathBuf};

/// How the children of a directory are ordered in the tree view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Case-insensitive name order, folders and files interleaved.
    #[default]
    Name,
    /// Folders first, then files, each group by name.
    FoldersFirst,
    /// Largest first, folders before files.
    Size,
}

impl SortOrder {
    pub const ALL: [SortOrder; 3] = [SortOrder::Name, SortOrder::FoldersFirst, SortOrder::Size];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::FoldersFirst => "Folders first",
            Self::Size => "Size",
        }
    }
}

/// The tree produced by one scan of one directory.
#[derive(Debug, Clone)]
pub struct FileTree {
    /// Arena: every node in a flat vector.
    pub nodes: Vec<FileNode>,

    /// The scanned directory's node (always index 0 once set).
    pub root: Option<NodeIndex>,

    /// Absolute path of the scanned directory.
    pub root_path: PathBuf,

    /// Total bytes below the root.
    pub total_size: u64,
}

impl FileTree {
    /// Create an empty tree for `root_path` with pre-allocated capacity.
    pub fn with_capacity(root_path: PathBuf, estimated_nodes: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(estimated_nodes),
            root: None,
            root_path,
            total_size: 0,
        }
    }

    /// Allocate a node in the arena and return its index.
    pub fn add_node(&mut self, node: FileNode) -> NodeIndex {
        let idx = NodeIndex::new(self.nodes.len());
        self.nodes.push(node);
        idx
    }

    /// Insert the root directory node, named after the last component of
    /// `root_path` (or the whole path for filesystem roots like `/`).
    pub fn add_root(&mut self) -> NodeIndex {
        let name = root_display_name(&self.root_path);
        let idx = self.add_node(FileNode::new_dir(CompactString::new(name), None));
        self.root = Some(idx);
        idx
    }

    /// Attach `child` under `parent`, prepending to the sibling list. O(1).
    pub fn add_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        let old_first = self.nodes[parent.idx()].first_child;
        self.nodes[child.idx()].next_sibling = old_first;
        self.nodes[child.idx()].parent = Some(parent);
        self.nodes[parent.idx()].first_child = Some(child);
    }

    /// Compute directory sizes and file counts in a single reverse pass.
    ///
    /// Directory fields are reset first, so repeated calls (live updates
    /// during a scan) never double count.
    pub fn aggregate_sizes(&mut self) {
        for node in self.nodes.iter_mut().filter(|n| n.is_dir) {
            node.size = 0;
            node.descendant_count = 0;
        }

        for i in (0..self.nodes.len()).rev() {
            let node = &self.nodes[i];
            let Some(parent) = node.parent else {
                continue;
            };
            let (size, files) = if node.is_dir {
                (node.size, node.descendant_count)
            } else {
                (node.size, 1)
            };
            let p = &mut self.nodes[parent.idx()];
            p.size += size;
            p.descendant_count += files;
        }

        self.total_size = self.root.map_or(0, |r| self.nodes[r.idx()].size);
    }

    /// Rebuild the absolute path of a node.
    pub fn full_path(&self, index: NodeIndex) -> PathBuf {
        let mut segments = Vec::new();
        let mut current = Some(index);
        while let Some(idx) = current {
            let node = &self.nodes[idx.idx()];
            if node.parent.is_none() {
                break;
            }
            segments.push(node.name.as_str());
            current = node.parent;
        }

        let mut path = self.root_path.clone();
        for segment in segments.iter().rev() {
            path.push(segment);
        }
        path
    }

    /// Locate the node for an absolute path inside this tree.
    pub fn find_by_path(&self, path: &Path) -> Option<NodeIndex> {
        let relative = path.strip_prefix(&self.root_path).ok()?;
        let mut current = self.root?;
        for component in relative.components() {
            let Component::Normal(name) = component else {
                continue;
            };
            let name = name.to_string_lossy();
            current = self
                .children(current)
                .into_iter()
                .find(|&c| self.nodes[c.idx()].name == name.as_ref())?;
        }
        Some(current)
    }

    /// Direct children of a node, in arena link order (unsorted).
    pub fn children(&self, parent: NodeIndex) -> Vec<NodeIndex> {
        let mut children = Vec::new();
        let mut child = self.nodes[parent.idx()].first_child;
        while let Some(idx) = child {
            children.push(idx);
            child = self.nodes[idx.idx()].next_sibling;
        }
        children
    }

    /// Direct children of a node in display order.
    pub fn children_sorted(&self, parent: NodeIndex, order: SortOrder) -> Vec<NodeIndex> {
        let mut children = self.children(parent);
        children.sort_by(|&a, &b| {
            let a = &self.nodes[a.idx()];
            let b = &self.nodes[b.idx()];
            match order {
                SortOrder::Name => compare_names(a, b),
                SortOrder::FoldersFirst => {
                    b.is_dir.cmp(&a.is_dir).then_with(|| compare_names(a, b))
                }
                SortOrder::Size => b
                    .is_dir
                    .cmp(&a.is_dir)
                    .then(b.size.cmp(&a.size))
                    .then_with(|| compare_names(a, b)),
            }
        });
        children
    }

    /// Get the node at the given index.
    #[inline]
    pub fn node(&self, index: NodeIndex) -> &FileNode {
        &self.nodes[index.idx()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of file (non-directory) nodes.
    pub fn file_count(&self) -> u64 {
        self.nodes.iter().filter(|n| !n.is_dir).count() as u64
    }
}

/// Case-insensitive name comparison with a case-sensitive tiebreak so the
/// order is total.
fn compare_names(a: &FileNode, b: &FileNode) -> Ordering {
    let la = a.name.to_lowercase();
    let lb = b.name.to_lowercase();
    la.cmp(&lb).then_with(|| a.name.cmp(&b.name))
}

/// Display name for a scan root.
fn root_display_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.to_string_lossy().into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root -> docs -> (a.txt: 100, b.md: 200), root -> c.png: 50
    fn sample_tree() -> (FileTree, [NodeIndex; 5]) {
        let mut tree = FileTree::with_capacity(PathBuf::from("/home/user/stuff"), 8);
        let root = tree.add_root();
        let docs = tree.add_node(FileNode::new_dir(CompactString::new("docs"), Some(root)));
        tree.add_child(root, docs);
        let a = tree.add_node(FileNode::new_file(CompactString::new("a.txt"), 100, Some(docs)));
        tree.add_child(docs, a);
        let b = tree.add_node(FileNode::new_file(CompactString::new("B.md"), 200, Some(docs)));
        tree.add_child(docs, b);
        let c = tree.add_node(FileNode::new_file(CompactString::new("c.png"), 50, Some(root)));
        tree.add_child(root, c);
        (tree, [root, docs, a, b, c])
    }

    #[test]
    fn aggregation_sums_sizes_and_counts() {
        let (mut tree, [root, docs, ..]) = sample_tree();
        tree.aggregate_sizes();

        assert_eq!(tree.node(docs).size, 300);
        assert_eq!(tree.node(docs).descendant_count, 2);
        assert_eq!(tree.node(root).size, 350);
        assert_eq!(tree.node(root).descendant_count, 3);
        assert_eq!(tree.total_size, 350);

        // Running it again must not double count.
        tree.aggregate_sizes();
        assert_eq!(tree.total_size, 350);
    }

    #[test]
    fn root_is_named_after_last_component() {
        let (tree, [root, ..]) = sample_tree();
        assert_eq!(tree.node(root).name, "stuff");
    }

    #[test]
    fn full_path_joins_from_root_path() {
        let (tree, [root, docs, a, ..]) = sample_tree();
        assert_eq!(tree.full_path(root), PathBuf::from("/home/user/stuff"));
        assert_eq!(tree.full_path(docs), PathBuf::from("/home/user/stuff/docs"));
        assert_eq!(tree.full_path(a), PathBuf::from("/home/user/stuff/docs/a.txt"));
    }

    #[test]
    fn find_by_path_walks_components() {
        let (tree, [root, _, a, ..]) = sample_tree();
        assert_eq!(tree.find_by_path(Path::new("/home/user/stuff")), Some(root));
        assert_eq!(
            tree.find_by_path(Path::new("/home/user/stuff/docs/a.txt")),
            Some(a)
        );
        assert_eq!(tree.find_by_path(Path::new("/home/user/stuff/nope")), None);
        assert_eq!(tree.find_by_path(Path::new("/elsewhere")), None);
    }

    #[test]
    fn name_order_is_case_insensitive_and_interleaved() {
        let (tree, [root, docs, _, _, c]) = sample_tree();
        assert_eq!(tree.children_sorted(root, SortOrder::Name), vec![c, docs]);
        let (tree, [_, docs, a, b, _]) = sample_tree();
        assert_eq!(tree.children_sorted(docs, SortOrder::Name), vec![a, b]);
    }

    #[test]
    fn folders_first_and_size_orders() {
        let (mut tree, [root, docs, a, b, c]) = sample_tree();
        assert_eq!(
            tree.children_sorted(root, SortOrder::FoldersFirst),
            vec![docs, c]
        );
        tree.aggregate_sizes();
        assert_eq!(tree.children_sorted(root, SortOrder::Size), vec![docs, c]);
        assert_eq!(tree.children_sorted(docs, SortOrder::Size), vec![b, a]);
    }
}
