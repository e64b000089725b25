//! Interactive tree filtering.
//!
//! A filter never removes structure: every ancestor of a matching node stays
//! visible so the user can still see where a match lives.

use crate::category::{CategorySet, FileCategory};
use crate::model::{FileNode, FileTree, NodeIndex};
use rayon::prelude::*;

/// What the user typed in the search box plus the enabled categories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeFilter {
    pub query: String,
    pub categories: CategorySet,
}

/// Per-node visibility produced by [`TreeFilter::apply`].
#[derive(Debug, Clone)]
pub struct FilterResult {
    visible: Vec<bool>,
    /// Nodes that matched on their own (ancestors kept for context are
    /// not counted).
    pub match_count: usize,
}

impl FilterResult {
    #[inline]
    pub fn is_visible(&self, idx: NodeIndex) -> bool {
        self.visible.get(idx.idx()).copied().unwrap_or(false)
    }
}

impl TreeFilter {
    /// `false` when nothing would be hidden.
    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty() || !self.categories.is_all()
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.categories = CategorySet::all();
    }

    /// Whether a single node matches, ignoring its relatives.
    ///
    /// `needle` must already be trimmed and lowercased.
    fn matches(&self, node: &FileNode, needle: &str) -> bool {
        let name_hit = needle.is_empty() || node.name.to_lowercase().contains(needle);
        if node.is_dir {
            // Folders only match by name, and only when there is a query.
            !needle.is_empty() && name_hit
        } else {
            let cat = node.category.unwrap_or(FileCategory::Other);
            name_hit && self.categories.contains(cat)
        }
    }

    /// Compute which nodes of `tree` should be shown.
    ///
    /// Returns `None` when the filter is inactive, i.e. everything is
    /// visible and callers can skip the lookup entirely.
    pub fn apply(&self, tree: &FileTree) -> Option<FilterResult> {
        if !self.is_active() {
            return None;
        }
        let needle = self.query.trim().to_lowercase();

        let hits: Vec<bool> = tree
            .nodes
            .par_iter()
            .map(|node| self.matches(node, &needle))
            .collect();
        let match_count = hits.iter().filter(|&&hit| hit).count();

        // Propagate upward. Children always sit after their parent in the
        // arena, so one reverse pass reaches every ancestor.
        let mut visible = hits;
        for i in (0..tree.nodes.len()).rev() {
            if visible[i] {
                if let Some(parent) = tree.nodes[i].parent {
                    visible[parent.idx()] = true;
                }
            }
        }
        if let Some(root) = tree.root {
            visible[root.idx()] = true;
        }

        Some(FilterResult {
            visible,
            match_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compact_str::CompactString;
    use std::path::PathBuf;

    /// root/
    ///   photos/
    ///     beach.JPG
    ///     notes.txt
    ///   music/
    ///     song.mp3
    ///   readme.md
    fn tree() -> (FileTree, Vec<NodeIndex>) {
        fn add(tree: &mut FileTree, node: FileNode, parent: NodeIndex) -> NodeIndex {
            let idx = tree.add_node(node);
            tree.add_child(parent, idx);
            idx
        }
        let file = |name: &str, parent| {
            FileNode::new_file(CompactString::new(name), 5, Some(parent))
        };
        let dir = |name: &str, parent| FileNode::new_dir(CompactString::new(name), Some(parent));

        let mut tree = FileTree::with_capacity(PathBuf::from("/data"), 8);
        let root = tree.add_root();
        let photos = add(&mut tree, dir("photos", root), root);
        let beach = add(&mut tree, file("beach.JPG", photos), photos);
        let notes = add(&mut tree, file("notes.txt", photos), photos);
        let music = add(&mut tree, dir("music", root), root);
        let song = add(&mut tree, file("song.mp3", music), music);
        let readme = add(&mut tree, file("readme.md", root), root);
        (tree, vec![root, photos, beach, notes, music, song, readme])
    }

    #[test]
    fn inactive_filter_returns_none() {
        let (tree, _) = tree();
        assert!(TreeFilter::default().apply(&tree).is_none());
        let blank = TreeFilter {
            query: "   ".into(),
            ..Default::default()
        };
        assert!(blank.apply(&tree).is_none());
    }

    #[test]
    fn query_keeps_ancestors_and_hides_siblings() {
        let (tree, n) = tree();
        let (root, photos, beach, notes, music, song, readme) =
            (n[0], n[1], n[2], n[3], n[4], n[5], n[6]);
        let filter = TreeFilter {
            query: "BEACH".into(),
            ..Default::default()
        };
        let result = filter.apply(&tree).expect("active");

        assert_eq!(result.match_count, 1);
        assert!(result.is_visible(root));
        assert!(result.is_visible(photos));
        assert!(result.is_visible(beach));
        assert!(!result.is_visible(notes));
        assert!(!result.is_visible(music));
        assert!(!result.is_visible(song));
        assert!(!result.is_visible(readme));
    }

    #[test]
    fn folder_names_match_queries() {
        let (tree, n) = tree();
        let filter = TreeFilter {
            query: "mus".into(),
            ..Default::default()
        };
        let result = filter.apply(&tree).expect("active");
        assert!(result.is_visible(n[4]));
        assert!(!result.is_visible(n[5]), "children of a matching folder are not implied");
    }

    #[test]
    fn category_filter_alone() {
        let (tree, n) = tree();
        let mut categories = CategorySet::none();
        categories.insert(FileCategory::Documents);
        let filter = TreeFilter {
            query: String::new(),
            categories,
        };
        let result = filter.apply(&tree).expect("active");

        assert_eq!(result.match_count, 2, "notes.txt and readme.md");
        assert!(result.is_visible(n[3]));
        assert!(result.is_visible(n[6]));
        assert!(!result.is_visible(n[2]));
        assert!(!result.is_visible(n[4]), "music has no documents");
    }

    #[test]
    fn query_and_category_combine() {
        let (tree, n) = tree();
        let mut categories = CategorySet::all();
        categories.remove(FileCategory::Documents);
        let filter = TreeFilter {
            query: "o".into(),
            categories,
        };
        let result = filter.apply(&tree).expect("active");
        // Matches: the "photos" folder and song.mp3 (music stays as its parent).
        assert!(result.is_visible(n[1]));
        assert!(result.is_visible(n[5]));
        assert!(result.is_visible(n[4]));
        assert_eq!(result.match_count, 2);
        assert!(!result.is_visible(n[3]), "notes.txt is a document");
        assert!(!result.is_visible(n[6]), "readme.md is a document");
    }

    #[test]
    fn clear_resets_everything() {
        let mut filter = TreeFilter {
            query: "x".into(),
            categories: CategorySet::none(),
        };
        filter.clear();
        assert!(!filter.is_active());
    }
}
