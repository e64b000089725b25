/// File-type categories and the static extension table behind them.
///
/// Every file maps to exactly one category; anything not in the table,
/// including names without an extension, falls back to [`FileCategory::Other`].
use crate::model::FileTree;

/// Glyph used for directories.
pub const FOLDER_ICON: &str = "\u{1f4c1}";
/// Label used for directories.
pub const FOLDER_LABEL: &str = "Folder";

/// Broad file-type groups used for icons, colours and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileCategory {
    Media,
    Images,
    Documents,
    Archives,
    Other,
}

impl FileCategory {
    /// All categories, in display order.
    pub const ALL: [FileCategory; 5] = [
        FileCategory::Media,
        FileCategory::Images,
        FileCategory::Documents,
        FileCategory::Archives,
        FileCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Media => "Media",
            Self::Images => "Images",
            Self::Documents => "Documents",
            Self::Archives => "Archives",
            Self::Other => "Other",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Media => "\u{1f3ac}",
            Self::Images => "\u{1f5bc}",
            Self::Documents => "\u{1f4c4}",
            Self::Archives => "\u{1f5c3}",
            Self::Other => "\u{1f4e6}",
        }
    }

    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Map an extension (without the dot) to its category. Case-insensitive.
///
/// Extensions are lowercased into a stack buffer; anything longer than the
/// longest known extension cannot match and goes straight to `Other`.
pub fn categorise_extension(ext: &str) -> FileCategory {
    let bytes = ext.as_bytes();
    if bytes.is_empty() || bytes.len() > 8 {
        return FileCategory::Other;
    }
    let mut lower = [0u8; 8];
    for (dest, &src) in lower.iter_mut().zip(bytes) {
        *dest = src.to_ascii_lowercase();
    }
    match &lower[..bytes.len()] {
        b"mp3" | b"wav" | b"mp4" | b"avi" | b"mkv" | b"flac" => FileCategory::Media,
        b"jpg" | b"jpeg" | b"png" | b"gif" | b"bmp" => FileCategory::Images,
        b"pdf" | b"doc" | b"docx" | b"xls" | b"xlsx" | b"ppt" | b"pptx" | b"txt" | b"md" => {
            FileCategory::Documents
        }
        b"zip" | b"rar" | b"tar" | b"gz" | b"7z" => FileCategory::Archives,
        _ => FileCategory::Other,
    }
}

/// Extract the extension from a file name.
///
/// The extension is whatever follows the last dot, but leading dots do not
/// count: `.bashrc` and `..` have no extension, `archive.tar.gz` has `gz`.
pub fn extension_of(name: &str) -> Option<&str> {
    let stem_start = name.len() - name.trim_start_matches('.').len();
    let rest = &name[stem_start..];
    let dot = rest.rfind('.')?;
    Some(&rest[dot + 1..])
}

/// Categorise a file by name.
pub fn categorise_name(name: &str) -> FileCategory {
    extension_of(name).map_or(FileCategory::Other, categorise_extension)
}

/// A set of categories, stored as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySet(u8);

impl CategorySet {
    pub fn all() -> Self {
        Self(FileCategory::ALL.iter().fold(0, |acc, c| acc | c.bit()))
    }

    pub fn none() -> Self {
        Self(0)
    }

    pub fn contains(self, cat: FileCategory) -> bool {
        self.0 & cat.bit() != 0
    }

    pub fn insert(&mut self, cat: FileCategory) {
        self.0 |= cat.bit();
    }

    pub fn remove(&mut self, cat: FileCategory) {
        self.0 &= !cat.bit();
    }

    /// Flip membership of `cat`.
    pub fn toggle(&mut self, cat: FileCategory) {
        self.0 ^= cat.bit();
    }

    pub fn is_all(self) -> bool {
        self == Self::all()
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::all()
    }
}

/// File count and byte total for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStats {
    pub category: FileCategory,
    pub total_size: u64,
    pub file_count: u64,
}

/// Per-category totals across the whole tree, largest first.
///
/// Categories with no files are left out.
pub fn analyse_categories(tree: &FileTree) -> Vec<CategoryStats> {
    let mut stats: Vec<CategoryStats> = FileCategory::ALL
        .iter()
        .map(|&category| CategoryStats {
            category,
            total_size: 0,
            file_count: 0,
        })
        .collect();

    for node in tree.nodes.iter().filter(|n| !n.is_dir) {
        if let Some(cat) = node.category {
            let entry = &mut stats[cat as usize];
            entry.total_size += node.size;
            entry.file_count += 1;
        }
    }

    stats.retain(|s| s.file_count > 0);
    stats.sort_by(|a, b| {
        b.total_size
            .cmp(&a.total_size)
            .then(a.category.cmp(&b.category))
    });
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FileNode;
    use compact_str::CompactString;
    use std::path::PathBuf;

    #[test]
    fn table_covers_every_listed_extension() {
        let cases: &[(&[&str], FileCategory)] = &[
            (&["mp3", "wav", "mp4", "avi", "mkv", "flac"], FileCategory::Media),
            (&["jpg", "jpeg", "png", "gif", "bmp"], FileCategory::Images),
            (
                &["pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt", "md"],
                FileCategory::Documents,
            ),
            (&["zip", "rar", "tar", "gz", "7z"], FileCategory::Archives),
        ];
        for (exts, expected) in cases {
            for ext in *exts {
                assert_eq!(categorise_extension(ext), *expected, "extension .{ext}");
            }
        }
    }

    #[test]
    fn unknown_and_empty_extensions_fall_back_to_other() {
        assert_eq!(categorise_extension("rs"), FileCategory::Other);
        assert_eq!(categorise_extension(""), FileCategory::Other);
        assert_eq!(categorise_extension("averyverylongextension"), FileCategory::Other);
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(categorise_extension("JPG"), FileCategory::Images);
        assert_eq!(categorise_extension("Mp3"), FileCategory::Media);
        assert_eq!(categorise_name("REPORT.PDF"), FileCategory::Documents);
    }

    #[test]
    fn extension_rules_for_names() {
        assert_eq!(extension_of("photo.png"), Some("png"));
        assert_eq!(extension_of("archive.tar.gz"), Some("gz"));
        assert_eq!(extension_of(".bashrc"), None);
        assert_eq!(extension_of(".config.md"), Some("md"));
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of("trailing."), Some(""));

        assert_eq!(categorise_name("archive.tar.gz"), FileCategory::Archives);
        assert_eq!(categorise_name(".bashrc"), FileCategory::Other);
        assert_eq!(categorise_name("Makefile"), FileCategory::Other);
    }

    #[test]
    fn category_set_operations() {
        let mut set = CategorySet::all();
        assert!(set.is_all());
        set.remove(FileCategory::Images);
        assert!(!set.contains(FileCategory::Images));
        assert!(set.contains(FileCategory::Media));
        set.toggle(FileCategory::Images);
        assert!(set.is_all());

        let mut empty = CategorySet::none();
        empty.insert(FileCategory::Other);
        assert!(empty.contains(FileCategory::Other));
        assert!(!empty.contains(FileCategory::Archives));
    }

    #[test]
    fn analysis_groups_and_sorts_by_size() {
        let mut tree = FileTree::with_capacity(PathBuf::from("/tmp/x"), 8);
        let root = tree.add_root();
        for (name, size) in [("a.zip", 1_000), ("b.txt", 10), ("c.md", 20), ("d", 5)] {
            let idx = tree.add_node(FileNode::new_file(CompactString::new(name), size, Some(root)));
            tree.add_child(root, idx);
        }
        let sub = tree.add_node(FileNode::new_dir(CompactString::new("sub"), Some(root)));
        tree.add_child(root, sub);
        tree.aggregate_sizes();

        let stats = analyse_categories(&tree);
        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].category, FileCategory::Archives);
        assert_eq!(stats[1].category, FileCategory::Documents);
        assert_eq!(stats[1].file_count, 2);
        assert_eq!(stats[1].total_size, 30);
        assert_eq!(stats[2].category, FileCategory::Other);
    }

    #[test]
    fn analysis_of_empty_tree_is_empty() {
        let tree = FileTree::with_capacity(PathBuf::from("/tmp/x"), 0);
        assert!(analyse_categories(&tree).is_empty());
    }
}
