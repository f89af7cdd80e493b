//! Internal module for holding the filtered directory structure of one root.

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

const INDENT: &str = "    ";

/// A directory that survived exclusion and depth pruning.
///
/// Children are kept in ordered collections so that rendering and record
/// order are lexicographic by name regardless of filesystem enumeration order.
#[derive(Debug, Default)]
pub(crate) struct DirNode {
    files: BTreeSet<OsString>,
    dirs: BTreeMap<OsString, DirNode>,
}

impl DirNode {
    /// Registers a directory at `relative`, creating parents as needed.
    pub(crate) fn insert_dir(&mut self, relative: &Path) {
        let mut node = self;
        for name in names(relative) {
            node = node.dirs.entry(name).or_default();
        }
    }

    /// Registers a file at `relative` under its (already created) parent.
    pub(crate) fn insert_file(&mut self, relative: &Path) {
        let mut parts = names(relative);
        let Some(file) = parts.pop() else {
            return;
        };
        let mut node = self;
        for name in parts {
            node = node.dirs.entry(name).or_default();
        }
        node.files.insert(file);
    }

    /// Relative file paths: each directory's files, then its subdirectories.
    pub(crate) fn files_in_order(&self) -> Vec<PathBuf> {
        let mut out = Vec::new();
        self.collect_files(PathBuf::new(), &mut out);
        out
    }

    fn collect_files(&self, prefix: PathBuf, out: &mut Vec<PathBuf>) {
        out.extend(self.files.iter().map(|f| prefix.join(f)));
        for (name, child) in &self.dirs {
            child.collect_files(prefix.join(name), out);
        }
    }

    /// Renders the tree with `root_name` on the first line.
    ///
    /// Each directory is a line suffixed with `/`, indented four spaces per
    /// depth level, followed by its files one level deeper.
    pub(crate) fn render(&self, root_name: &str) -> String {
        let mut lines = Vec::new();
        self.render_into(root_name, 0, &mut lines);
        lines.join("\n")
    }

    fn render_into(&self, name: &str, level: usize, lines: &mut Vec<String>) {
        lines.push(format!("{}{}/", INDENT.repeat(level), name));
        let file_indent = INDENT.repeat(level + 1);
        for file in &self.files {
            lines.push(format!("{}{}", file_indent, file.to_string_lossy()));
        }
        for (child_name, child) in &self.dirs {
            child.render_into(&child_name.to_string_lossy(), level + 1, lines);
        }
    }
}

fn names(relative: &Path) -> Vec<OsString> {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_os_string()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DirNode {
        let mut root = DirNode::default();
        root.insert_file(Path::new("b.txt"));
        root.insert_file(Path::new("a.txt"));
        root.insert_dir(Path::new("src"));
        root.insert_file(Path::new("src/main.rs"));
        root.insert_dir(Path::new("src/util"));
        root.insert_dir(Path::new("docs"));
        root
    }

    #[test]
    fn renders_indented_tree() {
        let expected = "\
proj/
    a.txt
    b.txt
    docs/
    src/
        main.rs
        util/";
        assert_eq!(sample().render("proj"), expected);
    }

    #[test]
    fn files_listed_before_subdirectories() {
        let files = sample().files_in_order();
        assert_eq!(
            files,
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("b.txt"),
                PathBuf::from("src/main.rs"),
            ]
        );
    }
}
