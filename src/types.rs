use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Text written in place of a file's content when it could not be read.
pub const ERROR_MARKER_PREFIX: &str = "Error reading file:";

/// The content of one scanned file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum Content {
    /// The file's text, verbatim.
    Text(String),
    /// An error marker such as `Error reading file: permission denied`.
    Unreadable(String),
}
impl Content {
    pub fn unreadable(reason: impl fmt::Display) -> Self {
        Content::Unreadable(format!("{} {}", ERROR_MARKER_PREFIX, reason))
    }
    pub fn as_str(&self) -> &str {
        match self {
            Content::Text(text) | Content::Unreadable(text) => text,
        }
    }
    pub fn is_readable(&self) -> bool {
        matches!(self, Content::Text(_))
    }
    /// Whitespace-delimited tokens; always zero for an error marker.
    pub fn word_count(&self) -> usize {
        match self {
            Content::Text(text) => text.split_whitespace().count(),
            Content::Unreadable(_) => 0,
        }
    }
}

/// One included file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// The scan root this file was found under.
    pub root: PathBuf,
    /// Path relative to `root`; the base name when the root is the file itself.
    pub relative_path: PathBuf,
    /// The full path to the file.
    pub path: PathBuf,
    pub content: Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootKind {
    File,
    Directory,
}

/// Per-root information kept alongside the records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootSummary {
    pub path: PathBuf,
    pub kind: RootKind,
    /// Rendered directory tree; `None` for file roots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<String>,
}
impl RootSummary {
    /// The root's base name, or the whole path for `/`.
    pub fn name(&self) -> String {
        display_name(&self.path)
    }
}

/// The complete result of a scan: every root in input order and every
/// included file in discovery order.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub roots: Vec<RootSummary>,
    pub records: Vec<Record>,
}
impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
    pub fn records_for<'a>(&'a self, root: &'a Path) -> impl Iterator<Item = &'a Record> + 'a {
        self.records.iter().filter(move |r| r.root == root)
    }
    pub fn root_words(&self, root: &Path) -> usize {
        self.records_for(root).map(|r| r.content.word_count()).sum()
    }
    pub fn total_words(&self) -> usize {
        self.records.iter().map(|r| r.content.word_count()).sum()
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_count_ignores_error_markers() {
        assert_eq!(Content::Text("hello  world\n\tagain".into()).word_count(), 3);
        assert_eq!(Content::Text(String::new()).word_count(), 0);
        let marker = Content::unreadable("permission denied");
        assert_eq!(marker.as_str(), "Error reading file: permission denied");
        assert_eq!(marker.word_count(), 0);
    }
}
