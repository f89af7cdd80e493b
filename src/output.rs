//! Document assembly for scan results.
//!
//! Renders a [`Snapshot`] as plain text, Markdown or JSON, writes it to disk,
//! and parses plain or Markdown documents back into `(path, content)` pairs.
//!
//! The plain encoding wraps each file as
//!
//! ```text
//! '''--- /abs/path/to/file ---
//! <content>
//! '''
//! ```
//!
//! Content that itself contains a line `'''` cannot be recovered exactly;
//! nothing is escaped.

use crate::engine;
use crate::error::ScanError;
use crate::observer::ScanObserver;
use crate::options::ScanSpec;
use crate::types::{RootKind, Snapshot};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const OPEN_MARKER: &str = "'''--- ";
const OPEN_MARKER_END: &str = " ---\n";
const CLOSE_MARKER: &str = "\n'''\n";
const CONTENTS_HEADING: &str = "## File Contents\n\n";

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Markdown,
    Json,
}

impl OutputFormat {
    /// Returns the conventional file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        }
    }
}

/// How much of the snapshot goes into the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DocumentMode {
    /// Summaries, trees and every file's content.
    #[default]
    Full,
    /// Summaries and trees only.
    Summary,
}

/// Result of [`export`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Export {
    Written {
        path: PathBuf,
        files: usize,
        words: usize,
    },
    /// Nothing matched; no file was written.
    Empty,
}

/// Formats the snapshot into a document.
pub fn assemble(
    snapshot: &Snapshot,
    format: OutputFormat,
    mode: DocumentMode,
) -> Result<String, ScanError> {
    Ok(match format {
        OutputFormat::Text => format_text(snapshot, mode),
        OutputFormat::Markdown => format_markdown(snapshot, mode),
        OutputFormat::Json => format_json(snapshot, mode)?,
    })
}

/// Replaces the extension of `requested` with the one matching `format`.
pub fn output_path(requested: &Path, format: OutputFormat) -> PathBuf {
    let ext = format.extension();
    if requested.extension().is_some_and(|e| e == ext) {
        requested.to_path_buf()
    } else {
        requested.with_extension(ext)
    }
}

/// Writes `document` to `path` through a temporary file in the same
/// directory, so a failed write never leaves a truncated document behind.
///
/// A new file gets the usual `0o666 & !umask` mode; a replaced file keeps its
/// permissions.
pub fn write_document(path: &Path, document: &str) -> Result<(), ScanError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(dir).map_err(|e| ScanError::io(dir, e))?;
    if let Ok(existing) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| ScanError::io(tmp.path(), e))?;
    }
    tmp.write_all(document.as_bytes())
        .map_err(|e| ScanError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| ScanError::io(path, e.error))?;
    Ok(())
}

/// Scans, assembles and writes in one go.
///
/// Returns [`Export::Empty`] without touching the filesystem when no file
/// survived filtering.
pub fn export(
    spec: &ScanSpec,
    requested: &Path,
    observer: Arc<dyn ScanObserver>,
) -> Result<Export, ScanError> {
    let snapshot = engine::walk(spec, observer)?;
    if snapshot.is_empty() {
        return Ok(Export::Empty);
    }
    let document = assemble(&snapshot, spec.output_format, spec.mode)?;
    let path = output_path(requested, spec.output_format);
    write_document(&path, &document)?;
    Ok(Export::Written {
        path,
        files: snapshot.records.len(),
        words: snapshot.total_words(),
    })
}

// ----------------------- Internal formatting -----------------------

fn format_text(snapshot: &Snapshot, mode: DocumentMode) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str("The below represents the folders and files from the root paths:");
    for root in &snapshot.roots {
        let _ = write!(out, "\n- {}", root.path.display());
    }
    out.push_str("\n\n");
    out.push_str(
        "Each file is separated by '''--- followed by the file path and ending with ---.\n\
         File content begins immediately after its path and extends until the next '''---\n\n",
    );

    for root in &snapshot.roots {
        let words = snapshot.root_words(&root.path);
        match (root.kind, &root.tree) {
            (RootKind::Directory, Some(tree)) => {
                let _ = write!(
                    out,
                    "\n*Directory: {}*\nTotal words: {}\n\nFile structure:\n\n{}\n\n",
                    root.name(),
                    words,
                    tree
                );
            }
            _ if snapshot.records_for(&root.path).next().is_some() => {
                let _ = write!(out, "\n*File: {}*\nWords: {}\n\n", root.name(), words);
            }
            _ => {}
        }
    }

    if mode == DocumentMode::Full {
        for record in &snapshot.records {
            let _ = writeln!(
                out,
                "{}{}{}{}{}",
                OPEN_MARKER,
                record.path.display(),
                OPEN_MARKER_END,
                record.content.as_str(),
                CLOSE_MARKER
            );
        }
    }
    out
}

fn format_markdown(snapshot: &Snapshot, mode: DocumentMode) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str("# Directory Scan Results\n\n");
    out.push_str("This document contains the folders and files from the following paths:\n\n");
    for root in &snapshot.roots {
        let _ = writeln!(out, "- `{}`", root.path.display());
    }
    out.push('\n');

    for root in &snapshot.roots {
        let words = snapshot.root_words(&root.path);
        match (root.kind, &root.tree) {
            (RootKind::Directory, Some(tree)) => {
                let fence = fence_for(tree);
                let _ = write!(
                    out,
                    "## Directory: {}\n\n**Total words:** {}\n\n### File structure\n\n{}\n{}\n{}\n\n",
                    root.name(),
                    words,
                    fence,
                    tree,
                    fence
                );
            }
            _ if snapshot.records_for(&root.path).next().is_some() => {
                let _ = write!(out, "## File: {}\n\n**Words:** {}\n\n", root.name(), words);
            }
            _ => {}
        }
    }

    if mode == DocumentMode::Full {
        out.push_str(CONTENTS_HEADING);
        for record in &snapshot.records {
            let content = record.content.as_str();
            let fence = fence_for(content);
            let ext = record
                .path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("");
            let _ = write!(
                out,
                "### {}\n\n{}{}\n{}\n{}\n\n",
                record.path.display(),
                fence,
                language_from_extension(ext),
                content,
                fence
            );
        }
    }
    out
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    roots: Vec<JsonRoot<'a>>,
    total_words: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    files: Vec<JsonFile<'a>>,
}

#[derive(Serialize)]
struct JsonRoot<'a> {
    path: &'a Path,
    kind: RootKind,
    words: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    tree: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonFile<'a> {
    root: &'a Path,
    relative_path: &'a Path,
    path: &'a Path,
    words: usize,
    #[serde(flatten)]
    content: &'a crate::types::Content,
}

fn format_json(snapshot: &Snapshot, mode: DocumentMode) -> Result<String, ScanError> {
    let roots = snapshot
        .roots
        .iter()
        .map(|root| JsonRoot {
            path: &root.path,
            kind: root.kind,
            words: snapshot.root_words(&root.path),
            tree: root.tree.as_deref(),
        })
        .collect();
    let files = match mode {
        DocumentMode::Full => snapshot
            .records
            .iter()
            .map(|record| JsonFile {
                root: &record.root,
                relative_path: &record.relative_path,
                path: &record.path,
                words: record.content.word_count(),
                content: &record.content,
            })
            .collect(),
        DocumentMode::Summary => Vec::new(),
    };
    let document = JsonDocument {
        roots,
        total_words: snapshot.total_words(),
        files,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// A backtick fence longer than any backtick run inside `text`.
fn fence_for(text: &str) -> String {
    let longest = text
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}

fn language_from_extension(ext: &str) -> &'static str {
    match ext {
        "rs" => "rust", "toml" => "toml", "json" => "json", "md" | "markdown" => "markdown",
        "txt" => "text", "html" | "htm" => "html", "css" => "css", "js" | "mjs" | "cjs" => "javascript",
        "ts" | "tsx" => "typescript", "py" => "python", "sh" | "bash" => "bash",
        "yml" | "yaml" => "yaml", "xml" => "xml", "sql" => "sql", "nix" => "nix",
        "c" => "c", "cpp" | "cc" | "cxx" => "cpp", "h" => "c", "hpp" => "cpp",
        "go" => "go", "rb" => "ruby", "php" => "php", "swift" => "swift",
        "kt" | "kts" => "kotlin", "scala" => "scala", "dart" => "dart",
        _ => "",
    }
}

// ----------------------- Re-extraction -----------------------

/// Recovers `(path, content)` pairs from a plain-text document, in order.
pub fn extract_text(document: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut cursor = 0;
    while let Some(start) = find_line_start(document, OPEN_MARKER, cursor) {
        let path_start = start + OPEN_MARKER.len();
        let Some(path_len) = document[path_start..].find(OPEN_MARKER_END) else {
            break;
        };
        let content_start = path_start + path_len + OPEN_MARKER_END.len();
        let Some(content_len) = document[content_start..].find(CLOSE_MARKER) else {
            break;
        };
        let content_end = content_start + content_len;
        pairs.push((
            document[path_start..path_start + path_len].to_string(),
            document[content_start..content_end].to_string(),
        ));
        cursor = content_end + CLOSE_MARKER.len();
    }
    pairs
}

/// Recovers `(path, content)` pairs from a Markdown document, in order.
pub fn extract_markdown(document: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let Some(body) = document.find(CONTENTS_HEADING) else {
        return pairs;
    };
    let mut rest = &document[body + CONTENTS_HEADING.len()..];
    while let Some(heading) = rest.strip_prefix("### ") {
        let Some((path, after)) = heading.split_once("\n\n") else {
            break;
        };
        let Some((fence_line, after)) = after.split_once('\n') else {
            break;
        };
        let fence: String = fence_line.chars().take_while(|c| *c == '`').collect();
        let closing = format!("\n{}\n", fence);
        let Some(end) = after.find(&closing) else {
            break;
        };
        let (content, after) = (&after[..end], &after[end + closing.len()..]);
        pairs.push((path.to_string(), content.to_string()));
        rest = after.strip_prefix('\n').unwrap_or(after);
    }
    pairs
}

fn find_line_start(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let mut pos = from;
    while let Some(offset) = haystack[pos..].find(needle) {
        let at = pos + offset;
        if at == 0 || haystack.as_bytes()[at - 1] == b'\n' {
            return Some(at);
        }
        pos = at + needle.len();
    }
    None
}
