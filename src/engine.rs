use crate::error::ScanError;
use crate::observer::{ScanObserver, TracingObserver};
use crate::options::{BinaryDetection, ScanSpec};
use crate::policy::ExclusionPolicy;
use crate::tree::DirNode;
use crate::types::{Content, Record, RootKind, RootSummary, Snapshot, display_name};
use ignore::{DirEntry, WalkBuilder};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const BINARY_SNIFF_LEN: usize = 4096;

/// A file that passed every filter and is waiting to be read.
struct Pending {
    root: PathBuf,
    relative: PathBuf,
    path: PathBuf,
}

/// Scans every root of `spec`, logging progress through `tracing`.
pub fn scan(spec: &ScanSpec) -> Result<Snapshot, ScanError> {
    walk(spec, Arc::new(TracingObserver))
}

/// Scans every root of `spec` in input order, reporting to `observer`.
///
/// Only an invalid exclusion pattern fails the scan. Unreadable directories
/// and files are reported and skipped, or recorded with an error marker.
pub fn walk(spec: &ScanSpec, observer: Arc<dyn ScanObserver>) -> Result<Snapshot, ScanError> {
    let policy = Arc::new(ExclusionPolicy::new(spec)?);
    let mut roots = Vec::with_capacity(spec.roots.len());
    let mut pending = Vec::new();
    for root in &spec.roots {
        let metadata = match fs::metadata(root) {
            Ok(metadata) => metadata,
            Err(e) => {
                observer.root_skipped(root, &e.to_string());
                continue;
            }
        };
        if metadata.is_file() {
            observer.root_started(root, RootKind::File, None);
            let relative = PathBuf::from(display_name(root));
            match policy.check(&relative, Some(root.as_path()), false) {
                Some(reason) => observer.excluded(root, &reason),
                None => pending.push(Pending {
                    root: root.clone(),
                    relative,
                    path: root.clone(),
                }),
            }
            roots.push(RootSummary {
                path: root.clone(),
                kind: RootKind::File,
                tree: None,
            });
        } else if metadata.is_dir() {
            let bound = spec.depth_bound(root);
            observer.root_started(root, RootKind::Directory, bound);
            let node = walk_directory(root, bound, &policy, &observer);
            pending.extend(node.files_in_order().into_iter().map(|relative| Pending {
                root: root.clone(),
                path: root.join(&relative),
                relative,
            }));
            roots.push(RootSummary {
                path: root.clone(),
                kind: RootKind::Directory,
                tree: Some(node.render(&display_name(root))),
            });
        } else {
            observer.root_skipped(root, "not a file or directory");
        }
    }
    let records = read_pending(pending, spec, observer.as_ref());
    let snapshot = Snapshot { roots, records };
    observer.finished(snapshot.records.len(), snapshot.total_words());
    Ok(snapshot)
}

/// Walks one directory root and returns its filtered structure.
///
/// Entries are visited in file-name order. The `filter_entry` callback is the
/// prune signal: a directory rejected there is never entered.
fn walk_directory(
    root: &Path,
    bound: Option<usize>,
    policy: &Arc<ExclusionPolicy>,
    observer: &Arc<dyn ScanObserver>,
) -> DirNode {
    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b));
    if let Some(bound) = bound {
        builder.max_depth(Some(bound.saturating_add(1)));
    }
    let filter_root = root.to_path_buf();
    let filter_policy = Arc::clone(policy);
    let filter_observer = Arc::clone(observer);
    builder.filter_entry(move |entry| {
        keep_entry(
            entry,
            &filter_root,
            bound,
            &filter_policy,
            filter_observer.as_ref(),
        )
    });

    let mut node = DirNode::default();
    for result in builder.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                observer.walk_failed(&e.to_string());
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        match entry.file_type() {
            Some(file_type) if file_type.is_dir() => node.insert_dir(relative),
            _ if entry.path().is_file() => node.insert_file(relative),
            _ => {}
        }
    }
    node
}

/// Decides whether the walker yields `entry` (and, for directories, enters it).
///
/// The depth gate and the exclusion gate are evaluated independently for every
/// directory; either one prunes the subtree.
fn keep_entry(
    entry: &DirEntry,
    root: &Path,
    bound: Option<usize>,
    policy: &ExclusionPolicy,
    observer: &dyn ScanObserver,
) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
    let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
    let too_deep = bound.filter(|bound| is_dir && entry.depth() > *bound);
    if let Some(bound) = too_deep {
        observer.depth_pruned(entry.path(), entry.depth(), bound);
    }
    let excluded = policy.check(relative, Some(entry.path()), is_dir);
    if let Some(reason) = &excluded {
        observer.excluded(entry.path(), reason);
    }
    too_deep.is_none() && excluded.is_none()
}

#[cfg(not(feature = "parallel"))]
fn read_pending(
    pending: Vec<Pending>,
    spec: &ScanSpec,
    observer: &dyn ScanObserver,
) -> Vec<Record> {
    pending
        .into_iter()
        .map(|p| into_record(p, spec, observer))
        .collect()
}

#[cfg(feature = "parallel")]
fn read_pending(
    pending: Vec<Pending>,
    spec: &ScanSpec,
    observer: &dyn ScanObserver,
) -> Vec<Record> {
    // collect() on an indexed parallel iterator keeps the walk order
    pending
        .into_par_iter()
        .map(|p| into_record(p, spec, observer))
        .collect()
}

fn into_record(pending: Pending, spec: &ScanSpec, observer: &dyn ScanObserver) -> Record {
    observer.file_read(&pending.path);
    let content = read_file_content(&pending.path, spec.binary_detection, spec.file_size_limit);
    if let Content::Unreadable(marker) = &content {
        observer.read_failed(&pending.path, marker);
    }
    Record {
        root: pending.root,
        relative_path: pending.relative,
        path: pending.path,
        content,
    }
}

/// Reads a file as UTF-8 text. Any failure becomes an error marker.
pub(crate) fn read_file_content(
    path: &Path,
    binary_detection: BinaryDetection,
    size_limit: Option<u64>,
) -> Content {
    try_read(path, binary_detection, size_limit).unwrap_or_else(|e| Content::unreadable(e))
}

fn try_read(
    path: &Path,
    binary_detection: BinaryDetection,
    size_limit: Option<u64>,
) -> io::Result<Content> {
    if let Some(limit) = size_limit {
        let len = fs::metadata(path)?.len();
        if len > limit {
            return Ok(Content::unreadable(format!(
                "file too large ({} > {} bytes)",
                len, limit
            )));
        }
    }
    let bytes = fs::read(path)?;
    let head = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];
    let is_binary = match binary_detection {
        BinaryDetection::Simple => head.contains(&0),
        BinaryDetection::Accurate => content_inspector::inspect(head).is_binary(),
        BinaryDetection::None => false,
    };
    if is_binary {
        return Ok(Content::unreadable("binary file, content omitted"));
    }
    Ok(match String::from_utf8(bytes) {
        Ok(text) => Content::Text(text),
        Err(e) => Content::unreadable(e.utf8_error()),
    })
}
