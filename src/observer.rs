//! Progress and error reporting for a scan.
//!
//! The engine never logs directly; it reports to a [`ScanObserver`]. The
//! binary uses [`TracingObserver`], tests usually pass [`NoopObserver`].

use crate::policy::Exclusion;
use crate::types::RootKind;
use std::path::Path;

pub trait ScanObserver: Send + Sync {
    fn path_missing(&self, _path: &Path) {}
    fn root_started(&self, _root: &Path, _kind: RootKind, _depth_bound: Option<usize>) {}
    fn root_skipped(&self, _root: &Path, _reason: &str) {}
    fn excluded(&self, _path: &Path, _reason: &Exclusion) {}
    fn depth_pruned(&self, _path: &Path, _depth: usize, _bound: usize) {}
    fn walk_failed(&self, _error: &str) {}
    fn file_read(&self, _path: &Path) {}
    fn read_failed(&self, _path: &Path, _marker: &str) {}
    fn finished(&self, _files: usize, _words: usize) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;
impl ScanObserver for NoopObserver {}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;
impl ScanObserver for TracingObserver {
    fn path_missing(&self, path: &Path) {
        tracing::warn!("Path does not exist: {}", path.display());
    }
    fn root_started(&self, root: &Path, kind: RootKind, depth_bound: Option<usize>) {
        match (kind, depth_bound) {
            (RootKind::File, _) => tracing::info!("Processing single file: {}", root.display()),
            (RootKind::Directory, None) => {
                tracing::info!("Scanning directory: {}", root.display())
            }
            (RootKind::Directory, Some(bound)) => tracing::info!(
                "Scanning directory: {} (depth limit {})",
                root.display(),
                bound
            ),
        }
    }
    fn root_skipped(&self, root: &Path, reason: &str) {
        tracing::warn!("Skipping {}: {}", root.display(), reason);
    }
    fn excluded(&self, path: &Path, reason: &Exclusion) {
        tracing::debug!("Excluding {} ({})", path.display(), reason);
    }
    fn depth_pruned(&self, path: &Path, depth: usize, bound: usize) {
        tracing::debug!(
            "Skipping {} - depth {} exceeds limit of {}",
            path.display(),
            depth,
            bound
        );
    }
    fn walk_failed(&self, error: &str) {
        tracing::warn!("Walk error: {}", error);
    }
    fn file_read(&self, path: &Path) {
        tracing::debug!("Reading: {}", path.display());
    }
    fn read_failed(&self, path: &Path, marker: &str) {
        tracing::error!("{} ({})", marker, path.display());
    }
    fn finished(&self, files: usize, words: usize) {
        tracing::info!("Total files collected: {} ({} words)", files, words);
    }
}
