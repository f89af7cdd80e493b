use crate::classify::{Classified, normalize};
use crate::output::{DocumentMode, OutputFormat};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Build, VCS and cache directories skipped unless the defaults are cleared.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    "dist",
    ".turbo",
    ".vscode",
    ".next",
    "__test__",
    "__pycache__",
    ".venv",
    "test",
    "tests",
    ".git",
    "jspm_packages",
    ".npm",
    ".node_repl_history",
    ".idea",
    "coverage",
    "migrations",
    "migration",
    ".lock",
    ".semversioner",
    ".github",
];

/// Lock, log and build-artifact file names and globs skipped by default.
pub const DEFAULT_EXCLUDED_FILES: &[&str] = &[
    ".gitignore",
    ".DS_Store",
    "Thumbs.db",
    ".eslintcache",
    "*.log",
    "npm-debug.log*",
    "yarn-debug.log*",
    "yarn-error.log*",
    "*.test.js",
    "*.spec.js",
    ".env.development.local",
    ".env.test.local",
    ".env.production.local",
    "*.tsbuildinfo",
    "*.swp",
    "*.swo",
    "poetry.lock",
    ".pyc",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BinaryDetection {
    Simple,
    Accurate,
    #[default]
    None,
}

/// Everything a scan needs. Built once by [`ScanBuilder`] and not mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSpec {
    pub roots: Vec<PathBuf>,
    pub excluded_path_prefixes: BTreeSet<String>,
    pub excluded_substrings: BTreeSet<String>,
    pub excluded_dir_names: BTreeSet<String>,
    pub excluded_file_patterns: BTreeSet<String>,
    pub depth_bounds: BTreeMap<PathBuf, usize>,
    pub output_format: OutputFormat,
    pub mode: DocumentMode,
    pub binary_detection: BinaryDetection,
    pub file_size_limit: Option<u64>,
}
impl Default for ScanSpec {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            excluded_path_prefixes: BTreeSet::new(),
            excluded_substrings: BTreeSet::new(),
            excluded_dir_names: DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
            excluded_file_patterns: DEFAULT_EXCLUDED_FILES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            depth_bounds: BTreeMap::new(),
            output_format: OutputFormat::Text,
            mode: DocumentMode::Full,
            binary_detection: BinaryDetection::None,
            file_size_limit: None,
        }
    }
}
impl ScanSpec {
    pub fn depth_bound(&self, root: &Path) -> Option<usize> {
        self.depth_bounds.get(root).copied()
    }
}
#[derive(Debug)]
pub struct ScanBuilder {
    spec: ScanSpec,
    default_depth: Option<usize>,
    default_excludes: bool,
}
impl Default for ScanBuilder {
    fn default() -> Self {
        // built-in exclusions are merged in build()
        Self {
            spec: ScanSpec {
                excluded_dir_names: BTreeSet::new(),
                excluded_file_patterns: BTreeSet::new(),
                ..ScanSpec::default()
            },
            default_depth: None,
            default_excludes: true,
        }
    }
}
impl ScanBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    /// Adds a root. The path should already be absolute; see [`crate::classify`].
    /// A root added more than once is scanned once.
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.spec.roots.push(path.into());
        self
    }
    pub fn roots<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.spec.roots.extend(paths.into_iter().map(Into::into));
        self
    }
    pub fn depth_bound(mut self, root: impl Into<PathBuf>, depth: usize) -> Self {
        self.spec.depth_bounds.insert(root.into(), depth);
        self
    }
    /// Takes roots and depth bounds from classified path specs.
    pub fn classified(mut self, classified: Classified) -> Self {
        self.spec.roots.extend(classified.paths);
        self.spec.depth_bounds.extend(classified.depth_bounds);
        self
    }
    /// Depth bound applied at build time to every root without its own.
    pub fn default_depth(mut self, depth: Option<usize>) -> Self {
        self.default_depth = depth;
        self
    }
    pub fn exclude_path(mut self, path: impl AsRef<str>) -> Self {
        let normalized = normalize(Path::new(path.as_ref()));
        self.spec
            .excluded_path_prefixes
            .insert(normalized.to_string_lossy().into_owned());
        self
    }
    pub fn exclude_paths<I, S>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paths.into_iter().fold(self, |b, p| b.exclude_path(p))
    }
    pub fn exclude_substring(mut self, pattern: impl Into<String>) -> Self {
        self.spec.excluded_substrings.insert(pattern.into());
        self
    }
    pub fn exclude_substrings<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec
            .excluded_substrings
            .extend(patterns.into_iter().map(Into::into));
        self
    }
    pub fn exclude_dir_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec
            .excluded_dir_names
            .extend(names.into_iter().map(Into::into));
        self
    }
    pub fn exclude_file_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec
            .excluded_file_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }
    /// Drops the built-in directory and file exclusions, whenever it is called.
    /// Names added explicitly are kept. The `.test.`/`.spec.` file rule still
    /// applies.
    pub fn no_default_excludes(mut self) -> Self {
        self.default_excludes = false;
        self
    }
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.spec.output_format = format;
        self
    }
    pub fn mode(mut self, mode: DocumentMode) -> Self {
        self.spec.mode = mode;
        self
    }
    pub fn binary_detection(mut self, method: BinaryDetection) -> Self {
        self.spec.binary_detection = method;
        self
    }
    pub fn file_size_limit(mut self, limit: Option<u64>) -> Self {
        self.spec.file_size_limit = limit;
        self
    }
    pub fn build(self) -> ScanSpec {
        let mut spec = self.spec;
        if self.default_excludes {
            spec.excluded_dir_names
                .extend(DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()));
            spec.excluded_file_patterns
                .extend(DEFAULT_EXCLUDED_FILES.iter().map(|s| s.to_string()));
        }
        let mut seen = BTreeSet::new();
        spec.roots.retain(|root| seen.insert(root.clone()));
        if let Some(depth) = self.default_depth {
            for root in &spec.roots {
                spec.depth_bounds.entry(root.clone()).or_insert(depth);
            }
        }
        spec
    }
}
