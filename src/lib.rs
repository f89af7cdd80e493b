//! # Folderscan
//!
//! `folderscan` flattens one or more files and directory trees into a single
//! reviewable document: a per-root summary with word counts and an indented
//! directory tree, followed by the verbatim content of every included file.
//!
//! Four independent exclusion families decide what is visited (path prefixes,
//! substrings, directory names and file patterns), and any root may carry a
//! `root+N` suffix limiting how deep below it the scan goes.
//!
//! # Features
//!
//! - `parallel`: Reads file contents in parallel using Rayon. Output order is
//!   unchanged.
//!
//! # Example
//!
//! ```no_run
//! use folderscan::{NoopObserver, OutputFormat, ScanBuilder, assemble, classify, scan};
//!
//! let paths = classify(["./src/root+1", "./Cargo.toml"], &NoopObserver)
//!     .expect("no valid paths");
//! let spec = ScanBuilder::new()
//!     .classified(paths)
//!     .exclude_substring(".env")
//!     .output_format(OutputFormat::Markdown)
//!     .build();
//!
//! let snapshot = scan(&spec).expect("scan failed");
//! let document = assemble(&snapshot, spec.output_format, spec.mode).unwrap();
//! println!("{}", document);
//! ```

pub mod classify;
mod engine;
mod error;
mod observer;
mod options;
pub mod output;
mod policy;
mod tree;
mod types;

pub use classify::{Classified, PathSpec, classify, parse_depth_directive, parse_path_spec};
pub use engine::{scan, walk};
pub use error::ScanError;
pub use observer::{NoopObserver, ScanObserver, TracingObserver};
pub use options::{
    BinaryDetection, DEFAULT_EXCLUDED_DIRS, DEFAULT_EXCLUDED_FILES, ScanBuilder, ScanSpec,
};
pub use output::{
    DocumentMode, Export, OutputFormat, assemble, export, extract_markdown, extract_text,
    output_path, write_document,
};
pub use policy::{Exclusion, ExclusionPolicy};
pub use types::{Content, ERROR_MARKER_PREFIX, Record, RootKind, RootSummary, Snapshot};
