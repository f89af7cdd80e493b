//! Path specification parsing.
//!
//! A scan root may carry a trailing `root+N` directive limiting how many
//! directory levels below it are scanned, e.g. `/project/src/root+0` scans only
//! the files directly inside `/project/src`.

use crate::error::ScanError;
use crate::observer::ScanObserver;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

const DEPTH_DIRECTIVE: &str = "root+";

/// A raw path with its depth directive split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
    pub path: PathBuf,
    pub depth: Option<usize>,
}

/// Parses a single raw path, stripping a well-formed `root+N` suffix.
///
/// A malformed directive (more than one `root+`, or a non-numeric depth) is not
/// an error: the whole input is taken as a literal path without a depth bound.
pub fn parse_path_spec(raw: &str) -> PathSpec {
    let literal = || PathSpec {
        path: PathBuf::from(raw),
        depth: None,
    };
    let parts: Vec<&str> = raw.split(DEPTH_DIRECTIVE).collect();
    let [base, depth] = parts.as_slice() else {
        return literal();
    };
    if depth.is_empty() || !depth.bytes().all(|b| b.is_ascii_digit()) {
        return literal();
    }
    let Ok(depth) = depth.parse::<usize>() else {
        return literal();
    };
    let trimmed = base.trim_end_matches(['/', std::path::MAIN_SEPARATOR]);
    let path = match (trimmed.is_empty(), base.is_empty()) {
        (true, true) => PathBuf::from("."),
        (true, false) => PathBuf::from(std::path::MAIN_SEPARATOR_STR),
        _ => PathBuf::from(trimmed),
    };
    PathSpec {
        path,
        depth: Some(depth),
    }
}

/// Parses a bare `root+N` directive, as accepted by the global `--depth` flag.
pub fn parse_depth_directive(raw: &str) -> Result<usize, ScanError> {
    raw.strip_prefix(DEPTH_DIRECTIVE)
        .filter(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| ScanError::InvalidDepth(raw.to_string()))
}

/// The outcome of classifying a list of raw path specifications.
#[derive(Debug, Default, Clone)]
pub struct Classified {
    /// Existing absolute paths, in first-seen input order.
    pub paths: Vec<PathBuf>,
    /// Depth bound per absolute path.
    pub depth_bounds: BTreeMap<PathBuf, usize>,
    /// Inputs that did not exist and were dropped.
    pub missing: Vec<PathBuf>,
}

/// Resolves raw path specs to absolute, normalized paths with depth bounds.
///
/// Paths that do not exist are reported to the observer and dropped. When two
/// inputs resolve to the same path the later depth directive wins. Fails with
/// [`ScanError::NoValidPaths`] if nothing usable remains.
pub fn classify<I, S>(raws: I, observer: &dyn ScanObserver) -> Result<Classified, ScanError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut classified = Classified::default();
    for raw in raws {
        let spec = parse_path_spec(raw.as_ref());
        let path = absolute(&spec.path)?;
        if !path.exists() {
            observer.path_missing(&path);
            if !classified.missing.contains(&path) {
                classified.missing.push(path);
            }
            continue;
        }
        if let Some(depth) = spec.depth {
            classified.depth_bounds.insert(path.clone(), depth);
        }
        if !classified.paths.contains(&path) {
            classified.paths.push(path);
        }
    }
    if classified.paths.is_empty() {
        return Err(ScanError::NoValidPaths);
    }
    Ok(classified)
}

/// Makes `path` absolute against the current directory and normalizes it.
pub fn absolute(path: &Path) -> Result<PathBuf, ScanError> {
    let joined = std::path::absolute(path).map_err(|e| ScanError::io(path, e))?;
    Ok(normalize(&joined))
}

/// Lexically removes `.` components and folds `..` into their parent.
///
/// Symlinks are not resolved, so `a/link/..` becomes `a`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;

    #[test]
    fn strips_depth_directive() {
        let spec = parse_path_spec("/proj/src/root+2");
        assert_eq!(spec.path, PathBuf::from("/proj/src"));
        assert_eq!(spec.depth, Some(2));
    }

    #[test]
    fn malformed_directive_is_literal() {
        for raw in ["/proj/root+x", "/proj/root+", "/a/root+1/root+2", "/p/root+-1"] {
            let spec = parse_path_spec(raw);
            assert_eq!(spec.path, PathBuf::from(raw));
            assert_eq!(spec.depth, None);
        }
    }

    #[test]
    fn bare_directive_means_current_dir() {
        let spec = parse_path_spec("root+3");
        assert_eq!(spec.path, PathBuf::from("."));
        assert_eq!(spec.depth, Some(3));
    }

    #[test]
    fn depth_directive_flag() {
        assert_eq!(parse_depth_directive("root+4").unwrap(), 4);
        assert!(matches!(
            parse_depth_directive("4"),
            Err(ScanError::InvalidDepth(_))
        ));
        assert!(parse_depth_directive("root+a").is_err());
    }

    #[test]
    fn normalize_folds_dots() {
        assert_eq!(normalize(Path::new("/a/./b/../c/")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("../x")), PathBuf::from("../x"));
        assert_eq!(normalize(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(normalize(Path::new("./")), PathBuf::from("."));
    }

    #[test]
    fn later_duplicate_depth_wins() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().display().to_string();
        let raws = [format!("{base}/root+1"), format!("{base}/root+3"), base.clone()];
        let classified = classify(&raws, &NoopObserver).unwrap();
        let path = normalize(dir.path());
        assert_eq!(classified.paths, vec![path.clone()]);
        assert_eq!(classified.depth_bounds.get(&path), Some(&3));
    }

    #[test]
    fn missing_paths_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("gone.txt");
        let err = classify([gone.display().to_string()], &NoopObserver).unwrap_err();
        assert!(matches!(err, ScanError::NoValidPaths));

        let raws = [gone.display().to_string(), dir.path().display().to_string()];
        let classified = classify(&raws, &NoopObserver).unwrap();
        assert_eq!(classified.paths.len(), 1);
        assert_eq!(classified.missing, vec![normalize(&gone)]);
    }
}
