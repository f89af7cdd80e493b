use crate::error::ScanError;
use crate::options::ScanSpec;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::fmt;
use std::path::{Component, Path};

const TEST_FILE_MARKERS: [&str; 2] = [".test.", ".spec."];

/// Why a path was excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exclusion {
    PathPrefix(String),
    Substring(String),
    DirName(String),
    FileName(String),
    FileGlob,
    TestFile,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exclusion::PathPrefix(p) => write!(f, "excluded path '{}'", p),
            Exclusion::Substring(s) => write!(f, "exclude pattern '{}'", s),
            Exclusion::DirName(d) => write!(f, "excluded directory name '{}'", d),
            Exclusion::FileName(n) => write!(f, "excluded file name '{}'", n),
            Exclusion::FileGlob => write!(f, "excluded file pattern"),
            Exclusion::TestFile => write!(f, "test file"),
        }
    }
}

/// The four exclusion families, compiled once per scan.
#[derive(Debug)]
pub struct ExclusionPolicy {
    path_prefixes: Vec<String>,
    substrings: Vec<String>,
    dir_names: HashSet<String>,
    file_names: HashSet<String>,
    file_globs: GlobSet,
}

impl ExclusionPolicy {
    pub fn new(spec: &ScanSpec) -> Result<Self, ScanError> {
        let mut globs = GlobSetBuilder::new();
        for pattern in spec
            .excluded_file_patterns
            .iter()
            .filter(|p| p.contains(['*', '?', '[']))
        {
            let glob = Glob::new(pattern).map_err(|source| ScanError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            globs.add(glob);
        }
        let file_globs = globs.build().map_err(|source| ScanError::InvalidPattern {
            pattern: "<file patterns>".to_string(),
            source,
        })?;
        Ok(Self {
            path_prefixes: spec.excluded_path_prefixes.iter().cloned().collect(),
            substrings: spec.excluded_substrings.iter().cloned().collect(),
            dir_names: spec.excluded_dir_names.iter().cloned().collect(),
            file_names: spec.excluded_file_patterns.iter().cloned().collect(),
            file_globs,
        })
    }

    /// Returns true if the path, relative to its scan root, is excluded.
    pub fn is_excluded(&self, relative: &Path, is_dir: bool) -> bool {
        self.check(relative, None, is_dir).is_some()
    }

    /// Evaluates every family in order and returns the first match.
    ///
    /// Prefix matching is plain string `starts_with`, so an excluded `src` also
    /// covers `src-test`. Absolute prefixes are compared against `absolute`
    /// when it is given.
    pub fn check(
        &self,
        relative: &Path,
        absolute: Option<&Path>,
        is_dir: bool,
    ) -> Option<Exclusion> {
        let rel = crate::classify::normalize(relative);
        let rel_str = rel.to_string_lossy();
        let abs_str = absolute.map(|p| p.to_string_lossy());

        for prefix in &self.path_prefixes {
            let candidate = match &abs_str {
                Some(abs) if Path::new(prefix).is_absolute() => &**abs,
                _ => &*rel_str,
            };
            if candidate.starts_with(prefix.as_str()) {
                return Some(Exclusion::PathPrefix(prefix.clone()));
            }
        }
        if let Some(pattern) = self
            .substrings
            .iter()
            .find(|s| rel_str.contains(s.as_str()))
        {
            return Some(Exclusion::Substring(pattern.clone()));
        }

        if is_dir {
            return rel
                .components()
                .filter_map(|c| match c {
                    Component::Normal(name) => name.to_str(),
                    _ => None,
                })
                .find(|name| self.dir_names.contains(*name))
                .map(|name| Exclusion::DirName(name.to_string()));
        }

        let file_name = rel
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.file_names.contains(&file_name) {
            return Some(Exclusion::FileName(file_name));
        }
        if self.file_globs.is_match(&file_name) {
            return Some(Exclusion::FileGlob);
        }
        if TEST_FILE_MARKERS.iter().any(|m| file_name.contains(*m)) {
            return Some(Exclusion::TestFile);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ScanBuilder;

    fn policy(builder: ScanBuilder) -> ExclusionPolicy {
        ExclusionPolicy::new(&builder.build()).unwrap()
    }

    #[test]
    fn default_dir_names_exclude_any_component() {
        let p = policy(ScanBuilder::new());
        assert!(p.is_excluded(Path::new("node_modules"), true));
        assert!(p.is_excluded(Path::new("web/node_modules/pkg"), true));
        assert!(!p.is_excluded(Path::new("src/nodes"), true));
        // directory names never apply to files
        assert!(!p.is_excluded(Path::new("dist"), false));
    }

    #[test]
    fn prefix_is_not_segment_aware() {
        let p = policy(ScanBuilder::new().exclude_path("src/"));
        assert!(p.is_excluded(Path::new("src/main.rs"), false));
        assert!(p.is_excluded(Path::new("src-test"), true));
        assert!(!p.is_excluded(Path::new("lib/src"), true));
    }

    #[test]
    fn absolute_prefix_matches_absolute_candidate() {
        let p = policy(ScanBuilder::new().exclude_path("/proj/vendor"));
        let hit = p.check(
            Path::new("vendor/a.c"),
            Some(Path::new("/proj/vendor/a.c")),
            false,
        );
        assert_eq!(hit, Some(Exclusion::PathPrefix("/proj/vendor".into())));
        assert!(!p.is_excluded(Path::new("vendor/a.c"), false));
    }

    #[test]
    fn substring_matches_anywhere() {
        let p = policy(ScanBuilder::new().exclude_substring(".env"));
        assert!(p.is_excluded(Path::new("config/.env.local"), false));
        assert!(p.is_excluded(Path::new("a/.envrc"), true));
    }

    #[test]
    fn file_patterns_and_test_heuristic() {
        let p = policy(ScanBuilder::new());
        assert!(p.is_excluded(Path::new("a/poetry.lock"), false));
        assert_eq!(
            p.check(Path::new("logs/app.log"), None, false),
            Some(Exclusion::FileGlob)
        );
        assert!(p.is_excluded(Path::new("yarn-error.log.1"), false));
        assert_eq!(
            p.check(Path::new("src/c.test.ts"), None, false),
            Some(Exclusion::TestFile)
        );
        assert!(p.is_excluded(Path::new("x.spec.py"), false));
        assert!(!p.is_excluded(Path::new("src/main.rs"), false));
    }

    #[test]
    fn test_heuristic_survives_cleared_defaults() {
        let p = policy(ScanBuilder::new().no_default_excludes());
        assert!(!p.is_excluded(Path::new("node_modules"), true));
        assert!(!p.is_excluded(Path::new("a.log"), false));
        assert!(p.is_excluded(Path::new("a.test.js"), false));
    }

    #[test]
    fn invalid_glob_is_rejected() {
        let spec = ScanBuilder::new().exclude_file_patterns(["[z-a"]).build();
        assert!(matches!(
            ExclusionPolicy::new(&spec),
            Err(ScanError::InvalidPattern { .. })
        ));
    }
}
