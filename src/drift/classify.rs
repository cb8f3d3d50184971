//! Change-set classification against declared spec globs.

use serde::Serialize;

use crate::glob::{compile_all, matches_any, PatternError};
use crate::spec::TaskSpecification;

/// Partition of a change set into spec, non-spec, and ignored paths.
///
/// Every input path lands in exactly one bucket. `ignored` is empty unless
/// the configuration carries ignore globs (the store internals are always
/// ignored). Input ordering is preserved within each bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassifiedChanges {
    /// Paths matching at least one declared spec glob.
    pub spec_matches: Vec<String>,
    /// Paths matching no spec glob.
    pub non_spec_matches: Vec<String>,
    /// Paths excluded from drift consideration.
    pub ignored: Vec<String>,
}

/// Classifies changed paths against the task's spec and ignore globs.
///
/// A path is a spec match if it matches any glob in `spec_globs` (first
/// match short-circuits). Classification operates on path strings only;
/// whether a path still exists on disk is irrelevant.
///
/// # Errors
///
/// Returns a [`PatternError`] when a configured glob cannot be compiled.
/// The caller surfaces it as a configuration error, not a drift finding.
pub fn classify(
    changes: &[String],
    spec: &TaskSpecification,
) -> Result<ClassifiedChanges, PatternError> {
    let spec_patterns = compile_all(&spec.spec_globs)?;
    let ignore_patterns = compile_all(&spec.ignore_globs)?;

    let mut classified = ClassifiedChanges::default();
    for path in changes {
        if matches_any(path, &ignore_patterns) {
            classified.ignored.push(path.clone());
        } else if matches_any(path, &spec_patterns) {
            classified.spec_matches.push(path.clone());
        } else {
            classified.non_spec_matches.push(path.clone());
        }
    }
    Ok(classified)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_with(globs: &[&str], ignore: &[&str]) -> TaskSpecification {
        TaskSpecification {
            schema: 1,
            spec_globs: globs.iter().map(ToString::to_string).collect(),
            require_spec_update_when_code_changes: true,
            ignore_globs: ignore.iter().map(ToString::to_string).collect(),
        }
    }

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn partitions_spec_and_non_spec() {
        let spec = spec_with(&["README.md", "docs/**"], &[]);
        let changes = paths(&["docs/guide.md", "src/app.go", "README.md"]);

        let classified = classify(&changes, &spec).unwrap();
        assert_eq!(classified.spec_matches, vec!["docs/guide.md", "README.md"]);
        assert_eq!(classified.non_spec_matches, vec!["src/app.go"]);
        assert!(classified.ignored.is_empty());
    }

    #[test]
    fn partition_is_exhaustive_and_exclusive() {
        let spec = spec_with(&["docs/**"], &["target/**"]);
        let changes =
            paths(&["docs/a.md", "src/lib.rs", "target/debug/out", "docs/b.md", "Cargo.toml"]);

        let classified = classify(&changes, &spec).unwrap();
        let total = classified.spec_matches.len()
            + classified.non_spec_matches.len()
            + classified.ignored.len();
        assert_eq!(total, changes.len());
        for path in &changes {
            let buckets = [&classified.spec_matches, &classified.non_spec_matches, &classified.ignored]
                .iter()
                .filter(|bucket| bucket.contains(path))
                .count();
            assert_eq!(buckets, 1, "{path} must land in exactly one bucket");
        }
    }

    #[test]
    fn empty_glob_list_matches_nothing() {
        let spec = spec_with(&[], &[]);
        let changes = paths(&["src/app.go", "README.md"]);

        let classified = classify(&changes, &spec).unwrap();
        assert!(classified.spec_matches.is_empty());
        assert_eq!(classified.non_spec_matches, changes);
    }

    #[test]
    fn empty_change_set_yields_empty_partition() {
        let spec = spec_with(&["docs/**"], &[]);
        let classified = classify(&[], &spec).unwrap();
        assert_eq!(classified, ClassifiedChanges::default());
    }

    #[test]
    fn ignored_paths_skip_the_spec_check() {
        // Ignore wins even when a spec glob would also match.
        let spec = spec_with(&["docs/**"], &["docs/generated/**"]);
        let changes = paths(&["docs/generated/api.md", "docs/guide.md"]);

        let classified = classify(&changes, &spec).unwrap();
        assert_eq!(classified.ignored, vec!["docs/generated/api.md"]);
        assert_eq!(classified.spec_matches, vec!["docs/guide.md"]);
    }

    #[test]
    fn non_spec_ordering_follows_input() {
        let spec = spec_with(&[], &[]);
        let changes = paths(&["z.rs", "a.rs", "m.rs"]);

        let classified = classify(&changes, &spec).unwrap();
        assert_eq!(classified.non_spec_matches, vec!["z.rs", "a.rs", "m.rs"]);
    }

    #[test]
    fn bad_glob_surfaces_as_pattern_error() {
        let spec = spec_with(&["docs/a**b"], &[]);
        assert!(classify(&paths(&["x"]), &spec).is_err());
    }
}
