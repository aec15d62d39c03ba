//! Language detection for `gwm-detector`.
//!
//! [`LanguageDetector::detect`] walks a repository once and runs every rule of
//! its table against each file. Detection is presence-based: one matching
//! file is enough, and any number of languages may coexist. Unreadable paths
//! never fail detection; they just contribute no signal.
//!
//! [`workspace::scan`] applies the detector to every repository of a workspace.

pub mod rules;
pub mod workspace;

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use gwm_core::Language;
use walkdir::{DirEntry, WalkDir};

pub use rules::{default_rules, DetectionRule, Predicate};
pub use workspace::{existing_workflow_files, scan, scan_with};

/// Directory names that never carry a language signal. Hidden directories
/// (`.git`, `.venv`, ...) are skipped as well.
const NOISE_DIRS: &[&str] = &["node_modules", "__pycache__"];

// ---------------------------------------------------------------------------
// Detector
// ---------------------------------------------------------------------------

/// Ordered rule table plus the walk that feeds it.
#[derive(Debug, Clone)]
pub struct LanguageDetector {
    rules: Vec<DetectionRule>,
    /// Repository-relative file paths that never carry a signal.
    excluded: BTreeSet<PathBuf>,
}

impl Default for LanguageDetector {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

impl LanguageDetector {
    /// A detector with an empty table; detects nothing until rules are pushed.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            excluded: BTreeSet::new(),
        }
    }

    pub fn with_default_rules() -> Self {
        Self {
            rules: default_rules(),
            excluded: BTreeSet::new(),
        }
    }

    /// Ignore these repository-relative files during detection.
    ///
    /// Used for files this tool installs itself, so that a copied `fixup.sh`
    /// does not make the next scan report `shell`.
    pub fn exclude_paths<I, P>(&mut self, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.excluded.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn excluded(&self) -> &BTreeSet<PathBuf> {
        &self.excluded
    }

    /// Append a rule at the end of the table.
    pub fn push_rule(&mut self, rule: DetectionRule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[DetectionRule] {
        &self.rules
    }

    /// Detect the languages present in the tree rooted at `repo`.
    ///
    /// Symbolic links are followed, but each directory identity is visited at
    /// most once so link cycles terminate. The walk stops early once every
    /// language in the table has been seen.
    pub fn detect(&self, repo: &Path) -> BTreeSet<Language> {
        let mut detected = BTreeSet::new();
        let known: BTreeSet<&Language> = self.rules.iter().map(|r| &r.language).collect();
        if known.is_empty() {
            return detected;
        }

        let mut visited: HashSet<PathBuf> = HashSet::new();
        if let Ok(root) = fs::canonicalize(repo) {
            visited.insert(root);
        }

        let walker = WalkDir::new(repo)
            .follow_links(true)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| keep_entry(entry, &mut visited));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!("no signal from {}: {err}", repo.display());
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(repo) else {
                continue;
            };
            if self.excluded.contains(relative) {
                tracing::debug!("{}: excluded {}", repo.display(), relative.display());
                continue;
            }

            for rule in &self.rules {
                if !detected.contains(&rule.language) && rule.predicate.matches(relative) {
                    tracing::debug!(
                        "{}: detected {} from {}",
                        repo.display(),
                        rule.language,
                        relative.display()
                    );
                    detected.insert(rule.language.clone());
                }
            }

            if detected.len() == known.len() {
                break;
            }
        }

        detected
    }
}

/// Detect languages in `repo` with the built-in rule table.
pub fn detect_languages(repo: &Path) -> BTreeSet<Language> {
    LanguageDetector::default().detect(repo)
}

// ---------------------------------------------------------------------------
// Walk filter
// ---------------------------------------------------------------------------

fn keep_entry(entry: &DirEntry, visited: &mut HashSet<PathBuf>) -> bool {
    if !entry.file_type().is_dir() {
        return true;
    }
    if is_noise_dir(entry) {
        return false;
    }
    match fs::canonicalize(entry.path()) {
        Ok(identity) => {
            let first_visit = visited.insert(identity);
            if !first_visit {
                tracing::debug!("already visited, skipping {}", entry.path().display());
            }
            first_visit
        }
        // Let walkdir report the unreadable directory itself.
        Err(_) => true,
    }
}

fn is_noise_dir(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.') || NOISE_DIRS.contains(&name))
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_table_detects_nothing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("main.py"), "").unwrap();
        assert!(LanguageDetector::new().detect(dir.path()).is_empty());
    }

    #[test]
    fn pushed_rule_extends_detection() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("build.zig"), "").unwrap();

        let mut detector = LanguageDetector::with_default_rules();
        assert!(detector.detect(dir.path()).is_empty());

        detector.push_rule(DetectionRule::extension("zig", &["zig"]));
        let langs = detector.detect(dir.path());
        assert!(langs.contains(&Language::from("zig")));
    }

    #[test]
    fn excluded_files_carry_no_signal() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("fixup.sh"), "").unwrap();
        fs::create_dir_all(dir.path().join("ci")).unwrap();
        fs::write(dir.path().join("ci").join("lint.rb"), "").unwrap();
        fs::write(dir.path().join("main.py"), "").unwrap();

        let mut detector = LanguageDetector::with_default_rules();
        detector.exclude_paths(["fixup.sh", "ci/lint.rb"]);
        let langs = detector.detect(dir.path());
        assert_eq!(langs, BTreeSet::from([Language::from("python")]));
    }

    #[test]
    fn exclusion_is_by_exact_relative_path() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("scripts")).unwrap();
        fs::write(dir.path().join("scripts").join("fixup.sh"), "").unwrap();

        let mut detector = LanguageDetector::with_default_rules();
        detector.exclude_paths(["fixup.sh"]);
        assert!(detector.detect(dir.path()).contains(&Language::from("shell")));
    }

    #[test]
    fn missing_repo_yields_empty_set() {
        let dir = TempDir::new().unwrap();
        assert!(detect_languages(&dir.path().join("gone")).is_empty());
    }
}
