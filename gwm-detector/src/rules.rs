//! Recognition rules for language detection.
//!
//! The table is an ordered list of independent `(predicate, language)` pairs
//! evaluated against every file of one directory walk. Several rules may name
//! the same language; the first one that matches wins and the rest are not
//! consulted again for that repository. Supporting a new language means
//! appending rules, never touching the walk.

use std::path::Path;

use gwm_core::Language;

/// A test applied to a file path relative to the repository root.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Any file whose extension is in the list (case-insensitive, no dot).
    Extension(&'static [&'static str]),
    /// Any file, at any depth, whose name is exactly one of the list.
    FileName(&'static [&'static str]),
    /// A file directly in the repository root whose name is one of the list,
    /// e.g. a toolchain build descriptor.
    RootFile(&'static [&'static str]),
    /// Arbitrary test over the relative path.
    Custom(fn(&Path) -> bool),
}

impl Predicate {
    pub fn matches(&self, relative: &Path) -> bool {
        match self {
            Predicate::Extension(exts) => relative
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| exts.iter().any(|x| x.eq_ignore_ascii_case(e)))
                .unwrap_or(false),
            Predicate::FileName(names) => file_name_in(relative, names),
            Predicate::RootFile(names) => {
                relative.components().count() == 1 && file_name_in(relative, names)
            }
            Predicate::Custom(f) => f(relative),
        }
    }
}

fn file_name_in(relative: &Path, names: &[&str]) -> bool {
    relative
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| names.contains(&n))
        .unwrap_or(false)
}

/// One row of the rule table.
#[derive(Debug, Clone)]
pub struct DetectionRule {
    pub predicate: Predicate,
    pub language: Language,
}

impl DetectionRule {
    pub fn new(language: &str, predicate: Predicate) -> Self {
        Self {
            predicate,
            language: Language::new(language),
        }
    }

    pub fn extension(language: &str, exts: &'static [&'static str]) -> Self {
        Self::new(language, Predicate::Extension(exts))
    }

    pub fn root_file(language: &str, names: &'static [&'static str]) -> Self {
        Self::new(language, Predicate::RootFile(names))
    }

    pub fn file_name(language: &str, names: &'static [&'static str]) -> Self {
        Self::new(language, Predicate::FileName(names))
    }
}

/// The built-in rule table.
pub fn default_rules() -> Vec<DetectionRule> {
    vec![
        DetectionRule::extension("python", &["py", "pyi"]),
        DetectionRule::root_file(
            "python",
            &["pyproject.toml", "setup.py", "setup.cfg", "requirements.txt", "Pipfile"],
        ),
        DetectionRule::extension("cpp", &["cpp", "hpp", "hxx", "h", "cc", "cxx", "hh"]),
        DetectionRule::extension("c", &["c"]),
        DetectionRule::file_name("cmake", &["CMakeLists.txt"]),
        DetectionRule::extension("cmake", &["cmake"]),
        DetectionRule::extension("rust", &["rs"]),
        DetectionRule::root_file("rust", &["Cargo.toml"]),
        DetectionRule::extension("go", &["go"]),
        DetectionRule::root_file("go", &["go.mod"]),
        DetectionRule::extension("javascript", &["js", "mjs", "cjs", "jsx"]),
        DetectionRule::root_file("javascript", &["package.json"]),
        DetectionRule::extension("typescript", &["ts", "tsx"]),
        DetectionRule::root_file("typescript", &["tsconfig.json"]),
        DetectionRule::extension("java", &["java"]),
        DetectionRule::root_file("java", &["pom.xml", "build.gradle"]),
        DetectionRule::extension("kotlin", &["kt", "kts"]),
        DetectionRule::extension("ruby", &["rb"]),
        DetectionRule::root_file("ruby", &["Gemfile"]),
        DetectionRule::extension("php", &["php"]),
        DetectionRule::root_file("php", &["composer.json"]),
        DetectionRule::extension("elixir", &["ex", "exs"]),
        DetectionRule::extension("lua", &["lua"]),
        DetectionRule::extension("shell", &["sh", "bash"]),
        DetectionRule::extension("markdown", &["md", "markdown"]),
        DetectionRule::extension("rst", &["rst"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_case_insensitive() {
        let p = Predicate::Extension(&["py"]);
        assert!(p.matches(Path::new("src/Main.PY")));
        assert!(!p.matches(Path::new("src/main.pyc")));
        assert!(!p.matches(Path::new("Makefile")));
    }

    #[test]
    fn root_file_only_matches_at_top_level() {
        let p = Predicate::RootFile(&["Cargo.toml"]);
        assert!(p.matches(Path::new("Cargo.toml")));
        assert!(!p.matches(Path::new("vendor/dep/Cargo.toml")));
    }

    #[test]
    fn file_name_matches_at_any_depth() {
        let p = Predicate::FileName(&["CMakeLists.txt"]);
        assert!(p.matches(Path::new("CMakeLists.txt")));
        assert!(p.matches(Path::new("src/lib/CMakeLists.txt")));
    }

    #[test]
    fn custom_predicate_is_called() {
        let p = Predicate::Custom(|rel| rel.starts_with("docs"));
        assert!(p.matches(Path::new("docs/index.txt")));
        assert!(!p.matches(Path::new("src/index.txt")));
    }

    #[test]
    fn every_default_rule_has_a_tag() {
        assert!(default_rules().iter().all(|r| !r.language.as_str().is_empty()));
    }
}
