//! Builder configuration.

use std::path::{Component, Path, PathBuf};

/// Where to read the project from and where to write documentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderOptions {
    /// Meltano project directory (the one holding `meltano.yml`).
    pub project_root: PathBuf,
    /// Output directory, relative to `source_dir` unless absolute.
    pub docs_root: PathBuf,
    /// Documentation source directory that `docs_root` is resolved against.
    pub source_dir: PathBuf,
    /// Directory searched for templates before the built-ins.
    pub template_dir: Option<PathBuf>,
    /// Include resolved setting values per environment in each page.
    pub include_setting_values: bool,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("meltano"),
            docs_root: PathBuf::from("meltano"),
            source_dir: PathBuf::from("."),
            template_dir: None,
            include_setting_values: false,
        }
    }
}

impl BuilderOptions {
    /// `source_dir/docs_root` with `.` and `..` components folded away.
    pub fn normalized_docs_root(&self) -> PathBuf {
        normalize_path(&self.source_dir.join(&self.docs_root))
    }
}

/// Lexically normalize a path without touching the filesystem.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = BuilderOptions::default();
        assert_eq!(options.project_root, PathBuf::from("meltano"));
        assert_eq!(options.normalized_docs_root(), PathBuf::from("meltano"));
        assert!(options.template_dir.is_none());
        assert!(!options.include_setting_values);
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("docs/./source/../meltano")), PathBuf::from("docs/meltano"));
        assert_eq!(normalize_path(Path::new("../a/b")), PathBuf::from("../a/b"));
        assert_eq!(normalize_path(Path::new("/a/../../b")), PathBuf::from("/b"));
        assert_eq!(normalize_path(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn test_absolute_docs_root_ignores_source_dir() {
        let options = BuilderOptions {
            source_dir: PathBuf::from("docs/source"),
            docs_root: PathBuf::from("/tmp/out"),
            ..BuilderOptions::default()
        };
        assert_eq!(options.normalized_docs_root(), PathBuf::from("/tmp/out"));
    }
}
