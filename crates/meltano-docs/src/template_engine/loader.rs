//! Built-in templates and the override directory walk.

use std::fs;
use std::path::{Path, PathBuf};

pub(crate) const BUILTIN_TEMPLATES: [(&str, &str); 5] = [
    (
        super::EXTRACTOR_TEMPLATE,
        include_str!("../../templates/build/extractor.rst"),
    ),
    (
        super::EXTRACTORS_TEMPLATE,
        include_str!("../../templates/build/extractors.rst"),
    ),
    (
        super::PLUGINS_TEMPLATE,
        include_str!("../../templates/build/plugins.rst"),
    ),
    (
        super::INDEX_TEMPLATE,
        include_str!("../../templates/build/index.rst"),
    ),
    (
        super::PLUGIN_TEMPLATE,
        include_str!("../../templates/plugin.rst"),
    ),
];

/// Load every file under `template_dir` as `(name, source)` pairs.
///
/// Names are paths relative to `template_dir` joined with `/`, so
/// `<dir>/build/index.rst` registers as `build/index.rst`. Entries are
/// returned in path order.
pub(crate) fn load_templates_from_dir(
    template_dir: &Path,
) -> Result<Vec<(String, String)>, LoaderError> {
    if !template_dir.is_dir() {
        return Err(LoaderError::NotADirectory(template_dir.to_path_buf()));
    }
    let mut templates = Vec::new();
    collect(template_dir, template_dir, &mut templates)?;
    Ok(templates)
}

fn collect(
    root: &Path,
    dir: &Path,
    templates: &mut Vec<(String, String)>,
) -> Result<(), LoaderError> {
    let mut entries = fs::read_dir(dir)
        .map_err(read_error(dir))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_error(dir))?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            collect(root, &path, templates)?;
            continue;
        }
        let source = fs::read_to_string(&path).map_err(read_error(&path))?;
        let name = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        templates.push((name, source));
    }
    Ok(())
}

fn read_error(path: &Path) -> impl FnOnce(std::io::Error) -> LoaderError {
    let path = path.to_path_buf();
    move |source| LoaderError::Read { path, source }
}

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("template directory {} does not exist or is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_nested_templates() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("build")).unwrap();
        fs::write(dir.path().join("plugin.rst"), "{{ docs.name }}").unwrap();
        fs::write(dir.path().join("build").join("index.rst"), "Index").unwrap();

        let templates = load_templates_from_dir(dir.path()).unwrap();
        let names: Vec<_> = templates.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["build/index.rst", "plugin.rst"]);
        assert_eq!(templates[0].1, "Index");
    }

    #[test]
    fn test_load_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_templates_from_dir(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_templates_from_dir(&dir.path().join("missing"));
        assert!(matches!(result, Err(LoaderError::NotADirectory(_))));
    }

    #[test]
    fn test_builtins_present() {
        let names: Vec<_> = BUILTIN_TEMPLATES.iter().map(|(name, _)| *name).collect();
        assert!(names.contains(&"plugin.rst"));
        assert!(names.contains(&"build/extractor.rst"));
    }
}
