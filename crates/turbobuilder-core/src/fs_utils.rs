//! File tree helpers shared by the phases

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively copy a folder, creating the destination if needed
pub fn copy_dir(source: &Path, dest: &Path) -> Result<()> {
    copy_dir_excluding(source, dest, &[])
}

/// Recursively copy a folder, skipping entries whose relative path contains any exclude
pub fn copy_dir_excluding(source: &Path, dest: &Path, excludes: &[String]) -> Result<()> {
    std::fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create directory: {}", dest.display()))?;

    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry.with_context(|| format!("Failed to read {}", source.display()))?;
        let relative = entry.path().strip_prefix(source)?;
        if is_excluded(&slash_path(relative), excludes) {
            continue;
        }

        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create directory: {}", target.display()))?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
        }
    }

    Ok(())
}

/// Every file below a folder, sorted by path. Missing folders yield nothing
pub fn find_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect()
}

/// Files below a folder with one of the given extensions (case insensitive, no dot)
pub fn find_files_with_extension(dir: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    find_files(dir)
        .into_iter()
        .filter(|path| has_extension(path, extensions))
        .collect()
}

pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)))
}

pub fn is_dir_empty(dir: &Path) -> Result<bool> {
    let mut entries =
        std::fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;
    Ok(entries.next().is_none())
}

/// Delete everything inside a folder, keeping the folder itself
pub fn empty_dir(dir: &Path) -> Result<()> {
    for entry in std::fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let path = entry?.path();
        let removed = if path.is_dir() {
            std::fs::remove_dir_all(&path)
        } else {
            std::fs::remove_file(&path)
        };
        removed.with_context(|| format!("Failed to delete {}", path.display()))?;
    }
    Ok(())
}

/// Remove a folder if present
pub fn remove_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)
            .with_context(|| format!("Failed to delete {}", dir.display()))?;
    }
    Ok(())
}

/// File contents as text. Bytes that are not valid UTF-8 are replaced, so one badly
/// encoded file never stops a rule from checking the rest
pub fn read_text_lossy(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Path with forward slashes, used for matching setup patterns
pub fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Path relative to `base` with forward slashes
pub fn relative_slash_path(path: &Path, base: &Path) -> String {
    slash_path(path.strip_prefix(base).unwrap_or(path))
}

/// Setup excludes match any path containing them
pub fn is_excluded(path: &str, excludes: &[String]) -> bool {
    excludes
        .iter()
        .filter(|exclude| !exclude.is_empty())
        .any(|exclude| path.contains(exclude.as_str()))
}

/// Setup includes match file names ending with them. No includes means everything
pub fn is_included(path: &Path, includes: &[String]) -> bool {
    if includes.is_empty() {
        return true;
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    includes.iter().any(|include| name.ends_with(include.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_dir_with_excludes() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        std::fs::create_dir_all(src.join("js/libs")).unwrap();
        std::fs::write(src.join("js/index.js"), "a").unwrap();
        std::fs::write(src.join("js/libs/vendor.js"), "b").unwrap();

        let dest = dir.path().join("dest");
        copy_dir_excluding(&src, &dest, &["libs".to_string()]).unwrap();

        assert!(dest.join("js/index.js").is_file());
        assert!(!dest.join("js/libs").exists());
    }

    #[test]
    fn test_find_files_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("b")).unwrap();
        std::fs::write(dir.path().join("b/z.JS"), "").unwrap();
        std::fs::write(dir.path().join("a.js"), "").unwrap();
        std::fs::write(dir.path().join("c.ts"), "").unwrap();

        let js = find_files_with_extension(dir.path(), &["js"]);
        let names: Vec<_> = js
            .iter()
            .map(|p| relative_slash_path(p, dir.path()))
            .collect();
        assert_eq!(names, vec!["a.js", "b/z.JS"]);
        assert!(find_files(&dir.path().join("missing")).is_empty());
    }

    #[test]
    fn test_empty_dir_keeps_folder() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("file.txt"), "").unwrap();

        assert!(!is_dir_empty(dir.path()).unwrap());
        empty_dir(dir.path()).unwrap();
        assert!(dir.path().exists());
        assert!(is_dir_empty(dir.path()).unwrap());
    }

    #[test]
    fn test_include_and_exclude_matching() {
        assert!(is_excluded("src/main/js/libs/x.js", &["libs".to_string()]));
        assert!(!is_excluded("src/main/js/x.js", &["".to_string()]));
        assert!(is_included(Path::new("a/b/index.js"), &[".js".to_string()]));
        assert!(!is_included(Path::new("a/b/index.ts"), &[".js".to_string()]));
        assert!(is_included(Path::new("a/b/index.ts"), &[]));
    }

    #[test]
    fn test_read_text_lossy_keeps_latin1_files_readable() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("latin.js");
        std::fs::write(&file, b"var caf\xe9 = 1;").unwrap();

        assert_eq!(read_text_lossy(&file).unwrap(), "var caf\u{fffd} = 1;");
        assert!(read_text_lossy(&dir.path().join("missing.js")).is_err());
    }
}
