//! working-directory access: path normalization and file listing

use std::fs;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, IoResultExt, Result};
use crate::repo::{Repo, VCS_DIR};

/// turn `path` into the repository-relative key used by the index and commits
///
/// relative paths are taken relative to the repository root. absolute paths
/// must point inside the root. keys use `/` separators and never start with
/// the metadata directory.
pub fn normalize(repo: &Repo, path: &Path) -> Result<String> {
    let relative = if let Ok(rel) = path.strip_prefix(repo.root()) {
        rel.to_path_buf()
    } else if path.is_absolute() {
        let resolved = resolve_absolute(path)?;
        resolved
            .strip_prefix(repo.root())
            .map(Path::to_path_buf)
            .map_err(|_| Error::PathOutsideRepo(path.to_path_buf()))?
    } else {
        path.to_path_buf()
    };

    let mut parts: Vec<String> = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                let part = part
                    .to_str()
                    .ok_or_else(|| Error::InvalidPath(path.display().to_string()))?;
                parts.push(part.to_string());
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.pop().is_none() {
                    return Err(Error::PathOutsideRepo(path.to_path_buf()));
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(Error::InvalidPath(path.display().to_string()));
            }
        }
    }

    match parts.first() {
        None => Err(Error::InvalidPath(path.display().to_string())),
        Some(first) if first == VCS_DIR => Err(Error::InvalidPath(format!(
            "{} is inside the repository metadata directory",
            path.display()
        ))),
        Some(_) => Ok(parts.join("/")),
    }
}

/// filesystem location of a repository-relative key
pub fn full_path(repo: &Repo, key: &str) -> PathBuf {
    repo.root().join(key)
}

/// all regular files under the root, excluding `.vcs` and ignored paths
///
/// returned as sorted repository-relative keys.
pub fn list_files(repo: &Repo) -> Result<Vec<String>> {
    let patterns = repo.config().ignore_patterns()?;
    let root = repo.root();
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(e.depth() == 1 && e.file_name() == VCS_DIR));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            Error::Io {
                path,
                source: e.into(),
            }
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let rel = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| Error::PathOutsideRepo(entry.path().to_path_buf()))?;
        let key = rel
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| Error::InvalidPath(rel.display().to_string()))?
            .join("/");

        if patterns.iter().any(|p| p.matches(&key)) {
            continue;
        }
        files.push(key);
    }

    files.sort();
    Ok(files)
}

/// canonicalize the directories of an absolute path, keeping the final
/// component as given so a symlink is keyed under its own name
fn resolve_absolute(path: &Path) -> Result<PathBuf> {
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if parent.exists() => {
            Ok(fs::canonicalize(parent).with_path(parent)?.join(name))
        }
        (Some(_), Some(_)) => Ok(path.to_path_buf()),
        // ends in `..` or is the filesystem root
        _ if path.exists() => fs::canonicalize(path).with_path(path),
        _ => Ok(path.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo = Repo::init(dir.path()).unwrap().repo;
        (dir, repo)
    }

    #[test]
    fn test_normalize_relative() {
        let (_dir, repo) = test_repo();

        assert_eq!(normalize(&repo, Path::new("a.txt")).unwrap(), "a.txt");
        assert_eq!(normalize(&repo, Path::new("./src/lib.rs")).unwrap(), "src/lib.rs");
        assert_eq!(normalize(&repo, Path::new("src/../b.txt")).unwrap(), "b.txt");
    }

    #[test]
    fn test_normalize_absolute() {
        let (_dir, repo) = test_repo();

        let existing = repo.root().join("here.txt");
        fs::write(&existing, "x").unwrap();
        assert_eq!(normalize(&repo, &existing).unwrap(), "here.txt");

        // not yet created
        let missing = repo.root().join("later.txt");
        assert_eq!(normalize(&repo, &missing).unwrap(), "later.txt");
    }

    #[test]
    fn test_normalize_keeps_symlink_name() {
        let (_dir, repo) = test_repo();
        let root = repo.root();

        fs::write(root.join("target.txt"), "t").unwrap();
        std::os::unix::fs::symlink("target.txt", root.join("link.txt")).unwrap();

        assert_eq!(normalize(&repo, Path::new("link.txt")).unwrap(), "link.txt");
        assert_eq!(normalize(&repo, &root.join("link.txt")).unwrap(), "link.txt");
    }

    #[test]
    fn test_normalize_through_symlinked_root() {
        let (dir, repo) = test_repo();
        let alias = tempdir().unwrap();
        let alias_root = alias.path().join("alias");
        std::os::unix::fs::symlink(dir.path(), &alias_root).unwrap();

        fs::write(repo.root().join("a.txt"), "a").unwrap();
        assert_eq!(normalize(&repo, &alias_root.join("a.txt")).unwrap(), "a.txt");
    }

    #[test]
    fn test_normalize_rejects_escape() {
        let (_dir, repo) = test_repo();

        assert!(matches!(
            normalize(&repo, Path::new("../outside")),
            Err(Error::PathOutsideRepo(_))
        ));

        let other = tempdir().unwrap();
        assert!(matches!(
            normalize(&repo, &other.path().join("x")),
            Err(Error::PathOutsideRepo(_))
        ));
    }

    #[test]
    fn test_normalize_rejects_metadata_and_empty() {
        let (_dir, repo) = test_repo();

        assert!(matches!(
            normalize(&repo, Path::new(".vcs/index")),
            Err(Error::InvalidPath(_))
        ));
        assert!(matches!(
            normalize(&repo, Path::new(".")),
            Err(Error::InvalidPath(_))
        ));
    }

    #[test]
    fn test_list_files_skips_metadata() {
        let (_dir, repo) = test_repo();
        let root = repo.root();

        fs::write(root.join("b.txt"), "b").unwrap();
        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::write(root.join("src/nested/a.rs"), "a").unwrap();
        fs::write(root.join("src/main.rs"), "m").unwrap();

        let files = list_files(&repo).unwrap();
        assert_eq!(files, vec!["b.txt", "src/main.rs", "src/nested/a.rs"]);
    }

    #[test]
    fn test_list_files_respects_ignore() {
        let (_dir, mut repo) = test_repo();
        let root = repo.root().to_path_buf();

        fs::write(root.join("keep.rs"), "k").unwrap();
        fs::write(root.join("debug.log"), "l").unwrap();
        fs::create_dir_all(root.join("target/release")).unwrap();
        fs::write(root.join("target/release/bin"), "b").unwrap();

        repo.config_mut().ignore = vec!["*.log".to_string(), "target/**".to_string()];

        assert_eq!(list_files(&repo).unwrap(), vec!["keep.rs"]);
    }
}
