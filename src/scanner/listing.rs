//! One-level directory listing for folder navigation.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::{check_directory, discovery::is_hidden};
use crate::error::{Result, TagError};
use crate::util::locale_cmp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    pub name: String,
    /// User-visible path
    pub path: String,
}

/// Subdirectories of `service_path`, reported with user-visible paths under
/// `user_path` and sorted by name. Children that cannot be stat'ed are
/// skipped silently.
pub fn list_directories(service_path: &Path, user_path: &Path) -> Result<Vec<Directory>> {
    check_directory(service_path)?;

    let entries = fs::read_dir(service_path).map_err(|e| TagError::io(service_path, e))?;

    let mut directories: Vec<Directory> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| !is_hidden(&entry.file_name()))
        // fs::metadata follows symlinks, so linked folders are listed too
        .filter(|entry| fs::metadata(entry.path()).map(|m| m.is_dir()).unwrap_or(false))
        .map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            let path = user_path.join(&name).to_string_lossy().to_string();
            Directory { name, path }
        })
        .collect();

    directories.sort_by(|a, b| locale_cmp(&a.name, &b.name));

    Ok(directories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_lists_only_visible_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("beta")).unwrap();
        fs::create_dir(dir.path().join("Alpha")).unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::create_dir_all(dir.path().join("beta/nested")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();

        let listed = list_directories(dir.path(), Path::new("/home/ana/pics")).unwrap();

        assert_eq!(
            listed,
            vec![
                Directory {
                    name: "Alpha".into(),
                    path: "/home/ana/pics/Alpha".into(),
                },
                Directory {
                    name: "beta".into(),
                    path: "/home/ana/pics/beta".into(),
                },
            ]
        );
    }

    #[test]
    fn test_only_dot_entries_lists_nothing() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".a")).unwrap();
        File::create(dir.path().join(".b")).unwrap();

        assert!(list_directories(dir.path(), dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_and_file_roots() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.png");
        File::create(&file).unwrap();

        assert!(matches!(
            list_directories(&dir.path().join("nope"), dir.path()),
            Err(TagError::NotFound(_))
        ));
        assert!(matches!(
            list_directories(&file, &file),
            Err(TagError::NotADirectory(_))
        ));
    }
}
