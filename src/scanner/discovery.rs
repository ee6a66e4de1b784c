use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Result, TagError};

/// Dot-prefixed entries are skipped everywhere, files and directories alike.
pub fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

pub fn has_image_extension(path: &Path, extensions: &[String]) -> bool {
    match path.extension() {
        Some(ext) => {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            extensions.iter().any(|e| e.to_lowercase() == ext_lower)
        }
        None => false,
    }
}

/// Collect image files under `directory`, in filesystem enumeration order
/// (depth first). Only the top level is read unless `recursive` is set.
/// Symlinked directories are descended into, as the directory listing shows
/// them; link loops surface as entry errors.
///
/// Entries that cannot be read are logged and skipped; failing to read the
/// root directory itself is an error.
pub fn discover_images(
    directory: &Path,
    extensions: &[String],
    recursive: bool,
) -> Result<Vec<PathBuf>> {
    let mut walker = WalkDir::new(directory).follow_links(true);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut images = Vec::new();

    for entry in walker
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 || e.path() == Some(directory) => {
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                return Err(TagError::io(directory, source));
            }
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if entry.depth() == 0 {
            continue;
        }

        let path = entry.path();
        if path.is_file() && has_image_extension(path, extensions) {
            images.push(path.to_path_buf());
        }
    }

    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    fn extensions() -> Vec<String> {
        crate::config::ScannerConfig::default().image_extensions
    }

    #[test]
    fn test_discover_images() {
        let dir = tempdir().unwrap();

        File::create(dir.path().join("photo1.jpg")).unwrap();
        File::create(dir.path().join("photo2.PNG")).unwrap();
        File::create(dir.path().join("document.txt")).unwrap();

        fs::create_dir(dir.path().join("subdir")).unwrap();
        File::create(dir.path().join("subdir/photo3.jpeg")).unwrap();

        let flat = discover_images(dir.path(), &extensions(), false).unwrap();
        assert_eq!(flat.len(), 2);

        let deep = discover_images(dir.path(), &extensions(), true).unwrap();
        assert_eq!(deep.len(), 3);
        assert!(deep.contains(&dir.path().join("subdir/photo3.jpeg")));
    }

    #[test]
    fn test_hidden_entries_are_skipped() {
        let dir = tempdir().unwrap();

        File::create(dir.path().join(".hidden.png")).unwrap();
        fs::create_dir(dir.path().join(".cache")).unwrap();
        File::create(dir.path().join(".cache/thumb.png")).unwrap();
        File::create(dir.path().join("visible.webp")).unwrap();

        let images = discover_images(dir.path(), &extensions(), true).unwrap();
        assert_eq!(images, vec![dir.path().join("visible.webp")]);
    }

    #[test]
    fn test_hidden_root_is_still_walked() {
        let dir = tempdir().unwrap();
        let root = dir.path().join(".dataset");
        fs::create_dir(&root).unwrap();
        File::create(root.join("a.gif")).unwrap();

        let images = discover_images(&root, &extensions(), false).unwrap();
        assert_eq!(images.len(), 1);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        let result = discover_images(&dir.path().join("nope"), &extensions(), true);
        assert!(matches!(result, Err(TagError::Io { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directories_are_followed() {
        let dir = tempdir().unwrap();
        let outside = tempdir().unwrap();
        File::create(dir.path().join("top.png")).unwrap();
        File::create(outside.path().join("linked.png")).unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("more")).unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("again")).unwrap();

        let mut images = discover_images(dir.path(), &extensions(), true).unwrap();
        images.sort();

        assert_eq!(
            images,
            vec![
                dir.path().join("more/linked.png"),
                dir.path().join("top.png"),
            ]
        );

        let flat = discover_images(dir.path(), &extensions(), false).unwrap();
        assert_eq!(flat, vec![dir.path().join("top.png")]);
    }

    #[test]
    fn test_has_image_extension() {
        let exts = extensions();
        assert!(has_image_extension(Path::new("a.BMP"), &exts));
        assert!(has_image_extension(Path::new("dir.v1/a.jpeg"), &exts));
        assert!(!has_image_extension(Path::new("a.txt"), &exts));
        assert!(!has_image_extension(Path::new("png"), &exts));
    }
}
