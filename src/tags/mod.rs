//! Sidecar tag files.
//!
//! Every image `foo.png` has a plain text file `foo.txt` next to it holding
//! its tags as `tag1, tag2, tag3`. An empty file means no tags.

pub mod merge;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Result, TagError};

pub use merge::{analyze, BatchOutcome, TagAction, TagAnalysis, TagInfo, TagUpdate, Tagged};

pub const SIDECAR_EXTENSION: &str = "txt";

const SEPARATOR: &str = ", ";

/// Sidecar path for an image: same directory and stem, `.txt` extension.
pub fn sidecar_path(image_path: &Path) -> PathBuf {
    image_path.with_extension(SIDECAR_EXTENSION)
}

/// Split sidecar text into tags. Pieces are trimmed and empty pieces dropped;
/// duplicates are kept as written.
pub fn parse_tags(content: &str) -> Vec<String> {
    content
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn format_tags<S: AsRef<str>>(tags: &[S]) -> String {
    tags.iter()
        .map(|t| t.as_ref())
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// Read the tags of a sidecar file, creating it empty if it does not exist.
/// Bytes that are not valid UTF-8 become U+FFFD instead of failing the read.
pub fn read_tags(path: &Path) -> Result<Vec<String>> {
    match fs::read(path) {
        Ok(bytes) => Ok(parse_tags(&String::from_utf8_lossy(&bytes))),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            fs::write(path, "").map_err(|e| TagError::io(path, e))?;
            tracing::debug!("Created empty sidecar {:?}", path);
            Ok(Vec::new())
        }
        Err(e) => Err(TagError::io(path, e)),
    }
}

/// Overwrite a sidecar file with the given tags.
pub fn write_tags<S: AsRef<str>>(path: &Path, tags: &[S]) -> Result<()> {
    fs::write(path, format_tags(tags)).map_err(|e| TagError::io(path, e))
}

/// Append a tag unless it is blank or already present. Returns whether the
/// list changed.
pub fn add_tag(tags: &mut Vec<String>, tag: &str) -> bool {
    let tag = tag.trim();
    if tag.is_empty() || tags.iter().any(|t| t == tag) {
        return false;
    }
    tags.push(tag.to_string());
    true
}

/// Remove every occurrence of a tag, keeping the order of the rest.
pub fn remove_tag(tags: &mut Vec<String>, tag: &str) -> bool {
    let before = tags.len();
    tags.retain(|t| t != tag);
    tags.len() != before
}

/// Move the tag at `from` so it ends up at index `to` (drag reordering).
pub fn move_tag(tags: &mut Vec<String>, from: usize, to: usize) -> bool {
    if from == to || from >= tags.len() || to >= tags.len() {
        return false;
    }
    let tag = tags.remove(from);
    tags.insert(to, tag);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn strings(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_sidecar_path() {
        assert_eq!(
            sidecar_path(Path::new("/data/set1/a.png")),
            PathBuf::from("/data/set1/a.txt")
        );
        assert_eq!(
            sidecar_path(Path::new("/data/set1/photo.v2.JPEG")),
            PathBuf::from("/data/set1/photo.v2.txt")
        );
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags("cat, grey"), strings(&["cat", "grey"]));
        assert_eq!(parse_tags("  cat ,, grey ,\n"), strings(&["cat", "grey"]));
        assert_eq!(parse_tags("b, a, b"), strings(&["b", "a", "b"]));
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }

    #[test]
    fn test_format_tags() {
        assert_eq!(format_tags(&["cat", "grey", "indoor"]), "cat, grey, indoor");
        assert_eq!(format_tags::<&str>(&[]), "");
    }

    #[test]
    fn test_read_creates_missing_sidecar() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");

        let tags = read_tags(&path).unwrap();

        assert!(tags.is_empty());
        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        let tags = strings(&["1girl", "solo", "long hair", "smile"]);

        write_tags(&path, &tags).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "1girl, solo, long hair, smile");
        assert_eq!(read_tags(&path).unwrap(), tags);
    }

    #[test]
    fn test_read_tolerates_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, [b'c', b'a', b'f', 0xe9, b',', b' ', b'x']).unwrap();

        let tags = read_tags(&path).unwrap();

        assert_eq!(tags, strings(&["caf\u{fffd}", "x"]));
    }

    #[test]
    fn test_read_of_a_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::create_dir(&path).unwrap();

        assert!(matches!(read_tags(&path), Err(TagError::Io { .. })));
    }

    #[test]
    fn test_write_overwrites_whole_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "one, two, three, four").unwrap();

        write_tags(&path, &["five"]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "five");
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing/a.txt");

        let err = write_tags(&path, &["cat"]).unwrap_err();

        assert!(matches!(err, TagError::Io { .. }));
    }

    #[test]
    fn test_add_tag() {
        let mut tags = strings(&["cat"]);
        assert!(add_tag(&mut tags, "  grey "));
        assert!(!add_tag(&mut tags, "cat"));
        assert!(!add_tag(&mut tags, "   "));
        assert_eq!(tags, strings(&["cat", "grey"]));
    }

    #[test]
    fn test_remove_tag() {
        let mut tags = strings(&["a", "b", "a", "c"]);
        assert!(remove_tag(&mut tags, "a"));
        assert_eq!(tags, strings(&["b", "c"]));
        assert!(!remove_tag(&mut tags, "z"));
    }

    #[test]
    fn test_move_tag() {
        let mut tags = strings(&["a", "b", "c", "d"]);
        assert!(move_tag(&mut tags, 0, 2));
        assert_eq!(tags, strings(&["b", "c", "a", "d"]));
        assert!(move_tag(&mut tags, 3, 0));
        assert_eq!(tags, strings(&["d", "b", "c", "a"]));
        assert!(!move_tag(&mut tags, 1, 1));
        assert!(!move_tag(&mut tags, 1, 9));
    }
}
