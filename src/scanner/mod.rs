pub mod discovery;
pub mod listing;
pub mod metadata;

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::config::ScannerConfig;
use crate::error::{Result, TagError};
use crate::tags::{self, Tagged};

pub use discovery::discover_images;
pub use listing::{list_directories, Directory};
pub use metadata::probe_dimensions;

/// One image found by a scan. All paths are user-visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub id: String,
    pub name: String,
    pub path: String,
    pub relative_path: String,
    pub tags: Vec<String>,
    pub text_file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub directory: String,
}

impl Tagged for ImageRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Fails with `NotFound` or `NotADirectory` unless `path` is a directory.
pub(crate) fn check_directory(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(TagError::NotADirectory(path.to_path_buf())),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(TagError::NotFound(path.to_path_buf())),
        Err(e) => Err(TagError::io(path, e)),
    }
}

pub struct Scanner {
    extensions: Vec<String>,
}

impl Scanner {
    pub fn new(extensions: Vec<String>) -> Self {
        Self { extensions }
    }

    pub fn from_config(config: &ScannerConfig) -> Self {
        Self::new(config.image_extensions.clone())
    }

    pub fn is_image(&self, path: &Path) -> bool {
        discovery::has_image_extension(path, &self.extensions)
    }

    /// Scan `service_root` for images and build their records.
    ///
    /// `user_root` is the same directory as the user sees it; every path in
    /// the result is expressed under it. Paths are rebased onto `user_root`
    /// directly rather than through [`PathTranslator::to_user_path`], so the
    /// records echo the root exactly as it was requested, even a root outside
    /// the translated home. For roots under it the two agree.
    ///
    /// Missing sidecar files are created empty along the way. Images whose
    /// sidecar cannot be read are logged and skipped.
    ///
    /// [`PathTranslator::to_user_path`]: crate::paths::PathTranslator::to_user_path
    pub fn scan_directory(
        &self,
        service_root: &Path,
        user_root: &Path,
        recursive: bool,
    ) -> Result<Vec<ImageRecord>> {
        check_directory(service_root)?;

        let image_paths = discover_images(service_root, &self.extensions, recursive)?;

        let mut records = Vec::with_capacity(image_paths.len());
        for path in &image_paths {
            match self.scan_single_file(service_root, user_root, path) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Skipping {:?}: {}", path, e),
            }
        }

        tracing::info!(
            "Found {} images in {:?} (recursive: {})",
            records.len(),
            user_root,
            recursive
        );

        Ok(records)
    }

    fn scan_single_file(
        &self,
        service_root: &Path,
        user_root: &Path,
        path: &Path,
    ) -> Result<ImageRecord> {
        let user_path = match path.strip_prefix(service_root) {
            Ok(rest) => user_root.join(rest),
            Err(_) => path.to_path_buf(),
        };

        let tags = tags::read_tags(&tags::sidecar_path(path))?;
        let dimensions = probe_dimensions(path);

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let directory = user_path
            .parent()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();
        let user_path_str = user_path.to_string_lossy().to_string();

        Ok(ImageRecord {
            id: user_path_str.clone(),
            name,
            path: user_path_str.clone(),
            relative_path: user_path_str,
            tags,
            text_file_path: tags::sidecar_path(&user_path).to_string_lossy().to_string(),
            width: dimensions.map(|(w, _)| w),
            height: dimensions.map(|(_, h)| h),
            directory,
        })
    }
}
