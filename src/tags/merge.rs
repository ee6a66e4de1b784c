//! Tag editing across a multi-image selection.
//!
//! A tag present on every selected image is *common*; a tag present on some
//! of them is *partial*. Toggling a common tag removes it everywhere,
//! toggling a partial tag adds it where it is missing.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::util::locale_cmp;

/// Anything that carries an identity and an ordered tag list.
pub trait Tagged {
    fn id(&self) -> &str;
    fn tags(&self) -> &[String];
}

impl<T: Tagged + ?Sized> Tagged for &T {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn tags(&self) -> &[String] {
        (**self).tags()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagInfo {
    pub tag: String,
    /// Number of selected images carrying the tag
    pub count: usize,
    pub is_common: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagAnalysis {
    /// Common tags first, then partial; by descending count, then name
    pub tags: Vec<TagInfo>,
    pub total_images: usize,
}

impl TagAnalysis {
    pub fn get(&self, tag: &str) -> Option<&TagInfo> {
        self.tags.iter().find(|t| t.tag == tag)
    }

    pub fn common(&self) -> impl Iterator<Item = &TagInfo> {
        self.tags.iter().filter(|t| t.is_common)
    }

    pub fn partial(&self) -> impl Iterator<Item = &TagInfo> {
        self.tags.iter().filter(|t| !t.is_common)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagAction {
    /// Remove if common, otherwise add where missing
    Toggle,
    /// Add where missing
    Add,
}

/// New tag list for one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagUpdate {
    pub id: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedUpdate {
    pub id: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    pub updated: Vec<TagUpdate>,
    pub failed: Vec<FailedUpdate>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

pub fn analyze<T: Tagged>(selection: &[T]) -> TagAnalysis {
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for image in selection {
        // A tag duplicated inside one sidecar still counts once for that image
        let mut seen = HashSet::new();
        for tag in image.tags() {
            if seen.insert(tag.as_str()) {
                *counts.entry(tag.as_str()).or_default() += 1;
            }
        }
    }

    let total_images = selection.len();
    let mut tags: Vec<TagInfo> = counts
        .into_iter()
        .map(|(tag, count)| TagInfo {
            tag: tag.to_string(),
            count,
            is_common: count == total_images,
        })
        .collect();

    tags.sort_by(|a, b| {
        b.is_common
            .cmp(&a.is_common)
            .then_with(|| b.count.cmp(&a.count))
            .then_with(|| locale_cmp(&a.tag, &b.tag))
    });

    TagAnalysis { tags, total_images }
}

/// Updates produced by toggling `tag` across the selection. Images whose tag
/// list would not change are left out.
pub fn plan_toggle<T: Tagged>(selection: &[T], tag: &str) -> Vec<TagUpdate> {
    let is_common = !selection.is_empty()
        && selection
            .iter()
            .all(|image| image.tags().iter().any(|t| t == tag));

    if is_common {
        plan_remove(selection, tag)
    } else {
        plan_add(selection, tag)
    }
}

/// Updates appending `tag` (trimmed) to every image that lacks it.
pub fn plan_add<T: Tagged>(selection: &[T], tag: &str) -> Vec<TagUpdate> {
    let tag = tag.trim();
    if tag.is_empty() {
        return Vec::new();
    }

    selection
        .iter()
        .filter(|image| !image.tags().iter().any(|t| t == tag))
        .map(|image| {
            let mut tags = image.tags().to_vec();
            tags.push(tag.to_string());
            TagUpdate {
                id: image.id().to_string(),
                tags,
            }
        })
        .collect()
}

fn plan_remove<T: Tagged>(selection: &[T], tag: &str) -> Vec<TagUpdate> {
    selection
        .iter()
        .filter(|image| image.tags().iter().any(|t| t == tag))
        .map(|image| TagUpdate {
            id: image.id().to_string(),
            tags: image
                .tags()
                .iter()
                .filter(|t| *t != tag)
                .cloned()
                .collect(),
        })
        .collect()
}

pub fn plan<T: Tagged>(selection: &[T], tag: &str, action: TagAction) -> Vec<TagUpdate> {
    match action {
        TagAction::Toggle => plan_toggle(selection, tag),
        TagAction::Add => plan_add(selection, tag),
    }
}

/// Write each update independently. A failure is recorded against its image
/// and does not stop the remaining writes.
pub fn commit<F>(updates: Vec<TagUpdate>, mut write: F) -> BatchOutcome
where
    F: FnMut(&TagUpdate) -> Result<()>,
{
    let mut outcome = BatchOutcome::default();

    for update in updates {
        match write(&update) {
            Ok(()) => outcome.updated.push(update),
            Err(e) => {
                tracing::warn!("Failed to update tags for {}: {}", update.id, e);
                outcome.failed.push(FailedUpdate {
                    id: update.id,
                    error: e.to_string(),
                });
            }
        }
    }

    outcome
}
