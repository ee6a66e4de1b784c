//! Client-side gallery state: the current scan result and the selection.
//!
//! A front end owns one `Gallery` and hands it to whatever needs to read or
//! change the images or the selection. Nothing here touches the filesystem;
//! writes go through the tag store first and are applied here only once
//! they have succeeded.

pub mod filter;

use std::collections::HashSet;

use crate::scanner::ImageRecord;
use crate::tags::merge::{self, BatchOutcome, TagAction, TagAnalysis, TagUpdate};

pub use filter::{filter_images, group_by_directory, matches_search};

#[derive(Debug, Default)]
pub struct Gallery {
    images: Vec<ImageRecord>,
    selection: HashSet<String>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the images with a fresh scan result. Clears the selection.
    pub fn load(&mut self, images: Vec<ImageRecord>) {
        self.images = images;
        self.selection.clear();
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn get(&self, id: &str) -> Option<&ImageRecord> {
        self.images.iter().find(|i| i.id == id)
    }

    /// Flip one image in or out of the selection; returns whether it is now
    /// selected. Unknown ids are ignored.
    pub fn toggle_selection(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        if self.selection.remove(id) {
            false
        } else {
            self.selection.insert(id.to_string());
            true
        }
    }

    pub fn select_all<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in ids {
            let id = id.into();
            if self.get(&id).is_some() {
                self.selection.insert(id);
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    /// Selected images in scan order.
    pub fn selected_images(&self) -> Vec<&ImageRecord> {
        self.images
            .iter()
            .filter(|i| self.selection.contains(&i.id))
            .collect()
    }

    pub fn selection_analysis(&self) -> TagAnalysis {
        merge::analyze(&self.selected_images())
    }

    pub fn plan_selection_update(&self, tag: &str, action: TagAction) -> Vec<TagUpdate> {
        merge::plan(&self.selected_images(), tag, action)
    }

    /// Record a successful write. Returns false if the image is unknown.
    pub fn apply_tags(&mut self, id: &str, tags: Vec<String>) -> bool {
        match self.images.iter_mut().find(|i| i.id == id) {
            Some(image) => {
                image.tags = tags;
                true
            }
            None => false,
        }
    }

    /// Apply the successful half of a batch; failed images keep their tags.
    pub fn apply_batch(&mut self, outcome: &BatchOutcome) {
        for update in &outcome.updated {
            self.apply_tags(&update.id, update.tags.clone());
        }
    }
}
