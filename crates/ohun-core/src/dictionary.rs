//! Seeded picture dictionary of captioned images

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryImage {
    pub id: u32,
    /// Stable key, e.g. `cat`
    pub image_key: String,
    pub asset_filename: String,
    pub english_caption: String,
    pub category: String,
}

/// A dictionary entry before it is assigned an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDictionaryImage {
    pub image_key: String,
    pub asset_filename: String,
    pub english_caption: String,
    pub category: String,
}

impl NewDictionaryImage {
    pub fn new(image_key: &str, asset_filename: &str, english_caption: &str, category: &str) -> Self {
        Self {
            image_key: image_key.to_string(),
            asset_filename: asset_filename.to_string(),
            english_caption: english_caption.to_string(),
            category: category.to_string(),
        }
    }
}

const SEED: [(&str, &str, &str, &str); 5] = [
    ("cat", "assets/images/animals_cat.png", "cat", "animals"),
    ("bird", "assets/images/animals_bird.png", "bird", "animals"),
    ("dog", "assets/images/animals_dog.png", "dog", "animals"),
    ("ears", "assets/images/body_parts_ears.png", "ears", "body_parts"),
    ("hands", "assets/images/body_parts_hands.png", "hands", "body_parts"),
];

/// In-memory caption dictionary, kept ordered by category then caption
#[derive(Debug, Clone)]
pub struct PictureDictionary {
    entries: Vec<DictionaryImage>,
    next_id: u32,
}

impl PictureDictionary {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// A dictionary holding the bundled seed images
    pub fn seeded() -> Self {
        let mut dictionary = Self::new();
        for (key, file, caption, category) in SEED {
            let inserted = dictionary
                .insert(NewDictionaryImage::new(key, file, caption, category))
                .is_ok();
            debug_assert!(inserted, "duplicate seed key '{}'", key);
        }
        debug!("Seeded picture dictionary with {} images", dictionary.count());
        dictionary
    }

    pub fn insert(&mut self, entry: NewDictionaryImage) -> Result<&DictionaryImage> {
        if self.entries.iter().any(|e| e.image_key == entry.image_key) {
            return Err(Error::DuplicateEntry(entry.image_key));
        }

        let image = DictionaryImage {
            id: self.next_id,
            image_key: entry.image_key,
            asset_filename: entry.asset_filename,
            english_caption: entry.english_caption,
            category: entry.category,
        };
        self.next_id += 1;

        let position = self
            .entries
            .partition_point(|e| sort_key(e) <= sort_key(&image));
        self.entries.insert(position, image);
        Ok(&self.entries[position])
    }

    /// Up to `limit` entries starting at `offset`, in dictionary order
    pub fn page(&self, limit: usize, offset: usize) -> &[DictionaryImage] {
        let start = offset.min(self.entries.len());
        let end = start.saturating_add(limit).min(self.entries.len());
        &self.entries[start..end]
    }

    pub fn get(&self, image_key: &str) -> Option<&DictionaryImage> {
        self.entries.iter().find(|e| e.image_key == image_key)
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }
}

impl Default for PictureDictionary {
    fn default() -> Self {
        Self::new()
    }
}

fn sort_key(image: &DictionaryImage) -> (&str, &str) {
    (&image.category, &image.english_caption)
}
