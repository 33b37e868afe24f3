//! Favorite exercises, persisted as a JSON array of `slug:id` strings.
//!
//! Order is recency of addition: new favorites are appended.

use crate::storage::{Storage, FAVORITES_DOC};
use crate::{ExerciseKey, Result};

pub struct FavoritesStore<S> {
    storage: S,
}

impl<S: Storage> FavoritesStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Current favorites.
    ///
    /// Absent or corrupt documents read as empty. Entries that are not
    /// valid keys and repeated entries are dropped.
    pub fn get_favorites(&self) -> Result<Vec<ExerciseKey>> {
        let Some(raw) = self.storage.read(FAVORITES_DOC)? else {
            return Ok(Vec::new());
        };

        let entries = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Favorites document is corrupt ({}); treating as empty", e);
                return Ok(Vec::new());
            }
        };

        let mut favorites: Vec<ExerciseKey> = Vec::with_capacity(entries.len());
        for entry in entries {
            let parsed = entry.as_str().map(str::parse::<ExerciseKey>);
            match parsed {
                Some(Ok(key)) if !favorites.contains(&key) => favorites.push(key),
                Some(Ok(_)) => {}
                _ => tracing::warn!("Dropping invalid favorite entry {}", entry),
            }
        }
        Ok(favorites)
    }

    pub fn is_favorite(&self, key: &ExerciseKey) -> Result<bool> {
        Ok(self.get_favorites()?.contains(key))
    }

    /// Remove `key` if present, otherwise append it. Returns the new list.
    pub fn toggle_favorite(&self, key: &ExerciseKey) -> Result<Vec<ExerciseKey>> {
        let mut favorites = self.get_favorites()?;
        match favorites.iter().position(|k| k == key) {
            Some(idx) => {
                favorites.remove(idx);
            }
            None => favorites.push(key.clone()),
        }
        self.persist(&favorites)?;
        Ok(favorites)
    }

    /// Append `key` unless already present
    pub fn add_favorite(&self, key: &ExerciseKey) -> Result<Vec<ExerciseKey>> {
        let mut favorites = self.get_favorites()?;
        if !favorites.contains(key) {
            favorites.push(key.clone());
            self.persist(&favorites)?;
        }
        Ok(favorites)
    }

    pub fn remove_favorite(&self, key: &ExerciseKey) -> Result<Vec<ExerciseKey>> {
        let mut favorites = self.get_favorites()?;
        let before = favorites.len();
        favorites.retain(|k| k != key);
        if favorites.len() != before {
            self.persist(&favorites)?;
        }
        Ok(favorites)
    }

    fn persist(&self, favorites: &[ExerciseKey]) -> Result<()> {
        let contents = serde_json::to_string(favorites)?;
        self.storage.write(FAVORITES_DOC, &contents)?;
        tracing::debug!("Saved {} favorites", favorites.len());
        Ok(())
    }
}
