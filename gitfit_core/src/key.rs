//! Composite `slug:id` identifier joining stored records to the catalog.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reference to one catalog exercise, serialized as `"<categorySlug>:<exerciseId>"`.
///
/// Only the first `:` separates the parts, so exercise ids may themselves
/// contain colons.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExerciseKey {
    slug: String,
    exercise_id: String,
}

impl ExerciseKey {
    pub fn new(slug: impl Into<String>, exercise_id: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            exercise_id: exercise_id.into(),
        }
    }

    /// Category slug, e.g. `abs`
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Exercise id within the category, e.g. `crunch`
    pub fn exercise_id(&self) -> &str {
        &self.exercise_id
    }

    /// Cheap shape test used by the legacy `deleteNote` adapter.
    pub fn looks_like_key(s: &str) -> bool {
        s.contains(':')
    }
}

impl fmt::Display for ExerciseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.slug, self.exercise_id)
    }
}

impl FromStr for ExerciseKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (slug, exercise_id) = s
            .split_once(':')
            .ok_or_else(|| Error::Key(format!("'{}' has no ':' separator", s)))?;
        if slug.is_empty() || exercise_id.is_empty() {
            return Err(Error::Key(format!("'{}' has an empty slug or id", s)));
        }
        Ok(Self::new(slug, exercise_id))
    }
}

impl TryFrom<String> for ExerciseKey {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ExerciseKey> for String {
    fn from(key: ExerciseKey) -> Self {
        key.to_string()
    }
}
