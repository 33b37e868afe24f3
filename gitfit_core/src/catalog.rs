//! Exercise catalog.
//!
//! The catalog is read-only reference data: category slugs mapping to
//! exercise records. Stores copy what they need from it at insertion time
//! and never depend on it afterwards.

use crate::{Error, ExerciseKey, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

/// Cached built-in catalog, parsed once from the embedded JSON
static DEFAULT_CATALOG: Lazy<StaticCatalog> = Lazy::new(|| {
    StaticCatalog::from_json(include_str!("../data/catalog.json")).unwrap_or_else(|e| {
        tracing::error!("Built-in catalog failed to parse: {}", e);
        StaticCatalog::default()
    })
});

/// Get a reference to the built-in catalog
pub fn get_default_catalog() -> &'static StaticCatalog {
    &DEFAULT_CATALOG
}

/// Difficulty tier of an exercise
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    /// Strict parse of a catalog difficulty label (case-insensitive)
    pub fn parse(s: &str) -> Option<Difficulty> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Lenient bucketing: `beg*`, `int*` and `adv*` prefixes are
    /// recognized, anything else counts as Beginner
    pub fn normalize(s: &str) -> Difficulty {
        let lower = s.trim().to_ascii_lowercase();
        if lower.starts_with("adv") {
            Difficulty::Advanced
        } else if lower.starts_with("int") {
            Difficulty::Intermediate
        } else {
            Difficulty::Beginner
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog exercise
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub difficulty: String,
    #[serde(default)]
    pub muscles: Vec<String>,
    #[serde(default)]
    pub equipment: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tips: Vec<String>,
}

/// Category shown in listings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub name: String,
}

/// Read-only exercise lookup by category slug
pub trait Catalog {
    /// Categories in display order
    fn categories(&self) -> &[Category];

    /// Exercises of a category in catalog order; unknown slugs are empty
    fn exercises(&self, slug: &str) -> &[Exercise];

    /// Exercises sorted Beginner, Intermediate, Advanced, then by name
    fn get_exercises(&self, slug: &str) -> Vec<&Exercise> {
        let mut list: Vec<&Exercise> = self.exercises(slug).iter().collect();
        list.sort_by(|a, b| {
            Difficulty::normalize(&a.difficulty)
                .cmp(&Difficulty::normalize(&b.difficulty))
                .then_with(|| a.name.cmp(&b.name))
        });
        list
    }

    fn lookup(&self, key: &ExerciseKey) -> Option<&Exercise> {
        self.exercises(key.slug())
            .iter()
            .find(|e| e.id == key.exercise_id())
    }

    fn category(&self, slug: &str) -> Option<&Category> {
        self.categories().iter().find(|c| c.slug == slug)
    }
}

/// Catalog held fully in memory
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StaticCatalog {
    categories: Vec<Category>,
    exercises: HashMap<String, Vec<Exercise>>,
}

impl StaticCatalog {
    pub fn new(categories: Vec<Category>, exercises: HashMap<String, Vec<Exercise>>) -> Self {
        Self {
            categories,
            exercises,
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a replacement catalog from a JSON file, rejecting invalid data
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&contents)?;
        let problems = catalog.validate();
        if !problems.is_empty() {
            return Err(Error::CatalogValidation(problems.join("; ")));
        }
        tracing::info!(
            "Loaded catalog from {:?} ({} categories)",
            path,
            catalog.categories.len()
        );
        Ok(catalog)
    }

    /// Check the catalog for consistency.
    ///
    /// Returns a list of human-readable problems; empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.categories.is_empty() {
            errors.push("Catalog has no categories".to_string());
        }

        let mut slugs = HashSet::new();
        for category in &self.categories {
            if category.slug.is_empty() || category.slug.contains(':') {
                errors.push(format!("Category slug {:?} is invalid", category.slug));
            }
            if !slugs.insert(category.slug.as_str()) {
                errors.push(format!("Category '{}' is listed twice", category.slug));
            }
        }

        let mut exercise_slugs: Vec<&String> = self.exercises.keys().collect();
        exercise_slugs.sort();
        for slug in exercise_slugs {
            if !slugs.contains(slug.as_str()) {
                errors.push(format!("Exercises listed under unknown category '{}'", slug));
            }

            let mut ids = HashSet::new();
            for exercise in &self.exercises[slug] {
                if exercise.id.is_empty() || exercise.id.contains(':') {
                    errors.push(format!("Exercise id {:?} in '{}' is invalid", exercise.id, slug));
                }
                if !ids.insert(exercise.id.as_str()) {
                    errors.push(format!("Exercise '{}:{}' is listed twice", slug, exercise.id));
                }
                if exercise.name.trim().is_empty() {
                    errors.push(format!("Exercise '{}:{}' has empty name", slug, exercise.id));
                }
                if Difficulty::parse(&exercise.difficulty).is_none() {
                    errors.push(format!(
                        "Exercise '{}:{}' has unknown difficulty '{}'",
                        slug, exercise.id, exercise.difficulty
                    ));
                }
            }
        }

        errors
    }
}

impl Catalog for StaticCatalog {
    fn categories(&self) -> &[Category] {
        &self.categories
    }

    fn exercises(&self, slug: &str) -> &[Exercise] {
        self.exercises.get(slug).map(Vec::as_slice).unwrap_or(&[])
    }
}
