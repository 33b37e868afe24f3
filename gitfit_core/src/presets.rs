//! Ready-made weekly regimens.
//!
//! A preset is a fixed list of day assignments. Applying one clears the
//! active plan and fills it with the entries the catalog knows about;
//! entries missing from the catalog are skipped.

use crate::catalog::{Catalog, Difficulty};
use crate::regimen::RegimenStore;
use crate::storage::Storage;
use crate::types::DayKey::{Friday, Monday, Thursday, Tuesday, Wednesday};
use crate::{DayKey, Error, ExerciseKey, RegimenItem, RegimenStoreRoot, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    /// Push / Pull / Legs over three days
    Ppl,
    /// Upper / Lower over four days
    UpperLower,
    /// One muscle group per day, five days
    Bro5,
    /// Bodyweight, three days
    Calisthenics3,
    /// Competition lifts, three days
    Powerlifting3,
}

const PPL: &[(DayKey, &str, &str)] = &[
    (Monday, "chest", "bench-press"),
    (Monday, "triceps", "pushdown"),
    (Monday, "chest", "incline-db-press"),
    (Wednesday, "back", "barbell-row"),
    (Wednesday, "back", "lat-pulldown"),
    (Wednesday, "biceps", "db-curl"),
    (Friday, "legs", "back-squat"),
    (Friday, "legs", "rdl"),
    (Friday, "abs", "plank"),
];

const UPPER_LOWER: &[(DayKey, &str, &str)] = &[
    (Monday, "chest", "bench-press"),
    (Monday, "back", "barbell-row"),
    (Monday, "biceps", "db-curl"),
    (Monday, "triceps", "pushdown"),
    (Tuesday, "legs", "back-squat"),
    (Tuesday, "legs", "rdl"),
    (Tuesday, "abs", "crunch"),
    (Thursday, "chest", "incline-db-press"),
    (Thursday, "back", "lat-pulldown"),
    (Thursday, "biceps", "hammer-curl"),
    (Thursday, "triceps", "oh-db-ext"),
    (Friday, "legs", "front-squat"),
    (Friday, "legs", "hip-thrust"),
    (Friday, "abs", "reverse-crunch"),
];

const BRO5: &[(DayKey, &str, &str)] = &[
    (Monday, "chest", "bench-press"),
    (Monday, "chest", "cable-crossover"),
    (Tuesday, "back", "barbell-row"),
    (Tuesday, "back", "face-pull"),
    (Wednesday, "legs", "back-squat"),
    (Wednesday, "legs", "leg-press"),
    (Thursday, "triceps", "skullcrusher"),
    (Thursday, "biceps", "ez-bar-curl"),
    (Friday, "abs", "plank"),
    (Friday, "cardio", "incline-walk"),
];

const CALISTHENICS3: &[(DayKey, &str, &str)] = &[
    (Monday, "calisthenics", "cal-pushup"),
    (Monday, "calisthenics", "cal-row"),
    (Monday, "abs", "hanging-leg-raise"),
    (Wednesday, "calisthenics", "cal-pullup"),
    (Wednesday, "calisthenics", "cal-dip"),
    (Wednesday, "calisthenics", "cal-hollow"),
    (Friday, "calisthenics", "cal-pistol"),
    (Friday, "calisthenics", "cal-handstand"),
    (Friday, "abs", "side-plank"),
];

const POWERLIFTING3: &[(DayKey, &str, &str)] = &[
    (Monday, "powerlifting", "pl-back-squat"),
    (Monday, "powerlifting", "pl-row"),
    (Monday, "abs", "dead-bug"),
    (Wednesday, "powerlifting", "pl-bench"),
    (Wednesday, "powerlifting", "pl-ohp"),
    (Wednesday, "triceps", "close-grip-bench"),
    (Friday, "powerlifting", "pl-deadlift"),
    (Friday, "legs", "calf-raise-stand"),
    (Friday, "back", "face-pull"),
];

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Ppl,
        Preset::UpperLower,
        Preset::Bro5,
        Preset::Calisthenics3,
        Preset::Powerlifting3,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Preset::Ppl => "PPL (3-day)",
            Preset::UpperLower => "Upper/Lower (4-day)",
            Preset::Bro5 => "Bro Split (5-day)",
            Preset::Calisthenics3 => "Calisthenics (3-day)",
            Preset::Powerlifting3 => "Powerlifting (3-day)",
        }
    }

    /// Short name accepted on the command line
    pub fn name(self) -> &'static str {
        match self {
            Preset::Ppl => "ppl",
            Preset::UpperLower => "upper-lower",
            Preset::Bro5 => "bro5",
            Preset::Calisthenics3 => "cali3",
            Preset::Powerlifting3 => "pl3",
        }
    }

    /// Day assignments as `(day, slug, exercise id)`
    pub fn entries(self) -> &'static [(DayKey, &'static str, &'static str)] {
        match self {
            Preset::Ppl => PPL,
            Preset::UpperLower => UPPER_LOWER,
            Preset::Bro5 => BRO5,
            Preset::Calisthenics3 => CALISTHENICS3,
            Preset::Powerlifting3 => POWERLIFTING3,
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['_', '/', ' '], "-").as_str() {
            "ppl" => Ok(Preset::Ppl),
            "upper-lower" | "ul" => Ok(Preset::UpperLower),
            "bro5" | "bro" | "bro-split" => Ok(Preset::Bro5),
            "cali3" | "calisthenics" => Ok(Preset::Calisthenics3),
            "pl3" | "powerlifting" => Ok(Preset::Powerlifting3),
            _ => Err(Error::Other(format!("Unknown preset: {}", s))),
        }
    }
}

/// Resolve a preset's entries against the catalog, in order.
///
/// Entries whose exercise is not in the catalog are dropped.
pub fn preset_items<C>(catalog: &C, preset: Preset) -> Vec<(DayKey, RegimenItem)>
where
    C: Catalog + ?Sized,
{
    preset
        .entries()
        .iter()
        .filter_map(|&(day, slug, id)| {
            let key = ExerciseKey::new(slug, id);
            let Some(exercise) = catalog.lookup(&key) else {
                tracing::debug!("Preset {} skips unknown exercise {}", preset.name(), key);
                return None;
            };
            let category = catalog
                .category(slug)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| slug.to_string());
            let item = RegimenItem {
                slug: slug.to_string(),
                id: id.to_string(),
                name: exercise.name.clone(),
                category,
                difficulty: Difficulty::normalize(&exercise.difficulty).as_str().to_string(),
                sets: None,
                reps: None,
                weight: None,
            };
            Some((day, item))
        })
        .collect()
}

/// Replace the active plan's contents with a preset
pub fn apply_preset<S, C>(
    store: &RegimenStore<S>,
    catalog: &C,
    preset: Preset,
) -> Result<RegimenStoreRoot>
where
    S: Storage,
    C: Catalog + ?Sized,
{
    let items = preset_items(catalog, preset);
    let count = items.len();
    let root = store.save_active_plan(|plan| {
        plan.days.clear();
        for (day, item) in items {
            plan.days.get_mut(day).push(item);
        }
    })?;
    tracing::info!("Applied preset {} ({} exercises)", preset.name(), count);
    Ok(root)
}
