//! Randomized day filling from the catalog.
//!
//! A workout type maps to catalog categories. Their exercises are bucketed
//! by difficulty, each bucket is shuffled, and up to `per_difficulty`
//! items are taken from each tier in Beginner, Intermediate, Advanced order.

use crate::catalog::{Catalog, Difficulty};
use crate::regimen::{AddOptions, RegimenStore};
use crate::storage::Storage;
use crate::{DayKey, Error, RegimenItem, RegimenStoreRoot, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Items taken per difficulty tier unless configured otherwise
pub const DEFAULT_PER_DIFFICULTY: usize = 2;

/// Days covered by one cycle fill
pub const CYCLE_LENGTH: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkoutType {
    Push,
    Pull,
    Legs,
    Powerlifting,
    Calisthenics,
}

impl WorkoutType {
    pub const ALL: [WorkoutType; 5] = [
        WorkoutType::Push,
        WorkoutType::Pull,
        WorkoutType::Legs,
        WorkoutType::Powerlifting,
        WorkoutType::Calisthenics,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WorkoutType::Push => "Push",
            WorkoutType::Pull => "Pull",
            WorkoutType::Legs => "Legs",
            WorkoutType::Powerlifting => "Powerlifting",
            WorkoutType::Calisthenics => "Calisthenics",
        }
    }

    /// Catalog categories drawn from
    pub fn category_slugs(self) -> &'static [&'static str] {
        match self {
            WorkoutType::Push => &["chest", "triceps"],
            WorkoutType::Pull => &["back", "biceps", "forearms"],
            WorkoutType::Legs => &["legs", "abs"],
            WorkoutType::Powerlifting => &["powerlifting"],
            WorkoutType::Calisthenics => &["calisthenics"],
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WorkoutType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        WorkoutType::ALL
            .into_iter()
            .find(|w| w.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::Other(format!("Unknown workout type: {}", s)))
    }
}

/// Fixed three-phase sequence repeated over a cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleKind {
    /// Push / Pull / Legs
    Ppl,
    /// Powerlifting / Pull / Legs
    Powerlifting,
    /// Calisthenics / Pull / Legs
    Calisthenics,
}

impl CycleKind {
    pub fn phases(self) -> [WorkoutType; 3] {
        let lead = match self {
            CycleKind::Ppl => WorkoutType::Push,
            CycleKind::Powerlifting => WorkoutType::Powerlifting,
            CycleKind::Calisthenics => WorkoutType::Calisthenics,
        };
        [lead, WorkoutType::Pull, WorkoutType::Legs]
    }
}

impl FromStr for CycleKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ppl" | "push-pull-legs" => Ok(CycleKind::Ppl),
            "pl" | "powerlifting" => Ok(CycleKind::Powerlifting),
            "cal" | "calisthenics" => Ok(CycleKind::Calisthenics),
            _ => Err(Error::Other(format!("Unknown cycle: {}", s))),
        }
    }
}

/// Knobs for filling days
#[derive(Clone, Copy, Debug)]
pub struct QuickFillOptions {
    pub per_difficulty: usize,
    pub to_top: bool,
    pub skip_duplicates: bool,
}

impl Default for QuickFillOptions {
    fn default() -> Self {
        Self {
            per_difficulty: DEFAULT_PER_DIFFICULTY,
            to_top: true,
            skip_duplicates: true,
        }
    }
}

impl QuickFillOptions {
    fn add_options(&self) -> AddOptions {
        AddOptions {
            to_top: self.to_top,
            skip_duplicates: self.skip_duplicates,
        }
    }
}

/// Random selection for one workout.
///
/// Items carry the workout label as their category and the normalized
/// difficulty. Each `slug:id` appears at most once.
pub fn random_set_for<C, R>(
    catalog: &C,
    workout: WorkoutType,
    per_difficulty: usize,
    rng: &mut R,
) -> Vec<RegimenItem>
where
    C: Catalog + ?Sized,
    R: Rng + ?Sized,
{
    let mut seen = HashSet::new();
    let mut buckets: [Vec<RegimenItem>; 3] = Default::default();

    for slug in workout.category_slugs() {
        for exercise in catalog.exercises(slug) {
            if !seen.insert(format!("{}:{}", slug, exercise.id)) {
                continue;
            }
            let difficulty = Difficulty::normalize(&exercise.difficulty);
            buckets[difficulty as usize].push(RegimenItem {
                slug: slug.to_string(),
                id: exercise.id.clone(),
                name: exercise.name.clone(),
                category: workout.label().to_string(),
                difficulty: difficulty.as_str().to_string(),
                sets: None,
                reps: None,
                weight: None,
            });
        }
    }

    let mut picked = Vec::new();
    for mut bucket in buckets {
        bucket.shuffle(rng);
        picked.extend(bucket.into_iter().take(per_difficulty));
    }
    tracing::debug!("Picked {} exercises for {}", picked.len(), workout);
    picked
}

/// Fill one day of the active plan
pub fn quick_fill_day<S, C, R>(
    store: &RegimenStore<S>,
    catalog: &C,
    day: DayKey,
    workout: WorkoutType,
    options: QuickFillOptions,
    rng: &mut R,
) -> Result<RegimenStoreRoot>
where
    S: Storage,
    C: Catalog + ?Sized,
    R: Rng + ?Sized,
{
    let items = random_set_for(catalog, workout, options.per_difficulty, rng);
    if items.is_empty() {
        tracing::warn!("No exercises found for {}", workout);
        return store.read();
    }
    store.add_items_to_day(day, items, options.add_options())
}

/// Fill six consecutive buckets starting at `start`, cycling through the
/// phases of `cycle`. `Unassigned` is skipped when it falls in the window.
pub fn fill_cycle<S, C, R>(
    store: &RegimenStore<S>,
    catalog: &C,
    start: DayKey,
    cycle: CycleKind,
    options: QuickFillOptions,
    rng: &mut R,
) -> Result<RegimenStoreRoot>
where
    S: Storage,
    C: Catalog + ?Sized,
    R: Rng + ?Sized,
{
    let phases = cycle.phases();
    let mut day = start;
    let mut root = None;
    for i in 0..CYCLE_LENGTH {
        if day != DayKey::Unassigned {
            let workout = phases[i % phases.len()];
            let items = random_set_for(catalog, workout, options.per_difficulty, rng);
            if !items.is_empty() {
                root = Some(store.add_items_to_day(day, items, options.add_options())?);
            }
        }
        day = day.next();
    }
    tracing::info!("Filled {:?} cycle starting {}", cycle, start);
    match root {
        Some(root) => Ok(root),
        None => store.read(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{get_default_catalog, Category, Exercise, StaticCatalog};
    use crate::storage::MemoryStorage;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn exercise(id: &str, difficulty: &str) -> Exercise {
        Exercise {
            id: id.into(),
            name: id.to_uppercase(),
            difficulty: difficulty.into(),
            muscles: Vec::new(),
            equipment: String::new(),
            description: String::new(),
            tips: Vec::new(),
        }
    }

    fn push_catalog() -> StaticCatalog {
        let mut exercises = HashMap::new();
        exercises.insert(
            "chest".to_string(),
            vec![
                exercise("c1", "Beginner"),
                exercise("c2", "beginner"),
                exercise("c3", "Intermediate"),
                exercise("c4", "Advanced"),
                exercise("c5", "Expert"),
            ],
        );
        exercises.insert(
            "triceps".to_string(),
            vec![
                exercise("t1", "Intermediate"),
                exercise("t2", "Advanced"),
                exercise("t3", "Advanced"),
            ],
        );
        let categories = ["chest", "triceps"]
            .iter()
            .map(|s| Category {
                slug: s.to_string(),
                name: s.to_string(),
            })
            .collect();
        StaticCatalog::new(categories, exercises)
    }

    #[test]
    fn test_push_set_has_two_per_tier() {
        let catalog = push_catalog();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let set = random_set_for(&catalog, WorkoutType::Push, 2, &mut rng);
            assert_eq!(set.len(), 6);

            let tiers: Vec<&str> = set.iter().map(|i| i.difficulty.as_str()).collect();
            assert_eq!(
                tiers,
                vec!["Beginner", "Beginner", "Intermediate", "Intermediate", "Advanced", "Advanced"]
            );
            let keys: HashSet<String> = set.iter().map(RegimenItem::key_string).collect();
            assert_eq!(keys.len(), 6);
            assert!(set.iter().all(|i| i.category == "Push"));
        }
    }

    #[test]
    fn test_short_tiers_yield_fewer_items() {
        // Built-in powerlifting has no Beginner exercises
        let mut rng = StdRng::seed_from_u64(7);
        let set = random_set_for(get_default_catalog(), WorkoutType::Powerlifting, 2, &mut rng);
        assert_eq!(set.len(), 4);
        assert!(set.iter().all(|i| i.slug == "powerlifting"));

        let empty = StaticCatalog::default();
        assert!(random_set_for(&empty, WorkoutType::Pull, 2, &mut rng).is_empty());
    }

    #[test]
    fn test_shuffle_varies_with_seed() {
        let catalog = get_default_catalog();
        let picks: HashSet<Vec<String>> = (0..10)
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                random_set_for(catalog, WorkoutType::Pull, 2, &mut rng)
                    .iter()
                    .map(RegimenItem::key_string)
                    .collect()
            })
            .collect();
        assert!(picks.len() > 1);
    }

    #[test]
    fn test_quick_fill_day_skips_existing() {
        let storage = MemoryStorage::new();
        let store = RegimenStore::new(&storage);
        let catalog = push_catalog();
        let mut rng = StdRng::seed_from_u64(1);

        let options = QuickFillOptions::default();
        quick_fill_day(&store, &catalog, DayKey::Monday, WorkoutType::Push, options, &mut rng).unwrap();
        // Only 8 distinct push exercises exist in this catalog
        let root = quick_fill_day(&store, &catalog, DayKey::Monday, WorkoutType::Push, options, &mut rng)
            .unwrap();
        let monday = root.active_plan().days.get(DayKey::Monday);
        let keys: HashSet<String> = monday.iter().map(RegimenItem::key_string).collect();
        assert_eq!(keys.len(), monday.len());
        assert!(monday.len() <= 8);
    }

    #[test]
    fn test_fill_cycle_from_wednesday() {
        let storage = MemoryStorage::new();
        let store = RegimenStore::new(&storage);
        let mut rng = StdRng::seed_from_u64(3);

        let root = fill_cycle(
            &store,
            get_default_catalog(),
            DayKey::Wednesday,
            CycleKind::Ppl,
            QuickFillOptions::default(),
            &mut rng,
        )
        .unwrap();
        let days = &root.active_plan().days;

        // Window is Wednesday..Unassigned; the Unassigned slot is skipped
        let expected = [
            (DayKey::Wednesday, "Push"),
            (DayKey::Thursday, "Pull"),
            (DayKey::Friday, "Legs"),
            (DayKey::Saturday, "Push"),
            (DayKey::Sunday, "Pull"),
        ];
        for (day, label) in expected {
            let items = days.get(day);
            assert!(!items.is_empty(), "{} should be filled", day);
            assert!(items.iter().all(|i| i.category == label), "{}", day);
        }
        assert!(days.get(DayKey::Monday).is_empty());
        assert!(days.get(DayKey::Tuesday).is_empty());
        assert!(days.get(DayKey::Unassigned).is_empty());
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("push".parse::<WorkoutType>().unwrap(), WorkoutType::Push);
        assert!("cardio".parse::<WorkoutType>().is_err());
        assert_eq!("PPL".parse::<CycleKind>().unwrap(), CycleKind::Ppl);
        assert_eq!(
            CycleKind::Calisthenics.phases(),
            [WorkoutType::Calisthenics, WorkoutType::Pull, WorkoutType::Legs]
        );
    }
}
