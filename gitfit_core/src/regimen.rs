//! Multi-plan weekly regimen store.
//!
//! State lives in the `regimen_v2` document as `{ plans, activeId }`. The
//! legacy single-plan `regimen_v1` day map is read once as a migration
//! source when no usable current document exists. Plans only change through
//! [`RegimenStore::save_active_plan`] or the plan-level operations, each of
//! which re-reads storage, works on a copy, and writes the whole document.

use crate::schema::{decode_regimen, RawPlan, StoredRegimen};
use crate::storage::{Storage, LEGACY_REGIMEN_DOC, REGIMEN_DOC};
use crate::types::new_id;
use crate::{DayKey, Error, RegimenItem, RegimenPlan, RegimenStoreRoot, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Direction for [`RegimenStore::reorder_item`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    fn apply(self, index: usize) -> Option<usize> {
        match self {
            Direction::Up => index.checked_sub(1),
            Direction::Down => index.checked_add(1),
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "-1" => Ok(Direction::Up),
            "down" | "1" | "+1" => Ok(Direction::Down),
            _ => Err(Error::Other(format!("Unknown direction: {}", s))),
        }
    }
}

/// Options for inserting several items into one day
#[derive(Clone, Copy, Debug)]
pub struct AddOptions {
    /// Insert at the head of the day instead of the tail
    pub to_top: bool,
    /// Leave out items whose `slug:id` is already in that day
    pub skip_duplicates: bool,
}

impl Default for AddOptions {
    fn default() -> Self {
        Self {
            to_top: true,
            skip_duplicates: true,
        }
    }
}

/// How imported plans combine with the stored ones
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegimenImportStrategy {
    /// Keep current plans and the active selection, add the imported plans
    #[default]
    Append,
    /// Replace every plan with the imported ones
    ReplaceAll,
    /// Swap the active plan for the first imported plan, append the rest
    ReplaceActive,
}

impl FromStr for RegimenImportStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "append" => Ok(Self::Append),
            "replaceall" => Ok(Self::ReplaceAll),
            "replaceactive" => Ok(Self::ReplaceActive),
            _ => Err(Error::Other(format!("Unknown regimen import strategy: {}", s))),
        }
    }
}

impl fmt::Display for RegimenImportStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Append => "append",
            Self::ReplaceAll => "replaceAll",
            Self::ReplaceActive => "replaceActive",
        })
    }
}

/// Plans decoded from an interchange file
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportedRegimen {
    pub active_id: Option<String>,
    pub plans: Vec<RegimenPlan>,
}

pub struct RegimenStore<S> {
    storage: S,
}

impl<S: Storage> RegimenStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Read the store, migrating older shapes.
    ///
    /// 1. A current document has every plan normalized; it is rewritten
    ///    only if some plan needed it.
    /// 2. Otherwise a legacy day map becomes a single plan.
    /// 3. Otherwise a fresh default plan is created.
    pub fn read(&self) -> Result<RegimenStoreRoot> {
        let current = self.storage.read(REGIMEN_DOC)?;
        let legacy = self.storage.read(LEGACY_REGIMEN_DOC)?;

        match decode_regimen(current.as_deref(), legacy.as_deref()) {
            StoredRegimen::MultiPlan { plans, active_id } => {
                let needs_write = plans.is_empty() || plans.iter().any(RawPlan::needs_migration);
                let plans: Vec<RegimenPlan> = plans.into_iter().map(RegimenPlan::from).collect();
                let root = RegimenStoreRoot::new(plans, active_id);
                if needs_write {
                    tracing::info!("Normalized regimen plans; rewriting store");
                    self.write(&root)?;
                }
                Ok(root)
            }
            StoredRegimen::SinglePlan(raw) => {
                let plan = RegimenPlan::from(raw);
                tracing::info!(
                    "Migrated legacy regimen ({} items) into plan {}",
                    plan.days.total_items(),
                    plan.id
                );
                let active_id = plan.id.clone();
                let root = RegimenStoreRoot::new(vec![plan], active_id);
                self.write(&root)?;
                Ok(root)
            }
            StoredRegimen::Empty => {
                let root = RegimenStoreRoot::fresh();
                tracing::info!("Created fresh regimen store");
                self.write(&root)?;
                Ok(root)
            }
        }
    }

    fn write(&self, root: &RegimenStoreRoot) -> Result<()> {
        let contents = serde_json::to_string(root)?;
        self.storage.write(REGIMEN_DOC, &contents)?;
        tracing::debug!("Saved regimen store ({} plans)", root.plans().len());
        Ok(())
    }

    fn commit(&self, plans: Vec<RegimenPlan>, active_id: String) -> Result<RegimenStoreRoot> {
        let root = RegimenStoreRoot::new(plans, active_id);
        self.write(&root)?;
        Ok(root)
    }

    /// Active plan, falling back to the first plan
    pub fn get_active_plan(&self) -> Result<RegimenPlan> {
        Ok(self.read()?.active_plan().clone())
    }

    /// Run `mutator` on a copy of the active plan and store the result in
    /// its place. The plan keeps its id whatever the mutator does.
    pub fn save_active_plan<F>(&self, mutator: F) -> Result<RegimenStoreRoot>
    where
        F: FnOnce(&mut RegimenPlan),
    {
        let root = self.read()?;
        let mut plan = root.active_plan().clone();
        let plan_id = plan.id.clone();
        mutator(&mut plan);
        plan.id = plan_id;

        let (mut plans, active_id) = root.into_parts();
        if let Some(slot) = plans.iter_mut().find(|p| p.id == plan.id) {
            *slot = plan;
        }
        self.commit(plans, active_id)
    }

    // ------------------------------------------------------------------
    // Plan-level operations
    // ------------------------------------------------------------------

    /// New empty plan placed first and made active
    pub fn create_plan(&self, name: &str) -> Result<RegimenStoreRoot> {
        let name = name.trim();
        let plan = if name.is_empty() {
            RegimenPlan::default_plan()
        } else {
            RegimenPlan::new(name)
        };
        tracing::info!("Creating plan {} ({})", plan.name, plan.id);

        let (mut plans, _) = self.read()?.into_parts();
        let active_id = plan.id.clone();
        plans.insert(0, plan);
        self.commit(plans, active_id)
    }

    /// Copy of the active plan under a new id, placed first and made active.
    /// Defaults the name to `"<name> (copy)"`.
    pub fn duplicate_current_plan(&self, name: Option<&str>) -> Result<RegimenStoreRoot> {
        let root = self.read()?;
        let mut copy = root.active_plan().clone();
        copy.id = new_id("plan");
        copy.name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(n) => n.to_string(),
            None => format!("{} (copy)", copy.name),
        };
        tracing::info!("Duplicated plan into {} ({})", copy.name, copy.id);

        let (mut plans, _) = root.into_parts();
        let active_id = copy.id.clone();
        plans.insert(0, copy);
        self.commit(plans, active_id)
    }

    /// Blank names and unknown ids leave the store unchanged
    pub fn rename_plan(&self, id: &str, name: &str) -> Result<RegimenStoreRoot> {
        let root = self.read()?;
        let name = name.trim();
        if name.is_empty() || root.plan(id).is_none() {
            return Ok(root);
        }

        let (mut plans, active_id) = root.into_parts();
        for plan in plans.iter_mut().filter(|p| p.id == id) {
            plan.name = name.to_string();
        }
        self.commit(plans, active_id)
    }

    /// Remove a plan.
    ///
    /// Deleting the last plan leaves a fresh default plan. Deleting the
    /// active plan makes the first remaining plan active.
    pub fn delete_plan(&self, id: &str) -> Result<RegimenStoreRoot> {
        let root = self.read()?;
        if root.plan(id).is_none() {
            tracing::debug!("delete_plan: no plan {}", id);
            return Ok(root);
        }
        let was_active = root.active_plan().id == id;

        let (mut plans, mut active_id) = root.into_parts();
        plans.retain(|p| p.id != id);
        if was_active {
            active_id = plans.first().map(|p| p.id.clone()).unwrap_or_default();
        }
        tracing::info!("Deleted plan {}", id);
        self.commit(plans, active_id)
    }

    /// Select the active plan; unknown ids are ignored
    pub fn set_active_plan(&self, id: &str) -> Result<RegimenStoreRoot> {
        let root = self.read()?;
        if root.plan(id).is_none() {
            tracing::warn!("set_active_plan: no plan {}", id);
            return Ok(root);
        }
        let (plans, _) = root.into_parts();
        self.commit(plans, id.to_string())
    }

    // ------------------------------------------------------------------
    // Item operations on the active plan
    // ------------------------------------------------------------------

    /// Insert one item. Unrecognized day names go to `Unassigned`.
    pub fn add_exercise_to_day(
        &self,
        item: RegimenItem,
        day: &str,
        to_top: bool,
    ) -> Result<RegimenStoreRoot> {
        let day = DayKey::parse_or_unassigned(day);
        self.save_active_plan(|plan| {
            let list = plan.days.get_mut(day);
            if to_top {
                list.insert(0, item);
            } else {
                list.push(item);
            }
        })
    }

    /// Insert several items into one day, keeping their relative order
    pub fn add_items_to_day(
        &self,
        day: DayKey,
        items: Vec<RegimenItem>,
        options: AddOptions,
    ) -> Result<RegimenStoreRoot> {
        self.save_active_plan(|plan| {
            let list = plan.days.get_mut(day);
            let existing: HashSet<String> = list.iter().map(RegimenItem::key_string).collect();
            let incoming: Vec<RegimenItem> = items
                .into_iter()
                .filter(|item| !options.skip_duplicates || !existing.contains(&item.key_string()))
                .collect();
            tracing::debug!("Adding {} items to {}", incoming.len(), day);
            if options.to_top {
                list.splice(0..0, incoming);
            } else {
                list.extend(incoming);
            }
        })
    }

    /// Move an item between (or within) days. The destination index is
    /// clamped; an out-of-range source index is a no-op.
    pub fn move_item(
        &self,
        from_day: DayKey,
        from_index: usize,
        to_day: DayKey,
        to_index: usize,
    ) -> Result<RegimenStoreRoot> {
        self.save_active_plan(|plan| {
            if from_index >= plan.days.get(from_day).len() {
                return;
            }
            let item = plan.days.get_mut(from_day).remove(from_index);
            let target = plan.days.get_mut(to_day);
            let at = to_index.min(target.len());
            target.insert(at, item);
        })
    }

    /// Swap an item with its neighbour; no-op at either end
    pub fn reorder_item(
        &self,
        day: DayKey,
        index: usize,
        direction: Direction,
    ) -> Result<RegimenStoreRoot> {
        self.save_active_plan(|plan| {
            let list = plan.days.get_mut(day);
            match direction.apply(index) {
                Some(j) if index < list.len() && j < list.len() => list.swap(index, j),
                _ => {}
            }
        })
    }

    pub fn remove_item(&self, day: DayKey, index: usize) -> Result<RegimenStoreRoot> {
        self.save_active_plan(|plan| {
            let list = plan.days.get_mut(day);
            if index < list.len() {
                list.remove(index);
            }
        })
    }

    pub fn clear_day(&self, day: DayKey) -> Result<RegimenStoreRoot> {
        self.save_active_plan(|plan| plan.days.get_mut(day).clear())
    }

    /// Empty all eight days of the active plan
    pub fn clear_plan(&self) -> Result<RegimenStoreRoot> {
        self.save_active_plan(|plan| plan.days.clear())
    }

    // ------------------------------------------------------------------
    // Import
    // ------------------------------------------------------------------

    /// Merge imported plans.
    ///
    /// Incoming ids that collide with a kept plan (or repeat within the
    /// import) are replaced with fresh ids.
    pub fn import_plans(
        &self,
        imported: ImportedRegimen,
        strategy: RegimenImportStrategy,
    ) -> Result<RegimenStoreRoot> {
        let current = self.read()?;
        let effective_active = current.active_plan().id.clone();
        let (current_plans, current_active) = current.into_parts();

        let mut taken: HashSet<String> = match strategy {
            RegimenImportStrategy::ReplaceAll => HashSet::new(),
            _ => current_plans.iter().map(|p| p.id.clone()).collect(),
        };

        let mut incoming_active = None;
        let mut incoming = Vec::with_capacity(imported.plans.len());
        for mut plan in imported.plans {
            let original_id = plan.id.clone();
            if !taken.insert(plan.id.clone()) {
                plan.id = new_id("plan");
                taken.insert(plan.id.clone());
                tracing::debug!("Imported plan id {} collided; now {}", original_id, plan.id);
            }
            if incoming_active.is_none() && imported.active_id.as_deref() == Some(original_id.as_str()) {
                incoming_active = Some(plan.id.clone());
            }
            incoming.push(plan);
        }
        let count = incoming.len();

        let root = match strategy {
            RegimenImportStrategy::ReplaceAll => {
                let active_id = incoming_active
                    .or_else(|| incoming.first().map(|p| p.id.clone()))
                    .unwrap_or_default();
                self.commit(incoming, active_id)?
            }
            RegimenImportStrategy::ReplaceActive => {
                let mut rest = incoming.into_iter();
                let first = rest.next().unwrap_or_else(RegimenPlan::default_plan);
                let active_id = first.id.clone();
                let mut first = Some(first);
                let mut plans: Vec<RegimenPlan> = current_plans
                    .into_iter()
                    .map(|p| match first.take() {
                        Some(replacement) if p.id == effective_active => replacement,
                        other => {
                            first = other;
                            p
                        }
                    })
                    .collect();
                if let Some(unplaced) = first {
                    plans.insert(0, unplaced);
                }
                plans.extend(rest);
                self.commit(plans, active_id)?
            }
            RegimenImportStrategy::Append => {
                let mut plans = current_plans;
                plans.extend(incoming);
                self.commit(plans, current_active)?
            }
        };

        tracing::info!("Imported {} plans ({})", count, strategy);
        Ok(root)
    }
}
