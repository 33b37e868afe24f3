//! Core domain types for GitFit.
//!
//! This module defines the records the stores persist:
//! - Progress notes attached to exercises
//! - Regimen plans, day buckets and their items
//! - Import parse results

use crate::ExerciseKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Generate an opaque record id such as `note_3f2a...`
pub fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

/// Parse a user-entered numeric field.
///
/// Blank or unparseable input is absent, never zero or NaN.
pub fn parse_numeric(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Best-effort timestamp parsing for imported and legacy data.
///
/// Accepts RFC 3339, epoch milliseconds, and a few plain date layouts
/// (interpreted as UTC).
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(millis) = s.parse::<i64>() {
        return DateTime::from_timestamp_millis(millis);
    }
    const LAYOUTS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];
    for layout in LAYOUTS {
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, layout) {
            return Some(naive.and_utc());
        }
    }
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Serde helpers accepting either RFC 3339 strings or epoch milliseconds
pub(crate) mod flexible_time {
    use chrono::{DateTime, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Millis(i64),
        Float(f64),
        Text(String),
    }

    impl Repr {
        fn into_datetime(self) -> Option<DateTime<Utc>> {
            match self {
                Repr::Millis(ms) => DateTime::from_timestamp_millis(ms),
                Repr::Float(ms) => DateTime::from_timestamp_millis(ms as i64),
                Repr::Text(s) => super::parse_timestamp(&s),
            }
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Repr::deserialize(deserializer)?
            .into_datetime()
            .ok_or_else(|| D::Error::custom("unrecognized timestamp"))
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Repr>::deserialize(deserializer)?.and_then(Repr::into_datetime))
    }
}

// ============================================================================
// Notes
// ============================================================================

/// One progress-log entry for an exercise.
///
/// Notes are events: several may exist per exercise, newest first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub key: ExerciseKey,
    /// Display label copied at creation time; may go stale
    #[serde(default)]
    pub exercise_name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<f64>,
    #[serde(deserialize_with = "flexible_time::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "flexible_time::deserialize_option"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Regimen
// ============================================================================

/// Day bucket of a regimen plan
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DayKey {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
    Unassigned,
}

impl DayKey {
    /// All buckets in display order
    pub const ALL: [DayKey; 8] = [
        DayKey::Monday,
        DayKey::Tuesday,
        DayKey::Wednesday,
        DayKey::Thursday,
        DayKey::Friday,
        DayKey::Saturday,
        DayKey::Sunday,
        DayKey::Unassigned,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DayKey::Monday => "Monday",
            DayKey::Tuesday => "Tuesday",
            DayKey::Wednesday => "Wednesday",
            DayKey::Thursday => "Thursday",
            DayKey::Friday => "Friday",
            DayKey::Saturday => "Saturday",
            DayKey::Sunday => "Sunday",
            DayKey::Unassigned => "Unassigned",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Exact full-name match, as stored in current documents
    pub fn from_full_name(s: &str) -> Option<DayKey> {
        DayKey::ALL.into_iter().find(|d| d.as_str() == s)
    }

    /// Legacy abbreviated weekday keys (`Mon` .. `Sun`)
    pub fn from_short_name(s: &str) -> Option<DayKey> {
        match s {
            "Mon" => Some(DayKey::Monday),
            "Tue" => Some(DayKey::Tuesday),
            "Wed" => Some(DayKey::Wednesday),
            "Thu" => Some(DayKey::Thursday),
            "Fri" => Some(DayKey::Friday),
            "Sat" => Some(DayKey::Saturday),
            "Sun" => Some(DayKey::Sunday),
            _ => None,
        }
    }

    /// Unknown day names fall back to `Unassigned`
    pub fn parse_or_unassigned(s: &str) -> DayKey {
        s.parse().unwrap_or(DayKey::Unassigned)
    }

    /// Next bucket, wrapping from `Unassigned` to `Monday`
    pub fn next(self) -> DayKey {
        DayKey::ALL[(self.index() + 1) % DayKey::ALL.len()]
    }

    /// Previous bucket, wrapping from `Monday` to `Unassigned`
    pub fn prev(self) -> DayKey {
        DayKey::ALL[(self.index() + DayKey::ALL.len() - 1) % DayKey::ALL.len()]
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayKey {
    type Err = crate::Error;

    /// Case-insensitive full or abbreviated names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        DayKey::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(trimmed))
            .or_else(|| {
                DayKey::ALL[..7]
                    .iter()
                    .copied()
                    .find(|d| d.as_str()[..3].eq_ignore_ascii_case(trimmed))
            })
            .ok_or_else(|| crate::Error::Other(format!("Unknown day: {}", s)))
    }
}

/// Target value on a regimen item; edited as text, often numeric
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    Number(f64),
    Text(String),
}

impl Target {
    /// Blank input is absent; numeric text becomes a number
    pub fn from_input(input: &str) -> Option<Target> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(match parse_numeric(trimmed) {
            Some(n) => Target::Number(n),
            None => Target::Text(trimmed.to_string()),
        })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Number(n) => write!(f, "{}", n),
            Target::Text(s) => f.write_str(s),
        }
    }
}

/// Snapshot of a catalog exercise placed in a plan day
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegimenItem {
    pub slug: String,
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<Target>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<Target>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Target>,
}

impl RegimenItem {
    /// `slug:id` identity used for duplicate detection
    pub fn key_string(&self) -> String {
        format!("{}:{}", self.slug, self.id)
    }
}

/// The eight day buckets of a plan.
///
/// Every bucket always exists; a missing day cannot be represented.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Days([Vec<RegimenItem>; 8]);

impl Days {
    pub fn get(&self, day: DayKey) -> &[RegimenItem] {
        &self.0[day.index()]
    }

    pub fn get_mut(&mut self, day: DayKey) -> &mut Vec<RegimenItem> {
        &mut self.0[day.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (DayKey, &[RegimenItem])> {
        DayKey::ALL.into_iter().map(move |d| (d, self.get(d)))
    }

    pub fn total_items(&self) -> usize {
        self.0.iter().map(Vec::len).sum()
    }

    pub fn clear(&mut self) {
        for list in &mut self.0 {
            list.clear();
        }
    }
}

impl Serialize for Days {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(DayKey::ALL.len()))?;
        for (day, items) in self.iter() {
            map.serialize_entry(day.as_str(), items)?;
        }
        map.end()
    }
}

/// A named weekly plan.
///
/// Deserialization goes through the schema layer, which migrates
/// abbreviated day keys and fills missing days.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "crate::schema::RawPlan")]
pub struct RegimenPlan {
    pub id: String,
    pub name: String,
    pub days: Days,
}

/// Name given to synthesized plans
pub const DEFAULT_PLAN_NAME: &str = "My Plan";

impl RegimenPlan {
    /// Empty plan with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id("plan"),
            name: name.into(),
            days: Days::default(),
        }
    }

    pub fn default_plan() -> Self {
        Self::new(DEFAULT_PLAN_NAME)
    }
}

/// All plans plus the active selection.
///
/// `plans` is never empty; a default plan is synthesized when needed.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegimenStoreRoot {
    plans: Vec<RegimenPlan>,
    active_id: String,
}

impl RegimenStoreRoot {
    /// Build a root, synthesizing a default plan for an empty list
    pub fn new(mut plans: Vec<RegimenPlan>, active_id: impl Into<String>) -> Self {
        let mut active_id = active_id.into();
        if plans.is_empty() {
            let plan = RegimenPlan::default_plan();
            active_id = plan.id.clone();
            plans.push(plan);
        }
        Self { plans, active_id }
    }

    /// Fresh root holding one empty default plan
    pub fn fresh() -> Self {
        Self::new(Vec::new(), "")
    }

    pub fn plans(&self) -> &[RegimenPlan] {
        &self.plans
    }

    /// Stored active id; may not resolve, see [`Self::active_plan`]
    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    /// Plan named by `active_id`, falling back to the first plan
    pub fn active_plan(&self) -> &RegimenPlan {
        self.plans
            .iter()
            .find(|p| p.id == self.active_id)
            .unwrap_or(&self.plans[0])
    }

    pub fn plan(&self, id: &str) -> Option<&RegimenPlan> {
        self.plans.iter().find(|p| p.id == id)
    }

    pub(crate) fn into_parts(self) -> (Vec<RegimenPlan>, String) {
        (self.plans, self.active_id)
    }
}

// ============================================================================
// Import results
// ============================================================================

/// Rows that parsed plus human-readable, line-tagged problems
#[derive(Clone, Debug, PartialEq)]
pub struct ParseOutcome<T> {
    pub rows: Vec<T>,
    pub errors: Vec<String>,
}

impl<T> ParseOutcome<T> {
    /// Whole-input failure: one error, no rows
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            rows: Vec::new(),
            errors: vec![message.into()],
        }
    }
}

impl<T> Default for ParseOutcome<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            errors: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("135"), Some(135.0));
        assert_eq!(parse_numeric(" 12.5 "), Some(12.5));
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("   "), None);
        assert_eq!(parse_numeric("heavy"), None);
        assert_eq!(parse_numeric("NaN"), None);
    }

    #[test]
    fn test_parse_timestamp_layouts() {
        let rfc = parse_timestamp("2024-03-01T10:00:00Z").unwrap();
        assert_eq!(rfc.timestamp(), 1_709_287_200);
        assert_eq!(parse_timestamp("1709287200000"), Some(rfc));
        assert_eq!(parse_timestamp("2024-03-01 10:00:00"), Some(rfc));
        assert!(parse_timestamp("2024-03-01").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_day_key_parsing() {
        assert_eq!("monday".parse::<DayKey>().unwrap(), DayKey::Monday);
        assert_eq!("Sat".parse::<DayKey>().unwrap(), DayKey::Saturday);
        assert_eq!("UNASSIGNED".parse::<DayKey>().unwrap(), DayKey::Unassigned);
        assert!("Funday".parse::<DayKey>().is_err());
        assert_eq!(DayKey::parse_or_unassigned("Funday"), DayKey::Unassigned);
    }

    #[test]
    fn test_day_key_wraps() {
        assert_eq!(DayKey::Sunday.next(), DayKey::Unassigned);
        assert_eq!(DayKey::Unassigned.next(), DayKey::Monday);
        assert_eq!(DayKey::Monday.prev(), DayKey::Unassigned);
    }

    #[test]
    fn test_days_serialize_all_keys_in_order() {
        let json = serde_json::to_string(&Days::default()).unwrap();
        assert_eq!(
            json,
            r#"{"Monday":[],"Tuesday":[],"Wednesday":[],"Thursday":[],"Friday":[],"Saturday":[],"Sunday":[],"Unassigned":[]}"#
        );
    }

    #[test]
    fn test_target_from_input() {
        assert_eq!(Target::from_input("3"), Some(Target::Number(3.0)));
        assert_eq!(Target::from_input("8-12"), Some(Target::Text("8-12".into())));
        assert_eq!(Target::from_input(" "), None);
        assert_eq!(Target::Number(3.0).to_string(), "3");
    }

    #[test]
    fn test_note_accepts_epoch_millis() {
        let json = r#"{"id":"note_1","key":"abs:plank","exerciseName":"Plank",
            "text":"60s","createdAt":1709287200000}"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.created_at.timestamp(), 1_709_287_200);
        assert!(note.updated_at.is_none());
        assert!(note.weight.is_none());
    }

    #[test]
    fn test_root_never_empty() {
        let root = RegimenStoreRoot::new(Vec::new(), "missing");
        assert_eq!(root.plans().len(), 1);
        assert_eq!(root.active_id(), root.plans()[0].id);
    }

    #[test]
    fn test_active_plan_falls_back_to_first() {
        let a = RegimenPlan::new("A");
        let b = RegimenPlan::new("B");
        let root = RegimenStoreRoot::new(vec![a.clone(), b], "nope");
        assert_eq!(root.active_plan().id, a.id);
    }
}
