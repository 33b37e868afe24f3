//! Decoding of persisted documents into explicit schema variants.
//!
//! Shape sniffing happens here once; stores match on the resulting enums.
//! Malformed pieces are dropped with a warning rather than failing the
//! whole document.

use crate::types::{new_id, DayKey, Days, Note, RegimenItem, RegimenPlan, DEFAULT_PLAN_NAME};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Notes document as found in storage
#[derive(Debug, PartialEq)]
pub enum StoredNotes {
    /// Array of note records
    Current(Vec<Note>),
    /// Legacy `{ "slug:id": "text" }` map
    LegacyMap(Vec<(String, String)>),
    /// Absent, corrupt, or of no recognizable shape
    Empty,
}

/// Regimen documents as found in storage
#[derive(Debug)]
pub enum StoredRegimen {
    /// `regimen_v2` with a `plans` array and an `activeId`
    MultiPlan { plans: Vec<RawPlan>, active_id: String },
    /// Only the legacy `regimen_v1` day map exists
    SinglePlan(RawPlan),
    /// Nothing usable
    Empty,
}

/// Plan as written by any schema revision, before normalization
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawPlan {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    days: Option<Value>,
}

impl RawPlan {
    /// Plan built from a bare legacy day map
    pub fn from_day_map(days: Map<String, Value>) -> Self {
        Self {
            id: None,
            name: None,
            days: Some(Value::Object(days)),
        }
    }

    /// True when normalization would change the stored shape
    pub fn needs_migration(&self) -> bool {
        let Some(Value::Object(days)) = &self.days else {
            return true;
        };
        let has_short = days
            .iter()
            .any(|(k, v)| DayKey::from_short_name(k).is_some() && v.is_array());
        let missing_full = DayKey::ALL
            .iter()
            .any(|d| !days.get(d.as_str()).map_or(false, Value::is_array));
        let bad_id = !matches!(&self.id, Some(Value::String(s)) if !s.is_empty());
        has_short || missing_full || bad_id
    }
}

impl From<RawPlan> for RegimenPlan {
    fn from(raw: RawPlan) -> Self {
        normalize_plan_days(raw)
    }
}

/// Normalize a plan of any revision.
///
/// Every one of the eight days ends up present. Abbreviated weekday lists
/// are merged into their full-name day, placed before the items already
/// there. Non-array day values count as missing; unknown keys are dropped.
pub fn normalize_plan_days(raw: RawPlan) -> RegimenPlan {
    let id = match raw.id {
        Some(Value::String(s)) if !s.is_empty() => s,
        _ => new_id("plan"),
    };
    let name = match raw.name {
        Some(Value::String(s)) => s,
        _ => DEFAULT_PLAN_NAME.to_string(),
    };

    let mut days = Days::default();
    if let Some(Value::Object(map)) = raw.days {
        for day in DayKey::ALL {
            if let Some(Value::Array(values)) = map.get(day.as_str()) {
                *days.get_mut(day) = decode_items(values);
            }
        }
        for (key, value) in &map {
            if let (Some(day), Value::Array(values)) = (DayKey::from_short_name(key), value) {
                let mut merged = decode_items(values);
                merged.append(days.get_mut(day));
                *days.get_mut(day) = merged;
            }
        }
    }

    RegimenPlan { id, name, days }
}

fn decode_items(values: &[Value]) -> Vec<RegimenItem> {
    values
        .iter()
        .filter_map(|v| match RegimenItem::deserialize(v) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!("Dropping malformed regimen item: {}", e);
                None
            }
        })
        .collect()
}

/// Decode the raw `notes` document
pub fn decode_notes(raw: Option<&str>) -> StoredNotes {
    let Some(text) = raw else {
        return StoredNotes::Empty;
    };
    let value = match serde_json::from_str::<Value>(text) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("Notes document is not valid JSON ({}); treating as empty", e);
            return StoredNotes::Empty;
        }
    };

    match value {
        Value::Array(items) => {
            let total = items.len();
            let notes: Vec<Note> = items
                .into_iter()
                .enumerate()
                .filter_map(|(i, item)| match serde_json::from_value::<Note>(item) {
                    Ok(note) => Some(note),
                    Err(e) => {
                        tracing::warn!("Skipping malformed note at index {}: {}", i, e);
                        None
                    }
                })
                .collect();
            if notes.len() != total {
                tracing::warn!("Kept {} of {} stored notes", notes.len(), total);
            }
            StoredNotes::Current(notes)
        }
        Value::Object(map) => StoredNotes::LegacyMap(
            map.into_iter()
                .filter_map(|(key, v)| match v {
                    Value::String(text) => Some((key, text)),
                    _ => None,
                })
                .collect(),
        ),
        _ => {
            tracing::warn!("Notes document has unexpected shape; treating as empty");
            StoredNotes::Empty
        }
    }
}

/// Decode the regimen documents, preferring the current revision
pub fn decode_regimen(current: Option<&str>, legacy: Option<&str>) -> StoredRegimen {
    if let Some(stored) = current.and_then(decode_multi_plan) {
        return stored;
    }

    if let Some(text) = legacy {
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(days)) => return StoredRegimen::SinglePlan(RawPlan::from_day_map(days)),
            Ok(_) => tracing::warn!("Legacy regimen document is not an object; ignoring"),
            Err(e) => tracing::warn!("Legacy regimen document is not valid JSON ({}); ignoring", e),
        }
    }

    StoredRegimen::Empty
}

fn decode_multi_plan(text: &str) -> Option<StoredRegimen> {
    let value = match serde_json::from_str::<Value>(text) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("Regimen document is not valid JSON ({}); ignoring", e);
            return None;
        }
    };

    let Value::Object(mut root) = value else {
        tracing::warn!("Regimen document is not an object; ignoring");
        return None;
    };
    let active_id = match root.remove("activeId") {
        Some(Value::String(id)) if !id.is_empty() => id,
        _ => {
            tracing::warn!("Regimen document has no activeId; ignoring");
            return None;
        }
    };
    let Some(Value::Array(values)) = root.remove("plans") else {
        tracing::warn!("Regimen document has no plans array; ignoring");
        return None;
    };

    let plans = values
        .into_iter()
        .filter_map(|v| match serde_json::from_value::<RawPlan>(v) {
            Ok(plan) => Some(plan),
            Err(e) => {
                tracing::warn!("Dropping malformed plan: {}", e);
                None
            }
        })
        .collect();

    Some(StoredRegimen::MultiPlan { plans, active_id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(id: &str) -> Value {
        json!({"slug": "chest", "id": id, "name": id, "category": "Push", "difficulty": "Beginner"})
    }

    fn ids(items: &[RegimenItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_normalize_fills_missing_days() {
        let plan: RegimenPlan = serde_json::from_value(json!({
            "id": "plan_a",
            "name": "A",
            "days": {"Tuesday": [item("pushup")], "Sunday": []}
        }))
        .unwrap();

        assert_eq!(plan.id, "plan_a");
        assert_eq!(ids(plan.days.get(DayKey::Tuesday)), vec!["pushup"]);
        for (day, items) in plan.days.iter() {
            if day != DayKey::Tuesday {
                assert!(items.is_empty(), "{} should be empty", day);
            }
        }
        let serialized = serde_json::to_value(&plan.days).unwrap();
        assert_eq!(serialized.as_object().unwrap().len(), 8);
    }

    #[test]
    fn test_short_keys_merge_before_full_keys() {
        let plan: RegimenPlan = serde_json::from_value(json!({
            "id": "plan_a",
            "name": "A",
            "days": {"Mon": [item("a")], "Monday": [item("b")], "Fri": [item("c")]}
        }))
        .unwrap();

        assert_eq!(ids(plan.days.get(DayKey::Monday)), vec!["a", "b"]);
        assert_eq!(ids(plan.days.get(DayKey::Friday)), vec!["c"]);
        let serialized = serde_json::to_value(&plan.days).unwrap();
        assert!(serialized.get("Mon").is_none());
    }

    #[test]
    fn test_missing_id_and_name_are_synthesized() {
        let plan: RegimenPlan = serde_json::from_value(json!({"days": {}})).unwrap();
        assert!(plan.id.starts_with("plan_"));
        assert_eq!(plan.name, DEFAULT_PLAN_NAME);
    }

    #[test]
    fn test_malformed_items_are_dropped() {
        let plan: RegimenPlan = serde_json::from_value(json!({
            "id": "p",
            "name": "P",
            "days": {"Monday": [item("ok"), {"name": "no slug"}, 42]}
        }))
        .unwrap();
        assert_eq!(ids(plan.days.get(DayKey::Monday)), vec!["ok"]);
    }

    #[test]
    fn test_needs_migration() {
        let full = RawPlan {
            id: Some(json!("p")),
            name: Some(json!("P")),
            days: Some(serde_json::to_value(Days::default()).unwrap()),
        };
        assert!(!full.needs_migration());

        let short = RawPlan {
            id: Some(json!("p")),
            name: None,
            days: Some(json!({"Mon": []})),
        };
        assert!(short.needs_migration());
    }

    #[test]
    fn test_decode_notes_variants() {
        assert_eq!(decode_notes(None), StoredNotes::Empty);
        assert_eq!(decode_notes(Some("{ not json")), StoredNotes::Empty);
        assert_eq!(decode_notes(Some("42")), StoredNotes::Empty);
        assert_eq!(
            decode_notes(Some(r#"{"abs:plank": "hold 60s", "bad": 3}"#)),
            StoredNotes::LegacyMap(vec![("abs:plank".into(), "hold 60s".into())])
        );
        match decode_notes(Some("[]")) {
            StoredNotes::Current(notes) => assert!(notes.is_empty()),
            other => panic!("expected current schema, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_notes_skips_bad_records() {
        let doc = r#"[
            {"id":"n1","key":"abs:plank","text":"ok","createdAt":"2024-01-01T00:00:00Z"},
            {"id":"n2","key":"nocolon","text":"bad key","createdAt":"2024-01-01T00:00:00Z"}
        ]"#;
        match decode_notes(Some(doc)) {
            StoredNotes::Current(notes) => {
                assert_eq!(notes.len(), 1);
                assert_eq!(notes[0].id, "n1");
            }
            other => panic!("expected current schema, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_regimen_prefers_current() {
        let current = r#"{"plans":[{"id":"p1","name":"One","days":{}}],"activeId":"p1"}"#;
        let legacy = r#"{"Mon":[]}"#;
        match decode_regimen(Some(current), Some(legacy)) {
            StoredRegimen::MultiPlan { plans, active_id } => {
                assert_eq!(plans.len(), 1);
                assert_eq!(active_id, "p1");
            }
            other => panic!("expected multi-plan, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_regimen_falls_back_to_legacy() {
        let current = r#"{"plans":[]}"#;
        let legacy = r#"{"Mon":[]}"#;
        assert!(matches!(
            decode_regimen(Some(current), Some(legacy)),
            StoredRegimen::SinglePlan(_)
        ));
        assert!(matches!(decode_regimen(None, Some("[1,2]")), StoredRegimen::Empty));
        assert!(matches!(decode_regimen(None, None), StoredRegimen::Empty));
    }
}
