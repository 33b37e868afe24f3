//! JSON and CSV interchange for regimen plans.
//!
//! JSON documents carry the whole store:
//! `{ "version": 2, "exportedAt": ..., "data": { "activeId", "plans" } }`.
//! CSV flattens every (plan, day, item) triple into one row.

use crate::regimen::ImportedRegimen;
use crate::types::new_id;
use crate::{DayKey, Error, RegimenItem, RegimenPlan, RegimenStoreRoot, Result, Target};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Interchange format version written by [`export_regimen_json`]
pub const REGIMEN_EXPORT_VERSION: u32 = 2;

/// Column order written by [`export_regimen_csv`]
pub const REGIMEN_CSV_HEADER: [&str; 11] = [
    "planId",
    "planName",
    "day",
    "slug",
    "exerciseId",
    "name",
    "category",
    "difficulty",
    "sets",
    "reps",
    "weight",
];

/// Plans recovered from an interchange document plus line-tagged problems
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedRegimen {
    pub regimen: ImportedRegimen,
    pub errors: Vec<String>,
}

impl ParsedRegimen {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            regimen: ImportedRegimen::default(),
            errors: vec![message.into()],
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegimenExport<'a> {
    version: u32,
    exported_at: DateTime<Utc>,
    data: &'a RegimenStoreRoot,
}

/// Pretty-printed JSON export of every plan and the active selection
pub fn export_regimen_json(root: &RegimenStoreRoot) -> Result<String> {
    let export = RegimenExport {
        version: REGIMEN_EXPORT_VERSION,
        exported_at: Utc::now(),
        data: root,
    };
    Ok(serde_json::to_string_pretty(&export)?)
}

/// Parse a JSON regimen document.
///
/// Accepts the export envelope, a bare `{ plans, activeId }` store, or a
/// plain array of plans. Plans are normalized on the way in; plans that are
/// not objects and unrecognized day names are reported.
pub fn parse_regimen_json(text: &str) -> ParsedRegimen {
    let text = text.trim_start_matches('\u{feff}');
    if text.trim().is_empty() {
        return ParsedRegimen::failed("JSON is empty.");
    }
    let value: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => return ParsedRegimen::failed(format!("Invalid JSON: {}", e)),
    };

    let (plans, active_id) = match value {
        Value::Array(plans) => (plans, None),
        Value::Object(mut root) => {
            let mut data = match root.remove("data") {
                Some(Value::Object(data)) => data,
                _ => root,
            };
            let active_id = match data.remove("activeId") {
                Some(Value::String(id)) if !id.is_empty() => Some(id),
                _ => None,
            };
            match data.remove("plans") {
                Some(Value::Array(plans)) => (plans, active_id),
                _ => return ParsedRegimen::failed("No plans array found."),
            }
        }
        _ => return ParsedRegimen::failed("No plans array found."),
    };

    let mut parsed = ParsedRegimen::default();
    parsed.regimen.active_id = active_id;
    for (i, value) in plans.into_iter().enumerate() {
        let label = i + 1;
        if !value.is_object() {
            parsed.errors.push(format!("Plan {}: not an object", label));
            continue;
        }
        if let Some(Value::Object(days)) = value.get("days") {
            for key in days.keys() {
                if DayKey::from_full_name(key).is_none() && DayKey::from_short_name(key).is_none() {
                    parsed
                        .errors
                        .push(format!("Plan {}: invalid day {:?} ignored", label, key));
                }
            }
        }
        match serde_json::from_value::<RegimenPlan>(value) {
            Ok(plan) => parsed.regimen.plans.push(plan),
            Err(e) => parsed.errors.push(format!("Plan {}: {}", label, e)),
        }
    }

    tracing::info!(
        "Parsed {} plans from JSON ({} problems)",
        parsed.regimen.plans.len(),
        parsed.errors.len()
    );
    parsed
}

/// Flatten every plan into CSV rows.
///
/// A plan without items is written as one row with blank day and item
/// columns so that it survives a round trip.
pub fn export_regimen_csv(root: &RegimenStoreRoot) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(REGIMEN_CSV_HEADER)?;
    for plan in root.plans() {
        if plan.days.total_items() == 0 {
            writer.write_record([plan.id.as_str(), plan.name.as_str(), "", "", "", "", "", "", "", "", ""])?;
            continue;
        }
        for (day, items) in plan.days.iter() {
            for item in items {
                let target = |t: &Option<Target>| t.as_ref().map(Target::to_string).unwrap_or_default();
                writer.write_record([
                    plan.id.clone(),
                    plan.name.clone(),
                    day.to_string(),
                    item.slug.clone(),
                    item.id.clone(),
                    item.name.clone(),
                    item.category.clone(),
                    item.difficulty.clone(),
                    target(&item.sets),
                    target(&item.reps),
                    target(&item.weight),
                ])?;
            }
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::Other(format!("CSV output is not UTF-8: {}", e)))
}

struct Columns {
    plan_id: Option<usize>,
    plan_name: Option<usize>,
    day: usize,
    slug: usize,
    exercise_id: usize,
    name: Option<usize>,
    category: Option<usize>,
    difficulty: Option<usize>,
    sets: Option<usize>,
    reps: Option<usize>,
    weight: Option<usize>,
}

impl Columns {
    fn resolve(header: &csv::StringRecord) -> std::result::Result<Self, String> {
        let names: Vec<String> = header.iter().map(|h| h.trim().to_ascii_lowercase()).collect();
        let find = |name: &str| names.iter().position(|n| *n == name.to_ascii_lowercase());

        match (find("day"), find("slug"), find("exerciseId")) {
            (Some(day), Some(slug), Some(exercise_id)) => Ok(Columns {
                plan_id: find("planId"),
                plan_name: find("planName"),
                day,
                slug,
                exercise_id,
                name: find("name"),
                category: find("category"),
                difficulty: find("difficulty"),
                sets: find("sets"),
                reps: find("reps"),
                weight: find("weight"),
            }),
            _ => {
                let missing: Vec<&str> = ["day", "slug", "exerciseId"]
                    .into_iter()
                    .filter(|c| find(c).is_none())
                    .collect();
                Err(format!("Missing required column(s): {}", missing.join(", ")))
            }
        }
    }
}

fn field(record: &csv::StringRecord, idx: Option<usize>) -> &str {
    idx.and_then(|i| record.get(i)).map(str::trim).unwrap_or("")
}

/// Parse a regimen CSV export.
///
/// Rows are grouped into plans by `planId` in first-seen order; a missing
/// `planId` column puts every row in one new plan. Rows with an invalid day
/// or without `slug`/`exerciseId` are reported and skipped.
pub fn parse_regimen_csv(text: &str) -> ParsedRegimen {
    let text = text.trim_start_matches('\u{feff}');
    if text.trim().is_empty() {
        return ParsedRegimen::failed("CSV is empty.");
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut records = reader.records();

    let columns = match records.next() {
        Some(Ok(header)) => match Columns::resolve(&header) {
            Ok(columns) => columns,
            Err(message) => return ParsedRegimen::failed(message),
        },
        Some(Err(e)) => return ParsedRegimen::failed(format!("Unreadable CSV header: {}", e)),
        None => return ParsedRegimen::failed("CSV is empty."),
    };

    let mut parsed = ParsedRegimen::default();
    let mut plans: Vec<RegimenPlan> = Vec::new();
    let mut source_ids: Vec<String> = Vec::new();

    for (offset, result) in records.enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map_or(offset as u64 + 2, |p| p.line());
                parsed.errors.push(format!("Line {}: {}", line, e));
                continue;
            }
        };
        let line = record.position().map_or(offset as u64 + 2, |p| p.line());
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        let plan_id = field(&record, columns.plan_id);
        let idx = match source_ids.iter().position(|id| id == plan_id) {
            Some(idx) => idx,
            None => {
                let mut plan = RegimenPlan::new(field(&record, columns.plan_name));
                if !plan_id.is_empty() {
                    plan.id = plan_id.to_string();
                }
                source_ids.push(plan_id.to_string());
                plans.push(plan);
                plans.len() - 1
            }
        };
        let plan = &mut plans[idx];
        if plan.name.is_empty() {
            plan.name = field(&record, columns.plan_name).to_string();
        }

        let day = field(&record, Some(columns.day));
        let slug = field(&record, Some(columns.slug));
        let exercise_id = field(&record, Some(columns.exercise_id));
        if day.is_empty() && slug.is_empty() && exercise_id.is_empty() {
            // Placeholder row for a plan without items
            continue;
        }

        match parse_item(&record, &columns, day, slug, exercise_id) {
            Ok((day, item)) => plan.days.get_mut(day).push(item),
            Err(message) => {
                tracing::warn!("Rejected regimen CSV line {}: {}", line, message);
                parsed.errors.push(format!("Line {}: {}", line, message));
            }
        }
    }

    for plan in &mut plans {
        if plan.name.is_empty() {
            plan.name = "Imported plan".to_string();
        }
        if plan.id.is_empty() {
            plan.id = new_id("plan");
        }
    }

    tracing::info!(
        "Parsed {} plans from CSV ({} rejected rows)",
        plans.len(),
        parsed.errors.len()
    );
    parsed.regimen.plans = plans;
    parsed
}

fn parse_item(
    record: &csv::StringRecord,
    columns: &Columns,
    day: &str,
    slug: &str,
    exercise_id: &str,
) -> std::result::Result<(DayKey, RegimenItem), String> {
    let day = if day.is_empty() {
        DayKey::Unassigned
    } else {
        day.parse::<DayKey>()
            .map_err(|_| format!("invalid day {:?}", day))?
    };

    let mut missing = Vec::new();
    if slug.is_empty() {
        missing.push("slug");
    }
    if exercise_id.is_empty() {
        missing.push("exerciseId");
    }
    if !missing.is_empty() {
        return Err(format!("missing {}", missing.join(", ")));
    }

    let name = field(record, columns.name);
    Ok((
        day,
        RegimenItem {
            slug: slug.to_string(),
            id: exercise_id.to_string(),
            name: if name.is_empty() { exercise_id } else { name }.to_string(),
            category: field(record, columns.category).to_string(),
            difficulty: field(record, columns.difficulty).to_string(),
            sets: Target::from_input(field(record, columns.sets)),
            reps: Target::from_input(field(record, columns.reps)),
            weight: Target::from_input(field(record, columns.weight)),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(slug: &str, id: &str) -> RegimenItem {
        RegimenItem {
            slug: slug.into(),
            id: id.into(),
            name: format!("{} name", id),
            category: "Push".into(),
            difficulty: "Beginner".into(),
            sets: Some(Target::Number(3.0)),
            reps: Some(Target::Text("8-12".into())),
            weight: None,
        }
    }

    fn sample_root() -> RegimenStoreRoot {
        let mut a = RegimenPlan::new("Upper, lower");
        a.id = "plan_a".into();
        a.days.get_mut(DayKey::Monday).push(item("chest", "pushup"));
        a.days.get_mut(DayKey::Unassigned).push(item("abs", "plank"));
        let mut b = RegimenPlan::new("Empty");
        b.id = "plan_b".into();
        RegimenStoreRoot::new(vec![a, b], "plan_b")
    }

    #[test]
    fn test_json_envelope_roundtrip() {
        let root = sample_root();
        let json = export_regimen_json(&root).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], 2);
        assert!(value["exportedAt"].is_string());
        assert_eq!(value["data"]["activeId"], "plan_b");

        let parsed = parse_regimen_json(&json);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        assert_eq!(parsed.regimen.active_id.as_deref(), Some("plan_b"));
        assert_eq!(parsed.regimen.plans, root.plans().to_vec());
    }

    #[test]
    fn test_json_accepts_bare_shapes() {
        let bare = r#"{"plans":[{"id":"p","name":"P","days":{"Mon":[{"slug":"a","id":"b"}]}}],"activeId":"p"}"#;
        let parsed = parse_regimen_json(bare);
        assert_eq!(parsed.regimen.plans.len(), 1);
        assert_eq!(parsed.regimen.plans[0].days.get(DayKey::Monday).len(), 1);

        let array = r#"[{"name":"Only","days":{}}, 7]"#;
        let parsed = parse_regimen_json(array);
        assert_eq!(parsed.regimen.plans.len(), 1);
        assert_eq!(parsed.errors, vec!["Plan 2: not an object".to_string()]);
        assert!(parsed.regimen.active_id.is_none());
    }

    #[test]
    fn test_json_failures() {
        assert_eq!(parse_regimen_json("").errors, vec!["JSON is empty.".to_string()]);
        assert!(parse_regimen_json("{oops").errors[0].starts_with("Invalid JSON"));
        assert_eq!(
            parse_regimen_json(r#"{"version":2}"#).errors,
            vec!["No plans array found.".to_string()]
        );

        let bad_day = r#"[{"id":"p","name":"P","days":{"Funday":[]}}]"#;
        let parsed = parse_regimen_json(bad_day);
        assert_eq!(parsed.regimen.plans.len(), 1);
        assert!(parsed.errors[0].contains("Funday"));
    }

    #[test]
    fn test_csv_roundtrip_keeps_empty_plans() {
        let root = sample_root();
        let csv = export_regimen_csv(&root).unwrap();
        assert!(csv.starts_with("planId,planName,day,slug,exerciseId,name,category,difficulty,sets,reps,weight\n"));
        assert!(csv.contains("\"Upper, lower\""));

        let parsed = parse_regimen_csv(&csv);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        assert_eq!(parsed.regimen.plans, root.plans().to_vec());
    }

    #[test]
    fn test_csv_bad_rows_reported_by_line() {
        let csv = "planId,day,slug,exerciseId\n\
                   p1,Monday,chest,pushup\n\
                   p1,Funday,chest,dips\n\
                   p1,tue,,row\n\
                   p2,,abs,plank\n";
        let parsed = parse_regimen_csv(csv);
        assert_eq!(parsed.errors.len(), 2);
        assert!(parsed.errors[0].starts_with("Line 3:"));
        assert!(parsed.errors[1].starts_with("Line 4:"));

        let plans = &parsed.regimen.plans;
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].id, "p1");
        assert_eq!(plans[0].name, "Imported plan");
        assert_eq!(plans[0].days.get(DayKey::Monday)[0].name, "pushup");
        assert_eq!(plans[1].days.get(DayKey::Unassigned)[0].id, "plank");
    }

    #[test]
    fn test_csv_missing_columns() {
        let parsed = parse_regimen_csv("planId,slug\np,chest\n");
        assert!(parsed.regimen.plans.is_empty());
        assert_eq!(parsed.errors.len(), 1);
        assert!(parsed.errors[0].contains("day"));
        assert!(parsed.errors[0].contains("exerciseId"));
    }
}
