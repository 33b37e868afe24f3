//! CSV interchange for notes.
//!
//! Header: `id,createdAt,updatedAt,slug,exerciseId,exerciseName,weight,reps,sets,text`.
//! Quoting follows RFC 4180, so text with commas, quotes or newlines
//! survives a round trip.

use crate::notes::ImportedNote;
use crate::types::{parse_numeric, parse_timestamp};
use crate::{Error, ExerciseKey, Note, ParseOutcome, Result};
use chrono::Utc;

/// Column order written by [`notes_to_csv`]
pub const NOTES_CSV_HEADER: [&str; 10] = [
    "id",
    "createdAt",
    "updatedAt",
    "slug",
    "exerciseId",
    "exerciseName",
    "weight",
    "reps",
    "sets",
    "text",
];

/// Serialize notes, one row each, timestamps as RFC 3339
pub fn notes_to_csv(notes: &[Note]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(NOTES_CSV_HEADER)?;
    for note in notes {
        let number = |v: Option<f64>| v.map(|n| n.to_string()).unwrap_or_default();
        writer.write_record([
            note.id.clone(),
            note.created_at.to_rfc3339(),
            note.updated_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
            note.key.slug().to_string(),
            note.key.exercise_id().to_string(),
            note.exercise_name.clone(),
            number(note.weight),
            number(note.reps),
            number(note.sets),
            note.text.clone(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::Other(format!("CSV output is not UTF-8: {}", e)))
}

/// Column positions resolved from a header row
struct Columns {
    id: Option<usize>,
    created_at: Option<usize>,
    updated_at: Option<usize>,
    slug: usize,
    exercise_id: usize,
    exercise_name: Option<usize>,
    weight: Option<usize>,
    reps: Option<usize>,
    sets: Option<usize>,
    text: usize,
}

impl Columns {
    fn resolve(header: &csv::StringRecord) -> std::result::Result<Self, String> {
        let names: Vec<String> = header.iter().map(|h| h.trim().to_ascii_lowercase()).collect();
        let find = |name: &str| names.iter().position(|n| n == &name.to_ascii_lowercase());

        let missing: Vec<&str> = ["slug", "exerciseId", "text"]
            .into_iter()
            .filter(|c| find(c).is_none())
            .collect();
        match (find("slug"), find("exerciseId"), find("text")) {
            (Some(slug), Some(exercise_id), Some(text)) => Ok(Columns {
                id: find("id"),
                created_at: find("createdAt"),
                updated_at: find("updatedAt"),
                slug,
                exercise_id,
                exercise_name: find("exerciseName"),
                weight: find("weight"),
                reps: find("reps"),
                sets: find("sets"),
                text,
            }),
            _ => Err(format!("Missing required column(s): {}", missing.join(", "))),
        }
    }
}

fn field(record: &csv::StringRecord, idx: Option<usize>) -> &str {
    idx.and_then(|i| record.get(i)).map(str::trim).unwrap_or("")
}

/// Parse a notes CSV export.
///
/// The header is matched case-insensitively and must contain `slug`,
/// `exerciseId` and `text`. Bad rows are reported with their line number
/// and skipped; parsing continues with the next row.
pub fn parse_notes_csv(text: &str) -> ParseOutcome<ImportedNote> {
    let text = text.trim_start_matches('\u{feff}');
    if text.trim().is_empty() {
        return ParseOutcome::failed("CSV is empty.");
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut records = reader.records();

    let columns = match records.next() {
        Some(Ok(header)) => match Columns::resolve(&header) {
            Ok(columns) => columns,
            Err(message) => return ParseOutcome::failed(message),
        },
        Some(Err(e)) => return ParseOutcome::failed(format!("Unreadable CSV header: {}", e)),
        None => return ParseOutcome::failed("CSV is empty."),
    };

    let mut outcome = ParseOutcome::default();
    for (offset, result) in records.enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map_or(offset as u64 + 2, |p| p.line());
                outcome.errors.push(format!("Line {}: {}", line, e));
                continue;
            }
        };
        let line = record.position().map_or(offset as u64 + 2, |p| p.line());
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        match parse_row(&record, &columns) {
            Ok(row) => outcome.rows.push(row),
            Err(message) => {
                tracing::warn!("Rejected notes CSV line {}: {}", line, message);
                outcome.errors.push(format!("Line {}: {}", line, message));
            }
        }
    }

    tracing::info!(
        "Parsed {} notes from CSV ({} rejected)",
        outcome.rows.len(),
        outcome.errors.len()
    );
    outcome
}

fn parse_row(record: &csv::StringRecord, columns: &Columns) -> std::result::Result<ImportedNote, String> {
    let slug = field(record, Some(columns.slug));
    let exercise_id = field(record, Some(columns.exercise_id));
    let text = field(record, Some(columns.text));

    let mut missing = Vec::new();
    if slug.is_empty() {
        missing.push("slug");
    }
    if exercise_id.is_empty() {
        missing.push("exerciseId");
    }
    if text.is_empty() {
        missing.push("text");
    }
    if !missing.is_empty() {
        return Err(format!("missing {}", missing.join(", ")));
    }
    if slug.contains(':') {
        return Err(format!("slug {:?} must not contain ':'", slug));
    }

    let optional = |idx: Option<usize>| Some(field(record, idx)).filter(|s| !s.is_empty());

    Ok(ImportedNote {
        id: optional(columns.id).map(str::to_string),
        key: ExerciseKey::new(slug, exercise_id),
        exercise_name: optional(columns.exercise_name).map(str::to_string),
        text: text.to_string(),
        weight: parse_numeric(field(record, columns.weight)),
        reps: parse_numeric(field(record, columns.reps)),
        sets: parse_numeric(field(record, columns.sets)),
        created_at: parse_timestamp(field(record, columns.created_at)).unwrap_or_else(Utc::now),
        updated_at: parse_timestamp(field(record, columns.updated_at)),
    })
}
