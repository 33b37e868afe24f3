//! Progress notes: an append-only log of entries per exercise.
//!
//! The `notes` document is either the current array of [`Note`] records or
//! the legacy `{ "slug:id": "text" }` map, which is migrated to the array
//! form on first read. Every public operation is a full
//! read-mutate-write cycle against storage.

use crate::schema::{decode_notes, StoredNotes};
use crate::storage::{Storage, NOTES_DOC};
use crate::types::{new_id, parse_numeric};
use crate::{Error, ExerciseKey, Note, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Input for [`NotesStore::add_note`].
///
/// Numeric fields are raw user input; blank or non-numeric means absent.
#[derive(Clone, Debug, Default)]
pub struct NewNote {
    pub key: Option<ExerciseKey>,
    pub exercise_name: Option<String>,
    pub text: String,
    pub weight: Option<String>,
    pub reps: Option<String>,
    pub sets: Option<String>,
}

impl NewNote {
    pub fn new(key: ExerciseKey) -> Self {
        Self {
            key: Some(key),
            ..Self::default()
        }
    }

    /// True when there is nothing worth saving. Callers check this before
    /// adding; the store itself does not refuse blank notes.
    pub fn is_blank(&self) -> bool {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        self.text.trim().is_empty() && blank(&self.weight) && blank(&self.reps) && blank(&self.sets)
    }
}

/// Partial update for [`NotesStore::update_note`].
///
/// `None` leaves a field alone. For numeric fields, `Some("")` clears it.
#[derive(Clone, Debug, Default)]
pub struct NotePatch {
    pub exercise_name: Option<String>,
    pub text: Option<String>,
    pub weight: Option<String>,
    pub reps: Option<String>,
    pub sets: Option<String>,
}

/// Target of the legacy `deleteNote(arg)` entry point
#[derive(Clone, Debug, PartialEq)]
pub enum NoteTarget {
    /// Every note of one exercise
    Exercise(ExerciseKey),
    /// One note by id
    Id(String),
}

impl NoteTarget {
    /// Anything containing `:` is treated as an exercise key, everything
    /// else as a note id. Note ids never contain `:`.
    pub fn parse(arg: &str) -> NoteTarget {
        if ExerciseKey::looks_like_key(arg) {
            if let Ok(key) = arg.parse() {
                return NoteTarget::Exercise(key);
            }
        }
        NoteTarget::Id(arg.to_string())
    }
}

/// A note read from an interchange file, before it is given a store identity
#[derive(Clone, Debug, PartialEq)]
pub struct ImportedNote {
    pub id: Option<String>,
    pub key: ExerciseKey,
    pub exercise_name: Option<String>,
    pub text: String,
    pub weight: Option<f64>,
    pub reps: Option<f64>,
    pub sets: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ImportedNote {
    fn signature(&self) -> Signature {
        Signature::of(&self.key, &self.text, self.created_at)
    }

    /// Keep the incoming id unless it is absent, already taken, or would
    /// read as an exercise key
    fn into_note(self, taken_ids: &mut HashSet<String>) -> Note {
        let id = match self.id {
            Some(id)
                if !id.is_empty()
                    && !ExerciseKey::looks_like_key(&id)
                    && !taken_ids.contains(&id) =>
            {
                id
            }
            _ => new_id("note"),
        };
        taken_ids.insert(id.clone());
        let exercise_name = self
            .exercise_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.key.to_string());
        Note {
            id,
            key: self.key,
            exercise_name,
            text: self.text.trim().to_string(),
            weight: self.weight,
            reps: self.reps,
            sets: self.sets,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<&Note> for ImportedNote {
    fn from(note: &Note) -> Self {
        ImportedNote {
            id: Some(note.id.clone()),
            key: note.key.clone(),
            exercise_name: Some(note.exercise_name.clone()),
            text: note.text.clone(),
            weight: note.weight,
            reps: note.reps,
            sets: note.sets,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

/// Duplicate-detection key: exercise, text and creation time (to the millisecond)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct Signature(String, String, i64);

impl Signature {
    fn of(key: &ExerciseKey, text: &str, created_at: DateTime<Utc>) -> Self {
        Signature(key.to_string(), text.trim().to_string(), created_at.timestamp_millis())
    }
}

/// How imported notes combine with the stored ones
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotesImportStrategy {
    /// Discard stored notes and keep exactly the imported ones
    ReplaceAll,
    /// Drop imported notes whose signature is already present
    #[default]
    SkipDuplicates,
    /// Add every imported note, duplicates included
    Append,
}

impl FromStr for NotesImportStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "replaceall" => Ok(Self::ReplaceAll),
            "skipduplicates" => Ok(Self::SkipDuplicates),
            "append" => Ok(Self::Append),
            _ => Err(Error::Other(format!("Unknown notes import strategy: {}", s))),
        }
    }
}

impl fmt::Display for NotesImportStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ReplaceAll => "replaceAll",
            Self::SkipDuplicates => "skipDuplicates",
            Self::Append => "append",
        })
    }
}

pub struct NotesStore<S> {
    storage: S,
}

impl<S: Storage> NotesStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Read the stored notes, migrating the legacy map if found
    fn load(&self) -> Result<Vec<Note>> {
        let raw = self.storage.read(NOTES_DOC)?;
        match decode_notes(raw.as_deref()) {
            StoredNotes::Current(notes) => Ok(notes),
            StoredNotes::Empty => Ok(Vec::new()),
            StoredNotes::LegacyMap(entries) => {
                let now = Utc::now();
                let total = entries.len();
                let notes: Vec<Note> = entries
                    .into_iter()
                    .filter_map(|(key_text, text)| match key_text.parse::<ExerciseKey>() {
                        Ok(key) => Some(Note {
                            id: new_id("note"),
                            key,
                            exercise_name: key_text,
                            text: text.trim().to_string(),
                            weight: None,
                            reps: None,
                            sets: None,
                            created_at: now,
                            updated_at: None,
                        }),
                        Err(e) => {
                            tracing::warn!(
                                "Dropping legacy note under {:?} ({}); text was: {:?}",
                                key_text,
                                e,
                                text
                            );
                            None
                        }
                    })
                    .collect();
                tracing::info!("Migrated {} of {} legacy notes", notes.len(), total);
                self.save(notes)
            }
        }
    }

    /// Sort newest first, persist, and hand back the stored sequence
    fn save(&self, mut notes: Vec<Note>) -> Result<Vec<Note>> {
        sort_newest_first(&mut notes);
        let contents = serde_json::to_string(&notes)?;
        self.storage.write(NOTES_DOC, &contents)?;
        tracing::debug!("Saved {} notes", notes.len());
        Ok(notes)
    }

    /// Every note, newest first
    pub fn list_all_notes(&self) -> Result<Vec<Note>> {
        let mut notes = self.load()?;
        sort_newest_first(&mut notes);
        Ok(notes)
    }

    /// Notes for one exercise, newest first
    pub fn list_notes_for(&self, key: &ExerciseKey) -> Result<Vec<Note>> {
        let mut notes = self.list_all_notes()?;
        notes.retain(|n| &n.key == key);
        Ok(notes)
    }

    /// Append a new note with a fresh id and `created_at = now`
    pub fn add_note(&self, input: NewNote) -> Result<Vec<Note>> {
        let key = input
            .key
            .ok_or_else(|| Error::Key("note has no exercise key".into()))?;
        let note = Note {
            id: new_id("note"),
            exercise_name: input
                .exercise_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| key.to_string()),
            key,
            text: input.text.trim().to_string(),
            weight: input.weight.as_deref().and_then(parse_numeric),
            reps: input.reps.as_deref().and_then(parse_numeric),
            sets: input.sets.as_deref().and_then(parse_numeric),
            created_at: Utc::now(),
            updated_at: None,
        };
        tracing::debug!("Adding note {} for {}", note.id, note.key);

        let mut notes = self.load()?;
        notes.insert(0, note);
        self.save(notes)
    }

    /// Apply a partial update and stamp `updated_at`; unknown ids are a no-op
    pub fn update_note(&self, id: &str, patch: NotePatch) -> Result<Vec<Note>> {
        let mut notes = self.load()?;
        let Some(note) = notes.iter_mut().find(|n| n.id == id) else {
            tracing::debug!("update_note: no note {}", id);
            sort_newest_first(&mut notes);
            return Ok(notes);
        };

        if let Some(name) = patch.exercise_name {
            note.exercise_name = name;
        }
        if let Some(text) = patch.text {
            note.text = text.trim().to_string();
        }
        if let Some(weight) = patch.weight {
            note.weight = parse_numeric(&weight);
        }
        if let Some(reps) = patch.reps {
            note.reps = parse_numeric(&reps);
        }
        if let Some(sets) = patch.sets {
            note.sets = parse_numeric(&sets);
        }
        note.updated_at = Some(Utc::now());

        self.save(notes)
    }

    /// Delete one note; unknown ids are a no-op
    pub fn delete_note_by_id(&self, id: &str) -> Result<Vec<Note>> {
        let mut notes = self.load()?;
        let before = notes.len();
        notes.retain(|n| n.id != id);
        if notes.len() == before {
            sort_newest_first(&mut notes);
            return Ok(notes);
        }
        self.save(notes)
    }

    /// Delete every note of one exercise
    pub fn clear_notes_for(&self, key: &ExerciseKey) -> Result<Vec<Note>> {
        let mut notes = self.load()?;
        notes.retain(|n| &n.key != key);
        self.save(notes)
    }

    // ------------------------------------------------------------------
    // Legacy single-text API
    // ------------------------------------------------------------------

    /// Text of the newest note for `key`, or an empty string
    pub fn get_note(&self, key: &str) -> Result<String> {
        let Ok(key) = key.parse::<ExerciseKey>() else {
            return Ok(String::new());
        };
        Ok(self
            .list_notes_for(&key)?
            .into_iter()
            .next()
            .map(|n| n.text)
            .unwrap_or_default())
    }

    /// Non-blank text appends a text-only note; blank text clears every
    /// note for the exercise. Malformed keys leave storage untouched.
    pub fn set_note(&self, key: &str, text: &str) -> Result<Vec<Note>> {
        let Ok(parsed) = key.parse::<ExerciseKey>() else {
            tracing::warn!("set_note: ignoring malformed key {:?}", key);
            return self.list_all_notes();
        };
        let text = text.trim();
        if text.is_empty() {
            return self.clear_notes_for(&parsed);
        }
        self.add_note(NewNote {
            key: Some(parsed),
            exercise_name: Some(key.to_string()),
            text: text.to_string(),
            ..NewNote::default()
        })
    }

    /// Shape-dispatching delete kept for old callers: a `slug:id` argument
    /// clears that exercise, anything else deletes one note by id.
    pub fn delete_note(&self, arg: &str) -> Result<Vec<Note>> {
        match NoteTarget::parse(arg) {
            NoteTarget::Exercise(key) => self.clear_notes_for(&key),
            NoteTarget::Id(id) => self.delete_note_by_id(&id),
        }
    }

    // ------------------------------------------------------------------
    // Import
    // ------------------------------------------------------------------

    /// Merge imported rows into the store.
    ///
    /// Ids colliding with kept notes (or with earlier imported rows) are
    /// replaced by fresh ones.
    pub fn import_notes(
        &self,
        rows: Vec<ImportedNote>,
        strategy: NotesImportStrategy,
    ) -> Result<Vec<Note>> {
        let mut notes = match strategy {
            NotesImportStrategy::ReplaceAll => Vec::new(),
            _ => self.load()?,
        };
        let mut taken_ids: HashSet<String> = notes.iter().map(|n| n.id.clone()).collect();
        let mut signatures: HashSet<Signature> = notes
            .iter()
            .map(|n| Signature::of(&n.key, &n.text, n.created_at))
            .collect();

        let incoming = rows.len();
        let mut skipped = 0;
        for row in rows {
            if strategy == NotesImportStrategy::SkipDuplicates && !signatures.insert(row.signature()) {
                skipped += 1;
                continue;
            }
            notes.push(row.into_note(&mut taken_ids));
        }

        tracing::info!(
            "Imported {} of {} notes ({}, {} duplicates skipped)",
            incoming - skipped,
            incoming,
            strategy,
            skipped
        );
        self.save(notes)
    }
}

/// Newest first; stable so equal timestamps keep insertion order
fn sort_newest_first(notes: &mut [Note]) {
    notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::Duration;

    fn key(s: &str) -> ExerciseKey {
        s.parse().unwrap()
    }

    fn note_input(k: &str, text: &str) -> NewNote {
        NewNote {
            text: text.into(),
            ..NewNote::new(key(k))
        }
    }

    fn imported(k: &str, text: &str, created_at: DateTime<Utc>) -> ImportedNote {
        ImportedNote {
            id: None,
            key: key(k),
            exercise_name: None,
            text: text.into(),
            weight: None,
            reps: None,
            sets: None,
            created_at,
            updated_at: None,
        }
    }

    #[test]
    fn test_add_then_clear() {
        let storage = MemoryStorage::new();
        let store = NotesStore::new(&storage);

        store
            .add_note(NewNote {
                exercise_name: Some("Crunches".into()),
                weight: Some("135".into()),
                reps: Some("10".into()),
                sets: Some("3".into()),
                ..note_input("abs:crunch", "felt good")
            })
            .unwrap();

        let notes = store.list_notes_for(&key("abs:crunch")).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].weight, Some(135.0));
        assert_eq!(notes[0].reps, Some(10.0));
        assert_eq!(notes[0].sets, Some(3.0));
        assert!(notes[0].updated_at.is_none());

        store.clear_notes_for(&key("abs:crunch")).unwrap();
        assert!(store.list_notes_for(&key("abs:crunch")).unwrap().is_empty());
    }

    #[test]
    fn test_add_trims_and_leaves_blank_numbers_absent() {
        let storage = MemoryStorage::new();
        let store = NotesStore::new(&storage);
        let notes = store
            .add_note(NewNote {
                weight: Some("".into()),
                reps: Some("lots".into()),
                ..note_input("abs:plank", "  hold  ")
            })
            .unwrap();

        assert_eq!(notes[0].text, "hold");
        assert_eq!(notes[0].weight, None);
        assert_eq!(notes[0].reps, None);
        assert_eq!(notes[0].exercise_name, "abs:plank");
    }

    #[test]
    fn test_new_note_is_blank() {
        assert!(note_input("abs:plank", "   ").is_blank());
        assert!(!NewNote {
            sets: Some("3".into()),
            ..note_input("abs:plank", "")
        }
        .is_blank());
    }

    #[test]
    fn test_listing_is_newest_first() {
        let storage = MemoryStorage::new();
        let store = NotesStore::new(&storage);
        store.add_note(note_input("abs:plank", "first")).unwrap();
        store.add_note(note_input("abs:plank", "second")).unwrap();
        store.add_note(note_input("legs:squat", "other")).unwrap();

        let all = store.list_all_notes().unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        let plank = store.list_notes_for(&key("abs:plank")).unwrap();
        assert_eq!(plank[0].text, "second");
        assert_eq!(plank[1].text, "first");
    }

    #[test]
    fn test_update_note() {
        let storage = MemoryStorage::new();
        let store = NotesStore::new(&storage);
        let notes = store
            .add_note(NewNote {
                weight: Some("100".into()),
                reps: Some("5".into()),
                ..note_input("chest:bench-press", "ok")
            })
            .unwrap();
        let id = notes[0].id.clone();

        let updated = store
            .update_note(
                &id,
                NotePatch {
                    text: Some("  heavier  ".into()),
                    weight: Some("110".into()),
                    reps: Some("".into()),
                    ..NotePatch::default()
                },
            )
            .unwrap();

        let note = updated.iter().find(|n| n.id == id).unwrap();
        assert_eq!(note.text, "heavier");
        assert_eq!(note.weight, Some(110.0));
        assert_eq!(note.reps, None);
        assert!(note.updated_at.is_some());
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let storage = MemoryStorage::new();
        let store = NotesStore::new(&storage);
        let before = store.add_note(note_input("abs:plank", "x")).unwrap();
        let raw_before = storage.read(NOTES_DOC).unwrap();

        let after = store.update_note("note_missing", NotePatch::default()).unwrap();
        assert_eq!(before, after);
        assert_eq!(storage.read(NOTES_DOC).unwrap(), raw_before);
    }

    #[test]
    fn test_delete_by_id() {
        let storage = MemoryStorage::new();
        let store = NotesStore::new(&storage);
        store.add_note(note_input("abs:plank", "a")).unwrap();
        let notes = store.add_note(note_input("abs:plank", "b")).unwrap();
        let victim = notes[0].id.clone();

        let left = store.delete_note_by_id(&victim).unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].text, "a");

        let unchanged = store.delete_note_by_id("nope").unwrap();
        assert_eq!(unchanged.len(), 1);
    }

    #[test]
    fn test_legacy_map_migrates_once() {
        let storage = MemoryStorage::new()
            .with_doc(NOTES_DOC, r#"{"abs:plank":" hold 60s ","legs:squat":"5x5","junk":"x"}"#);
        let store = NotesStore::new(&storage);

        let notes = store.list_all_notes().unwrap();
        assert_eq!(notes.len(), 2);
        let plank = notes.iter().find(|n| n.key == key("abs:plank")).unwrap();
        assert_eq!(plank.text, "hold 60s");
        assert_eq!(plank.exercise_name, "abs:plank");

        let migrated = storage.read(NOTES_DOC).unwrap().unwrap();
        assert!(migrated.starts_with('['));

        // Second read sees the current schema and leaves the document alone
        let again = store.list_all_notes().unwrap();
        assert_eq!(storage.read(NOTES_DOC).unwrap().unwrap(), migrated);
        assert_eq!(again, notes);
    }

    #[test]
    fn test_reading_current_schema_does_not_rewrite() {
        let doc = r#"[{"id":"n1","key":"abs:plank","exerciseName":"Plank","text":"ok","createdAt":1700000000000}]"#;
        let storage = MemoryStorage::new().with_doc(NOTES_DOC, doc);
        let store = NotesStore::new(&storage);

        let notes = store.list_all_notes().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(storage.read(NOTES_DOC).unwrap().as_deref(), Some(doc));
    }

    #[test]
    fn test_corrupt_document_reads_empty() {
        let storage = MemoryStorage::new().with_doc(NOTES_DOC, "{{{");
        let store = NotesStore::new(&storage);
        assert!(store.list_all_notes().unwrap().is_empty());
    }

    #[test]
    fn test_get_and_set_note_shims() {
        let storage = MemoryStorage::new();
        let store = NotesStore::new(&storage);
        assert_eq!(store.get_note("abs:plank").unwrap(), "");

        store.set_note("abs:plank", "first").unwrap();
        store.set_note("abs:plank", "latest").unwrap();
        assert_eq!(store.get_note("abs:plank").unwrap(), "latest");
        assert_eq!(store.list_notes_for(&key("abs:plank")).unwrap().len(), 2);

        store.set_note("abs:plank", "   ").unwrap();
        assert!(store.list_notes_for(&key("abs:plank")).unwrap().is_empty());

        let untouched = store.set_note("nocolon", "text").unwrap();
        assert!(untouched.is_empty());
    }

    #[test]
    fn test_delete_note_dispatches_on_shape() {
        let storage = MemoryStorage::new();
        let store = NotesStore::new(&storage);
        store.add_note(note_input("abs:plank", "a")).unwrap();
        store.add_note(note_input("abs:plank", "b")).unwrap();
        let notes = store.add_note(note_input("legs:squat", "c")).unwrap();
        let squat_id = notes.iter().find(|n| n.text == "c").unwrap().id.clone();

        let left = store.delete_note("abs:plank").unwrap();
        assert_eq!(left.len(), 1);

        let left = store.delete_note(&squat_id).unwrap();
        assert!(left.is_empty());
    }

    #[test]
    fn test_note_target_parse() {
        assert_eq!(
            NoteTarget::parse("abs:plank"),
            NoteTarget::Exercise(key("abs:plank"))
        );
        assert_eq!(NoteTarget::parse("note_abc"), NoteTarget::Id("note_abc".into()));
    }

    #[test]
    fn test_import_skip_duplicates() {
        let storage = MemoryStorage::new();
        let store = NotesStore::new(&storage);
        let t = Utc::now() - Duration::days(2);
        store
            .import_notes(vec![imported("abs:plank", "a", t)], NotesImportStrategy::Append)
            .unwrap();

        let notes = store
            .import_notes(
                vec![
                    imported("abs:plank", "a", t),
                    imported("abs:plank", "b", t),
                    imported("abs:plank", "b", t),
                ],
                NotesImportStrategy::SkipDuplicates,
            )
            .unwrap();
        assert_eq!(notes.len(), 2);
    }

    #[test]
    fn test_import_append_keeps_duplicates() {
        let storage = MemoryStorage::new();
        let store = NotesStore::new(&storage);
        let t = Utc::now() - Duration::hours(1);
        let rows = vec![imported("abs:plank", "a", t)];
        store.import_notes(rows.clone(), NotesImportStrategy::Append).unwrap();
        let notes = store.import_notes(rows, NotesImportStrategy::Append).unwrap();
        assert_eq!(notes.len(), 2);
        assert_ne!(notes[0].id, notes[1].id);
    }

    #[test]
    fn test_import_replace_all_and_sorting() {
        let storage = MemoryStorage::new();
        let store = NotesStore::new(&storage);
        store.add_note(note_input("abs:plank", "old data")).unwrap();

        let now = Utc::now();
        let mut older = imported("legs:squat", "older", now - Duration::days(3));
        older.id = Some("note_keep".into());
        let newer = imported("legs:squat", "newer", now - Duration::days(1));

        let notes = store
            .import_notes(vec![older, newer], NotesImportStrategy::ReplaceAll)
            .unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].text, "newer");
        assert_eq!(notes[1].id, "note_keep");
        assert_eq!(notes[1].exercise_name, "legs:squat");
    }

    #[test]
    fn test_import_reassigns_colliding_ids() {
        let storage = MemoryStorage::new();
        let store = NotesStore::new(&storage);
        let existing = store.add_note(note_input("abs:plank", "mine")).unwrap();

        let mut row = imported("abs:plank", "theirs", Utc::now());
        row.id = Some(existing[0].id.clone());
        let notes = store.import_notes(vec![row], NotesImportStrategy::Append).unwrap();

        let ids: HashSet<_> = notes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_import_replaces_key_shaped_ids() {
        let storage = MemoryStorage::new();
        let store = NotesStore::new(&storage);
        store.add_note(note_input("abs:crunch", "keep me")).unwrap();

        let mut row = imported("legs:squat", "imported", Utc::now());
        row.id = Some("abs:crunch".to_string());
        let notes = store.import_notes(vec![row], NotesImportStrategy::Append).unwrap();
        let imported_id = notes
            .iter()
            .find(|n| n.text == "imported")
            .map(|n| n.id.clone())
            .unwrap();
        assert!(!imported_id.contains(':'));

        // Deleting by the imported note's id must not touch other exercises
        store.delete_note(&imported_id).unwrap();
        let left = store.list_all_notes().unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].text, "keep me");
        assert_eq!(left[0].key, key("abs:crunch"));
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!(
            "skipDuplicates".parse::<NotesImportStrategy>().unwrap(),
            NotesImportStrategy::SkipDuplicates
        );
        assert_eq!(
            "replace-all".parse::<NotesImportStrategy>().unwrap(),
            NotesImportStrategy::ReplaceAll
        );
        assert!("merge".parse::<NotesImportStrategy>().is_err());
    }
}
