#![forbid(unsafe_code)]

//! Local data store for the GitFit fitness client.
//!
//! This crate provides:
//! - Favorites, notes and multi-plan regimen stores
//! - Transparent migration of older persisted schemas
//! - CSV/JSON import and export with merge strategies
//! - The exercise catalog, quick fill, preset regimens and coaching tips
//! - Persistence behind a small storage port

pub mod types;
pub mod error;
pub mod key;
pub mod storage;
pub mod schema;
pub mod favorites;
pub mod notes;
pub mod notes_csv;
pub mod regimen;
pub mod regimen_io;
pub mod catalog;
pub mod quick_fill;
pub mod presets;
pub mod tips;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use key::ExerciseKey;
pub use types::*;
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use favorites::FavoritesStore;
pub use notes::{NewNote, NotePatch, NoteTarget, NotesImportStrategy, NotesStore};
pub use regimen::{Direction, ImportedRegimen, RegimenImportStrategy, RegimenStore};
pub use catalog::{get_default_catalog, Catalog, StaticCatalog};
pub use config::Config;
