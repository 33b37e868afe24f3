//! Persistence port for the stores.
//!
//! Every store reads and writes whole named documents through [`Storage`].
//! [`FileStorage`] keeps one JSON file per document with file locking and
//! atomic replacement; [`MemoryStorage`] backs tests.

use crate::{Error, Result};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// Document holding the favorites array
pub const FAVORITES_DOC: &str = "favorites";
/// Document holding notes (current array or legacy map)
pub const NOTES_DOC: &str = "notes";
/// Current multi-plan regimen document
pub const REGIMEN_DOC: &str = "regimen_v2";
/// Legacy single-plan regimen document; read for migration, never written
pub const LEGACY_REGIMEN_DOC: &str = "regimen_v1";

/// Named-document persistence
pub trait Storage {
    /// Returns the raw document text, or `None` when it does not exist.
    fn read(&self, doc: &str) -> Result<Option<String>>;

    /// Replaces the whole document.
    fn write(&self, doc: &str, contents: &str) -> Result<()>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn read(&self, doc: &str) -> Result<Option<String>> {
        (**self).read(doc)
    }

    fn write(&self, doc: &str, contents: &str) -> Result<()> {
        (**self).write(doc, contents)
    }
}

/// Directory of `<doc>.json` files
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create storage rooted at `dir` (created lazily on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing a document
    pub fn path_for(&self, doc: &str) -> PathBuf {
        self.dir.join(format!("{}.json", doc))
    }
}

impl Storage for FileStorage {
    /// Reads with a shared lock.
    ///
    /// Only a missing file is reported as absent. Any other I/O failure is
    /// an error, so callers never mistake an unreadable document for an
    /// empty one and write defaults over it.
    fn read(&self, doc: &str) -> Result<Option<String>> {
        let path = self.path_for(doc);

        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No {} document at {:?}", doc, path);
                return Ok(None);
            }
            Err(e) => {
                tracing::error!("Unable to open {:?}: {}", path, e);
                return Err(Error::Io(e));
            }
        };

        file.lock_shared()?;

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::error!("Failed to read {:?}: {}", path, e);
            return Err(Error::Io(e));
        }

        file.unlock()?;
        tracing::debug!("Read {} bytes from {:?}", contents.len(), path);
        Ok(Some(contents))
    }

    /// Atomically writes by:
    /// 1. Writing to a temp file in the same directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    fn write(&self, doc: &str, contents: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(doc);

        let temp = NamedTempFile::new_in(&self.dir)?;

        // Exclusive lock on the temp file serializes concurrent writers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Wrote {} document to {:?}", doc, path);
        Ok(())
    }
}

/// In-process storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    docs: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document, e.g. with a legacy schema
    pub fn with_doc(self, doc: &str, contents: &str) -> Self {
        self.write(doc, contents).ok();
        self
    }
}

impl Storage for MemoryStorage {
    fn read(&self, doc: &str) -> Result<Option<String>> {
        let docs = self.docs.lock().unwrap_or_else(|e| e.into_inner());
        Ok(docs.get(doc).cloned())
    }

    fn write(&self, doc: &str, contents: &str) -> Result<()> {
        let mut docs = self.docs.lock().unwrap_or_else(|e| e.into_inner());
        docs.insert(doc.to_string(), contents.to_string());
        Ok(())
    }
}
