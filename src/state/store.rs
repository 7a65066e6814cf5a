//! The annotation library: unique names mapped to reusable text.

use crate::error::{StoreError, StoreResult};
use crate::sheet::SheetCodec;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// A named snippet as it travels to and from a workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub name: String,
    pub text: String,
}

impl Annotation {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Answer from the caller when an imported name already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
    Skip,
    Overwrite,
}

/// An imported entry that could not be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    /// 1-based position in the imported sequence, not a spreadsheet row
    pub entry: usize,
    pub name: String,
    pub reason: String,
}

/// Per-entry outcome of [`AnnotationStore::import_from`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub inserted: usize,
    pub overwritten: usize,
    pub skipped: usize,
    pub rejected: Vec<RejectedEntry>,
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} inserted, {} overwritten, {} skipped, {} rejected",
            self.inserted,
            self.overwritten,
            self.skipped,
            self.rejected.len()
        )
    }
}

/// Owns every annotation, keyed by name.
///
/// Names and texts are trimmed on the way in and neither may be blank. The
/// backing map is ordered, so every enumeration comes out sorted by name.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    entries: BTreeMap<String, String>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name.trim()).map(String::as_str)
    }

    /// Insert a new annotation. Existing names are never replaced here.
    pub fn add(&mut self, name: &str, text: &str) -> StoreResult<()> {
        let (name, text) = validated(name, text)?;
        if self.entries.contains_key(&name) {
            return Err(StoreError::DuplicateName(name));
        }
        debug!(%name, "annotation added");
        self.entries.insert(name, text);
        Ok(())
    }

    /// Delete an annotation and hand back the text it held.
    pub fn remove(&mut self, name: &str) -> StoreResult<String> {
        let name = name.trim();
        let text = self
            .entries
            .remove(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        debug!(%name, "annotation removed");
        Ok(text)
    }

    pub fn clear(&mut self) {
        debug!(count = self.entries.len(), "annotation store cleared");
        self.entries.clear();
    }

    /// Replace the text of an existing annotation, returning the previous text.
    ///
    /// Text already composed into a display is not touched.
    pub fn update(&mut self, name: &str, new_text: &str) -> StoreResult<String> {
        let name = name.trim();
        let new_text = new_text.trim();
        let slot = self
            .entries
            .get_mut(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        if new_text.is_empty() {
            return Err(StoreError::InvalidInput(format!(
                "annotation '{name}' cannot be left empty"
            )));
        }
        Ok(std::mem::replace(slot, new_text.to_string()))
    }

    /// Apply a batch of text edits as one unit.
    ///
    /// Every edit is checked before any is written, so a single bad entry
    /// leaves the store untouched. Returns how many texts actually changed.
    pub fn apply_edits(&mut self, edits: &[Annotation]) -> StoreResult<usize> {
        for edit in edits {
            let name = edit.name.trim();
            if !self.entries.contains_key(name) {
                return Err(StoreError::NotFound(name.to_string()));
            }
            if edit.text.trim().is_empty() {
                return Err(StoreError::InvalidInput(format!(
                    "annotation '{name}' cannot be left empty"
                )));
            }
        }

        let mut changed = 0;
        for edit in edits {
            if self.get(&edit.name) != Some(edit.text.trim()) {
                self.update(&edit.name, &edit.text)?;
                changed += 1;
            }
        }
        debug!(changed, "bulk edit applied");
        Ok(changed)
    }

    /// Names in ascending order, ready for grid layout.
    pub fn list(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Every annotation, sorted by name.
    pub fn export_all(&self) -> Vec<Annotation> {
        self.entries
            .iter()
            .map(|(name, text)| Annotation::new(name.as_str(), text.as_str()))
            .collect()
    }

    /// Merge entries into the store one at a time.
    ///
    /// `on_conflict` is asked synchronously for every name that already
    /// exists, including names inserted earlier in the same batch. Blank rows
    /// are rejected individually; the rest of the batch still applies.
    pub fn import_from<I, F>(&mut self, entries: I, mut on_conflict: F) -> ImportReport
    where
        I: IntoIterator<Item = Annotation>,
        F: FnMut(&str) -> ConflictChoice,
    {
        let mut report = ImportReport::default();
        for (idx, entry) in entries.into_iter().enumerate() {
            let (name, text) = match validated(&entry.name, &entry.text) {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(entry = idx + 1, name = %entry.name, "import entry rejected: {e}");
                    report.rejected.push(RejectedEntry {
                        entry: idx + 1,
                        name: entry.name,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if self.entries.contains_key(&name) {
                match on_conflict(&name) {
                    ConflictChoice::Skip => {
                        report.skipped += 1;
                        continue;
                    }
                    ConflictChoice::Overwrite => {
                        self.entries.insert(name, text);
                        report.overwritten += 1;
                    }
                }
            } else {
                self.entries.insert(name, text);
                report.inserted += 1;
            }
        }
        info!(%report, "import finished");
        report
    }

    /// Replace the store contents with the rows of a workbook.
    ///
    /// A missing file loads as an empty library. On any read failure the
    /// current contents are kept.
    pub fn load_from(&mut self, codec: &dyn SheetCodec, path: &Path) -> StoreResult<usize> {
        if !path.exists() {
            debug!(path = %path.display(), "no annotation file, starting empty");
            self.entries.clear();
            return Ok(0);
        }

        let rows = codec.read(path)?;
        let mut loaded = BTreeMap::new();
        for (idx, row) in rows.into_iter().enumerate() {
            let (name, text) = match validated(&row.name, &row.text) {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(entry = idx + 1, path = %path.display(), "skipping entry: {e}");
                    continue;
                }
            };
            if loaded.contains_key(&name) {
                warn!(%name, path = %path.display(), "duplicate name in file, keeping first row");
                continue;
            }
            loaded.insert(name, text);
        }

        self.entries = loaded;
        info!(count = self.entries.len(), path = %path.display(), "annotations loaded");
        Ok(self.entries.len())
    }

    /// Persist the store. An empty store leaves the file alone and returns `false`.
    pub fn save_to(&self, codec: &dyn SheetCodec, path: &Path) -> StoreResult<bool> {
        if self.entries.is_empty() {
            debug!(path = %path.display(), "store empty, skipping save");
            return Ok(false);
        }
        codec.write(path, &self.export_all())?;
        info!(count = self.entries.len(), path = %path.display(), "annotations saved");
        Ok(true)
    }

    /// Write every annotation to a user-chosen workbook, even when there are none.
    pub fn export_to(&self, codec: &dyn SheetCodec, path: &Path) -> StoreResult<usize> {
        codec.write(path, &self.export_all())?;
        info!(count = self.entries.len(), path = %path.display(), "annotations exported");
        Ok(self.entries.len())
    }
}

fn validated(name: &str, text: &str) -> StoreResult<(String, String)> {
    let name = name.trim();
    let text = text.trim();
    if name.is_empty() || text.is_empty() {
        return Err(StoreError::InvalidInput(
            "both name and annotation text must be provided".to_string(),
        ));
    }
    Ok((name.to_string(), text.to_string()))
}
