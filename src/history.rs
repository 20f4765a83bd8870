use log::{debug, info, trace, warn};

use crate::error::EditorResult;
use crate::scene::Canvas;
use crate::snapshot::SceneSnapshot;
use crate::util::time::timestamp_millis;

/// An immutable serialized snapshot of the scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Monotonically increasing across the lifetime of the manager
    pub seq: u64,
    pub timestamp: u64,
    pub json: String,
}

/// Receives every new entry for external persistence
pub type SaveCallback = Box<dyn FnMut(&HistoryEntry) -> EditorResult<()>>;

/// Linear snapshot log with a cursor pointing at the entry currently rendered.
///
/// The cursor always satisfies `0 <= cursor < len` once the log is seeded.
pub struct HistoryManager {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    next_seq: u64,
    max_entries: Option<usize>,
    batch_depth: usize,
    batch_dirty: bool,
    save_callback: Option<SaveCallback>,
}

impl std::fmt::Debug for HistoryManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryManager")
            .field("len", &self.entries.len())
            .field("cursor", &self.cursor)
            .field("next_seq", &self.next_seq)
            .field("max_entries", &self.max_entries)
            .field("batch_depth", &self.batch_depth)
            .finish()
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(None)
    }
}

impl HistoryManager {
    /// Creates an empty history. `max_entries` of `None` keeps everything.
    pub fn new(max_entries: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            next_seq: 0,
            max_entries: max_entries.map(|max| max.max(1)),
            batch_depth: 0,
            batch_dirty: false,
            save_callback: None,
        }
    }

    pub fn set_save_callback(&mut self, callback: Option<SaveCallback>) {
        self.save_callback = callback;
    }

    /// Drop everything and record the current scene as the only entry.
    /// The save callback is not told about the seed.
    pub fn seed(&mut self, canvas: &Canvas) {
        self.entries.clear();
        self.cursor = 0;
        self.batch_depth = 0;
        self.batch_dirty = false;
        let callback = self.save_callback.take();
        self.save(canvas);
        self.save_callback = callback;
    }

    /// Record the current scene.
    ///
    /// Returns `true` when a new entry was appended. Saves inside a batch are
    /// deferred to [`HistoryManager::end_batch`], and a snapshot identical to
    /// the entry under the cursor is not recorded again.
    pub fn save(&mut self, canvas: &Canvas) -> bool {
        if self.batch_depth > 0 {
            self.batch_dirty = true;
            return false;
        }

        let json = match canvas.serialize().to_json() {
            Ok(json) => json,
            Err(err) => {
                warn!("Failed to serialize scene for history: {err}");
                return false;
            }
        };

        if let Err(err) = SceneSnapshot::from_json(&json) {
            warn!("Refusing to record a snapshot that cannot be restored: {err}");
            return false;
        }

        if self.current().is_some_and(|entry| entry.json == json) {
            trace!("Skipping save, scene unchanged");
            return false;
        }

        if !self.entries.is_empty() && self.cursor + 1 < self.entries.len() {
            debug!(
                "Truncating {} redo entries",
                self.entries.len() - self.cursor - 1
            );
            self.entries.truncate(self.cursor + 1);
        }

        let entry = HistoryEntry {
            seq: self.next_seq,
            timestamp: timestamp_millis(),
            json,
        };
        self.next_seq += 1;
        self.entries.push(entry);
        self.cursor = self.entries.len() - 1;

        if let Some(max) = self.max_entries {
            if self.entries.len() > max {
                let overflow = self.entries.len() - max;
                self.entries.drain(..overflow);
                self.cursor -= overflow;
                debug!("Dropped {overflow} oldest history entries");
            }
        }

        debug!(
            "Saved history entry {} (cursor {}/{})",
            self.next_seq - 1,
            self.cursor,
            self.entries.len()
        );

        if let Some(callback) = self.save_callback.as_mut() {
            if let Err(err) = callback(&self.entries[self.cursor]) {
                warn!("Save callback failed: {err}");
            }
        }
        true
    }

    /// Step back one entry. Returns `false` at the start of the log.
    pub fn undo(&mut self, canvas: &mut Canvas) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.move_to(self.cursor - 1, canvas)
    }

    /// Step forward one entry. Returns `false` at the end of the log.
    pub fn redo(&mut self, canvas: &mut Canvas) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.move_to(self.cursor + 1, canvas)
    }

    fn move_to(&mut self, index: usize, canvas: &mut Canvas) -> bool {
        let snapshot = match SceneSnapshot::from_json(&self.entries[index].json) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("History entry {} is unreadable: {err}", self.entries[index].seq);
                return false;
            }
        };
        info!("History moving from {} to {}", self.cursor, index);
        self.cursor = index;
        canvas.restore(&snapshot);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Start deferring saves, e.g. for the duration of a drag
    pub fn begin_batch(&mut self) {
        self.batch_depth += 1;
    }

    /// Finish a batch, recording one entry if anything was saved during it
    pub fn end_batch(&mut self, canvas: &Canvas) -> bool {
        if self.batch_depth == 0 {
            return false;
        }
        self.batch_depth -= 1;
        if self.batch_depth == 0 && self.batch_dirty {
            self.batch_dirty = false;
            return self.save(canvas);
        }
        false
    }

    pub fn in_batch(&self) -> bool {
        self.batch_depth > 0
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor)
    }
}
