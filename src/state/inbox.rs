use log::debug;

use crate::model::{DEFAULT_GLYPH, GLYPH_PALETTE, InboxEntry, InboxId, ThreadHandoff};

/// Ordered collection of inbox entries, newest first. Owns the pending glyph
/// for the next creation; all state lives for the screen session only.
pub struct InboxRegistry {
    entries: Vec<InboxEntry>,
    pending_glyph: String,
    next_id: u64,
}

impl InboxRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            pending_glyph: DEFAULT_GLYPH.to_string(),
            next_id: 1,
        }
    }

    /// Starting set shown on first launch. Created oldest-to-newest so that
    /// Friends ends up at the head of the list.
    pub fn seeded() -> Self {
        let mut registry = Self::new();
        for (name, glyph) in [("Work", "💼"), ("Family", "👨‍👩‍👧"), ("Friends", "👬")] {
            registry.select_glyph(glyph);
            registry.create(name);
        }
        registry
    }

    /// Creates an entry from the trimmed name and the pending glyph, prepends
    /// it, and resets the pending glyph. A whitespace-only name is rejected
    /// and nothing changes.
    pub fn create(&mut self, name: &str) -> Option<InboxId> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let id = InboxId(self.next_id);
        self.next_id += 1;
        let glyph = std::mem::replace(&mut self.pending_glyph, DEFAULT_GLYPH.to_string());
        self.entries.insert(
            0,
            InboxEntry {
                id,
                name: name.to_string(),
                glyph,
            },
        );
        debug!("inbox {:?} created: {}", id, name);
        Some(id)
    }

    /// No-op when the id is not present.
    pub fn delete(&mut self, id: InboxId) {
        self.entries.retain(|entry| entry.id != id);
    }

    /// Records the glyph used by the next `create` only. Glyphs outside the
    /// palette are ignored.
    pub fn select_glyph(&mut self, glyph: &str) {
        if GLYPH_PALETTE.contains(&glyph) {
            self.pending_glyph = glyph.to_string();
        }
    }

    pub fn pending_glyph(&self) -> &str {
        &self.pending_glyph
    }

    pub fn entries(&self) -> &[InboxEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds the selection payload for opening a thread. The display name is
    /// pre-composed; the thread never looks back into the registry.
    pub fn handoff(&self, id: InboxId) -> Option<ThreadHandoff> {
        self.entries.iter().find(|entry| entry.id == id).map(|entry| ThreadHandoff {
            inbox_id: entry.id,
            display_name: format!("{} {}", entry.glyph, entry.name),
        })
    }
}

impl Default for InboxRegistry {
    fn default() -> Self {
        Self::new()
    }
}
