//! Rendered cell contents for each roster slot, with hash-based dirty
//! tracking so unchanged cells are never re-emitted to the terminal.

use std::collections::HashSet;

use blake3::Hash;

use crate::item::Item;

#[derive(Debug, Clone)]
struct CellState {
    content: String,
    hash: Option<Hash>,
    is_dirty: bool,
}

impl CellState {
    fn new() -> Self {
        Self {
            content: String::new(),
            hash: None,
            is_dirty: true,
        }
    }

    fn update_content(&mut self, content: String) {
        let new_hash = blake3::hash(content.as_bytes());
        if self.hash.map(|h| h != new_hash).unwrap_or(true) {
            self.content = content;
            self.hash = Some(new_hash);
            self.is_dirty = true;
        }
    }
}

/// Registry mapping roster slots to their last rendered content.
#[derive(Debug, Default)]
pub struct ViewRegistry {
    cells: Vec<CellState>,
    dirty: HashSet<usize>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match the registry to the roster length. New slots start dirty.
    pub fn sync_len(&mut self, len: usize) {
        if self.cells.len() == len {
            return;
        }
        while self.cells.len() > len {
            self.cells.pop();
        }
        while self.cells.len() < len {
            self.dirty.insert(self.cells.len());
            self.cells.push(CellState::new());
        }
        self.dirty.retain(|index| *index < len);
    }

    /// Record the content for a slot, marking it dirty only on change.
    pub fn apply_content(&mut self, index: usize, content: String) {
        let Some(cell) = self.cells.get_mut(index) else {
            return;
        };
        cell.update_content(content);
        if cell.is_dirty {
            self.dirty.insert(index);
        }
    }

    /// Drain dirty slots in display order.
    pub fn take_dirty(&mut self) -> Vec<(usize, String)> {
        let mut indices: Vec<usize> = self.dirty.drain().collect();
        indices.sort_unstable();
        indices
            .into_iter()
            .filter_map(|index| {
                self.cells.get_mut(index).map(|cell| {
                    cell.is_dirty = false;
                    (index, cell.content.clone())
                })
            })
            .collect()
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }
}

/// Compose the face shown for one item: hidden faces are shaded, revealed
/// faces show their alt text in reverse video, removed faces leave a blank
/// cell. The focused cell is bracketed.
pub fn compose_cell(item: &Item, focused: bool) -> String {
    let face = if item.is_removed() {
        String::new()
    } else if item.is_selected() {
        format!("\x1b[7m{}\x1b[0m", item.alt())
    } else {
        "\u{2592}\u{2592}\u{2592}".to_string()
    };
    if focused {
        format!("[{face}]")
    } else {
        face
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemId, Payload};

    #[test]
    fn new_slots_start_dirty() {
        let mut view = ViewRegistry::new();
        view.sync_len(3);
        let dirty = view.take_dirty();
        assert_eq!(dirty.len(), 3);
        assert_eq!(dirty[0].0, 0);
    }

    #[test]
    fn unchanged_content_stays_clean() {
        let mut view = ViewRegistry::new();
        view.sync_len(1);
        view.take_dirty();

        view.apply_content(0, "hello".to_string());
        assert_eq!(view.take_dirty().len(), 1);

        view.apply_content(0, "hello".to_string());
        assert!(!view.has_dirty());
    }

    #[test]
    fn compose_distinguishes_item_states() {
        let mut item = Item::new(
            ItemId(0),
            ItemId(1),
            Payload::Text("sun".to_string()),
            None,
            None,
        );
        assert!(compose_cell(&item, false).contains('\u{2592}'));
        item.select();
        assert!(compose_cell(&item, false).contains("sun"));
        item.remove();
        assert_eq!(compose_cell(&item, false), "");
        assert_eq!(compose_cell(&item, true), "[]");
    }
}
