//! One face of a pairing slot.
//!
//! An item tracks its selected/removed state, its announcement label, and
//! whether it currently participates in the tab order. Visual presentation is
//! delegated to the rendering collaborator; the item only carries state.

use crate::config::Labels;

/// Stable identity of an item, assigned at roster construction and unchanged
/// by shuffling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(pub usize);

/// Display payload for one face.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Image {
        path: String,
        width: Option<u32>,
        height: Option<u32>,
    },
    Text(String),
}

impl Payload {
    /// Short text standing in for the face when no alt text is configured.
    pub fn fallback_alt(&self) -> &str {
        match self {
            Payload::Image { path, .. } => path,
            Payload::Text(text) => text,
        }
    }
}

/// One face of a pair.
#[derive(Debug, Clone)]
pub struct Item {
    id: ItemId,
    partner: ItemId,
    payload: Payload,
    alt: String,
    feedback: Option<String>,
    selected: bool,
    removed: bool,
    tabbable: bool,
    label: String,
}

impl Item {
    pub fn new(
        id: ItemId,
        partner: ItemId,
        payload: Payload,
        alt: Option<String>,
        feedback: Option<String>,
    ) -> Self {
        let alt = alt.unwrap_or_else(|| payload.fallback_alt().to_string());
        Self {
            id,
            partner,
            payload,
            alt,
            feedback,
            selected: false,
            removed: false,
            tabbable: false,
            label: String::new(),
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Identity of the matching face.
    pub fn partner(&self) -> ItemId {
        self.partner
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn alt(&self) -> &str {
        &self.alt
    }

    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    /// Mark the item selected. Returns `false` when the call is an
    /// announce-only no-op (already selected, or removed from play).
    pub fn select(&mut self) -> bool {
        if self.selected || self.removed {
            return false;
        }
        self.selected = true;
        true
    }

    /// Return the face to its hidden state and restore the default label.
    pub fn unselect(&mut self, position: usize, labels: &Labels) {
        self.selected = false;
        self.update_label(position, false, true, labels);
    }

    /// Remove the item from play. The face stays visually locked in its
    /// selected state; no further transitions happen except a full reset.
    pub fn remove(&mut self) {
        self.selected = true;
        self.removed = true;
    }

    /// Clear all play state. Used only during a game reset.
    pub fn reset(&mut self, position: usize, labels: &Labels) {
        self.selected = false;
        self.removed = false;
        self.update_label(position, false, true, labels);
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn is_tabbable(&self) -> bool {
        self.tabbable
    }

    pub fn make_tabbable(&mut self) {
        self.tabbable = true;
    }

    pub fn make_untabbable(&mut self) {
        self.tabbable = false;
    }

    /// Current announcement label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Recompute the announcement label.
    ///
    /// `position` is the one-based roster slot. With `reset` the label goes
    /// back to the unturned wording; otherwise it announces the face's alt
    /// text, prefixed with the matched wording when `is_matched`.
    pub fn update_label(&mut self, position: usize, is_matched: bool, reset: bool, labels: &Labels) {
        let body = if reset { labels.pair_unturned.as_str() } else { self.alt.as_str() };
        let body = if is_matched {
            format!("{} {}", labels.pair_matched, body)
        } else {
            body.to_string()
        };
        self.label = format!("{}{}", labels.prefix_for(position), body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> Item {
        Item::new(
            ItemId(0),
            ItemId(1),
            Payload::Text("soleil".to_string()),
            Some("sun".to_string()),
            None,
        )
    }

    #[test]
    fn select_is_announce_only_when_repeated() {
        let mut item = item();
        assert!(item.select());
        assert!(!item.select());
        assert!(item.is_selected());
    }

    #[test]
    fn removed_item_is_never_selectable() {
        let mut item = item();
        item.remove();
        assert!(!item.select());
        assert!(item.is_removed());
        assert!(item.is_selected());
    }

    #[test]
    fn unselect_restores_default_label() {
        let labels = Labels::default();
        let mut item = item();
        item.select();
        item.update_label(2, false, false, &labels);
        assert_eq!(item.label(), "Pair 2: sun");

        item.unselect(2, &labels);
        assert!(!item.is_selected());
        assert_eq!(item.label(), "Pair 2: Unturned.");
    }

    #[test]
    fn matched_label_carries_the_match_wording() {
        let labels = Labels::default();
        let mut item = item();
        item.update_label(1, true, false, &labels);
        assert_eq!(item.label(), "Pair 1: Match found. sun");
    }

    #[test]
    fn reset_clears_both_flags() {
        let labels = Labels::default();
        let mut item = item();
        item.select();
        item.remove();
        item.reset(1, &labels);
        assert!(!item.is_selected());
        assert!(!item.is_removed());
    }

    #[test]
    fn fallback_alt_comes_from_payload() {
        let item = Item::new(
            ItemId(4),
            ItemId(5),
            Payload::Image {
                path: "cards/ace.png".to_string(),
                width: None,
                height: None,
            },
            None,
            None,
        );
        assert_eq!(item.alt(), "cards/ace.png");
    }
}
