//! Game configuration: pair descriptors, behaviour preferences, and the
//! announcement strings shown to assistive technology.
//!
//! Descriptors are validated with a static predicate before any item is
//! constructed; invalid entries are skipped, never fatal. A configuration
//! yielding zero valid pairs produces an inert game.

use serde::Deserialize;

use crate::item::Payload;

/// Reference to an image asset used as one face of a pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub path: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Source for a single face: an image asset or plain text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FaceSource {
    Image(ImageRef),
    Text(String),
}

impl FaceSource {
    fn is_usable(&self) -> bool {
        match self {
            FaceSource::Image(image) => !image.path.is_empty(),
            FaceSource::Text(text) => !text.trim().is_empty(),
        }
    }

    pub(crate) fn to_payload(&self) -> Payload {
        match self {
            FaceSource::Image(image) => Payload::Image {
                path: image.path.clone(),
                width: image.width,
                height: image.height,
            },
            FaceSource::Text(text) => Payload::Text(text.clone()),
        }
    }
}

/// One configured pair: two faces that match each other, optional alt text
/// for each face, and optional feedback shown when the pair is found.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairDescriptor {
    #[serde(default)]
    pub face: Option<FaceSource>,
    #[serde(default, rename = "match")]
    pub partner: Option<FaceSource>,
    #[serde(default)]
    pub face_alt: Option<String>,
    #[serde(default)]
    pub partner_alt: Option<String>,
    #[serde(default)]
    pub feedback: Option<String>,
}

impl PairDescriptor {
    /// Check that the descriptor can produce two playable faces.
    pub fn is_valid(&self) -> bool {
        matches!(&self.face, Some(face) if face.is_usable())
            && matches!(&self.partner, Some(partner) if partner.is_usable())
    }
}

/// How the shuffled roster is arranged for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RosterArrangement {
    /// One shuffled list holding both faces of every pair.
    #[default]
    Single,
    /// First faces shuffled into a left list, match faces into a right list.
    DualList,
}

/// Behaviour knobs for a game instance.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GamePrefs {
    /// Offer a reset action once the game is complete.
    pub allow_retry: bool,
    /// Recompute grid columns and scale on resize notifications.
    pub use_grid: bool,
    /// Roster arrangement: one mixed list, or left/right face lists.
    pub arrangement: RosterArrangement,
    /// Pause between the second selection and the comparison, in milliseconds.
    pub compare_delay_ms: u64,
    /// Pause between a reset and the relayout/refocus pass, in milliseconds.
    pub reset_relayout_delay_ms: u64,
    /// Seed for the roster shuffle. Unset means an entropy seed.
    pub shuffle_seed: Option<u64>,
}

impl Default for GamePrefs {
    fn default() -> Self {
        Self {
            allow_retry: true,
            use_grid: true,
            arrangement: RosterArrangement::Single,
            compare_delay_ms: 100,
            reset_relayout_delay_ms: 600,
            shuffle_seed: None,
        }
    }
}

impl GamePrefs {
    pub fn compare_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.compare_delay_ms)
    }

    pub fn reset_relayout_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.reset_relayout_delay_ms)
    }
}

/// Status and announcement strings. `%num` in [`Labels::pair_prefix`] is
/// replaced with the one-based roster position.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Labels {
    pub time_spent: String,
    pub feedback: String,
    pub try_again: String,
    pub close_label: String,
    pub label: String,
    pub done: String,
    pub pair_prefix: String,
    pub pair_unturned: String,
    pub pair_matched: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            time_spent: "Time spent".to_string(),
            feedback: "Good work!".to_string(),
            try_again: "Reset".to_string(),
            close_label: "Close".to_string(),
            label: "Find the matching pairs.".to_string(),
            done: "All of the pairs have been found.".to_string(),
            pair_prefix: "Pair %num: ".to_string(),
            pair_unturned: "Unturned.".to_string(),
            pair_matched: "Match found.".to_string(),
        }
    }
}

impl Labels {
    /// Render the pair prefix for a one-based roster position.
    pub fn prefix_for(&self, position: usize) -> String {
        self.pair_prefix.replace("%num", &position.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_descriptor_is_valid() {
        let descriptor: PairDescriptor = serde_json::from_value(serde_json::json!({
            "face": { "path": "fruit/apple.png", "width": 128, "height": 96 },
            "match": { "path": "fruit/apple-word.png" },
            "faceAlt": "An apple",
            "feedback": "Apples match!"
        }))
        .unwrap();
        assert!(descriptor.is_valid());
        assert_eq!(descriptor.feedback.as_deref(), Some("Apples match!"));
    }

    #[test]
    fn text_faces_deserialize_via_untagged_variant() {
        let descriptor: PairDescriptor = serde_json::from_value(serde_json::json!({
            "face": "bonjour",
            "match": "hello"
        }))
        .unwrap();
        assert!(descriptor.is_valid());
        assert!(matches!(descriptor.face, Some(FaceSource::Text(_))));
    }

    #[test]
    fn missing_or_blank_faces_are_invalid() {
        let missing: PairDescriptor = serde_json::from_value(serde_json::json!({
            "face": { "path": "only-one-side.png" }
        }))
        .unwrap();
        assert!(!missing.is_valid());

        let blank: PairDescriptor = serde_json::from_value(serde_json::json!({
            "face": "   ",
            "match": "hello"
        }))
        .unwrap();
        assert!(!blank.is_valid());
    }

    #[test]
    fn prefs_defaults_match_play_pacing() {
        let prefs = GamePrefs::default();
        assert_eq!(prefs.compare_delay_ms, 100);
        assert_eq!(prefs.reset_relayout_delay_ms, 600);
        assert!(prefs.use_grid);
        assert_eq!(prefs.arrangement, RosterArrangement::Single);
    }

    #[test]
    fn arrangement_deserializes_from_camel_case() {
        let prefs: GamePrefs =
            serde_json::from_value(serde_json::json!({ "arrangement": "dualList" })).unwrap();
        assert_eq!(prefs.arrangement, RosterArrangement::DualList);
    }

    #[test]
    fn prefix_interpolates_position() {
        let labels = Labels::default();
        assert_eq!(labels.prefix_for(3), "Pair 3: ");
    }
}
