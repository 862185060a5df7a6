//! Events that can be placed on a map node.

use serde::{Deserialize, Serialize};

/// What happens when the player reaches or starts a node.
///
/// Serialized with a `kind` tag; an unknown tag in a map or generator
/// config fails deserialization, which is treated as a fatal config
/// error.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MapEvent {
    /// Invisible to the player, does nothing.
    #[default]
    Empty,
    /// A combat encounter; blocks progress past the node until won.
    Encounter {
        #[serde(default)]
        completed: bool,
    },
    /// Exit node leading to another map.
    #[serde(rename_all = "camelCase")]
    EnterMap { target_map: String, place_at_end: bool },
    /// Talk to an NPC.
    Dialog {
        npc: String,
        #[serde(default)]
        completed: bool,
    },
    /// Buy cards from a trader.
    Shop { trader: String },
    /// Restore health.
    Heal { amount: u32 },
    /// Pick one card out of the offered groups.
    ChooseCard { groups: Vec<String> },
}

impl MapEvent {
    /// Whether the player is currently barred from moving past the node.
    pub fn blocks_progress(&self) -> bool {
        matches!(self, Self::Encounter { completed: false })
    }

    pub fn can_be_started(&self) -> bool {
        match self {
            Self::Empty => false,
            Self::Encounter { completed } | Self::Dialog { completed, .. } => !completed,
            Self::EnterMap { .. } | Self::Shop { .. } | Self::Heal { .. }
            | Self::ChooseCard { .. } => true,
        }
    }

    pub fn is_completed(&self) -> bool {
        match self {
            Self::Encounter { completed } | Self::Dialog { completed, .. } => *completed,
            _ => false,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Encounter { .. } => "Encounter".to_string(),
            Self::EnterMap { target_map, .. } => format!("Enter {target_map}"),
            Self::Dialog { npc, .. } => format!("Talk to {npc}"),
            Self::Shop { trader } => format!("{trader}'s shop"),
            Self::Heal { .. } => "Rest".to_string(),
            Self::ChooseCard { .. } => "Card reward".to_string(),
        }
    }

    pub fn description(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Encounter { .. } => "Take on enemies and come out on top!".to_string(),
            Self::EnterMap { target_map, .. } => {
                format!("Have fun exploring {target_map}")
            }
            Self::Dialog { npc, .. } => format!("{npc} wants a word with you"),
            Self::Shop { trader } => format!("{trader} sells cards for cash"),
            Self::Heal { amount } => format!("Recover up to {amount} health"),
            Self::ChooseCard { .. } => "Choose one card to add to your deck".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_open_encounters_block_progress() {
        assert!(MapEvent::Encounter { completed: false }.blocks_progress());
        assert!(!MapEvent::Encounter { completed: true }.blocks_progress());
        assert!(!MapEvent::Empty.blocks_progress());
        assert!(!MapEvent::Heal { amount: 10 }.blocks_progress());
    }

    #[test]
    fn unknown_event_kind_fails_to_parse() {
        let parsed: Result<MapEvent, _> = serde_json::from_str(r#"{"kind": "casino"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn event_json_round_trips() {
        let event = MapEvent::EnterMap { target_map: "salem".to_string(), place_at_end: true };
        let json = serde_json::to_string(&event).expect("serialize");
        assert!(json.contains("enterMap"), "tag should be camelCase: {json}");
        assert!(json.contains("targetMap"), "fields should be camelCase: {json}");
        let back: MapEvent = serde_json::from_str(&json).expect("parse");
        assert_eq!(event, back);
    }

    #[test]
    fn completed_flag_defaults_to_false() {
        let event: MapEvent = serde_json::from_str(r#"{"kind": "encounter"}"#).expect("parse");
        assert_eq!(event, MapEvent::Encounter { completed: false });
    }
}
