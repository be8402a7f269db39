//! Card content value types
//!
//! These are the nested content shapes carried inside a flow node: carousel
//! decks, rich card bodies, and their call-to-action entries. They are pure
//! data; identity of a card or action is its position in the owning sequence.

use serde::{Deserialize, Serialize};

/// A call-to-action entry on a card
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardAction {
    /// The CTA kind. Three kinds are offered by the editor but the model is
    /// intentionally permissive: any string is structurally valid.
    pub value: String,
}

impl CardAction {
    /// CTA kind: open a link
    pub const LINK: &'static str = "link";
    /// CTA kind: button press
    pub const BUTTON: &'static str = "button";
    /// CTA kind: quick reply
    pub const REPLY: &'static str = "reply";

    /// Create an action with the given kind
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Whether the value is one of the kinds the editor offers
    pub fn is_known_kind(&self) -> bool {
        matches!(self.value.as_str(), Self::LINK | Self::BUTTON | Self::REPLY)
    }
}

/// One card: a carousel slide or a standalone rich card body
///
/// Used both as an element of [`CarouselData::cards`] (where `selected`
/// carries the editor's active-slide flag) and as the rich card content
/// (where `selected` is absent and stays off the wire).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CardContent {
    /// Card title
    pub title: String,

    /// Card description
    pub description: String,

    /// Image reference, an opaque URI or empty
    pub image: String,

    /// Ordered CTA entries, rendered as additional connectable ports
    pub actions: Vec<CardAction>,

    /// Active-slide flag, only meaningful inside a carousel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
}

impl CardContent {
    /// An empty card, the shape the editor seeds new slides with
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append an empty CTA entry
    pub fn add_action(&mut self) {
        self.actions.push(CardAction::default());
    }

    /// Set the value of the action at `index`. Returns whether an entry
    /// existed at that position.
    pub fn update_action(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.actions.get_mut(index) {
            Some(action) => {
                action.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Remove the action at `index`. Out-of-range is a no-op.
    pub fn remove_action(&mut self, index: usize) {
        if index < self.actions.len() {
            self.actions.remove(index);
        }
    }
}

/// The card deck of a carousel node
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CarouselData {
    /// Ordered slides. The editor always seeds one card, but an empty deck
    /// is representable.
    pub cards: Vec<CardContent>,
}

impl CarouselData {
    /// A deck seeded with a single empty card, the editor's starting state
    pub fn seeded() -> Self {
        Self {
            cards: vec![CardContent::empty()],
        }
    }

    /// Insert a fresh empty card immediately after `index`. An out-of-range
    /// index appends at the end.
    pub fn insert_card_after(&mut self, index: usize) {
        let at = (index + 1).min(self.cards.len());
        self.cards.insert(at, CardContent::empty());
    }

    /// Remove the card at `index`. Out-of-range is a no-op.
    pub fn remove_card(&mut self, index: usize) {
        if index < self.cards.len() {
            self.cards.remove(index);
        }
    }
}

/// Tagged node content: which card variant a node carries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "content", rename_all = "camelCase")]
pub enum NodeDatum {
    /// A multi-card carousel
    Carousel(CarouselData),
    /// A single rich card
    RichCard(CardContent),
}

impl NodeDatum {
    /// Fresh carousel content with one empty seeded card
    pub fn new_carousel() -> Self {
        NodeDatum::Carousel(CarouselData::seeded())
    }

    /// Fresh empty rich card content
    pub fn new_rich_card() -> Self {
        NodeDatum::RichCard(CardContent::empty())
    }
}
