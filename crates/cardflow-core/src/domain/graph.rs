//! Graph entities: nodes, connections, and the canvas change deltas
//!
//! These are the canonical shapes the store owns and the wire shapes the
//! canvas layer and the durable snapshot share. Field names follow the
//! canvas layer's camelCase JSON convention.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::content::NodeDatum;

/// A point in canvas coordinates
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Position {
    /// Create a position
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Measured node extent, reported back by the canvas after layout
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Dimensions {
    /// Measured width in canvas units
    pub width: f64,
    /// Measured height in canvas units
    pub height: f64,
}

/// Aggregate: a flow node
///
/// The store owns the authoritative node sequence; the canvas holds a
/// transient mirror and is the source of truth for `position`, `selected`
/// and `dragging` while this side holds the card content in `data`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Unique caller-assigned identifier, typically a timestamp string
    pub id: String,

    /// Current canvas position
    pub position: Position,

    /// Canvas renderer key, orthogonal to the content tag in `data`
    #[serde(rename = "type")]
    pub node_type: String,

    /// Card content carried by this node
    pub data: NodeDatum,

    /// Extent reported by the canvas after layout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measured: Option<Dimensions>,

    /// Canvas selection flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,

    /// Canvas drag-in-progress flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dragging: Option<bool>,
}

impl Node {
    /// Create a node with fresh content and no canvas flags
    pub fn new(
        id: impl Into<String>,
        position: Position,
        node_type: impl Into<String>,
        data: NodeDatum,
    ) -> Self {
        Self {
            id: id.into(),
            position,
            node_type: node_type.into(),
            data,
            measured: None,
            selected: None,
            dragging: None,
        }
    }
}

/// Mint a fresh node id from the current wall clock, millisecond precision
pub fn mint_node_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

/// The full visual-edge descriptor the canvas draws
///
/// Captured verbatim inside a [`Connection`] so the canvas edge list can be
/// rebuilt from canonical state after a load.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDescriptor {
    /// Edge identifier on the canvas
    pub id: String,

    /// Source node id
    pub source: String,

    /// Target node id
    pub target: String,

    /// Source port handle, when the edge leaves a specific action port
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,

    /// Target port handle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,

    /// Canvas edge renderer key
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<String>,

    /// Animation flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animated: Option<bool>,

    /// Style payload, opaque to the engine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<serde_json::Value>,

    /// Arbitrary extra payload, opaque to the engine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

/// Aggregate: a canonical connection between two node ports
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// Unique connection identifier
    pub id: String,

    /// Source node id
    pub source_id: String,

    /// Target node id
    pub target_id: String,

    /// Source node position captured at connection-creation time.
    /// Write-once audit snapshot; later node moves do not rewrite it.
    pub source_position: Position,

    /// Target node position captured at connection-creation time
    pub target_position: Position,

    /// The canvas edge descriptor this connection was derived from
    pub edge_data: EdgeDescriptor,
}

impl Connection {
    /// Whether this connection touches the given node on either end
    pub fn touches(&self, node_id: &str) -> bool {
        self.source_id == node_id || self.target_id == node_id
    }
}

/// Externally-produced node delta from the canvas layer
///
/// The canvas owns position, selection and drag state; it reports them back
/// as a batch of these changes, which the store folds into the canonical
/// node sequence while preserving every other field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeChange {
    /// A drag moved the node, or drag state flipped
    #[serde(rename_all = "camelCase")]
    Position {
        /// Target node id
        id: String,
        /// New position, absent while only the drag flag changes
        #[serde(skip_serializing_if = "Option::is_none")]
        position: Option<Position>,
        /// Drag-in-progress flag
        #[serde(skip_serializing_if = "Option::is_none")]
        dragging: Option<bool>,
    },
    /// Selection toggled
    #[serde(rename_all = "camelCase")]
    Select {
        /// Target node id
        id: String,
        /// New selection state
        selected: bool,
    },
    /// The canvas re-measured the node
    #[serde(rename_all = "camelCase")]
    Dimensions {
        /// Target node id
        id: String,
        /// New measured extent
        dimensions: Dimensions,
    },
    /// The canvas removed the node
    #[serde(rename_all = "camelCase")]
    Remove {
        /// Target node id
        id: String,
    },
}

impl NodeChange {
    /// The node this change targets
    pub fn node_id(&self) -> &str {
        match self {
            NodeChange::Position { id, .. }
            | NodeChange::Select { id, .. }
            | NodeChange::Dimensions { id, .. }
            | NodeChange::Remove { id } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::content::NodeDatum;
    use serde_json::json;

    fn sample_node(id: &str) -> Node {
        Node::new(id, Position::new(10.0, 20.0), "carouselNode", NodeDatum::new_carousel())
    }

    #[test]
    fn test_node_wire_shape() {
        let node = sample_node("1712000000000");
        let value = serde_json::to_value(&node).unwrap();

        assert_eq!(value["id"], "1712000000000");
        assert_eq!(value["type"], "carouselNode");
        assert_eq!(value["position"]["x"], 10.0);
        assert_eq!(value["data"]["type"], "carousel");
        // Optional canvas flags stay off the wire until set
        assert!(value.get("measured").is_none());
        assert!(value.get("selected").is_none());
        assert!(value.get("dragging").is_none());
    }

    #[test]
    fn test_node_roundtrip_with_flags() {
        let mut node = sample_node("n1");
        node.measured = Some(Dimensions {
            width: 320.0,
            height: 180.0,
        });
        node.selected = Some(true);
        node.dragging = Some(false);

        let text = serde_json::to_string(&node).unwrap();
        let back: Node = serde_json::from_str(&text).unwrap();
        assert_eq!(node, back);
    }

    #[test]
    fn test_connection_wire_shape() {
        let conn = Connection {
            id: "e1-2-abc".to_string(),
            source_id: "1".to_string(),
            target_id: "2".to_string(),
            source_position: Position::new(0.0, 0.0),
            target_position: Position::new(100.0, 50.0),
            edge_data: EdgeDescriptor {
                id: "e1-2".to_string(),
                source: "1".to_string(),
                target: "2".to_string(),
                source_handle: Some("action-0".to_string()),
                ..EdgeDescriptor::default()
            },
        };

        let value = serde_json::to_value(&conn).unwrap();
        assert_eq!(value["sourceId"], "1");
        assert_eq!(value["targetId"], "2");
        assert_eq!(value["sourcePosition"]["x"], 0.0);
        assert_eq!(value["edgeData"]["sourceHandle"], "action-0");
        assert!(value["edgeData"].get("targetHandle").is_none());
    }

    #[test]
    fn test_connection_touches() {
        let conn = Connection {
            id: "c1".to_string(),
            source_id: "a".to_string(),
            target_id: "b".to_string(),
            source_position: Position::default(),
            target_position: Position::default(),
            edge_data: EdgeDescriptor::default(),
        };

        assert!(conn.touches("a"));
        assert!(conn.touches("b"));
        assert!(!conn.touches("c"));
    }

    #[test]
    fn test_node_change_deserialization() {
        let raw = json!([
            {"type": "position", "id": "n1", "position": {"x": 5.0, "y": 6.0}, "dragging": true},
            {"type": "select", "id": "n1", "selected": true},
            {"type": "dimensions", "id": "n1", "dimensions": {"width": 10.0, "height": 20.0}},
            {"type": "remove", "id": "n2"}
        ]);

        let changes: Vec<NodeChange> = serde_json::from_value(raw).unwrap();
        assert_eq!(changes.len(), 4);
        assert_eq!(changes[0].node_id(), "n1");
        assert!(matches!(changes[1], NodeChange::Select { selected: true, .. }));
        assert!(matches!(changes[3], NodeChange::Remove { .. }));
    }

    #[test]
    fn test_mint_node_id_is_millisecond_timestamp() {
        let id = mint_node_id();
        let parsed: i64 = id.parse().expect("id should be numeric");
        // Sanity window: after 2020, before 2100
        assert!(parsed > 1_577_836_800_000);
        assert!(parsed < 4_102_444_800_000);
    }
}
