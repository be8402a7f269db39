//! Import/export codec
//!
//! Reads and writes the JSON file shape the editor exchanges with users.
//! Import is a single transaction: the whole document is parsed and
//! validated before the store is touched, so a malformed `connections`
//! section can no longer leave nodes replaced and connections stale.
//! A bare JSON array at the document root is accepted as the legacy
//! nodes-only shape.

use std::path::Path;

use tracing::{info, warn};

use crate::domain::content::NodeDatum;
use crate::domain::graph::{Connection, Node};
use crate::domain::repository::FlowSnapshot;
use crate::domain::store::FlowStore;
use crate::FlowError;

use super::service::FlowService;

/// Default name of the exported flow file
pub const EXPORT_FILE_NAME: &str = "chatbot-flow.json";

/// The bundled default document behind the load-sample action
const SAMPLE_FLOW: &str = include_str!("../../assets/sample_flow.json");

/// Parse and fully validate an import document.
///
/// Recognized shapes, in priority order:
/// 1. `{ "nodes": [...], "connections": [...] }` — the full document.
///    An absent `connections` key is an empty sequence; a present
///    non-array one is a validation error.
/// 2. A bare array at the root — legacy nodes-only document.
/// 3. Anything else fails with a validation error.
///
/// No store mutation happens here; callers apply the returned snapshot
/// only after this succeeds.
pub fn parse_import(text: &str) -> Result<FlowSnapshot, FlowError> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| FlowError::Validation(format!("not a valid JSON document: {}", e)))?;

    let snapshot = match value {
        serde_json::Value::Array(raw_nodes) => {
            let nodes = parse_nodes(serde_json::Value::Array(raw_nodes))?;
            FlowSnapshot::new(nodes, Vec::new())
        }
        serde_json::Value::Object(mut doc) => {
            let raw_nodes = doc
                .remove("nodes")
                .ok_or_else(|| FlowError::Validation("document has no 'nodes' field".to_string()))?;
            if !raw_nodes.is_array() {
                return Err(FlowError::Validation("'nodes' must be an array".to_string()));
            }
            let nodes = parse_nodes(raw_nodes)?;

            let connections = match doc.remove("connections") {
                None | Some(serde_json::Value::Null) => Vec::new(),
                Some(raw @ serde_json::Value::Array(_)) => {
                    serde_json::from_value::<Vec<Connection>>(raw).map_err(|e| {
                        FlowError::Validation(format!("malformed 'connections' entry: {}", e))
                    })?
                }
                Some(_) => {
                    return Err(FlowError::Validation(
                        "'connections' must be an array".to_string(),
                    ))
                }
            };

            FlowSnapshot::new(nodes, connections)
        }
        _ => {
            return Err(FlowError::Validation(
                "document must be an object or an array".to_string(),
            ))
        }
    };

    warn_unknown_action_kinds(&snapshot.nodes);
    Ok(snapshot)
}

fn parse_nodes(raw: serde_json::Value) -> Result<Vec<Node>, FlowError> {
    serde_json::from_value::<Vec<Node>>(raw)
        .map_err(|e| FlowError::Validation(format!("malformed 'nodes' entry: {}", e)))
}

// CTA kinds stay permissive; unknown ones are only worth a log line.
fn warn_unknown_action_kinds(nodes: &[Node]) {
    for node in nodes {
        let actions = match &node.data {
            NodeDatum::Carousel(deck) => deck.cards.iter().flat_map(|c| c.actions.iter()).collect::<Vec<_>>(),
            NodeDatum::RichCard(card) => card.actions.iter().collect(),
        };
        for action in actions {
            if !action.value.is_empty() && !action.is_known_kind() {
                warn!(node_id = %node.id, kind = %action.value, "unknown CTA kind in import");
            }
        }
    }
}

/// Apply a validated import: replace nodes wholesale, clear existing
/// connections, then append each imported connection one at a time so
/// per-add checks and side effects still run.
pub async fn apply_import(
    service: &mut FlowService,
    snapshot: FlowSnapshot,
) -> Result<(), FlowError> {
    let connection_count = snapshot.connections.len();
    service.set_nodes(snapshot.nodes).await?;
    service.clear_connections().await?;
    for connection in snapshot.connections {
        service.add_connection(connection).await?;
    }
    info!(
        nodes = service.nodes().len(),
        connections_imported = connection_count,
        connections_kept = service.connections().len(),
        "applied import"
    );
    Ok(())
}

/// Parse then apply an import document
pub async fn import_document(service: &mut FlowService, text: &str) -> Result<(), FlowError> {
    let snapshot = parse_import(text)?;
    apply_import(service, snapshot).await
}

/// Read, parse and apply a user-selected import file. An unreadable file is
/// an I/O error with no state change.
pub async fn import_from_file(
    service: &mut FlowService,
    path: impl AsRef<Path>,
) -> Result<(), FlowError> {
    let text = tokio::fs::read_to_string(path.as_ref())
        .await
        .map_err(|e| FlowError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
    import_document(service, &text).await
}

/// Load the bundled sample flow through the same reconciliation path as a
/// user import
pub async fn load_sample(service: &mut FlowService) -> Result<(), FlowError> {
    import_document(service, SAMPLE_FLOW).await
}

/// The export document for the current store contents.
///
/// Exporting a fully empty store is refused; the editor disables the action
/// and the engine pins that contract.
pub fn export_document(store: &FlowStore) -> Result<FlowSnapshot, FlowError> {
    if store.is_empty() {
        return Err(FlowError::Validation(
            "nothing to export: the flow is empty".to_string(),
        ));
    }
    Ok(FlowSnapshot::new(
        store.nodes().to_vec(),
        store.connections().to_vec(),
    ))
}

/// Pretty-printed JSON text of the export document
pub fn export_json(store: &FlowStore) -> Result<String, FlowError> {
    let document = export_document(store)?;
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Write the export document to a file, conventionally named
/// [`EXPORT_FILE_NAME`]
pub async fn export_to_file(store: &FlowStore, path: impl AsRef<Path>) -> Result<(), FlowError> {
    let text = export_json(store)?;
    tokio::fs::write(path.as_ref(), text)
        .await
        .map_err(|e| FlowError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
    info!(path = %path.as_ref().display(), "exported flow");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_document() {
        let text = json!({
            "nodes": [
                {
                    "id": "1",
                    "position": {"x": 0.0, "y": 0.0},
                    "type": "richCardNode",
                    "data": {"type": "richCard", "content": {
                        "title": "t", "description": "d", "image": "", "actions": []
                    }}
                }
            ],
            "connections": []
        })
        .to_string();

        let snapshot = parse_import(&text).unwrap();
        assert_eq!(snapshot.nodes.len(), 1);
        assert!(snapshot.connections.is_empty());
    }

    #[test]
    fn test_parse_legacy_bare_array() {
        let text = json!([
            {
                "id": "n1",
                "position": {"x": 1.0, "y": 2.0},
                "type": "carouselNode",
                "data": {"type": "carousel", "content": {"cards": []}}
            },
            {
                "id": "n2",
                "position": {"x": 3.0, "y": 4.0},
                "type": "richCardNode",
                "data": {"type": "richCard", "content": {
                    "title": "", "description": "", "image": "", "actions": []
                }}
            }
        ])
        .to_string();

        let snapshot = parse_import(&text).unwrap();
        let ids: Vec<&str> = snapshot.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["n1", "n2"]);
        assert!(snapshot.connections.is_empty());
    }

    #[test]
    fn test_parse_rejects_non_json() {
        let err = parse_import("{not json").unwrap_err();
        assert!(matches!(err, FlowError::Validation(_)));
    }

    #[test]
    fn test_parse_rejects_wrong_shapes() {
        // Scalar root
        assert!(matches!(
            parse_import("42").unwrap_err(),
            FlowError::Validation(_)
        ));
        // Object without nodes
        assert!(matches!(
            parse_import(r#"{"connections": []}"#).unwrap_err(),
            FlowError::Validation(_)
        ));
        // nodes present but not an array
        assert!(matches!(
            parse_import(r#"{"nodes": "nope"}"#).unwrap_err(),
            FlowError::Validation(_)
        ));
    }

    #[test]
    fn test_parse_rejects_non_array_connections_before_any_apply() {
        let text = json!({
            "nodes": [],
            "connections": "not-an-array"
        })
        .to_string();

        let err = parse_import(&text).unwrap_err();
        match err {
            FlowError::Validation(msg) => assert!(msg.contains("connections")),
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_parse_accepts_missing_connections_key() {
        let snapshot = parse_import(r#"{"nodes": []}"#).unwrap();
        assert!(snapshot.connections.is_empty());
    }

    #[test]
    fn test_export_refused_when_empty() {
        let store = FlowStore::new();
        let err = export_document(&store).unwrap_err();
        assert!(matches!(err, FlowError::Validation(_)));
    }

    #[test]
    fn test_sample_flow_parses() {
        let snapshot = parse_import(SAMPLE_FLOW).unwrap();
        assert_eq!(snapshot.nodes.len(), 2);
        assert_eq!(snapshot.connections.len(), 1);
        assert_eq!(snapshot.connections[0].source_id, snapshot.nodes[0].id);
    }
}
