//! Flow service
//!
//! Wires the in-memory [`FlowStore`] to the persistence gateway. Exposes the
//! full store mutation contract; every mutation that actually changes state
//! is followed by a durable snapshot write. The storage adapter is an
//! explicit constructor argument, so tests run against an in-memory
//! repository and never touch a real backend.

use std::sync::Arc;

use tracing::info;

use crate::domain::content::NodeDatum;
use crate::domain::graph::{mint_node_id, Connection, Node, NodeChange, Position};
use crate::domain::repository::SnapshotRepository;
use crate::domain::store::FlowStore;
use crate::FlowError;

use super::persistence::PersistenceGateway;

/// Canvas renderer key for carousel nodes
pub const CAROUSEL_NODE_TYPE: &str = "carouselNode";
/// Canvas renderer key for rich card nodes
pub const RICH_CARD_NODE_TYPE: &str = "richCardNode";

/// The flow graph engine: canonical store plus durable mirroring
pub struct FlowService {
    store: FlowStore,
    gateway: PersistenceGateway,
}

impl FlowService {
    /// Create a service with an empty store over the given storage adapter
    pub fn new(repository: Arc<dyn SnapshotRepository>) -> Self {
        Self {
            store: FlowStore::new(),
            gateway: PersistenceGateway::new(repository),
        }
    }

    /// Create a service bound to a specific durable slot
    pub fn with_slot(repository: Arc<dyn SnapshotRepository>, slot: impl Into<String>) -> Self {
        Self {
            store: FlowStore::new(),
            gateway: PersistenceGateway::with_slot(repository, slot),
        }
    }

    /// Seed the store from the durable slot. Runs before any other
    /// operation; an absent slot leaves the store empty.
    pub async fn hydrate(&mut self) -> Result<(), FlowError> {
        let snapshot = self.gateway.hydrate().await?;
        self.store = FlowStore::with_contents(snapshot.nodes, snapshot.connections);
        Ok(())
    }

    /// Read access to the canonical store
    pub fn store(&self) -> &FlowStore {
        &self.store
    }

    /// The current node sequence
    pub fn nodes(&self) -> &[Node] {
        self.store.nodes()
    }

    /// The current connection sequence
    pub fn connections(&self) -> &[Connection] {
        self.store.connections()
    }

    /// All connections touching the node, insertion-order
    pub fn connections_for_node(&self, node_id: &str) -> Vec<Connection> {
        self.store.connections_for_node(node_id)
    }

    /// Whether both sequences are empty
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// The persistence gateway backing this service
    pub fn gateway(&self) -> &PersistenceGateway {
        &self.gateway
    }

    /// Replace the entire node sequence and persist
    pub async fn set_nodes(&mut self, nodes: Vec<Node>) -> Result<(), FlowError> {
        self.store.set_nodes(nodes);
        self.gateway.persist(&self.store).await
    }

    /// Mint a node of the given content kind at `position`, add it, and
    /// return its fresh id
    pub async fn spawn_node(
        &mut self,
        position: Position,
        data: NodeDatum,
    ) -> Result<String, FlowError> {
        let node_type = match &data {
            NodeDatum::Carousel(_) => CAROUSEL_NODE_TYPE,
            NodeDatum::RichCard(_) => RICH_CARD_NODE_TYPE,
        };
        let id = mint_node_id();
        let node = Node::new(id.clone(), position, node_type, data);
        self.add_node(node).await?;
        info!(node_id = %id, node_type, "spawned node");
        Ok(id)
    }

    /// Append a node and persist. A duplicate id is a rejected no-op and
    /// skips the durable write.
    pub async fn add_node(&mut self, node: Node) -> Result<bool, FlowError> {
        if !self.store.add_node(node) {
            return Ok(false);
        }
        self.gateway.persist(&self.store).await?;
        Ok(true)
    }

    /// Replace the node with a matching id and persist. This is how all
    /// content edits land: read the current node, produce a full
    /// replacement, call this.
    pub async fn update_node(&mut self, node: Node) -> Result<bool, FlowError> {
        if !self.store.update_node(node) {
            return Ok(false);
        }
        self.gateway.persist(&self.store).await?;
        Ok(true)
    }

    /// Remove a node by id, cascading its connections, and persist
    pub async fn remove_node(&mut self, id: &str) -> Result<bool, FlowError> {
        if !self.store.remove_node(id) {
            return Ok(false);
        }
        self.gateway.persist(&self.store).await?;
        Ok(true)
    }

    /// Fold a batch of canvas deltas into the store and persist when
    /// anything changed
    pub async fn apply_node_changes(&mut self, changes: &[NodeChange]) -> Result<bool, FlowError> {
        if !self.store.apply_node_changes(changes) {
            return Ok(false);
        }
        self.gateway.persist(&self.store).await?;
        Ok(true)
    }

    /// Append a connection and persist. Duplicate ids and dangling
    /// endpoints are rejected no-ops.
    pub async fn add_connection(&mut self, connection: Connection) -> Result<bool, FlowError> {
        if !self.store.add_connection(connection) {
            return Ok(false);
        }
        self.gateway.persist(&self.store).await?;
        Ok(true)
    }

    /// Replace the connection with a matching id and persist
    pub async fn update_connection(&mut self, connection: Connection) -> Result<bool, FlowError> {
        if !self.store.update_connection(connection) {
            return Ok(false);
        }
        self.gateway.persist(&self.store).await?;
        Ok(true)
    }

    /// Remove a connection by id and persist
    pub async fn remove_connection(&mut self, id: &str) -> Result<bool, FlowError> {
        if !self.store.remove_connection(id) {
            return Ok(false);
        }
        self.gateway.persist(&self.store).await?;
        Ok(true)
    }

    /// Empty the connection sequence and persist
    pub async fn clear_connections(&mut self) -> Result<(), FlowError> {
        self.store.clear_connections();
        self.gateway.persist(&self.store).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph::EdgeDescriptor;
    use crate::domain::repository::FlowSnapshot;
    use crate::application::persistence::DEFAULT_SLOT;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    /// Test-local storage adapter so the service never needs a real backend
    #[derive(Default)]
    struct MemoryRepository {
        slots: RwLock<HashMap<String, FlowSnapshot>>,
    }

    #[async_trait]
    impl SnapshotRepository for MemoryRepository {
        async fn load(&self, slot: &str) -> Result<Option<FlowSnapshot>, FlowError> {
            Ok(self.slots.read().await.get(slot).cloned())
        }

        async fn save(&self, slot: &str, snapshot: &FlowSnapshot) -> Result<(), FlowError> {
            self.slots
                .write()
                .await
                .insert(slot.to_string(), snapshot.clone());
            Ok(())
        }

        async fn clear(&self, slot: &str) -> Result<(), FlowError> {
            self.slots.write().await.remove(slot);
            Ok(())
        }
    }

    fn node(id: &str) -> Node {
        Node::new(
            id,
            Position::new(0.0, 0.0),
            RICH_CARD_NODE_TYPE,
            NodeDatum::new_rich_card(),
        )
    }

    fn connection(id: &str, source: &str, target: &str) -> Connection {
        Connection {
            id: id.to_string(),
            source_id: source.to_string(),
            target_id: target.to_string(),
            source_position: Position::default(),
            target_position: Position::default(),
            edge_data: EdgeDescriptor::default(),
        }
    }

    #[tokio::test]
    async fn test_hydrate_empty_slot_yields_empty_store() {
        let repo = Arc::new(MemoryRepository::default());
        let mut service = FlowService::new(repo);

        service.hydrate().await.unwrap();
        assert!(service.is_empty());
    }

    #[tokio::test]
    async fn test_every_mutation_reaches_the_slot() {
        let repo = Arc::new(MemoryRepository::default());
        let mut service = FlowService::new(repo.clone());

        assert!(service.add_node(node("a")).await.unwrap());
        assert!(service.add_node(node("b")).await.unwrap());
        assert!(service.add_connection(connection("c1", "a", "b")).await.unwrap());

        let stored = repo
            .load(DEFAULT_SLOT)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.nodes.len(), 2);
        assert_eq!(stored.connections.len(), 1);

        service.remove_connection("c1").await.unwrap();
        let stored = repo
            .load(DEFAULT_SLOT)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.connections.is_empty());
    }

    #[tokio::test]
    async fn test_hydrate_restores_prior_snapshot() {
        let repo = Arc::new(MemoryRepository::default());

        {
            let mut service = FlowService::new(repo.clone());
            service.add_node(node("a")).await.unwrap();
            service.add_node(node("b")).await.unwrap();
            service
                .add_connection(connection("c1", "a", "b"))
                .await
                .unwrap();
        }

        // A fresh process over the same repository sees the prior state
        let mut restarted = FlowService::new(repo);
        restarted.hydrate().await.unwrap();
        assert_eq!(restarted.nodes().len(), 2);
        assert_eq!(restarted.connections().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_mutations_skip_the_durable_write() {
        let repo = Arc::new(MemoryRepository::default());
        let mut service = FlowService::new(repo.clone());
        service.add_node(node("a")).await.unwrap();

        // Duplicate node id: rejected, slot unchanged
        assert!(!service.add_node(node("a")).await.unwrap());
        // Dangling connection: rejected, slot unchanged
        assert!(!service
            .add_connection(connection("c1", "a", "ghost"))
            .await
            .unwrap());

        let stored = repo
            .load(DEFAULT_SLOT)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.nodes.len(), 1);
        assert!(stored.connections.is_empty());
    }

    #[tokio::test]
    async fn test_spawn_node_mints_id_and_picks_renderer_key() {
        let repo = Arc::new(MemoryRepository::default());
        let mut service = FlowService::new(repo);

        let id = service
            .spawn_node(Position::new(5.0, 5.0), NodeDatum::new_carousel())
            .await
            .unwrap();

        let spawned = service.store().find_node(&id).unwrap();
        assert_eq!(spawned.node_type, CAROUSEL_NODE_TYPE);
        match &spawned.data {
            NodeDatum::Carousel(deck) => assert_eq!(deck.cards.len(), 1),
            _ => panic!("Expected carousel content"),
        }
    }

    #[tokio::test]
    async fn test_node_cache_is_derived_from_canonical_slot() {
        let repo = Arc::new(MemoryRepository::default());
        let mut service = FlowService::new(repo);
        service.add_node(node("a")).await.unwrap();
        service.add_node(node("b")).await.unwrap();

        let cache = service.gateway().node_cache().await.unwrap();
        let ids: Vec<&str> = cache.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
