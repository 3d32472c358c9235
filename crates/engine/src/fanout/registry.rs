use courtside_domain::ID;
use courtside_infra::IIdentityResolver;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// One realtime event as seen by a connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FanoutEvent {
    pub event: String,
    pub payload: serde_json::Value,
}

/// Opaque handle to one open realtime connection. The wire transport lives
/// outside this crate; a sink only needs to accept events without blocking.
pub trait ConnectionSink: Send + Sync {
    fn deliver(&self, event: &FanoutEvent) -> anyhow::Result<()>;
}

/// Sink backed by an unbounded channel, the usual bridge to a socket writer
/// task.
pub struct ChannelSink {
    tx: tokio::sync::mpsc::UnboundedSender<FanoutEvent>,
}

impl ChannelSink {
    pub fn new(tx: tokio::sync::mpsc::UnboundedSender<FanoutEvent>) -> Self {
        Self { tx }
    }
}

impl ConnectionSink for ChannelSink {
    fn deliver(&self, event: &FanoutEvent) -> anyhow::Result<()> {
        self.tx
            .send(event.clone())
            .map_err(|_| anyhow::anyhow!("connection channel closed"))
    }
}

/// Live mapping from subscriber identity to that subscriber's open
/// connections. Process-local only; nothing survives a restart.
///
/// This is the single shared mutable structure of the engine. All access
/// goes through the lock below and the lock is never held across an await
/// or a sink delivery.
#[derive(Clone, Default)]
pub struct FanoutRegistry {
    connections: Arc<RwLock<HashMap<ID, HashMap<ID, Arc<dyn ConnectionSink>>>>>,
}

impl FanoutRegistry {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Adds a connection to the subscriber's set, creating the set on
    /// demand. Registering the same connection id twice replaces the sink.
    pub fn register(&self, subscriber_id: ID, connection_id: ID, sink: Arc<dyn ConnectionSink>) {
        let mut connections = self.connections.write().unwrap();
        connections
            .entry(subscriber_id)
            .or_insert_with(HashMap::new)
            .insert(connection_id, sink);
    }

    /// Removes a connection; the subscriber entry is dropped entirely when
    /// its last connection goes away, so memory stays bounded by active
    /// subscribers.
    pub fn unregister(&self, subscriber_id: &ID, connection_id: &ID) {
        let mut connections = self.connections.write().unwrap();
        if let Some(subscriber_connections) = connections.get_mut(subscriber_id) {
            subscriber_connections.remove(connection_id);
            if subscriber_connections.is_empty() {
                connections.remove(subscriber_id);
            }
        }
    }

    /// Delivers the event to every connection currently registered for the
    /// subscriber, independently per connection. Emitting to an unknown
    /// subscriber is a no-op. Returns the number of delivery attempts.
    pub fn emit(&self, subscriber_id: &ID, event: &str, payload: serde_json::Value) -> usize {
        let sinks: Vec<Arc<dyn ConnectionSink>> = {
            let connections = self.connections.read().unwrap();
            match connections.get(subscriber_id) {
                Some(subscriber_connections) => {
                    subscriber_connections.values().cloned().collect()
                }
                None => return 0,
            }
        };

        let fanout_event = FanoutEvent {
            event: event.to_string(),
            payload,
        };
        let mut attempts = 0;
        for sink in sinks {
            attempts += 1;
            if let Err(e) = sink.deliver(&fanout_event) {
                warn!(
                    "Dropping realtime event {} for subscriber {}: {:?}",
                    fanout_event.event, subscriber_id, e
                );
            }
        }
        attempts
    }

    pub fn is_registered(&self, subscriber_id: &ID) -> bool {
        self.connections
            .read()
            .unwrap()
            .contains_key(subscriber_id)
    }

    pub fn connection_count(&self, subscriber_id: &ID) -> usize {
        self.connections
            .read()
            .unwrap()
            .get(subscriber_id)
            .map(|c| c.len())
            .unwrap_or(0)
    }
}

/// Resolves the inbound credential token and registers the connection under
/// the resolved subscriber. A missing or invalid token leaves the
/// connection anonymous and unregistered; only registered connections are
/// reachable through `emit`.
pub fn register_authenticated(
    registry: &FanoutRegistry,
    resolver: &dyn IIdentityResolver,
    token: Option<&str>,
    connection_id: ID,
    sink: Arc<dyn ConnectionSink>,
) -> Option<ID> {
    let subscriber_id = token.and_then(|t| resolver.resolve_identity(t))?;
    registry.register(subscriber_id.clone(), connection_id, sink);
    debug!("Registered realtime connection for {}", subscriber_id);
    Some(subscriber_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        received: Mutex<Vec<FanoutEvent>>,
        fail: bool,
    }

    impl RecordingSink {
        fn failing() -> Self {
            Self {
                received: Mutex::new(vec![]),
                fail: true,
            }
        }

        fn events(&self) -> Vec<FanoutEvent> {
            self.received.lock().unwrap().clone()
        }
    }

    impl ConnectionSink for RecordingSink {
        fn deliver(&self, event: &FanoutEvent) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("sink closed");
            }
            self.received.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    struct StaticResolver(Option<ID>);
    impl IIdentityResolver for StaticResolver {
        fn resolve_identity(&self, _token: &str) -> Option<ID> {
            self.0.clone()
        }
    }

    #[test]
    fn emit_reaches_every_connection_of_the_subscriber() {
        let registry = FanoutRegistry::new();
        let subscriber = ID::new();
        let sink_a = Arc::new(RecordingSink::default());
        let sink_b = Arc::new(RecordingSink::default());
        registry.register(subscriber.clone(), ID::new(), sink_a.clone());
        registry.register(subscriber.clone(), ID::new(), sink_b.clone());

        let attempts = registry.emit(&subscriber, "x", serde_json::json!({ "n": 1 }));

        assert_eq!(attempts, 2);
        assert_eq!(sink_a.events().len(), 1);
        assert_eq!(sink_b.events().len(), 1);
        assert_eq!(sink_a.events()[0].event, "x");
    }

    #[test]
    fn emit_to_unknown_subscriber_is_a_noop() {
        let registry = FanoutRegistry::new();
        assert_eq!(registry.emit(&ID::new(), "x", serde_json::json!({})), 0);
    }

    #[test]
    fn reregistering_a_connection_id_does_not_duplicate_delivery() {
        let registry = FanoutRegistry::new();
        let subscriber = ID::new();
        let connection = ID::new();
        let sink = Arc::new(RecordingSink::default());
        registry.register(subscriber.clone(), connection.clone(), sink.clone());
        registry.register(subscriber.clone(), connection, sink.clone());

        assert_eq!(registry.emit(&subscriber, "x", serde_json::json!({})), 1);
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn unregister_drops_empty_subscriber_entries() {
        let registry = FanoutRegistry::new();
        let subscriber = ID::new();
        let connection = ID::new();
        registry.register(
            subscriber.clone(),
            connection.clone(),
            Arc::new(RecordingSink::default()),
        );
        assert!(registry.is_registered(&subscriber));

        registry.unregister(&subscriber, &connection);
        assert!(!registry.is_registered(&subscriber));
        assert_eq!(registry.emit(&subscriber, "x", serde_json::json!({})), 0);
    }

    #[test]
    fn one_failing_sink_does_not_block_the_others() {
        let registry = FanoutRegistry::new();
        let subscriber = ID::new();
        let healthy = Arc::new(RecordingSink::default());
        registry.register(subscriber.clone(), ID::new(), Arc::new(RecordingSink::failing()));
        registry.register(subscriber.clone(), ID::new(), healthy.clone());

        let attempts = registry.emit(&subscriber, "x", serde_json::json!({}));

        assert_eq!(attempts, 2);
        assert_eq!(healthy.events().len(), 1);
    }

    #[test]
    fn channel_sink_forwards_events() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let registry = FanoutRegistry::new();
        let subscriber = ID::new();
        registry.register(subscriber.clone(), ID::new(), Arc::new(ChannelSink::new(tx)));

        registry.emit(&subscriber, "score", serde_json::json!({ "home": 1 }));

        let event = rx.try_recv().unwrap();
        assert_eq!(event.event, "score");
        assert_eq!(event.payload["home"], 1);
    }

    #[test]
    fn invalid_token_is_never_registered() {
        let registry = FanoutRegistry::new();
        let registered = register_authenticated(
            &registry,
            &StaticResolver(None),
            Some("bad-token"),
            ID::new(),
            Arc::new(RecordingSink::default()),
        );
        assert!(registered.is_none());

        let registered = register_authenticated(
            &registry,
            &StaticResolver(Some(ID::new())),
            None,
            ID::new(),
            Arc::new(RecordingSink::default()),
        );
        assert!(registered.is_none());
    }

    #[test]
    fn valid_token_registers_the_connection() {
        let registry = FanoutRegistry::new();
        let subscriber = ID::new();
        let sink = Arc::new(RecordingSink::default());
        let registered = register_authenticated(
            &registry,
            &StaticResolver(Some(subscriber.clone())),
            Some("good-token"),
            ID::new(),
            sink.clone(),
        );
        assert_eq!(registered, Some(subscriber.clone()));
        assert_eq!(registry.emit(&subscriber, "x", serde_json::json!({})), 1);
        assert_eq!(sink.events().len(), 1);
    }
}
