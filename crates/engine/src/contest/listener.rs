use crate::fanout::FanoutRegistry;
use courtside_domain::{Contest, ScoreState, ID};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

/// Lifecycle notification published by the contest ticker.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContestNotification {
    Started {
        contest_id: ID,
        title: String,
        owner_id: Option<ID>,
    },
    Updated {
        contest_id: ID,
        title: String,
        owner_id: Option<ID>,
        state: ScoreState,
    },
    Finished {
        contest_id: ID,
        title: String,
        owner_id: Option<ID>,
    },
}

impl ContestNotification {
    pub fn started(contest: &Contest) -> Self {
        ContestNotification::Started {
            contest_id: contest.id.clone(),
            title: contest.title.clone(),
            owner_id: contest.owner_id.clone(),
        }
    }

    pub fn updated(contest: &Contest, state: ScoreState) -> Self {
        ContestNotification::Updated {
            contest_id: contest.id.clone(),
            title: contest.title.clone(),
            owner_id: contest.owner_id.clone(),
            state,
        }
    }

    pub fn finished(contest: &Contest) -> Self {
        ContestNotification::Finished {
            contest_id: contest.id.clone(),
            title: contest.title.clone(),
            owner_id: contest.owner_id.clone(),
        }
    }

    fn owner_id(&self) -> Option<&ID> {
        match self {
            ContestNotification::Started { owner_id, .. }
            | ContestNotification::Updated { owner_id, .. }
            | ContestNotification::Finished { owner_id, .. } => owner_id.as_ref(),
        }
    }

    fn event_name(&self) -> &'static str {
        match self {
            ContestNotification::Started { .. } => "contest:start",
            ContestNotification::Updated { .. } => "contest:update",
            ContestNotification::Finished { .. } => "contest:finish",
        }
    }
}

/// Listener notified of every lifecycle notification a tick produces. The
/// listener set is fixed when the ticker is constructed.
#[async_trait::async_trait]
pub trait ContestListener: Send + Sync {
    async fn on_contest_event(&self, notification: &ContestNotification) -> anyhow::Result<()>;
}

/// Notifies every listener, containing failures per listener: one erroring
/// listener never affects the others or the tick that published the event.
pub async fn publish_to_listeners(
    listeners: &[Arc<dyn ContestListener>],
    notification: &ContestNotification,
) {
    for listener in listeners {
        if let Err(e) = listener.on_contest_event(notification).await {
            error!(
                "Contest listener failed on {}: {:?}",
                notification.event_name(),
                e
            );
        }
    }
}

/// Bridges ticker notifications onto the fanout registry: a notification
/// for an owned contest is emitted to the owner's open connections.
pub struct FanoutListener {
    registry: FanoutRegistry,
}

impl FanoutListener {
    pub fn new(registry: FanoutRegistry) -> Self {
        Self { registry }
    }
}

#[async_trait::async_trait]
impl ContestListener for FanoutListener {
    async fn on_contest_event(&self, notification: &ContestNotification) -> anyhow::Result<()> {
        let owner_id = match notification.owner_id() {
            Some(owner_id) => owner_id.clone(),
            // Contests without a watching owner have nobody to notify.
            None => return Ok(()),
        };
        let payload = serde_json::to_value(notification)?;
        self.registry
            .emit(&owner_id, notification.event_name(), payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fanout::{ConnectionSink, FanoutEvent};
    use courtside_domain::Sport;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        received: Mutex<Vec<FanoutEvent>>,
    }

    impl ConnectionSink for RecordingSink {
        fn deliver(&self, event: &FanoutEvent) -> anyhow::Result<()> {
            self.received.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn owned_contest_events_reach_the_owner_connections() {
        let registry = FanoutRegistry::new();
        let owner = ID::new();
        let sink = Arc::new(RecordingSink::default());
        registry.register(owner.clone(), ID::new(), sink.clone());

        let mut contest = Contest::new("Derby".into(), Sport::Football, 0, Some(90));
        contest.owner_id = Some(owner);
        let listener = FanoutListener::new(registry);

        listener
            .on_contest_event(&ContestNotification::started(&contest))
            .await
            .unwrap();

        let events = sink.received.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "contest:start");
        assert_eq!(events[0].payload["title"], "Derby");
    }

    #[tokio::test]
    async fn unowned_contest_events_are_silently_dropped() {
        let registry = FanoutRegistry::new();
        let contest = Contest::new("Derby".into(), Sport::Football, 0, Some(90));
        let listener = FanoutListener::new(registry);

        let result = listener
            .on_contest_event(&ContestNotification::finished(&contest))
            .await;
        assert!(result.is_ok());
    }
}
