use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// Append-only log entry for one `Contest`. Records are never mutated or
/// reordered; records for one contest are totally ordered by `created_at`.
#[derive(Debug, Clone)]
pub struct ContestUpdate {
    pub id: ID,
    pub contest_id: ID,
    pub payload: UpdatePayload,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum UpdatePayload {
    Started,
    Update { state: serde_json::Value },
    Finished,
    /// Free-form annotation injected by an external administrative surface,
    /// e.g. manual commentary.
    Note { text: String },
}

impl ContestUpdate {
    pub fn new(contest_id: ID, payload: UpdatePayload, created_at: i64) -> Self {
        Self {
            id: Default::default(),
            contest_id,
            payload,
            created_at,
        }
    }
}

impl Entity for ContestUpdate {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_serializes_with_kind_tag() {
        let payload = UpdatePayload::Update {
            state: serde_json::json!({ "home": 1, "away": 0 }),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["kind"], "update");
        assert_eq!(json["state"]["home"], 1);

        let started = serde_json::to_value(&UpdatePayload::Started).unwrap();
        assert_eq!(started["kind"], "started");
    }
}
