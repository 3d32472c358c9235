use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// A registered delivery endpoint for push notifications. Created and
/// removed by external request handlers; the reminder scheduler only ever
/// reads these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushTarget {
    pub id: ID,
    /// Unique endpoint identifier, also the delivery URL.
    pub endpoint: String,
    /// Transport credential presented to the endpoint on delivery.
    pub auth_key: String,
    /// Owning subscriber, when the target was registered by a known user.
    pub user_id: Option<ID>,
}

impl PushTarget {
    pub fn new(endpoint: String, auth_key: String, user_id: Option<ID>) -> Self {
        Self {
            id: Default::default(),
            endpoint,
            auth_key,
            user_id,
        }
    }
}

impl Entity for PushTarget {
    fn id(&self) -> &ID {
        &self.id
    }
}
