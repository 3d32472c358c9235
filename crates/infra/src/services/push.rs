use courtside_domain::{PushTarget, ID};
use serde::Serialize;
use std::time::Duration;

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Notification handed to a push endpoint on behalf of a fired reminder.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    pub session_id: Option<ID>,
    pub user_id: Option<ID>,
}

/// Push-dispatch collaborator. One attempt per call, no retries owed; a
/// timed-out delivery is a failed delivery.
#[async_trait::async_trait]
pub trait IPushDispatcher: Send + Sync {
    async fn deliver(&self, target: &PushTarget, payload: &PushPayload) -> anyhow::Result<()>;
}

/// Delivers notifications by posting JSON to the target endpoint, carrying
/// the target's credential and the server key as headers.
pub struct WebhookPushDispatcher {
    client: reqwest::Client,
    api_key: String,
}

impl WebhookPushDispatcher {
    pub fn new(api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DELIVERY_TIMEOUT)
            .build()
            // The builder only fails on TLS backend misconfiguration.
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, api_key }
    }
}

#[async_trait::async_trait]
impl IPushDispatcher for WebhookPushDispatcher {
    async fn deliver(&self, target: &PushTarget, payload: &PushPayload) -> anyhow::Result<()> {
        self.client
            .post(&target.endpoint)
            .header("courtside-push-key", &target.auth_key)
            .header("courtside-api-key", &self.api_key)
            .json(payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
