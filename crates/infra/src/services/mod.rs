mod auth;
mod push;

pub use auth::{IIdentityResolver, JwtIdentityResolver};
pub use push::{IPushDispatcher, PushPayload, WebhookPushDispatcher};
