mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::{IContestRepo, IContestUpdateRepo, IPushTargetRepo, IReminderRepo, Repos};
pub use services::{
    IIdentityResolver, IPushDispatcher, JwtIdentityResolver, PushPayload, WebhookPushDispatcher,
};
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;
use tracing::warn;

#[derive(Clone)]
pub struct CourtsideContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    /// Push-dispatch collaborator. `None` means no delivery transport is
    /// configured; due reminders still advance, delivery is skipped.
    pub push: Option<Arc<dyn IPushDispatcher>>,
}

impl CourtsideContext {
    pub fn create(config: Config) -> Self {
        let push: Option<Arc<dyn IPushDispatcher>> = match &config.push_api_key {
            Some(key) => Some(Arc::new(WebhookPushDispatcher::new(key.clone()))),
            None => {
                warn!("PUSH_API_KEY not configured, push delivery is disabled");
                None
            }
        };
        Self {
            repos: Repos::create_inmemory(),
            config,
            sys: Arc::new(RealSys {}),
            push,
        }
    }

    /// Context with in-memory storage, no push transport and the real
    /// clock. Tests swap `sys` and `push` as needed.
    pub fn create_for_tests() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::for_tests(),
            sys: Arc::new(RealSys {}),
            push: None,
        }
    }
}

/// Will setup the infrastructure context given the environment
pub fn setup_context() -> CourtsideContext {
    CourtsideContext::create(Config::new())
}
