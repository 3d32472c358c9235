mod contest;
mod fanout;
mod job_schedulers;
mod reminder;
mod shared;

pub use contest::{
    ContestListener, ContestNotification, FanoutListener, TickContestsUseCase, TickSummary,
};
pub use fanout::{
    register_authenticated, ChannelSink, ConnectionSink, FanoutEvent, FanoutRegistry,
};
pub use job_schedulers::{
    secs_until_minute_boundary, start_contest_ticker, start_reminder_scheduler, ContestTicker,
    ReminderScheduler,
};
pub use reminder::{ReminderPassSummary, SendDueRemindersUseCase};
pub use shared::usecase::{execute, UseCase};

use courtside_infra::{CourtsideContext, IIdentityResolver, JwtIdentityResolver};
use std::sync::Arc;

/// Wires the engine together: fanout registry, ticker listeners, timer
/// driven schedulers and the connection-time identity resolver. External
/// surfaces (sockets, request handlers) talk to the registry and resolver;
/// the schedulers run on their own.
pub struct Application {
    registry: FanoutRegistry,
    identity_resolver: Arc<dyn IIdentityResolver>,
}

impl Application {
    pub fn new(context: CourtsideContext) -> Self {
        let registry = FanoutRegistry::new();
        let identity_resolver: Arc<dyn IIdentityResolver> = Arc::new(JwtIdentityResolver::new(
            context.config.jwt_secret.clone(),
        ));

        let listeners: Vec<Arc<dyn ContestListener>> =
            vec![Arc::new(FanoutListener::new(registry.clone()))];
        start_contest_ticker(Arc::new(ContestTicker::new(context.clone(), listeners)));
        start_reminder_scheduler(Arc::new(ReminderScheduler::new(context)));

        Self {
            registry,
            identity_resolver,
        }
    }

    pub fn registry(&self) -> &FanoutRegistry {
        &self.registry
    }

    pub fn identity_resolver(&self) -> Arc<dyn IIdentityResolver> {
        self.identity_resolver.clone()
    }
}
