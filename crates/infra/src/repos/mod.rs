mod contest;
mod contest_update;
mod push_target;
mod reminder;
mod shared;

use contest::InMemoryContestRepo;
pub use contest::IContestRepo;
use contest_update::InMemoryContestUpdateRepo;
pub use contest_update::IContestUpdateRepo;
use push_target::InMemoryPushTargetRepo;
pub use push_target::IPushTargetRepo;
use reminder::InMemoryReminderRepo;
pub use reminder::IReminderRepo;
use std::sync::Arc;

/// The durable storage contract. Real deployments plug a database-backed
/// implementation in behind these traits; the in-memory variant backs tests
/// and single-process setups.
#[derive(Clone)]
pub struct Repos {
    pub contests: Arc<dyn IContestRepo>,
    pub contest_updates: Arc<dyn IContestUpdateRepo>,
    pub reminders: Arc<dyn IReminderRepo>,
    pub push_targets: Arc<dyn IPushTargetRepo>,
}

impl Repos {
    pub fn create_inmemory() -> Self {
        Self {
            contests: Arc::new(InMemoryContestRepo::new()),
            contest_updates: Arc::new(InMemoryContestUpdateRepo::new()),
            reminders: Arc::new(InMemoryReminderRepo::new()),
            push_targets: Arc::new(InMemoryPushTargetRepo::new()),
        }
    }
}
