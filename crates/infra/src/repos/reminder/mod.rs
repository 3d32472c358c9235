mod inmemory;

use courtside_domain::{Reminder, ID};
pub use inmemory::InMemoryReminderRepo;

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
    /// Enabled, untriggered reminders whose effective due instant is at or
    /// before `now`.
    async fn find_due(&self, now: i64) -> anyhow::Result<Vec<Reminder>>;
    async fn delete(&self, reminder_id: &ID) -> Option<Reminder>;
}
