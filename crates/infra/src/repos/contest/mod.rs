mod inmemory;

use courtside_domain::{Contest, ID};
pub use inmemory::InMemoryContestRepo;

#[async_trait::async_trait]
pub trait IContestRepo: Send + Sync {
    async fn insert(&self, contest: &Contest) -> anyhow::Result<()>;
    async fn save(&self, contest: &Contest) -> anyhow::Result<()>;
    async fn find(&self, contest_id: &ID) -> Option<Contest>;
    /// All contests not yet in `Finished` status.
    async fn find_unfinished(&self) -> anyhow::Result<Vec<Contest>>;
}
