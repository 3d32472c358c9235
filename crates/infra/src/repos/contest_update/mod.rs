mod inmemory;

use courtside_domain::{ContestUpdate, ID};
pub use inmemory::InMemoryContestUpdateRepo;

#[async_trait::async_trait]
pub trait IContestUpdateRepo: Send + Sync {
    async fn insert(&self, update: &ContestUpdate) -> anyhow::Result<()>;
    /// Records for one contest, ascending by creation instant.
    async fn find_by_contest(&self, contest_id: &ID) -> Vec<ContestUpdate>;
}
