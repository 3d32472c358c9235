mod inmemory;

use courtside_domain::{PushTarget, ID};
pub use inmemory::InMemoryPushTargetRepo;

#[async_trait::async_trait]
pub trait IPushTargetRepo: Send + Sync {
    async fn insert(&self, target: &PushTarget) -> anyhow::Result<()>;
    async fn delete_by_endpoint(&self, endpoint: &str) -> usize;
    async fn find_all(&self) -> anyhow::Result<Vec<PushTarget>>;
    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<PushTarget>>;
}
