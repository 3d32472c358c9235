use super::IContestUpdateRepo;
use crate::repos::shared::inmemory_repo::*;
use courtside_domain::{ContestUpdate, ID};

pub struct InMemoryContestUpdateRepo {
    updates: std::sync::Mutex<Vec<ContestUpdate>>,
}

impl InMemoryContestUpdateRepo {
    pub fn new() -> Self {
        Self {
            updates: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IContestUpdateRepo for InMemoryContestUpdateRepo {
    async fn insert(&self, update: &ContestUpdate) -> anyhow::Result<()> {
        insert(update, &self.updates);
        Ok(())
    }

    async fn find_by_contest(&self, contest_id: &ID) -> Vec<ContestUpdate> {
        let mut updates = find_by(&self.updates, |u| u.contest_id == *contest_id);
        updates.sort_by_key(|u| u.created_at);
        updates
    }
}
