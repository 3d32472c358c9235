use super::IContestRepo;
use crate::repos::shared::inmemory_repo::*;
use courtside_domain::{Contest, ContestStatus, ID};

pub struct InMemoryContestRepo {
    contests: std::sync::Mutex<Vec<Contest>>,
}

impl InMemoryContestRepo {
    pub fn new() -> Self {
        Self {
            contests: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IContestRepo for InMemoryContestRepo {
    async fn insert(&self, contest: &Contest) -> anyhow::Result<()> {
        insert(contest, &self.contests);
        Ok(())
    }

    async fn save(&self, contest: &Contest) -> anyhow::Result<()> {
        save(contest, &self.contests);
        Ok(())
    }

    async fn find(&self, contest_id: &ID) -> Option<Contest> {
        find(contest_id, &self.contests)
    }

    async fn find_unfinished(&self) -> anyhow::Result<Vec<Contest>> {
        Ok(find_by(&self.contests, |c| {
            c.status != ContestStatus::Finished
        }))
    }
}
