use super::IPushTargetRepo;
use crate::repos::shared::inmemory_repo::*;
use courtside_domain::{PushTarget, ID};

pub struct InMemoryPushTargetRepo {
    targets: std::sync::Mutex<Vec<PushTarget>>,
}

impl InMemoryPushTargetRepo {
    pub fn new() -> Self {
        Self {
            targets: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IPushTargetRepo for InMemoryPushTargetRepo {
    async fn insert(&self, target: &PushTarget) -> anyhow::Result<()> {
        insert(target, &self.targets);
        Ok(())
    }

    async fn delete_by_endpoint(&self, endpoint: &str) -> usize {
        delete_by(&self.targets, |t| t.endpoint == endpoint)
    }

    async fn find_all(&self) -> anyhow::Result<Vec<PushTarget>> {
        Ok(find_by(&self.targets, |_| true))
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<PushTarget>> {
        Ok(find_by(&self.targets, |t| {
            t.user_id.as_ref() == Some(user_id)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn filters_targets_by_owning_user() {
        let repo = InMemoryPushTargetRepo::new();
        let owner = ID::new();
        repo.insert(&PushTarget::new(
            "https://push.example/a".into(),
            "k1".into(),
            Some(owner.clone()),
        ))
        .await
        .unwrap();
        repo.insert(&PushTarget::new(
            "https://push.example/b".into(),
            "k2".into(),
            None,
        ))
        .await
        .unwrap();

        assert_eq!(repo.find_all().await.unwrap().len(), 2);
        let owned = repo.find_by_user(&owner).await.unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].endpoint, "https://push.example/a");

        assert_eq!(repo.delete_by_endpoint("https://push.example/b").await, 1);
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }
}
