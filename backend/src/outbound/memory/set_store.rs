use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{SetRepository, SetRepositoryError};
use crate::domain::{SetId, SpeciesSet, UserId};

/// Set store preserving creation order.
#[derive(Default)]
pub struct InMemorySetRepository {
    sets: RwLock<Vec<SpeciesSet>>,
}

impl InMemorySetRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SetRepository for InMemorySetRepository {
    async fn insert(&self, set: &SpeciesSet) -> Result<(), SetRepositoryError> {
        let mut sets = self.sets.write().await;
        if sets.iter().any(|existing| existing.id == set.id) {
            return Err(SetRepositoryError::query(format!("set {} already exists", set.id)));
        }
        sets.push(set.clone());
        Ok(())
    }

    async fn find(&self, id: &SetId) -> Result<Option<SpeciesSet>, SetRepositoryError> {
        Ok(self.sets.read().await.iter().find(|set| set.id == *id).cloned())
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<SpeciesSet>, SetRepositoryError> {
        Ok(self
            .sets
            .read()
            .await
            .iter()
            .filter(|set| set.is_owned_by(owner))
            .cloned()
            .collect())
    }

    async fn update(&self, set: &SpeciesSet) -> Result<bool, SetRepositoryError> {
        let mut sets = self.sets.write().await;
        match sets.iter_mut().find(|existing| existing.id == set.id) {
            Some(slot) => {
                *slot = set.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &SetId) -> Result<bool, SetRepositoryError> {
        let mut sets = self.sets.write().await;
        let before = sets.len();
        sets.retain(|set| set.id != *id);
        Ok(sets.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SetDraft, SetTitle, TaxonIds};
    use rstest::rstest;

    fn set(owner: &UserId, title: &str) -> SpeciesSet {
        SpeciesSet::create(
            owner.clone(),
            SetDraft {
                title: SetTitle::new(title).expect("title"),
                taxon_ids: TaxonIds::parse(["3", "7"]).expect("ids"),
            },
        )
    }

    #[rstest]
    #[tokio::test]
    async fn lists_owner_sets_in_creation_order() {
        let repo = InMemorySetRepository::new();
        let ada = UserId::random();
        let grace = UserId::random();
        for (owner, title) in [(&ada, "Birds"), (&grace, "Ferns"), (&ada, "Moths")] {
            repo.insert(&set(owner, title)).await.expect("insert");
        }

        let titles: Vec<String> = repo
            .list_by_owner(&ada)
            .await
            .expect("list")
            .into_iter()
            .map(|s| s.title.as_ref().to_owned())
            .collect();
        assert_eq!(titles, vec!["Birds", "Moths"]);
    }

    #[rstest]
    #[tokio::test]
    async fn update_and_delete_report_presence() {
        let repo = InMemorySetRepository::new();
        let stored = set(&UserId::random(), "Birds");
        repo.insert(&stored).await.expect("insert");

        let renamed = stored.clone().revised(SetDraft {
            title: SetTitle::new("Raptors").expect("title"),
            taxon_ids: TaxonIds::default(),
        });
        assert!(repo.update(&renamed).await.expect("update"));
        let found = repo.find(&stored.id).await.expect("find").expect("present");
        assert_eq!(found.title.as_ref(), "Raptors");

        assert!(repo.delete(&stored.id).await.expect("delete"));
        assert!(!repo.delete(&stored.id).await.expect("delete"));
        assert!(!repo.update(&renamed).await.expect("update"));
    }
}
