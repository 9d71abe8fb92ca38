//! Species set use-cases with ownership enforcement.
//!
//! Reads are open to any authenticated caller; updates and deletes require
//! the caller to own the set and are answered with `forbidden` otherwise.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{SetRepository, SetRepositoryError, SetsCommand, SetsQuery};
use crate::domain::{Error, SetDraft, SetId, SpeciesSet, UserId};

/// Set service implementing the command and query ports.
#[derive(Clone)]
pub struct SetsService<R> {
    sets: Arc<R>,
}

impl<R> SetsService<R> {
    /// Create a service over the given repository.
    pub fn new(sets: Arc<R>) -> Self {
        Self { sets }
    }
}

fn map_set_error(error: SetRepositoryError) -> Error {
    match error {
        SetRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("set repository unavailable: {message}"))
        }
        SetRepositoryError::Query { message } => {
            Error::internal(format!("set repository error: {message}"))
        }
    }
}

fn set_not_found(id: &SetId) -> Error {
    Error::not_found(format!("set {id} not found"))
}

impl<R: SetRepository> SetsService<R> {
    async fn owned_set(&self, caller: &UserId, id: &SetId) -> Result<SpeciesSet, Error> {
        let set = self
            .sets
            .find(id)
            .await
            .map_err(map_set_error)?
            .ok_or_else(|| set_not_found(id))?;
        if !set.is_owned_by(caller) {
            warn!(set_id = %id, caller = %caller, "rejected mutation by non-owner");
            return Err(Error::forbidden("only the owner may modify this set"));
        }
        Ok(set)
    }
}

#[async_trait]
impl<R: SetRepository> SetsCommand for SetsService<R> {
    async fn create(&self, owner: &UserId, draft: SetDraft) -> Result<SpeciesSet, Error> {
        let set = SpeciesSet::create(owner.clone(), draft);
        self.sets.insert(&set).await.map_err(map_set_error)?;
        info!(set_id = %set.id, owner = %owner, taxa = set.taxon_ids.len(), "set created");
        Ok(set)
    }

    async fn update(
        &self,
        caller: &UserId,
        id: &SetId,
        draft: SetDraft,
    ) -> Result<SpeciesSet, Error> {
        let revised = self.owned_set(caller, id).await?.revised(draft);
        if !self.sets.update(&revised).await.map_err(map_set_error)? {
            return Err(set_not_found(id));
        }
        Ok(revised)
    }

    async fn delete(&self, caller: &UserId, id: &SetId) -> Result<(), Error> {
        self.owned_set(caller, id).await?;
        if !self.sets.delete(id).await.map_err(map_set_error)? {
            return Err(set_not_found(id));
        }
        info!(set_id = %id, "set deleted");
        Ok(())
    }
}

#[async_trait]
impl<R: SetRepository> SetsQuery for SetsService<R> {
    async fn list_for(&self, owner: &UserId) -> Result<Vec<SpeciesSet>, Error> {
        self.sets.list_by_owner(owner).await.map_err(map_set_error)
    }

    async fn get(&self, id: &SetId) -> Result<SpeciesSet, Error> {
        self.sets
            .find(id)
            .await
            .map_err(map_set_error)?
            .ok_or_else(|| set_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockSetRepository;
    use crate::domain::{SetTitle, TaxonIds};
    use rstest::rstest;

    fn draft(title: &str, ids: &[&str]) -> SetDraft {
        SetDraft {
            title: SetTitle::new(title).expect("title"),
            taxon_ids: TaxonIds::parse(ids.iter().copied()).expect("ids"),
        }
    }

    fn stored_set(owner: &UserId) -> SpeciesSet {
        SpeciesSet::create(owner.clone(), draft("Birds", &["3", "7"]))
    }

    #[rstest]
    #[tokio::test]
    async fn create_assigns_owner_and_keeps_order() {
        let owner = UserId::random();
        let mut repo = MockSetRepository::new();
        repo.expect_insert().times(1).return_once(|_| Ok(()));

        let set = SetsService::new(Arc::new(repo))
            .create(&owner, draft("Birds", &["7", "3"]))
            .await
            .expect("create succeeds");
        assert!(set.is_owned_by(&owner));
        let ids: Vec<&str> = set.taxon_ids.as_slice().iter().map(AsRef::as_ref).collect();
        assert_eq!(ids, vec!["7", "3"]);
    }

    #[rstest]
    #[tokio::test]
    async fn update_by_owner_persists_revision() {
        let owner = UserId::random();
        let existing = stored_set(&owner);
        let id = existing.id;
        let mut repo = MockSetRepository::new();
        repo.expect_find().return_once(move |_| Ok(Some(existing)));
        repo.expect_update()
            .withf(|set| set.title.as_ref() == "Raptors" && set.taxon_ids.len() == 3)
            .return_once(|_| Ok(true));

        let updated = SetsService::new(Arc::new(repo))
            .update(&owner, &id, draft("Raptors", &["3", "7", "9"]))
            .await
            .expect("update succeeds");
        assert_eq!(updated.id, id);
    }

    #[rstest]
    #[tokio::test]
    async fn update_by_other_user_is_forbidden() {
        let existing = stored_set(&UserId::random());
        let id = existing.id;
        let mut repo = MockSetRepository::new();
        repo.expect_find().return_once(move |_| Ok(Some(existing)));
        repo.expect_update().never();

        let err = SetsService::new(Arc::new(repo))
            .update(&UserId::random(), &id, draft("Mine now", &[]))
            .await
            .expect_err("non-owner");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_by_other_user_is_forbidden_and_keeps_set() {
        let existing = stored_set(&UserId::random());
        let id = existing.id;
        let mut repo = MockSetRepository::new();
        repo.expect_find().return_once(move |_| Ok(Some(existing)));
        repo.expect_delete().never();

        let err = SetsService::new(Arc::new(repo))
            .delete(&UserId::random(), &id)
            .await
            .expect_err("non-owner");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_missing_set_is_not_found() {
        let mut repo = MockSetRepository::new();
        repo.expect_find().return_once(|_| Ok(None));

        let err = SetsService::new(Arc::new(repo))
            .delete(&UserId::random(), &SetId::random())
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case(SetRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(SetRepositoryError::query("syntax"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn get_maps_repository_errors(
        #[case] failure: SetRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut repo = MockSetRepository::new();
        repo.expect_find().return_once(move |_| Err(failure));

        let err = SetsService::new(Arc::new(repo))
            .get(&SetId::random())
            .await
            .expect_err("repository failure");
        assert_eq!(err.code(), expected);
    }
}
