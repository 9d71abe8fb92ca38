//! PostgreSQL-backed `SetRepository`.
//!
//! Taxon ids live in a `TEXT[]` column so their order survives a round trip.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SetRepository, SetRepositoryError};
use crate::domain::{SetId, SetTitle, SpeciesSet, TaxonIds, UserId};

use super::diesel_error_mapping::{
    DieselFailure, classify_diesel_error, classify_pool_error,
};
use super::models::{NewSpeciesSetRow, SpeciesSetRow, SpeciesSetUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::species_sets;

/// Diesel implementation of [`SetRepository`].
#[derive(Clone)]
pub struct DieselSetRepository {
    pool: DbPool,
}

impl DieselSetRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: DieselFailure) -> SetRepositoryError {
    match failure {
        DieselFailure::Connection(message) => SetRepositoryError::connection(message),
        DieselFailure::UniqueViolation(constraint) => SetRepositoryError::query(format!(
            "unique constraint violated: {}",
            constraint.as_deref().unwrap_or("unknown")
        )),
        DieselFailure::Query(message) => SetRepositoryError::query(message),
    }
}

fn map_diesel_error(error: diesel::result::Error) -> SetRepositoryError {
    map_failure(classify_diesel_error(error))
}

fn map_pool_error(error: PoolError) -> SetRepositoryError {
    map_failure(classify_pool_error(error))
}

fn row_to_set(row: SpeciesSetRow) -> Result<SpeciesSet, SetRepositoryError> {
    let invalid = |err: crate::domain::SpeciesSetValidationError| {
        SetRepositoryError::query(format!("stored set {} invalid: {err}", row.id))
    };
    let title = SetTitle::new(&row.title).map_err(invalid)?;
    let taxon_ids = TaxonIds::parse(&row.taxon_ids).map_err(invalid)?;
    Ok(SpeciesSet {
        id: SetId::from(row.id),
        title,
        owner_id: UserId::from_uuid(row.owner_id),
        taxon_ids,
    })
}

fn taxon_id_strs(set: &SpeciesSet) -> Vec<&str> {
    set.taxon_ids.as_slice().iter().map(AsRef::as_ref).collect()
}

#[async_trait]
impl SetRepository for DieselSetRepository {
    async fn insert(&self, set: &SpeciesSet) -> Result<(), SetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewSpeciesSetRow {
            id: *set.id.as_uuid(),
            title: set.title.as_ref(),
            owner_id: *set.owner_id.as_uuid(),
            taxon_ids: taxon_id_strs(set),
        };
        diesel::insert_into(species_sets::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find(&self, id: &SetId) -> Result<Option<SpeciesSet>, SetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<SpeciesSetRow> = species_sets::table
            .filter(species_sets::id.eq(id.as_uuid()))
            .select(SpeciesSetRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_set).transpose()
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<SpeciesSet>, SetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<SpeciesSetRow> = species_sets::table
            .filter(species_sets::owner_id.eq(owner.as_uuid()))
            .order((species_sets::created_at.asc(), species_sets::id.asc()))
            .select(SpeciesSetRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_set).collect()
    }

    async fn update(&self, set: &SpeciesSet) -> Result<bool, SetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = SpeciesSetUpdate {
            title: set.title.as_ref(),
            taxon_ids: taxon_id_strs(set),
            updated_at: Utc::now(),
        };
        let affected = diesel::update(species_sets::table.filter(species_sets::id.eq(set.id.as_uuid())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }

    async fn delete(&self, id: &SetId) -> Result<bool, SetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(species_sets::table.filter(species_sets::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(taxon_ids: &[&str]) -> SpeciesSetRow {
        SpeciesSetRow {
            id: Uuid::new_v4(),
            title: "Birds".to_owned(),
            owner_id: Uuid::new_v4(),
            taxon_ids: taxon_ids.iter().map(|id| (*id).to_owned()).collect(),
        }
    }

    #[rstest]
    fn row_keeps_taxon_order() {
        let set = row_to_set(row(&["7", "3", "9"])).expect("valid row");
        let ids: Vec<&str> = set.taxon_ids.as_slice().iter().map(AsRef::as_ref).collect();
        assert_eq!(ids, vec!["7", "3", "9"]);
        assert_eq!(taxon_id_strs(&set), vec!["7", "3", "9"]);
    }

    #[rstest]
    fn corrupt_taxon_id_is_a_query_error() {
        assert!(matches!(
            row_to_set(row(&["3", "x"])),
            Err(SetRepositoryError::Query { .. })
        ));
    }
}
