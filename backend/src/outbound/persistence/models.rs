//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{sessions, species_sets, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = species_sets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SpeciesSetRow {
    pub id: Uuid,
    pub title: String,
    pub owner_id: Uuid,
    pub taxon_ids: Vec<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = species_sets)]
pub(crate) struct NewSpeciesSetRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub owner_id: Uuid,
    pub taxon_ids: Vec<&'a str>,
}

/// Changeset applied on update; `updated_at` is bumped alongside it.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = species_sets)]
pub(crate) struct SpeciesSetUpdate<'a> {
    pub title: &'a str,
    pub taxon_ids: Vec<&'a str>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SessionRow {
    pub token_fingerprint: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sessions)]
pub(crate) struct NewSessionRow<'a> {
    pub token_fingerprint: &'a str,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}
