//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Unique login name (max 32 characters).
        username -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Curated species sets.
    species_sets (id) {
        id -> Uuid,
        title -> Varchar,
        owner_id -> Uuid,
        /// Taxon ids in insertion order.
        taxon_ids -> Array<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Issued bearer sessions, keyed by token fingerprint.
    sessions (token_fingerprint) {
        token_fingerprint -> Bpchar,
        user_id -> Uuid,
        expires_at -> Timestamptz,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(species_sets -> users (owner_id));
diesel::joinable!(sessions -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, species_sets, sessions);
