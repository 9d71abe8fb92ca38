//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed entities shared by the REST API, the
//! persistence adapters and the client hook layer. Types validate on
//! construction and document their serde contracts in Rustdoc.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `User`, `Username`, `UserId`: account identity.
//! - `SpeciesSet`, `SetDraft`, `TaxonIds`: curated collections.
//! - `Taxon`, `WikiSummary`, `DescendantsPage`: provider records.
//! - `AccountService`, `SetsService`: use-case implementations.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod password;
pub mod ports;
pub mod sets_service;
pub mod species_set;
pub mod taxon;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    AuthenticatedSession, LoginCredentials, LoginValidationError, PASSWORD_MIN, SessionRecord,
    SessionToken, SignupForm, SignupValidationError, TokenFingerprint,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::password::{PasswordHash, PasswordHashError};
pub use self::sets_service::SetsService;
pub use self::species_set::{
    SetDraft, SetId, SetTitle, SpeciesSet, SpeciesSetValidationError, TaxonId, TaxonIds,
};
pub use self::taxon::{
    DefaultPhoto, DescendantsPage, SPECIES_RANK, Taxon, TaxonWithSummary, WikiSummary,
};
pub use self::trace_id::TraceId;
pub use self::user::{User, UserAccount, UserId, UserValidationError, Username};
