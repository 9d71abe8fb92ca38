//! Shared validation helpers for inbound HTTP adapters.
//!
//! Domain validation errors are mapped onto `invalid_request` responses whose
//! `details` name the offending field and a stable machine-readable code.

use serde_json::json;

use crate::domain::{
    Error, SetDraft, SetId, SetTitle, SignupValidationError, SpeciesSetValidationError, TaxonIds,
    UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    InvalidUuid,
    EmptyTitle,
    TitleTooLong,
    InvalidTaxonId,
    EmptyUsername,
    InvalidUsername,
    PasswordTooShort,
    PasswordMismatch,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUuid => "invalid_uuid",
            Self::EmptyTitle => "empty_title",
            Self::TitleTooLong => "title_too_long",
            Self::InvalidTaxonId => "invalid_taxon_id",
            Self::EmptyUsername => "empty_username",
            Self::InvalidUsername => "invalid_username",
            Self::PasswordTooShort => "password_too_short",
            Self::PasswordMismatch => "password_mismatch",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const SET_ID: FieldName = FieldName::new("id");
pub(crate) const TITLE: FieldName = FieldName::new("title");
pub(crate) const TAXON_IDS: FieldName = FieldName::new("taxonIds");
pub(crate) const USERNAME: FieldName = FieldName::new("username");
pub(crate) const PASSWORD: FieldName = FieldName::new("password");
pub(crate) const CONFIRM_PASSWORD: FieldName = FieldName::new("confirmPassword");

pub(crate) fn field_error(field: FieldName, code: ValidationCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn field_value_error(
    field: FieldName,
    code: ValidationCode,
    message: impl Into<String>,
    value: &str,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

/// Parse a set identifier taken from the request path.
pub(crate) fn parse_set_id(raw: &str) -> Result<SetId, Error> {
    SetId::parse(raw).map_err(|err| {
        field_value_error(SET_ID, ValidationCode::InvalidUuid, err.to_string(), raw)
    })
}

fn map_set_validation_error(err: SpeciesSetValidationError) -> Error {
    let message = err.to_string();
    match err {
        SpeciesSetValidationError::InvalidSetId => {
            field_error(SET_ID, ValidationCode::InvalidUuid, message)
        }
        SpeciesSetValidationError::EmptyTitle => {
            field_error(TITLE, ValidationCode::EmptyTitle, message)
        }
        SpeciesSetValidationError::TitleTooLong { .. } => {
            field_error(TITLE, ValidationCode::TitleTooLong, message)
        }
        SpeciesSetValidationError::InvalidTaxonId { value } => {
            field_value_error(TAXON_IDS, ValidationCode::InvalidTaxonId, message, &value)
        }
    }
}

/// Validate a raw title and taxon id list into a [`SetDraft`].
pub(crate) fn parse_draft(title: &str, taxon_ids: &[String]) -> Result<SetDraft, Error> {
    let title = SetTitle::new(title).map_err(map_set_validation_error)?;
    let taxon_ids =
        TaxonIds::parse(taxon_ids.iter().map(String::as_str)).map_err(map_set_validation_error)?;
    Ok(SetDraft { title, taxon_ids })
}

pub(crate) fn map_signup_validation_error(err: SignupValidationError) -> Error {
    let message = err.to_string();
    match err {
        SignupValidationError::Username(UserValidationError::EmptyUsername) => {
            field_error(USERNAME, ValidationCode::EmptyUsername, message)
        }
        SignupValidationError::Username(_) => {
            field_error(USERNAME, ValidationCode::InvalidUsername, message)
        }
        SignupValidationError::PasswordTooShort { .. } => {
            field_error(PASSWORD, ValidationCode::PasswordTooShort, message)
        }
        SignupValidationError::PasswordMismatch => {
            field_error(CONFIRM_PASSWORD, ValidationCode::PasswordMismatch, message)
        }
    }
}
