//! User identity types.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::password::PasswordHash;

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 3;
/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 32;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The identifier was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// The identifier was not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// The username was blank.
    #[error("username must not be empty")]
    EmptyUsername,
    /// The username was shorter than [`USERNAME_MIN`].
    #[error("username must be at least {min} characters")]
    UsernameTooShort {
        /// Minimum length.
        min: usize,
    },
    /// The username was longer than [`USERNAME_MAX`].
    #[error("username must be at most {max} characters")]
    UsernameTooLong {
        /// Maximum length.
        max: usize,
    },
    /// The username contained characters outside `[A-Za-z0-9_.-]`.
    #[error("username may only contain letters, numbers, dots, dashes, or underscores")]
    UsernameInvalidCharacters,
}

/// Stable user identifier stored as a UUID.
///
/// The original string form is retained so round-trips are lossless.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.1
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Unique login name.
///
/// ## Invariants
/// - Trimmed, between [`USERNAME_MIN`] and [`USERNAME_MAX`] characters.
/// - Only ASCII letters, digits, `_`, `.` and `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`]. Surrounding whitespace is
    /// removed first.
    pub fn new(username: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = username.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        let length = trimmed.chars().count();
        if length < USERNAME_MIN {
            return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
        }
        if length > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Public user identity.
///
/// # Examples
/// ```
/// use taxon_sets::domain::{User, UserId, Username};
///
/// let user = User::new(UserId::random(), Username::new("ada").unwrap());
/// assert_eq!(user.username().as_ref(), "ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: Username,
}

impl User {
    /// Build a user from validated parts.
    pub fn new(id: UserId, username: Username) -> Self {
        Self { id, username }
    }

    /// Stable identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Login name.
    pub fn username(&self) -> &Username {
        &self.username
    }
}

/// Stored account: identity plus credential digest. Never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    user: User,
    password_hash: PasswordHash,
}

impl UserAccount {
    /// Bundle a user with their password digest.
    pub fn new(user: User, password_hash: PasswordHash) -> Self {
        Self {
            user,
            password_hash,
        }
    }

    /// Public identity.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Stored password digest.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }
}
