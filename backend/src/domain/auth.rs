//! Authentication primitives: credentials, signup forms, bearer sessions.
//!
//! Inbound payloads are parsed through these constructors before any port is
//! called, so services only ever see validated values.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::user::{User, UserId, UserValidationError, Username};

/// Minimum accepted password length at signup.
pub const PASSWORD_MIN: usize = 3;
const TOKEN_BYTES: usize = 32;

/// Error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use taxon_sets::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada ", "pw").unwrap();
/// assert_eq!(creds.username(), "ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Error returned when a signup form is invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignupValidationError {
    /// Username failed validation.
    #[error(transparent)]
    Username(#[from] UserValidationError),
    /// Password shorter than [`PASSWORD_MIN`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum length.
        min: usize,
    },
    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,
}

/// Validated signup request.
///
/// Both the client and the server build one of these; the confirmation check
/// runs on each side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupForm {
    username: Username,
    password: Zeroizing<String>,
}

impl SignupForm {
    /// Validate raw inputs.
    ///
    /// # Examples
    /// ```
    /// use taxon_sets::domain::{SignupForm, SignupValidationError};
    ///
    /// let err = SignupForm::try_from_parts("ada", "abc", "abd").unwrap_err();
    /// assert_eq!(err, SignupValidationError::PasswordMismatch);
    /// ```
    pub fn try_from_parts(
        username: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Self, SignupValidationError> {
        let username = Username::new(username)?;
        if password.chars().count() < PASSWORD_MIN {
            return Err(SignupValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if password != confirm_password {
            return Err(SignupValidationError::PasswordMismatch);
        }
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Requested username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Requested password.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Opaque bearer token issued at login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generate a new random token.
    pub fn generate() -> Self {
        let mut bytes = [0_u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Wrap a token presented by a client. Returns `None` for blank input.
    pub fn from_presented(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    /// Token text for the `Authorization` header.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// One-way fingerprint stored in place of the token.
    pub fn fingerprint(&self) -> TokenFingerprint {
        TokenFingerprint(hex::encode(Sha256::digest(self.0.as_bytes())))
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// SHA-256 fingerprint of a [`SessionToken`], hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenFingerprint(String);

impl TokenFingerprint {
    /// Rebuild a fingerprint read from storage.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl AsRef<str> for TokenFingerprint {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Server-side record of an issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Fingerprint of the issued token.
    pub fingerprint: TokenFingerprint,
    /// Owner of the session.
    pub user_id: UserId,
    /// Instant after which the token is rejected.
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Whether the session is still valid at `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Session handed to a client after login: `{token, username, id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedSession {
    /// Bearer token.
    pub token: SessionToken,
    /// Login name.
    pub username: Username,
    /// User identifier.
    pub id: UserId,
}

impl AuthenticatedSession {
    /// Build a session for `user` carrying `token`.
    pub fn new(token: SessionToken, user: &User) -> Self {
        Self {
            token,
            username: user.username().clone(),
            id: user.id().clone(),
        }
    }
}
