//! Species sets: named, ordered collections of taxon ids owned by a user.
//!
//! Duplicate ids are not rejected here. Callers that add a taxon check
//! [`TaxonIds::contains`] first; the store keeps whatever sequence it is given.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;

/// Maximum title length in characters.
pub const SET_TITLE_MAX: usize = 100;

/// Validation errors for set fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeciesSetValidationError {
    /// The set id was not a UUID.
    #[error("set id must be a valid UUID")]
    InvalidSetId,
    /// The title was blank.
    #[error("title must not be empty")]
    EmptyTitle,
    /// The title exceeded [`SET_TITLE_MAX`].
    #[error("title must be at most {max} characters")]
    TitleTooLong {
        /// Maximum length.
        max: usize,
    },
    /// A taxon id was not a positive integer.
    #[error("taxon id `{value}` must be a positive integer")]
    InvalidTaxonId {
        /// Offending value.
        value: String,
    },
}

/// Set identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetId(Uuid);

impl SetId {
    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from a path segment.
    pub fn parse(raw: &str) -> Result<Self, SpeciesSetValidationError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| SpeciesSetValidationError::InvalidSetId)
    }

    /// Underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for SetId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Set title: trimmed, non-empty, at most [`SET_TITLE_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SetTitle(String);

impl SetTitle {
    /// Validate and construct a title.
    pub fn new(title: impl AsRef<str>) -> Result<Self, SpeciesSetValidationError> {
        let trimmed = title.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SpeciesSetValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > SET_TITLE_MAX {
            return Err(SpeciesSetValidationError::TitleTooLong { max: SET_TITLE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for SetTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SetTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<SetTitle> for String {
    fn from(value: SetTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for SetTitle {
    type Error = SpeciesSetValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Identifier of a taxon in the external taxonomy, carried as its decimal
/// string form.
///
/// # Examples
/// ```
/// use taxon_sets::domain::TaxonId;
///
/// let id = TaxonId::new("3").unwrap();
/// assert_eq!(id, TaxonId::from(3_u64));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaxonId(String);

impl TaxonId {
    /// Validate a decimal taxon id.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, SpeciesSetValidationError> {
        let trimmed = raw.as_ref().trim();
        let valid = !trimmed.is_empty()
            && trimmed.chars().all(|c| c.is_ascii_digit())
            && trimmed.parse::<u64>().is_ok_and(|value| value > 0);
        if !valid {
            return Err(SpeciesSetValidationError::InvalidTaxonId {
                value: raw.as_ref().to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl From<u64> for TaxonId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for TaxonId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TaxonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TaxonId> for String {
    fn from(value: TaxonId) -> Self {
        value.0
    }
}

impl TryFrom<String> for TaxonId {
    type Error = SpeciesSetValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Ordered taxon id sequence in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxonIds(Vec<TaxonId>);

impl TaxonIds {
    /// Parse a list of raw ids, keeping their order.
    pub fn parse<I, S>(raw: I) -> Result<Self, SpeciesSetValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw.into_iter()
            .map(TaxonId::new)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Whether `id` is already present.
    pub fn contains(&self, id: &TaxonId) -> bool {
        self.0.contains(id)
    }

    /// Sequence with `id` appended at the end. Does not deduplicate.
    #[must_use]
    pub fn appended(&self, id: TaxonId) -> Self {
        let mut ids = self.0.clone();
        ids.push(id);
        Self(ids)
    }

    /// Sequence with every occurrence of `id` removed.
    #[must_use]
    pub fn without(&self, id: &TaxonId) -> Self {
        Self(self.0.iter().filter(|existing| *existing != id).cloned().collect())
    }

    /// Borrow the ids in order.
    pub fn as_slice(&self) -> &[TaxonId] {
        &self.0
    }

    /// Number of ids.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<TaxonId>> for TaxonIds {
    fn from(value: Vec<TaxonId>) -> Self {
        Self(value)
    }
}

impl IntoIterator for TaxonIds {
    type Item = TaxonId;
    type IntoIter = std::vec::IntoIter<TaxonId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Title and contents submitted on create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetDraft {
    /// Set title.
    pub title: SetTitle,
    /// Taxon ids in display order.
    pub taxon_ids: TaxonIds,
}

/// A stored species set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesSet {
    /// Identifier.
    pub id: SetId,
    /// Title.
    pub title: SetTitle,
    /// Owning user.
    pub owner_id: UserId,
    /// Taxon ids in insertion order.
    pub taxon_ids: TaxonIds,
}

impl SpeciesSet {
    /// Create a new set owned by `owner_id` from `draft`.
    pub fn create(owner_id: UserId, draft: SetDraft) -> Self {
        Self {
            id: SetId::random(),
            title: draft.title,
            owner_id,
            taxon_ids: draft.taxon_ids,
        }
    }

    /// Whether `user_id` owns this set.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.owner_id == user_id
    }

    /// Replace title and contents, keeping identity and owner.
    #[must_use]
    pub fn revised(self, draft: SetDraft) -> Self {
        Self {
            title: draft.title,
            taxon_ids: draft.taxon_ids,
            ..self
        }
    }

    /// Draft describing the current contents.
    pub fn to_draft(&self) -> SetDraft {
        SetDraft {
            title: self.title.clone(),
            taxon_ids: self.taxon_ids.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ids(raw: &[&str]) -> TaxonIds {
        TaxonIds::parse(raw.iter().copied()).expect("valid ids")
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("0")]
    #[case("-3")]
    #[case("3.5")]
    fn taxon_id_rejects_non_positive_integers(#[case] raw: &str) {
        assert!(matches!(
            TaxonId::new(raw),
            Err(SpeciesSetValidationError::InvalidTaxonId { .. })
        ));
    }

    #[rstest]
    #[case("   ", SpeciesSetValidationError::EmptyTitle)]
    #[case(&"t".repeat(SET_TITLE_MAX + 1), SpeciesSetValidationError::TitleTooLong { max: SET_TITLE_MAX })]
    fn title_rejects_invalid_input(#[case] raw: &str, #[case] expected: SpeciesSetValidationError) {
        assert_eq!(SetTitle::new(raw).expect_err("invalid title"), expected);
    }

    #[rstest]
    fn parse_preserves_order() {
        let parsed = ids(&["7", "3", "12"]);
        let rendered: Vec<&str> = parsed.as_slice().iter().map(AsRef::as_ref).collect();
        assert_eq!(rendered, vec!["7", "3", "12"]);
    }

    #[rstest]
    fn appended_adds_to_end_without_deduplicating() {
        let base = ids(&["3"]);
        let appended = base.appended(TaxonId::from(3_u64));
        assert_eq!(appended, ids(&["3", "3"]));
        assert_eq!(base.len(), 1);
    }

    #[rstest]
    fn without_removes_every_occurrence() {
        let base = ids(&["3", "7", "3"]);
        assert_eq!(base.without(&TaxonId::from(3_u64)), ids(&["7"]));
    }

    #[rstest]
    fn revised_keeps_identity_and_owner() {
        let owner = UserId::random();
        let set = SpeciesSet::create(
            owner.clone(),
            SetDraft {
                title: SetTitle::new("Birds").expect("title"),
                taxon_ids: ids(&["3"]),
            },
        );
        let id = set.id;
        let revised = set.revised(SetDraft {
            title: SetTitle::new("Raptors").expect("title"),
            taxon_ids: ids(&["3", "7"]),
        });
        assert_eq!(revised.id, id);
        assert!(revised.is_owned_by(&owner));
        assert_eq!(revised.title.as_ref(), "Raptors");
    }
}
