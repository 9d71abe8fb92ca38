//! Data-fetch hook layer.
//!
//! Sits between a front end and the REST API plus the two external
//! providers. Queries read through a shared [`QueryCache`]; mutations report
//! pending and error flags, return an [`Outcome`] naming the side effect to
//! run, and invalidate the cache entries they make stale. The session token
//! comes from an explicit [`SessionHolder`] passed to each constructor.

mod account;
mod cache;
mod error;
mod mutations;
pub mod ports;
mod results;
mod session;
mod sets;
mod suggestions;
mod taxa;
mod view;

pub use account::AccountFlow;
pub use cache::{QueryCache, QueryKey};
pub use error::ClientError;
pub use mutations::{
    CreateSet, CreateSetFromSearch, DUPLICATE_TAXON_MESSAGE, DeleteSet, DuplicateGuard, Effect,
    MutationContext, MutationState, MutationStatus, Outcome, RemoveTaxon, Route,
    UpdateSetFromSearch,
};
pub use ports::{AccountApi, SessionStorage, SetsApi};
pub use results::ResultsQuery;
pub use session::{MemorySessionStorage, SessionHolder};
pub use sets::{SetQuery, SetsQuery};
pub use suggestions::{SetBuilder, SpeciesSuggestions};
pub use taxa::{SummaryQuery, TaxaQuery};
pub use view::{Ticket, ViewScope};

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use url::Url;

    use super::{MemorySessionStorage, SessionHolder};
    use crate::domain::{
        AuthenticatedSession, SPECIES_RANK, SessionToken, SetDraft, SetTitle, SpeciesSet, Taxon,
        TaxonId, TaxonIds, User, UserId, Username, WikiSummary,
    };

    pub(crate) fn taxon(id: u64) -> Taxon {
        Taxon {
            id: TaxonId::from(id),
            name: format!("Species {id}"),
            preferred_common_name: None,
            rank: SPECIES_RANK.to_owned(),
            wikipedia_url: Url::parse(&format!("https://en.wikipedia.org/wiki/Species_{id}")).ok(),
            default_photo: None,
        }
    }

    pub(crate) fn summary(url: &Url) -> WikiSummary {
        WikiSummary {
            url: url.clone(),
            title: "Article".to_owned(),
            extract: "A bird.".to_owned(),
        }
    }

    pub(crate) fn signed_out() -> Arc<SessionHolder> {
        Arc::new(
            SessionHolder::init(Arc::new(MemorySessionStorage::new())).expect("memory storage"),
        )
    }

    pub(crate) fn signed_in() -> (Arc<SessionHolder>, UserId) {
        let holder = signed_out();
        let user = User::new(UserId::random(), Username::new("ada").expect("username"));
        holder
            .set(AuthenticatedSession::new(SessionToken::generate(), &user))
            .expect("store session");
        (holder, user.id().clone())
    }

    pub(crate) fn stored_set(owner: &UserId, title: &str, ids: &[&str]) -> SpeciesSet {
        SpeciesSet::create(
            owner.clone(),
            SetDraft {
                title: SetTitle::new(title).expect("title"),
                taxon_ids: TaxonIds::parse(ids.iter().copied()).expect("ids"),
            },
        )
    }
}
