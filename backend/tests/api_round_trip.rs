//! End-to-end coverage: the real HTTP server on in-memory storage, driven
//! through the hook layer and the reqwest REST client.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use chrono::TimeDelta;
use reqwest::Url;
use rstest::{fixture, rstest};
use taxon_sets::client::{
    AccountFlow, ClientError, CreateSet, DeleteSet, MemorySessionStorage, MutationContext,
    Outcome, QueryCache, Route, SessionHolder, SetQuery, SetsQuery,
};
use taxon_sets::domain::{SpeciesSet, TaxonIds};
use taxon_sets::inbound::http::health::HealthState;
use taxon_sets::outbound::rest_api::RestApiClient;
use taxon_sets::server::{ServerConfig, create_server};

/// Hooks for one signed-in user.
struct Visitor {
    account: AccountFlow,
    mutations: MutationContext,
    set: SetQuery,
    sets: SetsQuery,
}

impl Visitor {
    fn new(base: &Url) -> Self {
        let api = Arc::new(RestApiClient::new(base.clone(), Duration::from_secs(5)).expect("client"));
        let session = Arc::new(
            SessionHolder::init(Arc::new(MemorySessionStorage::new())).expect("session"),
        );
        let cache = Arc::new(QueryCache::new());
        Self {
            account: AccountFlow::new(api.clone(), Arc::clone(&session), Arc::clone(&cache)),
            mutations: MutationContext::new(api.clone(), Arc::clone(&session), Arc::clone(&cache)),
            set: SetQuery::new(api.clone(), Arc::clone(&session), Arc::clone(&cache)),
            sets: SetsQuery::new(api, session, cache),
        }
    }

    async fn sign_up(&self, username: &str) {
        let outcome = self.account.sign_up(username, "pw123", "pw123").await;
        assert!(outcome.is_done(), "signup failed: {outcome:?}");
    }

    async fn create(&self, title: &str, ids: &[&str]) -> SpeciesSet {
        let outcome = CreateSet::new(self.mutations.clone(), Route::Profile)
            .trigger(title, TaxonIds::parse(ids.iter().copied()).expect("ids"))
            .await;
        match outcome {
            Outcome::Done { value, .. } => value,
            other => panic!("create failed: {other:?}"),
        }
    }
}

#[fixture]
fn config() -> ServerConfig {
    let addr: SocketAddr = "127.0.0.1:0".parse().expect("addr");
    ServerConfig::new(addr, TimeDelta::hours(1))
}

fn start(config: ServerConfig) -> Url {
    let health = web::Data::new(HealthState::new(config.store_name()));
    let (server, addr) = create_server(health, config).expect("server binds");
    actix_web::rt::spawn(server);
    Url::parse(&format!("http://{addr}/")).expect("base url")
}

#[rstest]
#[actix_web::test]
async fn created_set_reads_back_in_insertion_order(config: ServerConfig) {
    let base = start(config);
    let ada = Visitor::new(&base);
    ada.sign_up("ada").await;

    let created = ada.create("Birds", &["3", "7"]).await;
    let fetched = ada.set.fetch(&created.id).await.expect("fetch by id");
    assert_eq!(fetched.title.as_ref(), "Birds");
    let ids: Vec<String> = fetched.taxon_ids.into_iter().map(String::from).collect();
    assert_eq!(ids, vec!["3", "7"]);

    let listed = ada.sets.fetch().await.expect("list");
    assert_eq!(listed.len(), 1);
}

#[rstest]
#[actix_web::test]
async fn non_owner_delete_is_forbidden_and_keeps_set(config: ServerConfig) {
    let base = start(config);
    let ada = Visitor::new(&base);
    ada.sign_up("ada").await;
    let set = ada.create("Owls", &["19350"]).await;

    let grace = Visitor::new(&base);
    grace.sign_up("grace").await;
    let outcome = DeleteSet::new(grace.mutations.clone(), Route::Home)
        .trigger(&set.id)
        .await;
    assert!(
        matches!(outcome, Outcome::Failed(ClientError::Forbidden { .. })),
        "unexpected outcome: {outcome:?}"
    );

    let still_there = ada.set.fetch(&set.id).await.expect("set survives");
    assert_eq!(still_there.id, set.id);
}

#[rstest]
#[actix_web::test]
async fn duplicate_username_and_bad_login_surface_messages(config: ServerConfig) {
    let base = start(config);
    let ada = Visitor::new(&base);
    ada.sign_up("ada").await;

    let again = Visitor::new(&base);
    let outcome = again.account.sign_up("ada", "pw123", "pw123").await;
    assert_eq!(
        outcome,
        Outcome::Failed(ClientError::validation("username taken"))
    );

    let outcome = again.account.log_in("ada", "wrong").await;
    assert_eq!(
        outcome,
        Outcome::Failed(ClientError::auth("invalid credentials"))
    );
}

#[rstest]
#[actix_web::test]
async fn signed_out_reads_require_login(config: ServerConfig) {
    let base = start(config);
    let visitor = Visitor::new(&base);
    let err = visitor.sets.fetch().await.expect_err("no session");
    assert!(err.requires_login());
}

#[rstest]
#[actix_web::test]
async fn probes_report_memory_store(config: ServerConfig) {
    let base = start(config);
    let body: serde_json::Value = reqwest::get(base.join("health/ready").expect("url"))
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert_eq!(body["status"], "ready");
    assert_eq!(body["store"], "memory");
}
