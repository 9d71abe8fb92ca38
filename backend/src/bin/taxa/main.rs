//! `taxa`: command-line front end over the hook layer.
//!
//! Each invocation builds the hooks against the configured endpoints, runs
//! one command and prints the result. The signed-in session is kept in a
//! JSON file between invocations.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod cli;
mod render;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use tokio::runtime::Builder;
use tracing_subscriber::{EnvFilter, fmt};

use cli::{Cli, Command, Endpoints, SetsCommand};
use taxon_sets::client::{
    AccountFlow, ClientError, CreateSet, DeleteSet, DuplicateGuard, MutationContext, Outcome,
    QueryCache, RemoveTaxon, ResultsQuery, Route, SessionHolder, SetQuery, SetsQuery,
    SpeciesSuggestions, TaxaQuery, UpdateSetFromSearch,
};
use taxon_sets::domain::ports::TaxonomySource;
use taxon_sets::domain::{SetId, TaxonId, TaxonIds};
use taxon_sets::outbound::inaturalist::InaturalistTaxonomySource;
use taxon_sets::outbound::rest_api::RestApiClient;
use taxon_sets::outbound::session_file::FileSessionStorage;
use taxon_sets::outbound::wikipedia::WikipediaSummarySource;

/// Hooks and adapters shared by every command.
struct Hooks {
    taxonomy: Arc<dyn TaxonomySource>,
    results: ResultsQuery,
    taxa: TaxaQuery,
    suggestions: SpeciesSuggestions,
    set: SetQuery,
    sets: SetsQuery,
    account: AccountFlow,
    mutations: MutationContext,
}

impl Hooks {
    fn build(endpoints: &Endpoints) -> Result<Self> {
        let timeout = Duration::from_secs(endpoints.timeout_secs);
        let taxonomy: Arc<dyn TaxonomySource> = Arc::new(
            InaturalistTaxonomySource::new(endpoints.taxonomy_url.clone(), timeout)
                .wrap_err("failed to build taxonomy client")?,
        );
        let summaries = Arc::new(
            WikipediaSummarySource::new(endpoints.summary_url.clone(), timeout)
                .wrap_err("failed to build summary client")?,
        );
        let api = Arc::new(
            RestApiClient::new(endpoints.api_url.clone(), timeout)
                .wrap_err("failed to build API client")?,
        );
        let storage = Arc::new(FileSessionStorage::new(&endpoints.session_file)?);
        let session = Arc::new(SessionHolder::init(storage)?);
        let cache = Arc::new(QueryCache::new());

        Ok(Self {
            results: ResultsQuery::new(Arc::clone(&taxonomy), Arc::clone(&cache)),
            taxa: TaxaQuery::new(Arc::clone(&taxonomy), summaries, Arc::clone(&cache)),
            suggestions: SpeciesSuggestions::new(Arc::clone(&taxonomy)),
            set: SetQuery::new(api.clone(), Arc::clone(&session), Arc::clone(&cache)),
            sets: SetsQuery::new(api.clone(), Arc::clone(&session), Arc::clone(&cache)),
            account: AccountFlow::new(api.clone(), Arc::clone(&session), Arc::clone(&cache)),
            mutations: MutationContext::new(api, session, cache),
            taxonomy,
        })
    }
}

/// Print the side effect of a settled mutation, or turn a failure into an
/// error for the process exit status.
fn settle<T>(outcome: Outcome<T>, done: impl FnOnce(&T) -> String) -> Result<()> {
    match outcome {
        Outcome::Done { value, effect } => {
            print!("{}", done(&value));
            if let Some(line) = render::effect(&effect) {
                println!("{line}");
            }
            Ok(())
        }
        Outcome::Failed(error) => Err(eyre!(error)),
        Outcome::LoginRequired => Err(eyre!("login required; run `taxa login <username>`")),
    }
}

fn parse_set_id(raw: &str) -> Result<SetId> {
    SetId::parse(raw).map_err(|error| eyre!("invalid set id {raw}: {error}"))
}

fn parse_taxon_id(raw: &str) -> Result<TaxonId> {
    TaxonId::new(raw).map_err(|error| eyre!("invalid taxon id {raw}: {error}"))
}

async fn run_sets(hooks: &Hooks, command: SetsCommand) -> Result<()> {
    match command {
        SetsCommand::List => {
            print!("{}", render::sets(&hooks.sets.fetch().await?));
            Ok(())
        }
        SetsCommand::Show { id } => {
            let set = hooks.set.fetch(&parse_set_id(&id)?).await?;
            print!("{}", render::set_header(&set));
            if let Some(entries) = hooks.taxa.fetch(Some(set.taxon_ids.as_slice())).await? {
                print!("{}", render::details(&entries));
            }
            Ok(())
        }
        SetsCommand::Create { title, taxon_ids } => {
            let ids = TaxonIds::parse(&taxon_ids).map_err(|error| eyre!(error))?;
            let outcome = CreateSet::new(hooks.mutations.clone(), Route::Profile)
                .trigger(&title, ids)
                .await;
            settle(outcome, render::set_header)
        }
        SetsCommand::Add { id, taxon_id } => {
            let set = hooks.set.fetch(&parse_set_id(&id)?).await?;
            let taxon_id = parse_taxon_id(&taxon_id)?;
            DuplicateGuard::check(&set.taxon_ids, &taxon_id)?;
            let taxon = hooks
                .taxonomy
                .taxon(&taxon_id)
                .await
                .map_err(ClientError::from)?;
            let outcome = UpdateSetFromSearch::new(hooks.mutations.clone())
                .trigger(&taxon, &set)
                .await;
            settle(outcome, render::set_header)
        }
        SetsCommand::Remove { id, taxon_id } => {
            let set = hooks.set.fetch(&parse_set_id(&id)?).await?;
            let outcome = RemoveTaxon::new(hooks.mutations.clone())
                .trigger(&parse_taxon_id(&taxon_id)?, &set)
                .await;
            settle(outcome, render::set_header)
        }
        SetsCommand::Delete { id } => {
            let id = parse_set_id(&id)?;
            let outcome = DeleteSet::new(hooks.mutations.clone(), Route::Profile)
                .trigger(&id)
                .await;
            settle(outcome, |_| format!("deleted {id}\n"))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let hooks = Hooks::build(&cli.endpoints)?;
    match cli.command {
        Command::Search { term, page } => {
            match hooks.results.fetch(&term, page).await? {
                Some(page) => print!("{}", render::page(&page)),
                None => println!("enter a search term"),
            }
            Ok(())
        }
        Command::Taxa { ids } => {
            let ids = ids
                .iter()
                .map(|raw| parse_taxon_id(raw))
                .collect::<Result<Vec<_>>>()?;
            if let Some(entries) = hooks.taxa.fetch(Some(ids.as_slice())).await? {
                print!("{}", render::details(&entries));
            }
            Ok(())
        }
        Command::Suggest { query } => {
            print!("{}", render::suggestions(&hooks.suggestions.fetch(&query).await?));
            Ok(())
        }
        Command::Signup {
            username,
            password,
            confirm_password,
        } => {
            let outcome = hooks
                .account
                .sign_up(&username, &password, &confirm_password)
                .await;
            settle(outcome, |session| format!("signed up as {}\n", session.username))
        }
        Command::Login { username, password } => {
            let outcome = hooks.account.log_in(&username, &password).await;
            settle(outcome, |session| format!("signed in as {}\n", session.username))
        }
        Command::Logout => {
            hooks.account.log_out()?;
            println!("signed out");
            Ok(())
        }
        Command::Sets(command) => run_sets(&hooks, command).await,
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    // Logs go to stderr so command output stays pipeable.
    let _ = fmt()
        .with_env_filter(EnvFilter::from_env("TAXA_LOG"))
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to create Tokio runtime")?;
    runtime.block_on(run(cli))
}
