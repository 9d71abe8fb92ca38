//! Plain-text rendering of hook results.

use std::fmt::Write as _;

use taxon_sets::client::{Effect, Route};
use taxon_sets::domain::{DescendantsPage, SpeciesSet, Taxon, TaxonWithSummary};

fn taxon_line(taxon: &Taxon) -> String {
    match &taxon.preferred_common_name {
        Some(common) => format!("{}  {} ({})", taxon.id, common, taxon.name),
        None => format!("{}  {}", taxon.id, taxon.name),
    }
}

pub fn page(page: &DescendantsPage) -> String {
    let mut out = String::new();
    if page.taxa.is_empty() {
        out.push_str("no matching species\n");
        return out;
    }
    for taxon in &page.taxa {
        let _ = writeln!(out, "{}", taxon_line(taxon));
    }
    let _ = writeln!(out, "page {} ({} species in total)", page.page, page.total_results);
    if page.has_more() {
        let _ = writeln!(out, "more results on page {}", page.page + 1);
    }
    out
}

pub fn suggestions(taxa: &[Taxon]) -> String {
    if taxa.is_empty() {
        return "no species suggestions\n".to_owned();
    }
    taxa.iter().map(|taxon| taxon_line(taxon) + "\n").collect()
}

pub fn details(entries: &[TaxonWithSummary]) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(out, "{}", taxon_line(&entry.taxon));
        let _ = writeln!(out, "            rank: {}", entry.taxon.rank);
        match &entry.wiki_summary {
            Some(summary) => {
                let _ = writeln!(out, "            {}", summary.extract);
                let _ = writeln!(out, "            {}", summary.url);
            }
            None => out.push_str("            no summary available\n"),
        }
    }
    out
}

pub fn set_header(set: &SpeciesSet) -> String {
    format!("{}  {} ({} taxa)\n", set.id, set.title, set.taxon_ids.len())
}

pub fn sets(sets: &[SpeciesSet]) -> String {
    if sets.is_empty() {
        return "no sets yet\n".to_owned();
    }
    sets.iter().map(set_header).collect()
}

pub fn effect(effect: &Effect) -> Option<String> {
    match effect {
        Effect::Navigate(Route::Home) => Some("-> home".to_owned()),
        Effect::Navigate(Route::Profile) => Some("-> your sets".to_owned()),
        Effect::Navigate(Route::Login) => Some("-> login".to_owned()),
        Effect::Navigate(Route::Set(id)) => Some(format!("-> set {id}")),
        Effect::CloseModal | Effect::Stay => None,
    }
}
