//! End-to-end reconciliation scenarios
//!
//! These tests drive the library the way the `resolve` command does: parse
//! two catalog dumps, reconcile them and inspect the report.

use brew_linker::catalog::frequency::FrequencyModel;
use brew_linker::matching::cache::{MemoryCache, ResolutionCache};
use brew_linker::matching::reconcile::{ReconcileOptions, ReconcileReport};
use brew_linker::matching::scoring::{ScoreReason, SimilarityScorer};
use brew_linker::parsing::dump::parse_dump_text;
use brew_linker::{normalize, normalize_brewery, Catalog, MatchType, MatchingConfig, NameKind, RecordId, Reconciler};

const OLD_DUMP: &str = "\
id,name,brewery_id,brewery
10,Dortmunder Gold,1,Great Lakes Brewing
11,Great Lakes Big Black Smoke,1,Great Lakes Brewing
12,Bourbon Barrel Stout,2,Founders Brewing
13,Oatmeal Stout,2,Founders Brewing
14,Barrel Aged Porter,2,Founders Brewing
20,Mirage Ale,3,Zzyzx Nonexistent Brewing
";

const NEW_DUMP: &str = "\
id,name,brewery_id,brewery
a1,Dortmunder Gold,a,Great Lakes Brewing Co
a2,Big Black Smoke,a,Great Lakes Brewing Co
b1,Bourbon Barrel Stout Reserve,b,Founders Brewing Company
b2,Oatmeal Stout,b,Founders Brewing Company
b3,Barrel Aged Porter,b,Founders Brewing Company
";

fn catalogs() -> (Catalog, Catalog) {
    (
        parse_dump_text(OLD_DUMP).unwrap(),
        parse_dump_text(NEW_DUMP).unwrap(),
    )
}

fn reconcile(old: &Catalog, new: &Catalog) -> ReconcileReport {
    Reconciler::new(old, new, MatchingConfig::default(), ReconcileOptions::default())
        .run(&mut MemoryCache::new())
}

/// (old beer id, match type, new beer id) for every beer in the report
fn beer_matches(report: &ReconcileReport) -> Vec<(String, MatchType, Option<String>)> {
    report
        .breweries
        .iter()
        .flat_map(|b| b.beers.iter())
        .map(|b| {
            (
                b.old_beer.id.to_string(),
                b.outcome.match_type(),
                b.outcome.record().map(|r| r.id.to_string()),
            )
        })
        .collect()
}

#[test]
fn test_exact_duplicate() {
    let (old, new) = catalogs();
    let report = reconcile(&old, &new);

    let great_lakes = &report.breweries[0];
    assert_eq!(great_lakes.outcome.match_type(), MatchType::Exact);
    assert_eq!(great_lakes.outcome.record().unwrap().id, RecordId::new("a"));

    let dortmunder = &great_lakes.beers[0];
    assert_eq!(dortmunder.outcome.match_type(), MatchType::Exact);
    assert_eq!(dortmunder.outcome.record().unwrap().id, RecordId::new("a1"));
}

#[test]
fn test_prefix_duplicated_beer_name() {
    let (old, new) = catalogs();
    let report = reconcile(&old, &new);

    let smoke = &report.breweries[0].beers[1];
    assert_eq!(smoke.old_beer.normalized, "big black smoke");
    assert_eq!(smoke.outcome.record().unwrap().id, RecordId::new("a2"));
    assert!(smoke.outcome.is_perfect());
}

#[test]
fn test_no_plausible_match() {
    let (old, new) = catalogs();
    let report = reconcile(&old, &new);

    let zzyzx = &report.breweries[2];
    assert_eq!(zzyzx.old_brewery.name, "Zzyzx Nonexistent Brewing");
    assert_eq!(zzyzx.outcome.match_type(), MatchType::NoMatch);
    assert_eq!(zzyzx.beers[0].outcome.match_type(), MatchType::NoMatch);
}

#[test]
fn test_rare_shared_word_short_circuit() {
    let (old, new) = catalogs();
    let model = FrequencyModel::build(&old, &new);
    let scorer = SimilarityScorer::new(&model);

    let detail = scorer.score_detail(
        "bourbon barrel stout",
        "bourbon barrel stout reserve",
        NameKind::Beer,
    );
    assert_eq!(detail.total, f64::INFINITY);
    assert_eq!(detail.reason, ScoreReason::UniqueSharedWord("bourbon".to_string()));

    let report = reconcile(&old, &new);
    let bourbon = &report.breweries[1].beers[0];
    assert_eq!(bourbon.outcome.record().unwrap().id, RecordId::new("b1"));
}

#[test]
fn test_full_report() {
    let (old, new) = catalogs();
    let report = reconcile(&old, &new);

    assert_eq!(
        beer_matches(&report),
        vec![
            ("10".to_string(), MatchType::Exact, Some("a1".to_string())),
            ("11".to_string(), MatchType::Exact, Some("a2".to_string())),
            ("12".to_string(), MatchType::Exact, Some("b1".to_string())),
            ("13".to_string(), MatchType::Exact, Some("b2".to_string())),
            ("14".to_string(), MatchType::Exact, Some("b3".to_string())),
            ("20".to_string(), MatchType::NoMatch, None),
        ]
    );

    let summary = &report.summary;
    assert_eq!(summary.old_breweries, 3);
    assert_eq!(summary.old_beers, 6);
    assert_eq!(summary.brewery_matches, 2);
    assert_eq!(summary.beer_matches, 5);
    assert_eq!(summary.perfect_matches, 5);
    assert_eq!(summary.cache_hits, 0);
}

#[test]
fn test_second_run_replays_cache() {
    let (old, new) = catalogs();
    let reconciler =
        Reconciler::new(&old, &new, MatchingConfig::default(), ReconcileOptions::default());

    let mut cache = MemoryCache::new();
    let first = reconciler.run(&mut cache);
    assert_eq!(cache.len(), 5);
    assert_eq!(cache.get(&RecordId::new("12")), Some(RecordId::new("b1")));

    let second = reconciler.run(&mut cache);
    assert_eq!(second.summary.cache_hits, 5);
    assert_eq!(beer_matches(&first), beer_matches(&second));
}

#[test]
fn test_reconciliation_is_deterministic() {
    let (old, new) = catalogs();
    let first = reconcile(&old, &new);
    let second = reconcile(&old, &new);

    assert_eq!(first.breweries, second.breweries);
    assert_eq!(first.summary, second.summary);
}

#[test]
fn test_json_catalogs_reconcile_like_dumps() {
    let (old, new) = catalogs();
    let old_json = Catalog::from_json(&old.to_json().unwrap()).unwrap();
    let new_json = Catalog::from_json(&new.to_json().unwrap()).unwrap();

    assert_eq!(
        beer_matches(&reconcile(&old, &new)),
        beer_matches(&reconcile(&old_json, &new_json))
    );
}

#[test]
fn test_similarity_properties_over_catalog() {
    let (old, new) = catalogs();
    let model = FrequencyModel::build(&old, &new);
    let scorer = SimilarityScorer::new(&model);

    let names: Vec<&str> = old.beer_names().chain(new.beer_names()).collect();
    for a in &names {
        assert_eq!(scorer.similarity(a, a, NameKind::Beer), f64::INFINITY);
        for b in &names {
            assert_eq!(
                scorer.similarity(a, b, NameKind::Beer),
                scorer.similarity(b, a, NameKind::Beer),
                "similarity of {a:?} and {b:?} is not symmetric"
            );
        }
    }
}

#[test]
fn test_normalization_is_idempotent_over_catalog() {
    let (old, new) = catalogs();
    for brewery in old.breweries.iter().chain(&new.breweries) {
        assert_eq!(normalize_brewery(&brewery.name), brewery.name);
        for beer in &brewery.beers {
            let once = normalize(&beer.raw_name);
            assert_eq!(normalize(&once), once);
        }
    }
}
