//! Checked-in scrape profiles.

use std::path::PathBuf;

use classifieds::models::{Accessor, PostProcessor, ScrapeProfile};

fn profile_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("profiles")
        .join(name)
}

#[test]
fn craigslist_profile_matches_builtin() {
    let profile = ScrapeProfile::load(profile_path("craigslist.toml")).unwrap();
    assert!(profile.validate().is_ok());
    assert_eq!(profile, ScrapeProfile::default());
}

#[test]
fn craigslist_profile_rule_order() {
    let profile = ScrapeProfile::load(profile_path("craigslist.toml")).unwrap();
    let fields: Vec<_> = profile.rules.iter().map(|r| r.field.as_str()).collect();
    assert_eq!(fields, vec!["title", "url", "price", "neighborhood", "date"]);

    assert_eq!(profile.rules[1].accessor, Accessor::LinkTarget);
    assert_eq!(profile.rules[2].post_processor, Some(PostProcessor::Number));
    assert_eq!(profile.rules[4].post_processor, Some(PostProcessor::Date));
}

#[test]
fn missing_profile_is_an_error() {
    assert!(ScrapeProfile::load(profile_path("does-not-exist.toml")).is_err());
}
