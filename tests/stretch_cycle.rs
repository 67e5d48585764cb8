use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use fragment_merger::{merge, RESPONSIVE_STRETCH_KEY};
use geometry_perceiver::GeometryEngine;
use serde_json::{json, Value};
use slot_locator::ElementLocator;
use stretch_core_types::PotentialLevel;
use stretch_rtd::{
    default_config, load_config, AugmentationConfig, AugmentationTree, BidRequestData,
    Orchestrator, ResponsiveStretchModule, SlotDescriptor, StaticPage, StretchMeasurement,
};

fn article_page() -> Arc<StaticPage> {
    let raw = include_str!("fixtures/article_page.json");
    Arc::new(StaticPage::from_json(raw).expect("valid fixture"))
}

fn module() -> ResponsiveStretchModule {
    let page = article_page();
    ResponsiveStretchModule::new(page.clone(), page)
}

fn request() -> BidRequestData {
    serde_json::from_str(include_str!("fixtures/bid_request.json")).expect("valid request")
}

fn stretch_at<'a>(root: &'a Value, prefix: &[&str]) -> &'a Value {
    let node = prefix.iter().fold(root, |node, key| &node[*key]);
    &node[RESPONSIVE_STRETCH_KEY]
}

#[test]
fn reference_slot_measures_as_documented() {
    let page = article_page();
    let locator = ElementLocator::new(page.clone());
    let engine = GeometryEngine::new(page);

    let element = locator.locate("top-banner");
    assert!(element.is_some());
    let m = engine.measure(element).expect("measurement");

    assert_eq!((m.width, m.height, m.top, m.left), (300, 250, 100, 50));
    assert_eq!(m.stretch_left, 50);
    assert_eq!(m.stretch_right, 1570);
    assert_eq!(m.stretch_up, 100);
    assert_eq!(m.stretch_down, 730);
    assert_eq!(m.total_available_width, 1920);
    assert_eq!(m.total_available_height, 1080);
    assert_eq!(m.viewport_width_percentage, 16);
    assert_eq!(m.viewport_height_percentage, 23);
    assert!(m.is_visible);
    assert_eq!(m.parent_width, Some(1200));
    assert_eq!(m.max_available_width, Some(1200));
    assert_eq!(m.free_room(), (1620, 830));
    assert_eq!(m.stretch_potential.horizontal, PotentialLevel::High);
}

#[test]
fn absent_slot_has_no_measurement() {
    let page = article_page();
    let locator = ElementLocator::new(page.clone());
    let engine = GeometryEngine::new(page);

    let element = locator.locate("missing-unit");
    assert_eq!(element, None);
    assert_eq!(engine.measure(element), None);
}

#[test]
fn positioned_ancestor_does_not_narrow_available_width() {
    let page = article_page();
    let orchestrator = Orchestrator::new(page.clone(), page, Default::default());
    let result = orchestrator.measure_slots(&[SlotDescriptor::new("sidebar")]);
    let sidebar = &result.measurements["sidebar"];

    assert_eq!(sidebar.parent_width, Some(200));
    assert_eq!(sidebar.max_available_width, Some(1200));
    assert_eq!(sidebar.stretch_right, 20);
}

#[test]
fn merging_twice_equals_merging_once() {
    let page = article_page();
    let orchestrator = Orchestrator::new(page.clone(), page, Default::default());
    let measured = orchestrator
        .measure_slots(&[SlotDescriptor::new("top-banner"), SlotDescriptor::new("sidebar")])
        .measurements;
    let config = AugmentationConfig::default().with_bidders(["bidderA"]);

    let mut once = AugmentationTree::new();
    merge_at(&mut once, &measured, &config, 1_000);
    let mut twice = once.clone();
    merge_at(&mut twice, &measured, &config, 1_000);

    assert_eq!(once, twice);
}

fn merge_at(
    tree: &mut AugmentationTree,
    measurements: &BTreeMap<String, StretchMeasurement>,
    config: &AugmentationConfig,
    millis: i64,
) {
    let captured_at = Utc.timestamp_millis_opt(millis).unwrap();
    merge(tree, measurements, config, captured_at).expect("merge");
}

#[tokio::test]
async fn global_and_impression_scopes_without_bidders() {
    let mut request = request();
    let calls = AtomicUsize::new(0);
    let report = module()
        .get_bid_request_data(&mut request, &default_config(), || {
            calls.fetch_add(1, Ordering::SeqCst);
        })
        .await
        .expect("cycle");

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(report.measured, vec!["top-banner", "sidebar"]);
    assert_eq!(report.missing, vec!["missing-unit"]);

    let global = &request.fragments.global;
    assert_eq!(global["site"]["page"], json!("https://example.com/article"));
    let stretch = stretch_at(global, &["site", "ext", "data"]);
    assert_eq!(stretch["viewport"], json!({"width": 1920, "height": 1080}));
    assert_eq!(stretch["adUnits"]["top-banner"]["stretchRight"], json!(1570));
    assert_eq!(stretch["adUnits"]["sidebar"]["maxAvailableWidth"], json!(1200));
    assert!(stretch["adUnits"].get("missing-unit").is_none());
    assert!(stretch["timestamp"].as_i64().is_some());

    let top = &request.fragments.imp["top-banner"];
    assert_eq!(top["ext"]["gpid"], json!("/1234/top"));
    assert_eq!(
        stretch_at(top, &["ext", "data"])["viewportWidthPercentage"],
        json!(16)
    );
    assert!(request.fragments.imp.get("missing-unit").is_none());
    assert!(request.fragments.bidder.is_empty());
}

#[tokio::test]
async fn bidder_only_config_leaves_global_untouched() {
    let mut request = request();
    let before = request.fragments.global.clone();
    let mut config = default_config();
    config.params = AugmentationConfig::default()
        .with_bidders(["bidderA", "bidderB"])
        .with_global_scope(false)
        .with_impression_scope(false);

    module()
        .get_bid_request_data(&mut request, &config, || {})
        .await
        .expect("cycle");

    assert_eq!(request.fragments.global, before);
    for bidder in ["bidderA", "bidderB"] {
        let fragment = &request.fragments.bidder[bidder];
        let stretch = stretch_at(fragment, &["site", "ext", "data"]);
        assert_eq!(stretch["adUnits"]["sidebar"]["stretchDown"], json!(80));
    }
    assert!(stretch_at(&request.fragments.imp["top-banner"], &["ext", "data"]).is_null());
}

#[tokio::test]
async fn yaml_config_drives_the_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stretch.yaml");
    std::fs::write(
        &path,
        "deferMeasurement: true\nparams:\n  includeGlobalScope: false\n  includeImpressionScope: true\n",
    )
    .unwrap();
    let config = load_config(Some(&path)).expect("config");
    assert!(config.defer_measurement);

    let mut request = request();
    let before = request.fragments.global.clone();
    let report = module()
        .get_bid_request_data(&mut request, &config, || {})
        .await
        .expect("cycle");

    assert_eq!(report.measured.len(), 2);
    assert_eq!(request.fragments.global, before);
    assert!(!stretch_at(&request.fragments.imp["sidebar"], &["ext", "data"]).is_null());
}
