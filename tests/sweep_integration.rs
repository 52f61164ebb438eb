//! Full sweep over the standard catalog
//!
//! Assembly -> request building -> worker-thread run against a recording
//! backend, checking the request stream the service would see.

use std::collections::HashSet;
use std::sync::Arc;

use attr_search_harness::scenario::loop_count;
use attr_search_harness::search_types::ResultType;
use attr_search_harness::{
    catalog, HarnessConfig, RecordingBackend, ScenarioAssembler, SearchRequest, SweepRunner,
    TriState,
};

#[test]
fn test_catalog_sweep_size() {
    let groups = catalog::search_groups();
    let scenarios = ScenarioAssembler::default().assemble(&groups).unwrap();

    let modes = ScenarioAssembler::feature_modes().len();
    let loops = loop_count(243, groups.len() * modes, 2).unwrap();
    assert_eq!(scenarios.len(), groups.len() * loops * modes);
}

#[test]
fn test_every_boolean_variant_is_exercised() {
    let scenarios = ScenarioAssembler::default()
        .assemble(&catalog::search_groups())
        .unwrap();

    let seen: HashSet<[TriState; 5]> = scenarios
        .iter()
        .map(|s| {
            let o = &s.options;
            [
                o.with_raw,
                o.force_minimal,
                o.with_relationships,
                o.with_feature_stats,
                o.with_internal_features,
            ]
        })
        .collect();
    assert_eq!(seen.len(), 243);
}

#[test]
fn test_every_subset_is_exercised_per_group() {
    let groups = catalog::search_groups();
    let scenarios = ScenarioAssembler::default().assemble(&groups).unwrap();

    for group in &groups {
        let subsets: HashSet<Vec<ResultType>> = scenarios
            .iter()
            .filter(|s| Arc::ptr_eq(&s.criteria, &group.criteria))
            .map(|s| s.options.include_only.clone())
            .collect();
        let expected = attr_search_harness::scenario::result_type_subsets(&group.expected, true);
        assert_eq!(subsets.len(), expected.len(), "group {}", group.criteria);
    }
}

#[test]
fn test_filtering_disabled_expects_totals() {
    let groups = catalog::search_groups();
    let scenarios = ScenarioAssembler::new(false, 5, 1).assemble(&groups).unwrap();

    for scenario in &scenarios {
        let group = groups
            .iter()
            .find(|g| Arc::ptr_eq(&g.criteria, &scenario.criteria))
            .unwrap();
        assert_eq!(scenario.expected_count, group.expected.total());
    }
}

#[test]
fn test_worker_sweep_records_wire_requests() {
    let config = HarnessConfig::default();
    let scenarios = Arc::new(
        config
            .assembler()
            .assemble(&catalog::search_groups())
            .unwrap(),
    );
    let total = scenarios.len();

    let (summary, backend) = SweepRunner::new(&config)
        .run_on_worker(Arc::clone(&scenarios), RecordingBackend::new())
        .unwrap();

    assert_eq!(summary.total_scenarios, total);
    assert_eq!(summary.unverified, total);
    assert!(summary.all_passed());

    let requests: &[SearchRequest] = backend.requests();
    assert_eq!(requests.len(), total);

    // first request: first catalog group, empty subset, every option unset
    assert_eq!(
        requests[0].uri().as_str(),
        "http://localhost:2080/entities?attrs=%7B%22PHONE_NUMBER%22%3A%22702-555-1212%22%7D"
    );

    // unset options never reach the wire, set ones always do
    for (request, scenario) in requests.iter().zip(scenarios.iter()) {
        let query = request.uri().query().unwrap_or_default();
        let o = &scenario.options;
        assert!(query.starts_with("attrs="));
        assert_eq!(query.matches("includeOnly=").count(), o.include_only.len());
        assert_eq!(query.contains("featureMode="), o.feature_mode.is_some());
        for (name, flag) in [
            ("withFeatureStats=", o.with_feature_stats),
            ("withInternalFeatures=", o.with_internal_features),
            ("forceMinimal=", o.force_minimal),
            ("withRelationships=", o.with_relationships),
            ("withRaw=", o.with_raw),
        ] {
            assert_eq!(query.contains(name), flag.is_set(), "{} in {}", name, query);
        }
    }
}

#[test]
fn test_sweep_counts_against_fake_engine() {
    let config = HarnessConfig::default();
    let groups = catalog::search_groups();
    let scenarios = config.assembler().assemble(&groups).unwrap();

    // a perfectly filtering engine: sum of counts for the requested types
    let expected_by_attrs: Vec<(String, attr_search_harness::ExpectedCounts)> = groups
        .iter()
        .map(|g| (g.criteria.to_attrs_text(), g.expected.clone()))
        .collect();
    let backend = RecordingBackend::with_responder(move |request| {
        let (_, counts) = expected_by_attrs
            .iter()
            .find(|(attrs, _)| *attrs == request.attrs)
            .expect("unknown criteria");
        let types = &request.effective.include_only;
        let count: u32 = if types.is_empty() {
            counts.total()
        } else {
            counts
                .iter()
                .filter(|(t, _)| types.contains(t))
                .map(|(_, c)| c)
                .sum()
        };
        Ok(Some(count as usize))
    });

    let (summary, _) = SweepRunner::new(&config)
        .run_on_worker(Arc::new(scenarios), backend)
        .unwrap();
    assert_eq!(summary.passed, summary.total_scenarios);
    assert_eq!(summary.count_mismatches, 0);
}
