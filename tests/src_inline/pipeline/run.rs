use serde_json::json;

use super::*;
use crate::fixtures::{StubRegistry, document, ir_json, report_event, scenario_registry, variant};
use crate::pipeline::stage4_assemble::summarise;

fn meta() -> RunMetadata {
    RunMetadata {
        tool_version: "0.1.0".to_string(),
        run_time: "2024-06-01T12:00:00Z".to_string(),
    }
}

/// BRCA1 on declared P1 (confidence 3), MYH7 on undeclared P2 (alias of 999,
/// confidence 4), TP53 on P1 at confidence 2 and OMIT1 which P1 no longer carries.
fn scenario() -> RequestDocument {
    document(vec![
        variant(
            "1",
            100,
            vec![
                report_event("re1", Some("TIER3"), "BRCA1", "P1"),
                report_event("re2", Some("TIER1"), "BRCA1", "P1"),
            ],
        ),
        variant("2", 200, vec![report_event("re3", Some("TIER3"), "MYH7", "P2")]),
        variant(
            "3",
            300,
            vec![
                report_event("re4", Some("TIER3"), "TP53", "P1"),
                report_event("re5", Some("TIER3"), "OMIT1", "P1"),
                report_event("re6", Some("TIER2"), "OMIT1", "P1"),
            ],
        ),
    ])
}

#[test]
fn test_full_run() {
    let mut doc = scenario();
    let registry = scenario_registry();
    let run = run_tierup(&mut doc, &registry, &meta()).unwrap();

    assert_eq!(run.panels.declared, 1);
    assert_eq!(run.panels.reconcile.resolved.len(), 1);
    assert_eq!(run.records.len(), 4);
    assert_eq!(run.records.len(), doc.tier_count("TIER3"));

    let ids: Vec<&str> = run.records.iter().map(|r| r.event_id.as_str()).collect();
    assert_eq!(ids, vec!["re1", "re3", "re4", "re5"]);

    let brca1 = &run.records[0];
    assert_eq!(brca1.pa_name, "P1");
    assert_eq!(brca1.pa_confidence.as_deref(), Some("3"));

    let myh7 = &run.records[1];
    assert_eq!(myh7.re_panel_name, "P2");
    assert_eq!(myh7.pa_id, 999);
    assert_eq!(myh7.pa_name, "P2 renamed");
    assert_eq!(myh7.pa_confidence.as_deref(), Some("4"));

    let omitted = &run.records[3];
    assert_eq!(omitted.pa_name, "P1");
    assert_eq!(omitted.pa_confidence, None);
    assert_eq!(omitted.pa_hgnc_id, None);

    for record in &run.records {
        assert_eq!(record.updated_panels, "P2, 999");
        assert_eq!(
            (record.tier1_count, record.tier2_count, record.tier3_count),
            (1, 1, 4)
        );
    }
}

#[test]
fn test_summary_is_subset_of_full() {
    let mut doc = scenario();
    let run = run_tierup(&mut doc, &scenario_registry(), &meta()).unwrap();
    let summary: Vec<_> = run.records.iter().filter_map(summarise).collect();
    assert!(summary.len() <= run.records.len());
    let genes: Vec<&str> = summary.iter().map(|s| s.re_gene.as_str()).collect();
    assert_eq!(genes, vec!["BRCA1", "MYH7"]);
}

#[test]
fn test_ineligible_request_touches_no_registry() {
    let mut value = ir_json(Vec::new());
    value["status"] = json!([{"status": "waiting_payload"}]);
    let mut doc = RequestDocument::from_value(value).unwrap();
    let registry = scenario_registry();

    let err = run_tierup(&mut doc, &registry, &meta()).unwrap_err();
    assert!(matches!(err, TierUpError::Eligibility(_)));
    assert_eq!(registry.get_calls.get(), 0);
    assert_eq!(registry.list_calls.get(), 0);
}

#[test]
fn test_unresolved_panel_fails_whole_run() {
    let mut doc = document(vec![
        variant("1", 100, vec![report_event("re1", Some("TIER3"), "BRCA1", "P1")]),
        variant("2", 200, vec![report_event("re2", Some("TIER3"), "BRCA1", "P9")]),
    ]);
    let err = run_tierup(&mut doc, &scenario_registry(), &meta()).unwrap_err();
    match err {
        TierUpError::UnresolvedPanel(e) => assert_eq!(e.name, "P9"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_registry_outage_is_reported() {
    let mut doc = scenario();
    let registry = StubRegistry {
        offline: true,
        ..StubRegistry::default()
    };
    let err = run_tierup(&mut doc, &registry, &meta()).unwrap_err();
    assert!(matches!(err, TierUpError::RegistryUnavailable(_)));
    assert!(err.to_string().starts_with("panel registry unavailable"));
}

#[test]
fn test_no_tier3_events_gives_empty_records() {
    let mut doc = document(vec![variant(
        "1",
        100,
        vec![report_event("re1", Some("TIER1"), "BRCA1", "P1")],
    )]);
    let run = run_tierup(&mut doc, &scenario_registry(), &meta()).unwrap();
    assert!(run.records.is_empty());
}
