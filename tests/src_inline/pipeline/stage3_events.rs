use serde_json::json;

use super::*;
use crate::fixtures::{document, report_event, variant};

fn mixed_document() -> RequestDocument {
    document(vec![
        variant(
            "1",
            100,
            vec![
                report_event("re1", Some("TIER1"), "BRCA1", "P1"),
                report_event("re2", Some("TIER3"), "BRCA1", "P1"),
            ],
        ),
        variant("2", 200, Vec::new()),
        variant(
            "3",
            300,
            vec![
                report_event("re3", Some("TIER3"), "MYH7", "P2"),
                report_event("re4", None, "MYH7", "P2"),
                report_event("re5", Some("TIER3"), "TTN", "P2"),
            ],
        ),
    ])
}

#[test]
fn test_extract_yields_tier3_in_document_order() {
    let doc = mixed_document();
    let ids: Vec<&str> = extract(&doc)
        .map(|e| e.unwrap().record.report_event_id.as_str())
        .collect();
    assert_eq!(ids, vec!["re2", "re3", "re5"]);
}

#[test]
fn test_event_carries_variant_and_gene() {
    let doc = mixed_document();
    let events: Vec<ReportEvent<'_>> = extract(&doc).map(|e| e.unwrap()).collect();
    assert_eq!(events[0].variant.variant_coordinates.position, 100);
    assert_eq!(events[0].gene, "BRCA1");
    assert_eq!(events[1].variant.variant_coordinates.chromosome, "3");
    assert_eq!(events[2].gene, "TTN");
    assert_eq!(events[2].panel_name(), "P2");
}

#[test]
fn test_extract_restarts() {
    let doc = mixed_document();
    assert_eq!(extract(&doc).count(), 3);
    assert_eq!(extract(&doc).count(), 3);
    assert_eq!(extract(&doc).count(), doc.tier_count(crate::model::document::TIER3));
}

#[test]
fn test_no_tier3_events() {
    let doc = document(vec![variant(
        "1",
        100,
        vec![report_event("re1", Some("TIER2"), "BRCA1", "P1")],
    )]);
    assert_eq!(extract(&doc).count(), 0);
}

#[test]
fn test_two_gene_entities_rejected() {
    let mut event = report_event("re1", Some("TIER3"), "BRCA1", "P1");
    event["genomicEntities"] = json!([
        {"type": "gene", "geneSymbol": "BRCA1"},
        {"type": "gene", "geneSymbol": "BRCA2"}
    ]);
    let doc = document(vec![variant("1", 100, vec![event])]);
    let err = extract(&doc).next().unwrap().unwrap_err();
    assert_eq!(
        err,
        DataIntegrityError::GeneEntityCount {
            event_id: "re1".to_string(),
            found: 2
        }
    );
}

#[test]
fn test_no_gene_entity_rejected() {
    let mut event = report_event("re1", Some("TIER3"), "BRCA1", "P1");
    event["genomicEntities"] = json!([{"type": "transcript", "geneSymbol": "ENST1"}]);
    let doc = document(vec![variant("1", 100, vec![event])]);
    let err = extract(&doc).next().unwrap().unwrap_err();
    assert!(matches!(err, DataIntegrityError::GeneEntityCount { found: 0, .. }));
}

#[test]
fn test_gene_without_symbol_rejected() {
    let mut event = report_event("re1", Some("TIER3"), "BRCA1", "P1");
    event["genomicEntities"] = json!([{"type": "gene"}]);
    let doc = document(vec![variant("1", 100, vec![event])]);
    let err = extract(&doc).next().unwrap().unwrap_err();
    assert!(matches!(err, DataIntegrityError::MissingGeneSymbol { .. }));
}

#[test]
fn test_malformed_non_tier3_event_is_ignored() {
    let mut event = report_event("re1", Some("TIER1"), "BRCA1", "P1");
    event["genomicEntities"] = json!([]);
    let doc = document(vec![variant("1", 100, vec![event])]);
    assert_eq!(extract(&doc).count(), 0);
}
