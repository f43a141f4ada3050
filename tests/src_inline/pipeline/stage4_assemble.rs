use super::*;
use crate::fixtures::{document, panel, report_event, variant};
use crate::panels::{PanelUpdate, match_gene};
use crate::pipeline::stage3_events::extract;

fn meta() -> RunMetadata {
    RunMetadata {
        tool_version: "0.1.0".to_string(),
        run_time: "2024-06-01T12:00:00Z".to_string(),
    }
}

fn sample() -> (RequestDocument, Panel) {
    let mut doc = document(vec![variant(
        "7",
        5_000,
        vec![
            report_event("re1", Some("TIER3"), "MYH7", "P2"),
            report_event("re2", Some("TIER1"), "MYH7", "P2"),
        ],
    )]);
    doc.updated_panels.push(PanelUpdate {
        name: "P2".to_string(),
        panel_id: 999,
    });
    let p = panel(999, "P2 renamed", "5.1", &[("MYH7", "HGNC:7577", "4")]);
    (doc, p)
}

#[test]
fn test_assemble_fills_every_field() {
    let (doc, p) = sample();
    let event = extract(&doc).next().unwrap().unwrap();
    let m = match_gene(event.gene, &p);
    let rec = assemble(&event, &m, &p, &doc, &meta());

    assert_eq!(rec.event_id, "re1");
    assert_eq!(rec.interpretation_request_id, "1234-2");
    assert_eq!(rec.tiering_created.as_deref(), Some("2019-01-01T00:00:00Z"));
    assert_eq!(rec.tier, "TIER3");
    assert_eq!(rec.consequences, "missense_variant;SO:0001630");
    assert_eq!(rec.score, Some(1.5));
    assert_eq!(rec.denovo_score, None);
    assert_eq!(rec.participant_id.as_deref(), Some("proband"));
    assert_eq!(rec.zygosity.as_deref(), Some("heterozygous"));
    assert_eq!(rec.chromosome, "7");
    assert_eq!(rec.position, 5_000);
    assert_eq!(rec.assembly, "GRCh38");
    assert_eq!(rec.re_panel_name, "P2");
    assert_eq!(rec.re_panel_id.as_deref(), Some("42"));
    assert_eq!(rec.re_gene, "MYH7");
    assert_eq!(rec.pa_name, "P2 renamed");
    assert_eq!(rec.pa_id, 999);
    assert_eq!(rec.pa_version, "5.1");
    assert_eq!(rec.pa_hash.as_deref(), Some("hash999"));
    assert_eq!(rec.pa_hgnc_id.as_deref(), Some("HGNC:7577"));
    assert_eq!(rec.pa_confidence.as_deref(), Some("4"));
    assert_eq!(rec.tu_version, "0.1.0");
    assert_eq!(rec.tu_comment, "");
    assert_eq!(rec.software_versions, "tiering=1.2");
    assert_eq!(rec.reference_db_versions, "genomeAssembly=GRCh38");
    assert_eq!(rec.updated_panels, "P2, 999");
    assert_eq!(rec.tu_run_time, "2024-06-01T12:00:00Z");
    assert_eq!(
        (rec.tier1_count, rec.tier2_count, rec.tier3_count),
        (1, 0, 1)
    );
}

#[test]
fn test_absent_gene_gives_null_match_fields() {
    let (doc, _) = sample();
    let p = panel(999, "P2 renamed", "5.1", &[("TTN", "HGNC:12403", "3")]);
    let event = extract(&doc).next().unwrap().unwrap();
    let rec = assemble(&event, &match_gene(event.gene, &p), &p, &doc, &meta());
    assert_eq!(rec.pa_hgnc_id, None);
    assert_eq!(rec.pa_confidence, None);
    assert_eq!(rec.pa_name, "P2 renamed");
    assert!(summarise(&rec).is_none());
}

#[test]
fn test_summary_requires_high_confidence() {
    let (doc, _) = sample();
    let event = extract(&doc).next().unwrap().unwrap();
    for (confidence, kept) in [("1", false), ("2", false), ("3", true), ("4", true)] {
        let p = panel(999, "P2 renamed", "5.1", &[("MYH7", "HGNC:7577", confidence)]);
        let rec = assemble(&event, &match_gene(event.gene, &p), &p, &doc, &meta());
        assert_eq!(summarise(&rec).is_some(), kept, "confidence {confidence}");
    }
}

#[test]
fn test_summary_projection() {
    let (doc, p) = sample();
    let event = extract(&doc).next().unwrap().unwrap();
    let rec = assemble(&event, &match_gene(event.gene, &p), &p, &doc, &meta());
    let summary = summarise(&rec).unwrap();
    assert_eq!(summary.interpretation_request_id, rec.interpretation_request_id);
    assert_eq!(summary.participant_id, rec.participant_id);
    assert_eq!(summary.position, rec.position);
    assert_eq!(summary.re_gene, "MYH7");
    assert_eq!(summary.pa_confidence.as_deref(), Some("4"));
}

#[test]
fn test_run_metadata_now_is_rfc3339() {
    let m = RunMetadata::now("9.9.9");
    assert_eq!(m.tool_version, "9.9.9");
    assert!(chrono::DateTime::parse_from_rfc3339(&m.run_time).is_ok());
    assert!(m.run_time.ends_with('Z'));
}
