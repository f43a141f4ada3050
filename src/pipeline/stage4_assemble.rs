use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};

use crate::model::RequestDocument;
use crate::model::document::{TIER1, TIER2, TIER3};
use crate::panels::{GeneMatch, Panel};
use crate::pipeline::stage3_events::ReportEvent;
use crate::report::{TierUpRecord, TierUpSummaryRecord};

/// Confidence levels that put an event in the summary report.
pub const SUMMARY_CONFIDENCE: &[&str] = &["3", "4"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunMetadata {
    pub tool_version: String,
    pub run_time: String,
}

impl RunMetadata {
    pub fn now(tool_version: impl Into<String>) -> Self {
        Self {
            tool_version: tool_version.into(),
            run_time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

pub fn assemble(
    event: &ReportEvent<'_>,
    gene_match: &GeneMatch,
    panel: &Panel,
    document: &RequestDocument,
    meta: &RunMetadata,
) -> TierUpRecord {
    let record = event.record;
    let coords = &event.variant.variant_coordinates;
    let call = event.variant.call_for(document.proband_id.as_deref());
    let genome = &document.tiering;

    TierUpRecord {
        justification: record.event_justification.clone(),
        consequences: render_consequences(record),
        penetrance: record.penetrance.clone(),
        denovo_score: record.de_novo_quality_score,
        score: record.score,
        event_id: record.report_event_id.clone(),
        interpretation_request_id: document.irid(),
        tiering_created: genome.created_at.clone(),
        tier: record.tier_label().to_string(),
        segregation: record.segregation_pattern.clone(),
        inheritance: record.mode_of_inheritance.clone(),
        group: record.group_of_variants,
        zygosity: call.map(|c| c.zygosity.clone()),
        participant_id: call.map(|c| c.participant_id.clone()),
        position: coords.position,
        chromosome: coords.chromosome.clone(),
        assembly: coords.assembly.clone(),
        reference: coords.reference.clone(),
        alternate: coords.alternate.clone(),
        re_panel_id: record.gene_panel.panel_identifier.clone(),
        re_panel_version: record.gene_panel.panel_version.clone(),
        re_panel_source: record.gene_panel.source.clone(),
        re_panel_name: record.gene_panel.panel_name.clone(),
        re_gene: event.gene.to_string(),
        tu_version: meta.tool_version.clone(),
        pa_hash: panel.hash.clone(),
        pa_name: panel.name.clone(),
        pa_version: panel.version.clone(),
        pa_id: panel.id,
        pa_created: panel.created.clone(),
        pa_hgnc_id: gene_match.hgnc_id.clone(),
        pa_confidence: gene_match.confidence.clone(),
        tu_comment: String::new(),
        software_versions: genome
            .data
            .as_ref()
            .map(|d| render_versions(&d.software_versions))
            .unwrap_or_default(),
        reference_db_versions: genome
            .data
            .as_ref()
            .map(|d| render_versions(&d.reference_databases_versions))
            .unwrap_or_default(),
        updated_panels: document
            .updated_panels
            .iter()
            .map(|u| u.to_string())
            .collect::<Vec<_>>()
            .join("; "),
        tu_run_time: meta.run_time.clone(),
        tier1_count: document.tier_count(TIER1),
        tier2_count: document.tier_count(TIER2),
        tier3_count: document.tier_count(TIER3),
    }
}

/// Projection for the summary report, or `None` if the gene is not on the panel at a
/// summary confidence level.
pub fn summarise(record: &TierUpRecord) -> Option<TierUpSummaryRecord> {
    let confidence = record.pa_confidence.as_deref()?;
    if !SUMMARY_CONFIDENCE.contains(&confidence) {
        return None;
    }
    Some(TierUpSummaryRecord {
        interpretation_request_id: record.interpretation_request_id.clone(),
        participant_id: record.participant_id.clone(),
        chromosome: record.chromosome.clone(),
        position: record.position,
        reference: record.reference.clone(),
        alternate: record.alternate.clone(),
        zygosity: record.zygosity.clone(),
        tier: record.tier.clone(),
        re_gene: record.re_gene.clone(),
        re_panel_name: record.re_panel_name.clone(),
        pa_name: record.pa_name.clone(),
        pa_version: record.pa_version.clone(),
        pa_hgnc_id: record.pa_hgnc_id.clone(),
        pa_confidence: record.pa_confidence.clone(),
        tu_run_time: record.tu_run_time.clone(),
    })
}

fn render_consequences(record: &crate::model::ReportEventRecord) -> String {
    record
        .variant_consequences
        .iter()
        .map(|c| c.name.as_deref().unwrap_or(c.id.as_str()))
        .collect::<Vec<_>>()
        .join(";")
}

fn render_versions(versions: &BTreeMap<String, String>) -> String {
    versions
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_assemble.rs"]
mod tests;
