pub mod stage2_panels;
pub mod stage3_events;
pub mod stage4_assemble;
pub mod stage5_report;

use crate::error::TierUpError;
use crate::model::RequestDocument;
use crate::model::validate::validate;
use crate::panels::{PanelRegistry, match_gene, resolve_panel};
use crate::pipeline::stage2_panels::{Stage2Output, run_stage2};
use crate::pipeline::stage3_events::extract;
use crate::pipeline::stage4_assemble::{RunMetadata, assemble};
use crate::report::TierUpRecord;

#[derive(Debug, Clone)]
pub struct TierUpRun {
    pub panels: Stage2Output,
    pub records: Vec<TierUpRecord>,
}

/// Validates, reconciles panels and assembles one record per tier 3 event.
///
/// Records are only returned once every event succeeded, so callers never write a
/// partial report.
pub fn run_tierup(
    document: &mut RequestDocument,
    registry: &dyn PanelRegistry,
    meta: &RunMetadata,
) -> Result<TierUpRun, TierUpError> {
    validate(document)?;
    tracing::info!(irid = %document.irid(), "interpretation request is eligible");

    let panels = run_stage2(document, registry)?;
    let records = assemble_records(document, meta)?;
    tracing::info!(
        records = records.len(),
        tiers = ?document.tier_counts(),
        "tier 3 events assembled"
    );

    Ok(TierUpRun { panels, records })
}

/// Extraction, matching and assembly over an already reconciled document.
pub fn assemble_records(
    document: &RequestDocument,
    meta: &RunMetadata,
) -> Result<Vec<TierUpRecord>, TierUpError> {
    let mut records = Vec::new();
    for event in extract(document) {
        let event = event?;
        let panel = resolve_panel(document, event.panel_name())?;
        let gene_match = match_gene(event.gene, panel);
        if !gene_match.is_on_panel() {
            tracing::debug!(
                event = %event.record.report_event_id,
                gene = event.gene,
                panel = %panel,
                "gene no longer on panel"
            );
        }
        records.push(assemble(&event, &gene_match, panel, document, meta));
    }
    Ok(records)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/run.rs"]
mod tests;
