use crate::error::DataIntegrityError;
use crate::model::{ReportEventRecord, RequestDocument, Variant};

/// A tier 3 report event together with the variant it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct ReportEvent<'a> {
    pub variant: &'a Variant,
    pub record: &'a ReportEventRecord,
    pub gene: &'a str,
}

impl<'a> ReportEvent<'a> {
    pub fn new(
        variant: &'a Variant,
        record: &'a ReportEventRecord,
    ) -> Result<Self, DataIntegrityError> {
        let gene = single_gene(record)?;
        Ok(Self {
            variant,
            record,
            gene,
        })
    }

    pub fn panel_name(&self) -> &'a str {
        self.record.panel_name()
    }
}

/// Lazily walks variants in document order and yields their tier 3 events in order.
/// Calling [`extract`] again restarts the walk from the first variant.
#[derive(Debug, Clone)]
pub struct Tier3Events<'a> {
    variants: &'a [Variant],
    variant_idx: usize,
    event_idx: usize,
}

pub fn extract(document: &RequestDocument) -> Tier3Events<'_> {
    Tier3Events {
        variants: document.variants(),
        variant_idx: 0,
        event_idx: 0,
    }
}

impl<'a> Iterator for Tier3Events<'a> {
    type Item = Result<ReportEvent<'a>, DataIntegrityError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let variant = self.variants.get(self.variant_idx)?;
            let Some(record) = variant.report_events.get(self.event_idx) else {
                self.variant_idx += 1;
                self.event_idx = 0;
                continue;
            };
            self.event_idx += 1;
            if record.is_tier3() {
                return Some(ReportEvent::new(variant, record));
            }
        }
    }
}

/// The one gene symbol a report event is attributed to.
pub fn single_gene(record: &ReportEventRecord) -> Result<&str, DataIntegrityError> {
    let genes: Vec<_> = record
        .genomic_entities
        .iter()
        .filter(|e| e.is_gene())
        .collect();
    if genes.len() != 1 {
        return Err(DataIntegrityError::GeneEntityCount {
            event_id: record.report_event_id.clone(),
            found: genes.len(),
        });
    }
    genes[0]
        .gene_symbol
        .as_deref()
        .ok_or_else(|| DataIntegrityError::MissingGeneSymbol {
            event_id: record.report_event_id.clone(),
        })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_events.rs"]
mod tests;
