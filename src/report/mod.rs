pub mod complete;
pub mod tsv;

use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("report is missing column {0}")]
    MissingColumn(&'static str),
    #[error("invalid value {value:?} in column {column}")]
    InvalidValue { column: &'static str, value: String },
}

/// One row of the full report. Field order is column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierUpRecord {
    pub justification: Option<String>,
    pub consequences: String,
    pub penetrance: Option<String>,
    pub denovo_score: Option<f64>,
    pub score: Option<f64>,
    pub event_id: String,
    pub interpretation_request_id: String,
    pub tiering_created: Option<String>,
    pub tier: String,
    pub segregation: Option<String>,
    pub inheritance: Option<String>,
    pub group: Option<i64>,
    pub zygosity: Option<String>,
    pub participant_id: Option<String>,
    pub position: u64,
    pub chromosome: String,
    pub assembly: String,
    pub reference: String,
    pub alternate: String,
    pub re_panel_id: Option<String>,
    pub re_panel_version: Option<String>,
    pub re_panel_source: Option<String>,
    pub re_panel_name: String,
    pub re_gene: String,
    pub tu_version: String,
    pub pa_hash: Option<String>,
    pub pa_name: String,
    pub pa_version: String,
    pub pa_id: u64,
    pub pa_created: String,
    pub pa_hgnc_id: Option<String>,
    pub pa_confidence: Option<String>,
    pub tu_comment: String,
    pub software_versions: String,
    pub reference_db_versions: String,
    pub updated_panels: String,
    pub tu_run_time: String,
    pub tier1_count: usize,
    pub tier2_count: usize,
    pub tier3_count: usize,
}

/// Row of the summary report: events whose gene is now on the panel with high confidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierUpSummaryRecord {
    pub interpretation_request_id: String,
    pub participant_id: Option<String>,
    pub chromosome: String,
    pub position: u64,
    pub reference: String,
    pub alternate: String,
    pub zygosity: Option<String>,
    pub tier: String,
    pub re_gene: String,
    pub re_panel_name: String,
    pub pa_name: String,
    pub pa_version: String,
    pub pa_hgnc_id: Option<String>,
    pub pa_confidence: Option<String>,
    pub tu_run_time: String,
}

/// Destination for assembled records.
pub trait OutputSink {
    fn write_record(&mut self, record: &TierUpRecord) -> Result<(), OutputError>;

    fn finish(&mut self) -> Result<(), OutputError>;
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
