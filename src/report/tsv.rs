use std::io::Write;

use crate::pipeline::stage4_assemble::summarise;
use crate::report::{OutputError, OutputSink, TierUpRecord};

pub const FULL_COLUMNS: &[&str] = &[
    "justification",
    "consequences",
    "penetrance",
    "denovo_score",
    "score",
    "event_id",
    "interpretation_request_id",
    "tiering_created",
    "tier",
    "segregation",
    "inheritance",
    "group",
    "zygosity",
    "participant_id",
    "position",
    "chromosome",
    "assembly",
    "reference",
    "alternate",
    "re_panel_id",
    "re_panel_version",
    "re_panel_source",
    "re_panel_name",
    "re_gene",
    "tu_version",
    "pa_hash",
    "pa_name",
    "pa_version",
    "pa_id",
    "pa_created",
    "pa_hgnc_id",
    "pa_confidence",
    "tu_comment",
    "software_versions",
    "reference_db_versions",
    "updated_panels",
    "tu_run_time",
    "tier1_count",
    "tier2_count",
    "tier3_count",
];

pub const SUMMARY_COLUMNS: &[&str] = &[
    "interpretation_request_id",
    "participant_id",
    "chromosome",
    "position",
    "reference",
    "alternate",
    "zygosity",
    "tier",
    "re_gene",
    "re_panel_name",
    "pa_name",
    "pa_version",
    "pa_hgnc_id",
    "pa_confidence",
    "tu_run_time",
];

fn tsv_writer<W: Write>(inner: W, header: &[&str]) -> Result<csv::Writer<W>, OutputError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(inner);
    writer.write_record(header)?;
    Ok(writer)
}

/// Every tier 3 event, one row each.
pub struct FullReportWriter<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl<W: Write> FullReportWriter<W> {
    pub fn new(inner: W) -> Result<Self, OutputError> {
        Ok(Self {
            writer: tsv_writer(inner, FULL_COLUMNS)?,
            rows: 0,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
}

impl<W: Write> OutputSink for FullReportWriter<W> {
    fn write_record(&mut self, record: &TierUpRecord) -> Result<(), OutputError> {
        self.writer.serialize(record)?;
        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), OutputError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Only events whose gene now sits on the panel at a summary confidence level.
pub struct SummaryReportWriter<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl<W: Write> SummaryReportWriter<W> {
    pub fn new(inner: W) -> Result<Self, OutputError> {
        Ok(Self {
            writer: tsv_writer(inner, SUMMARY_COLUMNS)?,
            rows: 0,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
}

impl<W: Write> OutputSink for SummaryReportWriter<W> {
    fn write_record(&mut self, record: &TierUpRecord) -> Result<(), OutputError> {
        if let Some(summary) = summarise(record) {
            self.writer.serialize(summary)?;
            self.rows += 1;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), OutputError> {
        self.writer.flush()?;
        Ok(())
    }
}
