use std::path::Path;

use crate::report::OutputError;

const TIER3_COUNT: &str = "tier3_count";

/// A full report is complete when it holds one row per tier 3 event, i.e. the
/// `tier3_count` of its first row equals the number of rows. A header-only report
/// (no tier 3 events) is complete.
pub fn is_complete(path: &Path) -> Result<bool, OutputError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_path(path)?;
    let idx = reader
        .headers()?
        .iter()
        .position(|h| h == TIER3_COUNT)
        .ok_or(OutputError::MissingColumn(TIER3_COUNT))?;

    let mut expected: Option<usize> = None;
    let mut rows = 0usize;
    for record in reader.records() {
        let record = record?;
        if expected.is_none() {
            let value = record.get(idx).unwrap_or_default();
            expected = Some(value.parse().map_err(|_| OutputError::InvalidValue {
                column: TIER3_COUNT,
                value: value.to_string(),
            })?);
        }
        rows += 1;
    }

    Ok(expected.is_none_or(|n| n == rows))
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/complete.rs"]
mod tests;
