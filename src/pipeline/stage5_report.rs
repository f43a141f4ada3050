use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::report::tsv::{FullReportWriter, SummaryReportWriter};
use crate::report::{OutputError, OutputSink, TierUpRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub full: PathBuf,
    pub summary: PathBuf,
}

pub fn report_paths(out_dir: &Path, irid: &str) -> ReportPaths {
    ReportPaths {
        full: out_dir.join(format!("{irid}.tierup.csv")),
        summary: out_dir.join(format!("{irid}.tierup.summary.csv")),
    }
}

/// Writes both reports under `out_dir`. Rows go to `*.tmp` staging files which are
/// renamed into place only once both are complete, so an IO failure never leaves a
/// truncated report behind.
pub fn write_reports(
    records: &[TierUpRecord],
    out_dir: &Path,
    irid: &str,
) -> Result<ReportPaths, OutputError> {
    fs::create_dir_all(out_dir)?;
    let paths = report_paths(out_dir, irid);
    let staged = ReportPaths {
        full: staging_path(&paths.full),
        summary: staging_path(&paths.summary),
    };

    let (rows, summary_rows) = match write_staged(records, &staged) {
        Ok(counts) => counts,
        Err(err) => {
            discard(&staged);
            return Err(err);
        }
    };
    if let Err(err) = fs::rename(&staged.full, &paths.full)
        .and_then(|_| fs::rename(&staged.summary, &paths.summary))
    {
        discard(&staged);
        return Err(err.into());
    }

    tracing::info!(
        full = %paths.full.display(),
        rows,
        summary = %paths.summary.display(),
        summary_rows,
        "reports written"
    );
    Ok(paths)
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_staged(
    records: &[TierUpRecord],
    staged: &ReportPaths,
) -> Result<(usize, usize), OutputError> {
    let mut full = FullReportWriter::new(BufWriter::new(File::create(&staged.full)?))?;
    let mut summary = SummaryReportWriter::new(BufWriter::new(File::create(&staged.summary)?))?;
    let mut sinks: [&mut dyn OutputSink; 2] = [&mut full, &mut summary];
    write_all(records, &mut sinks)?;
    Ok((full.rows(), summary.rows()))
}

fn discard(staged: &ReportPaths) {
    for path in [&staged.full, &staged.summary] {
        if path.is_file() {
            if let Err(err) = fs::remove_file(path) {
                tracing::warn!(path = %path.display(), error = %err, "failed to remove staging file");
            }
        }
    }
}

pub fn write_all(
    records: &[TierUpRecord],
    sinks: &mut [&mut dyn OutputSink],
) -> Result<(), OutputError> {
    for record in records {
        for sink in sinks.iter_mut() {
            sink.write_record(record)?;
        }
    }
    for sink in sinks.iter_mut() {
        sink.finish()?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_report.rs"]
mod tests;
