use crate::model::document::RequestDocument;

/// Status recorded once a request has been sent for decision support.
pub const SENT_TO_GMCS: &str = "sent_to_gmcs";

/// Version prefix of the interpretation model the tiering genome must follow.
pub const REPORT_MODEL_MAJOR: &str = "6.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    pub is_v6: bool,
    pub is_sent: bool,
    pub is_unsolved: bool,
}

impl Eligibility {
    pub fn check(document: &RequestDocument) -> Self {
        Self {
            is_v6: is_v6(document),
            is_sent: is_sent(document),
            is_unsolved: is_unsolved(document),
        }
    }

    pub fn passed(&self) -> bool {
        self.is_v6 && self.is_sent && self.is_unsolved
    }

    pub fn failed_checks(&self) -> Vec<&'static str> {
        let mut failed = Vec::new();
        if !self.is_v6 {
            failed.push("is_v6");
        }
        if !self.is_sent {
            failed.push("is_sent");
        }
        if !self.is_unsolved {
            failed.push("is_unsolved");
        }
        failed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error(
    "interpretation request is not eligible (failed: {}): is_v6={}, is_sent={}, is_unsolved={}",
    .eligibility.failed_checks().join(", "),
    .eligibility.is_v6,
    .eligibility.is_sent,
    .eligibility.is_unsolved
)]
pub struct EligibilityError {
    pub eligibility: Eligibility,
}

pub fn validate(document: &RequestDocument) -> Result<(), EligibilityError> {
    let eligibility = Eligibility::check(document);
    if eligibility.passed() {
        Ok(())
    } else {
        Err(EligibilityError { eligibility })
    }
}

/// Absent version control, or a payload that does not decode as the v6 model,
/// counts as non-conforming.
pub fn is_v6(document: &RequestDocument) -> bool {
    let tiering = &document.tiering;
    tiering.data.is_some()
        && tiering
            .version_control
            .as_ref()
            .and_then(|vc| vc.git_version_control.as_deref())
            .is_some_and(|v| v.starts_with(REPORT_MODEL_MAJOR))
}

pub fn is_sent(document: &RequestDocument) -> bool {
    document.status_history.iter().any(|s| s == SENT_TO_GMCS)
}

pub fn is_unsolved(document: &RequestDocument) -> bool {
    if document.clinical_reports.is_empty() {
        return true;
    }
    if let Some(latest) = document.latest_clinical_report() {
        tracing::debug!(
            version = latest.version,
            case_solved = latest.case_solved.as_deref().unwrap_or("-"),
            "latest clinical report"
        );
    }
    !document
        .clinical_reports
        .iter()
        .filter_map(|r| r.case_solved.as_deref())
        .any(|answer| answer.eq_ignore_ascii_case("yes"))
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/validate.rs"]
mod tests;
