use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::DataIntegrityError;
use crate::panels::{AmbiguousPanel, Panel, PanelUpdate};

/// Interpretation service that produces the tiering genome.
pub const TIERING_SERVICE: &str = "genomics_england_tiering";

pub const TIER1: &str = "TIER1";
pub const TIER2: &str = "TIER2";
pub const TIER3: &str = "TIER3";

/// Label used for report events that carry no tier.
pub const UNTIERED: &str = "NONE";

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to decode interpretation request: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Integrity(#[from] DataIntegrityError),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantCoordinates {
    pub chromosome: String,
    pub position: u64,
    pub reference: String,
    pub alternate: String,
    pub assembly: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantCall {
    pub participant_id: String,
    pub zygosity: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenomicEntity {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub gene_symbol: Option<String>,
}

impl GenomicEntity {
    pub fn is_gene(&self) -> bool {
        self.kind == "gene"
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenePanelRef {
    pub panel_name: String,
    #[serde(default)]
    pub panel_identifier: Option<String>,
    #[serde(default)]
    pub panel_version: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantConsequence {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEventRecord {
    pub report_event_id: String,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub event_justification: Option<String>,
    #[serde(default)]
    pub penetrance: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub de_novo_quality_score: Option<f64>,
    #[serde(default)]
    pub mode_of_inheritance: Option<String>,
    #[serde(default)]
    pub segregation_pattern: Option<String>,
    #[serde(default)]
    pub group_of_variants: Option<i64>,
    #[serde(default)]
    pub variant_consequences: Vec<VariantConsequence>,
    pub genomic_entities: Vec<GenomicEntity>,
    pub gene_panel: GenePanelRef,
}

impl ReportEventRecord {
    pub fn tier_label(&self) -> &str {
        self.tier.as_deref().unwrap_or(UNTIERED)
    }

    pub fn is_tier3(&self) -> bool {
        self.tier.as_deref() == Some(TIER3)
    }

    pub fn panel_name(&self) -> &str {
        &self.gene_panel.panel_name
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub variant_coordinates: VariantCoordinates,
    #[serde(default)]
    pub variant_calls: Vec<VariantCall>,
    pub report_events: Vec<ReportEventRecord>,
}

impl Variant {
    /// Call for the given participant, or the first call when the participant is unknown.
    pub fn call_for(&self, participant_id: Option<&str>) -> Option<&VariantCall> {
        participant_id
            .and_then(|id| self.variant_calls.iter().find(|c| c.participant_id == id))
            .or_else(|| self.variant_calls.first())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionControl {
    #[serde(default)]
    pub git_version_control: Option<String>,
}

/// Tiering payload in the v6 interpretation model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretedGenomeData {
    pub interpretation_service: String,
    #[serde(default)]
    pub software_versions: BTreeMap<String, String>,
    #[serde(default)]
    pub reference_databases_versions: BTreeMap<String, String>,
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TieringGenome {
    pub created_at: Option<String>,
    pub version_control: Option<VersionControl>,
    /// `None` when the payload does not decode as the v6 model; such a request
    /// fails the `is_v6` check instead of failing to load.
    pub data: Option<InterpretedGenomeData>,
}

impl TieringGenome {
    pub fn variants(&self) -> &[Variant] {
        self.data
            .as_ref()
            .map(|d| d.variants.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClinicalReport {
    pub version: u32,
    /// `caseSolvedFamily` from the exit questionnaire, when one was filed.
    pub case_solved: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPanel {
    pub specific_disease: String,
    /// Registry identifier of the panel.
    pub panel_name: String,
    #[serde(default)]
    pub panel_version: Option<String>,
}

mod wire {
    use serde::{Deserialize, Deserializer};

    use super::{AnalysisPanel, VersionControl};

    #[derive(Debug, Deserialize)]
    pub struct Envelope {
        #[serde(deserialize_with = "string_or_number")]
        pub interpretation_request_id: String,
        #[serde(deserialize_with = "string_or_number")]
        pub version: String,
        pub status: Vec<Status>,
        pub clinical_report: Vec<ClinicalReport>,
        pub interpreted_genome: Vec<InterpretedGenome>,
        pub interpretation_request_data: RequestData,
    }

    #[derive(Debug, Deserialize)]
    pub struct Status {
        pub status: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ClinicalReport {
        pub clinical_report_version: u32,
        #[serde(default)]
        pub exit_questionnaire: Option<ExitQuestionnaire>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ExitQuestionnaire {
        pub exit_questionnaire_data: ExitQuestionnaireData,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExitQuestionnaireData {
        pub family_level_questions: FamilyLevelQuestions,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FamilyLevelQuestions {
        pub case_solved_family: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct InterpretedGenome {
        #[serde(default)]
        pub created_at: Option<String>,
        pub interpreted_genome_data: serde_json::Value,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ServiceProbe {
        pub interpretation_service: String,
        #[serde(default)]
        pub version_control: Option<VersionControl>,
    }

    #[derive(Debug, Deserialize)]
    pub struct RequestData {
        pub json_request: JsonRequest,
    }

    #[derive(Debug, Deserialize)]
    pub struct JsonRequest {
        pub pedigree: Pedigree,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Pedigree {
        pub analysis_panels: Vec<AnalysisPanel>,
        #[serde(default)]
        pub members: Vec<Member>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Member {
        #[serde(default)]
        pub participant_id: Option<String>,
        #[serde(default)]
        pub is_proband: Option<bool>,
    }

    fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Ok(s),
            serde_json::Value::Number(n) => Ok(n.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "expected string or number, found {other}"
            ))),
        }
    }
}

/// Typed view over a decoded interpretation request.
///
/// Everything except the panel bookkeeping (`declared_panels`, `updated_panels`,
/// `ambiguous_panels`) is fixed at load time.
#[derive(Debug, Clone)]
pub struct RequestDocument {
    pub interpretation_request_id: String,
    pub version: String,
    pub status_history: Vec<String>,
    pub clinical_reports: Vec<ClinicalReport>,
    pub tiering: TieringGenome,
    pub analysis_panels: Vec<AnalysisPanel>,
    pub proband_id: Option<String>,
    pub declared_panels: BTreeMap<String, Panel>,
    pub updated_panels: Vec<PanelUpdate>,
    pub ambiguous_panels: Vec<AmbiguousPanel>,
    tier_counts: BTreeMap<String, usize>,
}

impl RequestDocument {
    pub fn from_value(value: serde_json::Value) -> Result<Self, DocumentError> {
        let envelope: wire::Envelope = serde_json::from_value(value)?;
        Self::from_envelope(envelope)
    }

    fn from_envelope(envelope: wire::Envelope) -> Result<Self, DocumentError> {
        let tiering = select_tiering_genome(envelope.interpreted_genome)?;
        let tier_counts = count_tiers(tiering.variants());

        let clinical_reports = envelope
            .clinical_report
            .into_iter()
            .map(|r| ClinicalReport {
                version: r.clinical_report_version,
                case_solved: r.exit_questionnaire.map(|q| {
                    q.exit_questionnaire_data
                        .family_level_questions
                        .case_solved_family
                }),
            })
            .collect();

        let pedigree = envelope.interpretation_request_data.json_request.pedigree;
        let proband_id = pedigree
            .members
            .iter()
            .find(|m| m.is_proband == Some(true))
            .and_then(|m| m.participant_id.clone());

        Ok(Self {
            interpretation_request_id: envelope.interpretation_request_id,
            version: envelope.version,
            status_history: envelope.status.into_iter().map(|s| s.status).collect(),
            clinical_reports,
            tiering,
            analysis_panels: pedigree.analysis_panels,
            proband_id,
            declared_panels: BTreeMap::new(),
            updated_panels: Vec::new(),
            ambiguous_panels: Vec::new(),
            tier_counts,
        })
    }

    /// `{interpretation_request_id}-{version}`
    pub fn irid(&self) -> String {
        format!("{}-{}", self.interpretation_request_id, self.version)
    }

    pub fn variants(&self) -> &[Variant] {
        self.tiering.variants()
    }

    pub fn tier_counts(&self) -> &BTreeMap<String, usize> {
        &self.tier_counts
    }

    pub fn tier_count(&self, tier: &str) -> usize {
        self.tier_counts.get(tier).copied().unwrap_or(0)
    }

    pub fn latest_clinical_report(&self) -> Option<&ClinicalReport> {
        self.clinical_reports.iter().max_by_key(|r| r.version)
    }
}

fn select_tiering_genome(
    genomes: Vec<wire::InterpretedGenome>,
) -> Result<TieringGenome, DocumentError> {
    let mut tiering = Vec::new();
    for genome in genomes {
        let probe: wire::ServiceProbe =
            serde_json::from_value(genome.interpreted_genome_data.clone())?;
        if probe.interpretation_service == TIERING_SERVICE {
            tiering.push((probe, genome));
        }
    }
    if tiering.len() != 1 {
        return Err(DataIntegrityError::TieringGenomeCount {
            service: TIERING_SERVICE,
            found: tiering.len(),
        }
        .into());
    }
    let (probe, genome) = tiering.remove(0);
    let data = match serde_json::from_value::<InterpretedGenomeData>(genome.interpreted_genome_data)
    {
        Ok(data) => Some(data),
        Err(e) => {
            tracing::warn!(error = %e, "tiering genome does not follow the v6 model");
            None
        }
    };
    Ok(TieringGenome {
        created_at: genome.created_at,
        version_control: probe.version_control,
        data,
    })
}

fn count_tiers(variants: &[Variant]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for variant in variants {
        for event in &variant.report_events {
            *counts.entry(event.tier_label().to_string()).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/document.rs"]
mod tests;
