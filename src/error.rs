use crate::config::ConfigError;
use crate::input::InputError;
use crate::model::document::DocumentError;
use crate::model::validate::EligibilityError;
use crate::panels::RegistryError;
use crate::report::OutputError;

/// The request does not have the shape tiering output is assumed to have.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataIntegrityError {
    #[error("expected exactly one interpreted genome from {service}, found {found}")]
    TieringGenomeCount { service: &'static str, found: usize },
    #[error("report event {event_id} has {found} genomic entities of type gene, expected 1")]
    GeneEntityCount { event_id: String, found: usize },
    #[error("report event {event_id} has a gene entity without a gene symbol")]
    MissingGeneSymbol { event_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("report event panel {name:?} is not declared (declared: {})", .declared.join(", "))]
pub struct UnresolvedPanelReference {
    pub name: String,
    pub declared: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TierUpError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Eligibility(#[from] EligibilityError),
    #[error(transparent)]
    DataIntegrity(#[from] DataIntegrityError),
    #[error("panel registry unavailable: {0}")]
    RegistryUnavailable(#[from] RegistryError),
    #[error(transparent)]
    UnresolvedPanel(#[from] UnresolvedPanelReference),
    #[error(transparent)]
    Output(#[from] OutputError),
}
