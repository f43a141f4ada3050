use crate::model::RequestDocument;
use crate::panels::reconcile::{ReconcileOutcome, declare_analysis_panels, reconcile};
use crate::panels::{PanelRegistry, RegistryError};

#[derive(Debug, Clone)]
pub struct Stage2Output {
    pub declared: usize,
    pub reconcile: ReconcileOutcome,
}

/// Loads the declared analysis panels, then fills in report event panel names the
/// request no longer declares. Must complete before any event is extracted.
pub fn run_stage2(
    document: &mut RequestDocument,
    registry: &dyn PanelRegistry,
) -> Result<Stage2Output, RegistryError> {
    declare_analysis_panels(document, registry)?;
    let declared = document.declared_panels.len();
    let reconcile = reconcile(document, registry)?;
    tracing::info!(
        declared,
        added = reconcile.resolved.len(),
        ambiguous = reconcile.ambiguous.len(),
        unresolved = reconcile.unresolved.len(),
        "panel reconciliation finished"
    );
    Ok(Stage2Output {
        declared,
        reconcile,
    })
}
