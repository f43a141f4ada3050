//! Repairs drift between the panel names report events were tiered against and the
//! panels the request currently declares.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::RequestDocument;
use crate::panels::{AmbiguousPanel, PanelListing, PanelRegistry, PanelUpdate, RegistryError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub resolved: Vec<PanelUpdate>,
    pub ambiguous: Vec<AmbiguousPanel>,
    pub unresolved: Vec<String>,
}

/// Fetches the current version of every pedigree analysis panel and registers it
/// under the registry's panel name.
pub fn declare_analysis_panels(
    document: &mut RequestDocument,
    registry: &dyn PanelRegistry,
) -> Result<(), RegistryError> {
    let requested: Vec<(String, String)> = document
        .analysis_panels
        .iter()
        .map(|p| (p.panel_name.clone(), p.specific_disease.clone()))
        .collect();
    for (id, disease) in requested {
        let panel = registry.get_panel(&id, None)?;
        tracing::info!(%panel, %disease, "declared analysis panel");
        document.declared_panels.entry(panel.name.clone()).or_insert(panel);
    }
    Ok(())
}

/// Distinct panel names referenced by report events of every tier.
pub fn referenced_panel_names(document: &RequestDocument) -> BTreeSet<String> {
    document
        .variants()
        .iter()
        .flat_map(|v| v.report_events.iter())
        .map(|e| e.panel_name().to_string())
        .collect()
}

pub fn missing_panel_names(document: &RequestDocument) -> BTreeSet<String> {
    referenced_panel_names(document)
        .into_iter()
        .filter(|name| !document.declared_panels.contains_key(name))
        .collect()
}

/// Adds a panel for every missing name that a registry panel lists among its
/// relevant disorders. Only ever inserts into `declared_panels`.
pub fn reconcile(
    document: &mut RequestDocument,
    registry: &dyn PanelRegistry,
) -> Result<ReconcileOutcome, RegistryError> {
    let missing = missing_panel_names(document);
    if missing.is_empty() {
        tracing::info!("all report event panels are declared");
        return Ok(ReconcileOutcome::default());
    }
    tracing::info!(
        missing = missing.len(),
        "searching registry aliases for undeclared panels"
    );

    let listings = registry.list_panels()?;
    let (matches, ambiguous) = resolve_aliases(&missing, &listings);

    let mut outcome = ReconcileOutcome::default();
    for entry in &ambiguous {
        tracing::warn!(
            name = %entry.name,
            candidates = ?entry.candidates,
            chosen = entry.chosen,
            "panel alias matches several registry panels; using the last match"
        );
    }

    for name in &missing {
        let Some(&panel_id) = matches.get(name) else {
            tracing::warn!(%name, "no registry panel lists this name as an alias");
            outcome.unresolved.push(name.clone());
            continue;
        };
        let panel = registry.get_panel(&panel_id.to_string(), None)?;
        tracing::info!(%name, %panel, "resolved undeclared panel");
        document.declared_panels.insert(name.clone(), panel);
        let update = PanelUpdate {
            name: name.clone(),
            panel_id,
        };
        document.updated_panels.push(update.clone());
        outcome.resolved.push(update);
    }

    document.ambiguous_panels.extend(ambiguous.iter().cloned());
    outcome.ambiguous = ambiguous;
    Ok(outcome)
}

fn resolve_aliases(
    missing: &BTreeSet<String>,
    listings: &[PanelListing],
) -> (BTreeMap<String, u64>, Vec<AmbiguousPanel>) {
    let mut candidates: BTreeMap<String, Vec<u64>> = BTreeMap::new();
    for listing in listings {
        for disorder in &listing.relevant_disorders {
            if missing.contains(disorder) {
                let ids = candidates.entry(disorder.clone()).or_default();
                if !ids.contains(&listing.id) {
                    ids.push(listing.id);
                }
            }
        }
    }

    let mut matches = BTreeMap::new();
    let mut ambiguous = Vec::new();
    for (name, ids) in candidates {
        let Some(&chosen) = ids.last() else {
            continue;
        };
        if ids.len() > 1 {
            ambiguous.push(AmbiguousPanel {
                name: name.clone(),
                candidates: ids,
                chosen,
            });
        }
        matches.insert(name, chosen);
    }
    (matches, ambiguous)
}

#[cfg(test)]
#[path = "../../tests/src_inline/panels/reconcile.rs"]
mod tests;
