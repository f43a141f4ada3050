use crate::error::UnresolvedPanelReference;
use crate::model::RequestDocument;
use crate::panels::Panel;

/// Current registry data for a report event gene. Both fields are `None` when the
/// symbol is no longer on the panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneMatch {
    pub hgnc_id: Option<String>,
    pub confidence: Option<String>,
}

impl GeneMatch {
    pub fn is_on_panel(&self) -> bool {
        self.confidence.is_some()
    }
}

pub fn match_gene(symbol: &str, panel: &Panel) -> GeneMatch {
    match panel.gene(symbol) {
        Some(gene) => GeneMatch {
            hgnc_id: gene.hgnc_id.clone(),
            confidence: Some(gene.confidence_level.clone()),
        },
        None => GeneMatch::default(),
    }
}

pub fn resolve_panel<'a>(
    document: &'a RequestDocument,
    name: &str,
) -> Result<&'a Panel, UnresolvedPanelReference> {
    document
        .declared_panels
        .get(name)
        .ok_or_else(|| UnresolvedPanelReference {
            name: name.to_string(),
            declared: document.declared_panels.keys().cloned().collect(),
        })
}
