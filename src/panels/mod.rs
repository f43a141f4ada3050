pub mod mapping;
pub mod panelapp;
pub mod reconcile;

use std::collections::BTreeMap;

pub use mapping::{GeneMatch, match_gene, resolve_panel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneConfidence {
    pub hgnc_id: Option<String>,
    pub confidence_level: String,
}

/// A panel as served by the registry. Never mutated after a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub id: u64,
    pub name: String,
    pub hash: Option<String>,
    pub version: String,
    pub created: String,
    /// Keyed by HGNC symbol.
    pub genes: BTreeMap<String, GeneConfidence>,
}

impl Panel {
    pub fn gene(&self, symbol: &str) -> Option<&GeneConfidence> {
        self.genes.get(symbol)
    }
}

impl std::fmt::Display for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, v{})", self.name, self.id, self.version)
    }
}

/// One entry of the registry's panel listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelListing {
    pub id: u64,
    pub name: String,
    pub relevant_disorders: Vec<String>,
}

/// A report event panel name that was resolved through a registry alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelUpdate {
    pub name: String,
    pub panel_id: u64,
}

impl std::fmt::Display for PanelUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.name, self.panel_id)
    }
}

/// An alias claimed by several registry panels; `chosen` is the last match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousPanel {
    pub name: String,
    pub candidates: Vec<u64>,
    pub chosen: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Read access to the service of record for gene panels.
pub trait PanelRegistry {
    /// Fetch a panel by registry identifier; `None` asks for the current version.
    fn get_panel(&self, id: &str, version: Option<&str>) -> Result<Panel, RegistryError>;

    /// Every panel known to the registry, with its aliases.
    fn list_panels(&self) -> Result<Vec<PanelListing>, RegistryError>;
}

#[cfg(test)]
#[path = "../../tests/src_inline/panels/tests.rs"]
mod tests;
