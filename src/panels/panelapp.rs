//! PanelApp REST client (API v1).

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::panels::{GeneConfidence, Panel, PanelListing, PanelRegistry, RegistryError};

pub const DEFAULT_PANELAPP_HOST: &str = "https://panelapp.genomicsengland.co.uk/api/v1";

#[derive(Debug, Clone)]
pub struct PanelAppClient {
    host: String,
    http: reqwest::blocking::Client,
}

impl PanelAppClient {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            http: reqwest::blocking::Client::new(),
        }
    }

    fn panels_url(&self) -> String {
        format!("{}/panels/", self.host.trim_end_matches('/'))
    }

    fn panel_url(&self, id: &str) -> String {
        format!("{}{}/", self.panels_url(), id)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, RegistryError> {
        let resp = self
            .http
            .get(url)
            .query(query)
            .send()
            .map_err(|e| RegistryError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RegistryError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        resp.json::<T>().map_err(|e| RegistryError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

impl PanelRegistry for PanelAppClient {
    fn get_panel(&self, id: &str, version: Option<&str>) -> Result<Panel, RegistryError> {
        let url = self.panel_url(id);
        let query: Vec<(&str, &str)> = match version {
            Some(v) => vec![("version", v)],
            None => Vec::new(),
        };
        tracing::debug!(%url, version = version.unwrap_or("current"), "fetching panel");
        let body: PanelResponse = self.get_json(&url, &query)?;
        Ok(body.into_panel())
    }

    fn list_panels(&self) -> Result<Vec<PanelListing>, RegistryError> {
        let mut out = Vec::new();
        let mut next = Some(self.panels_url());
        while let Some(url) = next {
            tracing::debug!(%url, "listing panels");
            let page: PanelPage = self.get_json(&url, &[])?;
            out.extend(page.results.into_iter().map(|p| PanelListing {
                id: p.id,
                name: p.name,
                relevant_disorders: p.relevant_disorders,
            }));
            next = page.next;
        }
        Ok(out)
    }
}

#[derive(Debug, Deserialize)]
struct PanelResponse {
    id: u64,
    name: String,
    #[serde(default)]
    hash_id: Option<String>,
    version: String,
    version_created: String,
    #[serde(default)]
    genes: Vec<GeneEntry>,
}

#[derive(Debug, Deserialize)]
struct GeneEntry {
    gene_data: GeneData,
    confidence_level: String,
}

#[derive(Debug, Deserialize)]
struct GeneData {
    #[serde(default)]
    hgnc_symbol: Option<String>,
    #[serde(default)]
    gene_symbol: Option<String>,
    #[serde(default)]
    hgnc_id: Option<String>,
}

impl PanelResponse {
    fn into_panel(self) -> Panel {
        let mut genes = BTreeMap::new();
        for entry in self.genes {
            let GeneData {
                hgnc_symbol,
                gene_symbol,
                hgnc_id,
            } = entry.gene_data;
            let Some(symbol) = hgnc_symbol.or(gene_symbol) else {
                tracing::warn!(panel = self.id, "skipping panel gene without a symbol");
                continue;
            };
            genes.insert(
                symbol,
                GeneConfidence {
                    hgnc_id,
                    confidence_level: entry.confidence_level,
                },
            );
        }
        Panel {
            id: self.id,
            name: self.name,
            hash: self.hash_id,
            version: self.version,
            created: self.version_created,
            genes,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PanelPage {
    #[serde(default)]
    next: Option<String>,
    results: Vec<PanelSummary>,
}

#[derive(Debug, Deserialize)]
struct PanelSummary {
    id: u64,
    name: String,
    #[serde(default)]
    relevant_disorders: Vec<String>,
}

#[cfg(test)]
#[path = "../../tests/src_inline/panels/panelapp.rs"]
mod tests;
