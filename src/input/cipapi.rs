//! Interpretation requests downloaded from the CIP-API.
//!
//! Only token authentication is supported; obtaining the token is left to the caller.

use std::fs;
use std::path::{Path, PathBuf};

use crate::input::{InputError, RequestSource};

pub const DEFAULT_CIPAPI_HOST: &str = "https://cipapi.genomicsengland.nhs.uk";

#[derive(Debug, Clone)]
pub struct CipApiClient {
    host: String,
    token: String,
    http: reqwest::blocking::Client,
}

impl CipApiClient {
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            token: token.into(),
            http: reqwest::blocking::Client::new(),
        }
    }

    fn request_url(&self, irid: u64, version: u64) -> String {
        format!(
            "{}/api/2/interpretation-request/{}/{}/",
            self.host.trim_end_matches('/'),
            irid,
            version
        )
    }

    /// Raw response body of one interpretation request.
    pub fn get_request(&self, irid: u64, version: u64) -> Result<String, InputError> {
        let url = self.request_url(irid, version);
        tracing::debug!(%url, "downloading interpretation request");
        let resp = self
            .http
            .get(&url)
            .query(&[("reports_v6", "true")])
            .header(reqwest::header::AUTHORIZATION, format!("JWT {}", self.token))
            .send()
            .map_err(|e| InputError::Http {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(InputError::Status {
                url,
                status: status.as_u16(),
            });
        }

        resp.text().map_err(|e| InputError::Http {
            url,
            message: e.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct CipApiSource {
    pub client: CipApiClient,
    pub irid: u64,
    pub version: u64,
}

impl RequestSource for CipApiSource {
    fn describe(&self) -> String {
        format!("CIP-API request {}-{}", self.irid, self.version)
    }

    fn fetch(&self) -> Result<String, InputError> {
        self.client.get_request(self.irid, self.version)
    }
}

/// Writes the response body unchanged as `{irid}.json` under `out_dir`.
pub fn save_request_body(body: &str, out_dir: &Path, irid: &str) -> Result<PathBuf, InputError> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(format!("{irid}.json"));
    fs::write(&path, body)?;
    Ok(path)
}
