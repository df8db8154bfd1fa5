//! Remote model catalog: fetch and parse candidate artifacts from the
//! Hugging Face model-search API.

use chrono::DateTime;
use serde_json::Value;

use crate::candidate::ModelCandidate;

const HF_API: &str = "https://huggingface.co/api";

#[cfg(feature = "network")]
pub struct CatalogClient {
    http: reqwest::Client,
}

#[cfg(feature = "network")]
impl CatalogClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(15))
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    /// Fetch the raw candidate list for one catalog author, most-downloaded
    /// first. One shot, no retries; transient failure is the caller's
    /// fallback trigger.
    pub async fn fetch_models(
        &self,
        author: &str,
        limit: u32,
    ) -> crate::error::Result<Vec<Value>> {
        let url = format!(
            "{HF_API}/models?author={}&sort=downloads&direction=-1&limit={limit}",
            urlencoding::encode(author),
        );
        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(crate::error::PilotError::Api { status, body });
        }
        Ok(resp.json().await?)
    }
}

#[cfg(feature = "network")]
impl Default for CatalogClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one raw catalog object into a candidate.
///
/// `None` when the id is missing, fails the runtime tag filter, or has no
/// parseable parameter count; such entries are dropped from ranking, never
/// an error.
pub fn parse_candidate(data: &Value) -> Option<ModelCandidate> {
    let full_id = data.get("id")?.as_str()?;
    if !ModelCandidate::is_runtime_compatible(full_id) {
        return None;
    }
    // Catalog ids are "author/model"; the runtime loads the bare model id.
    let id = full_id.split('/').nth(1).unwrap_or(full_id);
    let params_b = ModelCandidate::parse_params_b(id)?;
    let last_modified_ms = data
        .get("lastModified")
        .and_then(|v| v.as_str())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.timestamp_millis());
    Some(ModelCandidate::new(id, params_b, last_modified_ms))
}

/// Parse a raw catalog listing, silently discarding incompatible or
/// unparseable entries.
pub fn parse_candidates(raw: &[Value]) -> Vec<ModelCandidate> {
    let parsed: Vec<ModelCandidate> = raw.iter().filter_map(parse_candidate).collect();
    let dropped = raw.len() - parsed.len();
    if dropped > 0 {
        tracing::debug!(total = raw.len(), dropped, "discarded catalog entries");
    }
    parsed
}
