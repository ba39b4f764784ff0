//! Single-endpoint API probe
//!
//! Fetches one configured endpoint and prints a structured summary of
//! the listing response: status, total, item count, and the first item
//! pretty-printed with Unicode preserved.

use crate::config::SharedConfig;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Response captured by a probe: any HTTP status plus the raw body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: String,
}

/// Single-endpoint prober
pub struct ApiProber {
    client: Client,
    config: SharedConfig,
}

impl ApiProber {
    /// Create a new prober with the configured per-request timeout
    pub fn new(config: SharedConfig) -> Result<Self> {
        let timeout_s = config.get().api.timeout_s;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_s))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// Fetch the configured probe URL. Transport failures propagate;
    /// any HTTP response (including non-200) is an `Ok` outcome.
    pub async fn fetch(&self) -> Result<ProbeOutcome> {
        let url = self.config.get().api.probe_url();

        tracing::debug!(url = %url, "Probing endpoint");

        let response = self.client.get(&url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(ProbeOutcome { status, body })
    }
}

/// Render the probe summary lines.
///
/// The status line always comes first; on 200 the body is decoded as
/// JSON with top-level `total` and `items`, and a decode failure
/// surfaces as an `Exception:` line after the status.
pub fn render(outcome: &ProbeOutcome) -> Vec<String> {
    let mut lines = vec![format!("Status Code: {}", outcome.status)];

    if outcome.status == 200 {
        let data: Value = match serde_json::from_str(&outcome.body) {
            Ok(data) => data,
            Err(e) => {
                lines.push(format!("Exception: {}", e));
                return lines;
            }
        };

        let total = data.get("total").cloned().unwrap_or(Value::Null);
        lines.push(format!("Total: {}", total));

        let items = data
            .get("items")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        lines.push(format!("Items count: {}", items.len()));

        if let Some(first) = items.first() {
            // Two-space indentation, non-ASCII left unescaped
            match serde_json::to_string_pretty(first) {
                Ok(pretty) => lines.push(pretty),
                Err(e) => lines.push(format!("Exception: {}", e)),
            }
        }
    } else {
        lines.push("Error response:".to_string());
        lines.push(outcome.body.clone());
    }

    lines
}
