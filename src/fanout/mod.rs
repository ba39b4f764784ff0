//! Concurrent multi-endpoint probe
//!
//! Fans one GET out to every endpoint in the fixed list and reports
//! status, latency, and payload size per endpoint. Lines are printed
//! in completion order, as each worker finishes.

use crate::config::SharedConfig;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// The fixed endpoint list, in submission order. Order is contractual.
pub const ENDPOINTS: [&str; 7] = [
    "/api/dashboard/analysis",
    "/api/stats",
    "/api/databases",
    "/api/fields?page=1&page_size=50",
    "/api/tables",
    "/api/datasources",
    "/api/quality/duplicates",
];

/// Result of probing a single endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Endpoint path, relative to the base URL
    pub endpoint: String,
    /// HTTP status code, or `None` when the request itself failed
    pub status_code: Option<u16>,
    /// Wall-clock seconds from request start to body received
    pub elapsed_s: f64,
    /// Payload size in bytes, or the error description
    pub info: String,
    /// Timestamp when the probe started
    pub started_at: DateTime<Utc>,
}

impl ProbeResult {
    /// Marker tag for the report line
    pub fn marker(&self) -> &'static str {
        match self.status_code {
            Some(200) => "[PASS]",
            Some(_) => "[FAIL]",
            None => "[ERROR]",
        }
    }

    /// Status field: the numeric code, or the sentinel `Error`
    pub fn status_text(&self) -> String {
        match self.status_code {
            Some(code) => code.to_string(),
            None => "Error".to_string(),
        }
    }

    /// Render the single report line for this endpoint
    pub fn render(&self) -> String {
        format!(
            "{} {:<35} | 状态: {:<8} | 耗时: {:.2}s | 大小/错误: {}",
            self.marker(),
            self.endpoint,
            self.status_text(),
            self.elapsed_s,
            self.info
        )
    }
}

/// Concurrent endpoint prober
pub struct ApiFanout {
    client: Client,
    config: SharedConfig,
}

impl ApiFanout {
    /// Create a new fan-out prober with the configured per-request timeout
    pub fn new(config: SharedConfig) -> Result<Self> {
        let timeout_s = config.get().api.timeout_s;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_s))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// Probe every endpoint concurrently, printing the banner and one
    /// report line per endpoint as each completes. Returns the results
    /// in completion order; always returns exactly one result per
    /// endpoint.
    pub async fn run(&self) -> Vec<ProbeResult> {
        let api = self.config.get().api;

        println!("开始并发测试... {}", api.base_url);
        println!("{}", "=".repeat(80));

        let mut workers = JoinSet::new();
        for endpoint in ENDPOINTS {
            workers.spawn(probe_endpoint(
                self.client.clone(),
                api.base_url.clone(),
                endpoint.to_string(),
            ));
        }

        // Workers print through this single joining task, so report
        // lines cannot interleave.
        let mut results = Vec::with_capacity(ENDPOINTS.len());
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(result) => {
                    println!("{}", result.render());
                    results.push(result);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Probe worker failed to complete");
                }
            }
        }

        // A worker lost to a panic still owes its endpoint a line
        for endpoint in missing_endpoints(&results) {
            let result = lost_worker_result(endpoint);
            println!("{}", result.render());
            results.push(result);
        }

        results
    }
}

/// Endpoints with no result yet, in submission order
fn missing_endpoints(results: &[ProbeResult]) -> Vec<&'static str> {
    ENDPOINTS
        .iter()
        .copied()
        .filter(|endpoint| !results.iter().any(|r| r.endpoint == *endpoint))
        .collect()
}

/// Synthetic error result for an endpoint whose worker never reported
fn lost_worker_result(endpoint: &str) -> ProbeResult {
    ProbeResult {
        endpoint: endpoint.to_string(),
        status_code: None,
        elapsed_s: 0.0,
        info: "probe worker failed to complete".to_string(),
        started_at: Utc::now(),
    }
}

/// Probe one endpoint. Any HTTP response is a success; transport
/// failures (connect errors, timeouts) become an error result.
async fn probe_endpoint(client: Client, base_url: String, endpoint: String) -> ProbeResult {
    let url = format!("{}{}", base_url, endpoint);
    let started_at = Utc::now();
    let start = Instant::now();

    let outcome = match client.get(&url).send().await {
        Ok(response) => {
            let status = response.status().as_u16();
            match response.bytes().await {
                Ok(bytes) => Ok((status, bytes.len())),
                Err(e) => Err(e),
            }
        }
        Err(e) => Err(e),
    };
    let elapsed_s = start.elapsed().as_secs_f64();

    match outcome {
        Ok((status, size)) => ProbeResult {
            endpoint,
            status_code: Some(status),
            elapsed_s,
            info: size.to_string(),
            started_at,
        },
        Err(e) => ProbeResult {
            endpoint,
            status_code: None,
            elapsed_s,
            info: e.to_string(),
            started_at,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(status_code: Option<u16>, info: &str) -> ProbeResult {
        ProbeResult {
            endpoint: "/api/stats".to_string(),
            status_code,
            elapsed_s: 0.1234,
            info: info.to_string(),
            started_at: Utc::now(),
        }
    }

    #[test]
    fn test_endpoint_order() {
        assert_eq!(ENDPOINTS[0], "/api/dashboard/analysis");
        assert_eq!(ENDPOINTS[3], "/api/fields?page=1&page_size=50");
        assert_eq!(ENDPOINTS[6], "/api/quality/duplicates");
        assert_eq!(ENDPOINTS.len(), 7);
    }

    #[test]
    fn test_markers() {
        assert_eq!(result(Some(200), "42").marker(), "[PASS]");
        assert_eq!(result(Some(404), "12").marker(), "[FAIL]");
        assert_eq!(result(Some(500), "0").marker(), "[FAIL]");
        assert_eq!(result(None, "conn refused").marker(), "[ERROR]");
    }

    #[test]
    fn test_status_text_sentinel() {
        assert_eq!(result(Some(200), "42").status_text(), "200");
        assert_eq!(result(None, "timeout").status_text(), "Error");
    }

    #[test]
    fn test_render_line_format() {
        let line = result(Some(200), "42").render();
        assert!(line.starts_with("[PASS] "));
        // Endpoint field padded to 35 characters
        assert!(line.contains(&format!("{:<35}", "/api/stats")));
        // Status field padded to 8 characters
        assert!(line.contains(&format!("| 状态: {:<8} |", "200")));
        assert!(line.contains("| 耗时: 0.12s |"));
        assert!(line.contains("| 大小/错误: 42"));
    }

    #[test]
    fn test_render_error_line() {
        let line = result(None, "conn refused").render();
        assert!(line.starts_with("[ERROR] "));
        assert!(line.contains(&format!("| 状态: {:<8} |", "Error")));
        assert!(line.contains("| 大小/错误: conn refused"));
    }

    #[test]
    fn test_lost_workers_still_get_report_lines() {
        // Results for all but two endpoints
        let reported: Vec<ProbeResult> = ENDPOINTS
            .iter()
            .filter(|e| **e != "/api/stats" && **e != "/api/tables")
            .map(|e| ProbeResult {
                endpoint: e.to_string(),
                status_code: Some(200),
                elapsed_s: 0.01,
                info: "2".to_string(),
                started_at: Utc::now(),
            })
            .collect();

        let missing = missing_endpoints(&reported);
        assert_eq!(missing, vec!["/api/stats", "/api/tables"]);

        for endpoint in missing {
            let synthetic = lost_worker_result(endpoint);
            assert_eq!(synthetic.marker(), "[ERROR]");
            assert_eq!(synthetic.status_code, None);
            assert!(synthetic.elapsed_s >= 0.0);
            assert!(synthetic.render().starts_with("[ERROR] "));
        }
    }

    #[test]
    fn test_no_missing_endpoints_when_all_reported() {
        let reported: Vec<ProbeResult> = ENDPOINTS
            .iter()
            .map(|e| ProbeResult {
                endpoint: e.to_string(),
                status_code: Some(200),
                elapsed_s: 0.01,
                info: "2".to_string(),
                started_at: Utc::now(),
            })
            .collect();

        assert!(missing_endpoints(&reported).is_empty());
    }

    #[test]
    fn test_result_serialization() {
        let json = serde_json::to_string(&result(Some(200), "42")).unwrap();
        assert!(json.contains("\"status_code\":200"));
        assert!(json.contains("\"endpoint\":\"/api/stats\""));
    }
}
