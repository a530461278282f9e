//! Cloudflare Radar latency client.
//!
//! Thin wrapper over the Radar HTTP API with a mock fallback: any
//! transport or parse failure degrades to simulated values rather than
//! taking the dashboard down.

use rand::Rng;
use serde::Deserialize;
use std::time::Duration;

const RADAR_BASE: &str = "https://api.cloudflare.com/client/v4";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct TimeseriesResponse {
    success: bool,
    result: Option<TimeseriesResult>,
}

#[derive(Debug, Deserialize)]
struct TimeseriesResult {
    serie_0: Serie,
}

#[derive(Debug, Deserialize)]
struct Serie {
    values: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LocationResponse {
    success: bool,
    result: Option<LocationResult>,
}

#[derive(Debug, Deserialize)]
struct LocationResult {
    location: LocationLatency,
}

#[derive(Debug, Deserialize)]
struct LocationLatency {
    latency: f64,
}

pub struct RadarClient {
    token: Option<String>,
    base_url: String,
}

impl RadarClient {
    /// Token comes from config or the CLOUDFLARE_API_TOKEN env var;
    /// without one the client only ever produces mock values.
    pub fn new(token: Option<String>) -> Self {
        let token = token.or_else(|| std::env::var("CLOUDFLARE_API_TOKEN").ok());
        Self {
            token,
            base_url: RADAR_BASE.to_string(),
        }
    }

    /// Client with no token at all, ignoring the environment. For
    /// callers that force mock data.
    pub fn disconnected() -> Self {
        Self {
            token: None,
            base_url: RADAR_BASE.to_string(),
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Latest value of the global HTTP latency timeseries (1-day range).
    pub fn latest_global_latency(&self) -> Result<f64, String> {
        let token = self.token.as_deref().ok_or("no API token configured")?;
        let url = format!("{}/radar/http/timeseries", self.base_url);

        let response = ureq::get(&url)
            .query("format", "json")
            .query("dateRange", "1d")
            .query("metrics", "latency")
            .set("Authorization", &format!("Bearer {token}"))
            .timeout(REQUEST_TIMEOUT)
            .call()
            .map_err(|e| format!("radar timeseries request failed: {e}"))?;

        let body: TimeseriesResponse = response
            .into_json()
            .map_err(|e| format!("radar timeseries parse failed: {e}"))?;

        parse_latest(body)
    }

    /// Current latency for one Radar location code.
    pub fn region_latency(&self, region_code: &str) -> Result<f64, String> {
        let token = self.token.as_deref().ok_or("no API token configured")?;
        let url = format!("{}/radar/http/locations/{}", self.base_url, region_code);

        let response = ureq::get(&url)
            .query("format", "json")
            .query("dateRange", "1h")
            .query("metric", "latency")
            .set("Authorization", &format!("Bearer {token}"))
            .timeout(REQUEST_TIMEOUT)
            .call()
            .map_err(|e| format!("radar location request failed: {e}"))?;

        let body: LocationResponse = response
            .into_json()
            .map_err(|e| format!("radar location parse failed: {e}"))?;

        if !body.success {
            return Err("radar location request unsuccessful".to_string());
        }
        body.result
            .map(|r| r.location.latency)
            .ok_or_else(|| "radar location response missing result".to_string())
    }
}

fn parse_latest(body: TimeseriesResponse) -> Result<f64, String> {
    if !body.success {
        return Err("radar timeseries request unsuccessful".to_string());
    }
    let values = body
        .result
        .ok_or("radar timeseries response missing result")?
        .serie_0
        .values;
    let latest = values.last().ok_or("radar timeseries is empty")?;
    latest
        .parse::<f64>()
        .map_err(|e| format!("radar timeseries value not a number: {e}"))
}

/// Mock region latency: uniform 20-100 ms.
pub fn mock_region_latency(rng: &mut impl Rng) -> f64 {
    20.0 + rng.gen::<f64>() * 80.0
}
