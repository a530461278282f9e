//! Domain types: cloud providers, exchanges, regions, latency samples.

use crossterm::style::Color;
use std::fmt;
use std::str::FromStr;

/// Cloud providers hosting the exchanges and regions we track. Closed
/// set; display attributes live in exhaustive matches below so a new
/// provider cannot ship without them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CloudProvider {
    Aws,
    Gcp,
    Azure,
}

impl CloudProvider {
    pub const ALL: [CloudProvider; 3] = [CloudProvider::Aws, CloudProvider::Gcp, CloudProvider::Azure];

    /// Short code used in ids, CLI flags, and config.
    pub fn code(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "aws",
            CloudProvider::Gcp => "gcp",
            CloudProvider::Azure => "azure",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "AWS",
            CloudProvider::Gcp => "Google Cloud",
            CloudProvider::Azure => "Microsoft Azure",
        }
    }

    /// Brand color for markers and legend entries.
    pub fn color(&self) -> Color {
        match self {
            CloudProvider::Aws => Color::Rgb { r: 0xFF, g: 0x99, b: 0x00 },
            CloudProvider::Gcp => Color::Rgb { r: 0x42, g: 0x85, b: 0xF4 },
            CloudProvider::Azure => Color::Rgb { r: 0x00, g: 0x89, b: 0xD6 },
        }
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CloudProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aws" => Ok(CloudProvider::Aws),
            "gcp" | "google" => Ok(CloudProvider::Gcp),
            "azure" | "az" => Ok(CloudProvider::Azure),
            other => Err(format!("unknown provider: {other}")),
        }
    }
}

/// A crypto exchange's matching-engine location.
#[derive(Clone, Debug)]
pub struct Exchange {
    pub id: &'static str,
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
    pub provider: CloudProvider,
    pub country_code: &'static str,
}

/// A cloud-provider region near one or more exchanges.
#[derive(Clone, Debug)]
pub struct CloudRegion {
    pub id: &'static str,
    pub provider: CloudProvider,
    pub lat: f64,
    pub lon: f64,
    pub region_code: &'static str,
    pub server_count: u32,
    pub country_code: &'static str,
}

/// One latency measurement between an exchange and a region.
#[derive(Clone, Debug)]
pub struct LatencySample {
    pub from: &'static str,
    pub to: &'static str,
    pub latency_ms: f64,
    pub timestamp: i64,
}

/// A point in a historical latency series.
#[derive(Clone, Copy, Debug)]
pub struct HistoricalPoint {
    pub timestamp: i64,
    pub latency_ms: f64,
}

/// Summary statistics over a historical series, rounded to 0.1 ms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatencyStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub current: f64,
}

impl LatencyStats {
    /// Compute stats from a series. Empty input has no stats.
    pub fn from_series(series: &[HistoricalPoint]) -> Option<LatencyStats> {
        let last = series.last()?;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for p in series {
            min = min.min(p.latency_ms);
            max = max.max(p.latency_ms);
            sum += p.latency_ms;
        }
        Some(LatencyStats {
            min: round_tenth(min),
            max: round_tenth(max),
            avg: round_tenth(sum / series.len() as f64),
            current: round_tenth(last.latency_ms),
        })
    }
}

fn round_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Latency band thresholds: under 50 ms is low, under 100 ms medium.
pub fn latency_status(latency_ms: f64) -> &'static str {
    if latency_ms < 50.0 {
        "Low"
    } else if latency_ms < 100.0 {
        "Medium"
    } else {
        "High"
    }
}

/// Semantic color for a latency value, same banding as `latency_status`.
pub fn latency_color(latency_ms: f64) -> Color {
    if latency_ms < 50.0 {
        Color::Green
    } else if latency_ms < 100.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}
