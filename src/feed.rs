//! Latency feed: per-pair measurements and synthesized history.
//!
//! The dashboard's render loop owns one `LatencyFeed` and calls
//! `maybe_refresh` every frame; refreshes are gated by wall-clock
//! elapsed time, so quitting the view tears the polling down with it.
//!
//! Live mode anchors each hop on the Radar measurement for the region;
//! mock mode models latency from great-circle distance plus jitter.

use crate::catalog::{EXCHANGES, REGIONS};
use crate::config::TimeRange;
use crate::geo;
use crate::model::{HistoricalPoint, LatencySample, LatencyStats};
use crate::radar::{self, RadarClient};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::time::{Duration, Instant};

// Rough fiber round-trip cost per km, plus fixed routing overhead.
const MS_PER_KM: f64 = 0.015;
const BASE_OVERHEAD_MS: f64 = 5.0;

/// Distance-based latency model shared by mock sampling and the
/// `distance` subcommand.
pub fn modeled_latency_ms(km: f64) -> f64 {
    BASE_OVERHEAD_MS + km * MS_PER_KM
}

pub struct LatencyFeed {
    client: RadarClient,
    live: bool,
    samples: Vec<LatencySample>,
    last_refresh: Option<Instant>,
    refresh_interval: Duration,
    rng: StdRng,
}

impl LatencyFeed {
    pub fn new(client: RadarClient, refresh_secs: u64, seed: Option<u64>) -> Self {
        let live = client.has_token();
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            client,
            live,
            samples: Vec::new(),
            last_refresh: None,
            refresh_interval: Duration::from_secs(refresh_secs),
            rng,
        }
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Flip between live Radar data and the mock model. Without a token
    /// there is nothing live to switch to.
    pub fn toggle_source(&mut self) -> bool {
        if self.client.has_token() {
            self.live = !self.live;
            self.last_refresh = None; // next frame repolls
        }
        self.live
    }

    /// Refresh if the poll interval has elapsed. Returns whether a
    /// refresh happened.
    pub fn maybe_refresh(&mut self) -> bool {
        let due = match self.last_refresh {
            None => true,
            Some(at) => at.elapsed() >= self.refresh_interval,
        };
        if due {
            self.refresh();
        }
        due
    }

    /// Re-sample every exchange/region pair.
    pub fn refresh(&mut self) {
        self.last_refresh = Some(Instant::now());
        let now_ms = Utc::now().timestamp_millis();

        // One Radar call per region per refresh, not per pair. Regions
        // the API has no data for inherit the global figure, or a mock
        // value if that is down too.
        let mut measured: HashMap<&str, f64> = HashMap::new();
        if self.live {
            let global = self.client.latest_global_latency().ok();
            for region in &REGIONS {
                let latency = match self.client.region_latency(region.region_code) {
                    Ok(v) => v,
                    Err(_) => match global {
                        Some(g) => g,
                        None => radar::mock_region_latency(&mut self.rng),
                    },
                };
                measured.insert(region.id, latency);
            }
        }

        self.samples.clear();
        for exchange in &EXCHANGES {
            for region in &REGIONS {
                let km = geo::distance_km(exchange.lat, exchange.lon, region.lat, region.lon);
                let latency_ms = match measured.get(region.id) {
                    Some(&regional) => regional + km * MS_PER_KM,
                    None => modeled_latency_ms(km) * (0.9 + self.rng.gen::<f64>() * 0.2),
                };
                self.samples.push(LatencySample {
                    from: exchange.id,
                    to: region.id,
                    latency_ms,
                    timestamp: now_ms,
                });
            }
        }
    }

    pub fn samples(&self) -> &[LatencySample] {
        &self.samples
    }

    pub fn sample(&self, from: &str, to: &str) -> Option<&LatencySample> {
        self.samples.iter().find(|s| s.from == from && s.to == to)
    }

    /// Synthesize a historical series for a pair, anchored on its
    /// current sample, newest point last.
    pub fn historical(
        &mut self,
        from: &str,
        to: &str,
        range: TimeRange,
    ) -> (Vec<HistoricalPoint>, Option<LatencyStats>) {
        let anchor = match self.sample(from, to) {
            Some(s) => s.latency_ms,
            None => radar::mock_region_latency(&mut self.rng),
        };

        let now_ms = Utc::now().timestamp_millis();
        let points = range.points();
        let interval = range.interval_ms();

        let mut series = Vec::with_capacity(points);
        for i in 0..points {
            let jitter = 0.85 + self.rng.gen::<f64>() * 0.3;
            series.push(HistoricalPoint {
                timestamp: now_ms - (points - 1 - i) as i64 * interval,
                latency_ms: (anchor * jitter).max(1.0),
            });
        }

        let stats = LatencyStats::from_series(&series);
        (series, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_feed(seed: u64) -> LatencyFeed {
        LatencyFeed::new(RadarClient::disconnected(), 3600, Some(seed))
    }

    #[test]
    fn refresh_samples_every_pair() {
        let mut feed = mock_feed(1);
        feed.refresh();
        assert_eq!(feed.samples().len(), EXCHANGES.len() * REGIONS.len());
        assert!(feed.samples().iter().all(|s| s.latency_ms > 0.0));
    }

    #[test]
    fn forced_mock_ignores_an_environment_token() {
        // The only test that touches the environment; everything else
        // builds its client through the constructor.
        std::env::set_var("CLOUDFLARE_API_TOKEN", "dummy");
        let mut feed = LatencyFeed::new(RadarClient::disconnected(), 10, Some(1));
        std::env::remove_var("CLOUDFLARE_API_TOKEN");

        assert!(!feed.is_live(), "forced mock came up live");
        // Tokenless feeds cannot be switched live afterwards either.
        assert!(!feed.toggle_source());
    }

    #[test]
    fn polling_is_interval_gated() {
        let mut feed = mock_feed(2);
        assert!(feed.maybe_refresh());
        // Interval is an hour; the immediate second call must not poll.
        assert!(!feed.maybe_refresh());
    }

    #[test]
    fn nearby_pairs_are_faster_than_intercontinental_ones() {
        let mut feed = mock_feed(3);
        feed.refresh();
        // Binance and aws-sg share a city; gcp-nl is half a world away.
        let near = feed.sample("binance", "aws-sg").unwrap().latency_ms;
        let far = feed.sample("binance", "gcp-nl").unwrap().latency_ms;
        assert!(near < far, "near {near} should beat far {far}");
    }

    #[test]
    fn same_seed_reproduces_samples() {
        let mut a = mock_feed(42);
        let mut b = mock_feed(42);
        a.refresh();
        b.refresh();
        for (sa, sb) in a.samples().iter().zip(b.samples()) {
            assert_eq!(sa.latency_ms, sb.latency_ms);
        }
    }

    #[test]
    fn historical_series_matches_the_range() {
        let mut feed = mock_feed(4);
        feed.refresh();
        for range in [TimeRange::Hour, TimeRange::Day, TimeRange::Week, TimeRange::Month] {
            let (series, stats) = feed.historical("kraken", "gcp-usw", range);
            assert_eq!(series.len(), range.points());
            let stats = stats.expect("non-empty series has stats");
            assert!(stats.min <= stats.avg && stats.avg <= stats.max);
            // Newest point last, one interval apart.
            let dt = series[1].timestamp - series[0].timestamp;
            assert_eq!(dt, range.interval_ms());
        }
    }

    #[test]
    fn unknown_pair_still_produces_a_series() {
        let mut feed = mock_feed(5);
        feed.refresh();
        let (series, stats) = feed.historical("ftx", "aws-sg", TimeRange::Day);
        assert_eq!(series.len(), TimeRange::Day.points());
        assert!(stats.is_some());
    }
}
