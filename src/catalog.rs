//! Built-in exchange and cloud-region catalog.
//!
//! Coordinates are the published matching-engine / region locations.
//! Upstream lookups resolve ids to projected globe points; an unknown id
//! resolves to the zero-vector sentinel so arc construction can skip it.

use crate::geo::{self, Point3, GLOBE_RADIUS};
use crate::model::{CloudProvider, CloudRegion, Exchange};

pub static EXCHANGES: [Exchange; 6] = [
    Exchange { id: "binance", name: "Binance", lat: 1.28, lon: 103.85, provider: CloudProvider::Aws, country_code: "SG" },
    Exchange { id: "okx", name: "OKX", lat: 22.28, lon: 114.16, provider: CloudProvider::Aws, country_code: "HK" },
    Exchange { id: "deribit", name: "Deribit", lat: 52.37, lon: 4.89, provider: CloudProvider::Gcp, country_code: "NL" },
    Exchange { id: "bybit", name: "Bybit", lat: 1.28, lon: 103.85, provider: CloudProvider::Azure, country_code: "SG" },
    Exchange { id: "kraken", name: "Kraken", lat: 47.61, lon: -122.33, provider: CloudProvider::Gcp, country_code: "US" },
    Exchange { id: "coinbase", name: "Coinbase", lat: 37.77, lon: -122.42, provider: CloudProvider::Aws, country_code: "US" },
];

pub static REGIONS: [CloudRegion; 6] = [
    CloudRegion { id: "aws-sg", provider: CloudProvider::Aws, lat: 1.28, lon: 103.85, region_code: "ap-southeast-1", server_count: 12, country_code: "SG" },
    CloudRegion { id: "gcp-nl", provider: CloudProvider::Gcp, lat: 52.37, lon: 4.89, region_code: "europe-west4", server_count: 8, country_code: "NL" },
    CloudRegion { id: "azure-sg", provider: CloudProvider::Azure, lat: 22.28, lon: 114.16, region_code: "southeastasia", server_count: 7, country_code: "HK" },
    CloudRegion { id: "aws-usw", provider: CloudProvider::Aws, lat: 47.61, lon: -122.33, region_code: "us-west-2", server_count: 15, country_code: "US" },
    CloudRegion { id: "gcp-usw", provider: CloudProvider::Gcp, lat: 37.77, lon: -122.42, region_code: "us-west2", server_count: 10, country_code: "US" },
    CloudRegion { id: "azure-eur", provider: CloudProvider::Azure, lat: 50.11, lon: 8.68, region_code: "germanywestcentral", server_count: 9, country_code: "DE" },
];

pub fn find_exchange(id: &str) -> Option<&'static Exchange> {
    EXCHANGES.iter().find(|e| e.id == id)
}

pub fn find_region(id: &str) -> Option<&'static CloudRegion> {
    REGIONS.iter().find(|r| r.id == id)
}

/// Resolve an exchange or region id to its projected globe point.
/// Unknown ids yield `Point3::ZERO`, which downstream arc construction
/// treats as "unresolved" and renders nothing for.
pub fn locate(id: &str) -> Point3 {
    if let Some(e) = find_exchange(id) {
        return geo::project(e.lat, e.lon, GLOBE_RADIUS, 1.0);
    }
    if let Some(r) = find_region(id) {
        return geo::project(r.lat, r.lon, GLOBE_RADIUS, 1.0);
    }
    Point3::ZERO
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::build_arc;

    #[test]
    fn known_ids_resolve_onto_the_globe() {
        for e in &EXCHANGES {
            let p = locate(e.id);
            assert!((p.length() - GLOBE_RADIUS).abs() < 1e-9, "{} off the shell", e.id);
        }
        for r in &REGIONS {
            let p = locate(r.id);
            assert!((p.length() - GLOBE_RADIUS).abs() < 1e-9, "{} off the shell", r.id);
        }
    }

    #[test]
    fn unknown_id_is_the_sentinel_and_kills_the_arc() {
        let ghost = locate("ftx");
        assert_eq!(ghost, Point3::ZERO);
        assert!(build_arc(ghost, locate("binance"), 30, GLOBE_RADIUS).is_empty());
    }

    #[test]
    fn ids_are_unique() {
        for (i, e) in EXCHANGES.iter().enumerate() {
            assert!(EXCHANGES.iter().skip(i + 1).all(|other| other.id != e.id));
            assert!(REGIONS.iter().all(|r| r.id != e.id));
        }
    }
}
