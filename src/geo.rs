//! Spherical geometry for the globe: lat/lon projection, curved
//! connection arcs, and great-circle distance.
//!
//! Everything here is pure and stateless; the renderer owns rotation,
//! tilt, and screen mapping.

use std::f64::consts::PI;

/// Nominal globe radius used by the dashboard.
pub const GLOBE_RADIUS: f64 = 100.0;

/// Mean Earth radius in kilometers (haversine).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point in globe space. No identity beyond its coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// Sentinel for an unresolved endpoint (unknown exchange/region id).
    pub const ZERO: Point3 = Point3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn dot(&self, other: &Point3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn scaled(&self, k: f64) -> Point3 {
        Point3::new(self.x * k, self.y * k, self.z * k)
    }

    fn lerp(a: &Point3, b: &Point3, t: f64) -> Point3 {
        Point3::new(
            a.x + (b.x - a.x) * t,
            a.y + (b.y - a.y) * t,
            a.z + (b.z - a.z) * t,
        )
    }
}

/// Project latitude/longitude onto a sphere of `radius`, lifted by the
/// `altitude` multiplier (1.0 = on the surface).
///
/// Axis convention: latitude becomes the polar angle `phi`, longitude is
/// offset by 180 degrees and the x axis negated. Marker placement and
/// arc endpoints must share this convention or connections detach from
/// their markers.
///
/// Inputs outside lat [-90, 90] / lon [-180, 180] are a caller bug: they
/// are handed to the trig functions unchanged (no clamping, no wrapping)
/// and trip a debug assertion.
pub fn project(lat: f64, lon: f64, radius: f64, altitude: f64) -> Point3 {
    debug_assert!((-90.0..=90.0).contains(&lat), "latitude out of range: {lat}");
    debug_assert!((-180.0..=180.0).contains(&lon), "longitude out of range: {lon}");

    let phi = (90.0 - lat).to_radians();
    let theta = (lon + 180.0).to_radians();
    let r = radius * altitude;

    Point3::new(
        -(r * phi.sin() * theta.cos()),
        r * phi.cos(),
        r * phi.sin() * theta.sin(),
    )
}

/// Build a curved arc between two projected points, bulging outward from
/// the sphere surface. Returns `segments + 1` points.
///
/// A zero-magnitude endpoint is the "unresolved" sentinel and yields an
/// empty arc; normalizing it would divide by zero. `segments == 0`
/// returns just the two endpoints re-projected onto `globe_radius`.
///
/// Both endpoints are rescaled onto `globe_radius` regardless of their
/// input magnitude, so arc feet stay pinned to the surface even when a
/// caller projected its markers with altitude != 1.
pub fn build_arc(start: Point3, end: Point3, segments: usize, globe_radius: f64) -> Vec<Point3> {
    let start_len = start.length();
    let end_len = end.length();
    if start_len == 0.0 || end_len == 0.0 {
        return Vec::new();
    }

    let start_dir = start.scaled(1.0 / start_len);
    let end_dir = end.scaled(1.0 / end_len);
    if segments == 0 {
        return vec![start_dir.scaled(globe_radius), end_dir.scaled(globe_radius)];
    }

    // Wider separations bulge more, clamped to [0.3, 1.0].
    let angle = (start.dot(&end) / (start_len * end_len)).clamp(-1.0, 1.0).acos();
    let curvature = 0.3 + (angle / PI).min(0.7);

    let mut points = Vec::with_capacity(segments + 1);
    let mut dir = start_dir;
    for i in 0..=segments {
        let t = i as f64 / segments as f64;

        // Lerp then normalize: a cheap slerp stand-in. The interpolant
        // only degenerates for antipodal endpoints at the midpoint, in
        // which case the previous direction carries over.
        let mid = Point3::lerp(&start, &end, t);
        let mid_len = mid.length();
        if mid_len > 1e-12 {
            dir = mid.scaled(1.0 / mid_len);
        }

        let height = globe_radius * (1.0 + curvature * 0.5 * (t * PI).sin());
        points.push(dir.scaled(height));
    }

    points
}

/// Great-circle distance in kilometers (haversine).
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGAPORE: (f64, f64) = (1.28, 103.85);
    const AMSTERDAM: (f64, f64) = (52.37, 4.89);

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected} +- {tol}, got {actual}"
        );
    }

    #[test]
    fn project_is_deterministic() {
        let a = project(SINGAPORE.0, SINGAPORE.1, 100.0, 1.0);
        let b = project(SINGAPORE.0, SINGAPORE.1, 100.0, 1.0);
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
        assert_eq!(a.z.to_bits(), b.z.to_bits());
    }

    #[test]
    fn projected_points_lie_on_the_scaled_shell() {
        for &(lat, lon) in &[
            (0.0, 0.0),
            (45.0, 45.0),
            (-33.9, 151.2),
            (90.0, 0.0),
            (-90.0, 180.0),
            SINGAPORE,
            AMSTERDAM,
        ] {
            for &(radius, altitude) in &[(100.0, 1.0), (100.0, 1.02), (1.0, 1.0), (6371.0, 0.5)] {
                let p = project(lat, lon, radius, altitude);
                let expected = radius * altitude;
                assert_close(p.length(), expected, expected * 1e-9);
            }
        }
    }

    #[test]
    fn project_known_landmarks() {
        // Equator / prime meridian sits on the +x axis under this
        // convention (theta = 180deg, negated x).
        let p = project(0.0, 0.0, 100.0, 1.0);
        assert_close(p.x, 100.0, 1e-9);
        assert_close(p.y, 0.0, 1e-9);
        assert_close(p.z, 0.0, 1e-9);

        let north_pole = project(90.0, 0.0, 100.0, 1.0);
        assert_close(north_pole.x, 0.0, 0.0);
        assert_eq!(north_pole.y, 100.0);
        assert_eq!(north_pole.z, 0.0);
    }

    #[test]
    fn arc_with_unresolved_endpoint_is_empty() {
        let p = project(10.0, 20.0, 100.0, 1.0);
        assert!(build_arc(Point3::ZERO, p, 30, 100.0).is_empty());
        assert!(build_arc(p, Point3::ZERO, 30, 100.0).is_empty());
        assert!(build_arc(Point3::ZERO, Point3::ZERO, 30, 100.0).is_empty());
    }

    #[test]
    fn arc_has_segments_plus_one_points() {
        let a = project(SINGAPORE.0, SINGAPORE.1, 100.0, 1.0);
        let b = project(AMSTERDAM.0, AMSTERDAM.1, 100.0, 1.0);
        for segments in [1, 2, 7, 30, 100] {
            assert_eq!(build_arc(a, b, segments, 100.0).len(), segments + 1);
        }
    }

    #[test]
    fn zero_segments_yields_both_endpoints() {
        let a = project(0.0, 0.0, 100.0, 1.0);
        let b = project(0.0, 90.0, 100.0, 1.0);
        let arc = build_arc(a, b, 0, 100.0);
        assert_eq!(arc.len(), 2);
        assert_close(arc[0].length(), 100.0, 1e-9);
        assert_close(arc[1].length(), 100.0, 1e-9);
    }

    #[test]
    fn arc_endpoints_sit_on_the_globe_in_the_input_directions() {
        let a = project(SINGAPORE.0, SINGAPORE.1, 100.0, 1.0);
        let b = project(AMSTERDAM.0, AMSTERDAM.1, 100.0, 1.0);
        let arc = build_arc(a, b, 30, 100.0);

        let first = arc[0];
        let last = arc[arc.len() - 1];
        assert_close(first.length(), 100.0, 1e-9);
        assert_close(last.length(), 100.0, 1e-9);

        // Direction check via normalized dot product.
        let cos_first = first.dot(&a) / (first.length() * a.length());
        let cos_last = last.dot(&b) / (last.length() * b.length());
        assert_close(cos_first, 1.0, 1e-9);
        assert_close(cos_last, 1.0, 1e-9);
    }

    #[test]
    fn arc_endpoints_are_rescaled_from_offset_inputs() {
        // Markers projected above the surface still produce arcs whose
        // feet sit on the nominal globe radius.
        let a = project(SINGAPORE.0, SINGAPORE.1, 100.0, 1.1);
        let b = project(AMSTERDAM.0, AMSTERDAM.1, 100.0, 1.1);
        let arc = build_arc(a, b, 10, 100.0);
        assert_close(arc[0].length(), 100.0, 1e-9);
        assert_close(arc[10].length(), 100.0, 1e-9);
    }

    #[test]
    fn arc_bulge_peaks_at_the_midpoint_and_is_symmetric() {
        let a = project(0.0, -60.0, 100.0, 1.0);
        let b = project(0.0, 60.0, 100.0, 1.0);
        let arc = build_arc(a, b, 30, 100.0);

        let peak = arc[15].length();
        for (i, p) in arc.iter().enumerate() {
            assert!(p.length() <= peak + 1e-9);
            // sin(t*pi) is symmetric around t = 0.5.
            assert_close(p.length(), arc[30 - i].length(), 1e-9);
        }
        assert!(peak > 100.0);
    }

    #[test]
    fn distance_is_zero_for_identical_points_and_symmetric() {
        assert_eq!(distance_km(SINGAPORE.0, SINGAPORE.1, SINGAPORE.0, SINGAPORE.1), 0.0);
        let there = distance_km(SINGAPORE.0, SINGAPORE.1, AMSTERDAM.0, AMSTERDAM.1);
        let back = distance_km(AMSTERDAM.0, AMSTERDAM.1, SINGAPORE.0, SINGAPORE.1);
        assert_close(there, back, 1e-9);
    }

    #[test]
    fn singapore_to_amsterdam_is_about_ten_and_a_half_thousand_km() {
        let km = distance_km(SINGAPORE.0, SINGAPORE.1, AMSTERDAM.0, AMSTERDAM.1);
        assert_close(km, 10_500.0, 10_500.0 * 0.02);
    }

    #[test]
    fn exchange_to_region_arc_stays_within_the_bulge_envelope() {
        // Binance (Singapore) to gcp europe-west4 (Amsterdam), the
        // longest built-in hop.
        let a = project(SINGAPORE.0, SINGAPORE.1, 100.0, 1.0);
        let b = project(AMSTERDAM.0, AMSTERDAM.1, 100.0, 1.0);
        let arc = build_arc(a, b, 30, 100.0);

        assert_eq!(arc.len(), 31);
        for p in &arc {
            let len = p.length();
            assert!(len >= 100.0 - 1e-9, "arc dipped below the surface: {len}");
            // curvature caps at 1.0, so 1.5x the radius bounds every arc
            assert!(len <= 150.0 + 1e-9, "arc left the envelope: {len}");
        }

        // This hop subtends ~1.648 rad, so curvature = 0.3 + 1.648/pi
        // and the midpoint peaks near 1.41x the radius.
        let angle = (a.dot(&b) / (a.length() * b.length())).clamp(-1.0, 1.0).acos();
        let expected_peak = 100.0 * (1.0 + (0.3 + angle / PI) * 0.5);
        assert_close(arc[15].length(), expected_peak, 1e-6);
    }
}
