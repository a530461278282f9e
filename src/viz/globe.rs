//! Interactive latency globe: exchanges and cloud regions as markers,
//! animated latency arcs between them, stats panel with a sparkline.
//!
//! All geometry flows through `geo`: markers are projected with
//! `geo::project`, connections built with `geo::build_arc`, and the
//! resulting 3D points are yaw/tilt-rotated and mapped orthographically
//! onto a braille dot grid.

use super::VizState;
use crate::catalog::{EXCHANGES, REGIONS};
use crate::config::{GlobeConfig, TimeRange};
use crate::feed::LatencyFeed;
use crate::geo::{self, Point3, GLOBE_RADIUS};
use crate::model::{latency_color, latency_status, CloudProvider, HistoricalPoint, LatencyStats};
use crate::radar::RadarClient;
use crate::terminal::Terminal;
use chrono::Local;
use crossterm::event::KeyCode;
use crossterm::style::Color;
use rand::prelude::*;
use std::io;

const ARC_SEGMENTS: usize = 30;
const MAX_FLIGHT_ARCS: usize = 8;

// Dot layers, higher wins within a braille cell.
const DOT_GRID: u8 = 1;
const DOT_LAND: u8 = 2;
const DOT_ARC_LOW: u8 = 3;
const DOT_ARC_MED: u8 = 4;
const DOT_ARC_HIGH: u8 = 5;
const DOT_ARC_SELECTED: u8 = 6;

/// Coarse coastline loops (lat, lon in degrees), enough to make the
/// sphere readable at braille resolution.
const OUTLINES: &[&[(f64, f64)]] = &[
    // North America
    &[
        (70.0, -95.0), (60.0, -78.0), (50.0, -65.0), (45.0, -75.0), (40.0, -74.0),
        (30.0, -81.0), (25.0, -97.0), (18.0, -95.0), (8.0, -80.0), (20.0, -105.0),
        (33.0, -117.0), (48.0, -125.0), (60.0, -140.0), (65.0, -165.0), (71.0, -156.0),
        (70.0, -125.0),
    ],
    // South America
    &[
        (10.0, -75.0), (5.0, -52.0), (-8.0, -35.0), (-23.0, -42.0), (-35.0, -56.0),
        (-50.0, -68.0), (-54.0, -71.0), (-40.0, -73.0), (-18.0, -70.0), (-4.0, -81.0),
    ],
    // Europe
    &[
        (36.0, -6.0), (43.0, -9.0), (48.0, -5.0), (51.0, 2.0), (54.0, 8.0),
        (57.0, 8.0), (60.0, 5.0), (66.0, 13.0), (70.0, 25.0), (60.0, 28.0),
        (54.0, 20.0), (45.0, 13.0), (40.0, 18.0), (37.0, 23.0), (40.0, 26.0),
    ],
    // Africa
    &[
        (32.0, 31.0), (11.0, 43.0), (-2.0, 41.0), (-15.0, 40.0), (-26.0, 33.0),
        (-34.0, 20.0), (-17.0, 12.0), (-5.0, 10.0), (4.0, 9.0), (5.0, -8.0),
        (15.0, -17.0), (33.0, -7.0), (37.0, 10.0),
    ],
    // Asia
    &[
        (41.0, 29.0), (45.0, 37.0), (47.0, 48.0), (60.0, 60.0), (70.0, 70.0),
        (75.0, 100.0), (72.0, 130.0), (68.0, 160.0), (66.0, 178.0), (60.0, 163.0),
        (50.0, 156.0), (43.0, 135.0), (38.0, 128.0), (31.0, 122.0), (21.0, 110.0),
        (8.0, 105.0), (1.0, 104.0), (10.0, 98.0), (22.0, 91.0), (8.0, 77.0),
        (21.0, 72.0), (25.0, 60.0), (30.0, 49.0), (24.0, 53.0), (13.0, 45.0),
        (21.0, 39.0), (29.0, 35.0), (36.0, 36.0),
    ],
    // Australia
    &[
        (-12.0, 131.0), (-11.0, 142.0), (-17.0, 146.0), (-28.0, 154.0), (-38.0, 148.0),
        (-35.0, 138.0), (-32.0, 116.0), (-22.0, 114.0), (-14.0, 127.0),
    ],
    // Greenland
    &[
        (83.0, -33.0), (78.0, -20.0), (70.0, -22.0), (60.0, -43.0), (65.0, -53.0),
        (76.0, -68.0),
    ],
    // Japan
    &[(43.0, 141.0), (36.0, 140.0), (33.0, 131.0), (38.0, 137.0)],
    // UK
    &[(58.0, -4.0), (51.0, 1.0), (50.0, -5.0), (55.0, -5.0)],
];

/// Help text for the globe dashboard.
const HELP: &str = "\
LATENCY GLOBE
─────────────────
←/→    Rotate
↑/↓    Tilt
+/-    Zoom, 0 reset
e/c    Cycle exchange / region
a/g/z  Toggle AWS / GCP / Azure
t      Time range
d      Live/mock source
r      Refresh now
space  Pause";

/// An arc in flight between an exchange and a region.
struct FlightArc {
    from: &'static str,
    to: &'static str,
    latency_ms: f64,
    progress: f64,
}

fn provider_slot(provider: CloudProvider) -> usize {
    match provider {
        CloudProvider::Aws => 0,
        CloudProvider::Gcp => 1,
        CloudProvider::Azure => 2,
    }
}

fn arc_dot(latency_ms: f64) -> u8 {
    if latency_ms < 50.0 {
        DOT_ARC_LOW
    } else if latency_ms < 100.0 {
        DOT_ARC_MED
    } else {
        DOT_ARC_HIGH
    }
}

fn dot_style(code: u8) -> (Color, bool) {
    match code {
        DOT_GRID => (Color::DarkGrey, false),
        DOT_LAND => (Color::DarkGreen, false),
        DOT_ARC_LOW => (Color::Green, false),
        DOT_ARC_MED => (Color::Yellow, false),
        DOT_ARC_HIGH => (Color::Red, false),
        _ => (Color::Cyan, true),
    }
}

/// Run the latency globe dashboard.
pub fn run(term: &mut Terminal, config: &GlobeConfig) -> io::Result<()> {
    let mut state = VizState::new(config.time_step, HELP);
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // A forced-mock client carries no token, so an environment token
    // cannot flip the feed live behind the flag's back.
    let client = if config.force_mock {
        RadarClient::disconnected()
    } else {
        RadarClient::new(config.token.clone())
    };
    let mut feed = LatencyFeed::new(client, config.refresh_secs, config.seed);

    // Markers projected once; the view transform handles the rest.
    let exchange_points: Vec<Point3> = EXCHANGES
        .iter()
        .map(|e| geo::project(e.lat, e.lon, GLOBE_RADIUS, 1.0))
        .collect();
    let region_points: Vec<Point3> = REGIONS
        .iter()
        .map(|r| geo::project(r.lat, r.lon, GLOBE_RADIUS, 1.0))
        .collect();

    let mut yaw: f64 = 0.0;
    let mut tilt: f64 = config.tilt;
    let mut zoom: f64 = 1.0;
    let mut selected_exchange: Option<usize> = None;
    let mut selected_region: Option<usize> = None;
    let mut visible = [true; 3];
    let mut range = TimeRange::Day;
    let mut history: Option<(Vec<HistoricalPoint>, Option<LatencyStats>)> = None;
    let mut history_dirty = true;
    let mut arcs: Vec<FlightArc> = Vec::new();
    let mut frame: usize = 0;

    let (init_w, init_h) = term.size();
    let mut prev_w = init_w;
    let mut prev_h = init_h;
    let mut braille_w = init_w as usize * 2;
    let mut braille_h = init_h as usize * 4;
    let mut dots: Vec<Vec<u8>> = vec![vec![0; braille_w]; braille_h];

    loop {
        let (width, height) = crossterm::terminal::size().unwrap_or(term.size());
        if width != prev_w || height != prev_h {
            term.resize(width, height);
            term.clear_screen()?;
            prev_w = width;
            prev_h = height;
            braille_w = width as usize * 2;
            braille_h = height as usize * 4;
            dots = vec![vec![0; braille_w]; braille_h];
        }

        if let Some((code, mods)) = term.check_key()? {
            if state.handle_key(code, mods) {
                break;
            }
            match code {
                KeyCode::Left => yaw -= 0.1,
                KeyCode::Right => yaw += 0.1,
                KeyCode::Up => tilt = (tilt + 0.05).min(std::f64::consts::FRAC_PI_2),
                KeyCode::Down => tilt = (tilt - 0.05).max(-std::f64::consts::FRAC_PI_2),
                KeyCode::Char('+') | KeyCode::Char('=') => zoom = (zoom * 1.2).min(3.0),
                KeyCode::Char('-') | KeyCode::Char('_') => zoom = (zoom / 1.2).max(0.3),
                KeyCode::Char('0') => zoom = 1.0,
                KeyCode::Char('e') => {
                    selected_exchange = cycle(selected_exchange, EXCHANGES.len());
                    history_dirty = true;
                }
                KeyCode::Char('c') => {
                    selected_region = cycle(selected_region, REGIONS.len());
                    history_dirty = true;
                }
                KeyCode::Char('a') => visible[0] = !visible[0],
                KeyCode::Char('g') => visible[1] = !visible[1],
                KeyCode::Char('z') => visible[2] = !visible[2],
                KeyCode::Char('t') => {
                    range = range.next();
                    history_dirty = true;
                }
                KeyCode::Char('d') => {
                    feed.toggle_source();
                    history_dirty = true;
                }
                KeyCode::Char('r') => {
                    feed.refresh();
                    history_dirty = true;
                }
                _ => {}
            }
        }

        if !state.paused {
            yaw += 0.15 * state.speed as f64;
            if feed.maybe_refresh() {
                history_dirty = true;
            }
        }

        if history_dirty {
            history = match (selected_exchange, selected_region) {
                (Some(e), Some(r)) => {
                    let (series, stats) = feed.historical(EXCHANGES[e].id, REGIONS[r].id, range);
                    Some((series, stats))
                }
                _ => None,
            };
            history_dirty = false;
        }

        for row in &mut dots {
            for cell in row {
                *cell = 0;
            }
        }

        let w = width as f64;
        let h = height as f64;
        let half_w = w / 2.0;
        let half_h = h / 2.0;
        let radius_cells = (h * 1.8).min(w * 0.8) * 0.4 * zoom;
        let scale = radius_cells / GLOBE_RADIUS;

        let (sin_yaw, cos_yaw) = yaw.sin_cos();
        let (sin_tilt, cos_tilt) = tilt.sin_cos();

        // Yaw about y, tilt about x, orthographic drop of depth. Points
        // on the far hemisphere are culled.
        let to_screen = |p: Point3| -> Option<(i32, i32)> {
            let x1 = p.x * cos_yaw + p.z * sin_yaw;
            let z1 = -p.x * sin_yaw + p.z * cos_yaw;
            let y2 = p.y * cos_tilt - z1 * sin_tilt;
            let z2 = p.y * sin_tilt + z1 * cos_tilt;

            if z2 < -GLOBE_RADIUS * 0.05 {
                return None;
            }

            let sx = half_w + x1 * scale;
            let sy = half_h - y2 * scale * 0.5;
            Some(((sx * 2.0) as i32, (sy * 4.0) as i32))
        };

        let stamp = |dots: &mut Vec<Vec<u8>>, bx: i32, by: i32, code: u8| {
            if bx >= 0 && bx < braille_w as i32 && by >= 0 && by < braille_h as i32 {
                let cell = &mut dots[by as usize][bx as usize];
                *cell = (*cell).max(code);
            }
        };

        // Graticule
        for lat_deg in (-60..=60).step_by(30) {
            for lon_deg in (-180..180).step_by(2) {
                let p = geo::project(lat_deg as f64, lon_deg as f64, GLOBE_RADIUS, 1.0);
                if let Some((bx, by)) = to_screen(p) {
                    stamp(&mut dots, bx, by, DOT_GRID);
                }
            }
        }
        for lon_deg in (-180..180).step_by(30) {
            for lat_deg in (-88..=88).step_by(2) {
                let p = geo::project(lat_deg as f64, lon_deg as f64, GLOBE_RADIUS, 1.0);
                if let Some((bx, by)) = to_screen(p) {
                    stamp(&mut dots, bx, by, DOT_GRID);
                }
            }
        }

        // Coastlines
        for outline in OUTLINES {
            for i in 0..outline.len() {
                let (lat1, lon1) = outline[i];
                let (lat2, lon2) = outline[(i + 1) % outline.len()];
                for step in 0..12 {
                    let t = step as f64 / 12.0;
                    let lat = lat1 + (lat2 - lat1) * t;
                    let lon = lon1 + (lon2 - lon1) * t;
                    let p = geo::project(lat, lon, GLOBE_RADIUS, 1.0);
                    if let Some((bx, by)) = to_screen(p) {
                        stamp(&mut dots, bx, by, DOT_LAND);
                    }
                }
            }
        }

        // Spawn arcs between visible pairs.
        let pair_visible = |from: &str, to: &str| -> bool {
            let e = EXCHANGES.iter().find(|e| e.id == from);
            let r = REGIONS.iter().find(|r| r.id == to);
            match (e, r) {
                (Some(e), Some(r)) => {
                    visible[provider_slot(e.provider)] && visible[provider_slot(r.provider)]
                }
                _ => false,
            }
        };
        if !state.paused && arcs.len() < MAX_FLIGHT_ARCS && rng.gen_bool(0.12) {
            let candidates: Vec<_> = feed
                .samples()
                .iter()
                .filter(|s| pair_visible(s.from, s.to))
                .collect();
            if !candidates.is_empty() {
                let sample = candidates[rng.gen_range(0..candidates.len())];
                arcs.push(FlightArc {
                    from: sample.from,
                    to: sample.to,
                    latency_ms: sample.latency_ms,
                    progress: 0.0,
                });
            }
        }

        // Animated arcs, head advancing with progress.
        let mut kept = Vec::new();
        for mut arc in arcs {
            if !state.paused {
                arc.progress += state.speed as f64 * 1.5;
            }
            if arc.progress < 1.0 && pair_visible(arc.from, arc.to) {
                let start = crate::catalog::locate(arc.from);
                let end = crate::catalog::locate(arc.to);
                let path = geo::build_arc(start, end, ARC_SEGMENTS, GLOBE_RADIUS);
                let head = ((arc.progress * ARC_SEGMENTS as f64) as usize).min(ARC_SEGMENTS);
                for p in path.iter().take(head + 1) {
                    if let Some((bx, by)) = to_screen(*p) {
                        stamp(&mut dots, bx, by, arc_dot(arc.latency_ms));
                    }
                }
                kept.push(arc);
            }
        }
        arcs = kept;

        // Selected pair gets a full, highlighted arc.
        if let (Some(e), Some(r)) = (selected_exchange, selected_region) {
            let path = geo::build_arc(exchange_points[e], region_points[r], ARC_SEGMENTS, GLOBE_RADIUS);
            for p in &path {
                if let Some((bx, by)) = to_screen(*p) {
                    stamp(&mut dots, bx, by, DOT_ARC_SELECTED);
                }
            }
        }

        // Collapse the dot grid into braille cells.
        term.clear();
        for cy in 0..height as usize {
            let by = cy * 4;
            if by + 3 >= braille_h {
                continue;
            }
            for cx in 0..width as usize {
                let bx = cx * 2;
                if bx + 1 >= braille_w {
                    continue;
                }

                let positions = [
                    (by, bx), (by + 1, bx), (by + 2, bx),
                    (by, bx + 1), (by + 1, bx + 1), (by + 2, bx + 1),
                    (by + 3, bx), (by + 3, bx + 1),
                ];
                let dot_bits = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80];

                let mut bits: u8 = 0;
                let mut top: u8 = 0;
                for (i, &(py, px)) in positions.iter().enumerate() {
                    let val = dots[py][px];
                    if val > 0 {
                        bits |= dot_bits[i];
                        top = top.max(val);
                    }
                }

                if bits > 0 {
                    let ch = char::from_u32(0x2800 + bits as u32).unwrap_or(' ');
                    let (color, bold) = dot_style(top);
                    term.set(cx as i32, cy as i32, ch, Some(color), bold);
                }
            }
        }

        // Marker overlays on top of the braille layer.
        for (i, exchange) in EXCHANGES.iter().enumerate() {
            if !visible[provider_slot(exchange.provider)] {
                continue;
            }
            if let Some((bx, by)) = to_screen(exchange_points[i]) {
                let selected = selected_exchange == Some(i);
                let ch = if selected && frame % 10 < 5 { '◇' } else { '◆' };
                term.set(bx / 2, by / 4, ch, Some(exchange.provider.color()), selected);
                if selected {
                    term.set_str(bx / 2 + 2, by / 4, exchange.name, Some(exchange.provider.color()), true);
                }
            }
        }
        for (i, region) in REGIONS.iter().enumerate() {
            if !visible[provider_slot(region.provider)] {
                continue;
            }
            if let Some((bx, by)) = to_screen(region_points[i]) {
                let selected = selected_region == Some(i);
                term.set(bx / 2, by / 4, '■', Some(region.provider.color()), selected);
                if selected {
                    term.set_str(bx / 2 + 2, by / 4, region.region_code, Some(region.provider.color()), true);
                }
            }
        }

        draw_panel(
            term,
            &feed,
            selected_exchange,
            selected_region,
            &history,
            range,
            &visible,
            width,
            height,
        );

        state.render_help(term, width, height);
        term.present()?;
        term.sleep(state.speed);
        frame = frame.wrapping_add(1);
    }

    Ok(())
}

/// None -> Some(0) -> ... -> Some(len-1) -> None.
fn cycle(current: Option<usize>, len: usize) -> Option<usize> {
    match current {
        None => Some(0),
        Some(i) if i + 1 < len => Some(i + 1),
        Some(_) => None,
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_panel(
    term: &mut Terminal,
    feed: &LatencyFeed,
    selected_exchange: Option<usize>,
    selected_region: Option<usize>,
    history: &Option<(Vec<HistoricalPoint>, Option<LatencyStats>)>,
    range: TimeRange,
    visible: &[bool; 3],
    width: u16,
    height: u16,
) {
    let source = if feed.is_live() { "LIVE" } else { "MOCK" };
    let header = format!(
        "LATENCY GLOBE  [{}]  {}",
        source,
        Local::now().format("%H:%M:%S")
    );
    term.set_str(2, 0, &header, Some(Color::White), true);

    // Provider legend, dimmed when toggled off.
    let mut x = 2;
    for provider in CloudProvider::ALL {
        let on = visible[provider_slot(provider)];
        let color = if on { provider.color() } else { Color::DarkGrey };
        let entry = format!("■ {}", provider.display_name());
        term.set_str(x, 1, &entry, Some(color), false);
        x += entry.chars().count() as i32 + 3;
    }

    match (selected_exchange, selected_region) {
        (Some(e), Some(r)) => {
            let exchange = &EXCHANGES[e];
            let region = &REGIONS[r];
            let pair = format!(
                "{} → {} ({})",
                exchange.name, region.region_code, region.provider.display_name()
            );
            term.set_str(2, 3, &pair, Some(Color::Cyan), true);

            if let Some(sample) = feed.sample(exchange.id, region.id) {
                let current = format!(
                    "{:.1} ms  {}",
                    sample.latency_ms,
                    latency_status(sample.latency_ms)
                );
                term.set_str(2, 4, &current, Some(latency_color(sample.latency_ms)), true);
            }

            if let Some((series, stats)) = history {
                if let Some(stats) = stats {
                    let line = format!(
                        "min {:.1}  avg {:.1}  max {:.1}  [{}]",
                        stats.min,
                        stats.avg,
                        stats.max,
                        range.label()
                    );
                    term.set_str(2, 5, &line, Some(Color::Grey), false);
                }
                draw_sparkline(term, series, 2, 6, (width as usize / 3).clamp(16, 60));
            }
        }
        _ => {
            term.set_str(2, 3, "e/c to select a pair", Some(Color::DarkGrey), false);
        }
    }

    let hint = "e/c pair  a/g/z providers  t range  d source  r refresh";
    term.set_str(2, height as i32 - 1, hint, Some(Color::DarkGrey), false);
}

/// Block-character sparkline, newest point rightmost, colored by band.
fn draw_sparkline(term: &mut Terminal, series: &[HistoricalPoint], x: i32, y: i32, width: usize) {
    if series.is_empty() {
        return;
    }
    const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

    let shown = &series[series.len().saturating_sub(width)..];
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for p in shown {
        min = min.min(p.latency_ms);
        max = max.max(p.latency_ms);
    }
    let span = (max - min).max(f64::EPSILON);

    for (i, p) in shown.iter().enumerate() {
        let level = (((p.latency_ms - min) / span) * 7.0).round() as usize;
        let ch = BLOCKS[level.min(7)];
        term.set(x + i as i32, y, ch, Some(latency_color(p.latency_ms)), false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_walks_through_and_wraps_to_none() {
        let mut sel = None;
        let mut seen = Vec::new();
        for _ in 0..4 {
            sel = cycle(sel, 3);
            seen.push(sel);
        }
        assert_eq!(seen, [Some(0), Some(1), Some(2), None]);
    }

    #[test]
    fn arc_dots_follow_latency_bands() {
        assert_eq!(arc_dot(10.0), DOT_ARC_LOW);
        assert_eq!(arc_dot(75.0), DOT_ARC_MED);
        assert_eq!(arc_dot(150.0), DOT_ARC_HIGH);
    }

    #[test]
    fn outlines_stay_in_projectable_range() {
        for outline in OUTLINES {
            for &(lat, lon) in *outline {
                assert!((-90.0..=90.0).contains(&lat));
                assert!((-180.0..=180.0).contains(&lon));
            }
        }
    }
}
