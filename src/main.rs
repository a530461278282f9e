mod catalog;
mod config;
mod feed;
mod geo;
mod help;
mod model;
mod radar;
mod settings;
mod terminal;
mod viz;

use clap::{Parser, Subcommand};
use config::GlobeConfig;
use settings::Settings;
use std::io;
use terminal::Terminal;

#[derive(Parser)]
#[command(name = "latglobe")]
#[command(version = "0.2.0")]
#[command(about = "Terminal globe of crypto exchange to cloud region latency", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive latency globe dashboard
    Globe {
        /// Animation step delay in seconds
        #[arg(short, long, default_value = "0.03")]
        time: f32,

        /// Latency poll interval in seconds
        #[arg(short, long)]
        refresh: Option<u64>,

        /// Random seed for reproducible mock data
        #[arg(short, long)]
        seed: Option<u64>,

        /// Initial camera tilt in radians
        #[arg(long, default_value = "0.4", allow_negative_numbers = true)]
        tilt: f64,

        /// Force the distance-based mock model even with a token
        #[arg(long)]
        mock: bool,

        /// Cloudflare Radar API token (overrides config/env)
        #[arg(long)]
        token: Option<String>,
    },

    /// Print the latency table for every exchange/region pair
    Pairs {
        /// Random seed for reproducible mock data
        #[arg(short, long)]
        seed: Option<u64>,

        /// Force the distance-based mock model even with a token
        #[arg(long)]
        mock: bool,
    },

    /// Great-circle distance and modeled latency between two endpoints
    Distance {
        /// Exchange or region id (e.g. binance, gcp-nl)
        from: String,

        /// Exchange or region id
        to: String,
    },
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load();

    match cli.command {
        Commands::Globe {
            time,
            refresh,
            seed,
            tilt,
            mock,
            token,
        } => {
            let config = GlobeConfig {
                time_step: time,
                refresh_secs: refresh
                    .or(settings.radar.refresh_secs)
                    .unwrap_or(10)
                    .max(1),
                seed,
                tilt,
                force_mock: mock,
                token: token.or(settings.radar.api_token),
            };
            let mut term = Terminal::new()?;
            viz::globe::run(&mut term, &config)?;
        }
        Commands::Pairs { seed, mock } => {
            print_pairs(settings.radar.api_token, mock, seed);
        }
        Commands::Distance { from, to } => {
            if let Err(message) = print_distance(&from, &to) {
                eprintln!("{message}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn print_pairs(token: Option<String>, mock: bool, seed: Option<u64>) {
    // Forced mock must not pick up an environment token.
    let client = if mock {
        radar::RadarClient::disconnected()
    } else {
        radar::RadarClient::new(token)
    };
    let mut feed = feed::LatencyFeed::new(client, 10, seed);
    feed.refresh();

    let source = if feed.is_live() { "live" } else { "mock" };
    println!(
        "latency ({source}) at {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!("{:<10} {:<22} {:>9}  {}", "exchange", "region", "latency", "status");

    for sample in feed.samples() {
        let region = catalog::find_region(sample.to);
        let region_code = region.map(|r| r.region_code).unwrap_or(sample.to);
        println!(
            "{:<10} {:<22} {:>7.1}ms  {}",
            sample.from,
            region_code,
            sample.latency_ms,
            model::latency_status(sample.latency_ms)
        );
    }
}

fn print_distance(from: &str, to: &str) -> Result<(), String> {
    let resolve = |id: &str| -> Result<(f64, f64, String), String> {
        if let Some(e) = catalog::find_exchange(id) {
            return Ok((e.lat, e.lon, format!("{} ({})", e.name, e.country_code)));
        }
        if let Some(r) = catalog::find_region(id) {
            return Ok((r.lat, r.lon, format!("{} ({})", r.region_code, r.country_code)));
        }
        Err(format!("unknown endpoint '{id}': expected an exchange or region id"))
    };

    let (lat1, lon1, from_name) = resolve(from)?;
    let (lat2, lon2, to_name) = resolve(to)?;

    let km = geo::distance_km(lat1, lon1, lat2, lon2);
    println!("{from_name} → {to_name}");
    println!("distance: {km:.0} km");
    println!("modeled latency: {:.1} ms", feed::modeled_latency_ms(km));
    Ok(())
}
