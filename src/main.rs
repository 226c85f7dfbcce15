mod catalog;
mod config;
mod coords;
mod observer;
mod visibility;
mod web;

use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::catalog::{Catalog, Satellite};
use crate::config::{parse_duration, parse_timestamp, Config, ConfigError, WindowOverride};
use crate::coords::EquatorialPosition;
use crate::observer::GroundStation;
use crate::visibility::{sweep, PointingMode, StepEvent, TopocentricSample, VisibilityScanner};

#[derive(Parser)]
#[command(name = "sategazer")]
#[command(about = "Satellite field-of-view visibility checks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the timesteps at which a satellite is inside the field of view
    Scan {
        /// Observer configuration file
        #[arg(long)]
        config: String,
        /// Satellite name as it appears in the catalog
        #[arg(long)]
        satellite: String,
        /// Window start, overrides the configured one
        #[arg(long)]
        start: Option<String>,
        /// Window end, overrides the configured one
        #[arg(long)]
        end: Option<String>,
        /// Step such as 30s or 5m, overrides the configured one
        #[arg(long)]
        step: Option<String>,
        /// absolute or relative
        #[arg(long, default_value = "absolute")]
        mode: String,
        /// Relative-mode reference: pointing, site:<lat>,<lon>[,<alt>] or RA/Dec
        #[arg(long)]
        reference: Option<String>,
        /// Print every evaluated step, not only those in the field of view
        #[arg(long)]
        all: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List catalog satellites near an RA/Dec pointing centre
    Sweep {
        /// Observer configuration file (station and catalog)
        #[arg(long)]
        config: String,
        /// Pointing centre, e.g. "05:35:17 -05:23:28" or "83.82 -5.39"
        #[arg(short = 'c', long)]
        coords: String,
        /// Full field-of-view width, degrees
        #[arg(short = 'f', long)]
        fov: f64,
        /// Observation start, defaults to now
        #[arg(short = 't', long)]
        obstime: Option<String>,
        /// Integration time, hours
        #[arg(short = 'i', long, default_value_t = 0.0)]
        integration: f64,
        #[arg(long, default_value = "1m")]
        step: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate an observer configuration file and load its catalog
    Validate {
        #[arg(long)]
        config: String,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(long)]
        config: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            config,
            satellite,
            start,
            end,
            step,
            mode,
            reference,
            all,
            json,
        } => {
            let args = ScanArgs {
                start,
                end,
                step,
                mode,
                reference,
                all,
                json,
            };
            scan(&config, &satellite, args).await
        }
        Commands::Sweep {
            config,
            coords,
            fov,
            obstime,
            integration,
            step,
            json,
        } => {
            let args = SweepArgs {
                coords,
                fov,
                obstime,
                integration,
                step,
                json,
            };
            sweep_catalog(&config, args).await
        }
        Commands::Validate { config } => validate(&config).await,
        Commands::Serve { config } => serve(&config).await,
    }
}

struct ScanArgs {
    start: Option<String>,
    end: Option<String>,
    step: Option<String>,
    mode: String,
    reference: Option<String>,
    all: bool,
    json: bool,
}

struct SweepArgs {
    coords: String,
    fov: f64,
    obstime: Option<String>,
    integration: f64,
    step: String,
    json: bool,
}

fn load_config(path: &str) -> Option<Config> {
    match Config::from_file(path) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("Error reading config {}: {}", path, e);
            None
        }
    }
}

async fn load_catalog(config: &Config) -> Option<Catalog> {
    let source = match config.catalog_source() {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Invalid catalog config: {}", e);
            return None;
        }
    };
    match source.load().await {
        Ok(catalog) => Some(catalog),
        Err(e) => {
            eprintln!("Failed to load catalog from {}: {}", source, e);
            None
        }
    }
}

async fn scan(path: &str, satellite: &str, args: ScanArgs) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };

    let overrides = match window_override(&args) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Invalid window: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let observer = match config.observer(&overrides) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Invalid observer: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let mode = match PointingMode::parse(&args.mode, args.reference.as_deref()) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Invalid mode: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let Some(catalog) = load_catalog(&config).await else {
        return ExitCode::FAILURE;
    };

    let scanner = VisibilityScanner::new(&catalog, mode);
    let mut events: Vec<StepEvent> = Vec::new();
    let result = scanner.scan_with(&observer, &Satellite::new(satellite), |event| {
        if args.all {
            events.push(*event);
        }
    });
    let windows = match result {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Scan failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        return print_json(&windows);
    }

    if let Some(name) = observer.name() {
        println!("Observer: {}", name);
    }
    println!(
        "{}: {} of {} steps in field of view ({})",
        satellite,
        windows.len(),
        observer.window().len(),
        scanner.mode().policy()
    );
    if args.all {
        for e in &events {
            let status = if e.in_fov { "in" } else { "out" };
            match e.offset {
                Some(o) => print_sample(
                    &e.sample,
                    &format!(
                        "#{} {} (d_alt {:.2}, d_az {:.2})",
                        e.index, status, o.altitude_deg, o.azimuth_deg
                    ),
                ),
                None => print_sample(&e.sample, &format!("#{} {}", e.index, status)),
            }
        }
    } else {
        for w in &windows {
            print_sample(&w.sample, "in");
        }
    }
    ExitCode::SUCCESS
}

fn print_sample(sample: &TopocentricSample, status: &str) {
    println!(
        "  {}  alt {:7.2}  az {:7.2}  range {:9.1} km  {}",
        sample.timestamp.format("%Y-%m-%d %H:%M:%S"),
        sample.altitude_deg,
        sample.azimuth_deg,
        sample.range_km,
        status
    );
}

fn window_override(args: &ScanArgs) -> Result<WindowOverride, ConfigError> {
    Ok(WindowOverride {
        start: args.start.as_deref().map(parse_timestamp).transpose()?,
        end: args.end.as_deref().map(parse_timestamp).transpose()?,
        step: args.step.as_deref().map(parse_duration).transpose()?,
    })
}

async fn sweep_catalog(path: &str, args: SweepArgs) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };
    let station = match config.station() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Invalid station: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let centre = match EquatorialPosition::parse(&args.coords) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid coordinates: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let timestamps = match sweep_times(&args) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Invalid time range: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let Some(catalog) = load_catalog(&config).await else {
        return ExitCode::FAILURE;
    };

    if !args.json {
        println!("Pointing centre: {}", centre);
    }

    let mut reports = Vec::with_capacity(timestamps.len());
    for timestamp in timestamps {
        match sweep(&catalog, &station, &centre, args.fov, timestamp) {
            Ok(report) => reports.push(report),
            Err(e) => {
                eprintln!("Sweep failed: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    if args.json {
        return print_json(&reports);
    }

    let mut hits = 0;
    for report in &reports {
        for s in report.in_fov() {
            hits += 1;
            println!(
                "  {}  {:<24} ({:>5})  {}  sep {:6.3} deg",
                report.timestamp.format("%Y-%m-%d %H:%M:%S"),
                s.satellite,
                s.norad_id,
                s.position,
                s.separation_deg
            );
        }
    }
    if hits == 0 {
        println!("No satellites within {} deg of the pointing centre", args.fov / 2.0);
    }
    ExitCode::SUCCESS
}

/// Observation start plus every step up to the integration time.
fn sweep_times(args: &SweepArgs) -> Result<Vec<DateTime<Utc>>, ConfigError> {
    let start = match &args.obstime {
        Some(s) => parse_timestamp(s)?,
        None => Utc::now(),
    };
    let hours = args.integration;
    if !hours.is_finite() || hours < 0.0 {
        return Err(ConfigError::Integration(format!("{} h", hours)));
    }
    if hours == 0.0 {
        return Ok(vec![start]);
    }
    let step = parse_duration(&args.step)?;
    let end = Duration::try_milliseconds((hours * 3_600_000.0) as i64)
        .and_then(|span| start.checked_add_signed(span))
        .ok_or_else(|| {
            ConfigError::Integration(format!("{} h from {} is out of range", hours, start))
        })?;
    let window = observer::TimeWindow::new(start, end, step)?;
    Ok(window.timestamps().collect())
}

async fn validate(path: &str) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };

    let station: GroundStation = match config.station() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Invalid station: {}", e);
            return ExitCode::FAILURE;
        }
    };
    println!(
        "Station: lat {:.5}  lon {:.5}  alt {:.0} m",
        station.latitude_deg, station.longitude_deg, station.altitude_m
    );
    println!(
        "Field of view: +/-{} deg azimuth, +/-{} deg elevation",
        config.fov.azimuth_half_width_deg, config.fov.elevation_half_width_deg
    );

    match config.observer(&WindowOverride::default()) {
        Ok(observer) => {
            let window = observer.window();
            println!(
                "Window: {} to {} every {} ({} steps)",
                window.start(),
                window.end(),
                window.step(),
                window.len()
            );
        }
        Err(ConfigError::Invalid(observer::ConfigurationError::MissingTimeWindow)) => {
            println!("Window: none configured (supply one per request)");
        }
        Err(e) => {
            eprintln!("Invalid observer: {}", e);
            return ExitCode::FAILURE;
        }
    }

    match config.catalog_source() {
        Ok(source) => println!("Catalog: {}", source),
        Err(e) => {
            eprintln!("Invalid catalog config: {}", e);
            return ExitCode::FAILURE;
        }
    }
    let Some(catalog) = load_catalog(&config).await else {
        return ExitCode::FAILURE;
    };
    println!("Catalog loaded ({} satellites)", catalog.len());

    println!("Config is valid");
    ExitCode::SUCCESS
}

async fn serve(path: &str) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };
    let Some(catalog) = load_catalog(&config).await else {
        return ExitCode::FAILURE;
    };

    match web::run_server(config, catalog).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(s) => {
            println!("{}", s);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to encode JSON: {}", e);
            ExitCode::FAILURE
        }
    }
}
