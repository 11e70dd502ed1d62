use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use bikeflow::{
    markers::Marker, Dataset, StationTraffic, TimeFilter, Traffic, TrafficEngine, TrafficView,
    MINUTES_PER_DAY,
};
use clap::{Parser, ValueEnum};
use serde::Serialize;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Table,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "bikeflow",
    version,
    about = "Bike-share station traffic by time of day",
    long_about = "Loads a station feed and a month of trips, then reports arrivals, \
                  departures and marker sizing per station. With --time the counts \
                  cover the two hours centred on that minute of the day."
)]
struct Args {
    /// Station feed JSON ({"data": {"stations": [...]}})
    #[arg(short, long)]
    stations: PathBuf,

    /// Trips CSV with start_station_id, end_station_id, started_at, ended_at
    #[arg(short, long)]
    trips: PathBuf,

    /// Slider position: "any", -1, a minute of the day, or HH:MM
    #[arg(long, default_value = "any", allow_hyphen_values = true)]
    time: TimeFilter,

    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Only show the N busiest stations
    #[arg(long)]
    top: Option<usize>,

    /// Walk the slider across the day in steps of this many minutes
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=1440))]
    sweep: Option<u16>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct Row<'a> {
    #[serde(flatten)]
    traffic: &'a StationTraffic,
    radius: f64,
    flow: f64,
}

#[derive(Serialize)]
struct Report<'a> {
    time: String,
    slider: i32,
    unattributed: Traffic,
    stations: Vec<Row<'a>>,
}

fn selected<'a>(view: &'a TrafficView, top: Option<usize>) -> Vec<&'a StationTraffic> {
    match top {
        Some(n) => view.busiest(n),
        None => view.stations.iter().collect(),
    }
}

fn print_table(view: &TrafficView, top: Option<usize>) {
    match view.filter.window() {
        Some(window) => println!(
            "Traffic around {} ({} to {})",
            view.filter,
            TimeFilter::Around(window.lo()),
            TimeFilter::Around(window.hi()),
        ),
        None => println!("Traffic at any time"),
    }

    println!(
        "{:<10} {:>7} {:>6} {:>6} {:>7} {:>5}  name",
        "id", "total", "dep", "arr", "radius", "flow"
    );
    for row in selected(view, top) {
        let marker = Marker::new(row, &view.scale);
        println!(
            "{:<10} {:>7} {:>6} {:>6} {:>7.2} {:>5.1}  {}",
            row.id(),
            row.traffic.total_traffic,
            row.traffic.departures,
            row.traffic.arrivals,
            marker.radius,
            marker.flow.value(),
            row.station.name.as_deref().unwrap_or("")
        );
    }

    if view.unattributed.total_traffic > 0 {
        println!(
            "{} trip ends at unknown stations ({} departures, {} arrivals)",
            view.unattributed.total_traffic,
            view.unattributed.departures,
            view.unattributed.arrivals
        );
    }
}

fn print_json(view: &TrafficView, top: Option<usize>) -> Result<()> {
    let stations = selected(view, top)
        .into_iter()
        .map(|traffic| {
            let marker = Marker::new(traffic, &view.scale);
            Row {
                traffic,
                radius: marker.radius,
                flow: marker.flow.value(),
            }
        })
        .collect();

    let report = Report {
        time: view.filter.label(),
        slider: view.filter.slider_value(),
        unattributed: view.unattributed,
        stations,
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize report")?
    );
    Ok(())
}

fn sweep(engine: &TrafficEngine, step: u16) {
    for minute in (0..MINUTES_PER_DAY as u16).step_by(step as usize) {
        let view = engine.view(TimeFilter::Around(minute));
        let total = view.total();
        let busiest = view
            .busiest(1)
            .first()
            .map(|row| format!("{} ({})", row.id(), row.traffic.total_traffic))
            .unwrap_or_default();

        println!(
            "{:>8}  {:>7} departures  {:>7} arrivals  busiest {}",
            view.filter.label(),
            total.departures,
            total.arrivals,
            busiest
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    let dataset = Dataset::open(&args.stations, &args.trips).with_context(|| {
        format!(
            "Failed to load {} and {}",
            args.stations.display(),
            args.trips.display()
        )
    })?;
    let engine = TrafficEngine::new(Arc::new(dataset));

    if let Some(step) = args.sweep {
        sweep(&engine, step);
        return Ok(());
    }

    let view = engine.view(args.time);
    match args.format {
        Format::Table => print_table(&view, args.top),
        Format::Json => print_json(&view, args.top)?,
    }

    Ok(())
}
