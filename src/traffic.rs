use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use itertools::Itertools;
use log::debug;

use crate::{
    buckets::BucketIndex,
    data::{Station, StationTraffic, Traffic, Trip},
    dataset::Dataset,
    filter::TimeFilter,
    markers::Marker,
    scale::RadiusScale,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub stations: Vec<StationTraffic>,
    /// Trips whose station id matches no known station.
    pub unattributed: Traffic,
}

impl Aggregation {
    pub fn max_total(&self) -> u32 {
        self.stations
            .iter()
            .map(|row| row.traffic.total_traffic)
            .max()
            .unwrap_or(0)
    }
}

fn count(counts: &HashMap<&str, usize>, id: &str) -> u32 {
    counts.get(id).copied().unwrap_or(0) as u32
}

fn unknown_total(counts: &HashMap<&str, usize>, known: &HashSet<&str>) -> u32 {
    counts
        .iter()
        .filter(|(id, _)| !known.contains(*id))
        .map(|(_, &n)| n as u32)
        .sum()
}

/// Counts departures per start station and arrivals per end station, then
/// joins the counts onto `stations`. Builds a fresh set of rows on every call.
pub fn aggregate<'a>(
    stations: &[Arc<Station>],
    departures: impl IntoIterator<Item = &'a Trip>,
    arrivals: impl IntoIterator<Item = &'a Trip>,
) -> Aggregation {
    let departures = departures
        .into_iter()
        .map(|trip| trip.start_station_id.as_str())
        .counts();
    let arrivals = arrivals
        .into_iter()
        .map(|trip| trip.end_station_id.as_str())
        .counts();

    let rows = stations
        .iter()
        .map(|station| StationTraffic {
            station: Arc::clone(station),
            traffic: Traffic::new(count(&arrivals, &station.id), count(&departures, &station.id)),
        })
        .collect();

    let known: HashSet<&str> = stations.iter().map(|station| station.id.as_str()).collect();

    Aggregation {
        stations: rows,
        unattributed: Traffic::new(
            unknown_total(&arrivals, &known),
            unknown_total(&departures, &known),
        ),
    }
}

/// Session context: owns the bucket index for the lifetime of the loaded
/// dataset and answers one filter at a time.
#[derive(Debug)]
pub struct TrafficEngine {
    pub dataset: Arc<Dataset>,
    pub index: BucketIndex,
    /// Busiest station over the whole day; the radius domain for every view.
    pub all_time_max: u32,
}

impl TrafficEngine {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let index = BucketIndex::build(&dataset.trips);
        let mut engine = Self {
            dataset,
            index,
            all_time_max: 0,
        };
        engine.all_time_max = engine.aggregate(TimeFilter::AnyTime).max_total();

        debug!(
            "Indexed {} trips, busiest station sees {} trips",
            engine.dataset.trips.len(),
            engine.all_time_max
        );
        engine
    }

    pub fn aggregate(&self, filter: TimeFilter) -> Aggregation {
        aggregate(
            &self.dataset.stations,
            self.index.departures.query(filter).map(Arc::as_ref),
            self.index.arrivals.query(filter).map(Arc::as_ref),
        )
    }

    pub fn view(&self, filter: TimeFilter) -> TrafficView {
        let Aggregation {
            stations,
            unattributed,
        } = self.aggregate(filter);

        debug!(
            "Recomputed {} stations for {} ({} trips unattributed)",
            stations.len(),
            filter,
            unattributed.total_traffic
        );

        TrafficView {
            filter,
            stations,
            unattributed,
            scale: RadiusScale::for_filter(self.all_time_max, filter),
        }
    }
}

/// Station traffic under one filter, with the radius scale that goes with it.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficView {
    pub filter: TimeFilter,
    pub stations: Vec<StationTraffic>,
    pub unattributed: Traffic,
    pub scale: RadiusScale,
}

impl TrafficView {
    pub fn get(&self, id: &str) -> Option<&StationTraffic> {
        self.stations.iter().find(|row| row.id() == id)
    }

    pub fn total(&self) -> Traffic {
        let (arrivals, departures) = self
            .stations
            .iter()
            .fold((0, 0), |(arrivals, departures), row| {
                (arrivals + row.traffic.arrivals, departures + row.traffic.departures)
            });
        Traffic::new(arrivals, departures)
    }

    /// Busiest stations first; ties keep id order.
    pub fn busiest(&self, n: usize) -> Vec<&StationTraffic> {
        self.stations
            .iter()
            .sorted_by(|a, b| {
                b.traffic
                    .total_traffic
                    .cmp(&a.traffic.total_traffic)
                    .then_with(|| a.id().cmp(b.id()))
            })
            .take(n)
            .collect()
    }

    pub fn markers(&self) -> Vec<Marker> {
        self.stations
            .iter()
            .map(|row| Marker::new(row, &self.scale))
            .collect()
    }
}
