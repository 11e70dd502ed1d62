use std::sync::Arc;

use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;

pub type Minute = u16;

pub const MINUTES_PER_DAY: usize = 24 * 60;

/// Minute of the day in `[0, 1439]`. Seconds are floored away, so 09:00:59
/// lands in the same bucket as 09:00:00.
pub fn minute_of_day(timestamp: &NaiveDateTime) -> Minute {
    (timestamp.hour() * 60 + timestamp.minute()) as Minute
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Trip {
    pub start_station_id: String,
    pub end_station_id: String,
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,
}

impl Trip {
    pub fn departure_minute(&self) -> Minute {
        minute_of_day(&self.started_at)
    }

    pub fn arrival_minute(&self) -> Minute {
        minute_of_day(&self.ended_at)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Traffic {
    pub arrivals: u32,
    pub departures: u32,
    pub total_traffic: u32,
}

impl Traffic {
    pub fn new(arrivals: u32, departures: u32) -> Self {
        Self {
            arrivals,
            departures,
            total_traffic: arrivals + departures,
        }
    }

    /// Share of the traffic that leaves the station. A station without any
    /// traffic counts as balanced.
    pub fn departure_ratio(&self) -> f64 {
        if self.total_traffic == 0 {
            return 0.5;
        }

        (self.departures as f64 / self.total_traffic as f64).clamp(0.0, 1.0)
    }
}

/// One row of a recomputed view: the station and the traffic it saw under
/// the active filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationTraffic {
    #[serde(flatten)]
    pub station: Arc<Station>,
    #[serde(flatten)]
    pub traffic: Traffic,
}

impl StationTraffic {
    pub fn id(&self) -> &str {
        &self.station.id
    }
}
