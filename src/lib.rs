//! Time-windowed traffic for bike-share stations.
//!
//! Trips are bucketed by minute of day once at load. Each slider position then
//! reads only the 120 buckets around the selected minute and recomputes
//! arrivals, departures and marker sizes per station.

pub mod bluebikes;
pub mod buckets;
pub mod data;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod markers;
pub mod scale;
pub mod traffic;
pub mod trips;
pub mod window;

pub use data::{Minute, Station, StationTraffic, Traffic, Trip, MINUTES_PER_DAY};
pub use dataset::Dataset;
pub use filter::TimeFilter;
pub use traffic::{TrafficEngine, TrafficView};
