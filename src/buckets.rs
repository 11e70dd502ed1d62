use std::sync::Arc;

use crate::data::{Minute, Trip, MINUTES_PER_DAY};

/// One list of trips per minute of the day.
#[derive(Debug, Clone)]
pub struct MinuteBuckets {
    pub(crate) buckets: Vec<Vec<Arc<Trip>>>,
}

impl Default for MinuteBuckets {
    fn default() -> Self {
        Self {
            buckets: vec![Vec::new(); MINUTES_PER_DAY],
        }
    }
}

impl MinuteBuckets {
    pub fn build(trips: &[Arc<Trip>], minute: impl Fn(&Trip) -> Minute) -> Self {
        let mut buckets = Self::default();
        for trip in trips {
            buckets.push(minute(trip), trip);
        }
        buckets
    }

    fn push(&mut self, minute: Minute, trip: &Arc<Trip>) {
        self.buckets[minute as usize].push(Arc::clone(trip));
    }

    pub fn bucket(&self, minute: Minute) -> &[Arc<Trip>] {
        &self.buckets[minute as usize]
    }

    pub fn trip_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}

/// Departures keyed by the minute a trip started, arrivals by the minute it
/// ended. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct BucketIndex {
    pub departures: MinuteBuckets,
    pub arrivals: MinuteBuckets,
}

impl BucketIndex {
    pub fn build(trips: &[Arc<Trip>]) -> Self {
        let mut index = Self::default();
        for trip in trips {
            index.departures.push(trip.departure_minute(), trip);
            index.arrivals.push(trip.arrival_minute(), trip);
        }
        index
    }
}
