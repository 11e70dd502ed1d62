use std::{ops::Range, sync::Arc};

use crate::{
    buckets::MinuteBuckets,
    data::{Minute, Trip, MINUTES_PER_DAY},
    filter::TimeFilter,
};

pub const WINDOW_HALF_WIDTH: Minute = 60;

/// Half-open circular range of minutes `[lo, hi)` centred on a minute of the
/// day. Wraps past midnight when `lo > hi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    lo: Minute,
    hi: Minute,
}

impl Window {
    pub fn around(minute: Minute) -> Self {
        let (minute, half, day) = (
            minute as usize % MINUTES_PER_DAY,
            WINDOW_HALF_WIDTH as usize,
            MINUTES_PER_DAY,
        );
        Self {
            lo: ((minute + day - half) % day) as Minute,
            hi: ((minute + half) % day) as Minute,
        }
    }

    pub fn lo(&self) -> Minute {
        self.lo
    }

    pub fn hi(&self) -> Minute {
        self.hi
    }

    pub fn wraps(&self) -> bool {
        self.lo > self.hi
    }

    /// Bucket index ranges covered by the window, in query order. The second
    /// range is empty unless the window wraps.
    pub fn ranges(&self) -> [Range<usize>; 2] {
        let (lo, hi) = (self.lo as usize, self.hi as usize);
        if self.wraps() {
            [lo..MINUTES_PER_DAY, 0..hi]
        } else {
            [lo..hi, 0..0]
        }
    }

    pub fn len(&self) -> usize {
        self.ranges().iter().map(|range| range.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, minute: Minute) -> bool {
        if self.wraps() {
            minute >= self.lo || minute < self.hi
        } else {
            (self.lo..self.hi).contains(&minute)
        }
    }

    pub fn minutes(&self) -> impl Iterator<Item = Minute> {
        let [head, tail] = self.ranges();
        head.chain(tail).map(|minute| minute as Minute)
    }
}

fn bucket_ranges(filter: TimeFilter) -> [Range<usize>; 2] {
    match filter.window() {
        Some(window) => window.ranges(),
        None => [0..MINUTES_PER_DAY, 0..0],
    }
}

impl MinuteBuckets {
    /// The buckets a query under `filter` visits. Only the window's buckets
    /// are touched, however many trips the index holds.
    pub fn window_buckets(&self, filter: TimeFilter) -> impl Iterator<Item = &[Arc<Trip>]> + '_ {
        let [head, tail] = bucket_ranges(filter);
        self.buckets[head]
            .iter()
            .chain(self.buckets[tail].iter())
            .map(Vec::as_slice)
    }

    pub fn query(&self, filter: TimeFilter) -> impl Iterator<Item = &Arc<Trip>> + '_ {
        self.window_buckets(filter).flatten()
    }

    pub fn count(&self, filter: TimeFilter) -> usize {
        self.window_buckets(filter).map(<[_]>::len).sum()
    }
}
