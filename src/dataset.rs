use std::{path::Path, sync::Arc};

use log::info;

use crate::{
    data::{Station, Trip},
    error::LoadError,
    trips,
};

/// Everything loaded for a session. Immutable once built.
#[derive(Debug, Default)]
pub struct Dataset {
    pub stations: Vec<Arc<Station>>,
    pub trips: Vec<Arc<Trip>>,
}

impl Dataset {
    pub fn new(stations: Vec<Station>, trips: Vec<Trip>) -> Self {
        Self {
            stations: stations.into_iter().map(Arc::new).collect(),
            trips: trips.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn open(
        stations_path: impl AsRef<Path>,
        trips_path: impl AsRef<Path>,
    ) -> Result<Self, LoadError> {
        let stations = trips::read_stations(stations_path.as_ref())?;
        let trips = trips::read_trips(trips_path.as_ref())?;
        info!(
            "Dataset ready: {} stations, {} trips",
            stations.len(),
            trips.len()
        );
        Ok(Self::new(stations, trips))
    }
}
