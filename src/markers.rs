use serde::Serialize;

use crate::{data::StationTraffic, scale::FlowLevel, scale::RadiusScale};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// Map from geographic coordinates to pixels, owned by the map component.
/// Positions are re-evaluated on every pan, zoom or resize and never feed
/// back into traffic aggregation.
pub trait Projection {
    fn project(&self, longitude: f64, latitude: f64) -> ScreenPoint;
}

impl<F> Projection for F
where
    F: Fn(f64, f64) -> ScreenPoint,
{
    fn project(&self, longitude: f64, latitude: f64) -> ScreenPoint {
        self(longitude, latitude)
    }
}

/// Everything the renderer needs to draw one station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: String,
    pub longitude: f64,
    pub latitude: f64,
    pub radius: f64,
    pub flow: FlowLevel,
    pub title: String,
}

impl Marker {
    pub fn new(row: &StationTraffic, scale: &RadiusScale) -> Self {
        let traffic = row.traffic;
        Self {
            id: row.station.id.clone(),
            longitude: row.station.longitude,
            latitude: row.station.latitude,
            radius: scale.radius(traffic.total_traffic),
            flow: FlowLevel::from_ratio(traffic.departure_ratio()),
            title: format!(
                "{} trips ({} departures, {} arrivals)",
                traffic.total_traffic, traffic.departures, traffic.arrivals
            ),
        }
    }

    pub fn position(&self, projection: &dyn Projection) -> ScreenPoint {
        projection.project(self.longitude, self.latitude)
    }
}
