use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Trip {
    pub start_station_id: Option<String>,
    pub end_station_id: Option<String>,
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
}

/// Feeds publish coordinates either as numbers or as numeric strings.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Coordinate {
    Number(f64),
    Text(String),
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Station {
    pub short_name: Option<String>,
    pub name: Option<String>,
    pub lon: Option<Coordinate>,
    pub lat: Option<Coordinate>,
}

#[derive(Deserialize, Debug)]
pub struct StationFeed {
    pub data: StationList,
}

#[derive(Deserialize, Debug)]
pub struct StationList {
    pub stations: Vec<Station>,
}
