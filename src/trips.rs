use std::{collections::HashSet, fs::File, io::BufReader, io::Read, path::Path};

use chrono::{DateTime, NaiveDateTime};
use log::{info, warn};

use crate::{
    bluebikes,
    data::{Station, Trip},
    error::{LoadError, ParseError},
};

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parses the wall-clock time as written. An RFC 3339 offset is accepted but
/// not applied.
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<NaiveDateTime, ParseError> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|timestamp| timestamp.naive_local())
        })
        .ok_or_else(|| ParseError::InvalidTimestamp {
            field,
            value: value.to_owned(),
        })
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ParseError> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .ok_or(ParseError::MissingField { field })
}

fn coordinate(
    field: &'static str,
    value: Option<bluebikes::Coordinate>,
) -> Result<f64, ParseError> {
    let invalid = |value: String| ParseError::InvalidCoordinate { field, value };

    match value.ok_or(ParseError::MissingField { field })? {
        bluebikes::Coordinate::Number(number) if number.is_finite() => Ok(number),
        bluebikes::Coordinate::Number(number) => Err(invalid(number.to_string())),
        bluebikes::Coordinate::Text(text) => match text.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => Ok(number),
            _ => Err(invalid(text)),
        },
    }
}

impl TryFrom<bluebikes::Trip> for Trip {
    type Error = ParseError;

    fn try_from(raw: bluebikes::Trip) -> Result<Self, Self::Error> {
        let started_at = required("started_at", raw.started_at)?;
        let ended_at = required("ended_at", raw.ended_at)?;

        Ok(Self {
            start_station_id: required("start_station_id", raw.start_station_id)?,
            end_station_id: required("end_station_id", raw.end_station_id)?,
            started_at: parse_timestamp("started_at", &started_at)?,
            ended_at: parse_timestamp("ended_at", &ended_at)?,
        })
    }
}

impl TryFrom<bluebikes::Station> for Station {
    type Error = ParseError;

    fn try_from(raw: bluebikes::Station) -> Result<Self, Self::Error> {
        Ok(Self {
            id: required("short_name", raw.short_name)?,
            name: raw.name.filter(|name| !name.trim().is_empty()),
            longitude: coordinate("lon", raw.lon)?,
            latitude: coordinate("lat", raw.lat)?,
        })
    }
}

/// Normalizes raw trip records in source order. Records that fail to parse
/// are skipped with a warning.
pub fn load_trips(raw: impl IntoIterator<Item = bluebikes::Trip>) -> Vec<Trip> {
    let mut skipped = 0;
    let trips: Vec<Trip> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(position, record)| match Trip::try_from(record) {
            Ok(trip) => Some(trip),
            Err(err) => {
                warn!("Skipping trip record #{}: {}", position + 1, err);
                skipped += 1;
                None
            }
        })
        .collect();

    info!("Loaded {} trips ({} skipped)", trips.len(), skipped);
    trips
}

/// Normalizes raw station records. The first record wins when a station id
/// repeats.
pub fn load_stations(raw: impl IntoIterator<Item = bluebikes::Station>) -> Vec<Station> {
    let mut seen = HashSet::new();
    let mut stations = Vec::new();

    for (position, record) in raw.into_iter().enumerate() {
        match Station::try_from(record) {
            Ok(station) if seen.insert(station.id.clone()) => stations.push(station),
            Ok(station) => warn!(
                "Skipping station record #{}: duplicate id {:?}",
                position + 1,
                station.id
            ),
            Err(err) => warn!("Skipping station record #{}: {}", position + 1, err),
        }
    }

    info!("Loaded {} stations", stations.len());
    stations
}

pub fn trips_from_reader(reader: impl Read) -> Result<Vec<Trip>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    reader.headers()?;

    let mut raw = Vec::new();
    for record in reader.deserialize::<bluebikes::Trip>() {
        match record {
            Ok(trip) => raw.push(trip),
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => warn!("Skipping unreadable trip row: {}", err),
        }
    }

    Ok(load_trips(raw))
}

pub fn stations_from_reader(reader: impl Read) -> Result<Vec<Station>, LoadError> {
    let feed: bluebikes::StationFeed = serde_json::from_reader(reader)?;
    Ok(load_stations(feed.data.stations))
}

fn open(path: &Path) -> Result<BufReader<File>, LoadError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| LoadError::Io {
            path: path.to_owned(),
            source,
        })
}

pub fn read_trips(path: impl AsRef<Path>) -> Result<Vec<Trip>, LoadError> {
    trips_from_reader(open(path.as_ref())?)
}

pub fn read_stations(path: impl AsRef<Path>) -> Result<Vec<Station>, LoadError> {
    stations_from_reader(open(path.as_ref())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw_trip(start: &str, end: &str) -> bluebikes::Trip {
        bluebikes::Trip {
            start_station_id: Some("A32".into()),
            end_station_id: Some("B01".into()),
            started_at: Some(start.into()),
            ended_at: Some(end.into()),
        }
    }

    fn raw_station(id: Option<&str>, lon: bluebikes::Coordinate) -> bluebikes::Station {
        bluebikes::Station {
            short_name: id.map(Into::into),
            name: Some("Kendall T".into()),
            lon: Some(lon),
            lat: Some(bluebikes::Coordinate::Number(42.36)),
        }
    }

    fn ymd_hms(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn parses_supported_timestamp_forms() {
        let parse = |value| parse_timestamp("started_at", value).unwrap();

        assert_eq!(parse("2024-03-01 09:05:17"), ymd_hms(9, 5, 17));
        assert_eq!(parse("2024-03-01 09:05:17.431"), ymd_hms(9, 5, 17) + chrono::Duration::milliseconds(431));
        assert_eq!(parse("2024-03-01T09:05:17"), ymd_hms(9, 5, 17));
        assert_eq!(parse("2024-03-01 09:05"), ymd_hms(9, 5, 0));
        assert_eq!(parse(" 2024-03-01T09:05:17-05:00 "), ymd_hms(9, 5, 17));
        assert_eq!(parse("2024-03-01T23:59:59Z"), ymd_hms(23, 59, 59));
    }

    #[test]
    fn rejects_unparsable_timestamps() {
        assert_eq!(
            parse_timestamp("ended_at", "yesterday"),
            Err(ParseError::InvalidTimestamp {
                field: "ended_at",
                value: "yesterday".into()
            })
        );
        assert!(parse_timestamp("ended_at", "2024-03-01 25:00:00").is_err());
    }

    #[test]
    fn converts_complete_trip() {
        let trip = Trip::try_from(raw_trip("2024-03-01 09:00:00", "2024-03-01 09:10:00")).unwrap();
        assert_eq!(trip.start_station_id, "A32");
        assert_eq!(trip.departure_minute(), 540);
        assert_eq!(trip.arrival_minute(), 550);
    }

    #[test]
    fn missing_or_blank_fields_are_errors() {
        let mut raw = raw_trip("2024-03-01 09:00:00", "2024-03-01 09:10:00");
        raw.end_station_id = Some("  ".into());
        assert_eq!(
            Trip::try_from(raw),
            Err(ParseError::MissingField {
                field: "end_station_id"
            })
        );

        let mut raw = raw_trip("2024-03-01 09:00:00", "2024-03-01 09:10:00");
        raw.started_at = None;
        assert_eq!(
            Trip::try_from(raw),
            Err(ParseError::MissingField { field: "started_at" })
        );
    }

    #[test]
    fn load_skips_bad_records_and_keeps_order() {
        let trips = load_trips(vec![
            raw_trip("2024-03-01 08:00:00", "2024-03-01 08:30:00"),
            raw_trip("not a time", "2024-03-01 08:30:00"),
            bluebikes::Trip::default(),
            raw_trip("2024-03-01 07:00:00", "2024-03-01 07:15:00"),
        ]);

        let starts = trips.iter().map(Trip::departure_minute).collect::<Vec<_>>();
        assert_eq!(starts, [480, 420]);
    }

    #[test]
    fn stations_accept_numeric_strings_and_drop_duplicates() {
        let stations = load_stations(vec![
            raw_station(Some("A32"), bluebikes::Coordinate::Text("-71.09".into())),
            raw_station(Some("A32"), bluebikes::Coordinate::Number(-70.0)),
            raw_station(None, bluebikes::Coordinate::Number(-71.0)),
            raw_station(Some("B01"), bluebikes::Coordinate::Text("west".into())),
            raw_station(Some("C07"), bluebikes::Coordinate::Number(-71.1)),
        ]);

        let ids = stations.iter().map(|s| s.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["A32", "C07"]);
        assert_eq!(stations[0].longitude, -71.09);
        assert_eq!(stations[0].name.as_deref(), Some("Kendall T"));
    }

    #[test]
    fn reads_trip_csv_with_extra_columns() {
        let csv = "\
ride_id,rideable_type,started_at,ended_at,start_station_id,end_station_id
r1,classic_bike,2024-03-01 09:00:12,2024-03-01 09:10:40,A32,B01
r2,electric_bike,2024-03-01 09:05:00,,B01,C07
r3,classic_bike,2024-03-01 23:50:00,2024-03-02 00:05:00,C07,A32
";
        let trips = trips_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[1].end_station_id, "A32");
        assert_eq!(trips[1].arrival_minute(), 5);
    }

    #[test]
    fn reads_station_feed() {
        let json = r#"{"last_updated": 1, "data": {"stations": [
            {"short_name": "A32", "name": "Kendall T", "lon": -71.086, "lat": 42.362, "capacity": 19},
            {"short_name": "B01", "lon": "-71.1", "lat": "42.35"},
            {"name": "no id", "lon": -71.0, "lat": 42.0}
        ]}}"#;

        let stations = stations_from_reader(json.as_bytes()).unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[1].latitude, 42.35);
        assert_eq!(stations[1].name, None);
    }

    #[test]
    fn malformed_station_feed_is_a_load_error() {
        let result = stations_from_reader(r#"{"stations": []}"#.as_bytes());
        assert!(matches!(result, Err(LoadError::Json(_))));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let result = read_trips("/nonexistent/trips.csv");
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }
}
