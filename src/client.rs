use chrono::NaiveDate;
use log::debug;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::filter::filter_by_region;
use crate::frame::DataFrame;
use crate::schema::Schema;
use crate::stats::summarize_by_region;

/// Date format for observation range queries.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wire field holding the station triplet.
const ID_FIELD: &str = "id";
/// Wire field holding the station elevation.
const ELEVATION_FIELD: &str = "elevation";

/// Client for the Powderlines snow-telemetry API.
///
/// Every operation validates its arguments, issues exactly one GET, and
/// returns a [`DataFrame`]. Operations share nothing between calls, so one
/// client can be used from any number of threads without coordination.
///
/// Construct with [`Client::new`] for a configured endpoint, or inject any
/// [`Fetcher`] with [`Client::with_fetcher`].
#[derive(Debug, Clone)]
pub struct Client<F = HttpFetcher> {
    fetcher: F,
}

impl Client {
    /// Creates a client for the configured endpoint.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            fetcher: HttpFetcher::new(config.base_url)?,
        })
    }

    /// Creates a client from environment configuration
    /// (see [`ClientConfig::from_env`]).
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }
}

impl<F: Fetcher> Client<F> {
    /// Creates a client over a caller-supplied fetcher.
    pub fn with_fetcher(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// The `count` stations closest to a coordinate, nearest first.
    ///
    /// Returns up to `count` rows (`count` must be in `1..=5`), ordered by
    /// the server's ascending distance, with columns `Distance (miles)`,
    /// `Elevation (ft)`, `Lat`, `Lng`, `Name`, `Timezone`, `Triplet`.
    /// Distance and coordinates are rounded to two decimals for display.
    pub fn closest_stations(&self, lat: i32, lng: i32, count: u32) -> Result<DataFrame> {
        if !(-90..=90).contains(&lat) {
            return Err(Error::Validation(format!(
                "latitude {lat} out of bounds [-90, 90]"
            )));
        }
        if !(-180..=180).contains(&lng) {
            return Err(Error::Validation(format!(
                "longitude {lng} out of bounds [-180, 180]"
            )));
        }
        if !(1..=5).contains(&count) {
            return Err(Error::Validation(format!(
                "count {count} out of bounds (0, 5]"
            )));
        }

        let value = self.fetcher.fetch(
            "closest_stations",
            &[
                ("lat", lat.to_string()),
                ("lng", lng.to_string()),
                ("count", count.to_string()),
            ],
        )?;
        let frame = DataFrame::from_json(&value)?;
        debug!("closest_stations: {} rows", frame.len());
        Schema::CLOSEST_STATIONS.apply(&frame)
    }

    /// Daily observations for a station over the last `days` days
    /// (not counting today).
    ///
    /// Columns are the upstream observation labels: `Date`, snow water
    /// equivalent and snow depth with their day-over-day changes, and the
    /// observed air temperature.
    pub fn station_observations(&self, triplet: &str, days: u32) -> Result<DataFrame> {
        validate_triplet(triplet)?;

        let value = self
            .fetcher
            .fetch(&format!("station/{triplet}"), &[("days", days.to_string())])?;
        observation_frame(&value)
    }

    /// Daily observations for a station between two dates.
    ///
    /// `start` must not be after `end`; which endpoints are included is
    /// decided by the server. Columns match [`Self::station_observations`].
    pub fn station_observations_range(
        &self,
        triplet: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DataFrame> {
        validate_triplet(triplet)?;
        if start > end {
            return Err(Error::Validation(format!(
                "start date {start} is after end date {end}"
            )));
        }

        let value = self.fetcher.fetch(
            &format!("station/{triplet}"),
            &[
                ("start_date", start.format(DATE_FORMAT).to_string()),
                ("end_date", end.format(DATE_FORMAT).to_string()),
            ],
        )?;
        observation_frame(&value)
    }

    /// Every station whose triplet carries the given 2-letter region code.
    ///
    /// `code` is matched case-sensitively as `:CODE:` inside the triplet.
    /// Columns are `Elevation`, `Name`, `Timezone`, `Triplet`, `Lat`, `Lng`
    /// with coordinates rounded to two decimals. A region with no stations
    /// yields an empty frame, not an error.
    pub fn stations_by_region(&self, code: &str) -> Result<DataFrame> {
        validate_region_code(code)?;

        let value = self.fetcher.fetch("stations", &[])?;
        let frame = DataFrame::from_json(&value)?;
        debug!("stations: {} rows", frame.len());
        let matched = filter_by_region(&frame, ID_FIELD, code)?;
        Schema::ALL_STATIONS.apply(&matched)
    }

    /// Summary statistics over the whole station inventory, one row per
    /// region code: `State`, `Max Elevation`, `Avg Elevation` (two
    /// decimals), `Station Count`. Rows are sorted by region code.
    pub fn region_summary_stats(&self) -> Result<DataFrame> {
        let value = self.fetcher.fetch("stations", &[])?;
        let frame = DataFrame::from_json(&value)?;
        debug!("stations: {} rows", frame.len());
        summarize_by_region(&frame, ID_FIELD, ELEVATION_FIELD)
    }
}

/// Observation payloads wrap the rows in a `"data"` field next to station
/// metadata; only the rows are consumed.
fn observation_frame(value: &Value) -> Result<DataFrame> {
    let data = value
        .get("data")
        .ok_or_else(|| Error::MalformedResponse("missing `data` field in response".to_string()))?;
    let frame = DataFrame::from_json(data)?;
    debug!("station data: {} rows", frame.len());
    Schema::OBSERVATIONS.apply(&frame)
}

fn validate_triplet(triplet: &str) -> Result<()> {
    let segments: Vec<&str> = triplet.split(':').collect();
    if segments.len() != 3 || segments.iter().any(|segment| segment.is_empty()) {
        return Err(Error::Validation(format!(
            "station triplet `{triplet}` is not of the form <id>:<state>:<network>"
        )));
    }
    Ok(())
}

fn validate_region_code(code: &str) -> Result<()> {
    if code.len() != 2 || !code.bytes().all(|byte| byte.is_ascii_uppercase()) {
        return Err(Error::Validation(format!(
            "region code `{code}` must be two uppercase letters"
        )));
    }
    Ok(())
}
