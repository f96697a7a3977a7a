use std::{fmt, str::FromStr};

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::QueryError, forecast::DailyForecast};

/// Measurement convention applied by the provider to temperature and wind speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Value of the `units` query parameter.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    pub fn speed_symbol(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "m/s",
            UnitSystem::Imperial => "mph",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Metric, UnitSystem::Imperial]
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown unit system '{0}'. Supported: metric, imperial.")]
pub struct ParseUnitsError(String);

impl FromStr for UnitSystem {
    type Err = ParseUnitsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "metric" | "c" | "celsius" => Ok(UnitSystem::Metric),
            "imperial" | "f" | "fahrenheit" => Ok(UnitSystem::Imperial),
            _ => Err(ParseUnitsError(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, QueryError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(QueryError::InvalidLocation(format!(
                "coordinates ({latitude}, {longitude}) are out of range: \
                 latitude must be -90 to 90, longitude must be -180 to 180"
            )));
        }
        Ok(Self { latitude, longitude })
    }
}

/// What the user asked to look up.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates(Coordinates),
}

impl LocationQuery {
    pub fn city(name: &str) -> Result<Self, QueryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(QueryError::InvalidLocation("city name is empty".to_string()));
        }
        Ok(LocationQuery::City(name.to_string()))
    }

    pub fn coordinates(latitude: f64, longitude: f64) -> Result<Self, QueryError> {
        Coordinates::new(latitude, longitude).map(LocationQuery::Coordinates)
    }

    /// Query parameters selecting this location on the provider side.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            LocationQuery::City(name) => vec![("q", name.clone())],
            LocationQuery::Coordinates(c) => vec![
                ("lat", c.latitude.to_string()),
                ("lon", c.longitude.to_string()),
            ],
        }
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationQuery::City(name) => f.write_str(name),
            LocationQuery::Coordinates(c) => write!(f, "{:.4}, {:.4}", c.latitude, c.longitude),
        }
    }
}

/// Primary weather condition as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Coarse classification, e.g. "Rain" or "Clear".
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: f64,
    pub wind_speed: f64,
    pub visibility_m: Option<u32>,
    pub condition: Option<Condition>,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    pub observation_time: DateTime<Utc>,
    /// Shift from UTC of the location, in seconds.
    pub utc_offset_secs: i32,
}

impl CurrentConditions {
    pub fn local_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_secs).unwrap_or_else(|| Utc.fix())
    }

    pub fn local_sunrise(&self) -> Option<DateTime<FixedOffset>> {
        self.sunrise.map(|t| t.with_timezone(&self.local_offset()))
    }

    pub fn local_sunset(&self) -> Option<DateTime<FixedOffset>> {
        self.sunset.map(|t| t.with_timezone(&self.local_offset()))
    }

    pub fn visibility_km(&self) -> Option<f64> {
        self.visibility_m.map(|m| f64::from(m) / 1000.0)
    }

    pub fn condition_main(&self) -> &str {
        self.condition.as_ref().map(|c| c.main.as_str()).unwrap_or("")
    }
}

/// One 3-hour slice of the provider's forecast feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    /// Provider's timestamp text, parsed without a zone.
    pub local_time: NaiveDateTime,
    pub temperature: f64,
    pub condition: Option<Condition>,
}

/// Result of one successful lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub units: UnitSystem,
    pub current: CurrentConditions,
    pub forecast: DailyForecast,
}
