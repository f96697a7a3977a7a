use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use crate::{
    config::ProviderConfig,
    error::ProviderError,
    model::{Condition, CurrentConditions, ForecastSample, LocationQuery, UnitSystem},
};

use super::WeatherProvider;

/// Format of the forecast feed's `dt_txt` field.
const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, config: &ProviderConfig) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        location: &LocationQuery,
        units: UnitSystem,
    ) -> Result<T, ProviderError> {
        let url = format!("{}/{endpoint}", self.base_url);

        let mut params = location.query_pairs();
        params.push(("appid", self.api_key.clone()));
        params.push(("units", units.as_api_str().to_string()));

        debug!(%url, "Requesting OpenWeather {endpoint}");

        // `without_url` keeps the appid out of error text.
        let res = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.without_url().to_string()))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            ProviderError::Request(format!("failed to read response body: {}", e.without_url()))
        })?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message: status_message(status, &body),
            });
        }

        serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip_all, fields(location = %location, units = %units))]
    async fn current(
        &self,
        location: &LocationQuery,
        units: UnitSystem,
    ) -> Result<CurrentConditions, ProviderError> {
        let parsed: OwCurrentResponse = self.get_json("weather", location, units).await?;
        Ok(parsed.into_conditions())
    }

    #[instrument(skip_all, fields(location = %location, units = %units))]
    async fn forecast(
        &self,
        location: &LocationQuery,
        units: UnitSystem,
    ) -> Result<Vec<ForecastSample>, ProviderError> {
        let parsed: OwForecastResponse = self.get_json("forecast", location, units).await?;
        debug!(samples = parsed.list.len(), "Received forecast feed");

        // A bad entry costs only its own slot; the rest of the feed stays usable.
        let samples = parsed
            .list
            .into_iter()
            .filter_map(|entry| match entry.into_sample() {
                Ok(sample) => Some(sample),
                Err(e) => {
                    warn!(error = %e, "Skipping forecast entry");
                    None
                }
            })
            .collect();

        Ok(samples)
    }
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

/// Human-readable reason for a failed request, preferring the provider's own message.
fn status_message(status: StatusCode, body: &str) -> String {
    let provider_message = serde_json::from_str::<OwErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());

    match provider_message {
        Some(msg) => capitalize(msg.trim()),
        None if status == StatusCode::NOT_FOUND => "City not found".to_string(),
        None => format!(
            "Weather service request failed with status {}: {}",
            status,
            truncate_body(body)
        ),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    #[serde(default)]
    feels_like: Option<f64>,
    #[serde(default)]
    humidity: u8,
    #[serde(default)]
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

impl From<OwWeather> for Condition {
    fn from(w: OwWeather) -> Self {
        Condition {
            main: w.main,
            description: w.description,
            icon: w.icon,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    country: Option<String>,
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    #[serde(default)]
    timezone: i32,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
    visibility: Option<u32>,
    #[serde(default)]
    sys: OwSys,
}

impl OwCurrentResponse {
    fn into_conditions(self) -> CurrentConditions {
        CurrentConditions {
            location_name: self.name,
            country: self.sys.country.unwrap_or_default(),
            temperature: self.main.temp,
            feels_like: self.main.feels_like.unwrap_or(self.main.temp),
            humidity_pct: self.main.humidity,
            pressure_hpa: self.main.pressure,
            wind_speed: self.wind.speed,
            visibility_m: self.visibility,
            condition: self.weather.into_iter().next().map(Condition::from),
            sunrise: self.sys.sunrise.and_then(unix_to_utc),
            sunset: self.sys.sunset.and_then(unix_to_utc),
            observation_time: unix_to_utc(self.dt).unwrap_or_else(Utc::now),
            utc_offset_secs: self.timezone,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    dt_txt: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

impl OwForecastEntry {
    fn into_sample(self) -> Result<ForecastSample, ProviderError> {
        let local_time = NaiveDateTime::parse_from_str(&self.dt_txt, DT_TXT_FORMAT).map_err(|e| {
            ProviderError::Decode(format!("invalid forecast timestamp '{}': {e}", self.dt_txt))
        })?;
        let timestamp = unix_to_utc(self.dt)
            .ok_or_else(|| ProviderError::Decode(format!("invalid epoch timestamp {}", self.dt)))?;

        Ok(ForecastSample {
            timestamp,
            local_time,
            temperature: self.main.temp,
            condition: self.weather.into_iter().next().map(Condition::from),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_message_is_capitalized() {
        let msg = status_message(StatusCode::NOT_FOUND, r#"{"cod":"404","message":"city not found"}"#);
        assert_eq!(msg, "City not found");
    }

    #[test]
    fn not_found_without_body_still_reads_well() {
        assert_eq!(status_message(StatusCode::NOT_FOUND, ""), "City not found");
    }

    #[test]
    fn other_statuses_fall_back_to_generic_text() {
        let msg = status_message(StatusCode::BAD_GATEWAY, "<html>upstream</html>");
        assert!(msg.contains("502"));
        assert!(msg.contains("<html>upstream</html>"));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(300);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
    }

    #[test]
    fn forecast_entry_parses_dt_txt() {
        let entry: OwForecastEntry = serde_json::from_value(serde_json::json!({
            "dt": 1718280000,
            "dt_txt": "2024-06-13 12:00:00",
            "main": { "temp": 21.5 },
            "weather": [{ "main": "Clear", "description": "clear sky", "icon": "01d" }]
        }))
        .expect("entry should decode");

        let sample = entry.into_sample().expect("sample");
        assert_eq!(sample.local_time.to_string(), "2024-06-13 12:00:00");
        assert_eq!(sample.timestamp.timestamp(), 1718280000);
        assert_eq!(sample.condition.map(|c| c.main), Some("Clear".to_string()));
    }

    #[test]
    fn malformed_dt_txt_is_a_decode_error() {
        let entry = OwForecastEntry {
            dt: 0,
            dt_txt: "13/06/2024 noon".to_string(),
            main: OwMain {
                temp: 1.0,
                feels_like: None,
                humidity: 0,
                pressure: 0.0,
            },
            weather: Vec::new(),
        };
        assert!(matches!(entry.into_sample(), Err(ProviderError::Decode(_))));
    }
}
