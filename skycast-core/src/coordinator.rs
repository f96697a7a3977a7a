use tracing::{debug, info, warn};

use crate::{
    Config,
    error::QueryError,
    forecast::{DailyForecast, MAX_FORECAST_DAYS},
    geolocation::GeoLocator,
    model::{LocationQuery, UnitSystem, WeatherReport},
    provider::{WeatherProvider, provider_from_config},
};

/// Resolves one lookup into a [`WeatherReport`] or a [`QueryError`], never both.
#[derive(Debug)]
pub struct WeatherQueryCoordinator {
    provider: Box<dyn WeatherProvider>,
    forecast_days: usize,
}

impl WeatherQueryCoordinator {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self {
            provider,
            forecast_days: MAX_FORECAST_DAYS,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(provider_from_config(config)?).with_forecast_days(config.forecast_days()))
    }

    pub fn with_forecast_days(mut self, days: usize) -> Self {
        self.forecast_days = days.min(MAX_FORECAST_DAYS);
        self
    }

    /// Fetch current conditions and the forecast for `location` in `units`.
    ///
    /// Both requests run concurrently. Current conditions are mandatory; a
    /// failed forecast only leaves the daily forecast empty.
    pub async fn query(
        &self,
        location: &LocationQuery,
        units: UnitSystem,
    ) -> Result<WeatherReport, QueryError> {
        debug!(%location, %units, "Starting weather query");

        let (current, forecast) = tokio::join!(
            self.provider.current(location, units),
            self.provider.forecast(location, units),
        );

        let current = current.map_err(|e| {
            info!(%location, error = %e, "Current conditions lookup failed");
            QueryError::from(e)
        })?;

        let forecast = match forecast {
            Ok(samples) => DailyForecast::from_feed(samples, self.forecast_days),
            Err(e) => {
                warn!(%location, error = %e, "Forecast unavailable, continuing without it");
                DailyForecast::empty()
            }
        };

        Ok(WeatherReport {
            units,
            current,
            forecast,
        })
    }

    /// Re-fetch a previous report's location in another unit system.
    ///
    /// The resolved location name is queried again; stored values are never
    /// converted locally.
    pub async fn requery_in(
        &self,
        previous: &WeatherReport,
        units: UnitSystem,
    ) -> Result<WeatherReport, QueryError> {
        let location = LocationQuery::city(&previous.current.location_name)?;
        self.query(&location, units).await
    }

    /// Resolve the user's position, then query by coordinates.
    pub async fn locate_and_query(
        &self,
        locator: &dyn GeoLocator,
        units: UnitSystem,
    ) -> Result<WeatherReport, QueryError> {
        let coords = locator.locate().await?;
        self.query(&LocationQuery::Coordinates(coords), units).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{GeolocationError, ProviderError},
        model::{Condition, Coordinates, CurrentConditions, ForecastSample},
    };
    use async_trait::async_trait;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use std::sync::{Arc, Mutex};

    type CallLog = Arc<Mutex<Vec<(&'static str, LocationQuery, UnitSystem)>>>;

    /// Provider stub recording every call it receives.
    #[derive(Debug, Default)]
    struct StubProvider {
        known_city: Option<String>,
        forecast_down: bool,
        calls: CallLog,
    }

    impl StubProvider {
        fn knowing(city: &str) -> Self {
            Self {
                known_city: Some(city.to_string()),
                ..Self::default()
            }
        }

        fn resolve(&self, location: &LocationQuery) -> Result<String, ProviderError> {
            match (location, &self.known_city) {
                (LocationQuery::City(name), Some(known)) if name.eq_ignore_ascii_case(known) => {
                    Ok(known.clone())
                }
                (LocationQuery::Coordinates(_), Some(known)) => Ok(known.clone()),
                _ => Err(ProviderError::Status {
                    status: 404,
                    message: "City not found".to_string(),
                }),
            }
        }

        fn record(&self, endpoint: &'static str, location: &LocationQuery, units: UnitSystem) {
            self.calls.lock().unwrap().push((endpoint, location.clone(), units));
        }
    }

    fn temperature_for(units: UnitSystem) -> f64 {
        match units {
            UnitSystem::Metric => 20.0,
            UnitSystem::Imperial => 68.0,
        }
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn current(
            &self,
            location: &LocationQuery,
            units: UnitSystem,
        ) -> Result<CurrentConditions, ProviderError> {
            self.record("weather", location, units);
            let name = self.resolve(location)?;
            Ok(CurrentConditions {
                location_name: name,
                country: "FR".to_string(),
                temperature: temperature_for(units),
                feels_like: temperature_for(units),
                humidity_pct: 40,
                pressure_hpa: 1012.0,
                wind_speed: 3.0,
                visibility_m: Some(10_000),
                condition: Some(Condition {
                    main: "Clear".to_string(),
                    description: "clear sky".to_string(),
                    icon: "01d".to_string(),
                }),
                sunrise: None,
                sunset: None,
                observation_time: Utc::now(),
                utc_offset_secs: 7200,
            })
        }

        async fn forecast(
            &self,
            location: &LocationQuery,
            units: UnitSystem,
        ) -> Result<Vec<ForecastSample>, ProviderError> {
            self.record("forecast", location, units);
            if self.forecast_down {
                return Err(ProviderError::Request("connection refused".to_string()));
            }
            self.resolve(location)?;

            let start = NaiveDate::from_ymd_opt(2024, 6, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap();
            Ok((0..56)
                .map(|i| {
                    let local_time = start + Duration::hours(3 * i);
                    ForecastSample {
                        timestamp: Utc.from_utc_datetime(&local_time),
                        local_time,
                        temperature: temperature_for(units),
                        condition: None,
                    }
                })
                .collect())
        }
    }

    #[derive(Debug)]
    struct FixedLocator(Result<Coordinates, GeolocationError>);

    #[async_trait]
    impl GeoLocator for FixedLocator {
        async fn locate(&self) -> Result<Coordinates, GeolocationError> {
            self.0.clone()
        }
    }

    fn city(name: &str) -> LocationQuery {
        LocationQuery::city(name).unwrap()
    }

    #[tokio::test]
    async fn known_city_yields_populated_report() {
        let coordinator = WeatherQueryCoordinator::new(Box::new(StubProvider::knowing("Paris")));

        let report = coordinator
            .query(&city("Paris"), UnitSystem::Metric)
            .await
            .expect("lookup should succeed");

        assert_eq!(report.current.location_name, "Paris");
        assert_eq!(report.units, UnitSystem::Metric);
        // Seven days of feed, five midday samples kept.
        assert_eq!(report.forecast.len(), 5);
    }

    #[tokio::test]
    async fn unknown_city_fails_without_partial_result() {
        let coordinator = WeatherQueryCoordinator::new(Box::new(StubProvider::knowing("Paris")));

        let err = coordinator
            .query(&city("Atlantis"), UnitSystem::Metric)
            .await
            .unwrap_err();

        assert_eq!(err, QueryError::LookupFailed("City not found".to_string()));
    }

    #[tokio::test]
    async fn forecast_outage_degrades_to_empty_forecast() {
        let provider = StubProvider {
            forecast_down: true,
            ..StubProvider::knowing("Paris")
        };
        let coordinator = WeatherQueryCoordinator::new(Box::new(provider));

        let report = coordinator
            .query(&city("Paris"), UnitSystem::Metric)
            .await
            .expect("forecast outage must not fail the query");

        assert_eq!(report.current.location_name, "Paris");
        assert!(report.forecast.is_empty());
    }

    #[tokio::test]
    async fn both_requests_share_location_and_units() {
        let provider = StubProvider::knowing("Paris");
        let calls = Arc::clone(&provider.calls);
        let coordinator = WeatherQueryCoordinator::new(Box::new(provider));

        coordinator
            .query(&city("Paris"), UnitSystem::Imperial)
            .await
            .unwrap();

        let mut calls = calls.lock().unwrap().clone();
        calls.sort_by_key(|(endpoint, _, _)| *endpoint);
        assert_eq!(
            calls,
            vec![
                ("forecast", city("Paris"), UnitSystem::Imperial),
                ("weather", city("Paris"), UnitSystem::Imperial),
            ]
        );
    }

    #[tokio::test]
    async fn requery_fetches_resolved_name_in_new_units() {
        let provider = StubProvider::knowing("Paris");
        let calls = Arc::clone(&provider.calls);
        let coordinator = WeatherQueryCoordinator::new(Box::new(provider));
        let metric = coordinator
            .query(&city("paris"), UnitSystem::Metric)
            .await
            .unwrap();

        let imperial = coordinator
            .requery_in(&metric, UnitSystem::Imperial)
            .await
            .unwrap();

        assert_eq!(imperial.units, UnitSystem::Imperial);
        // Re-fetched from the provider, not converted from 20 °C.
        assert_eq!(imperial.current.temperature, 68.0);

        // The replay uses the provider's resolved spelling, not the typed one.
        let calls = calls.lock().unwrap();
        assert!(
            calls[2..]
                .iter()
                .all(|(_, loc, units)| *loc == city("Paris") && *units == UnitSystem::Imperial)
        );
    }

    #[tokio::test]
    async fn forecast_days_are_configurable() {
        let coordinator = WeatherQueryCoordinator::new(Box::new(StubProvider::knowing("Paris")))
            .with_forecast_days(3);
        let report = coordinator
            .query(&city("Paris"), UnitSystem::Metric)
            .await
            .unwrap();
        assert_eq!(report.forecast.len(), 3);
    }

    #[tokio::test]
    async fn locate_queries_by_coordinates() {
        let coordinator = WeatherQueryCoordinator::new(Box::new(StubProvider::knowing("Paris")));
        let locator = FixedLocator(Ok(Coordinates::new(48.85, 2.35).unwrap()));

        let report = coordinator
            .locate_and_query(&locator, UnitSystem::Metric)
            .await
            .unwrap();
        assert_eq!(report.current.location_name, "Paris");
    }

    #[tokio::test]
    async fn geolocation_failures_surface_as_query_errors() {
        let coordinator = WeatherQueryCoordinator::new(Box::new(StubProvider::knowing("Paris")));

        let unavailable = FixedLocator(Err(GeolocationError::Unavailable));
        assert_eq!(
            coordinator
                .locate_and_query(&unavailable, UnitSystem::Metric)
                .await
                .unwrap_err(),
            QueryError::GeolocationUnavailable
        );

        let denied = FixedLocator(Err(GeolocationError::Failed("denied".into())));
        assert!(matches!(
            coordinator
                .locate_and_query(&denied, UnitSystem::Metric)
                .await,
            Err(QueryError::GeolocationDenied(_))
        ));
    }
}
