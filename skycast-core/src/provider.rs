use crate::{
    Config,
    error::ProviderError,
    model::{CurrentConditions, ForecastSample, LocationQuery, UnitSystem},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current conditions and the raw 3-hourly forecast feed.
///
/// Both calls take the same location and unit system; values come back
/// already expressed in `units`.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(
        &self,
        location: &LocationQuery,
        units: UnitSystem,
    ) -> Result<CurrentConditions, ProviderError>;

    async fn forecast(
        &self,
        location: &LocationQuery,
        units: UnitSystem,
    ) -> Result<Vec<ForecastSample>, ProviderError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.require_api_key()?;
    let provider = OpenWeatherProvider::new(api_key.to_owned(), &config.provider)
        .map_err(|e| anyhow::anyhow!("Failed to initialise the weather client: {e}"))?;

    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        assert!(provider_from_config(&cfg).is_ok());
    }
}
