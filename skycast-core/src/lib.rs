//! Core library for the `skycast` weather lookup tool.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client and the provider seam used for testing
//! - Query coordination (current conditions + best-effort forecast)
//! - Forecast reduction, condition theming and derived image URLs
//! - Session state for interactive front ends
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod forecast;
pub mod geolocation;
pub mod imagery;
pub mod model;
pub mod provider;
pub mod session;
pub mod theme;

pub use config::{Config, GeolocationConfig, ProviderConfig};
pub use coordinator::WeatherQueryCoordinator;
pub use error::{GeolocationError, ProviderError, QueryError};
pub use forecast::{DailyForecast, MAX_FORECAST_DAYS, reduce_daily};
pub use geolocation::{DisabledLocator, GeoLocator, IpApiLocator, locator_from_config};
pub use model::{
    Condition, Coordinates, CurrentConditions, ForecastSample, LocationQuery, UnitSystem,
    WeatherReport,
};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
pub use session::{QuerySession, QueryState, RequestToken};
pub use theme::Theme;
