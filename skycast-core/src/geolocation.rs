//! "Locate me": resolving the user's approximate position.

use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{config::GeolocationConfig, error::GeolocationError, model::Coordinates};

#[async_trait]
pub trait GeoLocator: Send + Sync + Debug {
    async fn locate(&self) -> Result<Coordinates, GeolocationError>;
}

/// Locator used when geolocation is switched off; always unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledLocator;

#[async_trait]
impl GeoLocator for DisabledLocator {
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::Unavailable)
    }
}

/// IP-based position lookup against an ip-api compatible JSON endpoint.
#[derive(Debug, Clone)]
pub struct IpApiLocator {
    url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpApiLocator {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, GeolocationError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|_| GeolocationError::Unavailable)?;

        Ok(Self { url: url.into(), http })
    }
}

#[async_trait]
impl GeoLocator for IpApiLocator {
    #[instrument(skip(self))]
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        let res = self
            .http
            .get(&self.url)
            .query(&[("fields", "status,message,lat,lon")])
            .send()
            .await
            .map_err(|e| GeolocationError::Failed(e.without_url().to_string()))?;

        if !res.status().is_success() {
            return Err(GeolocationError::Failed(format!(
                "location service returned {}",
                res.status()
            )));
        }

        let body: IpApiResponse = res
            .json()
            .await
            .map_err(|e| GeolocationError::Failed(e.without_url().to_string()))?;

        if body.status != "success" {
            return Err(GeolocationError::Failed(
                body.message.unwrap_or_else(|| "position unavailable".to_string()),
            ));
        }

        let (Some(lat), Some(lon)) = (body.lat, body.lon) else {
            return Err(GeolocationError::Failed("position unavailable".to_string()));
        };
        debug!(lat, lon, "Resolved position");

        Coordinates::new(lat, lon).map_err(|e| GeolocationError::Failed(e.to_string()))
    }
}

/// Pick the locator the configuration asks for.
pub fn locator_from_config(
    config: &GeolocationConfig,
    timeout: Duration,
) -> Box<dyn GeoLocator> {
    if !config.enabled {
        return Box::new(DisabledLocator);
    }
    match IpApiLocator::new(config.url.clone(), timeout) {
        Ok(locator) => Box::new(locator),
        Err(_) => Box::new(DisabledLocator),
    }
}
