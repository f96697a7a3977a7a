use thiserror::Error;

/// Terminal outcome of a failed lookup. The text is meant for direct display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    /// The mandatory current-conditions request failed.
    #[error("{0}")]
    LookupFailed(String),

    #[error("Geolocation is not supported on this system")]
    GeolocationUnavailable,

    #[error("Unable to retrieve your location: {0}")]
    GeolocationDenied(String),
}

/// Failure of a single provider request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The request never produced a response.
    #[error("Unable to reach the weather service: {0}")]
    Request(String),

    /// Non-success HTTP status; `message` is the provider's own text when it sent one.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Unexpected response from the weather service: {0}")]
    Decode(String),
}

impl ProviderError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::Status { status: 404, .. })
    }
}

impl From<ProviderError> for QueryError {
    fn from(err: ProviderError) -> Self {
        QueryError::LookupFailed(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("geolocation is unavailable")]
    Unavailable,

    #[error("{0}")]
    Failed(String),
}

impl From<GeolocationError> for QueryError {
    fn from(err: GeolocationError) -> Self {
        match err {
            GeolocationError::Unavailable => QueryError::GeolocationUnavailable,
            GeolocationError::Failed(reason) => QueryError::GeolocationDenied(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_status_keeps_provider_message() {
        let err: QueryError = ProviderError::Status {
            status: 404,
            message: "City not found".to_string(),
        }
        .into();
        assert_eq!(err, QueryError::LookupFailed("City not found".to_string()));
        assert_eq!(err.to_string(), "City not found");
    }

    #[test]
    fn transport_failure_reads_as_network_message() {
        let err: QueryError = ProviderError::Request("connection refused".to_string()).into();
        assert!(err.to_string().starts_with("Unable to reach the weather service"));
    }

    #[test]
    fn geolocation_errors_map_to_query_errors() {
        assert_eq!(
            QueryError::from(GeolocationError::Unavailable),
            QueryError::GeolocationUnavailable
        );
        let denied = QueryError::from(GeolocationError::Failed("permission denied".into()));
        assert_eq!(denied.to_string(), "Unable to retrieve your location: permission denied");
    }
}
