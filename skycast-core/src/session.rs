//! Displayed-result state for an interactive front end.
//!
//! A session owns the single "current result" slot. Every lookup is tagged
//! with a [`RequestToken`]; a completion is applied only if it carries the
//! most recently issued token, so a slow response can never overwrite a
//! newer one.

use tracing::debug;

use crate::{
    error::QueryError,
    model::{LocationQuery, UnitSystem, WeatherReport},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, Default, PartialEq)]
pub enum QueryState {
    #[default]
    Idle,
    Loading {
        token: RequestToken,
    },
    Success(WeatherReport),
    Failed(QueryError),
}

impl QueryState {
    pub fn report(&self) -> Option<&WeatherReport> {
        match self {
            QueryState::Success(report) => Some(report),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&QueryError> {
        match self {
            QueryState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading { .. })
    }
}

#[derive(Debug, Clone)]
pub struct QuerySession {
    units: UnitSystem,
    state: QueryState,
    last_issued: u64,
}

impl QuerySession {
    pub fn new(units: UnitSystem) -> Self {
        Self {
            units,
            state: QueryState::Idle,
            last_issued: 0,
        }
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Start a new lookup; any earlier in-flight lookup is superseded.
    pub fn begin(&mut self) -> RequestToken {
        self.last_issued += 1;
        let token = RequestToken(self.last_issued);
        self.state = QueryState::Loading { token };
        token
    }

    /// Apply a lookup's outcome. Returns `false` (and changes nothing) when
    /// `token` has been superseded by a later [`begin`](Self::begin).
    pub fn complete(
        &mut self,
        token: RequestToken,
        result: Result<WeatherReport, QueryError>,
    ) -> bool {
        if token.0 != self.last_issued {
            debug!(?token, latest = self.last_issued, "Discarding stale query result");
            return false;
        }

        self.state = match result {
            Ok(report) => QueryState::Success(report),
            Err(err) => QueryState::Failed(err),
        };
        true
    }

    /// Flip the unit system. When a result is displayed, returns the query
    /// that re-fetches its resolved location in the new units.
    pub fn toggle_units(&mut self) -> Option<LocationQuery> {
        self.units = self.units.toggled();

        self.state
            .report()
            .and_then(|report| LocationQuery::city(&report.current.location_name).ok())
    }
}

impl Default for QuerySession {
    fn default() -> Self {
        Self::new(UnitSystem::default())
    }
}
