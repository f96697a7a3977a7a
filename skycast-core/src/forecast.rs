//! Condensing the 3-hourly forecast feed into one sample per day.

use chrono::Timelike;
use serde::Serialize;

use crate::model::ForecastSample;

/// Number of days the provider's free forecast feed covers.
pub const MAX_FORECAST_DAYS: usize = 5;

/// Keep the samples stamped exactly 12:00:00 provider-local, in input order,
/// and return at most the first `max_days` of them.
///
/// Days the provider never stamps at midday are absent from the result; no
/// nearest sample is substituted.
pub fn reduce_daily<I>(samples: I, max_days: usize) -> Vec<ForecastSample>
where
    I: IntoIterator<Item = ForecastSample>,
{
    samples
        .into_iter()
        .filter(is_midday)
        .take(max_days)
        .collect()
}

fn is_midday(sample: &ForecastSample) -> bool {
    let t = sample.local_time.time();
    (t.hour(), t.minute(), t.second(), t.nanosecond()) == (12, 0, 0, 0)
}

/// One midday sample per day, at most [`MAX_FORECAST_DAYS`] of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DailyForecast(Vec<ForecastSample>);

impl DailyForecast {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Reduce a raw feed; `max_days` is capped at [`MAX_FORECAST_DAYS`].
    pub fn from_feed(samples: Vec<ForecastSample>, max_days: usize) -> Self {
        Self(reduce_daily(samples, max_days.min(MAX_FORECAST_DAYS)))
    }

    pub fn days(&self) -> &[ForecastSample] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ForecastSample> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a DailyForecast {
    type Item = &'a ForecastSample;
    type IntoIter = std::slice::Iter<'a, ForecastSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
