//! Plain-text rendering of a [`WeatherReport`] for the terminal.

use std::fmt::Write;

use skycast_core::{ForecastSample, Theme, WeatherReport};

pub fn report(report: &WeatherReport) -> String {
    let current = &report.current;
    let units = report.units;
    let theme = Theme::for_condition(current.condition.as_ref().map(|c| c.main.as_str()));

    let mut out = String::new();

    let place = if current.country.is_empty() {
        current.location_name.clone()
    } else {
        format!("{}, {}", current.location_name, current.country)
    };
    let _ = writeln!(out, "\x1b[1;{}m{place}\x1b[0m  [{}]", theme.ansi_color(), theme.label());

    let _ = writeln!(
        out,
        "{}{}  {}",
        whole(current.temperature),
        units.temperature_symbol(),
        current
            .condition
            .as_ref()
            .map(|c| c.description.as_str())
            .unwrap_or("no description"),
    );
    let _ = writeln!(
        out,
        "  Feels like  {}{}",
        whole(current.feels_like),
        units.temperature_symbol()
    );
    let _ = writeln!(out, "  Humidity    {}%", current.humidity_pct);
    let _ = writeln!(out, "  Wind speed  {} {}", current.wind_speed, units.speed_symbol());
    let _ = writeln!(out, "  Pressure    {} hPa", current.pressure_hpa);
    if let Some(km) = current.visibility_km() {
        let _ = writeln!(out, "  Visibility  {km} km");
    }
    if let (Some(rise), Some(set)) = (current.local_sunrise(), current.local_sunset()) {
        let _ = writeln!(
            out,
            "  Sunrise / Sunset  {} / {}",
            rise.format("%H:%M"),
            set.format("%H:%M")
        );
    }
    if let Some(condition) = &current.condition {
        let _ = writeln!(out, "  Icon  {}", condition.icon_url(4));
    }
    if let Some(flag) = current.flag_url() {
        let _ = writeln!(out, "  Flag  {flag}");
    }

    if !report.forecast.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "5-Day Forecast");
        for day in &report.forecast {
            let _ = writeln!(out, "  {}", forecast_line(day, units.temperature_symbol()));
        }
    }

    out
}

fn forecast_line(sample: &ForecastSample, symbol: &str) -> String {
    let description = sample
        .condition
        .as_ref()
        .map(|c| c.description.as_str())
        .unwrap_or("");
    format!(
        "{}  {:>4}{symbol}  {description}",
        sample.local_time.format("%a"),
        whole(sample.temperature)
    )
}

/// Rounded to a whole degree, with -0 shown as 0.
fn whole(t: f64) -> f64 {
    let rounded = t.round();
    if rounded == 0.0 { 0.0 } else { rounded }
}

pub fn error(message: &str) -> String {
    format!("\x1b[31mError:\x1b[0m {message}")
}
