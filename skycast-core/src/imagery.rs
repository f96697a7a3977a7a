//! Image URLs derived from fields already present in provider responses.
//! Nothing here is fetched; the URLs are handed to whatever renders them.

use crate::model::{Condition, CurrentConditions};

const ICON_BASE: &str = "https://openweathermap.org/img/wn";
const FLAG_BASE: &str = "https://flagsapi.com";

pub fn icon_url(icon: &str, scale: u8) -> String {
    format!("{ICON_BASE}/{icon}@{scale}x.png")
}

pub fn flag_url(country: &str, size: u16) -> String {
    format!("{FLAG_BASE}/{}/flat/{size}.png", country.to_uppercase())
}

impl Condition {
    pub fn icon_url(&self, scale: u8) -> String {
        icon_url(&self.icon, scale)
    }
}

impl CurrentConditions {
    /// `None` when the provider sent no country code.
    pub fn flag_url(&self) -> Option<String> {
        (!self.country.is_empty()).then(|| flag_url(&self.country, 32))
    }
}
