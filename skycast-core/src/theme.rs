use serde::Serialize;

/// Decorative theme picked from the current weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Clouds,
    Rain,
    Clear,
    Snow,
    Thunderstorm,
    Mist,
    Default,
}

/// Ordered rules; the first whose needle occurs in the lowercased condition wins.
const RULES: &[(&[&str], Theme)] = &[
    (&["cloud"], Theme::Clouds),
    (&["rain"], Theme::Rain),
    (&["clear"], Theme::Clear),
    (&["snow"], Theme::Snow),
    (&["thunder"], Theme::Thunderstorm),
    (&["mist", "fog"], Theme::Mist),
];

impl Theme {
    /// Classify a provider condition such as "Rain" or "Light Rain".
    pub fn classify(condition: &str) -> Self {
        let lower = condition.to_lowercase();
        RULES
            .iter()
            .find(|(needles, _)| needles.iter().any(|n| lower.contains(n)))
            .map(|(_, theme)| *theme)
            .unwrap_or(Theme::Default)
    }

    /// Theme for an optional condition; no weather at all is [`Theme::Default`].
    pub fn for_condition(condition: Option<&str>) -> Self {
        condition.map(Self::classify).unwrap_or(Theme::Default)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Clouds => "clouds",
            Theme::Rain => "rain",
            Theme::Clear => "clear",
            Theme::Snow => "snow",
            Theme::Thunderstorm => "thunderstorm",
            Theme::Mist => "mist",
            Theme::Default => "default",
        }
    }

    /// Three gradient stops, top-left to bottom-right.
    pub fn gradient(&self) -> [&'static str; 3] {
        match self {
            Theme::Clouds => ["gray-400", "gray-500", "blue-700"],
            Theme::Rain => ["blue-700", "blue-500", "gray-400"],
            Theme::Clear => ["yellow-200", "blue-300", "blue-500"],
            Theme::Snow => ["blue-200", "white", "blue-400"],
            Theme::Thunderstorm => ["gray-700", "yellow-400", "gray-900"],
            Theme::Mist => ["gray-300", "gray-400", "gray-600"],
            Theme::Default => ["blue-400", "blue-500", "purple-600"],
        }
    }

    /// ANSI SGR color code used by terminal renderers.
    pub fn ansi_color(&self) -> u8 {
        match self {
            Theme::Clouds => 37,
            Theme::Rain => 34,
            Theme::Clear => 33,
            Theme::Snow => 97,
            Theme::Thunderstorm => 35,
            Theme::Mist => 90,
            Theme::Default => 36,
        }
    }
}
