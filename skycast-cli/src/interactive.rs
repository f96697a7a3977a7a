use std::{fmt, time::Duration};

use anyhow::Context;
use inquire::{InquireError, Select, Text};
use skycast_core::{
    Config, GeoLocator, LocationQuery, QueryError, QuerySession, QueryState, RequestToken,
    WeatherQueryCoordinator, WeatherReport, locator_from_config,
};
use tracing::debug;

use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    ToggleUnits,
    Locate,
    Quit,
}

impl Action {
    fn menu(session: &QuerySession) -> Vec<ActionItem> {
        [Action::Search, Action::ToggleUnits, Action::Locate, Action::Quit]
            .into_iter()
            .map(|action| ActionItem {
                action,
                target_symbol: session.units().toggled().temperature_symbol(),
            })
            .collect()
    }
}

struct ActionItem {
    action: Action,
    target_symbol: &'static str,
}

impl fmt::Display for ActionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            Action::Search => f.write_str("Search city"),
            Action::ToggleUnits => write!(f, "Show {}", self.target_symbol),
            Action::Locate => f.write_str("Locate me"),
            Action::Quit => f.write_str("Quit"),
        }
    }
}

pub async fn run(config: &Config) -> anyhow::Result<()> {
    let coordinator = WeatherQueryCoordinator::from_config(config)?;
    let locator = locator_from_config(
        &config.geolocation,
        Duration::from_secs(config.provider.timeout_secs),
    );
    let mut session = QuerySession::new(config.units);

    loop {
        let choice = match Select::new("What next?", Action::menu(&session)).prompt() {
            Ok(item) => item.action,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read menu choice"),
        };

        match choice {
            Action::Search => {
                let city = match Text::new("City:").prompt() {
                    Ok(city) => city,
                    Err(InquireError::OperationCanceled) => continue,
                    Err(e) => return Err(e).context("Failed to read city name"),
                };
                lookup(&coordinator, &mut session, LocationQuery::city(&city)).await;
            }
            Action::ToggleUnits => {
                if let Some(location) = session.toggle_units() {
                    lookup(&coordinator, &mut session, Ok(location)).await;
                } else {
                    println!("Units set to {}", session.units());
                }
            }
            Action::Locate => locate(&coordinator, locator.as_ref(), &mut session).await,
            Action::Quit => break,
        }
    }

    Ok(())
}

async fn lookup(
    coordinator: &WeatherQueryCoordinator,
    session: &mut QuerySession,
    location: Result<LocationQuery, QueryError>,
) {
    let token = session.begin();
    let result = match location {
        Ok(location) => {
            eprintln!("Loading...");
            coordinator.query(&location, session.units()).await
        }
        Err(e) => Err(e),
    };
    finish(session, token, result);
}

async fn locate(
    coordinator: &WeatherQueryCoordinator,
    locator: &dyn GeoLocator,
    session: &mut QuerySession,
) {
    let token = session.begin();
    eprintln!("Locating...");
    let result = coordinator.locate_and_query(locator, session.units()).await;
    finish(session, token, result);
}

fn finish(
    session: &mut QuerySession,
    token: RequestToken,
    result: Result<WeatherReport, QueryError>,
) {
    if !session.complete(token, result) {
        debug!("Lookup superseded before it finished");
        return;
    }
    match session.state() {
        QueryState::Success(report) => print!("{}", render::report(report)),
        QueryState::Failed(err) => eprintln!("{}", render::error(&err.to_string())),
        QueryState::Idle | QueryState::Loading { .. } => {}
    }
}
