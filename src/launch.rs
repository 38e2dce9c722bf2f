// Launch configuration read once from the page URL (or the first CLI argument natively).
use bevy::prelude::*;
use thiserror::Error;

use crate::progression::ProgressionState;

pub struct LaunchPlugin;

impl Plugin for LaunchPlugin {
    fn build(&self, app: &mut App) {
        // Inserted at build time so the initial `OnEnter` screens can already see the player.
        let config = load_launch_config();
        app.insert_resource(ProgressionState::new(config.player_name.clone()))
            .insert_resource(config);
    }
}

pub const DEFAULT_PLAYER_NAME: &str = "Player";

#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    pub player_name: String,
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("no browser window is available")]
    NoWindow,

    #[error("could not read the page location: {0}")]
    Location(String),
}

impl LaunchConfig {
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let player_name = url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "name")
            .map(|(_, value)| value.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_PLAYER_NAME.to_string());
        Self { player_name }
    }
}

#[cfg(target_arch = "wasm32")]
fn query_string() -> Result<String, LaunchError> {
    let window = web_sys::window().ok_or(LaunchError::NoWindow)?;
    window
        .location()
        .search()
        .map_err(|err| LaunchError::Location(format!("{err:?}")))
}

#[cfg(not(target_arch = "wasm32"))]
fn query_string() -> Result<String, LaunchError> {
    Ok(std::env::args().nth(1).unwrap_or_default())
}

fn load_launch_config() -> LaunchConfig {
    let query = query_string().unwrap_or_else(|err| {
        warn!("{err}; using the default player name");
        String::new()
    });
    let config = LaunchConfig::from_query(&query);
    info!("starting onboarding for {}", config.player_name);
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_name_parameter() {
        assert_eq!(LaunchConfig::from_query("?name=Grace").player_name, "Grace");
        assert_eq!(
            LaunchConfig::from_query("lang=en&name=Ada%20Lovelace").player_name,
            "Ada Lovelace"
        );
        assert_eq!(LaunchConfig::from_query("?name=Jo+Ann").player_name, "Jo Ann");
    }

    #[test]
    fn missing_or_blank_name_falls_back() {
        assert_eq!(LaunchConfig::from_query("").player_name, DEFAULT_PLAYER_NAME);
        assert_eq!(LaunchConfig::from_query("?lang=en").player_name, DEFAULT_PLAYER_NAME);
        assert_eq!(LaunchConfig::from_query("?name=%20%20").player_name, DEFAULT_PLAYER_NAME);
    }

    #[test]
    fn plugin_seeds_progression() {
        let mut app = App::new();
        app.add_plugins(LaunchPlugin);

        let progression = app.world().resource::<ProgressionState>();
        let config = app.world().resource::<LaunchConfig>();
        assert_eq!(progression.player_name, config.player_name);
        assert_eq!(progression.current_location, 0);
    }
}
