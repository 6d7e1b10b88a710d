use crate::board::controller::RevertPolicy;
use crate::board::dnd::DEFAULT_ACTIVATION_DISTANCE;
use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub api_base_url: String,
    pub http_timeout_secs: u64,
    pub drag_activation_distance: f32,
    pub revert_policy: RevertPolicy,
    pub seed_path: Option<String>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: "127.0.0.1:8080".to_string(),
            api_base_url: "http://127.0.0.1:8080".to_string(),
            http_timeout_secs: 30,
            drag_activation_distance: DEFAULT_ACTIVATION_DISTANCE,
            revert_policy: RevertPolicy::default(),
            seed_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let defaults = Config::default();

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", defaults.server_address),
            api_base_url: get_env_or("API_BASE_URL", defaults.api_base_url),
            http_timeout_secs: get_env_parse_or("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?,
            drag_activation_distance: get_env_distance_or(
                "DRAG_ACTIVATION_DISTANCE",
                defaults.drag_activation_distance,
            )?,
            revert_policy: get_env_parse_or("REVERT_POLICY", defaults.revert_policy)?,
            seed_path: env::var("SEED_PATH").ok().filter(|p| !p.trim().is_empty()),
        })
    }

    pub fn http_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.http_timeout_secs)
    }
}

fn get_env_or(name: &str, default: String) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(default)
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        _ => Ok(default),
    }
}

/// A distance in pixels: finite and not negative.
fn get_env_distance_or(name: &str, default: f32) -> Result<f32> {
    let value: f32 = get_env_parse_or(name, default)?;
    if !value.is_finite() || value < 0.0 {
        return Err(Error::Config(format!(
            "Invalid value for {}: {} (expected a finite, non-negative distance)",
            name, value
        )));
    }
    Ok(value)
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

/// The initialized configuration, or defaults when `init_config` was never
/// called.
pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}
