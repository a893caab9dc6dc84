use crate::error::{AgrocastError, Result};
use crate::models::DEFAULT_FIELD_ID;
use dialoguer::{Confirm, Input};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const APP_DIR: &str = "agrocast";
const DB_FILE: &str = "agrocast.db";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub rate_limit: RateLimitConfig,
    pub seed: SeedConfig,
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
    pub allow_any_origin: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            allow_any_origin: true,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Accepts a number or a string, so `port: ${PORT}` works after substitution
fn deserialize_port<'de, D>(deserializer: D) -> std::result::Result<u16, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortValue {
        Number(u16),
        Text(String),
    }

    match PortValue::deserialize(deserializer)? {
        PortValue::Number(port) => Ok(port),
        PortValue::Text(value) => value.trim().parse::<u16>().map_err(|_| {
            D::Error::custom(format!(
                "invalid port '{}' - ensure the PORT environment variable is set",
                value
            ))
        }),
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub requests: u32,
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests: 100,
            window_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SeedConfig {
    pub on_startup: bool,
    pub field_id: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            on_startup: true,
            field_id: DEFAULT_FIELD_ID.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub field_id: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            field_id: DEFAULT_FIELD_ID.into(),
        }
    }
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(AgrocastError::Config(format!(
                "Config file not found at {:?}. Run `agrocast init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| AgrocastError::Config(format!("Failed to read config: {}", e)))?;

        let mut config = Self::from_yaml(&config_str)?;
        config.apply_env_overrides();
        tracing::debug!(path = %config_path.display(), "Configuration loaded");

        Ok(config)
    }

    /// Load from disk, falling back to defaults when no config file exists.
    pub fn load_or_default(config_override: Option<PathBuf>) -> Result<Self> {
        if Self::exists(config_override.as_ref()) {
            return Self::load(config_override);
        }

        tracing::warn!("No config file found, using defaults");
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    fn from_yaml(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AgrocastError::Config(format!("Failed to parse config: {}", e)))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("PORT") {
            match port.parse::<u16>() {
                Ok(p) => self.server.port = p,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid PORT"),
            }
        }
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let default_path = Self::default_config_path()?;
        Ok(default_path)
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/agrocast/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AgrocastError::Config("Cannot determine config directory".into()))?
            .join(APP_DIR);
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the loaded Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        let defaults = Self::default();

        println!();
        println!("Let's set up agrocast!");
        println!();

        println!("Server");
        let host: String = Input::new()
            .with_prompt("  Bind host")
            .default(defaults.server.host.clone())
            .interact_text()
            .map_err(input_error)?;

        let port: u16 = Input::new()
            .with_prompt("  Port")
            .default(defaults.server.port)
            .interact_text()
            .map_err(input_error)?;

        let allow_any_origin = Confirm::new()
            .with_prompt("  Allow cross-origin requests from any origin?")
            .default(defaults.server.allow_any_origin)
            .interact()
            .map_err(input_error)?;

        println!();

        println!("Rate limiting");
        let requests: u32 = Input::new()
            .with_prompt("  Requests per window")
            .default(defaults.rate_limit.requests)
            .interact_text()
            .map_err(input_error)?;

        let window_secs: u64 = Input::new()
            .with_prompt("  Window length (seconds)")
            .default(defaults.rate_limit.window_secs)
            .interact_text()
            .map_err(input_error)?;

        println!();

        println!("Fields");
        let field_id: String = Input::new()
            .with_prompt("  Default field id")
            .default(defaults.defaults.field_id.clone())
            .interact_text()
            .map_err(input_error)?;

        let on_startup = Confirm::new()
            .with_prompt("  Seed mock data into an empty database on startup?")
            .default(defaults.seed.on_startup)
            .interact()
            .map_err(input_error)?;

        println!();

        let config = Config {
            server: ServerConfig {
                host,
                port,
                allow_any_origin,
            },
            storage: StorageConfig::default(),
            rate_limit: RateLimitConfig {
                enabled: requests > 0,
                requests,
                window_secs,
            },
            seed: SeedConfig {
                on_startup,
                field_id: field_id.clone(),
            },
            defaults: DefaultsConfig { field_id },
        };

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| AgrocastError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# agrocast configuration\n# Generated by `agrocast init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| AgrocastError::Config(format!("Bad substitution pattern: {}", e)))?;

        let mut result = content.to_string();
        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        Ok(result)
    }

    /// Resolve the data directory: CLI flag, then `AGROCAST_DATA_DIR`,
    /// then `storage.data_dir`, then the XDG data directory.
    pub fn data_dir(&self, data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        let dir = if let Some(dir) = data_dir_override {
            dir.clone()
        } else if let Ok(dir) = std::env::var("AGROCAST_DATA_DIR") {
            PathBuf::from(dir)
        } else if let Some(dir) = &self.storage.data_dir {
            dir.clone()
        } else {
            dirs::data_dir()
                .ok_or_else(|| AgrocastError::Config("Cannot determine data directory".into()))?
                .join(APP_DIR)
        };

        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    pub fn db_path(&self, data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(self.data_dir(data_dir_override)?.join(DB_FILE))
    }
}

fn input_error(e: dialoguer::Error) -> AgrocastError {
    AgrocastError::Config(format!("Input error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.server.bind_addr(), "0.0.0.0:8000");
        assert!(config.server.allow_any_origin);
        assert_eq!(config.rate_limit.requests, 100);
        assert_eq!(config.rate_limit.window_secs, 60);
        assert!(config.seed.on_startup);
        assert_eq!(config.defaults.field_id, "field_001");
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config = Config::from_yaml("server:\n  port: 9000\nseed:\n  on_startup: false\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(!config.seed.on_startup);
        assert_eq!(config.seed.field_id, "field_001");
        assert!(config.rate_limit.enabled);
    }

    #[test]
    fn example_config_parses() {
        let config = Config::from_yaml(include_str!("../config/config.yaml.example")).unwrap();
        assert_eq!(config.server.port, 8000);
        assert!(config.storage.data_dir.is_none());
        assert_eq!(config.seed.field_id, "field_001");
    }

    #[test]
    fn port_accepts_quoted_string() {
        let config = Config::from_yaml("server:\n  port: \"8081\"\n").unwrap();
        assert_eq!(config.server.port, 8081);

        assert!(Config::from_yaml("server:\n  port: \"not-a-port\"\n").is_err());
    }

    #[test]
    fn substitutes_known_env_vars() {
        let path = std::env::var("PATH").unwrap();
        let out = Config::substitute_env_vars("a: ${PATH}\nb: ${AGROCAST_SURELY_UNSET_VAR}\n").unwrap();
        assert_eq!(out, format!("a: {}\nb: ${{AGROCAST_SURELY_UNSET_VAR}}\n", path));
    }

    #[test]
    fn data_dir_prefers_cli_override() {
        let dir = std::env::temp_dir().join("agrocast-config-test");
        let config = Config::default();
        let db_path = config.db_path(Some(&dir)).unwrap();
        assert_eq!(db_path, dir.join("agrocast.db"));
        assert!(dir.exists());
    }
}
