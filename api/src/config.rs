//! Layered configuration for the server binary
//!
//! Environment variables read by [`AppConfig::from_env`] form the base layer.
//! An optional per-environment file (`config/development.toml` and friends)
//! and `IDN_`-prefixed variables such as `IDN_SERVER__PORT=9090` override it.

use config::{Config, ConfigError, Environment as EnvironmentSource, File};
use idn_shared::AppConfig;

const ENV_PREFIX: &str = "IDN";

pub fn load_config() -> Result<AppConfig, ConfigError> {
    let base = AppConfig::from_env();
    let config_file = base.environment.config_file();

    Config::builder()
        .add_source(Config::try_from(&base)?)
        .add_source(File::with_name(config_file).required(false))
        .add_source(
            EnvironmentSource::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}
