//! Client configuration for the CLI
//!
//! Layered lowest to highest: built-in defaults, `cta.toml` (or the file
//! passed with `--config`), `CTA_*` environment variables, command-line flags.

use std::path::Path;

use integration_cta::CtaConfig;

/// Config file looked up in the working directory when `--config` is absent
const DEFAULT_CONFIG_NAME: &str = "cta";

/// Environment variable prefix, e.g. `CTA_BUS_API_KEY`
const ENV_PREFIX: &str = "CTA";

/// Values given on the command line
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub train_api_key: Option<String>,
    pub bus_api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    pub debug: bool,
}

/// Load configuration from file and environment
pub fn load(path: Option<&Path>) -> Result<CtaConfig, config::ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        // Field names contain underscores, so nesting uses a double one.
        // Values are not parsed so numeric-looking keys stay verbatim.
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

    builder.build()?.try_deserialize()
}

/// Apply command-line overrides on top of a loaded configuration
pub fn apply(mut config: CtaConfig, overrides: Overrides) -> CtaConfig {
    if let Some(key) = overrides.train_api_key {
        config = config.with_train_api_key(key);
    }
    if let Some(key) = overrides.bus_api_key {
        config = config.with_bus_api_key(key);
    }
    if let Some(timeout_secs) = overrides.timeout_secs {
        config = config.with_timeout_secs(timeout_secs);
    }
    if overrides.debug {
        config = config.with_debug(true);
    }
    config
}
