//! CTA client configuration

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::endpoints::ServiceFamily;

/// Configuration for the CTA client
#[derive(Clone, Serialize, Deserialize)]
pub struct CtaConfig {
    /// Train Tracker API key (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub train_api_key: Option<SecretString>,

    /// Bus Tracker API key (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub bus_api_key: Option<SecretString>,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Log validation failures and request URLs (key redacted)
    #[serde(default)]
    pub debug: bool,

    /// Base URL of the Train Tracker API
    #[serde(default = "default_rail_base_url")]
    pub rail_base_url: String,

    /// Base URL of the Bus Tracker API
    #[serde(default = "default_bus_base_url")]
    pub bus_base_url: String,

    /// Base URL of the Customer Alerts API
    #[serde(default = "default_status_base_url")]
    pub status_base_url: String,
}

impl std::fmt::Debug for CtaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CtaConfig")
            .field(
                "train_api_key",
                &if self.train_api_key.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .field(
                "bus_api_key",
                &if self.bus_api_key.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("debug", &self.debug)
            .field("rail_base_url", &self.rail_base_url)
            .field("bus_base_url", &self.bus_base_url)
            .field("status_base_url", &self.status_base_url)
            .finish()
    }
}

const fn default_timeout_secs() -> u64 {
    300
}

const fn default_connect_timeout_secs() -> u64 {
    1
}

fn default_rail_base_url() -> String {
    ServiceFamily::Rail.default_base_url()
}

fn default_bus_base_url() -> String {
    ServiceFamily::Bus.default_base_url()
}

fn default_status_base_url() -> String {
    ServiceFamily::Status.default_base_url()
}

impl Default for CtaConfig {
    fn default() -> Self {
        Self {
            train_api_key: None,
            bus_api_key: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            debug: false,
            rail_base_url: default_rail_base_url(),
            bus_base_url: default_bus_base_url(),
            status_base_url: default_status_base_url(),
        }
    }
}

impl CtaConfig {
    /// Create a configuration with both keys set
    #[must_use]
    pub fn new(train_api_key: impl Into<String>, bus_api_key: impl Into<String>) -> Self {
        Self::default()
            .with_train_api_key(train_api_key)
            .with_bus_api_key(bus_api_key)
    }

    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            debug: true,
            ..Self::new("test-train-key", "test-bus-key")
        }
    }

    /// Set the Train Tracker key
    #[must_use]
    pub fn with_train_api_key(mut self, key: impl Into<String>) -> Self {
        self.train_api_key = Some(SecretString::from(key.into()));
        self
    }

    /// Set the Bus Tracker key
    #[must_use]
    pub fn with_bus_api_key(mut self, key: impl Into<String>) -> Self {
        self.bus_api_key = Some(SecretString::from(key.into()));
        self
    }

    /// Point every family at the same base URL (mock servers, proxies)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.rail_base_url.clone_from(&base_url);
        self.bus_base_url.clone_from(&base_url);
        self.status_base_url = base_url;
        self
    }

    /// Set the whole-request timeout
    #[must_use]
    pub const fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Enable or disable debug diagnostics
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Base URL requests of `family` are sent to
    #[must_use]
    pub fn base_url(&self, family: ServiceFamily) -> &str {
        match family {
            ServiceFamily::Rail => &self.rail_base_url,
            ServiceFamily::Bus => &self.bus_base_url,
            ServiceFamily::Status => &self.status_base_url,
        }
    }

    /// API key for `family`, if one is configured and non-blank
    ///
    /// The status family takes no key and always yields `None`.
    #[must_use]
    pub fn key(&self, family: ServiceFamily) -> Option<&str> {
        let secret = match family {
            ServiceFamily::Rail => self.train_api_key.as_ref(),
            ServiceFamily::Bus => self.bus_api_key.as_ref(),
            ServiceFamily::Status => None,
        };
        secret
            .map(|s| s.expose_secret())
            .filter(|k| !k.trim().is_empty())
    }

    /// Validate the configuration
    ///
    /// Keys are optional here; a missing key is reported per call.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.connect_timeout_secs == 0 {
            return Err("connect_timeout_secs must be greater than 0".to_string());
        }

        for family in [ServiceFamily::Rail, ServiceFamily::Bus, ServiceFamily::Status] {
            let base_url = self.base_url(family);
            if base_url.is_empty() {
                return Err(format!("{family}_base_url must not be empty"));
            }
            if url::Url::parse(base_url).is_err() {
                return Err(format!("{family}_base_url is not a valid URL: {base_url}"));
            }
        }

        Ok(())
    }
}
