//! Endpoint registry
//!
//! Static lookup from each logical operation to the host, path and key rule
//! of the CTA API that serves it. Nothing here performs I/O.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::codec::QueryFragment;

/// Host of the Train Tracker API
pub const RAIL_HOST: &str = "lapi.transitchicago.com";

/// Host of the Bus Tracker API
pub const BUS_HOST: &str = "www.ctabustracker.com";

/// Host of the Customer Alerts API
pub const STATUS_HOST: &str = "www.transitchicago.com";

/// Query parameter carrying the API key for rail and bus requests
const KEY_PARAM: &str = "key";

/// One of the three independent CTA APIs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceFamily {
    /// Train Tracker (arrival predictions)
    Rail,
    /// Bus Tracker (vehicles, routes, predictions, bulletins)
    Bus,
    /// Customer Alerts (route status and alerts)
    Status,
}

impl ServiceFamily {
    /// Host serving every operation of this family
    #[must_use]
    pub const fn host(self) -> &'static str {
        match self {
            Self::Rail => RAIL_HOST,
            Self::Bus => BUS_HOST,
            Self::Status => STATUS_HOST,
        }
    }

    /// Query parameter the API key is embedded as, if the family needs one
    #[must_use]
    pub const fn key_param(self) -> Option<&'static str> {
        match self {
            Self::Rail | Self::Bus => Some(KEY_PARAM),
            Self::Status => None,
        }
    }

    /// Plain-HTTP base URL of the family's host
    #[must_use]
    pub fn default_base_url(self) -> String {
        format!("http://{}", self.host())
    }
}

impl fmt::Display for ServiceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rail => "rail",
            Self::Bus => "bus",
            Self::Status => "status",
        };
        f.write_str(name)
    }
}

/// Every remote capability the client exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    StatusRoutes,
    StatusAlerts,
    TrainArrivals,
    BusTime,
    Vehicles,
    Routes,
    Directions,
    Stops,
    Patterns,
    Predictions,
    ServiceBulletins,
}

impl Operation {
    /// All operations, in registry order
    pub const ALL: [Self; 11] = [
        Self::StatusRoutes,
        Self::StatusAlerts,
        Self::TrainArrivals,
        Self::BusTime,
        Self::Vehicles,
        Self::Routes,
        Self::Directions,
        Self::Stops,
        Self::Patterns,
        Self::Predictions,
        Self::ServiceBulletins,
    ];

    /// Short name used in log fields
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::StatusRoutes => "status_routes",
            Self::StatusAlerts => "status_alerts",
            Self::TrainArrivals => "train_arrivals",
            Self::BusTime => "bus_time",
            Self::Vehicles => "vehicles",
            Self::Routes => "routes",
            Self::Directions => "directions",
            Self::Stops => "stops",
            Self::Patterns => "patterns",
            Self::Predictions => "predictions",
            Self::ServiceBulletins => "service_bulletins",
        }
    }

    /// Service family serving this operation
    #[must_use]
    pub const fn family(self) -> ServiceFamily {
        match self {
            Self::StatusRoutes | Self::StatusAlerts => ServiceFamily::Status,
            Self::TrainArrivals => ServiceFamily::Rail,
            Self::BusTime
            | Self::Vehicles
            | Self::Routes
            | Self::Directions
            | Self::Stops
            | Self::Patterns
            | Self::Predictions
            | Self::ServiceBulletins => ServiceFamily::Bus,
        }
    }

    /// Registry entry for this operation
    #[must_use]
    pub const fn endpoint(self) -> Endpoint {
        resolve(self)
    }
}

/// Where and how an operation is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Family owning the endpoint
    pub family: ServiceFamily,
    /// Default host
    pub host: &'static str,
    /// Absolute path on the host
    pub path: &'static str,
    /// Query parameter the family's API key goes into, if any
    pub key_param: Option<&'static str>,
}

/// Look up the endpoint serving an operation
#[must_use]
pub const fn resolve(operation: Operation) -> Endpoint {
    let path = match operation {
        Operation::StatusRoutes => "/api/1.0/routes.aspx",
        Operation::StatusAlerts => "/api/1.0/alerts.aspx",
        Operation::TrainArrivals => "/api/1.0/ttarrivals.aspx",
        Operation::BusTime => "/bustime/api/v1/gettime",
        Operation::Vehicles => "/bustime/api/v1/getvehicles",
        Operation::Routes => "/bustime/api/v1/getroutes",
        Operation::Directions => "/bustime/api/v1/getdirections",
        Operation::Stops => "/bustime/api/v1/getstops",
        Operation::Patterns => "/bustime/api/v1/getpatterns",
        Operation::Predictions => "/bustime/api/v1/getpredictions",
        Operation::ServiceBulletins => "/bustime/api/v1/getservicebulletins",
    };
    let family = operation.family();

    Endpoint {
        family,
        host: family.host(),
        path,
        key_param: family.key_param(),
    }
}

impl Endpoint {
    /// Build the full request URL against `base_url`
    ///
    /// The key, when the endpoint takes one, is placed first in the query,
    /// followed by the operation's own parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn request_url(
        &self,
        base_url: &str,
        key: Option<&str>,
        query: &QueryFragment,
    ) -> Result<Url, url::ParseError> {
        let mut full = QueryFragment::new();
        if let (Some(param), Some(key)) = (self.key_param, key) {
            full.push_scalar(param, key);
        }
        full.extend(query);

        let mut url = Url::parse(&format!("{}{}", base_url.trim_end_matches('/'), self.path))?;
        if !full.is_empty() {
            url.set_query(Some(&full.to_string()));
        }
        Ok(url)
    }
}
