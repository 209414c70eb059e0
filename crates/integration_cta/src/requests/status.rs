//! Customer Alerts API requests

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::owned;
use crate::codec::rules::{check_date, check_items};
use crate::codec::{OperationRequest, QueryFragment};
use crate::endpoints::Operation;
use crate::error::ValidationError;

/// Kind of service the route status API reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Bus,
    Rail,
    Station,
    Systemwide,
}

impl ServiceType {
    /// Value sent in the `type` parameter
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bus => "bus",
            Self::Rail => "rail",
            Self::Station => "station",
            Self::Systemwide => "systemwide",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bus" => Ok(Self::Bus),
            "rail" => Ok(Self::Rail),
            "station" => Ok(Self::Station),
            "systemwide" => Ok(Self::Systemwide),
            other => Err(ValidationError::WrongShape {
                param: "type",
                reason: format!(
                    "unknown service type `{other}` (expected bus, rail, station or systemwide)"
                ),
            }),
        }
    }
}

/// Arguments for the route status operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusRoutesRequest {
    /// Service types to report on (required, non-empty)
    pub service_types: Vec<ServiceType>,
    /// GTFS route IDs to filter by
    pub route_ids: Vec<String>,
    /// GTFS station IDs to filter by
    pub station_ids: Vec<String>,
}

impl StatusRoutesRequest {
    /// Request status for the given service types
    #[must_use]
    pub fn new(service_types: impl IntoIterator<Item = ServiceType>) -> Self {
        Self {
            service_types: service_types.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Restrict to the given route IDs
    #[must_use]
    pub fn with_route_ids<I, S>(mut self, route_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route_ids = owned(route_ids);
        self
    }

    /// Restrict to the given station IDs
    #[must_use]
    pub fn with_station_ids<I, S>(mut self, station_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.station_ids = owned(station_ids);
        self
    }
}

impl OperationRequest for StatusRoutesRequest {
    fn operation(&self) -> Operation {
        Operation::StatusRoutes
    }

    fn encode(&self) -> Result<QueryFragment, ValidationError> {
        check_items("routeid", &self.route_ids)?;
        check_items("stationid", &self.station_ids)?;

        if self.service_types.is_empty() {
            return Err(ValidationError::MissingRequiredGroup {
                params: vec!["type"],
            });
        }

        let types: Vec<&str> = self.service_types.iter().copied().map(ServiceType::as_str).collect();
        let mut query = QueryFragment::new();
        query
            .push_list("type", &types)
            .push_list("routeid", &self.route_ids)
            .push_list("stationid", &self.station_ids);
        Ok(query)
    }
}

/// Arguments for the alerts operation
///
/// The three flags are always sent; their defaults match the service's
/// own documented defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusAlertsRequest {
    /// Only alerts in effect right now (default: false)
    pub active_only: bool,
    /// Include accessibility alerts such as elevator outages (default: true)
    pub accessibility: bool,
    /// Include common planned alerts (default: true)
    pub planned: bool,
    /// GTFS route IDs to filter by
    pub route_ids: Vec<String>,
    /// GTFS station IDs to filter by
    pub station_ids: Vec<String>,
    /// Only alerts starting before this `yyyyMMdd` date
    pub by_start_date: Option<String>,
    /// Only alerts starting within this many days before today
    pub recent_days: Option<u32>,
}

impl Default for StatusAlertsRequest {
    fn default() -> Self {
        Self {
            active_only: false,
            accessibility: true,
            planned: true,
            route_ids: Vec::new(),
            station_ids: Vec::new(),
            by_start_date: None,
            recent_days: None,
        }
    }
}

impl OperationRequest for StatusAlertsRequest {
    fn operation(&self) -> Operation {
        Operation::StatusAlerts
    }

    fn encode(&self) -> Result<QueryFragment, ValidationError> {
        check_items("routeid", &self.route_ids)?;
        check_items("stationid", &self.station_ids)?;
        if let Some(date) = self.by_start_date.as_deref().filter(|d| !d.trim().is_empty()) {
            check_date("bystartdate", date)?;
        }

        let mut query = QueryFragment::new();
        query
            .push_bool("activeonly", self.active_only)
            .push_bool("accessibility", self.accessibility)
            .push_bool("planned", self.planned)
            .push_list("routeid", &self.route_ids)
            .push_list("stationid", &self.station_ids)
            .push_optional("bystartdate", self.by_start_date.as_deref())
            .push_number("recentdays", self.recent_days);
        Ok(query)
    }
}
