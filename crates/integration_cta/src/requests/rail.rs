//! Train Tracker API requests

use crate::codec::{OperationRequest, QueryFragment};
use crate::endpoints::Operation;
use crate::error::ValidationError;

/// Arguments for train arrival predictions
///
/// The service answers only when a station (`mapid`) or a stop (`stpid`) is
/// given; that requirement is left to the service to enforce.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainArrivalsRequest {
    /// Parent station ID (`mapid`, 4xxxx)
    pub station_id: Option<String>,
    /// Platform stop ID (`stpid`, 3xxxx)
    pub stop_id: Option<String>,
    /// Maximum number of predictions (`max`)
    pub max_results: Option<u32>,
    /// Single route code to filter by (`rt`, e.g. `Red`)
    pub route_code: Option<String>,
}

impl TrainArrivalsRequest {
    /// Predictions for every platform of a station
    #[must_use]
    pub fn for_station(station_id: impl Into<String>) -> Self {
        Self {
            station_id: Some(station_id.into()),
            ..Self::default()
        }
    }

    /// Predictions for a single platform
    #[must_use]
    pub fn for_stop(stop_id: impl Into<String>) -> Self {
        Self {
            stop_id: Some(stop_id.into()),
            ..Self::default()
        }
    }

    /// Limit the number of predictions returned
    #[must_use]
    pub const fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Only predictions for one route
    #[must_use]
    pub fn with_route_code(mut self, route_code: impl Into<String>) -> Self {
        self.route_code = Some(route_code.into());
        self
    }

    /// Returns true if neither a station nor a stop was given
    #[must_use]
    pub fn lacks_location(&self) -> bool {
        let blank = |v: &Option<String>| v.as_deref().is_none_or(|s| s.trim().is_empty());
        blank(&self.station_id) && blank(&self.stop_id)
    }
}

impl OperationRequest for TrainArrivalsRequest {
    fn operation(&self) -> Operation {
        Operation::TrainArrivals
    }

    fn encode(&self) -> Result<QueryFragment, ValidationError> {
        let mut query = QueryFragment::new();
        query
            .push_optional("mapid", self.station_id.as_deref())
            .push_optional("stpid", self.stop_id.as_deref())
            .push_number("max", self.max_results)
            .push_optional("rt", self.route_code.as_deref());
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_request() {
        let query = TrainArrivalsRequest::for_station("40360")
            .with_max_results(1)
            .encode()
            .unwrap();
        assert_eq!(query.to_string(), "mapid=40360&max=1");
    }

    #[test]
    fn test_stop_request_with_route() {
        let query = TrainArrivalsRequest::for_stop("30161")
            .with_route_code("Red")
            .encode()
            .unwrap();
        assert_eq!(query.to_string(), "stpid=30161&rt=Red");
    }

    #[test]
    fn test_blank_values_are_omitted() {
        let request = TrainArrivalsRequest {
            station_id: Some(String::new()),
            stop_id: Some("30161".to_string()),
            ..TrainArrivalsRequest::default()
        };
        assert_eq!(request.encode().unwrap().to_string(), "stpid=30161");
    }

    #[test]
    fn test_whitespace_station_is_omitted() {
        let request = TrainArrivalsRequest {
            station_id: Some("   ".to_string()),
            stop_id: Some("30161".to_string()),
            ..TrainArrivalsRequest::default()
        };
        assert_eq!(request.encode().unwrap().get("mapid"), None);
        assert_eq!(request.encode().unwrap().to_string(), "stpid=30161");

        let request = TrainArrivalsRequest {
            station_id: Some(" ".to_string()),
            ..TrainArrivalsRequest::default()
        };
        assert!(request.lacks_location());
        assert!(request.encode().unwrap().is_empty());
    }

    #[test]
    fn test_missing_location_is_not_a_local_error() {
        let request = TrainArrivalsRequest::default();
        assert!(request.lacks_location());
        assert!(request.encode().unwrap().is_empty());
        assert!(!TrainArrivalsRequest::for_stop("30161").lacks_location());
    }
}
