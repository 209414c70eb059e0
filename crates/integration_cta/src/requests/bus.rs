//! Bus Tracker API requests

use super::owned;
use crate::codec::rules::{
    Branch, Group, MAX_LIST_ITEMS, at_least_one_of, check_cardinality, check_items,
    exactly_one_of, require_scalar,
};
use crate::codec::{OperationRequest, QueryFragment};
use crate::endpoints::Operation;
use crate::error::ValidationError;

/// Arguments for the system time operation (none)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusTimeRequest;

impl OperationRequest for BusTimeRequest {
    fn operation(&self) -> Operation {
        Operation::BusTime
    }

    fn encode(&self) -> Result<QueryFragment, ValidationError> {
        Ok(QueryFragment::new())
    }
}

/// Arguments for the route list operation (none)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoutesRequest;

impl OperationRequest for RoutesRequest {
    fn operation(&self) -> Operation {
        Operation::Routes
    }

    fn encode(&self) -> Result<QueryFragment, ValidationError> {
        Ok(QueryFragment::new())
    }
}

/// Vehicle lookup: by vehicle IDs or by route numbers, never both
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehiclesRequest {
    /// Vehicle IDs (`vid`, up to 10)
    pub vehicle_ids: Vec<String>,
    /// Route designators (`rt`, up to 10)
    pub route_numbers: Vec<String>,
}

impl VehiclesRequest {
    /// Look up specific vehicles
    #[must_use]
    pub fn by_vehicle_ids<I, S>(vehicle_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vehicle_ids: owned(vehicle_ids),
            route_numbers: Vec::new(),
        }
    }

    /// Look up every vehicle on the given routes
    #[must_use]
    pub fn by_routes<I, S>(route_numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vehicle_ids: Vec::new(),
            route_numbers: owned(route_numbers),
        }
    }
}

impl OperationRequest for VehiclesRequest {
    fn operation(&self) -> Operation {
        Operation::Vehicles
    }

    fn encode(&self) -> Result<QueryFragment, ValidationError> {
        check_items("vid", &self.vehicle_ids)?;
        check_items("rt", &self.route_numbers)?;

        let branch = exactly_one_of(
            Group::list("vid", &self.vehicle_ids),
            Group::list("rt", &self.route_numbers),
        )?;

        let mut query = QueryFragment::new();
        match branch {
            Branch::First => {
                check_cardinality("vid", &self.vehicle_ids, MAX_LIST_ITEMS)?;
                query.push_list("vid", &self.vehicle_ids);
            },
            Branch::Second => {
                check_cardinality("rt", &self.route_numbers, MAX_LIST_ITEMS)?;
                query.push_list("rt", &self.route_numbers);
            },
        }
        Ok(query)
    }
}

/// Directions served by a route
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectionsRequest {
    /// Route designator (`rt`)
    pub route_number: String,
}

impl DirectionsRequest {
    #[must_use]
    pub fn new(route_number: impl Into<String>) -> Self {
        Self {
            route_number: route_number.into(),
        }
    }
}

impl OperationRequest for DirectionsRequest {
    fn operation(&self) -> Operation {
        Operation::Directions
    }

    fn encode(&self) -> Result<QueryFragment, ValidationError> {
        require_scalar("rt", &self.route_number)?;

        let mut query = QueryFragment::new();
        query.push_scalar("rt", &self.route_number);
        Ok(query)
    }
}

/// Stops of a route in one direction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopsRequest {
    /// Route designator (`rt`)
    pub route_number: String,
    /// Direction as returned by the directions operation (`dir`, e.g. `East Bound`)
    pub direction: String,
}

impl StopsRequest {
    #[must_use]
    pub fn new(route_number: impl Into<String>, direction: impl Into<String>) -> Self {
        Self {
            route_number: route_number.into(),
            direction: direction.into(),
        }
    }
}

impl OperationRequest for StopsRequest {
    fn operation(&self) -> Operation {
        Operation::Stops
    }

    fn encode(&self) -> Result<QueryFragment, ValidationError> {
        require_scalar("rt", &self.route_number)?;
        require_scalar("dir", &self.direction)?;

        let mut query = QueryFragment::new();
        query
            .push_scalar("rt", &self.route_number)
            .push_scalar("dir", &self.direction);
        Ok(query)
    }
}

/// Pattern lookup: by pattern IDs or by a single route, never both
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternsRequest {
    /// Pattern IDs (`pid`, up to 10)
    pub pattern_ids: Vec<String>,
    /// Single route designator (`rt`)
    pub route_number: Option<String>,
}

impl PatternsRequest {
    /// Look up specific patterns
    #[must_use]
    pub fn by_pattern_ids<I, S>(pattern_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pattern_ids: owned(pattern_ids),
            route_number: None,
        }
    }

    /// Look up every pattern of a route
    #[must_use]
    pub fn by_route(route_number: impl Into<String>) -> Self {
        Self {
            pattern_ids: Vec::new(),
            route_number: Some(route_number.into()),
        }
    }
}

impl OperationRequest for PatternsRequest {
    fn operation(&self) -> Operation {
        Operation::Patterns
    }

    fn encode(&self) -> Result<QueryFragment, ValidationError> {
        check_items("pid", &self.pattern_ids)?;

        let branch = exactly_one_of(
            Group::list("pid", &self.pattern_ids),
            Group::scalar("rt", self.route_number.as_deref()),
        )?;

        let mut query = QueryFragment::new();
        match branch {
            Branch::First => {
                check_cardinality("pid", &self.pattern_ids, MAX_LIST_ITEMS)?;
                query.push_list("pid", &self.pattern_ids);
            },
            Branch::Second => {
                query.push_optional("rt", self.route_number.as_deref());
            },
        }
        Ok(query)
    }
}

/// Arrival predictions: for stops (optionally narrowed to routes) or for vehicles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictionsRequest {
    /// Stop IDs (`stpid`, up to 10)
    pub stop_ids: Vec<String>,
    /// Routes narrowing a stop query (`rt`, up to 10)
    pub route_numbers: Vec<String>,
    /// Vehicle IDs (`vid`, up to 10)
    pub vehicle_ids: Vec<String>,
    /// Maximum number of predictions (`top`)
    pub limit: Option<u32>,
}

impl PredictionsRequest {
    /// Predictions for the given stops
    #[must_use]
    pub fn for_stops<I, S>(stop_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stop_ids: owned(stop_ids),
            ..Self::default()
        }
    }

    /// Predictions for the given vehicles
    #[must_use]
    pub fn for_vehicles<I, S>(vehicle_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vehicle_ids: owned(vehicle_ids),
            ..Self::default()
        }
    }

    /// Only predictions for these routes (stop queries only)
    #[must_use]
    pub fn with_routes<I, S>(mut self, route_numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route_numbers = owned(route_numbers);
        self
    }

    /// Limit the number of predictions returned
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl OperationRequest for PredictionsRequest {
    fn operation(&self) -> Operation {
        Operation::Predictions
    }

    fn encode(&self) -> Result<QueryFragment, ValidationError> {
        check_items("stpid", &self.stop_ids)?;
        check_items("rt", &self.route_numbers)?;
        check_items("vid", &self.vehicle_ids)?;

        // Route numbers belong to the stop branch.
        let stop_branch = Group {
            name: if self.stop_ids.is_empty() && !self.route_numbers.is_empty() {
                "rt"
            } else {
                "stpid"
            },
            present: !self.stop_ids.is_empty() || !self.route_numbers.is_empty(),
        };
        let branch = exactly_one_of(stop_branch, Group::list("vid", &self.vehicle_ids))?;

        let mut query = QueryFragment::new();
        match branch {
            Branch::First => {
                if self.stop_ids.is_empty() {
                    return Err(ValidationError::MissingRequiredGroup {
                        params: vec!["stpid"],
                    });
                }
                check_cardinality("stpid", &self.stop_ids, MAX_LIST_ITEMS)?;
                check_cardinality("rt", &self.route_numbers, MAX_LIST_ITEMS)?;
                query
                    .push_list("stpid", &self.stop_ids)
                    .push_list("rt", &self.route_numbers);
            },
            Branch::Second => {
                check_cardinality("vid", &self.vehicle_ids, MAX_LIST_ITEMS)?;
                query.push_list("vid", &self.vehicle_ids);
            },
        }
        query.push_number("top", self.limit);
        Ok(query)
    }
}

/// Service bulletins for routes and/or stops
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceBulletinsRequest {
    /// Route designators (`rt`, up to 10)
    pub route_numbers: Vec<String>,
    /// Stop IDs (`stpid`, up to 10)
    pub stop_ids: Vec<String>,
    /// Route direction (`rtdir`, e.g. `North Bound`)
    pub direction: Option<String>,
}

impl ServiceBulletinsRequest {
    /// Bulletins for the given routes
    #[must_use]
    pub fn for_routes<I, S>(route_numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            route_numbers: owned(route_numbers),
            ..Self::default()
        }
    }

    /// Bulletins for the given stops
    #[must_use]
    pub fn for_stops<I, S>(stop_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stop_ids: owned(stop_ids),
            ..Self::default()
        }
    }

    /// Only bulletins for one direction of travel
    #[must_use]
    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }
}

impl OperationRequest for ServiceBulletinsRequest {
    fn operation(&self) -> Operation {
        Operation::ServiceBulletins
    }

    fn encode(&self) -> Result<QueryFragment, ValidationError> {
        check_items("rt", &self.route_numbers)?;
        check_items("stpid", &self.stop_ids)?;

        at_least_one_of(&[
            Group::list("rt", &self.route_numbers),
            Group::list("stpid", &self.stop_ids),
        ])?;
        check_cardinality("rt", &self.route_numbers, MAX_LIST_ITEMS)?;
        check_cardinality("stpid", &self.stop_ids, MAX_LIST_ITEMS)?;

        let mut query = QueryFragment::new();
        query
            .push_list("rt", &self.route_numbers)
            .push_optional("rtdir", self.direction.as_deref())
            .push_list("stpid", &self.stop_ids);
        Ok(query)
    }
}
