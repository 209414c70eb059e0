//! Typed arguments for every remote operation
//!
//! Each request type implements [`OperationRequest`](crate::codec::OperationRequest)
//! and is the only way arguments reach the wire. Fields are public so callers
//! can build them directly; validation happens when the request is encoded.

mod bus;
mod rail;
mod status;

pub use bus::{
    BusTimeRequest, DirectionsRequest, PatternsRequest, PredictionsRequest, RoutesRequest,
    ServiceBulletinsRequest, StopsRequest, VehiclesRequest,
};
pub use rail::TrainArrivalsRequest;
pub use status::{ServiceType, StatusAlertsRequest, StatusRoutesRequest};

/// Collect any string-like iterator into owned strings
fn owned<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}
