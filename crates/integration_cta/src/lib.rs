//! Unified client for the Chicago Transit Authority APIs
//!
//! Wraps three independent services behind one facade:
//!
//! - **Train Tracker** (`lapi.transitchicago.com`): arrival predictions
//! - **Bus Tracker** (`www.ctabustracker.com`): vehicles, routes, stops,
//!   patterns, predictions and service bulletins
//! - **Customer Alerts** (`www.transitchicago.com`): route status and alerts
//!
//! # Architecture
//!
//! Each operation takes a typed request from [`requests`]. The request
//! validates and encodes itself into a [`QueryFragment`]; the [`endpoints`]
//! registry supplies the host, path and key rule; a [`Transport`] performs
//! the GET; and the [`normalizer`] turns the XML body into a
//! [`RemoteDocument`] or a service fault. [`CtaClient`] defines the facade,
//! implemented by [`HttpCtaClient`].
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_cta::{CtaClient, CtaConfig, HttpCtaClient, VehiclesRequest};
//!
//! let config = CtaConfig::new(train_key, bus_key);
//! let client = HttpCtaClient::new(&config)?;
//!
//! let doc = client.vehicles(&VehiclesRequest::by_routes(["22", "36"])).await?;
//! for vehicle in doc.records_named("vehicle") {
//!     println!("{:?} heading to {:?}", vehicle.field("vid"), vehicle.field("des"));
//! }
//! ```

pub mod codec;
pub mod endpoints;
pub mod normalizer;
pub mod requests;

mod client;
mod config;
mod document;
mod error;
mod transport;

pub use client::{CtaClient, HttpCtaClient};
pub use codec::{OperationRequest, QueryFragment};
pub use config::CtaConfig;
pub use document::{Node, RemoteDocument, ServiceFault};
pub use endpoints::{Endpoint, Operation, ServiceFamily};
pub use error::{CtaError, ParseError, Stage, TransportError, ValidationError};
pub use requests::{
    BusTimeRequest, DirectionsRequest, PatternsRequest, PredictionsRequest, RoutesRequest,
    ServiceBulletinsRequest, ServiceType, StatusAlertsRequest, StatusRoutesRequest, StopsRequest,
    TrainArrivalsRequest, VehiclesRequest,
};
pub use transport::{HttpResponse, ReqwestTransport, Transport};
