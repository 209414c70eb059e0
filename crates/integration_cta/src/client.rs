//! CTA service facade
//!
//! One method per remote operation. Every call runs the same pipeline:
//! encode the arguments, attach the family's key, send one GET, check the
//! status, and normalize the XML body.

use std::future::Future;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::codec::OperationRequest;
use crate::config::CtaConfig;
use crate::document::RemoteDocument;
use crate::error::{CtaError, TransportError, ValidationError};
use crate::normalizer::{self, ExpectedShape};
use crate::requests::{
    BusTimeRequest, DirectionsRequest, PatternsRequest, PredictionsRequest, RoutesRequest,
    ServiceBulletinsRequest, StatusAlertsRequest, StatusRoutesRequest, StopsRequest,
    TrainArrivalsRequest, VehiclesRequest,
};
use crate::transport::{ReqwestTransport, Transport};

/// Longest error body kept on a [`TransportError::Status`]
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Trait for CTA clients
#[async_trait]
pub trait CtaClient: Send + Sync {
    /// Service status of routes and stations (Customer Alerts)
    async fn status_routes(&self, request: &StatusRoutesRequest) -> Result<RemoteDocument, CtaError>;

    /// Active and planned alerts (Customer Alerts)
    async fn status_alerts(&self, request: &StatusAlertsRequest) -> Result<RemoteDocument, CtaError>;

    /// Arrival predictions for a station or stop (Train Tracker)
    async fn train_arrivals(&self, request: &TrainArrivalsRequest) -> Result<RemoteDocument, CtaError>;

    /// Current system time (Bus Tracker)
    async fn bus_time(&self) -> Result<RemoteDocument, CtaError>;

    /// Vehicle locations by vehicle or route (Bus Tracker)
    async fn vehicles(&self, request: &VehiclesRequest) -> Result<RemoteDocument, CtaError>;

    /// All routes (Bus Tracker)
    async fn routes(&self) -> Result<RemoteDocument, CtaError>;

    /// Directions served by a route (Bus Tracker)
    async fn directions(&self, request: &DirectionsRequest) -> Result<RemoteDocument, CtaError>;

    /// Stops of a route in one direction (Bus Tracker)
    async fn stops(&self, request: &StopsRequest) -> Result<RemoteDocument, CtaError>;

    /// Patterns by pattern ID or route (Bus Tracker)
    async fn patterns(&self, request: &PatternsRequest) -> Result<RemoteDocument, CtaError>;

    /// Arrival predictions by stop or vehicle (Bus Tracker)
    async fn predictions(&self, request: &PredictionsRequest) -> Result<RemoteDocument, CtaError>;

    /// Service bulletins by route or stop (Bus Tracker)
    async fn service_bulletins(
        &self,
        request: &ServiceBulletinsRequest,
    ) -> Result<RemoteDocument, CtaError>;
}

/// HTTP client for the three CTA APIs
#[derive(Debug)]
pub struct HttpCtaClient<T = ReqwestTransport> {
    transport: T,
    config: CtaConfig,
}

impl HttpCtaClient {
    /// Create a new client backed by reqwest
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &CtaConfig) -> Result<Self, CtaError> {
        config.validate().map_err(CtaError::Configuration)?;
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> HttpCtaClient<T> {
    /// Create a client over an existing transport
    #[must_use]
    pub fn with_transport(config: &CtaConfig, transport: T) -> Self {
        Self {
            transport,
            config: config.clone(),
        }
    }

    /// Get the configuration
    #[must_use]
    pub const fn config(&self) -> &CtaConfig {
        &self.config
    }

    /// Run any operation's request through the pipeline
    ///
    /// # Errors
    ///
    /// Returns the first stage that fails; see [`CtaError`].
    pub async fn send<R>(&self, request: &R) -> Result<RemoteDocument, CtaError>
    where
        R: OperationRequest + ?Sized,
    {
        let operation = request.operation();
        let endpoint = operation.endpoint();

        let query = request.encode().inspect_err(|e| {
            if self.config.debug {
                debug!(operation = operation.name(), reason = %e, "Arguments rejected");
            }
        })?;

        let key = match endpoint.key_param {
            Some(_) => Some(self.config.key(endpoint.family).ok_or(
                ValidationError::MissingCredential {
                    family: endpoint.family,
                },
            )?),
            None => None,
        };

        let base_url = self.config.base_url(endpoint.family);
        let url = endpoint
            .request_url(base_url, key, &query)
            .map_err(|e| CtaError::Configuration(format!("invalid base URL {base_url}: {e}")))?;

        if self.config.debug {
            debug!(
                operation = operation.name(),
                url = %redact_key(&url, endpoint.key_param),
                "Sending request"
            );
        }

        let response = self.transport.get(&url).await?;
        if !response.is_success() {
            warn!(status = response.status, operation = operation.name(), "Non-success status");
            return Err(TransportError::Status {
                status: response.status,
                body: response.body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            }
            .into());
        }

        let shape = ExpectedShape::for_operation(operation);
        let document = normalizer::normalize(&response.body, &shape).inspect_err(|e| {
            if let CtaError::ServiceError(fault) = e {
                warn!(operation = operation.name(), %fault, "Service reported an error");
            }
        })?;
        debug!(
            operation = operation.name(),
            records = document.record_count(),
            faults = document.faults().len(),
            "Request completed"
        );
        Ok(document)
    }

    /// Like [`send`](Self::send), but gives up as soon as `cancel` resolves
    ///
    /// # Errors
    ///
    /// Returns `TransportFailure(Cancelled)` if `cancel` resolves first.
    pub async fn send_until<R, F>(&self, request: &R, cancel: F) -> Result<RemoteDocument, CtaError>
    where
        R: OperationRequest + ?Sized,
        F: Future<Output = ()> + Send,
    {
        tokio::select! {
            biased;
            () = cancel => {
                debug!(operation = request.operation().name(), "Request cancelled");
                Err(TransportError::Cancelled.into())
            },
            result = self.send(request) => result,
        }
    }
}

/// Render a request URL with the key value hidden
fn redact_key(url: &Url, key_param: Option<&str>) -> String {
    let (Some(param), Some(query)) = (key_param, url.query()) else {
        return url.to_string();
    };

    let query = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((name, _)) if name == param => format!("{name}=[REDACTED]"),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{query}", &url[..url::Position::AfterPath])
}

#[async_trait]
impl<T: Transport> CtaClient for HttpCtaClient<T> {
    #[instrument(skip(self))]
    async fn status_routes(&self, request: &StatusRoutesRequest) -> Result<RemoteDocument, CtaError> {
        self.send(request).await
    }

    #[instrument(skip(self))]
    async fn status_alerts(&self, request: &StatusAlertsRequest) -> Result<RemoteDocument, CtaError> {
        self.send(request).await
    }

    #[instrument(skip(self))]
    async fn train_arrivals(&self, request: &TrainArrivalsRequest) -> Result<RemoteDocument, CtaError> {
        if request.lacks_location() {
            warn!("Train arrivals requested without mapid or stpid; the service will reject it");
        }
        self.send(request).await
    }

    #[instrument(skip(self))]
    async fn bus_time(&self) -> Result<RemoteDocument, CtaError> {
        self.send(&BusTimeRequest).await
    }

    #[instrument(skip(self))]
    async fn vehicles(&self, request: &VehiclesRequest) -> Result<RemoteDocument, CtaError> {
        self.send(request).await
    }

    #[instrument(skip(self))]
    async fn routes(&self) -> Result<RemoteDocument, CtaError> {
        self.send(&RoutesRequest).await
    }

    #[instrument(skip(self))]
    async fn directions(&self, request: &DirectionsRequest) -> Result<RemoteDocument, CtaError> {
        self.send(request).await
    }

    #[instrument(skip(self))]
    async fn stops(&self, request: &StopsRequest) -> Result<RemoteDocument, CtaError> {
        self.send(request).await
    }

    #[instrument(skip(self))]
    async fn patterns(&self, request: &PatternsRequest) -> Result<RemoteDocument, CtaError> {
        self.send(request).await
    }

    #[instrument(skip(self))]
    async fn predictions(&self, request: &PredictionsRequest) -> Result<RemoteDocument, CtaError> {
        self.send(request).await
    }

    #[instrument(skip(self))]
    async fn service_bulletins(
        &self,
        request: &ServiceBulletinsRequest,
    ) -> Result<RemoteDocument, CtaError> {
        self.send(request).await
    }
}
