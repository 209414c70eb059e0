//! CTA CLI
//!
//! Command-line front end for the CTA client. Every subcommand maps to one
//! remote operation and prints the normalized response as JSON.

#![allow(clippy::print_stdout)]

mod settings;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use integration_cta::{
    BusTimeRequest, DirectionsRequest, HttpCtaClient, OperationRequest, PatternsRequest,
    PredictionsRequest, RoutesRequest, ServiceBulletinsRequest, ServiceType, StatusAlertsRequest,
    StatusRoutesRequest, StopsRequest, TrainArrivalsRequest, VehiclesRequest,
};
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CTA CLI
#[derive(Parser)]
#[command(name = "cta-cli")]
#[command(author, version, about = "Chicago Transit Authority API client", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: ./cta.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Train Tracker API key
    #[arg(long)]
    train_key: Option<String>,

    /// Bus Tracker API key
    #[arg(long)]
    bus_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Log rejected arguments and request URLs (key redacted)
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Service status of routes and stations
    ///
    /// Example: cta-cli status-routes --type rail --route Red,Blue
    StatusRoutes {
        /// Service types: bus, rail, station, systemwide
        #[arg(long = "type", value_delimiter = ',')]
        service_types: Vec<ServiceType>,

        /// Route IDs
        #[arg(long = "route", value_delimiter = ',')]
        route_ids: Vec<String>,

        /// Station IDs
        #[arg(long = "station", value_delimiter = ',')]
        station_ids: Vec<String>,
    },

    /// Customer alerts
    Alerts {
        /// Only alerts in effect now
        #[arg(long)]
        active_only: bool,

        /// Include accessibility alerts
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        accessibility: bool,

        /// Include planned alerts
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        planned: bool,

        /// Route IDs
        #[arg(long = "route", value_delimiter = ',')]
        route_ids: Vec<String>,

        /// Station IDs
        #[arg(long = "station", value_delimiter = ',')]
        station_ids: Vec<String>,

        /// Only alerts starting before this date (yyyyMMdd)
        #[arg(long)]
        start_date: Option<String>,

        /// Only alerts starting within this many days
        #[arg(long)]
        recent_days: Option<u32>,
    },

    /// Train arrival predictions
    ///
    /// Example: cta-cli arrivals --station 40360 --max 5
    Arrivals {
        /// Parent station ID (4xxxx)
        #[arg(long)]
        station: Option<String>,

        /// Platform stop ID (3xxxx)
        #[arg(long)]
        stop: Option<String>,

        /// Maximum number of results
        #[arg(long)]
        max: Option<u32>,

        /// Route code (e.g. Red, Brn, P)
        #[arg(long)]
        route: Option<String>,
    },

    /// Bus Tracker system time
    BusTime,

    /// Bus locations by vehicle or route
    Vehicles {
        /// Vehicle IDs
        #[arg(long = "vid", value_delimiter = ',')]
        vehicle_ids: Vec<String>,

        /// Route numbers
        #[arg(long = "route", value_delimiter = ',')]
        route_numbers: Vec<String>,
    },

    /// All bus routes
    Routes,

    /// Directions of a bus route
    Directions {
        /// Route number
        route: String,
    },

    /// Stops of a bus route in one direction
    ///
    /// Example: cta-cli stops 22 "North Bound"
    Stops {
        /// Route number
        route: String,

        /// Direction as returned by `directions`
        direction: String,
    },

    /// Route patterns by pattern ID or route
    Patterns {
        /// Pattern IDs
        #[arg(long = "pid", value_delimiter = ',')]
        pattern_ids: Vec<String>,

        /// Route number
        #[arg(long)]
        route: Option<String>,
    },

    /// Bus arrival predictions by stop or vehicle
    Predictions {
        /// Stop IDs
        #[arg(long = "stop", value_delimiter = ',')]
        stop_ids: Vec<String>,

        /// Route numbers (with --stop)
        #[arg(long = "route", value_delimiter = ',')]
        route_numbers: Vec<String>,

        /// Vehicle IDs
        #[arg(long = "vid", value_delimiter = ',')]
        vehicle_ids: Vec<String>,

        /// Maximum number of predictions
        #[arg(long)]
        top: Option<u32>,
    },

    /// Bus service bulletins by route or stop
    Bulletins {
        /// Route numbers
        #[arg(long = "route", value_delimiter = ',')]
        route_numbers: Vec<String>,

        /// Stop IDs
        #[arg(long = "stop", value_delimiter = ',')]
        stop_ids: Vec<String>,

        /// Route direction
        #[arg(long)]
        direction: Option<String>,
    },
}

impl Commands {
    /// Typed request for the chosen operation
    fn into_request(self) -> Box<dyn OperationRequest> {
        match self {
            Self::StatusRoutes {
                service_types,
                route_ids,
                station_ids,
            } => Box::new(
                StatusRoutesRequest::new(service_types)
                    .with_route_ids(route_ids)
                    .with_station_ids(station_ids),
            ),
            Self::Alerts {
                active_only,
                accessibility,
                planned,
                route_ids,
                station_ids,
                start_date,
                recent_days,
            } => Box::new(StatusAlertsRequest {
                active_only,
                accessibility,
                planned,
                route_ids,
                station_ids,
                by_start_date: start_date,
                recent_days,
            }),
            Self::Arrivals {
                station,
                stop,
                max,
                route,
            } => {
                let request = TrainArrivalsRequest {
                    station_id: station,
                    stop_id: stop,
                    max_results: max,
                    route_code: route,
                };
                if request.lacks_location() {
                    warn!("Neither --station nor --stop given; the service will reject the request");
                }
                Box::new(request)
            },
            Self::BusTime => Box::new(BusTimeRequest),
            Self::Vehicles {
                vehicle_ids,
                route_numbers,
            } => Box::new(VehiclesRequest {
                vehicle_ids,
                route_numbers,
            }),
            Self::Routes => Box::new(RoutesRequest),
            Self::Directions { route } => Box::new(DirectionsRequest::new(route)),
            Self::Stops { route, direction } => Box::new(StopsRequest::new(route, direction)),
            Self::Patterns { pattern_ids, route } => Box::new(PatternsRequest {
                pattern_ids,
                route_number: route,
            }),
            Self::Predictions {
                stop_ids,
                route_numbers,
                vehicle_ids,
                top,
            } => Box::new(PredictionsRequest {
                stop_ids,
                route_numbers,
                vehicle_ids,
                limit: top,
            }),
            Self::Bulletins {
                route_numbers,
                stop_ids,
                direction,
            } => Box::new(ServiceBulletinsRequest {
                route_numbers,
                stop_ids,
                direction,
            }),
        }
    }
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Resolves when the user presses Ctrl-C
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // --debug implies debug-level logs for the client crate
    let filter = if cli.debug && cli.verbose < 2 {
        format!("{},integration_cta=debug", log_filter_from_verbosity(cli.verbose))
    } else {
        log_filter_from_verbosity(cli.verbose).to_string()
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = settings::apply(
        settings::load(cli.config.as_deref())?,
        settings::Overrides {
            train_api_key: cli.train_key,
            bus_api_key: cli.bus_key,
            timeout_secs: cli.timeout,
            debug: cli.debug,
        },
    );
    debug!(?config, "Loaded configuration");

    let client = HttpCtaClient::new(&config)?;
    let request = cli.command.into_request();

    match client.send_until(request.as_ref(), interrupted()).await {
        Ok(document) => {
            println!("{}", serde_json::to_string_pretty(&document)?);
            Ok(())
        },
        Err(e) => {
            debug!(stage = %e.stage(), retryable = e.is_retryable(), "Request failed");
            Err(e.into())
        },
    }
}
