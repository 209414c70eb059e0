//! Integration tests for CLI
//!
//! These tests verify CLI functionality without running actual commands,
//! but instead test the command parsing and structure.

#![allow(clippy::panic)] // Allow panic! in tests for clear failure messages

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

// Mock CLI structure for testing (mirrors main.rs)
#[derive(Parser)]
#[command(name = "cta-cli")]
#[command(author, version, about = "Chicago Transit Authority API client", long_about = None)]
struct Cli {
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    train_key: Option<String>,

    #[arg(long)]
    bus_key: Option<String>,

    #[arg(long)]
    timeout: Option<u64>,

    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    StatusRoutes {
        #[arg(long = "type", value_delimiter = ',')]
        service_types: Vec<String>,
        #[arg(long = "route", value_delimiter = ',')]
        route_ids: Vec<String>,
        #[arg(long = "station", value_delimiter = ',')]
        station_ids: Vec<String>,
    },
    Alerts {
        #[arg(long)]
        active_only: bool,
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        accessibility: bool,
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        planned: bool,
        #[arg(long)]
        start_date: Option<String>,
    },
    Arrivals {
        #[arg(long)]
        station: Option<String>,
        #[arg(long)]
        stop: Option<String>,
        #[arg(long)]
        max: Option<u32>,
        #[arg(long)]
        route: Option<String>,
    },
    BusTime,
    Vehicles {
        #[arg(long = "vid", value_delimiter = ',')]
        vehicle_ids: Vec<String>,
        #[arg(long = "route", value_delimiter = ',')]
        route_numbers: Vec<String>,
    },
    Routes,
    Directions {
        route: String,
    },
    Stops {
        route: String,
        direction: String,
    },
    Bulletins {
        #[arg(long = "route", value_delimiter = ',')]
        route_numbers: Vec<String>,
        #[arg(long)]
        direction: Option<String>,
    },
}

fn parse_args(args: &[&str]) -> Result<Cli, clap::Error> {
    let os_args: Vec<OsString> = args.iter().map(OsString::from).collect();
    Cli::try_parse_from(os_args)
}

#[test]
fn cli_parses_routes_command() {
    let cli = parse_args(&["cta-cli", "routes"]).unwrap();
    assert!(matches!(cli.command, Commands::Routes));
}

#[test]
fn cli_parses_bus_time_command() {
    let cli = parse_args(&["cta-cli", "bus-time"]).unwrap();
    assert!(matches!(cli.command, Commands::BusTime));
}

#[test]
fn cli_parses_comma_separated_vehicle_ids() {
    let cli = parse_args(&["cta-cli", "vehicles", "--vid", "1462,1463"]).unwrap();
    if let Commands::Vehicles {
        vehicle_ids,
        route_numbers,
    } = cli.command
    {
        assert_eq!(vehicle_ids, vec!["1462", "1463"]);
        assert!(route_numbers.is_empty());
    } else {
        panic!("Expected Vehicles command");
    }
}

#[test]
fn cli_parses_repeated_route_flags() {
    let cli = parse_args(&["cta-cli", "vehicles", "--route", "22", "--route", "36"]).unwrap();
    if let Commands::Vehicles { route_numbers, .. } = cli.command {
        assert_eq!(route_numbers, vec!["22", "36"]);
    } else {
        panic!("Expected Vehicles command");
    }
}

#[test]
fn cli_parses_stops_with_spaced_direction() {
    let cli = parse_args(&["cta-cli", "stops", "22", "North Bound"]).unwrap();
    if let Commands::Stops { route, direction } = cli.command {
        assert_eq!(route, "22");
        assert_eq!(direction, "North Bound");
    } else {
        panic!("Expected Stops command");
    }
}

#[test]
fn cli_stops_requires_direction() {
    let result = parse_args(&["cta-cli", "stops", "22"]);
    assert!(result.is_err());
}

#[test]
fn cli_directions_requires_route() {
    let result = parse_args(&["cta-cli", "directions"]);
    assert!(result.is_err());
}

#[test]
fn cli_parses_arrivals_command() {
    let cli = parse_args(&["cta-cli", "arrivals", "--station", "40360", "--max", "5"]).unwrap();
    if let Commands::Arrivals {
        station,
        stop,
        max,
        route,
    } = cli.command
    {
        assert_eq!(station.as_deref(), Some("40360"));
        assert!(stop.is_none());
        assert_eq!(max, Some(5));
        assert!(route.is_none());
    } else {
        panic!("Expected Arrivals command");
    }
}

#[test]
fn cli_arrivals_rejects_non_numeric_max() {
    let result = parse_args(&["cta-cli", "arrivals", "--stop", "30161", "--max", "lots"]);
    assert!(result.is_err());
}

#[test]
fn cli_parses_status_routes_types() {
    let cli = parse_args(&["cta-cli", "status-routes", "--type", "bus,rail", "--route", "Red"]).unwrap();
    if let Commands::StatusRoutes {
        service_types,
        route_ids,
        station_ids,
    } = cli.command
    {
        assert_eq!(service_types, vec!["bus", "rail"]);
        assert_eq!(route_ids, vec!["Red"]);
        assert!(station_ids.is_empty());
    } else {
        panic!("Expected StatusRoutes command");
    }
}

#[test]
fn cli_alerts_defaults() {
    let cli = parse_args(&["cta-cli", "alerts"]).unwrap();
    if let Commands::Alerts {
        active_only,
        accessibility,
        planned,
        start_date,
    } = cli.command
    {
        assert!(!active_only);
        assert!(accessibility);
        assert!(planned);
        assert!(start_date.is_none());
    } else {
        panic!("Expected Alerts command");
    }
}

#[test]
fn cli_alerts_flags_can_be_disabled() {
    let cli = parse_args(&["cta-cli", "alerts", "--planned", "false", "--active-only"]).unwrap();
    if let Commands::Alerts {
        active_only,
        planned,
        ..
    } = cli.command
    {
        assert!(active_only);
        assert!(!planned);
    } else {
        panic!("Expected Alerts command");
    }
}

#[test]
fn cli_parses_bulletins_direction() {
    let cli = parse_args(&["cta-cli", "bulletins", "--route", "11", "--direction", "North Bound"]).unwrap();
    if let Commands::Bulletins {
        route_numbers,
        direction,
    } = cli.command
    {
        assert_eq!(route_numbers, vec!["11"]);
        assert_eq!(direction.as_deref(), Some("North Bound"));
    } else {
        panic!("Expected Bulletins command");
    }
}

#[test]
fn cli_parses_global_options() {
    let cli = parse_args(&[
        "cta-cli",
        "--config",
        "/etc/cta.toml",
        "--bus-key",
        "abc123",
        "--timeout",
        "10",
        "--debug",
        "routes",
    ])
    .unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("/etc/cta.toml")));
    assert_eq!(cli.bus_key.as_deref(), Some("abc123"));
    assert!(cli.train_key.is_none());
    assert_eq!(cli.timeout, Some(10));
    assert!(cli.debug);
}

#[test]
fn cli_parses_verbose_flag() {
    let cli = parse_args(&["cta-cli", "-v", "routes"]).unwrap();
    assert_eq!(cli.verbose, 1);
}

#[test]
fn cli_parses_multiple_verbose_flags() {
    let cli = parse_args(&["cta-cli", "-vvv", "routes"]).unwrap();
    assert_eq!(cli.verbose, 3);
}

#[test]
fn cli_requires_subcommand() {
    let result = parse_args(&["cta-cli"]);
    assert!(result.is_err());
}

#[test]
fn cli_rejects_unknown_subcommand() {
    let result = parse_args(&["cta-cli", "ferries"]);
    assert!(result.is_err());
}
