//! Process configuration from environment variables.
//!
//! | Variable | Default | |
//! |---|---|---|
//! | `HOST` | `0.0.0.0` | listen host |
//! | `PORT` | `8080` | listen port |
//! | `SHUTDOWN_GRACE_SECS` | `5` | how long in-flight requests may run after SIGTERM |
//! | `LOG_FORMAT` | `pretty` | `json` or `pretty` |
//! | `DATASTORE` | `memory` | `memory` or `dummy` |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::telemetry::LogFormat;

/// Which [`Database`](crate::db::Database) implementation to run with.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DatastoreKind {
    #[default]
    Memory,
    Dummy,
}

impl FromStr for DatastoreKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "dummy" => Ok(Self::Dummy),
            _ => Err(()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: expected {expected}")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub addr: SocketAddr,
    pub shutdown_grace: Duration,
    pub log_format: LogFormat,
    pub datastore: DatastoreKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080),
            shutdown_grace: Duration::from_secs(5),
            log_format: LogFormat::Pretty,
            datastore: DatastoreKind::Memory,
        }
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::Invalid { var, value, expected })
}

impl Config {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads configuration through `lookup`; unset or blank variables keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host: IpAddr = parse(&lookup, "HOST", "an IP address")?.unwrap_or(defaults.addr.ip());
        let port: u16 = parse(&lookup, "PORT", "a port number")?.unwrap_or(defaults.addr.port());
        let grace = parse::<u64>(&lookup, "SHUTDOWN_GRACE_SECS", "whole seconds")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.shutdown_grace);
        let log_format =
            parse(&lookup, "LOG_FORMAT", "`json` or `pretty`")?.unwrap_or(defaults.log_format);
        let datastore =
            parse(&lookup, "DATASTORE", "`memory` or `dummy`")?.unwrap_or(defaults.datastore);

        Ok(Self {
            addr: SocketAddr::new(host, port),
            shutdown_grace: grace,
            log_format,
            datastore,
        })
    }
}
