//! Environment-driven server configuration

use crate::error::ServerError;
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Default port, matching what the dashboard calls
pub const DEFAULT_PORT: u16 = 5000;

/// Where the server listens and what it loads
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Directory holding the artifacts and city junction CSVs
    pub data_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from("data"),
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT` and `TRAFFIC_DATA_DIR` from the environment
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup, using defaults for missing keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("HOST") {
            config.host = host
                .trim()
                .parse()
                .map_err(|e| ServerError::Config(format!("HOST={:?}: {}", host, e)))?;
        }
        if let Some(port) = lookup("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|e| ServerError::Config(format!("PORT={:?}: {}", port, e)))?;
        }
        if let Some(dir) = lookup("TRAFFIC_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    /// Socket address to bind
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
