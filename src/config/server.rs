//! HTTP listener settings.
//!
//! Both values come from the environment (optionally via `.env`) with local defaults.

use std::net::SocketAddr;

use crate::errors::{Error, Result};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Address the API listens on, from `BIND_ADDR`.
pub fn get_bind_address() -> Result<SocketAddr> {
    let raw = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    parse_bind_address(&raw)
}

/// Path of the seed file, from `LAUNDRY_CONFIG`.
#[must_use]
pub fn get_config_path() -> String {
    std::env::var("LAUNDRY_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

fn parse_bind_address(raw: &str) -> Result<SocketAddr> {
    raw.trim().parse().map_err(|e| Error::Config {
        message: format!("Invalid BIND_ADDR \"{raw}\": {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bind_address() -> Result<()> {
        let addr = parse_bind_address("0.0.0.0:3000")?;
        assert_eq!(addr.port(), 3000);
        Ok(())
    }

    #[test]
    fn test_parse_bind_address_rejects_garbage() {
        let result = parse_bind_address("localhost");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
