//! `[serve]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 4321                 # HTTP port number
//! ```
//!
//! Use `interface = "0.0.0.0"` to make the feed reachable from LAN.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use serde::Deserialize;

/// Feed endpoint settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    pub interface: IpAddr,

    /// HTTP port number (retried upward when taken).
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 4321,
        }
    }
}

impl ServeConfig {
    /// Base URL of the local endpoint, used when no `site.url` is set.
    pub fn local_url(&self) -> String {
        local_url_for(SocketAddr::new(self.interface, self.port))
    }
}

/// `http://` URL reaching `addr` from this machine.
///
/// A wildcard bind (`0.0.0.0`, `::`) is reached through loopback.
pub fn local_url_for(mut addr: SocketAddr) -> String {
    match addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => addr.set_ip(Ipv4Addr::LOCALHOST.into()),
        IpAddr::V6(ip) if ip.is_unspecified() => addr.set_ip(Ipv6Addr::LOCALHOST.into()),
        _ => {}
    }
    format!("http://{addr}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.serve.port, 4321);
        assert_eq!(config.serve.interface, IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[test]
    fn test_custom_config() {
        let config = test_parse_config("[serve]\ninterface = \"0.0.0.0\"\nport = 8080");
        assert_eq!(config.serve.port, 8080);
        assert_eq!(config.serve.interface, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }

    #[test]
    fn test_local_url() {
        let mut serve = ServeConfig::default();
        assert_eq!(serve.local_url(), "http://127.0.0.1:4321");

        serve.interface = "::1".parse().unwrap();
        assert_eq!(serve.local_url(), "http://[::1]:4321");
    }

    #[test]
    fn test_local_url_for_wildcard_bind() {
        let mut serve = ServeConfig {
            interface: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
        };
        assert_eq!(serve.local_url(), "http://127.0.0.1:8080");

        serve.interface = "::".parse().unwrap();
        assert_eq!(serve.local_url(), "http://[::1]:8080");

        let bound = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 4322);
        assert_eq!(local_url_for(bound), "http://127.0.0.1:4322");
    }
}
