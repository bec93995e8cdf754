//! HTTP server bind configuration.
//!
//! - `HOST`: interface to bind (default `0.0.0.0`)
//! - `PORT`: TCP port (default `8000`, where the dashboard client expects the API)

use std::env;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bind_address() {
        assert_eq!(ServerConfig::default().bind_address(), "0.0.0.0:8000");
    }

    #[test]
    fn test_custom_bind_address() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 9090,
        };
        assert_eq!(config.bind_address(), "127.0.0.1:9090");
    }
}
