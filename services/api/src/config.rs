//! API service configuration

use std::env;

/// HTTP listener configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

impl ApiConfig {
    /// Create a new ApiConfig from environment variables
    ///
    /// # Environment Variables
    /// - `HBNB_API_HOST`: Interface to bind (default: "0.0.0.0")
    /// - `HBNB_API_PORT`: Port to listen on (default: 5000)
    pub fn from_env() -> Self {
        let host = env::var("HBNB_API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("HBNB_API_PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(5000);

        Self { host, port }
    }

    /// Socket address in `host:port` form
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_api_config_defaults() {
        unsafe {
            std::env::remove_var("HBNB_API_HOST");
            std::env::remove_var("HBNB_API_PORT");
        }

        let config = ApiConfig::from_env();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.address(), "0.0.0.0:5000");
    }

    #[test]
    #[serial]
    fn test_api_config_custom_values() {
        unsafe {
            std::env::set_var("HBNB_API_HOST", "127.0.0.1");
            std::env::set_var("HBNB_API_PORT", "8080");
        }

        let config = ApiConfig::from_env();
        assert_eq!(config.address(), "127.0.0.1:8080");

        unsafe {
            std::env::set_var("HBNB_API_PORT", "not-a-port");
        }

        let config = ApiConfig::from_env();
        assert_eq!(config.port, 5000);

        unsafe {
            std::env::remove_var("HBNB_API_HOST");
            std::env::remove_var("HBNB_API_PORT");
        }
    }
}
