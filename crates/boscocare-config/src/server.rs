use std::env;

use crate::env_or;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub metrics_port: u16,
    /// Public origin of the application, used to build the email
    /// verification link sent on sign-up.
    pub site_url: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_or("SERVER_PORT", 3000),
            metrics_port: env_or("METRICS_PORT", 9090),
            site_url: env::var("SITE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string()),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn metrics_address(&self) -> String {
        format!("{}:{}", self.host, self.metrics_port)
    }

    /// Where the verification email sends the user back to.
    pub fn email_redirect_url(&self) -> String {
        format!("{}/auth", self.site_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_redirect_url() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            metrics_port: 9100,
            site_url: "https://care.school.edu/".to_string(),
        };
        assert_eq!(config.email_redirect_url(), "https://care.school.edu/auth");
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.metrics_address(), "127.0.0.1:9100");
    }
}
