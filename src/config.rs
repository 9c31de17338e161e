//! Startup configuration.
//!
//! Built once in `main` and handed to the server by reference — nothing in
//! this crate reads the environment after startup.

use std::time::Duration;

use tracing::warn;

const DEFAULT_PORT: u16 = 8080;

/// Runtime configuration for the service.
///
/// The timeouts are deliberately not environment-tunable: they are part of
/// the service's operational contract, not a deployment knob.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen port. `PORT` overrides the default of 8080.
    pub port: u16,
    /// Deadline for reading a request's head off the socket.
    pub read_timeout: Duration,
    /// Allowance for producing and writing one response.
    pub write_timeout: Duration,
    /// How long a keep-alive connection may sit between requests.
    pub idle_timeout: Duration,
    /// How long shutdown waits for in-flight requests before force-closing.
    pub shutdown_grace: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            read_timeout: Duration::from_secs(15),
            write_timeout: Duration::from_secs(15),
            idle_timeout: Duration::from_secs(60),
            shutdown_grace: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Resolves configuration from the process environment.
    ///
    /// `PORT` unset or empty falls back to 8080. A value that does not
    /// parse as a port is logged and also falls back.
    pub fn from_env() -> Self {
        let port = parse_port(std::env::var("PORT").ok().as_deref());
        Self { port, ..Self::default() }
    }
}

fn parse_port(raw: Option<&str>) -> u16 {
    match raw {
        None => DEFAULT_PORT,
        Some("") => DEFAULT_PORT,
        Some(value) => value.parse().unwrap_or_else(|_| {
            warn!(value, fallback = DEFAULT_PORT, "PORT is not a valid port, using default");
            DEFAULT_PORT
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_port_defaults() {
        assert_eq!(parse_port(None), 8080);
    }

    #[test]
    fn empty_port_defaults() {
        assert_eq!(parse_port(Some("")), 8080);
    }

    #[test]
    fn explicit_port_wins() {
        assert_eq!(parse_port(Some("9999")), 9999);
    }

    #[test]
    fn garbage_port_defaults() {
        assert_eq!(parse_port(Some("not-a-port")), 8080);
        assert_eq!(parse_port(Some("70000")), 8080);
    }

    #[test]
    fn default_timeouts() {
        let config = Config::default();
        assert_eq!(config.read_timeout, Duration::from_secs(15));
        assert_eq!(config.write_timeout, Duration::from_secs(15));
        assert_eq!(config.idle_timeout, Duration::from_secs(60));
        assert_eq!(config.shutdown_grace, Duration::from_secs(30));
    }
}
