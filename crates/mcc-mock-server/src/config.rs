//! Server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Environment variable names.
pub const ENV_PORT: &str = "PORT";
pub const ENV_DELAY_MS: &str = "MOCK_DELAY_MS";
pub const ENV_SEED: &str = "MOCK_SEED";

const PORT_DEFAULT: u16 = 3001;
const RESPONSE_DELAY_DEFAULT: Duration = Duration::from_millis(500);

/// Mock server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockServerConfig {
    /// Address to bind
    pub host: IpAddr,
    /// Port to bind
    pub port: u16,
    /// Simulated processing time per `/generate` request
    pub response_delay: Duration,
    /// Selection seed (if None, generates random)
    pub seed: Option<u64>,
}

impl Default for MockServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: PORT_DEFAULT,
            response_delay: RESPONSE_DELAY_DEFAULT,
            seed: None,
        }
    }
}

impl MockServerConfig {
    /// Defaults overridden by `PORT`, `MOCK_DELAY_MS` and `MOCK_SEED`.
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parse = |name: &str| lookup(name).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            host: defaults.host,
            port: lookup(ENV_PORT)
                .and_then(|v| v.trim().parse::<u16>().ok())
                .unwrap_or(defaults.port),
            response_delay: parse(ENV_DELAY_MS)
                .map(Duration::from_millis)
                .unwrap_or(defaults.response_delay),
            seed: parse(ENV_SEED),
        }
    }

    /// Set the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the response delay.
    pub fn with_response_delay(mut self, delay: Duration) -> Self {
        self.response_delay = delay;
        self
    }

    /// Set the selection seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Socket address to bind.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
