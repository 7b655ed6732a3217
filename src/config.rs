use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use crate::error::ConfigError;

/// Tuning knobs for a [`Server`](crate::Server).
///
/// The listening port is not part of the config: it is passed to
/// [`Server::start`](crate::Server::start). Every field has a default, so a
/// TOML document only needs to name what it overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    /// Size of a single socket read.
    pub buffer_size: usize,

    /// Byte budget for the request line plus header block.
    pub max_head_size: usize,
    pub max_body_size: usize,

    /// Deadline for receiving the whole request, head and body.
    #[serde(deserialize_with = "deserialize_duration")]
    pub read_timeout: Duration,

    #[serde(deserialize_with = "deserialize_duration")]
    pub write_timeout: Duration,

    /// How long `stop` waits for in-flight connections to drain.
    #[serde(deserialize_with = "deserialize_duration")]
    pub shutdown_timeout: Duration,

    /// Value of the `Server` header, added when the handler sets none.
    pub server_name: Option<String>,
    pub send_date: bool,

    /// Answer malformed requests with `400 Bad Request` instead of just
    /// closing the connection.
    pub respond_on_malformed: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            buffer_size: 4096,

            max_head_size: 8192,
            max_body_size: 1024 * 1024, // 1 MB

            read_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(5),
            shutdown_timeout: Duration::from_secs(5),

            server_name: None,
            send_date: false,
            respond_on_malformed: true,
        }
    }
}

impl ServerConfig {
    /// Parses a TOML document, falling back to defaults for missing keys.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config = toml::from_str::<ServerConfig>(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_size == 0 {
            return Err(ConfigError::Invalid("buffer_size must be greater than zero"));
        }
        if self.max_head_size == 0 {
            return Err(ConfigError::Invalid("max_head_size must be greater than zero"));
        }
        if self.read_timeout.is_zero() || self.write_timeout.is_zero() {
            return Err(ConfigError::Invalid("timeouts must be greater than zero"));
        }
        Ok(())
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
}
