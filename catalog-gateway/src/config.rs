//! Gateway runtime configuration.

/// Environment variable that overrides the listen address.
pub const LISTEN_ADDR_ENV: &str = "CATALOG_LISTEN_ADDR";

/// Address served when no override is set.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Settings the gateway binary needs at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct GatewayConfig {
    /// `host:port` the TCP listener binds to.
    pub listen_addr: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self { listen_addr: DEFAULT_LISTEN_ADDR.to_owned() }
    }
}

impl GatewayConfig {
    /// Build the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Unset or blank values fall back to the defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let listen_addr = lookup(LISTEN_ADDR_ENV)
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_owned());
        Self { listen_addr }
    }
}
