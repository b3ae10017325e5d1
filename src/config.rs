/// Configuration management for the resolve gateway
use crate::error::{ResolverError, ResolverResult};
use serde::{Deserialize, Serialize};
use std::env;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_SNS_URL: &str = "https://sns-sdk-proxy.bonfida.workers.dev";
pub const DEFAULT_REGISTRY_URL: &str = "https://alldomains.id";
pub const DEFAULT_PROFILE_URL: &str = "https://api.phantom.app";
pub const DEFAULT_PROFILE_CHAIN_KEY: &str = "solana:101";
pub const DEFAULT_NAME_SUFFIX: &str = ".sol";
pub const DEFAULT_LOG_FILTER: &str = "resolve_gateway=debug,tower_http=debug";

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub upstream: UpstreamConfig,
    pub logging: LoggingConfig,
}

/// Listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
}

/// Upstream resolution services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Name-service proxy base URL (SNS)
    pub sns_url: String,
    /// Domain-ownership registry base URL (AllDomains)
    pub registry_url: String,
    /// Wallet-profile service base URL (Phantom)
    pub profile_url: String,
    /// Key of the Solana mainnet entry in a profile's `addresses` map
    pub profile_chain_key: String,
    /// Reserved top-level suffix routed to the name service
    pub name_suffix: String,
    pub user_agent: String,
    /// Transport timeout; `None` leaves hung upstreams to the caller
    pub timeout_secs: Option<u64>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            sns_url: DEFAULT_SNS_URL.to_string(),
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            profile_url: DEFAULT_PROFILE_URL.to_string(),
            profile_chain_key: DEFAULT_PROFILE_CHAIN_KEY.to_string(),
            name_suffix: DEFAULT_NAME_SUFFIX.to_string(),
            user_agent: format!("resolve-gateway/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, taken from `RUST_LOG`
    pub level: String,
    pub json: bool,
}

impl LoggingConfig {
    /// Build the subscriber filter, falling back to the default directives
    /// when `level` does not parse
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ResolverResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("RESOLVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("RESOLVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ResolverError::Config("Invalid port number".to_string()))?;

        let defaults = UpstreamConfig::default();
        let timeout_secs = match env::var("RESOLVER_UPSTREAM_TIMEOUT_SECS") {
            Ok(raw) if !raw.trim().is_empty() => Some(raw.trim().parse::<u64>().map_err(|_| {
                ResolverError::Config(format!("Invalid upstream timeout: {}", raw))
            })?),
            _ => None,
        };

        let upstream = UpstreamConfig {
            sns_url: env::var("RESOLVER_SNS_URL").unwrap_or(defaults.sns_url),
            registry_url: env::var("RESOLVER_REGISTRY_URL").unwrap_or(defaults.registry_url),
            profile_url: env::var("RESOLVER_PROFILE_URL").unwrap_or(defaults.profile_url),
            profile_chain_key: env::var("RESOLVER_PROFILE_CHAIN_KEY")
                .unwrap_or(defaults.profile_chain_key),
            name_suffix: env::var("RESOLVER_NAME_SUFFIX")
                .map(|s| s.to_lowercase())
                .unwrap_or(defaults.name_suffix),
            user_agent: env::var("RESOLVER_USER_AGENT").unwrap_or(defaults.user_agent),
            timeout_secs,
        };

        let level = env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());
        let json = env::var("RESOLVER_LOG_FORMAT")
            .map(|f| f.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(ServerConfig {
            service: ServiceConfig { hostname, port },
            upstream,
            logging: LoggingConfig { level, json },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> ResolverResult<()> {
        if self.service.hostname.is_empty() {
            return Err(ResolverError::Config("Hostname cannot be empty".to_string()));
        }

        for (name, url) in [
            ("RESOLVER_SNS_URL", &self.upstream.sns_url),
            ("RESOLVER_REGISTRY_URL", &self.upstream.registry_url),
            ("RESOLVER_PROFILE_URL", &self.upstream.profile_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ResolverError::Config(format!(
                    "{} must be an http(s) URL, got {:?}",
                    name, url
                )));
            }
        }

        if !self.upstream.name_suffix.starts_with('.') || self.upstream.name_suffix.len() < 2 {
            return Err(ResolverError::Config(
                "Name suffix must look like `.sol`".to_string(),
            ));
        }

        if self.upstream.profile_chain_key.is_empty() {
            return Err(ResolverError::Config(
                "Profile chain key cannot be empty".to_string(),
            ));
        }

        if self.upstream.timeout_secs == Some(0) {
            return Err(ResolverError::Config(
                "Upstream timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Address the HTTP listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.service.hostname, self.service.port)
    }
}
