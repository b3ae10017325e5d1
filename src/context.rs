/// Application context and dependency injection
use crate::{
    config::ServerConfig,
    error::ResolverResult,
    resolver::{HttpUpstream, Resolver},
};
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub resolver: Arc<Resolver>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub fn new(config: ServerConfig) -> ResolverResult<Self> {
        // Validate configuration
        config.validate()?;

        let upstream = Arc::new(HttpUpstream::new(&config.upstream)?);
        let resolver = Arc::new(Resolver::new(&config.upstream, upstream));

        tracing::info!(
            sns = %config.upstream.sns_url,
            registry = %config.upstream.registry_url,
            profile = %config.upstream.profile_url,
            "resolver chain initialized"
        );

        Ok(Self::with_resolver(config, resolver))
    }

    /// Assemble a context around an already-built resolver
    pub fn with_resolver(config: ServerConfig, resolver: Arc<Resolver>) -> Self {
        Self {
            config: Arc::new(config),
            resolver,
        }
    }

    /// Get service URL
    pub fn service_url(&self) -> String {
        format!(
            "http://{}:{}",
            self.config.service.hostname, self.config.service.port
        )
    }
}
