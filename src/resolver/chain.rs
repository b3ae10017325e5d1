/// Resolver - drives the ordered strategy chain for one identifier
use crate::{
    config::UpstreamConfig,
    error::{ResolutionError, ResolverError},
    metrics,
    resolver::{
        strategy::{
            DirectStrategy, DomainRegistryStrategy, NameServiceStrategy, Strategy,
            WalletProfileStrategy,
        },
        upstream::UpstreamClient,
        Outcome, Resolution, Source,
    },
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Ordered chain of resolution strategies
pub struct Resolver {
    strategies: Vec<Box<dyn Strategy>>,
}

impl Resolver {
    /// Build the standard chain: direct, name service, domain registry,
    /// wallet profile
    pub fn new(config: &UpstreamConfig, client: Arc<dyn UpstreamClient>) -> Self {
        Self::with_strategies(vec![
            Box::new(DirectStrategy),
            Box::new(NameServiceStrategy::new(
                client.clone(),
                config.sns_url.clone(),
                &config.name_suffix,
            )),
            Box::new(DomainRegistryStrategy::new(
                client.clone(),
                config.registry_url.clone(),
                &config.name_suffix,
            )),
            Box::new(WalletProfileStrategy::new(
                client,
                config.profile_url.clone(),
                config.profile_chain_key.clone(),
            )),
        ])
    }

    /// Build a resolver from an explicit strategy list, tried in order
    pub fn with_strategies(strategies: Vec<Box<dyn Strategy>>) -> Self {
        Self { strategies }
    }

    /// Resolve `identifier` to a canonical address
    ///
    /// The first strategy whose predicate matches and whose attempt succeeds
    /// wins. A soft miss moves on to the next strategy; any error ends the
    /// request.
    pub async fn resolve(&self, identifier: &str) -> Result<Resolution, ResolutionError> {
        let start = Instant::now();

        match self.run_chain(identifier).await {
            Ok(Some((address, source))) => {
                let resolve_time = elapsed_ms(start);
                metrics::record_resolution(source.as_str(), resolve_time);
                info!(identifier, %source, address = %address, resolve_time, "resolved");
                Ok(Resolution {
                    address,
                    source,
                    resolve_time,
                })
            }
            Ok(None) => {
                let error = ResolverError::Internal(format!(
                    "No resolution strategy produced an address for {}",
                    identifier
                ));
                Err(self.fail(error, start))
            }
            Err(error) => Err(self.fail(error, start)),
        }
    }

    async fn run_chain(
        &self,
        identifier: &str,
    ) -> Result<Option<(String, Source)>, ResolverError> {
        if identifier.is_empty() {
            return Err(ResolverError::MissingIdentifier);
        }

        for strategy in &self.strategies {
            let source = strategy.source();
            match strategy.evaluate(identifier).await? {
                Outcome::Matched(address) => return Ok(Some((address, source))),
                Outcome::NotApplicable => {
                    debug!(identifier, %source, "strategy not applicable");
                }
                Outcome::SoftMiss => {
                    debug!(identifier, %source, "strategy declined, falling through");
                }
            }
        }

        Ok(None)
    }

    fn fail(&self, error: ResolverError, start: Instant) -> ResolutionError {
        let elapsed = elapsed_ms(start);
        metrics::record_failure(error.kind(), elapsed);
        if error.is_client_error() {
            debug!(error = %error, "rejected resolution request");
        } else {
            warn!(error = %error, elapsed_ms = elapsed, "resolution failed");
        }
        ResolutionError::new(error, elapsed)
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
