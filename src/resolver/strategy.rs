/// Resolution strategies
///
/// Each strategy pairs a predicate over the raw identifier with a procedure
/// that either produces the canonical address, declines (soft miss), or
/// fails the whole request.
use crate::{
    error::{ResolverError, ResolverResult},
    resolver::{
        address::is_valid_address,
        upstream::{endpoint, fetch, UpstreamClient},
        Outcome, Source,
    },
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// A single resolution technique
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Source tag reported when this strategy wins
    fn source(&self) -> Source;

    /// Whether this strategy applies to `identifier`
    fn matches(&self, identifier: &str) -> bool;

    /// Run the strategy. Only called when `matches` returned true.
    async fn attempt(&self, identifier: &str) -> ResolverResult<Outcome>;

    /// Check the predicate, then attempt
    async fn evaluate(&self, identifier: &str) -> ResolverResult<Outcome> {
        if !self.matches(identifier) {
            return Ok(Outcome::NotApplicable);
        }
        self.attempt(identifier).await
    }
}

/// Identifier is already a Solana address
pub struct DirectStrategy;

#[async_trait]
impl Strategy for DirectStrategy {
    fn source(&self) -> Source {
        Source::Direct
    }

    fn matches(&self, identifier: &str) -> bool {
        is_valid_address(identifier)
    }

    async fn attempt(&self, identifier: &str) -> ResolverResult<Outcome> {
        Ok(Outcome::Matched(identifier.to_string()))
    }
}

const SNS_SERVICE: &str = "sns";

#[derive(Debug, Deserialize)]
struct SnsResponse {
    result: Option<String>,
}

/// `.sol` names via the SNS proxy
pub struct NameServiceStrategy {
    client: Arc<dyn UpstreamClient>,
    base_url: String,
    suffix: String,
}

impl NameServiceStrategy {
    pub fn new(client: Arc<dyn UpstreamClient>, base_url: impl Into<String>, suffix: &str) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            suffix: suffix.to_lowercase(),
        }
    }
}

#[async_trait]
impl Strategy for NameServiceStrategy {
    fn source(&self) -> Source {
        Source::Nameservice
    }

    fn matches(&self, identifier: &str) -> bool {
        identifier.to_lowercase().ends_with(&self.suffix)
    }

    async fn attempt(&self, identifier: &str) -> ResolverResult<Outcome> {
        let url = endpoint(&self.base_url, "resolve", identifier);
        let body: SnsResponse = fetch(self.client.as_ref(), SNS_SERVICE, &url).await?;

        match body.result.filter(|r| !r.is_empty()) {
            Some(address) => Ok(Outcome::Matched(address)),
            None => Err(ResolverError::MissingField {
                service: SNS_SERVICE,
                field: "result".to_string(),
            }),
        }
    }
}

const REGISTRY_SERVICE: &str = "alldomains";

/// Any other dotted domain via the AllDomains owner registry
pub struct DomainRegistryStrategy {
    client: Arc<dyn UpstreamClient>,
    base_url: String,
    excluded_suffix: String,
}

impl DomainRegistryStrategy {
    /// `excluded_suffix` is the name-service suffix, which this strategy
    /// never handles
    pub fn new(
        client: Arc<dyn UpstreamClient>,
        base_url: impl Into<String>,
        excluded_suffix: &str,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            excluded_suffix: excluded_suffix.to_lowercase(),
        }
    }
}

#[async_trait]
impl Strategy for DomainRegistryStrategy {
    fn source(&self) -> Source {
        Source::DomainRegistry
    }

    fn matches(&self, identifier: &str) -> bool {
        identifier.contains('.') && !identifier.to_lowercase().ends_with(&self.excluded_suffix)
    }

    async fn attempt(&self, identifier: &str) -> ResolverResult<Outcome> {
        let url = endpoint(&self.base_url, "api/domain-owner", identifier);
        let body: Map<String, Value> =
            fetch(self.client.as_ref(), REGISTRY_SERVICE, &url).await?;

        // Any answer other than a string "success" with a string owner falls
        // through, and the registry's own error detail is dropped.
        let status = body.get("status").and_then(Value::as_str);
        let owner = body.get("owner").and_then(Value::as_str);
        match (status, owner) {
            (Some("success"), Some(owner)) if !owner.is_empty() => {
                Ok(Outcome::Matched(owner.to_string()))
            }
            _ => {
                tracing::debug!(
                    identifier,
                    status = %body.get("status").unwrap_or(&serde_json::Value::Null),
                    "registry declined"
                );
                Ok(Outcome::SoftMiss)
            }
        }
    }
}

const PROFILE_SERVICE: &str = "phantom";

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    addresses: Option<HashMap<String, Value>>,
}

/// Phantom wallet profile lookup, the unconditional last resort
pub struct WalletProfileStrategy {
    client: Arc<dyn UpstreamClient>,
    base_url: String,
    chain_key: String,
}

impl WalletProfileStrategy {
    pub fn new(
        client: Arc<dyn UpstreamClient>,
        base_url: impl Into<String>,
        chain_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            chain_key: chain_key.into(),
        }
    }
}

#[async_trait]
impl Strategy for WalletProfileStrategy {
    fn source(&self) -> Source {
        Source::WalletProfile
    }

    fn matches(&self, _identifier: &str) -> bool {
        true
    }

    async fn attempt(&self, identifier: &str) -> ResolverResult<Outcome> {
        let url = endpoint(&self.base_url, "user/v1/profiles", identifier);
        let body: ProfileResponse = fetch(self.client.as_ref(), PROFILE_SERVICE, &url).await?;

        let addresses = body.addresses.ok_or_else(|| ResolverError::MissingField {
            service: PROFILE_SERVICE,
            field: "addresses".to_string(),
        })?;

        addresses
            .get(&self.chain_key)
            .and_then(Value::as_str)
            .filter(|a| !a.is_empty())
            .map(|a| Outcome::Matched(a.to_string()))
            .ok_or_else(|| ResolverError::MissingField {
                service: PROFILE_SERVICE,
                field: format!("addresses.{}", self.chain_key),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    /// Returns the same body for every call and records requested URLs
    struct CannedUpstream {
        body: ResolverResult<Value>,
        calls: Mutex<Vec<String>>,
    }

    impl CannedUpstream {
        fn ok(body: Value) -> Arc<Self> {
            Arc::new(Self {
                body: Ok(body),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                body: Err(ResolverError::Upstream {
                    service: "test",
                    message: "connection reset".to_string(),
                }),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl UpstreamClient for CannedUpstream {
        async fn get_json(&self, service: &'static str, url: &str) -> ResolverResult<Value> {
            self.calls.lock().unwrap().push(url.to_string());
            match &self.body {
                Ok(v) => Ok(v.clone()),
                Err(e) => Err(ResolverError::Upstream {
                    service,
                    message: e.to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_direct_returns_identifier_unchanged() {
        let outcome = DirectStrategy
            .evaluate("11111111111111111111111111111111")
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Matched("11111111111111111111111111111111".to_string())
        );

        let outcome = DirectStrategy.evaluate("example.sol").await.unwrap();
        assert_eq!(outcome, Outcome::NotApplicable);
    }

    #[tokio::test]
    async fn test_name_service_suffix_is_case_insensitive() {
        let upstream = CannedUpstream::ok(json!({ "result": "ABC123" }));
        let strategy = NameServiceStrategy::new(upstream.clone(), "https://sns.test", ".sol");

        assert!(strategy.matches("example.sol"));
        assert!(strategy.matches("Example.SOL"));
        assert!(!strategy.matches("example.com"));
        assert!(!strategy.matches("solana"));

        let outcome = strategy.evaluate("Example.SOL").await.unwrap();
        assert_eq!(outcome, Outcome::Matched("ABC123".to_string()));
        assert_eq!(upstream.calls(), vec!["https://sns.test/resolve/Example.SOL"]);
    }

    #[tokio::test]
    async fn test_name_service_missing_result_is_fatal() {
        let upstream = CannedUpstream::ok(json!({ "s": "error" }));
        let strategy = NameServiceStrategy::new(upstream, "https://sns.test", ".sol");

        let err = strategy.attempt("nobody.sol").await.unwrap_err();
        assert!(matches!(err, ResolverError::MissingField { service: "sns", .. }));
    }

    #[tokio::test]
    async fn test_registry_skips_name_service_suffix() {
        let upstream = CannedUpstream::ok(json!({}));
        let strategy = DomainRegistryStrategy::new(upstream.clone(), "https://ad.test", ".sol");

        assert!(strategy.matches("example.com"));
        assert!(strategy.matches("miester.abc"));
        assert!(!strategy.matches("example.sol"));
        assert!(!strategy.matches("nodots"));

        let outcome = strategy.evaluate("example.SOL").await.unwrap();
        assert_eq!(outcome, Outcome::NotApplicable);
        assert!(upstream.calls().is_empty());
    }

    #[tokio::test]
    async fn test_registry_success_yields_owner() {
        let upstream = CannedUpstream::ok(json!({ "status": "success", "owner": "XYZ789" }));
        let strategy = DomainRegistryStrategy::new(upstream.clone(), "https://ad.test/", ".sol");

        let outcome = strategy.evaluate("example.com").await.unwrap();
        assert_eq!(outcome, Outcome::Matched("XYZ789".to_string()));
        assert_eq!(
            upstream.calls(),
            vec!["https://ad.test/api/domain-owner/example.com"]
        );
    }

    #[tokio::test]
    async fn test_registry_soft_misses() {
        for body in [
            json!({ "status": "error" }),
            json!({ "status": "success" }),
            json!({ "status": "success", "owner": "" }),
            json!({ "status": "failed", "owner": "XYZ789" }),
            json!({}),
            json!({ "status": 404, "message": "not found" }),
            json!({ "status": false }),
            json!({ "status": "success", "owner": 123 }),
        ] {
            let strategy =
                DomainRegistryStrategy::new(CannedUpstream::ok(body.clone()), "https://ad.test", ".sol");
            let outcome = strategy.evaluate("example.com").await.unwrap();
            assert_eq!(outcome, Outcome::SoftMiss, "body: {}", body);
        }
    }

    #[tokio::test]
    async fn test_registry_array_body_is_fatal() {
        let strategy = DomainRegistryStrategy::new(
            CannedUpstream::ok(json!(["success", "EVIL"])),
            "https://ad.test",
            ".sol",
        );
        let err = strategy.evaluate("example.com").await.unwrap_err();
        assert!(matches!(err, ResolverError::Decode { service: "alldomains", .. }));
    }

    #[tokio::test]
    async fn test_name_service_array_body_is_fatal() {
        let strategy =
            NameServiceStrategy::new(CannedUpstream::ok(json!(["X"])), "https://sns.test", ".sol");
        let err = strategy.evaluate("example.sol").await.unwrap_err();
        assert!(matches!(err, ResolverError::Decode { service: "sns", .. }));
    }

    #[tokio::test]
    async fn test_registry_transport_error_is_fatal() {
        let strategy = DomainRegistryStrategy::new(CannedUpstream::failing(), "https://ad.test", ".sol");
        let err = strategy.evaluate("example.com").await.unwrap_err();
        assert!(matches!(err, ResolverError::Upstream { .. }));
    }

    #[tokio::test]
    async fn test_wallet_profile_reads_chain_key() {
        let upstream = CannedUpstream::ok(json!({
            "addresses": {
                "eip155:1": "0xabc",
                "solana:101": "DEF456"
            }
        }));
        let strategy = WalletProfileStrategy::new(upstream.clone(), "https://phantom.test", "solana:101");

        assert!(strategy.matches("anything"));
        let outcome = strategy.evaluate("miester").await.unwrap();
        assert_eq!(outcome, Outcome::Matched("DEF456".to_string()));
        assert_eq!(
            upstream.calls(),
            vec!["https://phantom.test/user/v1/profiles/miester"]
        );
    }

    #[tokio::test]
    async fn test_wallet_profile_missing_entry_is_fatal() {
        let strategy = WalletProfileStrategy::new(
            CannedUpstream::ok(json!({ "addresses": { "eip155:1": "0xabc" } })),
            "https://phantom.test",
            "solana:101",
        );
        let err = strategy.evaluate("miester").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "phantom response is missing `addresses.solana:101`"
        );

        let strategy = WalletProfileStrategy::new(
            CannedUpstream::ok(json!({ "error": "not found" })),
            "https://phantom.test",
            "solana:101",
        );
        let err = strategy.evaluate("miester").await.unwrap_err();
        assert!(matches!(err, ResolverError::MissingField { .. }));
    }
}
