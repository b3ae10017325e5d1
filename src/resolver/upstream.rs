/// Outbound transport to the upstream resolution services
use crate::{
    config::UpstreamConfig,
    error::{ResolverError, ResolverResult},
    metrics,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Upstream transport trait
///
/// Implementations perform a GET and return the decoded JSON body. The body
/// is decoded whatever the HTTP status: upstreams report soft failures in
/// the body and the strategies decide what they mean.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn get_json(&self, service: &'static str, url: &str) -> ResolverResult<Value>;
}

/// reqwest-backed upstream client
#[derive(Clone)]
pub struct HttpUpstream {
    http_client: reqwest::Client,
}

impl HttpUpstream {
    /// Create a new HTTP upstream client
    pub fn new(config: &UpstreamConfig) -> ResolverResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(&config.user_agent);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http_client = builder
            .build()
            .map_err(|e| ResolverError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstream {
    async fn get_json(&self, service: &'static str, url: &str) -> ResolverResult<Value> {
        debug!(service, url, "upstream request");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ResolverError::Upstream {
                service,
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| ResolverError::Upstream {
            service,
            message: e.to_string(),
        })?;

        if !status.is_success() {
            debug!(service, %status, "upstream returned non-success status");
        }

        serde_json::from_slice(&body).map_err(|e| ResolverError::Decode {
            service,
            message: e.to_string(),
        })
    }
}

/// GET `url` through `client` and decode the body into `T`, recording the
/// call in metrics. The body must be a JSON object; fields are read by name.
pub async fn fetch<T: DeserializeOwned>(
    client: &dyn UpstreamClient,
    service: &'static str,
    url: &str,
) -> ResolverResult<T> {
    let result = client
        .get_json(service, url)
        .await
        .and_then(|value| decode(service, value));

    metrics::record_upstream(service, result.is_ok());
    if let Err(e) = &result {
        warn!(service, url, error = %e, "upstream call failed");
    }

    result
}

fn decode<T: DeserializeOwned>(service: &'static str, value: Value) -> ResolverResult<T> {
    // Derived struct visitors also accept arrays positionally
    if !value.is_object() {
        return Err(ResolverError::Decode {
            service,
            message: format!("expected a JSON object, got {}", json_kind(&value)),
        });
    }

    serde_json::from_value(value).map_err(|e| ResolverError::Decode {
        service,
        message: e.to_string(),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Join a base URL, a fixed path and the identifier as one path segment
pub fn endpoint(base: &str, path: &str, identifier: &str) -> String {
    format!(
        "{}/{}/{}",
        base.trim_end_matches('/'),
        path.trim_matches('/'),
        urlencoding::encode(identifier)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    struct StaticUpstream(Value);

    #[async_trait]
    impl UpstreamClient for StaticUpstream {
        async fn get_json(&self, _service: &'static str, _url: &str) -> ResolverResult<Value> {
            Ok(self.0.clone())
        }
    }

    #[derive(Debug, Deserialize)]
    struct Body {
        result: String,
    }

    #[test]
    fn test_endpoint_joins_and_encodes() {
        assert_eq!(
            endpoint("https://sns.example/", "/resolve", "bonfida.sol"),
            "https://sns.example/resolve/bonfida.sol"
        );
        assert_eq!(
            endpoint("https://profiles.example", "user/v1/profiles", "a b/c"),
            "https://profiles.example/user/v1/profiles/a%20b%2Fc"
        );
    }

    #[tokio::test]
    async fn test_fetch_decodes_typed_body() {
        let client = StaticUpstream(serde_json::json!({ "result": "ABC123" }));
        let body: Body = fetch(&client, "sns", "https://sns.example/resolve/x.sol")
            .await
            .unwrap();
        assert_eq!(body.result, "ABC123");
    }

    #[tokio::test]
    async fn test_fetch_reports_shape_mismatch_as_decode_error() {
        let client = StaticUpstream(serde_json::json!({ "result": 42 }));
        let err = fetch::<Body>(&client, "sns", "https://sns.example/resolve/x.sol")
            .await
            .unwrap_err();
        assert!(matches!(err, ResolverError::Decode { service: "sns", .. }));
    }

    #[tokio::test]
    async fn test_fetch_rejects_positional_array_body() {
        let client = StaticUpstream(serde_json::json!(["X"]));
        let err = fetch::<Body>(&client, "sns", "https://sns.example/resolve/x.sol")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "sns returned an unreadable body: expected a JSON object, got an array"
        );
    }

    #[test]
    fn test_http_upstream_builds_with_timeout() {
        let config = UpstreamConfig {
            timeout_secs: Some(5),
            ..UpstreamConfig::default()
        };
        assert!(HttpUpstream::new(&config).is_ok());
    }
}
