/// Address resolution endpoint
use crate::{context::AppContext, error::ResolutionError, resolver::Resolution};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};

/// Name of the query parameter carrying the identifier
pub const ADDRESS_PARAM: &str = "address";

/// Build resolution routes
pub fn routes() -> Router<AppContext> {
    Router::new().route("/api", get(resolve_address))
}

/// Resolve an identifier to a canonical Solana address
///
/// The query string is read as raw pairs and the first `address` wins, so
/// repeated parameters never turn into an extractor rejection. A missing or
/// unreadable `address` is treated like an empty one and the resolver
/// reports it as a validation failure.
pub async fn resolve_address(
    State(ctx): State<AppContext>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Resolution>, ResolutionError> {
    let pairs = match query {
        Ok(Query(pairs)) => pairs,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "unreadable query string");
            Vec::new()
        }
    };

    let identifier = first_param(&pairs, ADDRESS_PARAM).unwrap_or_default();
    let resolution = ctx.resolver.resolve(identifier).await?;
    Ok(Json(resolution))
}

fn first_param<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}
