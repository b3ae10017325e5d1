/// resolve-gateway - Solana address resolution service
///
/// Serves `GET /api?address=<identifier>` and answers with the canonical
/// address and the source that produced it.

use resolve_gateway::{
    config::LoggingConfig, context::AppContext, error::ResolverResult, server, ServerConfig,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ResolverResult<()> {
    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize logging
    init_tracing(&config.logging);

    print_banner();

    // Create application context
    let ctx = AppContext::new(config)?;

    // Start server
    server::serve(ctx).await?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = logging.env_filter();

    if logging.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn print_banner() {
    println!(
        r#"
    resolve-gateway v{}
    direct -> .sol -> domain registry -> wallet profile
        "#,
        env!("CARGO_PKG_VERSION")
    );
}
