//! Solana address resolution gateway
//!
//! Resolves raw public keys, `.sol` names, generic domains and wallet
//! usernames to a canonical Solana address through an ordered chain of
//! resolution strategies, and serves the result over HTTP.

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod metrics;
pub mod resolver;
pub mod server;

pub use config::ServerConfig;
pub use context::AppContext;
pub use error::{ResolutionError, ResolverError, ResolverResult};
pub use resolver::{Resolution, Resolver, Source};
