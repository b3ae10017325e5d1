/// Address Resolution System
///
/// Turns a caller-supplied identifier (raw key, `.sol` name, generic domain
/// or wallet username) into a canonical Solana address by walking an ordered
/// chain of strategies.

pub mod address;
pub mod chain;
pub mod strategy;
pub mod upstream;

pub use address::is_valid_address;
pub use chain::Resolver;
pub use strategy::{
    DirectStrategy, DomainRegistryStrategy, NameServiceStrategy, Strategy, WalletProfileStrategy,
};
pub use upstream::{HttpUpstream, UpstreamClient};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which strategy produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    Direct,
    Nameservice,
    DomainRegistry,
    WalletProfile,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Direct => "direct",
            Source::Nameservice => "nameservice",
            Source::DomainRegistry => "domain-registry",
            Source::WalletProfile => "wallet-profile",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Successful resolution result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub address: String,
    pub source: Source,
    /// Milliseconds spent resolving
    pub resolve_time: f64,
}

/// Result of evaluating a single strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Strategy produced the canonical address
    Matched(String),
    /// Predicate did not match; strategy was not tried
    NotApplicable,
    /// Strategy was tried and declined; continue down the chain
    SoftMiss,
}
