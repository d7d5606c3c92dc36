//! Tokens and liquidity pools
//!
//! A `Pool` is the resolved pair contract for two tokens. The helpers here
//! answer the questions the selection UI asks of a pool set: which tokens
//! exist at all, which tokens can be reached from a given token, and which
//! pool (if any) serves a chosen pair.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque address-like token identifier
///
/// Equality is exact identifier match; case normalization is the
/// responsibility of whoever supplies the addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenRef(String);

impl TokenRef {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TokenRef {
    fn from(address: &str) -> Self {
        Self(address.to_string())
    }
}

/// A liquidity pool holding a token pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    /// Pair contract address
    pub address: String,
    /// First token of the pair
    pub token0: TokenRef,
    /// Second token of the pair
    pub token1: TokenRef,
}

impl Pool {
    pub fn new(address: impl Into<String>, token0: TokenRef, token1: TokenRef) -> Self {
        Self {
            address: address.into(),
            token0,
            token1,
        }
    }

    /// Whether this pool serves the given pair, in either order
    pub fn matches(&self, a: &TokenRef, b: &TokenRef) -> bool {
        (&self.token0 == a && &self.token1 == b) || (&self.token0 == b && &self.token1 == a)
    }
}

/// All distinct tokens appearing in the pool set, in first-seen order
pub fn available_tokens(pools: &[Pool]) -> Vec<TokenRef> {
    let mut tokens = Vec::new();
    for pool in pools {
        if !tokens.contains(&pool.token0) {
            tokens.push(pool.token0.clone());
        }
        if !tokens.contains(&pool.token1) {
            tokens.push(pool.token1.clone());
        }
    }
    tokens
}

/// Tokens swappable against `from` through some pool in the set
pub fn counterpart_tokens(pools: &[Pool], from: &TokenRef) -> Vec<TokenRef> {
    let mut tokens = Vec::new();
    for pool in pools {
        let counterpart = if &pool.token0 == from {
            &pool.token1
        } else if &pool.token1 == from {
            &pool.token0
        } else {
            continue;
        };
        if !tokens.contains(counterpart) {
            tokens.push(counterpart.clone());
        }
    }
    tokens
}

/// Find the pool serving a token pair, if one exists
pub fn find_pool_by_tokens<'a>(
    pools: &'a [Pool],
    from: &TokenRef,
    to: &TokenRef,
) -> Option<&'a Pool> {
    pools.iter().find(|pool| pool.matches(from, to))
}
