//! Trait definitions for the upstream sources.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses the real client implementations, while tests
//! substitute mock implementations to drive the orchestrator through
//! every fallback path without network access.

use async_trait::async_trait;

use super::domain::{Candidate, ResolveError, ResolvedResult};
use super::instances::InstancePool;
use super::saavn::SaavnClient;

/// Trait for the metadata-search source.
#[async_trait]
pub trait SaavnApi: Send + Sync {
    /// Search for songs matching a query, in upstream relevance order.
    async fn search(&self, query: &str) -> Result<Vec<Candidate>, ResolveError>;
}

/// Trait for an instance-pool lookup source.
#[async_trait]
pub trait InstanceApi: Send + Sync {
    /// Look up an identifier against the pool.
    async fn lookup(&self, id: &str) -> Result<ResolvedResult, ResolveError>;
}

// Implement traits for real clients

#[async_trait]
impl SaavnApi for SaavnClient {
    async fn search(&self, query: &str) -> Result<Vec<Candidate>, ResolveError> {
        self.search(query).await
    }
}

#[async_trait]
impl InstanceApi for InstancePool {
    async fn lookup(&self, id: &str) -> Result<ResolvedResult, ResolveError> {
        self.lookup(id).await
    }
}
