//! Stream resolution - finds a playable location/metadata for a media
//! identifier by falling back across independent upstream sources.
//!
//! # Architecture
//!
//! - **Domain models** (`domain.rs`) - Internal types that represent our business logic
//! - **API DTOs** (`saavn/dto.rs`) - Exact upstream response shapes
//! - **Adapters** - Convert DTOs to domain models
//! - **Clients** (`saavn/client.rs`, `instances.rs`) - HTTP clients that walk mirror lists
//! - **Fetch** (`fetch.rs`) - the timeout-bounded HTTP wrapper every call goes through
//! - **Scoring** (`scoring.rs`) - fuzzy candidate matching and best-of selection
//! - **Service** (`service.rs`) - the sequential fallback orchestrator
//!
//! This decoupling means:
//! 1. Upstream API changes don't ripple through our codebase
//! 2. The scorer and orchestrator are testable without network access
//! 3. Instance pools are pure configuration, swappable at runtime

pub mod domain;
pub mod fetch;
pub mod instances;
pub mod saavn;
pub mod scoring;
pub mod service;
pub mod traits;

pub use domain::{
    Attempts, AttemptStatus, Candidate, ResolutionFailure, ResolutionRequest, ResolveError,
    ResolvedResult, SourceKind,
};
pub use service::Resolver;
