//! Metadata-search source (saavn).
//!
//! dto.rs mirrors the upstream response shape, adapter.rs is the only
//! DTO-to-domain boundary, client.rs walks the mirror list.

mod adapter;
mod client;
mod dto;

pub use client::SaavnClient;
