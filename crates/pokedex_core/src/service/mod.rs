//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into caller-facing Pokemon operations.
//! - Map storage errors to HTTP-style error categories.

pub mod lookup;
pub mod pokemon_service;
