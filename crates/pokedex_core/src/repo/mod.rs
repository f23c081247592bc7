//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the collection-style contract the Pokemon service talks to.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Uniqueness violations leave the repository as `RepoError::DuplicateKey`;
//!   callers never inspect raw SQLite error codes.

pub mod pokemon_repo;
