//! Domain model for Pokedex records.
//!
//! # Responsibility
//! - Define the canonical record shape stored in the `pokemon` collection.
//! - Define write payloads (`NewPokemon`, `PokemonPatch`) used by services.
//!
//! # Invariants
//! - Every record is identified by a storage-assigned `PokemonId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod pokemon;
