//! Core domain logic for the Pokedex record service.
//! This crate owns record invariants, storage access and error mapping.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, PokemonConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::pokemon::{parse_pokemon_id, NewPokemon, Pokemon, PokemonId, PokemonPatch};
pub use repo::pokemon_repo::{
    KeyValue, PokemonFilter, PokemonQuery, PokemonRepository, RepoError, RepoResult,
    SortDirection, SortField, SqlitePokemonRepository,
};
pub use service::pokemon_service::{
    ErrorCategory, PaginationQuery, PokemonService, PokemonServiceError, ServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
