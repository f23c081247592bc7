//! Pokemon record use-case service.
//!
//! # Responsibility
//! - Provide create/list/lookup/update/remove entry points for callers.
//! - Normalize `name` before every write.
//! - Translate storage failures into caller-facing error categories.
//!
//! # Invariants
//! - Storage error detail behind `InternalFailure` is logged, never returned.
//! - `find_all` and `find_one` storage failures pass through as `Storage`.
//! - `update` returns the pre-update snapshot merged with the patch; storage
//!   is not re-read after the write.

use crate::config::PokemonConfig;
use crate::model::pokemon::{NewPokemon, Pokemon, PokemonPatch};
use crate::repo::pokemon_repo::{
    KeyValue, PokemonQuery, PokemonRepository, RepoError, SortDirection, SortField,
};
use crate::service::lookup::RESOLVERS;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, PokemonServiceError>;

/// HTTP-style category of a service error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    BadRequest,
    NotFound,
    InternalServerError,
}

impl ErrorCategory {
    pub fn status_code(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::InternalServerError => 500,
        }
    }
}

/// Service error for Pokemon use-cases.
#[derive(Debug)]
pub enum PokemonServiceError {
    /// A write collided with an existing `no` or `name`.
    DuplicateKey { key: String, value: KeyValue },
    /// No record matched the lookup term.
    NotFound(String),
    /// `remove` deleted nothing for the given id.
    RemoveTargetMissing(String),
    /// Unexpected storage failure on a write path. Detail is in the logs.
    InternalFailure { operation: &'static str },
    /// Untranslated storage failure from a read path.
    Storage(RepoError),
}

impl PokemonServiceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DuplicateKey { .. } | Self::RemoveTargetMissing(_) => ErrorCategory::BadRequest,
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::InternalFailure { .. } | Self::Storage(_) => ErrorCategory::InternalServerError,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.category().status_code()
    }
}

impl Display for PokemonServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey { key, value } => {
                write!(f, "Pokemon exists in db {{\"{key}\":{value}}}")
            }
            Self::NotFound(term) => write!(f, "Pokemon with id, name or no \"{term}\" not found"),
            Self::RemoveTargetMissing(id) => write!(f, "Pokemon with id \"{id}\" not found"),
            Self::InternalFailure { operation } => {
                write!(f, "Can't {operation} Pokemon - check server logs")
            }
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PokemonServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for PokemonServiceError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

/// Pagination input for `find_all`. Missing fields use config defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationQuery {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

impl PaginationQuery {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }
}

/// Use-case service over a Pokemon repository.
pub struct PokemonService<R: PokemonRepository> {
    repo: R,
    config: PokemonConfig,
}

impl<R: PokemonRepository> PokemonService<R> {
    /// Creates a service with default configuration.
    pub fn new(repo: R) -> Self {
        Self::with_config(repo, PokemonConfig::default())
    }

    pub fn with_config(repo: R, config: PokemonConfig) -> Self {
        Self { repo, config }
    }

    /// Inserts a new record with its name lower-cased.
    pub fn create(&self, mut input: NewPokemon) -> ServiceResult<Pokemon> {
        input.normalize();
        match self.repo.insert_one(&input) {
            Ok(created) => {
                info!(
                    "event=pokemon_create module=service status=ok id={}",
                    created.id
                );
                Ok(created)
            }
            Err(err) => Err(handle_write_error("create", err)),
        }
    }

    /// Lists records ascending by `no`, without the version field.
    ///
    /// `limit` and `offset` reach storage unclamped.
    pub fn find_all(&self, pagination: &PaginationQuery) -> ServiceResult<Vec<Pokemon>> {
        let query = PokemonQuery::new()
            .limit(pagination.limit.unwrap_or(self.config.default_limit))
            .skip(pagination.offset.unwrap_or(self.config.default_offset))
            .sort_by(SortField::No, SortDirection::Asc)
            .exclude_version();

        Ok(self.repo.find(&query)?)
    }

    /// Resolves `term` as order number, then id, then name.
    pub fn find_one(&self, term: &str) -> ServiceResult<Pokemon> {
        for (kind, resolve) in RESOLVERS {
            let Some(filter) = resolve(term) else {
                continue;
            };
            if let Some(found) = self.repo.find_one(&filter)? {
                debug!("event=pokemon_lookup module=service status=ok resolved_by={kind}");
                return Ok(found);
            }
        }

        debug!("event=pokemon_lookup module=service status=not_found");
        Err(PokemonServiceError::NotFound(term.to_string()))
    }

    /// Applies `patch` to the record `term` resolves to.
    ///
    /// Returns the pre-update snapshot merged with the normalized patch.
    pub fn update(&self, term: &str, mut patch: PokemonPatch) -> ServiceResult<Pokemon> {
        let current = self.find_one(term)?;
        patch.normalize();

        if let Err(err) = self.repo.update_one(&current, &patch) {
            return Err(handle_write_error("update", err));
        }

        info!(
            "event=pokemon_update module=service status=ok id={}",
            current.id
        );
        Ok(current.merged_with(&patch))
    }

    /// Hard-deletes the record with `id`.
    pub fn remove(&self, id: &str) -> ServiceResult<()> {
        let deleted = self.repo.delete_one(id)?;
        if deleted == 0 {
            return Err(PokemonServiceError::RemoveTargetMissing(id.to_string()));
        }

        info!("event=pokemon_remove module=service status=ok id={id}");
        Ok(())
    }
}

fn handle_write_error(operation: &'static str, err: RepoError) -> PokemonServiceError {
    match err {
        RepoError::DuplicateKey { key, value } => {
            PokemonServiceError::DuplicateKey { key, value }
        }
        other => {
            error!(
                "event=pokemon_{operation} module=service status=error error_code=storage_failure error={other}"
            );
            PokemonServiceError::InternalFailure { operation }
        }
    }
}
