//! Pokemon repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide collection-style operations (`insert_one`, `find`, `find_one`,
//!   `update_one`, `delete_one`) over the `pokemon` table.
//! - Translate unique-constraint failures into `RepoError::DuplicateKey`.
//!
//! # Invariants
//! - Uniqueness on `no` and `name` is enforced by storage indexes only.
//! - `find` passes `limit`/`skip` through without clamping.
//! - Read paths reject malformed persisted ids instead of masking them.

use crate::db::DbError;
use crate::model::pokemon::{
    parse_pokemon_id, NewPokemon, Pokemon, PokemonId, PokemonPatch,
};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::Value;
use rusqlite::{ffi, params, params_from_iter, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const POKEMON_COLUMNS: &str = "id, no, name, __v";

static UNIQUE_FAILURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"UNIQUE constraint failed: pokemon\.(\w+)").expect("valid unique failure regex")
});

pub type RepoResult<T> = Result<T, RepoError>;

/// Value of the key that violated a uniqueness constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyValue {
    Int(i64),
    Text(String),
}

impl Display for KeyValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(value) => {
                let quoted = serde_json::to_string(value).map_err(|_| std::fmt::Error)?;
                f.write_str(&quoted)
            }
        }
    }
}

/// Repository error for Pokemon persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// A write collided with an existing record on a unique field.
    DuplicateKey { key: String, value: KeyValue },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateKey { key, value } => {
                write!(f, "duplicate key error: {{\"{key}\":{value}}}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted pokemon data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::DuplicateKey { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Sortable record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    No,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Query descriptor for listing records.
///
/// Built fluently and materialized by `PokemonRepository::find`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PokemonQuery {
    pub limit: Option<i64>,
    pub skip: Option<i64>,
    pub sort: Option<(SortField, SortDirection)>,
    /// Leaves `Pokemon::version` unset in the results.
    pub exclude_version: bool,
}

impl PokemonQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: i64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn sort_by(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort = Some((field, direction));
        self
    }

    pub fn exclude_version(mut self) -> Self {
        self.exclude_version = true;
        self
    }
}

/// Single-record lookup filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PokemonFilter {
    No(i64),
    Id(PokemonId),
    Name(String),
}

/// Repository interface over the Pokemon collection.
pub trait PokemonRepository {
    /// Inserts a record and returns it with its assigned id.
    fn insert_one(&self, input: &NewPokemon) -> RepoResult<Pokemon>;
    /// Materializes a list query.
    fn find(&self, query: &PokemonQuery) -> RepoResult<Vec<Pokemon>>;
    /// Returns the first record matching `filter`, if any.
    fn find_one(&self, filter: &PokemonFilter) -> RepoResult<Option<Pokemon>>;
    /// Applies `patch` to the stored record identified by `target.id`.
    fn update_one(&self, target: &Pokemon, patch: &PokemonPatch) -> RepoResult<()>;
    /// Deletes the record with `id` and returns the deleted count (0 or 1).
    fn delete_one(&self, id: &str) -> RepoResult<u64>;
}

/// SQLite-backed Pokemon repository.
pub struct SqlitePokemonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePokemonRepository<'conn> {
    /// Constructs a repository over a migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Returns the number of stored records.
    pub fn count(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM pokemon;", [], |row| row.get::<_, i64>(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative record count `{count}`")))
    }
}

impl PokemonRepository for SqlitePokemonRepository<'_> {
    fn insert_one(&self, input: &NewPokemon) -> RepoResult<Pokemon> {
        let id = Uuid::new_v4();

        self.conn
            .execute(
                "INSERT INTO pokemon (id, no, name, __v) VALUES (?1, ?2, ?3, 0);",
                params![id.to_string(), input.no, input.name.as_str()],
            )
            .map_err(|err| {
                translate_write_error(err, |key| match key {
                    "no" => Some(KeyValue::Int(input.no)),
                    "name" => Some(KeyValue::Text(input.name.clone())),
                    "id" => Some(KeyValue::Text(id.to_string())),
                    _ => None,
                })
            })?;

        Ok(Pokemon {
            id,
            no: input.no,
            name: input.name.clone(),
            version: Some(0),
        })
    }

    fn find(&self, query: &PokemonQuery) -> RepoResult<Vec<Pokemon>> {
        let mut sql = format!("SELECT {POKEMON_COLUMNS} FROM pokemon");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some((field, direction)) = query.sort {
            sql.push_str(&format!(
                " ORDER BY {} {}",
                sort_field_column(field),
                sort_direction_sql(direction)
            ));
        }

        // SQLite only accepts OFFSET after LIMIT; -1 means unbounded.
        if query.limit.is_some() || query.skip.is_some() {
            sql.push_str(" LIMIT ? OFFSET ?");
            bind_values.push(Value::Integer(query.limit.unwrap_or(-1)));
            bind_values.push(Value::Integer(query.skip.unwrap_or(0)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            let mut record = parse_pokemon_row(row)?;
            if query.exclude_version {
                record.version = None;
            }
            records.push(record);
        }

        Ok(records)
    }

    fn find_one(&self, filter: &PokemonFilter) -> RepoResult<Option<Pokemon>> {
        let (column, value) = match filter {
            PokemonFilter::No(no) => ("no", Value::Integer(*no)),
            PokemonFilter::Id(id) => ("id", Value::Text(id.to_string())),
            PokemonFilter::Name(name) => ("name", Value::Text(name.clone())),
        };

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {POKEMON_COLUMNS} FROM pokemon WHERE {column} = ?1 LIMIT 1;"
        ))?;
        let mut rows = stmt.query([value])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_pokemon_row(row)?));
        }

        Ok(None)
    }

    fn update_one(&self, target: &Pokemon, patch: &PokemonPatch) -> RepoResult<()> {
        if patch.is_empty() {
            return Ok(());
        }

        self.conn
            .execute(
                "UPDATE pokemon
                 SET
                    no = COALESCE(?1, no),
                    name = COALESCE(?2, name)
                 WHERE id = ?3;",
                params![patch.no, patch.name.as_deref(), target.id.to_string()],
            )
            .map_err(|err| {
                translate_write_error(err, |key| match key {
                    "no" => patch.no.map(KeyValue::Int),
                    "name" => patch.name.clone().map(KeyValue::Text),
                    _ => None,
                })
            })?;

        Ok(())
    }

    fn delete_one(&self, id: &str) -> RepoResult<u64> {
        let Some(id) = parse_pokemon_id(id) else {
            return Ok(0);
        };

        let deleted = self
            .conn
            .execute("DELETE FROM pokemon WHERE id = ?1;", [id.to_string()])?;
        Ok(deleted as u64)
    }
}

/// Maps unique-constraint failures to `RepoError::DuplicateKey`.
///
/// `value_of` supplies the written value for the offending column. Any other
/// failure is kept as a transport error.
fn translate_write_error(
    err: rusqlite::Error,
    value_of: impl FnOnce(&str) -> Option<KeyValue>,
) -> RepoError {
    if let rusqlite::Error::SqliteFailure(failure, Some(message)) = &err {
        let unique_violation = failure.code == ErrorCode::ConstraintViolation
            && (failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                || failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY);

        if unique_violation {
            if let Some(key) = UNIQUE_FAILURE_RE
                .captures(message)
                .and_then(|captures| captures.get(1))
                .map(|m| m.as_str().to_string())
            {
                if let Some(value) = value_of(&key) {
                    return RepoError::DuplicateKey { key, value };
                }
            }
        }
    }

    err.into()
}

fn parse_pokemon_row(row: &Row<'_>) -> RepoResult<Pokemon> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid id value `{id_text}` in pokemon.id"))
    })?;

    Ok(Pokemon {
        id,
        no: row.get("no")?,
        name: row.get("name")?,
        version: Some(row.get("__v")?),
    })
}

fn sort_field_column(field: SortField) -> &'static str {
    match field {
        SortField::No => "no",
        SortField::Name => "name",
    }
}

fn sort_direction_sql(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    }
}
