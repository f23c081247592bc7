//! Pokemon record model.
//!
//! # Responsibility
//! - Define the stored Pokemon record and its write payloads.
//! - Own `name` normalization shared by create and update paths.
//!
//! # Invariants
//! - Persisted `name` values are lower-case.
//! - `id` is assigned by storage and never reused.
//! - `version` mirrors the storage-internal `__v` field and is omitted from
//!   list projections.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Storage-assigned identifier for a Pokemon record.
pub type PokemonId = Uuid;

/// Canonical Pokemon record as read from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: PokemonId,
    /// National order number. Default sort key.
    pub no: i64,
    /// Always lower-case once persisted.
    pub name: String,
    /// Storage-internal version field. `None` when the read projection
    /// excluded it.
    #[serde(rename = "__v", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

impl Pokemon {
    /// Returns this snapshot shallow-merged with `patch`.
    ///
    /// Fields present in `patch` win; everything else is carried over from
    /// the snapshot unchanged.
    pub fn merged_with(&self, patch: &PokemonPatch) -> Self {
        Self {
            id: self.id,
            no: patch.no.unwrap_or(self.no),
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            version: self.version,
        }
    }
}

/// Insert payload for a new Pokemon record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPokemon {
    pub no: i64,
    pub name: String,
}

impl NewPokemon {
    pub fn new(no: i64, name: impl Into<String>) -> Self {
        Self {
            no,
            name: name.into(),
        }
    }

    /// Lower-cases `name` in place.
    pub fn normalize(&mut self) {
        self.name = normalize_name(&self.name);
    }
}

/// Partial update payload. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl PokemonPatch {
    /// Lower-cases `name` in place when present.
    pub fn normalize(&mut self) {
        if let Some(name) = self.name.as_mut() {
            *name = normalize_name(name);
        }
    }

    /// Returns whether the patch carries no field changes.
    pub fn is_empty(&self) -> bool {
        self.no.is_none() && self.name.is_none()
    }
}

/// Returns the id when `value` is a syntactically valid storage id.
pub fn parse_pokemon_id(value: &str) -> Option<PokemonId> {
    Uuid::parse_str(value).ok()
}

/// Canonical stored form of a Pokemon name.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{normalize_name, NewPokemon, Pokemon, PokemonPatch};
    use uuid::Uuid;

    fn snapshot() -> Pokemon {
        Pokemon {
            id: Uuid::new_v4(),
            no: 25,
            name: "pikachu".to_string(),
            version: Some(0),
        }
    }

    #[test]
    fn normalize_name_lowercases_mixed_case() {
        assert_eq!(normalize_name("BulBaSaur"), "bulbasaur");
    }

    #[test]
    fn new_pokemon_normalize_only_touches_name() {
        let mut input = NewPokemon::new(1, "BULBASAUR");
        input.normalize();
        assert_eq!(input, NewPokemon::new(1, "bulbasaur"));
    }

    #[test]
    fn merged_with_prefers_patch_fields() {
        let base = snapshot();
        let patch = PokemonPatch {
            no: None,
            name: Some("raichu".to_string()),
        };

        let merged = base.merged_with(&patch);
        assert_eq!(merged.id, base.id);
        assert_eq!(merged.no, 25);
        assert_eq!(merged.name, "raichu");
        assert_eq!(merged.version, Some(0));
    }

    #[test]
    fn empty_patch_merge_is_identity() {
        let base = snapshot();
        assert!(PokemonPatch::default().is_empty());
        assert_eq!(base.merged_with(&PokemonPatch::default()), base);
    }
}
