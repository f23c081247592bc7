//! Term resolvers for single-record lookups.
//!
//! A lookup term may be an order number, a storage id, or a name. Each
//! resolver turns the raw term into a storage filter, or declines. The
//! service walks `RESOLVERS` in order and stops at the first stored match,
//! so one term can be tried as several kinds in sequence.

use crate::model::pokemon::{normalize_name, parse_pokemon_id};
use crate::repo::pokemon_repo::PokemonFilter;

/// Pure mapping from a lookup term to a storage filter.
pub type Resolver = fn(&str) -> Option<PokemonFilter>;

/// Resolution order: order number, then id, then name.
pub const RESOLVERS: &[(&str, Resolver)] = &[
    ("no", by_number),
    ("id", by_id),
    ("name", by_name),
];

/// Largest magnitude at which every integer has an exact `f64` form.
const MAX_EXACT_FLOAT_INT: f64 = 9_007_199_254_740_992.0;

/// Matches terms that read as an integral number.
///
/// Plain integers must fit `i64`. Other numeric forms (`1e2`, `6.0`) are
/// accepted only while exactly representable; fractional values are
/// declined since `no` is an integer field.
pub fn by_number(term: &str) -> Option<PokemonFilter> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(no) = trimmed.parse::<i64>() {
        return Some(PokemonFilter::No(no));
    }
    if is_plain_integer(trimmed) {
        return None;
    }

    let value = trimmed.parse::<f64>().ok()?;
    if !value.is_finite() || value.fract() != 0.0 || value.abs() > MAX_EXACT_FLOAT_INT {
        return None;
    }

    Some(PokemonFilter::No(value as i64))
}

fn is_plain_integer(term: &str) -> bool {
    let digits = term.strip_prefix(['+', '-']).unwrap_or(term);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Matches terms in a valid storage id format.
pub fn by_id(term: &str) -> Option<PokemonFilter> {
    parse_pokemon_id(term).map(PokemonFilter::Id)
}

/// Always matches, using the lower-cased term as the name.
pub fn by_name(term: &str) -> Option<PokemonFilter> {
    Some(PokemonFilter::Name(normalize_name(term)))
}
