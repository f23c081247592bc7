use pokedex_core::db::open_db_in_memory;
use pokedex_core::{
    KeyValue, NewPokemon, PokemonFilter, PokemonPatch, PokemonQuery, PokemonRepository,
    RepoError, SortDirection, SortField, SqlitePokemonRepository,
};
use uuid::Uuid;

#[test]
fn insert_and_find_by_each_filter() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePokemonRepository::new(&conn);

    let created = repo.insert_one(&NewPokemon::new(4, "charmander")).unwrap();
    assert_eq!(created.version, Some(0));

    let by_no = repo.find_one(&PokemonFilter::No(4)).unwrap().unwrap();
    let by_id = repo
        .find_one(&PokemonFilter::Id(created.id))
        .unwrap()
        .unwrap();
    let by_name = repo
        .find_one(&PokemonFilter::Name("charmander".to_string()))
        .unwrap()
        .unwrap();

    assert_eq!(by_no, created);
    assert_eq!(by_id, created);
    assert_eq!(by_name, created);
}

#[test]
fn find_one_returns_none_when_nothing_matches() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePokemonRepository::new(&conn);

    assert!(repo.find_one(&PokemonFilter::No(151)).unwrap().is_none());
    assert!(repo
        .find_one(&PokemonFilter::Id(Uuid::new_v4()))
        .unwrap()
        .is_none());
}

#[test]
fn duplicate_name_and_no_are_reported_with_offending_value() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePokemonRepository::new(&conn);
    repo.insert_one(&NewPokemon::new(7, "squirtle")).unwrap();

    let name_err = repo.insert_one(&NewPokemon::new(8, "squirtle")).unwrap_err();
    assert!(matches!(
        name_err,
        RepoError::DuplicateKey { ref key, value: KeyValue::Text(ref value) }
            if key == "name" && value == "squirtle"
    ));

    let no_err = repo.insert_one(&NewPokemon::new(7, "wartortle")).unwrap_err();
    assert!(matches!(
        no_err,
        RepoError::DuplicateKey { ref key, value: KeyValue::Int(7) } if key == "no"
    ));
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn find_applies_sort_skip_limit_and_version_projection() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePokemonRepository::new(&conn);
    for (no, name) in [(3, "venusaur"), (1, "bulbasaur"), (2, "ivysaur")] {
        repo.insert_one(&NewPokemon::new(no, name)).unwrap();
    }

    let query = PokemonQuery::new()
        .sort_by(SortField::No, SortDirection::Asc)
        .skip(1)
        .limit(5)
        .exclude_version();
    let page = repo.find(&query).unwrap();
    let numbers: Vec<i64> = page.iter().map(|p| p.no).collect();
    assert_eq!(numbers, vec![2, 3]);
    assert!(page.iter().all(|p| p.version.is_none()));

    let descending = repo
        .find(&PokemonQuery::new().sort_by(SortField::Name, SortDirection::Desc))
        .unwrap();
    assert_eq!(descending[0].name, "venusaur");
    assert!(descending.iter().all(|p| p.version == Some(0)));
}

#[test]
fn negative_limit_is_passed_through_as_unbounded() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePokemonRepository::new(&conn);
    for no in 1..=3 {
        repo.insert_one(&NewPokemon::new(no, format!("mon-{no}")))
            .unwrap();
    }

    let all = repo.find(&PokemonQuery::new().limit(-1)).unwrap();
    assert_eq!(all.len(), 3);
}

#[test]
fn update_one_applies_only_present_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePokemonRepository::new(&conn);
    let created = repo.insert_one(&NewPokemon::new(25, "pikachu")).unwrap();

    let patch = PokemonPatch {
        no: Some(26),
        name: None,
    };
    repo.update_one(&created, &patch).unwrap();

    let loaded = repo
        .find_one(&PokemonFilter::Id(created.id))
        .unwrap()
        .unwrap();
    assert_eq!(loaded.no, 26);
    assert_eq!(loaded.name, "pikachu");
}

#[test]
fn update_one_reports_duplicate_patch_value() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePokemonRepository::new(&conn);
    repo.insert_one(&NewPokemon::new(1, "bulbasaur")).unwrap();
    let target = repo.insert_one(&NewPokemon::new(2, "ivysaur")).unwrap();

    let patch = PokemonPatch {
        no: None,
        name: Some("bulbasaur".to_string()),
    };
    let err = repo.update_one(&target, &patch).unwrap_err();
    assert!(matches!(err, RepoError::DuplicateKey { ref key, .. } if key == "name"));
}

#[test]
fn delete_one_reports_deleted_count() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePokemonRepository::new(&conn);
    let created = repo.insert_one(&NewPokemon::new(133, "eevee")).unwrap();

    assert_eq!(repo.delete_one(&Uuid::new_v4().to_string()).unwrap(), 0);
    assert_eq!(repo.delete_one("not-an-id").unwrap(), 0);
    assert_eq!(repo.delete_one(&created.id.to_string()).unwrap(), 1);
    assert_eq!(repo.delete_one(&created.id.to_string()).unwrap(), 0);
    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn malformed_persisted_id_is_rejected_on_read() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO pokemon (id, no, name) VALUES ('broken', 1, 'missingno');",
        [],
    )
    .unwrap();
    let repo = SqlitePokemonRepository::new(&conn);

    let err = repo.find_one(&PokemonFilter::No(1)).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("broken")));
}
