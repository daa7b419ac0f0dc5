//! Property-Based Tests for the stores and cascades
//!
//! Store calls are async; each case drives them with `tokio_test::block_on`.

use proptest::prelude::*;
use tokio_test::block_on;

use crate::models::{NewCity, NewCountry, NewState};
use crate::registry::GeoRegistry;

const COUNTRIES: [(&str, &str); 3] = [("US", "United States"), ("CA", "Canada"), ("GH", "Ghana")];
const STATE_CODES: [&str; 6] = ["NY", "TX", "ON", "QC", "AS", "EP"];

// == Strategies ==
fn state_code_strategy() -> impl Strategy<Value = String> {
    "[A-Z0-9]{1,3}"
}

fn city_strategy() -> impl Strategy<Value = NewCity> {
    (
        "[A-Za-z]{3,8}",
        prop::sample::select(vec!["United States", "Canada", "Ghana", "Atlantis", "ghana"]),
        prop::option::of(prop::sample::select(STATE_CODES.to_vec())),
        prop::option::of(-10i64..1_000_000),
    )
        .prop_map(|(name, country, state, population)| NewCity {
            name: Some(name),
            country: Some(country.to_string()),
            state: state.map(str::to_string),
            population,
            ..NewCity::default()
        })
}

fn registry_with_countries() -> GeoRegistry {
    let registry = GeoRegistry::in_memory(60);
    block_on(async {
        for (code, name) in COUNTRIES {
            registry
                .create_country(NewCountry::new(code, name))
                .await
                .unwrap();
        }
    });
    registry
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // A state is stored iff its code is alphabetic; rejected codes leave no trace.
    #[test]
    fn prop_state_code_must_be_alphabetic(code in state_code_strategy()) {
        let registry = registry_with_countries();
        let result = block_on(registry.create_state(NewState::new(code.clone(), "Somewhere", "Canada")));
        let stored = block_on(registry.states.read_all()).unwrap();

        if code.chars().all(char::is_alphabetic) {
            prop_assert!(result.is_ok());
            prop_assert_eq!(stored.len(), 1);
        } else {
            prop_assert!(result.is_err());
            prop_assert!(stored.is_empty());
        }
    }

    // Running a bulk city insert twice stores the same set as running it once.
    #[test]
    fn prop_bulk_city_insert_is_idempotent(docs in prop::collection::vec(city_strategy(), 0..30)) {
        let registry = registry_with_countries();

        let first = block_on(registry.create_cities(docs.clone())).unwrap();
        let after_first = block_on(registry.cities.read_all()).unwrap();
        let second = block_on(registry.create_cities(docs.clone())).unwrap();
        let after_second = block_on(registry.cities.read_all()).unwrap();

        prop_assert_eq!(first.inserted() + first.skipped, docs.len());
        prop_assert_eq!(second.inserted(), 0);
        prop_assert_eq!(second.skipped, docs.len());
        prop_assert_eq!(&after_first, &after_second);

        let mut identities: Vec<_> = after_second.iter().map(|c| c.identity()).collect();
        identities.sort();
        identities.dedup();
        prop_assert_eq!(identities.len(), after_second.len());
    }

    // Deleting a country leaves no state of that country, no city of that
    // country (stateless ones included) and no city of its states.
    #[test]
    fn prop_country_delete_cascades(
        cities in prop::collection::vec(city_strategy(), 0..30),
        victim in prop::sample::select(COUNTRIES.to_vec()),
    ) {
        let registry = registry_with_countries();
        block_on(async {
            for (code, country) in [("NY", "United States"), ("TX", "United States"), ("ON", "Canada"), ("EP", "Ghana")] {
                registry.create_state(NewState::new(code, code, country)).await.unwrap();
            }
            registry.create_cities(cities).await.unwrap();
        });

        let (_, victim_name) = victim;
        let doomed_states: Vec<String> = block_on(registry.states.read_by_country(victim_name))
            .unwrap()
            .into_iter()
            .map(|s| s.code)
            .collect();
        let doomed = |c: &crate::models::City| {
            c.country == victim_name
                || c.state.as_ref().map_or(false, |s| doomed_states.contains(s))
        };
        let cities_before = block_on(registry.cities.read_all()).unwrap();

        let report = block_on(registry.delete_country(victim_name)).unwrap();

        let countries = block_on(registry.countries.read_all()).unwrap();
        let states = block_on(registry.states.read_all()).unwrap();
        let cities_after = block_on(registry.cities.read_all()).unwrap();

        prop_assert_eq!(report.countries, 1);
        prop_assert_eq!(countries.len(), COUNTRIES.len() - 1);
        prop_assert!(states.iter().all(|s| s.country != victim_name));
        prop_assert!(cities_after.iter().all(|c| !doomed(c)));

        let expected_removed = cities_before.iter().filter(|&c| doomed(c)).count();
        prop_assert_eq!(report.cities as usize, expected_removed);
        prop_assert_eq!(cities_after.len(), cities_before.len() - expected_removed);
    }

    // A write is always visible to the next read_all, even with a warm cache.
    #[test]
    fn prop_read_all_reflects_writes(names in prop::collection::hash_set("[a-z]{3,8}", 1..10)) {
        let registry = registry_with_countries();
        let mut expected = 0;

        for name in names {
            let before = block_on(registry.cities.read_all()).unwrap();
            prop_assert_eq!(before.len(), expected);
            prop_assert_eq!(block_on(registry.cities.read_all()).unwrap(), before);

            block_on(registry.create_city(NewCity::new(name, "Ghana"))).unwrap();
            expected += 1;
        }

        prop_assert_eq!(block_on(registry.cities.read_all()).unwrap().len(), expected);
    }
}
