use std::collections::BTreeSet;

use cookbook_corpus::export::{sampling_key, ExportScope};
use cookbook_corpus::model::{ExtractionStatus, NewIngredient, NewRecipe, NewSource, Provider};
use cookbook_corpus::{CorpusError, DatasetExport, ExportConfig, Store};

const STEP: &str = "Put the meat into a stewpan with the onions and let it simmer gently for two hours.";

fn add_source(store: &Store, external_id: &str, year: Option<i32>) -> i64 {
    let mut source = NewSource::new(format!("Book {}", external_id), Provider::InternetArchive, external_id);
    source.publication_year = year;
    store.insert_source(&source).unwrap()
}

fn recipe(source_id: i64, title: &str) -> NewRecipe {
    NewRecipe {
        source_id,
        raw_title: title.to_string(),
        parsed_title: Some(title.to_string()),
        category: Some("Meat".to_string()),
        section_header: None,
        page_number: None,
        recipe_number: None,
        status: ExtractionStatus::Success,
        not_a_recipe: false,
        failed_attempts: 0,
        input_text: format!("{}\n{}", title, STEP),
    }
}

fn add_recipe_with(store: &Store, recipe: &NewRecipe, ingredients: usize, steps: &[&str]) -> i64 {
    let id = store.insert_recipe(recipe).unwrap();
    for n in 0..ingredients {
        store
            .insert_ingredient(id, &NewIngredient::product(format!("item {}", n), format!("item {}", n)))
            .unwrap();
    }
    for step in steps {
        store.insert_instruction(id, step).unwrap();
    }
    id
}

fn add_recipe(store: &Store, source_id: i64, title: &str) -> i64 {
    add_recipe_with(store, &recipe(source_id, title), 3, &[STEP])
}

fn scope(config: ExportConfig) -> ExportScope {
    ExportScope::new(&config).unwrap()
}

/// Source 1 has twelve qualifying recipes (ids 1..=12), source 2 three
/// (ids 13..=15), source 3 none.
fn corpus() -> Store {
    let store = Store::open_in_memory().unwrap();
    let big = add_source(&store, "big", Some(1769));
    let small = add_source(&store, "small", Some(1861));
    add_source(&store, "empty", None);
    for n in 1..=12 {
        add_recipe(&store, big, &format!("Beef Soup {}", n));
    }
    for n in 1..=3 {
        add_recipe(&store, small, &format!("Apple Pie {}", n));
    }
    store
}

fn capped(cap: usize, seed: u64) -> ExportConfig {
    ExportConfig {
        cap_per_source: cap,
        seed,
        ..ExportConfig::default()
    }
}

#[test]
fn test_cap_keeps_min_of_qualifying_and_cap() {
    let store = corpus();
    let selection = scope(capped(5, 42)).select(store.connection()).unwrap();

    let selected = selection.selected_counts_per_source();
    assert_eq!(selected[&1], 5);
    assert_eq!(selected[&2], 3);
    assert_eq!(selected[&3], 0);
    assert_eq!(selection.recipe_ids().len(), 8);

    let pre_cap = selection.pre_cap_counts_per_source();
    assert_eq!(pre_cap[&1], 12);
    assert_eq!(pre_cap[&2], 3);
    assert_eq!(pre_cap[&3], 0);
}

#[test]
fn test_seeded_sample_is_lowest_md5_keys() {
    let store = corpus();
    let big_ids = |seed: u64| -> BTreeSet<i64> {
        scope(capped(5, seed))
            .recipe_ids(store.connection())
            .unwrap()
            .into_iter()
            .filter(|id| *id <= 12)
            .collect()
    };

    assert_eq!(big_ids(42), BTreeSet::from([3, 5, 6, 11, 12]));
    assert_eq!(big_ids(7), BTreeSet::from([1, 2, 4, 5, 7]));
    assert_eq!(big_ids(43), BTreeSet::from([3, 4, 8, 9, 11]));

    let mut keyed: Vec<(String, i64)> = (1..=12).map(|id| (sampling_key(id, 42), id)).collect();
    keyed.sort();
    let expected: BTreeSet<i64> = keyed.into_iter().take(5).map(|(_, id)| id).collect();
    assert_eq!(big_ids(42), expected);
}

#[test]
fn test_same_seed_same_selection() {
    let store = corpus();
    let first = scope(capped(5, 1234)).select(store.connection()).unwrap();
    let second = scope(capped(5, 1234)).select(store.connection()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_tighter_thresholds_select_a_subset() {
    let store = corpus();
    let source_id = 2;
    add_recipe_with(&store, &recipe(source_id, "Rich Apple Pie"), 6, &[STEP, STEP]);

    let loose = scope(ExportConfig::default()).recipe_ids(store.connection()).unwrap();
    let strict = scope(ExportConfig {
        min_ingredients: 5,
        ..ExportConfig::default()
    })
    .recipe_ids(store.connection())
    .unwrap();
    let stricter = scope(ExportConfig {
        min_ingredients: 5,
        min_steps: 3,
        ..ExportConfig::default()
    })
    .recipe_ids(store.connection())
    .unwrap();

    assert!(strict.is_subset(&loose));
    assert_eq!(strict, BTreeSet::from([16]));
    assert!(stricter.is_empty());
}

#[test]
fn test_filters_exclude_unusable_recipes() {
    let store = Store::open_in_memory().unwrap();
    let source_id = add_source(&store, "book", Some(1845));
    let hidden = add_source(&store, "hidden", Some(1845));
    store.set_included(hidden, false).unwrap();

    let good = add_recipe(&store, source_id, "Good");

    let mut failed = recipe(source_id, "Failed");
    failed.status = ExtractionStatus::Failed;
    add_recipe_with(&store, &failed, 3, &[STEP]);

    let mut not_recipe = recipe(source_id, "Table of weights");
    not_recipe.not_a_recipe = true;
    add_recipe_with(&store, &not_recipe, 3, &[STEP]);

    let mut retried = recipe(source_id, "Retried too often");
    retried.failed_attempts = 4;
    add_recipe_with(&store, &retried, 3, &[STEP]);

    let mut retried_ok = recipe(source_id, "Retried three times");
    retried_ok.failed_attempts = 3;
    let retried_ok = add_recipe_with(&store, &retried_ok, 3, &[STEP]);

    let mut medicinal = recipe(source_id, "Cough syrup");
    medicinal.category = Some("MEDICINAL".to_string());
    add_recipe_with(&store, &medicinal, 3, &[STEP]);

    let mut uncategorised = recipe(source_id, "Plain cake");
    uncategorised.category = None;
    let uncategorised = add_recipe_with(&store, &uncategorised, 3, &[STEP]);

    let mut untitled = recipe(source_id, " ");
    untitled.raw_title = "  ".to_string();
    add_recipe_with(&store, &untitled, 3, &[STEP]);

    let mut raw_titled = recipe(source_id, "Raw Title");
    raw_titled.parsed_title = Some("   ".to_string());
    let raw_titled = add_recipe_with(&store, &raw_titled, 3, &[STEP]);

    add_recipe_with(&store, &recipe(source_id, "No ingredients"), 0, &[STEP]);
    add_recipe_with(&store, &recipe(source_id, "No steps"), 3, &[]);
    add_recipe_with(&store, &recipe(source_id, "Too short"), 3, &["Boil it."]);
    add_recipe(&store, hidden, "Hidden source");

    let selection = scope(ExportConfig::default()).select(store.connection()).unwrap();
    assert_eq!(
        selection.recipe_ids(),
        &BTreeSet::from([good, retried_ok, uncategorised, raw_titled])
    );
    assert_eq!(selection.recipe_metrics()[&raw_titled].title, "Raw Title");
    assert!(!selection.pre_cap_counts_per_source().contains_key(&hidden));
}

#[test]
fn test_character_bounds_are_inclusive() {
    let store = Store::open_in_memory().unwrap();
    let source_id = add_source(&store, "book", None);
    let (half_a, half_b) = ("a".repeat(40), "b".repeat(40));
    let exact_min = add_recipe_with(&store, &recipe(source_id, "Min"), 3, &[half_a.as_str(), half_b.as_str()]);
    let long = "c".repeat(120);
    let exact_max = add_recipe_with(&store, &recipe(source_id, "Max"), 3, &[long.as_str()]);
    add_recipe_with(&store, &recipe(source_id, "Over"), 3, &["d".repeat(121).as_str()]);
    add_recipe_with(&store, &recipe(source_id, "Under"), 3, &["e".repeat(79).as_str()]);

    let selection = scope(ExportConfig {
        max_chars: 120,
        ..ExportConfig::default()
    })
    .select(store.connection())
    .unwrap();
    assert_eq!(selection.recipe_ids(), &BTreeSet::from([exact_min, exact_max]));

    let metrics = &selection.recipe_metrics()[&exact_min];
    assert_eq!(metrics.instruction_steps, 2);
    assert_eq!(metrics.instruction_chars, 80);
    assert_eq!(metrics.ingredient_count, 3);
    assert_eq!(metrics.publication_year, None);
}

#[test]
fn test_invalid_scope_fails_fast() {
    let err = ExportScope::new(&capped(0, 42)).unwrap_err();
    assert!(matches!(err, CorpusError::InvalidScope(_)));

    let err = DatasetExport::builder()
        .char_range(100, 10)
        .scope()
        .unwrap_err();
    assert!(err.to_string().contains("min_chars"));
}
