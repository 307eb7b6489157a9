//! Property test: the SQLite and in-memory backends return the same search
//! results for the same data.

use std::collections::BTreeSet;

use proptest::prelude::*;

use recipe_core::{
    Ingredient, PageRequest, RecipeFields, RecipePredicate, RecipeType, SearchCriteria,
};
use recipe_storage::{InMemoryStore, SqliteStore, Store};

const INGREDIENTS: [&str; 5] = ["salt", "Salt", "pepper", "Basil", "olive oil"];
const INSTRUCTIONS: [&str; 5] = [
    "Bake in the oven",
    "Fry quickly",
    "OVEN roast",
    "Serve 50% cold",
    "Flambé the CRÈME BRÛLÉE",
];

#[derive(Debug, Clone)]
struct RecipeSeed {
    recipe_type: RecipeType,
    servings: u32,
    instructions: usize,
    ingredient_mask: u8,
}

fn recipe_type() -> impl Strategy<Value = RecipeType> {
    prop_oneof![
        Just(RecipeType::Vegetarian),
        Just(RecipeType::NonVegetarian),
        Just(RecipeType::Other),
    ]
}

fn recipe_seed() -> impl Strategy<Value = RecipeSeed> {
    (recipe_type(), 1u32..4, 0..INSTRUCTIONS.len(), 0u8..32).prop_map(
        |(recipe_type, servings, instructions, ingredient_mask)| RecipeSeed {
            recipe_type,
            servings,
            instructions,
            ingredient_mask,
        },
    )
}

fn criteria() -> impl Strategy<Value = SearchCriteria> {
    (
        proptest::option::of(any::<bool>()),
        proptest::option::of(1u32..4),
        proptest::option::of(prop_oneof![
            Just("oven".to_string()),
            Just("%".to_string()),
            Just("FRY".to_string()),
            Just("crème".to_string()),
        ]),
        proptest::option::of(prop_oneof![
            Just("SALT".to_string()),
            Just("basil".to_string()),
            Just("oil".to_string()),
        ]),
    )
        .prop_map(
            |(vegetarian, servings, instruction, include_ingredient)| SearchCriteria {
                vegetarian,
                servings,
                instruction,
                include_ingredient,
                exclude_ingredient: None,
            },
        )
}

fn populate(store: &mut impl Store, seeds: &[RecipeSeed]) {
    store
        .unit_of_work(|s| {
            let mut all = Vec::new();
            for name in INGREDIENTS {
                all.push(s.save_ingredient(name)?);
            }
            // Reverse insertion order so name order differs from id order.
            for (n, seed) in seeds.iter().enumerate().rev() {
                let ingredients: BTreeSet<Ingredient> = all
                    .iter()
                    .enumerate()
                    .filter(|(bit, _)| seed.ingredient_mask & (1 << bit) != 0)
                    .map(|(_, i)| i.clone())
                    .collect();
                let fields = RecipeFields {
                    name: format!("Recipe {n:02}"),
                    recipe_type: seed.recipe_type,
                    number_of_servings: seed.servings,
                    instructions: INSTRUCTIONS[seed.instructions].to_string(),
                };
                s.insert_recipe(&fields, &ingredients)?;
            }
            Ok(())
        })
        .unwrap();
}

fn search(store: &mut impl Store, criteria: &SearchCriteria, page: PageRequest) -> (Vec<String>, u64) {
    let found = store
        .unit_of_work(|s| s.search_recipes(&RecipePredicate::compile(criteria), page))
        .unwrap();
    (
        found.content.into_iter().map(|r| r.name).collect(),
        found.total_elements,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn backends_agree_on_search(
        seeds in proptest::collection::vec(recipe_seed(), 0..12),
        criteria in criteria(),
        page in 0u32..3,
        size in 1u32..5,
    ) {
        let mut memory = InMemoryStore::new();
        let mut sqlite = SqliteStore::in_memory().unwrap();
        populate(&mut memory, &seeds);
        populate(&mut sqlite, &seeds);

        let request = PageRequest::new(page, size).unwrap();
        let from_memory = search(&mut memory, &criteria, request);
        let from_sqlite = search(&mut sqlite, &criteria, request);
        prop_assert_eq!(from_memory, from_sqlite);
    }
}
