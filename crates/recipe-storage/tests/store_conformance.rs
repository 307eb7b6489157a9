//! Behaviour every backend must share.
//!
//! Each scenario is written once against `impl Store` and instantiated for
//! both [`InMemoryStore`] and [`SqliteStore`].

use std::collections::BTreeSet;

use recipe_core::{
    Ingredient, PageRequest, RecipeFields, RecipePredicate, RecipeType, SearchCriteria,
};
use recipe_storage::{InMemoryStore, SqliteStore, StorageError, Store};

fn fields(name: &str, ty: RecipeType, servings: u32, instructions: &str) -> RecipeFields {
    RecipeFields {
        name: name.to_string(),
        recipe_type: ty,
        number_of_servings: servings,
        instructions: instructions.to_string(),
    }
}

fn page(page: u32, size: u32) -> PageRequest {
    PageRequest::new(page, size).unwrap()
}

fn search_names(store: &mut impl Store, criteria: SearchCriteria) -> Vec<String> {
    store
        .unit_of_work(|s| s.search_recipes(&RecipePredicate::compile(&criteria), page(0, 100)))
        .unwrap()
        .content
        .into_iter()
        .map(|r| r.name)
        .collect()
}

/// Seeds: A(VEG, 4), B(VEG, 2), C(NON_VEG, 4), D(OTHER, 4).
fn seed(store: &mut impl Store) {
    store
        .unit_of_work(|s| {
            let salt = s.save_ingredient("salt")?;
            let pepper = s.save_ingredient("pepper")?;
            let basil = s.save_ingredient("Basil")?;
            s.insert_recipe(
                &fields("A", RecipeType::Vegetarian, 4, "Bake in the OVEN"),
                &[salt.clone(), pepper.clone()].into(),
            )?;
            s.insert_recipe(
                &fields("B", RecipeType::Vegetarian, 2, "Fry"),
                &[basil].into(),
            )?;
            s.insert_recipe(
                &fields("C", RecipeType::NonVegetarian, 4, "Oven roast"),
                &[salt].into(),
            )?;
            s.insert_recipe(
                &fields("D", RecipeType::Other, 4, "Serve cold"),
                &[pepper].into(),
            )?;
            Ok(())
        })
        .unwrap();
}

fn conjunction_is_intersection(store: &mut impl Store) {
    seed(store);
    let names = search_names(
        store,
        SearchCriteria {
            vegetarian: Some(true),
            servings: Some(4),
            ..SearchCriteria::default()
        },
    );
    assert_eq!(names, vec!["A"]);
}

fn join_match_is_deduplicated(store: &mut impl Store) {
    seed(store);
    let names = search_names(
        store,
        SearchCriteria {
            include_ingredient: Some("Salt".into()),
            ..SearchCriteria::default()
        },
    );
    assert_eq!(names, vec!["A", "C"]);
}

fn ingredient_match_is_case_insensitive_exact(store: &mut impl Store) {
    seed(store);
    let basil = search_names(
        store,
        SearchCriteria {
            include_ingredient: Some("BASIL".into()),
            ..SearchCriteria::default()
        },
    );
    assert_eq!(basil, vec!["B"]);

    let partial = search_names(
        store,
        SearchCriteria {
            include_ingredient: Some("sal".into()),
            ..SearchCriteria::default()
        },
    );
    assert!(partial.is_empty());
}

fn instruction_is_case_insensitive_substring(store: &mut impl Store) {
    seed(store);
    let names = search_names(
        store,
        SearchCriteria {
            instruction: Some("oven".into()),
            ..SearchCriteria::default()
        },
    );
    assert_eq!(names, vec!["A", "C"]);
}

fn instruction_match_folds_accented_letters(store: &mut impl Store) {
    store
        .unit_of_work(|s| {
            s.insert_recipe(
                &fields("Dessert", RecipeType::Vegetarian, 4, "Flambé the CRÈME BRÛLÉE"),
                &BTreeSet::new(),
            )?;
            s.insert_recipe(
                &fields("Custard", RecipeType::Vegetarian, 4, "Chill the creme"),
                &BTreeSet::new(),
            )?;
            Ok(())
        })
        .unwrap();
    let names = search_names(
        store,
        SearchCriteria {
            instruction: Some("crème brûlée".into()),
            ..SearchCriteria::default()
        },
    );
    assert_eq!(names, vec!["Dessert"]);
}

fn other_type_escapes_vegetarian_filter(store: &mut impl Store) {
    seed(store);
    let veg = search_names(
        store,
        SearchCriteria {
            vegetarian: Some(true),
            ..SearchCriteria::default()
        },
    );
    let non_veg = search_names(
        store,
        SearchCriteria {
            vegetarian: Some(false),
            ..SearchCriteria::default()
        },
    );
    assert_eq!(veg, vec!["A", "B"]);
    assert_eq!(non_veg, vec!["C"]);
}

fn exclude_ingredient_is_ignored(store: &mut impl Store) {
    seed(store);
    let names = search_names(
        store,
        SearchCriteria {
            exclude_ingredient: Some("salt".into()),
            ..SearchCriteria::default()
        },
    );
    assert_eq!(names, vec!["A", "B", "C", "D"]);
}

fn unfiltered_search_pages_by_name(store: &mut impl Store) {
    store
        .unit_of_work(|s| {
            for name in ["Zucchini bake", "Apple pie", "Mushroom risotto"] {
                s.insert_recipe(
                    &fields(name, RecipeType::Vegetarian, 2, "Cook"),
                    &BTreeSet::new(),
                )?;
            }
            Ok(())
        })
        .unwrap();

    let predicate = RecipePredicate::compile(&SearchCriteria::default());
    let first = store
        .unit_of_work(|s| s.search_recipes(&predicate, page(0, 2)))
        .unwrap();
    let second = store
        .unit_of_work(|s| s.search_recipes(&predicate, page(1, 2)))
        .unwrap();

    let names = |p: &recipe_core::Page<recipe_core::Recipe>| {
        p.content.iter().map(|r| r.name.clone()).collect::<Vec<_>>()
    };
    assert_eq!(names(&first), vec!["Apple pie", "Mushroom risotto"]);
    assert_eq!(names(&second), vec!["Zucchini bake"]);
    assert_eq!(first.total_elements, 3);
    assert_eq!(second.total_elements, 3);
}

fn join_search_counts_distinct_recipes(store: &mut impl Store) {
    seed(store);
    // After the update A joins two matching rows ("salt" and "Salt").
    store
        .unit_of_work(|s| {
            let extra = s.save_ingredient("Salt")?;
            let a = s
                .search_recipes(
                    &RecipePredicate::compile(&SearchCriteria::default()),
                    page(0, 1),
                )?
                .content
                .remove(0);
            let mut set: BTreeSet<Ingredient> = a.ingredients.clone();
            set.insert(extra);
            s.update_recipe(a.id, &fields("A", a.recipe_type, 4, &a.instructions), Some(&set))?;
            Ok(())
        })
        .unwrap();

    let found = store
        .unit_of_work(|s| {
            s.search_recipes(
                &RecipePredicate::compile(&SearchCriteria {
                    include_ingredient: Some("salt".into()),
                    ..SearchCriteria::default()
                }),
                page(0, 1),
            )
        })
        .unwrap();
    assert_eq!(found.total_elements, 2);
    assert_eq!(found.content.len(), 1);
}

fn update_replaces_or_keeps_ingredients(store: &mut impl Store) {
    let (kept, cleared) = store
        .unit_of_work(|s| {
            let salt = s.save_ingredient("salt")?;
            let recipe = s.insert_recipe(
                &fields("Soup", RecipeType::Vegetarian, 2, "Stir"),
                &[salt].into(),
            )?;
            let kept = s.update_recipe(
                recipe.id,
                &fields("Soup", RecipeType::Vegetarian, 3, "Stir"),
                None,
            )?;
            let cleared = s.update_recipe(
                recipe.id,
                &fields("Soup", RecipeType::Vegetarian, 3, "Stir"),
                Some(&BTreeSet::new()),
            )?;
            Ok((kept, cleared))
        })
        .unwrap();
    assert_eq!(kept.ingredients.len(), 1);
    assert_eq!(kept.number_of_servings, 3);
    assert!(cleared.ingredients.is_empty());
}

fn ingredients_list_in_id_order(store: &mut impl Store) {
    store
        .unit_of_work(|s| {
            for name in ["tomato", "basil", "garlic"] {
                s.save_ingredient(name)?;
            }
            Ok(())
        })
        .unwrap();
    let listed = store
        .unit_of_work(|s| s.find_all_ingredients(page(0, 10)))
        .unwrap();
    let names: Vec<&str> = listed.content.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["tomato", "basil", "garlic"]);
}

fn duplicate_recipe_name_is_rejected(store: &mut impl Store) {
    store
        .unit_of_work(|s| s.insert_recipe(&fields("Soup", RecipeType::Other, 1, "x"), &BTreeSet::new()))
        .unwrap();
    let err = store
        .unit_of_work(|s| s.insert_recipe(&fields("Soup", RecipeType::Other, 1, "y"), &BTreeSet::new()))
        .unwrap_err();
    assert!(matches!(err, StorageError::ConstraintViolation { field: "name", .. }));
}

fn update_of_missing_recipe_is_not_found(store: &mut impl Store) {
    let err = store
        .unit_of_work(|s| {
            s.update_recipe(
                recipe_core::RecipeId(404),
                &fields("Soup", RecipeType::Other, 1, "x"),
                None,
            )
        })
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound { id: 404, .. }));
}

macro_rules! conformance {
    ($backend:ident, $make:expr) => {
        mod $backend {
            use super::*;

            #[test]
            fn conjunction_is_intersection() {
                super::conjunction_is_intersection(&mut $make);
            }

            #[test]
            fn join_match_is_deduplicated() {
                super::join_match_is_deduplicated(&mut $make);
            }

            #[test]
            fn ingredient_match_is_case_insensitive_exact() {
                super::ingredient_match_is_case_insensitive_exact(&mut $make);
            }

            #[test]
            fn instruction_is_case_insensitive_substring() {
                super::instruction_is_case_insensitive_substring(&mut $make);
            }

            #[test]
            fn instruction_match_folds_accented_letters() {
                super::instruction_match_folds_accented_letters(&mut $make);
            }

            #[test]
            fn other_type_escapes_vegetarian_filter() {
                super::other_type_escapes_vegetarian_filter(&mut $make);
            }

            #[test]
            fn exclude_ingredient_is_ignored() {
                super::exclude_ingredient_is_ignored(&mut $make);
            }

            #[test]
            fn unfiltered_search_pages_by_name() {
                super::unfiltered_search_pages_by_name(&mut $make);
            }

            #[test]
            fn join_search_counts_distinct_recipes() {
                super::join_search_counts_distinct_recipes(&mut $make);
            }

            #[test]
            fn update_replaces_or_keeps_ingredients() {
                super::update_replaces_or_keeps_ingredients(&mut $make);
            }

            #[test]
            fn ingredients_list_in_id_order() {
                super::ingredients_list_in_id_order(&mut $make);
            }

            #[test]
            fn duplicate_recipe_name_is_rejected() {
                super::duplicate_recipe_name_is_rejected(&mut $make);
            }

            #[test]
            fn update_of_missing_recipe_is_not_found() {
                super::update_of_missing_recipe_is_not_found(&mut $make);
            }
        }
    };
}

conformance!(in_memory, InMemoryStore::new());
conformance!(sqlite, SqliteStore::in_memory().unwrap());
