//! Compiles [`SearchCriteria`] into a conjunctive predicate over recipes.
//!
//! Each present filter becomes one [`Clause`]; the predicate holds when every
//! clause holds, and an empty predicate holds for every recipe. Backends
//! either evaluate the predicate directly ([`RecipePredicate::matches`]) or
//! render it into their own query language.
//!
//! Instruction text is folded with Unicode `to_lowercase` (the SQLite backend
//! registers the same folding as `fold_case`). Ingredient names are ASCII, so
//! their folding is ASCII and matches SQLite's built-in `lower()`.

use crate::criteria::SearchCriteria;
use crate::recipe::{Recipe, RecipeType};

/// A single filter condition. String operands are stored already folded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// `type = ?`
    TypeIs(RecipeType),
    /// `number_of_servings = ?`
    ServingsEqual(u32),
    /// `fold_case(instructions)` contains the operand.
    InstructionsContain(String),
    /// Some attached ingredient has `lower(name)` equal to the operand.
    /// Backends that join to evaluate this must deduplicate recipes.
    HasIngredientNamed(String),
}

impl Clause {
    fn matches(&self, recipe: &Recipe) -> bool {
        match self {
            Clause::TypeIs(ty) => recipe.recipe_type == *ty,
            Clause::ServingsEqual(n) => recipe.number_of_servings == *n,
            Clause::InstructionsContain(needle) => recipe
                .instructions
                .to_lowercase()
                .contains(needle.as_str()),
            Clause::HasIngredientNamed(name) => recipe
                .ingredients
                .iter()
                .any(|i| i.name.to_ascii_lowercase() == *name),
        }
    }
}

/// Conjunction of clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipePredicate {
    clauses: Vec<Clause>,
}

impl RecipePredicate {
    /// Builds the predicate for `criteria`.
    ///
    /// The vegetarian flag maps onto exactly two classifications, so a recipe
    /// typed OTHER never matches either value. `exclude_ingredient` is not
    /// compiled.
    pub fn compile(criteria: &SearchCriteria) -> Self {
        let mut clauses = Vec::new();

        if let Some(vegetarian) = criteria.vegetarian {
            clauses.push(Clause::TypeIs(if vegetarian {
                RecipeType::Vegetarian
            } else {
                RecipeType::NonVegetarian
            }));
        }

        if let Some(servings) = criteria.servings {
            clauses.push(Clause::ServingsEqual(servings));
        }

        if let Some(instruction) = &criteria.instruction {
            clauses.push(Clause::InstructionsContain(
                instruction.to_lowercase(),
            ));
        }

        if let Some(name) = &criteria.include_ingredient {
            clauses.push(Clause::HasIngredientNamed(name.to_ascii_lowercase()));
        }

        RecipePredicate { clauses }
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// True when evaluating the predicate needs the ingredient join.
    pub fn joins_ingredients(&self) -> bool {
        self.clauses
            .iter()
            .any(|c| matches!(c, Clause::HasIngredientNamed(_)))
    }

    /// Evaluates the predicate against a materialized recipe.
    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.clauses.iter().all(|c| c.matches(recipe))
    }
}
