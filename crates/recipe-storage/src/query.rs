//! Renders a [`RecipePredicate`] into a parameterized SQLite fragment.
//!
//! The fragment is the `FROM ... [JOIN ...] [WHERE ...]` tail of a query over
//! `recipes r`. The ingredient join is only added when a clause needs it, and
//! then the caller must select `DISTINCT` recipe rows (and count `DISTINCT`
//! ids), since a recipe appears once per joined ingredient row.

use rusqlite::types::Value;

use recipe_core::{Clause, RecipePredicate};

/// A rendered predicate and its positional parameters (`?1`, `?2`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPredicate {
    pub from_where: String,
    pub params: Vec<Value>,
    pub distinct: bool,
}

impl RenderedPredicate {
    /// Index the next appended parameter will take.
    pub fn next_param(&self) -> usize {
        self.params.len() + 1
    }
}

/// Renders `predicate` as the tail of a `SELECT` over `recipes r`.
pub fn render(predicate: &RecipePredicate) -> RenderedPredicate {
    let mut from_where = String::from("FROM recipes r");
    let distinct = predicate.joins_ingredients();
    if distinct {
        from_where.push_str(
            " JOIN recipe_ingredients ri ON ri.recipe_id = r.id \
             JOIN ingredients i ON i.id = ri.ingredient_id",
        );
    }

    let mut conditions = Vec::new();
    let mut params = Vec::new();
    for clause in predicate.clauses() {
        let n = params.len() + 1;
        match clause {
            Clause::TypeIs(ty) => {
                conditions.push(format!("r.recipe_type = ?{n}"));
                params.push(Value::Text(ty.as_str().to_string()));
            }
            Clause::ServingsEqual(servings) => {
                conditions.push(format!("r.number_of_servings = ?{n}"));
                params.push(Value::Integer(i64::from(*servings)));
            }
            Clause::InstructionsContain(needle) => {
                // instr() rather than LIKE so '%' and '_' in the needle are literal.
                conditions.push(format!("instr(fold_case(r.instructions), ?{n}) > 0"));
                params.push(Value::Text(needle.clone()));
            }
            Clause::HasIngredientNamed(name) => {
                conditions.push(format!("lower(i.name) = ?{n}"));
                params.push(Value::Text(name.clone()));
            }
        }
    }

    if !conditions.is_empty() {
        from_where.push_str(" WHERE ");
        from_where.push_str(&conditions.join(" AND "));
    }

    RenderedPredicate {
        from_where,
        params,
        distinct,
    }
}

#[cfg(test)]
mod tests {
    use recipe_core::SearchCriteria;

    use super::*;

    fn render_criteria(criteria: SearchCriteria) -> RenderedPredicate {
        render(&RecipePredicate::compile(&criteria))
    }

    #[test]
    fn no_filters_render_a_bare_table_scan() {
        let rendered = render_criteria(SearchCriteria::default());
        insta::assert_snapshot!(rendered.from_where, @"FROM recipes r");
        assert!(rendered.params.is_empty());
        assert!(!rendered.distinct);
    }

    #[test]
    fn scalar_filters_do_not_join() {
        let rendered = render_criteria(SearchCriteria {
            vegetarian: Some(true),
            servings: Some(4),
            ..SearchCriteria::default()
        });
        insta::assert_snapshot!(
            rendered.from_where,
            @"FROM recipes r WHERE r.recipe_type = ?1 AND r.number_of_servings = ?2"
        );
        assert_eq!(
            rendered.params,
            vec![Value::Text("VEGETARIAN".into()), Value::Integer(4)]
        );
        assert!(!rendered.distinct);
    }

    #[test]
    fn ingredient_filter_joins_and_requires_distinct() {
        let rendered = render_criteria(SearchCriteria {
            instruction: Some("Oven".into()),
            include_ingredient: Some("Salt".into()),
            ..SearchCriteria::default()
        });
        insta::assert_snapshot!(
            rendered.from_where,
            @"FROM recipes r JOIN recipe_ingredients ri ON ri.recipe_id = r.id JOIN ingredients i ON i.id = ri.ingredient_id WHERE instr(fold_case(r.instructions), ?1) > 0 AND lower(i.name) = ?2"
        );
        assert_eq!(
            rendered.params,
            vec![Value::Text("oven".into()), Value::Text("salt".into())]
        );
        assert!(rendered.distinct);
        assert_eq!(rendered.next_param(), 3);
    }
}
