//! Turns raw ingredient identifiers into validated ingredient entities.

use std::collections::BTreeSet;

use recipe_core::{Ingredient, IngredientId};

use crate::error::StorageError;
use crate::traits::IngredientStore;

/// Looks up every id in `ids`.
///
/// All-or-nothing: the first id that does not resolve fails the whole call
/// with [`StorageError::NotFound`]. Repeated ids collapse into one entry.
pub fn resolve_ingredients<S>(
    store: &S,
    ids: &[IngredientId],
) -> Result<BTreeSet<Ingredient>, StorageError>
where
    S: IngredientStore + ?Sized,
{
    let mut resolved = BTreeSet::new();
    for &id in ids {
        let ingredient = store
            .find_ingredient(id)?
            .ok_or_else(|| StorageError::ingredient_not_found(id))?;
        resolved.insert(ingredient);
    }
    Ok(resolved)
}
