//! Recipe loading

use nutforge_errors::{Error, RecipeError};
use nutforge_types::Recipe;
use std::path::Path;
use tokio::fs;

/// The recipe shipped with nutforge
const DEFAULT_RECIPE: &str = include_str!("../recipes/nutshell.toml");

/// Load a recipe from a file, or the bundled default when no path is given
///
/// # Errors
///
/// Returns `RecipeError` if the file cannot be read or the document fails
/// validation.
pub async fn load_recipe(path: Option<&Path>) -> Result<Recipe, Error> {
    let text = match path {
        Some(p) => fs::read_to_string(p)
            .await
            .map_err(|e| RecipeError::ReadFailed {
                path: p.display().to_string(),
                message: e.to_string(),
            })?,
        None => DEFAULT_RECIPE.to_string(),
    };

    Ok(Recipe::from_toml(&text)?)
}
