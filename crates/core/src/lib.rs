pub mod card;
pub mod generator;
pub mod measure;
pub mod recipe;
pub mod substitutions;

pub use card::render_card;
pub use generator::{generate_random_recipe, generate_recipe};
pub use measure::abbreviate;
pub use recipe::{slugify, IngredientGroups, IngredientSection, PieType, Recipe, RecipeError};
pub use substitutions::{find_substitutions, Substitution, SUBSTITUTIONS};
