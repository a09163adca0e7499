use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Flavour family of a generated pie; selects the word lists used upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieType {
    Sweet,
    Savory,
}

impl PieType {
    /// Label printed under the title, e.g. `Sweet Pie`.
    pub const fn label(self) -> &'static str {
        match self {
            PieType::Sweet => "Sweet Pie",
            PieType::Savory => "Savory Pie",
        }
    }

    pub const fn badge(self) -> &'static str {
        match self {
            PieType::Sweet => "Sweet",
            PieType::Savory => "Savory",
        }
    }
}

impl fmt::Display for PieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.badge())
    }
}

/// Named ingredient group, in print order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IngredientSection {
    Crust,
    Filling,
    Topping,
}

impl IngredientSection {
    pub const ALL: [IngredientSection; 3] = [
        IngredientSection::Crust,
        IngredientSection::Filling,
        IngredientSection::Topping,
    ];

    /// Subheading used by both the card and the exported document.
    pub const fn heading(self) -> &'static str {
        match self {
            IngredientSection::Crust => "For the Crust:",
            IngredientSection::Filling => "For the Filling:",
            IngredientSection::Topping => "For the Topping:",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientGroups {
    pub crust: Vec<String>,
    pub filling: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topping: Option<Vec<String>>,
}

impl IngredientGroups {
    /// Toppings, with an empty list reported the same as an absent one.
    pub fn topping(&self) -> Option<&[String]> {
        match &self.topping {
            Some(items) if !items.is_empty() => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn section(&self, section: IngredientSection) -> &[String] {
        match section {
            IngredientSection::Crust => &self.crust,
            IngredientSection::Filling => &self.filling,
            IngredientSection::Topping => self.topping().unwrap_or_default(),
        }
    }

    /// Non-empty groups in crust, filling, topping order.
    pub fn groups(&self) -> impl Iterator<Item = (IngredientSection, &[String])> + '_ {
        IngredientSection::ALL
            .into_iter()
            .map(|section| (section, self.section(section)))
            .filter(|(_, items)| !items.is_empty())
    }

    pub fn len(&self) -> usize {
        self.groups().map(|(_, items)| items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One generated pie recipe. Treated as read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub pie_type: PieType,
    pub ingredients: IngredientGroups,
    pub instructions: Vec<String>,
    pub baking_time: String,
    pub baking_temp: String,
    pub servings: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeError {
    #[error("recipe has no crust ingredients")]
    MissingCrust,
    #[error("recipe has no filling ingredients")]
    MissingFilling,
    #[error("recipe has no instructions")]
    MissingInstructions,
    #[error("recipe must serve at least one person")]
    NoServings,
    #[error("recipe title is empty")]
    EmptyTitle,
}

impl Recipe {
    /// Checks the invariants callers rely on when a recipe comes from outside
    /// the generator (e.g. a JSON file).
    pub fn validate(&self) -> Result<(), RecipeError> {
        if self.title.trim().is_empty() {
            return Err(RecipeError::EmptyTitle);
        }
        if self.ingredients.crust.is_empty() {
            return Err(RecipeError::MissingCrust);
        }
        if self.ingredients.filling.is_empty() {
            return Err(RecipeError::MissingFilling);
        }
        if self.instructions.is_empty() {
            return Err(RecipeError::MissingInstructions);
        }
        if self.servings == 0 {
            return Err(RecipeError::NoServings);
        }
        Ok(())
    }

    pub fn all_ingredients(&self) -> impl Iterator<Item = &str> + '_ {
        self.ingredients
            .groups()
            .flat_map(|(_, items)| items.iter().map(String::as_str))
    }

    pub fn has_topping(&self) -> bool {
        self.ingredients.topping().is_some()
    }

    /// Download name for the exported document: `<slug>_recipe.<extension>`.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}_recipe.{extension}", slugify(&self.title))
    }
}

/// Lowercases the title and replaces each run of whitespace with `_`.
pub fn slugify(title: &str) -> String {
    title
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}
