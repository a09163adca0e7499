use std::fmt::Write as _;

use crate::recipe::Recipe;
use crate::substitutions::find_substitutions;

/// 以純文字呈現食譜卡片。 / Renders the on-screen recipe card as plain text.
///
/// Ingredients are shown verbatim (no unit abbreviation); the substitutions
/// addendum only appears when the recipe mentions a magical ingredient.
pub fn render_card(recipe: &Recipe) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  [{}]", recipe.title, recipe.pie_type.badge());
    let _ = writeln!(out, "{}", "=".repeat(recipe.title.chars().count()));
    out.push('\n');

    out.push_str("Baking Details\n");
    let _ = writeln!(out, "  Temperature: {}", recipe.baking_temp);
    let _ = writeln!(out, "  Time: {}", recipe.baking_time);
    let _ = writeln!(out, "  Servings: {}", recipe.servings);
    out.push('\n');

    out.push_str("Ingredients\n");
    for (section, items) in recipe.ingredients.groups() {
        let _ = writeln!(out, "  {}", section.heading());
        for item in items {
            let _ = writeln!(out, "    - {item}");
        }
    }
    out.push('\n');

    out.push_str("Instructions\n");
    for (index, step) in recipe.instructions.iter().enumerate() {
        let _ = writeln!(out, "  {}. {step}", index + 1);
    }

    let substitutions = find_substitutions(recipe.all_ingredients());
    if !substitutions.is_empty() {
        out.push('\n');
        out.push_str("Real World Substitutions\n");
        for substitution in substitutions {
            let _ = writeln!(out, "  - {substitution}");
        }
    }
    out
}
