use std::fs;
use std::path::PathBuf;

use piecraft_core::{abbreviate, find_substitutions, generate_random_recipe, Recipe};
use piecraft_printing::{
    ExportOptions, FontMetrics, FontTier, GlyphRun, Helvetica, RecipeLayout, RecipeLayoutEngine,
    TextRole,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn fixture(name: &str) -> Recipe {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(format!("{name}.ron"));
    let text = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("Failed to read {:?}: {err}", path));
    ron::de::from_str(&text).unwrap_or_else(|err| panic!("Failed to parse {:?}: {err}", path))
}

fn content_runs(layout: &RecipeLayout) -> impl Iterator<Item = &GlyphRun> + '_ {
    layout
        .glyph_runs()
        .filter(|run| !matches!(run.role, TextRole::Marker | TextRole::Footer))
}

fn drawn_words(layout: &RecipeLayout) -> Vec<String> {
    content_runs(layout)
        .flat_map(|run| run.text.split_whitespace().map(str::to_string).collect::<Vec<_>>())
        .collect()
}

/// Every piece of the recipe in print order, as it should appear on paper.
fn expected_words(recipe: &Recipe) -> Vec<String> {
    let mut pieces = vec![
        recipe.title.clone(),
        recipe.pie_type.label().to_string(),
        format!("Temp: {}", recipe.baking_temp),
        format!("Time: {}", recipe.baking_time),
        format!("Servings: {}", recipe.servings),
        "Ingredients".to_string(),
    ];
    for (section, items) in recipe.ingredients.groups() {
        pieces.push(section.heading().to_string());
        pieces.extend(items.iter().map(|item| abbreviate(item)));
    }
    pieces.push("Instructions".to_string());
    pieces.extend(recipe.instructions.iter().map(|step| abbreviate(step)));
    let substitutions = find_substitutions(recipe.all_ingredients());
    if !substitutions.is_empty() {
        pieces.push("Real World Substitutions".to_string());
        pieces.extend(substitutions.iter().map(|s| s.display()));
    }
    pieces
        .iter()
        .flat_map(|piece| piece.split_whitespace().map(str::to_string).collect::<Vec<_>>())
        .collect()
}

fn assert_in_bounds(layout: &RecipeLayout, options: &ExportOptions) {
    let area = options.content_area();
    let metrics = Helvetica;
    for run in content_runs(layout) {
        let width = metrics.text_width(&run.text, run.font_size_pt);
        assert!(run.position.x >= area.left - 0.5, "{:?} left of margin", run.text);
        assert!(
            run.position.x + width <= area.right() + 0.5,
            "{:?} right of margin",
            run.text
        );
        assert!(run.position.y >= area.top - 0.5, "{:?} above margin", run.text);
        assert!(
            run.position.y + run.font_size_pt <= area.bottom() + 0.5,
            "{:?} below margin",
            run.text
        );
    }
}

fn has_text(layout: &RecipeLayout, text: &str) -> bool {
    layout.glyph_runs().any(|run| run.text == text)
}

#[test]
fn plain_recipe_fits_one_page_without_optional_sections() {
    let recipe = fixture("plain_apple");
    let options = ExportOptions::default();
    let layout = RecipeLayoutEngine::new().layout(&recipe, &options);

    assert_eq!(layout.summary.total_pages, 1);
    assert_eq!(layout.summary.tier, FontTier::Roomy);
    assert_eq!(layout.summary.ingredient_columns, 1);
    assert_eq!(layout.summary.instruction_columns, 1);
    assert_eq!(layout.summary.substitution_count, 0);
    assert!(!has_text(&layout, "For the Topping:"));
    assert!(!has_text(&layout, "Real World Substitutions"));
    assert_eq!(drawn_words(&layout), expected_words(&recipe));
    assert_in_bounds(&layout, &options);
}

#[test]
fn busy_recipe_goes_dense_with_two_columns() {
    let recipe = fixture("grand_feast");
    let options = ExportOptions::default();
    let layout = RecipeLayoutEngine::new().layout(&recipe, &options);

    assert_eq!(layout.summary.tier, FontTier::Dense);
    assert_eq!(layout.summary.ingredient_columns, 2);
    assert_eq!(layout.summary.instruction_columns, 2);
    assert_eq!(layout.summary.substitution_count, 9);
    assert_eq!(layout.summary.substitution_columns, 2);

    let substitutions: Vec<String> = layout
        .glyph_runs()
        .filter(|run| run.text.contains('→'))
        .map(|run| run.text.clone())
        .collect();
    let keys: Vec<&str> = substitutions
        .iter()
        .filter_map(|line| line.split(" → ").next())
        .collect();
    assert_eq!(
        keys,
        vec![
            "moonbeam sugar",
            "starlight zest",
            "crystalized honey",
            "levitation powder",
            "whispering wind salt",
            "fairy dust",
            "unicorn butter",
            "dragon eggs",
            "enchanted berries",
        ]
    );

    assert!(has_text(&layout, "For the Topping:"));
    assert_eq!(drawn_words(&layout), expected_words(&recipe));
    assert_in_bounds(&layout, &options);
}

#[test]
fn long_instruction_wraps_with_number_on_first_line_only() {
    let recipe = fixture("long_step");
    let options = ExportOptions::default();
    let layout = RecipeLayoutEngine::new().layout(&recipe, &options);

    let markers: Vec<&GlyphRun> = layout
        .glyph_runs()
        .filter(|run| run.role == TextRole::Marker && run.text.ends_with('.'))
        .collect();
    let numbers: Vec<&str> = markers.iter().map(|run| run.text.as_str()).collect();
    assert_eq!(numbers, vec!["1.", "2.", "3."]);

    let step_lines: Vec<&GlyphRun> = layout
        .glyph_runs()
        .skip_while(|run| !run.text.starts_with("Slowly"))
        .take_while(|run| run.text != "3.")
        .filter(|run| run.role == TextRole::Body)
        .collect();
    assert!(step_lines.len() > 3, "expected wrapping, got {}", step_lines.len());
    assert!((markers[1].position.y - step_lines[0].position.y).abs() < 1e-3);
    assert!(step_lines
        .windows(2)
        .all(|pair| pair[1].position.y > pair[0].position.y));

    // Empty topping list behaves like no topping.
    assert!(!has_text(&layout, "For the Topping:"));
    assert_eq!(drawn_words(&layout), expected_words(&recipe));
    assert_in_bounds(&layout, &options);
}

#[test]
fn generated_recipes_keep_everything_in_bounds() {
    let engine = RecipeLayoutEngine::new();
    let options = ExportOptions::default();
    let mut rng = StdRng::seed_from_u64(77);
    for _ in 0..60 {
        let recipe = generate_random_recipe(&mut rng);
        let layout = engine.layout(&recipe, &options);
        assert_eq!(drawn_words(&layout), expected_words(&recipe), "{}", recipe.title);
        assert_in_bounds(&layout, &options);
        assert_eq!(
            has_text(&layout, "For the Topping:"),
            recipe.has_topping(),
            "{}",
            recipe.title
        );
    }
}

#[test]
fn overflow_never_drops_content() {
    let mut recipe = fixture("grand_feast");
    let extra: Vec<String> = (0..60)
        .map(|n| format!("Repeat the incantation number {n} while stirring clockwise."))
        .collect();
    recipe.instructions.extend(extra);

    let options = ExportOptions::default();
    let layout = RecipeLayoutEngine::new().layout(&recipe, &options);
    assert!(layout.summary.total_pages > 1);
    assert_eq!(layout.summary.tier, FontTier::Dense);
    for (index, page) in layout.pages.iter().enumerate() {
        assert_eq!(page.page_number as usize, index + 1);
    }
    assert_eq!(drawn_words(&layout), expected_words(&recipe));
    assert_in_bounds(&layout, &options);
}
